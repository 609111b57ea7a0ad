//! In-memory record store with call counting and failure injection.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use log::{Level, Log, Metadata, Record as LogRecord};

use commerce_store::domain::errors::DomainError;
use commerce_store::domain::order::{NewOrder, NewOrderLineItem, Order, OrderLineItem};
use commerce_store::domain::ports::{
    OrderLineItemRepository, OrderRepository, ProductRepository, ProductUnitPriceRepository,
    Record, Repository,
};
use commerce_store::domain::product::{
    NewProduct, NewProductUnitPrice, Product, ProductUnitPrice,
};
use commerce_store::{OrderService, ProductService};

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal")
}

/// Builds a stored row from its insertable shape.
pub trait Materialize: Record {
    fn materialize(new: Self::New, id: i32) -> Self;
}

impl Materialize for Order {
    fn materialize(new: NewOrder, id: i32) -> Self {
        Order {
            id,
            total_amount: new.total_amount,
            total_amount_after_discount: new.total_amount_after_discount,
            discount: new.discount,
            created_at: new.created_at,
            order_number: new.order_number,
            order_type: new.order_type,
            branch_id: new.branch_id,
            company_id: new.company_id,
            user_id: new.user_id,
        }
    }
}

impl Materialize for OrderLineItem {
    fn materialize(new: NewOrderLineItem, id: i32) -> Self {
        OrderLineItem {
            id,
            order_id: new.order_id,
            product_unit_id: new.product_unit_id,
            quantity: new.quantity,
            total_price: new.total_price,
            description: new.description,
        }
    }
}

impl Materialize for Product {
    fn materialize(new: NewProduct, id: i32) -> Self {
        Product {
            id,
            name: new.name,
            department_id: new.department_id,
            price: new.price,
            active: new.active,
        }
    }
}

impl Materialize for ProductUnitPrice {
    fn materialize(new: NewProductUnitPrice, id: i32) -> Self {
        ProductUnitPrice {
            id,
            product_id: new.product_id,
            unit_id: new.unit_id,
            special_price: new.special_price,
        }
    }
}

type RowCheck<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type IdCheck = Box<dyn Fn(i32) -> bool + Send + Sync>;

pub struct MemoryStore<T> {
    rows: Mutex<BTreeMap<i32, T>>,
    next_id: AtomicI32,
    calls: AtomicUsize,
    fail_add: Mutex<Option<RowCheck<T>>>,
    fail_update: Mutex<Option<RowCheck<T>>>,
    fail_delete: Mutex<Option<IdCheck>>,
}

impl<T: Materialize> MemoryStore<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryStore {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
            calls: AtomicUsize::new(0),
            fail_add: Mutex::new(None),
            fail_update: Mutex::new(None),
            fail_delete: Mutex::new(None),
        })
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<T> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn fail_add_when(&self, check: impl Fn(&T) -> bool + Send + Sync + 'static) {
        *self.fail_add.lock().unwrap() = Some(Box::new(check));
    }

    pub fn fail_update_when(&self, check: impl Fn(&T) -> bool + Send + Sync + 'static) {
        *self.fail_update.lock().unwrap() = Some(Box::new(check));
    }

    pub fn fail_delete_when(&self, check: impl Fn(i32) -> bool + Send + Sync + 'static) {
        *self.fail_delete.lock().unwrap() = Some(Box::new(check));
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: Materialize> Repository<T> for MemoryStore<T> {
    fn get_by_id(&self, id: i32) -> Result<Option<T>, DomainError> {
        self.touch();
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    fn get_all(&self) -> Result<Vec<T>, DomainError> {
        self.touch();
        Ok(self.rows())
    }

    fn add(&self, new: T::New) -> Result<T, DomainError> {
        self.touch();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = T::materialize(new, id);
        if let Some(check) = self.fail_add.lock().unwrap().as_ref() {
            if check(&row) {
                return Err(DomainError::Internal(format!("insert of row {} refused", id)));
            }
        }
        self.rows.lock().unwrap().insert(id, row.clone());
        Ok(row)
    }

    fn update(&self, record: &T) -> Result<T, DomainError> {
        self.touch();
        if let Some(check) = self.fail_update.lock().unwrap().as_ref() {
            if check(record) {
                return Err(DomainError::Internal(format!(
                    "update of row {} refused",
                    record.id()
                )));
            }
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record.clone())
            }
            None => Err(DomainError::Internal(format!("row {} missing", record.id()))),
        }
    }

    fn delete(&self, id: i32) -> Result<Option<T>, DomainError> {
        self.touch();
        if let Some(check) = self.fail_delete.lock().unwrap().as_ref() {
            if check(id) {
                return Err(DomainError::Internal(format!("delete of row {} refused", id)));
            }
        }
        Ok(self.rows.lock().unwrap().remove(&id))
    }
}

impl OrderRepository for MemoryStore<Order> {}

impl OrderLineItemRepository for MemoryStore<OrderLineItem> {
    fn line_items_by_order_id(&self, order_id: i32) -> Result<Vec<OrderLineItem>, DomainError> {
        self.touch();
        Ok(self
            .rows()
            .into_iter()
            .filter(|l| l.order_id == order_id)
            .collect())
    }
}

impl ProductRepository for MemoryStore<Product> {}

impl ProductUnitPriceRepository for MemoryStore<ProductUnitPrice> {
    fn unit_prices_by_product_id(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductUnitPrice>, DomainError> {
        self.touch();
        Ok(self
            .rows()
            .into_iter()
            .filter(|p| p.product_id == product_id)
            .collect())
    }
}

pub type MemOrderService = OrderService<Arc<MemoryStore<Order>>, Arc<MemoryStore<OrderLineItem>>>;
pub type MemProductService =
    ProductService<Arc<MemoryStore<Product>>, Arc<MemoryStore<ProductUnitPrice>>>;

pub struct OrderFixture {
    pub orders: Arc<MemoryStore<Order>>,
    pub items: Arc<MemoryStore<OrderLineItem>>,
    pub service: MemOrderService,
}

impl OrderFixture {
    pub fn new() -> Self {
        let orders = MemoryStore::new();
        let items = MemoryStore::new();
        let service = OrderService::new(orders.clone(), items.clone());
        OrderFixture {
            orders,
            items,
            service,
        }
    }

    pub fn calls(&self) -> usize {
        self.orders.calls() + self.items.calls()
    }
}

pub struct ProductFixture {
    pub products: Arc<MemoryStore<Product>>,
    pub prices: Arc<MemoryStore<ProductUnitPrice>>,
    pub service: MemProductService,
}

impl ProductFixture {
    pub fn new() -> Self {
        let products = MemoryStore::new();
        let prices = MemoryStore::new();
        let service = ProductService::new(products.clone(), prices.clone());
        ProductFixture {
            products,
            prices,
            service,
        }
    }

    pub fn calls(&self) -> usize {
        self.products.calls() + self.prices.calls()
    }
}

/// Logger that keeps every record it receives.
#[derive(Default)]
pub struct CaptureLog {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureLog {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }
}

impl Log for CaptureLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &LogRecord) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}
