use std::sync::Arc;

use super::errors::DomainError;
use super::order::{Order, OrderLineItem};
use super::product::{Product, ProductUnitPrice};

/// A stored row with a store-assigned integer id.
pub trait Record: Clone + Send + Sync + 'static {
    /// The insertable shape, without an id.
    type New: Send;

    fn id(&self) -> i32;
}

/// Row-level persistence for one entity type. Each call stands alone: there is
/// no transaction spanning calls, so callers must not rely on multi-row
/// atomicity.
pub trait Repository<T: Record>: Send + Sync + 'static {
    fn get_by_id(&self, id: i32) -> Result<Option<T>, DomainError>;
    fn get_all(&self) -> Result<Vec<T>, DomainError>;
    fn add(&self, new: T::New) -> Result<T, DomainError>;
    fn update(&self, record: &T) -> Result<T, DomainError>;
    /// Returns the removed row, or `None` when nothing matched.
    fn delete(&self, id: i32) -> Result<Option<T>, DomainError>;
}

pub trait OrderRepository: Repository<Order> {}

pub trait OrderLineItemRepository: Repository<OrderLineItem> {
    fn line_items_by_order_id(&self, order_id: i32) -> Result<Vec<OrderLineItem>, DomainError>;
}

pub trait ProductRepository: Repository<Product> {}

pub trait ProductUnitPriceRepository: Repository<ProductUnitPrice> {
    fn unit_prices_by_product_id(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductUnitPrice>, DomainError>;
}

impl<T: Record, R: Repository<T> + ?Sized> Repository<T> for Arc<R> {
    fn get_by_id(&self, id: i32) -> Result<Option<T>, DomainError> {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> Result<Vec<T>, DomainError> {
        (**self).get_all()
    }

    fn add(&self, new: T::New) -> Result<T, DomainError> {
        (**self).add(new)
    }

    fn update(&self, record: &T) -> Result<T, DomainError> {
        (**self).update(record)
    }

    fn delete(&self, id: i32) -> Result<Option<T>, DomainError> {
        (**self).delete(id)
    }
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {}

impl<R: OrderLineItemRepository + ?Sized> OrderLineItemRepository for Arc<R> {
    fn line_items_by_order_id(&self, order_id: i32) -> Result<Vec<OrderLineItem>, DomainError> {
        (**self).line_items_by_order_id(order_id)
    }
}

impl<R: ProductRepository + ?Sized> ProductRepository for Arc<R> {}

impl<R: ProductUnitPriceRepository + ?Sized> ProductUnitPriceRepository for Arc<R> {
    fn unit_prices_by_product_id(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductUnitPrice>, DomainError> {
        (**self).unit_prices_by_product_id(product_id)
    }
}
