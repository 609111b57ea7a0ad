use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, NewOrderLineItem, Order, OrderLineItem, OrderType};
use crate::domain::product::{NewProduct, NewProductUnitPrice, Product, ProductUnitPrice};
use crate::schema::{order_line_items, orders, product_unit_prices, products};

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub order_number: Option<String>,
    pub order_type: i32,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub order_number: Option<String>,
    pub order_type: i32,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_type = OrderType::try_from(row.order_type).map_err(|_| {
            DomainError::Internal(format!(
                "order {} has unknown order type {}",
                row.id, row.order_type
            ))
        })?;
        Ok(Order {
            id: row.id,
            total_amount: row.total_amount,
            total_amount_after_discount: row.total_amount_after_discount,
            discount: row.discount,
            created_at: row.created_at,
            order_number: row.order_number,
            order_type,
            branch_id: row.branch_id,
            company_id: row.company_id,
            user_id: row.user_id,
        })
    }
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        OrderRow {
            id: order.id,
            total_amount: order.total_amount.clone(),
            total_amount_after_discount: order.total_amount_after_discount.clone(),
            discount: order.discount.clone(),
            created_at: order.created_at,
            order_number: order.order_number.clone(),
            order_type: order.order_type.code(),
            branch_id: order.branch_id,
            company_id: order.company_id,
            user_id: order.user_id.clone(),
        }
    }
}

impl From<NewOrder> for NewOrderRow {
    fn from(new: NewOrder) -> Self {
        NewOrderRow {
            total_amount: new.total_amount,
            total_amount_after_discount: new.total_amount_after_discount,
            discount: new.discount,
            created_at: new.created_at,
            order_number: new.order_number,
            order_type: new.order_type.code(),
            branch_id: new.branch_id,
            company_id: new.company_id,
            user_id: new.user_id,
        }
    }
}

// ── Order line items ─────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Associations, AsChangeset,
)]
#[diesel(table_name = order_line_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineItemRow {
    pub id: i32,
    pub order_id: i32,
    pub product_unit_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_line_items)]
pub struct NewOrderLineItemRow {
    pub order_id: i32,
    pub product_unit_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

impl From<OrderLineItemRow> for OrderLineItem {
    fn from(row: OrderLineItemRow) -> Self {
        OrderLineItem {
            id: row.id,
            order_id: row.order_id,
            product_unit_id: row.product_unit_id,
            quantity: row.quantity,
            total_price: row.total_price,
            description: row.description,
        }
    }
}

impl From<&OrderLineItem> for OrderLineItemRow {
    fn from(item: &OrderLineItem) -> Self {
        OrderLineItemRow {
            id: item.id,
            order_id: item.order_id,
            product_unit_id: item.product_unit_id,
            quantity: item.quantity,
            total_price: item.total_price.clone(),
            description: item.description.clone(),
        }
    }
}

impl From<NewOrderLineItem> for NewOrderLineItemRow {
    fn from(new: NewOrderLineItem) -> Self {
        NewOrderLineItemRow {
            order_id: new.order_id,
            product_unit_id: new.product_unit_id,
            quantity: new.quantity,
            total_price: new.total_price,
            description: new.description,
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            department_id: row.department_id,
            price: row.price,
            active: row.active,
        }
    }
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        ProductRow {
            id: product.id,
            name: product.name.clone(),
            department_id: product.department_id,
            price: product.price.clone(),
            active: product.active,
        }
    }
}

impl From<NewProduct> for NewProductRow {
    fn from(new: NewProduct) -> Self {
        NewProductRow {
            name: new.name,
            department_id: new.department_id,
            price: new.price,
            active: new.active,
        }
    }
}

// ── Product unit prices ──────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Associations, AsChangeset,
)]
#[diesel(table_name = product_unit_prices)]
#[diesel(belongs_to(ProductRow, foreign_key = product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductUnitPriceRow {
    pub id: i32,
    pub product_id: i32,
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_unit_prices)]
pub struct NewProductUnitPriceRow {
    pub product_id: i32,
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

impl From<ProductUnitPriceRow> for ProductUnitPrice {
    fn from(row: ProductUnitPriceRow) -> Self {
        ProductUnitPrice {
            id: row.id,
            product_id: row.product_id,
            unit_id: row.unit_id,
            special_price: row.special_price,
        }
    }
}

impl From<&ProductUnitPrice> for ProductUnitPriceRow {
    fn from(price: &ProductUnitPrice) -> Self {
        ProductUnitPriceRow {
            id: price.id,
            product_id: price.product_id,
            unit_id: price.unit_id,
            special_price: price.special_price.clone(),
        }
    }
}

impl From<NewProductUnitPrice> for NewProductUnitPriceRow {
    fn from(new: NewProductUnitPrice) -> Self {
        NewProductUnitPriceRow {
            product_id: new.product_id,
            unit_id: new.unit_id,
            special_price: new.special_price,
        }
    }
}
