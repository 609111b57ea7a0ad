use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::ports::Record;
use super::reconcile::ChildRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Local = 1,
    Travel = 2,
}

impl OrderType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for OrderType {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrderType::Local),
            2 => Ok(OrderType::Travel),
            other => Err(DomainError::Validation(format!(
                "order type must be 1 (local) or 2 (travel), got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
}

impl Record for Order {
    type New = NewOrder;

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    pub id: i32,
    pub order_id: i32,
    pub product_unit_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLineItem {
    pub order_id: i32,
    pub product_unit_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

impl Record for OrderLineItem {
    type New = NewOrderLineItem;

    fn id(&self) -> i32 {
        self.id
    }
}

/// One validated entry of the cart arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemSpec {
    pub product_unit_id: i32,
    pub quantity: i32,
    /// `quantity * unit price`
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

impl ChildRecord for OrderLineItem {
    type Key = i32;
    type Spec = LineItemSpec;

    const LABEL: &'static str = "line item";

    fn natural_key(&self) -> i32 {
        self.product_unit_id
    }

    fn spec_key(spec: &LineItemSpec) -> i32 {
        spec.product_unit_id
    }

    fn apply_spec(&mut self, spec: &LineItemSpec) {
        self.quantity = spec.quantity;
        self.total_price = spec.total_price.clone();
        self.description = spec.description.clone();
    }

    fn new_from_spec(order_id: i32, spec: &LineItemSpec) -> NewOrderLineItem {
        NewOrderLineItem {
            order_id,
            product_unit_id: spec.product_unit_id,
            quantity: spec.quantity,
            total_price: spec.total_price.clone(),
            description: spec.description.clone(),
        }
    }
}

/// Shopping cart turned into an order. The four arrays are index-aligned:
/// entry `i` of each describes one line item.
///
/// The same shape is used to update an existing order, in which case the
/// arrays describe the complete desired set of line items.
#[derive(Debug, Clone, Deserialize)]
pub struct CartRequest {
    pub branch_id: i32,
    #[serde(default)]
    pub company_id: Option<i32>,
    pub order_type: i32,
    #[serde(default)]
    pub order_number: Option<String>,
    pub discount: BigDecimal,
    pub total_amount: BigDecimal,
    pub product_unit_ids: Option<Vec<i32>>,
    pub quantities: Option<Vec<i32>>,
    /// Unit prices.
    pub prices: Option<Vec<BigDecimal>>,
    #[serde(default)]
    pub descriptions: Option<Vec<Option<String>>>,
}

pub type UpdateOrderRequest = CartRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineItemView {
    pub id: i32,
    pub product_unit_id: i32,
    pub quantity: i32,
    pub total_price: BigDecimal,
    pub description: Option<String>,
}

impl From<OrderLineItem> for OrderLineItemView {
    fn from(item: OrderLineItem) -> Self {
        OrderLineItemView {
            id: item.id,
            product_unit_id: item.product_unit_id,
            quantity: item.quantity,
            total_price: item.total_price,
            description: item.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: i32,
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
    pub line_items: Vec<OrderLineItemView>,
}

impl OrderView {
    pub fn new(order: Order, mut line_items: Vec<OrderLineItem>) -> Self {
        line_items.sort_by_key(|l| l.id);
        OrderView {
            id: order.id,
            total_amount: order.total_amount,
            total_amount_after_discount: order.total_amount_after_discount,
            discount: order.discount,
            created_at: order.created_at,
            order_number: order.order_number,
            order_type: order.order_type,
            branch_id: order.branch_id,
            company_id: order.company_id,
            user_id: order.user_id,
            line_items: line_items.into_iter().map(Into::into).collect(),
        }
    }
}
