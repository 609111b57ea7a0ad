use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, NewOrderLineItem, Order, OrderLineItem};
use crate::domain::ports::{OrderLineItemRepository, OrderRepository, Repository};
use crate::schema::{order_line_items, orders};

use super::models::{NewOrderLineItemRow, NewOrderRow, OrderLineItemRow, OrderRow};

// ── Orders ────────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Repository<Order> for DieselOrderRepository {
    fn get_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .select(OrderRow::as_select())
            .order(orders::id.asc())
            .load::<OrderRow>(&mut conn)?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    fn add(&self, new: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let row: OrderRow = diesel::insert_into(orders::table)
            .values(&NewOrderRow::from(new))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)?;
        Order::try_from(row)
    }

    fn update(&self, order: &Order) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let row = OrderRow::from(order);
        let updated: OrderRow = diesel::update(orders::table.find(order.id))
            .set(&row)
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)?;
        Order::try_from(updated)
    }

    fn delete(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(orders::table.find(id))
            .returning(OrderRow::as_returning())
            .get_result::<OrderRow>(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }
}

impl OrderRepository for DieselOrderRepository {}

// ── Line items ────────────────────────────────────────────────────────────────

pub struct DieselOrderLineItemRepository {
    pool: DbPool,
}

impl DieselOrderLineItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Repository<OrderLineItem> for DieselOrderLineItemRepository {
    fn get_by_id(&self, id: i32) -> Result<Option<OrderLineItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<OrderLineItemRow> = order_line_items::table
            .find(id)
            .select(OrderLineItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn get_all(&self) -> Result<Vec<OrderLineItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<OrderLineItemRow> = order_line_items::table
            .select(OrderLineItemRow::as_select())
            .order(order_line_items::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn add(&self, new: NewOrderLineItem) -> Result<OrderLineItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row: OrderLineItemRow = diesel::insert_into(order_line_items::table)
            .values(&NewOrderLineItemRow::from(new))
            .returning(OrderLineItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, item: &OrderLineItem) -> Result<OrderLineItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = OrderLineItemRow::from(item);
        let updated: OrderLineItemRow = diesel::update(order_line_items::table.find(item.id))
            .set(&row)
            .returning(OrderLineItemRow::as_returning())
            .get_result(&mut conn)?;
        Ok(updated.into())
    }

    fn delete(&self, id: i32) -> Result<Option<OrderLineItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<OrderLineItemRow> = diesel::delete(order_line_items::table.find(id))
            .returning(OrderLineItemRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }
}

impl OrderLineItemRepository for DieselOrderLineItemRepository {
    fn line_items_by_order_id(&self, order_id: i32) -> Result<Vec<OrderLineItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<OrderLineItemRow> = order_line_items::table
            .filter(order_line_items::order_id.eq(order_id))
            .select(OrderLineItemRow::as_select())
            .order(order_line_items::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
