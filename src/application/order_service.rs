use chrono::Utc;

use super::{delete_children, log_rejection, roll_back_creation, Written};
use crate::domain::context::OperationContext;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    CartRequest, NewOrder, Order, OrderLineItem, OrderView, UpdateOrderRequest,
};
use crate::domain::ports::{OrderLineItemRepository, OrderRepository};
use crate::domain::reconcile::{apply, create_all, reconcile};
use crate::domain::validation::validate_order;

/// Writes orders together with their line items.
///
/// Line items are stored one row per call; the store offers no transaction
/// across the order and its items. A failed creation is compensated by
/// deleting what was written. A failed update is reported but the order row
/// keeps its new values.
pub struct OrderService<O, L> {
    orders: O,
    line_items: L,
}

fn not_found(id: i32) -> DomainError {
    DomainError::NotFound(format!("order {} does not exist", id))
}

impl<O: OrderRepository, L: OrderLineItemRepository> OrderService<O, L> {
    pub fn new(orders: O, line_items: L) -> Self {
        Self { orders, line_items }
    }

    pub fn create_from_cart(
        &self,
        ctx: &OperationContext<'_>,
        cart: &CartRequest,
    ) -> Result<Written<OrderView>, DomainError> {
        let validated = validate_order(ctx.caller(), cart)
            .inspect_err(|e| log_rejection(ctx, "cart checkout", e))?;
        let fields = validated.fields;

        let order = self.orders.add(NewOrder {
            total_amount: fields.total_amount,
            total_amount_after_discount: fields.total_amount_after_discount,
            discount: fields.discount,
            created_at: Utc::now(),
            order_number: fields.order_number,
            order_type: fields.order_type,
            branch_id: fields.branch_id,
            company_id: fields.company_id,
            user_id: fields.user_id,
        })?;

        let report =
            create_all::<OrderLineItem, _>(&self.line_items, order.id, &validated.line_items);
        if let Some(summary) = report.failure_summary() {
            return Err(roll_back_creation(
                ctx,
                &self.orders,
                &self.line_items,
                &order,
                &report.created,
                summary,
            ));
        }

        ctx.info(format_args!(
            "created order {} with {} line items, total {}",
            order.id,
            report.created.len(),
            order.total_amount
        ));
        let message = format!("Order {} created", order.id);
        Ok(Written::new(OrderView::new(order, report.created), message))
    }

    /// Replaces the order's scalar fields and reconciles its line items
    /// against the desired set in `request`. The owner and creation time of
    /// the order are kept.
    pub fn update_order(
        &self,
        ctx: &OperationContext<'_>,
        id: i32,
        request: &UpdateOrderRequest,
    ) -> Result<Written<OrderView>, DomainError> {
        let validated = validate_order(ctx.caller(), request)
            .inspect_err(|e| log_rejection(ctx, "order update", e))?;

        let Some(mut order) = self.orders.get_by_id(id)? else {
            let err = not_found(id);
            log_rejection(ctx, "order update", &err);
            return Err(err);
        };

        let fields = validated.fields;
        order.total_amount = fields.total_amount;
        order.total_amount_after_discount = fields.total_amount_after_discount;
        order.discount = fields.discount;
        order.order_number = fields.order_number;
        order.order_type = fields.order_type;
        order.branch_id = fields.branch_id;
        order.company_id = fields.company_id;
        let order = self.orders.update(&order)?;

        let existing = self.line_items.line_items_by_order_id(order.id)?;
        let plan = reconcile(order.id, existing, &validated.line_items)?;
        let (creates, updates, deletes) =
            (plan.to_create.len(), plan.to_update.len(), plan.to_delete.len());
        let report = apply(&self.line_items, plan);

        if let Some(summary) = report.failure_summary() {
            ctx.warn(format_args!(
                "order {} updated but line items diverged: {}",
                order.id, summary
            ));
            return Err(DomainError::Internal(summary));
        }

        ctx.info(format_args!(
            "updated order {}: {} line items created, {} updated, {} deleted",
            order.id, creates, updates, deletes
        ));
        let mut line_items = report.created;
        line_items.extend(report.updated);
        let message = format!("Order {} updated", order.id);
        Ok(Written::new(OrderView::new(order, line_items), message))
    }

    pub fn get_order(&self, id: i32) -> Result<OrderView, DomainError> {
        let order = self.orders.get_by_id(id)?.ok_or_else(|| not_found(id))?;
        let line_items = self.line_items.line_items_by_order_id(order.id)?;
        Ok(OrderView::new(order, line_items))
    }

    /// Order roots without their line items, by ascending id.
    pub fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        let mut orders = self.orders.get_all()?;
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    /// Removes the line items one by one, then the order. If any line item
    /// cannot be removed the order is left in place.
    pub fn delete_order(
        &self,
        ctx: &OperationContext<'_>,
        id: i32,
    ) -> Result<Written<Order>, DomainError> {
        if self.orders.get_by_id(id)?.is_none() {
            let err = not_found(id);
            log_rejection(ctx, "order delete", &err);
            return Err(err);
        }

        let line_items = self.line_items.line_items_by_order_id(id)?;
        let total = line_items.len();
        if let Err(summary) = delete_children(&self.line_items, &line_items) {
            ctx.warn(format_args!("order {} not deleted: {}", id, summary));
            return Err(DomainError::Internal(summary));
        }

        let order = self.orders.delete(id)?.ok_or_else(|| not_found(id))?;
        ctx.info(format_args!("deleted order {} and {} line items", id, total));
        Ok(Written::new(order, format!("Order {} deleted", id)))
    }
}
