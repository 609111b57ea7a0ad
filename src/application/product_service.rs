use super::{delete_children, log_rejection, roll_back_creation, Written};
use crate::domain::context::OperationContext;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, ProductUnitPriceRepository};
use crate::domain::product::{NewProduct, Product, ProductRequest, ProductUnitPrice, ProductView};
use crate::domain::reconcile::{apply, create_all, reconcile};
use crate::domain::validation::validate_product;

/// Writes products together with their per-unit special prices.
pub struct ProductService<P, U> {
    products: P,
    unit_prices: U,
}

fn not_found(id: i32) -> DomainError {
    DomainError::NotFound(format!("product {} does not exist", id))
}

impl<P: ProductRepository, U: ProductUnitPriceRepository> ProductService<P, U> {
    pub fn new(products: P, unit_prices: U) -> Self {
        Self {
            products,
            unit_prices,
        }
    }

    /// Returns the product's own fields; read it back with
    /// [`get_product`](Self::get_product) to see the unit prices.
    pub fn create_product(
        &self,
        ctx: &OperationContext<'_>,
        request: &ProductRequest,
    ) -> Result<Written<ProductView>, DomainError> {
        let validated =
            validate_product(request).inspect_err(|e| log_rejection(ctx, "product create", e))?;
        let fields = validated.fields;

        let product = self.products.add(NewProduct {
            name: fields.name,
            department_id: fields.department_id,
            price: fields.price,
            active: fields.active,
        })?;

        let report = create_all::<ProductUnitPrice, _>(
            &self.unit_prices,
            product.id,
            &validated.unit_prices,
        );
        if let Some(summary) = report.failure_summary() {
            return Err(roll_back_creation(
                ctx,
                &self.products,
                &self.unit_prices,
                &product,
                &report.created,
                summary,
            ));
        }

        ctx.info(format_args!(
            "created product {} '{}' with {} unit prices",
            product.id,
            product.name,
            report.created.len()
        ));
        let message = format!("Product {} created", product.id);
        Ok(Written::new(ProductView::root(product), message))
    }

    pub fn update_product(
        &self,
        ctx: &OperationContext<'_>,
        id: i32,
        request: &ProductRequest,
    ) -> Result<Written<ProductView>, DomainError> {
        let validated =
            validate_product(request).inspect_err(|e| log_rejection(ctx, "product update", e))?;

        let Some(mut product) = self.products.get_by_id(id)? else {
            let err = not_found(id);
            log_rejection(ctx, "product update", &err);
            return Err(err);
        };

        let fields = validated.fields;
        product.name = fields.name;
        product.department_id = fields.department_id;
        product.price = fields.price;
        product.active = fields.active;
        let product = self.products.update(&product)?;

        let existing = self.unit_prices.unit_prices_by_product_id(product.id)?;
        let plan = reconcile(product.id, existing, &validated.unit_prices)?;
        let (creates, updates, deletes) =
            (plan.to_create.len(), plan.to_update.len(), plan.to_delete.len());
        let report = apply(&self.unit_prices, plan);

        if let Some(summary) = report.failure_summary() {
            ctx.warn(format_args!(
                "product {} updated but unit prices diverged: {}",
                product.id, summary
            ));
            return Err(DomainError::Internal(summary));
        }

        ctx.info(format_args!(
            "updated product {}: {} unit prices created, {} updated, {} deleted",
            product.id, creates, updates, deletes
        ));
        let mut unit_prices = report.created;
        unit_prices.extend(report.updated);
        let message = format!("Product {} updated", product.id);
        Ok(Written::new(ProductView::new(product, unit_prices), message))
    }

    pub fn get_product(&self, id: i32) -> Result<ProductView, DomainError> {
        let product = self.products.get_by_id(id)?.ok_or_else(|| not_found(id))?;
        let unit_prices = self.unit_prices.unit_prices_by_product_id(product.id)?;
        Ok(ProductView::new(product, unit_prices))
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.get_all()?;
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    pub fn delete_product(
        &self,
        ctx: &OperationContext<'_>,
        id: i32,
    ) -> Result<Written<Product>, DomainError> {
        if self.products.get_by_id(id)?.is_none() {
            let err = not_found(id);
            log_rejection(ctx, "product delete", &err);
            return Err(err);
        }

        let unit_prices = self.unit_prices.unit_prices_by_product_id(id)?;
        let total = unit_prices.len();
        if let Err(summary) = delete_children(&self.unit_prices, &unit_prices) {
            ctx.warn(format_args!("product {} not deleted: {}", id, summary));
            return Err(DomainError::Internal(summary));
        }

        let product = self.products.delete(id)?.ok_or_else(|| not_found(id))?;
        ctx.info(format_args!("deleted product {} and {} unit prices", id, total));
        Ok(Written::new(product, format!("Product {} deleted", id)))
    }
}
