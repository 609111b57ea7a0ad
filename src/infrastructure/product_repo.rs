use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, ProductUnitPriceRepository, Repository};
use crate::domain::product::{NewProduct, NewProductUnitPrice, Product, ProductUnitPrice};
use crate::schema::{product_unit_prices, products};

use super::models::{NewProductRow, NewProductUnitPriceRow, ProductRow, ProductUnitPriceRow};

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Repository<Product> for DieselProductRepository {
    fn get_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<ProductRow> = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn get_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<ProductRow> = products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn add(&self, new: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow::from(new))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = ProductRow::from(product);
        let updated: ProductRow = diesel::update(products::table.find(product.id))
            .set(&row)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(updated.into())
    }

    fn delete(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<ProductRow> = diesel::delete(products::table.find(id))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }
}

impl ProductRepository for DieselProductRepository {}

pub struct DieselProductUnitPriceRepository {
    pool: DbPool,
}

impl DieselProductUnitPriceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Repository<ProductUnitPrice> for DieselProductUnitPriceRepository {
    fn get_by_id(&self, id: i32) -> Result<Option<ProductUnitPrice>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<ProductUnitPriceRow> = product_unit_prices::table
            .find(id)
            .select(ProductUnitPriceRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn get_all(&self) -> Result<Vec<ProductUnitPrice>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<ProductUnitPriceRow> = product_unit_prices::table
            .select(ProductUnitPriceRow::as_select())
            .order(product_unit_prices::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn add(&self, new: NewProductUnitPrice) -> Result<ProductUnitPrice, DomainError> {
        let mut conn = self.pool.get()?;

        let row: ProductUnitPriceRow = diesel::insert_into(product_unit_prices::table)
            .values(&NewProductUnitPriceRow::from(new))
            .returning(ProductUnitPriceRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, price: &ProductUnitPrice) -> Result<ProductUnitPrice, DomainError> {
        let mut conn = self.pool.get()?;

        let row = ProductUnitPriceRow::from(price);
        let updated: ProductUnitPriceRow =
            diesel::update(product_unit_prices::table.find(price.id))
                .set(&row)
                .returning(ProductUnitPriceRow::as_returning())
                .get_result(&mut conn)?;
        Ok(updated.into())
    }

    fn delete(&self, id: i32) -> Result<Option<ProductUnitPrice>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<ProductUnitPriceRow> =
            diesel::delete(product_unit_prices::table.find(id))
                .returning(ProductUnitPriceRow::as_returning())
                .get_result(&mut conn)
                .optional()?;
        Ok(row.map(Into::into))
    }
}

impl ProductUnitPriceRepository for DieselProductUnitPriceRepository {
    fn unit_prices_by_product_id(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductUnitPrice>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<ProductUnitPriceRow> = product_unit_prices::table
            .filter(product_unit_prices::product_id.eq(product_id))
            .select(ProductUnitPriceRow::as_select())
            .order(product_unit_prices::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
