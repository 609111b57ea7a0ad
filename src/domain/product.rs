use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::ports::Record;
use super::reconcile::ChildRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
}

impl Record for Product {
    type New = NewProduct;

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductUnitPrice {
    pub id: i32,
    pub product_id: i32,
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewProductUnitPrice {
    pub product_id: i32,
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

impl Record for ProductUnitPrice {
    type New = NewProductUnitPrice;

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitPriceSpec {
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

impl ChildRecord for ProductUnitPrice {
    type Key = i32;
    type Spec = UnitPriceSpec;

    const LABEL: &'static str = "unit price";

    fn natural_key(&self) -> i32 {
        self.unit_id
    }

    fn spec_key(spec: &UnitPriceSpec) -> i32 {
        spec.unit_id
    }

    fn apply_spec(&mut self, spec: &UnitPriceSpec) {
        self.special_price = spec.special_price.clone();
    }

    fn new_from_spec(product_id: i32, spec: &UnitPriceSpec) -> NewProductUnitPrice {
        NewProductUnitPrice {
            product_id,
            unit_id: spec.unit_id,
            special_price: spec.special_price.clone(),
        }
    }
}

/// Product payload with its index-aligned unit price arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    #[serde(default)]
    pub active: Option<bool>,
    pub unit_ids: Option<Vec<i32>>,
    pub special_prices: Option<Vec<BigDecimal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitPriceView {
    pub id: i32,
    pub unit_id: i32,
    pub special_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
    pub unit_prices: Vec<UnitPriceView>,
}

impl ProductView {
    /// Root fields only.
    pub fn root(product: Product) -> Self {
        Self::new(product, Vec::new())
    }

    pub fn new(product: Product, mut unit_prices: Vec<ProductUnitPrice>) -> Self {
        unit_prices.sort_by_key(|p| p.id);
        ProductView {
            id: product.id,
            name: product.name,
            department_id: product.department_id,
            price: product.price,
            active: product.active,
            unit_prices: unit_prices
                .into_iter()
                .map(|p| UnitPriceView {
                    id: p.id,
                    unit_id: p.unit_id,
                    special_price: p.special_price,
                })
                .collect(),
        }
    }
}
