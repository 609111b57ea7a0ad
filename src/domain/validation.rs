//! Cross-field checks that run before any store call.

use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;
use super::order::{CartRequest, LineItemSpec, OrderType, OrderLineItem};
use super::product::{ProductRequest, ProductUnitPrice, UnitPriceSpec};
use super::reconcile::ensure_unique_keys;

/// Orders must total strictly more than this.
pub const MIN_ORDER_TOTAL: i32 = 50;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_ORDER_NUMBER_LEN: usize = 50;
pub const PRODUCT_NAME_LEN: std::ops::RangeInclusive<usize> = 3..=100;
/// Fractional digits the money columns hold.
pub const MONEY_SCALE: i64 = 2;

/// Root fields of an order after validation; the owner comes from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFields {
    pub total_amount: BigDecimal,
    pub total_amount_after_discount: BigDecimal,
    pub discount: BigDecimal,
    pub order_number: Option<String>,
    pub order_type: OrderType,
    pub branch_id: i32,
    pub company_id: Option<i32>,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub fields: OrderFields,
    pub line_items: Vec<LineItemSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub department_id: i32,
    pub price: BigDecimal,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ValidatedProduct {
    pub fields: ProductFields,
    pub unit_prices: Vec<UnitPriceSpec>,
}

fn invalid(msg: String) -> DomainError {
    DomainError::Validation(msg)
}

pub fn require_positive_id(field: &str, value: i32) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(invalid(format!("{} must be positive, got {}", field, value)));
    }
    Ok(())
}

/// Rejects amounts the store would have to round.
pub fn require_money_scale(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    if value.with_scale(MONEY_SCALE) != *value {
        return Err(invalid(format!(
            "{} has more than {} decimal places, got {}",
            field, MONEY_SCALE, value
        )));
    }
    Ok(())
}

pub fn require_positive_amount(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    if *value <= BigDecimal::zero() {
        return Err(invalid(format!("{} must be greater than zero, got {}", field, value)));
    }
    require_money_scale(field, value)
}

/// A required parallel array; `None` means the caller left it out.
pub fn require_array<'a, T>(
    field: &str,
    values: Option<&'a Vec<T>>,
) -> Result<&'a [T], DomainError> {
    values
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(format!("{} is required", field)))
}

/// Checks that every named array has the same length and returns it.
pub fn require_aligned(arrays: &[(&str, usize)]) -> Result<usize, DomainError> {
    let Some(&(first_name, len)) = arrays.first() else {
        return Ok(0);
    };
    for &(name, other) in &arrays[1..] {
        if other != len {
            return Err(invalid(format!(
                "{} has {} entries but {} has {}",
                name, other, first_name, len
            )));
        }
    }
    Ok(len)
}

fn require_non_empty(field: &str, len: usize) -> Result<(), DomainError> {
    if len == 0 {
        return Err(invalid(format!("{} must contain at least one entry", field)));
    }
    Ok(())
}

fn check_order_root(caller: &str, request: &CartRequest) -> Result<OrderFields, DomainError> {
    if caller.trim().is_empty() {
        return Err(invalid("user id must not be empty".to_string()));
    }
    let order_type = OrderType::try_from(request.order_type)?;
    require_positive_id("branch_id", request.branch_id)?;
    if let Some(company_id) = request.company_id {
        require_positive_id("company_id", company_id)?;
    }
    if let Some(number) = &request.order_number {
        if number.chars().count() > MAX_ORDER_NUMBER_LEN {
            return Err(invalid(format!(
                "order_number exceeds {} characters",
                MAX_ORDER_NUMBER_LEN
            )));
        }
    }

    require_money_scale("total_amount", &request.total_amount)?;
    require_money_scale("discount", &request.discount)?;

    let minimum = BigDecimal::from(MIN_ORDER_TOTAL);
    if request.total_amount <= minimum {
        return Err(invalid(format!(
            "total_amount must be greater than {}, got {}",
            MIN_ORDER_TOTAL, request.total_amount
        )));
    }
    if request.discount < BigDecimal::zero() {
        return Err(invalid(format!(
            "discount must not be negative, got {}",
            request.discount
        )));
    }
    if request.discount > request.total_amount {
        return Err(invalid(format!(
            "discount {} exceeds total_amount {}",
            request.discount, request.total_amount
        )));
    }

    Ok(OrderFields {
        total_amount_after_discount: &request.total_amount - &request.discount,
        total_amount: request.total_amount.clone(),
        discount: request.discount.clone(),
        order_number: request.order_number.clone(),
        order_type,
        branch_id: request.branch_id,
        company_id: request.company_id,
        user_id: caller.to_string(),
    })
}

fn check_line_items(request: &CartRequest) -> Result<Vec<LineItemSpec>, DomainError> {
    let unit_ids = require_array("product_unit_ids", request.product_unit_ids.as_ref())?;
    let quantities = require_array("quantities", request.quantities.as_ref())?;
    let prices = require_array("prices", request.prices.as_ref())?;

    let mut arrays = vec![
        ("product_unit_ids", unit_ids.len()),
        ("quantities", quantities.len()),
        ("prices", prices.len()),
    ];
    if let Some(descriptions) = &request.descriptions {
        arrays.push(("descriptions", descriptions.len()));
    }
    let len = require_aligned(&arrays)?;
    require_non_empty("product_unit_ids", len)?;

    let mut specs = Vec::with_capacity(len);
    for i in 0..len {
        require_positive_id(&format!("product_unit_ids[{}]", i), unit_ids[i])?;
        require_positive_id(&format!("quantities[{}]", i), quantities[i])?;
        require_positive_amount(&format!("prices[{}]", i), &prices[i])?;

        let description = request
            .descriptions
            .as_ref()
            .and_then(|d| d[i].clone())
            .filter(|d| !d.trim().is_empty());
        if let Some(text) = &description {
            if text.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(invalid(format!(
                    "descriptions[{}] exceeds {} characters",
                    i, MAX_DESCRIPTION_LEN
                )));
            }
        }

        specs.push(LineItemSpec {
            product_unit_id: unit_ids[i],
            quantity: quantities[i],
            total_price: BigDecimal::from(quantities[i]) * &prices[i],
            description,
        });
    }

    ensure_unique_keys::<OrderLineItem>(&specs)?;
    Ok(specs)
}

/// Sum of `quantity * unit price` over every line.
pub fn cart_total(line_items: &[LineItemSpec]) -> BigDecimal {
    line_items
        .iter()
        .fold(BigDecimal::zero(), |acc, line| acc + &line.total_price)
}

/// Validates a cart or order update. The caller-supplied `total_amount` must
/// equal the computed cart total exactly.
pub fn validate_order(caller: &str, request: &CartRequest) -> Result<ValidatedOrder, DomainError> {
    let fields = check_order_root(caller, request)?;
    let line_items = check_line_items(request)?;

    let computed = cart_total(&line_items);
    if computed != fields.total_amount {
        return Err(invalid(format!(
            "total_amount {} does not match line items total {}",
            fields.total_amount, computed
        )));
    }

    Ok(ValidatedOrder { fields, line_items })
}

pub fn validate_product(request: &ProductRequest) -> Result<ValidatedProduct, DomainError> {
    let name_len = request.name.trim().chars().count();
    if !PRODUCT_NAME_LEN.contains(&name_len) {
        return Err(invalid(format!(
            "name must be between {} and {} characters, got {}",
            PRODUCT_NAME_LEN.start(),
            PRODUCT_NAME_LEN.end(),
            name_len
        )));
    }
    require_positive_id("department_id", request.department_id)?;
    require_positive_amount("price", &request.price)?;

    let unit_ids = require_array("unit_ids", request.unit_ids.as_ref())?;
    let special_prices = require_array("special_prices", request.special_prices.as_ref())?;
    let len = require_aligned(&[
        ("unit_ids", unit_ids.len()),
        ("special_prices", special_prices.len()),
    ])?;
    require_non_empty("unit_ids", len)?;

    let mut specs = Vec::with_capacity(len);
    for (i, (&unit_id, special_price)) in unit_ids.iter().zip(special_prices).enumerate() {
        require_positive_id(&format!("unit_ids[{}]", i), unit_id)?;
        require_positive_amount(&format!("special_prices[{}]", i), special_price)?;
        specs.push(UnitPriceSpec {
            unit_id,
            special_price: special_price.clone(),
        });
    }
    ensure_unique_keys::<ProductUnitPrice>(&specs)?;

    Ok(ValidatedProduct {
        fields: ProductFields {
            name: request.name.trim().to_string(),
            department_id: request.department_id,
            price: request.price.clone(),
            active: request.active.unwrap_or(true),
        },
        unit_prices: specs,
    })
}
