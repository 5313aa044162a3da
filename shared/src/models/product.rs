//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product sold against the member balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sale_price: Decimal,
}
