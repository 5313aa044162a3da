//! Membership Plan Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog plan (immutable from the gate's perspective)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_months: u32,
}
