//! Payment Log Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the payment bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCategory {
    Membership,
    Product,
}

/// Immutable payment record (append-only)
///
/// Category-specific reference fields: plan_* for membership payments,
/// product_* for product payments; the other pair stays None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLogEntry {
    pub member_id: String,
    pub name: String,
    pub category: PaymentCategory,
    pub amount: Decimal,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}
