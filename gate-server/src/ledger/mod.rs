//! Balance Ledger
//!
//! Both payment entry points follow the same shape:
//! check-then-debit-then-log-then-aggregate. The sufficiency check and
//! the debit run under the same per-member lock the presence toggle uses,
//! so two concurrent purchases cannot both pass the check; the monthly
//! revenue roll-up has its own lock because two *different* members
//! paying concurrently race on the same aggregate key.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::state::{IntegrityCounters, MemberLocks};
use crate::db::repository::{
    DashboardRepository, MemberRepository, MembershipRepository, PaymentLogRepository,
    PlanRepository, ProductRepository,
};
use crate::db::store::RecordStore;
use crate::gate::resolver::DUPLICATE_ACTIVE_MEMBERSHIPS;
use crate::utils::validation::validate_token;
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    Member, Membership, MembershipCreate, MembershipStatus, PaymentCategory, PaymentLogEntry,
};

/// Fixed days-per-month approximation used for renewal end dates
const DAYS_PER_MONTH: i64 = 30;

/// Result of a successful payment
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub message: String,
    pub new_balance: Decimal,
}

#[derive(Clone)]
pub struct LedgerService {
    members: MemberRepository,
    memberships: MembershipRepository,
    plans: PlanRepository,
    products: ProductRepository,
    payments: PaymentLogRepository,
    dashboard: DashboardRepository,
    locks: Arc<MemberLocks>,
    integrity: Arc<IntegrityCounters>,
    revenue_lock: Arc<tokio::sync::Mutex<()>>,
    tz: Tz,
}

impl LedgerService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        locks: Arc<MemberLocks>,
        integrity: Arc<IntegrityCounters>,
        tz: Tz,
    ) -> Self {
        Self {
            members: MemberRepository::new(store.clone()),
            memberships: MembershipRepository::new(store.clone()),
            plans: PlanRepository::new(store.clone()),
            products: ProductRepository::new(store.clone()),
            payments: PaymentLogRepository::new(store.clone()),
            dashboard: DashboardRepository::new(store),
            locks,
            integrity,
            revenue_lock: Arc::new(tokio::sync::Mutex::new(())),
            tz,
        }
    }

    /// Pay for a membership plan from the member's balance.
    ///
    /// An existing active membership is extended in place from the later
    /// of today and its current end date; otherwise a fresh membership
    /// starts today.
    pub async fn pay_membership(&self, token: &str, plan_id: &str) -> AppResult<PaymentReceipt> {
        let member = self.resolve_member(token).await?;
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        let lock = self.locks.acquire(&member.id);
        let _guard = lock.lock().await;

        // Re-read inside the lock: the balance may have moved while we
        // waited on a concurrent debit.
        let member = self.fetch_member(&member.id).await?;
        let new_balance = self.debit(&member, plan.price).await?;

        let today = time::local_today(self.tz);
        let current = self.current_membership(&member.id).await?;
        let end_date = renewal_end_date(
            today,
            current.as_ref().map(|m| m.end_date),
            plan.duration_months,
        );
        let data = MembershipCreate {
            member_id: member.id.clone(),
            plan_id: plan.id.clone(),
            status: MembershipStatus::Active,
            start_date: today,
            end_date,
            auto_renew: true,
            price_paid: plan.price,
        };
        match &current {
            Some(existing) => self
                .memberships
                .renew(&existing.id, &data)
                .await
                .map_err(AppError::from)?,
            None => {
                self.memberships
                    .create(&data)
                    .await
                    .map_err(AppError::from)?;
            }
        }
        drop(_guard);

        self.payments
            .append(&PaymentLogEntry {
                member_id: member.id.clone(),
                name: member.name.clone(),
                category: PaymentCategory::Membership,
                amount: plan.price,
                timestamp: shared::util::now_millis(),
                plan_id: Some(plan.id.clone()),
                plan_name: Some(plan.name.clone()),
                product_id: None,
                product_name: None,
            })
            .await
            .map_err(AppError::from)?;
        self.roll_revenue(plan.price, today).await?;

        tracing::info!(
            member_id = %member.id,
            plan = %plan.name,
            end_date = %end_date,
            "membership payment recorded"
        );

        Ok(PaymentReceipt {
            message: "Membership payment recorded".to_string(),
            new_balance,
        })
    }

    /// Pay for a product from the member's balance.
    pub async fn pay_product(&self, token: &str, product_id: &str) -> AppResult<PaymentReceipt> {
        let member = self.resolve_member(token).await?;
        let product = self
            .products
            .find_by_id(product_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let new_balance = {
            let lock = self.locks.acquire(&member.id);
            let _guard = lock.lock().await;
            let member = self.fetch_member(&member.id).await?;
            self.debit(&member, product.sale_price).await?
        };

        let today = time::local_today(self.tz);
        self.payments
            .append(&PaymentLogEntry {
                member_id: member.id.clone(),
                name: member.name.clone(),
                category: PaymentCategory::Product,
                amount: product.sale_price,
                timestamp: shared::util::now_millis(),
                plan_id: None,
                plan_name: None,
                product_id: Some(product.id.clone()),
                product_name: Some(product.name.clone()),
            })
            .await
            .map_err(AppError::from)?;
        self.roll_revenue(product.sale_price, today).await?;

        Ok(PaymentReceipt {
            message: "Product payment recorded".to_string(),
            new_balance,
        })
    }

    async fn resolve_member(&self, token: &str) -> AppResult<Member> {
        let token = validate_token(token)?;
        self.members
            .find_by_token(token)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    async fn fetch_member(&self, id: &str) -> AppResult<Member> {
        self.members
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    /// Check sufficiency and debit. Caller holds the member lock.
    async fn debit(&self, member: &Member, price: Decimal) -> AppResult<Decimal> {
        if member.balance < price {
            return Err(AppError::BusinessRule("Insufficient balance".to_string()));
        }
        let new_balance = member.balance - price;
        self.members
            .set_balance(&member.id, new_balance)
            .await
            .map_err(AppError::from)?;
        Ok(new_balance)
    }

    async fn current_membership(&self, member_id: &str) -> AppResult<Option<Membership>> {
        let candidates = self
            .memberships
            .find_active(member_id)
            .await
            .map_err(AppError::from)?;
        let (current, discarded) = Membership::pick_current(candidates);
        if discarded > 0 {
            self.integrity.increment(DUPLICATE_ACTIVE_MEMBERSHIPS);
            tracing::warn!(
                target: "integrity",
                member_id = %member_id,
                discarded,
                "member has multiple active memberships, renewing the one with the latest end date"
            );
        }
        Ok(current)
    }

    /// Roll the amount into the current month's revenue. The dedicated
    /// lock serializes the read-modify-write across members.
    async fn roll_revenue(&self, amount: Decimal, today: NaiveDate) -> AppResult<()> {
        let _guard = self.revenue_lock.lock().await;
        self.dashboard
            .add_revenue(&time::month_key(today), amount)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

/// Renewal end date under the fixed 30-day-per-month approximation:
/// extends from the later of today and the current end date.
pub fn renewal_end_date(
    today: NaiveDate,
    current_end: Option<NaiveDate>,
    duration_months: u32,
) -> NaiveDate {
    let base = match current_end {
        Some(end) if end > today => end,
        _ => today,
    };
    base + Duration::days(DAYS_PER_MONTH * i64::from(duration_months))
}
