use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde_json::json;

use super::*;
use crate::core::state::{IntegrityCounters, MemberLocks};
use crate::db::collections;
use crate::db::store::{MemoryStore, RecordStore};

fn tz() -> chrono_tz::Tz {
    chrono_tz::America::La_Paz
}

fn today() -> NaiveDate {
    time::local_today(tz())
}

fn service() -> (Arc<MemoryStore>, LedgerService) {
    let store = Arc::new(MemoryStore::new());
    let ledger = LedgerService::new(
        store.clone(),
        Arc::new(MemberLocks::new()),
        Arc::new(IntegrityCounters::new()),
        tz(),
    );
    (store, ledger)
}

async fn seed_member(store: &MemoryStore, id: &str, token: &str, balance: &str) {
    store
        .set(
            collections::MEMBERS,
            id,
            json!({
                "name": "Ana Flores",
                "email": "ana@example.com",
                "balance": balance,
                "status": "active",
                "nfc_token": token,
            }),
            false,
        )
        .await
        .unwrap();
}

async fn seed_plan(store: &MemoryStore, id: &str, price: &str, months: u32) {
    store
        .set(
            collections::PLANS,
            id,
            json!({"name": "Monthly", "price": price, "duration_months": months}),
            false,
        )
        .await
        .unwrap();
}

async fn seed_product(store: &MemoryStore, id: &str, price: &str) {
    store
        .set(
            collections::PRODUCTS,
            id,
            json!({"name": "Protein Bar", "sale_price": price}),
            false,
        )
        .await
        .unwrap();
}

async fn seed_membership(store: &MemoryStore, id: &str, member_id: &str, end: NaiveDate) {
    store
        .set(
            collections::MEMBERSHIPS,
            id,
            json!({
                "member_id": member_id,
                "plan_id": "plan1",
                "status": "active",
                "start_date": (end - Duration::days(30)).to_string(),
                "end_date": end.to_string(),
                "auto_renew": true,
                "price_paid": "25.00",
            }),
            false,
        )
        .await
        .unwrap();
}

async fn member_balance(store: &MemoryStore, id: &str) -> Decimal {
    let record = store
        .get(collections::MEMBERS, id)
        .await
        .unwrap()
        .unwrap();
    serde_json::from_value(record.fields["balance"].clone()).unwrap()
}

async fn active_memberships(store: &Arc<MemoryStore>, member_id: &str) -> Vec<Membership> {
    crate::db::repository::MembershipRepository::new(store.clone() as Arc<dyn RecordStore>)
        .find_active(member_id)
        .await
        .unwrap()
}

async fn monthly_revenue(store: &Arc<MemoryStore>) -> Decimal {
    let dashboard = crate::db::repository::DashboardRepository::new(
        store.clone() as Arc<dyn RecordStore>,
    )
    .load()
    .await
    .unwrap();
    dashboard
        .monthly_revenue
        .get(&time::month_key(today()))
        .copied()
        .unwrap_or_default()
}

// ── renewal_end_date ────────────────────────────────────────────────

#[test]
fn renewal_from_future_end_date_extends() {
    // active until 2024-06-10, buying a 1-month plan on 2024-05-01
    let end = renewal_end_date(
        "2024-05-01".parse().unwrap(),
        Some("2024-06-10".parse().unwrap()),
        1,
    );
    assert_eq!(end, "2024-07-10".parse::<NaiveDate>().unwrap());
}

#[test]
fn renewal_after_expiry_starts_today() {
    let end = renewal_end_date(
        "2024-05-01".parse().unwrap(),
        Some("2024-04-01".parse().unwrap()),
        1,
    );
    assert_eq!(end, "2024-05-31".parse::<NaiveDate>().unwrap());
}

#[test]
fn first_purchase_starts_today() {
    let end = renewal_end_date("2024-05-01".parse().unwrap(), None, 3);
    assert_eq!(end, "2024-07-30".parse::<NaiveDate>().unwrap());
}

// ── payments ────────────────────────────────────────────────────────

#[tokio::test]
async fn insufficient_funds_leaves_balance_untouched() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "10.00").await;
    seed_product(&store, "prod1", "25.00").await;

    let err = ledger.pay_product("card-0001", "prod1").await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(member_balance(&store, "m1").await, Decimal::new(1000, 2));
    assert_eq!(monthly_revenue(&store).await, Decimal::ZERO);
}

#[tokio::test]
async fn unknown_member_and_unknown_plan_are_not_found() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_plan(&store, "plan1", "25.00", 1).await;

    let err = ledger.pay_membership("missing-card", "plan1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = ledger.pay_membership("card-0001", "nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(member_balance(&store, "m1").await, Decimal::new(5000, 2));
}

#[tokio::test]
async fn product_purchase_debits_logs_and_rolls_revenue() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_product(&store, "prod1", "7.50").await;

    let receipt = ledger.pay_product("card-0001", "prod1").await.unwrap();
    assert_eq!(receipt.new_balance, Decimal::new(4250, 2));
    assert_eq!(member_balance(&store, "m1").await, Decimal::new(4250, 2));
    assert_eq!(monthly_revenue(&store).await, Decimal::new(750, 2));

    let payments = crate::db::repository::PaymentLogRepository::new(
        store.clone() as Arc<dyn RecordStore>,
    )
    .recent(10, 0)
    .await
    .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].category, PaymentCategory::Product);
    assert_eq!(payments[0].product_name.as_deref(), Some("Protein Bar"));
}

#[tokio::test]
async fn first_membership_purchase_creates_record() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_plan(&store, "plan1", "25.00", 1).await;

    let receipt = ledger.pay_membership("card-0001", "plan1").await.unwrap();
    assert_eq!(receipt.new_balance, Decimal::new(2500, 2));

    let memberships = active_memberships(&store, "m1").await;
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].start_date, today());
    assert_eq!(memberships[0].end_date, today() + Duration::days(30));
}

#[tokio::test]
async fn renewal_extends_active_membership_in_place() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_plan(&store, "plan1", "25.00", 1).await;
    seed_membership(&store, "ms1", "m1", today() + Duration::days(40)).await;

    ledger.pay_membership("card-0001", "plan1").await.unwrap();

    let memberships = active_memberships(&store, "m1").await;
    // updated in place: still a single active record, same id
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].id, "ms1");
    assert_eq!(memberships[0].end_date, today() + Duration::days(70));
}

#[tokio::test]
async fn renewal_after_expiry_restarts_from_today() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_plan(&store, "plan1", "25.00", 1).await;
    // status still says active, but the end date has passed
    seed_membership(&store, "ms1", "m1", today() - Duration::days(10)).await;

    ledger.pay_membership("card-0001", "plan1").await.unwrap();

    let memberships = active_memberships(&store, "m1").await;
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].end_date, today() + Duration::days(30));
}

#[tokio::test]
async fn concurrent_purchases_never_overdraw() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "30.00").await;
    seed_product(&store, "prod1", "25.00").await;

    let (a, b) = tokio::join!(
        ledger.pay_product("card-0001", "prod1"),
        ledger.pay_product("card-0001", "prod1"),
    );

    // exactly one side passes the sufficiency check
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert_eq!(member_balance(&store, "m1").await, Decimal::new(500, 2));
    assert_eq!(monthly_revenue(&store).await, Decimal::new(2500, 2));
}

#[tokio::test]
async fn revenue_accumulates_across_categories() {
    let (store, ledger) = service();
    seed_member(&store, "m1", "card-0001", "50.00").await;
    seed_plan(&store, "plan1", "25.00", 1).await;
    seed_product(&store, "prod1", "10.00").await;

    ledger.pay_membership("card-0001", "plan1").await.unwrap();
    ledger.pay_product("card-0001", "prod1").await.unwrap();

    assert_eq!(monthly_revenue(&store).await, Decimal::new(3500, 2));
}
