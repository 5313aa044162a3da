//! GateService tests over the in-memory store.
//!
//! Side-effect work (audit log, alerts, stats) runs fire-and-forget, so
//! assertions on it poll with [`eventually`] instead of assuming the
//! spawned task finished before the response.

mod test_access;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde_json::json;

use super::GateService;
use crate::core::state::{IntegrityCounters, MemberLocks};
use crate::db::collections;
use crate::db::repository::{AccessLogRepository, AlertRepository, DashboardRepository};
use crate::db::store::{MemoryStore, RecordStore};
use crate::utils::time;
use shared::models::{AccessLogEntry, Alert, Dashboard};

fn tz() -> chrono_tz::Tz {
    chrono_tz::America::La_Paz
}

fn today() -> NaiveDate {
    time::local_today(tz())
}

fn gate(store: Arc<MemoryStore>) -> GateService {
    GateService::new(
        store,
        Arc::new(MemberLocks::new()),
        Arc::new(IntegrityCounters::new()),
        tz(),
        "Main Entrance".to_string(),
    )
}

async fn seed_member(store: &MemoryStore, id: &str, name: &str, token: &str) {
    store
        .set(
            collections::MEMBERS,
            id,
            json!({
                "name": name,
                "email": format!("{id}@example.com"),
                "balance": "50.00",
                "status": "active",
                "nfc_token": token,
            }),
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

async fn seed_plan(store: &MemoryStore) {
    store
        .set(
            collections::PLANS,
            "plan1",
            json!({"name": "Monthly", "price": "25.00", "duration_months": 1}),
            false,
        )
        .await
        .unwrap();
}

/// A member with a far-future membership, ready to be granted.
async fn seed_valid_member(store: &MemoryStore, id: &str, name: &str, token: &str) {
    seed_member(store, id, name, token).await;
    seed_membership(store, &format!("ms-{id}"), id, today() + Duration::days(60)).await;
    seed_plan(store).await;
}

async fn logs(store: &Arc<MemoryStore>) -> Vec<AccessLogEntry> {
    AccessLogRepository::new(store.clone() as Arc<dyn RecordStore>)
        .recent(100, 0)
        .await
        .unwrap()
}

async fn alerts(store: &Arc<MemoryStore>) -> Vec<Alert> {
    AlertRepository::new(store.clone() as Arc<dyn RecordStore>)
        .recent(100, 0)
        .await
        .unwrap()
}

async fn dashboard(store: &Arc<MemoryStore>) -> Dashboard {
    DashboardRepository::new(store.clone() as Arc<dyn RecordStore>)
        .load()
        .await
        .unwrap()
}

/// Poll until the condition holds or ~1s passes.
async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    false
}
