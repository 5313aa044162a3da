use super::*;
use crate::utils::AppError;
use shared::models::{AccessStatus, AlertType, DenyReason, MemberStatus};

#[tokio::test]
async fn short_token_rejected_without_side_effects() {
    let store = Arc::new(MemoryStore::new());
    let gate = gate(store.clone());

    let err = gate.present_token("123").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // nothing should have been spawned; give any stray task time to land
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(logs(&store).await.is_empty());
    assert!(alerts(&store).await.is_empty());
}

#[tokio::test]
async fn unknown_token_is_not_found_and_audited() {
    let store = Arc::new(MemoryStore::new());
    let gate = gate(store.clone());

    let err = gate.present_token("ghost-card").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(
        eventually(|| async {
            logs(&store).await.len() == 1 && alerts(&store).await.len() == 1
        })
        .await
    );

    let log = &logs(&store).await[0];
    assert_eq!(log.status, AccessStatus::Denied);
    assert_eq!(log.reason, Some(DenyReason::UnknownToken));
    assert_eq!(log.member_id, None);
    assert_eq!(log.token, "ghost-card");

    let alert = &alerts(&store).await[0];
    assert_eq!(alert.alert_type, AlertType::UnknownNfc);
    assert_eq!(alert.location, "Main Entrance");
}

#[tokio::test]
async fn member_without_membership_is_denied() {
    let store = Arc::new(MemoryStore::new());
    seed_member(&store, "m1", "Ana Flores", "card-0001").await;
    let gate = gate(store.clone());

    let outcome = gate.present_token("card-0001").await.unwrap();
    assert!(!outcome.granted);
    assert_eq!(outcome.message, "No active membership");
    assert_eq!(outcome.name, "Ana Flores");
    assert_eq!(outcome.member_status, MemberStatus::Active);
    assert!(outcome.plan.is_none());

    assert!(
        eventually(|| async {
            logs(&store).await.len() == 1 && alerts(&store).await.len() == 1
        })
        .await
    );
    let log = &logs(&store).await[0];
    assert_eq!(log.reason, Some(DenyReason::NoActiveMembership));
    assert_eq!(log.member_id.as_deref(), Some("m1"));
    assert_eq!(
        alerts(&store).await[0].alert_type,
        AlertType::NoActiveMembership
    );

    // denial must never touch the balance
    let record = store
        .get(collections::MEMBERS, "m1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.fields["balance"], json!("50.00"));
}

#[tokio::test]
async fn expired_membership_is_denied() {
    let store = Arc::new(MemoryStore::new());
    seed_member(&store, "m1", "Ana Flores", "card-0001").await;
    seed_membership(&store, "ms1", "m1", today() - Duration::days(1)).await;
    let gate = gate(store.clone());

    let outcome = gate.present_token("card-0001").await.unwrap();
    assert!(!outcome.granted);
    assert_eq!(outcome.message, "Membership expired");

    assert!(
        eventually(|| async {
            logs(&store)
                .await
                .first()
                .is_some_and(|l| l.reason == Some(DenyReason::ExpiredMembership))
        })
        .await
    );
}

#[tokio::test]
async fn membership_valid_through_its_end_date() {
    let store = Arc::new(MemoryStore::new());
    seed_member(&store, "m1", "Ana Flores", "card-0001").await;
    seed_membership(&store, "ms1", "m1", today()).await;
    seed_plan(&store).await;
    let gate = gate(store.clone());

    let outcome = gate.present_token("card-0001").await.unwrap();
    assert!(outcome.granted);
    assert_eq!(outcome.message, "Entry recorded");
}

#[tokio::test]
async fn granted_outcome_carries_plan_and_end_date() {
    let store = Arc::new(MemoryStore::new());
    seed_valid_member(&store, "m1", "Ana Flores", "card-0001").await;
    let gate = gate(store.clone());

    let outcome = gate.present_token("card-0001").await.unwrap();
    assert!(outcome.granted);
    assert_eq!(outcome.plan.as_deref(), Some("Monthly"));
    assert_eq!(outcome.membership_end, Some(today() + Duration::days(60)));

    assert!(
        eventually(|| async {
            logs(&store)
                .await
                .first()
                .is_some_and(|l| l.status == AccessStatus::Granted && l.reason.is_none())
        })
        .await
    );
}

#[tokio::test]
async fn token_with_surrounding_whitespace_resolves() {
    let store = Arc::new(MemoryStore::new());
    seed_valid_member(&store, "m1", "Ana Flores", "card-0001").await;
    let gate = gate(store.clone());

    let outcome = gate.present_token("  card-0001  ").await.unwrap();
    assert!(outcome.granted);
}
