//! NFC Pairing Flow
//!
//! TTL-gated one-time code exchange: an operator issues a short code for a
//! member without a card, the mobile app redeems it together with the
//! freshly read token, and the token is bound to the member. The store
//! adapter has no delete, so redeemed codes flip to `used` rather than
//! being removed — the status check makes the code one-shot either way.

use std::sync::Arc;

use crate::db::repository::{MemberRepository, PairingRepository};
use crate::db::store::RecordStore;
use crate::utils::validation::validate_token;
use crate::utils::{AppError, AppResult};
use shared::models::{PairingCode, PairingStatus};

/// Issued code length (hex chars)
const CODE_LEN: usize = 6;

#[derive(Clone)]
pub struct PairingService {
    members: MemberRepository,
    pending: PairingRepository,
    ttl_minutes: i64,
}

impl PairingService {
    pub fn new(store: Arc<dyn RecordStore>, ttl_minutes: i64) -> Self {
        Self {
            members: MemberRepository::new(store.clone()),
            pending: PairingRepository::new(store),
            ttl_minutes,
        }
    }

    /// Issue a pairing code for a member without a bound card.
    pub async fn generate_code(&self, member_id: &str) -> AppResult<String> {
        let member = self
            .members
            .find_by_id(member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        if member.nfc_token.is_some() {
            return Err(AppError::Conflict(
                "Member already has a linked NFC card".to_string(),
            ));
        }

        let mut code = uuid::Uuid::new_v4().simple().to_string();
        code.truncate(CODE_LEN);
        self.pending
            .create(
                &code,
                &PairingCode {
                    member_id: member.id.clone(),
                    created_at: shared::util::now_millis(),
                    status: PairingStatus::Waiting,
                },
            )
            .await
            .map_err(AppError::from)?;

        tracing::info!(member_id = %member.id, "pairing code issued");
        Ok(code)
    }

    /// Redeem a pairing code: bind the presented token to the member.
    ///
    /// Returns the member id on success.
    pub async fn link(&self, code: &str, raw_token: &str) -> AppResult<String> {
        let token = validate_token(raw_token)?;

        let pending = self
            .pending
            .find(code)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Pairing code not found".to_string()))?;
        if pending.status != PairingStatus::Waiting {
            return Err(AppError::Expired("Pairing code already used".to_string()));
        }
        let age_millis = shared::util::now_millis() - pending.created_at;
        if age_millis > self.ttl_minutes * 60_000 {
            return Err(AppError::Expired("Pairing code has expired".to_string()));
        }

        let member = self
            .members
            .find_by_id(&pending.member_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        // Token uniqueness: at most one member binds a given card
        if self
            .members
            .find_by_token(token)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::Conflict(
                "NFC card already linked to another member".to_string(),
            ));
        }

        self.members
            .bind_token(&member.id, token)
            .await
            .map_err(AppError::from)?;
        self.pending.mark_used(code).await.map_err(AppError::from)?;

        tracing::info!(member_id = %member.id, "NFC card linked");
        Ok(member.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::db::store::MemoryStore;
    use serde_json::json;

    fn service(store: Arc<MemoryStore>) -> PairingService {
        PairingService::new(store, 5)
    }

    async fn seed_member(store: &MemoryStore, id: &str, token: Option<&str>) {
        store
            .set(
                collections::MEMBERS,
                id,
                json!({
                    "name": "Ana Flores",
                    "balance": "0.00",
                    "status": "inactive",
                    "nfc_token": token,
                }),
                false,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn issue_and_redeem_binds_token() {
        let store = Arc::new(MemoryStore::new());
        seed_member(&store, "m1", None).await;
        let pairing = service(store.clone());

        let code = pairing.generate_code("m1").await.unwrap();
        assert_eq!(code.len(), CODE_LEN);

        let member_id = pairing.link(&code, "card-9999").await.unwrap();
        assert_eq!(member_id, "m1");

        let record = store
            .get(collections::MEMBERS, "m1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.fields["nfc_token"], json!("card-9999"));
        assert_eq!(record.fields["status"], json!("active"));

        // one-shot: a second redemption is rejected
        let err = pairing.link(&code, "card-8888").await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn already_bound_member_cannot_issue() {
        let store = Arc::new(MemoryStore::new());
        seed_member(&store, "m1", Some("card-0001")).await;
        let pairing = service(store);

        let err = pairing.generate_code("m1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn token_bound_elsewhere_conflicts() {
        let store = Arc::new(MemoryStore::new());
        seed_member(&store, "m1", None).await;
        seed_member(&store, "m2", Some("card-0001")).await;
        let pairing = service(store);

        let code = pairing.generate_code("m1").await.unwrap();
        let err = pairing.link(&code, "card-0001").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn expired_code_is_gone() {
        let store = Arc::new(MemoryStore::new());
        seed_member(&store, "m1", None).await;
        let pairing = service(store.clone());

        let code = pairing.generate_code("m1").await.unwrap();
        // age the code past the TTL
        store
            .update(
                collections::PENDING_LINKS,
                &code,
                &[(
                    "created_at".to_string(),
                    json!(shared::util::now_millis() - 6 * 60_000),
                )],
            )
            .await
            .unwrap();

        let err = pairing.link(&code, "card-9999").await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn unknown_code_not_found() {
        let store = Arc::new(MemoryStore::new());
        let pairing = service(store);
        let err = pairing.link("zzzzzz", "card-9999").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
