//! Member Repository

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use super::{RepoError, RepoResult, decode};
use crate::db::collections::MEMBERS;
use crate::db::store::{Filter, RecordStore};
use shared::models::Member;

#[derive(Clone)]
pub struct MemberRepository {
    store: Arc<dyn RecordStore>,
}

impl MemberRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Look up the member bound to an NFC token.
    ///
    /// The pairing flow guarantees at most one binding per token; a first
    /// match is therefore the match.
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<Member>> {
        let mut records = self
            .store
            .query(
                MEMBERS,
                &[Filter::Eq("nfc_token", json!(token))],
                None,
                Some(1),
                None,
            )
            .await?;
        records.pop().map(decode).transpose()
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Member>> {
        self.store
            .get(MEMBERS, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Overwrite the member's balance.
    ///
    /// Callers hold the per-member lock across the preceding sufficiency
    /// check; this write alone is not a conditional decrement.
    pub async fn set_balance(&self, id: &str, balance: Decimal) -> RepoResult<()> {
        let value = serde_json::to_value(balance).map_err(|e| RepoError::Corrupt(e.to_string()))?;
        self.store
            .update(MEMBERS, id, &[("balance".to_string(), value)])
            .await?;
        Ok(())
    }

    /// Bind an NFC token and activate the member (pairing redemption).
    pub async fn bind_token(&self, id: &str, token: &str) -> RepoResult<()> {
        self.store
            .update(
                MEMBERS,
                id,
                &[
                    ("nfc_token".to_string(), json!(token)),
                    ("status".to_string(), json!("active")),
                ],
            )
            .await?;
        Ok(())
    }
}
