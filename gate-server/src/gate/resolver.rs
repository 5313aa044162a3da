//! Identity Resolver
//!
//! Maps a presented NFC token to a member and the member's current active
//! membership. Pure read; the decision engine and the ledger both sit on
//! top of this.

use std::sync::Arc;

use crate::core::state::IntegrityCounters;
use crate::db::repository::{MemberRepository, MembershipRepository, RepoResult};
use shared::models::{Member, Membership};

/// Integrity counter key: member with more than one active membership
pub const DUPLICATE_ACTIVE_MEMBERSHIPS: &str = "duplicate_active_memberships";

/// A token resolved to its member and (optionally) current membership
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub member: Member,
    pub membership: Option<Membership>,
}

#[derive(Clone)]
pub struct IdentityResolver {
    members: MemberRepository,
    memberships: MembershipRepository,
    integrity: Arc<IntegrityCounters>,
}

impl IdentityResolver {
    pub fn new(
        members: MemberRepository,
        memberships: MembershipRepository,
        integrity: Arc<IntegrityCounters>,
    ) -> Self {
        Self {
            members,
            memberships,
            integrity,
        }
    }

    /// Resolve a token. `None` means the token is bound to no member.
    ///
    /// More than one active membership is a data-integrity defect: the
    /// pick is deterministic (latest end date) and the condition is
    /// counted and logged, never fatal to the request.
    pub async fn resolve(&self, token: &str) -> RepoResult<Option<ResolvedIdentity>> {
        let Some(member) = self.members.find_by_token(token).await? else {
            return Ok(None);
        };

        let candidates = self.memberships.find_active(&member.id).await?;
        let (membership, discarded) = Membership::pick_current(candidates);
        if discarded > 0 {
            self.integrity.increment(DUPLICATE_ACTIVE_MEMBERSHIPS);
            tracing::warn!(
                target: "integrity",
                member_id = %member.id,
                discarded,
                "member has multiple active memberships, picked the one with the latest end date"
            );
        }

        Ok(Some(ResolvedIdentity { member, membership }))
    }
}
