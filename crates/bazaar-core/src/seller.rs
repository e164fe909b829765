//! # Seller Profiles and the Approval State Machine
//!
//! A user applies to become a seller, which creates a `SellerProfile` in
//! Pending state. Admins drive the profile through an explicit transition
//! table; product-creation rights require the Approved state.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Seller Approval State Machine                         │
//! │                                                                         │
//! │   (no profile) ──apply──► Pending ──approve (admin)──► Approved        │
//! │                              │  ▲                      (terminal)      │
//! │                     reject   │  │  reapply                             │
//! │                     (admin)  ▼  │  (owner)                             │
//! │                           Rejected                                     │
//! │                                                                         │
//! │   Every other (state, action) pair is a Conflict.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Approving a profile grants the user the Seller role as a side effect;
//! that happens at the storage layer in the same transaction as the status
//! update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Seller Status
// =============================================================================

/// Approval status of a seller profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    /// Application submitted, awaiting admin review.
    Pending,
    /// Admin approved; the user holds the Seller role and may manage products.
    Approved,
    /// Admin rejected; the user may re-apply.
    Rejected,
}

/// An action attempted against a seller profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerAction {
    /// Admin approves a pending application.
    Approve,
    /// Admin rejects a pending application.
    Reject,
    /// The owner re-submits a rejected application.
    Reapply,
}

impl SellerStatus {
    /// Applies an action, returning the next state or a Conflict error.
    ///
    /// The table is exhaustive on purpose: adding a state or action without
    /// deciding its transitions will not compile silently into "allowed".
    pub fn apply(self, action: SellerAction) -> CoreResult<SellerStatus> {
        match (self, action) {
            (SellerStatus::Pending, SellerAction::Approve) => Ok(SellerStatus::Approved),
            (SellerStatus::Pending, SellerAction::Reject) => Ok(SellerStatus::Rejected),
            (SellerStatus::Rejected, SellerAction::Reapply) => Ok(SellerStatus::Pending),
            (from, action) => Err(CoreError::InvalidSellerTransition { from, action }),
        }
    }
}

// =============================================================================
// Seller Profile
// =============================================================================

/// A user's application/record to sell, carrying an approval status.
///
/// Invariant: a user has at most one profile (unique user_id at the storage
/// layer; a second application is a Conflict).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SellerProfile {
    pub id: String,
    pub user_id: String,
    pub shop_name: String,
    pub description: String,
    pub status: SellerStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SellerProfile {
    /// True if the profile grants product-management rights.
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.status == SellerStatus::Approved
    }
}

// =============================================================================
// Authorization Gate
// =============================================================================

/// Resolves a (possibly absent) profile into product-management rights.
///
/// The two failure modes are deliberately distinct: "not a seller" and
/// "seller not yet approved" surface as different authorization messages.
pub fn approved_profile(profile: Option<&SellerProfile>) -> CoreResult<&SellerProfile> {
    match profile {
        None => Err(CoreError::NotASeller),
        Some(p) if p.is_approved() => Ok(p),
        Some(_) => Err(CoreError::SellerNotApproved),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(status: SellerStatus) -> SellerProfile {
        SellerProfile {
            id: "sp-1".into(),
            user_id: "u-1".into(),
            shop_name: "Corner Shop".into(),
            description: String::new(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_allowed_transitions() {
        assert_eq!(
            SellerStatus::Pending.apply(SellerAction::Approve).unwrap(),
            SellerStatus::Approved
        );
        assert_eq!(
            SellerStatus::Pending.apply(SellerAction::Reject).unwrap(),
            SellerStatus::Rejected
        );
        assert_eq!(
            SellerStatus::Rejected.apply(SellerAction::Reapply).unwrap(),
            SellerStatus::Pending
        );
    }

    #[test]
    fn test_rejected_transitions() {
        // Approved is terminal
        for action in [
            SellerAction::Approve,
            SellerAction::Reject,
            SellerAction::Reapply,
        ] {
            assert!(SellerStatus::Approved.apply(action).is_err());
        }
        // Pending profiles cannot re-apply, Rejected cannot self-approve
        assert!(SellerStatus::Pending.apply(SellerAction::Reapply).is_err());
        assert!(SellerStatus::Rejected.apply(SellerAction::Approve).is_err());
        assert!(SellerStatus::Rejected.apply(SellerAction::Reject).is_err());
    }

    #[test]
    fn test_gate_distinguishes_missing_from_unapproved() {
        assert!(matches!(
            approved_profile(None),
            Err(CoreError::NotASeller)
        ));

        let pending = profile(SellerStatus::Pending);
        assert!(matches!(
            approved_profile(Some(&pending)),
            Err(CoreError::SellerNotApproved)
        ));

        let rejected = profile(SellerStatus::Rejected);
        assert!(matches!(
            approved_profile(Some(&rejected)),
            Err(CoreError::SellerNotApproved)
        ));

        let approved = profile(SellerStatus::Approved);
        assert_eq!(approved_profile(Some(&approved)).unwrap().id, "sp-1");
    }
}
