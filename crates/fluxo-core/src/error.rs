//! # Error Types
//!
//! Domain-specific error types for fluxo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fluxo-core errors (this file)                                         │
//! │  └── CoreError        - Transition/guard failures                      │
//! │                                                                         │
//! │  fluxo-store errors (separate crate)                                   │
//! │  └── StoreError       - Document read/write failures                   │
//! │                                                                         │
//! │  fluxo-sync errors (separate crate)                                    │
//! │  └── SyncError        - Controller/config/auth failures                │
//! │                                                                         │
//! │  Flow: CoreError → SyncError → caller (presentation layer)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity, id, amounts)
//! 3. Errors are enum variants, never String
//! 4. A failed transition mutates nothing: the snapshot the caller holds is
//!    exactly the snapshot from before the attempt

use thiserror::Error;

use crate::guard::OperationKind;
use crate::money::Money;
use crate::types::UserRole;

// =============================================================================
// Core Error
// =============================================================================

/// Transition engine and guard errors.
///
/// One variant per failure kind; every transition fails fast with one of
/// these before any part of a new snapshot is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A referenced entity does not exist in the snapshot.
    ///
    /// ## When This Occurs
    /// - A sale line, damage or stock adjustment names an unknown product id
    /// - A profile update names an unknown user id
    /// - Deleting a product/user that another instance already removed
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input: zero/negative quantities or amounts, empty
    /// required fields, duplicate login names.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The transition would violate a document invariant.
    ///
    /// ## When This Occurs
    /// - A stock delta would drive `stock_qty` below zero
    /// - A damage quantity exceeds the available stock
    /// - Deleting the seed administrator (user id "1")
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Cash tendered is below the sale total.
    #[error("insufficient payment: tendered {tendered}, total {total}")]
    InsufficientPayment { tendered: Money, total: Money },

    /// The actor's role does not permit the operation.
    #[error("operation {operation:?} forbidden for role {role:?}")]
    Forbidden {
        operation: OperationKind,
        role: UserRole,
    },

    /// Reserved for optimistic-concurrency hardening (a version-stamped
    /// write rejected as stale). Never raised by the baseline engine.
    #[error("conflict: snapshot is stale")]
    Conflict,
}

impl CoreError {
    /// Shorthand for a missing-entity error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a malformed-input error.
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
