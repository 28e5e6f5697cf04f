//! # Access-Control Guard
//!
//! Role-aware predicate gating every transition and privileged view.
//!
//! ## One Table, One Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Guard Placement                                   │
//! │                                                                         │
//! │  Intent ──► SyncController ──► can_perform(role, op)? ──► Engine       │
//! │                                      │                                  │
//! │                                      └── false → CoreError::Forbidden  │
//! │                                                                         │
//! │  Every intent passes through the guard EXACTLY ONCE, before the        │
//! │  engine runs. The guard never mutates state.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Centralizing the table here replaces scattered per-call-site role checks,
//! so a permission change is a one-line edit with one test to match.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::UserRole;

// =============================================================================
// Operation Kinds
// =============================================================================

/// Everything an actor can ask the system to do or show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    // Transitions
    RecordSale,
    RecordDamage,
    AdjustStock,
    RecordTransaction,
    UpsertProduct,
    DeleteProduct,
    UpsertUser,
    DeleteUser,
    EditOwnProfile,

    // Privileged views
    ViewProducts,
    ViewOwnSales,
    ViewAllSales,
    ViewCashFlow,
    ViewReports,
    ViewCostFields,
}

// =============================================================================
// The Predicate
// =============================================================================

/// Returns whether `role` may perform `op`.
///
/// Employees run the counter: they sell, report damages, browse the
/// catalogue and their own history, and maintain their own profile.
/// Everything that touches the catalogue, the team, or money aggregates is
/// the administrator's.
pub fn can_perform(role: UserRole, op: OperationKind) -> bool {
    use OperationKind::*;

    match role {
        UserRole::Admin => true,
        UserRole::Employee => matches!(
            op,
            RecordSale | RecordDamage | EditOwnProfile | ViewProducts | ViewOwnSales
        ),
    }
}

/// Guard check as a fallible step: `Ok(())` or `Forbidden`.
pub fn ensure_can_perform(role: UserRole, op: OperationKind) -> CoreResult<()> {
    if can_perform(role, op) {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            operation: op,
            role,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use OperationKind::*;

    #[test]
    fn test_admin_may_do_everything() {
        for op in [
            RecordSale,
            RecordDamage,
            AdjustStock,
            RecordTransaction,
            UpsertProduct,
            DeleteProduct,
            UpsertUser,
            DeleteUser,
            EditOwnProfile,
            ViewProducts,
            ViewOwnSales,
            ViewAllSales,
            ViewCashFlow,
            ViewReports,
            ViewCostFields,
        ] {
            assert!(can_perform(UserRole::Admin, op), "admin denied {op:?}");
        }
    }

    #[test]
    fn test_employee_counter_operations() {
        assert!(can_perform(UserRole::Employee, RecordSale));
        assert!(can_perform(UserRole::Employee, RecordDamage));
        assert!(can_perform(UserRole::Employee, ViewProducts));
        assert!(can_perform(UserRole::Employee, ViewOwnSales));
        assert!(can_perform(UserRole::Employee, EditOwnProfile));
    }

    #[test]
    fn test_employee_management_denied() {
        for op in [
            AdjustStock,
            RecordTransaction,
            UpsertProduct,
            DeleteProduct,
            UpsertUser,
            DeleteUser,
            ViewAllSales,
            ViewCashFlow,
            ViewReports,
            ViewCostFields,
        ] {
            assert!(!can_perform(UserRole::Employee, op), "employee allowed {op:?}");
        }
    }

    #[test]
    fn test_ensure_returns_forbidden() {
        let err = ensure_can_perform(UserRole::Employee, DeleteUser).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden { .. }));
        assert!(ensure_can_perform(UserRole::Admin, DeleteUser).is_ok());
    }
}
