//! # Fluxo Core
//!
//! Pure business logic for the Fluxo point-of-sale ledger. **NO I/O**:
//! no files, no sockets, no clock dependencies beyond timestamping new
//! entries. Everything here is a function of the snapshot it is given.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          fluxo-core                                     │
//! │                                                                         │
//! │  types        - AppState document + entities, seed, merge rule         │
//! │  money        - integer minor-unit Money (exact, float-free)           │
//! │  error        - CoreError / CoreResult                                 │
//! │  validation   - input rules shared by the transitions                  │
//! │  guard        - role × operation permission table                      │
//! │  engine       - pure snapshot transitions (sales, damages, CRUD)       │
//! │  reports      - read-only aggregates (cash, takings, low stock)        │
//! │                                                                         │
//! │  Depended on by: fluxo-store (persistence), fluxo-sync (controller)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod guard;
pub mod money;
pub mod reports;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use guard::{can_perform, ensure_can_perform, OperationKind};
pub use money::Money;
pub use types::{AppState, UserRole, SEED_ADMIN_ID};
