//! # Login Collaborator
//!
//! Credential checking behind a trait so the controller never knows how
//! secrets are verified. The stock implementation compares the presented
//! secret to the stored record verbatim; a hardened deployment swaps in a
//! hashing implementation without touching the controller.

use fluxo_core::types::User;
use fluxo_core::AppState;

use crate::error::{SyncError, SyncResult};

/// Resolves a login attempt against a document snapshot.
pub trait Authenticator: Send + Sync {
    /// Returns the matching user, or `InvalidCredentials`. The error never
    /// says whether the login name or the secret was wrong.
    fn authenticate(&self, state: &AppState, login_name: &str, secret: &str) -> SyncResult<User>;
}

/// Plain comparison against the stored credential record.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoredCredentialAuthenticator;

impl Authenticator for StoredCredentialAuthenticator {
    fn authenticate(&self, state: &AppState, login_name: &str, secret: &str) -> SyncResult<User> {
        state
            .users
            .iter()
            .find(|u| u.login_name == login_name && u.credential_secret == secret)
            .cloned()
            .ok_or(SyncError::InvalidCredentials)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
