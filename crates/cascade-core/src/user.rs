//! User and sealed-credential types.

use crate::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub scm_context: String,
    /// SCM token, sealed at rest. Unsealing goes through a `TokenVault`.
    pub token: SealedToken,
    pub created_at: DateTime<Utc>,
}

/// An encrypted credential. The plaintext never appears in a stored record
/// and must not be logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedToken {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; 12],
}
