//! Authentication ports - the identity provider seam.

use uuid::Uuid;

use crate::domain::{AuthorSnapshot, User};

/// Claims stored in access tokens. Carries the denormalizable author fields
/// so handlers can build snapshots without a user lookup.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub exp: i64,
}

impl TokenClaims {
    /// Author fields for documents written on behalf of this identity.
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot::new(
            self.user_id,
            self.display_name.clone().unwrap_or_else(|| self.email.clone()),
            self.avatar_url.clone(),
        )
    }
}

/// Token service trait for access-token operations.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user: &User) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
