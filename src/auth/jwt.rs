use crate::auth::jwks::JwksCache;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider recorded for users whose token names none.
pub const DEFAULT_AUTH_PROVIDER: &str = "email";

/// Identity provider JWT claims.
///
/// The `sub` field is the user's UUID in the provider's user table.
/// `user_metadata` carries profile info from the OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// e.g. "authenticated".
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: Option<AppMetadata>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

/// Server-controlled metadata; `provider` is how the user signed in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppMetadata {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// Prefer the top-level email, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }

    pub fn auth_provider(&self) -> String {
        self.app_metadata
            .as_ref()
            .and_then(|m| m.provider.clone())
            .unwrap_or_else(|| DEFAULT_AUTH_PROVIDER.to_string())
    }
}

/// Decode and verify a token against a known key.
pub fn decode_claims(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, String> {
    decode::<Claims>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Token validation failed: {e:?}"))
}

/// Validate a token against the provider's published signing keys.
pub async fn validate_token(token: &str, jwks_cache: &JwksCache) -> Result<Claims, String> {
    jwks_cache.validate_token(token).await
}
