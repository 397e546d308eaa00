use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use relance_core::models::practitioner::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Claims extracted from a Cognito JWT.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub token_use: String,
    pub exp: u64,
    pub iat: u64,
    #[serde(default)]
    pub email: Option<String>,
    /// Role claim set server-side at provisioning time. Admin access hangs
    /// off this — never off anything the client sends.
    #[serde(default, rename = "custom:role")]
    pub role: Option<String>,
}

impl Claims {
    pub fn role(&self) -> Role {
        match self.role.as_deref() {
            Some("admin") => Role::Admin,
            _ => Role::Practitioner,
        }
    }
}

/// Validate a Cognito JWT against the user pool's public key.
pub fn validate_token(
    token: &str,
    decoding_key: &DecodingKey,
    issuer: &str,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, decoding_key, &validation)?;

    // Verify token_use is "access" or "id"
    let token_use = &token_data.claims.token_use;
    if token_use != "access" && token_use != "id" {
        return Err(AuthError::InvalidToken(format!(
            "unexpected token_use: {token_use}"
        )));
    }

    Ok(token_data.claims)
}
