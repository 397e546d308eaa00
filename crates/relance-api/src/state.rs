use std::sync::Arc;

use jsonwebtoken::DecodingKey;

use relance_engine::Engine;
use relance_sweeps::SweepContext;

/// Shared application state, injected into all route handlers via Axum
/// state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub sweeps: Arc<SweepContext>,
    pub auth: Arc<AuthConfig>,
}

pub struct AuthConfig {
    pub decoding_key: DecodingKey,
    pub issuer: String,
}
