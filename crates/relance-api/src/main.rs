use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod middleware;
mod routes;
mod state;

use relance_cache::{SystemClock, TtlCache};
use relance_engine::{Engine, EngineConfig};
use relance_mailer::{Mailer, MailerClient};
use relance_storage::rows::{RowStore, S3RowStore};
use relance_sweeps::SweepContext;
use state::{AppState, AuthConfig};

/// Fixed pause between outbound emails within one sweep, respecting the
/// provider's throughput limit.
const SEND_PAUSE: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let bucket = env::var("RELANCE_BUCKET").unwrap_or_else(|_| "relance".to_string());
    let app_url =
        env::var("APP_URL").unwrap_or_else(|_| "https://app.relance.example".to_string());
    let user_pool_id =
        env::var("COGNITO_USER_POOL_ID").unwrap_or_else(|_| "eu-west-3_placeholder".to_string());
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-3".to_string());
    let jwt_pem =
        env::var("JWT_PUBLIC_KEY_PEM").map_err(|_| eyre::eyre!("JWT_PUBLIC_KEY_PEM is required"))?;

    let decoding_key = jsonwebtoken::DecodingKey::from_rsa_pem(jwt_pem.as_bytes())
        .map_err(|e| eyre::eyre!("invalid JWT public key: {e}"))?;
    let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");

    let s3 = relance_storage::client::build_client().await;
    let store: Arc<dyn RowStore> = Arc::new(S3RowStore::new(s3, bucket));
    let mailer: Arc<dyn Mailer> = Arc::new(MailerClient::from_env()?);
    let cache = Arc::new(TtlCache::new(Arc::new(SystemClock)));

    let engine = Arc::new(Engine::new(
        cache.clone(),
        store.clone(),
        mailer.clone(),
        EngineConfig {
            app_url: app_url.clone(),
        },
    ));
    let sweeps = Arc::new(SweepContext {
        store,
        mailer,
        cache,
        app_url,
        send_pause: SEND_PAUSE,
    });

    let state = AppState {
        engine,
        sweeps,
        auth: Arc::new(AuthConfig {
            decoding_key,
            issuer,
        }),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Patient-facing, unauthenticated
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/questionnaires/{id}",
            get(routes::questionnaires::get_questionnaire),
        )
        .route(
            "/questionnaires/{id}/responses",
            post(routes::responses::submit_response),
        );

    // Practitioner dashboard
    let protected = Router::new()
        .route(
            "/questionnaires",
            post(routes::questionnaires::create_questionnaire),
        )
        .route(
            "/questionnaires",
            get(routes::questionnaires::list_questionnaires),
        )
        .route(
            "/questionnaires/{id}/viewed",
            post(routes::questionnaires::mark_viewed),
        )
        .route(
            "/questionnaires/{id}/favorite",
            put(routes::questionnaires::set_favorite),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Operator sweeps, triggered by the external scheduler
    let admin = Router::new()
        .route("/sweeps/delivery", post(routes::sweeps::run_delivery))
        .route("/sweeps/reminder", post(routes::sweeps::run_reminder))
        .route("/sweeps/expiry", post(routes::sweeps::run_expiry))
        .route_layer(axum_mw::from_fn(middleware::auth::require_admin))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let app = Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
