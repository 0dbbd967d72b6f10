mod config;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use jobhunt_api::token::TokenService;
use jobhunt_api::{AppStateInner, router};
use jobhunt_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobhunt_server=debug,jobhunt_api=debug,jobhunt_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if !config.is_production() && config.jwt_secret == config::DEV_SECRET {
        warn!("using the development JWT secret; set JOBHUNT_JWT_SECRET before deploying");
    }

    // Init database
    let db = Database::open(&config.db_path)?;

    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);
    let state = AppStateInner::new(db, tokens);

    let app = router(state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        "jobhunt server listening on {} (environment: {})",
        addr, config.environment
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
