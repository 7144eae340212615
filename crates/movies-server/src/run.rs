use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use movies_app::rest_api::MOVIES_PATH;
use movies_app::state::{AppConfig, AppState};
use movies_dal::MovieStore;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if args.cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    debug!("Server stopped");
    Ok(())
}

#[cfg(feature = "openapi")]
fn api_docs() -> utoipa::openapi::OpenApi {
    #[derive(utoipa::OpenApi)]
    #[openapi(info(title = "Movies API"))]
    struct OpenApi;

    use utoipa::OpenApi as _;
    OpenApi::openapi().nest(MOVIES_PATH, movies_app::rest_api::movie::api_docs())
}

pub fn main_router(state: AppState) -> Router<()> {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest(MOVIES_PATH, movies_app::rest_api::movie::router())
        .with_state(state)
        .route("/health", get(health));

    #[cfg(feature = "openapi")]
    {
        let docs = api_docs();
        router = router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs),
        );
    }
    router.layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let app_config = AppConfig {
        base_url: config.base_url.clone(),
    };

    let store = if config.in_memory {
        info!("Using in-memory store, movies will not be persisted");
        MovieStore::memory()
    } else {
        let data_dir = config.data_dir();
        if !data_dir.is_dir() {
            tokio::fs::create_dir_all(&data_dir).await?;
            info!("Created data directory {}", data_dir.display());
        }
        let pool = movies_dal::new_pool(&config.database_url()).await?;
        movies_dal::migrate(&pool).await?;
        MovieStore::sql(pool)
    };

    Ok(AppState::new(app_config, store))
}
