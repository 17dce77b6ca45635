use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;

use crate::{
    app::{AppError, AppService},
    cards::{CardCreate, ProductCard},
    catalog::{CatalogFilter, CatalogStats, Product, CANDIDATES_ROUTE},
    search::{SearchRequest, SearchResponse},
};

const DEFAULT_PRODUCTS_LIMIT: usize = 20;
const DEFAULT_CARDS_LIMIT: usize = 10;

#[derive(Clone)]
struct SharedState {
    app: Arc<AppService>,
}

pub fn router(app: Arc<AppService>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/api/products/search", post(search))
        .route("/api/products", get(list_products))
        .route("/api/categories", get(categories))
        .route("/api/stats", get(stats))
        .route(CANDIDATES_ROUTE, post(candidates))
        .route("/api/cards", post(create_card).get(list_cards))
        .route("/api/cards/search", post(find_cards))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: AppService, listen: String) -> anyhow::Result<()> {
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                log::error!("failed to install Ctrl+C handler: {e}");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => log::error!("failed to install signal handler: {e}"),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        log::warn!("shutting down");
    }

    let router = router(Arc::new(app));

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    log::info!("listening on {listen}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(app: AppService, listen: String) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(start_app(app, listen))
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            AppError::NotFound => axum::http::StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidInput(_) => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AppError::Catalog(_) | AppError::Other(_) => {
                log::error!("{self:?}");
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            json!({"error": self.0.to_string()}).to_string(),
        )
            .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CardSearchRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

async fn search(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, HttpError> {
    log::debug!("payload: {payload:?}");
    let app = state.app.clone();

    tokio::task::block_in_place(move || Ok(Json(app.search(&payload)?)))
}

async fn list_products(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Product>>, HttpError> {
    let app = state.app.clone();
    let limit = params.limit.unwrap_or(DEFAULT_PRODUCTS_LIMIT);

    tokio::task::block_in_place(move || Ok(Json(app.list_products(limit)?)))
}

async fn categories(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<Vec<String>>, HttpError> {
    let app = state.app.clone();

    tokio::task::block_in_place(move || Ok(Json(app.categories()?)))
}

async fn stats(State(state): State<Arc<SharedState>>) -> Result<Json<CatalogStats>, HttpError> {
    let app = state.app.clone();

    tokio::task::block_in_place(move || Ok(Json(app.stats()?)))
}

async fn candidates(
    State(state): State<Arc<SharedState>>,
    Json(filter): Json<CatalogFilter>,
) -> Result<Json<Vec<Product>>, HttpError> {
    log::debug!("payload: {filter:?}");
    let app = state.app.clone();

    tokio::task::block_in_place(move || Ok(Json(app.candidates(&filter)?)))
}

async fn create_card(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<CardCreate>,
) -> Result<Json<ProductCard>, HttpError> {
    log::debug!("payload: {payload:?}");
    let app = state.app.clone();

    tokio::task::block_in_place(move || Ok(Json(app.create_card(payload)?)))
}

async fn list_cards(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<ProductCard>>, HttpError> {
    let app = state.app.clone();
    let limit = params.limit.unwrap_or(DEFAULT_CARDS_LIMIT);

    tokio::task::block_in_place(move || Ok(Json(app.list_cards(limit)?)))
}

async fn find_cards(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<CardSearchRequest>,
) -> Result<Json<Vec<ProductCard>>, HttpError> {
    log::debug!("payload: {payload:?}");
    let app = state.app.clone();
    let limit = payload.limit.unwrap_or(DEFAULT_CARDS_LIMIT);

    tokio::task::block_in_place(move || Ok(Json(app.find_cards(&payload.query, limit)?)))
}
