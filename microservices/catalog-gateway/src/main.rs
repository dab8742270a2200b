//! Libris Catalog Gateway
//!
//! GraphQL API over the relational books-and-authors catalog:
//! - Query fields: book, author, books, authors
//! - Mutation fields: addBook, addAuthor, deleteBook, updateBook
//! - Author arguments resolve by name with find-or-create semantics
//! - Health and readiness probes backed by the connection pool

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{
    extract::State,
    http::HeaderValue,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use libris_core::{
    DependencyStatus, HealthStatus, LibrisError, LibrisService, ReadinessStatus, Result,
    ServiceRuntime,
};
use libris_db::DbPool;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

mod config;
mod domain;
mod schema;
mod store;

pub use config::CatalogConfig;
use schema::{build_schema, CatalogSchema};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_gateway=debug".parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting Libris Catalog Gateway");

    let service = Arc::new(CatalogGatewayService::new()?);
    ServiceRuntime::run(service).await
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    pool: DbPool,
    started_at: std::time::Instant,
}

pub struct CatalogGatewayService {
    config: CatalogConfig,
    schema: CatalogSchema,
    pool: DbPool,
    start_time: std::time::Instant,
}

impl CatalogGatewayService {
    pub fn new() -> Result<Self> {
        let config = CatalogConfig::from_env()?;

        let pool = DbPool::new(config.pool_config())
            .map_err(|e| LibrisError::Database(e.to_string()))?;

        let schema = build_schema(pool.clone());

        Ok(Self {
            config,
            schema,
            pool,
            start_time: std::time::Instant::now(),
        })
    }

    fn cors_layer(&self) -> Result<CorsLayer> {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.config.cors_domain == "*" {
            return Ok(layer.allow_origin(Any));
        }
        let origin: HeaderValue = self.config.cors_domain.parse().map_err(|_| {
            LibrisError::Config(format!("Invalid CORS_DOMAIN: {}", self.config.cors_domain))
        })?;
        Ok(layer.allow_origin(origin))
    }
}

#[async_trait::async_trait]
impl LibrisService for CatalogGatewayService {
    fn service_id(&self) -> &'static str {
        "catalog-gateway"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        let db_healthy = self.pool.is_healthy().await;
        ReadinessStatus {
            ready: db_healthy,
            dependencies: vec![DependencyStatus {
                name: "catalog-db".to_string(),
                available: db_healthy,
                latency_ms: None,
            }],
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Catalog Gateway");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(http = %self.config.http_bind, "Starting Catalog Gateway server");

        let state = AppState {
            pool: self.pool.clone(),
            started_at: self.start_time,
        };

        let app = Router::new()
            // Probes
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            // GraphQL endpoint: GraphiQL on GET, queries/mutations on POST
            .route(
                "/graphql",
                get(graphiql).post_service(GraphQL::new(self.schema.clone())),
            )
            .layer(self.cors_layer()?)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        healthy: true,
        service_id: "catalog-gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

async fn ready_handler(State(state): State<AppState>) -> Json<ReadinessStatus> {
    let db_healthy = state.pool.is_healthy().await;
    Json(ReadinessStatus {
        ready: db_healthy,
        dependencies: vec![DependencyStatus {
            name: "catalog-db".to_string(),
            available: db_healthy,
            latency_ms: None,
        }],
    })
}
