use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
#[cfg(test)]
mod testing;
mod tools;

use adapters::{OpenAiProvider, PgCrmSearch, PgSessionRepository, PgStudioRepository};
use application::{AgentService, AgentSettings};
use aperture::{SessionRepository, StudioRepository, ToolRegistry};
use config::AgentConfig;

/// Agent service over whichever repositories startup wires in
pub type AppAgentService = AgentService<dyn SessionRepository, dyn StudioRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    /// `None` when no LLM key is configured
    pub agent: Option<Arc<AppAgentService>>,
    pub tools: Arc<ToolRegistry>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Aperture API is running - the studio agent is listening".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::agent::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/api/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("📸 Aperture API initializing...");

    let config = AgentConfig::from_lookup(|key| secrets.get(key));

    // Initialize API key from secrets
    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No APERTURE_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| {
            shuttle_runtime::Error::Custom(
                anyhow::Error::new(e).context("Failed to run database migrations"),
            )
        })?;

    tracing::info!("✅ Database migrations completed");

    let search = Arc::new(PgCrmSearch::new(pool.clone()));
    let tools = Arc::new(tools::builtin_registry(search, config.search_limit));
    tracing::info!("🔧 {} agent tools registered: {}", tools.len(), tools.keys().join(", "));

    // Initialize the agent if an LLM is configured
    let agent = match &config.openai_api_key {
        Some(key) => {
            let llm = OpenAiProvider::new(
                key.clone(),
                config.openai_base_url.clone(),
                config.model.clone(),
                config.llm_timeout,
            )
            .map_err(|e| shuttle_runtime::Error::Custom(anyhow::Error::new(e)))?;
            tracing::info!("🧠 LLM provider initialized ({})", config.model);

            Some(Arc::new(AppAgentService::new(
                Arc::new(PgSessionRepository::new(pool.clone())),
                Arc::new(PgStudioRepository::new(pool.clone())),
                Arc::new(llm),
                tools.clone(),
                AgentSettings::from(&config),
            )))
        }
        None => {
            tracing::warn!("⚠️  No OPENAI_API_KEY set - agent endpoints disabled");
            None
        }
    };

    let router = build_router(AppState { agent, tools });

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Aperture API ready");

    Ok(router.into())
}
