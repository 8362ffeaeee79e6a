// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER - API de planos de aula
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Servidor HTTP que orquestra validar → coletar → planejar.
//!
//! ## Endpoints
//!
//! - `GET /` - Informações da API
//! - `GET /health` - Health check
//! - `POST /create-lesson-plan` - Gera um plano de aula para um tópico
//!
//! ## Uso
//!
//! ```bash
//! cargo run --features server -- --server --port=8000
//! cargo run --features server -- --server --port=8000 --secret=minha-chave
//! ```

#[allow(missing_docs)]
pub mod types;
#[allow(missing_docs)]
pub mod handlers;
mod auth;

use std::net::SocketAddr;
use std::sync::Arc;

pub use types::*;

use crate::config::{PlannerConfig, ScrapeConfig, SearchCredentials};

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Limites do pipeline de scraping
    pub scrape_config: ScrapeConfig,
    /// Configuração do planner
    pub planner_config: PlannerConfig,
    /// Credenciais do provedor de busca
    pub search_credentials: SearchCredentials,
    /// Chave da API OpenAI (validador + planner)
    pub openai_key: String,
    /// Token de autenticação opcional (Bearer)
    pub secret: Option<String>,
}

/// Inicia o servidor HTTP no endereço especificado.
///
/// Entry point chamado de main.rs quando `--server` é passado.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    use axum::{middleware, routing::{get, post}, Router};
    use tower_http::cors::CorsLayer;

    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/create-lesson-plan", post(handlers::create_lesson_plan));

    // Auth middleware condicional
    let routes = if state.secret.is_some() {
        routes.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
    } else {
        routes
    };

    // CORS + state → Router<()> (pronto para serve)
    let app = routes
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("LessonScout server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
