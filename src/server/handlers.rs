// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::*;
use super::AppState;
use crate::extract::ExtractionPipeline;
use crate::planner::{OpenAiPlanner, PlanClient, TopicValidation};
use crate::scraper::TopicScraper;
use crate::search::GoogleCseClient;

// ── GET / ───────────────────────────────────────

/// Informações da API
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Lesson Scout API",
        "version": crate::VERSION,
        "endpoints": {
            "POST /create-lesson-plan": "Create a lesson plan for a given topic",
            "GET /health": "Health check endpoint"
        }
    }))
}

// ── GET /health ─────────────────────────────────

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Lesson Scout is running"
    }))
}

// ── POST /create-lesson-plan ────────────────────

/// Endpoint principal: valida o tópico, coleta conteúdo e gera o plano.
pub async fn create_lesson_plan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LessonPlanRequest>,
) -> Response {
    // Tópico vazio é o único erro de invocação que vira status HTTP
    if body.topic.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "The \"topic\" parameter is required and must not be empty.",
        );
    }

    let query = build_query(&body.topic, body.grade_level.as_deref());
    log::info!("🎯 Pedido de plano de aula: {}", query);

    let planner = OpenAiPlanner::from_config(state.openai_key.clone(), &state.planner_config);

    // 1. Validar que o tópico é educacional
    let query = match planner.validate_topic(&query).await {
        Ok(TopicValidation::Valid(cleaned)) => cleaned,
        Ok(TopicValidation::Invalid(reason)) => {
            return Json(LessonPlanResponse::failure(
                format!("INVALID: {}", reason),
                "Query is not educational.".into(),
            ))
            .into_response();
        }
        Err(e) => {
            return Json(LessonPlanResponse::failure(
                e.to_string(),
                "Could not validate query.".into(),
            ))
            .into_response();
        }
    };

    // 2. Coletar conteúdo educacional da web
    let search = Arc::new(GoogleCseClient::with_timeout(
        state.search_credentials.clone(),
        state.scrape_config.search_timeout,
    ));
    let extractor = Arc::new(ExtractionPipeline::from_config(&state.scrape_config));
    let scraper = TopicScraper::new(search, extractor, state.scrape_config.clone());

    let bundle = match scraper.scrape_topic(&query).await {
        Ok(bundle) => bundle,
        Err(e) => {
            // Só queries vazias/config inválida chegam aqui
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    log::info!(
        "📚 Coleta concluída: {} fontes ({} com conteúdo)",
        bundle.sources.len(),
        bundle.successful_count()
    );

    // 3. Gerar o plano de aula a partir do bundle
    match planner.generate_plan(&bundle).await {
        Ok(plan) => Json(LessonPlanResponse::ok(
            plan,
            format!("Successfully created lesson plan for '{}'", body.topic),
        ))
        .into_response(),
        Err(e) => Json(LessonPlanResponse::failure(
            e.to_string(),
            format!("Failed to create lesson plan for '{}'", body.topic),
        ))
        .into_response(),
    }
}

// ── Helpers ─────────────────────────────────────

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: ApiErrorDetail {
                message: message.into(),
                error_type: "invalid_request_error".into(),
                code: None,
            },
        }),
    )
        .into_response()
}
