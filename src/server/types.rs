// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::types::LessonPlan;

// ─────────────────────────────────────────────────
// Lesson Plan Request / Response
// ─────────────────────────────────────────────────

/// Request para POST /create-lesson-plan
#[derive(Debug, Clone, Deserialize)]
pub struct LessonPlanRequest {
    /// Tópico educacional para o plano de aula
    pub topic: String,
    /// Nível/série opcional (ex: "6th grade")
    #[serde(default)]
    pub grade_level: Option<String>,
}

/// Resposta de POST /create-lesson-plan
#[derive(Debug, Clone, Serialize)]
pub struct LessonPlanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_plan: Option<LessonPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl LessonPlanResponse {
    /// Resposta de sucesso com o plano gerado.
    pub fn ok(plan: LessonPlan, message: String) -> Self {
        Self {
            success: true,
            lesson_plan: Some(plan),
            error: None,
            message,
        }
    }

    /// Resposta de falha com erro e mensagem.
    pub fn failure(error: String, message: String) -> Self {
        Self {
            success: false,
            lesson_plan: None,
            error: Some(error),
            message,
        }
    }
}

// ─────────────────────────────────────────────────
// Error Response
// ─────────────────────────────────────────────────

/// Resposta de erro da API
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// Detalhes do erro
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: Option<String>,
}

// ─────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────

/// Monta a query de busca a partir do tópico e do nível opcional.
pub fn build_query(topic: &str, grade_level: Option<&str>) -> String {
    match grade_level {
        Some(grade) if !grade.trim().is_empty() => {
            format!("{} for {}", topic.trim(), grade.trim())
        }
        _ => topic.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_with_grade() {
        assert_eq!(
            build_query("photosynthesis", Some("grade 6")),
            "photosynthesis for grade 6"
        );
    }

    #[test]
    fn test_build_query_without_grade() {
        assert_eq!(build_query("  photosynthesis ", None), "photosynthesis");
        assert_eq!(build_query("photosynthesis", Some("  ")), "photosynthesis");
    }

    #[test]
    fn test_failure_response_serialization() {
        let response = LessonPlanResponse::failure(
            "INVALID: not educational".into(),
            "Query is not educational.".into(),
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        // lesson_plan ausente não deve aparecer
        assert!(!json.contains("lesson_plan"));
    }
}
