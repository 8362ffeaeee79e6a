// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PLANNER - VALIDAÇÃO DE TÓPICO E GERAÇÃO DE PLANO DE AULA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Colaborador externo do pipeline: recebe o ScrapeBundle agregado e
// devolve um plano estruturado. O core de scraping nunca chama este
// módulo; a orquestração validar → coletar → planejar fica no CLI/server.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::types::{LessonPlan, ScrapeBundle};
use crate::utils::truncate_chars;

/// Erros do planner.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Falha de transporte
    #[error("Network error: {0}")]
    NetworkError(String),

    /// API respondeu com erro
    #[error("Planner API error: {0}")]
    ApiError(String),

    /// Resposta em formato inesperado
    #[error("Invalid planner response: {0}")]
    ParseError(String),
}

/// Veredito da validação de tópico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicValidation {
    /// Tópico educacional aceito (query limpa devolvida pelo validador)
    Valid(String),
    /// Tópico rejeitado, com o motivo
    Invalid(String),
}

/// Trait para o colaborador de planejamento (LLM externo).
#[async_trait]
pub trait PlanClient: Send + Sync {
    /// Decide se uma query é um tópico educacional válido.
    async fn validate_topic(&self, query: &str) -> Result<TopicValidation, PlanError>;

    /// Gera um plano de aula estruturado a partir do bundle coletado.
    async fn generate_plan(&self, bundle: &ScrapeBundle) -> Result<LessonPlan, PlanError>;
}

/// Instruções do validador: protocolo VALID:/INVALID: em uma linha.
const VALIDATOR_INSTRUCTIONS: &str = r#"You are an input validation assistant for an educational lesson planning tool.
Your job is to determine if a user query is a valid educational topic or question.

- If the query is clearly educational (e.g., a school subject, concept, or topic), respond with:
  VALID: <repeat the query>
- If the query is not educational, inappropriate, or irrelevant, respond with:
  INVALID: <short reason why>

Only allow queries that are suitable for generating lesson plans for students or teachers."#;

/// Instruções do gerador de plano: JSON estrito com os campos do LessonPlan.
const PLANNER_INSTRUCTIONS: &str = r#"You are an expert education assistant. You will be given a topic summary and multiple pieces of scraped content from different websites.

Your job is to create a complete lesson plan using that content. Respond with a single JSON object with exactly these fields:

- topic: The name of the topic.
- grade_level: The intended grade level (extract or guess from context).
- duration_minutes: Estimated total time required to complete the lesson (integer).
- learning_objectives: 3-5 objectives that students should achieve.
- materials_needed: List of materials needed to teach the topic.
- lesson_overview: A list of subtopics, each with "title", "duration_minutes" (integer) and "description".
- exercises: 2-4 classroom exercises.
- assessment: 2-4 questions to assess student understanding.
- urls: All source URLs used (from the provided content).

Use only the given summary and source content to generate your answer. Output nothing but the JSON object."#;

/// Monta o prompt do planner a partir do bundle.
///
/// Mantém o prompt enxuto para não estourar o contexto: resumo, as duas
/// primeiras fontes bem-sucedidas truncadas a 1000 chars e até três URLs.
pub fn build_plan_prompt(bundle: &ScrapeBundle) -> String {
    let mut prompt = format!(
        "Create a lesson plan for: {}\n\nSummary: {}\n\nKey information from sources:\n",
        bundle.topic, bundle.summary
    );

    for (i, source) in bundle.fetched_sources().take(2).enumerate() {
        prompt.push_str(&format!(
            "\nSource {}: {}\n",
            i + 1,
            truncate_chars(&source.content, 1000)
        ));
    }

    let urls: Vec<&str> = bundle
        .fetched_sources()
        .take(3)
        .map(|s| s.url.as_str())
        .collect();
    prompt.push_str(&format!("\nSource URLs: {}", urls.join(", ")));

    prompt
}

/// Interpreta a resposta do validador segundo o protocolo VALID:/INVALID:.
pub fn parse_validation(response: &str) -> Result<TopicValidation, PlanError> {
    let trimmed = response.trim();
    if let Some(rest) = trimmed.strip_prefix("VALID:") {
        Ok(TopicValidation::Valid(rest.trim().to_string()))
    } else if let Some(rest) = trimmed.strip_prefix("INVALID:") {
        Ok(TopicValidation::Invalid(rest.trim().to_string()))
    } else {
        Err(PlanError::ParseError(format!(
            "unexpected validator response: {}",
            truncate_chars(trimmed, 120)
        )))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO OPENAI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Planner sobre a API de chat completions da OpenAI.
pub struct OpenAiPlanner {
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiPlanner {
    /// Cria o planner com o modelo padrão.
    pub fn new(api_key: String) -> Self {
        Self::from_config(api_key, &PlannerConfig::default())
    }

    /// Cria o planner a partir de uma configuração explícita.
    pub fn from_config(api_key: String, config: &PlannerConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Uma chamada de chat completion, devolvendo o content da primeira choice.
    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, PlanError> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Serialize)]
        struct ChatMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatResponseMessage,
        }

        #[derive(Deserialize)]
        struct ChatResponseMessage {
            content: String,
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PlanError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlanError::ApiError(error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| PlanError::ParseError(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PlanError::ParseError("empty choices".into()))
    }
}

#[async_trait]
impl PlanClient for OpenAiPlanner {
    async fn validate_topic(&self, query: &str) -> Result<TopicValidation, PlanError> {
        let response = self.chat(VALIDATOR_INSTRUCTIONS, query, 200).await?;
        log::info!("🛡️ Validação do tópico: {}", response.trim());
        parse_validation(&response)
    }

    async fn generate_plan(&self, bundle: &ScrapeBundle) -> Result<LessonPlan, PlanError> {
        let prompt = build_plan_prompt(bundle);
        let response = self.chat(PLANNER_INSTRUCTIONS, &prompt, 4000).await?;

        // Alguns modelos embrulham o JSON em cerca de código
        let json = response
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        serde_json::from_str(json).map_err(|e| PlanError::ParseError(e.to_string()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Planner mock para testes unitários.
#[derive(Debug, Default)]
pub struct MockPlanner {
    /// Motivo de rejeição; `None` valida qualquer tópico
    pub reject_with: Option<String>,
}

impl MockPlanner {
    /// Mock que aceita qualquer tópico.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock que rejeita todo tópico com o motivo dado.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject_with: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl PlanClient for MockPlanner {
    async fn validate_topic(&self, query: &str) -> Result<TopicValidation, PlanError> {
        match &self.reject_with {
            Some(reason) => Ok(TopicValidation::Invalid(reason.clone())),
            None => Ok(TopicValidation::Valid(query.to_string())),
        }
    }

    async fn generate_plan(&self, bundle: &ScrapeBundle) -> Result<LessonPlan, PlanError> {
        Ok(LessonPlan {
            topic: bundle.topic.clone(),
            grade_level: "6th grade".into(),
            duration_minutes: 45,
            learning_objectives: vec!["Mock objective".into()],
            materials_needed: vec!["Whiteboard".into()],
            lesson_overview: vec![],
            exercises: vec!["Mock exercise".into()],
            assessment: vec!["Mock question".into()],
            urls: bundle.fetched_sources().map(|s| s.url.clone()).collect(),
        })
    }
}
