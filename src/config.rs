// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Limites e credenciais do pipeline de scraping.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::Duration;
use thiserror::Error;

/// User agent padrão para fetches (navegador desktop, evita bloqueios simples)
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Erros de configuração inválida.
///
/// Esta é a única classe de erro (junto com tópico vazio) que o pipeline
/// propaga ao chamador; todas as falhas por fonte/rodada degradam
/// graciosamente.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Limite que precisa ser positivo foi configurado como zero.
    #[error("'{0}' must be greater than zero")]
    ZeroLimit(&'static str),

    /// Truncamento por fonte menor que o gate mínimo torna toda extração inútil.
    #[error("max_content_per_source ({max}) must be >= min_content_length ({min})")]
    TruncationBelowGate {
        /// Valor configurado de `max_content_per_source`
        max: usize,
        /// Valor configurado de `min_content_length`
        min: usize,
    },
}

/// Limites do pipeline de scraping.
///
/// Passada explicitamente ao [`TopicScraper`](crate::scraper::TopicScraper)
/// na construção, sem estado global de módulo.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Resultados pedidos ao provedor de busca por query. Padrão: 5
    pub max_results_per_query: usize,

    /// Máximo de fontes tentadas por rodada (não cumulativo). Padrão: 5
    pub max_sources_per_round: usize,

    /// Comprimento mínimo (chars) para marcar `content_fetched`. Padrão: 200
    pub min_content_length: usize,

    /// Truncamento por fonte antes do gate (chars). Padrão: 2000
    pub max_content_per_source: usize,

    /// Fontes bem-sucedidas exigidas para parar cedo. Padrão: 2
    pub min_successful_sources: usize,

    /// Total de conteúdo exigido para parar cedo (chars). Padrão: 1000
    pub min_total_content: usize,

    /// Budget global de conteúdo na agregação (chars). Padrão: 8000
    pub max_total_content: usize,

    /// Máximo de rodadas busca→filtro→extração. Padrão: 3
    pub max_rounds: usize,

    /// Mínimo de chars para uma extração contar como sucesso no extrator. Padrão: 100
    pub min_extract_length: usize,

    /// Pausa de cortesia após cada tentativa de extração. Padrão: 500ms
    pub politeness_delay: Duration,

    /// Timeout por chamada de busca. Padrão: 10s
    pub search_timeout: Duration,

    /// Timeout por fetch de página. Padrão: 15s
    pub fetch_timeout: Duration,

    /// User agent enviado nos fetches.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_results_per_query: 5,
            max_sources_per_round: 5,
            min_content_length: 200,
            max_content_per_source: 2000,
            min_successful_sources: 2,
            min_total_content: 1000,
            max_total_content: 8000,
            max_rounds: 3,
            min_extract_length: 100,
            politeness_delay: Duration::from_millis(500),
            search_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Cria configuração padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Valida os limites configurados.
    ///
    /// Rejeita zeros que tornariam o loop vazio ou infinito de propósito,
    /// e truncamento por fonte abaixo do gate mínimo.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroLimit("max_rounds"));
        }
        if self.max_sources_per_round == 0 {
            return Err(ConfigError::ZeroLimit("max_sources_per_round"));
        }
        if self.max_results_per_query == 0 {
            return Err(ConfigError::ZeroLimit("max_results_per_query"));
        }
        if self.max_content_per_source < self.min_content_length {
            return Err(ConfigError::TruncationBelowGate {
                max: self.max_content_per_source,
                min: self.min_content_length,
            });
        }
        Ok(())
    }
}

/// Lê um override numérico de uma variável de ambiente, se presente e válido.
fn env_usize(var: &str, target: &mut usize) {
    if let Ok(raw) = std::env::var(var) {
        if let Ok(value) = raw.parse::<usize>() {
            *target = value;
            log::info!("📦 {}={}", var, value);
        }
    }
}

/// Carrega a configuração do pipeline a partir das variáveis de ambiente.
///
/// Variáveis suportadas (todas opcionais, padrões documentados em
/// [`ScrapeConfig`]):
/// - `SCRAPER_MAX_RESULTS_PER_QUERY`
/// - `SCRAPER_MAX_SOURCES_PER_ROUND`
/// - `SCRAPER_MIN_CONTENT_LENGTH`
/// - `SCRAPER_MAX_CONTENT_PER_SOURCE`
/// - `SCRAPER_MIN_SUCCESSFUL_SOURCES`
/// - `SCRAPER_MIN_TOTAL_CONTENT`
/// - `SCRAPER_MAX_TOTAL_CONTENT`
/// - `SCRAPER_MAX_ROUNDS`
/// - `SCRAPER_POLITENESS_MS`
/// - `SCRAPER_FETCH_TIMEOUT_SECS`
pub fn load_scrape_config() -> ScrapeConfig {
    let mut config = ScrapeConfig::default();

    env_usize("SCRAPER_MAX_RESULTS_PER_QUERY", &mut config.max_results_per_query);
    env_usize("SCRAPER_MAX_SOURCES_PER_ROUND", &mut config.max_sources_per_round);
    env_usize("SCRAPER_MIN_CONTENT_LENGTH", &mut config.min_content_length);
    env_usize("SCRAPER_MAX_CONTENT_PER_SOURCE", &mut config.max_content_per_source);
    env_usize("SCRAPER_MIN_SUCCESSFUL_SOURCES", &mut config.min_successful_sources);
    env_usize("SCRAPER_MIN_TOTAL_CONTENT", &mut config.min_total_content);
    env_usize("SCRAPER_MAX_TOTAL_CONTENT", &mut config.max_total_content);
    env_usize("SCRAPER_MAX_ROUNDS", &mut config.max_rounds);

    if let Ok(raw) = std::env::var("SCRAPER_POLITENESS_MS") {
        if let Ok(ms) = raw.parse::<u64>() {
            config.politeness_delay = Duration::from_millis(ms);
            log::info!("📦 SCRAPER_POLITENESS_MS={}", ms);
        }
    }

    if let Ok(raw) = std::env::var("SCRAPER_FETCH_TIMEOUT_SECS") {
        if let Ok(secs) = raw.parse::<u64>() {
            if secs > 0 {
                config.fetch_timeout = Duration::from_secs(secs);
                log::info!("📦 SCRAPER_FETCH_TIMEOUT_SECS={}", secs);
            }
        }
    }

    config
}

/// Credenciais do provedor de busca (Google Custom Search).
///
/// Fornecidas fora do contrato do core, via ambiente.
#[derive(Debug, Clone)]
pub struct SearchCredentials {
    /// Chave da API (`GOOGLE_SEARCH_API_KEY`)
    pub api_key: String,
    /// Identificador do Custom Search Engine (`CSE_ID`)
    pub cse_id: String,
}

impl SearchCredentials {
    /// Carrega as credenciais do ambiente. `None` se alguma estiver ausente.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GOOGLE_SEARCH_API_KEY").ok()?;
        let cse_id = std::env::var("CSE_ID").ok()?;
        Some(Self { api_key, cse_id })
    }
}

/// Configuração do planner (LLM externo).
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Modelo usado para validação e geração do plano. Padrão: "gpt-4o-mini"
    pub model: String,
    /// Temperatura das gerações. Padrão: 0.3
    pub temperature: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
        }
    }
}

/// Carrega a configuração do planner do ambiente.
///
/// Variáveis suportadas:
/// - `LESSON_PLANNER_MODEL`: modelo do chat completions (padrão: "gpt-4o-mini")
pub fn load_planner_config() -> PlannerConfig {
    let mut config = PlannerConfig::default();

    if let Ok(model) = std::env::var("LESSON_PLANNER_MODEL") {
        if !model.trim().is_empty() {
            log::info!("📦 LESSON_PLANNER_MODEL={}", model);
            config.model = model;
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ScrapeConfig::default();
        assert_eq!(config.max_results_per_query, 5);
        assert_eq!(config.max_sources_per_round, 5);
        assert_eq!(config.min_content_length, 200);
        assert_eq!(config.max_content_per_source, 2000);
        assert_eq!(config.min_successful_sources, 2);
        assert_eq!(config.min_total_content, 1000);
        assert_eq!(config.max_total_content, 8000);
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.politeness_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(ScrapeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let mut config = ScrapeConfig::default();
        config.max_rounds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLimit("max_rounds"))
        ));
    }

    #[test]
    fn test_validate_rejects_truncation_below_gate() {
        let mut config = ScrapeConfig::default();
        config.max_content_per_source = 150;
        config.min_content_length = 200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TruncationBelowGate { max: 150, min: 200 })
        ));
    }

    #[test]
    fn test_planner_config_default() {
        let config = PlannerConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
    }
}
