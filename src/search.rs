// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DE BUSCA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para busca web de conteúdo educacional.
// Provedor real: Google Custom Search JSON API.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SearchCredentials;
use crate::types::Url;

/// A API do Custom Search aceita no máximo 10 resultados por chamada.
const CSE_MAX_RESULTS: usize = 10;

/// Erros do cliente de busca.
///
/// Nunca atravessam a trait [`SearchClient`]: toda falha é absorvida e
/// convertida em lista vazia para que o pipeline continue com zero
/// resultados para a query afetada.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Falha de transporte (conexão, timeout, DNS)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provedor respondeu com status de erro
    #[error("Search API error: HTTP {0}")]
    ApiError(u16),

    /// Resposta do provedor não pôde ser decodificada
    #[error("Invalid search response: {0}")]
    ParseError(String),
}

/// Trait principal para clientes de busca.
///
/// O contrato degrada em vez de falhar: qualquer erro do provedor vira
/// uma lista vazia, nunca um `Err`; o Round Controller decide o que
/// fazer com rodadas magras.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Executa uma busca e retorna as URLs candidatas, na ordem do provedor.
    async fn search(&self, query: &str, max_results: usize) -> Vec<Url>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO GOOGLE CUSTOM SEARCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct CseItem {
    link: String,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

/// Cliente para a Google Custom Search JSON API.
pub struct GoogleCseClient {
    credentials: SearchCredentials,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleCseClient {
    /// Cria um cliente com timeout padrão de 10s.
    pub fn new(credentials: SearchCredentials) -> Self {
        Self::with_timeout(credentials, std::time::Duration::from_secs(10))
    }

    /// Cria um cliente com timeout de requisição customizado.
    pub fn with_timeout(credentials: SearchCredentials, timeout: std::time::Duration) -> Self {
        Self {
            credentials,
            endpoint: "https://www.googleapis.com/customsearch/v1".into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Caminho falível interno; a trait absorve os erros daqui.
    async fn try_search(&self, query: &str, max_results: usize) -> Result<Vec<Url>, SearchError> {
        let num = max_results.min(CSE_MAX_RESULTS).to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError(response.status().as_u16()));
        }

        let body: CseResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        Ok(body.items.into_iter().map(|item| item.link).collect())
    }
}

#[async_trait]
impl SearchClient for GoogleCseClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<Url> {
        match self.try_search(query, max_results).await {
            Ok(links) => {
                log::info!("🔎 {} resultados para \"{}\"", links.len(), query);
                links
            }
            Err(e) => {
                // Falha do provedor vira "nenhum resultado para esta query"
                log::warn!("⚠️ Busca falhou para \"{}\": {}", query, e);
                Vec::new()
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO ESTÁTICA PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente de busca com resultados fixos, para testes sem rede.
///
/// Registra cada query recebida, permitindo verificar que o Round
/// Controller nunca repete uma busca.
#[derive(Debug, Default)]
pub struct StaticSearchClient {
    results: std::collections::HashMap<String, Vec<Url>>,
    calls: std::sync::Mutex<Vec<String>>,
}

impl StaticSearchClient {
    /// Cria um cliente que devolve lista vazia para qualquer query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define os resultados devolvidos para uma query específica.
    pub fn with_results(mut self, query: &str, links: Vec<Url>) -> Self {
        self.results.insert(query.to_string(), links);
        self
    }

    /// Queries recebidas até agora, na ordem de chegada.
    pub fn recorded_queries(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait]
impl SearchClient for StaticSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<Url> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(query.to_string());

        let mut links = self.results.get(query).cloned().unwrap_or_default();
        links.truncate(max_results);
        links
    }
}
