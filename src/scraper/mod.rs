// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ROUND CONTROLLER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Orquestra ciclos repetidos de busca → filtro → extração, decidindo a
// cada rodada entre parar (conteúdo suficiente) e expandir as queries.
// Troca volume de chamadas ao provedor por suficiência de conteúdo,
// limitado por max_rounds para garantir terminação em qualquer tópico.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod state;

pub use state::{RoundPhase, RoundState};

use std::sync::Arc;

use thiserror::Error;

use crate::aggregate::aggregate;
use crate::config::{ConfigError, ScrapeConfig};
use crate::extract::TextExtractor;
use crate::filter::LinkFilter;
use crate::search::SearchClient;
use crate::types::{ScrapeBundle, SourceRecord, Url};
use crate::utils::truncate_chars;

/// Sufixo de ampliação aplicado a cada query quando uma rodada não
/// rende conteúdo suficiente.
const BROADENING_SUFFIX: &str = "educational resources";

/// Marcador anexado a conteúdo truncado por fonte.
const TRUNCATION_MARKER: &str = "... [content truncated]";

/// Erros de invocação do pipeline.
///
/// A única classe que chega ao chamador: falhas por fonte e por rodada
/// degradam para fontes falhadas/rodadas magras, nunca para `Err`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Nenhuma query não-vazia foi fornecida
    #[error("No non-empty queries were provided")]
    NoQueries,

    /// Configuração inválida
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Controlador do pipeline adaptativo de coleta.
///
/// Recebe os colaboradores como trait objects, o que permite rodar o
/// loop inteiro em testes com clientes fake, sem rede.
pub struct TopicScraper {
    search: Arc<dyn SearchClient>,
    extractor: Arc<dyn TextExtractor>,
    filter: LinkFilter,
    config: ScrapeConfig,
}

impl TopicScraper {
    /// Cria o controlador com o filtro de links padrão.
    pub fn new(
        search: Arc<dyn SearchClient>,
        extractor: Arc<dyn TextExtractor>,
        config: ScrapeConfig,
    ) -> Self {
        Self {
            search,
            extractor,
            filter: LinkFilter::new(),
            config,
        }
    }

    /// Substitui o filtro de links.
    pub fn with_filter(mut self, filter: LinkFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Conveniência: pesquisa um único tópico.
    pub async fn scrape_topic(&self, topic: &str) -> Result<ScrapeBundle, ScrapeError> {
        self.scrape(vec![topic.to_string()]).await
    }

    /// Executa o pipeline completo sobre um conjunto de queries.
    ///
    /// Sempre devolve um [`ScrapeBundle`]: rodadas esgotadas sem atingir
    /// os limiares não são erro; o déficit é comunicado pelo `summary` e
    /// pelos flags `content_fetched`. Só falha por queries vazias ou
    /// configuração inválida.
    pub async fn scrape(&self, queries: Vec<String>) -> Result<ScrapeBundle, ScrapeError> {
        self.config.validate()?;

        let queries: Vec<String> = queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if queries.is_empty() {
            return Err(ScrapeError::NoQueries);
        }

        let mut state = RoundState::new(queries);
        let mut phase = RoundPhase::Searching;
        let mut round_links: Vec<Url> = Vec::new();
        let mut filtered_links: Vec<Url> = Vec::new();

        while !phase.is_terminal() {
            phase = match phase {
                RoundPhase::Searching => {
                    round_links = self.search_phase(&mut state).await;
                    RoundPhase::Filtering
                }
                RoundPhase::Filtering => {
                    filtered_links = self.filter_phase(&mut state, &round_links);
                    RoundPhase::Extracting
                }
                RoundPhase::Extracting => {
                    self.extract_phase(&mut state, &filtered_links).await;
                    RoundPhase::Evaluating
                }
                RoundPhase::Evaluating => self.evaluate_phase(&state),
                RoundPhase::Expanding => {
                    Self::expand_phase(&mut state);
                    RoundPhase::Searching
                }
                RoundPhase::Done => RoundPhase::Done,
            };
        }

        let topic = state.queries.first().cloned().unwrap_or_default();
        Ok(aggregate(
            &topic,
            state.accumulated_sources,
            state.successful_count,
            state.total_content_length,
            self.config.max_total_content,
        ))
    }

    /// SEARCHING: uma busca por query ainda não usada nesta invocação.
    async fn search_phase(&self, state: &mut RoundState) -> Vec<Url> {
        log::info!(
            "🔍 [Rodada {}] Buscando conteúdo para queries: {:?}",
            state.round_index + 1,
            state.queries
        );

        let mut round_links = Vec::new();
        let queries = state.queries.clone();
        for query in queries {
            if state.used_queries.contains(&query) {
                continue;
            }
            let links = self
                .search
                .search(&query, self.config.max_results_per_query)
                .await;
            round_links.extend(links);
            state.used_queries.insert(query);
        }
        round_links
    }

    /// FILTERING: mescla os links novos e filtra o conjunto acumulado.
    fn filter_phase(&self, state: &mut RoundState, round_links: &[Url]) -> Vec<Url> {
        state.merge_links(round_links);
        let filtered = self.filter.filter(&state.all_links);
        log::info!("🔗 {} links válidos após filtragem", filtered.len());
        filtered
    }

    /// EXTRACTING: até `max_sources_per_round` tentativas novas nesta rodada.
    ///
    /// Toda tentativa vira um [`SourceRecord`]; URLs já tentadas em rodadas
    /// anteriores são puladas. Truncamento por fonte acontece ANTES do gate
    /// de comprimento mínimo.
    async fn extract_phase(&self, state: &mut RoundState, filtered_links: &[Url]) {
        let mut attempts = 0;

        for link in filtered_links {
            if attempts >= self.config.max_sources_per_round {
                break;
            }
            if state.attempted(link) {
                continue;
            }
            attempts += 1;

            log::info!(
                "📄 [{}/{}] Extraindo {}",
                attempts,
                self.config.max_sources_per_round,
                link
            );

            let raw = match self.extractor.extract_text(link).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("⚠️ Extração falhou para {}: {}", link, e);
                    String::new()
                }
            };

            let content = self.truncate_source(raw);
            let record = if content.len() >= self.config.min_content_length {
                SourceRecord::fetched(link.clone(), content)
            } else {
                SourceRecord::failed(link.clone())
            };
            state.record_source(record);

            // Pausa de cortesia com os sites de origem
            if !self.config.politeness_delay.is_zero() {
                tokio::time::sleep(self.config.politeness_delay).await;
            }
        }

        log::info!(
            "✅ [Rodada {}] {}/{} fontes bem-sucedidas, {} chars acumulados",
            state.round_index + 1,
            state.successful_count,
            state.accumulated_sources.len(),
            state.total_content_length
        );
    }

    /// EVALUATING: parar quando os limiares foram atingidos ou as rodadas
    /// se esgotaram; caso contrário, expandir.
    fn evaluate_phase(&self, state: &RoundState) -> RoundPhase {
        if state.successful_count >= self.config.min_successful_sources
            && state.total_content_length >= self.config.min_total_content
        {
            log::info!("🏁 Conteúdo suficiente, encerrando após a rodada {}", state.round_index + 1);
            return RoundPhase::Done;
        }

        if state.round_index + 1 >= self.config.max_rounds {
            log::info!("🏁 Limite de {} rodadas atingido", self.config.max_rounds);
            return RoundPhase::Done;
        }

        log::info!("⚠️ Conteúdo insuficiente, novas queries na próxima rodada");
        RoundPhase::Expanding
    }

    /// EXPANDING: amplia cada query com o sufixo educacional fixo.
    fn expand_phase(state: &mut RoundState) {
        state.queries = state
            .queries
            .iter()
            .map(|q| format!("{} {}", q, BROADENING_SUFFIX))
            .collect();
        state.round_index += 1;
    }

    /// Trunca o conteúdo de uma fonte ao máximo configurado, anexando o marcador.
    fn truncate_source(&self, raw: String) -> String {
        if raw.len() > self.config.max_content_per_source {
            let mut truncated =
                truncate_chars(&raw, self.config.max_content_per_source).to_string();
            truncated.push_str(TRUNCATION_MARKER);
            log::debug!(
                "Conteúdo truncado para {} chars",
                self.config.max_content_per_source
            );
            truncated
        } else {
            raw
        }
    }
}
