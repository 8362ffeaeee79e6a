//! # Lesson Scout
//!
//! Este crate implementa o **LessonScout**, um pipeline adaptativo que coleta
//! conteúdo educacional da web sobre um tópico e o empacota em um bundle
//! limitado e com controle de qualidade, pronto para sumarização ou geração
//! de planos de aula.
//!
//! ## Como funciona?
//!
//! Imagine um assistente de preparação de aulas que:
//! 1. Recebe um tópico (ex: "photosynthesis for grade 6")
//! 2. Busca fontes candidatas em um provedor de busca
//! 3. Filtra e prioriza fontes educacionais confiáveis
//! 4. Extrai o texto principal de cada página, com fallback
//! 5. Repete com queries mais amplas até ter conteúdo suficiente
//! 6. Agrega tudo dentro de um budget global de caracteres
//!
//! ## Arquitetura Principal
//!
//! ### 1. Round Controller (`scraper`)
//! O coração do sistema: uma máquina de estados explícita
//! (`Searching → Filtering → Extracting → Evaluating → Expanding | Done`)
//! que decide a cada rodada entre parar e ampliar as queries, limitada por
//! `max_rounds` para garantir terminação.
//!
//! ### 2. Extração em duas camadas (`extract`)
//! Readability (algoritmo do Firefox Reader Mode) como estratégia primária
//! e strip de HTML cru como fallback; sites arbitrários quebram qualquer
//! estratégia única.
//!
//! ### 3. Degradação graciosa
//! Falhas de provedor viram "nenhum resultado"; conteúdo raso vira fonte
//! falhada; rodadas esgotadas viram um bundle best-effort com resumo de
//! insuficiência. O chamador sempre recebe um [`ScrapeBundle`].
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use lesson_scout::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = SearchCredentials::from_env().expect("credenciais de busca");
//!     let config = load_scrape_config();
//!     let search = Arc::new(GoogleCseClient::new(credentials));
//!     let extractor = Arc::new(ExtractionPipeline::from_config(&config));
//!
//!     let scraper = TopicScraper::new(search, extractor, config);
//!     let bundle = scraper.scrape_topic("photosynthesis for grade 6").await.unwrap();
//!     println!("{}", bundle.summary);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// Este módulo define as estruturas de dados básicas como:
/// - [`SourceRecord`](types::SourceRecord): fonte tentada e seu resultado
/// - [`ScrapeBundle`](types::ScrapeBundle): pacote final do pipeline
/// - [`LessonPlan`](types::LessonPlan): plano de aula do consumidor downstream
pub mod types;

/// Configuração explícita do pipeline.
///
/// Limites documentados com defaults ([`ScrapeConfig`](config::ScrapeConfig)),
/// credenciais do provedor de busca e configuração do planner, todos
/// carregáveis de variáveis de ambiente, sem estado global de módulo.
pub mod config;

/// Clientes para busca web.
///
/// Define a trait `SearchClient` e implementações para:
/// - Google Custom Search JSON API
/// - Cliente estático para testes
///
/// Falhas do provedor são absorvidas e viram lista vazia.
pub mod search;

/// Filtro determinístico de links candidatos.
///
/// Valida estrutura de URL, descarta domínios blacklisted, deduplica e
/// prioriza fontes educacionais confiáveis.
pub mod filter;

/// Extração de texto em duas camadas (Readability → strip cru).
///
/// Define a trait `TextExtractor`, as duas estratégias concretas e o
/// `ExtractionPipeline` que as compõe em ordem fixa.
pub mod extract;

/// Round Controller: o loop adaptativo busca → filtro → extração.
///
/// Máquina de estados explícita sobre `RoundState`, com os colaboradores
/// injetados como trait objects para testes sem rede.
pub mod scraper;

/// Agregação final com budget global de conteúdo.
pub mod aggregate;

/// Colaborador externo de planejamento (validação de tópico + plano de aula).
///
/// Define a trait `PlanClient` e implementações para:
/// - OpenAI chat completions
/// - Mock para testes
pub mod planner;

/// Utilitários de texto compartilhados.
pub mod utils;

/// Servidor HTTP (feature `server`).
///
/// Expõe `POST /create-lesson-plan` orquestrando validar → coletar →
/// planejar, com CORS permissivo e Bearer token opcional.
#[cfg(feature = "server")]
pub mod server;

// Re-exports principais
pub use aggregate::aggregate;
pub use config::{
    load_planner_config, load_scrape_config, ConfigError, PlannerConfig, ScrapeConfig,
    SearchCredentials,
};
pub use extract::{ExtractionPipeline, RawHtmlExtractor, ReadabilityExtractor, TextExtractor};
pub use filter::LinkFilter;
pub use planner::{MockPlanner, OpenAiPlanner, PlanClient, TopicValidation};
pub use scraper::{RoundPhase, RoundState, ScrapeError, TopicScraper};
pub use search::{GoogleCseClient, SearchClient, StaticSearchClient};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use lesson_scout::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{
        load_planner_config, load_scrape_config, PlannerConfig, ScrapeConfig, SearchCredentials,
    };
    pub use crate::extract::{ExtractionPipeline, TextExtractor};
    pub use crate::filter::LinkFilter;
    pub use crate::planner::{OpenAiPlanner, PlanClient, TopicValidation};
    pub use crate::scraper::{RoundPhase, RoundState, ScrapeError, TopicScraper};
    pub use crate::search::{GoogleCseClient, SearchClient};
    pub use crate::types::*;
}
