// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTADOS DA RODADA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;

use crate::types::{SourceRecord, Url};

/// Fase da máquina de estados do Round Controller.
///
/// Transições explícitas garantem que o loop só pode estar em uma fase
/// válida; pattern matching exaustivo força o tratamento de todos os casos.
///
/// ```text
/// Searching → Filtering → Extracting → Evaluating → (Expanding → Searching) | Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Buscando links para as queries ainda não usadas
    Searching,
    /// Mesclando e filtrando os links acumulados
    Filtering,
    /// Extraindo conteúdo das fontes da rodada
    Extracting,
    /// Decidindo entre parar e expandir
    Evaluating,
    /// Derivando novas queries mais amplas
    Expanding,
    /// Estado terminal: resultado vai para o agregador
    Done,
}

impl RoundPhase {
    /// Verifica se a fase é terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundPhase::Done)
    }

    /// Verifica se uma transição é válida.
    pub fn can_transition_to(&self, target: RoundPhase) -> bool {
        matches!(
            (self, target),
            (RoundPhase::Searching, RoundPhase::Filtering)
                | (RoundPhase::Filtering, RoundPhase::Extracting)
                | (RoundPhase::Extracting, RoundPhase::Evaluating)
                | (RoundPhase::Evaluating, RoundPhase::Expanding)
                | (RoundPhase::Evaluating, RoundPhase::Done)
                | (RoundPhase::Expanding, RoundPhase::Searching)
        )
    }
}

/// Estado acumulado de uma invocação do pipeline.
///
/// Valor simples, exclusivo do Round Controller durante uma invocação e
/// descartado após a agregação. Threading explícito pelas transições
/// permite testar cada fase sem rede.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Queries da rodada atual
    pub queries: Vec<String>,
    /// Queries já enviadas ao provedor (nunca repetidas na invocação)
    pub used_queries: HashSet<String>,
    /// Todos os links vistos, sem duplicatas, ordem de primeira ocorrência
    pub all_links: Vec<Url>,
    /// Toda fonte tentada, bem-sucedida ou não, na ordem de tentativa
    pub accumulated_sources: Vec<SourceRecord>,
    /// Quantas fontes têm `content_fetched == true`
    pub successful_count: usize,
    /// Soma dos comprimentos de conteúdo das fontes bem-sucedidas
    pub total_content_length: usize,
    /// Índice da rodada atual (0-based, estritamente crescente)
    pub round_index: usize,
}

impl RoundState {
    /// Cria o estado inicial para um conjunto de queries.
    pub fn new(queries: Vec<String>) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    /// Mescla links novos em `all_links`, preservando a primeira ocorrência.
    pub fn merge_links(&mut self, new_links: &[Url]) {
        for link in new_links {
            if !self.all_links.iter().any(|l| l == link) {
                self.all_links.push(link.clone());
            }
        }
    }

    /// Registra uma tentativa de fonte, mantendo os contadores consistentes.
    pub fn record_source(&mut self, record: SourceRecord) {
        if record.content_fetched {
            self.successful_count += 1;
            self.total_content_length += record.content.len();
        }
        self.accumulated_sources.push(record);
    }

    /// Verifica se uma URL já foi tentada em alguma rodada.
    pub fn attempted(&self, url: &str) -> bool {
        self.accumulated_sources.iter().any(|s| s.url == url)
    }
}
