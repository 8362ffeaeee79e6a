// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Tipo de URL (alias para String)
pub type Url = String;

/// Resultado da tentativa de extração de uma fonte.
///
/// Imutável após a criação: use [`SourceRecord::fetched`] ou
/// [`SourceRecord::failed`]. O invariante `content` vazio quando
/// `content_fetched == false` é garantido pelos construtores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// URL da fonte
    pub url: Url,
    /// Se o conteúdo foi extraído com sucesso
    pub content_fetched: bool,
    /// Texto extraído (vazio quando a extração falhou)
    pub content: String,
}

impl SourceRecord {
    /// Cria um registro de extração bem-sucedida.
    pub fn fetched(url: impl Into<Url>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_fetched: true,
            content: content.into(),
        }
    }

    /// Cria um registro de extração falhada (conteúdo sempre vazio).
    pub fn failed(url: impl Into<Url>) -> Self {
        Self {
            url: url.into(),
            content_fetched: false,
            content: String::new(),
        }
    }
}

/// Pacote final produzido pelo pipeline de scraping.
///
/// Criado uma única vez pelo agregador e repassado intacto ao consumidor
/// (gerador de plano de aula, API, CLI).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeBundle {
    /// Tópico pesquisado (primeira query da rodada final)
    pub topic: String,
    /// Resumo textual do resultado da coleta
    pub summary: String,
    /// Todas as fontes tentadas, na ordem de tentativa
    pub sources: Vec<SourceRecord>,
}

impl ScrapeBundle {
    /// Fontes cujo conteúdo foi extraído com sucesso, na ordem original.
    pub fn fetched_sources(&self) -> impl Iterator<Item = &SourceRecord> + '_ {
        self.sources.iter().filter(|s| s.content_fetched)
    }

    /// Número de fontes com `content_fetched == true`.
    pub fn successful_count(&self) -> usize {
        self.fetched_sources().count()
    }
}

/// Subtópico dentro de um plano de aula
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonTopic {
    /// Título do subtópico
    pub title: String,
    /// Tempo estimado em minutos
    pub duration_minutes: u32,
    /// Breve descrição
    pub description: String,
}

/// Plano de aula estruturado, produzido pelo planner (LLM externo).
///
/// O core de scraping trata este objeto como opaco: ele é apenas
/// deserializado da resposta do planner e repassado ao chamador.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct LessonPlan {
    pub topic: String,
    pub grade_level: String,
    pub duration_minutes: u32,
    pub learning_objectives: Vec<String>,
    pub materials_needed: Vec<String>,
    pub lesson_overview: Vec<LessonTopic>,
    pub exercises: Vec<String>,
    pub assessment: Vec<String>,
    pub urls: Vec<String>,
}
