// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRAÇÃO DE CONTEÚDO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Duas estratégias de extração de texto, tentadas em ordem fixa:
// 1. Readability (algoritmo do Firefox Reader Mode) + html2text
// 2. Fetch cru + remoção de script/style + strip de tags
//
// Extração de estratégia única falha de forma imprevisível no markup
// heterogêneo de sites arbitrários; o fallback troca fidelidade por
// disponibilidade.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::ScrapeConfig;
use crate::utils::collapse_whitespace;

/// Blocos de script/style são removidos inteiros antes do strip de tags.
static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());

/// Erros de extração de conteúdo.
///
/// Nunca chegam ao chamador do pipeline: o Round Controller rebaixa
/// qualquer `Err` para string vazia e registra a fonte como falhada.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// URL não parseável (o Readability precisa da URL base)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Falha de transporte no fetch
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Servidor respondeu com status de erro
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// O parser de readability rejeitou o documento
    #[error("Readability failed: {0}")]
    ReadabilityError(String),

    /// Texto extraído abaixo do mínimo configurado
    #[error("Extracted text too short: {len} chars (min: {min})")]
    TooShort {
        /// Comprimento extraído
        len: usize,
        /// Mínimo exigido
        min: usize,
    },
}

/// Capacidade de extrair texto legível de uma URL.
///
/// As duas estratégias concretas implementam esta trait, assim como o
/// [`ExtractionPipeline`] que as compõe, o que permite testar cada
/// estratégia isoladamente e injetar fakes no Round Controller.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Busca a página e devolve o texto principal, já normalizado.
    async fn extract_text(&self, url: &str) -> Result<String, ExtractError>;
}

/// Baixa o HTML de uma página com timeout e user agent configurados.
async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .header("User-Agent", user_agent)
        .send()
        .await
        .map_err(|e| ExtractError::NetworkError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ExtractError::HttpStatus(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| ExtractError::NetworkError(e.to_string()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTRATÉGIA PRIMÁRIA: READABILITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extração via Mozilla Readability (mesmo algoritmo do Firefox Reader Mode).
///
/// Identifica o conteúdo principal da página removendo navegação, anúncios
/// e sidebars; o HTML limpo resultante é convertido para texto com html2text.
pub struct ReadabilityExtractor {
    client: reqwest::Client,
    user_agent: String,
}

impl ReadabilityExtractor {
    /// Cria o extrator a partir da configuração do pipeline.
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.fetch_timeout)
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl TextExtractor for ReadabilityExtractor {
    async fn extract_text(&self, url: &str) -> Result<String, ExtractError> {
        let base_url =
            url::Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;

        let html = fetch_html(&self.client, url, &self.user_agent).await?;

        let product = readability::extractor::extract(&mut html.as_bytes(), &base_url)
            .map_err(|e| ExtractError::ReadabilityError(e.to_string()))?;

        // Readability devolve HTML limpo; converter para texto puro
        let text = html2text::from_read(product.content.as_bytes(), 120);
        let cleaned = collapse_whitespace(&text);

        log::debug!("📖 Readability extraiu {} chars de {}", cleaned.len(), url);
        Ok(cleaned)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTRATÉGIA FALLBACK: FETCH CRU + STRIP DE TAGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fallback de disponibilidade: baixa o HTML cru e remove a marcação.
///
/// Sem heurística de conteúdo principal: tudo que for texto visível entra,
/// inclusive navegação. Usado apenas quando o Readability falha.
pub struct RawHtmlExtractor {
    client: reqwest::Client,
    user_agent: String,
}

impl RawHtmlExtractor {
    /// Cria o extrator a partir da configuração do pipeline.
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.fetch_timeout)
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl TextExtractor for RawHtmlExtractor {
    async fn extract_text(&self, url: &str) -> Result<String, ExtractError> {
        let html = fetch_html(&self.client, url, &self.user_agent).await?;
        let text = strip_html(&html);
        log::debug!("🧹 Fallback extraiu {} chars de {}", text.len(), url);
        Ok(text)
    }
}

/// Remove script/style, tags e entidades comuns, colapsando whitespace.
pub fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");

    let stripped = strip_tags(&without_styles);
    let decoded = decode_entities(&stripped);

    collapse_whitespace(&decoded)
}

/// Máquina de estados simples: descarta tudo entre `<` e `>`, inserindo
/// espaço no lugar de cada tag para não colar palavras adjacentes.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len() / 2);
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Decodifica as entidades HTML mais comuns.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PIPELINE DE EXTRAÇÃO (PRIMÁRIA → FALLBACK)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compõe as duas estratégias em ordem fixa.
///
/// Regras:
/// - Sucesso da primária com texto curto demais é FALHA de extração,
///   sem acionar o fallback (conteúdo raso não melhora com strip cru).
/// - O fallback roda somente quando a primária retorna `Err`.
/// - O texto do fallback passa pelo mesmo gate de comprimento mínimo.
pub struct ExtractionPipeline {
    primary: Box<dyn TextExtractor>,
    fallback: Box<dyn TextExtractor>,
    min_chars: usize,
}

impl ExtractionPipeline {
    /// Compõe duas estratégias arbitrárias (útil para testes).
    pub fn new(
        primary: Box<dyn TextExtractor>,
        fallback: Box<dyn TextExtractor>,
        min_chars: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            min_chars,
        }
    }

    /// Monta o pipeline real: Readability com fallback de strip cru.
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(
            Box::new(ReadabilityExtractor::from_config(config)),
            Box::new(RawHtmlExtractor::from_config(config)),
            config.min_extract_length,
        )
    }

    fn gate(&self, text: String) -> Result<String, ExtractError> {
        if text.len() < self.min_chars {
            Err(ExtractError::TooShort {
                len: text.len(),
                min: self.min_chars,
            })
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl TextExtractor for ExtractionPipeline {
    async fn extract_text(&self, url: &str) -> Result<String, ExtractError> {
        match self.primary.extract_text(url).await {
            Ok(text) => self.gate(text),
            Err(primary_err) => {
                log::warn!("⚠️ Extração primária falhou para {}: {}", url, primary_err);
                let text = self.fallback.extract_text(url).await?;
                self.gate(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Extrator fake com resultado fixo e contador de chamadas.
    struct FakeExtractor {
        output: Result<String, ()>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeExtractor {
        fn ok(text: &str, calls: Arc<AtomicUsize>) -> Box<Self> {
            Box::new(Self {
                output: Ok(text.to_string()),
                calls,
            })
        }

        fn err(calls: Arc<AtomicUsize>) -> Box<Self> {
            Box::new(Self {
                output: Err(()),
                calls,
            })
        }
    }

    #[async_trait]
    impl TextExtractor for FakeExtractor {
        async fn extract_text(&self, _url: &str) -> Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.output {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(ExtractError::NetworkError("fake failure".into())),
            }
        }
    }

    #[test]
    fn test_strip_html_removes_scripts_and_styles() {
        let html = r#"<html><head><style>body { color: red; }</style></head>
            <body><script type="text/javascript">var x = 1;</script>
            <p>Visible text</p></body></html>"#;
        let text = strip_html(html);
        assert_eq!(text, "Visible text");
    }

    #[test]
    fn test_strip_html_decodes_entities() {
        let html = "<p>Rocks &amp; minerals&nbsp;&lt;basics&gt;</p>";
        assert_eq!(strip_html(html), "Rocks & minerals <basics>");
    }

    #[test]
    fn test_strip_tags_separates_adjacent_words() {
        let html = "<h1>Title</h1><p>Body</p>";
        assert_eq!(collapse_whitespace(&strip_tags(html)), "Title Body");
    }

    #[tokio::test]
    async fn test_pipeline_uses_primary_when_it_succeeds() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let long_text = "x".repeat(150);

        let pipeline = ExtractionPipeline::new(
            FakeExtractor::ok(&long_text, primary_calls.clone()),
            FakeExtractor::ok("fallback text", fallback_calls.clone()),
            100,
        );

        let text = pipeline.extract_text("https://example.com").await.unwrap();
        assert_eq!(text, long_text);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_primary_text_fails_without_fallback() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));

        let pipeline = ExtractionPipeline::new(
            FakeExtractor::ok("tiny", primary_calls.clone()),
            FakeExtractor::ok(&"y".repeat(500), fallback_calls.clone()),
            100,
        );

        let result = pipeline.extract_text("https://example.com").await;
        assert!(matches!(result, Err(ExtractError::TooShort { len: 4, .. })));
        // Conteúdo raso não aciona o fallback
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_runs_when_primary_errors() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let fallback_text = "z".repeat(300);

        let pipeline = ExtractionPipeline::new(
            FakeExtractor::err(primary_calls.clone()),
            FakeExtractor::ok(&fallback_text, fallback_calls.clone()),
            100,
        );

        let text = pipeline.extract_text("https://example.com").await.unwrap();
        assert_eq!(text, fallback_text);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_output_faces_same_gate() {
        let calls = Arc::new(AtomicUsize::new(0));

        let pipeline = ExtractionPipeline::new(
            FakeExtractor::err(calls.clone()),
            FakeExtractor::ok("still tiny", calls.clone()),
            100,
        );

        let result = pipeline.extract_text("https://example.com").await;
        assert!(matches!(result, Err(ExtractError::TooShort { .. })));
    }

    #[tokio::test]
    async fn test_both_failing_yields_error() {
        let calls = Arc::new(AtomicUsize::new(0));

        let pipeline = ExtractionPipeline::new(
            FakeExtractor::err(calls.clone()),
            FakeExtractor::err(calls.clone()),
            100,
        );

        assert!(pipeline.extract_text("https://example.com").await.is_err());
    }
}
