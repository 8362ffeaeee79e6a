// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AGREGADOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Mescla as fontes coletadas em todas as rodadas aplicando o budget
// global de conteúdo e produz o ScrapeBundle final. Nunca falha.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::{ScrapeBundle, SourceRecord};

/// Separador entre conteúdos de fontes distintas.
const SOURCE_SEPARATOR: &str = "\n\n";

/// Resumo fixo quando nenhuma fonte rendeu conteúdo.
const INSUFFICIENT_CONTENT_SUMMARY: &str = "Could not extract sufficient content from the \
     available sources. This might be due to website restrictions or content format issues.";

/// Produz o bundle final a partir do estado acumulado pelo Round Controller.
///
/// Com zero sucessos o resumo é a mensagem fixa de insuficiência e o bundle
/// ainda carrega todas as fontes tentadas. Com sucessos, o conteúdo entra no
/// budget global fonte a fonte (nunca truncado no meio de uma fonte, isso
/// já aconteceu por fonte na extração) e o resumo registra contagem e
/// comprimento agregado.
pub fn aggregate(
    topic_hint: &str,
    sources: Vec<SourceRecord>,
    successful_count: usize,
    total_content_length: usize,
    max_total_content: usize,
) -> ScrapeBundle {
    log::info!(
        "📊 Total de fontes bem-sucedidas: {}, conteúdo total: {} chars",
        successful_count,
        total_content_length
    );

    let summary = if successful_count > 0 {
        if total_content_length > max_total_content {
            log::warn!(
                "⚠️ Conteúdo total longo demais ({} chars), limitando a {}",
                total_content_length,
                max_total_content
            );
        }
        let content = assemble_content(&sources, total_content_length, max_total_content);
        format!(
            "Successfully gathered content from {} sources. Total content length: {} characters.",
            successful_count,
            content.len()
        )
    } else {
        INSUFFICIENT_CONTENT_SUMMARY.to_string()
    };

    ScrapeBundle {
        topic: topic_hint.to_string(),
        summary,
        sources,
    }
}

/// Concatena o conteúdo das fontes bem-sucedidas, em ordem, separado por
/// linha em branco, respeitando o budget global.
///
/// Acima do budget, uma fonte só entra enquanto `acumulado + fonte +
/// separador` fica estritamente abaixo do limite; a primeira que não
/// couber encerra a inclusão.
pub fn assemble_content(
    sources: &[SourceRecord],
    total_content_length: usize,
    max_total_content: usize,
) -> String {
    let parts: Vec<&str> = sources
        .iter()
        .filter(|s| s.content_fetched)
        .map(|s| s.content.as_str())
        .collect();

    if total_content_length <= max_total_content {
        return parts.join(SOURCE_SEPARATOR);
    }

    let mut assembled = String::new();
    for part in parts {
        if assembled.len() + part.len() < max_total_content {
            assembled.push_str(part);
            assembled.push_str(SOURCE_SEPARATOR);
        } else {
            break;
        }
    }
    assembled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_success_uses_fixed_summary() {
        let sources = vec![
            SourceRecord::failed("https://a.com"),
            SourceRecord::failed("https://b.com"),
        ];
        let bundle = aggregate("volcanoes", sources, 0, 0, 8000);

        assert_eq!(bundle.summary, INSUFFICIENT_CONTENT_SUMMARY);
        assert_eq!(bundle.sources.len(), 2);
        assert!(bundle.sources.iter().all(|s| !s.content_fetched));
    }

    #[test]
    fn test_empty_sources_still_yield_bundle() {
        let bundle = aggregate("volcanoes", vec![], 0, 0, 8000);
        assert!(bundle.sources.is_empty());
        assert_eq!(bundle.summary, INSUFFICIENT_CONTENT_SUMMARY);
    }

    #[test]
    fn test_budget_stops_before_exceeding() {
        // Cinco fontes de 3000 chars com budget 8000: só as duas primeiras entram
        let sources: Vec<SourceRecord> = (0..5)
            .map(|i| {
                SourceRecord::fetched(
                    format!("https://source-{}.edu", i),
                    format!("{}", i).repeat(3000),
                )
            })
            .collect();

        let content = assemble_content(&sources, 15000, 8000);

        assert!(content.contains(&"0".repeat(3000)));
        assert!(content.contains(&"1".repeat(3000)));
        assert!(!content.contains(&"2".repeat(3000)));
        // 2 fontes completas + separadores
        assert_eq!(content.len(), 3000 + 2 + 3000 + 2);
    }

    #[test]
    fn test_under_budget_joins_everything() {
        let sources = vec![
            SourceRecord::fetched("https://a.edu", "aaa"),
            SourceRecord::failed("https://b.com"),
            SourceRecord::fetched("https://c.edu", "ccc"),
        ];

        let content = assemble_content(&sources, 6, 8000);
        assert_eq!(content, "aaa\n\nccc");
    }

    #[test]
    fn test_success_summary_reports_counts_and_length() {
        let sources = vec![
            SourceRecord::fetched("https://a.edu", "x".repeat(600)),
            SourceRecord::fetched("https://b.edu", "y".repeat(600)),
        ];
        let bundle = aggregate("volcanoes", sources, 2, 1200, 8000);

        assert_eq!(
            bundle.summary,
            "Successfully gathered content from 2 sources. Total content length: 1202 characters."
        );
        assert_eq!(bundle.topic, "volcanoes");
    }

    #[test]
    fn test_sources_preserved_in_order() {
        let sources = vec![
            SourceRecord::fetched("https://a.edu", "first"),
            SourceRecord::failed("https://b.com"),
            SourceRecord::fetched("https://c.edu", "third"),
        ];
        let bundle = aggregate("t", sources, 2, 10, 8000);

        let urls: Vec<&str> = bundle.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.edu", "https://b.com", "https://c.edu"]);
    }
}
