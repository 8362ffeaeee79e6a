// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FILTRO DE LINKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;

use crate::types::Url;

/// Domínios não-educacionais/sociais/vídeo descartados sempre.
const BLACKLISTED_SUBSTRINGS: &[&str] = &[
    "youtube",
    "udemy",
    "coursera",
    "pinterest",
    "linkedin",
    "facebook",
    "twitter",
    "instagram",
];

/// Fontes educacionais e de referência priorizadas no resultado.
const TRUSTED_SUBSTRINGS: &[&str] = &["edu", "britannica", "nationalgeographic", "smithsonian"];

/// Filtro determinístico de URLs candidatas.
///
/// Remove entradas malformadas e blacklisted, deduplica preservando a
/// primeira ocorrência e move fontes confiáveis para a frente mantendo a
/// ordem relativa dentro de cada grupo (partição estável). Nunca falha:
/// o pior caso é uma saída vazia.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    blacklist: Vec<String>,
    trusted: Vec<String>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkFilter {
    /// Cria o filtro com as listas padrão.
    pub fn new() -> Self {
        Self {
            blacklist: BLACKLISTED_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
            trusted: TRUSTED_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Substitui a blacklist padrão.
    pub fn with_blacklist(mut self, blacklist: Vec<String>) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Substitui a lista de fontes confiáveis padrão.
    pub fn with_trusted(mut self, trusted: Vec<String>) -> Self {
        self.trusted = trusted;
        self
    }

    /// Aplica o filtro a uma sequência de links.
    pub fn filter(&self, links: &[Url]) -> Vec<Url> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut trusted_links: Vec<Url> = Vec::new();
        let mut other_links: Vec<Url> = Vec::new();

        for link in links {
            if !seen.insert(link.as_str()) {
                continue;
            }

            if !is_structurally_valid(link) {
                log::debug!("Link malformado descartado: {}", link);
                continue;
            }

            let lower = link.to_lowercase();
            if self.blacklist.iter().any(|b| lower.contains(b.as_str())) {
                continue;
            }

            if self.trusted.iter().any(|t| lower.contains(t.as_str())) {
                trusted_links.push(link.clone());
            } else {
                other_links.push(link.clone());
            }
        }

        trusted_links.extend(other_links);
        trusted_links
    }
}

/// Validação estrutural: precisa parsear, ter esquema http(s) e host.
fn is_structurally_valid(link: &str) -> bool {
    match url::Url::parse(link) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
