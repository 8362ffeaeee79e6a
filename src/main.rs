// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LESSON SCOUT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para coleta de conteúdo educacional e geração de planos de aula.
//
// Uso:
//   lesson-scout-cli "photosynthesis"
//   lesson-scout-cli --grade "6th grade" "photosynthesis"
//   lesson-scout-cli --plan "simple machines"
//   lesson-scout-cli --server --port=8000   (requer feature "server")
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use lesson_scout::extract::ExtractionPipeline;
use lesson_scout::planner::{OpenAiPlanner, PlanClient, TopicValidation};
use lesson_scout::prelude::*;
use lesson_scout::search::GoogleCseClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    // Lista de possíveis locais para o .env
    let possible_paths = [
        // Diretório atual
        PathBuf::from(".env"),
        // Diretório do manifest (fallback em tempo de compilação)
        {
            let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            p.push(".env");
            p
        },
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    // Última tentativa: dotenvy padrão
    if dotenvy::dotenv().is_ok() {
        eprintln!("✓ Carregado .env do diretório atual");
    } else {
        eprintln!(
            "⚠ Nenhum arquivo .env encontrado. Certifique-se de que \
             GOOGLE_SEARCH_API_KEY e CSE_ID estão definidas."
        );
    }
}

fn print_usage(program: &str) {
    eprintln!("Lesson Scout CLI v{}", lesson_scout::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções] <tópico>", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --grade <nível>    Qualifica o tópico com a série (ex: \"6th grade\")");
    eprintln!("  --rounds <n>       Máximo de rodadas de busca (padrão: 3)");
    eprintln!("  --plan             Também gera o plano de aula (requer OPENAI_API_KEY)");
    eprintln!("  --json             Imprime o bundle como JSON");
    #[cfg(feature = "server")]
    eprintln!("  --server           Inicia o servidor HTTP [--port=8000] [--secret=TOKEN]");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} \"photosynthesis\"", program);
    eprintln!("  {} --grade \"6th grade\" \"simple machines\"", program);
    eprintln!("  {} --plan \"water cycle\"", program);
}

fn require_search_credentials() -> SearchCredentials {
    SearchCredentials::from_env().unwrap_or_else(|| {
        eprintln!("✗ Erro: GOOGLE_SEARCH_API_KEY ou CSE_ID não encontrada!");
        eprintln!();
        eprintln!("Certifique-se de que:");
        eprintln!("  1. O arquivo .env existe no diretório raiz do projeto");
        eprintln!("  2. O arquivo contém GOOGLE_SEARCH_API_KEY e CSE_ID");
        std::process::exit(1);
    })
}

fn require_openai_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        eprintln!("✗ Erro: OPENAI_API_KEY não encontrada!");
        eprintln!();
        eprintln!("O modo --plan e o servidor precisam da chave da OpenAI:");
        eprintln!("  export OPENAI_API_KEY=sua-chave-aqui");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse argumentos
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    #[cfg(feature = "server")]
    if args.iter().any(|a| a == "--server") {
        return run_server_mode(&args).await;
    }

    // Parse flags simples
    let mut grade: Option<String> = None;
    let mut rounds: Option<usize> = None;
    let mut want_plan = false;
    let mut want_json = false;
    let mut topic_words: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--grade" if i + 1 < args.len() => {
                grade = Some(args[i + 1].clone());
                i += 2;
            }
            "--rounds" if i + 1 < args.len() => {
                rounds = args[i + 1].parse().ok();
                i += 2;
            }
            "--plan" => {
                want_plan = true;
                i += 1;
            }
            "--json" => {
                want_json = true;
                i += 1;
            }
            other => {
                topic_words.push(other.to_string());
                i += 1;
            }
        }
    }

    let topic = topic_words.join(" ");
    if topic.trim().is_empty() {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let query = match &grade {
        Some(g) => format!("{} for {}", topic, g),
        None => topic.clone(),
    };

    let mut config = load_scrape_config();
    if let Some(n) = rounds {
        config.max_rounds = n;
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" LESSON SCOUT v{}", lesson_scout::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Tópico: {}", query);
    println!("Rodadas máximas: {}", config.max_rounds);
    println!();

    let credentials = require_search_credentials();
    let search = Arc::new(GoogleCseClient::with_timeout(
        credentials,
        config.search_timeout,
    ));
    let extractor = Arc::new(ExtractionPipeline::from_config(&config));
    let scraper = TopicScraper::new(search, extractor, config);

    println!("Iniciando coleta...");
    println!();

    let bundle = scraper.scrape_topic(&query).await?;

    if want_json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    // Exibir resultado
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" RESULTADO");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Resumo: {}", bundle.summary);
    println!();
    println!("Fontes ({}):", bundle.sources.len());
    for (i, source) in bundle.sources.iter().enumerate() {
        let status = if source.content_fetched { "✓" } else { "✗" };
        println!(
            "  {}. {} {} ({} chars)",
            i + 1,
            status,
            source.url,
            source.content.len()
        );
    }
    println!();

    if want_plan {
        let openai_key = require_openai_key();
        let planner = OpenAiPlanner::from_config(openai_key, &load_planner_config());

        match planner.validate_topic(&query).await? {
            TopicValidation::Invalid(reason) => {
                println!("✗ Tópico rejeitado pelo validador: {}", reason);
                return Ok(());
            }
            TopicValidation::Valid(_) => {}
        }

        println!("Gerando plano de aula...");
        println!();

        let plan = planner.generate_plan(&bundle).await?;

        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(" PLANO DE AULA");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
        println!("Tópico: {} ({})", plan.topic, plan.grade_level);
        println!("Duração: {} minutos", plan.duration_minutes);
        println!();
        println!("Objetivos:");
        for objective in &plan.learning_objectives {
            println!("  - {}", objective);
        }
        println!();
        println!("Materiais:");
        for material in &plan.materials_needed {
            println!("  - {}", material);
        }
        println!();
        println!("Visão geral:");
        for section in &plan.lesson_overview {
            println!(
                "  - {} ({} min): {}",
                section.title, section.duration_minutes, section.description
            );
        }
        println!();
        println!("Exercícios:");
        for exercise in &plan.exercises {
            println!("  - {}", exercise);
        }
        println!();
        println!("Avaliação:");
        for question in &plan.assessment {
            println!("  - {}", question);
        }
        println!();
        println!("Fontes:");
        for url in &plan.urls {
            println!("  - {}", url);
        }
        println!();
    }

    Ok(())
}

/// Inicia o servidor HTTP (feature "server")
#[cfg(feature = "server")]
async fn run_server_mode(args: &[String]) -> anyhow::Result<()> {
    use lesson_scout::server::{start_server, AppState};
    use std::net::SocketAddr;

    let mut port: u16 = 8000;
    let mut secret: Option<String> = None;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--port=") {
            port = value.parse().unwrap_or(8000);
        }
        if let Some(value) = arg.strip_prefix("--secret=") {
            secret = Some(value.to_string());
        }
    }

    let state = Arc::new(AppState {
        scrape_config: load_scrape_config(),
        planner_config: load_planner_config(),
        search_credentials: require_search_credentials(),
        openai_key: require_openai_key(),
        secret,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" LESSON SCOUT SERVER v{}", lesson_scout::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    start_server(addr, state).await
}
