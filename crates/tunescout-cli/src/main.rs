use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};
use tunescout_api::BackendClient;
use tunescout_core::{
    CachedSearchEngine, Config, Exporter, SearchBackend, SearchMode, SearchOrchestrator,
    SearchResult, Source, Tab,
};
use tunescout_tui::App;

#[derive(Parser)]
#[command(name = "tunescout")]
#[command(version, about = "Free music search across YouTube and Jamendo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the search API server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (defaults to $PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Search from the command line
    Search {
        /// Search query
        query: String,
        /// Search only this source (youtube or jamendo); YouTube falls back to Jamendo
        #[arg(long, short)]
        source: Option<Source>,
        /// Query both sources at once
        #[arg(long, conflicts_with = "source")]
        dual: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Search in-process instead of going through the API server
        #[arg(long)]
        direct: bool,
        /// Also write results to a .json, .csv or .md file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Launch the terminal UI
    Tui {
        /// Search in-process instead of going through the API server
        #[arg(long)]
        direct: bool,
    },
    /// Inspect or maintain the search cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(clap::Subcommand)]
enum CacheAction {
    /// Show entry counts
    Stats,
    /// Delete expired entries
    Purge,
    /// Delete everything
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up YOUTUBE_API_KEYS and friends from a local .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The TUI owns the terminal, so its log output goes nowhere
    let (default_filter, writer) = match cli.command {
        Some(Commands::Tui { .. }) => ("tunescout=warn", BoxMakeWriter::new(std::io::sink)),
        _ => ("tunescout=info", BoxMakeWriter::new(std::io::stderr)),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let mut config = Config::load()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            tunescout_server::serve(config).await?;
        }
        Some(Commands::Search {
            query,
            source,
            dual,
            json,
            direct,
            export,
        }) => {
            let opts = SearchOpts {
                query,
                source,
                dual,
                json,
                export,
            };
            if direct {
                let orchestrator = direct_orchestrator(&config)?;
                run_search(orchestrator, opts).await?;
            } else {
                run_search(server_orchestrator(&config), opts).await?;
            }
        }
        Some(Commands::Tui { direct }) => {
            if direct {
                tunescout_tui::run_tui(App::new(direct_orchestrator(&config)?)).await?;
            } else {
                tunescout_tui::run_tui(App::new(server_orchestrator(&config))).await?;
            }
        }
        Some(Commands::Cache { action }) => {
            let cache = tunescout_server::open_cache(&config)?;
            match action {
                CacheAction::Stats => {
                    let stats = cache.stats()?;
                    println!("Cached searches: {}", stats.total);
                    println!("Expired (awaiting purge): {}", stats.expired);
                    for (source, count) in &stats.by_source {
                        println!("  {:<8} {}", source, count);
                    }
                }
                CacheAction::Purge => {
                    let removed = cache.purge_expired()?;
                    println!("Purged {} expired entries", removed);
                }
                CacheAction::Clear => {
                    let removed = cache.clear()?;
                    println!("Cleared {} entries", removed);
                }
            }
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

struct SearchOpts {
    query: String,
    source: Option<Source>,
    dual: bool,
    json: bool,
    export: Option<PathBuf>,
}

fn server_orchestrator(config: &Config) -> SearchOrchestrator<BackendClient> {
    tracing::info!("Using search API at {}", config.client.api_base);
    SearchOrchestrator::with_timeouts(
        BackendClient::new(config.client.api_base.clone()),
        config.client.timeouts(),
    )
}

fn direct_orchestrator(config: &Config) -> anyhow::Result<SearchOrchestrator<CachedSearchEngine>> {
    let cache = tunescout_server::open_cache(config)?;
    let engine = tunescout_server::build_engine(config, Some(cache));
    Ok(SearchOrchestrator::with_timeouts(
        engine,
        config.client.timeouts(),
    ))
}

async fn run_search<B: SearchBackend>(
    mut orchestrator: SearchOrchestrator<B>,
    opts: SearchOpts,
) -> anyhow::Result<()> {
    orchestrator.set_query(opts.query.as_str());
    if opts.dual {
        orchestrator.set_mode(SearchMode::Dual);
        orchestrator.search_both().await;
        orchestrator.state_mut().show_tab(Tab::All);
    } else {
        orchestrator.search(opts.source.map(Tab::from)).await;
    }

    let state = orchestrator.state();
    let results: Vec<SearchResult> = state.current_results().into_iter().cloned().collect();

    if let Some(path) = &opts.export {
        Exporter::export_to_file(&results, path)?;
        eprintln!("Exported {} results to {}", results.len(), path.display());
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        if state.is_fallback {
            eprintln!("YouTube Unavailable - showing free music from Jamendo instead.");
        }
        for (i, result) in results.iter().enumerate() {
            println!(
                "{:>2}. [{}] {} - {}",
                i + 1,
                result.source.badge(),
                result.title,
                result.creator()
            );
            if let Some(url) = result.playback_url() {
                println!("    {}", url);
            }
        }
    }

    if let Some(error) = &state.error {
        anyhow::bail!("{}", error);
    }

    Ok(())
}
