//! The `adda` binary: web gateway, terminal chat and persona listing.

mod config;
mod terminal;

use adda_agent::ChatRunner;
use adda_gateway::{GatewayOptions, GatewayServer};
use clap::{Parser, Subcommand};
use config::AddaConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adda", about = "Adda: streaming chat with AI personas")]
struct Cli {
    /// Path to config file (optional)
    #[arg(short, long, default_value = "adda.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web chat gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat with a persona in the terminal
    Chat {
        /// Persona key (defaults to the configured persona)
        #[arg(short = 'P', long)]
        persona: Option<String>,
    },
    /// List available personas
    Personas,
}

/// JSON logs for the server; quiet human-readable logs on stderr for the terminal chat.
fn init_tracing(json: bool) {
    let default_level = if json { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Serve { .. }));

    // A missing .env file is fine; the environment may already carry the key.
    let _ = dotenvy::dotenv();

    let config = AddaConfig::load(&cli.config).await?;
    let personas = config.persona_registry()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let app = match config.model.with_api_key_from_env() {
                Ok(model) => {
                    info!(
                        provider = ?model.provider,
                        model = %model.model_id,
                        personas = personas.len(),
                        "Model configured"
                    );
                    let options = GatewayOptions {
                        max_message_length: config.server.max_message_length,
                    };
                    GatewayServer::build(Arc::new(ChatRunner::new(model)), personas, options)
                }
                Err(e) => {
                    error!(error = %e, "Configuration error, serving diagnostic only");
                    GatewayServer::build_halted(e.to_string(), personas)
                }
            };

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Adda gateway listening on {addr}");
            axum::serve(listener, app).await?;
        }
        Commands::Chat { persona } => {
            let model = config.model.with_api_key_from_env()?;
            let persona = match persona.as_deref() {
                Some(key) => personas
                    .get(key)
                    .ok_or_else(|| anyhow::anyhow!("Unknown persona '{key}'"))?,
                None => personas.default_persona(),
            };
            info!(persona = %persona.key, model = %model.model_id, "Starting terminal chat");
            terminal::run_repl(ChatRunner::new(model), persona).await?;
        }
        Commands::Personas => {
            let default_key = personas.default_persona().key.clone();
            println!("Available personas:");
            for persona in personas.list() {
                let marker = if persona.key == default_key { " (default)" } else { "" };
                println!("  {} - {}{}", persona.key, persona.title(), marker);
            }
            println!("\nTotal: {} persona(s)", personas.len());
        }
    }

    Ok(())
}
