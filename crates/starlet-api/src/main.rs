//! Starlet CLI and REST API entry point.
//!
//! Binary name: `starlet`
//!
//! Loads `.env`, configuration and tracing, then either serves one persona
//! over HTTP or runs a one-shot terminal command.

mod cli;
mod http;
mod state;

use clap::Parser;

use starlet_infra::config::load_service_config;
use starlet_observe::tracing_setup::{init_tracing, log_directive, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in deployed environments.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(log_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut config = load_service_config().await;
    if let Some(model) = cli.model.clone() {
        config.model = model;
    }

    let result = run(cli, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, config: starlet_types::config::ServiceConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { persona, host, port } => {
            let state = AppState::init(persona, &config);
            let router = http::router::build_router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} {} Agent API listening on {}",
                    console::style("⚡").bold(),
                    persona.display_name(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%persona, %addr, "Serving");

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat {
            persona,
            user,
            session,
            prompts,
        } => {
            cli::chat::run_chat(&config, persona, user, session, prompts, cli.json).await?;
        }

        Commands::Image {
            prompt,
            aspect_ratio,
            output_dir,
        } => {
            cli::image::generate(&config, &prompt, aspect_ratio.as_deref(), output_dir, cli.json).await?;
        }

        Commands::Personas => {
            cli::personas::list_personas(&config, cli.json)?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
