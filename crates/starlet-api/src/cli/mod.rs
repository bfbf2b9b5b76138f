//! CLI command definitions for the `starlet` binary.

pub mod chat;
pub mod image;
pub mod personas;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use starlet_types::persona::PersonaKind;

/// Persona chat services backed by Gemini.
#[derive(Parser)]
#[command(name = "starlet", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Override the model for personas that do not pin one.
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API for one persona.
    Serve {
        /// Persona to serve (brad or angelina).
        #[arg(long, env = "STARLET_PERSONA", default_value = "brad")]
        persona: PersonaKind,

        /// Address to bind.
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Send one or more prompts to a persona in a single session.
    Chat {
        #[arg(long, env = "STARLET_PERSONA", default_value = "brad")]
        persona: PersonaKind,

        /// User id (defaults to the configured default user).
        #[arg(long)]
        user: Option<String>,

        /// Session id (synthesised when omitted).
        #[arg(long)]
        session: Option<String>,

        /// Prompts, sent in order.
        #[arg(required = true)]
        prompts: Vec<String>,
    },

    /// Generate one image directly through the image tool.
    Image {
        /// What to draw.
        prompt: String,

        /// Aspect ratio such as 16:9 (defaults to the configured mode).
        #[arg(long)]
        aspect_ratio: Option<String>,

        /// Directory to write the PNG into.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// List the built-in personas.
    Personas,
}
