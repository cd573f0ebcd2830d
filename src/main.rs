//! # docstore CLI
//!
//! The `docstore` binary creates, reads, updates and lists documents in a
//! file-backed store, and serves the same operations over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! docstore --config ./config/docstore.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docstore serve` | Start the HTTP server |
//! | `docstore create --title T --content C` | Create a document |
//! | `docstore get <id>` | Print a full document |
//! | `docstore list` | List summaries, most recently updated first |
//! | `docstore update <id> [--title T] [--content C]` | Update a document |
//! | `docstore reindex` | Rebuild `index.json` from the record files |

use clap::{Parser, Subcommand};
use docstore::{commands, config, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// docstore — a file-backed document store with atomic writes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, `./storage` and `127.0.0.1:8000`
/// are used.
#[derive(Parser)]
#[command(
    name = "docstore",
    about = "docstore — create, fetch and list text documents in a durable file store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docstore.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves the `/documents` API.
    Serve,

    /// Create a new document.
    Create {
        /// Document title.
        #[arg(long)]
        title: String,

        /// Document content.
        #[arg(long, default_value = "")]
        content: String,

        /// Print the stored document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a document by id.
    Get {
        /// Document id (`document_<24 hex>`).
        id: String,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List all documents, most recently updated first.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Update the title and/or content of a document.
    Update {
        /// Document id.
        id: String,

        /// New title.
        #[arg(long)]
        title: Option<String>,

        /// New content.
        #[arg(long)]
        content: Option<String>,

        /// Print the stored document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the summary index from the record files.
    ///
    /// Repairs an index left behind by a crash between a record write and
    /// its index update. Never runs automatically.
    Reindex,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Create {
            title,
            content,
            json,
        } => {
            commands::run_create(&cfg, title, content, json)?;
        }
        Commands::Get { id, json } => {
            commands::run_get(&cfg, &id, json)?;
        }
        Commands::List { json } => {
            commands::run_list(&cfg, json)?;
        }
        Commands::Update {
            id,
            title,
            content,
            json,
        } => {
            commands::run_update(&cfg, &id, title, content, json)?;
        }
        Commands::Reindex => {
            commands::run_reindex(&cfg)?;
        }
    }

    Ok(())
}
