//! # API Knowledge CLI (`apik`)
//!
//! Query an API's OpenAPI description from the terminal, or serve the same
//! queries to MCP clients.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apik endpoints [--tag T]` | List endpoints, optionally filtered by tag |
//! | `apik search <query>` | Search endpoints by keyword |
//! | `apik endpoint <METHOD> <PATH>` | Show one endpoint in detail |
//! | `apik schema <NAME>` | Show a component schema |
//! | `apik schemas` | List component schema names |
//! | `apik tags` | List tags with endpoint counts |
//! | `apik info` | Show API title, version and counts |
//! | `apik serve stdio` | Run the MCP server over stdin/stdout |
//! | `apik serve http` | Run the MCP + JSON HTTP server |
//! | `apik completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! apik --url http://localhost:3000/api-json endpoints
//! apik endpoint post /items --json
//! SWAGGER_URL=./openapi.json apik schema CreateItemDto
//! ```

use std::io;
use std::path::PathBuf;

use api_knowledge::{commands, config, server, KnowledgeIndex};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

/// API Knowledge CLI: query an HTTP API's OpenAPI description.
///
/// The document location comes from `--url`, then the `SWAGGER_URL`
/// environment variable, then `[source].url` in the config file.
#[derive(Parser)]
#[command(
    name = "apik",
    about = "API Knowledge: query an HTTP API's OpenAPI description and serve it over MCP",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/apik.toml` when that file exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Location of the API document (`http(s)://` URL, `file://` URL or path).
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all endpoints in document order.
    Endpoints {
        /// Only endpoints carrying this tag (exact, case-sensitive).
        #[arg(long)]
        tag: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Search endpoints by keyword.
    ///
    /// Case-insensitive substring match over path, summary, operationId
    /// and tags.
    Search {
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Show parameters, request body and responses of one endpoint.
    Endpoint {
        /// HTTP method, any case (GET, POST, PUT, PATCH, DELETE).
        method: String,

        /// Path template exactly as documented, e.g. `/items/{id}`.
        path: String,

        #[arg(long)]
        json: bool,
    },

    /// Show a component schema, resolved one level deep.
    Schema {
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// List component schema names.
    Schemas {
        #[arg(long)]
        json: bool,
    },

    /// List tags with descriptions and endpoint counts.
    Tags {
        #[arg(long)]
        json: bool,
    },

    /// Show the API title, version and counts.
    Info {
        #[arg(long)]
        json: bool,
    },

    /// Serve the query tools to MCP clients.
    Serve {
        #[command(subcommand)]
        transport: ServeTransport,
    },

    /// Print a shell completion script to stdout.
    Completions { shell: Shell },
}

/// Server transports.
#[derive(Subcommand)]
enum ServeTransport {
    /// JSON-RPC over stdin/stdout, for clients that spawn the server.
    Stdio,

    /// Streamable HTTP at `/mcp` plus JSON routes, bound to `[server].bind`.
    Http,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output and the stdio
    // transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "apik", &mut io::stdout());
        return Ok(());
    }

    let cfg = config::resolve_config(cli.config.as_deref(), cli.url.as_deref())?;

    match cli.command {
        Commands::Serve { transport } => match transport {
            ServeTransport::Stdio => server::run_stdio(&cfg).await?,
            ServeTransport::Http => server::run_http(&cfg).await?,
        },
        command => {
            let index = KnowledgeIndex::from_config(&cfg)?;
            match command {
                Commands::Endpoints { tag, json } => {
                    commands::run_endpoints(&index, tag.as_deref(), json).await?
                }
                Commands::Search { query, json } => {
                    commands::run_search(&index, &query, json).await?
                }
                Commands::Endpoint { method, path, json } => {
                    commands::run_endpoint(&index, &method, &path, json).await?
                }
                Commands::Schema { name, json } => commands::run_schema(&index, &name, json).await?,
                Commands::Schemas { json } => commands::run_schemas(&index, json).await?,
                Commands::Tags { json } => commands::run_tags(&index, json).await?,
                Commands::Info { json } => commands::run_info(&index, json).await?,
                Commands::Serve { .. } | Commands::Completions { .. } => {
                    // Handled above
                    unreachable!()
                }
            }
        }
    }

    Ok(())
}
