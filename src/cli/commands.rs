use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::endpoint::Endpoint;
use crate::hot_reload::{shared, watch_routes};
use crate::router::{MatchResult, Router};
use crate::runtime_config::RuntimeConfig;
use crate::table::{load_router, parse_method};

/// Command-line interface for routetree
#[derive(Parser, Debug)]
#[command(name = "routetree")]
#[command(about = "Route table checker and resolver", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a route table and report whether it builds
    Check {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Resolve request paths against a route table
    Resolve {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method used for capability checks
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List registered routes
    Routes {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Print the merged node tree instead of the pattern list
        #[arg(long, default_value_t = false)]
        tree: bool,
    },
    /// Reload the route table whenever it changes
    Watch {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long)]
        routes: PathBuf,
    },
}

/// Parse the process arguments and run the selected command
///
/// # Errors
///
/// Returns an error if the route table cannot be loaded or built, the method
/// is not supported, or the file watcher cannot be set up.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();
    let stdout = io::stdout();
    execute(&cli, &config, &mut stdout.lock())
}

/// Run a parsed command, writing its report to `out`
pub fn execute<W: Write>(cli: &Cli, config: &RuntimeConfig, out: &mut W) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { routes } => {
            let router = load_router(routes, config)?;
            writeln!(
                out,
                "ok: {} routes in {}",
                router.len(),
                routes.display()
            )?;
        }
        Commands::Resolve {
            routes,
            method,
            paths,
        } => {
            let method = parse_method(method)?;
            let router = load_router(routes, config)?;
            for path in paths {
                write_resolution(out, &router, &method, path)?;
            }
        }
        Commands::Routes { routes, tree } => {
            let router = load_router(routes, config)?;
            if *tree {
                write!(out, "{}", router.tree())?;
            } else {
                for (pattern, endpoint) in router.tree().routes() {
                    writeln!(out, "{pattern} -> {}", endpoint.name())?;
                }
            }
        }
        Commands::Watch { routes } => watch(routes, config)?,
    }
    Ok(())
}

fn write_resolution<W: Write>(
    out: &mut W,
    router: &Router,
    method: &Method,
    path: &str,
) -> io::Result<()> {
    match router.route(method, path) {
        MatchResult::Matched(m) => {
            let mut params: Vec<_> = m.params.iter().collect();
            params.sort();
            let params = params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(" ");
            let dispatch = if m.is_dispatchable(method) {
                ""
            } else {
                " (action not exposed)"
            };
            writeln!(
                out,
                "{method} {path} -> {} [{}] {params}{dispatch}",
                m.endpoint.name(),
                m.pattern
            )
        }
        MatchResult::NotFound => writeln!(out, "{method} {path} -> not found"),
        MatchResult::MalformedPath(err) => writeln!(out, "{method} {path} -> malformed: {err}"),
    }
}

fn watch(routes: &Path, config: &RuntimeConfig) -> anyhow::Result<()> {
    let router = shared(load_router(routes, config)?);
    let _watcher = watch_routes(routes, router, config.clone(), |fresh| {
        info!(routes = fresh.len(), "Route table reloaded");
    })
    .with_context(|| format!("Failed to watch {}", routes.display()))?;

    info!(path = %routes.display(), "Watching route table, press Ctrl-C to stop");
    loop {
        std::thread::park();
    }
}
