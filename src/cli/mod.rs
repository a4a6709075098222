//! # CLI Module
//!
//! Command-line tooling for route tables.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Load and build a table, reporting the route count or the first error:
//!
//! ```bash
//! routetree check --routes routes.yaml
//! ```
//!
//! ### `resolve`
//!
//! Resolve one or more paths, printing the endpoint, pattern and parameters:
//!
//! ```bash
//! routetree resolve --routes routes.yaml --method POST /blog/42/edit /blog
//! ```
//!
//! ### `routes`
//!
//! List registered patterns, or with `--tree` the merged node tree.
//!
//! ### `watch`
//!
//! Keep the table loaded and rebuild it on every change, logging each swap.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use routetree::cli::{execute, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! execute(&cli, &RuntimeConfig::from_env(), &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
