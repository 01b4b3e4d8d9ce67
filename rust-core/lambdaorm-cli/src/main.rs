// SPDX-License-Identifier: PMPL-1.0-or-later
//! lorm - command-line client for the λORM query service.
//!
//! Each subcommand issues one SDK call and prints its result as pretty JSON.
//! Connection settings come from `LAMBDAORM_URL`, `LAMBDAORM_TIMEOUT_SECS`
//! and `LAMBDAORM_FORMAT`, overridden by `--url`, `--timeout` and `--format`.

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lambdaorm_client::{ClientConfig, Format, OrmClient, QueryOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "lorm", version, about = "Command-line client for the λORM query service")]
struct Cli {
    /// Base URL of the service [default: http://localhost:9291].
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-call timeout in seconds [default: 10].
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Response format: default, beautiful or light.
    #[arg(long, global = true)]
    format: Option<Format>,

    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Version of the service.
    Version,
    /// Liveness probe.
    Ping,
    /// Health report.
    Health,
    /// Raw service metrics.
    Metrics,
    /// Version, ping and health, fetched concurrently.
    Status,
    /// Complete schema.
    Schema,
    /// Domain section of the schema.
    Domain,
    /// All entities, or one by name.
    Entities { name: Option<String> },
    /// All enumerations, or one by name.
    Enums { name: Option<String> },
    /// All mappings, one mapping, or one entity within a mapping.
    Mappings {
        name: Option<String>,
        #[arg(requires = "name")]
        entity: Option<String>,
    },
    /// All sources, or one by name.
    Sources { name: Option<String> },
    /// All stages, or one by name.
    Stages { name: Option<String> },
    /// Names of the declared views.
    Views,
    /// Whether a stage's sources exist.
    StageExists { name: String },
    /// Export a stage's rows.
    StageExport { name: String },
    /// Import rows previously written by `stage-export`.
    StageImport { name: String, file: PathBuf },
    /// Parameters an expression expects.
    Parameters { expression: String },
    /// Result model of an expression.
    Model { expression: String },
    /// Constraints checked by an expression.
    Constraints { expression: String },
    /// Full metadata tree of an expression.
    Metadata { expression: String },
    /// Native sentences an expression translates into.
    Plan {
        expression: String,
        #[command(flatten)]
        options: QueryArgs,
    },
    /// Execute an expression.
    Execute {
        expression: String,
        /// Parameter values as a JSON object.
        #[arg(long, default_value = "{}")]
        data: String,
        #[command(flatten)]
        options: QueryArgs,
    },
    /// Enqueue an expression for asynchronous execution.
    ExecuteQueued {
        expression: String,
        #[arg(long)]
        topic: String,
        /// Parameter values as a JSON object.
        #[arg(long, default_value = "{}")]
        data: String,
        #[command(flatten)]
        options: QueryArgs,
    },
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Stage whose sources serve the query.
    #[arg(long)]
    stage: Option<String>,
    #[arg(long)]
    view: Option<String>,
    #[arg(long)]
    chunk_size: Option<u32>,
    #[arg(long)]
    try_all_can: bool,
}

impl From<QueryArgs> for QueryOptions {
    fn from(args: QueryArgs) -> Self {
        QueryOptions {
            stage: args.stage,
            view: args.view,
            chunk_size: args.chunk_size,
            try_all_can: args.try_all_can.then_some(true),
            headers: None,
        }
    }
}

impl Cli {
    /// Environment settings with command-line overrides applied.
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("invalid LAMBDAORM_* environment")?;
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        debug!(
            url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            format = %config.format,
            "Resolved client configuration"
        );
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = OrmClient::from_config(cli.client_config()?)?;
    let output = commands::run(&client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lorm", "entities", "Orders", "--url", "http://orm:9291", "--format", "light", "-v",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://orm:9291"));
        assert_eq!(cli.format, Some(Format::Light));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Entities { name: Some(ref n) } if n == "Orders"));
    }

    #[test]
    fn test_parse_plan_options() {
        let cli = Cli::try_parse_from([
            "lorm", "plan", "Orders", "--stage", "default", "--chunk-size", "500", "--try-all-can",
        ])
        .unwrap();

        let Command::Plan { expression, options } = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(expression, "Orders");
        let options = QueryOptions::from(options);
        assert_eq!(options.stage.as_deref(), Some("default"));
        assert_eq!(options.chunk_size, Some(500));
        assert_eq!(options.try_all_can, Some(true));
    }

    #[test]
    fn test_mapping_entity_requires_name() {
        let cli = Cli::try_parse_from(["lorm", "mappings", "default", "Orders"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Mappings { name: Some(_), entity: Some(_) }
        ));
        assert!(Cli::try_parse_from(["lorm", "--format", "verbose", "ping"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["lorm", "ping", "--url", "http://orm:1234", "--timeout", "3"])
            .unwrap();
        let config = cli.client_config().unwrap();
        assert_eq!(config.base_url, "http://orm:1234");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
