//! CLI for mfpq — device telemetry reports from a MobileFirst analytics index.

mod commands;

use clap::{Parser, Subcommand};
use mfpq_core::IndexConfig;

#[derive(Parser)]
#[command(name = "mfpq")]
#[command(about = "mfpq — device telemetry reports from a MobileFirst analytics index")]
#[command(version = mfpq_core::VERSION)]
struct Cli {
    /// Index host name
    #[arg(long, global = true, default_value = "localhost")]
    host: String,

    /// Index HTTP port
    #[arg(long, global = true, default_value_t = 9200)]
    port: u16,

    /// Index to query
    #[arg(long, global = true, default_value = "worklight")]
    index: String,

    /// Page size for scrolled scans
    #[arg(long, global = true, default_value_t = 1000)]
    scroll_size: usize,

    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    /// Log outgoing queries and scroll progress
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a report against the device index
    Run {
        /// Report name (see `mfpq reports` for the list)
        report: String,

        /// Only devices reporting this application
        #[arg(long)]
        app_name: Option<String>,

        /// Only devices reporting this application version
        #[arg(long)]
        app_version: Option<String>,

        /// Earliest first access to include, inclusive (YYYY-MM-DD or epoch ms)
        #[arg(long)]
        since: Option<String>,

        /// First access cutoff, exclusive (YYYY-MM-DD or epoch ms)
        #[arg(long)]
        until: Option<String>,

        /// Write the complete report as pretty JSON to this path
        #[arg(long)]
        output: Option<String>,
    },

    /// List the available reports
    Reports,

    /// Check connectivity to the index host
    Ping,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = IndexConfig {
        host: cli.host,
        port: cli.port,
        index: cli.index,
        scroll_size: cli.scroll_size,
        timeout_secs: cli.timeout_secs,
    };

    match cli.command {
        Commands::Run {
            report,
            app_name,
            app_version,
            since,
            until,
            output,
        } => commands::run::run(
            &config,
            commands::run::RunArgs {
                report: &report,
                app_name: app_name.as_deref(),
                app_version: app_version.as_deref(),
                since: since.as_deref(),
                until: until.as_deref(),
                output: output.as_deref(),
            },
        ),
        Commands::Reports => commands::reports::run(),
        Commands::Ping => commands::ping::run(&config),
    }
}

/// `--debug` raises the default level; RUST_LOG still overrides everything.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
