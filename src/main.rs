use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use refscan::{
    config::Config,
    output::{render, write_report, OutputFormat},
    platform::open_in_viewer,
    scanner::ensure_folder,
    Analyzer, NugetRegistry,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refscan")]
#[command(
    author,
    version,
    about = "Report framework versions, references and NuGet package freshness for a folder of .NET projects"
)]
struct Cli {
    /// Folder to analyze
    folder: PathBuf,

    /// Output format (html, table, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Write the report to this file instead of a temporary one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't open the HTML report in the default viewer
    #[arg(long)]
    no_open: bool,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "refscan=debug" } else { "refscan=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(
            path = %Config::config_path().display(),
            error = %e,
            "ignoring unreadable config file"
        );
        Config::default()
    });

    let format_str = cli.format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format != OutputFormat::Json;

    ensure_folder(&cli.folder)?;

    let registry = NugetRegistry::connect(&config.service_index_url)
        .await
        .context("Failed to set up the package registry")?;

    let mut analyzer = Analyzer::new(&config, &registry);
    if is_interactive {
        analyzer = analyzer.with_progress(progress_bar());
    }
    let analysis = analyzer.run(&cli.folder).await?;

    let report = render(&analysis, format)?;

    match format {
        OutputFormat::Html => {
            let path = write_report(&report, cli.output.as_deref(), format)?;
            println!("Report written to: {}", path.display());
            if config.open_report && !cli.no_open {
                open_in_viewer(&path);
            }
        }
        OutputFormat::Table | OutputFormat::Json => match cli.output {
            Some(path) => {
                write_report(&report, Some(&path), format)?;
                if is_interactive {
                    println!("Report written to: {}", path.display());
                }
            }
            None => println!("{}", report.trim_end()),
        },
    }

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
