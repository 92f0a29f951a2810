//! LinkRank CLI — rank the nodes of a link graph
//!
//! Loads a JSON link graph, runs the fixed-iteration rank engine and prints
//! nodes by descending rank. The computation time goes to stderr.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use linkrank::{run, OutputFormat, ResultPresenter, RunConfig};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "linkrank", version, about = "PageRank over JSON link graphs")]
struct Cli {
    /// Graph input (JSON Lines or JSON array of {id, neighbors, url})
    input: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, short = 'c', env = "LINKRANK_CONFIG")]
    config: Option<PathBuf>,

    /// Number of iterations
    #[arg(long, short = 'n')]
    iterations: Option<usize>,

    /// Damping factor in (0, 1)
    #[arg(long, short = 'd')]
    damping: Option<f64>,

    /// Number of graph partitions
    #[arg(long, short = 'p')]
    partitions: Option<usize>,

    /// Worker threads (defaults to the global pool)
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// Output format
    #[arg(long, short = 'f')]
    format: Option<Format>,

    /// Print only the N highest ranked nodes
    #[arg(long)]
    top: Option<usize>,

    /// More logging (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Errors only
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
    Table,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
            Format::Table => OutputFormat::Table,
        }
    }
}

impl Cli {
    fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::WARN,
            (false, 1) => Level::INFO,
            _ => Level::DEBUG,
        }
    }

    /// File values first, then command-line overrides
    fn resolve_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input = Some(input.clone());
        }
        if let Some(iterations) = self.iterations {
            config.engine.iterations = iterations;
        }
        if let Some(damping) = self.damping {
            config.engine.damping_factor = damping;
        }
        if let Some(partitions) = self.partitions {
            config.engine.partitions = partitions;
        }
        if let Some(threads) = self.threads {
            config.engine.threads = Some(threads);
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        if let Some(top) = self.top {
            config.top = Some(top);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    let report = run(&config).context("ranking failed")?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    ResultPresenter::new(&report.labels)
        .with_top(config.top)
        .write(&report.table, config.format, &mut out)?;
    out.flush()?;

    eprintln!("{} sec", report.elapsed.as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["linkrank", "links.jsonl", "-n", "5", "-d", "0.5", "-f", "csv", "--top", "3"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.input, Some(PathBuf::from("links.jsonl")));
        assert_eq!(config.engine.iterations, 5);
        assert_eq!(config.engine.damping_factor, 0.5);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.top, Some(3));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["linkrank", "links.jsonl", "--damping", "1.5"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(Cli::parse_from(["linkrank"]).log_level(), Level::WARN);
        assert_eq!(Cli::parse_from(["linkrank", "-vv"]).log_level(), Level::DEBUG);
        assert_eq!(Cli::parse_from(["linkrank", "-q"]).log_level(), Level::ERROR);
    }
}
