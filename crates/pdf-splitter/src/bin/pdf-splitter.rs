//! pdf-splitter command line
//!
//! Run with: cargo run -p pdf-splitter -- --input class.pdf --output-dir out --rclone remote:folder

use anyhow::Context;
use clap::Parser;
use pdf_splitter::{OverviewWindow, Splitter, SplitterConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Split a PDF into per-student PDFs
#[derive(Debug, Parser)]
#[command(name = "pdf-splitter", version, about, arg_required_else_help = true)]
struct Cli {
    /// Input PDF path
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output as csv, tsv or zip
    #[arg(long = "as", value_name = "FORMAT")]
    as_type: Option<String>,

    /// Optional rclone remote destination (e.g. remote:folder)
    #[arg(long, value_name = "REMOTE")]
    rclone: Option<String>,

    /// rclone executable
    #[arg(long, value_name = "PATH")]
    rclone_bin: Option<String>,

    /// Regex pattern to detect the student number
    #[arg(long, value_name = "REGEX")]
    sn_pattern: Option<String>,

    /// Regex pattern to detect the overview block (use a capturing group for the name)
    #[arg(long, value_name = "REGEX")]
    overview_pattern: Option<String>,

    /// Also look for the overview block on the page after the student number
    #[arg(long)]
    overview_next_page: bool,

    /// Pages before the first match: drop or attach
    #[arg(long, value_name = "POLICY")]
    preamble: Option<String>,

    /// Fail when no match is found instead of writing the whole document
    #[arg(long)]
    strict: bool,

    /// Identifier used when no match is found
    #[arg(long, value_name = "ID")]
    fallback_id: Option<String>,

    /// Manifest path (default: <output-dir>/manifest.csv)
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Remove local PDFs once they are uploaded
    #[arg(long)]
    delete_after_upload: bool,

    /// TOML configuration file; flags take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer command line flags over the loaded configuration
    fn apply(&self, config: &mut SplitterConfig) -> pdf_splitter::Result<()> {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(mode) = &self.as_type {
            config.output.mode = mode.parse()?;
        }
        if let Some(path) = &self.manifest {
            config.output.manifest_path = Some(path.clone());
        }
        if let Some(remote) = &self.rclone {
            config.upload.remote = Some(remote.clone());
        }
        if let Some(bin) = &self.rclone_bin {
            config.upload.rclone_binary = bin.clone();
        }
        if self.delete_after_upload {
            config.upload.delete_after_upload = true;
        }
        if let Some(pattern) = &self.sn_pattern {
            config.markers.identifier_pattern = pattern.clone();
        }
        if let Some(pattern) = &self.overview_pattern {
            config.markers.overview_pattern = pattern.clone();
        }
        if self.overview_next_page {
            config.markers.overview_window = OverviewWindow::NextPage;
        }
        if let Some(policy) = &self.preamble {
            config.markers.preamble = policy.parse()?;
        }
        if self.strict {
            config.markers.require_marker = true;
        }
        if let Some(id) = &self.fallback_id {
            config.markers.fallback_identifier = id.clone();
        }
        config.validate()
    }
}

fn main() -> anyhow::Result<()> {
    // stdout carries the progress stream, diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_splitter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SplitterConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SplitterConfig::default(),
    };
    cli.apply(&mut config)?;

    tracing::debug!("Configuration: {:?}", config);

    let mut splitter = Splitter::new(config)?;
    let report = splitter
        .run(&cli.input)
        .with_context(|| format!("splitting {}", cli.input.display()))?;

    if report.upload_failures() > 0 {
        tracing::warn!(
            "{} upload(s) failed; see {}",
            report.upload_failures(),
            report.manifest_path.display()
        );
    }

    Ok(())
}
