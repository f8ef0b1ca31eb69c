//! seokit CLI
//!
//! Generates SEO meta tags and multilingual XML sitemaps from Markdown content.
//!
//! This is the binary entry point. The command implementations are in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use seokit::cmd::{self, SourceKind, generate::GenerateOptions};

/// Command-line interface for seokit.
#[derive(Parser)]
#[command(
    name = "seokit",
    version,
    about = "SEO meta tags and multilingual sitemaps for Markdown sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate per-language sitemaps and the sitemap index
    Generate {
        /// Output directory (overrides sitemap.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Content source
        #[arg(short, long, value_enum, default_value_t = SourceKind::Mock)]
        source: SourceKind,
        /// Content directory (overrides content.dir)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Emit generation metrics
        #[arg(long)]
        monitored: bool,
    },
    /// Check generated SEO for all published content
    Validate {
        /// Content source
        #[arg(short, long, value_enum, default_value_t = SourceKind::Mock)]
        source: SourceKind,
        /// Content directory (overrides content.dir)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Show derived fields and SEO for each Markdown file
    Inspect {
        /// Content directory (overrides content.dir)
        #[arg(long)]
        content: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    seokit::init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            output,
            source,
            content,
            monitored,
        } => {
            let options = GenerateOptions {
                output,
                source,
                content,
                monitored,
            };
            cmd::generate::run(&cli.config, &options).await?;
        }
        Commands::Validate {
            source,
            content,
            strict,
        } => {
            cmd::validate::run(&cli.config, source, content, strict).await?;
        }
        Commands::Inspect { content, json } => {
            cmd::inspect::run(&cli.config, content, json).await?;
        }
    }

    Ok(())
}
