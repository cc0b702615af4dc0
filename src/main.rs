use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetdeps::export::{self, ExportData, ExportFormat};
use assetdeps::resolver::{DependencyResolver, Resolution, ResolverConfig};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "assetdeps")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Build-order resolver for annotated stylesheet and script assets", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory from which source files will be read
    #[arg(short, long, default_value = "src")]
    source: PathBuf,

    /// File extension to scan; repeat for several (defaults to css and js)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Merge repeated declarations of a module instead of rejecting them
    #[arg(long)]
    merge_duplicates: bool,
}

impl SourceArgs {
    fn config(&self) -> ResolverConfig {
        let config =
            ResolverConfig::new(&self.source).with_merge_duplicates(self.merge_duplicates);
        if self.extensions.is_empty() {
            config
        } else {
            config.with_extensions(&self.extensions)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the modules under a source tree in build order
    Order {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format: text, files, or json
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// File to which output will be written (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the declarations under a source tree
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show version information
    Version,
}

/// Filter used when `ASSETDEPS_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "assetdeps=debug,info"
    } else {
        "assetdeps=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ASSETDEPS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn resolve(source: &SourceArgs) -> Result<Resolution> {
    let resolver = DependencyResolver::new(source.config())
        .context("Failed to initialize annotation extractor")?;
    resolver
        .scan()
        .with_context(|| format!("Failed to resolve modules under {}", source.source.display()))
}

fn run_order(source: &SourceArgs, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let resolution = resolve(source)?;
    let data = ExportData::new(&resolution);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export::export(format, &data, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), %format, modules = data.modules.len(), "wrote build order");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            export::export(format, &data, &mut lock)?;
        }
    }

    Ok(())
}

fn run_check(source: &SourceArgs) -> Result<()> {
    let resolution = resolve(source)?;
    let graph = resolution.graph();

    println!(
        "✅ {} modules from {} files, {} requirements, no cycles",
        graph.node_count(),
        resolution.files_scanned(),
        graph.edge_count()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Order {
            source,
            format,
            output,
        }) => run_order(source, *format, output.as_deref()),
        Some(Commands::Check { source }) => run_check(source),
        Some(Commands::Version) => {
            println!("assetdeps v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("assetdeps - Build-order resolver for annotated assets");
            println!("Run 'assetdeps order --source <dir>' to print the build order");
            println!("Run 'assetdeps --help' for more information");
            Ok(())
        }
    }
}
