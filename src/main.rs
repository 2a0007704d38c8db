//! Command-line interface for aidx2json

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use aidx2json::batch::{convert_batch, summarize, BatchItem};
#[cfg(feature = "cli")]
use aidx2json::converters::{serialize, AidxConverter, ConverterConfig, DEFAULT_INDENT};
#[cfg(feature = "cli")]
use aidx2json::logging::{self, Verbosity};
#[cfg(feature = "cli")]
use aidx2json::Source;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "aidx2json")]
#[command(author, version, about = "IATA AIDX XML to JSON converter", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert AIDX XML files to JSON
    Convert {
        /// XML files to convert
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Drop elements with this local name, with their subtrees
        #[arg(long = "skip-tag", value_name = "TAG")]
        skip_tags: Vec<String>,

        /// Keep only subtrees rooted at elements with this local name
        #[arg(long = "include-only", value_name = "TAG")]
        include_only: Vec<String>,

        /// Do not drop the default TPA_Extension skip tag
        #[arg(long)]
        no_default_skip: bool,

        /// Keep namespace prefixes in keys
        #[arg(long)]
        preserve_namespaces: bool,

        /// Leave out attributes
        #[arg(long)]
        no_attributes: bool,

        /// Spaces per indentation level, 0 for compact output
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,

        /// Output file for a single input (defaults to stdout)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory receiving one `<name>.json` per input
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Run the HTTP upload service
    #[cfg(feature = "server")]
    Serve(aidx2json::server::ServerConfig),
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from(cli.verbose));

    let result = match cli.command {
        Commands::Convert {
            files,
            skip_tags,
            include_only,
            no_default_skip,
            preserve_namespaces,
            no_attributes,
            indent,
            output,
            output_dir,
        } => build_config(
            skip_tags,
            include_only,
            no_default_skip,
            preserve_namespaces,
            no_attributes,
        )
        .and_then(|config| cmd_convert(config, files, indent, output, output_dir)),
        #[cfg(feature = "server")]
        Commands::Serve(config) => cmd_serve(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn build_config(
    skip_tags: Vec<String>,
    include_only: Vec<String>,
    no_default_skip: bool,
    preserve_namespaces: bool,
    no_attributes: bool,
) -> Result<ConverterConfig, Box<dyn std::error::Error>> {
    let builder = if no_default_skip {
        ConverterConfig::builder()
    } else {
        ConverterConfig::aidx_default().to_builder()
    };

    let config = builder
        .with_skip_tags(skip_tags)
        .with_include_only_tags(include_only)
        .with_preserve_namespaces(preserve_namespaces)
        .with_include_attributes(!no_attributes)
        .build()?;
    Ok(config)
}

#[cfg(feature = "cli")]
fn cmd_convert(
    config: ConverterConfig,
    files: Vec<PathBuf>,
    indent: usize,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && files.len() > 1 {
        return Err("--output takes a single input; use --output-dir for several".into());
    }

    let converter = AidxConverter::with_config(config);
    let items = files
        .iter()
        .map(|path| BatchItem::new(path.display().to_string(), Source::Path(path.clone())));
    let reports = convert_batch(&converter, items);

    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)?;
    }

    for (path, report) in files.iter().zip(&reports) {
        let conversion = match &report.outcome {
            Ok(conversion) => conversion,
            Err(e) => {
                eprintln!("✗ {}: {}", report.name, e);
                continue;
            }
        };
        let json = serialize(&conversion.node, indent)?;

        if let Some(dir) = &output_dir {
            let target = dir.join(json_file_name(path));
            fs::write(&target, format!("{}\n", json))?;
            eprintln!("✓ {} -> {}", report.name, target.display());
        } else if let Some(out_path) = &output {
            fs::write(out_path, format!("{}\n", json))?;
            eprintln!("✓ {} -> {}", report.name, out_path.display());
        } else {
            println!("{}", json);
        }
    }

    let summary = summarize(&reports);
    if summary.failed > 0 {
        return Err(format!(
            "{} of {} files failed to convert",
            summary.failed,
            reports.len()
        )
        .into());
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn json_file_name(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}.json", stem))
}

#[cfg(feature = "server")]
fn cmd_serve(config: aidx2json::server::ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(aidx2json::server::serve(config))?;
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
