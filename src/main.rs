use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use parlaseg::io::{
    collect_document_paths, read_instances, read_patterns, read_roster, write_instances, write_xml,
};
use parlaseg::{
    assemble_documents, detect_documents, load_documents, BatchConfig, CorpusConfig, NoiseConfig,
    Roster,
};

#[derive(Parser)]
#[command(name = "parlaseg")]
#[command(
    author,
    version,
    about = "Segment parliamentary protocols into speaker-attributed Parla-Clarin XML",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DetectArgs {
    /// Pattern set (JSON Lines, one {"pattern": ...} per line)
    #[arg(short, long)]
    patterns: PathBuf,

    /// Roster of known speakers (JSON Lines with "name", or one name per line)
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Minimum letter ratio below which short blocks count as noise
    #[arg(long, default_value = "0.85")]
    noise_ratio: f64,

    /// Blocks this long or longer are never noise
    #[arg(long, default_value = "150")]
    noise_max_len: usize,
}

#[derive(Args)]
struct AssembleArgs {
    /// Corpus edition; pass an empty string to omit the edition statement
    #[arg(long, default_value = "0.1.0")]
    edition: String,

    /// Fallback year for documents without an inferable year
    #[arg(long, default_value = "2020")]
    fallback_year: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect segmentation pattern instances and persist the instance table
    Detect {
        /// Protocol files or directories (.xml or .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        detect: DetectArgs,

        /// Output instance table (JSON Lines)
        #[arg(short, long)]
        output: PathBuf,

        /// Skip unreadable documents instead of aborting
        #[arg(long)]
        keep_going: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Assemble protocols into a Parla-Clarin corpus from a persisted instance table
    Assemble {
        /// Protocol files or directories (.xml or .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Instance table produced by `detect`
        #[arg(short, long)]
        instances: PathBuf,

        #[command(flatten)]
        assemble: AssembleArgs,

        /// Output corpus XML
        #[arg(short, long)]
        output: PathBuf,

        /// Skip unreadable documents instead of aborting
        #[arg(long)]
        keep_going: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Detect and assemble in one run
    Process {
        /// Protocol files or directories (.xml or .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        detect: DetectArgs,

        #[command(flatten)]
        assemble: AssembleArgs,

        /// Output corpus XML
        #[arg(short, long)]
        output: PathBuf,

        /// Also persist the instance table here
        #[arg(long)]
        instances_out: Option<PathBuf>,

        /// Skip unreadable documents instead of aborting
        #[arg(long)]
        keep_going: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report detection statistics without writing output
    Analyze {
        /// Protocol files or directories (.xml or .txt)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        detect: DetectArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            inputs,
            detect,
            output,
            keep_going,
            verbose,
        } => {
            setup_logging(verbose);
            run_detect(inputs, detect, output, keep_going)
        }
        Commands::Assemble {
            inputs,
            instances,
            assemble,
            output,
            keep_going,
            verbose,
        } => {
            setup_logging(verbose);
            run_assemble(inputs, instances, assemble, output, keep_going)
        }
        Commands::Process {
            inputs,
            detect,
            assemble,
            output,
            instances_out,
            keep_going,
            verbose,
        } => {
            setup_logging(verbose);
            run_process(inputs, detect, assemble, output, instances_out, keep_going)
        }
        Commands::Analyze {
            inputs,
            detect,
            verbose,
        } => {
            setup_logging(verbose);
            run_analyze(inputs, detect)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn batch_config(
    detect: Option<&DetectArgs>,
    assemble: Option<&AssembleArgs>,
    keep_going: bool,
) -> BatchConfig {
    let mut config = BatchConfig {
        keep_going,
        ..Default::default()
    };
    if let Some(detect) = detect {
        config.noise = NoiseConfig {
            min_ratio: detect.noise_ratio,
            max_len: detect.noise_max_len,
        };
    }
    if let Some(assemble) = assemble {
        config.header_defaults.fallback_year = assemble.fallback_year;
        config.corpus = CorpusConfig {
            edition: Some(assemble.edition.clone()).filter(|e| !e.is_empty()),
            ..Default::default()
        };
    }
    config
}

fn load_inputs(args: &DetectArgs) -> Result<(Vec<parlaseg::Pattern>, Option<Roster>)> {
    info!("Loading patterns from {:?}", args.patterns);
    let patterns = read_patterns(&args.patterns)?;

    let roster = match &args.roster {
        Some(path) => {
            let roster = read_roster(path)?;
            info!("Loaded {} roster names from {:?}", roster.len(), path);
            Some(roster)
        }
        None => {
            info!("No roster given; all turns will be labeled UNK");
            None
        }
    };

    info!("Loaded {} patterns", patterns.len());
    Ok((patterns, roster))
}

fn run_detect(
    inputs: Vec<PathBuf>,
    args: DetectArgs,
    output: PathBuf,
    keep_going: bool,
) -> Result<()> {
    let config = batch_config(Some(&args), None, keep_going);
    let (patterns, roster) = load_inputs(&args)?;

    let paths = collect_document_paths(&inputs)?;
    let (documents, skipped) = load_documents(&paths, config.keep_going)?;
    info!("Scanning {} documents ({} skipped)", documents.len(), skipped.len());

    let batch = detect_documents(&documents, &patterns, roster.as_ref(), &config)
        .context("Instance detection failed")?;

    write_instances(&output, &batch.index)?;
    info!("Wrote {} instances to {:?}", batch.index.len(), output);
    Ok(())
}

fn run_assemble(
    inputs: Vec<PathBuf>,
    instances: PathBuf,
    args: AssembleArgs,
    output: PathBuf,
    keep_going: bool,
) -> Result<()> {
    let config = batch_config(None, Some(&args), keep_going);

    info!("Loading instances from {:?}", instances);
    let index = read_instances(&instances)?;
    info!("Loaded {} instances", index.len());

    let paths = collect_document_paths(&inputs)?;
    let (documents, skipped) = load_documents(&paths, config.keep_going)?;
    info!("Assembling {} documents ({} skipped)", documents.len(), skipped.len());

    let corpus = assemble_documents(&documents, &index, &config)?;
    write_xml(&output, &corpus.xml)?;
    info!(
        "Corpus with {} documents written to {:?} ({} empty elements pruned)",
        corpus.documents, output, corpus.elements_pruned
    );
    Ok(())
}

fn run_process(
    inputs: Vec<PathBuf>,
    detect: DetectArgs,
    assemble: AssembleArgs,
    output: PathBuf,
    instances_out: Option<PathBuf>,
    keep_going: bool,
) -> Result<()> {
    let config = batch_config(Some(&detect), Some(&assemble), keep_going);
    let (patterns, roster) = load_inputs(&detect)?;

    let paths = collect_document_paths(&inputs)?;
    let (documents, skipped) = load_documents(&paths, config.keep_going)?;
    info!("Processing {} documents ({} skipped)", documents.len(), skipped.len());

    // Stage 0: Detection
    info!("Stage 0: Detecting instances...");
    let batch = detect_documents(&documents, &patterns, roster.as_ref(), &config)
        .context("Instance detection failed")?;

    if let Some(path) = &instances_out {
        write_instances(path, &batch.index)?;
        info!("Instance table written to {:?}", path);
    }

    // Stages 1 & 2: Assembly
    info!("Stage 1: Assembling documents...");
    let corpus = assemble_documents(&documents, &batch.index, &config)?;
    write_xml(&output, &corpus.xml)?;

    info!(
        "Complete: {} documents, {} instances, output written to {:?}",
        corpus.documents,
        batch.index.len(),
        output
    );
    Ok(())
}

fn run_analyze(inputs: Vec<PathBuf>, args: DetectArgs) -> Result<()> {
    let config = batch_config(Some(&args), None, true);
    let (patterns, roster) = load_inputs(&args)?;

    let paths = collect_document_paths(&inputs)?;
    let (documents, skipped) = load_documents(&paths, config.keep_going)?;
    let batch = detect_documents(&documents, &patterns, roster.as_ref(), &config)?;

    println!("Segmentation Analysis");
    println!("=====================");
    println!("Documents: {} ({} unreadable)", documents.len(), skipped.len());
    println!("Patterns: {}", patterns.len());
    println!(
        "Roster names: {}",
        roster.as_ref().map(|r| r.len()).unwrap_or(0)
    );
    println!();

    println!("Per Document");
    println!("------------");
    for report in &batch.reports {
        println!(
            "{}: {} blocks ({} noise), {} paragraphs, {} instances, {} resolved",
            report.document_id,
            report.blocks,
            report.noise_blocks,
            report.paragraphs,
            report.instances,
            report.resolved
        );
    }
    println!();

    let total = batch.index.len();
    let resolved = batch.index.rows().iter().filter(|r| r.speaker.is_some()).count();
    let resolved_pct = if total > 0 {
        resolved as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    println!("Instances: {} ({:.1}% resolved)", total, resolved_pct);

    Ok(())
}
