use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use clipdeck::{
    Evaluator, MonotonicGenerator, PresetCatalog, Timeline, decode_time, new_id,
    resolve_size_preset_for_key,
};

#[derive(Parser, Debug)]
#[command(name = "clipdeck", version)]
struct Cli {
    /// Log lenient fallbacks and edit decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print fresh identifiers, one per line.
    Id(IdArgs),
    /// Print the millisecond timestamp embedded in an identifier.
    Decode(DecodeArgs),
    /// Resolve typography metrics for a family and UI size.
    Size(SizeArgs),
    /// Print the overlays visible at one instant of a timeline.
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
struct IdArgs {
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Guarantee lexicographic order across the batch.
    #[arg(long)]
    monotonic: bool,

    /// Timestamp in milliseconds since the Unix epoch instead of now.
    #[arg(long)]
    at: Option<u64>,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    id: String,
}

#[derive(Parser, Debug)]
struct SizeArgs {
    #[arg(long)]
    family: String,

    #[arg(long)]
    variant: Option<String>,

    /// UI size (10..=40) or legacy bucket name.
    #[arg(long)]
    size: String,

    /// Preset catalog JSON; the built-in catalog when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline time in seconds.
    #[arg(long)]
    at: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.cmd {
        Command::Id(args) => cmd_id(args),
        Command::Decode(args) => cmd_decode(args),
        Command::Size(args) => cmd_size(args),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn read_timeline_json(path: &Path) -> anyhow::Result<Timeline> {
    let f = File::open(path).with_context(|| format!("open timeline '{}'", path.display()))?;
    let r = BufReader::new(f);
    let timeline: Timeline =
        serde_json::from_reader(r).with_context(|| "parse timeline JSON")?;
    Ok(timeline)
}

fn cmd_id(args: IdArgs) -> anyhow::Result<()> {
    if args.monotonic {
        let mut ids = MonotonicGenerator::new();
        for _ in 0..args.count {
            println!("{}", ids.new_monotonic_id(args.at));
        }
    } else {
        for _ in 0..args.count {
            println!("{}", new_id(args.at));
        }
    }
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let ms = decode_time(&args.id)?;
    println!("{ms}");
    Ok(())
}

fn cmd_size(args: SizeArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read catalog '{}'", path.display()))?;
            PresetCatalog::from_json_str(&raw)?
        }
        None => PresetCatalog::builtin(),
    };
    let family = catalog
        .family(&args.family)
        .with_context(|| format!("unknown font family '{}'", args.family))?;

    let preset =
        resolve_size_preset_for_key(Some(&args.size), Some(family), args.variant.as_deref());
    println!("{}", serde_json::to_string(&preset)?);
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let timeline = read_timeline_json(&args.in_path)?;
    let frame = Evaluator::resolve_at(&timeline, args.at)
        .with_context(|| format!("resolve '{}' at {}s", args.in_path.display(), args.at))?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
