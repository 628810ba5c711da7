use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "choreo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print animation start times, markers and duration as JSON.
    Summary(SummaryArgs),
    /// Print every sampled node and material value at one time as JSON.
    Sample(SampleArgs),
    /// Write one JSON sample per frame.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine options JSON applied below the script's own defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    script: ScriptArgs,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Timeline position in seconds (clamped to the duration).
    #[arg(long, default_value_t = 0.0)]
    time: f64,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    script: ScriptArgs,

    /// Output JSON lines path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second (overrides the script and config).
    #[arg(long)]
    fps: Option<u32>,

    /// Re-emit the previous sample for frames that did not change.
    #[arg(long, default_value_t = false)]
    elide: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Summary(args) => cmd_summary(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load(args: &ScriptArgs, overrides: choreo::OptionsPatch) -> anyhow::Result<choreo::Engine> {
    let base = match &args.config {
        Some(path) => choreo::EngineOptions::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => choreo::EngineOptions::default(),
    };
    let source = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read script '{}'", args.in_path.display()))?;

    let mut engine = choreo::Engine::new()
        .with_options(base)
        .with_overrides(overrides);
    engine
        .load_script_blocking(&source)
        .with_context(|| format!("load script '{}'", args.in_path.display()))?;
    Ok(engine)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let engine = load(&args.script, choreo::OptionsPatch::default())?;
    print_json(&engine.timeline_summary()?)
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let mut engine = load(&args.script, choreo::OptionsPatch::default())?;
    engine.seek(args.time)?;
    print_json(&engine.sample_state()?)
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let overrides = choreo::OptionsPatch {
        fps: args.fps,
        static_frame_elision: args.elide.then_some(true),
        ..choreo::OptionsPatch::default()
    };
    let mut engine = load(&args.script, overrides)?;
    let options = engine.options()?;

    create_parent_dir(&args.out)?;
    let file = std::fs::File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    let mut sink = choreo::JsonLinesSink::new(BufWriter::new(file));
    let stats = choreo::export_range(
        &mut engine,
        choreo::ExportOpts {
            fps: options.fps,
            static_frame_elision: options.static_frame_elision,
        },
        &mut sink,
    )
    .with_context(|| format!("export '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {} elided)",
        args.out.display(),
        stats.frames_total,
        stats.frames_elided
    );
    Ok(())
}
