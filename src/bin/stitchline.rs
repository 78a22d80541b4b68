use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stitchline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate a timeline and write its concatenation plan as JSON.
    Plan(PlanArgs),
    /// Time narration text into an SRT (or JSON) subtitle track.
    Subtitles(SubtitleArgs),
    /// Allocate, plan and render an MP4 (requires the `media-ffmpeg` feature and `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input composition request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional tuning config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probe sources concurrently instead of lazily in order.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for parallel probing (default: rayon's choice).
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// I/O timeout in seconds for remote sources.
    #[arg(long)]
    probe_timeout: Option<f64>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Output plan JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the full composition response (timeline, diagnostics) here.
    #[arg(long)]
    response: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SubtitleArgs {
    /// Input JSON: one subtitle request or an array of them.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Optional tuning config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the track as JSON instead of SRT.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Directory for intermediate files.
    #[arg(long)]
    work_dir: PathBuf,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SubtitleInput {
    One(stitchline::SubtitleRequest),
    Many(Vec<stitchline::SubtitleRequest>),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Subtitles(args) => cmd_subtitles(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<stitchline::StitchConfig> {
    match path {
        Some(p) => stitchline::StitchConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(stitchline::StitchConfig::default()),
    }
}

fn run_compose(
    args: &ComposeArgs,
) -> anyhow::Result<(stitchline::CompositionResponse, stitchline::ConcatenationPlan)> {
    let mut cfg = load_config(args.config.as_deref())?;
    if args.parallel {
        cfg.allocator.probe_mode = stitchline::ProbeMode::Parallel {
            threads: args.threads,
        };
    }

    let req = stitchline::CompositionRequest::from_path(&args.in_path)
        .with_context(|| format!("load request '{}'", args.in_path.display()))?;

    let mut prober = stitchline::FfprobeProber::new();
    if let Some(secs) = args.probe_timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid --probe-timeout {secs}"))?;
        prober = prober.with_timeout(timeout);
    }

    let resp = stitchline::compose(&req, &prober, &cfg.allocator)?;
    for d in &resp.diagnostics {
        eprintln!("skipped {}: {d:?}", d.location());
    }
    if let Some(gap) = resp.shortfall {
        eprintln!(
            "shortfall: filled {:.3}s of {:.3}s ({gap:.3}s missing)",
            resp.actual_duration, req.target_duration
        );
    }

    let plan = stitchline::emit_plan(&resp.timeline);
    Ok((resp, plan))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (resp, plan) = run_compose(&args.compose)?;

    plan.write_json(&args.out)?;
    if let Some(path) = &args.response {
        stitchline::process::processor::ensure_parent_dir(path)?;
        std::fs::write(path, resp.to_json_pretty()?)
            .with_context(|| format!("write response '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} ({} steps, {:.3}s)",
        args.out.display(),
        plan.steps.len(),
        plan.total_duration
    );
    Ok(())
}

fn cmd_subtitles(args: SubtitleArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;

    let f = File::open(&args.in_path)
        .with_context(|| format!("open subtitle input '{}'", args.in_path.display()))?;
    let input: SubtitleInput =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse subtitle input JSON")?;
    let blocks = match input {
        SubtitleInput::One(req) => vec![req],
        SubtitleInput::Many(reqs) => reqs,
    };

    let fragments = stitchline::synthesize_blocks(&blocks, &cfg.subtitles)?;
    let track = stitchline::emit_track(&fragments);

    if args.json {
        stitchline::process::processor::ensure_parent_dir(&args.out)?;
        let json = serde_json::to_string_pretty(&track).context("encode subtitle track JSON")?;
        std::fs::write(&args.out, json)
            .with_context(|| format!("write '{}'", args.out.display()))?;
    } else {
        track.write_srt(&args.out)?;
    }

    eprintln!("wrote {} ({} cues)", args.out.display(), track.cues.len());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if !stitchline::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for render but was not found on PATH");
    }

    let (_resp, plan) = run_compose(&args.compose)?;
    let mut processor =
        stitchline::FfmpegProcessor::new(&args.work_dir)?.with_out_path(&args.out);
    let out = stitchline::execute_plan(&plan, &mut processor)?;

    eprintln!("wrote {}", out.path.display());
    Ok(())
}
