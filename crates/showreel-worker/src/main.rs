//! Showreel worker binary.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use showreel_media::transitions::TransitionCatalog;
use showreel_media::{
    add_watermark, build_graph, cleanup, extract_info, generate_thumbnail, optimize_for_pacing,
    optimize_for_platform, recommended_sequence, transition_presets, validate_sequence,
    MediaConfig, TransitionPreset, VideoCompiler, WatermarkConfig,
};
use showreel_models::{CompilationRequest, VehicleStyle};

use crate::cli::{Cli, Command, CompileArgs, TransitionsCommand};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = MediaConfig::from_env();
    info!(?config, "Media config loaded");

    if let Err(e) = run(cli.command, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Colored output for dev, JSON for production.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("showreel=info,warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run(command: Command, config: MediaConfig) -> Result<()> {
    let compiler = VideoCompiler::new(&config);
    let runner = compiler.runner();

    match command {
        Command::Compile(args) => {
            ensure_ffmpeg(&compiler).await?;
            let request = load_request(&args, compiler.catalog())?;
            let output = compiler.compile(&request).await.map_err(|e| {
                if let Some(stderr) = e.stderr() {
                    warn!(stderr, "FFmpeg diagnostics");
                }
                e
            })?;
            println!("{}", output.display());
        }
        Command::Transitions(cmd) => run_transitions(cmd, compiler.catalog())?,
        Command::Platform { input, platform } => {
            ensure_ffmpeg(&compiler).await?;
            let output = optimize_for_platform(runner, &input, platform).await?;
            println!("{}", output.display());
        }
        Command::Probe { input } => {
            let info = extract_info(runner, &input).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Watermark {
            input,
            image,
            position,
            opacity,
        } => {
            ensure_ffmpeg(&compiler).await?;
            let config = WatermarkConfig::default().with_opacity(opacity);
            let output = add_watermark(runner, &input, &image, position, &config).await?;
            println!("{}", output.display());
        }
        Command::Thumbnail { input, offset } => {
            ensure_ffmpeg(&compiler).await?;
            let output = generate_thumbnail(runner, &input, &config.scratch_dir, offset).await?;
            println!("{}", output.display());
        }
        Command::Cleanup { paths } => {
            let removed = cleanup(&paths).await;
            info!(removed, requested = paths.len(), "Cleanup finished");
        }
        Command::Check => {
            if runner.is_available().await {
                println!("ffmpeg available: {}", config.ffmpeg_path.display());
            } else {
                bail!("ffmpeg is not invocable: {}", config.ffmpeg_path.display());
            }
        }
        Command::Schema => {
            let schema = schemars::schema_for!(CompilationRequest);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

async fn ensure_ffmpeg(compiler: &VideoCompiler) -> Result<()> {
    if !compiler.runner().is_available().await {
        bail!("ffmpeg is not available; set SHOWREEL_FFMPEG_PATH");
    }
    Ok(())
}

/// Read the request file and apply any transition override from the CLI.
fn load_request(args: &CompileArgs, catalog: &TransitionCatalog) -> Result<CompilationRequest> {
    let raw = std::fs::read_to_string(&args.request)
        .with_context(|| format!("reading {}", args.request.display()))?;
    let mut request: CompilationRequest =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", args.request.display()))?;

    let pairs = request.clips.len().saturating_sub(1);

    if let Some(ids) = &args.transitions {
        for id in ids {
            catalog.require(id)?;
        }
        request.transitions = Some(ids.clone());
    } else if let Some(name) = &args.preset {
        let preset: TransitionPreset = name.parse()?;
        request.transitions = Some(cycle_ids(&preset.ids(), pairs));
    } else if let Some(style) = &args.style {
        let ids = optimize_for_pacing(style, &args.moods);
        request.transitions = Some(cycle_ids(&ids, pairs));
    }

    let durations: Vec<f64> = request
        .sorted_clips()
        .iter()
        .map(|c| c.duration_seconds)
        .collect();
    let validation = validate_sequence(catalog, &request.transition_ids(), &durations);
    for problem in &validation.errors {
        warn!(%problem, "Transition sequence issue");
    }

    Ok(request)
}

/// Repeat a short sequence until it covers `pairs` clip boundaries.
fn cycle_ids(ids: &[&str], pairs: usize) -> Vec<String> {
    ids.iter().cycle().take(pairs).map(|s| s.to_string()).collect()
}

fn run_transitions(cmd: TransitionsCommand, catalog: &TransitionCatalog) -> Result<()> {
    match cmd {
        TransitionsCommand::List { category, style } => {
            let entries = match (category, style) {
                (Some(category), _) => catalog.list_by_category(category.into()),
                (None, Some(style)) => {
                    let style: VehicleStyle = style.parse()?;
                    catalog.list_suitable_for(style)
                }
                (None, None) => catalog.all().iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        TransitionsCommand::Recommend { style, moods } => {
            if moods.is_empty() {
                let sequence = recommended_sequence(catalog, &style);
                println!("{}", serde_json::to_string_pretty(&sequence)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&optimize_for_pacing(&style, &moods))?);
            }
        }
        TransitionsCommand::Validate { ids, durations } => {
            let validation = validate_sequence(catalog, &ids, &durations);
            println!("{}", serde_json::to_string_pretty(&validation)?);
        }
        TransitionsCommand::Presets => {
            println!("{}", serde_json::to_string_pretty(&transition_presets())?);
        }
        TransitionsCommand::Graph { ids, clips } => {
            println!("{}", build_graph(catalog, &ids, clips));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_ids() {
        assert_eq!(cycle_ids(&["fade", "dissolve"], 3), vec!["fade", "dissolve", "fade"]);
        assert!(cycle_ids(&["fade", "dissolve"], 0).is_empty());
    }
}
