//! Subsea Demo — corrects a still image or a directory of video frames.
//!
//! A still image is corrected once. A directory is treated as one clip: its
//! frames share a session so the matrix is smoothed across them.

mod config;
mod error;
mod image_loader;
mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use subsea_core::CorrectionSession;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::DemoError;
use crate::pipeline::Pipeline;

fn main() -> ExitCode {
    let config = AppConfig::default();
    init_logging(&config.log_level);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(base_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn run(config: &AppConfig) -> Result<(), DemoError> {
    let mut args = std::env::args_os().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Err(DemoError::Usage);
    };
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let params = config.load_params()?;
    let pipeline = config.pipeline()?;
    tracing::info!(
        auto = params.is_auto(),
        depth = params.depth,
        fixed_matrix = pipeline.fixed.is_some(),
        baked_preset = pipeline.baked.map(|p| p.name),
        "starting correction"
    );
    tracing::debug!("parameters: {}", serde_json::to_string(&params)?);
    let mut session = CorrectionSession::new(params);

    if input.is_dir() {
        correct_clip(&mut session, &pipeline, &input, &output)
    } else {
        session.on_new_media();
        correct_file(&mut session, &pipeline, &input, &output)
    }
}

fn correct_clip(
    session: &mut CorrectionSession,
    pipeline: &Pipeline,
    dir: &Path,
    out_dir: &Path,
) -> Result<(), DemoError> {
    let frames = image_loader::frame_paths(dir)?;
    std::fs::create_dir_all(out_dir)?;
    session.on_new_media();

    for path in &frames {
        let Some(name) = path.file_name() else {
            continue;
        };
        correct_file(session, pipeline, path, &out_dir.join(name))?;
    }

    tracing::info!(
        frames = frames.len(),
        alpha = session.smoother().alpha(),
        cached = session.cache().len(),
        "clip corrected"
    );
    Ok(())
}

fn correct_file(
    session: &mut CorrectionSession,
    pipeline: &Pipeline,
    input: &Path,
    output: &Path,
) -> Result<(), DemoError> {
    let mut frame = image_loader::load_frame(input)?;
    let matrix = pipeline.correct(session, &mut frame)?;
    tracing::debug!(input = %input.display(), ?matrix, "frame corrected");

    image_loader::save_frame(output, frame)?;
    tracing::info!("wrote {}", output.display());
    Ok(())
}
