//! Runtime configuration for the demo, read from the environment.

use std::path::{Path, PathBuf};

use subsea_core::grading::presets::{self, Preset, UNDERWATER_REFERENCE};
use subsea_core::{ColorMatrix, ParameterSet};

use crate::error::DemoError;
use crate::pipeline::Pipeline;

/// Default log filter when neither `RUST_LOG` nor `SUBSEA_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the Subsea demo.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base log filter.
    pub log_level: String,
    /// JSON parameter file. Missing fields take their defaults.
    pub params_path: Option<PathBuf>,
    /// Force auto mode regardless of the parameter file.
    pub auto: bool,
    /// Depth override for auto mode.
    pub depth: Option<f64>,
    /// Multiplier preset copied into the parameters.
    pub preset: Option<String>,
    /// Multiply the preset into the corrected pixels instead.
    pub bake_preset: bool,
    /// Correct with the built-in underwater reference matrix.
    pub reference: bool,
    /// JSON file holding a 20-coefficient matrix to correct with.
    pub matrix_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: std::env::var("SUBSEA_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            params_path: std::env::var_os("SUBSEA_PARAMS").map(PathBuf::from),
            auto: std::env::var("SUBSEA_AUTO").is_ok(),
            depth: std::env::var("SUBSEA_DEPTH").ok().and_then(|s| s.parse().ok()),
            preset: std::env::var("SUBSEA_PRESET").ok(),
            bake_preset: std::env::var("SUBSEA_BAKE_PRESET").is_ok(),
            reference: std::env::var("SUBSEA_REFERENCE").is_ok(),
            matrix_path: std::env::var_os("SUBSEA_MATRIX").map(PathBuf::from),
        }
    }
}

impl AppConfig {
    /// Build the parameter set: file (or defaults), then env overrides.
    pub fn load_params(&self) -> Result<ParameterSet, DemoError> {
        let mut params = match &self.params_path {
            Some(path) => read_params(path)?,
            None => ParameterSet::default(),
        };
        self.apply_overrides(&mut params)?;
        params.validate()?;
        Ok(params)
    }

    /// Per-frame steps outside the session: a fixed matrix and a baked preset.
    ///
    /// A matrix file takes precedence over the reference matrix.
    pub fn pipeline(&self) -> Result<Pipeline, DemoError> {
        let fixed = match &self.matrix_path {
            Some(path) => Some(read_matrix(path)?),
            None if self.reference => Some(UNDERWATER_REFERENCE),
            None => None,
        };
        let baked = if self.bake_preset { self.preset()? } else { None };
        Ok(Pipeline { fixed, baked })
    }

    fn preset(&self) -> Result<Option<&'static Preset>, DemoError> {
        let Some(name) = self.preset.as_deref() else {
            return Ok(None);
        };
        presets::find(name)
            .map(Some)
            .ok_or_else(|| DemoError::UnknownPreset(name.to_string()))
    }

    fn apply_overrides(&self, params: &mut ParameterSet) -> Result<(), DemoError> {
        if self.auto {
            params.mode = subsea_core::CorrectionMode::Auto;
        }
        if let Some(depth) = self.depth {
            params.depth = depth;
        }
        let preset = self.preset()?;
        if let Some(preset) = preset.filter(|_| !self.bake_preset) {
            preset.apply_to(params);
        }
        Ok(())
    }
}

fn read_params(path: &Path) -> Result<ParameterSet, DemoError> {
    let text = std::fs::read_to_string(path)?;
    let params = serde_json::from_str(&text)?;
    tracing::info!("loaded parameters from {}", path.display());
    Ok(params)
}

fn read_matrix(path: &Path) -> Result<ColorMatrix, DemoError> {
    let text = std::fs::read_to_string(path)?;
    let matrix = serde_json::from_str(&text).map_err(DemoError::Matrix)?;
    tracing::info!("loaded color matrix from {}", path.display());
    Ok(matrix)
}
