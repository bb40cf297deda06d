//! Runtime configuration.
//!
//! Everything has a working default. A handful of environment variables can
//! override the asset location and the cockpit model without recompiling.

use std::{env, path::PathBuf};

use crate::resources::facet::DEFAULT_MAX_LINE_LEN;

pub const ASSET_DIR_VAR: &str = "POPCORN_ASSET_DIR";
/// Copy of `assets/` made by the build script.
pub const BUNDLED_ASSET_DIR: &str = concat!(env!("OUT_DIR"), "/assets");
pub const COCKPIT_VAR: &str = "POPCORN_COCKPIT";

const DEFAULT_GLTF_COCKPIT: &str = "models/cockpit.glb";
const DEFAULT_FACET_COCKPIT: &str = "models/cockpit.stl";

/// Which file the cockpit is loaded from, by name inside the asset archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CockpitSource {
    Gltf(String),
    FacetText(String),
}

impl CockpitSource {
    pub fn name(&self) -> &str {
        match self {
            CockpitSource::Gltf(name) | CockpitSource::FacetText(name) => name,
        }
    }

    /// `gltf`, `stl`, or a file name whose extension picks the format.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "" => None,
            "gltf" | "glb" => Some(CockpitSource::Gltf(DEFAULT_GLTF_COCKPIT.to_string())),
            "stl" | "facet" => Some(CockpitSource::FacetText(DEFAULT_FACET_COCKPIT.to_string())),
            lower if lower.ends_with(".glb") || lower.ends_with(".gltf") => {
                Some(CockpitSource::Gltf(value.to_string()))
            }
            lower if lower.ends_with(".stl") => Some(CockpitSource::FacetText(value.to_string())),
            _ => None,
        }
    }
}

impl Default for CockpitSource {
    fn default() -> Self {
        CockpitSource::Gltf(DEFAULT_GLTF_COCKPIT.to_string())
    }
}

/// Tuning of the attitude integrator, all per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightConfig {
    /// Degrees of rotation per frame at full axis deflection.
    pub rate: f32,
    /// Speed change per frame for each unit of acceleration.
    pub accel_gain: f32,
    pub max_speed: f32,
    /// Half extent of the cube the position must stay in.
    pub bound: f32,
    /// Head-look degrees at full deflection of the horizontal axis.
    pub head_yaw_gain: f32,
    /// Head-look degrees at full deflection of the vertical axis.
    pub head_pitch_gain: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            rate: 45.0 / 60.0,
            accel_gain: 0.0001,
            max_speed: 0.005,
            bound: 1.0,
            head_yaw_gain: 60.0,
            head_pitch_gain: 30.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub asset_dir: PathBuf,
    pub cockpit: CockpitSource,
    /// Abort startup instead of flying without a cockpit.
    pub require_cockpit: bool,
    pub clear_colour: wgpu::Color,
    pub vsync: bool,
    pub flight: FlightConfig,
    pub max_line_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("./assets"),
            cockpit: CockpitSource::default(),
            require_cockpit: false,
            clear_colour: wgpu::Color::BLACK,
            vsync: true,
            flight: FlightConfig::default(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `POPCORN_ASSET_DIR` and `POPCORN_COCKPIT`.
    ///
    /// Without an override, a missing `./assets` falls back to the bundled copy.
    /// Values that cannot be used are logged, so install the logger first.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// [`Settings::from_env`] reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        match var(ASSET_DIR_VAR) {
            Some(dir) => settings.asset_dir = PathBuf::from(dir),
            None if !settings.asset_dir.is_dir() => {
                log::debug!("no {}, using {}", settings.asset_dir.display(), BUNDLED_ASSET_DIR);
                settings.asset_dir = PathBuf::from(BUNDLED_ASSET_DIR);
            }
            None => {}
        }
        if let Some(value) = var(COCKPIT_VAR) {
            match CockpitSource::parse(&value) {
                Some(cockpit) => settings.cockpit = cockpit,
                None => log::warn!("ignoring {}={:?}: expected gltf, stl or a model file name", COCKPIT_VAR, value),
            }
        }
        settings
    }
}
