//! Viewer configuration
//!
//! Defaults, an optional JSON file and the command line are layered in that
//! order. Every value is validated once here so the view model is never
//! built with a zero or negative rate.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FRAMES_PER_SECOND: u32 = 240;
pub const DEFAULT_ZOOM_SENSITIVITY: f32 = 0.2;
pub const DEFAULT_PAN_SENSITIVITY: f32 = 1.0;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("frame rate must be a positive integer")]
    InvalidFrameRate,
    #[error("{name} must be a positive number, got {value}")]
    InvalidSensitivity { name: &'static str, value: f32 },
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Command line surface
#[derive(Parser, Debug, Default)]
#[command(
    name = "jotner",
    version,
    disable_version_flag = true,
    about = "Pan and zoom around a screenshot of your desktop"
)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Frame rate of the viewer (recommended 2x the monitor refresh rate)
    #[arg(short = 'f', long = "frames-per-second")]
    pub frames_per_second: Option<u32>,

    /// Scroll sensitivity for zooming
    #[arg(short = 'z', long = "zoom-sensitivity", allow_negative_numbers = true)]
    pub zoom_sensitivity: Option<f32>,

    /// Cursor sensitivity for panning
    #[arg(short = 'p', long = "panning-sensitivity", allow_negative_numbers = true)]
    pub pan_sensitivity: Option<f32>,

    /// View an image file instead of capturing the screen
    #[arg(short = 'i', long)]
    pub image: Option<PathBuf>,

    /// Config file (defaults to <config dir>/jotner/config.json when present)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

/// On-disk overrides; every field is optional
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub frames_per_second: Option<u32>,
    pub zoom_sensitivity: Option<f32>,
    pub pan_sensitivity: Option<f32>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<config dir>/jotner/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jotner").join(CONFIG_FILE_NAME))
    }
}

/// Validated, immutable runtime parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Pause between ticks
    pub refresh_interval_micros: u32,
    pub zoom_sensitivity: f32,
    pub pan_sensitivity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_micros: interval_for_rate(DEFAULT_FRAMES_PER_SECOND),
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            pan_sensitivity: DEFAULT_PAN_SENSITIVITY,
        }
    }
}

impl ViewerConfig {
    /// Merge defaults, the config file and the command line.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => match ConfigFile::default_path() {
                Some(path) if path.is_file() => Some(ConfigFile::load(&path)?),
                _ => None,
            },
        };

        Self::layered(file.as_ref(), cli)
    }

    fn layered(file: Option<&ConfigFile>, cli: &Cli) -> Result<Self, ConfigError> {
        let fps = cli
            .frames_per_second
            .or(file.and_then(|f| f.frames_per_second))
            .unwrap_or(DEFAULT_FRAMES_PER_SECOND);
        let zoom = cli
            .zoom_sensitivity
            .or(file.and_then(|f| f.zoom_sensitivity))
            .unwrap_or(DEFAULT_ZOOM_SENSITIVITY);
        let pan = cli
            .pan_sensitivity
            .or(file.and_then(|f| f.pan_sensitivity))
            .unwrap_or(DEFAULT_PAN_SENSITIVITY);

        Self::new(fps, zoom, pan)
    }

    pub fn new(
        frames_per_second: u32,
        zoom_sensitivity: f32,
        pan_sensitivity: f32,
    ) -> Result<Self, ConfigError> {
        if frames_per_second == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        check_sensitivity("zoom sensitivity", zoom_sensitivity)?;
        check_sensitivity("panning sensitivity", pan_sensitivity)?;

        Ok(Self {
            refresh_interval_micros: interval_for_rate(frames_per_second),
            zoom_sensitivity,
            pan_sensitivity,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(u64::from(self.refresh_interval_micros))
    }
}

fn interval_for_rate(frames_per_second: u32) -> u32 {
    1_000_000 / frames_per_second
}

fn check_sensitivity(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSensitivity { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["jotner"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::layered(None, &Cli::default()).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.refresh_interval_micros, 4166);
        assert_eq!(config.zoom_sensitivity, 0.2);
        assert_eq!(config.pan_sensitivity, 1.0);
    }

    #[test]
    fn test_cli_flags() {
        let args = cli(&["-f", "100", "--zoom-sensitivity", "0.5", "-p", "2"]);
        let config = ViewerConfig::layered(None, &args).unwrap();
        assert_eq!(config.refresh_interval_micros, 10_000);
        assert_eq!(config.refresh_interval(), Duration::from_millis(10));
        assert_eq!(config.zoom_sensitivity, 0.5);
        assert_eq!(config.pan_sensitivity, 2.0);
    }

    #[test]
    fn test_non_numeric_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["jotner", "-z", "fast"]).is_err());
        assert!(Cli::try_parse_from(["jotner", "--frames-per-second", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["jotner", "-p"]).is_err());
    }

    #[test]
    fn test_version_flag() {
        for flag in ["-v", "--version"] {
            let err = Cli::try_parse_from(["jotner", flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        }
        assert!(Cli::try_parse_from(["jotner", "-V"]).is_err_and(|e| {
            e.kind() != clap::error::ErrorKind::DisplayVersion
        }));
    }

    #[test]
    fn test_zero_and_negative_values_are_rejected() {
        let err = ViewerConfig::layered(None, &cli(&["-f", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFrameRate));

        let err = ViewerConfig::layered(None, &cli(&["-z", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSensitivity { name: "zoom sensitivity", .. }));

        let err = ViewerConfig::layered(None, &cli(&["-p", "-1.5"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSensitivity { name: "panning sensitivity", .. }));

        assert!(ViewerConfig::new(60, f32::NAN, 1.0).is_err());
        assert!(ViewerConfig::new(60, 0.2, f32::INFINITY).is_err());
    }

    #[test]
    fn test_file_then_cli_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "frames_per_second": 50, "zoom_sensitivity": 0.1 }}"#).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = cli(&["--config", &path, "-z", "0.3"]);
        let config = ViewerConfig::resolve(&args).unwrap();

        assert_eq!(config.refresh_interval_micros, 20_000);
        assert_eq!(config.zoom_sensitivity, 0.3);
        assert_eq!(config.pan_sensitivity, DEFAULT_PAN_SENSITIVITY);
    }

    #[test]
    fn test_file_values_are_validated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pan_sensitivity": 0.0 }}"#).unwrap();

        let loaded = ConfigFile::load(file.path()).unwrap();
        let err = ViewerConfig::layered(Some(&loaded), &Cli::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSensitivity { .. }));
    }

    #[test]
    fn test_malformed_and_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "zoom": 1 }}"#).unwrap();
        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            ConfigFile::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
