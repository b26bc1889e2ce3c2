//! Startup configuration from command-line flags.
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::entity::MAX_ENTITIES;
use crate::render::casters::NormalizeMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(&'static str),
    BadValue { flag: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "unknown flag `{flag}`"),
            ConfigError::MissingValue(flag) => write!(f, "flag `{flag}` needs a value"),
            ConfigError::BadValue { flag, value } => write!(f, "invalid value `{value}` for `{flag}`"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Internal framebuffer resolution.
    pub width: u32,
    pub height: u32,
    /// Window size as a multiple of the internal resolution.
    pub scale: u32,
    pub map_path: PathBuf,
    pub texture_dir: PathBuf,
    pub normalize: NormalizeMode,
    pub frame_budget: Duration,
    /// `env_logger` filter; falls back to `RUST_LOG`.
    pub log_filter: Option<String>,
    pub max_entities: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            scale: 2,
            map_path: PathBuf::from("demo.map"),
            texture_dir: PathBuf::from("texture"),
            normalize: NormalizeMode::Exact,
            frame_budget: Duration::from_millis(16),
            log_filter: None,
            max_entities: MAX_ENTITIES,
        }
    }
}

impl Config {
    /// Parses flags, not including the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter().map(Into::<String>::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--map" => cfg.map_path = PathBuf::from(value(&mut args, "--map")?),
                "--textures" => cfg.texture_dir = PathBuf::from(value(&mut args, "--textures")?),
                "--scale" => {
                    let raw = value(&mut args, "--scale")?;
                    cfg.scale = match raw.parse::<u32>() {
                        Ok(n) if (1..=8).contains(&n) => n,
                        _ => return Err(ConfigError::BadValue { flag: "--scale", value: raw }),
                    };
                }
                "--fast-normalize" => cfg.normalize = NormalizeMode::Fast,
                "--log" => cfg.log_filter = Some(value(&mut args, "--log")?),
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        Ok(cfg)
    }

    pub fn window_size(&self) -> (i32, i32) {
        ((self.width * self.scale) as i32, (self.height * self.scale) as i32)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ConfigError> {
    args.next().filter(|v| !v.starts_with("--")).ok_or(ConfigError::MissingValue(flag))
}
