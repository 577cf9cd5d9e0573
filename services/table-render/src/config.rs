//! Configuration loader for the table-render CLI.
//!
//! Reads a YAML file with `fonts`, `render`, `style` and `logging` sections.
//! Every section and key is optional; omitted values keep their defaults.
//!
//! Supports environment variable substitution using ${VAR} and
//! ${VAR:-default} syntax.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use table_common::TableStyle;
use table_renderer::{FontPaths, GeneratorConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================================================
// Configuration types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub fonts: FontPaths,
    pub render: RenderConfig,
    pub style: TableStyle,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub dpi: f64,
    /// Used when a job does not name its own output directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: GeneratorConfig::default().dpi,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl ServiceConfig {
    /// Defaults, with font and output paths taken from the environment when
    /// set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = env_path("TABLE_RENDER_FONT_REGULAR") {
            config.fonts.regular = path;
        }
        if let Some(path) = env_path("TABLE_RENDER_FONT_BOLD") {
            config.fonts.bold = path;
        }
        if let Some(path) = env_path("TABLE_RENDER_OUTPUT_DIR") {
            config.render.output_dir = Some(path);
        }
        config
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            fonts: self.fonts.clone(),
            style: self.style.clone(),
            dpi: self.render.dpi,
        }
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()),
            "Unknown log level '{}', expected one of {:?}",
            self.logging.level,
            LOG_LEVELS
        );
        anyhow::ensure!(
            self.render.dpi.is_finite() && self.render.dpi > 0.0,
            "render.dpi must be a positive number, got {}",
            self.render.dpi
        );
        self.style
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid style section")?;
        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a YAML config file with environment variable
/// substitution.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to load config from {:?}", path.as_ref()))?;
    config.validate()?;

    Ok(config)
}

fn parse_config(content: &str) -> Result<ServiceConfig> {
    let expanded = substitute_env(content)?;
    if expanded.trim().is_empty() {
        return Ok(ServiceConfig::default());
    }
    serde_yaml::from_str(&expanded).context("Failed to parse config YAML")
}

/// Substitute `${VAR}` and `${VAR:-default}` references in raw config text.
fn substitute_env(content: &str) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let body = &rest[start + 2..];
        let close = closing_brace(body)
            .with_context(|| format!("Unclosed variable substitution: ${{{}", body))?;
        out.push_str(&env_value(&body[..close])?);
        rest = &body[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Byte offset of the `}` closing a reference body, skipping nested pairs.
fn closing_brace(body: &str) -> Option<usize> {
    let mut open = 0usize;
    for (idx, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => open += 1,
            b'}' if open == 0 => return Some(idx),
            b'}' => open -= 1,
            _ => {}
        }
    }
    None
}

/// Value for one reference body: `VAR` must be set, `VAR:-default` falls
/// back when the variable is unset or empty.
fn env_value(reference: &str) -> Result<String> {
    let (name, default) = match reference.split_once(":-") {
        Some((name, default)) => (name.trim(), Some(default)),
        None => (reference.trim(), None),
    };

    match (std::env::var(name), default) {
        (Ok(value), Some(_)) if !value.is_empty() => Ok(value),
        (Ok(value), None) => Ok(value),
        (_, Some(default)) => Ok(default.to_string()),
        (Err(_), None) => anyhow::bail!("Environment variable {} not set", name),
    }
}

// ============================================================================
// Tests
// ============================================================================
