//! JSON job files.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use table_renderer::RenderRequest;

/// Parse a job document into a [`RenderRequest`].
///
/// `output_dir` resolution: `override_dir` if given, else the job's own
/// `output_dir`, else `fallback_dir`.
pub fn parse_job(content: &str, override_dir: Option<&Path>, fallback_dir: Option<&Path>) -> Result<RenderRequest> {
    let mut job: Value = serde_json::from_str(content).context("Job is not valid JSON")?;
    let fields = job
        .as_object_mut()
        .context("Job must be a JSON object")?;

    if let Some(dir) = override_dir {
        fields.insert("output_dir".to_string(), Value::from(dir.to_string_lossy().into_owned()));
    } else if !fields.contains_key("output_dir") {
        let dir = fallback_dir.context("Job has no output_dir and none is configured")?;
        fields.insert("output_dir".to_string(), Value::from(dir.to_string_lossy().into_owned()));
    }

    serde_json::from_value(job).context("Job does not match the render request format")
}

/// Read and parse a job file.
pub fn load_job(path: &Path, override_dir: Option<&Path>, fallback_dir: Option<&Path>) -> Result<RenderRequest> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read job from {:?}", path))?;
    parse_job(&content, override_dir, fallback_dir).with_context(|| format!("Invalid job file {:?}", path))
}
