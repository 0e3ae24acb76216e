use crate::output::OutputFormat;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use quarry_connectors::{QueryRequest, QueryTarget};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::time::Duration;

/// A batch file holds either `targets: [...]` or a bare list of targets.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Request(QueryRequest),
    Targets(Vec<QueryTarget>),
}

pub fn parse_batch(content: &str) -> Result<QueryRequest> {
    let request = match serde_yaml::from_str::<BatchFile>(content)
        .context("Expected `targets:` or a list of targets with refId and queryText")?
    {
        BatchFile::Request(request) => request,
        BatchFile::Targets(targets) => QueryRequest::new(targets),
    };

    let mut seen = HashSet::new();
    for target in &request.targets {
        if !seen.insert(target.ref_id.as_str()) {
            bail!("Duplicate refId '{}' in batch file", target.ref_id);
        }
    }
    Ok(request)
}

pub fn read_batch_file(path: &str) -> Result<QueryRequest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read batch file {}", path))?;
    parse_batch(&content).with_context(|| format!("Failed to parse batch file {}", path))
}

/// Spinner on stderr for human output; `None` for machine formats.
pub fn spinner(format: OutputFormat, message: String) -> Option<ProgressBar> {
    if format.is_machine_readable() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
