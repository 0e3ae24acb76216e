//! `query` and `batch`: run statements and print one frame or error per target.

use super::helpers::{read_batch_file, spinner};
use crate::exit_codes;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use quarry_connectors::{DremioDataSource, QueryRequest, QueryResponse, QueryTarget, ResultFrame};
use quarry_error::QuarryError;
use serde::Serialize;

#[derive(Serialize)]
struct TargetOutput<'a> {
    ref_id: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<&'a ResultFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a QuarryError>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    results: Vec<TargetOutput<'a>>,
}

pub async fn query(ds: &DremioDataSource, target: QueryTarget, format: OutputFormat) -> Result<i32> {
    run(ds, QueryRequest::new(vec![target]), format).await
}

pub async fn batch(ds: &DremioDataSource, file_path: &str, format: OutputFormat) -> Result<i32> {
    let request = read_batch_file(file_path)?;
    if !format.is_machine_readable() {
        println!(
            "{} {} {}",
            "[Batch:".dimmed(),
            file_path.yellow(),
            format!("] {} target(s)", request.targets.len()).bold().cyan()
        );
    }
    run(ds, request, format).await
}

async fn run(ds: &DremioDataSource, request: QueryRequest, format: OutputFormat) -> Result<i32> {
    let pb = spinner(
        format,
        format!("Running {} target(s)...", request.targets.len()),
    );
    let result = ds.query(&request).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let response = result?;
    let exit_code = exit_code_for(&response);

    if format.is_machine_readable() {
        let results = response
            .data
            .iter()
            .map(|target| match &target.result {
                Ok(frame) => TargetOutput {
                    ref_id: &target.ref_id,
                    status: "success",
                    rows: Some(frame.len()),
                    frame: Some(frame),
                    error: None,
                },
                Err(e) => TargetOutput {
                    ref_id: &target.ref_id,
                    status: "error",
                    rows: None,
                    frame: None,
                    error: Some(e),
                },
            })
            .collect();
        let message = (exit_code == exit_codes::PARTIAL_FAILURE).then(|| {
            format!(
                "{} of {} targets failed",
                response.errors().count(),
                response.data.len()
            )
        });
        output::print_response(format, BatchOutput { results }, exit_code, message)?;
    } else {
        print_human(&response)?;
    }

    Ok(exit_code)
}

fn print_human(response: &QueryResponse) -> Result<()> {
    for target in &response.data {
        match &target.result {
            Ok(frame) => {
                println!(
                    "{} {} {}",
                    "✔".green(),
                    target.ref_id.bold(),
                    format!("({} rows)", frame.len()).dimmed()
                );
                println!("{}", output::frame_table(frame)?);
            }
            Err(e) => {
                println!("{} {}: {}", "✘".red(), target.ref_id.bold(), e);
            }
        }
    }
    Ok(())
}

/// Success, partial failure, or the category of the first error when every target failed.
pub(crate) fn exit_code_for(response: &QueryResponse) -> i32 {
    if response.is_success() {
        return exit_codes::SUCCESS;
    }
    if response.is_partial_failure() {
        return exit_codes::PARTIAL_FAILURE;
    }
    response
        .errors()
        .next()
        .map(|(_, e)| exit_codes::for_category(e.category()))
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
