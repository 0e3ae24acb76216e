//! Structured and human output of command results.

use arrow::util::pretty::pretty_format_batches;
use quarry_connectors::ResultFrame;
use serde::Serialize;

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Eq, Copy)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_machine_readable(&self) -> bool {
        match self {
            OutputFormat::Human => false,
            OutputFormat::Json | OutputFormat::Yaml => true,
        }
    }
}

/// Envelope of every machine-readable response.
#[derive(Serialize)]
pub struct CommandResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub exit_code: i32,
    #[serde(flatten)]
    pub data: T,
}

impl<T> CommandResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            exit_code: 0,
            data,
        }
    }

    pub fn error(message: String, exit_code: i32, data: T) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message),
            exit_code,
            data,
        }
    }
}

pub fn render<T: Serialize>(format: OutputFormat, data: &T) -> anyhow::Result<String> {
    Ok(match format {
        // human output is printed by the commands themselves
        OutputFormat::Human => String::new(),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

pub fn print_output<T: Serialize>(format: OutputFormat, data: &T) -> anyhow::Result<()> {
    if format.is_machine_readable() {
        println!("{}", render(format, data)?);
    }
    Ok(())
}

/// Print `data` inside a response envelope carrying `exit_code`.
pub fn print_response<T: Serialize>(
    format: OutputFormat,
    data: T,
    exit_code: i32,
    message: Option<String>,
) -> anyhow::Result<()> {
    let mut response = CommandResponse::success(data);
    if exit_code != 0 {
        response.status = "error".to_string();
        response.exit_code = exit_code;
    }
    response.message = message;
    print_output(format, &response)
}

/// Errors in human mode are printed by `main`.
pub fn print_error(format: OutputFormat, message: &str, exit_code: i32) -> anyhow::Result<()> {
    print_output(
        format,
        &CommandResponse::error(message.to_string(), exit_code, ()),
    )
}

/// A frame as a text table, or a placeholder when it has no columns.
pub fn frame_table(frame: &ResultFrame) -> anyhow::Result<String> {
    if frame.fields.is_empty() {
        return Ok("(no columns)".to_string());
    }
    let batch = frame.to_record_batch()?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
