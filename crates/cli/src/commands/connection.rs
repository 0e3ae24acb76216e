use crate::exit_codes;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use quarry_connectors::DremioDataSource;
use serde::Serialize;

#[derive(Serialize)]
struct ConnectionOutput<'a> {
    url: &'a str,
}

/// Log in once with the configured credentials.
pub async fn test_connection(ds: &DremioDataSource, url: &str, format: OutputFormat) -> Result<i32> {
    if !format.is_machine_readable() {
        println!(
            "{} {} {}",
            "[Datasource:".dimmed(),
            url.yellow(),
            "] Testing connection...".bold().cyan()
        );
    }

    let check = ds.test_datasource().await;
    let exit_code = if check.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::CONNECTION_ERROR
    };

    if format.is_machine_readable() {
        output::print_response(
            format,
            ConnectionOutput { url },
            exit_code,
            Some(check.message),
        )?;
    } else if check.is_success() {
        println!("{} {}", "✔".green(), check.message);
    } else {
        println!("{} {}", "✘".red(), check.message);
    }
    Ok(exit_code)
}
