use crate::exit_codes;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use quarry_connectors::{DremioDataSource, MetricFindValue, VariableQuery};
use serde::Serialize;

#[derive(Serialize)]
struct ValuesOutput<'a> {
    column: &'a str,
    values: &'a [MetricFindValue],
}

/// List the distinct values of one column of a lookup statement.
pub async fn values(
    ds: &DremioDataSource,
    sql: &str,
    column: &str,
    format: OutputFormat,
) -> Result<i32> {
    let values = ds
        .metric_find_query(&VariableQuery {
            raw_query: Some(sql.to_string()),
            column: column.to_string(),
        })
        .await?;

    if format.is_machine_readable() {
        output::print_response(
            format,
            ValuesOutput {
                column,
                values: &values,
            },
            exit_codes::SUCCESS,
            None,
        )?;
    } else if values.is_empty() {
        println!("{}", "No values.".dimmed());
    } else {
        for value in &values {
            println!("{}", value.text);
        }
    }
    Ok(exit_codes::SUCCESS)
}
