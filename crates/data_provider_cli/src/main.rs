//! CLI smoke probe for the data exchange flow.
//!
//! # Responsibility
//! - Start file logging under the system temp directory.
//! - Register a demo callback on the process-wide provider.
//! - Drive one simulated consumer request and print the selected table as JSON.

use chrono::{TimeZone, Utc};
use data_provider_core::{
    core_version, default_log_level, get_data_provider, init_logging, DataTable, DataTableColumn,
    SelectionOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;

const LOG_DIR_NAME: &str = "data_provider_cli";

fn cli_log_dir() -> PathBuf {
    std::env::temp_dir().join(LOG_DIR_NAME)
}

fn demo_table() -> DataTable {
    let opened = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single();
    DataTable::new("Sales")
        .with_column(DataTableColumn::string(
            "Region",
            vec![Some("East".to_string()), Some("West".to_string()), None],
        ))
        .with_column(DataTableColumn::number(
            "Total",
            vec![Some(100.0), Some(200.0), Some(300.0)],
        ))
        .with_column(DataTableColumn::date("Opened", vec![opened, None, opened]))
        .with_column(DataTableColumn::boolean(
            "Closed",
            vec![Some(true), Some(false), None],
        ))
}

fn main() -> ExitCode {
    println!("data_provider_core version={}", core_version());

    let log_path = cli_log_dir();
    let Some(log_dir) = log_path.to_str() else {
        eprintln!("log directory is not valid UTF-8: {}", log_path.display());
        return ExitCode::FAILURE;
    };
    if let Err(err) = init_logging(default_log_level(), log_dir) {
        eprintln!("logging init failed: {err}");
        return ExitCode::FAILURE;
    }
    println!("log_dir={log_dir}");

    let provider = get_data_provider();
    if let Err(err) = provider.on_select_data_table(|request| {
        if let Err(err) = request.select_data_table(demo_table()) {
            log::warn!("event=demo_select module=cli status=error reason={err}");
        }
    }) {
        eprintln!("registration failed: {err}");
        return ExitCode::FAILURE;
    }

    let pending = match provider.request_data_table() {
        Ok(pending) => pending,
        Err(err) => {
            eprintln!("request failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let request_id = pending.request_id();

    match pending.wait() {
        SelectionOutcome::Selected(table) => match serde_json::to_string_pretty(&table) {
            Ok(json) => {
                println!("request_id={request_id}");
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("failed to encode table: {err}");
                ExitCode::FAILURE
            }
        },
        SelectionOutcome::Rejected(err) => {
            eprintln!("table rejected: {err}");
            ExitCode::FAILURE
        }
        SelectionOutcome::Abandoned => {
            eprintln!("request abandoned without a table");
            ExitCode::FAILURE
        }
    }
}
