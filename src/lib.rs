// Term-life quote comparison and proposal intake core.
//
// The crate is a library: a presentation layer calls the async operations in
// `api::*` against an `AppState` built from `AppConfig`. Quotes come from an
// upstream aggregation provider, proposals land in Postgres when configured,
// and everything degrades to documented mock behavior without a database.

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod quotes;
pub mod utils;
pub mod wizard;

use anyhow::Context;
use std::path::Path;

/// Initialize dual-format logging: JSON lines to a `.log` file for machine
/// parsing, a human-readable `.txt` file, and optionally stdout.
pub fn init_logging(log_dir: &Path, with_stdout: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");
    let json_log_file = log_dir.join(format!("intake-{}.log", timestamp));
    let txt_log_file = log_dir.join(format!("intake-{}.txt", timestamp));

    let mut dispatch = fern::Dispatch::new().level(log::LevelFilter::Debug);

    if with_stdout {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = message.to_string();
                    let (phase, step, cleaned) = utils::logging::parse_log_metadata(&message_str);
                    let line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}", line));
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let timestamp_utc = chrono::Utc::now().to_rfc3339();
                    let message_str = message.to_string();
                    let (phase, step, cleaned) = utils::logging::parse_log_metadata(&message_str);
                    let line = utils::logging::format_json_log(
                        &timestamp_utc,
                        record.level(),
                        record.target(),
                        &cleaned,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", line));
                })
                .chain(fern::log_file(json_log_file).context("failed to open JSON log file")?),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = message.to_string();
                    let (phase, step, cleaned) = utils::logging::parse_log_metadata(&message_str);
                    let line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", line));
                })
                .chain(fern::log_file(txt_log_file).context("failed to open text log file")?),
        )
        .apply()
        .context("failed to install logger")?;

    Ok(())
}
