use std::io::Write;

use log::debug;
use p2h_common::config::TelemetryConfig;

use crate::error::{TelemetryError, TelemetryResult};

/// Installs the process-wide logger.
/// Log lines go to stderr so that generated statements on stdout stay clean.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    let logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .target(env_logger::Target::Stderr)
    .format(move |buf, record| {
        let level = record.level();
        let target = record.target();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp();
        let args = record.args();
        writeln!(buf, "[{timestamp} {style}{level}{style:#} {target}] {args}")
    })
    .build();
    let max_level = logger.filter();

    log::set_boxed_logger(Box::new(logger)).map_err(|e| TelemetryError::internal(e.to_string()))?;
    log::set_max_level(max_level);
    debug!("logger initialized");
    Ok(())
}
