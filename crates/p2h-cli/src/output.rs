use p2h_common::config::OutputFormat;

const HIVE_COMMAND: &str = "hive -hiveconf hive.support.sql11.reserved.keywords=false -e";

/// Renders one table statement as a line of output.
pub fn render_statement(statement: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Sql => statement.to_string(),
        OutputFormat::HiveCli => format!("{HIVE_COMMAND} {}", shell_quote(statement)),
    }
}

/// Wraps `value` in single quotes for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}
