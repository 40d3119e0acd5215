pub mod ping;
pub mod reports;
pub mod run;

use anyhow::Context;
use serde::Serialize;

/// Parse a `--since`/`--until` value: a `YYYY-MM-DD` calendar date (UTC
/// midnight) or raw epoch milliseconds.
pub fn parse_time_bound(value: &str) -> anyhow::Result<i64> {
    if let Some(ms) = mfpq_core::dates::parse_day(value) {
        return Ok(ms);
    }
    value
        .parse::<i64>()
        .with_context(|| format!("'{value}' is neither YYYY-MM-DD nor epoch milliseconds"))
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize>(value: &T, path: &str, label: &str) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
    println!("{label} saved to: {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_time_bound tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_time_bound("1970-01-01").unwrap(), 0);
        assert_eq!(parse_time_bound("2015-10-29").unwrap(), 1_446_076_800_000);
    }

    #[test]
    fn test_parse_epoch_millis() {
        assert_eq!(parse_time_bound("1446076800000").unwrap(), 1_446_076_800_000);
        assert_eq!(parse_time_bound("0").unwrap(), 0);
        assert_eq!(parse_time_bound("-1").unwrap(), -1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_time_bound("yesterday").is_err());
        assert!(parse_time_bound("2015-13-01").is_err());
        assert!(parse_time_bound("").is_err());
    }

    // -----------------------------------------------------------------------
    // write_json tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_write_json_pretty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        let path = path.to_str().unwrap();

        write_json(&serde_json::json!({"a": 1}), path, "Test").unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains('\n'), "expected pretty output");
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_write_json_bad_path_errors() {
        let err = write_json(&1, "/nonexistent-dir/out.json", "Test").unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/out.json"));
    }
}
