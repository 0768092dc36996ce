use std::io::Write;

use serde_json::Value;

use crate::{
    BenchCheckError,
    cli::{CompareConfig, RegressionConfig},
    compare::PlatformComparison,
    regression::{RegressionCheck, RegressionOutcome},
    report::load_report,
};

/// Loads both reports, evaluates the gate and writes the verdict to `out`.
/// The caller maps the returned outcome to the process exit status.
pub fn run_regression<W: Write>(
    config: &RegressionConfig,
    out: &mut W,
) -> Result<RegressionOutcome, BenchCheckError> {
    let baseline = load_report(&config.baseline)?;
    let current = load_report(&config.current)?;
    let outcome = RegressionCheck::new(config.threshold_percent).evaluate(&baseline, &current);
    if config.json {
        write_json(out, &outcome.to_json())?;
    } else {
        outcome.write_text(out)?;
    }
    Ok(outcome)
}

pub fn run_compare<W: Write>(
    config: &CompareConfig,
    out: &mut W,
) -> Result<PlatformComparison, BenchCheckError> {
    let reference = load_report(&config.reference)?;
    let target = load_report(&config.target)?;
    let comparison = PlatformComparison::new(&reference, &target);
    if config.json {
        write_json(out, &comparison.to_json())?;
    } else {
        comparison.write_text(out)?;
    }
    Ok(comparison)
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> Result<(), BenchCheckError> {
    serde_json::to_writer(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_run_regression_writes_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegressionConfig {
            baseline: write(dir.path(), "base.json", r#"{"latency": {"p99_ns": 1000}}"#),
            current: write(dir.path(), "cur.json", r#"{"latency": {"p99_ns": 1200}}"#),
            threshold_percent: 10.0,
            json: false,
        };
        let mut out = Vec::new();
        let outcome = run_regression(&config, &mut out).unwrap();
        assert_eq!(outcome.exit_code(), 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Change: +20.0%"));
    }

    #[test]
    fn test_run_regression_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegressionConfig {
            baseline: write(dir.path(), "base.json", "{not json"),
            current: write(dir.path(), "cur.json", "{}"),
            threshold_percent: 10.0,
            json: false,
        };
        let err = run_regression(&config, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, BenchCheckError::Parse { .. }));
        assert!(err.to_string().contains("base.json"));
    }

    #[test]
    fn test_run_compare_json_is_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompareConfig {
            reference: write(dir.path(), "ref.json", r#"{"output_hash": "abc"}"#),
            target: write(dir.path(), "tgt.json", r#"{"output_hash": "xyz"}"#),
            json: true,
        };
        let mut out = Vec::new();
        let comparison = run_compare(&config, &mut out).unwrap();
        assert!(!comparison.outputs_identical);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["outputs_identical"], false);
    }
}
