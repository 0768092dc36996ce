use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("missing required arguments")]
    Usage,
    #[error("unknown flag {0}")]
    UnknownFlag(String),
    #[error("invalid threshold {0:?}: expected a percentage such as 10 or 2.5")]
    InvalidThreshold(String),
}

/// What a binary should do after parsing its command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Invocation<T> {
    Help,
    Run(T),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegressionConfig {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub threshold_percent: f64,
    pub json: bool,
}

impl RegressionConfig {
    pub fn from_args(args: &[&str]) -> Result<Invocation<Self>, CliError> {
        let Some(parsed) = split_args(args)? else {
            return Ok(Invocation::Help);
        };
        let [baseline, current, threshold, ..] = parsed.positionals.as_slice() else {
            return Err(CliError::Usage);
        };
        let threshold_percent = threshold
            .parse::<f64>()
            .map_err(|_| CliError::InvalidThreshold(threshold.to_string()))?;
        Ok(Invocation::Run(Self {
            baseline: PathBuf::from(baseline),
            current: PathBuf::from(current),
            threshold_percent,
            json: parsed.json,
        }))
    }

    pub fn usage(program: &str) -> String {
        format!("Usage: {program} <baseline.json> <current.json> <threshold%>")
    }

    pub fn help(program: &str) -> String {
        format!(
            "{}\n\nFails (exit 1) when p99 latency grew by more than threshold%.\n\
             A baseline without p99 latency always passes.\n\n\
             Options:\n  --json    print the verdict as a JSON object\n  --        treat every later argument as a path\n  -h, --help\n",
            Self::usage(program)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    pub reference: PathBuf,
    pub target: PathBuf,
    pub json: bool,
}

impl CompareConfig {
    pub fn from_args(args: &[&str]) -> Result<Invocation<Self>, CliError> {
        let Some(parsed) = split_args(args)? else {
            return Ok(Invocation::Help);
        };
        let [reference, target, ..] = parsed.positionals.as_slice() else {
            return Err(CliError::Usage);
        };
        Ok(Invocation::Run(Self {
            reference: PathBuf::from(reference),
            target: PathBuf::from(target),
            json: parsed.json,
        }))
    }

    pub fn usage(program: &str) -> String {
        format!("Usage: {program} <reference.json> <target.json>")
    }

    pub fn help(program: &str) -> String {
        format!(
            "{}\n\nPrints p99 latency ratio and bit identity of two benchmark runs.\n\n\
             Options:\n  --json    print the comparison as a JSON object\n  --        treat every later argument as a path\n  -h, --help\n",
            Self::usage(program)
        )
    }
}

/// Program name for usage lines, falling back to `fallback` when argv is empty.
pub fn program_name<'a>(args: &[&'a str], fallback: &'a str) -> &'a str {
    args.first().copied().unwrap_or(fallback)
}

struct ParsedArgs<'a> {
    positionals: Vec<&'a str>,
    json: bool,
}

fn split_args<'a>(args: &[&'a str]) -> Result<Option<ParsedArgs<'a>>, CliError> {
    let mut positionals = Vec::new();
    let mut json = false;
    let mut flags_done = false;
    for arg in args.iter().skip(1) {
        if flags_done {
            positionals.push(*arg);
            continue;
        }
        match *arg {
            "--" => flags_done = true,
            "--help" | "-h" => return Ok(None),
            "--json" => json = true,
            // negative thresholds are positionals, not flags
            other if other.starts_with('-') && other.parse::<f64>().is_err() => {
                return Err(CliError::UnknownFlag(other.to_string()));
            }
            other => positionals.push(other),
        }
    }
    Ok(Some(ParsedArgs { positionals, json }))
}
