//! Run — stream plumbing around the pipeline: read lines, write the JSON
//! payload, feed the error sink, print the summary.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::parser::ParsedRecord;
use crate::pipeline::{LineFailure, StreamOutcome};
use crate::report::Summary;
use crate::runtime::boot;

/// What the run produced, for exit-status decisions.
#[derive(Debug, Clone, Copy)]
pub struct RunStatus {
    pub total_lines: usize,
    pub parse_errors: usize,
}

#[derive(Serialize)]
struct RunMetadata<'a> {
    source: &'a str,
    generated_at: String,
    duration_ms: u64,
    total_lines: usize,
    parse_errors: usize,
    user_agent_parser: &'a str,
}

#[derive(Serialize)]
struct WrappedOutput<'a> {
    metadata: RunMetadata<'a>,
    entries: &'a [ParsedRecord],
}

pub fn execute(config: &RunConfig) -> anyhow::Result<RunStatus> {
    let started = Instant::now();
    let pipeline = boot::boot(config);

    let reader = open_input(&config.input)?;
    let outcome = pipeline
        .process_stream(reader)
        .with_context(|| format!("failed reading input: {}", config.input))?;

    let status = RunStatus {
        total_lines: outcome.records.len(),
        parse_errors: outcome.failures.len(),
    };
    info!(
        "Processed {} lines ({} parse errors)",
        status.total_lines, status.parse_errors
    );

    if let Some(path) = &config.errors_path {
        write_errors(path, &outcome.failures);
    }

    let payload = render_payload(
        config,
        &outcome,
        pipeline.classifier().engine_name(),
        started.elapsed().as_millis() as u64,
    )?;
    write_output(&config.output, &payload)?;

    if config.summary {
        println!("{}", Summary::from_records(&outcome.records).render(config.summary_top));
    }

    Ok(status)
}

fn open_input(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if input == "-" || input.eq_ignore_ascii_case("stdin") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file =
        File::open(input).with_context(|| format!("cannot open input file: {input}"))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Serialize the record array, optionally wrapped with run metadata.
fn render_payload(
    config: &RunConfig,
    outcome: &StreamOutcome,
    engine_name: &str,
    duration_ms: u64,
) -> anyhow::Result<String> {
    let text = if config.wrap {
        let wrapped = WrappedOutput {
            metadata: RunMetadata {
                source: &config.input,
                generated_at: Utc::now().to_rfc3339(),
                duration_ms,
                total_lines: outcome.records.len(),
                parse_errors: outcome.failures.len(),
                user_agent_parser: engine_name,
            },
            entries: &outcome.records,
        };
        to_json(&wrapped, config.pretty)?
    } else {
        to_json(&outcome.records, config.pretty)?
    };
    Ok(text)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn write_output(output: &str, payload: &str) -> anyhow::Result<()> {
    if output == "-" || output.eq_ignore_ascii_case("stdout") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(payload.as_bytes())?;
        handle.write_all(b"\n")?;
        handle.flush()?;
        return Ok(());
    }

    let mut file =
        File::create(output).with_context(|| format!("cannot write output file: {output}"))?;
    file.write_all(payload.as_bytes())?;
    file.write_all(b"\n")?;
    println!("Output written to {output}");
    Ok(())
}

/// Failed lines as `<line_number>\t<reason>` rows. A write failure here is
/// a warning, not a reason to abort a finished run.
fn write_errors(path: &str, failures: &[LineFailure]) {
    if failures.is_empty() {
        return;
    }
    let result = File::create(path).and_then(|mut file| {
        for failure in failures {
            writeln!(file, "{}\t{}", failure.line_number, failure.reason.as_str())?;
        }
        Ok(())
    });
    if let Err(e) = result {
        warn!("failed to write errors file '{}': {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::ua::Classifier;

    fn outcome_from(data: &str) -> StreamOutcome {
        Pipeline::new(Classifier::heuristic())
            .process_stream(data.as_bytes())
            .unwrap()
    }

    const SAMPLE: &str = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] \"GET / HTTP/1.1\" 200 1450 \"-\" \
        \"Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/119.0 Safari/537.36\"\nbroken line\n";

    #[test]
    fn test_render_payload_plain_array() {
        let outcome = outcome_from(SAMPLE);
        let config = RunConfig::default();
        let payload = render_payload(&config, &outcome, "heuristics", 1).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["parse_ok"], true);
        assert_eq!(entries[0]["status"], 200);
        assert_eq!(entries[1]["parse_ok"], false);
        assert!(entries[1].get("status").is_none());
    }

    #[test]
    fn test_render_payload_wrapped_metadata() {
        let outcome = outcome_from(SAMPLE);
        let config = RunConfig {
            wrap: true,
            input: "access.log".to_string(),
            ..RunConfig::default()
        };
        let payload = render_payload(&config, &outcome, "heuristics", 7).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let metadata = &value["metadata"];
        assert_eq!(metadata["source"], "access.log");
        assert_eq!(metadata["duration_ms"], 7);
        assert_eq!(metadata["total_lines"], 2);
        assert_eq!(metadata["parse_errors"], 1);
        assert_eq!(metadata["user_agent_parser"], "heuristics");
        assert!(metadata["generated_at"].as_str().unwrap().contains('T'));
        assert_eq!(value["entries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_pretty_payload_is_multiline() {
        let outcome = outcome_from(SAMPLE);
        let config = RunConfig {
            pretty: true,
            ..RunConfig::default()
        };
        let payload = render_payload(&config, &outcome, "heuristics", 0).unwrap();
        assert!(payload.contains('\n'));
    }
}
