//! Per-line driver: parse, classify, emit. Failures are captured as data,
//! never fatal to the run.

use std::io::{self, BufRead};

use crate::parser::combined::{
    match_combined, optional_field, optional_referer, parse_body_bytes, parse_request,
    parse_status,
};
use crate::parser::model::{AccessRecord, FailedRecord, ParseFailure, ParsedRecord};
use crate::parser::time::normalize_time_local;
use crate::ua::Classifier;

/// One failed line, for the error sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFailure {
    pub line_number: u64,
    pub reason: ParseFailure,
}

/// Everything one run produced: records in input order plus the failures.
pub struct StreamOutcome {
    pub records: Vec<ParsedRecord>,
    pub failures: Vec<LineFailure>,
}

pub struct Pipeline {
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Parse a single log line. The record is always produced; the failure
    /// reason accompanies it when the line did not match.
    pub fn parse_line(&self, line: &str, line_number: u64) -> (ParsedRecord, Option<ParseFailure>) {
        let raw = line.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            return (
                ParsedRecord::Failed(FailedRecord::empty_line(line_number)),
                Some(ParseFailure::EmptyLine),
            );
        }

        let Some(fields) = match_combined(raw) else {
            return (
                ParsedRecord::Failed(FailedRecord::mismatch(line_number, raw)),
                Some(ParseFailure::FormatMismatch),
            );
        };

        let request = parse_request(fields.request);
        let ua = self.classifier.classify(fields.user_agent);

        let record = AccessRecord {
            line_number,
            parse_ok: true,
            remote_addr: fields.remote_addr.to_string(),
            remote_user: optional_field(fields.remote_user),
            time_local: fields.time_local.to_string(),
            time_iso_utc: normalize_time_local(fields.time_local),
            request: fields.request.to_string(),
            method: request.method,
            path: request.path,
            protocol: request.protocol,
            status: parse_status(fields.status),
            body_bytes_sent: parse_body_bytes(fields.body_bytes_sent),
            http_referer: optional_referer(fields.referer),
            http_user_agent: (!fields.user_agent.is_empty())
                .then(|| fields.user_agent.to_string()),
            ua,
        };

        (ParsedRecord::Ok(Box::new(record)), None)
    }

    /// Feed every line of `reader` through the pipeline, in order,
    /// 1-indexed. Only an I/O error aborts the run.
    pub fn process_stream<R: BufRead>(&self, reader: R) -> io::Result<StreamOutcome> {
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx as u64 + 1;
            let (record, failure) = self.parse_line(&line, line_number);
            if let Some(reason) = failure {
                failures.push(LineFailure {
                    line_number,
                    reason,
                });
            }
            records.push(record);
        }

        Ok(StreamOutcome { records, failures })
    }
}
