//! Summary — aggregate counters over a finished run and a small
//! human-readable report. Failed lines count toward totals and land in the
//! `Unknown` buckets.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::parser::ParsedRecord;
use crate::ua::OsInfo;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Default)]
pub struct Summary {
    total: usize,
    unique_ips: HashSet<String>,
    browsers: HashMap<String, u64>,
    oses: HashMap<String, u64>,
    devices: HashMap<String, u64>,
    statuses: HashMap<String, u64>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ParsedRecord>) -> Self {
        let mut summary = Self::new();
        for record in records {
            summary.observe(record);
        }
        summary
    }

    pub fn observe(&mut self, record: &ParsedRecord) {
        self.total += 1;
        match record.as_access() {
            Some(rec) => {
                self.unique_ips.insert(rec.remote_addr.clone());
                bump(&mut self.browsers, label(rec.ua.browser.family.as_deref()));
                bump(&mut self.oses, os_label(&rec.ua.os));
                bump(
                    &mut self.devices,
                    rec.ua
                        .device
                        .kind
                        .map_or_else(|| UNKNOWN.to_string(), |k| k.as_str().to_string()),
                );
                bump(&mut self.statuses, rec.status.to_string());
            }
            None => {
                bump(&mut self.browsers, UNKNOWN.to_string());
                bump(&mut self.oses, UNKNOWN.to_string());
                bump(&mut self.devices, UNKNOWN.to_string());
                bump(&mut self.statuses, UNKNOWN.to_string());
            }
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Render the report, `top` entries per category.
    pub fn render(&self, top: usize) -> String {
        if self.total == 0 {
            return "Summary:\n---------\nNo records parsed.".to_string();
        }

        let mut out = String::new();
        out.push_str("Summary:\n---------\n");
        let _ = writeln!(out, "Total requests: {}", self.total);
        let _ = writeln!(out, "Unique IPs: {}", self.unique_ips.len());
        let _ = writeln!(out, "Top Browsers: {}", format_top(&self.browsers, top));
        let _ = writeln!(out, "Top OS: {}", format_top(&self.oses, top));
        let _ = writeln!(out, "Devices: {}", format_top(&self.devices, top));
        let _ = write!(out, "HTTP Statuses: {}", format_top(&self.statuses, usize::MAX));
        out
    }
}

fn bump(map: &mut HashMap<String, u64>, key: String) {
    *map.entry(key).or_insert(0) += 1;
}

fn label(family: Option<&str>) -> String {
    family.unwrap_or(UNKNOWN).to_string()
}

fn os_label(os: &OsInfo) -> String {
    match (os.family.as_deref(), os.version.as_deref()) {
        (Some(family), Some(version)) => format!("{family} {version}"),
        (Some(family), None) => family.to_string(),
        (None, _) => UNKNOWN.to_string(),
    }
}

/// Count-descending, name-ascending for stable output.
fn format_top(map: &HashMap<String, u64>, top: usize) -> String {
    let mut entries: Vec<(&String, &u64)> = map.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(top)
        .map(|(name, count)| format!("{name} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}
