use common::ThreatReport;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

/// Strict JSON parse of the model reply, surrounding whitespace trimmed first.
pub fn parse_report(raw: &str) -> Result<ThreatReport, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Pretty rendering with 4-space indentation; the persisted file uses the
/// exact same bytes.
pub fn render_pretty(report: &ThreatReport) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    report
        .serialize(&mut serializer)
        .expect("JSON value serialization does not fail");
    String::from_utf8(buf).expect("serde_json emits UTF-8")
}

/// Overwrites `path` with the pretty-printed report. No temp-file-then-rename;
/// a crash mid-write can leave a partial file.
pub fn write_report(report: &ThreatReport, path: &Path) -> std::io::Result<()> {
    fs::write(path, render_pretty(report))
}
