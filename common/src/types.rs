use serde::{Serialize, Deserialize};
use serde_json::Value;

/// The model's threat report, kept as whatever JSON document it produced.
/// Only syntactic validity is enforced; missing fields or an unexpected shape
/// are accepted as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ThreatReport(pub Value);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ThreatFinding {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub vulnerability_type: String,
    /// Expected to be one of Low/Medium/High/Critical but not enforced.
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub mitigation_strategy: String,
}

impl ThreatReport {
    /// Typed view of the `threats_detected` array. Entries that do not decode
    /// as findings are skipped rather than failing the whole report.
    pub fn findings(&self) -> Vec<ThreatFinding> {
        self.0
            .get("threats_detected")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn finding_count(&self) -> usize {
        self.0
            .get("threats_detected")
            .and_then(Value::as_array)
            .map_or(0, |entries| entries.len())
    }
}
