use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Report fields forwarded to the API and the sample sheets. Anything else in
/// the input report is dropped.
pub const CHARACTERIZATION_KEYS: [&str; 7] = [
    "amr",
    "virulence",
    "plasmids",
    "reference_information",
    "Ecoli",
    "Salmonella",
    "Listeria",
];

/// Copies only the recognized characterization keys out of a report.
pub fn extract_characterization(report: &Map<String, Value>) -> Map<String, Value> {
    let mut characterization = Map::new();
    for (key, value) in report {
        if CHARACTERIZATION_KEYS.contains(&key.as_str()) {
            characterization.insert(key.clone(), value.clone());
        }
    }
    characterization
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub geuebt_charak_ver: String,
}

/// Per-isolate sheet content; also the element type of the merged output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub isolate_id: String,
    pub characterization: Map<String, Value>,
    pub sample_info: SampleInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QcStatus {
    Pass,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcEntry {
    #[serde(rename = "STATUS")]
    pub status: QcStatus,
    #[serde(rename = "MESSAGES")]
    pub messages: Vec<String>,
}

impl QcEntry {
    pub fn pass(message: String) -> Self {
        Self {
            status: QcStatus::Pass,
            messages: vec![message],
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            status: QcStatus::Warning,
            messages: vec![message],
        }
    }
}

/// All three output classes are pretty-printed with 4-space indentation;
/// serde_json's default pretty printer uses 2, so build the formatter
/// explicitly.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_characterization_keeps_only_known_keys() {
        let report = serde_json::json!({
            "sample": "ISO1",
            "amr": {"geneA": true},
            "virulence": ["stx1"],
            "Ecoli": {"serotype": "O157:H7"},
            "assembly_stats": {"n50": 120000},
            "run_id": "RUN42"
        });

        let characterization = extract_characterization(report.as_object().unwrap());

        assert_eq!(characterization.len(), 3);
        assert!(characterization.contains_key("amr"));
        assert!(characterization.contains_key("virulence"));
        assert!(characterization.contains_key("Ecoli"));
        assert!(!characterization.contains_key("sample"));
        assert!(!characterization.contains_key("assembly_stats"));
        assert!(!characterization.contains_key("run_id"));
    }

    #[test]
    fn test_extract_characterization_empty_report() {
        let report = serde_json::json!({"sample": "ISO1"});
        let characterization = extract_characterization(report.as_object().unwrap());
        assert!(characterization.is_empty());
    }

    #[test]
    fn test_qc_entry_serialization() {
        let pass = QcEntry::pass("ok".to_string());
        let json = serde_json::to_value(&pass).unwrap();
        assert_eq!(json, serde_json::json!({"STATUS": "PASS", "MESSAGES": ["ok"]}));

        let warning = QcEntry::warning("something went wrong".to_string());
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"STATUS": "WARNING", "MESSAGES": ["something went wrong"]})
        );
    }

    #[test]
    fn test_output_record_roundtrip() {
        let record = OutputRecord {
            isolate_id: "ISO1".to_string(),
            characterization: extract_characterization(
                serde_json::json!({"amr": {"geneA": true}})
                    .as_object()
                    .unwrap(),
            ),
            sample_info: SampleInfo {
                geuebt_charak_ver: "1.2".to_string(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isolate_id": "ISO1",
                "characterization": {"amr": {"geneA": true}},
                "sample_info": {"geuebt_charak_ver": "1.2"}
            })
        );

        let parsed: OutputRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_to_json_pretty_uses_four_space_indent() {
        let value = serde_json::json!({"key": {"nested": 1}});
        let bytes = to_json_pretty(&value).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n    \"key\""));
        assert!(text.contains("\n        \"nested\""));
    }
}
