use crate::api::ApiClient;
use crate::config::Credentials;
use crate::core::model::{
    extract_characterization, to_json_pretty, OutputRecord, QcEntry, QcStatus, SampleInfo,
};
use crate::utils::error::{Result, StagerError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct UploadReply {
    message: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StageSummary {
    pub staged: usize,
    pub warnings: usize,
}

/// Orchestrates the staging run: per summary file, push the characterization
/// to the API and write the local sample sheet, then write the merged list
/// and the QC mapping.
///
/// A rejected upload (non-200 PUT) is downgraded to a QC WARNING and never
/// blocks the local outputs. Everything that would corrupt the local
/// bookkeeping (bad input JSON, missing credentials, login failure, network
/// errors) aborts the whole run.
pub struct Stager {
    api: ApiClient,
    credentials: Credentials,
    version: String,
}

impl Stager {
    pub fn new(api: ApiClient, credentials: Credentials, version: String) -> Self {
        Self {
            api,
            credentials,
            version,
        }
    }

    pub async fn run(
        &self,
        summaries: &[PathBuf],
        sheet_out: &Path,
        merged: &Path,
        qc_out: &Path,
    ) -> Result<StageSummary> {
        fs::create_dir_all(sheet_out)?;

        let mut merged_list: Vec<OutputRecord> = Vec::new();
        let mut qc: BTreeMap<String, QcEntry> = BTreeMap::new();

        for summary in summaries {
            let record = self.stage_sample(summary, sheet_out, &mut qc).await?;
            merged_list.push(record);
        }

        fs::write(merged, to_json_pretty(&merged_list)?)?;
        fs::write(qc_out, to_json_pretty(&qc)?)?;

        Ok(StageSummary {
            staged: merged_list.len(),
            warnings: qc
                .values()
                .filter(|entry| entry.status == QcStatus::Warning)
                .count(),
        })
    }

    async fn stage_sample(
        &self,
        summary: &Path,
        sheet_out: &Path,
        qc: &mut BTreeMap<String, QcEntry>,
    ) -> Result<OutputRecord> {
        let raw = fs::read_to_string(summary)?;
        let report: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| StagerError::InputError {
                path: summary.display().to_string(),
                message: format!("malformed JSON: {}", e),
            })?;
        let report = report.as_object().ok_or_else(|| StagerError::InputError {
            path: summary.display().to_string(),
            message: "report is not a JSON object".to_string(),
        })?;
        let isolate_id = report
            .get("sample")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| StagerError::InputError {
                path: summary.display().to_string(),
                message: "missing 'sample' key".to_string(),
            })?
            .to_string();

        tracing::info!("Staging isolate {}", isolate_id);

        let record = OutputRecord {
            isolate_id,
            characterization: extract_characterization(report),
            sample_info: SampleInfo {
                geuebt_charak_ver: self.version.clone(),
            },
        };

        // Token semantics upstream are opaque, so log in fresh for every
        // sample instead of reusing one token across the run.
        let token = self
            .api
            .login(&self.credentials.username, &self.credentials.password)
            .await?;

        let payload = serde_json::json!({
            "characterization": record.characterization,
            "sample_info": record.sample_info,
        });
        let response = self
            .api
            .put_characterization(&token, &record.isolate_id, &payload)
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let reply: UploadReply = response.json().await?;
            qc.insert(record.isolate_id.clone(), QcEntry::pass(reply.message));
        } else {
            let body = response.text().await?;
            tracing::warn!(
                "Upload for isolate {} rejected with status {}",
                record.isolate_id,
                status
            );
            qc.insert(
                record.isolate_id.clone(),
                QcEntry::warning(format!(
                    "An unexpected error occured while adding characterization info.\
                     Status: {}.\
                     Body: {}",
                    status.as_u16(),
                    body
                )),
            );
        }

        // A rejected upload still gets its sheet written so downstream steps
        // in the workflow keep working.
        let sheet_path = sheet_out.join(format!("{}.json", record.isolate_id));
        fs::write(&sheet_path, to_json_pretty(&record)?)?;
        tracing::debug!("Wrote sample sheet {}", sheet_path.display());

        Ok(record)
    }
}
