use crate::upload::types::{Classification, UnitOfWork};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0} has no analysis result yet")]
    NotCompleted(String),
    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Exportable summary of one completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub file_name: String,
    pub size_bytes: u64,
    pub extension: String,
    pub classification: Classification,
    pub confidence_score: f64,
    pub segmentation_available: bool,
}

impl AnalysisReport {
    pub fn from_unit(unit: &UnitOfWork) -> Result<Self, ReportError> {
        let result = unit
            .result()
            .ok_or_else(|| ReportError::NotCompleted(unit.name().to_string()))?;
        Ok(Self {
            file_name: unit.name().to_string(),
            size_bytes: unit.size_bytes(),
            extension: unit.extension().to_string(),
            classification: result.classification,
            confidence_score: result.confidence_score,
            segmentation_available: result.has_segmentation,
        })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Wrote analysis report to {}", path.display());
        Ok(())
    }

    /// Default file name offered in the save dialog.
    pub fn suggested_file_name(&self) -> String {
        let lowered = self.file_name.to_lowercase();
        let stem_len = lowered
            .strip_suffix(&self.extension)
            .and_then(|s| s.strip_suffix('.'))
            .map(str::len)
            .unwrap_or(self.file_name.len());
        let stem = self.file_name.get(..stem_len).unwrap_or(&self.file_name);
        format!("{}-analysis.json", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::intake::admit;
    use crate::upload::types::{AnalysisResult, EventKind, ScanFile};

    fn completed(name: &str, label: Classification) -> UnitOfWork {
        let mut unit = admit(ScanFile::new(name, 4096)).expect("accepted");
        unit.apply(EventKind::ProcessingStarted);
        unit.apply(EventKind::Completed(AnalysisResult::new(label, 87.25)));
        unit
    }

    #[test]
    fn report_requires_a_result() {
        let unit = admit(ScanFile::new("scan1.dcm", 1)).expect("accepted");
        assert!(matches!(
            AnalysisReport::from_unit(&unit),
            Err(ReportError::NotCompleted(_))
        ));
    }

    #[test]
    fn json_carries_the_result() {
        let unit = completed("Brain.NII.GZ", Classification::PituitaryTumor);
        let report = AnalysisReport::from_unit(&unit).expect("completed");
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("encodes")).expect("valid json");
        assert_eq!(value["file_name"], "Brain.NII.GZ");
        assert_eq!(value["extension"], "nii.gz");
        assert_eq!(value["classification"], "Pituitary Tumor");
        assert_eq!(
            value["classification"],
            Classification::PituitaryTumor.label()
        );
        assert_eq!(value["segmentation_available"], true);
        assert_eq!(report.suggested_file_name(), "Brain-analysis.json");
    }

    #[test]
    fn writes_report_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.json");
        let report =
            AnalysisReport::from_unit(&completed("scan1.dcm", Classification::Healthy)).expect("ok");
        report.write_to(&path).expect("written");
        let text = std::fs::read_to_string(&path).expect("readable");
        assert!(text.contains("\"segmentation_available\": false"));
    }
}
