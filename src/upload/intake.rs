use crate::upload::error::IntakeError;
use crate::upload::types::{ScanFile, UnitOfWork};

/// Accepted scan formats, longest suffix first so `nii.gz` wins over shorter
/// candidates.
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["nii.gz", "jpeg", "dcm", "nii", "png", "jpg"];

/// Returns the accepted extension `name` ends with, lowercased.
///
/// The match is case-insensitive and requires the dot, so `scan.DCM` is
/// accepted while `scandcm` and `notes.txt` are not.
pub fn accepted_extension(name: &str) -> Option<&'static str> {
    let lowered = name.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().copied().find(|ext| {
        lowered
            .strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Turns one file into a fresh unit in the uploading phase.
pub fn admit(file: ScanFile) -> Result<UnitOfWork, IntakeError> {
    match accepted_extension(&file.name) {
        Some(ext) => Ok(UnitOfWork::new(file, ext)),
        None => Err(IntakeError::UnsupportedFormat { name: file.name }),
    }
}

/// Result of submitting a batch: admitted units in submission order and the
/// files that were turned away.
#[derive(Debug, Default)]
pub struct IntakeBatch {
    pub admitted: Vec<UnitOfWork>,
    pub rejected: Vec<IntakeError>,
}

pub fn admit_batch(files: impl IntoIterator<Item = ScanFile>) -> IntakeBatch {
    let mut batch = IntakeBatch::default();
    for file in files {
        match admit(file) {
            Ok(unit) => batch.admitted.push(unit),
            Err(e) => batch.rejected.push(e),
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::UnitStatus;
    use std::collections::HashSet;

    #[test]
    fn accepts_every_scan_format_case_insensitively() {
        assert_eq!(accepted_extension("scan1.dcm"), Some("dcm"));
        assert_eq!(accepted_extension("BRAIN.NII"), Some("nii"));
        assert_eq!(accepted_extension("brain.nii.gz"), Some("nii.gz"));
        assert_eq!(accepted_extension("slice.Png"), Some("png"));
        assert_eq!(accepted_extension("slice.jpg"), Some("jpg"));
        assert_eq!(accepted_extension("slice.JPEG"), Some("jpeg"));
    }

    #[test]
    fn rejects_other_names() {
        assert_eq!(accepted_extension("notes.txt"), None);
        assert_eq!(accepted_extension("archive.gz"), None);
        assert_eq!(accepted_extension("scandcm"), None);
        assert_eq!(accepted_extension("scan.dcm.bak"), None);
        assert_eq!(accepted_extension(""), None);
    }

    #[test]
    fn admitted_unit_starts_uploading() {
        let unit = admit(ScanFile::new("scan1.dcm", 512)).expect("accepted");
        assert_eq!(unit.status(), UnitStatus::Uploading);
        assert_eq!(unit.progress(), 0.0);
        assert_eq!(unit.name(), "scan1.dcm");
        assert_eq!(unit.size_bytes(), 512);
        assert_eq!(unit.extension(), "dcm");
    }

    #[test]
    fn rejection_names_the_file() {
        let err = admit(ScanFile::new("notes.txt", 10)).unwrap_err();
        assert_eq!(err.file_name(), "notes.txt");
        assert_eq!(err.to_string(), "notes.txt is not a supported format.");
    }

    #[test]
    fn batch_keeps_submission_order_and_unique_ids() {
        let batch = admit_batch(vec![
            ScanFile::new("a.dcm", 1),
            ScanFile::new("b.txt", 1),
            ScanFile::new("c.png", 1),
            ScanFile::new("d.nii.gz", 1),
        ]);
        let names: Vec<_> = batch.admitted.iter().map(|u| u.name()).collect();
        assert_eq!(names, vec!["a.dcm", "c.png", "d.nii.gz"]);
        assert_eq!(batch.rejected.len(), 1);

        let ids: HashSet<_> = batch.admitted.iter().map(|u| u.id()).collect();
        assert_eq!(ids.len(), 3);
    }
}
