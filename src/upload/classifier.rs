use crate::upload::error::PipelineError;
use crate::upload::types::{AnalysisResult, Classification, ScanFile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

pub const MIN_CONFIDENCE: f64 = 70.0;
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Produces the analysis attached to a unit once processing reaches 100%.
///
/// Runs on the simulation runtime, once per unit. A failure moves only that
/// unit to the errored state.
pub trait Classifier: Send + Sync {
    fn classify(&self, scan: &ScanFile) -> Result<AnalysisResult, PipelineError>;
}

/// Stand-in for a real model: a uniform label and a confidence in
/// `[70, 100)`, independent of the file's content.
pub struct RandomClassifier {
    rng: Mutex<StdRng>,
}

impl RandomClassifier {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RandomClassifier {
    fn classify(&self, scan: &ScanFile) -> Result<AnalysisResult, PipelineError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let label = Classification::ALL[rng.random_range(0..Classification::ALL.len())];
        let confidence = rng.random_range(MIN_CONFIDENCE..MAX_CONFIDENCE);
        tracing::debug!("Fabricated {} ({:.1}%) for {}", label, confidence, scan.name);
        Ok(AnalysisResult::new(label, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn results_stay_within_bounds() {
        let classifier = RandomClassifier::seeded(7);
        let scan = ScanFile::new("scan1.dcm", 1);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let result = classifier.classify(&scan).expect("never fails");
            assert!(result.confidence_score >= MIN_CONFIDENCE);
            assert!(result.confidence_score < MAX_CONFIDENCE);
            assert_eq!(
                result.has_segmentation,
                result.classification != Classification::Healthy
            );
            seen.insert(result.classification);
        }
        // 500 uniform draws over four labels cover all of them.
        assert_eq!(seen.len(), Classification::ALL.len());
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomClassifier::seeded(42);
        let b = RandomClassifier::seeded(42);
        let scan = ScanFile::new("x.png", 1);
        for _ in 0..10 {
            assert_eq!(a.classify(&scan), b.classify(&scan));
        }
    }
}
