/// Tally of one evaluation pass over a sample directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub correct: usize,
    pub total: usize,
}

impl EvaluationSummary {
    pub fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    /// Accuracy in percent; an empty summary reports 0.
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f32 / self.total as f32 * 100.0
    }

    /// Strict `correct > threshold * total`, so an empty summary never passes.
    pub fn passes(&self, threshold: f64) -> bool {
        self.correct as f64 > threshold * self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_hits_and_misses() {
        let mut summary = EvaluationSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);

        assert_eq!(summary, EvaluationSummary { correct: 2, total: 3 });
        assert!((summary.accuracy() - 66.666_67).abs() < 1e-3);
    }

    #[test]
    fn empty_summary_fails_threshold() {
        let summary = EvaluationSummary::default();
        assert_eq!(summary.accuracy(), 0.0);
        assert!(!summary.passes(0.6));
    }

    #[test]
    fn threshold_is_strict() {
        let at_bound = EvaluationSummary { correct: 3, total: 5 };
        let above = EvaluationSummary { correct: 4, total: 5 };
        assert!(!at_bound.passes(0.6));
        assert!(above.passes(0.6));
    }
}
