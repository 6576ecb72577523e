//! Aggregate scores over evaluation results.

use std::collections::BTreeSet;

use super::EvalResult;

/// Accuracy and label F1 over a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Number of rows.
    pub n: usize,
    /// Share of rows with the expected type.
    pub type_accuracy: f64,
    /// Share of rows with the expected priority.
    pub priority_accuracy: f64,
    /// Micro-averaged F1 of predicted vs expected labels.
    pub label_f1: f64,
}

impl Metrics {
    /// One-line summary printed by `eval`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "type_accuracy={:.3}, priority_accuracy={:.3}, label_f1={:.3} (n={})",
            self.type_accuracy, self.priority_accuracy, self.label_f1, self.n
        )
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Computes metrics; an empty result set scores zero everywhere.
#[must_use]
pub fn compute_metrics(results: &[EvalResult]) -> Metrics {
    let n = results.len();
    if n == 0 {
        return Metrics::default();
    }

    let mut type_correct = 0;
    let mut priority_correct = 0;
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);

    for result in results {
        if result.predicted.issue_type().as_str() == result.row.expected_type {
            type_correct += 1;
        }
        if result.predicted.priority().as_str() == result.row.expected_priority {
            priority_correct += 1;
        }

        let expected = result.row.expected_label_set();
        let predicted: BTreeSet<String> = result.predicted.labels().iter().cloned().collect();
        tp += expected.intersection(&predicted).count();
        fp += predicted.difference(&expected).count();
        fn_ += expected.difference(&predicted).count();
    }

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let label_f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Metrics {
        n,
        type_accuracy: ratio(type_correct, n),
        priority_accuracy: ratio(priority_correct, n),
        label_f1,
    }
}
