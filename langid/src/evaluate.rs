use crate::corpus::Indexer;

/// Match/mismatch counters for one language (or for the whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    matches: u64,
    mismatches: u64,
}

impl Tally {
    /// Gets the number of correctly classified lines.
    pub const fn matches(&self) -> u64 {
        self.matches
    }

    /// Gets the number of misclassified lines.
    pub const fn mismatches(&self) -> u64 {
        self.mismatches
    }

    /// Precision as a truncated integer percentage, or `None` when no
    /// lines were counted.
    pub fn precision(&self) -> Option<u64> {
        let total = self.matches + self.mismatches;
        if total == 0 {
            None
        } else {
            Some(self.matches * 100 / total)
        }
    }
}

/// The aggregated result of an evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Counters over all lines.
    pub global: Tally,

    /// Per-language counters, in the order the languages were first seen.
    pub per_label: Vec<(String, Tally)>,
}

/// Evaluator.
///
/// Consumes (expected, predicted) label pairs and aggregates global and
/// per-language precision.
///
/// # Examples
///
/// ```
/// use langid::Evaluator;
///
/// let mut evaluator = Evaluator::new();
/// evaluator.add("a", "a");
/// evaluator.add("a", "b");
/// evaluator.add("b", "b");
///
/// let report = evaluator.report();
/// assert_eq!(Some(66), report.global.precision());
/// ```
pub struct Evaluator {
    label_ids: Indexer<String>,
    tallies: Vec<Tally>,
    global: Tally,
}

impl Evaluator {
    /// Creates a new evaluator.
    pub fn new() -> Self {
        Self {
            label_ids: Indexer::new(),
            tallies: vec![],
            global: Tally::default(),
        }
    }

    /// Counts one classification outcome. Per-language counters are kept
    /// under the expected label.
    pub fn add(&mut self, expected: &str, predicted: &str) {
        let id = self.label_ids.get_id(expected);
        if id == self.tallies.len() {
            self.tallies.push(Tally::default());
        }
        if expected == predicted {
            self.tallies[id].matches += 1;
            self.global.matches += 1;
        } else {
            self.tallies[id].mismatches += 1;
            self.global.mismatches += 1;
        }
    }

    /// Produces the final report.
    pub fn report(&self) -> EvaluationReport {
        EvaluationReport {
            global: self.global,
            per_label: self
                .label_ids
                .keys()
                .iter()
                .cloned()
                .zip(self.tallies.iter().copied())
                .collect(),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S1, S2> Extend<(S1, S2)> for Evaluator
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (S1, S2)>>(&mut self, pairs: T) {
        for (expected, predicted) in pairs {
            self.add(expected.as_ref(), predicted.as_ref());
        }
    }
}
