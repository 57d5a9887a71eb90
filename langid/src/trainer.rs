use crate::corpus::EventCorpus;
use crate::errors::Result;
use crate::feature::FeatureExtractor;
use crate::model::{posterior, Model};

/// Trainer.
///
/// Runs Generalized Iterative Scaling (GIS) over the accumulated corpus to
/// fit a maximum entropy model: P(y|x) ∝ exp(Σ_i weight[y,i] · f_i(x)).
/// Each iteration matches the model's expected feature counts against the
/// empirical counts and applies one batch update to all weights.
///
/// # Examples
///
/// ```
/// use langid::Trainer;
///
/// let mut trainer = Trainer::new(1, 3, 100).unwrap();
/// trainer.push_line("ca", "la riada va fer molt de mal.").unwrap();
/// trainer.push_line("es", "alguien se ha puesto mis zapatos.").unwrap();
///
/// let model = trainer.train().unwrap();
/// assert_eq!(2, model.labels().len());
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "train")))]
pub struct Trainer {
    extractor: FeatureExtractor,
    corpus: EventCorpus,
    min_ngram: usize,
    max_ngram: usize,
    iterations: usize,
    tolerance: Option<f64>,
}

impl Trainer {
    /// Creates a new trainer.
    ///
    /// # Arguments
    ///
    /// * `min_ngram` - The minimum character n-gram length.
    /// * `max_ngram` - The maximum character n-gram length.
    /// * `iterations` - The number of GIS iterations.
    ///
    /// # Errors
    ///
    /// If invalid parameters are given, an error variant will be returned.
    pub fn new(min_ngram: usize, max_ngram: usize, iterations: usize) -> Result<Self> {
        Ok(Self {
            extractor: FeatureExtractor::new(min_ngram, max_ngram)?,
            corpus: EventCorpus::new(),
            min_ngram,
            max_ngram,
            iterations,
            tolerance: None,
        })
    }

    /// Enables early stopping: iteration ends once the relative improvement
    /// of the training log-likelihood falls below `tolerance`.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Adds a labeled line to the training corpus.
    ///
    /// # Arguments
    ///
    /// * `label` - A language code.
    /// * `line` - A raw text line. Empty lines are accepted and produce an
    ///   event with no features.
    ///
    /// # Errors
    ///
    /// [`LangIdError::CastError`] will be returned if the maximum number of
    /// features has been reached.
    ///
    /// [`LangIdError::CastError`]: crate::errors::LangIdError::CastError
    pub fn push_line(&mut self, label: &str, line: &str) -> Result<()> {
        let features = self.extractor.extract(line);
        self.corpus.push_event(label, &features)
    }

    /// Gets the number of n-gram features.
    pub fn n_features(&self) -> usize {
        self.corpus.n_features()
    }

    /// Gets the number of training events.
    pub fn n_events(&self) -> usize {
        self.corpus.n_events()
    }

    /// Trains a language identification model.
    ///
    /// Training is deterministic: the same ordered corpus and iteration
    /// count always produce the same weights.
    ///
    /// # Errors
    ///
    /// [`LangIdError::InvalidCorpus`] will be returned if the corpus
    /// contains fewer than 2 languages.
    ///
    /// [`LangIdError::InvalidCorpus`]: crate::errors::LangIdError::InvalidCorpus
    pub fn train(self) -> Result<Model> {
        let c = self.corpus.finalize()?;
        let n_labels = self.corpus.labels().len();
        let n_features = self.corpus.n_features();
        // The correction feature takes the last column of each weight row.
        let correction = n_features;

        let mut observed = vec![vec![0.0; n_features + 1]; n_labels];
        for event in &self.corpus.events {
            for &(fid, value) in &event.features {
                observed[event.label][fid as usize] += value;
            }
            observed[event.label][correction] += c - event.total;
        }

        let mut weights = vec![vec![0.0; n_features + 1]; n_labels];
        let mut prev_log_likelihood = f64::NEG_INFINITY;
        for _ in 0..self.iterations {
            let mut expected = vec![vec![0.0; n_features + 1]; n_labels];
            let mut log_likelihood = 0.0;
            for event in &self.corpus.events {
                let probs = posterior(&weights, &event.features, c - event.total, correction);
                log_likelihood += probs[event.label].max(f64::MIN_POSITIVE).ln();
                for (label, &p) in probs.iter().enumerate() {
                    for &(fid, value) in &event.features {
                        expected[label][fid as usize] += p * value;
                    }
                    expected[label][correction] += p * (c - event.total);
                }
            }

            if let Some(tolerance) = self.tolerance {
                if prev_log_likelihood.is_finite() {
                    let improvement = (log_likelihood - prev_log_likelihood).abs()
                        / prev_log_likelihood.abs().max(1.0);
                    if improvement < tolerance {
                        break;
                    }
                }
                prev_log_likelihood = log_likelihood;
            }

            for label in 0..n_labels {
                for i in 0..=n_features {
                    let obs = observed[label][i];
                    // Unobserved pairs keep their initial weight of 0.
                    if obs <= 0.0 {
                        continue;
                    }
                    let exp = expected[label][i];
                    // A collapsed model expectation freezes the weight for
                    // this iteration.
                    if exp <= 0.0 {
                        continue;
                    }
                    weights[label][i] += (obs / exp).ln() / c;
                }
            }
        }

        Ok(Model {
            labels: self.corpus.label_ids.keys().to_vec(),
            ngrams: self.corpus.feature_ids.keys().to_vec(),
            weights,
            correction_constant: c,
            min_ngram: self.min_ngram,
            max_ngram: self.max_ngram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::errors::LangIdError;

    fn toy_trainer(iterations: usize) -> Trainer {
        let mut trainer = Trainer::new(1, 3, iterations).unwrap();
        trainer.push_line("a", "aaa").unwrap();
        trainer.push_line("a", "aaa").unwrap();
        trainer.push_line("a", "aab").unwrap();
        trainer.push_line("b", "bbb").unwrap();
        trainer.push_line("b", "bba").unwrap();
        trainer.push_line("b", "bbb").unwrap();
        trainer
    }

    // Log-likelihood of the toy corpus under a model trained on it.
    fn toy_log_likelihood(model: Model) -> f64 {
        let classifier = Classifier::new(model).unwrap();
        let corpus = [
            ("a", "aaa"),
            ("a", "aaa"),
            ("a", "aab"),
            ("b", "bbb"),
            ("b", "bba"),
            ("b", "bbb"),
        ];
        corpus
            .iter()
            .map(|&(label, line)| {
                classifier
                    .classify(line)
                    .probability(label)
                    .unwrap()
                    .max(f64::MIN_POSITIVE)
                    .ln()
            })
            .sum()
    }

    #[test]
    fn test_train_single_language_fails() {
        let mut trainer = Trainer::new(1, 3, 10).unwrap();
        trainer.push_line("ca", "la riada va fer molt de mal.").unwrap();
        trainer.push_line("ca", "hem vingut a la conferència.").unwrap();

        let result = trainer.train();
        assert!(matches!(result, Err(LangIdError::InvalidCorpus(_))));
    }

    #[test]
    fn test_train_separates_toy_corpus() {
        let model = toy_trainer(50).train().unwrap();
        let classifier = Classifier::new(model).unwrap();

        let outcome = classifier.classify("aaa");
        assert_eq!("a", outcome.label());
        assert!(outcome.probability("a").unwrap() > 0.5);

        let outcome = classifier.classify("bbb");
        assert_eq!("b", outcome.label());
        assert!(outcome.probability("b").unwrap() > 0.5);
    }

    #[test]
    fn test_train_is_deterministic() {
        let first = toy_trainer(30).train().unwrap();
        let second = toy_trainer(30).train().unwrap();

        assert_eq!(first.weights, second.weights);
    }

    #[test]
    fn test_train_log_likelihood_is_non_decreasing() {
        let mut prev = f64::NEG_INFINITY;
        for iterations in [1, 2, 5, 10, 20, 50] {
            let ll = toy_log_likelihood(toy_trainer(iterations).train().unwrap());
            assert!(
                ll >= prev - 1e-9,
                "log-likelihood dropped from {prev} to {ll} at {iterations} iterations"
            );
            prev = ll;
        }
    }

    #[test]
    fn test_train_unobserved_pairs_keep_zero_weight() {
        let model = toy_trainer(20).train().unwrap();

        // "bb" never occurs in label "a" lines.
        let fid = model.ngrams.iter().position(|n| n == "bb").unwrap();
        assert_eq!(0.0, model.weights[0][fid]);
        assert_ne!(0.0, model.weights[1][fid]);
    }

    #[test]
    fn test_train_with_tolerance_stops_early() {
        // A coarse tolerance stops after a handful of iterations, well
        // before the fixed iteration count is exhausted.
        let relaxed = toy_trainer(50).with_tolerance(0.5).train().unwrap();
        let exhaustive = toy_trainer(50).train().unwrap();

        assert_ne!(relaxed.weights, exhaustive.weights);

        let classifier = Classifier::new(relaxed).unwrap();
        assert_eq!("a", classifier.classify("aaa").label());
    }

    #[test]
    fn test_train_accepts_empty_lines() {
        let mut trainer = Trainer::new(1, 3, 10).unwrap();
        trainer.push_line("a", "").unwrap();
        trainer.push_line("a", "aaa").unwrap();
        trainer.push_line("b", "bbb").unwrap();

        assert!(trainer.train().is_ok());
    }
}
