use hashbrown::HashMap;

use crate::errors::{LangIdError, Result};
use crate::feature::FeatureExtractor;
use crate::model::{posterior, Model};

/// The result of classifying one line: the most probable language and the
/// full probability distribution over all languages.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    best: usize,
    distribution: Vec<(String, f64)>,
}

impl Outcome {
    /// Returns the most probable language code. Ties break toward the
    /// language registered first at training time.
    pub fn label(&self) -> &str {
        &self.distribution[self.best].0
    }

    /// Returns the probability of each language, in registration order.
    /// The probabilities sum to 1.
    pub fn distribution(&self) -> &[(String, f64)] {
        &self.distribution
    }

    /// Returns the probability of the given language, or `None` if the
    /// model does not know it.
    pub fn probability(&self, label: &str) -> Option<f64> {
        self.distribution
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, p)| p)
    }
}

/// Classifier.
///
/// Holds a trained [`Model`] and classifies raw lines against it. The
/// classifier is immutable, so it can be shared freely across threads.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
///
/// use langid::{Classifier, Model};
///
/// let mut f = BufReader::new(File::open("model.bin").unwrap());
/// let model = Model::read(&mut f).unwrap();
/// let classifier = Classifier::new(model).unwrap();
///
/// let outcome = classifier.classify("qualquer livro serve.");
/// println!("{}", outcome.label());
/// ```
pub struct Classifier {
    model: Model,
    extractor: FeatureExtractor,
    ngram_ids: HashMap<String, u32>,
}

impl Classifier {
    /// Creates a new classifier.
    ///
    /// # Arguments
    ///
    /// * `model` - A model data.
    ///
    /// # Errors
    ///
    /// [`LangIdError::InvalidArgument`] will be returned if the model's
    /// weight table does not match its vocabulary, and
    /// [`LangIdError::CastError`] if the vocabulary exceeds the feature id
    /// range.
    pub fn new(model: Model) -> Result<Self> {
        if model.labels.is_empty() {
            return Err(LangIdError::invalid_argument(
                "model",
                "contains no languages",
            ));
        }
        if model.weights.len() != model.labels.len() {
            return Err(LangIdError::invalid_argument(
                "model",
                "number of weight rows does not match number of languages",
            ));
        }
        for row in &model.weights {
            if row.len() != model.ngrams.len() + 1 {
                return Err(LangIdError::invalid_argument(
                    "model",
                    "weight row length does not match vocabulary size",
                ));
            }
        }
        let extractor = FeatureExtractor::new(model.min_ngram, model.max_ngram)?;
        let mut ngram_ids = HashMap::with_capacity(model.ngrams.len());
        for (id, ngram) in model.ngrams.iter().enumerate() {
            ngram_ids.insert(ngram.clone(), u32::try_from(id)?);
        }
        Ok(Self {
            model,
            extractor,
            ngram_ids,
        })
    }

    /// Classifies a line.
    ///
    /// N-grams never seen at training time carry no weight and are ignored.
    /// The call is pure and takes `&self`, so concurrent use needs no
    /// synchronization.
    pub fn classify(&self, line: &str) -> Outcome {
        let mut features = vec![];
        let mut total = 0.0;
        for feature in self.extractor.extract(line) {
            total += feature.value();
            if let Some(&fid) = self.ngram_ids.get(feature.ngram()) {
                features.push((fid, feature.value()));
            }
        }
        // The correction feature mirrors the training convention; lines
        // richer than anything seen in training clamp to zero.
        let correction_value = (self.model.correction_constant - total).max(0.0);
        let probs = posterior(
            &self.model.weights,
            &features,
            correction_value,
            self.model.ngrams.len(),
        );

        let mut best = 0;
        for (label, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = label;
            }
        }
        Outcome {
            best,
            distribution: self.model.labels.iter().cloned().zip(probs).collect(),
        }
    }

    /// Gets the language codes known to the model.
    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model() -> Model {
        Model {
            labels: vec!["a".to_string(), "b".to_string()],
            ngrams: vec!["a".to_string(), "b".to_string()],
            weights: vec![vec![1.0, -1.0, 0.0], vec![-1.0, 1.0, 0.0]],
            correction_constant: 3.0,
            min_ngram: 1,
            max_ngram: 1,
        }
    }

    #[test]
    fn test_classifier_new_rejects_mismatched_weights() {
        let mut model = toy_model();
        model.weights.pop();

        let result = Classifier::new(model);
        assert!(matches!(result, Err(LangIdError::InvalidArgument(_))));
    }

    #[test]
    fn test_classify_distribution_sums_to_one() {
        let classifier = Classifier::new(toy_model()).unwrap();
        let outcome = classifier.classify("abba");

        let sum: f64 = outcome.distribution().iter().map(|&(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_classify_label_is_argmax_of_distribution() {
        let classifier = Classifier::new(toy_model()).unwrap();
        let outcome = classifier.classify("aab");

        let (argmax, _) = outcome
            .distribution()
            .iter()
            .fold(("", f64::NEG_INFINITY), |acc, (l, p)| {
                if *p > acc.1 {
                    (l, *p)
                } else {
                    acc
                }
            });
        assert_eq!(argmax, outcome.label());
    }

    #[test]
    fn test_classify_ties_break_toward_first_label() {
        let classifier = Classifier::new(toy_model()).unwrap();

        // "ab" scores both labels identically.
        let outcome = classifier.classify("ab");
        assert_eq!("a", outcome.label());
    }

    #[test]
    fn test_classify_unknown_ngrams_give_uniform_distribution() {
        let classifier = Classifier::new(toy_model()).unwrap();
        let outcome = classifier.classify("xyz");

        assert!((outcome.probability("a").unwrap() - 0.5).abs() < 1e-9);
        assert!((outcome.probability("b").unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_classify_empty_line() {
        let classifier = Classifier::new(toy_model()).unwrap();
        let outcome = classifier.classify("");

        let sum: f64 = outcome.distribution().iter().map(|&(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert_eq!("a", outcome.label());
    }

    #[test]
    fn test_probability_unknown_label() {
        let classifier = Classifier::new(toy_model()).unwrap();
        let outcome = classifier.classify("aa");

        assert_eq!(None, outcome.probability("zz"));
    }
}
