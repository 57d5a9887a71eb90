use hashbrown::HashMap;

use crate::errors::{LangIdError, Result};

/// A character n-gram paired with its normalized frequency within one line.
///
/// The value is the number of occurrences of the n-gram divided by the total
/// number of n-grams of the same length in the line, so the values of all
/// features of one length sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub(crate) ngram: String,
    pub(crate) value: f64,
}

impl Feature {
    /// Returns the n-gram string.
    pub fn ngram(&self) -> &str {
        &self.ngram
    }

    /// Returns the normalized frequency.
    pub const fn value(&self) -> f64 {
        self.value
    }
}

/// Extractor of character n-gram features.
///
/// Lines are lowercased, then every overlapping window of `min_ngram` to
/// `max_ngram` characters becomes a feature, including windows spanning
/// whitespace and punctuation. No tokenization is applied.
pub struct FeatureExtractor {
    min_ngram: usize,
    max_ngram: usize,
}

impl FeatureExtractor {
    /// Creates a new feature extractor.
    ///
    /// # Arguments
    ///
    /// * `min_ngram` - The minimum n-gram length in characters.
    /// * `max_ngram` - The maximum n-gram length in characters.
    ///
    /// # Errors
    ///
    /// [`LangIdError::InvalidArgument`] will be returned if `min_ngram` is
    /// zero or greater than `max_ngram`.
    pub fn new(min_ngram: usize, max_ngram: usize) -> Result<Self> {
        if min_ngram == 0 {
            return Err(LangIdError::invalid_argument(
                "min_ngram",
                "must be at least 1",
            ));
        }
        if max_ngram < min_ngram {
            return Err(LangIdError::invalid_argument(
                "max_ngram",
                format!("must not be less than min_ngram ({min_ngram})"),
            ));
        }
        Ok(Self {
            min_ngram,
            max_ngram,
        })
    }

    /// Extracts the feature set of a line.
    ///
    /// One feature is emitted per distinct n-gram per length, sorted by
    /// n-gram so that the result only depends on the content of the line.
    /// An empty line, or a length with no window fitting into the line,
    /// contributes no features.
    pub fn extract(&self, line: &str) -> Vec<Feature> {
        let chars: Vec<char> = line.to_lowercase().chars().collect();
        let mut features = vec![];
        for len in self.min_ngram..=self.max_ngram {
            if chars.len() < len {
                continue;
            }
            let total = chars.len() - len + 1;
            let mut counts = HashMap::new();
            for window in chars.windows(len) {
                *counts
                    .entry(window.iter().collect::<String>())
                    .or_insert(0usize) += 1;
            }
            let mut ngrams: Vec<_> = counts.into_iter().collect();
            ngrams.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            for (ngram, count) in ngrams {
                features.push(Feature {
                    ngram,
                    value: count as f64 / total as f64,
                });
            }
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_extractor_new_zero_min() {
        let fe = FeatureExtractor::new(0, 3);

        assert!(fe.is_err());
        assert_eq!(
            "InvalidArgumentError: min_ngram: must be at least 1",
            &fe.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_feature_extractor_new_inverted_range() {
        let fe = FeatureExtractor::new(3, 1);

        assert!(fe.is_err());
    }

    #[test]
    fn test_extract_empty_line() {
        let fe = FeatureExtractor::new(1, 3).unwrap();

        assert_eq!(Vec::<Feature>::new(), fe.extract(""));
    }

    #[test]
    fn test_extract_line_shorter_than_max() {
        let fe = FeatureExtractor::new(1, 3).unwrap();
        let features = fe.extract("ab");

        // Only 1-grams and 2-grams fit.
        let expected = vec![
            Feature {
                ngram: "a".to_string(),
                value: 0.5,
            },
            Feature {
                ngram: "b".to_string(),
                value: 0.5,
            },
            Feature {
                ngram: "ab".to_string(),
                value: 1.0,
            },
        ];
        assert_eq!(expected, features);
    }

    #[test]
    fn test_extract_counts_and_lowercases() {
        let fe = FeatureExtractor::new(1, 2).unwrap();
        let features = fe.extract("AbA");

        #[rustfmt::skip]
        let expected = vec![
            Feature { ngram: "a".to_string(), value: 2.0 / 3.0 },
            Feature { ngram: "b".to_string(), value: 1.0 / 3.0 },
            Feature { ngram: "ab".to_string(), value: 0.5 },
            Feature { ngram: "ba".to_string(), value: 0.5 },
        ];
        assert_eq!(expected, features);
    }

    #[test]
    fn test_extract_spans_whitespace() {
        let fe = FeatureExtractor::new(2, 2).unwrap();
        let features = fe.extract("a b");

        #[rustfmt::skip]
        let expected = vec![
            Feature { ngram: " b".to_string(), value: 0.5 },
            Feature { ngram: "a ".to_string(), value: 0.5 },
        ];
        assert_eq!(expected, features);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let fe = FeatureExtractor::new(1, 3).unwrap();

        assert_eq!(
            fe.extract("Hem vingut a la conferència"),
            fe.extract("Hem vingut a la conferència"),
        );
    }

    #[test]
    fn test_extract_values_sum_to_one_per_length() {
        let fe = FeatureExtractor::new(1, 3).unwrap();
        let features = fe.extract("La riada va fer molt de mal.");

        for len in 1..=3 {
            let sum: f64 = features
                .iter()
                .filter(|f| f.ngram.chars().count() == len)
                .map(|f| f.value)
                .sum();
            assert!((sum - 1.0).abs() < 1e-6, "length {len}: sum {sum}");
        }
    }

    #[test]
    fn test_extract_multibyte_chars() {
        let fe = FeatureExtractor::new(2, 2).unwrap();
        let features = fe.extract("ça");

        let expected = vec![Feature {
            ngram: "ça".to_string(),
            value: 1.0,
        }];
        assert_eq!(expected, features);
    }
}
