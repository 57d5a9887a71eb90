use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::Result;

/// Model data.
///
/// A weight is stored for every (language, n-gram) pair, with one extra
/// weight per language for the GIS correction feature at index
/// `ngrams.len()`. Weights for pairs never observed together in training
/// are exactly 0.
#[derive(Decode, Encode)]
pub struct Model {
    pub(crate) labels: Vec<String>,
    pub(crate) ngrams: Vec<String>,
    pub(crate) weights: Vec<Vec<f64>>,
    pub(crate) correction_constant: f64,
    pub(crate) min_ngram: usize,
    pub(crate) max_ngram: usize,
}

impl Model {
    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        bincode::encode_into_std_write(self, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        Ok(bincode::decode_from_std_read(
            rdr,
            bincode::config::standard(),
        )?)
    }

    /// Gets the language codes in registration order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Gets the number of n-gram features.
    pub fn n_features(&self) -> usize {
        self.ngrams.len()
    }
}

/// Computes P(label | features) for every label under the given weights.
///
/// `features` holds (feature index, value) pairs; `correction_value` is the
/// value of the correction feature, stored at `correction_idx` in each weight
/// row. Scores are shifted by their maximum before exponentiation so large
/// weights cannot overflow.
pub(crate) fn posterior(
    weights: &[Vec<f64>],
    features: &[(u32, f64)],
    correction_value: f64,
    correction_idx: usize,
) -> Vec<f64> {
    let mut scores: Vec<f64> = weights
        .iter()
        .map(|w| {
            let mut score = w[correction_idx] * correction_value;
            for &(fid, value) in features {
                score += w[fid as usize] * value;
            }
            score
        })
        .collect();
    let max = scores.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let mut sum = 0.0;
    for score in &mut scores {
        *score = (*score - max).exp();
        sum += *score;
    }
    for score in &mut scores {
        *score /= sum;
    }
    scores
}
