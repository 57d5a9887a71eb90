use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::errors::{LangIdError, Result};
use crate::feature::Feature;

pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    pub fn get_id<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.ids.len();
            self.keys.push(key.to_owned());
            self.ids.insert(key.to_owned(), id);
            id
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

impl<K> Default for Indexer<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// One training example: a language id and its feature values indexed into
/// the corpus vocabulary.
pub(crate) struct Event {
    pub(crate) label: usize,
    pub(crate) features: Vec<(u32, f64)>,
    pub(crate) total: f64,
}

/// An ordered collection of training events with a derived vocabulary.
///
/// Labels and n-grams are assigned dense ids in first-seen order, so the
/// same ordered corpus always produces the same vocabulary.
pub struct EventCorpus {
    pub(crate) label_ids: Indexer<String>,
    pub(crate) feature_ids: Indexer<String>,
    pub(crate) events: Vec<Event>,
}

impl EventCorpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self {
            label_ids: Indexer::new(),
            feature_ids: Indexer::new(),
            events: vec![],
        }
    }

    /// Adds one training event.
    ///
    /// An event with no features is legal; it contributes nothing to the
    /// expectations but still registers its label.
    ///
    /// # Errors
    ///
    /// [`LangIdError::CastError`] will be returned if the maximum number of
    /// features has been reached.
    pub fn push_event(&mut self, label: &str, features: &[Feature]) -> Result<()> {
        let label = self.label_ids.get_id(label);
        let mut indexed = Vec::with_capacity(features.len());
        let mut total = 0.0;
        for f in features {
            let fid = u32::try_from(self.feature_ids.get_id(&f.ngram))?;
            indexed.push((fid, f.value));
            total += f.value;
        }
        self.events.push(Event {
            label,
            features: indexed,
            total,
        });
        Ok(())
    }

    /// Gets the number of events.
    pub fn n_events(&self) -> usize {
        self.events.len()
    }

    /// Gets the number of distinct n-grams.
    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }

    /// Gets the labels in first-seen order.
    pub fn labels(&self) -> &[String] {
        self.label_ids.keys()
    }

    /// Validates the corpus and returns the GIS correction constant: the
    /// maximum total feature value over all events. Every event's correction
    /// feature carries the difference to this constant, so all event totals
    /// are equal.
    pub(crate) fn finalize(&self) -> Result<f64> {
        if self.label_ids.len() < 2 {
            return Err(LangIdError::invalid_corpus(format!(
                "at least 2 languages are required, got {}",
                self.label_ids.len()
            )));
        }
        let mut events_per_label = vec![0usize; self.label_ids.len()];
        for event in &self.events {
            events_per_label[event.label] += 1;
        }
        for (label, &n) in self.label_ids.keys().iter().zip(&events_per_label) {
            if n == 0 {
                return Err(LangIdError::invalid_corpus(format!(
                    "language {label} has no training events"
                )));
            }
        }
        let c = self
            .events
            .iter()
            .map(|event| event.total)
            .fold(0.0, f64::max);
        // A corpus of featureless events trains no weights; any positive
        // constant keeps the arithmetic well-defined.
        Ok(if c > 0.0 { c } else { 1.0 })
    }
}

impl Default for EventCorpus {
    fn default() -> Self {
        Self::new()
    }
}
