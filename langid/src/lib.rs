#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Langid
//!
//! Langid identifies the language of a short text by classifying its
//! character 1- to 3-grams with a maximum entropy model trained by
//! Generalized Iterative Scaling.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{prelude::*, stdin, BufReader};
//!
//! use langid::{Classifier, Model};
//!
//! let mut f = BufReader::new(File::open("model.bin").unwrap());
//! let model = Model::read(&mut f).unwrap();
//! let classifier = Classifier::new(model).unwrap();
//!
//! for line in stdin().lock().lines() {
//!     let outcome = classifier.classify(&line.unwrap());
//!     println!("{}", outcome.label());
//! }
//! ```
//!
//! Training requires **crate feature** `train`. For more details, see
//! [`Trainer`].

mod classifier;
mod corpus;
pub mod errors;
mod evaluate;
mod feature;
mod model;

#[cfg(feature = "train")]
mod trainer;

pub use classifier::{Classifier, Outcome};
pub use evaluate::{EvaluationReport, Evaluator, Tally};
pub use feature::{Feature, FeatureExtractor};
pub use model::Model;

#[cfg(feature = "train")]
pub use trainer::Trainer;
