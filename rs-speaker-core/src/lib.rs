//! Character n-gram speaker identification library.
//!
//! This crate decides which of two reference speakers more likely produced
//! an unknown text, and includes:
//! - An open-addressing hash table with tombstones and dynamic resizing
//! - Character-level Markov models over circular k-windows
//! - Laplace-smoothed log-probability scoring
//! - A backend switch between the custom table and the standard `HashMap`
//! - Internal utilities for reading text files

/// Open-addressing hash table storing n-gram counts.
pub mod table;

/// Markov models, scoring and classification.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (text loading, file listing).
pub mod io;

pub use error::MarkovError;
pub use model::identify::{Classification, IdentifyRequest, Verdict, identify_speaker, identify_speaker_with};
pub use model::markov_model::MarkovModel;
pub use model::store::{Backend, CountStore, NativeMap};
pub use table::config::TableConfig;
pub use table::hash_table::HashTable;
