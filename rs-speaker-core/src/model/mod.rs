//! Top-level module for speaker identification.
//!
//! This module provides the character n-gram classifier, including:
//! - Circular window extraction (`window`)
//! - Count storage behind a single interface (`CountStore`, `Backend`)
//! - The Markov model and its Laplace-smoothed scorer (`MarkovModel`)
//! - Two-speaker classification (`identify_speaker`)

/// Two-speaker classification built on top of `MarkovModel`.
///
/// Builds one model per speaker, normalizes both scores by the unknown
/// text's length and derives the verdict.
pub mod identify;

/// Character-level Markov model of order `k`.
///
/// Handles window counting against a reference text and
/// log-probability scoring of a candidate text.
pub mod markov_model;

/// Count storage interface and its two implementations
/// (custom open-addressing table, standard `HashMap`).
pub mod store;

/// Circular k-window extraction.
pub mod window;
