use std::collections::HashSet;

use log::debug;

use super::store::{Backend, CountStore};
use super::window::k_windows;
use crate::error::MarkovError;
use crate::table::config::TableConfig;

/// Character-level Markov model of order `k`.
///
/// The model slides over a *learning* text and, for every position, stores
/// how often the k-window and the (k+1)-window found there occur among the
/// circular windows of a *reference* text.
///
/// # Responsibilities
/// - Count learning-text windows in the reference text
/// - Score a candidate text with Laplace-smoothed log-probabilities
///
/// # Invariants
/// - `k >= 1`
/// - The learning text is never empty
/// - Every key of the store is a window of length `k` or `k + 1`
#[derive(Debug)]
pub struct MarkovModel {
	/// Window length (order of the model).
	k: usize,

	/// Text the windows are taken from, both when building and scoring.
	learning_text: Vec<char>,

	/// Backend the counts are stored in.
	backend: Backend,

	/// Window -> occurrence count in the reference text.
	store: Box<dyn CountStore>,
}

impl MarkovModel {
	/// Builds a model of order `k`.
	///
	/// For every start index `i` of `learning_text`, the k and (k+1) windows
	/// at `i` are counted among the windows of the same length at every index
	/// of `reference_text`, and the counts are stored under the windows.
	///
	/// The counting compares every learning window with every reference
	/// window, so building costs `O(len(learning) * len(reference))`.
	///
	/// # Errors
	/// - [`MarkovError::InvalidConfig`] if `k == 0` or `config` is invalid
	/// - [`MarkovError::EmptyText`] if either text is empty
	/// - [`MarkovError::Allocation`] if the store cannot grow
	pub fn build(
		k: usize,
		learning_text: &str,
		reference_text: &str,
		backend: Backend,
		config: &TableConfig,
	) -> Result<Self, MarkovError> {
		if k == 0 {
			return Err(MarkovError::invalid("k must be >= 1"));
		}
		let learning_text: Vec<char> = learning_text.chars().collect();
		let reference_text: Vec<char> = reference_text.chars().collect();
		if learning_text.is_empty() {
			return Err(MarkovError::EmptyText("learning"));
		}
		if reference_text.is_empty() {
			return Err(MarkovError::EmptyText("reference"));
		}

		let mut store = backend.make_store(config)?;

		let (reference_k, reference_k_plus_1): (Vec<String>, Vec<String>) =
			(0..reference_text.len()).map(|i| k_windows(&reference_text, i, k)).unzip();

		for i in 0..learning_text.len() {
			let (k_string, k_plus_1_string) = k_windows(&learning_text, i, k);
			let n = occurrences(&reference_k, &k_string);
			let m = occurrences(&reference_k_plus_1, &k_plus_1_string);
			store.set(&k_string, n)?;
			store.set(&k_plus_1_string, m)?;
		}

		debug!("built {} model (k = {}) with {} windows", backend, k, store.len());
		Ok(Self { k, learning_text, backend, store })
	}

	pub fn k(&self) -> usize {
		self.k
	}

	pub fn backend(&self) -> Backend {
		self.backend
	}

	/// Read-only view of the counts.
	pub fn store(&self) -> &dyn CountStore {
		self.store.as_ref()
	}

	/// Log-likelihood that `candidate` was produced by this model.
	///
	/// With `S` the number of distinct characters of `candidate`, the result
	/// is the sum over every start index of the learning text of
	/// `ln((M + 1) / (N + S))`, where `N` is the count of the k-window and `M`
	/// the count of the (k+1)-window found at that index (0 when absent).
	///
	/// The sum is not normalized.
	///
	/// # Errors
	/// Returns [`MarkovError::EmptyText`] if `candidate` is empty.
	pub fn log_probability(&self, candidate: &str) -> Result<f64, MarkovError> {
		let alphabet: HashSet<char> = candidate.chars().collect();
		if alphabet.is_empty() {
			return Err(MarkovError::EmptyText("candidate"));
		}
		let alphabet_size = alphabet.len();

		let sum = (0..self.learning_text.len())
			.map(|i| {
				let (k_string, k_plus_1_string) = k_windows(&self.learning_text, i, self.k);
				laplace_log(self.store.get(&k_string), self.store.get(&k_plus_1_string), alphabet_size)
			})
			.sum();
		Ok(sum)
	}
}

/// One Laplace-smoothed term: `ln((m + 1) / (n + s))`.
///
/// Finite for every `n, m >= 0` as long as `s >= 1`.
pub fn laplace_log(n: usize, m: usize, s: usize) -> f64 {
	((m as f64 + 1.0) / (n as f64 + s as f64)).ln()
}

fn occurrences(windows: &[String], window: &str) -> usize {
	windows.iter().filter(|candidate| candidate.as_str() == window).count()
}
