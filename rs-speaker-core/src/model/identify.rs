use std::fmt;
use std::sync::mpsc;
use std::thread;

use log::info;
use serde::{Deserialize, Serialize};

use super::markov_model::MarkovModel;
use super::store::Backend;
use crate::error::MarkovError;
use crate::table::config::TableConfig;

/// Speaker judged more likely to have produced the unknown text.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
	A,
	B,
}

impl Verdict {
	/// `A` only if `prob_a` is strictly greater, so ties go to `B`.
	pub fn from_scores(prob_a: f64, prob_b: f64) -> Self {
		if prob_a > prob_b { Verdict::A } else { Verdict::B }
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Verdict::A => f.pad("A"),
			Verdict::B => f.pad("B"),
		}
	}
}

/// Normalized scores of both speakers and the resulting verdict.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Classification {
	pub prob_a: f64,
	pub prob_b: f64,
	pub verdict: Verdict,
}

/// Everything `identify_speaker_with` needs.
///
/// `IdentifyRequest::new` fills `config` with [`TableConfig::default`] and
/// leaves `parallel` off; both fields can be changed afterwards.
#[derive(Clone, Copy, Debug)]
pub struct IdentifyRequest<'a> {
	pub speaker_a: &'a str,
	pub speaker_b: &'a str,
	pub unknown: &'a str,

	/// Window length, must be >= 1.
	pub k: usize,

	pub backend: Backend,

	/// Parameters of the custom table (only the default value is used by
	/// the native backend).
	pub config: TableConfig,

	/// Build the two models on two threads when more than one CPU is
	/// available. The result is the same either way.
	pub parallel: bool,
}

impl<'a> IdentifyRequest<'a> {
	pub fn new(speaker_a: &'a str, speaker_b: &'a str, unknown: &'a str, k: usize, backend: Backend) -> Self {
		Self {
			speaker_a,
			speaker_b,
			unknown,
			k,
			backend,
			config: TableConfig::default(),
			parallel: false,
		}
	}

	fn validate(&self) -> Result<(), MarkovError> {
		if self.k == 0 {
			return Err(MarkovError::invalid("k must be >= 1"));
		}
		if self.speaker_a.is_empty() {
			return Err(MarkovError::EmptyText("speaker A"));
		}
		if self.speaker_b.is_empty() {
			return Err(MarkovError::EmptyText("speaker B"));
		}
		if self.unknown.is_empty() {
			return Err(MarkovError::EmptyText("unknown"));
		}
		self.config.validate()
	}

	/// Builds the model of one speaker and returns its normalized score.
	///
	/// The model learns from the unknown text and counts in the speaker's
	/// text, then scores the speaker's text. The score is divided by the
	/// length of the unknown text for both speakers.
	fn score(&self, speaker_text: &str) -> Result<f64, MarkovError> {
		let model = MarkovModel::build(self.k, self.unknown, speaker_text, self.backend, &self.config)?;
		let length = self.unknown.chars().count() as f64;
		Ok(model.log_probability(speaker_text)? / length)
	}

	fn score_in_parallel(&self) -> Result<(f64, f64), MarkovError> {
		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (verdict, speaker_text) in [(Verdict::A, self.speaker_a), (Verdict::B, self.speaker_b)] {
				let tx = tx.clone();
				scope.spawn(move || {
					// The receiver lives until the end of the function
					let _ = tx.send((verdict, self.score(speaker_text)));
				});
			}
		});
		drop(tx);

		let mut prob_a = None;
		let mut prob_b = None;
		for (verdict, score) in rx.iter() {
			match verdict {
				Verdict::A => prob_a = Some(score?),
				Verdict::B => prob_b = Some(score?),
			}
		}
		match (prob_a, prob_b) {
			(Some(a), Some(b)) => Ok((a, b)),
			_ => Err(MarkovError::invalid("a scoring thread did not report back")),
		}
	}
}

/// Decides which of two speakers more likely produced `unknown`, using the
/// default table configuration.
///
/// See [`identify_speaker_with`].
pub fn identify_speaker(
	speaker_a: &str,
	speaker_b: &str,
	unknown: &str,
	k: usize,
	backend: Backend,
) -> Result<Classification, MarkovError> {
	identify_speaker_with(&IdentifyRequest::new(speaker_a, speaker_b, unknown, k, backend))
}

/// Decides which of two speakers more likely produced the unknown text.
///
/// 1. A model is built for speaker A with the unknown text as learning text
///    and speaker A's text as reference text, likewise for speaker B.
/// 2. `prob_a = model_a.log_probability(speaker_a) / len(unknown)`, same for B.
/// 3. The verdict is `A` if `prob_a > prob_b`, otherwise `B`.
///
/// # Errors
/// - [`MarkovError::InvalidConfig`] if `k == 0` or the table config is invalid
/// - [`MarkovError::EmptyText`] if any of the three texts is empty
/// - [`MarkovError::Allocation`] if a table cannot grow
pub fn identify_speaker_with(request: &IdentifyRequest) -> Result<Classification, MarkovError> {
	request.validate()?;

	let (prob_a, prob_b) = if request.parallel && num_cpus::get() > 1 {
		request.score_in_parallel()?
	} else {
		(request.score(request.speaker_a)?, request.score(request.speaker_b)?)
	};

	let verdict = Verdict::from_scores(prob_a, prob_b);
	info!(
		"{} backend, k = {}: A = {:.6}, B = {:.6} -> speaker {}",
		request.backend, request.k, prob_a, prob_b, verdict
	);
	Ok(Classification { prob_a, prob_b, verdict })
}
