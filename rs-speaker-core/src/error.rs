use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised by the tables, models and the classifier.
///
/// A lookup miss is never an error: tables answer with their default value.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A configuration value is outside its valid range (`k = 0`,
	/// `load_factor` outside `(0, 1]`, `growth_factor < 1`, ...).
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// One of the input texts is empty. The payload names which one.
	#[error("{0} text must not be empty")]
	EmptyText(&'static str),

	/// The slot array could not be grown.
	#[error("failed to allocate {capacity} slots")]
	Allocation {
		capacity: usize,
		#[source]
		source: TryReserveError,
	},
}

impl MarkovError {
	pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
		MarkovError::InvalidConfig(message.into())
	}
}
