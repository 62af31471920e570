use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// Initial number of slots. A prime, which keeps clustering low with the
/// polynomial hash.
pub const DEFAULT_CAPACITY: usize = 57;

/// Ratio of occupied slots above which the table grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Multiplier applied to the capacity on every growth.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Construction parameters of a [`HashTable`](super::hash_table::HashTable).
///
/// # Invariants (checked by [`TableConfig::validate`])
/// - `capacity >= 1`
/// - `0 < load_factor <= 1`
/// - `growth_factor >= 1`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
	/// Number of slots allocated up front.
	pub capacity: usize,

	/// Value returned by `get` for a key that is not stored.
	pub default_value: usize,

	/// Maximum ratio `len / capacity` tolerated after an insert.
	pub load_factor: f64,

	/// How much the capacity is multiplied by when rehashing.
	pub growth_factor: usize,
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			capacity: DEFAULT_CAPACITY,
			default_value: 0,
			load_factor: DEFAULT_LOAD_FACTOR,
			growth_factor: DEFAULT_GROWTH_FACTOR,
		}
	}
}

impl TableConfig {
	/// Returns a configuration with the given capacity and default parameters
	/// for everything else.
	pub fn with_capacity(capacity: usize) -> Self {
		Self { capacity, ..Self::default() }
	}

	/// Checks every field against its valid range.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidConfig`] naming the first offending field.
	pub fn validate(&self) -> Result<(), MarkovError> {
		if self.capacity == 0 {
			return Err(MarkovError::invalid("capacity must be >= 1"));
		}
		// Written so that NaN is rejected too
		if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
			return Err(MarkovError::invalid(format!(
				"load factor must be in (0, 1], got {}",
				self.load_factor
			)));
		}
		if self.growth_factor < 1 {
			return Err(MarkovError::invalid("growth factor must be >= 1"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_valid() {
		let config = TableConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.capacity, 57);
		assert_eq!(config.default_value, 0);
		assert_eq!(config.load_factor, 0.5);
		assert_eq!(config.growth_factor, 2);
	}

	#[test]
	fn rejects_out_of_range_values() {
		let zero_capacity = TableConfig::with_capacity(0);
		assert!(matches!(zero_capacity.validate(), Err(MarkovError::InvalidConfig(_))));

		for load_factor in [0.0, -0.5, 1.5, f64::NAN] {
			let config = TableConfig { load_factor, ..TableConfig::default() };
			assert!(config.validate().is_err(), "load factor {load_factor} accepted");
		}

		let no_growth = TableConfig { growth_factor: 0, ..TableConfig::default() };
		assert!(no_growth.validate().is_err());
	}

	#[test]
	fn accepts_boundaries() {
		let config = TableConfig { capacity: 1, load_factor: 1.0, growth_factor: 1, default_value: 7 };
		assert!(config.validate().is_ok());
	}
}
