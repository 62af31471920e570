use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarkovError;
use crate::table::config::TableConfig;
use crate::table::hash_table::HashTable;

/// Capability set a Markov model needs from its count storage.
///
/// Both implementations must behave identically: a missing key reads as the
/// store's default value and `set` overwrites.
pub trait CountStore: fmt::Debug + Send {
	/// Count stored under `key`, or the default value.
	fn get(&self, key: &str) -> usize;

	/// Inserts or overwrites the count of `key`.
	fn set(&mut self, key: &str, value: usize) -> Result<(), MarkovError>;

	fn contains(&self, key: &str) -> bool;

	/// Stored keys, in no particular order.
	fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

	/// Stored values, in no particular order.
	fn values(&self) -> Box<dyn Iterator<Item = usize> + '_>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl CountStore for HashTable {
	fn get(&self, key: &str) -> usize {
		HashTable::get(self, key)
	}

	fn set(&mut self, key: &str, value: usize) -> Result<(), MarkovError> {
		HashTable::set(self, key, value)
	}

	fn contains(&self, key: &str) -> bool {
		HashTable::contains(self, key)
	}

	fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
		Box::new(HashTable::keys(self))
	}

	fn values(&self) -> Box<dyn Iterator<Item = usize> + '_> {
		Box::new(HashTable::values(self))
	}

	fn len(&self) -> usize {
		HashTable::len(self)
	}
}

/// Count store backed by the standard library `HashMap`.
///
/// Used as a reference backend to compare against [`HashTable`].
#[derive(Clone, Debug, Default)]
pub struct NativeMap {
	map: HashMap<String, usize>,
	default_value: usize,
}

impl NativeMap {
	pub fn new(default_value: usize) -> Self {
		Self { map: HashMap::new(), default_value }
	}
}

impl CountStore for NativeMap {
	fn get(&self, key: &str) -> usize {
		self.map.get(key).copied().unwrap_or(self.default_value)
	}

	fn set(&mut self, key: &str, value: usize) -> Result<(), MarkovError> {
		if let Some(stored) = self.map.get_mut(key) {
			*stored = value;
			return Ok(());
		}
		self.map
			.try_reserve(1)
			.map_err(|source| MarkovError::Allocation { capacity: self.map.len() + 1, source })?;
		self.map.insert(key.to_owned(), value);
		Ok(())
	}

	fn contains(&self, key: &str) -> bool {
		self.map.contains_key(key)
	}

	fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
		Box::new(self.map.keys().map(String::as_str))
	}

	fn values(&self) -> Box<dyn Iterator<Item = usize> + '_> {
		Box::new(self.map.values().copied())
	}

	fn len(&self) -> usize {
		self.map.len()
	}
}

/// Which count store a model is built on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
	/// The open-addressing [`HashTable`].
	#[default]
	Table,
	/// The standard library map ([`NativeMap`]).
	Native,
}

impl Backend {
	/// Both backends, custom table first.
	pub const ALL: [Backend; 2] = [Backend::Table, Backend::Native];

	/// Allocates an empty store of this kind.
	///
	/// The native map only uses `config.default_value`; the other fields
	/// still have to be valid so that both backends reject the same inputs.
	pub fn make_store(self, config: &TableConfig) -> Result<Box<dyn CountStore>, MarkovError> {
		match self {
			Backend::Table => Ok(Box::new(HashTable::new(*config)?)),
			Backend::Native => {
				config.validate()?;
				Ok(Box::new(NativeMap::new(config.default_value)))
			}
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Backend::Table => "table",
			Backend::Native => "native",
		}
	}
}

impl fmt::Display for Backend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.name())
	}
}

impl FromStr for Backend {
	type Err = MarkovError;

	/// Accepts `table`/`hashtable`/`0` and `native`/`dict`/`1`, case-insensitive.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"table" | "hashtable" | "0" => Ok(Backend::Table),
			"native" | "dict" | "1" => Ok(Backend::Native),
			other => Err(MarkovError::invalid(format!(
				"unknown backend '{}', expected 'table' or 'native'",
				other
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn exercise(store: &mut dyn CountStore) {
		assert!(store.is_empty());
		assert_eq!(store.get("ab"), 0);

		store.set("ab", 2).unwrap();
		store.set("abc", 1).unwrap();
		store.set("ab", 4).unwrap();

		assert_eq!(store.get("ab"), 4);
		assert_eq!(store.get("abc"), 1);
		assert!(store.contains("abc"));
		assert!(!store.contains("zz"));
		assert_eq!(store.len(), 2);

		let mut keys: Vec<_> = store.keys().collect();
		keys.sort();
		assert_eq!(keys, vec!["ab", "abc"]);
		let mut values: Vec<_> = store.values().collect();
		values.sort();
		assert_eq!(values, vec![1, 4]);
	}

	#[test]
	fn both_backends_share_behaviour() {
		for backend in Backend::ALL {
			let mut store = backend.make_store(&TableConfig::with_capacity(3)).unwrap();
			exercise(store.as_mut());
		}
	}

	#[test]
	fn native_map_uses_default_value() {
		let store = NativeMap::new(5);
		assert_eq!(store.get("missing"), 5);
	}

	#[test]
	fn both_backends_reject_invalid_config() {
		let config = TableConfig { load_factor: 2.0, ..TableConfig::default() };
		for backend in Backend::ALL {
			assert!(backend.make_store(&config).is_err());
		}
	}

	#[test]
	fn parse_backend() {
		assert_eq!("table".parse::<Backend>().unwrap(), Backend::Table);
		assert_eq!("0".parse::<Backend>().unwrap(), Backend::Table);
		assert_eq!("Native".parse::<Backend>().unwrap(), Backend::Native);
		assert_eq!("dict".parse::<Backend>().unwrap(), Backend::Native);
		assert_eq!(" 1 ".parse::<Backend>().unwrap(), Backend::Native);
		assert!("btree".parse::<Backend>().is_err());
		assert_eq!(Backend::Native.to_string(), "native");
	}
}
