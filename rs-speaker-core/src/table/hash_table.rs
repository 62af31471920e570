use std::borrow::Cow;
use std::mem;

use log::debug;

use super::config::TableConfig;
use super::slot::Slot;
use crate::error::MarkovError;

/// Multiplier of the polynomial string hash.
pub const PRIME_MULTIPLIER: u128 = 43;

/// Polynomial hash of `key` relative to `capacity`.
///
/// `hash = (Σ ord(key[i]) * 43^i mod capacity) mod capacity`, where `ord` is
/// the Unicode scalar value of the i-th character. Every step is reduced
/// modulo `capacity`, so long keys never overflow.
///
/// The result depends on the capacity: after a resize every key hashes to a
/// new position. The empty key hashes to 0, and so does every key when
/// `capacity` is 0.
pub fn hash(key: &str, capacity: usize) -> usize {
	if capacity == 0 {
		return 0;
	}
	let modulus = capacity as u128;
	let mut power = 1 % modulus;
	let mut hash = 0u128;
	for c in key.chars() {
		hash = (hash + (c as u128 % modulus) * power) % modulus;
		power = power * PRIME_MULTIPLIER % modulus;
	}
	hash as usize
}

/// Outcome of walking the probe sequence of a key for an insert.
enum Probe {
	/// The key lives at this index.
	Found(usize),
	/// The key is absent, this is the first reusable slot of its run.
	Vacant(usize),
	/// The key is absent and every slot holds another key.
	Full,
}

/// Open-addressing hash table mapping strings to counts.
///
/// Collisions are resolved with linear probing: a key starts at
/// `hash(key, capacity)` and walks forward one slot at a time, wrapping
/// around, for at most `capacity` steps.
///
/// # Responsibilities
/// - Store, update and delete `(key, count)` pairs
/// - Answer lookups with a configurable default value for missing keys
/// - Grow by `growth_factor` whenever `len / capacity` exceeds `load_factor`
///
/// # Invariants
/// - A key is stored in at most one slot
/// - After every `set`, `len / capacity <= load_factor`
/// - The capacity never shrinks
/// - Deleted keys leave a tombstone that keeps later probe runs reachable
///
/// Iteration order follows the slot array, so it is **unordered**: it
/// depends on hash placement and changes after a resize, not on insertion
/// order.
#[derive(Clone, Debug)]
pub struct HashTable {
	slots: Vec<Slot>,
	len: usize,
	default_value: usize,
	load_factor: f64,
	growth_factor: usize,
}

impl Default for HashTable {
	/// An empty table with 57 slots, default value 0, load factor 0.5 and
	/// growth factor 2.
	fn default() -> Self {
		let config = TableConfig::default();
		Self {
			slots: vec![Slot::Empty; config.capacity],
			len: 0,
			default_value: config.default_value,
			load_factor: config.load_factor,
			growth_factor: config.growth_factor,
		}
	}
}

impl HashTable {
	/// Creates an empty table with `config.capacity` empty slots.
	///
	/// # Errors
	/// - [`MarkovError::InvalidConfig`] if the configuration is out of range
	/// - [`MarkovError::Allocation`] if the slot array cannot be allocated
	pub fn new(config: TableConfig) -> Result<Self, MarkovError> {
		config.validate()?;
		Ok(Self {
			slots: Self::allocate(config.capacity)?,
			len: 0,
			default_value: config.default_value,
			load_factor: config.load_factor,
			growth_factor: config.growth_factor,
		})
	}

	/// Number of live entries. Tombstones are not counted.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of slots currently allocated.
	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	pub fn load_factor(&self) -> f64 {
		self.load_factor
	}

	pub fn growth_factor(&self) -> usize {
		self.growth_factor
	}

	/// Value returned by [`get`](Self::get) for absent keys.
	pub fn default_value(&self) -> usize {
		self.default_value
	}

	/// Returns the value stored under `key`, or the default value if the key
	/// is absent or was deleted.
	pub fn get(&self, key: &str) -> usize {
		match self.find(key) {
			Some(index) => self.slots[index].entry().map_or(self.default_value, |(_, value)| value),
			None => self.default_value,
		}
	}

	/// Returns `true` if `key` has a live entry.
	pub fn contains(&self, key: &str) -> bool {
		self.find(key).is_some()
	}

	/// Inserts `key` or overwrites its value.
	///
	/// Overwriting never resizes. A new key that would push `len / capacity`
	/// above the load factor makes the table grow first (possibly several
	/// times if the growth factor is small), then the key is written.
	///
	/// # Errors
	/// Returns [`MarkovError::Allocation`] if the table needs to grow and the
	/// new slot array cannot be allocated. Nothing is written in that case and
	/// the table keeps its previous contents.
	pub fn set(&mut self, key: &str, value: usize) -> Result<(), MarkovError> {
		if let Some(index) = self.find(key) {
			if let Slot::Occupied(_, stored) = &mut self.slots[index] {
				*stored = value;
			}
			return Ok(());
		}
		while self.exceeds_load_factor(self.len + 1) {
			self.grow()?;
		}
		while !self.insert_entry(Cow::Borrowed(key), value) {
			self.grow()?;
		}
		Ok(())
	}

	/// Deletes `key`, leaving a tombstone in its slot.
	///
	/// Returns the removed value, or `None` if the key was not stored.
	pub fn delete(&mut self, key: &str) -> Option<usize> {
		let index = self.find(key)?;
		let removed = mem::replace(&mut self.slots[index], Slot::Tombstone);
		self.len -= 1;
		removed.entry().map(|(_, value)| value)
	}

	/// Iterates over live `(key, value)` pairs in slot order (unordered).
	pub fn iter(&self) -> Iter<'_> {
		Iter { slots: self.slots.iter() }
	}

	/// Live keys, in slot order (unordered).
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.iter().map(|(key, _)| key)
	}

	/// Live values, in slot order (unordered).
	pub fn values(&self) -> impl Iterator<Item = usize> + '_ {
		self.iter().map(|(_, value)| value)
	}

	/// Index of the occupied slot holding `key`.
	///
	/// Tombstones are skipped. An empty slot ends the search: deletion never
	/// turns a slot back into `Empty`, so no key can sit past an empty slot of
	/// its own probe run.
	fn find(&self, key: &str) -> Option<usize> {
		let capacity = self.capacity();
		let start = hash(key, capacity);
		for offset in 0..capacity {
			let index = (start + offset) % capacity;
			match &self.slots[index] {
				Slot::Empty => return None,
				Slot::Occupied(stored, _) if stored == key => return Some(index),
				_ => continue,
			}
		}
		None
	}

	/// Walks the probe run of `key`, remembering the first reusable slot, until
	/// the key or an empty slot is found.
	fn probe(&self, key: &str) -> Probe {
		let capacity = self.capacity();
		let start = hash(key, capacity);
		let mut first_free = None;
		for offset in 0..capacity {
			let index = (start + offset) % capacity;
			match &self.slots[index] {
				Slot::Empty => return Probe::Vacant(first_free.unwrap_or(index)),
				Slot::Tombstone if first_free.is_none() => first_free = Some(index),
				Slot::Occupied(stored, _) if stored == key => return Probe::Found(index),
				_ => (),
			}
		}
		first_free.map_or(Probe::Full, Probe::Vacant)
	}

	/// Writes `value` under `key` without looking at the load factor.
	///
	/// Returns `false` if the key is absent and no slot is free.
	fn insert_entry(&mut self, key: Cow<'_, str>, value: usize) -> bool {
		match self.probe(&key) {
			Probe::Found(index) => {
				if let Slot::Occupied(_, stored) = &mut self.slots[index] {
					*stored = value;
				}
				true
			}
			Probe::Vacant(index) => {
				self.slots[index] = Slot::Occupied(key.into_owned(), value);
				self.len += 1;
				true
			}
			Probe::Full => false,
		}
	}

	fn exceeds_load_factor(&self, len: usize) -> bool {
		len as f64 / self.capacity() as f64 > self.load_factor
	}

	/// Rehashes every live entry into a larger slot array.
	///
	/// The new capacity is `capacity * growth_factor`, and at least one more
	/// slot than before so that a growth factor of 1 still makes progress.
	/// Tombstones are dropped.
	fn grow(&mut self) -> Result<(), MarkovError> {
		let old_capacity = self.capacity();
		let new_capacity = old_capacity.saturating_mul(self.growth_factor).max(old_capacity + 1);
		let new_slots = Self::allocate(new_capacity)?;

		let old_slots = mem::replace(&mut self.slots, new_slots);
		self.len = 0;
		for slot in old_slots {
			if let Slot::Occupied(key, value) = slot {
				let placed = self.insert_entry(Cow::Owned(key), value);
				debug_assert!(placed, "rehash target has fewer free slots than entries");
			}
		}

		debug!("rehashed {} entries: {} -> {} slots", self.len, old_capacity, new_capacity);
		Ok(())
	}

	fn allocate(capacity: usize) -> Result<Vec<Slot>, MarkovError> {
		let mut slots = Vec::new();
		slots
			.try_reserve_exact(capacity)
			.map_err(|source| MarkovError::Allocation { capacity, source })?;
		slots.resize(capacity, Slot::Empty);
		Ok(slots)
	}
}

/// Iterator over the live entries of a [`HashTable`], in slot order.
pub struct Iter<'a> {
	slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
	type Item = (&'a str, usize);

	fn next(&mut self) -> Option<Self::Item> {
		self.slots.find_map(Slot::entry)
	}
}

impl<'a> IntoIterator for &'a HashTable {
	type Item = (&'a str, usize);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
