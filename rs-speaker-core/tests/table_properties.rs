use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rs_speaker_core::{HashTable, TableConfig};
use rs_speaker_core::table::hash_table::hash;

const ALPHABET: [char; 5] = ['a', 'b', 'c', ' ', 'é'];

fn random_key(rng: &mut StdRng) -> String {
	let length = rng.random_range(0..5);
	(0..length).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]).collect()
}

fn assert_load_factor(table: &HashTable) {
	let ratio = table.len() as f64 / table.capacity() as f64;
	assert!(ratio <= table.load_factor(), "{} entries in {} slots", table.len(), table.capacity());
}

/// Random set/delete sequences must behave exactly like a `HashMap`.
#[test]
fn matches_std_hashmap() {
	let configs = [
		TableConfig::default(),
		TableConfig { capacity: 1, load_factor: 1.0, growth_factor: 1, default_value: 0 },
		TableConfig { capacity: 7, load_factor: 0.75, growth_factor: 3, default_value: 0 },
		TableConfig { capacity: 2, load_factor: 0.25, growth_factor: 2, default_value: 0 },
	];

	for (seed, config) in configs.into_iter().enumerate() {
		let mut rng = StdRng::seed_from_u64(seed as u64);
		let mut table = HashTable::new(config).unwrap();
		let mut expected: HashMap<String, usize> = HashMap::new();

		for _ in 0..3_000 {
			let key = random_key(&mut rng);
			if rng.random_range(0..3) < 2 {
				let value = rng.random_range(0..100);
				table.set(&key, value).unwrap();
				expected.insert(key.clone(), value);
				assert_load_factor(&table);
			} else {
				assert_eq!(table.delete(&key), expected.remove(&key));
			}

			assert_eq!(table.get(&key), expected.get(&key).copied().unwrap_or(0));
			assert_eq!(table.contains(&key), expected.contains_key(&key));
			assert_eq!(table.len(), expected.len());
		}

		let mut entries: Vec<(String, usize)> = table.iter().map(|(k, v)| (k.to_owned(), v)).collect();
		let mut reference: Vec<(String, usize)> = expected.into_iter().collect();
		entries.sort();
		reference.sort();
		assert_eq!(entries, reference);
	}
}

#[test]
fn resize_preserves_surviving_entries() {
	let mut table = HashTable::new(TableConfig::with_capacity(3)).unwrap();
	let keys: Vec<String> = (0..300).map(|i| format!("key-{}", i)).collect();

	for (value, key) in keys.iter().enumerate() {
		table.set(key, value).unwrap();
	}
	for key in keys.iter().step_by(3) {
		table.delete(key);
	}
	let capacity_before = table.capacity();

	// Forces further growth with tombstones in the array
	for (value, key) in keys.iter().enumerate() {
		table.set(&format!("{}-again", key), value).unwrap();
	}
	assert!(table.capacity() > capacity_before);

	for (value, key) in keys.iter().enumerate() {
		if value % 3 == 0 {
			assert!(!table.contains(key));
			assert_eq!(table.get(key), 0);
		} else {
			assert_eq!(table.get(key), value);
		}
		assert_eq!(table.get(&format!("{}-again", key)), value);
	}
	assert_eq!(table.len(), 200 + 300);
}

#[test]
fn round_trip_for_every_key_shape() {
	let mut rng = StdRng::seed_from_u64(7);
	let mut table = HashTable::default();
	for _ in 0..500 {
		let key = random_key(&mut rng);
		let value = rng.random_range(0..usize::MAX);
		table.set(&key, value).unwrap();
		assert_eq!(table.get(&key), value);
	}
}

#[test]
fn delete_then_get_returns_default() {
	let mut table = HashTable::new(TableConfig { default_value: 42, ..TableConfig::default() }).unwrap();
	for key in ["", "a", "ab", "abc"] {
		table.set(key, 1).unwrap();
	}
	for key in ["", "a", "ab", "abc"] {
		table.delete(key);
		assert_eq!(table.get(key), 42);
		assert!(!table.contains(key));
	}
	assert!(table.is_empty());
	assert_eq!(table.keys().count(), 0);
	assert_eq!(table.values().count(), 0);
}

#[test]
fn capacity_never_shrinks() {
	let mut table = HashTable::new(TableConfig::with_capacity(5)).unwrap();
	let mut last = table.capacity();
	for i in 0..100 {
		table.set(&i.to_string(), i).unwrap();
		assert!(table.capacity() >= last);
		last = table.capacity();
	}
	for i in 0..100 {
		table.delete(&i.to_string());
		assert_eq!(table.capacity(), last);
	}
}

#[test]
fn hash_is_pure() {
	let mut rng = StdRng::seed_from_u64(11);
	for _ in 0..200 {
		let key = random_key(&mut rng);
		let capacity = rng.random_range(1..10_000);
		let first = hash(&key, capacity);
		assert_eq!(first, hash(&key.clone(), capacity));
		assert!(first < capacity);
	}
}
