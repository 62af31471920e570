/// A single cell of the open-addressing array.
///
/// - `Empty`: never written since the array was allocated. Ends a probe run.
/// - `Tombstone`: held a key that was deleted. Probes continue past it and
///   inserts may reuse it.
/// - `Occupied`: a live `(key, value)` entry.
///
/// Only `Occupied` slots are visible through the table's public API.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Slot {
	#[default]
	Empty,
	Tombstone,
	Occupied(String, usize),
}

impl Slot {
	/// Returns the entry if the slot is live.
	pub(crate) fn entry(&self) -> Option<(&str, usize)> {
		match self {
			Slot::Occupied(key, value) => Some((key.as_str(), *value)),
			_ => None,
		}
	}
}
