//! Key/value metadata of an MBTiles archive.

use crate::TransferError;
use std::collections::BTreeMap;

/// The `metadata` table of an archive, loaded once when the archive is opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveMetadata {
	entries: BTreeMap<String, String>,
}

impl ArchiveMetadata {
	#[must_use]
	pub fn new() -> ArchiveMetadata {
		ArchiveMetadata::default()
	}

	/// Stores a value. A repeated key keeps the last value.
	pub fn insert(&mut self, name: &str, value: &str) {
		self.entries.insert(name.to_string(), value.to_string());
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries.get(name).map(String::as_str)
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn format(&self) -> Option<&str> {
		self.get("format")
	}

	pub fn minzoom(&self) -> Result<Option<u8>, TransferError> {
		self.zoom("minzoom")
	}

	pub fn maxzoom(&self) -> Result<Option<u8>, TransferError> {
		self.zoom("maxzoom")
	}

	fn zoom(&self, name: &str) -> Result<Option<u8>, TransferError> {
		match self.get(name).map(str::trim) {
			None | Some("") => Ok(None),
			Some(value) => value.parse::<u8>().map(Some).map_err(|_| {
				TransferError::configuration(format!("metadata {name} ({value:?}) is not a valid zoom level"))
			}),
		}
	}
}

impl<'a> FromIterator<(&'a str, &'a str)> for ArchiveMetadata {
	fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
		let mut metadata = ArchiveMetadata::new();
		for (name, value) in iter {
			metadata.insert(name, value);
		}
		metadata
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accessors() {
		let metadata = ArchiveMetadata::from_iter([("minzoom", "2"), ("maxzoom", " 14 "), ("format", "pbf")]);
		assert_eq!(metadata.len(), 3);
		assert_eq!(metadata.format(), Some("pbf"));
		assert_eq!(metadata.minzoom().unwrap(), Some(2));
		assert_eq!(metadata.maxzoom().unwrap(), Some(14));
	}

	#[test]
	fn missing_values() {
		let metadata = ArchiveMetadata::from_iter([("name", "world"), ("minzoom", "")]);
		assert_eq!(metadata.format(), None);
		assert_eq!(metadata.minzoom().unwrap(), None);
		assert_eq!(metadata.maxzoom().unwrap(), None);
	}

	#[test]
	fn invalid_zoom() {
		let metadata = ArchiveMetadata::from_iter([("maxzoom", "fourteen")]);
		assert!(matches!(metadata.maxzoom(), Err(TransferError::Configuration(_))));
	}

	#[test]
	fn iteration_is_ordered_by_name() {
		let mut metadata = ArchiveMetadata::new();
		metadata.insert("name", "a");
		metadata.insert("format", "png");
		metadata.insert("name", "b");
		let names: Vec<_> = metadata.entries().collect();
		assert_eq!(names, vec![("format", "png"), ("name", "b")]);
	}
}
