//! Construction of BLO archives.
//!
//! The builder is the inverse of the directory reader: it lays out the header,
//! a directory sized for the chosen version, then every payload back to back.

use super::{constants, name_length};

/// Builder for `.BLO` archives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBuilder {
	version: u32,
	entries: Vec<(String, Vec<u8>)>,
}

impl FileBuilder {
	/// Creates a builder for the given container version (1 or 2).
	///
	/// Any other version is written verbatim, which is useful for producing
	/// deliberately invalid archives in tests.
	pub fn new(version: u32) -> Self {
		Self {
			version,
			entries: Vec::new(),
		}
	}

	/// Appends an entry.
	///
	/// Names longer than the version's name field are truncated.
	pub fn entry(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
		self.entries.push((name.into(), data));
		self
	}

	/// Appends an entry in place.
	pub fn push(&mut self, name: impl Into<String>, data: Vec<u8>) {
		self.entries.push((name.into(), data));
	}

	/// Returns the number of entries added so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no entries were added.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Serializes the archive.
	pub fn build(&self) -> Vec<u8> {
		let name_len = name_length(self.version);
		let directory_size = self.entries.len() * (name_len + 8);
		let payload_size: usize = self.entries.iter().map(|(_, data)| data.len()).sum();

		let mut out = Vec::with_capacity(constants::HEADER_SIZE + directory_size + payload_size);
		out.extend_from_slice(&self.version.to_le_bytes());
		out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());

		let mut data_offset = constants::HEADER_SIZE + directory_size;
		for (name, data) in &self.entries {
			let mut field = vec![0u8; name_len];
			let bytes = name.as_bytes();
			let len = bytes.len().min(name_len);
			field[..len].copy_from_slice(&bytes[..len]);

			out.extend_from_slice(&field);
			out.extend_from_slice(&(data_offset as u32).to_le_bytes());
			out.extend_from_slice(&(data.len() as u32).to_le_bytes());
			data_offset += data.len();
		}

		for (_, data) in &self.entries {
			out.extend_from_slice(data);
		}

		out
	}
}
