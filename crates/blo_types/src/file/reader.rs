//! Bounds-checked little-endian reader over a byte slice.

use super::{BloFileError, FileType};

/// Sequential little-endian reader that reports truncation as
/// [`BloFileError::InsufficientData`].
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
	data: &'a [u8],
	pos: usize,
	file_type: FileType,
}

impl<'a> ByteReader<'a> {
	pub(crate) fn new(data: &'a [u8], file_type: FileType) -> Self {
		Self {
			data,
			pos: 0,
			file_type,
		}
	}

	/// Current read position.
	#[inline]
	pub(crate) fn position(&self) -> usize {
		self.pos
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8], BloFileError> {
		let end = self.pos + len;
		if end > self.data.len() {
			return Err(BloFileError::insufficient_data(self.file_type, end, self.data.len()));
		}
		let bytes = &self.data[self.pos..end];
		self.pos = end;
		Ok(bytes)
	}

	pub(crate) fn skip(&mut self, len: usize) -> Result<(), BloFileError> {
		self.take(len).map(|_| ())
	}

	pub(crate) fn read_u8(&mut self) -> Result<u8, BloFileError> {
		Ok(self.take(1)?[0])
	}

	pub(crate) fn read_u16(&mut self) -> Result<u16, BloFileError> {
		let b = self.take(2)?;
		Ok(u16::from_le_bytes([b[0], b[1]]))
	}

	pub(crate) fn read_i16(&mut self) -> Result<i16, BloFileError> {
		let b = self.take(2)?;
		Ok(i16::from_le_bytes([b[0], b[1]]))
	}

	pub(crate) fn read_u32(&mut self) -> Result<u32, BloFileError> {
		let b = self.take(4)?;
		Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}
}
