//! CFS pixel-plane decompression and mirroring.
//!
//! ## Uncompressed planes
//!
//! Bit 0 of the record's compression flags marks raw planes: `width * height`
//! palette indices stored row-major. A plane cut short by the end of the
//! record keeps zeros (transparent) for the missing tail.
//!
//! ## Scanline RLE
//!
//! Compressed planes start with one length prefix per scanline, all of them
//! before any row data:
//!
//! | Prefix byte | Meaning                                       |
//! |-------------|-----------------------------------------------|
//! | `0x00-0xFE` | scanline length in bytes                      |
//! | `0xFF`      | escape, the length follows as a `u16` LE      |
//!
//! Each scanline is then a sequence of control bytes. The high nibble skips
//! that many transparent pixels, the low nibble is the number of literal
//! palette indices that follow the control byte. Runs longer than 15 pixels
//! are chained across control bytes. Decoding a scanline stops when the row
//! is full or its byte budget is spent, and the cursor always advances by the
//! declared length so trailing padding is ignored.
//!
//! ## Mirroring
//!
//! Negative descriptor dimensions mirror the decoded plane. Both mirrors work
//! in place on the freshly decoded buffer.

use log::warn;

use super::frame::FrameDescriptor;

/// Escape value of a scanline length prefix.
pub const LONG_LINE_ESCAPE: u8 = 0xFF;

/// Copies a raw plane starting at `start`.
///
/// Copies `min(pixels.len(), data.len() - start)` bytes; the rest of
/// `pixels` is left untouched.
pub fn copy_uncompressed(data: &[u8], start: usize, pixels: &mut [u8]) {
	let Some(source) = data.get(start..) else {
		return;
	};
	let len = pixels.len().min(source.len());
	pixels[..len].copy_from_slice(&source[..len]);
}

/// Reads the scanline length table.
///
/// Returns the lengths and the position just past the table. Prefixes missing
/// because the data ended, or an escape without its two length bytes, yield a
/// length of zero.
fn read_scanline_lengths(data: &[u8], start: usize, height: usize) -> (Vec<usize>, usize) {
	let mut lengths = vec![0usize; height];
	let mut pos = start;

	for length in lengths.iter_mut() {
		let Some(&prefix) = data.get(pos) else {
			break;
		};
		pos += 1;

		*length = if prefix == LONG_LINE_ESCAPE {
			match pos.checked_add(2).and_then(|end| data.get(pos..end)) {
				Some(bytes) => {
					pos += 2;
					usize::from(u16::from_le_bytes([bytes[0], bytes[1]]))
				}
				None => 0,
			}
		} else {
			usize::from(prefix)
		};
	}

	(lengths, pos)
}

/// Decodes one scanline's control stream into `row`.
///
/// Pixels the stream never reaches keep their current value.
pub fn decode_scanline(line: &[u8], row: &mut [u8]) {
	let width = row.len();
	let mut x = 0usize;
	let mut pos = 0usize;

	while pos < line.len() && x < width {
		let control = line[pos];
		pos += 1;

		x += usize::from(control >> 4);
		let literal = usize::from(control & 0x0F);

		let mut copied = 0;
		while copied < literal && x < width && pos < line.len() {
			row[x] = line[pos];
			x += 1;
			pos += 1;
			copied += 1;
		}
	}
}

/// Decodes an RLE-compressed plane of `width * height` pixels.
///
/// Scanlines that run past the end of `data` are decoded partially and a
/// warning is logged; they never fail the frame.
pub fn decode_rle(data: &[u8], start: usize, width: usize, height: usize, pixels: &mut [u8]) {
	debug_assert_eq!(pixels.len(), width * height);
	if width == 0 {
		return;
	}

	let (lengths, mut pos) = read_scanline_lengths(data, start, height);

	for (y, (length, row)) in lengths.into_iter().zip(pixels.chunks_exact_mut(width)).enumerate() {
		if length == 0 {
			continue;
		}

		let begin = pos.min(data.len());
		let end = pos.saturating_add(length).min(data.len());
		if end - begin < length {
			warn!("CFS scanline {y}: {length} bytes declared, {} available", end - begin);
		}

		decode_scanline(&data[begin..end], row);
		pos = pos.saturating_add(length);
	}
}

/// Mirrors every row of a plane left-right.
pub fn mirror_horizontal(pixels: &mut [u8], width: usize) {
	if width == 0 {
		return;
	}
	for row in pixels.chunks_exact_mut(width) {
		row.reverse();
	}
}

/// Mirrors a plane top-bottom, one column at a time.
pub fn mirror_vertical(pixels: &mut [u8], width: usize, height: usize) {
	if width == 0 || height == 0 {
		return;
	}

	let mut column = vec![0u8; height];
	for x in 0..width {
		for (y, slot) in column.iter_mut().enumerate() {
			*slot = pixels[y * width + x];
		}
		for (y, &value) in column.iter().rev().enumerate() {
			pixels[y * width + x] = value;
		}
	}
}

/// Decodes and normalizes the plane of one descriptor.
///
/// `start` is the absolute position of the frame's data in `data`.
pub fn decode_plane(data: &[u8], start: usize, descriptor: &FrameDescriptor, uncompressed: bool) -> Vec<u8> {
	let width = usize::from(descriptor.abs_width());
	let height = usize::from(descriptor.abs_height());
	let mut pixels = vec![0u8; width * height];

	if uncompressed {
		copy_uncompressed(data, start, &mut pixels);
	} else {
		decode_rle(data, start, width, height, &mut pixels);
	}

	if descriptor.is_mirrored_horizontally() {
		mirror_horizontal(&mut pixels, width);
	}
	if descriptor.is_mirrored_vertically() {
		mirror_vertical(&mut pixels, width, height);
	}

	pixels
}
