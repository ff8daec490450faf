use crate::error::Truncated;

/// Decode a QUIC variable-length integer from the start of `buf`.
///
/// Returns the decoded value and the number of bytes consumed (1, 2, 4, or 8).
/// The encoding is defined in RFC 9000 Section 16. To decode at an offset,
/// pass `buf.get(offset..)`.
///
/// # Errors
///
/// Returns [`Truncated`] when `buf` is empty or too short for the indicated
/// encoding length.
#[must_use = "returns the decoded value without modifying the buffer"]
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize), Truncated> {
	let &first = buf.first().ok_or(Truncated { need: 1, have: 0 })?;
	let len = 1usize << (first >> 6);

	let bytes = buf.get(..len).ok_or(Truncated {
		need: len,
		have: buf.len(),
	})?;

	let val = bytes[1..]
		.iter()
		.fold(u64::from(first & 0x3f), |acc, &b| (acc << 8) | u64::from(b));
	Ok((val, len))
}

/// Decode a varint at `offset` within `buf`.
///
/// Offsets past the end are reported as truncation relative to the whole
/// buffer rather than panicking.
pub(crate) fn read_varint_at(buf: &[u8], offset: usize) -> Result<(u64, usize), Truncated> {
	let rest = buf.get(offset..).ok_or(Truncated {
		need: offset.saturating_add(1),
		have: buf.len(),
	})?;
	read_varint(rest).map_err(|t| Truncated {
		need: offset.saturating_add(t.need),
		have: buf.len(),
	})
}
