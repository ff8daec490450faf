//! Header protection removal and packet number recovery (RFC 9001 Section 5.4).

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};

use crate::error::{Error, HeaderError};
use crate::header::LongHeader;

const SAMPLE_OFFSET: usize = 4;
const SAMPLE_LEN: usize = 16;
/// Packet numbers are bounded like varints, below 2^62.
const PN_LIMIT: u64 = 1 << 62;

/// A long header with header protection removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unprotected {
	/// First byte with the packet number length and reserved bits unmasked.
	pub first_byte: u8,
	/// Packet number length in bytes (1 to 4).
	pub pn_len: usize,
	/// The packet number as it appears on the wire, unmasked.
	pub truncated_pn: u64,
	/// The full packet number recovered from `truncated_pn`.
	pub packet_number: u64,
	/// Complete unprotected header, packet number included. This is the AEAD
	/// associated data.
	pub header: Vec<u8>,
}

/// Remove header protection from a parsed long header.
///
/// The 16-byte sample is taken 4 bytes past the start of the packet number
/// and must lie within the declared payload. Packet number recovery assumes
/// no packet of this space has been seen before.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] when the payload is too short to
/// sample.
pub fn remove_header_protection(
	header: &LongHeader<'_>,
	hp_key: &[u8; 16],
) -> Result<Unprotected, Error> {
	let payload = header.payload;
	let sample = payload
		.get(SAMPLE_OFFSET..SAMPLE_OFFSET + SAMPLE_LEN)
		.ok_or(HeaderError::SampleUnavailable {
			need: SAMPLE_OFFSET + SAMPLE_LEN,
			have: payload.len(),
		})?;

	let mask = header_protection_mask(hp_key, sample);

	// Long header: the low four bits carry reserved bits and the pn length.
	let first_byte = header.first_byte ^ (mask[0] & 0x0f);
	let pn_len = usize::from(first_byte & 0x03) + 1;

	let mut aad = Vec::with_capacity(header.header_bytes.len() + pn_len);
	aad.push(first_byte);
	aad.extend_from_slice(&header.header_bytes[1..]);

	let mut truncated_pn = 0u64;
	for (&b, &m) in payload[..pn_len].iter().zip(&mask[1..]) {
		let b = b ^ m;
		aad.push(b);
		truncated_pn = (truncated_pn << 8) | u64::from(b);
	}

	Ok(Unprotected {
		first_byte,
		pn_len,
		truncated_pn,
		packet_number: decode_packet_number(0, truncated_pn, pn_len),
		header: aad,
	})
}

/// First five bytes of AES-128-ECB over the sample.
fn header_protection_mask(hp_key: &[u8; 16], sample: &[u8]) -> [u8; 5] {
	let cipher = Aes128::new(GenericArray::from_slice(hp_key));
	let mut block = GenericArray::clone_from_slice(sample);
	cipher.encrypt_block(&mut block);

	let mut mask = [0u8; 5];
	mask.copy_from_slice(&block[..5]);
	mask
}

/// Recover a full packet number from its truncated encoding
/// (RFC 9000 Appendix A.3).
///
/// Picks the candidate closest to `largest_pn + 1` among the values whose
/// low `pn_len` bytes equal `truncated_pn`. `pn_len` is 1 to 4 and
/// `largest_pn` a valid packet number (below 2^62).
#[must_use]
pub fn decode_packet_number(largest_pn: u64, truncated_pn: u64, pn_len: usize) -> u64 {
	let expected = largest_pn + 1;
	let win = 1u64 << (pn_len * 8);
	let hwin = win / 2;
	let mask = win - 1;

	let candidate = (expected & !mask) | truncated_pn;
	if candidate + hwin <= expected && candidate < PN_LIMIT - win {
		candidate + win
	} else if candidate > expected + hwin && candidate >= win {
		candidate - win
	} else {
		candidate
	}
}
