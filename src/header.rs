use crate::error::{Error, HeaderError, Truncated};
use crate::varint::read_varint_at;
use crate::version;

const MAX_CID_LEN: u8 = 20;

/// Long header packet types (RFC 9000 Section 17.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
	/// Initial packet, carrying the first CRYPTO frames of the handshake.
	Initial,
	/// 0-RTT packet.
	ZeroRtt,
	/// Handshake packet.
	Handshake,
	/// Retry packet.
	Retry,
}

/// Parsed QUIC Initial packet header with zero-copy references into the
/// original datagram.
///
/// Only the fields that are not under header protection are decoded. The
/// packet number still sits, masked, at the start of [`payload`](Self::payload).
#[derive(Debug, Clone, PartialEq)]
pub struct LongHeader<'a> {
	/// The first byte of the packet, still under header protection.
	pub first_byte: u8,
	/// Packet type decoded through the version's type table.
	pub packet_type: PacketType,
	/// QUIC version field.
	pub version: u32,
	/// Destination Connection ID bytes.
	pub dcid: &'a [u8],
	/// Source Connection ID bytes.
	pub scid: &'a [u8],
	/// Token bytes. An empty slice indicates no token was present.
	pub token: &'a [u8],
	/// Value of the Length field: packet number plus protected payload.
	pub payload_len: usize,
	/// Raw header bytes from the first byte up to (but not including) the
	/// packet number. The unprotected form of these bytes, followed by the
	/// packet number, is the AEAD associated data.
	pub header_bytes: &'a [u8],
	/// Protected packet number followed by the AEAD ciphertext, exactly
	/// `payload_len` bytes. Coalesced packets after it are not included.
	pub payload: &'a [u8],
}

impl LongHeader<'_> {
	/// Offset of the protected packet number field within the datagram.
	#[must_use]
	pub fn pn_offset(&self) -> usize {
		self.header_bytes.len()
	}
}

/// Parse the unprotected part of a QUIC version 1 Initial packet.
///
/// Checks run in wire order and stop at the first failure: QUIC shape, long
/// header form, version, packet type, connection IDs, token and length.
/// Bytes following the declared payload are ignored.
///
/// # Errors
///
/// - [`Error::NotQuic`] for an empty datagram or a clear fixed bit.
/// - [`Error::ShortHeader`] for short header packets.
/// - [`Error::UnsupportedVersion`] for versions missing from the version table.
/// - [`Error::WrongPacketType`] for long header packets other than Initial.
/// - [`Error::MalformedHeader`] for truncation or an oversized connection ID.
pub fn parse_long_header(packet: &[u8]) -> Result<LongHeader<'_>, Error> {
	let &first_byte = packet.first().ok_or(Error::NotQuic)?;

	if first_byte & 0x40 == 0 {
		return Err(Error::NotQuic);
	}
	if first_byte & 0x80 == 0 {
		return Err(Error::ShortHeader);
	}

	let version_bytes: [u8; 4] = packet
		.get(1..5)
		.and_then(|b| b.try_into().ok())
		.ok_or(HeaderError::Truncated {
			need: 5,
			have: packet.len(),
		})?;
	let version = u32::from_be_bytes(version_bytes);
	let params = version::lookup(version).ok_or(Error::UnsupportedVersion(version))?;

	let packet_type = params.packet_type(first_byte);
	if packet_type != PacketType::Initial {
		return Err(Error::WrongPacketType(packet_type));
	}

	let (dcid, cursor) = read_cid(packet, 5)?;
	let (scid, cursor) = read_cid(packet, cursor)?;

	let (token, cursor) = read_length_prefixed(packet, cursor)?;

	let (payload_len, varint_len) = read_varint_at(packet, cursor)?;
	let cursor = cursor + varint_len;
	let payload_len = usize::try_from(payload_len).map_err(|_| HeaderError::Truncated {
		need: usize::MAX,
		have: packet.len(),
	})?;
	let payload_end = checked_end(packet, cursor, payload_len)?;

	Ok(LongHeader {
		first_byte,
		packet_type,
		version,
		dcid,
		scid,
		token,
		payload_len,
		header_bytes: &packet[..cursor],
		payload: &packet[cursor..payload_end],
	})
}

/// Extract the Destination Connection ID from a QUIC Long Header packet
/// without performing a full parse.
///
/// Works for every long header packet type and version. Returns `None` when
/// the buffer is too short or the CID length field is zero or exceeds 20.
#[must_use]
pub fn peek_long_header_dcid(packet: &[u8]) -> Option<&[u8]> {
	let &first_byte = packet.first()?;
	if first_byte & 0x80 == 0 {
		return None;
	}
	let &dcid_len = packet.get(5)?;
	if dcid_len == 0 || dcid_len > MAX_CID_LEN {
		return None;
	}
	packet.get(6..6 + usize::from(dcid_len))
}

/// Extract the Destination Connection ID from a QUIC Short Header packet.
///
/// Short headers do not carry an explicit CID length, so the caller must
/// supply the expected `cid_len`. Returns `None` for long header packets or
/// when the buffer is too short.
#[must_use]
pub fn peek_short_header_dcid(packet: &[u8], cid_len: usize) -> Option<&[u8]> {
	let &first_byte = packet.first()?;
	if first_byte & 0x80 != 0 {
		return None;
	}
	packet.get(1..cid_len.checked_add(1)?)
}

fn read_cid(packet: &[u8], offset: usize) -> Result<(&[u8], usize), HeaderError> {
	let &cid_len = packet.get(offset).ok_or(HeaderError::Truncated {
		need: offset + 1,
		have: packet.len(),
	})?;
	if cid_len > MAX_CID_LEN {
		return Err(HeaderError::CidTooLong(cid_len));
	}
	let start = offset + 1;
	let end = checked_end(packet, start, usize::from(cid_len))?;
	Ok((&packet[start..end], end))
}

fn read_length_prefixed(packet: &[u8], offset: usize) -> Result<(&[u8], usize), HeaderError> {
	let (len, varint_len) = read_varint_at(packet, offset)?;
	let start = offset + varint_len;
	let len = usize::try_from(len).map_err(|_| Truncated {
		need: usize::MAX,
		have: packet.len(),
	})?;
	let end = checked_end(packet, start, len)?;
	Ok((&packet[start..end], end))
}

fn checked_end(packet: &[u8], start: usize, len: usize) -> Result<usize, HeaderError> {
	let end = start.checked_add(len).ok_or(HeaderError::Truncated {
		need: usize::MAX,
		have: packet.len(),
	})?;
	if end > packet.len() {
		return Err(HeaderError::Truncated {
			need: end,
			have: packet.len(),
		});
	}
	Ok(end)
}
