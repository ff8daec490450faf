use crate::header::PacketType;

/// Why a datagram did not yield a CRYPTO frame.
///
/// Every variant is a "skip this packet" outcome; none of them indicate a
/// fault in the caller. The variant itself is the classification and is
/// meant to be logged or counted by the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The datagram is empty or its first byte lacks the QUIC fixed bit.
	#[error("not a QUIC packet")]
	NotQuic,

	/// The packet uses the short header form.
	#[error("short header packet")]
	ShortHeader,

	/// The long header carries a version with no entry in the version table.
	#[error("unsupported QUIC version: {0:#010x}")]
	UnsupportedVersion(u32),

	/// The long header packet is not an Initial packet.
	#[error("not an Initial packet: {0:?}")]
	WrongPacketType(PacketType),

	/// The header is truncated, carries an invalid length, or cannot be
	/// sampled for header protection removal.
	#[error("malformed header: {0}")]
	MalformedHeader(#[from] HeaderError),

	/// The AEAD tag did not verify.
	#[error("packet authentication failed")]
	AuthenticationFailed,

	/// The decrypted payload is not a valid sequence of Initial frames.
	#[error("malformed frame stream: {0}")]
	MalformedFrameStream(#[from] FrameError),

	/// The frame stream is valid but contains no CRYPTO frame.
	#[error("no CRYPTO frame in payload")]
	NoCryptoFrame,

	/// The crypto backend rejected an operation on fixed-size inputs.
	#[error("crypto backend failure: {0}")]
	Crypto(&'static str),
}

/// Detail for [`Error::MalformedHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
	/// The buffer ended before a header field was complete.
	#[error("buffer too short: need at least {need} bytes, have {have}")]
	Truncated {
		/// Minimum number of bytes required.
		need: usize,
		/// Actual number of bytes available.
		have: usize,
	},

	/// A connection ID length field exceeds the protocol maximum of 20 bytes.
	#[error("connection ID length {0} exceeds maximum of 20")]
	CidTooLong(u8),

	/// The payload is too short to take the header protection sample.
	#[error("header protection sample unavailable: need {need} payload bytes, have {have}")]
	SampleUnavailable {
		/// Payload bytes required to cover the packet number and the sample.
		need: usize,
		/// Payload bytes declared by the length field.
		have: usize,
	},

	/// The reserved bits of the unprotected first byte are not zero.
	#[error("reserved header bits set: {0:#04x}")]
	ReservedBits(u8),
}

/// Detail for [`Error::MalformedFrameStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
	/// A frame extends beyond the end of the payload.
	#[error("truncated frame at offset {offset}")]
	Truncated {
		/// Byte offset within the payload where the truncated frame starts.
		offset: usize,
	},

	/// A frame type that cannot appear in an Initial packet.
	#[error("unexpected frame type {frame_type:#x} at offset {offset}")]
	UnexpectedType {
		/// The frame type varint value.
		frame_type: u64,
		/// Byte offset of the frame within the payload.
		offset: usize,
	},
}

/// A variable-length integer or length-prefixed field ran past the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("truncated: need {need} bytes, have {have}")]
pub struct Truncated {
	/// Bytes the encoding requires.
	pub need: usize,
	/// Bytes available.
	pub have: usize,
}

impl From<Truncated> for HeaderError {
	fn from(t: Truncated) -> Self {
		HeaderError::Truncated {
			need: t.need,
			have: t.have,
		}
	}
}

impl From<Truncated> for Error {
	fn from(t: Truncated) -> Self {
		Error::MalformedHeader(t.into())
	}
}
