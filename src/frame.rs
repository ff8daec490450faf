use crate::error::{Error, FrameError};
use crate::varint::read_varint_at;

const PADDING: u64 = 0x00;
const PING: u64 = 0x01;
const ACK: u64 = 0x02;
const ACK_ECN: u64 = 0x03;
const CRYPTO: u64 = 0x06;
const CONNECTION_CLOSE: u64 = 0x1c;
const CONNECTION_CLOSE_APP: u64 = 0x1d;

/// A single CRYPTO frame borrowed from a decrypted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoFrame<'a> {
	/// Byte offset within the crypto stream where this fragment begins.
	pub offset: u64,
	/// The raw data carried by this frame.
	pub data: &'a [u8],
}

/// A frame that may appear in an Initial packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<'a> {
	/// A single PADDING byte.
	Padding,
	/// PING.
	Ping,
	/// CRYPTO, carrying handshake bytes.
	Crypto(CryptoFrame<'a>),
	/// A recognized frame whose content is skipped (ACK, ACK_ECN,
	/// CONNECTION_CLOSE).
	Other {
		/// The frame type.
		frame_type: u64,
		/// Encoded length of the whole frame, type included.
		len: usize,
	},
}

/// Iterate over the frames of a decrypted Initial payload.
///
/// Every recognized frame advances the cursor by its exact encoded length.
/// Frame types that cannot appear in an Initial packet and truncated frames
/// produce one error, after which the iterator is exhausted.
#[must_use]
pub fn parse_frames(payload: &[u8]) -> Frames<'_> {
	Frames {
		buf: payload,
		cursor: 0,
		failed: false,
	}
}

/// Return the first CRYPTO frame of a decrypted Initial payload.
///
/// Frames after it are not inspected and its offset is not checked: only
/// the first fragment of the crypto stream is of interest.
///
/// # Errors
///
/// Returns [`Error::MalformedFrameStream`] if a frame before the first
/// CRYPTO frame is unknown or truncated, and [`Error::NoCryptoFrame`] if the
/// payload ends without one.
pub fn first_crypto_frame(payload: &[u8]) -> Result<CryptoFrame<'_>, Error> {
	for frame in parse_frames(payload) {
		if let Frame::Crypto(crypto) = frame? {
			return Ok(crypto);
		}
	}
	Err(Error::NoCryptoFrame)
}

/// Iterator returned by [`parse_frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
	buf: &'a [u8],
	cursor: usize,
	failed: bool,
}

impl<'a> Iterator for Frames<'a> {
	type Item = Result<Frame<'a>, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || self.cursor >= self.buf.len() {
			return None;
		}
		let start = self.cursor;
		match self.parse_frame(start) {
			Ok((frame, end)) => {
				self.cursor = end;
				Some(Ok(frame))
			}
			Err(e) => {
				self.failed = true;
				Some(Err(e.into()))
			}
		}
	}
}

impl std::iter::FusedIterator for Frames<'_> {}

impl<'a> Frames<'a> {
	fn parse_frame(&self, start: usize) -> Result<(Frame<'a>, usize), FrameError> {
		let mut cursor = start;
		let frame_type = self.varint(&mut cursor, start)?;

		let frame = match frame_type {
			PADDING => Frame::Padding,
			PING => Frame::Ping,
			CRYPTO => {
				let offset = self.varint(&mut cursor, start)?;
				let data = self.length_prefixed(&mut cursor, start)?;
				Frame::Crypto(CryptoFrame { offset, data })
			}
			ACK | ACK_ECN => {
				self.skip_ack(&mut cursor, start, frame_type == ACK_ECN)?;
				Frame::Other {
					frame_type,
					len: cursor - start,
				}
			}
			CONNECTION_CLOSE | CONNECTION_CLOSE_APP => {
				// Error Code, [Frame Type], Reason Phrase Length, Reason Phrase
				self.varint(&mut cursor, start)?;
				if frame_type == CONNECTION_CLOSE {
					self.varint(&mut cursor, start)?;
				}
				self.length_prefixed(&mut cursor, start)?;
				Frame::Other {
					frame_type,
					len: cursor - start,
				}
			}
			_ => {
				return Err(FrameError::UnexpectedType {
					frame_type,
					offset: start,
				});
			}
		};
		Ok((frame, cursor))
	}

	/// Skip an ACK frame body (RFC 9000 Section 19.3):
	///   Largest Acknowledged, ACK Delay, ACK Range Count, First ACK Range,
	///   { Gap, ACK Range Length } * count, [ECT0, ECT1, ECN-CE].
	fn skip_ack(&self, cursor: &mut usize, start: usize, has_ecn: bool) -> Result<(), FrameError> {
		self.varint(cursor, start)?;
		self.varint(cursor, start)?;
		let range_count = self.varint(cursor, start)?;
		self.varint(cursor, start)?;

		// Each range takes at least two bytes, so a count larger than the
		// remaining payload is truncated no matter what follows.
		let remaining = (self.buf.len() - *cursor) as u64;
		if range_count > remaining / 2 {
			return Err(FrameError::Truncated { offset: start });
		}
		for _ in 0..range_count {
			self.varint(cursor, start)?;
			self.varint(cursor, start)?;
		}

		if has_ecn {
			for _ in 0..3 {
				self.varint(cursor, start)?;
			}
		}
		Ok(())
	}

	fn varint(&self, cursor: &mut usize, start: usize) -> Result<u64, FrameError> {
		let (val, len) =
			read_varint_at(self.buf, *cursor).map_err(|_| FrameError::Truncated { offset: start })?;
		*cursor += len;
		Ok(val)
	}

	fn length_prefixed(&self, cursor: &mut usize, start: usize) -> Result<&'a [u8], FrameError> {
		let trunc = FrameError::Truncated { offset: start };
		let len = usize::try_from(self.varint(cursor, start)?).map_err(|_| trunc)?;
		let end = cursor.checked_add(len).ok_or(trunc)?;
		let data = self.buf.get(*cursor..end).ok_or(trunc)?;
		*cursor = end;
		Ok(data)
	}
}
