//! Stateless extraction of TLS handshake bytes from QUIC Initial packets.
//!
//! A QUIC client's first packet is encrypted with keys derived from its
//! Destination Connection ID and a public salt, so anyone on the path can
//! read it. This crate does exactly that for a single datagram, without
//! connection state, and returns the first CRYPTO frame (usually the start
//! of the TLS ClientHello).
//!
//! **Parsing** (always available, no dependencies beyond `thiserror`):
//! varints, long headers, connection ID peeking and Initial frame parsing.
//!
//! **Decryption and extraction** (requires `ring` or `aws-lc-rs` feature):
//! Initial key derivation, header protection removal, AEAD decryption and
//! the [`extract_crypto_frame`] pipeline.
//!
//! Version-specific constants live in [`version::SUPPORTED_VERSIONS`];
//! QUIC version 1 is the only entry.

#[cfg(all(feature = "ring", feature = "aws-lc-rs"))]
compile_error!(
	"features `ring` and `aws-lc-rs` are mutually exclusive; enable only one crypto backend"
);

mod error;
mod frame;
mod header;
mod varint;
pub mod version;

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
mod crypto;

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
mod extract;

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
mod protection;

pub use error::{Error, FrameError, HeaderError, Truncated};
pub use frame::{CryptoFrame, Frame, Frames, first_crypto_frame, parse_frames};
pub use header::{
	LongHeader, PacketType, parse_long_header, peek_long_header_dcid, peek_short_header_dcid,
};
pub use varint::read_varint;

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
pub use crypto::{InitialSecrets, decrypt_initial, open_payload};

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
pub use extract::{ExtractionResult, extract_crypto_frame, try_extract_crypto_frame};

#[cfg(any(feature = "ring", feature = "aws-lc-rs"))]
pub use protection::{Unprotected, decode_packet_number, remove_header_protection};
