//! Per-version constants for Initial packet protection.
//!
//! The header parser, key derivation and AEAD selection all consult
//! [`SUPPORTED_VERSIONS`]; adding a QUIC version means adding one entry here.

use crate::header::PacketType;

/// QUIC version 1 (RFC 9000).
pub const QUIC_V1: u32 = 0x0000_0001;

const INITIAL_SALT_V1: [u8; 20] = [
	0x38, 0x76, 0x2c, 0xf7, 0xf5, 0x59, 0x34, 0xb3, 0x4d, 0x17, 0x9a, 0xe6, 0xa4, 0xc8, 0x0c, 0xad,
	0xcc, 0xbb, 0x7f, 0x0a,
];

/// AEAD used to protect Initial packets of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aead {
	/// AES-128-GCM with AES-128 header protection.
	Aes128Gcm,
}

/// Version-specific parameters for deriving and applying Initial keys.
#[derive(Debug)]
pub struct VersionParams {
	/// Wire value of the version field.
	pub version: u32,
	/// HKDF-Extract salt for the initial secret.
	pub salt: &'static [u8],
	/// HKDF-Expand-Label label for the client initial secret.
	pub client_label: &'static [u8],
	/// Label for the packet protection key.
	pub key_label: &'static [u8],
	/// Label for the packet protection IV.
	pub iv_label: &'static [u8],
	/// Label for the header protection key.
	pub hp_label: &'static [u8],
	/// Long header packet type, indexed by the two type bits.
	pub packet_types: [PacketType; 4],
	/// Initial packet AEAD.
	pub aead: Aead,
}

impl VersionParams {
	/// Decode the long header type bits (`0x30` of the first byte).
	#[must_use]
	pub fn packet_type(&self, first_byte: u8) -> PacketType {
		self.packet_types[usize::from((first_byte & 0x30) >> 4)]
	}
}

/// Versions this crate can decrypt.
pub static SUPPORTED_VERSIONS: &[VersionParams] = &[VersionParams {
	version: QUIC_V1,
	salt: &INITIAL_SALT_V1,
	client_label: b"client in",
	key_label: b"quic key",
	iv_label: b"quic iv",
	hp_label: b"quic hp",
	packet_types: [
		PacketType::Initial,
		PacketType::ZeroRtt,
		PacketType::Handshake,
		PacketType::Retry,
	],
	aead: Aead::Aes128Gcm,
}];

/// Look up the parameters for `version`.
#[must_use]
pub fn lookup(version: u32) -> Option<&'static VersionParams> {
	SUPPORTED_VERSIONS.iter().find(|p| p.version == version)
}
