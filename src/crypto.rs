//! Initial key derivation (RFC 9001 Section 5.2) and payload decryption.

#[cfg(feature = "aws-lc-rs")]
use aws_lc_rs as provider;
#[cfg(feature = "ring")]
use ring as provider;

use provider::{aead, hkdf};

use crate::error::{Error, HeaderError};
use crate::header::LongHeader;
use crate::protection::{Unprotected, remove_header_protection};
use crate::version::{self, Aead};

const SECRET_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Client Initial packet protection keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialSecrets {
	/// AEAD packet protection key.
	pub key: [u8; 16],
	/// AEAD IV, XOR-ed with the packet number to form the nonce.
	pub iv: [u8; NONCE_LEN],
	/// Header protection key.
	pub hp: [u8; 16],
}

impl InitialSecrets {
	/// Derive the client Initial keys for `dcid` under `version`.
	///
	/// The derivation is deterministic and only depends on public values, so
	/// callers may memoize the result per `(dcid, version)`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedVersion`] when `version` has no entry in
	/// the version table.
	pub fn derive(dcid: &[u8], version: u32) -> Result<Self, Error> {
		let params = version::lookup(version).ok_or(Error::UnsupportedVersion(version))?;

		let initial = hkdf::Salt::new(hkdf::HKDF_SHA256, params.salt).extract(dcid);
		let mut client = [0u8; SECRET_LEN];
		expand_label(&initial, params.client_label, &mut client)?;
		let client = hkdf::Prk::new_less_safe(hkdf::HKDF_SHA256, &client);

		let mut secrets = InitialSecrets {
			key: [0; 16],
			iv: [0; NONCE_LEN],
			hp: [0; 16],
		};
		expand_label(&client, params.key_label, &mut secrets.key)?;
		expand_label(&client, params.iv_label, &mut secrets.iv)?;
		expand_label(&client, params.hp_label, &mut secrets.hp)?;
		Ok(secrets)
	}

	/// Per-packet nonce: the IV XOR-ed with the packet number, right-aligned.
	#[must_use]
	pub fn nonce(&self, packet_number: u64) -> [u8; NONCE_LEN] {
		let mut nonce = self.iv;
		for (n, p) in nonce[NONCE_LEN - 8..]
			.iter_mut()
			.zip(packet_number.to_be_bytes())
		{
			*n ^= p;
		}
		nonce
	}
}

struct HkdfLen(usize);

impl hkdf::KeyType for HkdfLen {
	fn len(&self) -> usize {
		self.0
	}
}

/// TLS 1.3 `HkdfLabel` with an empty context (RFC 8446 Section 7.1).
fn build_hkdf_label(label: &[u8], len: usize) -> Result<Vec<u8>, Error> {
	const PREFIX: &[u8] = b"tls13 ";

	let len = u16::try_from(len).map_err(|_| Error::Crypto("HKDF output length overflow"))?;
	let label_len = u8::try_from(PREFIX.len() + label.len())
		.map_err(|_| Error::Crypto("HKDF label length overflow"))?;

	let mut out = Vec::with_capacity(4 + usize::from(label_len));
	out.extend_from_slice(&len.to_be_bytes());
	out.push(label_len);
	out.extend_from_slice(PREFIX);
	out.extend_from_slice(label);
	out.push(0);
	Ok(out)
}

fn expand_label(prk: &hkdf::Prk, label: &[u8], out: &mut [u8]) -> Result<(), Error> {
	let info = build_hkdf_label(label, out.len())?;
	prk.expand(&[info.as_slice()], HkdfLen(out.len()))
		.and_then(|okm| okm.fill(out))
		.map_err(|_| Error::Crypto("HKDF expand failed"))
}

/// Authenticate and decrypt a packet payload.
///
/// `aad` is the complete unprotected header including the packet number,
/// `ciphertext` everything after it up to the end of the declared length.
///
/// # Errors
///
/// Returns [`Error::AuthenticationFailed`] when the tag does not verify,
/// including ciphertexts shorter than the tag.
pub fn open_payload(
	secrets: &InitialSecrets,
	algorithm: Aead,
	packet_number: u64,
	aad: &[u8],
	ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
	let algorithm = match algorithm {
		Aead::Aes128Gcm => &aead::AES_128_GCM,
	};
	let key = aead::UnboundKey::new(algorithm, &secrets.key)
		.map_err(|_| Error::Crypto("invalid AEAD key"))?;
	let key = aead::LessSafeKey::new(key);
	let nonce = aead::Nonce::assume_unique_for_key(secrets.nonce(packet_number));

	let mut buf = ciphertext.to_vec();
	let plaintext_len = key
		.open_in_place(nonce, aead::Aad::from(aad), &mut buf)
		.map_err(|_| Error::AuthenticationFailed)?
		.len();
	buf.truncate(plaintext_len);
	Ok(buf)
}

/// Decrypt a QUIC Initial packet payload.
///
/// Derives the client keys from the Destination Connection ID, removes
/// header protection (AES-ECB), recovers the packet number and opens the
/// payload (AES-128-GCM). The returned bytes are the decrypted frames.
///
/// # Errors
///
/// Returns [`Error::UnsupportedVersion`] if the version is not in the table,
/// [`Error::MalformedHeader`] if the payload cannot be sampled or the
/// reserved bits are set, and [`Error::AuthenticationFailed`] if the AEAD
/// tag does not verify.
pub fn decrypt_initial(header: &LongHeader<'_>) -> Result<Vec<u8>, Error> {
	let params = version::lookup(header.version).ok_or(Error::UnsupportedVersion(header.version))?;
	let secrets = InitialSecrets::derive(header.dcid, header.version)?;

	let Unprotected {
		first_byte,
		pn_len,
		packet_number,
		header: aad,
		..
	} = remove_header_protection(header, &secrets.hp)?;

	let ciphertext = &header.payload[pn_len..];

	#[cfg(feature = "tracing")]
	tracing::debug!(
		version = header.version,
		dcid_len = header.dcid.len(),
		packet_number,
		payload_len = ciphertext.len(),
		"decrypting QUIC Initial packet"
	);

	let plaintext = open_payload(&secrets, params.aead, packet_number, &aad, ciphertext)?;

	// Reserved bits are only meaningful once the header is authenticated.
	let reserved = first_byte & 0x0c;
	if reserved != 0 {
		return Err(HeaderError::ReservedBits(reserved).into());
	}

	Ok(plaintext)
}
