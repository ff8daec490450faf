use crate::crypto::decrypt_initial;
use crate::error::Error;
use crate::frame::first_crypto_frame;
use crate::header::parse_long_header;

/// Result of inspecting one datagram: the first CRYPTO frame's data, or the
/// reason there is none.
pub type ExtractionResult = Result<Vec<u8>, Error>;

/// Extract the data of the first CRYPTO frame from a QUIC v1 client Initial
/// packet.
///
/// Runs the whole pipeline on the first packet of `datagram`: header
/// parsing, key derivation, header protection removal, AEAD decryption and
/// frame parsing. Coalesced packets after the first are ignored. `datagram`
/// is never modified.
///
/// # Errors
///
/// Every [`Error`] variant classifies why the datagram was skipped; none of
/// them indicate a failure of the caller.
pub fn try_extract_crypto_frame(datagram: &[u8]) -> ExtractionResult {
	let header = parse_long_header(datagram)?;
	let plaintext = decrypt_initial(&header)?;
	let crypto = first_crypto_frame(&plaintext)?;

	#[cfg(feature = "tracing")]
	tracing::trace!(
		offset = crypto.offset,
		len = crypto.data.len(),
		"extracted CRYPTO frame"
	);

	Ok(crypto.data.to_vec())
}

/// Like [`try_extract_crypto_frame`], but only reports whether data was
/// found.
///
/// With the `tracing` feature the failure classification is emitted as a
/// debug event.
#[must_use]
pub fn extract_crypto_frame(datagram: &[u8]) -> Option<Vec<u8>> {
	match try_extract_crypto_frame(datagram) {
		Ok(data) => Some(data),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			tracing::debug!(error = %_e, len = datagram.len(), "skipping datagram");
			None
		}
	}
}
