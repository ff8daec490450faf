#![allow(missing_docs)]

// Runs the extraction pipeline on one datagram given as a hex argument, or on
// the RFC 9001 Appendix A.2 client Initial when no argument is given.
//
//   cargo run --example extract_client_hello -- c000000001088394...

use quic_initial_extract::{parse_long_header, try_extract_crypto_frame};

const RFC9001_CLIENT_INITIAL: &str = include_str!("rfc9001_client_initial.hex");

fn main() {
	let input = std::env::args()
		.nth(1)
		.unwrap_or_else(|| RFC9001_CLIENT_INITIAL.to_owned());
	let Some(datagram) = hex_decode(&input) else {
		eprintln!("input is not valid hex");
		std::process::exit(2);
	};

	if let Ok(header) = parse_long_header(&datagram) {
		println!("Initial packet:");
		println!("  version: {:#010x}", header.version);
		println!("  dcid:    {}", hex(header.dcid));
		println!("  scid:    {}", hex(header.scid));
		println!("  token:   {} bytes", header.token.len());
		println!("  payload: {} bytes", header.payload_len);
	}

	match try_extract_crypto_frame(&datagram) {
		Ok(data) => {
			println!("CRYPTO frame: {} bytes", data.len());
			if data.len() >= 6 {
				let msg_type = data[0];
				let length = u32::from_be_bytes([0, data[1], data[2], data[3]]);
				let legacy_version = u16::from_be_bytes([data[4], data[5]]);
				println!(
					"TLS handshake: type={msg_type:#04x} length={length} version={legacy_version:#06x}"
				);
			}
		}
		Err(e) => println!("skipped: {e}"),
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
	let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
	if digits.len() % 2 != 0 {
		return None;
	}
	digits
		.chunks(2)
		.map(|pair| u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok())
		.collect()
}
