#![allow(missing_docs)]

// Parses a QUIC Initial header and peeks at connection IDs without any crypto
// backend. Works with `--no-default-features`.

use quic_initial_extract::{
	Error, parse_long_header, peek_long_header_dcid, peek_short_header_dcid,
};

fn main() {
	let initial = build_sample_initial();

	match parse_long_header(&initial) {
		Ok(header) => {
			println!("QUIC Initial header");
			println!("  type:         {:?}", header.packet_type);
			println!("  version:      {:#010x}", header.version);
			println!("  dcid:         {}", hex(header.dcid));
			println!("  scid:         {}", hex(header.scid));
			println!("  token length: {}", header.token.len());
			println!("  pn offset:    {}", header.pn_offset());
			println!("  payload size: {} bytes", header.payload_len);
		}
		Err(e) => eprintln!("parse error: {e}"),
	}

	if let Some(dcid) = peek_long_header_dcid(&initial) {
		println!("  peeked dcid:  {}", hex(dcid));
	}

	// A short header packet routed by a known 4-byte connection ID.
	let short = [0x41, 0xca, 0xfe, 0xf0, 0x0d, 0x99, 0x98, 0x97];
	match parse_long_header(&short) {
		Err(Error::ShortHeader) => {
			if let Some(dcid) = peek_short_header_dcid(&short, 4) {
				println!("short header, dcid {}", hex(dcid));
			}
		}
		other => println!("unexpected: {other:?}"),
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn build_sample_initial() -> Vec<u8> {
	let mut pkt = Vec::new();

	// Long header | fixed bit | Initial type; low bits are protected.
	pkt.push(0xc0);
	pkt.extend_from_slice(&0x0000_0001u32.to_be_bytes());

	let dcid = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
	pkt.push(dcid.len() as u8);
	pkt.extend_from_slice(&dcid);

	// SCID length 0, token length 0
	pkt.push(0x00);
	pkt.push(0x00);

	let payload_len: u8 = 24;
	pkt.push(payload_len);
	pkt.extend_from_slice(&[0xaa; 24]);

	pkt
}
