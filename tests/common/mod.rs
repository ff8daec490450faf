//! Shared fixtures: RFC 9001 Appendix A vectors and a client Initial sealer.

#![allow(dead_code)]

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
#[cfg(feature = "aws-lc-rs")]
use aws_lc_rs as provider;
#[cfg(feature = "ring")]
use ring as provider;

use provider::aead;
use quic_initial_extract::InitialSecrets;

/// RFC 9001 Appendix A.1 Destination Connection ID.
pub const RFC9001_DCID: [u8; 8] = hex_literal::hex!("8394c8f03e515708");

/// RFC 9001 Appendix A.2 protected client Initial packet (1200 bytes).
pub const RFC9001_CLIENT_INITIAL: [u8; 1200] = hex_literal::hex!(
	"
		c000000001088394c8f03e5157080000449e7b9aec34d1b1c98dd7689fb8ec11
		d242b123dc9bd8bab936b47d92ec356c0bab7df5976d27cd449f63300099f399
		1c260ec4c60d17b31f8429157bb35a1282a643a8d2262cad67500cadb8e7378c
		8eb7539ec4d4905fed1bee1fc8aafba17c750e2c7ace01e6005f80fcb7df6212
		30c83711b39343fa028cea7f7fb5ff89eac2308249a02252155e2347b63d58c5
		457afd84d05dfffdb20392844ae812154682e9cf012f9021a6f0be17ddd0c208
		4dce25ff9b06cde535d0f920a2db1bf362c23e596d11a4f5a6cf3948838a3aec
		4e15daf8500a6ef69ec4e3feb6b1d98e610ac8b7ec3faf6ad760b7bad1db4ba3
		485e8a94dc250ae3fdb41ed15fb6a8e5eba0fc3dd60bc8e30c5c4287e53805db
		059ae0648db2f64264ed5e39be2e20d82df566da8dd5998ccabdae053060ae6c
		7b4378e846d29f37ed7b4ea9ec5d82e7961b7f25a9323851f681d582363aa5f8
		9937f5a67258bf63ad6f1a0b1d96dbd4faddfcefc5266ba6611722395c906556
		be52afe3f565636ad1b17d508b73d8743eeb524be22b3dcbc2c7468d54119c74
		68449a13d8e3b95811a198f3491de3e7fe942b330407abf82a4ed7c1b311663a
		c69890f4157015853d91e923037c227a33cdd5ec281ca3f79c44546b9d90ca00
		f064c99e3dd97911d39fe9c5d0b23a229a234cb36186c4819e8b9c5927726632
		291d6a418211cc2962e20fe47feb3edf330f2c603a9d48c0fcb5699dbfe58964
		25c5bac4aee82e57a85aaf4e2513e4f05796b07ba2ee47d80506f8d2c25e50fd
		14de71e6c418559302f939b0e1abd576f279c4b2e0feb85c1f28ff18f58891ff
		ef132eef2fa09346aee33c28eb130ff28f5b766953334113211996d20011a198
		e3fc433f9f2541010ae17c1bf202580f6047472fb36857fe843b19f5984009dd
		c324044e847a4f4a0ab34f719595de37252d6235365e9b84392b061085349d73
		203a4a13e96f5432ec0fd4a1ee65accdd5e3904df54c1da510b0ff20dcc0c77f
		cb2c0e0eb605cb0504db87632cf3d8b4dae6e705769d1de354270123cb11450e
		fc60ac47683d7b8d0f811365565fd98c4c8eb936bcab8d069fc33bd801b03ade
		a2e1fbc5aa463d08ca19896d2bf59a071b851e6c239052172f296bfb5e724047
		90a2181014f3b94a4e97d117b438130368cc39dbb2d198065ae3986547926cd2
		162f40a29f0c3c8745c0f50fba3852e566d44575c29d39a03f0cda721984b6f4
		40591f355e12d439ff150aab7613499dbd49adabc8676eef023b15b65bfc5ca0
		6948109f23f350db82123535eb8a7433bdabcb909271a6ecbcb58b936a88cd4e
		8f2e6ff5800175f113253d8fa9ca8885c2f552e657dc603f252e1a8e308f76f0
		be79e2fb8f5d5fbbe2e30ecadd220723c8c0aea8078cdfcb3868263ff8f09400
		54da48781893a7e49ad5aff4af300cd804a6b6279ab3ff3afb64491c85194aab
		760d58a606654f9f4400e8b38591356fbf6425aca26dc85244259ff2b19c41b9
		f96f3ca9ec1dde434da7d2d392b905ddf3d1f9af93d1af5950bd493f5aa731b4
		056df31bd267b6b90a079831aaf579be0a39013137aac6d404f518cfd4684064
		7e78bfe706ca4cf5e9c5453e9f7cfd2b8b4c8d169a44e55c88d4a9a7f9474241
		e221af44860018ab0856972e194cd934
	"
);

/// RFC 9001 Appendix A.2 unprotected header.
pub const RFC9001_UNPROTECTED_HEADER: [u8; 22] =
	hex_literal::hex!("c300000001088394c8f03e5157080000449e00000002");

/// RFC 9001 Appendix A.2 CRYPTO frame (type, offset, length, data). The
/// rest of the payload is PADDING.
pub const RFC9001_CRYPTO_FRAME: [u8; 245] = hex_literal::hex!(
	"
		060040f1010000ed0303ebf8fa56f12939b9584a3896472ec40bb863cfd3e868
		04fe3a47f06a2b69484c00000413011302010000c000000010000e00000b6578
		616d706c652e636f6dff01000100000a00080006001d00170018001000070005
		04616c706e000500050100000000003300260024001d00209370b2c9caa47fba
		baf4559fedba753de171fa71f50f1ce15d43e994ec74d748002b000302030400
		0d0010000e0403050306030203080408050806002d00020101001c0002400100
		3900320408ffffffffffffffff05048000ffff07048000ffff08011001048000
		75300901100f088394c8f03e51570806048000ffff
	"
);

/// Data carried by [`RFC9001_CRYPTO_FRAME`]: the ClientHello.
pub fn rfc9001_client_hello() -> &'static [u8] {
	&RFC9001_CRYPTO_FRAME[4..]
}

/// Encode a value as a QUIC varint and append to buf.
pub fn push_varint(buf: &mut Vec<u8>, val: u64) {
	if val < 64 {
		buf.push(val as u8);
	} else if val < 16384 {
		buf.push(0x40 | (val >> 8) as u8);
		buf.push(val as u8);
	} else if val < 1_073_741_824 {
		let bytes = (val as u32).to_be_bytes();
		buf.push(0x80 | bytes[0]);
		buf.extend_from_slice(&bytes[1..]);
	} else {
		let bytes = val.to_be_bytes();
		buf.push(0xc0 | bytes[0]);
		buf.extend_from_slice(&bytes[1..]);
	}
}

/// A CRYPTO frame with offset 0.
pub fn crypto_frame(data: &[u8]) -> Vec<u8> {
	let mut frame = vec![0x06, 0x00];
	push_varint(&mut frame, data.len() as u64);
	frame.extend_from_slice(data);
	frame
}

/// Builds protected client Initial packets.
#[derive(Debug, Clone)]
pub struct InitialBuilder {
	pub version: u32,
	pub dcid: Vec<u8>,
	pub scid: Vec<u8>,
	pub token: Vec<u8>,
	pub packet_number: u64,
	pub pn_len: usize,
	/// Reserved bits (0x0c) of the first byte before protection.
	pub reserved: u8,
}

impl Default for InitialBuilder {
	fn default() -> Self {
		InitialBuilder {
			version: 1,
			dcid: RFC9001_DCID.to_vec(),
			scid: Vec::new(),
			token: Vec::new(),
			packet_number: 0,
			pn_len: 1,
			reserved: 0,
		}
	}
}

impl InitialBuilder {
	/// Encrypt `plaintext` and apply header protection with the keys derived
	/// from `dcid` under QUIC v1.
	pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
		assert!((1..=4).contains(&self.pn_len));
		let secrets = InitialSecrets::derive(&self.dcid, 1).expect("v1 keys");

		let mut pkt = Vec::new();
		pkt.push(0xc0 | (self.reserved & 0x0c) | (self.pn_len as u8 - 1));
		pkt.extend_from_slice(&self.version.to_be_bytes());
		pkt.push(self.dcid.len() as u8);
		pkt.extend_from_slice(&self.dcid);
		pkt.push(self.scid.len() as u8);
		pkt.extend_from_slice(&self.scid);
		push_varint(&mut pkt, self.token.len() as u64);
		pkt.extend_from_slice(&self.token);
		push_varint(&mut pkt, (self.pn_len + plaintext.len() + 16) as u64);
		let pn_offset = pkt.len();
		let pn_bytes = self.packet_number.to_be_bytes();
		pkt.extend_from_slice(&pn_bytes[8 - self.pn_len..]);

		let key = aead::LessSafeKey::new(
			aead::UnboundKey::new(&aead::AES_128_GCM, &secrets.key).expect("key"),
		);
		let nonce = aead::Nonce::assume_unique_for_key(secrets.nonce(self.packet_number));
		let mut body = plaintext.to_vec();
		key.seal_in_place_append_tag(nonce, aead::Aad::from(&pkt[..]), &mut body)
			.expect("seal");
		pkt.extend_from_slice(&body);

		let cipher = Aes128::new(GenericArray::from_slice(&secrets.hp));
		let mut mask = GenericArray::clone_from_slice(&pkt[pn_offset + 4..pn_offset + 20]);
		cipher.encrypt_block(&mut mask);
		pkt[0] ^= mask[0] & 0x0f;
		for i in 0..self.pn_len {
			pkt[pn_offset + i] ^= mask[1 + i];
		}
		pkt
	}
}

/// A v1 Initial carrying `frames`, with the plaintext padded to 1100 bytes.
pub fn sealed_initial(frames: &[u8]) -> Vec<u8> {
	let mut plaintext = frames.to_vec();
	plaintext.resize(plaintext.len().max(1100), 0x00);
	InitialBuilder::default().seal(&plaintext)
}
