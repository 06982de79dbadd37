use crate::Word;
use primitive_types::{H160, U256};

/// A 20-byte account identifier. The Word's low 20 bytes, per §9's
/// "Addresses" design note.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Addr(pub H160);

impl Addr {
	pub fn zero() -> Self {
		Self(H160::zero())
	}

	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}
}

impl From<H160> for Addr {
	fn from(h: H160) -> Self {
		Self(h)
	}
}

impl From<Addr> for H160 {
	fn from(a: Addr) -> Self {
		a.0
	}
}

/// Widen an address to a `Word`, zeroing the upper 12 bytes — the
/// convention every address-pushing opcode (ADDRESS, ORIGIN, CALLER,
/// COINBASE) must follow.
impl From<Addr> for Word {
	fn from(a: Addr) -> Self {
		Word::from(U256::from_big_endian(a.0.as_bytes()))
	}
}

/// Narrow a `Word` to an address by keeping its low 20 bytes, the
/// convention every opcode that pops an address argument must follow.
impl From<Word> for Addr {
	fn from(w: Word) -> Self {
		let mut bytes = [0u8; 32];
		w.to_big_endian(&mut bytes);
		Addr(H160::from_slice(&bytes[12..32]))
	}
}
