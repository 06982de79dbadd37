use core::cmp::Ordering;
use core::ops::{BitAnd, BitOr, BitXor, Not};
use primitive_types::{U256, U512};

/// A 256-bit value: the universal stack and storage element.
///
/// Wraps [`primitive_types::U256`] rather than hand-rolling limb
/// arithmetic — arithmetic, comparisons and bit ops are already exact
/// and allocation-free there. What this type adds on top is the
/// EVM-specific vocabulary: signed views, `signExtend`, `byte`, and
/// the contractual "division by zero yields zero" semantics.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word(pub U256);

impl core::fmt::Debug for Word {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

impl Word {
	pub const fn zero() -> Self {
		Self(U256::zero())
	}

	pub fn one() -> Self {
		Self(U256::one())
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn to_big_endian(&self, bytes: &mut [u8; 32]) {
		self.0.to_big_endian(bytes)
	}

	pub fn from_big_endian(bytes: &[u8]) -> Self {
		Self(U256::from_big_endian(bytes))
	}

	/// Number of significant bytes; 0 for the zero word.
	pub fn bytes_occupied(&self) -> u32 {
		let bits = self.0.bits();
		((bits + 7) / 8) as u32
	}

	/// Truncate to `usize`, or `None` if it doesn't fit — the caller
	/// decides whether that's `MemoryOverflow` or something else.
	pub fn as_usize_checked(&self) -> Option<usize> {
		if self.0 > U256::from(usize::max_value()) {
			None
		} else {
			Some(self.0.as_usize())
		}
	}

	pub fn as_u64(&self) -> u64 {
		self.0.low_u64()
	}

	// --- arithmetic: wrapping mod 2^256, never panics ---

	pub fn overflowing_add(self, other: Self) -> Self {
		Self(self.0.overflowing_add(other.0).0)
	}

	pub fn overflowing_sub(self, other: Self) -> Self {
		Self(self.0.overflowing_sub(other.0).0)
	}

	pub fn overflowing_mul(self, other: Self) -> Self {
		Self(self.0.overflowing_mul(other.0).0)
	}

	/// Divide by zero yields zero, per contract.
	pub fn div(self, other: Self) -> Self {
		if other.is_zero() {
			Self::zero()
		} else {
			Self(self.0 / other.0)
		}
	}

	/// Modulus by zero yields zero, per contract.
	pub fn rem(self, other: Self) -> Self {
		if other.is_zero() {
			Self::zero()
		} else {
			Self(self.0 % other.0)
		}
	}

	pub fn sdiv(self, other: Self) -> Self {
		sign::I256::from(self.0).div(sign::I256::from(other.0)).into_word()
	}

	pub fn smod(self, other: Self) -> Self {
		if other.is_zero() {
			return Self::zero();
		}
		sign::I256::from(self.0).rem(sign::I256::from(other.0)).into_word()
	}

	/// `(a + b) mod m`, computed with a 512-bit scratch to avoid the
	/// truncation a native-width add-then-reduce would introduce.
	/// Modulus of zero yields zero.
	pub fn addmod(self, other: Self, modulus: Self) -> Self {
		if modulus.is_zero() {
			return Self::zero();
		}
		let wide = U512::from(self.0) + U512::from(other.0);
		Self(truncate_u512(wide % U512::from(modulus.0)))
	}

	/// `(a * b) mod m`, same widening rationale as [`Word::addmod`].
	pub fn mulmod(self, other: Self, modulus: Self) -> Self {
		if modulus.is_zero() {
			return Self::zero();
		}
		let wide = U512::from(self.0) * U512::from(other.0);
		Self(truncate_u512(wide % U512::from(modulus.0)))
	}

	/// Modular exponentiation by repeated squaring, mod 2^256.
	pub fn exp(self, exponent: Self) -> Self {
		let mut base = self;
		let mut exp = exponent.0;
		let mut result = Self::one();
		while !exp.is_zero() {
			if exp.bit(0) {
				result = result.overflowing_mul(base);
			}
			exp = exp >> 1;
			if !exp.is_zero() {
				base = base.overflowing_mul(base);
			}
		}
		result
	}

	/// `SIGNEXTEND(k, x)`: sign-extend `x` from bit `8k+7`. Unchanged
	/// if `k >= 32`.
	pub fn signextend(k: Self, x: Self) -> Self {
		if k.0 >= U256::from(32) {
			return x;
		}
		let k = k.0.as_usize();
		let bit_index = 8 * k + 7;
		let bit = x.0.bit(bit_index);
		let mask = (U256::one() << bit_index) - U256::one();
		if bit {
			Self(x.0 | !mask)
		} else {
			Self(x.0 & mask)
		}
	}

	/// `BYTE(i, x)`: big-endian byte `i` of `x`, or zero if `i >= 32`.
	pub fn byte(i: Self, x: Self) -> Self {
		if i.0 >= U256::from(32) {
			return Self::zero();
		}
		let i = i.0.as_usize();
		let mut bytes = [0u8; 32];
		x.to_big_endian(&mut bytes);
		Self(U256::from(bytes[i]))
	}

	pub fn shl(self, shift: Self) -> Self {
		if shift.0 >= U256::from(256) {
			Self::zero()
		} else {
			Self(self.0 << shift.0.as_usize())
		}
	}

	pub fn shr(self, shift: Self) -> Self {
		if shift.0 >= U256::from(256) {
			Self::zero()
		} else {
			Self(self.0 >> shift.0.as_usize())
		}
	}

	pub fn sar(self, shift: Self) -> Self {
		let i = sign::I256::from(self.0);
		if shift.0 >= U256::from(256) {
			return if i.is_negative() {
				Self(U256::MAX)
			} else {
				Self::zero()
			};
		}
		match i.0 {
			sign::Sign::Minus => {
				let shifted = (!self.0) >> shift.0.as_usize();
				Self(!shifted)
			}
			_ => Self(self.0 >> shift.0.as_usize()),
		}
	}

	pub fn lt(&self, other: &Self) -> bool {
		self.0 < other.0
	}

	pub fn gt(&self, other: &Self) -> bool {
		self.0 > other.0
	}

	pub fn slt(&self, other: &Self) -> bool {
		sign::I256::from(self.0).cmp(&sign::I256::from(other.0)) == Ordering::Less
	}

	pub fn sgt(&self, other: &Self) -> bool {
		sign::I256::from(self.0).cmp(&sign::I256::from(other.0)) == Ordering::Greater
	}

	/// Canonical boolean push value: byte 31 == 1, all others 0.
	pub fn from_bool(b: bool) -> Self {
		if b {
			Self::one()
		} else {
			Self::zero()
		}
	}
}

/// Narrow a 512-bit scratch value that is already known to fit in 256
/// bits (the caller reduced it by a <= 256-bit modulus) back down.
fn truncate_u512(value: U512) -> U256 {
	let mut wide_bytes = [0u8; 64];
	value.to_big_endian(&mut wide_bytes);
	U256::from_big_endian(&wide_bytes[32..64])
}

impl From<U256> for Word {
	fn from(v: U256) -> Self {
		Self(v)
	}
}

impl From<Word> for U256 {
	fn from(w: Word) -> Self {
		w.0
	}
}

impl From<u64> for Word {
	fn from(v: u64) -> Self {
		Self(U256::from(v))
	}
}

impl From<usize> for Word {
	fn from(v: usize) -> Self {
		Self(U256::from(v as u64))
	}
}

impl BitAnd for Word {
	type Output = Self;
	fn bitand(self, rhs: Self) -> Self {
		Self(self.0 & rhs.0)
	}
}

impl BitOr for Word {
	type Output = Self;
	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

impl BitXor for Word {
	type Output = Self;
	fn bitxor(self, rhs: Self) -> Self {
		Self(self.0 ^ rhs.0)
	}
}

impl Not for Word {
	type Output = Self;
	fn not(self) -> Self {
		Self(!self.0)
	}
}

/// Two's-complement signed view over `U256`, grounded in the same
/// sign-split representation the teacher uses for SDIV/SMOD/SLT/SGT.
mod sign {
	use super::Word;
	use core::cmp::Ordering;
	use primitive_types::U256;

	const SIGN_BIT_MASK: U256 = U256([
		0xffff_ffff_ffff_ffff,
		0xffff_ffff_ffff_ffff,
		0xffff_ffff_ffff_ffff,
		0x7fff_ffff_ffff_ffff,
	]);

	#[derive(Copy, Clone, Eq, PartialEq, Debug)]
	pub enum Sign {
		Plus,
		Minus,
		Zero,
	}

	#[derive(Copy, Clone, Eq, PartialEq, Debug)]
	pub struct I256(pub Sign, pub U256);

	impl I256 {
		pub fn zero() -> Self {
			I256(Sign::Zero, U256::zero())
		}

		pub fn min_value() -> Self {
			I256(Sign::Minus, (U256::MAX & SIGN_BIT_MASK) + U256::from(1u64))
		}

		pub fn is_negative(&self) -> bool {
			self.0 == Sign::Minus
		}

		pub fn into_word(self) -> Word {
			Word(U256::from(self))
		}

		pub fn div(self, other: Self) -> Self {
			if other == I256::zero() {
				return I256::zero();
			}
			if self == I256::min_value() && other.1 == U256::from(1u64) && other.0 == Sign::Minus {
				return I256::min_value();
			}
			let d = (self.1 / other.1) & SIGN_BIT_MASK;
			if d.is_zero() {
				return I256::zero();
			}
			match (self.0, other.0) {
				(Sign::Zero, Sign::Plus)
				| (Sign::Plus, Sign::Zero)
				| (Sign::Zero, Sign::Zero)
				| (Sign::Plus, Sign::Plus)
				| (Sign::Minus, Sign::Minus) => I256(Sign::Plus, d),
				(Sign::Zero, Sign::Minus)
				| (Sign::Plus, Sign::Minus)
				| (Sign::Minus, Sign::Zero)
				| (Sign::Minus, Sign::Plus) => I256(Sign::Minus, d),
			}
		}

		pub fn rem(self, other: Self) -> Self {
			if other == I256::zero() {
				return I256::zero();
			}
			let r = (self.1 % other.1) & SIGN_BIT_MASK;
			if r.is_zero() {
				return I256::zero();
			}
			I256(self.0, r)
		}
	}

	impl Ord for I256 {
		fn cmp(&self, other: &I256) -> Ordering {
			match (self.0, other.0) {
				(Sign::Zero, Sign::Zero) => Ordering::Equal,
				(Sign::Zero, Sign::Plus) => Ordering::Less,
				(Sign::Zero, Sign::Minus) => Ordering::Greater,
				(Sign::Minus, Sign::Zero) => Ordering::Less,
				(Sign::Minus, Sign::Plus) => Ordering::Less,
				(Sign::Minus, Sign::Minus) => self.1.cmp(&other.1).reverse(),
				(Sign::Plus, Sign::Minus) => Ordering::Greater,
				(Sign::Plus, Sign::Zero) => Ordering::Greater,
				(Sign::Plus, Sign::Plus) => self.1.cmp(&other.1),
			}
		}
	}

	impl PartialOrd for I256 {
		fn partial_cmp(&self, other: &I256) -> Option<Ordering> {
			Some(self.cmp(other))
		}
	}

	impl From<U256> for I256 {
		fn from(val: U256) -> I256 {
			if val.is_zero() {
				I256::zero()
			} else if val & SIGN_BIT_MASK == val {
				I256(Sign::Plus, val)
			} else {
				I256(Sign::Minus, !val + U256::from(1u64))
			}
		}
	}

	impl From<I256> for U256 {
		fn from(value: I256) -> U256 {
			match value.0 {
				Sign::Zero => U256::zero(),
				Sign::Plus => value.1,
				Sign::Minus => !value.1 + U256::from(1u64),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn div_by_zero_is_zero() {
		assert_eq!(Word::from(10u64).div(Word::zero()), Word::zero());
		assert_eq!(Word::from(10u64).rem(Word::zero()), Word::zero());
		assert_eq!(Word::from(10u64).addmod(Word::from(2u64), Word::zero()), Word::zero());
		assert_eq!(Word::from(10u64).mulmod(Word::from(2u64), Word::zero()), Word::zero());
	}

	#[test]
	fn div_rem_identity() {
		let a = Word::from(U256::from(123456789u64));
		let d = Word::from(17u64);
		let q = a.div(d);
		let r = a.rem(d);
		assert_eq!(q.overflowing_mul(d).overflowing_add(r), a);
	}

	#[test]
	fn signextend_out_of_range_is_identity() {
		let x = Word::from(U256::from(0xdeadbeefu64));
		assert_eq!(Word::signextend(Word::from(32u64), x), x);
		assert_eq!(Word::signextend(Word::from(100u64), x), x);
	}

	#[test]
	fn signextend_negative_byte() {
		// k = 0 means sign bit is bit 7 of the low byte.
		let x = Word::from(U256::from(0xffu64)); // low byte 0xff, sign bit set
		let extended = Word::signextend(Word::zero(), x);
		assert_eq!(extended, Word::from(U256::MAX));
	}

	#[test]
	fn byte_extraction() {
		let x = Word::from(U256::from(0x01_02u64));
		assert_eq!(Word::byte(Word::from(31u64), x), Word::from(0x02u64));
		assert_eq!(Word::byte(Word::from(30u64), x), Word::from(0x01u64));
		assert_eq!(Word::byte(Word::from(32u64), x), Word::zero());
	}

	#[test]
	fn iszero_involution() {
		for x in [Word::zero(), Word::one(), Word::from(42u64)] {
			let once = Word::from_bool(x.is_zero());
			let twice = Word::from_bool(once.is_zero());
			assert_eq!(twice, Word::from_bool(!x.is_zero()));
		}
	}

	#[test]
	fn bytes_occupied() {
		assert_eq!(Word::zero().bytes_occupied(), 0);
		assert_eq!(Word::from(1u64).bytes_occupied(), 1);
		assert_eq!(Word::from(256u64).bytes_occupied(), 2);
		assert_eq!(Word::from(U256::MAX).bytes_occupied(), 32);
	}

	#[test]
	fn sdiv_matches_i8_reference() {
		assert_eq!(
			Word::from(U256::MAX).sdiv(Word::from(U256::MAX)), // -1 / -1 = 1
			Word::one()
		);
		let hundred = Word::from(100u64);
		let minus_one = Word(U256::MAX);
		let minus_hundred = hundred.sdiv(minus_one);
		assert_eq!(minus_hundred, Word(!Word::from(100u64).0 + U256::one()));
	}
}
