/// Opcode enum. One-to-one corresponding to an `u8` value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opcode(pub u8);

// Arithmetic.
impl Opcode {
	pub const STOP: Self = Self(0x00);
	pub const ADD: Self = Self(0x01);
	pub const MUL: Self = Self(0x02);
	pub const SUB: Self = Self(0x03);
	pub const DIV: Self = Self(0x04);
	pub const SDIV: Self = Self(0x05);
	pub const MOD: Self = Self(0x06);
	pub const SMOD: Self = Self(0x07);
	pub const ADDMOD: Self = Self(0x08);
	pub const MULMOD: Self = Self(0x09);
	pub const EXP: Self = Self(0x0a);
	pub const SIGNEXTEND: Self = Self(0x0b);
}

// Comparison / bitwise.
impl Opcode {
	pub const LT: Self = Self(0x10);
	pub const GT: Self = Self(0x11);
	pub const SLT: Self = Self(0x12);
	pub const SGT: Self = Self(0x13);
	pub const EQ: Self = Self(0x14);
	pub const ISZERO: Self = Self(0x15);
	pub const AND: Self = Self(0x16);
	pub const OR: Self = Self(0x17);
	pub const XOR: Self = Self(0x18);
	pub const NOT: Self = Self(0x19);
	pub const BYTE: Self = Self(0x1a);
}

impl Opcode {
	pub const SHA3: Self = Self(0x20);
}

// Environmental.
impl Opcode {
	pub const ADDRESS: Self = Self(0x30);
	pub const BALANCE: Self = Self(0x31);
	pub const ORIGIN: Self = Self(0x32);
	pub const CALLER: Self = Self(0x33);
	pub const CALLVALUE: Self = Self(0x34);
	pub const CALLDATALOAD: Self = Self(0x35);
	pub const CALLDATASIZE: Self = Self(0x36);
	pub const CALLDATACOPY: Self = Self(0x37);
	pub const CODESIZE: Self = Self(0x38);
	pub const CODECOPY: Self = Self(0x39);
	pub const GASPRICE: Self = Self(0x3a);
	pub const EXTCODESIZE: Self = Self(0x3b);
	pub const EXTCODECOPY: Self = Self(0x3c);
	pub const RETURNDATASIZE: Self = Self(0x3d);
	pub const RETURNDATACOPY: Self = Self(0x3e);
}

// Block.
impl Opcode {
	pub const BLOCKHASH: Self = Self(0x40);
	pub const COINBASE: Self = Self(0x41);
	pub const TIMESTAMP: Self = Self(0x42);
	pub const NUMBER: Self = Self(0x43);
	pub const DIFFICULTY: Self = Self(0x44);
	pub const GASLIMIT: Self = Self(0x45);
}

// Stack / memory / storage / flow.
impl Opcode {
	pub const POP: Self = Self(0x50);
	pub const MLOAD: Self = Self(0x51);
	pub const MSTORE: Self = Self(0x52);
	pub const MSTORE8: Self = Self(0x53);
	pub const SLOAD: Self = Self(0x54);
	pub const SSTORE: Self = Self(0x55);
	pub const JUMP: Self = Self(0x56);
	pub const JUMPI: Self = Self(0x57);
	pub const PC: Self = Self(0x58);
	pub const MSIZE: Self = Self(0x59);
	pub const GAS: Self = Self(0x5a);
	pub const JUMPDEST: Self = Self(0x5b);
}

// PUSH1..PUSH32.
impl Opcode {
	pub const PUSH1: Self = Self(0x60);
	pub const PUSH32: Self = Self(0x7f);
}

// DUP1..DUP16.
impl Opcode {
	pub const DUP1: Self = Self(0x80);
	pub const DUP16: Self = Self(0x8f);
}

// SWAP1..SWAP16.
impl Opcode {
	pub const SWAP1: Self = Self(0x90);
	pub const SWAP16: Self = Self(0x9f);
}

// LOG0..LOG4.
impl Opcode {
	pub const LOG0: Self = Self(0xa0);
	pub const LOG1: Self = Self(0xa1);
	pub const LOG2: Self = Self(0xa2);
	pub const LOG3: Self = Self(0xa3);
	pub const LOG4: Self = Self(0xa4);
}

// System.
impl Opcode {
	pub const CREATE: Self = Self(0xf0);
	pub const CALL: Self = Self(0xf1);
	pub const CALLCODE: Self = Self(0xf2);
	pub const RETURN: Self = Self(0xf3);
	pub const DELEGATECALL: Self = Self(0xf4);
	pub const STATICCALL: Self = Self(0xfa);
	pub const REVERT: Self = Self(0xfd);
	pub const INVALID: Self = Self(0xfe);
	pub const SUICIDE: Self = Self(0xff);
}

impl Opcode {
	/// `Some(n)` if this is `PUSHn`, giving the immediate's byte count.
	pub fn is_push(&self) -> Option<u8> {
		if (0x60..=0x7f).contains(&self.0) {
			Some(self.0 - 0x60 + 1)
		} else {
			None
		}
	}

	/// `Some(n)` if this is `DUPn`.
	pub fn is_dup(&self) -> Option<u8> {
		if (0x80..=0x8f).contains(&self.0) {
			Some(self.0 - 0x80 + 1)
		} else {
			None
		}
	}

	/// `Some(n)` if this is `SWAPn`.
	pub fn is_swap(&self) -> Option<u8> {
		if (0x90..=0x9f).contains(&self.0) {
			Some(self.0 - 0x90 + 1)
		} else {
			None
		}
	}

	/// `Some(n)` if this is `LOGn`.
	pub fn is_log(&self) -> Option<u8> {
		if (0xa0..=0xa4).contains(&self.0) {
			Some(self.0 - 0xa0)
		} else {
			None
		}
	}

	#[inline]
	pub const fn as_u8(&self) -> u8 {
		self.0
	}

	#[inline]
	pub const fn as_usize(&self) -> usize {
		self.0 as usize
	}
}

/// Base tier an opcode's step cost derives from. `Special` opcodes
/// have their entire cost computed ad hoc by the gasometer (SSTORE,
/// the CALL family, CREATE, LOGn, EXP, SHA3, memory-touching copies,
/// ...) — their tier carries no usable numeric cost on its own.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
	Zero,
	Base,
	VeryLow,
	Low,
	Mid,
	High,
	Ext,
	Special,
}

impl Tier {
	/// The flat cost for tiers that carry one. `Special` must be
	/// priced by the gasometer instead.
	pub fn cost(self) -> u64 {
		match self {
			Tier::Zero => 0,
			Tier::Base => 2,
			Tier::VeryLow => 3,
			Tier::Low => 5,
			Tier::Mid => 8,
			Tier::High => 10,
			Tier::Ext => 20,
			Tier::Special => 0,
		}
	}
}

/// Flags that cross-cut opcode semantics: whether the CALL variant
/// carries a value argument, is stateless (DELEGATECALL/STATICCALL,
/// which don't transfer value and/or force a static sub-frame), and
/// whether the opcode mutates persistent state (forbidden under the
/// static-call restriction).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct CallFlags {
	pub call_has_value: bool,
	pub call_is_stateless: bool,
	pub modifies_state: bool,
}

/// Static attributes of an opcode: stack arity, base cost tier, and
/// cross-cutting flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OpcodeInfo {
	pub input: u16,
	pub output: u16,
	pub tier: Tier,
	pub flags: CallFlags,
}

impl Opcode {
	/// Look up this opcode's static attributes. Undefined byte values
	/// return `None` — the caller translates that into `InvalidOpcode`.
	pub fn info(&self) -> Option<OpcodeInfo> {
		use Tier::*;

		let plain = |input, output, tier| {
			Some(OpcodeInfo {
				input,
				output,
				tier,
				flags: CallFlags::default(),
			})
		};

		if self.is_push().is_some() {
			return plain(0, 1, VeryLow);
		}
		if let Some(n) = self.is_dup() {
			return plain(n as u16, n as u16 + 1, VeryLow);
		}
		if let Some(n) = self.is_swap() {
			return plain(n as u16 + 1, n as u16 + 1, VeryLow);
		}
		if let Some(n) = self.is_log() {
			return Some(OpcodeInfo {
				input: n as u16 + 2,
				output: 0,
				tier: Special,
				flags: CallFlags {
					modifies_state: true,
					..CallFlags::default()
				},
			});
		}

		match *self {
			Self::STOP => plain(0, 0, Zero),
			Self::ADD | Self::SUB => plain(2, 1, VeryLow),
			Self::MUL | Self::DIV | Self::SDIV | Self::MOD | Self::SMOD => plain(2, 1, Low),
			Self::ADDMOD | Self::MULMOD => plain(3, 1, Mid),
			Self::EXP => plain(2, 1, Special),
			Self::SIGNEXTEND => plain(2, 1, Low),

			Self::LT | Self::GT | Self::SLT | Self::SGT | Self::EQ => plain(2, 1, VeryLow),
			Self::ISZERO | Self::NOT => plain(1, 1, VeryLow),
			Self::AND | Self::OR | Self::XOR | Self::BYTE => plain(2, 1, VeryLow),

			Self::SHA3 => plain(2, 1, Special),

			Self::ADDRESS | Self::ORIGIN | Self::CALLER | Self::CALLVALUE => plain(0, 1, Base),
			Self::CALLDATALOAD => plain(1, 1, VeryLow),
			Self::CALLDATASIZE | Self::CODESIZE | Self::GASPRICE => plain(0, 1, Base),
			// Base tier + memory expansion, generically priced; the
			// per-word copy surcharge on top is computed ad hoc by the
			// gasometer's `cost::copy_cost`.
			Self::CALLDATACOPY | Self::CODECOPY => plain(3, 0, VeryLow),
			Self::BALANCE => plain(1, 1, Special),
			Self::EXTCODESIZE => plain(1, 1, Special),
			Self::EXTCODECOPY => plain(4, 0, Special),
			Self::RETURNDATASIZE => plain(0, 1, Base),
			Self::RETURNDATACOPY => plain(3, 0, VeryLow),

			Self::BLOCKHASH => plain(1, 1, Ext),
			Self::COINBASE | Self::TIMESTAMP | Self::NUMBER | Self::DIFFICULTY | Self::GASLIMIT => {
				plain(0, 1, Base)
			}

			Self::POP => plain(1, 0, Base),
			// Flat VeryLow tier; the memory expansion on top is priced
			// generically from the operand window, no ad hoc surcharge.
			Self::MLOAD => plain(1, 1, VeryLow),
			Self::MSTORE => plain(2, 0, VeryLow),
			Self::MSTORE8 => plain(2, 0, VeryLow),
			Self::SLOAD => plain(1, 1, Special),
			Self::SSTORE => Some(OpcodeInfo {
				input: 2,
				output: 0,
				tier: Special,
				flags: CallFlags {
					modifies_state: true,
					..CallFlags::default()
				},
			}),
			Self::JUMP => plain(1, 0, Mid),
			Self::JUMPI => plain(2, 0, High),
			Self::PC | Self::MSIZE | Self::GAS => plain(0, 1, Base),
			Self::JUMPDEST => plain(0, 0, Special),

			// Zero flat tier (mirrors the STOP constant); memory
			// expansion over the returned window is priced generically.
			Self::RETURN => plain(2, 0, Zero),
			Self::REVERT => plain(2, 0, Zero),
			Self::INVALID => plain(0, 0, Special),

			Self::CREATE => Some(OpcodeInfo {
				input: 3,
				output: 1,
				tier: Special,
				flags: CallFlags {
					modifies_state: true,
					..CallFlags::default()
				},
			}),
			Self::CALL => Some(OpcodeInfo {
				input: 7,
				output: 1,
				tier: Special,
				flags: CallFlags {
					call_has_value: true,
					call_is_stateless: false,
					// Only a nonzero value transfer is forbidden under a
					// static frame; that's data-dependent, so the
					// interpreter checks it itself rather than here.
					modifies_state: false,
				},
			}),
			Self::CALLCODE => Some(OpcodeInfo {
				input: 7,
				output: 1,
				tier: Special,
				flags: CallFlags {
					call_has_value: true,
					call_is_stateless: false,
					modifies_state: false,
				},
			}),
			Self::DELEGATECALL => Some(OpcodeInfo {
				input: 6,
				output: 1,
				tier: Special,
				flags: CallFlags {
					call_has_value: false,
					call_is_stateless: true,
					modifies_state: false,
				},
			}),
			Self::STATICCALL => Some(OpcodeInfo {
				input: 6,
				output: 1,
				tier: Special,
				flags: CallFlags {
					call_has_value: false,
					call_is_stateless: true,
					modifies_state: false,
				},
			}),
			Self::SUICIDE => Some(OpcodeInfo {
				input: 1,
				output: 0,
				tier: Special,
				flags: CallFlags {
					modifies_state: true,
					..CallFlags::default()
				},
			}),

			_ => None,
		}
	}
}
