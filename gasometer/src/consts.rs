//! The cost schedule: every named drop constant referenced by
//! [`crate::cost`]. Grouped the way the spec's tables group them, not
//! alphabetically, so the two stay easy to cross-check by eye.

pub const STOP: u64 = 0;
pub const SUICIDE: u64 = 0;
pub const REFUND_SUICIDE: i64 = 24_000;

pub const SSTORE_SET: u64 = 20_000;
/// Also covers SSTORE's "clear" transition (non-zero -> zero) — Frontier
/// and Homestead price both the same, before EIP-1283 split them apart.
pub const SSTORE_RESET: u64 = 5_000;
pub const REFUND_SSTORE_CLEAR: i64 = 15_000;

pub const SLOAD: u64 = 50;
pub const BALANCE: u64 = 20;
pub const EXT_CODE_SIZE: u64 = 20;
pub const EXT_CODE_COPY: u64 = 20;
pub const BLOCKHASH: u64 = 20;

pub const CALL: u64 = 40;
pub const NEW_ACCT_CALL: u64 = 25_000;
pub const VT_CALL: u64 = 9_000;
pub const STIPEND_CALL: u64 = 2_300;

pub const CREATE: u64 = 32_000;

pub const SHA3: u64 = 30;
pub const SHA3_WORD: u64 = 6;

pub const EXP: u64 = 10;
pub const EXP_BYTE: u64 = 10;

pub const LOG: u64 = 375;
pub const LOG_TOPIC: u64 = 375;
pub const LOG_DATA: u64 = 8;

pub const MEMORY: u64 = 3;
pub const COPY: u64 = 3;
pub const QUAD_DIVISOR: u64 = 512;

/// The fraction of remaining drops a CALL-family opcode is allowed to
/// forward to its sub-frame: `gas - gas / CALL_FORWARD_DIVISOR`.
pub const CALL_FORWARD_DIVISOR: u64 = 64;
