use crate::consts::{MEMORY, QUAD_DIVISOR};
use dropvm_core::{ExitError, Opcode, Stack, Word};

/// The quadratic memory-expansion cost for a buffer `words` words long:
/// `MEMORY * w + w^2 / QUAD_DIVISOR`.
pub fn memory_cost(words: u64) -> u64 {
	MEMORY
		.saturating_mul(words)
		.saturating_add(words.saturating_mul(words) / QUAD_DIVISOR)
}

fn words_needed(offset: Word, len: Word) -> Result<usize, ExitError> {
	if len.is_zero() {
		return Ok(0);
	}
	let end = offset.overflowing_add(len);
	if end.1 {
		return Err(ExitError::OutOfOffset);
	}
	let end = end.0.as_usize_checked().ok_or(ExitError::OutOfOffset)?;
	Ok(if end % 32 == 0 { end / 32 } else { end / 32 + 1 })
}

/// Which `(offset, len)` pair, if any, this opcode's execution will
/// touch in memory — read straight off the stack, before the opcode
/// actually runs. `None` means the opcode never expands memory.
fn memory_footprint(opcode: Opcode, stack: &Stack) -> Result<Option<(Word, Word)>, ExitError> {
	Ok(match opcode {
		Opcode::SHA3 | Opcode::RETURN | Opcode::REVERT => {
			Some((stack.peek(0)?, stack.peek(1)?))
		}
		op if op.is_log().is_some() => Some((stack.peek(0)?, stack.peek(1)?)),
		Opcode::CODECOPY | Opcode::CALLDATACOPY | Opcode::RETURNDATACOPY => {
			Some((stack.peek(0)?, stack.peek(2)?))
		}
		Opcode::EXTCODECOPY => Some((stack.peek(1)?, stack.peek(3)?)),
		Opcode::MLOAD | Opcode::MSTORE => Some((stack.peek(0)?, Word::from(32u64))),
		Opcode::MSTORE8 => Some((stack.peek(0)?, Word::one())),
		Opcode::CREATE => Some((stack.peek(1)?, stack.peek(2)?)),
		Opcode::CALL | Opcode::CALLCODE => {
			let (in_off, in_len) = (stack.peek(3)?, stack.peek(4)?);
			let (out_off, out_len) = (stack.peek(5)?, stack.peek(6)?);
			Some(widest(in_off, in_len, out_off, out_len)?)
		}
		Opcode::DELEGATECALL | Opcode::STATICCALL => {
			let (in_off, in_len) = (stack.peek(2)?, stack.peek(3)?);
			let (out_off, out_len) = (stack.peek(4)?, stack.peek(5)?);
			Some(widest(in_off, in_len, out_off, out_len)?)
		}
		_ => None,
	})
}

fn widest(a_off: Word, a_len: Word, b_off: Word, b_len: Word) -> Result<(Word, Word), ExitError> {
	let a_words = words_needed(a_off, a_len)?;
	let b_words = words_needed(b_off, b_len)?;
	Ok(if a_words >= b_words {
		(a_off, a_len)
	} else {
		(b_off, b_len)
	})
}

/// The memory size (in words), not smaller than `current_words`, that
/// executing `opcode` against `stack` will require. Used to price the
/// expansion before the opcode runs — the interpreter charges the
/// delta and only then grows the real memory buffer.
pub fn words_required(
	opcode: Opcode,
	stack: &Stack,
	current_words: usize,
) -> Result<usize, ExitError> {
	match memory_footprint(opcode, stack)? {
		Some((offset, len)) => Ok(core::cmp::max(current_words, words_needed(offset, len)?)),
		None => Ok(current_words),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cost_is_quadratic() {
		assert_eq!(memory_cost(0), 0);
		assert_eq!(memory_cost(1), 3);
		// 1024 words: 3*1024 + 1024*1024/512 = 3072 + 2048 = 5120
		assert_eq!(memory_cost(1024), 5120);
	}
}
