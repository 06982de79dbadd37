use super::Control;
use crate::Frame;
use dropvm_core::{ExitError, ExitRevert, ExitSucceed, Opcode, Word};
use dropvm_gasometer::cost;
use sha3::Digest;

fn run(f: impl FnOnce() -> Result<(), ExitError>) -> Control {
	f().into()
}

fn binop(frame: &mut Frame, f: impl FnOnce(Word, Word) -> Word) -> Control {
	run(|| {
		let a = frame.stack.pop()?;
		let b = frame.stack.pop()?;
		frame.stack.push(f(a, b))
	})
}

fn binop_bool(frame: &mut Frame, f: impl FnOnce(&Word, &Word) -> bool) -> Control {
	binop(frame, |a, b| Word::from_bool(f(&a, &b)))
}

fn unop(frame: &mut Frame, f: impl FnOnce(Word) -> Word) -> Control {
	run(|| {
		let a = frame.stack.pop()?;
		frame.stack.push(f(a))
	})
}

// --- arithmetic ---

pub fn add(frame: &mut Frame) -> Control {
	binop(frame, Word::overflowing_add)
}

pub fn mul(frame: &mut Frame) -> Control {
	binop(frame, Word::overflowing_mul)
}

pub fn sub(frame: &mut Frame) -> Control {
	binop(frame, Word::overflowing_sub)
}

pub fn div(frame: &mut Frame) -> Control {
	binop(frame, Word::div)
}

pub fn sdiv(frame: &mut Frame) -> Control {
	binop(frame, Word::sdiv)
}

pub fn op_mod(frame: &mut Frame) -> Control {
	binop(frame, Word::rem)
}

pub fn smod(frame: &mut Frame) -> Control {
	binop(frame, Word::smod)
}

pub fn addmod(frame: &mut Frame) -> Control {
	run(|| {
		let a = frame.stack.pop()?;
		let b = frame.stack.pop()?;
		let m = frame.stack.pop()?;
		frame.stack.push(a.addmod(b, m))
	})
}

pub fn mulmod(frame: &mut Frame) -> Control {
	run(|| {
		let a = frame.stack.pop()?;
		let b = frame.stack.pop()?;
		let m = frame.stack.pop()?;
		frame.stack.push(a.mulmod(b, m))
	})
}

pub fn exp(frame: &mut Frame) -> Control {
	run(|| {
		let base = frame.stack.pop()?;
		let exponent = frame.stack.pop()?;
		frame.gasometer.record_cost(cost::exp_cost(exponent))?;
		frame.stack.push(base.exp(exponent))
	})
}

pub fn signextend(frame: &mut Frame) -> Control {
	binop(frame, Word::signextend)
}

// --- comparison / bitwise ---

pub fn lt(frame: &mut Frame) -> Control {
	binop_bool(frame, Word::lt)
}

pub fn gt(frame: &mut Frame) -> Control {
	binop_bool(frame, Word::gt)
}

pub fn slt(frame: &mut Frame) -> Control {
	binop_bool(frame, Word::slt)
}

pub fn sgt(frame: &mut Frame) -> Control {
	binop_bool(frame, Word::sgt)
}

pub fn eq(frame: &mut Frame) -> Control {
	binop(frame, |a, b| Word::from_bool(a == b))
}

pub fn iszero(frame: &mut Frame) -> Control {
	unop(frame, |a| Word::from_bool(a.is_zero()))
}

pub fn and(frame: &mut Frame) -> Control {
	binop(frame, |a, b| a & b)
}

pub fn or(frame: &mut Frame) -> Control {
	binop(frame, |a, b| a | b)
}

pub fn xor(frame: &mut Frame) -> Control {
	binop(frame, |a, b| a ^ b)
}

pub fn not(frame: &mut Frame) -> Control {
	unop(frame, |a| !a)
}

pub fn byte(frame: &mut Frame) -> Control {
	binop(frame, Word::byte)
}

// --- SHA3 ---

pub fn sha3(frame: &mut Frame) -> Control {
	run(|| {
		let offset = frame.stack.pop()?;
		let len = frame.stack.pop()?;
		frame.gasometer.record_cost(cost::sha3_cost(len)?)?;
		let offset = as_usize(offset)?;
		let len = as_usize(len)?;
		let data = frame.memory.get(offset, len);
		let hash = sha3::Keccak256::digest(&data);
		frame.stack.push(Word::from_big_endian(&hash))
	})
}

// --- environment (fields already on the frame's own context) ---

pub fn address(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.context.address)))
}

pub fn caller(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.context.caller)))
}

pub fn callvalue(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(frame.context.apparent_value))
}

pub fn calldataload(frame: &mut Frame) -> Control {
	run(|| {
		let offset = frame.stack.pop()?;
		let offset = offset.as_usize_checked().unwrap_or(frame.input.len());
		let mut bytes = [0u8; 32];
		let avail = frame.input.len().saturating_sub(offset);
		let copy_len = core::cmp::min(avail, 32);
		if copy_len > 0 {
			bytes[..copy_len].copy_from_slice(&frame.input[offset..offset + copy_len]);
		}
		frame.stack.push(Word::from_big_endian(&bytes))
	})
}

pub fn calldatasize(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.input.len())))
}

pub fn calldatacopy(frame: &mut Frame) -> Control {
	copy_from(frame, |f| &f.input)
}

pub fn codesize(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.code.len())))
}

pub fn codecopy(frame: &mut Frame) -> Control {
	copy_from(frame, |f| &f.code)
}

pub fn returndatasize(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.return_data_buffer.len())))
}

pub fn returndatacopy(frame: &mut Frame) -> Control {
	run(|| {
		let memory_offset = frame.stack.pop()?;
		let source_offset = frame.stack.pop()?;
		let len = frame.stack.pop()?;

		if !len.is_zero() {
			let (end, overflow) = source_offset.0.overflowing_add(len.0);
			let end = Word(end).as_usize_checked().ok_or(ExitError::OutOfOffset)?;
			if overflow || end > frame.return_data_buffer.len() {
				return Err(ExitError::OutOfOffset);
			}
		}

		frame.gasometer.record_cost(cost::copy_cost(len)?)?;
		let source = frame.return_data_buffer.clone();
		frame.memory.copy_large(memory_offset, source_offset, len, &source)
	})
}

fn copy_from(frame: &mut Frame, source_of: impl FnOnce(&Frame) -> &[u8]) -> Control {
	run(|| {
		let memory_offset = frame.stack.pop()?;
		let source_offset = frame.stack.pop()?;
		let len = frame.stack.pop()?;
		frame.gasometer.record_cost(cost::copy_cost(len)?)?;
		let source = source_of(frame).to_vec();
		frame.memory.copy_large(memory_offset, source_offset, len, &source)
	})
}

// --- stack / memory / flow ---

pub fn pop(frame: &mut Frame) -> Control {
	run(|| {
		frame.stack.pop()?;
		Ok(())
	})
}

pub fn mload(frame: &mut Frame) -> Control {
	run(|| {
		let offset = frame.stack.pop()?;
		let offset = as_usize(offset)?;
		let bytes = frame.memory.get(offset, 32);
		frame.stack.push(Word::from_big_endian(&bytes))
	})
}

pub fn mstore(frame: &mut Frame) -> Control {
	run(|| {
		let offset = frame.stack.pop()?;
		let value = frame.stack.pop()?;
		let offset = as_usize(offset)?;
		let mut bytes = [0u8; 32];
		value.to_big_endian(&mut bytes);
		frame.memory.set(offset, &bytes)
	})
}

pub fn mstore8(frame: &mut Frame) -> Control {
	run(|| {
		let offset = frame.stack.pop()?;
		let value = frame.stack.pop()?;
		let offset = as_usize(offset)?;
		let mut bytes = [0u8; 32];
		value.to_big_endian(&mut bytes);
		frame.memory.set(offset, &bytes[31..32])
	})
}

pub fn pc(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.pc)))
}

pub fn msize(frame: &mut Frame) -> Control {
	run(|| frame.stack.push(Word::from(frame.memory.len())))
}

pub fn jump(frame: &mut Frame) -> Control {
	match frame.stack.pop() {
		Ok(dest) => jump_to(frame, dest),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn jumpi(frame: &mut Frame) -> Control {
	let dest = match frame.stack.pop() {
		Ok(d) => d,
		Err(e) => return Control::Exit(e.into()),
	};
	let cond = match frame.stack.pop() {
		Ok(c) => c,
		Err(e) => return Control::Exit(e.into()),
	};
	if cond.is_zero() {
		Control::Continue
	} else {
		jump_to(frame, dest)
	}
}

fn jump_to(frame: &Frame, dest: Word) -> Control {
	match dest.as_usize_checked() {
		Some(dest) if frame.valids.is_valid(dest) => Control::Jump(dest),
		_ => Control::Exit(ExitError::InvalidJump.into()),
	}
}

pub fn ret(frame: &mut Frame) -> Control {
	match finish_output(frame) {
		Ok(()) => Control::Exit(ExitSucceed::Returned.into()),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn revert(frame: &mut Frame) -> Control {
	match finish_output(frame) {
		Ok(()) => Control::Exit(ExitRevert::Reverted.into()),
		Err(e) => Control::Exit(e.into()),
	}
}

/// `RETURN`/`REVERT` share the same "pop offset/size, read memory into
/// the frame's own return-data buffer" setup; only the exit reason
/// they report differs.
fn finish_output(frame: &mut Frame) -> Result<(), ExitError> {
	let offset = frame.stack.pop()?;
	let len = frame.stack.pop()?;
	let offset = as_usize(offset)?;
	let len = as_usize(len)?;
	frame.return_data_buffer = frame.memory.get(offset, len);
	Ok(())
}

pub fn push(frame: &mut Frame, opcode: Opcode) -> Control {
	run(|| {
		let n = opcode.is_push().expect("push opcode") as usize;
		let start = frame.pc + 1;
		let mut bytes = [0u8; 32];
		let available = frame.code.len().saturating_sub(start);
		let copy_len = core::cmp::min(available, n);
		if copy_len > 0 {
			bytes[32 - n..32 - n + copy_len].copy_from_slice(&frame.code[start..start + copy_len]);
		}
		frame.stack.push(Word::from_big_endian(&bytes))
	})
}

pub fn dup(frame: &mut Frame, n: u8) -> Control {
	run(|| frame.stack.dup(n as usize - 1))
}

pub fn swap(frame: &mut Frame, n: u8) -> Control {
	run(|| frame.stack.swap(n as usize))
}

fn as_usize(value: Word) -> Result<usize, ExitError> {
	value.as_usize_checked().ok_or(ExitError::OutOfOffset)
}
