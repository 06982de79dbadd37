mod pure_ops;
mod system;

use crate::{CallScheme, Frame, Handler};
use dropvm_core::{ExitReason, ExitSucceed, Opcode};

/// What a single opcode step did to control flow.
pub enum Control {
	/// Execution continues at the next instruction (PC advances past
	/// this opcode, skipping a PUSH's immediate bytes if any).
	Continue,
	/// `JUMP`/taken `JUMPI`: PC is set directly to the given position.
	Jump(usize),
	/// The frame is done, one way or another.
	Exit(ExitReason),
}

impl From<Result<(), dropvm_core::ExitError>> for Control {
	fn from(r: Result<(), dropvm_core::ExitError>) -> Self {
		match r {
			Ok(()) => Control::Continue,
			Err(e) => Control::Exit(e.into()),
		}
	}
}

/// Dispatch one opcode to its implementation. Arity, static-call and
/// base-tier cost have already been checked/charged by
/// [`crate::interpreter::step`]; this only runs the opcode's own
/// semantics (and, for opcodes with a data-dependent surcharge —
/// SHA3, the copy family, SSTORE, LOGn, EXP, CALL/CREATE, SUICIDE —
/// charges that surcharge itself before acting on it).
pub fn eval<H: Handler>(frame: &mut Frame, opcode: Opcode, handler: &mut H) -> Control {
	use pure_ops as p;

	if opcode.is_push().is_some() {
		return p::push(frame, opcode);
	}
	if let Some(n) = opcode.is_dup() {
		return p::dup(frame, n);
	}
	if let Some(n) = opcode.is_swap() {
		return p::swap(frame, n);
	}
	if let Some(n) = opcode.is_log() {
		return system::log(frame, n, handler);
	}

	match opcode {
		Opcode::STOP => Control::Exit(ExitSucceed::Stopped.into()),
		Opcode::ADD => p::add(frame),
		Opcode::MUL => p::mul(frame),
		Opcode::SUB => p::sub(frame),
		Opcode::DIV => p::div(frame),
		Opcode::SDIV => p::sdiv(frame),
		Opcode::MOD => p::op_mod(frame),
		Opcode::SMOD => p::smod(frame),
		Opcode::ADDMOD => p::addmod(frame),
		Opcode::MULMOD => p::mulmod(frame),
		Opcode::EXP => p::exp(frame),
		Opcode::SIGNEXTEND => p::signextend(frame),

		Opcode::LT => p::lt(frame),
		Opcode::GT => p::gt(frame),
		Opcode::SLT => p::slt(frame),
		Opcode::SGT => p::sgt(frame),
		Opcode::EQ => p::eq(frame),
		Opcode::ISZERO => p::iszero(frame),
		Opcode::AND => p::and(frame),
		Opcode::OR => p::or(frame),
		Opcode::XOR => p::xor(frame),
		Opcode::NOT => p::not(frame),
		Opcode::BYTE => p::byte(frame),

		Opcode::SHA3 => p::sha3(frame),

		Opcode::ADDRESS => p::address(frame),
		Opcode::CALLER => p::caller(frame),
		Opcode::CALLVALUE => p::callvalue(frame),
		Opcode::CALLDATALOAD => p::calldataload(frame),
		Opcode::CALLDATASIZE => p::calldatasize(frame),
		Opcode::CALLDATACOPY => p::calldatacopy(frame),
		Opcode::CODESIZE => p::codesize(frame),
		Opcode::CODECOPY => p::codecopy(frame),
		Opcode::RETURNDATASIZE => p::returndatasize(frame),
		Opcode::RETURNDATACOPY => p::returndatacopy(frame),

		Opcode::POP => p::pop(frame),
		Opcode::MLOAD => p::mload(frame),
		Opcode::MSTORE => p::mstore(frame),
		Opcode::MSTORE8 => p::mstore8(frame),
		Opcode::PC => p::pc(frame),
		Opcode::MSIZE => p::msize(frame),
		Opcode::JUMPDEST => Control::Continue,
		Opcode::JUMP => p::jump(frame),
		Opcode::JUMPI => p::jumpi(frame),

		Opcode::RETURN => p::ret(frame),
		Opcode::REVERT => p::revert(frame),
		Opcode::INVALID => Control::Exit(dropvm_core::ExitError::DesignatedInvalid.into()),

		Opcode::BALANCE => system::balance(frame, handler),
		Opcode::ORIGIN => system::origin(frame, handler),
		Opcode::GASPRICE => system::gasprice(frame, handler),
		Opcode::EXTCODESIZE => system::extcodesize(frame, handler),
		Opcode::EXTCODECOPY => system::extcodecopy(frame, handler),
		Opcode::BLOCKHASH => system::blockhash(frame, handler),
		Opcode::COINBASE => system::coinbase(frame, handler),
		Opcode::TIMESTAMP => system::timestamp(frame, handler),
		Opcode::NUMBER => system::number(frame, handler),
		Opcode::DIFFICULTY => system::difficulty(frame, handler),
		Opcode::GASLIMIT => system::gaslimit(frame, handler),
		Opcode::SLOAD => system::sload(frame, handler),
		Opcode::SSTORE => system::sstore(frame, handler),
		Opcode::GAS => system::gas(frame),
		Opcode::SUICIDE => system::suicide(frame, handler),
		Opcode::CREATE => system::create(frame, handler),
		Opcode::CALL => system::call(frame, CallScheme::Call, handler),
		Opcode::CALLCODE => system::call(frame, CallScheme::CallCode, handler),
		Opcode::DELEGATECALL => system::call(frame, CallScheme::DelegateCall, handler),
		Opcode::STATICCALL => system::call(frame, CallScheme::StaticCall, handler),

		_ => Control::Exit(dropvm_core::ExitError::Other("undefined opcode").into()),
	}
}
