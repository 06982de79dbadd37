use dropvm_core::{Addr, Word};

/// How a `CREATE` should derive the new contract's address. Only the
/// legacy (sender, nonce) scheme is named by the opcode table this
/// spec implements — no `CREATE2`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CreateScheme {
	Legacy { caller: Addr },
}

/// Which of the four CALL-family opcodes is driving a sub-frame.
/// Controls how the callee's `Context` is built (whose storage it
/// sees, whose balance moves, whether it inherits static-ness).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CallScheme {
	Call,
	CallCode,
	DelegateCall,
	StaticCall,
}

/// The address/caller/value triple a running frame observes through
/// `ADDRESS`/`CALLER`/`CALLVALUE`. Distinct from the code actually
/// being executed: `CALLCODE`/`DELEGATECALL` run the *target's* code
/// against the *caller's* context.
#[derive(Clone, Debug)]
pub struct Context {
	pub address: Addr,
	pub caller: Addr,
	pub apparent_value: Word,
}
