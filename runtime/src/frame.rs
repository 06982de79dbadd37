use crate::Context;
use dropvm_core::{Memory, Stack, Valids, STACK_LIMIT};
use dropvm_gasometer::Gasometer;

/// A CALL/CREATE whose sub-frame would sit above this depth is skipped
/// outright (its opcode pushes `0`) rather than executed.
pub const MAX_CALL_DEPTH: usize = 1024;

/// One level of the call stack: its own code, program counter, stack,
/// memory, drop ledger and the `Context` the running code observes
/// through `ADDRESS`/`CALLER`/`CALLVALUE`. `CALL`/`CREATE`-family
/// opcodes push a new `Frame` and run it to completion synchronously
/// rather than suspending this one.
pub struct Frame {
	pub code: Vec<u8>,
	pub valids: Valids,
	pub pc: usize,
	pub stack: Stack,
	pub memory: Memory,
	pub gasometer: Gasometer,
	pub context: Context,
	pub is_static: bool,
	pub depth: usize,
	/// The input data this frame was invoked with — `CALLDATA*`.
	pub input: Vec<u8>,
	/// Data returned by the most recently completed sub-call, read by
	/// `RETURNDATASIZE`/`RETURNDATACOPY`.
	pub return_data_buffer: Vec<u8>,
}

impl Frame {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		code: Vec<u8>,
		input: Vec<u8>,
		context: Context,
		gas_limit: u64,
		memory_limit: usize,
		is_static: bool,
		depth: usize,
	) -> Self {
		let valids = Valids::new(&code);
		Self {
			code,
			valids,
			pc: 0,
			stack: Stack::new(STACK_LIMIT),
			memory: Memory::new(memory_limit),
			gasometer: Gasometer::new(gas_limit),
			context,
			is_static,
			depth,
			input,
			return_data_buffer: Vec::new(),
		}
	}

	#[inline]
	pub fn current_opcode(&self) -> Option<dropvm_core::Opcode> {
		self.code.get(self.pc).copied().map(dropvm_core::Opcode)
	}
}
