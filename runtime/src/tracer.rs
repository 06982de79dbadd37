use dropvm_core::{Opcode, Word};

/// One interpreter step, as observed from the outside. Emitted right
/// before the opcode runs, so `stack_snapshot` and `memory_size`
/// reflect the state the opcode is about to act on.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraceEvent {
	pub pc: usize,
	pub opcode: Opcode,
	pub drops_remaining: u64,
	pub stack_snapshot: Vec<Word>,
	pub memory_size: usize,
	pub hint: Option<&'static str>,
}

/// A step-by-step observer, injected per call rather than reached for
/// through global mutable state — so tracing a frame never requires a
/// thread-local or a process-wide logger to be set up first.
pub trait TracerSink {
	fn trace(&mut self, event: TraceEvent);
}
