//! `dropvm`: a stack-based virtual machine that executes smart-contract
//! bytecode against a drop-denominated resource model, built from the
//! three lower layers:
//!
//! - [`dropvm_core`] — words, the opcode table, stack and memory.
//! - [`dropvm_gasometer`] — the drop cost schedule and refund ledger.
//! - [`dropvm_runtime`] — the frame and interpreter loop, and the
//!   [`Handler`] seam it calls out through for state and sub-calls.
//!
//! This crate supplies that seam: [`oracle`]'s [`StateOracle`]/
//! [`BlockOracle`] traits a host implements over its own world state,
//! [`precompile`]'s registry for addresses that bypass bytecode
//! entirely, and [`Driver`], which ties a frame, an oracle pair and a
//! precompile registry together into the top-level entry points
//! [`Driver::execute_call`] and [`Driver::execute_create`].

mod driver;
mod oracle;
mod precompile;

pub use driver::{Driver, ExecutionResult, LogRecord};
pub use oracle::{BlockOracle, StateOracle, TransactionContext};
pub use precompile::{EmptyPrecompiles, IdentityPrecompile, Precompile, PrecompileRegistry, StandardPrecompiles};

pub use dropvm_core::{
	Addr, ExitError, ExitFatal, ExitReason, ExitRevert, ExitSucceed, Opcode, Word,
};
pub use dropvm_runtime::{CallScheme, Context, CreateScheme, Handler, TraceEvent, TracerSink};
