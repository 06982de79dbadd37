use crate::tracer::TracerSink;
use crate::{CallScheme, Context, CreateScheme};
use dropvm_core::{Addr, ExitReason, Word};

/// Everything a frame needs from the outside world: account and
/// storage state, block metadata, and the ability to recurse into a
/// sub-frame for `CREATE`/`CALL`-family opcodes.
///
/// Every method here is synchronous — a sub-call runs to completion
/// before `call`/`create` return, instead of suspending the
/// interpreter with a continuation the driver must later resume with
/// feedback. That departs from the CPS/interrupt style the upstream
/// handler trait uses; see the crate-level docs for why.
pub trait Handler {
	fn balance(&self, address: Addr) -> Word;
	fn code_size(&self, address: Addr) -> Word;
	fn code_hash(&self, address: Addr) -> Word;
	fn code(&self, address: Addr) -> Vec<u8>;
	fn storage(&self, address: Addr, index: Word) -> Word;
	fn original_storage(&self, address: Addr, index: Word) -> Word;
	fn exists(&self, address: Addr) -> bool;
	fn deleted(&self, address: Addr) -> bool;

	fn gas_price(&self) -> Word;
	fn origin(&self) -> Addr;
	fn block_hash(&self, number: Word) -> Word;
	fn block_number(&self) -> Word;
	fn block_coinbase(&self) -> Addr;
	fn block_timestamp(&self) -> Word;
	fn block_difficulty(&self) -> Word;
	fn block_gas_limit(&self) -> Word;

	fn set_storage(&mut self, address: Addr, index: Word, value: Word);
	fn log(&mut self, address: Addr, topics: Vec<Word>, data: Vec<u8>);
	fn mark_delete(&mut self, address: Addr, target: Addr);

	/// Run `CREATE` to completion against fresh init code, returning
	/// the exit reason, the new contract's address (`None` if
	/// creation failed before an address could be assigned), any
	/// returned data (revert data, typically), and how many of the
	/// `target_gas` drops the sub-frame actually consumed — the caller
	/// credits the rest back to its own ledger.
	fn create(
		&mut self,
		caller: Addr,
		scheme: CreateScheme,
		value: Word,
		init_code: Vec<u8>,
		target_gas: u64,
	) -> (ExitReason, Option<Addr>, Vec<u8>, u64);

	/// Run a CALL-family sub-frame (or a precompile, transparently) to
	/// completion, returning the exit reason, returned data, and drops
	/// consumed (see [`Handler::create`]).
	#[allow(clippy::too_many_arguments)]
	fn call(
		&mut self,
		code_address: Addr,
		context: Context,
		scheme: CallScheme,
		value: Word,
		input: Vec<u8>,
		target_gas: u64,
		is_static: bool,
	) -> (ExitReason, Vec<u8>, u64);

	/// The step observer for this call tree, if any. Returning a
	/// reborrow of a field here (rather than threading a second
	/// argument through `interpreter::run`) is what lets a tracer
	/// follow execution across nested CALL/CREATE frames without the
	/// driver needing a thread-local or other global.
	fn tracer(&mut self) -> Option<&mut dyn TracerSink> {
		None
	}
}
