use std::collections::{BTreeMap, BTreeSet};

use dropvm_core::{Addr, ExitError, ExitReason, ExitSucceed, Word};
use dropvm_runtime::{CallScheme, Context, CreateScheme, Frame, Handler, TracerSink};
use sha3::{Digest, Keccak256};

use crate::oracle::{BlockOracle, StateOracle, TransactionContext};
use crate::precompile::PrecompileRegistry;

/// Half of a frame's consumed drops is the maximum refund it can claim
/// back, the Frontier-era rule (later hard-forks tighten this divisor).
const MAX_REFUND_DIVISOR: u64 = 2;

/// Hard ceiling on memory growth for any one frame, matching the
/// 2^31-1-byte `MemoryOverflow` bound spec.md's `memExp` rule names.
const MEMORY_LIMIT: usize = (1usize << 31) - 1;

#[derive(Clone, Debug)]
pub struct LogRecord {
	pub address: Addr,
	pub topics: Vec<Word>,
	pub data: Vec<u8>,
}

/// Everything the host needs back from a top-level CALL or CREATE:
/// the result surface named in spec.md §6.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
	pub exit_reason: ExitReason,
	pub return_data: Vec<u8>,
	pub created_address: Option<Addr>,
	pub gas_used: u64,
	pub refund: u64,
	pub logs: Vec<LogRecord>,
	pub touched_accounts: BTreeSet<Addr>,
}

/// Drives a frame (and any CALL/CREATE sub-frames it spawns) against a
/// world-state oracle, a block oracle and a precompile registry. Also
/// implements [`Handler`], since recursing into a sub-frame is just
/// constructing a fresh [`Frame`] and calling
/// `dropvm_runtime::interpreter::run` again.
pub struct Driver<'a, S, B, P> {
	state: &'a mut S,
	block: &'a B,
	precompiles: &'a P,
	tracer: Option<&'a mut dyn TracerSink>,
	tx: TransactionContext,
	depth: usize,
	touched: BTreeSet<Addr>,
	logs: Vec<LogRecord>,
	/// The driven frame's final, already-capped refund, stashed by
	/// `run_call`/`run_create` right after the frame halts.
	last_refund: u64,
	/// Each slot's value the first time this call writes it — what
	/// SSTORE's refund accounting means by "original", as distinct
	/// from the oracle's live value once this call has written it one
	/// or more times already. Populated lazily by `set_storage`.
	original_storage_cache: BTreeMap<(Addr, Word), Word>,
}

impl<'a, S, B, P> Driver<'a, S, B, P>
where
	S: StateOracle,
	B: BlockOracle,
	P: PrecompileRegistry,
{
	pub fn new(
		state: &'a mut S,
		block: &'a B,
		precompiles: &'a P,
		tracer: Option<&'a mut dyn TracerSink>,
		tx: TransactionContext,
	) -> Self {
		Self {
			state,
			block,
			precompiles,
			tracer,
			tx,
			depth: 0,
			touched: BTreeSet::new(),
			logs: Vec::new(),
			last_refund: 0,
			original_storage_cache: BTreeMap::new(),
		}
	}

	/// Run a top-level message call against `target`.
	pub fn execute_call(
		mut self,
		caller: Addr,
		target: Addr,
		value: Word,
		input: Vec<u8>,
		is_static: bool,
	) -> ExecutionResult {
		let gas_limit = self.tx.gas_limit;
		let (reason, data, gas_used) = self.run_call(
			target,
			Context {
				address: target,
				caller,
				apparent_value: value,
			},
			CallScheme::Call,
			value,
			input,
			gas_limit,
			is_static,
		);
		self.finish(reason, data, None, gas_used)
	}

	/// Run a top-level contract creation.
	pub fn execute_create(mut self, caller: Addr, value: Word, init_code: Vec<u8>) -> ExecutionResult {
		let gas_limit = self.tx.gas_limit;
		let scheme = CreateScheme::Legacy { caller };
		let (reason, address, data, gas_used) = self.run_create(caller, scheme, value, init_code, gas_limit);
		self.finish(reason, data, address, gas_used)
	}

	fn finish(
		self,
		exit_reason: ExitReason,
		return_data: Vec<u8>,
		created_address: Option<Addr>,
		gas_used: u64,
	) -> ExecutionResult {
		let refund = if exit_reason.is_succeed() { self.last_refund } else { 0 };
		let logs = if exit_reason.is_succeed() { self.logs } else { Vec::new() };
		ExecutionResult {
			exit_reason,
			return_data,
			created_address,
			gas_used,
			refund,
			logs,
			touched_accounts: self.touched,
		}
	}

	fn run_create(
		&mut self,
		caller: Addr,
		scheme: CreateScheme,
		value: Word,
		init_code: Vec<u8>,
		target_gas: u64,
	) -> (ExitReason, Option<Addr>, Vec<u8>, u64) {
		let CreateScheme::Legacy { .. } = scheme;

		let new_address = self.state.next_create_address(caller);
		self.touched.insert(new_address);
		if self.state.account_exists(new_address) {
			return (ExitError::CreateCollision.into(), None, Vec::new(), 0);
		}
		if self.state.get_balance(caller).lt(&value) {
			return (ExitError::OutOfFund.into(), None, Vec::new(), 0);
		}
		if !value.is_zero() {
			self.state.transfer(caller, new_address, value);
		}

		let context = Context {
			address: new_address,
			caller,
			apparent_value: value,
		};
		let mut frame = Frame::new(init_code, Vec::new(), context, target_gas, MEMORY_LIMIT, false, self.depth);

		self.depth += 1;
		let reason = dropvm_runtime::interpreter::run(&mut frame, self);
		self.depth -= 1;
		let gas_used = frame.gasometer.used();
		self.last_refund = frame.gasometer.final_refund(MAX_REFUND_DIVISOR);

		match reason {
			ExitReason::Succeed(ExitSucceed::Returned) => {
				self.state.create_account(new_address, frame.return_data_buffer.clone());
				(reason, Some(new_address), frame.return_data_buffer, gas_used)
			}
			ExitReason::Succeed(_) => (reason, Some(new_address), Vec::new(), gas_used),
			_ => (reason, None, frame.return_data_buffer, gas_used),
		}
	}

	#[allow(clippy::too_many_arguments)]
	fn run_call(
		&mut self,
		code_address: Addr,
		context: Context,
		scheme: CallScheme,
		value: Word,
		input: Vec<u8>,
		target_gas: u64,
		is_static: bool,
	) -> (ExitReason, Vec<u8>, u64) {
		self.touched.insert(code_address);

		if let Some(precompile) = self.precompiles.lookup(code_address) {
			return match precompile.execute(&input, target_gas) {
				Ok((output, gas_used)) => (ExitSucceed::Returned.into(), output, gas_used),
				Err(()) => (ExitError::OutOfGas.into(), Vec::new(), target_gas),
			};
		}

		if scheme == CallScheme::Call && !value.is_zero() {
			if self.state.get_balance(context.caller).lt(&value) {
				return (ExitError::OutOfFund.into(), Vec::new(), 0);
			}
			self.state.transfer(context.caller, code_address, value);
		}

		let code = self.state.get_code(code_address);
		let mut frame = Frame::new(code, input, context, target_gas, MEMORY_LIMIT, is_static, self.depth);

		self.depth += 1;
		let reason = dropvm_runtime::interpreter::run(&mut frame, self);
		self.depth -= 1;
		let gas_used = frame.gasometer.used();
		self.last_refund = frame.gasometer.final_refund(MAX_REFUND_DIVISOR);

		(reason, frame.return_data_buffer, gas_used)
	}
}

impl<'a, S, B, P> Handler for Driver<'a, S, B, P>
where
	S: StateOracle,
	B: BlockOracle,
	P: PrecompileRegistry,
{
	fn balance(&self, address: Addr) -> Word {
		self.state.get_balance(address)
	}

	fn code_size(&self, address: Addr) -> Word {
		self.state.get_code_size(address)
	}

	fn code_hash(&self, address: Addr) -> Word {
		let code = self.state.get_code(address);
		Word::from_big_endian(&Keccak256::digest(&code))
	}

	fn code(&self, address: Addr) -> Vec<u8> {
		self.state.get_code(address)
	}

	fn storage(&self, address: Addr, index: Word) -> Word {
		self.state.storage_load(address, index).unwrap_or_else(Word::zero)
	}

	fn original_storage(&self, address: Addr, index: Word) -> Word {
		self.original_storage_cache
			.get(&(address, index))
			.copied()
			.unwrap_or_else(|| self.state.storage_load(address, index).unwrap_or_else(Word::zero))
	}

	fn exists(&self, address: Addr) -> bool {
		self.state.account_exists(address)
	}

	fn deleted(&self, address: Addr) -> bool {
		!self.state.account_exists(address)
	}

	fn gas_price(&self) -> Word {
		self.tx.gas_price
	}

	fn origin(&self) -> Addr {
		self.tx.origin
	}

	fn block_hash(&self, number: Word) -> Word {
		self.block.block_hash(number)
	}

	fn block_number(&self) -> Word {
		self.block.number()
	}

	fn block_coinbase(&self) -> Addr {
		self.block.coinbase()
	}

	fn block_timestamp(&self) -> Word {
		self.block.timestamp()
	}

	fn block_difficulty(&self) -> Word {
		self.block.difficulty()
	}

	fn block_gas_limit(&self) -> Word {
		self.block.gas_limit()
	}

	fn set_storage(&mut self, address: Addr, index: Word, value: Word) {
		self.touched.insert(address);
		self.original_storage_cache
			.entry((address, index))
			.or_insert_with(|| self.state.storage_load(address, index).unwrap_or_else(Word::zero));
		self.state.storage_save(address, index, value);
	}

	fn log(&mut self, address: Addr, topics: Vec<Word>, data: Vec<u8>) {
		log::trace!("LOG from {:?}: {} topics, {} bytes", address, topics.len(), data.len());
		self.logs.push(LogRecord { address, topics, data });
	}

	fn mark_delete(&mut self, address: Addr, target: Addr) {
		self.touched.insert(target);
		self.state.suicide(address, target);
	}

	fn create(
		&mut self,
		caller: Addr,
		scheme: CreateScheme,
		value: Word,
		init_code: Vec<u8>,
		target_gas: u64,
	) -> (ExitReason, Option<Addr>, Vec<u8>, u64) {
		// `eval::system::create` already turned away anything past
		// `MAX_CALL_DEPTH` before calling us; no depth check needed here.
		log::debug!("CREATE from {:?}, {} bytes of init code", caller, init_code.len());
		self.run_create(caller, scheme, value, init_code, target_gas)
	}

	fn call(
		&mut self,
		code_address: Addr,
		context: Context,
		scheme: CallScheme,
		value: Word,
		input: Vec<u8>,
		target_gas: u64,
		is_static: bool,
	) -> (ExitReason, Vec<u8>, u64) {
		// `eval::system::call` already turned away anything past
		// `MAX_CALL_DEPTH` before calling us; no depth check needed here.
		log::debug!("CALL {:?} -> {:?} ({:?})", context.caller, code_address, scheme);
		self.run_call(code_address, context, scheme, value, input, target_gas, is_static)
	}

	fn tracer(&mut self) -> Option<&mut dyn TracerSink> {
		self.tracer.as_deref_mut()
	}
}
