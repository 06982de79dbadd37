use dropvm_core::{Addr, Word};

/// The persistent world-state store: balances, code and storage trees.
/// Consumed by the driver, never touched directly by the interpreter.
/// Writes are expected to be buffered per top-level call so that a
/// reverting frame can discard them atomically (see spec §5).
pub trait StateOracle {
	fn get_balance(&self, address: Addr) -> Word;
	fn get_code(&self, address: Addr) -> Vec<u8>;
	fn get_code_size(&self, address: Addr) -> Word;
	fn account_exists(&self, address: Addr) -> bool;

	/// `None` distinguishes an absent slot from one explicitly set to
	/// zero, needed for SSTORE's "original value observed this call"
	/// refund accounting.
	fn storage_load(&self, owner: Addr, key: Word) -> Option<Word>;
	fn storage_save(&mut self, owner: Addr, key: Word, value: Word);

	/// Move `value` drops of native balance from `from` to `to`.
	fn transfer(&mut self, from: Addr, to: Addr, value: Word);

	/// Reserve `address` with freshly deployed `code` — the tail end of
	/// a successful CREATE.
	fn create_account(&mut self, address: Addr, code: Vec<u8>);

	/// Mark `owner` for deletion with its remaining balance moved to
	/// `beneficiary`. The actual removal happens once the top-level
	/// call commits, mirroring SUICIDE's end-of-transaction semantics.
	fn suicide(&mut self, owner: Addr, beneficiary: Addr);

	/// Allocate a fresh contract address for a CREATE from `creator`,
	/// e.g. `keccak(rlp(creator, nonce))`'s low 20 bytes. Left to the
	/// oracle since nonce tracking lives in world-state, not the VM.
	fn next_create_address(&mut self, creator: Addr) -> Addr;
}

/// Block header data, read by BLOCKHASH/COINBASE/TIMESTAMP/NUMBER/
/// DIFFICULTY/GASLIMIT.
pub trait BlockOracle {
	fn block_hash(&self, number: Word) -> Word;
	fn coinbase(&self) -> Addr;
	fn timestamp(&self) -> Word;
	fn number(&self) -> Word;
	fn difficulty(&self) -> Word;
	fn gas_limit(&self) -> Word;
}

/// Everything a top-level call needs beyond the code itself:
/// transaction-scoped fields that don't change as execution recurses
/// into sub-frames.
#[derive(Clone, Debug)]
pub struct TransactionContext {
	pub origin: Addr,
	pub gas_price: Word,
	pub gas_limit: u64,
}
