use std::collections::BTreeMap;

use dropvm::{Addr, BlockOracle, StateOracle, Word};

#[derive(Default, Clone, Debug)]
pub struct MockAccount {
	pub balance: Word,
	pub code: Vec<u8>,
	pub storage: BTreeMap<Word, Word>,
}

#[derive(Clone, Debug, Default)]
pub struct MockState {
	pub accounts: BTreeMap<Addr, MockAccount>,
	next_nonce: BTreeMap<Addr, u64>,
}

impl MockState {
	pub fn deploy(&mut self, address: Addr, code: Vec<u8>) {
		self.accounts.entry(address).or_default().code = code;
	}

	pub fn fund(&mut self, address: Addr, balance: Word) {
		self.accounts.entry(address).or_default().balance = balance;
	}

	pub fn set_storage(&mut self, address: Addr, key: Word, value: Word) {
		self.accounts.entry(address).or_default().storage.insert(key, value);
	}
}

impl StateOracle for MockState {
	fn get_balance(&self, address: Addr) -> Word {
		self.accounts.get(&address).map(|a| a.balance).unwrap_or_else(Word::zero)
	}

	fn get_code(&self, address: Addr) -> Vec<u8> {
		self.accounts.get(&address).map(|a| a.code.clone()).unwrap_or_default()
	}

	fn get_code_size(&self, address: Addr) -> Word {
		Word::from(self.get_code(address).len() as u64)
	}

	fn account_exists(&self, address: Addr) -> bool {
		self.accounts.contains_key(&address)
	}

	fn storage_load(&self, owner: Addr, key: Word) -> Option<Word> {
		self.accounts.get(&owner).and_then(|a| a.storage.get(&key)).copied()
	}

	fn storage_save(&mut self, owner: Addr, key: Word, value: Word) {
		self.accounts.entry(owner).or_default().storage.insert(key, value);
	}

	fn transfer(&mut self, from: Addr, to: Addr, value: Word) {
		{
			let from_account = self.accounts.entry(from).or_default();
			from_account.balance = Word(from_account.balance.0 - value.0);
		}
		let to_account = self.accounts.entry(to).or_default();
		to_account.balance = Word(to_account.balance.0 + value.0);
	}

	fn create_account(&mut self, address: Addr, code: Vec<u8>) {
		self.accounts.entry(address).or_default().code = code;
	}

	fn suicide(&mut self, owner: Addr, beneficiary: Addr) {
		let balance = self.get_balance(owner);
		if !balance.is_zero() {
			self.transfer(owner, beneficiary, balance);
		}
		self.accounts.remove(&owner);
	}

	fn next_create_address(&mut self, creator: Addr) -> Addr {
		let nonce = self.next_nonce.entry(creator).or_insert(0);
		let mut bytes = [0u8; 20];
		bytes[0..8].copy_from_slice(creator.as_bytes().get(0..8).unwrap_or(&[0u8; 8]));
		bytes[12..20].copy_from_slice(&nonce.to_be_bytes());
		*nonce += 1;
		Addr::from(primitive_types::H160::from(bytes))
	}
}

#[derive(Clone, Debug, Default)]
pub struct MockBlock;

impl BlockOracle for MockBlock {
	fn block_hash(&self, _number: Word) -> Word {
		Word::zero()
	}

	fn coinbase(&self) -> Addr {
		Addr::zero()
	}

	fn timestamp(&self) -> Word {
		Word::zero()
	}

	fn number(&self) -> Word {
		Word::zero()
	}

	fn difficulty(&self) -> Word {
		Word::zero()
	}

	fn gas_limit(&self) -> Word {
		Word::from(30_000_000u64)
	}
}
