mod mock;

use dropvm::{Driver, EmptyPrecompiles, ExitError, ExitReason, ExitRevert, ExitSucceed, TransactionContext, Word};
use mock::{MockBlock, MockState};
use primitive_types::H160;
use sha3::{Digest, Keccak256};

fn caller() -> H160 {
	H160::from_low_u64_be(1)
}

fn contract() -> H160 {
	H160::from_low_u64_be(2)
}

fn tx() -> TransactionContext {
	TransactionContext {
		origin: caller().into(),
		gas_price: Word::one(),
		gas_limit: 100_000,
	}
}

fn run(state: &mut MockState, code: Vec<u8>, is_static: bool) -> dropvm::ExecutionResult {
	state.deploy(contract().into(), code);
	let block = MockBlock::default();
	let precompiles = EmptyPrecompiles;
	let driver = Driver::new(state, &block, &precompiles, None, tx());
	driver.execute_call(caller().into(), contract().into(), Word::zero(), Vec::new(), is_static)
}

/// `ADD` then `MSTORE`/`RETURN` hands back 32 bytes with low byte 5.
#[test]
fn add_mstore_return() {
	let code = vec![
		0x60, 0x02, // PUSH1 2
		0x60, 0x03, // PUSH1 3
		0x01, // ADD
		0x60, 0x00, // PUSH1 0
		0x52, // MSTORE
		0x60, 0x20, // PUSH1 32
		0x60, 0x00, // PUSH1 0
		0xf3, // RETURN
	];
	let mut state = MockState::default();
	let result = run(&mut state, code, false);

	assert_eq!(result.exit_reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.return_data.len(), 32);
	assert_eq!(result.return_data[31], 5);
	assert!(result.return_data[..31].iter().all(|&b| b == 0));
}

/// `SSTORE` inside a static frame is a fatal-to-the-frame error: halted,
/// drops forfeited, no revert flag.
#[test]
fn sstore_in_static_frame_is_rejected() {
	let code = vec![
		0x60, 0x00, // PUSH1 0 (value)
		0x60, 0x00, // PUSH1 0 (key)
		0x55, // SSTORE
	];
	let mut state = MockState::default();
	let result = run(&mut state, code, true);

	assert_eq!(result.exit_reason, ExitReason::Error(ExitError::StaticCallViolation));
	assert_eq!(result.gas_used, 100_000);
	assert_eq!(result.refund, 0);
}

/// `MSTORE8` then `SHA3` hashes the 32-byte buffer `01 00 ... 00`.
#[test]
fn mstore8_then_sha3() {
	let code = vec![
		0x60, 0x01, // PUSH1 1
		0x60, 0x00, // PUSH1 0
		0x53, // MSTORE8
		0x60, 0x20, // PUSH1 32
		0x60, 0x00, // PUSH1 0
		0x20, // SHA3
		0x60, 0x00, // PUSH1 0
		0x52, // MSTORE
		0x60, 0x20, // PUSH1 32
		0x60, 0x00, // PUSH1 0
		0xf3, // RETURN
	];
	let mut state = MockState::default();
	let result = run(&mut state, code, false);

	let mut expected_input = [0u8; 32];
	expected_input[0] = 1;
	let expected_hash = Keccak256::digest(expected_input);

	assert_eq!(result.exit_reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(&result.return_data[..], expected_hash.as_slice());
}

/// `MSTORE` then `REVERT` halts with the revert flag set and returns the
/// 32-byte value.
#[test]
fn mstore_then_revert() {
	let code = vec![
		0x60, 0x05, // PUSH1 5
		0x60, 0x00, // PUSH1 0
		0x52, // MSTORE
		0x60, 0x20, // PUSH1 32
		0x60, 0x00, // PUSH1 0
		0xfd, // REVERT
	];
	let mut state = MockState::default();
	let result = run(&mut state, code, false);

	assert_eq!(result.exit_reason, ExitReason::Revert(ExitRevert::Reverted));
	assert_eq!(result.return_data.len(), 32);
	assert_eq!(result.return_data[31], 5);
}

/// A `JUMP` target that is byte-for-byte `0x5b` but lies inside a
/// `PUSH32` immediate is not a valid jump destination.
#[test]
fn jump_into_push_immediate_is_invalid() {
	let mut code = vec![0x7f]; // PUSH32
	let mut immediate = [0u8; 32];
	immediate[5] = 0x5b; // looks like JUMPDEST, but it's push data
	code.extend_from_slice(&immediate);
	code.push(0x60); // PUSH1
	code.push(0x06); // the offset of the fake JUMPDEST byte above
	code.push(0x56); // JUMP

	let mut state = MockState::default();
	let result = run(&mut state, code, false);

	assert_eq!(result.exit_reason, ExitReason::Error(ExitError::InvalidJump));
}

/// Clearing a previously non-zero slot to zero charges the reset price
/// and queues exactly one clear refund, visible once enough drops are
/// spent elsewhere in the same call to lift the final-refund cap.
#[test]
fn sstore_clear_refunds() {
	let mut padding = Vec::new();
	for _ in 0..3000 {
		padding.extend_from_slice(&[0x60, 0x01, 0x60, 0x01, 0x01, 0x50]); // PUSH1 1, PUSH1 1, ADD, POP
	}
	let mut code = padding;
	code.extend_from_slice(&[
		0x60, 0x00, // PUSH1 0 (new value)
		0x60, 0x00, // PUSH1 0 (key)
		0x55, // SSTORE
	]);

	let mut state = MockState::default();
	state.deploy(contract().into(), code);
	state.set_storage(contract().into(), Word::zero(), Word::from(7u64));

	let block = MockBlock::default();
	let precompiles = EmptyPrecompiles;
	let mut ctx = tx();
	ctx.gas_limit = 1_000_000;
	let driver = Driver::new(&mut state, &block, &precompiles, None, ctx);
	let result = driver.execute_call(caller().into(), contract().into(), Word::zero(), Vec::new(), false);

	assert_eq!(result.exit_reason, ExitReason::Succeed(ExitSucceed::Stopped));
	assert_eq!(result.refund, 15_000);
}
