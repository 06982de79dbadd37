use super::Control;
use crate::frame::MAX_CALL_DEPTH;
use crate::{CallScheme, Context, CreateScheme, Frame, Handler};
use dropvm_core::{Addr, ExitError, ExitReason, ExitSucceed, Word};
use dropvm_gasometer::{consts, cost};

macro_rules! try_pop {
	($frame:expr) => {
		match $frame.stack.pop() {
			Ok(v) => v,
			Err(e) => return Control::Exit(e.into()),
		}
	};
}

macro_rules! try_charge {
	($frame:expr, $amount:expr) => {
		if let Err(e) = $frame.gasometer.record_cost($amount) {
			return Control::Exit(e.into());
		}
	};
}

macro_rules! try_push {
	($frame:expr, $value:expr) => {
		if let Err(e) = $frame.stack.push($value) {
			return Control::Exit(e.into());
		}
	};
}

fn as_usize(value: Word) -> Result<usize, ExitError> {
	value.as_usize_checked().ok_or(ExitError::OutOfOffset)
}

// --- environment / block, reading straight through the Handler ---

pub fn balance<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_charge!(frame, consts::BALANCE);
	let address = Addr::from(try_pop!(frame));
	try_push!(frame, handler.balance(address));
	Control::Continue
}

pub fn origin<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, Word::from(handler.origin()));
	Control::Continue
}

pub fn gasprice<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, handler.gas_price());
	Control::Continue
}

pub fn extcodesize<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_charge!(frame, consts::EXT_CODE_SIZE);
	let address = Addr::from(try_pop!(frame));
	try_push!(frame, handler.code_size(address));
	Control::Continue
}

pub fn extcodecopy<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	let address = Addr::from(try_pop!(frame));
	let memory_offset = try_pop!(frame);
	let code_offset = try_pop!(frame);
	let len = try_pop!(frame);

	try_charge!(frame, consts::EXT_CODE_COPY);
	match cost::copy_cost(len) {
		Ok(c) => try_charge!(frame, c),
		Err(e) => return Control::Exit(e.into()),
	}

	let code = handler.code(address);
	match frame.memory.copy_large(memory_offset.0, code_offset.0, len.0, &code) {
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn blockhash<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	let number = try_pop!(frame);
	try_push!(frame, handler.block_hash(number));
	Control::Continue
}

pub fn coinbase<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, Word::from(handler.block_coinbase()));
	Control::Continue
}

pub fn timestamp<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, handler.block_timestamp());
	Control::Continue
}

pub fn number<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, handler.block_number());
	Control::Continue
}

pub fn difficulty<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, handler.block_difficulty());
	Control::Continue
}

pub fn gaslimit<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_push!(frame, handler.block_gas_limit());
	Control::Continue
}

// --- storage ---

pub fn sload<H: Handler>(frame: &mut Frame, handler: &H) -> Control {
	try_charge!(frame, consts::SLOAD);
	let index = try_pop!(frame);
	try_push!(frame, handler.storage(frame.context.address, index));
	Control::Continue
}

pub fn sstore<H: Handler>(frame: &mut Frame, handler: &mut H) -> Control {
	let index = try_pop!(frame);
	let new = try_pop!(frame);

	let current = handler.storage(frame.context.address, index);
	let original = handler.original_storage(frame.context.address, index);
	let (charge, refund) = cost::sstore_cost(original, current, new);
	try_charge!(frame, charge);
	frame.gasometer.record_refund(refund);

	handler.set_storage(frame.context.address, index, new);
	Control::Continue
}

// --- misc ---

pub fn gas(frame: &mut Frame) -> Control {
	try_push!(frame, Word::from(frame.gasometer.remaining()));
	Control::Continue
}

pub fn log<H: Handler>(frame: &mut Frame, n: u8, handler: &mut H) -> Control {
	let offset = try_pop!(frame);
	let len = try_pop!(frame);

	match cost::log_cost(n, len) {
		Ok(c) => try_charge!(frame, c),
		Err(e) => return Control::Exit(e.into()),
	}

	let offset = match as_usize(offset) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let len = match as_usize(len) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let data = frame.memory.get(offset, len);

	let mut topics = Vec::with_capacity(n as usize);
	for _ in 0..n {
		topics.push(try_pop!(frame));
	}

	handler.log(frame.context.address, topics, data);
	Control::Continue
}

pub fn suicide<H: Handler>(frame: &mut Frame, handler: &mut H) -> Control {
	let target = Addr::from(try_pop!(frame));

	let balance = handler.balance(frame.context.address);
	let transfers_value = !balance.is_zero();
	let target_is_new = !handler.exists(target);
	try_charge!(frame, cost::suicide_cost(transfers_value, target_is_new));

	if !handler.deleted(frame.context.address) {
		frame.gasometer.record_refund(consts::REFUND_SUICIDE);
	}

	handler.mark_delete(frame.context.address, target);
	Control::Exit(ExitSucceed::Suicided.into())
}

// --- CREATE / CALL family ---

pub fn create<H: Handler>(frame: &mut Frame, handler: &mut H) -> Control {
	let value = try_pop!(frame);
	let code_offset = try_pop!(frame);
	let len = try_pop!(frame);

	try_charge!(frame, cost::create_cost());

	let code_offset = match as_usize(code_offset) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let len = match as_usize(len) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let init_code = frame.memory.get(code_offset, len);

	if frame.depth + 1 > MAX_CALL_DEPTH {
		try_push!(frame, Word::zero());
		return Control::Continue;
	}

	let gas_limit = frame.gasometer.remaining();
	let scheme = CreateScheme::Legacy {
		caller: frame.context.address,
	};
	log::debug!(
		"CREATE sub-frame from {:?} at depth {}, gas_limit={}",
		frame.context.address,
		frame.depth + 1,
		gas_limit
	);
	let (reason, address, _return_data, gas_used) =
		handler.create(frame.context.address, scheme, value, init_code, gas_limit);

	if let ExitReason::Fatal(f) = reason {
		return Control::Exit(f.into());
	}
	try_charge!(frame, gas_used);

	let pushed = match (reason.is_succeed(), address) {
		(true, Some(addr)) => Word::from(addr),
		_ => Word::zero(),
	};
	try_push!(frame, pushed);
	Control::Continue
}

pub fn call<H: Handler>(frame: &mut Frame, scheme: CallScheme, handler: &mut H) -> Control {
	let gas_arg = try_pop!(frame);
	let to = Addr::from(try_pop!(frame));

	let has_value = matches!(scheme, CallScheme::Call | CallScheme::CallCode);
	let value = if has_value { try_pop!(frame) } else { Word::zero() };

	let in_offset = try_pop!(frame);
	let in_len = try_pop!(frame);
	let out_offset = try_pop!(frame);
	let out_len = try_pop!(frame);

	let transfers_value = has_value && !value.is_zero();
	if frame.is_static && scheme == CallScheme::Call && transfers_value {
		return Control::Exit(ExitError::StaticCallViolation.into());
	}

	let target_is_new = !handler.exists(to);
	try_charge!(frame, cost::call_cost(has_value, transfers_value, target_is_new));

	let in_offset_u = match as_usize(in_offset) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let in_len_u = match as_usize(in_len) {
		Ok(v) => v,
		Err(e) => return Control::Exit(e.into()),
	};
	let input = frame.memory.get(in_offset_u, in_len_u);

	if frame.depth + 1 > MAX_CALL_DEPTH {
		try_push!(frame, Word::zero());
		return Control::Continue;
	}

	let available = frame.gasometer.remaining();
	let capped = cost::call_forward_cap(available);
	let requested = if gas_arg.gt(&Word::from(capped)) {
		capped
	} else {
		gas_arg.as_u64()
	};
	let stipend = cost::call_stipend(transfers_value);
	let callee_gas = requested.saturating_add(stipend);

	let context = match scheme {
		CallScheme::Call | CallScheme::StaticCall => Context {
			address: to,
			caller: frame.context.address,
			apparent_value: value,
		},
		CallScheme::CallCode => Context {
			address: frame.context.address,
			caller: frame.context.address,
			apparent_value: value,
		},
		CallScheme::DelegateCall => Context {
			address: frame.context.address,
			caller: frame.context.caller,
			apparent_value: frame.context.apparent_value,
		},
	};
	let is_static = frame.is_static || scheme == CallScheme::StaticCall;

	log::debug!(
		"{:?} sub-frame to {:?} at depth {}, gas={}",
		scheme,
		to,
		frame.depth + 1,
		callee_gas
	);
	let (reason, return_data, gas_used) =
		handler.call(to, context, scheme, value, input, callee_gas, is_static);

	if let ExitReason::Fatal(f) = reason {
		return Control::Exit(f.into());
	}
	try_charge!(frame, core::cmp::min(gas_used, requested));

	frame.return_data_buffer = return_data;
	let copy_len = core::cmp::min(out_len, Word::from(frame.return_data_buffer.len()));
	if let Err(e) = frame
		.memory
		.copy_large(out_offset.0, Word::zero().0, copy_len.0, &frame.return_data_buffer.clone())
	{
		return Control::Exit(e.into());
	}

	try_push!(frame, Word::from_bool(reason.is_succeed()));
	Control::Continue
}
