use crate::eval::{self, Control};
use crate::tracer::{TraceEvent, TracerSink};
use crate::{Frame, Handler};
use dropvm_core::{ExitError, ExitReason, ExitSucceed, Opcode, Tier};
use dropvm_gasometer::memory as gas_memory;

/// Drive `frame` to completion against `handler`, one opcode at a
/// time. CALL/CREATE opcodes recurse into a fresh sub-`Frame`
/// synchronously through `handler.call`/`handler.create` rather than
/// suspending this loop. Each step is reported to `handler.tracer()`,
/// if it returns one.
pub fn run<H: Handler>(frame: &mut Frame, handler: &mut H) -> ExitReason {
	loop {
		if let Err(reason) = step(frame, handler) {
			if matches!(reason, ExitReason::Error(_) | ExitReason::Fatal(_)) {
				log::warn!("frame at depth {} exited with {:?}", frame.depth, reason);
			}
			if matches!(reason, ExitReason::Error(_)) {
				frame.gasometer.forfeit();
			}
			return reason;
		}
	}
}

/// Execute exactly one opcode: validate arity and the static-call
/// restriction, charge its base tier and any memory expansion, then
/// dispatch to [`eval::eval`] for the opcode's own semantics (and any
/// data-dependent surcharge it charges itself).
fn step<H: Handler>(frame: &mut Frame, handler: &mut H) -> Result<(), ExitReason> {
	let opcode = match frame.current_opcode() {
		Some(opcode) => opcode,
		None => return Err(ExitSucceed::Stopped.into()),
	};

	let info = opcode
		.info()
		.ok_or_else(|| ExitReason::from(ExitError::InvalidCode(opcode)))?;

	log::trace!("pc={} depth={} op={:?}", frame.pc, frame.depth, opcode);

	if (frame.stack.len() as u16) < info.input {
		return Err(ExitError::StackUnderflow.into());
	}
	let net_push = info.output as i64 - info.input as i64;
	if net_push > 0 && frame.stack.len() as i64 + net_push > frame.stack.limit() as i64 {
		return Err(ExitError::StackOverflow.into());
	}

	if frame.is_static && info.flags.modifies_state {
		return Err(ExitError::StaticCallViolation.into());
	}

	if info.tier != Tier::Special {
		frame.gasometer.record_cost(info.tier.cost())?;
	}

	let current_words = frame.memory.len() / 32;
	let required_words = gas_memory::words_required(opcode, &frame.stack, current_words)?;
	if required_words > current_words {
		log::debug!("op={:?} grows memory {}..{} words", opcode, current_words, required_words);
		frame.gasometer.record_memory_expansion(required_words)?;
		frame.memory.resize(required_words * 32)?;
	}

	if let Some(sink) = handler.tracer() {
		sink.trace(TraceEvent {
			pc: frame.pc,
			opcode,
			drops_remaining: frame.gasometer.remaining(),
			stack_snapshot: frame.stack.data().to_vec(),
			memory_size: frame.memory.len(),
			hint: None,
		});
	}

	match eval::eval(frame, opcode, handler) {
		Control::Continue => {
			advance_pc(frame, opcode);
			Ok(())
		}
		Control::Jump(dest) => {
			frame.pc = dest;
			Ok(())
		}
		Control::Exit(reason) => Err(reason),
	}
}

fn advance_pc(frame: &mut Frame, opcode: Opcode) {
	match opcode.is_push() {
		Some(n) => frame.pc += 1 + n as usize,
		None => frame.pc += 1,
	}
}
