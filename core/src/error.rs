use core::fmt;

/// Why execution of a frame stopped. Mirrors the four-way split every
/// caller of the interpreter needs to act on differently: a clean
/// halt commits state, a revert unwinds but returns data, a recoverable
/// error unwinds and burns the frame's remaining drops, and a fatal
/// error means the driver itself cannot continue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitReason {
	Succeed(ExitSucceed),
	Revert(ExitRevert),
	Error(ExitError),
	Fatal(ExitFatal),
}

impl ExitReason {
	/// Whether this reason should persist the frame's state changes.
	pub fn is_succeed(&self) -> bool {
		matches!(self, ExitReason::Succeed(_))
	}
}

impl From<ExitSucceed> for ExitReason {
	fn from(s: ExitSucceed) -> Self {
		ExitReason::Succeed(s)
	}
}

impl From<ExitRevert> for ExitReason {
	fn from(r: ExitRevert) -> Self {
		ExitReason::Revert(r)
	}
}

impl From<ExitError> for ExitReason {
	fn from(e: ExitError) -> Self {
		ExitReason::Error(e)
	}
}

impl From<ExitFatal> for ExitReason {
	fn from(f: ExitFatal) -> Self {
		ExitReason::Fatal(f)
	}
}

/// A clean halt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitSucceed {
	Stopped,
	Returned,
	Suicided,
}

/// Deliberate abort via REVERT — state reverts, but the returned data
/// and the remaining drops are preserved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitRevert {
	Reverted,
}

/// A recoverable execution error: the frame unwinds and forfeits all
/// of its remaining drops, but the caller (and the driver as a whole)
/// keeps running.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitError {
	StackUnderflow,
	StackOverflow,
	InvalidJump,
	InvalidRange,
	DesignatedInvalid,
	CallTooDeep,
	StaticCallViolation,
	CreateCollision,
	CreateContractLimit,
	InvalidCode(crate::Opcode),
	OutOfOffset,
	OutOfGas,
	OutOfFund,
	PCUnderflow,
	/// A `CREATE`'s init code did not fit under the size ceiling.
	CreateEmpty,
	Other(&'static str),
}

impl fmt::Display for ExitError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

impl std::error::Error for ExitError {}

/// An error in the driver itself — no frame can recover from these;
/// execution of the whole call stack halts immediately.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitFatal {
	NotSupported,
	UnhandledInterrupt,
	CallErrorAsFatal(ExitError),
	Other(&'static str),
}

impl fmt::Display for ExitFatal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

impl std::error::Error for ExitFatal {}
