//! The drop-metered interpreter loop: a [`Frame`]'s stack/memory/PC
//! state, the opcode table dispatch driven by [`interpreter::run`], and
//! the [`Handler`] seam a driver implements to supply account state,
//! block metadata, and nested `CALL`/`CREATE` execution.
//!
//! Sub-calls run synchronously to completion through `Handler::call`/
//! `create` rather than suspending the loop with a continuation — see
//! [`Handler`]'s doc comment for why this crate departs from the
//! upstream interrupt/resume style.

mod context;
mod eval;
mod frame;
mod handler;
pub mod interpreter;
mod tracer;

pub use crate::context::{CallScheme, Context, CreateScheme};
pub use crate::frame::{Frame, MAX_CALL_DEPTH};
pub use crate::handler::Handler;
pub use crate::interpreter::run;
pub use crate::tracer::{TraceEvent, TracerSink};
