#![doc = include_str!("../../../README.md")]
// first to include the signature! macro
#[macro_use]
mod macros;

mod args;
mod exception;
mod guard;
mod object;
mod policy;
mod signature;
pub mod tracer;
mod types;

pub use crate::{
    args::CallArgs,
    exception::{ArgMismatch, ExcType, Exception, RunResult},
    guard::{StrictFn, strict},
    object::{DictPairs, Object},
    policy::TypePolicy,
    signature::{BoundArguments, Param, Signature, SignatureBuilder},
    tracer::{CallTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
    types::Type,
};
