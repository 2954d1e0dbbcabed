//! Call tracing infrastructure.
//!
//! The [`CallTracer`] trait defines hook points for each phase of a guarded call:
//! binding, default application, type checks, and invocation of the body.
//! [`StrictFn::call`](crate::StrictFn::call) uses [`NoopTracer`], whose hooks compile
//! away entirely via monomorphization. Pass another tracer to
//! [`StrictFn::call_traced`](crate::StrictFn::call_traced) to observe a call:
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default) |
//! | [`StderrTracer`] | Human-readable log on stderr |
//! | [`RecordingTracer`] | Full event recording for assertions or post-mortem |
//!
//! ```
//! use strictcall::{CallArgs, RecordingTracer, TraceEvent, signature, strict};
//!
//! let double = strict(signature!(double(x: Int)).unwrap(), |args| Ok((args.int("x")? * 2).into()));
//! let mut tracer = RecordingTracer::new();
//! double.call_traced(CallArgs::new().arg(4), &mut tracer).unwrap();
//! assert!(matches!(tracer.events().last(), Some(TraceEvent::Return { .. })));
//! ```

use crate::{
    exception::Exception,
    object::Object,
    signature::BoundArguments,
    types::Type,
};

/// Trace event emitted during a guarded call.
///
/// Used by [`RecordingTracer`] to capture every step of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// The supplied arguments were bound (before defaults).
    Bind {
        func_name: String,
        /// Names that received a caller-supplied value, in parameter order.
        bound: Vec<String>,
    },
    /// A parameter received its default value.
    Default { func_name: String, param: String },
    /// A declared type was checked.
    Check {
        func_name: String,
        param: String,
        expected: Type,
        actual: Type,
        passed: bool,
    },
    /// All checks passed and the body is about to run.
    Invoke { func_name: String },
    /// The body returned a value.
    Return { func_name: String, repr: String },
    /// The call failed, in the guard or in the body.
    Error { func_name: String, error: Exception },
}

/// Trait for call tracing.
///
/// All methods have default no-op implementations, so [`NoopTracer`] requires
/// zero lines of code. Implementations only override the hooks they care about.
pub trait CallTracer: std::fmt::Debug {
    /// Called after binding succeeds, with only the caller-supplied values.
    #[inline(always)]
    fn on_bind(&mut self, _func_name: &str, _bound: &BoundArguments) {}

    /// Called for each parameter filled from its default.
    #[inline(always)]
    fn on_default(&mut self, _func_name: &str, _param: &str, _value: &Object) {}

    /// Called for each parameter with a declared type, whether or not the check passed.
    #[inline(always)]
    fn on_check(&mut self, _func_name: &str, _param: &str, _expected: Type, _actual: Type, _passed: bool) {}

    /// Called right before the wrapped body runs.
    #[inline(always)]
    fn on_invoke(&mut self, _func_name: &str) {}

    /// Called when the body returns successfully.
    #[inline(always)]
    fn on_return(&mut self, _func_name: &str, _result: &Object) {}

    /// Called when the call fails at any stage.
    #[inline(always)]
    fn on_error(&mut self, _func_name: &str, _error: &Exception) {}
}

// ============================================================================
// NoopTracer
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl CallTracer for NoopTracer {}

// ============================================================================
// StderrTracer
// ============================================================================

/// Tracer that prints a human-readable log of each call to stderr.
///
/// Output format:
/// ```text
///   >>> BIND sum            a=1
///       DEFAULT sum.b       = 0
///       CHECK sum.a         int ok
///       CHECK sum.b         int ok
///   >>> CALL sum
///   <<< RETURN sum          1
/// ```
#[derive(Debug, Clone, Default)]
pub struct StderrTracer {
    /// Only report failures (type check misses and errors).
    failures_only: bool,
}

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failures_only() -> Self {
        Self { failures_only: true }
    }
}

impl CallTracer for StderrTracer {
    fn on_bind(&mut self, func_name: &str, bound: &BoundArguments) {
        if self.failures_only {
            return;
        }
        let args: Vec<String> = bound.iter().map(|(k, v)| format!("{k}={}", v.py_repr())).collect();
        eprintln!("  >>> BIND {func_name:<15} {}", args.join(", "));
    }

    fn on_default(&mut self, func_name: &str, param: &str, value: &Object) {
        if !self.failures_only {
            eprintln!("      DEFAULT {:<15} = {}", format!("{func_name}.{param}"), value.py_repr());
        }
    }

    fn on_check(&mut self, func_name: &str, param: &str, expected: Type, actual: Type, passed: bool) {
        let qualified = format!("{func_name}.{param}");
        if passed {
            if !self.failures_only {
                eprintln!("      CHECK {qualified:<15} {expected} ok");
            }
        } else {
            eprintln!("      CHECK {qualified:<15} {expected} FAILED (got {actual})");
        }
    }

    fn on_invoke(&mut self, func_name: &str) {
        if !self.failures_only {
            eprintln!("  >>> CALL {func_name}");
        }
    }

    fn on_return(&mut self, func_name: &str, result: &Object) {
        if !self.failures_only {
            eprintln!("  <<< RETURN {func_name:<13} {}", result.py_repr());
        }
    }

    fn on_error(&mut self, func_name: &str, error: &Exception) {
        eprintln!("  !!! ERROR {func_name:<14} {error}");
    }
}

// ============================================================================
// RecordingTracer
// ============================================================================

/// Tracer that records every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Whether the body was reached in any recorded call.
    #[must_use]
    pub fn invoked(&self) -> bool {
        self.events.iter().any(|e| matches!(e, TraceEvent::Invoke { .. }))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CallTracer for RecordingTracer {
    fn on_bind(&mut self, func_name: &str, bound: &BoundArguments) {
        self.events.push(TraceEvent::Bind {
            func_name: func_name.to_owned(),
            bound: bound.iter().map(|(k, _)| k.clone()).collect(),
        });
    }

    fn on_default(&mut self, func_name: &str, param: &str, _value: &Object) {
        self.events.push(TraceEvent::Default {
            func_name: func_name.to_owned(),
            param: param.to_owned(),
        });
    }

    fn on_check(&mut self, func_name: &str, param: &str, expected: Type, actual: Type, passed: bool) {
        self.events.push(TraceEvent::Check {
            func_name: func_name.to_owned(),
            param: param.to_owned(),
            expected,
            actual,
            passed,
        });
    }

    fn on_invoke(&mut self, func_name: &str) {
        self.events.push(TraceEvent::Invoke {
            func_name: func_name.to_owned(),
        });
    }

    fn on_return(&mut self, func_name: &str, result: &Object) {
        self.events.push(TraceEvent::Return {
            func_name: func_name.to_owned(),
            repr: result.py_repr(),
        });
    }

    fn on_error(&mut self, func_name: &str, error: &Exception) {
        self.events.push(TraceEvent::Error {
            func_name: func_name.to_owned(),
            error: error.clone(),
        });
    }
}
