//! The argument binder and type guard.
//!
//! [`strict`] wraps a body with a [`Signature`]. Every call through the wrapper runs
//! the same four phases in order:
//! 1. bind the supplied arguments to parameter names
//! 2. fill unbound parameters from their defaults
//! 3. check each value with a declared type against that type
//! 4. run the body with the bound arguments
//!
//! The body only ever sees arguments that passed every check, so it cannot observe a
//! partially validated call.

use std::fmt;

use crate::{
    args::CallArgs,
    exception::{ExcType, RunResult},
    object::Object,
    policy::TypePolicy,
    signature::{BoundArguments, Signature},
    tracer::{CallTracer, NoopTracer},
};

/// Wraps `body` so that every call is bound and type-checked against `signature` first.
///
/// ```
/// use strictcall::{CallArgs, Object, signature, strict};
///
/// let sum = strict(signature!(sum(a: Int, b: Int = 0)).unwrap(), |args| {
///     Ok(Object::Int(args.int("a")? + args.int("b")?))
/// });
/// assert_eq!(sum.call(CallArgs::new().arg(1).arg(2)).unwrap(), Object::Int(3));
/// assert!(sum.call(CallArgs::new().arg(1).arg(2.15)).unwrap_err().is_type_error());
/// ```
pub fn strict<F>(signature: Signature, body: F) -> StrictFn<F>
where
    F: Fn(&BoundArguments) -> RunResult<Object>,
{
    StrictFn {
        signature,
        policy: TypePolicy::default(),
        body,
    }
}

/// A callable whose arguments are validated before its body runs.
///
/// Holds no per-call state: the signature and policy are fixed when the wrapper is
/// built, and each call works on its own [`BoundArguments`].
pub struct StrictFn<F> {
    signature: Signature,
    policy: TypePolicy,
    body: F,
}

impl<F> fmt::Debug for StrictFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictFn")
            .field("signature", &self.signature)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<F> StrictFn<F>
where
    F: Fn(&BoundArguments) -> RunResult<Object>,
{
    /// Replaces the numeric-tower policy used by the type checks.
    #[must_use]
    pub fn with_policy(mut self, policy: TypePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    #[must_use]
    pub fn policy(&self) -> &TypePolicy {
        &self.policy
    }

    /// Binds, checks and, if everything passes, runs the body.
    ///
    /// # Errors
    /// - `BindingError` if the arguments do not fit the signature
    /// - `TypeError` if a value does not satisfy its declared type
    /// - whatever the body returns
    pub fn call(&self, args: CallArgs) -> RunResult<Object> {
        self.call_traced(args, &mut NoopTracer)
    }

    /// Same as [`StrictFn::call`], reporting every phase to `tracer`.
    pub fn call_traced<Tr: CallTracer>(&self, args: CallArgs, tracer: &mut Tr) -> RunResult<Object> {
        let func_name = self.signature.name();
        let result = match self.prepare(args, tracer) {
            Ok(bound) => {
                tracer.on_invoke(func_name);
                (self.body)(&bound)
            }
            Err(err) => Err(err),
        };
        match &result {
            Ok(value) => tracer.on_return(func_name, value),
            Err(err) => tracer.on_error(func_name, err),
        }
        result
    }

    /// Runs binding, defaults and type checks without invoking the body.
    pub fn check(&self, args: CallArgs) -> RunResult<BoundArguments> {
        self.prepare(args, &mut NoopTracer)
    }

    /// Converts the wrapper into a plain closure with the same call contract.
    pub fn into_closure(self) -> impl Fn(CallArgs) -> RunResult<Object> {
        move |args| self.call(args)
    }

    fn prepare(&self, args: CallArgs, tracer: &mut impl CallTracer) -> RunResult<BoundArguments> {
        let func_name = self.signature.name();
        let mut bound = self.signature.bind(args)?;
        tracer.on_bind(func_name, &bound);

        for param in self.signature.params() {
            if let Some(default) = param.default_value()
                && !bound.contains(param.name())
            {
                tracer.on_default(func_name, param.name(), default);
            }
        }
        self.signature.apply_defaults(&mut bound);

        self.check_types(&bound, tracer)?;
        Ok(bound)
    }

    /// Checks bound values in parameter order, stopping at the first mismatch.
    fn check_types(&self, bound: &BoundArguments, tracer: &mut impl CallTracer) -> RunResult<()> {
        let func_name = self.signature.name();
        for param in self.signature.params() {
            let Some(expected) = param.annotation() else {
                continue;
            };
            // full binding plus defaults covers every parameter
            let Some(value) = bound.get(param.name()) else {
                continue;
            };
            let actual = value.py_type();
            let passed = actual.is_instance_of(expected, &self.policy);
            tracer.on_check(func_name, param.name(), expected, actual, passed);
            if !passed {
                return Err(ExcType::type_error_arg(func_name, param.name(), expected, actual));
            }
        }
        Ok(())
    }
}
