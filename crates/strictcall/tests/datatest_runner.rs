//! Data-driven call tests.
//!
//! Each file under `tests/cases/` declares one signature, a body and a list of calls
//! with their expected outcome:
//!
//! ```json
//! {
//!   "signature": {"name": "sum", "params": [{"name": "a", "type": "int"}, {"name": "b", "type": "int", "default": 0}]},
//!   "body": "sum",
//!   "policy": {"bool_is_int": false},
//!   "calls": [
//!     {"args": [1, 2], "result": 3},
//!     {"kwargs": {"a": "1"}, "error": "TypeError", "message": "sum() argument 'a' must be int, not str"}
//!   ]
//! }
//! ```
//!
//! Bodies: `sum` adds every bound value as an int, `echo` returns the bound arguments
//! as a dict.

use std::path::Path;

use serde::Deserialize;
use strictcall::{
    BoundArguments, CallArgs, ExcType, Object, Param, RecordingTracer, RunResult, Signature, TypePolicy, strict,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    signature: SignatureDecl,
    body: BodyKind,
    #[serde(default)]
    policy: TypePolicy,
    calls: Vec<CallDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignatureDecl {
    name: String,
    params: Vec<ParamDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamDecl {
    name: String,
    #[serde(rename = "type")]
    type_name: Option<String>,
    default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BodyKind {
    Sum,
    Echo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CallDecl {
    #[serde(default)]
    args: Vec<serde_json::Value>,
    #[serde(default)]
    kwargs: serde_json::Map<String, serde_json::Value>,
    /// Passed as a single `**` splat after `kwargs`.
    kwargs_splat: Option<serde_json::Value>,
    /// Passed as a single `*` splat after `args`.
    args_splat: Option<serde_json::Value>,
    result: Option<serde_json::Value>,
    error: Option<ExcType>,
    message: Option<String>,
}

fn build_signature(decl: SignatureDecl) -> RunResult<Signature> {
    let mut builder = Signature::builder(decl.name);
    for p in decl.params {
        let mut param = Param::new(p.name);
        if let Some(type_name) = p.type_name {
            let annotation = type_name
                .parse()
                .map_err(|_| ExcType::ValueError.msg(format!("unknown type {type_name:?}")))?;
            param = param.typed(annotation);
        }
        if let Some(default) = p.default {
            param = param.default(Object::from_json_value(default));
        }
        builder = builder.param(param);
    }
    builder.build()
}

fn sum_body(args: &BoundArguments) -> RunResult<Object> {
    let mut total: i64 = 0;
    for (name, _) in args {
        total = total
            .checked_add(args.int(name)?)
            .ok_or_else(|| ExcType::OverflowError.msg("integer overflow"))?;
    }
    Ok(Object::Int(total))
}

fn echo_body(args: &BoundArguments) -> RunResult<Object> {
    Ok(Object::Dict(
        args.iter()
            .map(|(k, v)| (Object::from(k.as_str()), v.clone()))
            .collect(),
    ))
}

fn call_args(call: &CallDecl) -> CallArgs {
    let mut args = CallArgs::positional(call.args.iter().cloned().map(Object::from_json_value));
    if let Some(splat) = &call.args_splat {
        args = args.extend_args(Object::from_json_value(splat.clone()));
    }
    for (k, v) in &call.kwargs {
        args = args.kwarg(k.clone(), Object::from_json_value(v.clone()));
    }
    if let Some(splat) = &call.kwargs_splat {
        args = args.extend_kwargs(Object::from_json_value(splat.clone()));
    }
    args
}

fn run_case(path: &Path) -> datatest_stable::Result<()> {
    let text = std::fs::read_to_string(path)?;
    let case: Case = serde_json::from_str(&text)?;
    let signature = build_signature(case.signature)?;
    let body = match case.body {
        BodyKind::Sum => sum_body as fn(&BoundArguments) -> RunResult<Object>,
        BodyKind::Echo => echo_body,
    };
    let func = strict(signature, body).with_policy(case.policy);

    for (i, call) in case.calls.iter().enumerate() {
        let mut tracer = RecordingTracer::new();
        let outcome = func.call_traced(call_args(call), &mut tracer);
        let label = format!("{}: call #{i}", path.display());
        match (outcome, &call.result, call.error) {
            (Ok(value), Some(expected), None) => {
                let expected = Object::from_json_value(expected.clone());
                if value != expected {
                    return Err(format!("{label}: expected {}, got {}", expected.py_repr(), value.py_repr()).into());
                }
            }
            (Err(err), None, Some(expected_kind)) => {
                if err.exc_type() != expected_kind {
                    return Err(format!("{label}: expected {expected_kind}, got {err}").into());
                }
                if let Some(message) = &call.message
                    && err.message() != message
                {
                    return Err(format!("{label}: expected message {message:?}, got {:?}", err.message()).into());
                }
                if matches!(expected_kind, ExcType::BindingError | ExcType::TypeError) && tracer.invoked() {
                    return Err(format!("{label}: body ran despite {expected_kind}").into());
                }
            }
            (Ok(value), _, _) => {
                return Err(format!("{label}: unexpected success {}", value.py_repr()).into());
            }
            (Err(err), _, _) => {
                return Err(format!("{label}: unexpected error {err}").into());
            }
        }
    }
    Ok(())
}

datatest_stable::harness!(run_case, "tests/cases", r"^.*\.json$");
