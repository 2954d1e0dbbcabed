use std::{env, process::ExitCode};

use strictcall::{
    BoundArguments, CallArgs, ExcType, NoopTracer, Object, RunResult, StderrTracer, StrictFn, TypePolicy, signature,
    strict,
};

const USAGE: &str = "usage: strictcall [--trace] [--bool-is-int] [ARG ...]

Calls sum(a: int, b: int = 0). Each ARG is a JSON literal passed by position,
or name=JSON passed by keyword. Text that is not valid JSON is passed as a string.";

fn main() -> ExitCode {
    let (trace, policy, call_args) = match parse_command_line(env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Call {
            trace,
            policy,
            call_args,
        }) => (trace, policy, call_args),
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let sum = match guarded_sum() {
        Ok(sum) => sum.with_policy(policy),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let result = if trace {
        sum.call_traced(call_args, &mut StderrTracer::new())
    } else {
        sum.call_traced(call_args, &mut NoopTracer)
    };

    match result {
        Ok(value) => {
            println!("{}", value.py_repr());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
enum Command {
    Help,
    Call {
        trace: bool,
        policy: TypePolicy,
        call_args: CallArgs,
    },
}

fn parse_command_line(args: impl IntoIterator<Item = String>) -> RunResult<Command> {
    let mut trace = false;
    let mut policy = TypePolicy::strict();
    let mut call_args = CallArgs::new();
    for arg in args {
        match arg.as_str() {
            "--trace" => trace = true,
            "--bool-is-int" => policy = policy.with_bool_is_int(true),
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with("--") => {
                return Err(ExcType::ValueError.msg(format!("unrecognized option '{flag}'")));
            }
            _ => call_args = push_arg(call_args, &arg)?,
        }
    }
    Ok(Command::Call {
        trace,
        policy,
        call_args,
    })
}

type Body = fn(&BoundArguments) -> RunResult<Object>;

fn guarded_sum() -> RunResult<StrictFn<Body>> {
    Ok(strict(signature!(sum(a: Int, b: Int = 0))?, add as Body))
}

fn add(args: &BoundArguments) -> RunResult<Object> {
    args.int("a")?
        .checked_add(args.int("b")?)
        .map(Object::Int)
        .ok_or_else(|| ExcType::OverflowError.msg("integer overflow in sum()"))
}

/// Adds one command line argument to `call_args`, as a keyword if it looks like `name=value`.
fn push_arg(call_args: CallArgs, arg: &str) -> RunResult<CallArgs> {
    Ok(match arg.split_once('=') {
        Some((name, value)) if is_identifier(name) => call_args.kwarg(name, parse_value(value)?),
        _ => call_args.arg(parse_value(arg)?),
    })
}

/// Parses a JSON literal, falling back to the raw text as a string.
///
/// An integer literal outside the `i64` range is an `OverflowError` rather than a float.
fn parse_value(text: &str) -> RunResult<Object> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Ok(Object::from(text));
    };
    if let serde_json::Value::Number(n) = &value
        && n.as_i64().is_none()
        && !text.contains(['.', 'e', 'E'])
    {
        return Err(ExcType::OverflowError.msg(format!("integer {} does not fit in 64 bits", text.trim())));
    }
    Ok(Object::from_json_value(value))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(args: &[&str]) -> RunResult<Object> {
        let mut call_args = CallArgs::new();
        for arg in args {
            call_args = push_arg(call_args, arg)?;
        }
        guarded_sum().unwrap().call(call_args)
    }

    fn command_line(args: &[&str]) -> RunResult<Command> {
        parse_command_line(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn values_parse_as_json_with_string_fallback() {
        assert_eq!(parse_value("1").unwrap(), Object::Int(1));
        assert_eq!(parse_value("2.15").unwrap(), Object::Float(2.15));
        assert_eq!(parse_value("1e20").unwrap(), Object::Float(1e20));
        assert_eq!(parse_value("\"1\"").unwrap(), Object::from("1"));
        assert_eq!(parse_value("x").unwrap(), Object::from("x"));
        assert_eq!(parse_value("null").unwrap(), Object::None);
    }

    #[test]
    fn keyword_form_needs_an_identifier() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_b2"));
        assert!(!is_identifier("2b"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("\"a"));

        let args = push_arg(CallArgs::new(), "\"a=1\"").unwrap();
        assert_eq!(args.positional_len(), 1);
        assert_eq!(args.keyword_len(), 0);
    }

    #[test]
    fn sum_from_command_line() {
        assert_eq!(run(&["1", "2"]).unwrap(), Object::Int(3));
        assert_eq!(run(&["b=4", "a=3"]).unwrap(), Object::Int(7));
        assert_eq!(run(&["5"]).unwrap(), Object::Int(5));
    }

    #[test]
    fn errors_render_with_their_kind() {
        assert_eq!(
            run(&["1", "2.15"]).unwrap_err().to_string(),
            "TypeError: sum() argument 'b' must be int, not float"
        );
        assert_eq!(
            run(&["x"]).unwrap_err().to_string(),
            "TypeError: sum() argument 'a' must be int, not str"
        );
        assert_eq!(
            run(&[]).unwrap_err().to_string(),
            "BindingError: sum() missing 1 required positional argument: 'a'"
        );
        assert_eq!(
            run(&["9223372036854775807", "1"]).unwrap_err().exc_type(),
            ExcType::OverflowError
        );
    }

    #[test]
    fn integers_outside_i64_are_overflow_errors() {
        for text in ["9223372036854775808", "-9223372036854775809", "18446744073709551616"] {
            let err = parse_value(text).unwrap_err();
            assert_eq!(err.exc_type(), ExcType::OverflowError, "{text}");
            assert_eq!(err.message(), format!("integer {text} does not fit in 64 bits"));
        }
        assert_eq!(run(&["9223372036854775808"]).unwrap_err().exc_type(), ExcType::OverflowError);
        assert_eq!(
            run(&["a=-9223372036854775809"]).unwrap_err().exc_type(),
            ExcType::OverflowError
        );
        assert_eq!(parse_value("-9223372036854775808").unwrap(), Object::Int(i64::MIN));
    }

    #[test]
    fn flags_are_parsed_and_unknown_flags_rejected() {
        let Command::Call {
            trace,
            policy,
            call_args,
        } = command_line(&["--trace", "1", "--bool-is-int", "b=2"]).unwrap()
        else {
            panic!("expected a call");
        };
        assert!(trace);
        assert!(policy.bool_is_int);
        assert_eq!(call_args.positional_len(), 1);
        assert_eq!(call_args.keyword_len(), 1);

        assert!(matches!(command_line(&["1", "--help"]).unwrap(), Command::Help));

        let err = command_line(&["1", "--foo"]).unwrap_err();
        assert_eq!(err.to_string(), "ValueError: unrecognized option '--foo'");

        // negative numbers are values, not flags
        assert!(matches!(command_line(&["-3"]).unwrap(), Command::Call { .. }));
    }
}
