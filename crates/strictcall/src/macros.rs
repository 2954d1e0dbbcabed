/// Declares a [`Signature`](crate::Signature) with Python-like syntax.
///
/// Each parameter is `name`, `name: Type`, `name = default` or `name: Type = default`,
/// where `Type` is a [`Type`](crate::Type) variant and `default` is any expression
/// convertible into an [`Object`](crate::Object). Expands to a
/// [`SignatureBuilder::build`](crate::SignatureBuilder::build) call, so it evaluates to
/// a `RunResult<Signature>`.
///
/// ```
/// use strictcall::{Type, signature};
///
/// let sig = signature!(sum(a: Int, b: Int = 0)).unwrap();
/// assert_eq!(sig.to_string(), "sum(a: int, b: int = 0)");
/// assert_eq!(sig.param("b").unwrap().annotation(), Some(Type::Int));
///
/// let untyped = signature!(echo(value, sep = " ")).unwrap();
/// assert_eq!(untyped.to_string(), "echo(value, sep=' ')");
/// ```
#[macro_export]
macro_rules! signature {
    ($name:ident ( $($param:ident $(: $ty:ident)? $(= $default:expr)?),* $(,)? )) => {{
        let builder = $crate::Signature::builder(stringify!($name));
        $(
            let param = $crate::Param::new(stringify!($param));
            $( let param = param.typed($crate::Type::$ty); )?
            $( let param = param.default($default); )?
            let builder = builder.param(param);
        )*
        builder.build()
    }};
}
