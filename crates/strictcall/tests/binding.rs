//! Tests for mapping call arguments onto a signature.
//!
//! These exercise `Signature::bind` and friends directly, without type checks.

use pretty_assertions::assert_eq;
use strictcall::{BoundArguments, CallArgs, ExcType, Object, Param, Signature, Type, signature};

fn sum_signature() -> Signature {
    signature!(sum(a: Int, b: Int = 0)).unwrap()
}

fn bound_pairs(bound: &BoundArguments) -> Vec<(String, Object)> {
    bound.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[test]
fn positional_and_keyword_bind_identically() {
    let sig = sum_signature();
    let positional = sig.bind(CallArgs::new().arg(1).arg(2)).unwrap();
    let keyword = sig.bind(CallArgs::new().kwarg("a", 1).kwarg("b", 2)).unwrap();
    let mixed = sig.bind(CallArgs::new().arg(1).kwarg("b", 2)).unwrap();

    assert_eq!(bound_pairs(&positional), bound_pairs(&keyword));
    assert_eq!(bound_pairs(&positional), bound_pairs(&mixed));
}

#[test]
fn keyword_order_does_not_matter() {
    let sig = sum_signature();
    let forward = sig.bind(CallArgs::new().kwarg("a", 3).kwarg("b", 4)).unwrap();
    let reversed = sig.bind(CallArgs::new().kwarg("b", 4).kwarg("a", 3)).unwrap();

    assert_eq!(bound_pairs(&forward), bound_pairs(&reversed));
    assert_eq!(
        forward.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"],
        "bound arguments follow parameter order"
    );
}

#[test]
fn bind_leaves_defaults_to_apply_defaults() {
    let sig = sum_signature();
    let mut bound = sig.bind(CallArgs::new().arg(5)).unwrap();
    assert_eq!(bound.len(), 1);
    assert!(!bound.contains("b"));

    sig.apply_defaults(&mut bound);
    assert_eq!(
        bound_pairs(&bound),
        vec![("a".to_owned(), Object::Int(5)), ("b".to_owned(), Object::Int(0))]
    );
}

#[test]
fn apply_defaults_keeps_parameter_order_when_later_params_are_supplied() {
    let sig = Signature::builder("f")
        .untyped("a")
        .param(Param::new("b").default(1))
        .param(Param::new("c").default(2))
        .build()
        .unwrap();
    let mut bound = sig.bind(CallArgs::new().kwarg("c", 9).kwarg("a", 0)).unwrap();
    sig.apply_defaults(&mut bound);

    assert_eq!(
        bound.args(),
        vec![&Object::Int(0), &Object::Int(1), &Object::Int(9)]
    );
}

#[test]
fn bind_partial_allows_missing_required() {
    let sig = sum_signature();
    let bound = sig.bind_partial(CallArgs::new().kwarg("b", 2)).unwrap();
    assert_eq!(bound_pairs(&bound), vec![("b".to_owned(), Object::Int(2))]);

    // other shape errors are still reported
    let err = sig.bind_partial(CallArgs::new().kwarg("c", 2)).unwrap_err();
    assert_eq!(err.message(), "sum() got an unexpected keyword argument 'c'");
}

#[test]
fn shape_errors_are_binding_errors() {
    let sig = sum_signature();
    let cases = [
        (CallArgs::new(), "sum() missing 1 required positional argument: 'a'"),
        (
            CallArgs::new().arg(1).arg(2).arg(3),
            "sum() takes 2 positional arguments but 3 were given",
        ),
        (
            CallArgs::new().arg(1).kwarg("x", 2),
            "sum() got an unexpected keyword argument 'x'",
        ),
        (
            CallArgs::new().arg(1).kwarg("a", 2),
            "sum() got multiple values for argument 'a'",
        ),
    ];
    for (args, expected) in cases {
        let err = sig.bind(args).unwrap_err();
        assert_eq!(err.exc_type(), ExcType::BindingError);
        assert_eq!(err.message(), expected);
        assert!(err.mismatch().is_none());
    }
}

#[test]
fn binding_ignores_declared_types() {
    let sig = sum_signature();
    let bound = sig.bind(CallArgs::new().arg("x").arg(2.5)).unwrap();
    assert_eq!(bound.get("a"), Some(&Object::from("x")));
    assert_eq!(bound.get("b"), Some(&Object::Float(2.5)));
}

#[test]
fn splats_mix_with_plain_arguments() {
    let sig = signature!(f(a, b, c, d = 4)).unwrap();
    let mut mapping = indexmap::IndexMap::new();
    mapping.insert("d".to_owned(), Object::Int(40));
    mapping.insert("c".to_owned(), Object::Int(30));

    let bound = sig
        .bind(
            CallArgs::new()
                .arg(1)
                .extend_args(Object::List(vec![Object::Int(2)]))
                .extend_kwargs(Object::Dict(mapping.into())),
        )
        .unwrap();
    assert_eq!(
        bound.args(),
        vec![&Object::Int(1), &Object::Int(2), &Object::Int(30), &Object::Int(40)]
    );
}

#[test]
fn kwargs_splat_rejects_non_string_keys() {
    let sig = sum_signature();
    let mapping = Object::Dict(vec![(Object::Int(1), Object::Int(2))].into());
    let err = sig.bind(CallArgs::new().extend_kwargs(mapping)).unwrap_err();
    assert_eq!(err.exc_type(), ExcType::BindingError);
    assert_eq!(err.message(), "keywords must be strings");
}

#[test]
fn builder_rejects_inconsistent_signatures() {
    let err = Signature::builder("f").untyped("a").untyped("a").build().unwrap_err();
    assert_eq!(err.exc_type(), ExcType::SignatureError);
    assert_eq!(err.message(), "duplicate argument 'a' in function definition of f()");

    let err = Signature::builder("f")
        .typed_default("a", Type::Int, 0)
        .typed("b", Type::Int)
        .build()
        .unwrap_err();
    assert_eq!(err.exc_type(), ExcType::SignatureError);
    assert_eq!(err.message(), "non-default argument 'b' follows default argument in f()");
}

#[test]
fn signature_displays_like_python() {
    assert_eq!(sum_signature().to_string(), "sum(a: int, b: int = 0)");
    assert_eq!(signature!(g(x, y = "hi")).unwrap().to_string(), "g(x, y='hi')");
    assert_eq!(signature!(h()).unwrap().to_string(), "h()");
}

#[test]
fn required_count_counts_params_without_defaults() {
    let sig = sum_signature();
    assert_eq!(sig.param_count(), 2);
    assert_eq!(sig.required_count(), 1);
    assert_eq!(sig.param("b").and_then(Param::default_value), Some(&Object::Int(0)));
    assert!(sig.param("z").is_none());
}
