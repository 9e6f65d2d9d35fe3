use super::*;

#[test]
fn option_none_converts_to_null() {
    let none: Option<i32> = None;

    assert_eq!(Value::from(none), Value::Null);
    assert_eq!(Value::from(Some(7_i32)), Value::Int(7));
}

#[test]
fn integers_widen_into_their_family() {
    assert_eq!(Value::from(3_u8), Value::Uint(3));
    assert_eq!(Value::from(-3_i16), Value::Int(-3));
    assert_ne!(
        Value::from(3_u8),
        Value::from(3_i8),
        "signed and unsigned values are distinct leaves"
    );
}

#[test]
fn nan_float_equals_itself() {
    let nan = Value::Float(f64::NAN);

    assert_eq!(nan, nan.clone(), "diffing relies on reflexive equality");
}

#[test]
fn field_navigation_reads_absent_as_null() {
    let pair = Value::structure([("left", 1_i32), ("right", 2_i32)]);

    assert_eq!(pair.field("left"), Value::Int(1));
    assert_eq!(pair.field("missing"), Value::Null);
    assert_eq!(Value::Null.field("left"), Value::Null);
    assert_eq!(Value::Int(4).field("left"), Value::Null);
}

#[test]
fn value_round_trips_through_json() {
    let value = Value::structure([("title", Value::from("hi")), ("likes", Value::from(2_u32))]);

    let json = serde_json::to_string(&value).expect("value should serialize");
    let decoded: Value = serde_json::from_str(&json).expect("value should deserialize");

    assert_eq!(decoded, value);
}

#[test]
fn pointer_sized_integers_join_the_64_bit_family() {
    assert_eq!(Value::from(5_usize), Value::Uint(5));
    assert_eq!(Value::from(-5_isize), Value::Int(-5));
    assert_eq!(Value::from(5_usize), Value::from(5_u64));
}

#[test]
fn wide_integers_keep_full_precision() {
    let max = Value::from(u128::MAX);

    assert_eq!(max, Value::BigUint(u128::MAX));
    assert_ne!(max, Value::from(u128::MAX - 1));
    assert_eq!(Value::from(i128::MIN), Value::BigInt(i128::MIN));
}
