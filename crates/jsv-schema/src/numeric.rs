//! # Numeric Leaf
//!
//! `integer` / `number` nodes. After common validation, numeric instances
//! are checked against `maximum`, `minimum`, `exclusiveMaximum`,
//! `exclusiveMinimum` and `divisibleBy`. Every check runs independently, so
//! one instance can produce several violations.
//!
//! Integer operands are compared and divided exactly; anything involving a
//! float goes through `f64`.

use std::cmp::Ordering;

use serde_json::{json, Number, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::{self, truthy, Node};
use crate::node::validate_common;
use crate::validate::ValidationError;
use crate::violation::ViolationCode;

/// Relative tolerance for float divisibility.
const DIVISIBILITY_EPSILON: f64 = 1e-9;

/// Validate a numeric node.
pub(crate) fn validate(
    node: &Node,
    type_name: &str,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    validate_common(node, type_name, instance, scope, ctx)?;

    let Value::Number(n) = instance else {
        return Ok(());
    };

    let maximum = keywords::number(node, "maximum", ctx.path())?;
    let minimum = keywords::number(node, "minimum", ctx.path())?;

    if let Some(max) = maximum {
        let ordering = compare(n, max);
        if ordering == Ordering::Greater {
            ctx.report(
                ViolationCode::ValueGreaterThanMaximum,
                json!({ "expected": max, "actual": n }),
            );
        }
        if flag(node, "exclusiveMaximum") && ordering != Ordering::Less {
            ctx.report(
                ViolationCode::ValueGreaterOrEqualThanMaximum,
                json!({ "expected": max, "actual": n }),
            );
        }
    }

    if let Some(min) = minimum {
        let ordering = compare(n, min);
        if ordering == Ordering::Less {
            ctx.report(
                ViolationCode::ValueLowerThanMinimum,
                json!({ "expected": min, "actual": n }),
            );
        }
        if flag(node, "exclusiveMinimum") && ordering != Ordering::Greater {
            ctx.report(
                ViolationCode::ValueLowerOrEqualThanMinimum,
                json!({ "expected": min, "actual": n }),
            );
        }
    }

    if let Some(divisor) = keywords::number(node, "divisibleBy", ctx.path())? {
        match divisible(n, divisor) {
            Some(true) => {}
            Some(false) => ctx.report(
                ViolationCode::ValueNotDivisibleBy,
                json!({ "expected": divisor, "actual": n }),
            ),
            None => {
                return Err(ValidationError::MalformedSchema {
                    path: ctx.path().clone(),
                    reason: "'divisibleBy' must be non-zero".to_string(),
                })
            }
        }
    }

    Ok(())
}

fn flag(node: &Node, key: &str) -> bool {
    keywords::get(node, key).is_some_and(truthy)
}

/// Total order over JSON numbers. serde_json never holds NaN, so the float
/// comparison always succeeds.
fn compare(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// `Some(n mod d == 0)`, or `None` for a zero divisor.
fn divisible(n: &Number, d: &Number) -> Option<bool> {
    if let (Some(x), Some(y)) = (n.as_i64(), d.as_i64()) {
        // `i64::MIN % -1` overflows; every integer is a multiple of -1.
        return (y != 0).then(|| x.checked_rem(y).map_or(true, |r| r == 0));
    }
    if let (Some(x), Some(y)) = (n.as_u64(), d.as_u64()) {
        return (y != 0).then(|| x % y == 0);
    }
    let x = n.as_f64()?;
    let y = d.as_f64()?;
    if y == 0.0 {
        return None;
    }
    let quotient = x / y;
    Some((quotient - quotient.round()).abs() <= DIVISIBILITY_EPSILON * quotient.abs().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: Value) -> Number {
        match v {
            Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn test_compare_mixed_representations() {
        assert_eq!(compare(&num(json!(5)), &num(json!(5))), Ordering::Equal);
        assert_eq!(compare(&num(json!(5)), &num(json!(5.0))), Ordering::Equal);
        assert_eq!(compare(&num(json!(-1)), &num(json!(u64::MAX))), Ordering::Less);
        assert_eq!(compare(&num(json!(4.5)), &num(json!(4))), Ordering::Greater);
    }

    #[test]
    fn test_divisible_integers() {
        assert_eq!(divisible(&num(json!(10)), &num(json!(5))), Some(true));
        assert_eq!(divisible(&num(json!(-10)), &num(json!(5))), Some(true));
        assert_eq!(divisible(&num(json!(11)), &num(json!(5))), Some(false));
        assert_eq!(divisible(&num(json!(11)), &num(json!(0))), None);
    }

    #[test]
    fn test_divisible_extreme_integers() {
        assert_eq!(divisible(&num(json!(i64::MIN)), &num(json!(-1))), Some(true));
        assert_eq!(divisible(&num(json!(i64::MIN)), &num(json!(2))), Some(true));
        assert_eq!(divisible(&num(json!(i64::MAX)), &num(json!(-1))), Some(true));
        assert_eq!(divisible(&num(json!(u64::MAX)), &num(json!(2))), Some(false));
    }

    #[test]
    fn test_divisible_floats() {
        assert_eq!(divisible(&num(json!(0.3)), &num(json!(0.1))), Some(true));
        assert_eq!(divisible(&num(json!(7.5)), &num(json!(2.5))), Some(true));
        assert_eq!(divisible(&num(json!(7.4)), &num(json!(2.5))), Some(false));
        assert_eq!(divisible(&num(json!(1.0)), &num(json!(0.0))), None);
    }
}
