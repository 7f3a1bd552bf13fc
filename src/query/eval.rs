use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::cmp::Ordering;

use super::types::{Condition, Operator};
use crate::types::Record;

/// A condition with its `LIKE` pattern compiled once per query execution.
pub(crate) struct Compiled<'a> {
    cond: &'a Condition,
    like: Option<Regex>,
}

impl<'a> Compiled<'a> {
    pub(crate) fn new(cond: &'a Condition) -> Self {
        let like = match cond.op {
            Operator::Like => like_regex(&cond.value),
            _ => None,
        };
        Self { cond, like }
    }

    pub(crate) fn matches(&self, record: &Record) -> bool {
        let field = record.get(&self.cond.field).unwrap_or(&Value::Null);
        match &self.cond.op {
            Operator::Like => match (field, &self.like) {
                (Value::String(s), Some(re)) => re.is_match(s),
                _ => false,
            },
            op => eval_op(op, field, &self.cond.value),
        }
    }
}

/// Evaluate one condition against a record. A missing field reads as null.
#[must_use]
pub fn eval_condition(record: &Record, cond: &Condition) -> bool {
    Compiled::new(cond).matches(record)
}

fn eval_op(op: &Operator, field: &Value, value: &Value) -> bool {
    match op {
        Operator::Eq => loose_eq(field, value),
        Operator::Ne => !loose_eq(field, value),
        Operator::Gt => compare_loose(field, value) == Some(Ordering::Greater),
        Operator::Lt => compare_loose(field, value) == Some(Ordering::Less),
        Operator::Like => like_matches(field, value),
        Operator::Unsupported(_) => false,
    }
}

/// Numeric value of a number or of a string that reads as a finite number.
fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Equality with one coercion: numeric-looking strings compare by their number, against
/// numbers or each other (`"1" == "01"`). Numbers compare by value (`1 == 1.0`);
/// everything else is strict.
#[must_use]
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            matches!((as_number(a), as_number(b)), (Some(x), Some(y)) if x == y)
        }
        (Value::String(x), Value::String(y)) => match (as_number(a), as_number(b)) {
            (Some(i), Some(j)) => i == j,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Ordering used by `>` and `<`. `None` means the pair is incomparable and the
/// predicate does not match.
#[must_use]
pub fn compare_loose(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => match (as_number(a), as_number(b)) {
            (Some(i), Some(j)) => i.partial_cmp(&j),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => match (as_number(a), as_number(b)) {
            (Some(i), Some(j)) => i.partial_cmp(&j),
            _ => None,
        },
    }
}

/// SQL-style `LIKE`: `%` matches any run of characters, everything else is literal,
/// case-insensitive, and the pattern may match anywhere. Only string fields match.
#[must_use]
pub fn like_matches(field: &Value, pattern: &Value) -> bool {
    let Value::String(s) = field else {
        return false;
    };
    like_regex(pattern).is_some_and(|re| re.is_match(s))
}

fn like_regex(pattern: &Value) -> Option<Regex> {
    let text = match pattern {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let body = text.split('%').map(regex::escape).collect::<Vec<_>>().join(".*");
    match RegexBuilder::new(&body).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("LIKE pattern {text:?} rejected: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_eq_coerces_numeric_strings_only() {
        assert!(loose_eq(&json!(5), &json!("5")));
        assert!(loose_eq(&json!(" 5.0"), &json!(5)));
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(!loose_eq(&json!("abc"), &json!(0)));
        assert!(loose_eq(&json!("1"), &json!("01")));
        assert!(loose_eq(&json!("10"), &json!("1e1")));
        assert!(!loose_eq(&json!("1"), &json!("1a")));
        assert!(!loose_eq(&json!("Abc"), &json!("abc")));
        assert!(!loose_eq(&json!(true), &json!(1)));
        assert!(!loose_eq(&json!(null), &json!(0)));
        assert!(loose_eq(&json!(null), &json!(null)));
        assert!(!loose_eq(&json!("inf"), &json!(f64::MAX)));
    }

    #[test]
    fn ordering_rules() {
        assert_eq!(compare_loose(&json!(30), &json!(25)), Some(Ordering::Greater));
        assert_eq!(compare_loose(&json!("30"), &json!(25)), Some(Ordering::Greater));
        assert_eq!(compare_loose(&json!("10"), &json!("9")), Some(Ordering::Greater));
        assert_eq!(compare_loose(&json!("apple"), &json!("banana")), Some(Ordering::Less));
        assert_eq!(compare_loose(&json!(false), &json!(true)), Some(Ordering::Less));
        assert_eq!(compare_loose(&json!(null), &json!(1)), None);
        assert_eq!(compare_loose(&json!("abc"), &json!(1)), None);
        assert_eq!(compare_loose(&json!([1]), &json!([2])), None);
    }

    #[test]
    fn like_is_case_insensitive_and_literal() {
        assert!(like_matches(&json!("Ahmed"), &json!("ah%")));
        assert!(like_matches(&json!("Mahmoud"), &json!("%AH%")));
        assert!(like_matches(&json!("report.txt"), &json!("%.txt")));
        assert!(!like_matches(&json!("reportxtxt"), &json!("%.txt")));
        assert!(!like_matches(&json!("John"), &json!("Ah%")));
        assert!(!like_matches(&json!(123), &json!("1%")));
        assert!(like_matches(&json!("a123"), &json!(12)));
        assert!(!like_matches(&json!("abc"), &json!(null)));
    }

    #[test]
    fn missing_field_is_null() {
        let r = json!({"name": "x"}).as_object().cloned().unwrap();
        assert!(eval_condition(&r, &Condition::new("age", "=", Value::Null)));
        assert!(eval_condition(&r, &Condition::new("age", "!=", 3)));
        assert!(!eval_condition(&r, &Condition::new("age", ">", 3)));
        assert!(!eval_condition(&r, &Condition::new("name", "~", "x")));
    }
}
