//! Field-predicate filtering and sorting for stored documents
//!
//! Documents match by exact field comparison with AND semantics and no
//! type coercion. A missing or null field never matches. Range
//! operators compare numbers with numbers and strings with strings;
//! anything else is no match.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison applied to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Exact equality (no coercion)
    Eq(Value),
    /// Greater than or equal (inclusive lower bound)
    Gte(Value),
    /// Less than or equal (inclusive upper bound)
    Lte(Value),
}

/// One field comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: FilterOp,
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    fn matches(&self, document: &Value) -> bool {
        let actual = match document.get(&self.field) {
            Some(v) => v,
            None => return false,
        };
        if actual.is_null() {
            return false;
        }

        match &self.op {
            FilterOp::Eq(expected) => actual == expected,
            FilterOp::Gte(bound) => {
                matches!(compare(actual, bound), Some(Ordering::Greater | Ordering::Equal))
            }
            FilterOp::Lte(bound) => {
                matches!(compare(actual, bound), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Conjunction of predicates. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate; all predicates must match.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }
}

/// Same-type comparison for range predicates. `None` means the values
/// are not comparable and the predicate does not match.
fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            let (af, bf) = (a.as_f64()?, b.as_f64()?);
            af.partial_cmp(&bf)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Stable ascending sort by a named field. Documents missing the field
/// sort first; ties keep insertion order.
pub fn sort_ascending(documents: &mut [Value], field: &str) {
    documents.sort_by(|a, b| compare_for_sort(a.get(field), b.get(field)));
}

fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            compare(a_val, b_val).unwrap_or(Ordering::Equal)
        }
    }
}
