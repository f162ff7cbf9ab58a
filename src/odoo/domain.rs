//! Odoo search domains.
//!
//! A [`Domain`] is the flat Polish-prefix list the server expects, e.g.
//! `["|", ["name", "ilike", "acme"], ["email", "ilike", "acme"]]`. Domains
//! received from callers are forwarded verbatim; the server is the authority
//! on their meaning. [`DomainTerm`] builds well-formed domains in code and
//! [`Domain::validate`] checks the structure of a flat domain when asked.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Operators whose value is itself a domain.
const NESTED_OPERATORS: [&str; 2] = ["any", "not any"];

/// A search domain in the server's flat prefix notation. Empty matches all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Vec<Value>);

impl Domain {
    /// The match-all domain.
    pub fn all() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn terms(&self) -> &[Value] {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.clone())
    }

    /// Check that every prefix operator has its operands and every element
    /// is an operator or a `[field, operator, value]` leaf.
    ///
    /// Several top-level terms without operators are allowed; the server
    /// joins them with an implicit AND.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_terms(&self.0)
    }
}

impl From<Vec<Value>> for Domain {
    fn from(terms: Vec<Value>) -> Self {
        Self(terms)
    }
}

impl From<DomainTerm> for Domain {
    fn from(term: DomainTerm) -> Self {
        let mut out = Vec::new();
        term.encode(&mut out);
        Self(out)
    }
}

impl From<Vec<DomainTerm>> for Domain {
    fn from(terms: Vec<DomainTerm>) -> Self {
        let mut out = Vec::new();
        for term in &terms {
            term.encode(&mut out);
        }
        Self(out)
    }
}

/// A structured domain predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainTerm {
    Leaf {
        field: String,
        operator: String,
        value: Value,
    },
    And(Vec<DomainTerm>),
    Or(Vec<DomainTerm>),
    Not(Box<DomainTerm>),
    /// Records with at least one related record matching `domain`.
    Any {
        field: String,
        domain: Vec<DomainTerm>,
    },
}

impl DomainTerm {
    pub fn leaf(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::Leaf {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn any(field: impl Into<String>, domain: Vec<DomainTerm>) -> Self {
        Self::Any {
            field: field.into(),
            domain,
        }
    }

    pub fn negate(term: DomainTerm) -> Self {
        Self::Not(Box::new(term))
    }

    fn encode(&self, out: &mut Vec<Value>) {
        match self {
            Self::Leaf {
                field,
                operator,
                value,
            } => out.push(json!([field, operator, value])),
            Self::And(terms) => encode_joined("&", terms, true, out),
            Self::Or(terms) => encode_joined("|", terms, false, out),
            Self::Not(term) => {
                out.push(json!("!"));
                term.encode(out);
            }
            Self::Any { field, domain } => {
                let nested = Domain::from(domain.clone());
                out.push(json!([field, "any", nested.to_value()]));
            }
        }
    }
}

/// Join `terms` with `n - 1` prefix operators. An empty conjunction is the
/// constant-true leaf and an empty disjunction the constant-false leaf.
fn encode_joined(
    operator: &str,
    terms: &[DomainTerm],
    empty_is_true: bool,
    out: &mut Vec<Value>,
) {
    if terms.is_empty() {
        let constant = if empty_is_true { 1 } else { 0 };
        out.push(json!([constant, "=", 1]));
        return;
    }
    for _ in 1..terms.len() {
        out.push(json!(operator));
    }
    for term in terms {
        term.encode(out);
    }
}

/// Structural problems found by [`Domain::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("term {position}: unknown logical operator '{operator}'")]
    UnknownOperator { position: usize, operator: String },

    #[error("term {position}: expected a [field, operator, value] triple")]
    MalformedTerm { position: usize },

    #[error("term {position}: operator '{operator}' is missing operands")]
    MissingOperand { position: usize, operator: String },

    #[error("term {position}: invalid nested domain: {source}")]
    Nested {
        position: usize,
        #[source]
        source: Box<DomainError>,
    },
}

fn validate_terms(terms: &[Value]) -> Result<(), DomainError> {
    // Walk right to left counting complete operands on the stack.
    let mut operands = 0usize;
    for (position, term) in terms.iter().enumerate().rev() {
        match term {
            Value::String(op) => {
                let arity = match op.as_str() {
                    "!" => 1,
                    "&" | "|" => 2,
                    _ => {
                        return Err(DomainError::UnknownOperator {
                            position,
                            operator: op.clone(),
                        })
                    }
                };
                if operands < arity {
                    return Err(DomainError::MissingOperand {
                        position,
                        operator: op.clone(),
                    });
                }
                operands = operands - arity + 1;
            }
            Value::Array(leaf) => {
                validate_leaf(position, leaf)?;
                operands += 1;
            }
            _ => return Err(DomainError::MalformedTerm { position }),
        }
    }
    Ok(())
}

fn validate_leaf(position: usize, leaf: &[Value]) -> Result<(), DomainError> {
    let [field, operator, value] = leaf else {
        return Err(DomainError::MalformedTerm { position });
    };
    // Constant leaves use 0 or 1 in the field slot.
    if !(field.is_string() || field.is_i64()) {
        return Err(DomainError::MalformedTerm { position });
    }
    let Some(operator) = operator.as_str() else {
        return Err(DomainError::MalformedTerm { position });
    };
    if NESTED_OPERATORS.contains(&operator) {
        if let Value::Array(nested) = value {
            validate_terms(nested).map_err(|source| DomainError::Nested {
                position,
                source: Box::new(source),
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_of_two_leaves_is_prefix_encoded() {
        let domain = Domain::from(DomainTerm::Or(vec![
            DomainTerm::leaf("model", "ilike", "sale"),
            DomainTerm::leaf("name", "ilike", "sale"),
        ]));
        assert_eq!(
            domain.to_value(),
            json!(["|", ["model", "ilike", "sale"], ["name", "ilike", "sale"]])
        );
        domain.validate().unwrap();
    }

    #[test]
    fn nested_connectives_and_any() {
        let domain = Domain::from(DomainTerm::And(vec![
            DomainTerm::leaf("is_company", "=", true),
            DomainTerm::negate(DomainTerm::leaf("active", "=", false)),
            DomainTerm::any(
                "order_line",
                vec![DomainTerm::leaf("product_uom_qty", ">", 5)],
            ),
        ]));
        assert_eq!(
            domain.to_value(),
            json!([
                "&",
                "&",
                ["is_company", "=", true],
                "!",
                ["active", "=", false],
                ["order_line", "any", [["product_uom_qty", ">", 5]]]
            ])
        );
        domain.validate().unwrap();
    }

    #[test]
    fn empty_connectives_become_constant_leaves() {
        assert_eq!(
            Domain::from(DomainTerm::And(vec![])).to_value(),
            json!([[1, "=", 1]])
        );
        assert_eq!(
            Domain::from(DomainTerm::Or(vec![])).to_value(),
            json!([[0, "=", 1]])
        );
    }

    #[test]
    fn implicit_and_at_top_level_is_valid() {
        let domain: Domain = serde_json::from_value(json!([
            ["is_company", "=", true],
            ["active", "=", true]
        ]))
        .unwrap();
        domain.validate().unwrap();
        Domain::all().validate().unwrap();
    }

    #[test]
    fn dangling_operator_is_reported() {
        let domain: Domain =
            serde_json::from_value(json!(["|", ["name", "ilike", "test"]])).unwrap();
        assert_eq!(
            domain.validate(),
            Err(DomainError::MissingOperand {
                position: 0,
                operator: "|".into()
            })
        );
    }

    #[test]
    fn malformed_terms_are_reported() {
        let cases = [
            (json!(["^", ["a", "=", 1], ["b", "=", 2]]), "unknown"),
            (json!([["name", "="]]), "triple"),
            (json!([42]), "triple"),
            (json!([[["x"], "=", 1]]), "triple"),
        ];
        for (raw, needle) in cases {
            let domain: Domain = serde_json::from_value(raw.clone()).unwrap();
            let err = domain.validate().unwrap_err();
            assert!(
                err.to_string().contains(needle),
                "{raw} produced unexpected error: {err}"
            );
        }
    }

    #[test]
    fn nested_any_domain_is_checked() {
        let domain: Domain =
            serde_json::from_value(json!([["order_line", "any", ["!"]]])).unwrap();
        assert!(matches!(
            domain.validate(),
            Err(DomainError::Nested { position: 0, .. })
        ));
    }

    #[test]
    fn passthrough_preserves_caller_structure() {
        let raw = json!(["|", ["name", "ilike", "test"], ["email", "ilike", "test"]]);
        let domain: Domain = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&domain).unwrap(), raw);
    }
}
