use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a field failed validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Problem {
    /// A required field was absent from the record.
    MissingRequired,
    /// The value's runtime type is not in the rule's accepted type set.
    WrongType,
    /// A numeric or timestamp value fell below the rule's minimum.
    BelowMinimum,
    /// A numeric or timestamp value exceeded the rule's maximum.
    AboveMaximum,
    /// A string was shorter than the rule's minimum length.
    TooShort,
    /// A string was longer than the rule's maximum length.
    TooLong,
    /// A string did not match the rule's regular expression.
    NoMatch,
    /// The value is excluded by the rule's `in`/`nin` lists.
    NotAllowed,
    /// The field name is on the schema's ban list.
    Banned,
    /// A field not named by the schema, refused under strict mode.
    UnexpectedField,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Problem::MissingRequired => "missing-required",
            Problem::WrongType => "wrong-type",
            Problem::BelowMinimum => "below-minimum",
            Problem::AboveMaximum => "above-maximum",
            Problem::TooShort => "too-short",
            Problem::TooLong => "too-long",
            Problem::NoMatch => "no-match",
            Problem::NotAllowed => "not-allowed",
            Problem::Banned => "banned",
            Problem::UnexpectedField => "unexpected-field",
        };
        f.write_str(s)
    }
}

/// One field-level validation failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub field: String,
    pub problem: Problem,
}

impl Fault {
    pub fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// The outcome of validating one record against a schema.
///
/// Always a value, never an error: a rejected record is an expected outcome,
/// and the caller decides what to do about it. The fault list is non-empty
/// exactly when the verdict is `Rejected`, and preserves emission order —
/// rule faults in field-name order, then extra-field faults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected(Vec<Fault>),
}

impl Verdict {
    /// Build a verdict from an accumulated fault list. Empty means accepted.
    pub(crate) fn from_faults(faults: Vec<Fault>) -> Self {
        if faults.is_empty() {
            Verdict::Accepted
        } else {
            Verdict::Rejected(faults)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The faults behind a rejection. Empty for an accepted record.
    pub fn faults(&self) -> &[Fault] {
        match self {
            Verdict::Accepted => &[],
            Verdict::Rejected(faults) => faults,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Accepted => f.write_str("accepted"),
            Verdict::Rejected(faults) => {
                f.write_str("rejected [")?;
                for (i, fault) in faults.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", fault)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_faults() {
        assert!(Verdict::from_faults(Vec::new()).is_accepted());
        let v = Verdict::from_faults(vec![Fault::new("math_score", Problem::AboveMaximum)]);
        assert!(!v.is_accepted());
        assert_eq!(v.faults().len(), 1);
    }

    #[test]
    fn display() {
        let v = Verdict::from_faults(vec![
            Fault::new("gender", Problem::MissingRequired),
            Fault::new("math_score", Problem::AboveMaximum),
        ]);
        assert_eq!(
            v.to_string(),
            "rejected [gender: missing-required, math_score: above-maximum]"
        );
    }

    #[test]
    fn problem_names() {
        let s = serde_json::to_string(&Problem::MissingRequired).unwrap();
        assert_eq!(s, "\"missing-required\"");
        let p: Problem = serde_json::from_str("\"unexpected-field\"").unwrap();
        assert_eq!(p, Problem::UnexpectedField);
    }
}
