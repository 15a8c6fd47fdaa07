use serde::{Deserialize, Serialize};

use super::Rule;
use crate::value::Value;
use crate::verdict::{Fault, Problem};

#[inline]
fn is_none<T>(v: &Option<T>) -> bool {
    v.is_none()
}

/// Rule for boolean values.
///
/// This rule will only pass booleans. Validation passes if `eq` is unset, or
/// the value equals it.
///
/// # Defaults
///
/// Fields that aren't specified for the rule use their defaults instead. The
/// defaults for each field are:
///
/// - comment: ""
/// - eq: None
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoolRule {
    /// An optional comment explaining the rule.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// The exact value the boolean must hold, if set.
    #[serde(skip_serializing_if = "is_none")]
    pub eq: Option<bool>,
}

impl BoolRule {
    /// Make a new rule with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a comment for the rule.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Require the boolean to hold an exact value.
    pub fn eq(mut self, eq: bool) -> Self {
        self.eq = Some(eq);
        self
    }

    /// Build this into a [`Rule`] enum.
    pub fn build(self) -> Rule {
        Rule::Bool(Box::new(self))
    }

    pub(crate) fn check(&self, field: &str, value: &Value, faults: &mut Vec<Fault>) {
        let val = match value.as_bool() {
            Some(v) => v,
            None => {
                faults.push(Fault::new(field, Problem::WrongType));
                return;
            }
        };
        if let Some(eq) = self.eq {
            if val != eq {
                faults.push(Fault::new(field, Problem::NotAllowed));
            }
        }
    }
}
