//! Field rules, for building Schemas.
//!
//! This submodule contains the per-type rules, which can be turned into the
//! [`Rule`] enum type for use in a Schema. Each struct acts as a constructor
//! that can be built into a `Rule`.
//!
//! Rules are not run directly; they are attached to fields of a
//! [`Schema`][crate::Schema], which runs them against the matching field of
//! each record it validates.
//!
//! There is a rule for each record value type:
//! - [`Rule::Null`][Rule::new_null] - for the null value.
//! - [`BoolRule`] - for booleans.
//! - [`NumRule`] - for numeric values.
//! - [`StrRule`] - for UTF-8 strings.
//! - [`TimeRule`] - for [`Timestamp`][crate::Timestamp] values.
//!
//! In addition, there are 2 special rules:
//! - [`Rule::Multi`][Rule::new_multi] - a set of rules, passing if any one
//!     of them passes. This is how a field accepts more than one type; the
//!     common string-or-null case has the [`nullable`][Rule::nullable]
//!     shorthand.
//! - [`Rule::Any`][Rule::new_any] - accepts any value without examining it.
//!
//! # Examples
//!
//! Say we want to check exam result records. A score must be a number from 0
//! to 100, and the grading track is one of two known strings but may also be
//! null for legacy rows:
//!
//! ```
//! # use fieldgate::rule::*;
//! let score = NumRule::new().min(0.0).max(100.0).build();
//! let track = StrRule::new()
//!     .in_add("standard")
//!     .in_add("advanced")
//!     .build()
//!     .nullable();
//! ```

mod bool;
mod number;
mod str;
mod time;

pub use self::bool::*;
pub use self::number::*;
pub use self::str::*;
pub use self::time::*;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;
use crate::verdict::{Fault, Problem};

/// A field rule, deciding which values a single record field may hold.
///
/// This enum contains all possible rules. See the
/// [module-level documentation][crate::rule] for details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Passes only the null value.
    Null,
    /// [`BoolRule`] - for booleans.
    Bool(Box<BoolRule>),
    /// [`NumRule`] - for numeric values.
    Num(Box<NumRule>),
    /// [`StrRule`] - for UTF-8 strings.
    Str(Box<StrRule>),
    /// [`TimeRule`] - for [`Timestamp`][crate::Timestamp] values.
    Time(Box<TimeRule>),
    /// Passes if any rule in the list passes.
    Multi(Vec<Rule>),
    /// Passes any value without examining it.
    Any,
}

impl Rule {
    /// Create a new rule for the null value.
    pub fn new_null() -> Self {
        Self::Null
    }

    /// Create a new rule that passes any value.
    pub fn new_any() -> Self {
        Self::Any
    }

    /// Create a new rule passing if any of the given rules pass.
    pub fn new_multi(rules: impl Into<Vec<Rule>>) -> Self {
        Self::Multi(rules.into())
    }

    /// Widen this rule to also accept null. A `Multi` gains a null branch;
    /// anything else becomes a two-branch `Multi`.
    pub fn nullable(self) -> Self {
        match self {
            Rule::Null => Rule::Null,
            Rule::Multi(mut rules) => {
                if !rules.contains(&Rule::Null) {
                    rules.push(Rule::Null);
                }
                Rule::Multi(rules)
            }
            rule => Rule::Multi(vec![rule, Rule::Null]),
        }
    }

    /// Run the rule against one field value, appending any faults found.
    /// Emits at most one `wrong-type` fault; constraint checks only run when
    /// the type matched.
    pub(crate) fn check(&self, field: &str, value: &Value, faults: &mut Vec<Fault>) {
        match self {
            Rule::Null => {
                if !value.is_null() {
                    faults.push(Fault::new(field, Problem::WrongType));
                }
            }
            Rule::Bool(rule) => rule.check(field, value, faults),
            Rule::Num(rule) => rule.check(field, value, faults),
            Rule::Str(rule) => rule.check(field, value, faults),
            Rule::Time(rule) => rule.check(field, value, faults),
            Rule::Multi(rules) => {
                // Pass on the first clean branch. Otherwise report the
                // faults of the first branch whose type matched, or a single
                // wrong-type if none did.
                let mut matched: Option<Vec<Fault>> = None;
                for rule in rules {
                    let mut branch = Vec::new();
                    rule.check(field, value, &mut branch);
                    if branch.is_empty() {
                        return;
                    }
                    let type_matched = !branch.iter().any(|f| f.problem == Problem::WrongType);
                    if matched.is_none() && type_matched {
                        matched = Some(branch);
                    }
                }
                match matched {
                    Some(branch) => faults.extend(branch),
                    None => faults.push(Fault::new(field, Problem::WrongType)),
                }
            }
            Rule::Any => (),
        }
    }

    /// Verify the rule can pass at least one value, recursing through
    /// `Multi`. Called once when the owning schema is built.
    pub(crate) fn well_formed(&self, field: &str) -> Result<()> {
        match self {
            Rule::Bool(_) | Rule::Null | Rule::Any => Ok(()),
            Rule::Num(rule) => rule.well_formed(field),
            Rule::Str(rule) => rule.well_formed(field),
            Rule::Time(rule) => rule.well_formed(field),
            Rule::Multi(rules) => {
                if rules.is_empty() {
                    return Err(Error::BadSchema(format!(
                        "field {:?} has a multi rule with no branches",
                        field
                    )));
                }
                for rule in rules {
                    rule.well_formed(field)?;
                }
                Ok(())
            }
        }
    }
}
