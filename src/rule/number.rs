use serde::{Deserialize, Serialize};

use super::Rule;
use crate::error::{Error, Result};
use crate::value::Value;
use crate::verdict::{Fault, Problem};

#[inline]
fn is_false(v: &bool) -> bool {
    !v
}
#[inline]
fn is_nan(v: &f64) -> bool {
    v.is_nan()
}

/// Rule for numeric values.
///
/// This rule will only pass numbers. Validation passes if:
///
/// - If `max` is a number, the value is less than the maximum in `max`, or
///     equal to it if `ex_max` is not set to true.
/// - If `min` is a number, the value is greater than the minimum in `min`, or
///     equal to it if `ex_min` is not set to true.
/// - If the `in` list is not empty, the value must be among the values in it.
/// - The value must not be among the values in the `nin` list.
///
/// # Defaults
///
/// Fields that aren't specified for the rule use their defaults instead. The
/// defaults for each field are:
///
/// - comment: ""
/// - max: NaN
/// - min: NaN
/// - ex_max: false
/// - ex_min: false
/// - in_list: empty
/// - nin_list: empty
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NumRule {
    /// An optional comment explaining the rule.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// The maximum allowed value. If NaN, it is ignored.
    #[serde(skip_serializing_if = "is_nan")]
    pub max: f64,
    /// The minimum allowed value. If NaN, it is ignored.
    #[serde(skip_serializing_if = "is_nan")]
    pub min: f64,
    /// Changes `max` into an exclusive maximum.
    #[serde(skip_serializing_if = "is_false")]
    pub ex_max: bool,
    /// Changes `min` into an exclusive minimum.
    #[serde(skip_serializing_if = "is_false")]
    pub ex_min: bool,
    /// A vector of specific allowed values, stored under the `in` field. If empty, this vector is not checked against.
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<f64>,
    /// A vector of specific unallowed values, stored under the `nin` field.
    #[serde(rename = "nin", skip_serializing_if = "Vec::is_empty")]
    pub nin_list: Vec<f64>,
}

impl std::default::Default for NumRule {
    fn default() -> Self {
        Self {
            comment: String::new(),
            max: f64::NAN,
            min: f64::NAN,
            ex_max: false,
            ex_min: false,
            in_list: Vec::new(),
            nin_list: Vec::new(),
        }
    }
}

impl NumRule {
    /// Make a new rule with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a comment for the rule.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the maximum allowed value.
    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Set the minimum allowed value.
    pub fn min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    /// Set whether or not `max` is an exclusive maximum.
    pub fn ex_max(mut self, ex_max: bool) -> Self {
        self.ex_max = ex_max;
        self
    }

    /// Set whether or not `min` is an exclusive minimum.
    pub fn ex_min(mut self, ex_min: bool) -> Self {
        self.ex_min = ex_min;
        self
    }

    /// Add a value to the `in` list.
    pub fn in_add(mut self, add: f64) -> Self {
        self.in_list.push(add);
        self
    }

    /// Add a value to the `nin` list.
    pub fn nin_add(mut self, add: f64) -> Self {
        self.nin_list.push(add);
        self
    }

    /// Build this into a [`Rule`] enum.
    pub fn build(self) -> Rule {
        Rule::Num(Box::new(self))
    }

    pub(crate) fn check(&self, field: &str, value: &Value, faults: &mut Vec<Fault>) {
        let val = match value.as_num() {
            Some(v) => v,
            None => {
                faults.push(Fault::new(field, Problem::WrongType));
                return;
            }
        };
        if !self.in_list.is_empty() && !self.in_list.iter().any(|v| *v == val) {
            faults.push(Fault::new(field, Problem::NotAllowed));
        }
        if self.nin_list.iter().any(|v| *v == val) {
            faults.push(Fault::new(field, Problem::NotAllowed));
        }
        if !self.min.is_nan() && ((self.ex_min && val <= self.min) || (val < self.min)) {
            faults.push(Fault::new(field, Problem::BelowMinimum));
        }
        if !self.max.is_nan() && ((self.ex_max && val >= self.max) || (val > self.max)) {
            faults.push(Fault::new(field, Problem::AboveMaximum));
        }
    }

    pub(crate) fn well_formed(&self, field: &str) -> Result<()> {
        if !self.min.is_nan() && !self.max.is_nan() && self.min > self.max {
            return Err(Error::BadSchema(format!(
                "field {:?} has minimum {} above maximum {}",
                field, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &NumRule, value: impl Into<Value>) -> Vec<Fault> {
        let mut faults = Vec::new();
        rule.check("f", &value.into(), &mut faults);
        faults
    }

    #[test]
    fn unbounded() {
        let rule = NumRule::new();
        assert!(check(&rule, 0).is_empty());
        assert!(check(&rule, -1e300).is_empty());
        assert!(check(&rule, 1e300).is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let rule = NumRule::new().min(0.0).max(100.0);
        assert!(check(&rule, 0).is_empty());
        assert!(check(&rule, 100).is_empty());
        assert!(check(&rule, 50).is_empty());
        assert_eq!(check(&rule, -1)[0].problem, Problem::BelowMinimum);
        assert_eq!(check(&rule, 101)[0].problem, Problem::AboveMaximum);
    }

    #[test]
    fn exclusive_bounds() {
        let rule = NumRule::new().min(0.0).ex_min(true).max(100.0).ex_max(true);
        assert_eq!(check(&rule, 0)[0].problem, Problem::BelowMinimum);
        assert_eq!(check(&rule, 100)[0].problem, Problem::AboveMaximum);
        assert!(check(&rule, 99.5).is_empty());
    }

    #[test]
    fn in_nin_lists() {
        let rule = NumRule::new().in_add(1.0).in_add(2.0);
        assert!(check(&rule, 2).is_empty());
        assert_eq!(check(&rule, 3)[0].problem, Problem::NotAllowed);

        let rule = NumRule::new().nin_add(13.0);
        assert!(check(&rule, 12).is_empty());
        assert_eq!(check(&rule, 13)[0].problem, Problem::NotAllowed);
    }

    #[test]
    fn wrong_type_skips_bounds() {
        let rule = NumRule::new().min(0.0).max(100.0);
        let faults = check(&rule, "50");
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].problem, Problem::WrongType);
    }

    #[test]
    fn inverted_bounds_are_malformed() {
        assert!(NumRule::new().min(10.0).max(5.0).well_formed("f").is_err());
        assert!(NumRule::new().min(5.0).max(5.0).well_formed("f").is_ok());
        // An unset bound never conflicts
        assert!(NumRule::new().min(10.0).well_formed("f").is_ok());
    }

    #[test]
    fn ser_description() {
        let rule = NumRule::new().min(0.0).max(100.0);
        let encoded = serde_json::to_string(&rule).unwrap();
        assert_eq!(encoded, "{\"max\":100.0,\"min\":0.0}");
        let decoded: NumRule = serde_json::from_str(&encoded).unwrap();
        assert_eq!(rule, decoded);
    }
}
