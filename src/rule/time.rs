use educe::Educe;
use serde::{Deserialize, Serialize};

use super::Rule;
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use crate::value::Value;
use crate::verdict::{Fault, Problem};

#[inline]
fn is_false(v: &bool) -> bool {
    !v
}

#[inline]
fn time_is_max(v: &Timestamp) -> bool {
    *v == Timestamp::max_value()
}

#[inline]
fn time_is_min(v: &Timestamp) -> bool {
    *v == Timestamp::min_value()
}

/// Rule for timestamp values.
///
/// This rule will only pass timestamps. Validation passes if:
///
/// - The timestamp is less than the maximum in `max`, or equal to it if
///     `ex_max` is not set to true.
/// - The timestamp is greater than the minimum in `min`, or equal to it if
///     `ex_min` is not set to true.
///
/// # Defaults
///
/// Fields that aren't specified for the rule use their defaults instead. The
/// defaults for each field are:
///
/// - comment: ""
/// - max: Timestamp::max_value()
/// - min: Timestamp::min_value()
/// - ex_max: false
/// - ex_min: false
///
#[derive(Educe, Clone, Debug, Serialize, Deserialize)]
#[educe(PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct TimeRule {
    /// An optional comment explaining the rule.
    #[educe(PartialEq(ignore))]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// The maximum allowed timestamp.
    #[educe(Default(expression = Timestamp::max_value()))]
    #[serde(skip_serializing_if = "time_is_max")]
    pub max: Timestamp,
    /// The minimum allowed timestamp.
    #[educe(Default(expression = Timestamp::min_value()))]
    #[serde(skip_serializing_if = "time_is_min")]
    pub min: Timestamp,
    /// Changes `max` into an exclusive maximum.
    #[serde(skip_serializing_if = "is_false")]
    pub ex_max: bool,
    /// Changes `min` into an exclusive minimum.
    #[serde(skip_serializing_if = "is_false")]
    pub ex_min: bool,
}

impl TimeRule {
    /// Make a new rule with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a comment for the rule.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the maximum allowed timestamp.
    pub fn max(mut self, max: Timestamp) -> Self {
        self.max = max;
        self
    }

    /// Set the minimum allowed timestamp.
    pub fn min(mut self, min: Timestamp) -> Self {
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

    /// Build this into a [`Rule`] enum.
    pub fn build(self) -> Rule {
        Rule::Time(Box::new(self))
    }

    pub(crate) fn check(&self, field: &str, value: &Value, faults: &mut Vec<Fault>) {
        let val = match value.as_time() {
            Some(v) => v,
            None => {
                faults.push(Fault::new(field, Problem::WrongType));
                return;
            }
        };
        if (self.ex_min && val <= self.min) || val < self.min {
            faults.push(Fault::new(field, Problem::BelowMinimum));
        }
        if (self.ex_max && val >= self.max) || val > self.max {
            faults.push(Fault::new(field, Problem::AboveMaximum));
        }
    }

    pub(crate) fn well_formed(&self, field: &str) -> Result<()> {
        if self.min > self.max {
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
    use rand::prelude::*;

    fn check(rule: &TimeRule, value: impl Into<Value>) -> Vec<Fault> {
        let mut faults = Vec::new();
        rule.check("f", &value.into(), &mut faults);
        faults
    }

    fn rand_time<R: Rng>(rng: &mut R) -> Timestamp {
        let sec: i64 = rng.gen_range(-5..5);
        let nano: u32 = if rng.gen() { 0 } else { 999_999_999 };
        Timestamp::from_utc(sec, nano).unwrap()
    }

    #[test]
    fn any_time() {
        let rule = TimeRule::new();
        assert!(check(&rule, Timestamp::from_sec(0)).is_empty());
        assert!(check(&rule, Timestamp::min_value()).is_empty());
        assert!(check(&rule, Timestamp::max_value()).is_empty());
        assert_eq!(check(&rule, 0)[0].problem, Problem::WrongType);
    }

    #[test]
    fn bounds_are_inclusive() {
        let min = Timestamp::from_sec(100);
        let max = Timestamp::from_sec(200);
        let rule = TimeRule::new().min(min).max(max);
        assert!(check(&rule, min).is_empty());
        assert!(check(&rule, max).is_empty());
        assert_eq!(check(&rule, min.prev())[0].problem, Problem::BelowMinimum);
        assert_eq!(check(&rule, max.next())[0].problem, Problem::AboveMaximum);
    }

    #[test]
    fn exclusive_bounds() {
        let min = Timestamp::from_sec(100);
        let rule = TimeRule::new().min(min).ex_min(true);
        assert_eq!(check(&rule, min)[0].problem, Problem::BelowMinimum);
        assert!(check(&rule, min.next()).is_empty());
    }

    #[test]
    fn generate() {
        let valid_count = 10;
        let test_count = 100;
        let mut rng = rand::thread_rng();

        // Test timestamps in a range
        for _ in 0..valid_count {
            let val1 = rand_time(&mut rng);
            let val2 = rand_time(&mut rng);
            let (min, max) = if val1 < val2 { (val1, val2) } else { (val2, val1) };
            let rule = TimeRule::new().min(min).max(max);
            for _ in 0..test_count {
                let test_val = rand_time(&mut rng);
                assert_eq!(
                    (test_val >= min) && (test_val <= max),
                    check(&rule, test_val).is_empty(),
                    "{} was between {} and {} but failed validation",
                    test_val,
                    min,
                    max
                );
            }
        }
    }

    #[test]
    fn inverted_bounds_are_malformed() {
        let rule = TimeRule::new()
            .min(Timestamp::from_sec(10))
            .max(Timestamp::from_sec(5));
        assert!(rule.well_formed("f").is_err());
    }

    #[test]
    fn comment_ignored_by_eq() {
        let a = TimeRule::new().comment("insert time");
        let b = TimeRule::new();
        assert_eq!(a, b);
    }

    #[test]
    fn ser_default() {
        // Should be an empty map if we use the defaults
        let rule = TimeRule::default();
        let encoded = serde_json::to_string(&rule).unwrap();
        assert_eq!(encoded, "{}");
        let decoded: TimeRule = serde_json::from_str(&encoded).unwrap();
        assert_eq!(rule, decoded);
    }
}
