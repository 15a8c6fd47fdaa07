use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Rule;
use crate::error::{Error, Result};
use crate::value::Value;
use crate::verdict::{Fault, Problem};

#[inline]
fn usize_is_zero(v: &usize) -> bool {
    *v == 0
}

#[inline]
fn usize_is_max(v: &usize) -> bool {
    *v == usize::MAX
}

/// Rule for UTF-8 string values.
///
/// This rule will only pass strings. Validation passes if:
///
/// - The number of bytes in the string is less than or equal to `max_len`.
/// - The number of bytes in the string is greater than or equal to `min_len`.
/// - The number of characters in the string is less than or equal to
///     `max_char`.
/// - The number of characters in the string is greater than or equal to
///     `min_char`.
/// - If the `in` list is not empty, the string must be among the strings in
///     it.
/// - The string must not be among the strings in the `nin` list.
/// - If a regular expression is present in `matches`, the string must match
///     against the expression.
///
/// # Defaults
///
/// Fields that aren't specified for the rule use their defaults instead. The
/// defaults for each field are:
///
/// - comment: ""
/// - in_list: empty
/// - nin_list: empty
/// - matches: None
/// - max_len: usize::MAX
/// - min_len: 0
/// - max_char: usize::MAX
/// - min_char: 0
///
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StrRule {
    /// An optional comment explaining the rule.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// A vector of specific allowed values, stored under the `in` field. If empty, this vector is not checked against.
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<String>,
    /// A vector of specific unallowed values, stored under the `nin` field.
    #[serde(rename = "nin", skip_serializing_if = "Vec::is_empty")]
    pub nin_list: Vec<String>,
    /// A regular expression that the value must match against.
    #[serde(skip_serializing_if = "Option::is_none", with = "serde_regex")]
    pub matches: Option<Box<Regex>>,
    /// The maximum allowed number of bytes in the string value.
    #[serde(skip_serializing_if = "usize_is_max")]
    pub max_len: usize,
    /// The minimum allowed number of bytes in the string value.
    #[serde(skip_serializing_if = "usize_is_zero")]
    pub min_len: usize,
    /// The maximum allowed number of unicode characters in the string value.
    #[serde(skip_serializing_if = "usize_is_max")]
    pub max_char: usize,
    /// The minimum allowed number of unicode characters in the string value.
    #[serde(skip_serializing_if = "usize_is_zero")]
    pub min_char: usize,
}

impl std::default::Default for StrRule {
    fn default() -> Self {
        Self {
            comment: String::new(),
            in_list: Vec::new(),
            nin_list: Vec::new(),
            matches: None,
            max_len: usize::MAX,
            min_len: usize::MIN,
            max_char: usize::MAX,
            min_char: usize::MIN,
        }
    }
}

impl PartialEq for StrRule {
    fn eq(&self, rhs: &Self) -> bool {
        (self.in_list == rhs.in_list)
            && (self.nin_list == rhs.nin_list)
            && (self.max_len == rhs.max_len)
            && (self.min_len == rhs.min_len)
            && (self.max_char == rhs.max_char)
            && (self.min_char == rhs.min_char)
            && match (&self.matches, &rhs.matches) {
                (None, None) => true,
                (Some(_), None) => false,
                (None, Some(_)) => false,
                (Some(lhs), Some(rhs)) => lhs.as_str() == rhs.as_str(),
            }
    }
}

impl StrRule {
    /// Make a new rule with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a comment for the rule.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Add a value to the `in` list.
    pub fn in_add(mut self, add: impl Into<String>) -> Self {
        self.in_list.push(add.into());
        self
    }

    /// Add a value to the `nin` list.
    pub fn nin_add(mut self, add: impl Into<String>) -> Self {
        self.nin_list.push(add.into());
        self
    }

    /// Set the regular expression to check against.
    pub fn matches(mut self, matches: Regex) -> Self {
        self.matches = Some(Box::new(matches));
        self
    }

    /// Set the maximum number of allowed bytes.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Set the minimum number of allowed bytes.
    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Set the maximum number of allowed characters.
    pub fn max_char(mut self, max_char: usize) -> Self {
        self.max_char = max_char;
        self
    }

    /// Set the minimum number of allowed characters.
    pub fn min_char(mut self, min_char: usize) -> Self {
        self.min_char = min_char;
        self
    }

    /// Build this into a [`Rule`] enum.
    pub fn build(self) -> Rule {
        Rule::Str(Box::new(self))
    }

    pub(crate) fn check(&self, field: &str, value: &Value, faults: &mut Vec<Fault>) {
        let val = match value.as_str() {
            Some(v) => v,
            None => {
                faults.push(Fault::new(field, Problem::WrongType));
                return;
            }
        };

        // Length checks
        if val.len() > self.max_len {
            faults.push(Fault::new(field, Problem::TooLong));
        }
        if val.len() < self.min_len {
            faults.push(Fault::new(field, Problem::TooShort));
        }
        if self.max_char < usize::MAX || self.min_char > 0 {
            let len_char = bytecount::num_chars(val.as_bytes());
            if len_char > self.max_char {
                faults.push(Fault::new(field, Problem::TooLong));
            }
            if len_char < self.min_char {
                faults.push(Fault::new(field, Problem::TooShort));
            }
        }

        // Content checks
        if !self.in_list.is_empty() && !self.in_list.iter().any(|v| *v == val) {
            faults.push(Fault::new(field, Problem::NotAllowed));
        }
        if self.nin_list.iter().any(|v| *v == val) {
            faults.push(Fault::new(field, Problem::NotAllowed));
        }
        if let Some(ref regex) = self.matches {
            if !regex.is_match(val) {
                faults.push(Fault::new(field, Problem::NoMatch));
            }
        }
    }

    pub(crate) fn well_formed(&self, field: &str) -> Result<()> {
        if self.min_len > self.max_len {
            return Err(Error::BadSchema(format!(
                "field {:?} has min_len {} above max_len {}",
                field, self.min_len, self.max_len
            )));
        }
        if self.min_char > self.max_char {
            return Err(Error::BadSchema(format!(
                "field {:?} has min_char {} above max_char {}",
                field, self.min_char, self.max_char
            )));
        }
        Ok(())
    }
}

pub(super) mod serde_regex {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Box<Regex>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => {
                serializer.serialize_none() // This should never actually happen, it should be skipped
            }
            Some(regex) => serializer.serialize_str(regex.as_str()),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Box<Regex>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        // Note that this will not accept a null value - it *must* be a string,
        // even though this ends up as an Option. This is because we chose to
        // have rules where the field is either defined, or it is absent.
        let regex: String = String::deserialize(deserializer)?;
        let regex = Regex::new(&regex).map_err(|e| D::Error::custom(e.to_string()))?;
        Ok(Some(Box::new(regex)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &StrRule, value: impl Into<Value>) -> Vec<Fault> {
        let mut faults = Vec::new();
        rule.check("f", &value.into(), &mut faults);
        faults
    }

    #[test]
    fn any_string() {
        let rule = StrRule::new();
        assert!(check(&rule, "").is_empty());
        assert!(check(&rule, "female").is_empty());
        assert_eq!(check(&rule, 1)[0].problem, Problem::WrongType);
    }

    #[test]
    fn byte_lengths() {
        let rule = StrRule::new().min_len(2).max_len(4);
        assert!(check(&rule, "ab").is_empty());
        assert!(check(&rule, "abcd").is_empty());
        assert_eq!(check(&rule, "a")[0].problem, Problem::TooShort);
        assert_eq!(check(&rule, "abcde")[0].problem, Problem::TooLong);
    }

    #[test]
    fn char_counts() {
        // 2 characters, 8 bytes
        let rule = StrRule::new().max_char(2);
        assert!(check(&rule, "\u{1F600}\u{1F600}").is_empty());
        assert_eq!(
            check(&rule, "\u{1F600}\u{1F600}\u{1F600}")[0].problem,
            Problem::TooLong
        );
    }

    #[test]
    fn in_nin_lists() {
        let rule = StrRule::new().in_add("male").in_add("female");
        assert!(check(&rule, "female").is_empty());
        assert_eq!(check(&rule, "unknown")[0].problem, Problem::NotAllowed);

        let rule = StrRule::new().nin_add("root");
        assert!(check(&rule, "admin").is_empty());
        assert_eq!(check(&rule, "root")[0].problem, Problem::NotAllowed);
    }

    #[test]
    fn regex_match() {
        let rule = StrRule::new().matches(Regex::new("^[a-z_]+$").unwrap());
        assert!(check(&rule, "test_prep_course").is_empty());
        assert_eq!(check(&rule, "Test Prep")[0].problem, Problem::NoMatch);
    }

    #[test]
    fn inverted_lengths_are_malformed() {
        assert!(StrRule::new().min_len(5).max_len(2).well_formed("f").is_err());
        assert!(StrRule::new().min_char(5).max_char(2).well_formed("f").is_err());
        assert!(StrRule::new().min_len(2).max_len(5).well_formed("f").is_ok());
    }

    #[test]
    fn ser_description() {
        let rule = StrRule::new()
            .matches(Regex::new("^f").unwrap())
            .max_len(16);
        let encoded = serde_json::to_string(&rule).unwrap();
        assert_eq!(encoded, "{\"matches\":\"^f\",\"max_len\":16}");
        let decoded: StrRule = serde_json::from_str(&encoded).unwrap();
        assert_eq!(rule, decoded);
    }

    #[test]
    fn bad_regex_description() {
        assert!(serde_json::from_str::<StrRule>("{\"matches\": \"[\"}").is_err());
    }
}
