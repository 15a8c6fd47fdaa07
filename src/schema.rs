use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::rule::Rule;
use crate::verdict::{Fault, Problem, Verdict};

#[inline]
fn is_false(v: &bool) -> bool {
    !v
}

/// The serialized description of a schema. A `Schema` is always constructed
/// through [`TryFrom`], so a decoded description cannot skip the
/// well-formedness checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct SchemaInner {
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    /// Fields that must be present, and the rule each must pass.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    req: BTreeMap<String, Rule>,
    /// Fields that may be present, and the rule each must pass when it is.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    opt: BTreeMap<String, Rule>,
    /// Field names that may not appear at all.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ban: Vec<String>,
    /// Refuse fields the schema doesn't declare.
    #[serde(skip_serializing_if = "is_false")]
    strict: bool,
}

/// A declarative description of the expected shape of a record: which fields
/// must or may be present, the [`Rule`] each must pass, which field names are
/// banned, and whether undeclared fields are tolerated.
///
/// A schema is checked once, at construction — via [`SchemaBuilder`] or by
/// deserializing a description — and is immutable afterwards, so any number
/// of [`validate`][Schema::validate] calls may share it without
/// synchronization. Malformed schemas (a field declared twice, a banned field
/// that is also declared, inverted bounds, an empty multi rule) fail
/// construction with [`Error::BadSchema`]; they are never deferred to
/// validation time.
///
/// # Examples
///
/// ```
/// # use fieldgate::{Schema, Record, rule::*};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = Schema::builder()
///     .name("students")
///     .req_add("gender", StrRule::new().build())
///     .req_add("math_score", NumRule::new().min(0.0).max(100.0).build())
///     .opt_add("race", StrRule::new().build().nullable())
///     .build()?;
///
/// let record = Record::new().set("gender", "female").set("math_score", 72);
/// assert!(schema.validate(&record).is_accepted());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaInner", into = "SchemaInner")]
pub struct Schema {
    inner: SchemaInner,
}

impl TryFrom<SchemaInner> for Schema {
    type Error = Error;

    fn try_from(inner: SchemaInner) -> Result<Self> {
        for name in inner.req.keys() {
            if inner.opt.contains_key(name) {
                return Err(Error::BadSchema(format!(
                    "field {:?} is declared both required and optional",
                    name
                )));
            }
        }
        for name in &inner.ban {
            if inner.req.contains_key(name) || inner.opt.contains_key(name) {
                return Err(Error::BadSchema(format!(
                    "banned field {:?} is also declared",
                    name
                )));
            }
        }
        for (name, rule) in inner.req.iter().chain(inner.opt.iter()) {
            rule.well_formed(name)?;
        }
        Ok(Schema { inner })
    }
}

impl From<Schema> for SchemaInner {
    fn from(schema: Schema) -> Self {
        schema.inner
    }
}

impl Schema {
    /// Start building a new schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The schema's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The schema's description.
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Whether undeclared fields are refused.
    pub fn is_strict(&self) -> bool {
        self.inner.strict
    }

    /// Look up the rule for a declared field.
    pub fn rule(&self, field: &str) -> Option<&Rule> {
        self.inner
            .req
            .get(field)
            .or_else(|| self.inner.opt.get(field))
    }

    /// Whether a field must be present in every record.
    pub fn is_required(&self, field: &str) -> bool {
        self.inner.req.contains_key(field)
    }

    /// Validate one record against the schema.
    ///
    /// Pure and total: no side effects, deterministic for identical inputs,
    /// and every outcome is a [`Verdict`] — a rejected record is a value,
    /// not an error. Faults are emitted for declared fields in field-name
    /// order, then for undeclared fields in record order.
    pub fn validate(&self, record: &Record) -> Verdict {
        let mut faults = Vec::new();

        // Merged name-ordered walk over req and opt. The two maps never
        // share a key (checked at construction).
        let mut req = self.inner.req.iter().peekable();
        let mut opt = self.inner.opt.iter().peekable();
        loop {
            let take_req = match (req.peek(), opt.peek()) {
                (None, None) => break,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (Some((rk, _)), Some((ok, _))) => rk < ok,
            };
            let (entry, required) = if take_req {
                (req.next(), true)
            } else {
                (opt.next(), false)
            };
            let Some((name, rule)) = entry else { break };
            match record.get(name) {
                None if required => {
                    faults.push(Fault::new(name.as_str(), Problem::MissingRequired))
                }
                None => (),
                Some(value) => rule.check(name, value, &mut faults),
            }
        }

        // Fields the schema doesn't declare
        for (name, _) in record.iter() {
            if self.inner.req.contains_key(name) || self.inner.opt.contains_key(name) {
                continue;
            }
            if self.inner.ban.iter().any(|b| b == name) {
                faults.push(Fault::new(name, Problem::Banned));
            } else if self.inner.strict {
                faults.push(Fault::new(name, Problem::UnexpectedField));
            }
        }

        Verdict::from_faults(faults)
    }
}

/// Builder for [`Schema`].
///
/// Chain the field adders, then call [`build`][SchemaBuilder::build], which
/// runs the construction-time checks.
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    description: String,
    req: Vec<(String, Rule)>,
    opt: Vec<(String, Rule)>,
    ban: Vec<String>,
    strict: bool,
}

impl SchemaBuilder {
    /// Make a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the schema's description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a required field and its rule.
    pub fn req_add(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.req.push((field.into(), rule));
        self
    }

    /// Add an optional field and its rule.
    pub fn opt_add(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.opt.push((field.into(), rule));
        self
    }

    /// Add a field name to the ban list.
    pub fn ban_add(mut self, field: impl Into<String>) -> Self {
        self.ban.push(field.into());
        self
    }

    /// Set whether undeclared fields are refused.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Run the construction-time checks and produce the schema.
    pub fn build(self) -> Result<Schema> {
        let mut req = BTreeMap::new();
        for (name, rule) in self.req {
            if req.contains_key(&name) {
                return Err(Error::BadSchema(format!(
                    "field {:?} is declared twice",
                    name
                )));
            }
            req.insert(name, rule);
        }
        let mut opt = BTreeMap::new();
        for (name, rule) in self.opt {
            if req.contains_key(&name) || opt.contains_key(&name) {
                return Err(Error::BadSchema(format!(
                    "field {:?} is declared twice",
                    name
                )));
            }
            opt.insert(name, rule);
        }
        Schema::try_from(SchemaInner {
            name: self.name,
            description: self.description,
            req,
            opt,
            ban: self.ban,
            strict: self.strict,
        })
    }
}
