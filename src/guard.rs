use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::Schema;
use crate::verdict::Verdict;

/// What happens to a record that fails validation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Log the verdict at warn level and admit the record anyway.
    Warn,
    /// Refuse the record with [`Error::FailValidate`].
    #[default]
    Block,
}

/// Which writes are validated at all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Every write is validated.
    #[default]
    Strict,
    /// Updates to a record that already failed the schema are admitted
    /// unchecked, so pre-existing bad data doesn't wedge its own cleanup.
    Moderate,
}

/// Applies a [`Schema`] at a write path, with a configurable response to
/// rejection.
///
/// The guard is the policy layer over the pure [`Schema::validate`]: the
/// schema decides *whether* a record is acceptable, the guard decides *what
/// happens* when it isn't. Callers wanting a different policy than
/// warn-or-block can match on `Schema::validate` directly; the guard covers
/// the two modes real deployments use.
///
/// Defaults to [`Action::Block`] and [`Level::Strict`].
///
/// # Examples
///
/// ```
/// # use fieldgate::{Record, Schema, WriteGuard, Action, rule::*};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = Schema::builder()
///     .req_add("exam_score", NumRule::new().min(0.0).max(100.0).build())
///     .build()?;
/// let guard = WriteGuard::new(schema).action(Action::Warn);
///
/// // Advisory mode: rejected records are logged, then admitted
/// let record = Record::new().set("exam_score", 101);
/// assert!(guard.admit(&record).is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteGuard {
    schema: Schema,
    action: Action,
    level: Level,
}

impl WriteGuard {
    /// Make a new guard for the schema with the default configuration.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            action: Action::default(),
            level: Level::default(),
        }
    }

    /// Set the action taken on a rejected record.
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set which writes are validated.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// The schema this guard applies.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Admit or refuse a new record.
    pub fn admit(&self, record: &Record) -> Result<()> {
        match self.schema.validate(record) {
            Verdict::Accepted => Ok(()),
            verdict => match self.action {
                Action::Warn => {
                    log::warn!(
                        target: "fieldgate",
                        "record failed schema {:?}: {}",
                        self.schema.name(),
                        verdict
                    );
                    Ok(())
                }
                Action::Block => Err(Error::FailValidate(verdict)),
            },
        }
    }

    /// Admit or refuse an update, given the record's previous version.
    ///
    /// Under [`Level::Moderate`], an update whose previous version already
    /// failed the schema is admitted without checking the new one.
    pub fn admit_update(&self, old: &Record, new: &Record) -> Result<()> {
        if self.level == Level::Moderate && !self.schema.validate(old).is_accepted() {
            return Ok(());
        }
        self.admit(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::NumRule;
    use crate::verdict::Problem;

    fn scores() -> Schema {
        Schema::builder()
            .name("scores")
            .req_add("exam_score", NumRule::new().min(0.0).max(100.0).build())
            .build()
            .unwrap()
    }

    #[test]
    fn block_refuses_with_verdict() {
        let guard = WriteGuard::new(scores());
        let record = Record::new().set("exam_score", 101);
        match guard.admit(&record) {
            Err(Error::FailValidate(verdict)) => {
                assert_eq!(verdict.faults()[0].problem, Problem::AboveMaximum);
            }
            other => panic!("expected FailValidate, got {:?}", other),
        }
        assert!(guard.admit(&Record::new().set("exam_score", 100)).is_ok());
    }

    #[test]
    fn warn_admits_everything() {
        let guard = WriteGuard::new(scores()).action(Action::Warn);
        assert!(guard.admit(&Record::new().set("exam_score", 101)).is_ok());
        assert!(guard.admit(&Record::new()).is_ok());
    }

    #[test]
    fn moderate_grandfathers_bad_records() {
        let guard = WriteGuard::new(scores()).level(Level::Moderate);
        let old_bad = Record::new().set("exam_score", 300);
        let old_good = Record::new().set("exam_score", 50);
        let new_bad = Record::new().set("exam_score", 200);

        // Previous version was already invalid: admitted unchecked
        assert!(guard.admit_update(&old_bad, &new_bad).is_ok());
        // Previous version was valid: the update must pass
        assert!(guard.admit_update(&old_good, &new_bad).is_err());
    }

    #[test]
    fn strict_checks_every_update() {
        let guard = WriteGuard::new(scores());
        let old_bad = Record::new().set("exam_score", 300);
        let new_bad = Record::new().set("exam_score", 200);
        assert!(guard.admit_update(&old_bad, &new_bad).is_err());
    }
}
