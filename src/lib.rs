//! fieldgate validates records against a declarative schema before they are
//! written anywhere. The goal is to keep the decision about *what a record
//! may look like* separate from the decision about *what to do with a record
//! that doesn't look like that*, so the same schema can back a blocking
//! write path, an advisory migration period, or a batch audit without
//! changing shape.
//!
//! To do that, it provides:
//!
//! - A [`Schema`]: an immutable, construction-checked set of per-field
//!     rules, with a required/optional split, a ban list, and a strict flag
//!     for undeclared fields.
//! - [`Rule`][rule::Rule]s for each value type a record can hold, each with
//!     its own constraints (numeric and timestamp bounds, string lengths and
//!     patterns, allowed-value lists), combinable into type sets.
//! - A pure [`Schema::validate`]: every outcome is a [`Verdict`] — accepted,
//!     or rejected with an ordered list of `(field, problem)` faults. It
//!     never errors, performs no I/O, and holds no state between calls.
//! - A [`WriteGuard`] applying the two enforcement modes real write paths
//!     use: warn-and-admit or block, with optional grandfathering of
//!     records that were already invalid before an update.
//! - A serde description form for schemas, so they can live in
//!     configuration and be checked on the way in.
//!
//! # Examples
//!
//! ```
//! # use fieldgate::{Record, Schema, Verdict, rule::*};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::builder()
//!     .name("students")
//!     .req_add("gender", StrRule::new().build())
//!     .req_add("math_score", NumRule::new().min(0.0).max(100.0).build())
//!     .opt_add("race", StrRule::new().build().nullable())
//!     .build()?;
//!
//! let record = Record::new().set("gender", "female").set("math_score", 101);
//! match schema.validate(&record) {
//!     Verdict::Accepted => println!("ok"),
//!     Verdict::Rejected(faults) => {
//!         for fault in &faults {
//!             println!("{}", fault);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod guard;
mod record;
mod schema;
mod timestamp;
mod value;
mod verdict;

pub mod rule;

pub use self::error::{Error, Result};
pub use self::guard::{Action, Level, WriteGuard};
pub use self::record::Record;
pub use self::rule::Rule;
pub use self::schema::{Schema, SchemaBuilder};
pub use self::timestamp::Timestamp;
pub use self::value::Value;
pub use self::verdict::{Fault, Problem, Verdict};
