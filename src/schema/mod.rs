//! Schema layer: declarative payload contracts and the matcher (no I/O).
//!
//! Each API operation's payload shape is one [`Schema`] value from
//! [`registry`]; the same generic matcher interprets all of them.

pub mod registry;
mod rules;
mod violation;

pub use registry::{RECIPIENT_LIST_MAX, RECIPIENT_LIST_MIN};
pub use rules::{Clause, ItemRule, Rule, Schema, ValueKind};
pub use violation::{Reason, ValidationError, Violation};
