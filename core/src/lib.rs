//! Engine-agnostic building blocks for sqlgate.
//!
//! - [`gate::Gate`]: a one-shot latch with an ordered backlog, used to defer work until a
//!   prerequisite (an open connection, a compiled statement) is satisfied.
//! - [`statement`]: the five statement shapes and their deterministic text rendering.
//! - [`column::ColumnRef`], [`field::Field`], [`predicate::Predicate`]: the pieces statements
//!   are assembled from.

pub mod column;
pub mod field;
pub mod gate;
pub mod predicate;
pub mod statement;
pub mod util;

pub use column::ColumnRef;
pub use field::{Field, FieldOptions};
pub use gate::Gate;
pub use predicate::Predicate;
pub use statement::{Create, Delete, Direction, Insert, Order, Page, Select, Statement, StatementKind, Update};

// used by the action_* macros
#[doc(hidden)]
pub use tracing;
