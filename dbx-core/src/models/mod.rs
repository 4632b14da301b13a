//! Immutable metadata entities.
//!
//! Every entity is produced through a staging builder that is mutable only
//! until `build()`. Sequences are frozen into boxed slices on build and
//! keep insertion order. Parents own their children outright; cross
//! references such as a foreign key's target table are by name only.
//!
//! All entities serialize with `serde`; enum values use upper snake case
//! (`SET_NULL`, `INSTEAD_OF`) and absent optional fields are omitted.

mod column;
mod database;
mod index;
mod keys;
mod relation;
mod routine;

pub use column::{Column, ColumnBuilder};
pub use database::{Database, DatabaseBuilder, Schema, SchemaBuilder};
pub use index::{Index, IndexBuilder, IndexColumn, IndexType, SortOrder};
pub use keys::{ForeignKey, ForeignKeyAction, ForeignKeyBuilder, PrimaryKey, PrimaryKeyBuilder};
pub use relation::{Table, TableBuilder, TableType, View, ViewBuilder};
pub use routine::{
    Parameter, ParameterMode, Procedure, ProcedureBuilder, ProcedureKind, Trigger, TriggerBuilder,
    TriggerEvent, TriggerTiming,
};

#[cfg(test)]
mod tests;
