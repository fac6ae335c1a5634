//! Row structs.
//!
//! Each submodule contains a `FromRow` struct matching the table columns and
//! a conversion into the matching `nutriquest_core` type.

pub mod character;
pub mod daily_facts;
pub mod quest;
pub mod weekly_record;
