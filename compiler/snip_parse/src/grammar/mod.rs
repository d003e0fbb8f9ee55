//! Grammar productions, split by syntactic category.
//!
//! - `item.rs`: using directives, classes and members
//! - `stmt.rs`: blocks and statements
//! - `expr.rs`: expressions, by precedence level
//! - `ty.rs`: type references

mod expr;
mod item;
mod stmt;
mod ty;
