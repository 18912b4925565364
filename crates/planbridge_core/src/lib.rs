//! Planner side of operator definitions and table handles.
//!
//! Parsed expressions are bound to calls of static operator definitions,
//! validated against each operator's operand checker, and rendered back to
//! SQL. Tables are exposed to the planner through `TableHandle`.
pub mod binder;
pub mod catalog;
pub mod config;
pub mod datatype;
pub mod errors;
pub mod explain;
pub mod expr;
pub mod field;
pub mod functions;
pub mod logical;
pub mod planner;
pub mod scalar;
pub mod statistics;
pub mod table;
pub mod unparse;
pub mod validate;
