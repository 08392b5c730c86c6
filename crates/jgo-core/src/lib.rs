//! Core data types for jgo.
//!
//! Defines the fundamental types shared by every other crate: Maven
//! coordinates and endpoint expressions, the dependency model (scope,
//! optionality, exclusions), the declarative project file and its lock
//! sibling. This crate is intentionally free of async code and network I/O —
//! everything here is pure parsing and data modelling.

pub mod coordinate;
pub mod dependency;
pub mod lockfile;
pub mod project;
