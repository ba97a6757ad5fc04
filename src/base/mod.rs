//! Foundation types shared by every other module.
//!
//! Mirrors the teacher's `base` module: small, dependency-free types that
//! the rest of the crate builds on. This module has no dependency on
//! `pin`, `source`, or `api_map`.

mod position;

pub use position::{Position, Span};
