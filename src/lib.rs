//! Symbol-resolution and type-inference core for a dynamically-typed,
//! class-based, mixin-enabled object-oriented language.
//!
//! [`ApiMap`] is the entry point: it indexes [`Source`]s, resolves
//! namespaces under nested scoping and mixin inheritance, enumerates
//! methods and constants, infers expression types by walking method-call
//! chains, and reconciles those results with a documentation archive
//! ([`YardMap`]) and a runtime-introspection side channel ([`LiveMap`]).
//! See `SPEC_FULL.md` and `DESIGN.md` for the full design.

pub mod api_map;
pub mod base;
pub mod cache;
pub mod config;
pub mod error;
pub mod live_map;
pub mod pin;
pub mod source;
pub mod suggestion;
pub mod yard_map;

pub use api_map::ApiMap;
pub use config::Config;
pub use error::ApiMapError;
pub use live_map::LiveMap;
pub use pin::{NamespaceKind, Parameter, ParameterKind, Pin, PinKind, Scope, Visibility};
pub use source::{Docstring, NodeHandle, Source, SourceFactory};
pub use suggestion::{Suggestion, SuggestionKind};
pub use yard_map::YardMap;
