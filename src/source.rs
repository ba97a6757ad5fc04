//! The `Source` façade: a read-only view of one parsed file.
//!
//! `Source` and `SourceFactory` are the external contract from `spec.md` §6.
//! Source parsing and AST construction are out of scope for this crate —
//! the parser lives upstream and hands `ApiMap` a type implementing these
//! two traits. `NodeHandle` stands in for the "opaque AST handle" the spec
//! describes: just enough (a span, and a way to read the underlying text)
//! for pins to report a location and for docstrings to be retrieved.

use std::time::SystemTime;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Span;
use crate::pin::Pin;

/// An opaque handle to an AST node. Real implementations will wrap a
/// parser's own node/pointer type; this crate only ever reads the span and
/// asks the owning `Source` for text/docs through the node's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub span: Span,
    /// A small opaque id the concrete `Source` implementation assigns,
    /// used as the key into `docstring_for`/`code_for`/`include?` — this
    /// crate never interprets it.
    pub id: u32,
}

impl NodeHandle {
    pub fn new(id: u32, span: Span) -> Self {
        Self { span, id }
    }
}

/// A docstring attached to a declaration, as produced by the upstream
/// parser/comment-extractor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Docstring {
    pub text: String,
    /// Declared `@param`/`@return`-style type tags, keyed by parameter name
    /// (`"return"` for the return-type tag). Used by
    /// `api_map::signature::get_return_type_from_macro`.
    pub type_tags: IndexMap<SmolStr, SmolStr>,
}

/// Read-only view of a parsed file.
///
/// An implementation backs every accessor with data produced at parse time;
/// nothing here triggers re-parsing. `ApiMap` calls `namespace_nodes`,
/// `namespace_includes`, `namespace_extends`, `superclasses`, and the pin
/// collections once per `process_maps`/`process_virtual` and caches the
/// results in its own indices.
pub trait Source {
    fn filename(&self) -> &str;
    fn mtime(&self) -> SystemTime;

    /// The file's root AST node.
    fn root(&self) -> NodeHandle;

    /// FQN -> AST nodes that (re)open that namespace in this file.
    fn namespace_nodes(&self) -> &IndexMap<SmolStr, Vec<NodeHandle>>;
    /// FQN -> `include` targets as written (unresolved).
    fn namespace_includes(&self) -> &IndexMap<SmolStr, Vec<SmolStr>>;
    /// FQN -> `extend` targets as written (unresolved).
    fn namespace_extends(&self) -> &IndexMap<SmolStr, Vec<SmolStr>>;
    /// FQN -> parent class name as written (unresolved).
    fn superclasses(&self) -> &IndexMap<SmolStr, SmolStr>;
    /// Library names this file declares a dependency on.
    fn required(&self) -> &[SmolStr];

    fn namespace_pins(&self) -> &[Pin];
    fn method_pins(&self) -> &[Pin];
    fn attribute_pins(&self) -> &[Pin];
    fn instance_variable_pins(&self) -> &[Pin];
    fn class_variable_pins(&self) -> &[Pin];
    fn constant_pins(&self) -> &[Pin];
    fn global_variable_pins(&self) -> &[Pin];
    fn symbol_pins(&self) -> &[Pin];

    /// True if `node` lies within this source's tree (used to validate a
    /// node handle before dereferencing it for text/docs).
    fn includes_node(&self, node: NodeHandle) -> bool;
    fn docstring_for(&self, node: NodeHandle) -> Option<Docstring>;
    fn code_for(&self, node: NodeHandle) -> String;
}

/// Factory forms a `Source` implementation must provide (spec §6: `load`,
/// `virtual`, `fix`).
pub trait SourceFactory: Source + Sized {
    /// Parse `filename` from disk.
    fn load(filename: &str) -> std::io::Result<Self>;

    /// Build a `Source` from in-memory `code` that is not backed by a file
    /// on disk (or shadows one — the overlay buffer).
    fn virtual_source(code: &str, filename: &str) -> Self;

    /// Like `virtual_source`, but tolerant of incomplete/mid-edit text: a
    /// harmless token is substituted at `cursor` so the parser does not
    /// choke on a dangling `.` or open paren while the user is mid-keystroke.
    fn fix(code: &str, filename: &str, cursor: Option<usize>) -> Self;

    /// An empty source for a filename whose parse failed, so later
    /// references to that filename don't dangle (spec §4.1, §7).
    fn empty(filename: &str) -> Self {
        Self::virtual_source("", filename)
    }
}
