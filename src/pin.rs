//! Pin: the immutable descriptor of a declared symbol.
//!
//! Modeled per the design note in `spec.md` §9: a common header plus
//! kind-specific extras, with a minimal capability set (`path`, `kind`,
//! `to_suggestion`) standing in for a deep class hierarchy — the same shape
//! the teacher's `semantic::symbol_table::Symbol` uses (a tagged enum with
//! shared accessor methods), generalized here to a struct-plus-enum so the
//! shared header fields aren't repeated in every variant.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::source::NodeHandle;
use crate::suggestion::{Suggestion, SuggestionKind};

/// Class-side vs. instance-side. Applies to methods and variables; ignored
/// (always `Instance`) for pins where it has no meaning (constants, symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Class,
    Instance,
}

impl Scope {
    pub fn flipped(self) -> Self {
        match self {
            Scope::Class => Scope::Instance,
            Scope::Instance => Scope::Class,
        }
    }
}

/// Method/constant visibility. Pins without a meaningful visibility default
/// to `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Whether a `Namespace` pin opens a class or a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    Class,
    Module,
}

/// A single formal parameter of a method or attribute writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: SmolStr,
    /// Declared type, if the source annotated one.
    pub declared_type: Option<SmolStr>,
    /// Default-value source text, if any (used only for presentation).
    pub default: Option<SmolStr>,
    pub kind: ParameterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Required,
    Optional,
    Splat,
    DoubleSplat,
    Block,
    Keyword,
    KeywordRequired,
}

/// Discriminant used for `Pin::identity()` and dedup, independent of the
/// kind-specific payload carried in [`PinKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PinKindTag {
    Namespace,
    Method,
    Attribute,
    InstanceVariable,
    ClassVariable,
    Constant,
    GlobalVariable,
    Symbol,
}

/// Kind-specific extras. The common header lives on [`Pin`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinKind {
    Namespace { kind: NamespaceKind },
    Method,
    Attribute,
    InstanceVariable,
    ClassVariable,
    Constant,
    GlobalVariable,
    Symbol,
}

impl PinKind {
    pub fn tag(&self) -> PinKindTag {
        match self {
            PinKind::Namespace { .. } => PinKindTag::Namespace,
            PinKind::Method => PinKindTag::Method,
            PinKind::Attribute => PinKindTag::Attribute,
            PinKind::InstanceVariable => PinKindTag::InstanceVariable,
            PinKind::ClassVariable => PinKindTag::ClassVariable,
            PinKind::Constant => PinKindTag::Constant,
            PinKind::GlobalVariable => PinKindTag::GlobalVariable,
            PinKind::Symbol => PinKindTag::Symbol,
        }
    }
}

/// A declared symbol, produced by a [`crate::source::Source`] at parse time.
/// Pins are immutable once constructed; `ApiMap` only ever adds or evicts
/// whole pins, never mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub filename: SmolStr,
    /// Fully qualified enclosing namespace (`""` for top level).
    pub namespace: SmolStr,
    pub name: SmolStr,
    pub scope: Scope,
    pub visibility: Visibility,
    pub return_type: Option<SmolStr>,
    pub parameters: Vec<Parameter>,
    pub node: NodeHandle,
    pub kind: PinKind,
}

impl Pin {
    /// `(kind, namespace, name, scope)` — the tuple the spec uses for
    /// dedup when collapsing equal pins from overlapping sources.
    pub fn identity(&self) -> (PinKindTag, SmolStr, SmolStr, Scope) {
        (
            self.kind.tag(),
            self.namespace.clone(),
            self.name.clone(),
            self.scope,
        )
    }

    /// A dotted/hash/period path for the symbol, matching the syntax
    /// `get_path_suggestions` accepts: `A#m` for instance methods, `A.m` for
    /// class methods/singleton members, `A::B` for namespaces and
    /// constants.
    pub fn path(&self) -> String {
        match &self.kind {
            PinKind::Method | PinKind::Attribute => {
                let sep = match self.scope {
                    Scope::Instance => "#",
                    Scope::Class => ".",
                };
                format!("{}{}{}", self.namespace, sep, self.name)
            }
            PinKind::Namespace { .. } | PinKind::Constant => {
                if self.namespace.is_empty() {
                    self.name.to_string()
                } else {
                    format!("{}::{}", self.namespace, self.name)
                }
            }
            _ => self.name.to_string(),
        }
    }

    fn suggestion_kind(&self) -> SuggestionKind {
        match &self.kind {
            PinKind::Namespace { kind: NamespaceKind::Class } => SuggestionKind::Class,
            PinKind::Namespace { kind: NamespaceKind::Module } => SuggestionKind::Module,
            PinKind::Method => SuggestionKind::Method,
            PinKind::Attribute => SuggestionKind::Field,
            PinKind::InstanceVariable | PinKind::ClassVariable | PinKind::GlobalVariable => {
                SuggestionKind::Variable
            }
            PinKind::Constant => SuggestionKind::Constant,
            PinKind::Symbol => SuggestionKind::Keyword,
        }
    }

    /// Build the public presentation record for this pin. `return_type`
    /// overrides the pin's own declared type with an inferred one (the
    /// typical case — `ApiMap` resolves the signature chain and hands the
    /// result back in here), falling back to `self.return_type` when no
    /// inference result is supplied.
    pub fn to_suggestion(&self, return_type: Option<String>) -> Suggestion {
        Suggestion {
            label: self.name.to_string(),
            kind: self.suggestion_kind(),
            detail: self.detail(),
            docstring: None,
            return_type: return_type.or_else(|| self.return_type.as_ref().map(|t| t.to_string())),
            parameters: self.parameters.clone(),
            path: Some(self.path()),
            location: Some(self.node.span),
        }
    }

    fn detail(&self) -> Option<String> {
        match &self.kind {
            PinKind::Method | PinKind::Attribute if !self.parameters.is_empty() => {
                let params = self
                    .parameters
                    .iter()
                    .map(|p| p.name.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("({params})"))
            }
            _ => None,
        }
    }
}
