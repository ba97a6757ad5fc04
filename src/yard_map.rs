//! The `YardMap` adapter: lookup of symbols from an external documentation
//! archive (spec.md §6: "YardMap contract (consumed)").
//!
//! The archive reader itself — the thing that parses a doc index off disk —
//! is out of scope (§2 row 5, §1 Non-goals). What belongs here is the
//! adapter boundary `ApiMap` calls through, plus a `NullYardMap` default and
//! a small in-memory `RegistryYardMap` for callers who have already ingested
//! entries and just need to serve queries against them.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::pin::Visibility;
use crate::suggestion::Suggestion;

/// `class|module|null` per spec §6; `None` means YardMap has no opinion on
/// whether the FQN is a class or a module (distinct from not knowing the
/// FQN at all, which callers express by also getting an empty method list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceType {
    Class,
    Module,
}

/// The external documentation-archive boundary `ApiMap` consumes.
///
/// All methods are queries over already-ingested data; nothing here
/// triggers re-reading the archive from disk. `ApiMap` calls `objects("")`
/// at most once per stale cycle (see `api_map::paths`), gated by its own
/// `yard_stale` bit, so a real adapter can memoize internally across the
/// rest of a refresh without this crate dictating how.
pub trait YardMap {
    fn get_constants(&self, fqns: &str) -> Vec<Suggestion>;
    fn get_methods(&self, fqns: &str, root: &str, visibility: Visibility) -> Vec<Suggestion>;
    fn get_instance_methods(&self, fqns: &str, root: &str, visibility: Visibility) -> Vec<Suggestion>;
    fn get_namespace_type(&self, fqns: &str) -> Option<NamespaceType>;
    fn find_fully_qualified_namespace(&self, name: &str, root: &str) -> Option<String>;
    fn objects(&self, path: &str) -> Vec<Suggestion>;
    fn search(&self, query: &str) -> Vec<Suggestion>;
    fn document(&self, path: &str) -> Vec<Suggestion>;
    /// Library names this adapter has ingested documentation for.
    fn required(&self) -> &[SmolStr];
}

/// Default adapter: silent on every query. Used when no documentation
/// archive is wired up, so `ApiMap` degrades to workspace-only results
/// rather than failing.
#[derive(Debug, Default)]
pub struct NullYardMap;

impl YardMap for NullYardMap {
    fn get_constants(&self, _fqns: &str) -> Vec<Suggestion> {
        Vec::new()
    }

    fn get_methods(&self, _fqns: &str, _root: &str, _visibility: Visibility) -> Vec<Suggestion> {
        Vec::new()
    }

    fn get_instance_methods(
        &self,
        _fqns: &str,
        _root: &str,
        _visibility: Visibility,
    ) -> Vec<Suggestion> {
        Vec::new()
    }

    fn get_namespace_type(&self, _fqns: &str) -> Option<NamespaceType> {
        None
    }

    fn find_fully_qualified_namespace(&self, _name: &str, _root: &str) -> Option<String> {
        None
    }

    fn objects(&self, _path: &str) -> Vec<Suggestion> {
        Vec::new()
    }

    fn search(&self, _query: &str) -> Vec<Suggestion> {
        Vec::new()
    }

    fn document(&self, _path: &str) -> Vec<Suggestion> {
        Vec::new()
    }

    fn required(&self) -> &[SmolStr] {
        &[]
    }
}

/// An in-memory `YardMap` over pre-ingested entries, keyed by FQN. Intended
/// for tests and for embedders who have already run the (out-of-scope)
/// archive reader and just want to hand its output to `ApiMap`.
#[derive(Debug, Default)]
pub struct RegistryYardMap {
    constants: IndexMap<SmolStr, Vec<Suggestion>>,
    class_methods: IndexMap<SmolStr, Vec<Suggestion>>,
    instance_methods: IndexMap<SmolStr, Vec<Suggestion>>,
    namespace_types: IndexMap<SmolStr, NamespaceType>,
    objects: Vec<Suggestion>,
    required: Vec<SmolStr>,
}

impl RegistryYardMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constant(&mut self, fqns: impl Into<SmolStr>, suggestion: Suggestion) {
        self.constants.entry(fqns.into()).or_default().push(suggestion);
    }

    pub fn add_class_method(&mut self, fqns: impl Into<SmolStr>, suggestion: Suggestion) {
        self.class_methods.entry(fqns.into()).or_default().push(suggestion);
    }

    pub fn add_instance_method(&mut self, fqns: impl Into<SmolStr>, suggestion: Suggestion) {
        self.instance_methods
            .entry(fqns.into())
            .or_default()
            .push(suggestion);
    }

    pub fn set_namespace_type(&mut self, fqns: impl Into<SmolStr>, kind: NamespaceType) {
        self.namespace_types.insert(fqns.into(), kind);
    }

    pub fn add_object(&mut self, suggestion: Suggestion) {
        self.objects.push(suggestion);
    }

    pub fn add_required(&mut self, libname: impl Into<SmolStr>) {
        self.required.push(libname.into());
    }
}

impl YardMap for RegistryYardMap {
    fn get_constants(&self, fqns: &str) -> Vec<Suggestion> {
        self.constants.get(fqns).cloned().unwrap_or_default()
    }

    fn get_methods(&self, fqns: &str, _root: &str, visibility: Visibility) -> Vec<Suggestion> {
        let _ = visibility;
        self.class_methods.get(fqns).cloned().unwrap_or_default()
    }

    fn get_instance_methods(
        &self,
        fqns: &str,
        _root: &str,
        visibility: Visibility,
    ) -> Vec<Suggestion> {
        let _ = visibility;
        self.instance_methods.get(fqns).cloned().unwrap_or_default()
    }

    fn get_namespace_type(&self, fqns: &str) -> Option<NamespaceType> {
        self.namespace_types.get(fqns).copied()
    }

    fn find_fully_qualified_namespace(&self, name: &str, root: &str) -> Option<String> {
        let candidate = if root.is_empty() {
            name.to_string()
        } else {
            format!("{root}::{name}")
        };
        if self.namespace_types.contains_key(candidate.as_str())
            || self.constants.contains_key(candidate.as_str())
        {
            Some(candidate)
        } else if self.namespace_types.contains_key(name) {
            Some(name.to_string())
        } else {
            None
        }
    }

    fn objects(&self, path: &str) -> Vec<Suggestion> {
        if path.is_empty() {
            self.objects.clone()
        } else {
            self.objects
                .iter()
                .filter(|s| s.path.as_deref() == Some(path))
                .cloned()
                .collect()
        }
    }

    fn search(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.to_lowercase();
        self.objects
            .iter()
            .filter(|s| s.label.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn document(&self, path: &str) -> Vec<Suggestion> {
        self.objects
            .iter()
            .filter(|s| s.path.as_deref() == Some(path))
            .cloned()
            .collect()
    }

    fn required(&self) -> &[SmolStr] {
        &self.required
    }
}
