//! The `LiveMap` adapter: opportunistic runtime-sourced symbols (spec.md
//! §6: "LiveMap contract (consumed)").
//!
//! The runtime-introspection plugin channel that actually talks to a live
//! process is out of scope (§2 row 6); this is the trait boundary plus a
//! silent default and a small in-memory test double.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::suggestion::Suggestion;

/// Class-side vs. instance-side, mirroring [`crate::pin::Scope`] but kept
/// distinct since a `LiveMap` adapter may have its own notion of "kind"
/// (e.g. a runtime that cannot always tell singleton methods from class
/// methods) independent of this crate's pin model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Class,
    Instance,
}

/// The runtime-introspection boundary `ApiMap` consumes.
pub trait LiveMap {
    fn get_fqns(&self, name: &str, root: &str) -> Vec<String>;
    fn get_methods(
        &self,
        fqns: &str,
        root: &str,
        kind: MethodKind,
        include_private: bool,
    ) -> Vec<Suggestion>;
    /// Re-poll the live process. `ApiMap::process_maps` calls this once per
    /// rebuild (spec §4.1); a real adapter is free to no-op when nothing
    /// has changed since the last call.
    fn refresh(&mut self);
}

/// Default adapter: no live process attached.
#[derive(Debug, Default)]
pub struct NullLiveMap;

impl LiveMap for NullLiveMap {
    fn get_fqns(&self, _name: &str, _root: &str) -> Vec<String> {
        Vec::new()
    }

    fn get_methods(
        &self,
        _fqns: &str,
        _root: &str,
        _kind: MethodKind,
        _include_private: bool,
    ) -> Vec<Suggestion> {
        Vec::new()
    }

    fn refresh(&mut self) {}
}

/// An in-memory `LiveMap` over pre-registered entries, for tests and
/// embedders who already have a snapshot of runtime-introspected methods.
#[derive(Debug, Default)]
pub struct RegistryLiveMap {
    fqns: IndexMap<SmolStr, Vec<String>>,
    methods: IndexMap<(SmolStr, bool), Vec<Suggestion>>,
    refresh_count: u32,
}

impl RegistryLiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fqn(&mut self, name: impl Into<SmolStr>, fqn: impl Into<String>) {
        self.fqns.entry(name.into()).or_default().push(fqn.into());
    }

    pub fn add_method(&mut self, fqns: impl Into<SmolStr>, is_class: bool, suggestion: Suggestion) {
        self.methods
            .entry((fqns.into(), is_class))
            .or_default()
            .push(suggestion);
    }

    /// Number of times `refresh` has been called — lets tests assert that
    /// `ApiMap::process_maps` polls LiveMap exactly once per rebuild.
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }
}

impl LiveMap for RegistryLiveMap {
    fn get_fqns(&self, name: &str, _root: &str) -> Vec<String> {
        self.fqns.get(name).cloned().unwrap_or_default()
    }

    fn get_methods(
        &self,
        fqns: &str,
        _root: &str,
        kind: MethodKind,
        include_private: bool,
    ) -> Vec<Suggestion> {
        let is_class = matches!(kind, MethodKind::Class);
        let key = (SmolStr::new(fqns), is_class);
        let all = self.methods.get(&key).cloned().unwrap_or_default();
        if include_private {
            all
        } else {
            all.into_iter()
                .filter(|s| s.detail.as_deref() != Some("private"))
                .collect()
        }
    }

    fn refresh(&mut self) {
        self.refresh_count += 1;
    }
}
