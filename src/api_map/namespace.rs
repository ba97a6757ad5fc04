//! Namespace resolution (spec.md §4.2).

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::{strip_last_segment, ApiMap};
use crate::source::SourceFactory;

impl<S: SourceFactory> ApiMap<S> {
    /// Resolves a possibly-relative name to its fully qualified name.
    /// Cycle-safe: recursion through `include` targets tracks visited
    /// `root` values.
    pub fn find_fully_qualified_namespace(&self, name: &str, root: &str) -> Option<String> {
        let mut visited = FxHashSet::default();
        self.find_fully_qualified_namespace_inner(name, root, &mut visited)
    }

    /// `namespace_exists?` from spec §8 universal property 1: true iff
    /// resolving `fqn` from `root` lands back on a namespace this ApiMap
    /// actually knows about (or the empty top-level namespace).
    pub fn namespace_exists(&self, fqn: &str, root: &str) -> bool {
        match self.find_fully_qualified_namespace(fqn, root) {
            Some(resolved) => resolved.is_empty() || self.namespace_map.contains_key(resolved.as_str()),
            None => false,
        }
    }

    fn find_fully_qualified_namespace_inner(
        &self,
        name: &str,
        root: &str,
        visited: &mut FxHashSet<SmolStr>,
    ) -> Option<String> {
        if visited.contains(root) {
            return None;
        }
        visited.insert(SmolStr::new(root));

        if name.is_empty() && root.is_empty() {
            return Some(String::new());
        }
        if name.is_empty() {
            return if self.namespace_map.contains_key(root) {
                Some(root.to_string())
            } else {
                None
            };
        }

        if root.is_empty() {
            if self.namespace_map.contains_key(name) {
                return Some(name.to_string());
            }
            if let Some(found) = self.recurse_file_root_includes(name, visited) {
                return Some(found);
            }
            return self.consult_external_namespace(name, root);
        }

        let mut current_root = root.to_string();
        loop {
            let candidate = if current_root.is_empty() {
                name.to_string()
            } else {
                format!("{current_root}::{name}")
            };
            if self.namespace_map.contains_key(candidate.as_str()) {
                return Some(candidate);
            }
            if current_root.is_empty() {
                break;
            }
            current_root = strip_last_segment(&current_root);
        }

        if let Some(found) = self.recurse_file_root_includes(name, visited) {
            return Some(found);
        }

        self.consult_external_namespace(name, root)
    }

    fn recurse_file_root_includes(&self, name: &str, visited: &mut FxHashSet<SmolStr>) -> Option<String> {
        let includes = self.namespace_includes.get("")?.clone();
        for include in includes {
            if let Some(found) = self.find_fully_qualified_namespace_inner(name, &include, visited) {
                return Some(found);
            }
        }
        None
    }

    fn consult_external_namespace(&self, name: &str, root: &str) -> Option<String> {
        if let Some(found) = self.yard_map.find_fully_qualified_namespace(name, root) {
            return Some(found);
        }
        self.live_map.get_fqns(name, root).into_iter().next()
    }
}
