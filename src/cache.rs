//! Memoization for signature and assignment-node type inference.
//!
//! Per `spec.md` §4.1/§9: "a plain map cleared on every `process_maps`....
//! Do not attempt per-entry invalidation; the indices' rebuild cost
//! dominates." This intentionally does *not* use the teacher's `salsa`
//! incremental-query engine — see `DESIGN.md` for why that dependency was
//! dropped.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::pin::Scope;
use crate::source::NodeHandle;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SignatureKey {
    signature: SmolStr,
    namespace: SmolStr,
    scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AssignmentKey {
    node: NodeHandle,
    namespace: SmolStr,
}

/// Cleared wholesale by `ApiMap::process_maps` whenever `stale` transitions
/// from true to false by way of a rebuild (spec invariant 5).
#[derive(Debug, Default)]
pub struct Cache {
    signatures: FxHashMap<SignatureKey, Option<String>>,
    assignments: FxHashMap<AssignmentKey, Option<String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.signatures.clear();
        self.assignments.clear();
    }

    pub fn get_signature(
        &self,
        signature: &str,
        namespace: &str,
        scope: Scope,
    ) -> Option<Option<String>> {
        let key = SignatureKey {
            signature: signature.into(),
            namespace: namespace.into(),
            scope,
        };
        self.signatures.get(&key).cloned()
    }

    pub fn put_signature(
        &mut self,
        signature: &str,
        namespace: &str,
        scope: Scope,
        result: Option<String>,
    ) {
        let key = SignatureKey {
            signature: signature.into(),
            namespace: namespace.into(),
            scope,
        };
        self.signatures.insert(key, result);
    }

    pub fn get_assignment(&self, node: NodeHandle, namespace: &str) -> Option<Option<String>> {
        let key = AssignmentKey {
            node,
            namespace: namespace.into(),
        };
        self.assignments.get(&key).cloned()
    }

    pub fn put_assignment(&mut self, node: NodeHandle, namespace: &str, result: Option<String>) {
        let key = AssignmentKey {
            node,
            namespace: namespace.into(),
        };
        self.assignments.insert(key, result);
    }
}
