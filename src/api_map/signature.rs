//! Signature chain type inference (spec.md §4.4).
//!
//! `infer_signature_type` walks a dot-separated chain of atoms, resolving
//! each segment against the type the previous one produced. Internally the
//! walk tracks `(type, scope)` as two separate values rather than folding
//! scope into the type string (e.g. `"Class<Foo>"`) — the wrapped form is
//! only materialized at the very end (spec step 5) and whenever a method's
//! own declared return type is already wrapped (`normalize_return_type`).

mod literals;

use smol_str::SmolStr;

use super::ApiMap;
use crate::pin::{NamespaceKind, Pin, Scope, Visibility};
use crate::source::{NodeHandle, SourceFactory};

/// Methods whose contract returns the receiver itself, so the chain's
/// current type carries through unchanged rather than using the method
/// pin's own declared return type.
const SELF_RETURNING: &[&str] = &["tap", "freeze", "dup", "clone", "itself", "instance_eval", "yield_self", "then"];

/// Methods on a `Container<Element>`-shaped type that hand back a single
/// `Element`, so the chain continues with the container's type parameter.
const SUBTYPE_RETURNING: &[&str] = &["first", "last", "sample", "pop", "shift", "at", "fetch"];

/// Marks "the class side of X" (spec §9 Open Questions: exact semantics for
/// nested class-of-class types are underspecified upstream). Resolved here
/// as a literal suffix — see `DESIGN.md` for the decision record.
const CLASS_SIDE_SUFFIX: &str = "#class";

impl<S: SourceFactory> ApiMap<S> {
    /// Converts a dot-separated chain of atoms into a type string in the
    /// mini-grammar from spec §6. Cached on `(signature, namespace, scope)`
    /// (spec §8 property 5: deterministic, cache-consistent).
    pub fn infer_signature_type(
        &self,
        signature: &str,
        namespace: &str,
        scope: Scope,
        call_node: Option<NodeHandle>,
    ) -> Option<String> {
        if let Some(cached) = self.cache.borrow().get_signature(signature, namespace, scope) {
            return cached;
        }

        let result = self.infer_signature_type_uncached(signature, namespace, scope, call_node);
        self.cache
            .borrow_mut()
            .put_signature(signature, namespace, scope, result.clone());
        result
    }

    fn infer_signature_type_uncached(
        &self,
        signature: &str,
        namespace: &str,
        scope: Scope,
        call_node: Option<NodeHandle>,
    ) -> Option<String> {
        if signature.is_empty() {
            return if scope == Scope::Instance {
                Some(namespace.to_string())
            } else {
                Some(self.wrap_class_type(namespace))
            };
        }

        if let Some(base) = namespace.strip_suffix(CLASS_SIDE_SUFFIX) {
            return self.infer_signature_type(signature, base, scope.flipped(), call_node);
        }

        let (head, tail) = match signature.split_once('.') {
            Some((h, t)) => (h, Some(t)),
            None => (signature, None),
        };

        let (mut current_type, mut current_scope) = if let Some(var) = head.strip_prefix("@@") {
            (self.infer_class_variable(var, namespace, scope)?, Scope::Instance)
        } else if let Some(var) = head.strip_prefix('@') {
            (self.infer_instance_variable(var, namespace, scope)?, Scope::Instance)
        } else if head == "self" {
            (namespace.to_string(), scope)
        } else if let Some(fqn) = self.find_fully_qualified_namespace(head, namespace) {
            (fqn, Scope::Class)
        } else {
            let pin = self.resolve_method(head, namespace, scope)?;
            self.method_return_type(&pin, call_node, namespace)?
        };

        if let Some(tail) = tail {
            for segment in tail.split('.') {
                let (next_type, next_scope) =
                    self.infer_chain_segment(segment, &current_type, current_scope, call_node)?;
                current_type = next_type;
                current_scope = next_scope;
            }
        }

        if current_scope == Scope::Class && !current_type.is_empty() {
            Some(self.wrap_class_type(&current_type))
        } else {
            Some(current_type)
        }
    }

    fn infer_chain_segment(
        &self,
        segment: &str,
        current_type: &str,
        current_scope: Scope,
        call_node: Option<NodeHandle>,
    ) -> Option<(String, Scope)> {
        if segment == "self" {
            return Some((current_type.to_string(), current_scope));
        }
        if segment == "new" && current_scope == Scope::Class {
            return Some((current_type.to_string(), Scope::Instance));
        }

        let pin = self.resolve_method(segment, current_type, current_scope)?;
        self.method_return_type(&pin, call_node, current_type)
    }

    /// First method named `name` found by walking `namespace`'s own
    /// methods, mixins, and superclass chain at `scope` (the same
    /// resolution order `get_methods`/`get_instance_methods` use, with
    /// every visibility admitted since a signature chain has no caller
    /// context to restrict by).
    fn resolve_method(&self, name: &str, namespace: &str, scope: Scope) -> Option<Pin> {
        let mut visited = rustc_hash::FxHashSet::default();
        let pins = if scope == Scope::Class {
            self.inner_class_methods(namespace, namespace, Visibility::Private, 0, &mut visited)
        } else {
            self.inner_instance_methods(namespace, namespace, Visibility::Private, 0, &mut visited)
        };
        pins.into_iter().find(|p| p.name.as_str() == name)
    }

    /// Resolves the return `(type, scope)` of calling `pin`, in the order
    /// spec §4.4 step 4 lists: a docstring `@return` macro (only when the
    /// call supplied a node, standing in for "the call has arguments"), a
    /// self-returning intrinsic, a container subtype-returning intrinsic,
    /// then the pin's own declared type.
    ///
    /// A resolved method with no declared type (and no macro/intrinsic
    /// override) yields the empty type `""`, not `None` — the call itself
    /// resolved, it is the *type* that is unknown (spec §8 scenario S1:
    /// "...or empty when absent"). `None` is reserved for a method that
    /// could not be found at all.
    fn method_return_type(
        &self,
        pin: &Pin,
        call_node: Option<NodeHandle>,
        called_on_type: &str,
    ) -> Option<(String, Scope)> {
        let raw = self
            .get_return_type_from_macro(pin, call_node)
            .or_else(|| {
                SELF_RETURNING
                    .contains(&pin.name.as_str())
                    .then(|| called_on_type.to_string())
            })
            .or_else(|| {
                SUBTYPE_RETURNING
                    .contains(&pin.name.as_str())
                    .then(|| container_element(called_on_type))
                    .flatten()
            })
            .or_else(|| pin.return_type.as_ref().map(|t| t.to_string()))
            .unwrap_or_default();

        Some(normalize_return_type(&raw))
    }

    fn get_return_type_from_macro(&self, pin: &Pin, call_node: Option<NodeHandle>) -> Option<String> {
        call_node?;
        let source = self.source_for(pin.filename.as_str())?;
        let docstring = source.docstring_for(pin.node)?;
        docstring.type_tags.get("return").map(|t| t.to_string())
    }

    fn wrap_class_type(&self, type_name: &str) -> String {
        match self.namespace_kinds.get(type_name) {
            Some(NamespaceKind::Module) => format!("Module<{type_name}>"),
            _ => format!("Class<{type_name}>"),
        }
    }

    /// `infer_instance_variable` (spec §4.4 step 3, `@x` head).
    pub fn infer_instance_variable(&self, name: &str, namespace: &str, scope: Scope) -> Option<String> {
        let pin = self
            .ivar_pins
            .get(namespace)?
            .iter()
            .find(|p| p.name.as_str() == name && p.scope == scope)?;
        self.infer_variable_pin_type(pin, namespace, scope, name)
    }

    /// `infer_class_variable` (spec §4.4 step 3, `@@x` head).
    pub fn infer_class_variable(&self, name: &str, namespace: &str, scope: Scope) -> Option<String> {
        let pin = self
            .cvar_pins
            .get(namespace)?
            .iter()
            .find(|p| p.name.as_str() == name)?;
        self.infer_variable_pin_type(pin, namespace, scope, name)
    }

    fn infer_variable_pin_type(&self, pin: &Pin, namespace: &str, scope: Scope, target_name: &str) -> Option<String> {
        if let Some(declared) = &pin.return_type {
            return Some(declared.to_string());
        }
        self.infer_assignment_node_type(&pin.filename, pin.node, namespace, scope, target_name)
    }

    /// Infers the type of an assignment's right-hand side, guarded against
    /// `@x = @x.foo`-style self-reference (spec §4.4 "Self-reference
    /// guard"). Cached on `(node, namespace)`.
    pub fn infer_assignment_node_type(
        &self,
        filename: &str,
        node: NodeHandle,
        namespace: &str,
        scope: Scope,
        target_name: &str,
    ) -> Option<String> {
        if let Some(cached) = self.cache.borrow().get_assignment(node, namespace) {
            return cached;
        }

        let result = self.infer_assignment_node_type_uncached(filename, node, namespace, scope, target_name);
        self.cache.borrow_mut().put_assignment(node, namespace, result.clone());
        result
    }

    fn infer_assignment_node_type_uncached(
        &self,
        filename: &str,
        node: NodeHandle,
        namespace: &str,
        scope: Scope,
        target_name: &str,
    ) -> Option<String> {
        let source = self.source_for(filename)?;
        let text = source.code_for(node);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // `target_name` is the bare variable name (the sigil is stripped
        // before `infer_instance_variable`/`infer_class_variable` are
        // called); the source text still carries it (`@x`, `@@x`), so strip
        // it back off before comparing rather than comparing the written
        // form against the bare one.
        let first_segment = text.split('.').next().unwrap_or(text);
        let first_segment = first_segment.strip_prefix("@@").or_else(|| first_segment.strip_prefix('@')).unwrap_or(first_segment);
        if first_segment == target_name {
            return None;
        }

        if let Some(literal_type) = literals::literal_type(text, &self.literal_overrides) {
            return Some(literal_type);
        }

        self.infer_signature_type(text, namespace, scope, Some(node))
    }
}

/// Unwraps a `Class<X>`/`Module<X>` return-type string into `(X,
/// Scope::Class)`; anything else carries through as `(raw, Scope::Instance)`
/// (spec §4.4 step 4: "a class-prefix type `Class<X>` at any step is
/// unwrapped into `X` with class scope").
fn normalize_return_type(raw: &str) -> (String, Scope) {
    if let Some(inner) = raw.strip_prefix("Class<").and_then(|s| s.strip_suffix('>')) {
        (inner.to_string(), Scope::Class)
    } else if let Some(inner) = raw.strip_prefix("Module<").and_then(|s| s.strip_suffix('>')) {
        (inner.to_string(), Scope::Class)
    } else {
        (raw.to_string(), Scope::Instance)
    }
}

/// First type parameter of a `Container<Element(, Element)*>`-shaped
/// string, or `None` if `type_str` isn't generic.
fn container_element(type_str: &str) -> Option<String> {
    let start = type_str.find('<')?;
    let end = type_str.rfind('>')?;
    if end <= start {
        return None;
    }
    type_str[start + 1..end].split(',').next().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_wrapped_class_return_type() {
        assert_eq!(normalize_return_type("Class<Foo>"), ("Foo".to_string(), Scope::Class));
        assert_eq!(normalize_return_type("Module<M>"), ("M".to_string(), Scope::Class));
        assert_eq!(normalize_return_type("Foo"), ("Foo".to_string(), Scope::Instance));
    }

    #[test]
    fn container_element_reads_first_type_parameter() {
        assert_eq!(container_element("Array<String>"), Some("String".to_string()));
        assert_eq!(container_element("Hash<Symbol, Integer>"), Some("Symbol".to_string()));
        assert_eq!(container_element("String"), None);
    }
}
