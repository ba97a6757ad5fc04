//! Constant and method enumeration (spec.md §4.3).
//!
//! `get_methods`/`get_instance_methods` share one walker, split here into
//! `inner_class_methods`/`inner_instance_methods` so the superclass/mixin
//! recursion is written once per scope rather than parameterized by a
//! scope flag threaded through every branch — the teacher's resolver
//! modules (`semantic::resolver::import_resolver`) favor the same shape:
//! one function per concern, sharing a visited set passed by value.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::{merge_suggestions, strip_last_segment, ApiMap};
use crate::live_map::MethodKind;
use crate::pin::{NamespaceKind, Pin, PinKind, Scope, Visibility};
use crate::source::SourceFactory;
use crate::suggestion::Suggestion;

impl<S: SourceFactory> ApiMap<S> {
    /// Constants visible from `namespace` (resolved against `root`),
    /// including child namespaces (a class/module is itself a constant),
    /// merged with YardMap's own constants for the resolved FQN.
    pub fn get_constants(&self, namespace: &str, root: &str) -> Vec<Suggestion> {
        let resolved = self.find_fully_qualified_namespace(namespace, root);
        let mut pins: Vec<Pin> = Vec::new();
        let mut seen = FxHashSet::default();

        if let Some(fqn) = resolved.as_deref() {
            let mut current = fqn.to_string();
            loop {
                let same_level = current == fqn;
                for pin in self.const_pins.get(current.as_str()).into_iter().flatten() {
                    if (same_level || pin.visibility != Visibility::Private) && seen.insert(pin.identity()) {
                        pins.push(pin.clone());
                    }
                }
                for pin in self.namespace_pins.get(current.as_str()).into_iter().flatten() {
                    if seen.insert(pin.identity()) {
                        pins.push(pin.clone());
                    }
                }
                if current.is_empty() {
                    break;
                }
                current = strip_last_segment(&current);
            }
        }

        let mut suggestions: Vec<Suggestion> = pins.iter().map(|p| p.to_suggestion(None)).collect();
        let yard_fqn = resolved.unwrap_or_else(|| namespace.to_string());
        merge_suggestions(&mut suggestions, self.yard_map.get_constants(&yard_fqn));
        suggestions
    }

    /// Class/singleton methods visible on `fqns` (spec §4.3).
    pub fn get_methods(&self, fqns: &str, root: &str, visibility: Visibility) -> Vec<Suggestion> {
        self.get_methods_inner(fqns, root, visibility, true)
    }

    /// Instance methods visible on `fqns` (spec §4.3).
    pub fn get_instance_methods(&self, fqns: &str, root: &str, visibility: Visibility) -> Vec<Suggestion> {
        self.get_methods_inner(fqns, root, visibility, false)
    }

    fn get_methods_inner(
        &self,
        fqns: &str,
        root: &str,
        visibility: Visibility,
        class_side: bool,
    ) -> Vec<Suggestion> {
        let resolved = self
            .find_fully_qualified_namespace(fqns, root)
            .unwrap_or_else(|| fqns.to_string());

        let mut visited = FxHashSet::default();
        let mut pins = if class_side {
            self.inner_class_methods(&resolved, &resolved, visibility, 0, &mut visited)
        } else {
            self.inner_instance_methods(&resolved, &resolved, visibility, 0, &mut visited)
        };

        if class_side {
            self.synthesize_new(&resolved, &mut pins);
        }

        let mut seen = FxHashSet::default();
        pins.retain(|p| seen.insert(p.identity()));

        let mut suggestions: Vec<Suggestion> = pins.iter().map(|p| p.to_suggestion(None)).collect();

        let yard_suggestions = if class_side {
            self.yard_map.get_methods(&resolved, root, visibility)
        } else {
            self.yard_map.get_instance_methods(&resolved, root, visibility)
        };
        let yard_was_silent = yard_suggestions.is_empty();
        merge_suggestions(&mut suggestions, yard_suggestions);

        if yard_was_silent {
            let universal = match self.namespace_kinds.get(resolved.as_str()) {
                Some(NamespaceKind::Module) => self.root_module_fqn.clone(),
                _ => self.root_class_fqn.clone(),
            };
            if universal.as_str() != resolved.as_str() {
                let fallback = if class_side {
                    self.yard_map.get_methods(&universal, "", visibility)
                } else {
                    self.yard_map.get_instance_methods(&universal, "", visibility)
                };
                merge_suggestions(&mut suggestions, fallback);
            }
        }

        if fqns.is_empty() && root.is_empty() {
            for domain in self.config.domains() {
                let mut domain_visited = FxHashSet::default();
                let domain_pins =
                    self.inner_instance_methods(&domain, &domain, visibility, 0, &mut domain_visited);
                let domain_suggestions: Vec<Suggestion> =
                    domain_pins.iter().map(|p| p.to_suggestion(None)).collect();
                merge_suggestions(&mut suggestions, domain_suggestions);
            }
        }

        let kind = if class_side { MethodKind::Class } else { MethodKind::Instance };
        let live_suggestions = self
            .live_map
            .get_methods(&resolved, root, kind, visibility == Visibility::Private);
        merge_suggestions(&mut suggestions, live_suggestions);

        suggestions
    }

    /// Direct and inherited/mixed-in instance methods of `fqns`. `include`
    /// targets are recursed at the *same* hop (they stand in for the
    /// including namespace itself); the superclass chain advances the hop
    /// counter so private visibility can be dropped past the first class.
    ///
    /// `caller` is the namespace the enumeration was originally requested
    /// for — fixed across the whole recursion (see spec §4.3 step 2:
    /// "protected is included only when the caller is that class itself").
    /// A pin crossing a superclass hop is visible as protected only when
    /// its own declaring namespace (`fqns` at the point it was collected)
    /// equals `caller`, i.e. never for a pin actually declared on an
    /// ancestor, since `caller` stays pinned to where the walk started.
    pub(crate) fn inner_instance_methods(
        &self,
        fqns: &str,
        caller: &str,
        visibility: Visibility,
        hop: u32,
        visited: &mut FxHashSet<SmolStr>,
    ) -> Vec<Pin> {
        if !visited.insert(SmolStr::new(fqns)) {
            return Vec::new();
        }

        let mut result: Vec<Pin> = self
            .method_pins
            .get(fqns)
            .into_iter()
            .flatten()
            .chain(self.attr_pins.get(fqns).into_iter().flatten())
            .filter(|p| p.scope == Scope::Instance && visible_at_hop(p.visibility, fqns, caller, hop, visibility))
            .cloned()
            .collect();

        for include in self.namespace_includes.get(fqns).into_iter().flatten() {
            let target = self
                .find_fully_qualified_namespace(include, fqns)
                .unwrap_or_else(|| include.to_string());
            result.extend(self.inner_instance_methods(&target, caller, visibility, hop, visited));
        }

        if let Some(parent) = self.superclasses.get(fqns) {
            let target = self
                .find_fully_qualified_namespace(parent, fqns)
                .unwrap_or_else(|| parent.to_string());
            result.extend(self.inner_instance_methods(&target, caller, visibility, hop + 1, visited));
        }

        result
    }

    /// Direct and inherited class/singleton methods of `fqns`. `extend`
    /// targets contribute their *instance* methods as this namespace's
    /// singleton methods (spec §4.3 step 3), so they recurse through
    /// `inner_instance_methods` with a fresh visited set scoped to that
    /// single lookup, and a fresh `caller` of the extend target itself —
    /// the extend target's own protected methods are judged against its
    /// own namespace, independent of who is doing the extending.
    pub(crate) fn inner_class_methods(
        &self,
        fqns: &str,
        caller: &str,
        visibility: Visibility,
        hop: u32,
        visited: &mut FxHashSet<SmolStr>,
    ) -> Vec<Pin> {
        if !visited.insert(SmolStr::new(fqns)) {
            return Vec::new();
        }

        let mut result: Vec<Pin> = self
            .method_pins
            .get(fqns)
            .into_iter()
            .flatten()
            .chain(self.attr_pins.get(fqns).into_iter().flatten())
            .filter(|p| p.scope == Scope::Class && visible_at_hop(p.visibility, fqns, caller, hop, visibility))
            .cloned()
            .collect();

        for extend in self.namespace_extends.get(fqns).into_iter().flatten() {
            let target = self
                .find_fully_qualified_namespace(extend, fqns)
                .unwrap_or_else(|| extend.to_string());
            let mut extend_visited = FxHashSet::default();
            result.extend(self.inner_instance_methods(&target, &target, visibility, hop, &mut extend_visited));
        }

        if let Some(parent) = self.superclasses.get(fqns) {
            let target = self
                .find_fully_qualified_namespace(parent, fqns)
                .unwrap_or_else(|| parent.to_string());
            result.extend(self.inner_class_methods(&target, caller, visibility, hop + 1, visited));
        }

        result
    }

    /// If `fqns` declares `initialize`, a `new` pin in the class-method
    /// listing is dropped (or synthesized, when absent) in favor of one
    /// whose parameters mirror `initialize`'s (spec §4.3 step 6).
    fn synthesize_new(&self, fqns: &str, pins: &mut Vec<Pin>) {
        let Some(initialize) = self
            .method_pins
            .get(fqns)
            .into_iter()
            .flatten()
            .find(|p| p.scope == Scope::Instance && p.name.as_str() == "initialize")
        else {
            return;
        };

        pins.retain(|p| p.name.as_str() != "new");
        pins.push(Pin {
            filename: initialize.filename.clone(),
            namespace: SmolStr::new(fqns),
            name: SmolStr::new("new"),
            scope: Scope::Class,
            visibility: Visibility::Public,
            return_type: Some(SmolStr::new(fqns)),
            parameters: initialize.parameters.clone(),
            node: initialize.node,
            kind: PinKind::Method,
        });
    }
}

/// At hop 0 (the namespace itself) everything at or under `requested`
/// visibility is visible. Past a superclass hop, private never crosses;
/// protected only crosses when `declaring_fqns` (the namespace the pin was
/// actually collected from) is the same namespace as `caller` (the
/// namespace the whole enumeration was requested for) — which by
/// construction only holds when the walk has looped back on itself, so in
/// practice an ancestor's protected methods do not appear in a subclass's
/// listing (spec §4.3 step 2). Public always crosses.
fn visible_at_hop(
    pin_visibility: Visibility,
    declaring_fqns: &str,
    caller: &str,
    hop: u32,
    requested: Visibility,
) -> bool {
    if pin_visibility > requested {
        return false;
    }
    if hop == 0 {
        return true;
    }
    match pin_visibility {
        Visibility::Private => false,
        Visibility::Protected => declaring_fqns == caller,
        Visibility::Public => true,
    }
}
