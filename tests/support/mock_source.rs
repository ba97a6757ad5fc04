//! A hand-rolled fixture `Source` for integration tests.
//!
//! Real parsing is out of scope for this crate (spec.md §1); `ApiMap` only
//! ever consumes the `Source`/`SourceFactory` traits. This is a small,
//! deliberately dumb line-oriented reader recognizing just enough of the
//! target language's surface syntax (`class`/`module`/`def`/`include`/
//! `extend`/`@ivar = rhs`/`CONST = rhs`) to build pins for behavioral
//! tests, the same role the teacher's `tests/helpers/source_fixtures.rs`
//! plays for its own parser-backed tests.

use std::collections::HashMap;
use std::time::SystemTime;

use apimap::{
    Docstring, NamespaceKind, NodeHandle, Parameter, Pin, PinKind, Scope, Source, SourceFactory, Visibility,
};
use indexmap::IndexMap;
use smol_str::SmolStr;

#[derive(Debug, Clone, Default)]
pub struct MockSource {
    filename: SmolStr,
    mtime: Option<SystemTime>,
    namespace_nodes: IndexMap<SmolStr, Vec<NodeHandle>>,
    namespace_includes: IndexMap<SmolStr, Vec<SmolStr>>,
    namespace_extends: IndexMap<SmolStr, Vec<SmolStr>>,
    superclasses: IndexMap<SmolStr, SmolStr>,
    required: Vec<SmolStr>,
    namespace_pins: Vec<Pin>,
    method_pins: Vec<Pin>,
    attribute_pins: Vec<Pin>,
    instance_variable_pins: Vec<Pin>,
    class_variable_pins: Vec<Pin>,
    constant_pins: Vec<Pin>,
    global_variable_pins: Vec<Pin>,
    symbol_pins: Vec<Pin>,
    code_texts: HashMap<u32, String>,
}

impl MockSource {
    fn span() -> apimap::base::Span {
        apimap::base::Span::synthetic()
    }

    fn parse(code: &str, filename: &str, mtime: SystemTime) -> Self {
        let mut result = Self {
            filename: filename.into(),
            mtime: Some(mtime),
            ..Self::default()
        };
        // `Namespace` frames contribute a segment to the enclosing FQN;
        // `Def`/`Other` frames exist only so a later `end` line closes the
        // right block instead of popping an enclosing class/module early.
        let mut stack: Vec<Frame> = Vec::new();
        let mut next_id: u32 = 1;
        // One visibility-mode slot per open `Namespace` frame, switched by a
        // bare `private`/`protected`/`public` line the way the target
        // language's own visibility sections work — `def`s parsed after
        // such a line pick up that namespace's current mode until the next
        // one or until the namespace closes.
        let mut visibility_stack: Vec<Visibility> = Vec::new();
        let current_visibility =
            |visibility_stack: &[Visibility]| visibility_stack.last().copied().unwrap_or(Visibility::Public);

        let fqn_of = |stack: &[Frame]| -> String {
            stack
                .iter()
                .filter_map(|f| match f {
                    Frame::Namespace(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("::")
        };

        for raw_line in code.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("class ") {
                let (name, parent) = split_superclass(rest);
                let enclosing = fqn_of(&stack);
                stack.push(Frame::Namespace(name.clone()));
                visibility_stack.push(Visibility::Public);
                let fqn = fqn_of(&stack);
                let node = NodeHandle::new(next_id, Self::span());
                next_id += 1;
                result
                    .namespace_nodes
                    .entry(fqn.clone().into())
                    .or_default()
                    .push(node);
                result.namespace_pins.push(namespace_pin(
                    filename,
                    &enclosing,
                    &name,
                    NamespaceKind::Class,
                    node,
                ));
                if let Some(parent) = parent {
                    result.superclasses.insert(fqn.into(), parent.into());
                }
            } else if let Some(rest) = line.strip_prefix("module ") {
                let name = rest.trim().to_string();
                let enclosing = fqn_of(&stack);
                stack.push(Frame::Namespace(name.clone()));
                visibility_stack.push(Visibility::Public);
                let fqn = fqn_of(&stack);
                let node = NodeHandle::new(next_id, Self::span());
                next_id += 1;
                result
                    .namespace_nodes
                    .entry(fqn.into())
                    .or_default()
                    .push(node);
                result.namespace_pins.push(namespace_pin(
                    filename,
                    &enclosing,
                    &name,
                    NamespaceKind::Module,
                    node,
                ));
            } else if line == "end" {
                if let Some(Frame::Namespace(_)) = stack.last() {
                    visibility_stack.pop();
                }
                stack.pop();
            } else if matches!(line, "private" | "protected" | "public") {
                if let Some(slot) = visibility_stack.last_mut() {
                    *slot = match line {
                        "private" => Visibility::Private,
                        "protected" => Visibility::Protected,
                        _ => Visibility::Public,
                    };
                }
            } else if let Some(rest) = line.strip_prefix("include ") {
                let fqn = fqn_of(&stack);
                result
                    .namespace_includes
                    .entry(fqn.into())
                    .or_default()
                    .push(rest.trim().into());
            } else if let Some(rest) = line.strip_prefix("extend ") {
                let fqn = fqn_of(&stack);
                result
                    .namespace_extends
                    .entry(fqn.into())
                    .or_default()
                    .push(rest.trim().into());
            } else if let Some(rest) = line.strip_prefix("def self.") {
                let fqn = fqn_of(&stack);
                let (name, params, return_type) = split_def(rest);
                let node = NodeHandle::new(next_id, Self::span());
                next_id += 1;
                stack.push(Frame::Def);
                result.method_pins.push(method_pin(
                    filename,
                    &fqn,
                    &name,
                    Scope::Class,
                    current_visibility(&visibility_stack),
                    params,
                    return_type,
                    node,
                ));
            } else if let Some(rest) = line.strip_prefix("def ") {
                let fqn = fqn_of(&stack);
                let (name, params, return_type) = split_def(rest);
                let node = NodeHandle::new(next_id, Self::span());
                next_id += 1;
                stack.push(Frame::Def);
                result.method_pins.push(method_pin(
                    filename,
                    &fqn,
                    &name,
                    Scope::Instance,
                    current_visibility(&visibility_stack),
                    params,
                    return_type,
                    node,
                ));
            } else if let Some((lhs, rhs)) = line.split_once('=') {
                let fqn = fqn_of(&stack);
                let lhs = lhs.trim();
                let rhs = rhs.trim();
                let node = NodeHandle::new(next_id, Self::span());
                next_id += 1;
                result.code_texts.insert(node.id, rhs.to_string());

                if let Some(name) = lhs.strip_prefix("@@") {
                    result.class_variable_pins.push(variable_pin(
                        filename,
                        &fqn,
                        name,
                        Scope::Instance,
                        PinKind::ClassVariable,
                        node,
                    ));
                } else if let Some(name) = lhs.strip_prefix('@') {
                    result.instance_variable_pins.push(variable_pin(
                        filename,
                        &fqn,
                        name,
                        Scope::Instance,
                        PinKind::InstanceVariable,
                        node,
                    ));
                } else if lhs.chars().next().is_some_and(char::is_uppercase) {
                    result.constant_pins.push(variable_pin(
                        filename,
                        &fqn,
                        lhs,
                        Scope::Instance,
                        PinKind::Constant,
                        node,
                    ));
                }
            }
        }

        result
    }
}

enum Frame {
    Namespace(String),
    Def,
}

fn split_superclass(rest: &str) -> (String, Option<String>) {
    match rest.split_once('<') {
        Some((name, parent)) => (name.trim().to_string(), Some(parent.trim().to_string())),
        None => (rest.trim().to_string(), None),
    }
}

fn split_def(rest: &str) -> (String, Vec<Parameter>, Option<String>) {
    let rest = rest.trim_end_matches(';').trim();
    let (head, return_type) = match rest.split_once(':') {
        Some((h, t)) => (h.trim(), Some(t.trim().to_string())),
        None => (rest, None),
    };
    let (name, params) = match head.split_once('(') {
        Some((n, p)) => (n.trim(), p.trim_end_matches(')')),
        None => (head, ""),
    };
    let parameters = params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| Parameter {
            name: p.into(),
            declared_type: None,
            default: None,
            kind: apimap::ParameterKind::Required,
        })
        .collect();
    (name.to_string(), parameters, return_type)
}

fn namespace_pin(
    filename: &str,
    namespace: &str,
    name: &str,
    kind: NamespaceKind,
    node: NodeHandle,
) -> Pin {
    Pin {
        filename: filename.into(),
        namespace: namespace.into(),
        name: name.into(),
        scope: Scope::Instance,
        visibility: Visibility::Public,
        return_type: None,
        parameters: Vec::new(),
        node,
        kind: PinKind::Namespace { kind },
    }
}

fn method_pin(
    filename: &str,
    namespace: &str,
    name: &str,
    scope: Scope,
    visibility: Visibility,
    parameters: Vec<Parameter>,
    return_type: Option<String>,
    node: NodeHandle,
) -> Pin {
    Pin {
        filename: filename.into(),
        namespace: namespace.into(),
        name: name.into(),
        scope,
        visibility,
        return_type: return_type.map(SmolStr::from),
        parameters,
        node,
        kind: PinKind::Method,
    }
}

fn variable_pin(filename: &str, namespace: &str, name: &str, scope: Scope, kind: PinKind, node: NodeHandle) -> Pin {
    Pin {
        filename: filename.into(),
        namespace: namespace.into(),
        name: name.into(),
        scope,
        visibility: Visibility::Public,
        return_type: None,
        parameters: Vec::new(),
        node,
        kind,
    }
}

impl Source for MockSource {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn mtime(&self) -> SystemTime {
        self.mtime.unwrap_or(SystemTime::UNIX_EPOCH)
    }

    fn root(&self) -> NodeHandle {
        NodeHandle::new(0, Self::span())
    }

    fn namespace_nodes(&self) -> &IndexMap<SmolStr, Vec<NodeHandle>> {
        &self.namespace_nodes
    }

    fn namespace_includes(&self) -> &IndexMap<SmolStr, Vec<SmolStr>> {
        &self.namespace_includes
    }

    fn namespace_extends(&self) -> &IndexMap<SmolStr, Vec<SmolStr>> {
        &self.namespace_extends
    }

    fn superclasses(&self) -> &IndexMap<SmolStr, SmolStr> {
        &self.superclasses
    }

    fn required(&self) -> &[SmolStr] {
        &self.required
    }

    fn namespace_pins(&self) -> &[Pin] {
        &self.namespace_pins
    }

    fn method_pins(&self) -> &[Pin] {
        &self.method_pins
    }

    fn attribute_pins(&self) -> &[Pin] {
        &self.attribute_pins
    }

    fn instance_variable_pins(&self) -> &[Pin] {
        &self.instance_variable_pins
    }

    fn class_variable_pins(&self) -> &[Pin] {
        &self.class_variable_pins
    }

    fn constant_pins(&self) -> &[Pin] {
        &self.constant_pins
    }

    fn global_variable_pins(&self) -> &[Pin] {
        &self.global_variable_pins
    }

    fn symbol_pins(&self) -> &[Pin] {
        &self.symbol_pins
    }

    fn includes_node(&self, _node: NodeHandle) -> bool {
        true
    }

    fn docstring_for(&self, _node: NodeHandle) -> Option<Docstring> {
        None
    }

    fn code_for(&self, node: NodeHandle) -> String {
        self.code_texts.get(&node.id).cloned().unwrap_or_default()
    }
}

impl SourceFactory for MockSource {
    fn load(filename: &str) -> std::io::Result<Self> {
        let code = std::fs::read_to_string(filename)?;
        // Stamp with the file's own on-disk mtime, not the moment it was
        // parsed — `ApiMap::changed()` compares this against
        // `fs::metadata(path).modified()` on every later check, and the two
        // must agree when nothing has changed on disk.
        let mtime = std::fs::metadata(filename)?.modified()?;
        Ok(Self::parse(&code, filename, mtime))
    }

    fn virtual_source(code: &str, filename: &str) -> Self {
        Self::parse(code, filename, SystemTime::now())
    }

    fn fix(code: &str, filename: &str, _cursor: Option<usize>) -> Self {
        Self::parse(code, filename, SystemTime::now())
    }
}
