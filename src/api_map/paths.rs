//! Path-based queries (spec.md §4.5).

use super::{merge_suggestions, split_last_segment, ApiMap};
use crate::pin::{Pin, Visibility};
use crate::source::SourceFactory;
use crate::suggestion::Suggestion;

impl<S: SourceFactory> ApiMap<S> {
    /// `A#m` resolves as an instance method, `A.m` as a class method,
    /// anything else as a namespace path split on `::`. Unioned with
    /// `YardMap::objects(path)`.
    pub fn get_path_suggestions(&self, path: &str) -> Vec<Suggestion> {
        let mut suggestions = if let Some((namespace, method)) = path.split_once('#') {
            self.path_method_suggestions(namespace, method, false)
        } else if let Some((namespace, method)) = path.split_once('.') {
            self.path_method_suggestions(namespace, method, true)
        } else {
            self.path_namespace_suggestions(path)
        };

        merge_suggestions(&mut suggestions, self.yard_map.objects(path));
        suggestions
    }

    fn path_method_suggestions(&self, namespace: &str, method: &str, class_side: bool) -> Vec<Suggestion> {
        let all = if class_side {
            self.get_methods(namespace, "", Visibility::Private)
        } else {
            self.get_instance_methods(namespace, "", Visibility::Private)
        };
        all.into_iter().filter(|s| s.label == method).collect()
    }

    fn path_namespace_suggestions(&self, path: &str) -> Vec<Suggestion> {
        let (parent, last) = split_last_segment(path);
        let mut pins: Vec<&Pin> = Vec::new();

        for pin in self.const_pins.get(parent.as_str()).into_iter().flatten() {
            if pin.name.as_str() == last {
                pins.push(pin);
            }
        }
        for pin in self.namespace_pins.get(parent.as_str()).into_iter().flatten() {
            if pin.name.as_str() == last {
                pins.push(pin);
            }
        }

        pins.into_iter().map(|p| p.to_suggestion(None)).collect()
    }

    /// Case-insensitive substring match over `YardMap`'s known code-object
    /// paths, gated so the (out-of-scope) doc assembler is warmed at most
    /// once per stale cycle (spec §4.5).
    pub fn search(&self, query: &str) -> Vec<Suggestion> {
        self.warm_yard_cache();
        self.yard_map.search(query)
    }

    /// The object(s) at `path`, from the same warmed archive `search` uses.
    pub fn document(&self, path: &str) -> Vec<Suggestion> {
        self.warm_yard_cache();
        self.yard_map.document(path)
    }

    fn warm_yard_cache(&self) {
        if self.yard_stale.get() {
            let _ = self.yard_map.objects("");
            self.yard_stale.set(false);
        }
    }
}
