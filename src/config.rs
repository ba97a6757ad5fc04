//! The `Config` façade: workspace file discovery, required libraries, and
//! configured "domain" namespaces (spec.md §6: "Config (consumed)").
//!
//! Config-file reading itself is out of scope (§1 Non-goals); this crate
//! only consumes the resolved product of it.

/// The external configuration boundary `ApiMap` consumes.
pub trait Config {
    /// The authoritative workspace file set, recomputed whenever the
    /// config-governing file (or the workspace root) changes.
    fn calculated(&self) -> Vec<String>;
    /// Libraries the workspace declares a dependency on, independent of
    /// any single file's `required` list.
    fn required(&self) -> Vec<String>;
    /// FQNs whose instance methods are folded into top-level lookups
    /// (spec §4.3 step 7: "domain" namespaces).
    fn domains(&self) -> Vec<String>;
    /// File suffixes `virtualize` treats as overlay-eligible (spec §4.1).
    /// A generalization over the teacher's hard-coded extension constant,
    /// since this crate does not know the target language's suffix in
    /// advance — see `DESIGN.md`.
    fn source_suffixes(&self) -> &[String];
}

/// A fixed, in-memory `Config` — the common case for tests and for
/// embedders who resolve configuration themselves and just want to hand
/// `ApiMap` the result.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    calculated: Vec<String>,
    required: Vec<String>,
    domains: Vec<String>,
    source_suffixes: Vec<String>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self {
            source_suffixes: vec!["rb".to_string()],
            ..Self::default()
        }
    }

    pub fn with_calculated(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.calculated = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required = libs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_suffixes(
        mut self,
        suffixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.source_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }
}

impl Config for StaticConfig {
    fn calculated(&self) -> Vec<String> {
        self.calculated.clone()
    }

    fn required(&self) -> Vec<String> {
        self.required.clone()
    }

    fn domains(&self) -> Vec<String> {
        self.domains.clone()
    }

    fn source_suffixes(&self) -> &[String] {
        &self.source_suffixes
    }
}
