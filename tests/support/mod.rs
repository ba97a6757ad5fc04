//! Shared test fixtures, pulled in by every top-level integration test file
//! with `mod support;`.

pub mod mock_source;

pub use mock_source::MockSource;

use std::sync::Once;

use apimap::config::StaticConfig;
use apimap::live_map::NullLiveMap;
use apimap::yard_map::NullYardMap;
use apimap::ApiMap;

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing-subscriber` fmt subscriber once per test binary, so
/// `process_maps`'s rebuild `debug!`/`warn!` lines (`src/api_map/mod.rs`)
/// are visible under `cargo test -- --nocapture` instead of silently
/// dropped for lack of a subscriber — the same harness the teacher's own
/// integration tests install before exercising `hir::db` reindexing.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();
    });
}

/// An `ApiMap<MockSource>` with no `YardMap`/`LiveMap` wired up, seeded with
/// `code` as the single overlay buffer at `filename` — the cheapest way to
/// get a populated index without touching disk (spec.md §8 scenario S6 uses
/// `virtualize` the same way).
pub fn overlay_map(code: &str, filename: &str) -> ApiMap<MockSource> {
    let config = StaticConfig::new();
    let mut map = ApiMap::new(Box::new(NullYardMap), Box::new(NullLiveMap), Box::new(config));
    map.virtualize(code, Some(filename), None);
    map
}

