// Library target exists solely for the integration test suite.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can import types via `lunchpick::store::*` / `lunchpick::engine::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

// Public: used directly by integration tests
pub mod engine;
pub mod store;

// Private: required transitively by app (won't compile without them)
mod app;
mod ui;
