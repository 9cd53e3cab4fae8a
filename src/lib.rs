// Library root
// -----------
// This crate exposes a small library surface for the uploader. The binary
// (`main.rs`) wires these modules together and runs the interactive loop.
//
// Module responsibilities:
// - `novel`: the record that gets inserted plus the field normalization
//   rules (category menu, cover fallback, chapter/price defaults).
// - `api`: the record store seam and the hosted-table client behind it.
// - `config`: connection settings from flags, environment and `.env` files.
// - `ui`: the terminal console and the collect/confirm/submit loop.
// - `error`: error types shared between the modules above.
// - `logging`: tracing subscriber setup.
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod novel;
pub mod ui;
