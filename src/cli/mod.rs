//! # CLI Module
//!
//! Command-line front end of the generator, available as the `entitygen`
//! binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Render a schema into `<output>/main.rs` and `<output>/data/sql.rs`:
//!
//! ```bash
//! entitygen generate --conf shop.json --output gen_src
//! ```
//!
//! Options:
//! - `--conf <FILE>` - schema document, JSON or YAML (required)
//! - `--output <DIR>` - output root (default: `ENTITYGEN_OUTPUT_ROOT` or `gen_src`)
//! - `--strict-types` - fail on column types the registry does not know
//!
//! ### `render`
//!
//! Print the generated sources to stdout without touching the filesystem:
//!
//! ```bash
//! entitygen render --conf shop.yaml --only data
//! ```
//!
//! ### `serve`
//!
//! Serve `GET /generate.tar.gz?config=<json>` until SIGINT, SIGTERM or SIGQUIT:
//!
//! ```bash
//! entitygen serve --addr 127.0.0.1:9111
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands, OnlyPart};
