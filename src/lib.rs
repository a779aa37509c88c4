//! jsonwrap - a JSON file wrapper
//!
//! Loads the top-level object of a JSON file into memory, exposes key and
//! subkey accessors and mutators, and writes it back on [`Document::commit`].
//!
//! ```no_run
//! use jsonwrap::Document;
//!
//! # fn main() -> jsonwrap::Result<()> {
//! let mut doc = Document::open("data/settings.json")?;
//! doc.insert("theme", "dark");
//! doc.commit()?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;

pub use crate::core::config::DocumentConfig;
pub use crate::core::document::Document;
pub use crate::core::file_system::{dump_json, load_json, read_file, write_file};
pub use crate::error::{JsonWrapError, Result};
pub use serde_json::{Map, Value};
