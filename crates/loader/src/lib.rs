//! Markup Loader
//!
//! Drives the `dom` tree builder from a `quick-xml` token stream.
//!
//! ```text
//! &str → quick_xml::Reader → Event → TreeSink → DomArena
//! ```
//!
//! Two rule sets are offered: strict XML and a permissive HTML-ish mode.

pub mod error;
pub mod loader;
pub mod options;

pub use error::{LoadError, Result};
pub use loader::{parse_html, parse_xml, Loader};
pub use options::{LoadOptions, Syntax};
