#![forbid(unsafe_code)]
//! XAML `ResourceDictionary` localization store.
//!
//! Loads a flat, key-addressable collection of translation strings from a
//! XAML `ResourceDictionary` document, normalizes it into an in-memory
//! key/value mapping, and writes it back losslessly. When the backing file
//! is missing or empty, a well-formed skeleton document is provisioned
//! automatically.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xamldict::{ResourceStore, Translation};
//!
//! let mut store = ResourceStore::new();
//! store.load("lang/enUS.axaml")?;
//! store.set("MainWindow.Title", Translation::new("My App"));
//! store.save()?;
//! # Ok::<(), xamldict::Error>(())
//! ```
//!
//! # Behavior
//!
//! - Missing or empty backing files are replaced by a skeleton dictionary;
//!   [`store::LoadOutcome`] tells callers which recovery, if any, happened.
//! - Whitespace is preserved verbatim for entries marked
//!   `xml:space="preserve"`, and for any text containing a newline.
//! - Duplicate keys in a source document resolve last-write-wins.
//! - `save` is deterministic: sorted keys, fixed indentation, and the root
//!   namespace declarations always present.

pub mod error;
pub mod formats;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    formats::XamlFormat,
    store::{LoadOutcome, ResourceStore},
    types::{Locale, Translation},
};
