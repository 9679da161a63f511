//! Translation lookup and missing-key recording.
//!
//! Labels come from immutable per-locale [`LocaleTable`]s. A lookup that
//! finds nothing returns the key itself and reports it to the
//! [`MissingKeyRecorder`], which keeps a [`Ledger`] of misses and writes it
//! to a [`LedgerStore`] shortly after a burst of misses ends.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use szamla::i18n::{LocaleTables, Resolver};
//!
//! let resolver = Resolver::new(Arc::new(LocaleTables::builtin().unwrap()));
//! assert_eq!(resolver.resolve("HU", "invoice"), "Számla");
//! assert_eq!(resolver.resolve("hu", "noSuchKey"), "noSuchKey");
//! ```

mod ledger;
mod locale;
mod recorder;
mod resolver;
mod store;

pub use ledger::Ledger;
pub use locale::{LocaleTable, LocaleTables};
pub use recorder::MissingKeyRecorder;
pub use resolver::{Resolver, Translator};
pub use store::{JsonFileStore, LedgerStore, LedgerStoreError, MemoryStore};
