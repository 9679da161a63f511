//! # szamla
//!
//! Renders Hungarian Online Invoice System (NAV OSA 3.0) `InvoiceData` XML
//! into human-readable documents with localized labels and locale-aware
//! number, currency and date formatting.
//!
//! Decoded trees keep every leaf textual; amounts are parsed into
//! [`rust_decimal::Decimal`] only when formatted, never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use szamla::i18n::{LocaleTables, Resolver};
//! use szamla::render::Renderer;
//!
//! let xml = r#"<InvoiceData xmlns="http://schemas.nav.gov.hu/OSA/3.0/data">
//!   <invoiceNumber>INV-1</invoiceNumber>
//!   <invoiceIssueDate>2024-06-15</invoiceIssueDate>
//! </InvoiceData>"#;
//!
//! let resolver = Resolver::new(Arc::new(LocaleTables::builtin().unwrap()));
//! let renderer = Renderer::basic(resolver);
//!
//! let html = renderer.convert(xml, "hu").unwrap();
//! assert!(html.contains("<dd>2024. 06. 15.</dd>"));
//!
//! let html = renderer.convert(xml, "en").unwrap();
//! assert!(html.contains("<dd>6/15/2024</dd>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document tree, addresses, settings, errors |
//! | `xml` | OSA 3.0 XML decoding with the array whitelist |
//! | `i18n` | Locale tables, translation, missing-key ledger |
//! | `render` (default) | Templates, helpers and locale formatters |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "i18n")]
pub mod i18n;

#[cfg(feature = "render")]
pub mod render;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
