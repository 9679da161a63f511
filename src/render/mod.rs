//! Template rendering.
//!
//! A [`Renderer`] decodes an invoice, binds a [`Translator`](crate::i18n::Translator)
//! to the requested locale and evaluates a [`Template`] with a
//! [`RenderContext`] exposing the helper library and locale formatters.
//! [`BasicInvoiceTemplate`] is the built-in HTML layout.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use szamla::i18n::{LocaleTables, Resolver};
//! use szamla::render::Renderer;
//!
//! let resolver = Resolver::new(Arc::new(LocaleTables::builtin().unwrap()));
//! let html = Renderer::basic(resolver)
//!     .convert("<InvoiceData><invoiceNumber>A-1</invoiceNumber></InvoiceData>", "hu")
//!     .unwrap();
//! assert!(html.contains("<h2>Fejléc</h2>"));
//! ```

mod basic;
mod context;
mod format;
pub mod helpers;
mod renderer;

pub use basic::BasicInvoiceTemplate;
pub use context::RenderContext;
pub use format::{DateStyle, LocaleFormat, MAX_FRACTION_DIGITS, SymbolPosition};
pub use helpers::Scope;
pub use renderer::{Renderer, Template};
