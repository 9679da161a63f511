//! Invoice XML decoding.
//!
//! Turns an OSA 3.0 `InvoiceData` document into a [`Node`](crate::core::Node)
//! tree with a uniform shape: repeatable elements named in the
//! [`ArrayWhitelist`] are always lists, so templates can iterate them without
//! checking how many occurrences the document happened to contain.
//!
//! # Example
//!
//! ```
//! use szamla::xml::decode;
//!
//! let tree = decode(
//!     "<InvoiceData><invoiceLines><line><lineNumber>1</lineNumber></line></invoiceLines></InvoiceData>",
//! )
//! .unwrap();
//! let lines = tree.path(&["InvoiceData", "invoiceLines", "line"]).unwrap();
//! assert_eq!(lines.as_list().unwrap().len(), 1);
//! ```

mod decode;
mod whitelist;

pub use decode::{XmlDecoder, decode};
pub use whitelist::{ArrayWhitelist, OSA_3_0};
