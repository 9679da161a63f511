//! Document tree, address variant, settings and errors.
//!
//! Everything here is shared by the decoder, the translation layer and the
//! renderer.

mod address;
mod error;
mod node;
mod settings;

pub use address::*;
pub use error::*;
pub use node::*;
pub use settings::*;
