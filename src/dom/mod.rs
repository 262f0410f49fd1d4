//! Parsed FB2 document tree.
//!
//! - [`node`]: the immutable [`Element`] tree with ElementTree-style
//!   text/tail storage
//! - [`tag`]: element name → [`Tag`] mapping used for renderer dispatch
//! - [`parser`]: quick-xml based parser that builds the tree

mod node;
mod parser;
mod tag;

pub use node::{Element, local_name};
pub use parser::{DOCUMENT_NODE, parse_document};
pub use tag::Tag;
