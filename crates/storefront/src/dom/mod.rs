//! In-memory document model.
//!
//! Renderers build detached [`Node`] trees and hand them to a
//! [`RenderTarget`]. The [`Document`] owns the named elements the page
//! markup provides and answers id lookups for rendered descendants, so all
//! fetch/render logic runs without a browser.

mod document;
mod element;
mod node;

pub use document::{Document, ids};
pub use element::{Element, RenderTarget};
pub use node::{ElementNode, Node, escape_html};
