//! Factories for the actions [`Document::select`] runs.
//!
//! Every factory is a plain constructor: it captures its arguments and
//! returns an [`Action`], and nothing touches the document until dispatch.
//! Actions that only make sense on elements fail with
//! [`Error::NotAnElement`] when the collection contains the document or the
//! window; the dispatcher isolates that failure like any other.

use super::*;

pub mod attr;
pub mod class;
pub mod content;
pub mod css;
pub mod event;
pub mod tree;

pub use attr::{get_attr, get_value, has_attr, map_set_attr, remove_attr, set_attr, set_value, toggle_attr};
pub use class::{add_class, has_class, remove_class, replace_class, toggle_class};
pub use content::{
    get_inner_html, get_inner_text, get_outer_html, get_outer_text, set_inner_html,
    set_inner_text, set_outer_html, set_outer_text,
};
pub use css::{
    get_css, get_height, get_inner_height, get_inner_width, get_offset, get_outer_height,
    get_outer_width, get_scroll_left, get_scroll_top, get_width, map_set_css, set_css,
    set_height, set_scroll_left, set_scroll_top, set_width,
};
pub use event::{off, on, once};
pub use tree::{Content, append, append_to, clone, remove, remove_child, replace_child};

/// The node children are inserted into for `target`.
fn container_node(document: &Document, action: &str, target: Target) -> Result<NodeId> {
    match target {
        Target::Element(node) => Ok(node),
        Target::Document => Ok(document.dom.root),
        Target::Window => Err(Error::NotAnElement {
            action: action.to_string(),
            target: document.describe(target),
        }),
    }
}

fn owned_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<(String, String)>
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
