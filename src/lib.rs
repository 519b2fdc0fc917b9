//! Select DOM elements and apply composable actions to them.
//!
//! `chop_dom` is a small selection-and-application engine over an in-memory
//! [`Document`]. A selector (a CSS selector string, a `"<tag>"` creation
//! shorthand, a node reference, or the window) resolves into a collection of
//! [`Target`]s, and a sequence of [`Action`]s runs across that collection.
//! The actions in [`actions`] are thin wrappers around the document's native
//! surface: attributes, class lists, style and geometry, content, events and
//! tree mutation.
//!
//! ```
//! use chop_dom::actions::{add_class, get_attr, set_attr};
//! use chop_dom::{Document, Value};
//!
//! # fn main() -> chop_dom::Result<()> {
//! let mut doc = Document::from_html(
//!     "<ul><li class='item'>a</li><li class='item'>b</li></ul>",
//! )?;
//!
//! doc.select(".item", &[add_class(["active"]), set_attr("role", "option")])?;
//!
//! let role = doc.select(".item.active", &[get_attr("role")])?;
//! assert_eq!(role, Value::from("option"));
//! # Ok(())
//! # }
//! ```
//!
//! # Result precedence
//!
//! With no actions, [`Document::select`] returns the first target. With
//! actions, every action runs on every target (actions outer, targets inner)
//! and the merged result is:
//!
//! - the target itself whenever an action returns the node it ran on
//!   (this always overrides what was accumulated before),
//! - otherwise the first defined value produced,
//! - otherwise the first target.
//!
//! A failing (action, target) pair never aborts the pass under the default
//! [`FailurePolicy::Continue`]; see [`Document::set_failure_policy`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, trace, warn};

mod action;
pub mod actions;
mod document;
mod dom;
mod events;
mod html;
mod select;
mod selector;
mod style;
mod value;

pub use action::{Action, ActionFn};
pub use document::Document;
pub use dom::NodeId;
pub use events::{Event, EventListener, EventPhase, ListenerOptions};
pub use select::{ActionFailure, FailurePolicy, Selector, Target};
pub use style::{Length, Rect};
pub use value::Value;

use dom::{Dom, Element, NodeType};
use events::ListenerStore;
use html::{escape_html_attr, escape_html_text, is_void_tag, parse_fragment};
use style::{
    clamp_scroll, format_float, parse_style_declarations, serialize_style_declarations,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selector is not a string, an element, the document or the window.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("selector syntax error: {0}")]
    SelectorSyntax(String),
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("{action} requires an element target, got {target}")]
    NotAnElement { action: String, target: String },
    #[error("{kind}: {message}")]
    DomException {
        kind: DomExceptionKind,
        message: String,
    },
    /// Returned by the dispatcher under [`FailurePolicy::Abort`].
    #[error("action {action} failed on {target}: {source}")]
    ActionFailed {
        action: String,
        target: String,
        #[source]
        source: Box<Error>,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn dom(kind: DomExceptionKind, message: impl Into<String>) -> Self {
        Self::DomException {
            kind,
            message: message.into(),
        }
    }
}

/// Names of the native exceptions the document model raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomExceptionKind {
    Syntax,
    InvalidCharacter,
    HierarchyRequest,
    NotFound,
    NoModificationAllowed,
}

impl fmt::Display for DomExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Syntax => "SyntaxError",
            Self::InvalidCharacter => "InvalidCharacterError",
            Self::HierarchyRequest => "HierarchyRequestError",
            Self::NotFound => "NotFoundError",
            Self::NoModificationAllowed => "NoModificationAllowedError",
        };
        f.write_str(name)
    }
}
