//! Tree mutation actions.

use super::*;

/// An item for [`append`]: an existing node, which is moved, or text, which
/// becomes a new text node for every target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// `append(...items)` on an element or the document.
pub fn append(items: impl IntoIterator<Item = impl Into<Content>>) -> Action {
    let items = items.into_iter().map(Into::into).collect::<Vec<Content>>();
    Action::from_fn("append", move |document, target| {
        let parent = container_node(document, "append", target)?;
        for item in &items {
            let child = match item {
                Content::Node(node) => *node,
                Content::Text(text) => document.create_text_node(text),
            };
            document.dom.append_child(parent, child)?;
        }
        Ok(Value::Undefined)
    })
}

/// `parent.appendChild(element)`: yields the appended element.
pub fn append_to(parent: impl Into<Target>) -> Action {
    let parent = parent.into();
    Action::on_element("append_to", move |document, node| {
        let parent = container_node(document, "append_to", parent)?;
        document.dom.append_child(parent, node)?;
        Ok(Value::Node(Target::Element(node)))
    })
}

/// `element.remove()`.
pub fn remove() -> Action {
    Action::on_element("remove", |document, node| {
        document.dom.remove_node(node);
        Ok(Value::Undefined)
    })
}

/// `replaceChild(new_child, old_child)` on an element or the document.
/// Yields the replaced child.
pub fn replace_child(new_child: NodeId, old_child: NodeId) -> Action {
    Action::from_fn("replace_child", move |document, target| {
        let parent = container_node(document, "replace_child", target)?;
        document.dom.replace_child(parent, new_child, old_child)?;
        Ok(Value::Node(Target::Element(old_child)))
    })
}

/// `removeChild(child)` on an element or the document. Yields the removed
/// child.
pub fn remove_child(child: NodeId) -> Action {
    Action::from_fn("remove_child", move |document, target| {
        let parent = container_node(document, "remove_child", target)?;
        document.dom.remove_child(parent, child)?;
        Ok(Value::Node(Target::Element(child)))
    })
}

/// `cloneNode(deep)`: yields the new, detached copy. Listeners are not
/// copied.
pub fn clone(deep: bool) -> Action {
    Action::on_element("clone", move |document, node| {
        let copy = document.dom.clone_node(node, deep)?;
        Ok(Value::Node(Target::Element(copy)))
    })
}
