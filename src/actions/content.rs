//! Markup and rendered-text actions. Setters yield the string they assigned.

use super::*;

pub fn get_inner_html() -> Action {
    Action::on_element("get_inner_html", |document, node| {
        Ok(Value::String(document.dom.inner_html(node)))
    })
}

pub fn set_inner_html(html: impl Into<String>) -> Action {
    let html = html.into();
    Action::on_element("set_inner_html", move |document, node| {
        document.dom.set_inner_html(node, &html)?;
        Ok(Value::String(html.clone()))
    })
}

pub fn get_outer_html() -> Action {
    Action::on_element("get_outer_html", |document, node| {
        Ok(Value::String(document.dom.outer_html(node)))
    })
}

/// Replaces the element with the parsed markup. Detached elements are left
/// alone.
pub fn set_outer_html(html: impl Into<String>) -> Action {
    let html = html.into();
    Action::on_element("set_outer_html", move |document, node| {
        match document.dom.parent(node) {
            None => {}
            Some(parent) if parent == document.dom.root => {
                return Err(Error::dom(
                    DomExceptionKind::NoModificationAllowed,
                    "cannot set outerHTML on a child of the document",
                ));
            }
            Some(_) => {
                let replacements = document.dom.parse_detached(&html)?;
                document.dom.replace_with_nodes(node, &replacements)?;
            }
        }
        Ok(Value::String(html.clone()))
    })
}

pub fn get_inner_text() -> Action {
    Action::on_element("get_inner_text", |document, node| {
        Ok(Value::String(document.dom.inner_text(node)))
    })
}

/// Replaces the children with text; line breaks become `<br>` elements.
pub fn set_inner_text(text: impl Into<String>) -> Action {
    let text = text.into();
    Action::on_element("set_inner_text", move |document, node| {
        document.dom.set_text_content(node, "");
        for child in document.dom.text_with_line_breaks(&text) {
            document.dom.append_child(node, child)?;
        }
        Ok(Value::String(text.clone()))
    })
}

pub fn get_outer_text() -> Action {
    Action::on_element("get_outer_text", |document, node| {
        Ok(Value::String(document.dom.inner_text(node)))
    })
}

/// Replaces the element itself with text. Requires a parent element.
pub fn set_outer_text(text: impl Into<String>) -> Action {
    let text = text.into();
    Action::on_element("set_outer_text", move |document, node| {
        match document.dom.parent(node) {
            Some(parent) if parent != document.dom.root => {
                let replacements = document.dom.text_with_line_breaks(&text);
                document.dom.replace_with_nodes(node, &replacements)?;
                Ok(Value::String(text.clone()))
            }
            _ => Err(Error::dom(
                DomExceptionKind::NoModificationAllowed,
                "outerText requires a parent element",
            )),
        }
    })
}
