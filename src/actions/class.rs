use super::*;

fn tokens(tokens: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    tokens.into_iter().map(Into::into).collect()
}

pub fn has_class(token: impl Into<String>) -> Action {
    let token = token.into();
    Action::on_element("has_class", move |document, node| {
        Ok(Value::Bool(document.dom.class_contains(node, &token)))
    })
}

pub fn add_class(names: impl IntoIterator<Item = impl Into<String>>) -> Action {
    let names = tokens(names);
    Action::on_element("add_class", move |document, node| {
        document.dom.class_add(node, &names)?;
        Ok(Value::Undefined)
    })
}

pub fn remove_class(names: impl IntoIterator<Item = impl Into<String>>) -> Action {
    let names = tokens(names);
    Action::on_element("remove_class", move |document, node| {
        document.dom.class_remove(node, &names)?;
        Ok(Value::Undefined)
    })
}

/// `classList.toggle(token, force)`: yields membership afterwards.
pub fn toggle_class(token: impl Into<String>, force: Option<bool>) -> Action {
    let token = token.into();
    Action::on_element("toggle_class", move |document, node| {
        Ok(Value::Bool(document.dom.class_toggle(node, &token, force)?))
    })
}

/// `classList.replace(old, new)`: yields whether `old` was present.
pub fn replace_class(old: impl Into<String>, new: impl Into<String>) -> Action {
    let old = old.into();
    let new = new.into();
    Action::on_element("replace_class", move |document, node| {
        Ok(Value::Bool(document.dom.class_replace(node, &old, &new)?))
    })
}
