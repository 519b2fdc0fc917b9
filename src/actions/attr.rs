//! Attribute and form value actions.

use super::*;

/// `getAttribute(name)`: the value, or `Null` when absent.
pub fn get_attr(name: impl Into<String>) -> Action {
    let name = name.into();
    Action::on_element("get_attr", move |document, node| {
        Ok(Value::from(document.dom.attr(node, &name)))
    })
}

pub fn set_attr(name: impl Into<String>, value: impl Into<String>) -> Action {
    let name = name.into();
    let value = value.into();
    Action::on_element("set_attr", move |document, node| {
        document.dom.set_attr(node, &name, &value)?;
        Ok(Value::Undefined)
    })
}

/// Sets each pair in order; a later pair for the same name wins.
pub fn map_set_attr<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Action
where
    K: Into<String>,
    V: Into<String>,
{
    let pairs = owned_pairs(pairs);
    Action::on_element("map_set_attr", move |document, node| {
        for (name, value) in &pairs {
            document.dom.set_attr(node, name, value)?;
        }
        Ok(Value::Undefined)
    })
}

pub fn remove_attr(name: impl Into<String>) -> Action {
    let name = name.into();
    Action::on_element("remove_attr", move |document, node| {
        document.dom.remove_attr(node, &name);
        Ok(Value::Undefined)
    })
}

pub fn has_attr(name: impl Into<String>) -> Action {
    let name = name.into();
    Action::on_element("has_attr", move |document, node| {
        Ok(Value::Bool(document.dom.has_attr(node, &name)))
    })
}

/// `toggleAttribute(name, force)`: yields whether the attribute is present
/// afterwards.
pub fn toggle_attr(name: impl Into<String>, force: Option<bool>) -> Action {
    let name = name.into();
    Action::on_element("toggle_attr", move |document, node| {
        Ok(Value::Bool(document.dom.toggle_attr(node, &name, force)?))
    })
}

/// The `value` property of form controls. Elements without one yield
/// `Undefined`.
pub fn get_value() -> Action {
    Action::on_element("get_value", |document, node| {
        Ok(document.dom.value(node).map_or(Value::Undefined, Value::String))
    })
}

pub fn set_value(value: impl Into<String>) -> Action {
    let value = value.into();
    Action::on_element("set_value", move |document, node| {
        document.dom.set_value(node, &value)?;
        Ok(Value::Undefined)
    })
}
