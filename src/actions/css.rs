//! Style and geometry actions.
//!
//! Geometry comes from the document's static box model: sizes are derived
//! from inline `width`, `height`, `padding-*` and `border-*-width` values and
//! positions from inline `left`/`top` offsets. Detached elements and elements
//! hidden with `display: none` measure zero.

use super::*;

/// Computed value of `property`.
pub fn get_css(property: impl Into<String>) -> Action {
    let property = property.into();
    Action::on_element("get_css", move |document, node| {
        Ok(Value::String(document.dom.computed_style(node, &property)))
    })
}

/// `style.setProperty(property, value)`; an empty value removes it.
pub fn set_css(property: impl Into<String>, value: impl Into<String>) -> Action {
    let property = property.into();
    let value = value.into();
    Action::on_element("set_css", move |document, node| {
        document.dom.style_set(node, &property, &value);
        Ok(Value::Undefined)
    })
}

pub fn map_set_css<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Action
where
    K: Into<String>,
    V: Into<String>,
{
    let pairs = owned_pairs(pairs);
    Action::on_element("map_set_css", move |document, node| {
        for (property, value) in &pairs {
            document.dom.style_set(node, property, value);
        }
        Ok(Value::Undefined)
    })
}

pub fn get_width() -> Action {
    Action::on_element("get_width", |document, node| {
        Ok(Value::Number(document.dom.bounding_client_rect(node).width))
    })
}

pub fn get_height() -> Action {
    Action::on_element("get_height", |document, node| {
        Ok(Value::Number(document.dom.bounding_client_rect(node).height))
    })
}

/// Sets `style.width` and yields the assigned value. Numbers are pixels.
pub fn set_width(width: impl Into<Length>) -> Action {
    let width = width.into().to_css();
    Action::on_element("set_width", move |document, node| {
        document.dom.style_set(node, "width", &width);
        Ok(Value::String(width.clone()))
    })
}

/// Sets `style.height` and yields the assigned value. Numbers are pixels.
pub fn set_height(height: impl Into<Length>) -> Action {
    let height = height.into().to_css();
    Action::on_element("set_height", move |document, node| {
        document.dom.style_set(node, "height", &height);
        Ok(Value::String(height.clone()))
    })
}

/// `clientWidth`: content plus padding.
pub fn get_inner_width() -> Action {
    Action::on_element("get_inner_width", |document, node| {
        Ok(Value::Number(document.dom.client_size(node).0))
    })
}

/// `clientHeight`: content plus padding.
pub fn get_inner_height() -> Action {
    Action::on_element("get_inner_height", |document, node| {
        Ok(Value::Number(document.dom.client_size(node).1))
    })
}

/// `offsetWidth`, plus the horizontal margins when `include_margin` is set.
pub fn get_outer_width(include_margin: bool) -> Action {
    Action::on_element("get_outer_width", move |document, node| {
        let mut width = document.dom.offset_size(node).0;
        if include_margin {
            width += document.dom.margin_size(node).0;
        }
        Ok(Value::Number(width))
    })
}

/// `offsetHeight`, plus the vertical margins when `include_margin` is set.
pub fn get_outer_height(include_margin: bool) -> Action {
    Action::on_element("get_outer_height", move |document, node| {
        let mut height = document.dom.offset_size(node).1;
        if include_margin {
            height += document.dom.margin_size(node).1;
        }
        Ok(Value::Number(height))
    })
}

/// Document-relative position: the bounding box plus the window scroll.
pub fn get_offset() -> Action {
    Action::on_element("get_offset", |document, node| {
        let rect = document.dom.bounding_client_rect(node);
        let (scroll_x, scroll_y) = document.window_scroll;
        Ok(Value::Offset {
            top: rect.top + scroll_y,
            left: rect.left + scroll_x,
        })
    })
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Left,
    Top,
}

fn read_scroll(document: &Document, action: &str, target: Target, axis: Axis) -> Result<Value> {
    let (left, top) = match target {
        Target::Element(node) => document.dom.scroll_position(node),
        Target::Window => document.window_scroll,
        Target::Document => {
            return Err(Error::NotAnElement {
                action: action.to_string(),
                target: document.describe(target),
            });
        }
    };
    Ok(Value::Number(match axis {
        Axis::Left => left,
        Axis::Top => top,
    }))
}

/// Stores the scroll position and yields it as stored, after clamping.
fn write_scroll(
    document: &mut Document,
    action: &str,
    target: Target,
    axis: Axis,
    value: f64,
) -> Result<Value> {
    let (left, top) = match axis {
        Axis::Left => (Some(value), None),
        Axis::Top => (None, Some(value)),
    };
    match target {
        Target::Element(node) => document.dom.set_scroll_position(node, left, top),
        Target::Window => {
            let (x, y) = document.window_scroll;
            document.set_window_scroll(left.unwrap_or(x), top.unwrap_or(y));
        }
        Target::Document => {
            return Err(Error::NotAnElement {
                action: action.to_string(),
                target: document.describe(target),
            });
        }
    }
    read_scroll(document, action, target, axis)
}

/// `scrollLeft` of an element, `scrollX` of the window.
pub fn get_scroll_left() -> Action {
    Action::from_fn("get_scroll_left", |document, target| {
        read_scroll(document, "get_scroll_left", target, Axis::Left)
    })
}

/// `scrollTop` of an element, `scrollY` of the window.
pub fn get_scroll_top() -> Action {
    Action::from_fn("get_scroll_top", |document, target| {
        read_scroll(document, "get_scroll_top", target, Axis::Top)
    })
}

pub fn set_scroll_left(value: f64) -> Action {
    Action::from_fn("set_scroll_left", move |document, target| {
        write_scroll(document, "set_scroll_left", target, Axis::Left, value)
    })
}

pub fn set_scroll_top(value: f64) -> Action {
    Action::from_fn("set_scroll_top", move |document, target| {
        write_scroll(document, "set_scroll_top", target, Axis::Top, value)
    })
}
