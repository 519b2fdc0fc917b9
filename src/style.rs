use std::sync::OnceLock;

use fancy_regex::Regex;

use super::*;

/// A CSS length accepted by the size setters.
///
/// Numbers are pixels; strings are written to the style verbatim, so any
/// unit or keyword the caller chooses (`"50%"`, `"auto"`) is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Length {
    Px(f64),
    Raw(String),
}

impl Length {
    pub(crate) fn to_css(&self) -> String {
        match self {
            Self::Px(px) => format!("{}px", format_float(*px)),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::Px(value)
    }
}

impl From<i32> for Length {
    fn from(value: i32) -> Self {
        Self::Px(f64::from(value))
    }
}

impl From<&str> for Length {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for Length {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

/// Border-box rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

static PX_VALUE: OnceLock<Option<Regex>> = OnceLock::new();

fn px_value_regex() -> Option<&'static Regex> {
    PX_VALUE
        .get_or_init(|| Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+))(px)?\s*$").ok())
        .as_ref()
}

/// Pixel value of a CSS length. Unitless values are only accepted for zero.
pub(crate) fn parse_px(value: &str) -> Option<f64> {
    let captures = px_value_regex()?.captures(value).ok()??;
    let number = captures.get(1)?.as_str().parse::<f64>().ok()?;
    if captures.get(2).is_none() && number != 0.0 {
        return None;
    }
    Some(number)
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    let mut start = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in style_attr.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '(') => paren_depth += 1,
            (None, ')') => paren_depth = paren_depth.saturating_sub(1),
            (None, ';') if paren_depth == 0 => {
                push_style_declaration(&style_attr[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_style_declaration(&style_attr[start..], &mut out);
    out
}

fn push_style_declaration(raw_decl: &str, out: &mut Vec<(String, String)>) {
    let Some((name, value)) = raw_decl.split_once(':') else {
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return;
    }

    if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
        out[pos].1 = value.to_string();
    } else {
        out.push((name, value.to_string()));
    }
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Expands a 1-4 value box shorthand into top, right, bottom, left.
fn expand_box_shorthand(value: &str) -> Option<[String; 4]> {
    let parts = value.split_ascii_whitespace().collect::<Vec<_>>();
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all; 4],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return None,
    };
    Some([top, right, bottom, left].map(str::to_string))
}

fn border_width_from_shorthand(value: &str) -> Option<String> {
    value
        .split_ascii_whitespace()
        .find(|token| parse_px(token).is_some() || matches!(*token, "thin" | "medium" | "thick"))
        .map(|token| match token {
            "thin" => "1px".to_string(),
            "medium" => "3px".to_string(),
            "thick" => "5px".to_string(),
            px => px.to_string(),
        })
}

fn default_display(tag: &str) -> &'static str {
    match tag {
        "a" | "abbr" | "b" | "br" | "button" | "code" | "em" | "i" | "img" | "input"
        | "label" | "select" | "small" | "span" | "strong" | "sub" | "sup" | "textarea" => {
            "inline"
        }
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "head" | "script" | "style" | "title" | "meta" | "link" | "template" => "none",
        _ => "block",
    }
}

impl Dom {
    /// Inline declarations with box shorthands expanded to longhands; later
    /// declarations win.
    fn resolved_declarations(&self, node_id: NodeId) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for (name, value) in parse_style_declarations(self.attr(node_id, "style").as_deref()) {
            match name.as_str() {
                "margin" | "padding" => {
                    if let Some(sides) = expand_box_shorthand(&value) {
                        for (side, side_value) in SIDES.iter().zip(sides) {
                            out.insert(format!("{name}-{side}"), side_value);
                        }
                    }
                }
                "border-width" => {
                    if let Some(sides) = expand_box_shorthand(&value) {
                        for (side, side_value) in SIDES.iter().zip(sides) {
                            out.insert(format!("border-{side}-width"), side_value);
                        }
                    }
                }
                "border" => {
                    let width =
                        border_width_from_shorthand(&value).unwrap_or_else(|| "3px".to_string());
                    for side in SIDES {
                        out.insert(format!("border-{side}-width"), width.clone());
                    }
                }
                _ => {
                    out.insert(name, value);
                }
            }
        }
        out
    }

    /// `getComputedStyle(el).getPropertyValue(property)` over inline style and
    /// a small table of initial values.
    pub(crate) fn computed_style(&self, node_id: NodeId, property: &str) -> String {
        let property = property.trim().to_ascii_lowercase();
        let Some(element) = self.element(node_id) else {
            return String::new();
        };
        if let Some(value) = self.resolved_declarations(node_id).remove(&property) {
            return value;
        }

        let is_box_side = SIDES.iter().any(|side| {
            property == format!("margin-{side}")
                || property == format!("padding-{side}")
                || property == format!("border-{side}-width")
        });
        if is_box_side {
            return "0px".to_string();
        }
        match property.as_str() {
            "display" => default_display(&element.tag_name).to_string(),
            "position" => "static".to_string(),
            "visibility" => "visible".to_string(),
            "opacity" => "1".to_string(),
            "box-sizing" => "content-box".to_string(),
            "width" | "height" => "auto".to_string(),
            "top" | "left" | "right" | "bottom" => "auto".to_string(),
            _ => String::new(),
        }
    }

    fn computed_px(&self, node_id: NodeId, property: &str) -> f64 {
        parse_px(&self.computed_style(node_id, property)).unwrap_or(0.0)
    }

    /// Connected, and neither the element nor an ancestor is `display: none`.
    pub(crate) fn is_rendered(&self, node_id: NodeId) -> bool {
        if !self.is_connected(node_id) {
            return false;
        }
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if self.element(node).is_some() && self.computed_style(node, "display") == "none" {
                return false;
            }
            cursor = self.parent(node);
        }
        true
    }

    fn content_size(&self, node_id: NodeId) -> (f64, f64) {
        (
            self.computed_px(node_id, "width").max(0.0),
            self.computed_px(node_id, "height").max(0.0),
        )
    }

    /// `clientWidth` / `clientHeight`.
    pub(crate) fn client_size(&self, node_id: NodeId) -> (f64, f64) {
        if !self.is_rendered(node_id) {
            return (0.0, 0.0);
        }
        let (width, height) = self.content_size(node_id);
        (
            width + self.computed_px(node_id, "padding-left") + self.computed_px(node_id, "padding-right"),
            height + self.computed_px(node_id, "padding-top") + self.computed_px(node_id, "padding-bottom"),
        )
    }

    /// `offsetWidth` / `offsetHeight`.
    pub(crate) fn offset_size(&self, node_id: NodeId) -> (f64, f64) {
        if !self.is_rendered(node_id) {
            return (0.0, 0.0);
        }
        let (width, height) = self.client_size(node_id);
        (
            width
                + self.computed_px(node_id, "border-left-width")
                + self.computed_px(node_id, "border-right-width"),
            height
                + self.computed_px(node_id, "border-top-width")
                + self.computed_px(node_id, "border-bottom-width"),
        )
    }

    /// Horizontal and vertical margin sums.
    pub(crate) fn margin_size(&self, node_id: NodeId) -> (f64, f64) {
        (
            self.computed_px(node_id, "margin-left") + self.computed_px(node_id, "margin-right"),
            self.computed_px(node_id, "margin-top") + self.computed_px(node_id, "margin-bottom"),
        )
    }

    /// `getBoundingClientRect()` under the static box model.
    pub(crate) fn bounding_client_rect(&self, node_id: NodeId) -> Rect {
        if !self.is_rendered(node_id) {
            return Rect::default();
        }
        let (width, height) = self.offset_size(node_id);
        let mut left = self.computed_px(node_id, "left");
        let mut top = self.computed_px(node_id, "top");

        let mut cursor = self.parent(node_id);
        while let Some(ancestor) = cursor {
            if let Some(element) = self.element(ancestor) {
                left += self.computed_px(ancestor, "left") - element.scroll_left;
                top += self.computed_px(ancestor, "top") - element.scroll_top;
            }
            cursor = self.parent(ancestor);
        }

        Rect {
            top,
            left,
            width,
            height,
        }
    }

    pub(crate) fn scroll_position(&self, node_id: NodeId) -> (f64, f64) {
        self.element(node_id)
            .map(|element| (element.scroll_left, element.scroll_top))
            .unwrap_or_default()
    }

    /// Negative and non-finite offsets clamp to zero, as browsers do.
    pub(crate) fn set_scroll_position(&mut self, node_id: NodeId, left: Option<f64>, top: Option<f64>) {
        let Some(element) = self.element_mut(node_id) else {
            return;
        };
        if let Some(left) = left {
            element.scroll_left = clamp_scroll(left);
        }
        if let Some(top) = top {
            element.scroll_top = clamp_scroll(top);
        }
    }
}

pub(crate) fn clamp_scroll(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
