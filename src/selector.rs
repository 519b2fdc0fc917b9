use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    Root,
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Empty,
    NthChild(NthChildSelector),
    NthLastChild(NthChildSelector),
    NthOfType(NthChildSelector),
    NthLastOfType(NthChildSelector),
    Not(Vec<Vec<SelectorPart>>),
    Is(Vec<Vec<SelectorPart>>),
    Has(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NthChildSelector {
    Exact(usize),
    Odd,
    Even,
    AnPlusB(i64, i64),
}

impl NthChildSelector {
    /// `index` is 1-based.
    fn matches(&self, index: usize) -> bool {
        match self {
            Self::Exact(expected) => index == *expected,
            Self::Odd => index % 2 == 1,
            Self::Even => index % 2 == 0,
            Self::AnPlusB(a, b) => {
                let (a, b) = (i128::from(*a), i128::from(*b));
                let diff = index as i128 - b;
                if a == 0 {
                    return diff == 0;
                }
                diff % a == 0 && (diff / a) >= 0
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && !self.universal
            && self.pseudo_classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to the previous (left) part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

fn syntax_error(selector: &str) -> Error {
    Error::SelectorSyntax(format!("{selector:?} is not a valid selector"))
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_selector_groups(selector)?
        .iter()
        .map(|group| parse_selector_chain(group))
        .collect()
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(syntax_error(selector));
    }

    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokenize_selector(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || parts.is_empty() {
                return Err(syntax_error(selector));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending_combinator.is_some() {
        return Err(syntax_error(selector));
    }
    Ok(parts)
}

/// Splits on top-level commas, honoring brackets, parentheses and quotes.
fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if ch == ',' && depth.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(syntax_error(selector));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        depth.feed(ch).ok_or_else(|| syntax_error(selector))?;
        current.push(ch);
    }

    if !depth.is_top_level() {
        return Err(syntax_error(selector));
    }
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(syntax_error(selector));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if depth.is_top_level() {
            if matches!(ch, '>' | '+' | '~') {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
                continue;
            }
            if ch.is_ascii_whitespace() {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                continue;
            }
        }
        depth.feed(ch).ok_or_else(|| syntax_error(selector))?;
        current.push(ch);
    }

    if !depth.is_top_level() {
        return Err(syntax_error(selector));
    }
    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    Ok(tokens)
}

#[derive(Debug, Default)]
struct NestingDepth {
    brackets: usize,
    parens: usize,
    quote: Option<char>,
}

impl NestingDepth {
    fn is_top_level(&self) -> bool {
        self.brackets == 0 && self.parens == 0 && self.quote.is_none()
    }

    /// Returns `None` on an unbalanced closing bracket or parenthesis.
    fn feed(&mut self, ch: char) -> Option<()> {
        if let Some(quote) = self.quote {
            if ch == quote {
                self.quote = None;
            }
            return Some(());
        }
        match ch {
            '"' | '\'' if self.brackets > 0 || self.parens > 0 => self.quote = Some(ch),
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.checked_sub(1)?,
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.checked_sub(1)?,
            _ => {}
        }
        Some(())
    }
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() || i != 0 {
                    return Err(syntax_error(part));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) =
                    parse_selector_ident(part, i + 1).ok_or_else(|| syntax_error(part))?;
                if step.id.replace(id).is_some() {
                    return Err(syntax_error(part));
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_selector_ident(part, i + 1).ok_or_else(|| syntax_error(part))?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(syntax_error(part));
                }
                let (tag, next) = parse_selector_ident(part, i).ok_or_else(|| syntax_error(part))?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.is_empty() {
        return Err(syntax_error(part));
    }
    Ok(step)
}

fn simple_pseudo_class(name: &str) -> Option<SelectorPseudoClass> {
    let pseudo = match name {
        "root" => SelectorPseudoClass::Root,
        "first-child" => SelectorPseudoClass::FirstChild,
        "last-child" => SelectorPseudoClass::LastChild,
        "first-of-type" => SelectorPseudoClass::FirstOfType,
        "last-of-type" => SelectorPseudoClass::LastOfType,
        "only-child" => SelectorPseudoClass::OnlyChild,
        "only-of-type" => SelectorPseudoClass::OnlyOfType,
        "checked" => SelectorPseudoClass::Checked,
        "disabled" => SelectorPseudoClass::Disabled,
        "enabled" => SelectorPseudoClass::Enabled,
        "required" => SelectorPseudoClass::Required,
        "optional" => SelectorPseudoClass::Optional,
        "empty" => SelectorPseudoClass::Empty,
        _ => return None,
    };
    Some(pseudo)
}

fn parse_selector_pseudo(part: &str, colon: usize) -> Result<(SelectorPseudoClass, usize)> {
    let start = colon + 1;
    let (name, after_name) = parse_selector_ident(part, start).ok_or_else(|| syntax_error(part))?;
    let name = name.to_ascii_lowercase();

    if part.as_bytes().get(after_name) != Some(&b'(') {
        let pseudo = simple_pseudo_class(&name).ok_or_else(|| Error::SelectorSyntax(format!("unknown pseudo-class :{name}")))?;
        return Ok((pseudo, after_name));
    }

    let body_start = after_name + 1;
    let close = find_matching_paren(&part[body_start..]).ok_or_else(|| syntax_error(part))?;
    let body = part[body_start..body_start + close].trim();
    let next = body_start + close + 1;
    if body.is_empty() {
        return Err(syntax_error(part));
    }

    let pseudo = match name.as_str() {
        "not" => SelectorPseudoClass::Not(parse_selector_groups(body)?),
        "is" | "where" => SelectorPseudoClass::Is(parse_selector_groups(body)?),
        "has" => SelectorPseudoClass::Has(parse_selector_groups(body)?),
        "nth-child" => SelectorPseudoClass::NthChild(parse_nth(part, body)?),
        "nth-last-child" => SelectorPseudoClass::NthLastChild(parse_nth(part, body)?),
        "nth-of-type" => SelectorPseudoClass::NthOfType(parse_nth(part, body)?),
        "nth-last-of-type" => SelectorPseudoClass::NthLastOfType(parse_nth(part, body)?),
        _ => {
            return Err(Error::SelectorSyntax(format!(
                "unknown functional pseudo-class :{name}()"
            )));
        }
    };
    Ok((pseudo, next))
}

fn parse_nth(part: &str, body: &str) -> Result<NthChildSelector> {
    parse_nth_child_selector(body).ok_or_else(|| syntax_error(part))
}

fn find_matching_paren(body: &str) -> Option<usize> {
    let mut paren_depth = 1usize;
    let mut bracket_depth = 0usize;
    let mut quote: Option<u8> = None;

    for (idx, b) in body.bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' => bracket_depth += 1,
            b']' => bracket_depth = bracket_depth.checked_sub(1)?,
            b'(' if bracket_depth == 0 => paren_depth += 1,
            b')' if bracket_depth == 0 => {
                paren_depth -= 1;
                if paren_depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_nth_child_selector(raw: &str) -> Option<NthChildSelector> {
    let compact = raw
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "" => None,
        "odd" => Some(NthChildSelector::Odd),
        "even" => Some(NthChildSelector::Even),
        expr if expr.contains('n') => parse_nth_child_expression(expr),
        number => match number.parse::<usize>().ok()? {
            0 => None,
            value => Some(NthChildSelector::Exact(value)),
        },
    }
}

fn parse_nth_child_expression(expr: &str) -> Option<NthChildSelector> {
    if expr.matches('n').count() != 1 {
        return None;
    }
    let n_pos = expr.find('n')?;
    let (a_part, rest) = expr.split_at(n_pos);
    let b_part = &rest[1..];

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => a_part.parse::<i64>().ok()?,
    };

    if b_part.is_empty() {
        return Some(NthChildSelector::AnPlusB(a, 0));
    }

    let (sign, raw_b) = if let Some(rest) = b_part.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = b_part.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let b = raw_b.parse::<i64>().ok()?;
    Some(NthChildSelector::AnPlusB(a, b * sign))
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || !b.is_ascii()
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;
    skip_ws(bytes, &mut i);

    let key_start = i;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(syntax_error(src));
    }
    let key = src[key_start..i].to_ascii_lowercase();

    skip_ws(bytes, &mut i);
    match bytes.get(i) {
        Some(b']') => return Ok((SelectorAttrCondition::Exists { key }, i + 1)),
        None => return Err(syntax_error(src)),
        Some(_) => {}
    }

    let (op, next) = match (bytes[i], bytes.get(i + 1)) {
        (b'=', _) => (b'=', i + 1),
        (op @ (b'^' | b'$' | b'*' | b'~' | b'|'), Some(b'=')) => (op, i + 2),
        _ => return Err(syntax_error(src)),
    };

    i = next;
    skip_ws(bytes, &mut i);
    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = after_value;
    skip_ws(bytes, &mut i);
    if bytes.get(i) != Some(&b']') {
        return Err(syntax_error(src));
    }

    let cond = match op {
        b'^' => SelectorAttrCondition::StartsWith { key, value },
        b'$' => SelectorAttrCondition::EndsWith { key, value },
        b'*' => SelectorAttrCondition::Contains { key, value },
        b'~' => SelectorAttrCondition::Includes { key, value },
        b'|' => SelectorAttrCondition::DashMatch { key, value },
        _ => SelectorAttrCondition::Eq { key, value },
    };
    Ok((cond, i + 1))
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_selector_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(syntax_error(src));
    };

    if first == b'"' || first == b'\'' {
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == first {
                let raw = src.get(start + 1..i).ok_or_else(|| syntax_error(src))?;
                return Ok((unescape_selector_string(raw), i + 1));
            }
            i += 1;
        }
        return Err(syntax_error(src));
    }

    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
        if bytes[i] == b'\\' {
            i = (i + 2).min(bytes.len());
            continue;
        }
        i += 1;
    }
    let raw = src.get(start..i).ok_or_else(|| syntax_error(src))?;
    Ok((unescape_selector_string(raw), i))
}

fn unescape_selector_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

impl Dom {
    /// Matching elements under the document node, in document order.
    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(self.root, &mut ids);

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in ids {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.element(node_id).is_some()
            && groups
                .iter()
                .any(|steps| self.matches_selector_chain(node_id, steps)))
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        let combinator = last.combinator.unwrap_or(SelectorCombinator::Descendant);
        if rest.is_empty() {
            return true;
        }

        // Backtracks over every candidate so `a b c` finds any valid chain.
        match combinator {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(parent) = cursor {
                    if self.matches_selector_chain(parent, rest) {
                        return true;
                    }
                    cursor = self.parent(parent);
                }
                false
            }
            SelectorCombinator::AdjacentSibling => self
                .previous_element_sibling(node_id)
                .is_some_and(|sibling| self.matches_selector_chain(sibling, rest)),
            SelectorCombinator::GeneralSibling => {
                let mut cursor = self.previous_element_sibling(node_id);
                while let Some(sibling) = cursor {
                    if self.matches_selector_chain(sibling, rest) {
                        return true;
                    }
                    cursor = self.previous_element_sibling(sibling);
                }
                false
            }
        }
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !crate::dom::has_class(element, class_name))
        {
            return false;
        }

        let attrs_match = step.attrs.iter().all(|cond| match cond {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
            SelectorAttrCondition::StartsWith { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.starts_with(value.as_str())),
            SelectorAttrCondition::EndsWith { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.ends_with(value.as_str())),
            SelectorAttrCondition::Contains { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.contains(value.as_str())),
            SelectorAttrCondition::Includes { key, value } => {
                element.attrs.get(key).is_some_and(|attr| {
                    attr.split_ascii_whitespace().any(|token| token == value)
                })
            }
            SelectorAttrCondition::DashMatch { key, value } => {
                element.attrs.get(key).is_some_and(|attr| {
                    attr == value
                        || attr
                            .strip_prefix(value.as_str())
                            .is_some_and(|rest| rest.starts_with('-'))
                })
            }
        });
        if !attrs_match {
            return false;
        }

        step.pseudo_classes
            .iter()
            .all(|pseudo| self.matches_pseudo(node_id, element, pseudo))
    }

    fn matches_pseudo(&self, node_id: NodeId, element: &Element, pseudo: &SelectorPseudoClass) -> bool {
        match pseudo {
            SelectorPseudoClass::Root => self.parent(node_id) == Some(self.root),
            SelectorPseudoClass::FirstChild => {
                self.parent(node_id).is_some() && self.previous_element_sibling(node_id).is_none()
            }
            SelectorPseudoClass::LastChild => {
                self.parent(node_id).is_some() && self.next_element_sibling(node_id).is_none()
            }
            SelectorPseudoClass::OnlyChild => {
                self.parent(node_id).is_some()
                    && self.previous_element_sibling(node_id).is_none()
                    && self.next_element_sibling(node_id).is_none()
            }
            SelectorPseudoClass::FirstOfType => {
                self.sibling_position(node_id, true).is_some_and(|(index, _)| index == 1)
            }
            SelectorPseudoClass::LastOfType => self
                .sibling_position(node_id, true)
                .is_some_and(|(index, total)| index == total),
            SelectorPseudoClass::OnlyOfType => self
                .sibling_position(node_id, true)
                .is_some_and(|(_, total)| total == 1),
            SelectorPseudoClass::NthChild(nth) => self
                .sibling_position(node_id, false)
                .is_some_and(|(index, _)| nth.matches(index)),
            SelectorPseudoClass::NthLastChild(nth) => self
                .sibling_position(node_id, false)
                .is_some_and(|(index, total)| nth.matches(total + 1 - index)),
            SelectorPseudoClass::NthOfType(nth) => self
                .sibling_position(node_id, true)
                .is_some_and(|(index, _)| nth.matches(index)),
            SelectorPseudoClass::NthLastOfType(nth) => self
                .sibling_position(node_id, true)
                .is_some_and(|(index, total)| nth.matches(total + 1 - index)),
            SelectorPseudoClass::Checked => {
                element.attrs.contains_key("checked")
                    || (element.is("option") && element.attrs.contains_key("selected"))
            }
            SelectorPseudoClass::Disabled => {
                is_form_control(element) && element.attrs.contains_key("disabled")
            }
            SelectorPseudoClass::Enabled => {
                is_form_control(element) && !element.attrs.contains_key("disabled")
            }
            SelectorPseudoClass::Required => {
                is_form_control(element) && element.attrs.contains_key("required")
            }
            SelectorPseudoClass::Optional => {
                is_form_control(element) && !element.attrs.contains_key("required")
            }
            SelectorPseudoClass::Empty => self.children(node_id).iter().all(|child| {
                matches!(&self.nodes[child.0].node_type, NodeType::Text(text) if text.is_empty())
            }),
            SelectorPseudoClass::Not(groups) => !groups
                .iter()
                .any(|steps| self.matches_selector_chain(node_id, steps)),
            SelectorPseudoClass::Is(groups) => groups
                .iter()
                .any(|steps| self.matches_selector_chain(node_id, steps)),
            SelectorPseudoClass::Has(groups) => {
                let mut descendants = Vec::new();
                self.collect_elements_descendants_dfs(node_id, &mut descendants);
                descendants.into_iter().any(|candidate| {
                    groups
                        .iter()
                        .any(|steps| self.matches_selector_chain(candidate, steps))
                })
            }
        }
    }

    /// 1-based position among element siblings (optionally of the same tag)
    /// and the total count.
    fn sibling_position(&self, node_id: NodeId, same_type: bool) -> Option<(usize, usize)> {
        let parent = self.parent(node_id)?;
        let tag_name = self.tag_name(node_id)?;
        let mut index = None;
        let mut total = 0usize;
        for child in self.children(parent) {
            let Some(element) = self.element(*child) else {
                continue;
            };
            if same_type && element.tag_name != tag_name {
                continue;
            }
            total += 1;
            if *child == node_id {
                index = Some(total);
            }
        }
        index.map(|index| (index, total))
    }
}

fn is_form_control(element: &Element) -> bool {
    ["input", "select", "textarea", "button", "option", "fieldset"]
        .iter()
        .any(|tag| element.is(tag))
}
