use super::*;

// Recursive walks grow the stack on demand so deeply nested markup cannot
// overflow it.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Handle to a node owned by a [`Document`].
///
/// Ids are indices into the document's arena. They stay valid for the life of
/// the document, including after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) scroll_left: f64,
    pub(crate) scroll_top: f64,
}

impl Element {
    pub(crate) fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        Self {
            tag_name,
            attrs,
            value,
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    pub(crate) fn is(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: Option<NodeId>,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        self.create_node(parent, NodeType::Element(Element::new(tag_name, attrs)))
    }

    pub(crate) fn create_text(&mut self, parent: Option<NodeId>, text: String) -> NodeId {
        self.create_node(parent, NodeType::Text(text))
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn is_text(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.node_type),
            Some(NodeType::Text(_))
        )
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn can_have_children(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        )
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.element(current).is_some_and(|e| e.is(tag)) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.all_element_nodes()
            .into_iter()
            .find(|node| self.element(*node).is_some_and(|e| e.is(tag)))
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node_id, &mut out);
        out
    }

    fn collect_text(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document | NodeType::Element(_) => {
                    for child in &self.nodes[node_id.0].children {
                        self.collect_text(*child, out);
                    }
                }
                NodeType::Text(text) => out.push_str(text),
            }
        })
    }

    /// Rendered-text approximation without layout: `<br>` becomes a line
    /// break and script/style contents are skipped.
    pub(crate) fn inner_text(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.collect_inner_text(node_id, &mut out);
        out
    }

    fn collect_inner_text(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            for child in &self.nodes[node_id.0].children {
                match &self.nodes[child.0].node_type {
                    NodeType::Text(text) => out.push_str(text),
                    NodeType::Element(element) if element.is("br") => out.push('\n'),
                    NodeType::Element(element) if element.is("script") || element.is("style") => {
                    }
                    _ => self.collect_inner_text(*child, out),
                }
            }
        })
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            self.serialize_node(*child, &mut out);
        }
        out
    }

    pub(crate) fn outer_html(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(node_id, &mut out);
        out
    }

    fn serialize_node(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document => {
                    for child in &self.nodes[node_id.0].children {
                        self.serialize_node(*child, out);
                    }
                }
                NodeType::Text(text) => {
                    let raw_text_parent = self
                        .parent(node_id)
                        .and_then(|parent| self.element(parent))
                        .is_some_and(|parent| parent.is("script") || parent.is("style"));
                    if raw_text_parent {
                        out.push_str(text);
                    } else {
                        out.push_str(&escape_html_text(text));
                    }
                }
                NodeType::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag_name);
                    let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                    attrs.sort_by(|(left, _), (right, _)| left.cmp(right));
                    for (name, value) in attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(value));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_tag(&element.tag_name) {
                        return;
                    }
                    for child in &self.nodes[node_id.0].children {
                        self.serialize_node(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        })
    }

    /// Replaces all children of `node_id` with a single text node (none for
    /// an empty string).
    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) {
        self.detach_children(node_id);
        if !value.is_empty() {
            self.create_text(Some(node_id), value.to_string());
        }
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        let fragment = parse_fragment(html)?;
        self.detach_children(node_id);
        for child in fragment.children(fragment.root).to_vec() {
            self.import_subtree(&fragment, child, Some(node_id))?;
        }
        Ok(())
    }

    /// Parses `html` and returns the imported top-level nodes, detached.
    pub(crate) fn parse_detached(&mut self, html: &str) -> Result<Vec<NodeId>> {
        let fragment = parse_fragment(html)?;
        let mut out = Vec::new();
        for child in fragment.children(fragment.root).to_vec() {
            out.push(self.import_subtree(&fragment, child, None)?);
        }
        Ok(out)
    }

    /// Builds the nodes for rendered text: `\n` (and `\r\n`) become `<br>`.
    pub(crate) fn text_with_line_breaks(&mut self, text: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for (idx, line) in normalized.split('\n').enumerate() {
            if idx > 0 {
                out.push(self.create_element(None, "br".to_string(), HashMap::new()));
            }
            if !line.is_empty() {
                out.push(self.create_text(None, line.to_string()));
            }
        }
        out
    }

    fn detach_children(&mut self, node_id: NodeId) {
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
    }

    pub(crate) fn import_subtree(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let node_type = match &source.nodes[source_node.0].node_type {
                NodeType::Document => {
                    return Err(Error::dom(
                        DomExceptionKind::HierarchyRequest,
                        "cannot import a document node",
                    ));
                }
                NodeType::Element(element) => NodeType::Element(element.clone()),
                NodeType::Text(text) => NodeType::Text(text.clone()),
            };

            let node = self.create_node(parent, node_type);
            for child in &source.nodes[source_node.0].children {
                self.import_subtree(source, *child, Some(node))?;
            }
            Ok(node)
        })
    }

    pub(crate) fn clone_node(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let node_type = match &self.nodes[node_id.0].node_type {
                NodeType::Document => {
                    return Err(Error::dom(
                        DomExceptionKind::NotFound,
                        "cloning the document node is not supported",
                    ));
                }
                NodeType::Element(element) => {
                    let mut copy = element.clone();
                    copy.scroll_left = 0.0;
                    copy.scroll_top = 0.0;
                    NodeType::Element(copy)
                }
                NodeType::Text(text) => NodeType::Text(text.clone()),
            };
            let clone = self.create_node(None, node_type);
            if deep {
                for child in self.nodes[node_id.0].children.clone() {
                    let child_clone = self.clone_node(child, true)?;
                    self.nodes[child_clone.0].parent = Some(clone);
                    self.nodes[clone.0].children.push(child_clone);
                }
            }
            Ok(clone)
        })
    }

    /// `value` of elements that expose one; `None` for all other elements.
    pub(crate) fn value(&self, node_id: NodeId) -> Option<String> {
        let element = self.element(node_id)?;
        if element.is("input") || element.is("textarea") || element.is("select") {
            return Some(element.value.clone());
        }
        if element.is("option") {
            return Some(self.option_effective_value(node_id));
        }
        if element.is("button") || element.is("data") {
            return Some(element.attrs.get("value").cloned().unwrap_or_default());
        }
        None
    }

    /// Assigns `value`; elements without a value property are left untouched.
    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let Some(element) = self.element_mut(node_id) else {
            return Ok(());
        };
        if element.is("select") {
            return self.set_select_value(node_id, value);
        }
        if element.is("input") || element.is("textarea") {
            element.value = value.to_string();
            return Ok(());
        }
        if element.is("option") || element.is("button") || element.is("data") {
            return self.set_attr(node_id, "value", value);
        }
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) {
        for node in self.all_element_nodes() {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is("textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            } else if element.is("select") {
                self.sync_select_value(node);
            }
        }
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_effective_value(*option) == requested);

        for option in &options {
            if let Some(option_element) = self.element_mut(*option) {
                if Some(*option) == matched {
                    option_element
                        .attrs
                        .insert("selected".to_string(), String::new());
                } else {
                    option_element.attrs.remove("selected");
                }
            }
        }

        let value = matched
            .map(|option| self.option_effective_value(option))
            .unwrap_or_default();
        if let Some(element) = self.element_mut(select_node) {
            element.value = value;
        }
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);
        let value = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())
            .map(|option| self.option_effective_value(option))
            .unwrap_or_default();
        if let Some(element) = self.element_mut(select_node) {
            element.value = value;
        }
    }

    fn sync_select_value_for_option(&mut self, option_node: NodeId) {
        if let Some(select_node) = self.find_ancestor_by_tag(option_node, "select") {
            self.sync_select_value(select_node);
        }
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if self.element(*child).is_some_and(|e| e.is("option")) {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option_node: NodeId) -> String {
        if let Some(value) = self.attr(option_node, "value") {
            return value;
        }
        self.text_content(option_node)
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        validate_attr_name(name)?;
        let lowered = name.to_ascii_lowercase();
        let is_option = {
            let Some(element) = self.element_mut(node_id) else {
                return Ok(());
            };
            element.attrs.insert(lowered.clone(), value.to_string());
            if lowered == "value" {
                element.value = value.to_string();
            }
            element.is("option")
        };

        if is_option && (lowered == "selected" || lowered == "value") {
            self.sync_select_value_for_option(node_id);
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) {
        let lowered = name.to_ascii_lowercase();
        let is_option = {
            let Some(element) = self.element_mut(node_id) else {
                return;
            };
            element.attrs.remove(&lowered);
            if lowered == "value" {
                element.value.clear();
            }
            element.is("option")
        };

        if is_option && (lowered == "selected" || lowered == "value") {
            self.sync_select_value_for_option(node_id);
        }
    }

    /// Returns whether the attribute is present afterwards.
    pub(crate) fn toggle_attr(
        &mut self,
        node_id: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> Result<bool> {
        validate_attr_name(name)?;
        let present = self.has_attr(node_id, name);
        match (present, force) {
            (true, None | Some(false)) => {
                self.remove_attr(node_id, name);
                Ok(false)
            }
            (false, None | Some(true)) => {
                self.set_attr(node_id, name, "")?;
                Ok(true)
            }
            (true, Some(true)) => Ok(true),
            (false, Some(false)) => Ok(false),
        }
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, token: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, token))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, tokens: &[String]) -> Result<()> {
        for token in tokens {
            validate_class_token(token)?;
        }
        let Some(element) = self.element_mut(node_id) else {
            return Ok(());
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        for token in tokens {
            if !classes.iter().any(|name| name == token) {
                classes.push(token.clone());
            }
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, tokens: &[String]) -> Result<()> {
        for token in tokens {
            validate_class_token(token)?;
        }
        let Some(element) = self.element_mut(node_id) else {
            return Ok(());
        };
        if !element.attrs.contains_key("class") {
            return Ok(());
        }
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| !tokens.contains(name));
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(
        &mut self,
        node_id: NodeId,
        token: &str,
        force: Option<bool>,
    ) -> Result<bool> {
        validate_class_token(token)?;
        let tokens = [token.to_string()];
        match (self.class_contains(node_id, token), force) {
            (true, None | Some(false)) => {
                self.class_remove(node_id, &tokens)?;
                Ok(false)
            }
            (false, None | Some(true)) => {
                self.class_add(node_id, &tokens)?;
                Ok(true)
            }
            (present, Some(_)) => Ok(present),
        }
    }

    /// Replaces `token` in place; returns whether it was present.
    pub(crate) fn class_replace(
        &mut self,
        node_id: NodeId,
        token: &str,
        new_token: &str,
    ) -> Result<bool> {
        validate_class_token(token)?;
        validate_class_token(new_token)?;
        let Some(element) = self.element_mut(node_id) else {
            return Ok(false);
        };
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        let Some(pos) = classes.iter().position(|name| name == token) else {
            return Ok(false);
        };
        if classes.iter().any(|name| name == new_token) {
            classes.remove(pos);
        } else {
            classes[pos] = new_token.to_string();
        }
        classes.dedup();
        set_class_attr(element, &classes);
        Ok(true)
    }

    /// `style.setProperty`: an empty value removes the declaration.
    pub(crate) fn style_set(&mut self, node_id: NodeId, property: &str, value: &str) {
        let name = property.trim().to_ascii_lowercase();
        if name.is_empty() {
            return;
        }
        let Some(element) = self.element_mut(node_id) else {
            return;
        };

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        let value = value.trim();
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId, operation: &str) -> Result<()> {
        if !self.is_valid_node(parent) || !self.is_valid_node(child) {
            return Err(Error::dom(
                DomExceptionKind::NotFound,
                format!("{operation} node does not belong to this document"),
            ));
        }
        if !self.can_have_children(parent) {
            return Err(Error::dom(
                DomExceptionKind::HierarchyRequest,
                format!("{operation} target cannot have children"),
            ));
        }
        if child == self.root {
            return Err(Error::dom(
                DomExceptionKind::HierarchyRequest,
                format!("{operation} cannot insert the document node"),
            ));
        }

        // The parent must not be inside the child's subtree.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::dom(
                    DomExceptionKind::HierarchyRequest,
                    format!("{operation} would create a cycle"),
                ));
            }
            cursor = self.parent(node);
        }

        if parent == self.root {
            if self.is_text(child) {
                return Err(Error::dom(
                    DomExceptionKind::HierarchyRequest,
                    format!("{operation} cannot insert text into the document node"),
                ));
            }
            let has_other_element = self.nodes[self.root.0]
                .children
                .iter()
                .any(|id| *id != child && self.element(*id).is_some());
            if has_other_element {
                return Err(Error::dom(
                    DomExceptionKind::HierarchyRequest,
                    format!("{operation} would give the document a second element child"),
                ));
            }
        }
        Ok(())
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = None;
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_insertable(parent, child, "appendChild")?;
        self.unlink(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        if self.parent(reference) != Some(parent) {
            return Err(Error::dom(
                DomExceptionKind::NotFound,
                "insertBefore reference is not a child of the target",
            ));
        }
        self.ensure_insertable(parent, child, "insertBefore")?;
        if child == reference {
            return Ok(());
        }
        self.unlink(child);

        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
        else {
            return Err(Error::dom(
                DomExceptionKind::NotFound,
                "insertBefore reference is missing",
            ));
        };
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }

    pub(crate) fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<()> {
        if self.parent(old_child) != Some(parent) {
            return Err(Error::dom(
                DomExceptionKind::NotFound,
                "replaceChild target is not a child of this node",
            ));
        }
        if new_child == old_child {
            return Ok(());
        }
        self.insert_before(parent, new_child, old_child)?;
        self.remove_child(parent, old_child)
    }

    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::dom(
                DomExceptionKind::NotFound,
                "removeChild target is not a child of this node",
            ));
        }
        self.unlink(child);
        Ok(())
    }

    /// `ChildNode.remove()`: detached nodes are left as they are.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        if node != self.root {
            self.unlink(node);
        }
    }

    /// Puts `replacements` where `target` was, then detaches `target`.
    pub(crate) fn replace_with_nodes(
        &mut self,
        target: NodeId,
        replacements: &[NodeId],
    ) -> Result<()> {
        let Some(parent) = self.parent(target) else {
            return Ok(());
        };
        for node in replacements {
            self.insert_before(parent, *node, target)?;
        }
        self.remove_child(parent, target)
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &self.nodes[node_id.0].children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children
            .iter()
            .skip(pos + 1)
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        match self.nodes.get(node_id.0).map(|node| &node.node_type) {
            Some(NodeType::Element(element)) => match element.attrs.get("id") {
                Some(id) if !id.is_empty() => format!("{}#{id}", element.tag_name),
                _ => element.tag_name.clone(),
            },
            Some(NodeType::Document) => "document".to_string(),
            Some(NodeType::Text(_)) => format!("text-{}", node_id.0),
            None => format!("node-{}", node_id.0),
        }
    }
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in class_attr.unwrap_or_default().split_ascii_whitespace() {
        if !out.iter().any(|existing| existing == token) {
            out.push(token.to_string());
        }
    }
    out
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    element.attrs.insert("class".to_string(), classes.join(" "));
}

fn validate_class_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::dom(
            DomExceptionKind::Syntax,
            "class token must not be empty",
        ));
    }
    if token.chars().any(|ch| ch.is_ascii_whitespace()) {
        return Err(Error::dom(
            DomExceptionKind::InvalidCharacter,
            format!("class token {token:?} contains whitespace"),
        ));
    }
    Ok(())
}

fn validate_attr_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name
            .chars()
            .any(|ch| ch.is_ascii_whitespace() || matches!(ch, '"' | '\'' | '>' | '/' | '=' | '<'));
    if valid {
        Ok(())
    } else {
        Err(Error::dom(
            DomExceptionKind::InvalidCharacter,
            format!("{name:?} is not a valid attribute name"),
        ))
    }
}

pub(crate) fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == ':')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':'))
}
