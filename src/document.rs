use super::*;

const DEFAULT_FAILURE_LOG_LIMIT: usize = 1_000;

/// An in-memory HTML document: the node tree, its event listeners and the
/// window state that actions read and mutate.
///
/// All mutation goes through `&mut Document`, so a [`Document::select`] call
/// always observes the effects of earlier actions in the same call.
#[derive(Debug)]
pub struct Document {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) window_scroll: (f64, f64),
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) failures: Vec<ActionFailure>,
    pub(crate) failure_log_limit: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        let mut dom = Dom::new();
        let html = dom.create_element(Some(dom.root), "html".to_string(), HashMap::new());
        dom.create_element(Some(html), "head".to_string(), HashMap::new());
        dom.create_element(Some(html), "body".to_string(), HashMap::new());
        Self::with_dom(dom)
    }

    /// Parses `html` into a new document, as written: no `html`, `head` or
    /// `body` elements are implied.
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_fragment(html)?;
        debug!(nodes = dom.nodes.len(), "parsed document");
        Ok(Self::with_dom(dom))
    }

    fn with_dom(dom: Dom) -> Self {
        Self {
            dom,
            listeners: ListenerStore::default(),
            window_scroll: (0.0, 0.0),
            failure_policy: FailurePolicy::default(),
            failures: Vec::new(),
            failure_log_limit: DEFAULT_FAILURE_LOG_LIMIT,
        }
    }

    /// The document node itself.
    pub fn root(&self) -> NodeId {
        self.dom.root
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.dom
            .children(self.dom.root)
            .iter()
            .copied()
            .find(|child| self.dom.element(*child).is_some())
    }

    pub fn head(&self) -> Option<NodeId> {
        self.dom.first_element_by_tag("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.dom.first_element_by_tag("body")
    }

    /// `document.createElement`: a detached element with a lowercased name.
    pub fn create_element(&mut self, tag_name: &str) -> Result<NodeId> {
        if !crate::dom::is_valid_element_name(tag_name) {
            return Err(Error::dom(
                DomExceptionKind::InvalidCharacter,
                format!("{tag_name:?} is not a valid element name"),
            ));
        }
        Ok(self
            .dom
            .create_element(None, tag_name.to_ascii_lowercase(), HashMap::new()))
    }

    /// `document.createTextNode`.
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.dom.create_text(None, text.to_string())
    }

    /// All elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.dom.query_selector_all(selector)?.into_iter().next())
    }

    /// `element.matches(selector)`; always `false` for non-elements.
    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        self.dom.matches_selector(node, selector)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.tag_name(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom.children(node).to_vec()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.dom.element(node).is_some()
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.dom.is_valid_node(node) && self.dom.is_connected(node)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.attr(node, name)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        if !self.dom.is_valid_node(node) {
            return String::new();
        }
        self.dom.text_content(node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        if !self.dom.is_valid_node(node) {
            return String::new();
        }
        self.dom.inner_html(node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        if !self.dom.is_valid_node(node) {
            return String::new();
        }
        self.dom.outer_html(node)
    }

    /// Serialization of the whole document.
    pub fn to_html(&self) -> String {
        self.dom.inner_html(self.dom.root)
    }

    /// Number of listeners registered on `target` for `event_type`.
    pub fn listener_count(&self, target: impl Into<Target>, event_type: &str) -> usize {
        self.listeners.count(target.into(), event_type)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.failure_policy = policy;
    }

    /// Caps the failures kept under [`FailurePolicy::Collect`]; the oldest
    /// entries are dropped first.
    pub fn set_failure_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_failure_log_limit requires at least 1 entry".into(),
            ));
        }
        self.failure_log_limit = max_entries;
        while self.failures.len() > self.failure_log_limit {
            self.failures.remove(0);
        }
        Ok(())
    }

    pub fn take_failures(&mut self) -> Vec<ActionFailure> {
        std::mem::take(&mut self.failures)
    }

    /// `window.scrollX` / `window.scrollY`.
    pub fn window_scroll(&self) -> (f64, f64) {
        self.window_scroll
    }

    pub fn set_window_scroll(&mut self, x: f64, y: f64) {
        self.window_scroll = (clamp_scroll(x), clamp_scroll(y));
    }

    /// Short human-readable label used in logs and errors.
    pub(crate) fn describe(&self, target: Target) -> String {
        match target {
            Target::Element(node) => self.dom.node_label(node),
            Target::Document => "document".to_string(),
            Target::Window => "window".to_string(),
        }
    }
}
