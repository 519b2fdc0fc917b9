use super::*;

/// What a [`Document::select`] call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A CSS selector matched against the document at call time.
    Css(String),
    /// Creation shorthand: `"<li>"` creates one detached `li` element.
    Create(String),
    /// An element or the document node.
    Node(NodeId),
    Window,
}

impl From<&str> for Selector {
    /// Strings delimited by `<` and `>` are creation shorthands; everything
    /// else is a CSS selector. No trimming is applied.
    fn from(value: &str) -> Self {
        if value.len() >= 2 && value.starts_with('<') && value.ends_with('>') {
            Self::Create(value[1..value.len() - 1].to_string())
        } else {
            Self::Css(value.to_string())
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&String> for Selector {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<NodeId> for Selector {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<Target> for Selector {
    fn from(target: Target) -> Self {
        match target {
            Target::Element(node) => Self::Node(node),
            Target::Document => Self::Node(NodeId(0)),
            Target::Window => Self::Window,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => f.write_str(selector),
            Self::Create(tag) => write!(f, "<{tag}>"),
            Self::Node(node) => write!(f, "node-{}", node.0),
            Self::Window => f.write_str("window"),
        }
    }
}

/// One member of a resolved collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Element(NodeId),
    Document,
    Window,
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Self::Element(node)
    }
}

/// How [`Document::select`] reacts when an action fails on a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return [`Error::ActionFailed`].
    Abort,
    /// Log the failure and keep going.
    #[default]
    Continue,
    /// Log the failure, record it for [`Document::take_failures`] and keep
    /// going.
    Collect,
}

/// A recorded (action, target) failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFailure {
    pub action: String,
    pub target: Target,
    pub error: Error,
}

impl Document {
    /// Turns a selector into its ordered collection of targets.
    pub fn resolve(&mut self, selector: &Selector) -> Result<Vec<Target>> {
        match selector {
            Selector::Create(tag) => {
                let node = self.create_element(tag)?;
                Ok(vec![Target::Element(node)])
            }
            Selector::Css(selector) => Ok(self
                .dom
                .query_selector_all(selector)?
                .into_iter()
                .map(Target::Element)
                .collect()),
            Selector::Node(node) if *node == self.dom.root => Ok(vec![Target::Document]),
            Selector::Node(node) if self.dom.element(*node).is_some() => {
                Ok(vec![Target::Element(*node)])
            }
            Selector::Node(node) => Err(Error::InvalidSelector(format!(
                "{} is neither an element nor the document",
                self.dom.node_label(*node)
            ))),
            Selector::Window => Ok(vec![Target::Window]),
        }
    }

    /// The whole collection for `selector`, without running any actions.
    pub fn query(&mut self, selector: impl Into<Selector>) -> Result<Vec<Target>> {
        let selector = selector.into();
        self.resolve(&selector)
    }

    /// Resolves `selector` and runs every action on every target.
    ///
    /// Actions run in declaration order, each over the whole collection in
    /// collection order. See the crate documentation for how the per-target
    /// results merge into the returned value. With no actions the first
    /// target is returned.
    ///
    /// Selector errors are returned before any action runs. Action failures
    /// are handled by the configured [`FailurePolicy`].
    pub fn select(&mut self, selector: impl Into<Selector>, actions: &[Action]) -> Result<Value> {
        let selector = selector.into();
        let targets = self.resolve(&selector)?;
        debug!(
            selector = %selector,
            targets = targets.len(),
            actions = actions.len(),
            "resolved selector"
        );

        if actions.is_empty() {
            return Ok(targets.first().map_or(Value::Undefined, |first| Value::Node(*first)));
        }
        self.apply(&targets, actions)
    }

    fn apply(&mut self, targets: &[Target], actions: &[Action]) -> Result<Value> {
        let mut result = Value::Undefined;
        for action in actions {
            for &target in targets {
                match action.call(self, target, &result) {
                    Ok(value) => {
                        trace!(
                            action = action.name(),
                            target = %self.describe(target),
                            value = %value,
                            "action returned"
                        );
                        result = merge_result(result, value, target);
                    }
                    Err(error) => self.handle_failure(action, target, error)?,
                }
            }
        }

        if result.is_undefined() {
            if let Some(first) = targets.first() {
                result = Value::Node(*first);
            }
        }
        Ok(result)
    }

    fn handle_failure(&mut self, action: &Action, target: Target, error: Error) -> Result<()> {
        let label = self.describe(target);
        error!(
            action = action.name(),
            target = %label,
            error = %error,
            policy = ?self.failure_policy,
            "action failed"
        );

        match self.failure_policy {
            FailurePolicy::Continue => Ok(()),
            FailurePolicy::Collect => {
                if self.failures.len() >= self.failure_log_limit {
                    self.failures.remove(0);
                }
                self.failures.push(ActionFailure {
                    action: action.name().to_string(),
                    target,
                    error,
                });
                Ok(())
            }
            FailurePolicy::Abort => Err(Error::ActionFailed {
                action: action.name().to_string(),
                target: label,
                source: Box::new(error),
            }),
        }
    }
}

/// Returning the visited target always wins; otherwise the first defined
/// value sticks.
fn merge_result(accumulated: Value, value: Value, target: Target) -> Value {
    if value == Value::Node(target) {
        return value;
    }
    if accumulated.is_nullish() && !value.is_undefined() {
        return value;
    }
    accumulated
}
