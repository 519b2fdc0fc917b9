use std::borrow::Cow;

use super::*;

/// Signature shared by every action: the document, the target being visited
/// and the result accumulated so far.
pub type ActionFn = dyn Fn(&mut Document, Target, &Value) -> Result<Value>;

/// A named, reusable unit of behavior applied to one target at a time.
///
/// Actions are cheap to clone and can be stored and reused across
/// [`Document::select`] calls. Most callers build them with the factories in
/// [`crate::actions`].
#[derive(Clone)]
pub struct Action {
    name: Cow<'static, str>,
    run: Rc<ActionFn>,
}

impl Action {
    /// An action that sees the accumulated result of earlier invocations.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, run: F) -> Self
    where
        F: Fn(&mut Document, Target, &Value) -> Result<Value> + 'static,
    {
        Self {
            name: name.into(),
            run: Rc::new(run),
        }
    }

    /// An action that only needs the target it runs on.
    pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, run: F) -> Self
    where
        F: Fn(&mut Document, Target) -> Result<Value> + 'static,
    {
        Self::new(name, move |document, target, _| run(document, target))
    }

    /// An action defined only for element targets; the document and window
    /// fail with [`Error::NotAnElement`].
    pub(crate) fn on_element<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(&mut Document, NodeId) -> Result<Value> + 'static,
    {
        Self::from_fn(name, move |document, target| match target {
            Target::Element(node) => run(document, node),
            other => Err(Error::NotAnElement {
                action: name.to_string(),
                target: document.describe(other),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, document: &mut Document, target: Target, previous: &Value) -> Result<Value> {
        (self.run)(document, target, previous)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}
