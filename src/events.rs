use super::*;

/// Which leg of the propagation path the event is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A synchronous event travelling through the document.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    target: Target,
    current_target: Target,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    in_passive_listener: bool,
}

impl Event {
    pub(crate) fn new(event_type: &str, target: Target) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            in_passive_listener: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn current_target(&self) -> Target {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Has no effect inside a listener registered as passive.
    pub fn prevent_default(&mut self) {
        if !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

type ListenerFn = dyn Fn(&mut Document, &mut Event) -> Result<()>;

/// A shareable event handler.
///
/// Listeners are compared by identity: clones of one `EventListener` are
/// equal, two listeners built from identical closures are not. Keep a clone
/// around to remove the listener later.
#[derive(Clone)]
pub struct EventListener(Rc<ListenerFn>);

impl EventListener {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Document, &mut Event) -> Result<()> + 'static,
    {
        Self(Rc::new(handler))
    }

    fn call(&self, document: &mut Document, event: &mut Event) -> Result<()> {
        (self.0)(document, event)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Eq for EventListener {}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0))
    }
}

/// `addEventListener` options. `From<bool>` sets `capture`, like the boolean
/// form of the third argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

impl From<bool> for ListenerOptions {
    fn from(capture: bool) -> Self {
        Self {
            capture,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) handler: EventListener,
    pub(crate) capture: bool,
    pub(crate) once: bool,
    pub(crate) passive: bool,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<Target, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    /// Registering the same handler twice for one (event, capture) pair is a
    /// no-op.
    pub(crate) fn add(&mut self, target: Target, event: &str, listener: Listener) {
        let listeners = self
            .map
            .entry(target)
            .or_default()
            .entry(event.to_string())
            .or_default();
        let duplicate = listeners
            .iter()
            .any(|existing| existing.capture == listener.capture && existing.handler == listener.handler);
        if !duplicate {
            listeners.push(listener);
        }
    }

    pub(crate) fn remove(
        &mut self,
        target: Target,
        event: &str,
        capture: bool,
        handler: &EventListener,
    ) -> bool {
        let Some(events) = self.map.get_mut(&target) else {
            return false;
        };
        let Some(listeners) = events.get_mut(event) else {
            return false;
        };

        let Some(pos) = listeners
            .iter()
            .position(|listener| listener.capture == capture && listener.handler == *handler)
        else {
            return false;
        };
        listeners.remove(pos);
        if listeners.is_empty() {
            events.remove(event);
        }
        if events.is_empty() {
            self.map.remove(&target);
        }
        true
    }

    pub(crate) fn contains(
        &self,
        target: Target,
        event: &str,
        capture: bool,
        handler: &EventListener,
    ) -> bool {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .is_some_and(|listeners| {
                listeners
                    .iter()
                    .any(|listener| listener.capture == capture && listener.handler == *handler)
            })
    }

    pub(crate) fn get(&self, target: Target, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, target: Target, event: &str) -> usize {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

impl Document {
    /// Dispatches a bubbling event at `target` and returns it after
    /// propagation finishes.
    ///
    /// The path runs from the target through its ancestors; connected nodes
    /// continue to the document and then the window. Listener errors are
    /// logged and do not stop propagation.
    pub fn dispatch_event(&mut self, target: impl Into<Target>, event_type: &str) -> Result<Event> {
        let target = target.into();
        if let Target::Element(node) = target {
            if self.dom.element(node).is_none() {
                return Err(Error::InvalidSelector(format!(
                    "{} is not an element of this document",
                    self.dom.node_label(node)
                )));
            }
        }

        let mut event = Event::new(event_type, target);
        let path = self.propagation_path(target);
        debug!(
            event = event_type,
            target = %self.describe(target),
            path_len = path.len(),
            "dispatching event"
        );

        let (ancestors, _) = path.split_at(path.len().saturating_sub(1));

        event.phase = EventPhase::Capturing;
        for current in ancestors.iter().rev() {
            self.invoke_listeners(*current, &mut event, true);
            if event.propagation_stopped {
                return Ok(self.finish_event(event, "propagation_stopped"));
            }
        }

        event.phase = EventPhase::AtTarget;
        self.invoke_listeners(target, &mut event, true);
        if !event.propagation_stopped {
            self.invoke_listeners(target, &mut event, false);
        }
        if event.propagation_stopped {
            return Ok(self.finish_event(event, "propagation_stopped"));
        }

        event.phase = EventPhase::Bubbling;
        for current in ancestors {
            self.invoke_listeners(*current, &mut event, false);
            if event.propagation_stopped {
                return Ok(self.finish_event(event, "propagation_stopped"));
            }
        }

        Ok(self.finish_event(event, "completed"))
    }

    /// Nearest-first path ending with the target itself.
    fn propagation_path(&self, target: Target) -> Vec<Target> {
        let mut path = Vec::new();
        match target {
            Target::Element(node) => {
                let mut cursor = self.dom.parent(node);
                while let Some(ancestor) = cursor {
                    if ancestor == self.dom.root {
                        break;
                    }
                    path.push(Target::Element(ancestor));
                    cursor = self.dom.parent(ancestor);
                }
                if self.dom.is_connected(node) {
                    path.push(Target::Document);
                    path.push(Target::Window);
                }
            }
            Target::Document => path.push(Target::Window),
            Target::Window => {}
        }
        path.push(target);
        path
    }

    fn invoke_listeners(&mut self, current: Target, event: &mut Event, capture: bool) {
        event.current_target = current;
        let listeners = self.listeners.get(current, &event.event_type, capture);
        for listener in listeners {
            // Listeners removed by an earlier listener in this pass do not run.
            if !self
                .listeners
                .contains(current, &event.event_type, capture, &listener.handler)
            {
                continue;
            }
            if listener.once {
                self.listeners
                    .remove(current, &event.event_type, capture, &listener.handler);
            }

            trace!(
                event = %event.event_type,
                target = %self.describe(event.target),
                current = %self.describe(current),
                phase = ?event.phase,
                "invoking listener"
            );
            event.in_passive_listener = listener.passive;
            let outcome = listener.handler.call(self, event);
            event.in_passive_listener = false;
            if let Err(err) = outcome {
                warn!(
                    event = %event.event_type,
                    current = %self.describe(current),
                    error = %err,
                    "event listener failed"
                );
            }
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }

    fn finish_event(&self, mut event: Event, outcome: &str) -> Event {
        trace!(
            event = %event.event_type,
            target = %self.describe(event.target),
            outcome,
            default_prevented = event.default_prevented,
            "event done"
        );
        event.phase = EventPhase::None;
        event.current_target = event.target;
        event
    }
}
