//! Listener registration. These actions accept every target kind, including
//! the document and the window.

use super::*;
use crate::events::Listener;

/// `addEventListener(event, listener, options)`.
pub fn on(
    event: impl Into<String>,
    listener: EventListener,
    options: impl Into<ListenerOptions>,
) -> Action {
    let event = event.into();
    let options = options.into();
    Action::from_fn("on", move |document, target| {
        document.listeners.add(
            target,
            &event,
            Listener {
                handler: listener.clone(),
                capture: options.capture,
                once: options.once,
                passive: options.passive,
            },
        );
        Ok(Value::Undefined)
    })
}

/// `removeEventListener`: matches on listener identity and the capture flag.
pub fn off(
    event: impl Into<String>,
    listener: EventListener,
    options: impl Into<ListenerOptions>,
) -> Action {
    let event = event.into();
    let capture = options.into().capture;
    Action::from_fn("off", move |document, target| {
        document.listeners.remove(target, &event, capture, &listener);
        Ok(Value::Undefined)
    })
}

/// Like [`on`], but the listener is removed before its first invocation.
pub fn once(
    event: impl Into<String>,
    listener: EventListener,
    options: impl Into<ListenerOptions>,
) -> Action {
    let options = ListenerOptions {
        once: true,
        ..options.into()
    };
    on(event, listener, options)
}
