use super::*;

const BUTTON_HTML: &str = "<div id='outer'><button id='btn'>Go</button></div>";

type Log = Rc<RefCell<Vec<String>>>;

fn recorder(log: &Log, label: &'static str) -> EventListener {
    let log = Rc::clone(log);
    EventListener::new(move |_, event| {
        log.borrow_mut().push(format!("{label}:{:?}", event.phase()));
        Ok(())
    })
}

fn counter(count: &Rc<Cell<usize>>) -> EventListener {
    let count = Rc::clone(count);
    EventListener::new(move |_, _| {
        count.set(count.get() + 1);
        Ok(())
    })
}

#[test]
fn capture_target_and_bubble_run_in_order() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();

    doc.select(Selector::Window, &[on("click", recorder(&log, "window-capture"), true)])?;
    doc.select(Selector::Window, &[on("click", recorder(&log, "window-bubble"), false)])?;
    doc.select(Target::Document, &[on("click", recorder(&log, "document-bubble"), false)])?;
    doc.select("#outer", &[on("click", recorder(&log, "outer-bubble"), false)])?;
    doc.select("#outer", &[on("click", recorder(&log, "outer-capture"), true)])?;
    doc.select(btn, &[on("click", recorder(&log, "btn"), false)])?;

    let event = doc.dispatch_event(btn, "click")?;
    assert_eq!(
        *log.borrow(),
        vec![
            "window-capture:Capturing",
            "outer-capture:Capturing",
            "btn:AtTarget",
            "outer-bubble:Bubbling",
            "document-bubble:Bubbling",
            "window-bubble:Bubbling",
        ]
    );
    assert_eq!(event.event_type(), "click");
    assert_eq!(event.target(), Target::Element(btn));
    assert_eq!(event.current_target(), Target::Element(btn));
    assert_eq!(event.phase(), EventPhase::None);
    Ok(())
}

#[test]
fn at_target_capture_listeners_run_first() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();

    doc.select(btn, &[on("click", recorder(&log, "bubble"), false)])?;
    doc.select(btn, &[on("click", recorder(&log, "capture"), true)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(*log.borrow(), vec!["capture:AtTarget", "bubble:AtTarget"]);
    Ok(())
}

#[test]
fn listeners_see_the_current_target() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let outer = element(&doc, "#outer")?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_by_listener = Rc::clone(&seen);
    let listener = EventListener::new(move |_, event| {
        seen_by_listener
            .borrow_mut()
            .push((event.target(), event.current_target()));
        Ok(())
    });

    doc.select("#outer, #btn", &[on("click", listener, false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(
        *seen.borrow(),
        vec![
            (Target::Element(btn), Target::Element(btn)),
            (Target::Element(btn), Target::Element(outer)),
        ]
    );
    Ok(())
}

#[test]
fn stop_propagation_skips_later_nodes() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();
    let stopper = EventListener::new(|_, event| {
        event.stop_propagation();
        Ok(())
    });

    doc.select(btn, &[on("click", stopper, false), on("click", recorder(&log, "same-node"), false)])?;
    doc.select("#outer", &[on("click", recorder(&log, "outer"), false)])?;

    let event = doc.dispatch_event(btn, "click")?;
    assert!(event.propagation_stopped());
    assert_eq!(*log.borrow(), vec!["same-node:AtTarget"]);
    Ok(())
}

#[test]
fn stop_immediate_propagation_skips_remaining_listeners() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();
    let stopper = EventListener::new(|_, event| {
        event.stop_immediate_propagation();
        Ok(())
    });

    doc.select(btn, &[on("click", stopper, false), on("click", recorder(&log, "second"), false)])?;
    doc.select("#outer", &[on("click", recorder(&log, "outer"), false)])?;
    doc.dispatch_event(btn, "click")?;
    assert!(log.borrow().is_empty());
    Ok(())
}

#[test]
fn capture_phase_stop_prevents_the_target() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();
    let stopper = EventListener::new(|_, event| {
        event.stop_propagation();
        Ok(())
    });

    doc.select("#outer", &[on("click", stopper, true)])?;
    doc.select(btn, &[on("click", recorder(&log, "btn"), false)])?;
    doc.dispatch_event(btn, "click")?;
    assert!(log.borrow().is_empty());
    Ok(())
}

#[test]
fn once_listener_fires_a_single_time() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));

    doc.select(btn, &[once("click", counter(&count), false)])?;
    assert_eq!(doc.listener_count(btn, "click"), 1);
    doc.dispatch_event(btn, "click")?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 1);
    assert_eq!(doc.listener_count(btn, "click"), 0);
    Ok(())
}

#[test]
fn off_matches_identity_and_capture_flag() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));
    let listener = counter(&count);

    doc.select(
        btn,
        &[on("click", listener.clone(), false), on("click", listener.clone(), true)],
    )?;
    assert_eq!(doc.listener_count(btn, "click"), 2);

    // A different closure with the same body is a different listener.
    doc.select(btn, &[off("click", counter(&count), false)])?;
    assert_eq!(doc.listener_count(btn, "click"), 2);

    doc.select(btn, &[off("click", listener.clone(), false)])?;
    assert_eq!(doc.listener_count(btn, "click"), 1);
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 1);

    doc.select(btn, &[off("click", listener, ListenerOptions { capture: true, ..Default::default() })])?;
    assert_eq!(doc.listener_count(btn, "click"), 0);
    Ok(())
}

#[test]
fn duplicate_registration_is_ignored() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));
    let listener = counter(&count);

    doc.select(btn, &[on("click", listener.clone(), false)])?;
    doc.select(btn, &[on("click", listener, false)])?;
    assert_eq!(doc.listener_count(btn, "click"), 1);
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn listeners_are_scoped_by_event_type() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));

    doc.select(btn, &[on("focus", counter(&count), false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 0);
    doc.dispatch_event(btn, "focus")?;
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn passive_listeners_cannot_prevent_default() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let prevent = EventListener::new(|_, event| {
        event.prevent_default();
        Ok(())
    });
    let passive = ListenerOptions {
        passive: true,
        ..ListenerOptions::default()
    };

    doc.select(btn, &[on("wheel", prevent.clone(), passive)])?;
    assert!(!doc.dispatch_event(btn, "wheel")?.default_prevented());

    doc.select("#outer", &[on("wheel", prevent, false)])?;
    assert!(doc.dispatch_event(btn, "wheel")?.default_prevented());
    Ok(())
}

#[test]
fn failing_listener_does_not_stop_dispatch() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let log = Log::default();
    let failing = EventListener::new(|_, _| Err(Error::InvalidConfig("listener broke".into())));

    doc.select(btn, &[on("click", failing, false), on("click", recorder(&log, "after"), false)])?;
    doc.select("#outer", &[on("click", recorder(&log, "outer"), false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(*log.borrow(), vec!["after:AtTarget", "outer:Bubbling"]);
    Ok(())
}

#[test]
fn listeners_can_mutate_the_document() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let mark = EventListener::new(|doc, event| {
        doc.select(event.current_target(), &[add_class(["clicked"])])?;
        Ok(())
    });

    doc.select("#outer, #btn", &[on("click", mark, false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(doc.query(".clicked")?.len(), 2);
    Ok(())
}

#[test]
fn listener_removed_mid_dispatch_does_not_run() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));
    let later = counter(&count);
    let later_for_remover = later.clone();
    let remover = EventListener::new(move |doc, event| {
        doc.select(
            event.current_target(),
            &[off("click", later_for_remover.clone(), false)],
        )?;
        Ok(())
    });

    doc.select(btn, &[on("click", remover, false), on("click", later, false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 0);
    assert_eq!(doc.listener_count(btn, "click"), 1);
    Ok(())
}

#[test]
fn listener_added_mid_dispatch_waits_for_the_next_event() -> Result<()> {
    let mut doc = Document::from_html(BUTTON_HTML)?;
    let btn = element(&doc, "#btn")?;
    let count = Rc::new(Cell::new(0));
    let late = counter(&count);
    let adder = EventListener::new(move |doc, event| {
        doc.select(event.current_target(), &[on("click", late.clone(), false)])?;
        Ok(())
    });

    doc.select(btn, &[on("click", adder, false)])?;
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 0);
    doc.dispatch_event(btn, "click")?;
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn detached_targets_do_not_reach_the_document() -> Result<()> {
    let mut doc = Document::new();
    let log = Log::default();
    let parent = doc.create_element("div")?;
    let child = doc.create_element("span")?;
    doc.select(parent, &[append([child])])?;

    doc.select(Target::Document, &[on("ping", recorder(&log, "document"), false)])?;
    doc.select(Selector::Window, &[on("ping", recorder(&log, "window"), true)])?;
    doc.select(parent, &[on("ping", recorder(&log, "parent"), false)])?;
    doc.select(child, &[on("ping", recorder(&log, "child"), false)])?;

    doc.dispatch_event(child, "ping")?;
    assert_eq!(*log.borrow(), vec!["child:AtTarget", "parent:Bubbling"]);
    Ok(())
}

#[test]
fn window_and_document_can_be_targets() -> Result<()> {
    let mut doc = Document::new();
    let log = Log::default();
    doc.select(Selector::Window, &[on("load", recorder(&log, "window"), false)])?;
    doc.select(Target::Document, &[on("load", recorder(&log, "document"), false)])?;

    doc.dispatch_event(Target::Document, "load")?;
    doc.dispatch_event(Target::Window, "load")?;
    assert_eq!(
        *log.borrow(),
        vec!["document:AtTarget", "window:Bubbling", "window:AtTarget"]
    );
    Ok(())
}

#[test]
fn dispatching_at_a_non_element_fails() -> Result<()> {
    let mut doc = Document::new();
    let text = doc.create_text_node("hi");
    match doc.dispatch_event(text, "click") {
        Err(Error::InvalidSelector(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}
