use std::cell::RefCell;
use std::rc::Rc;

use chop_dom::actions::{
    add_class, append, append_to, get_attr, get_inner_html, get_offset, get_outer_height,
    get_scroll_top, get_value, has_class, on, remove, remove_class, set_attr, set_css,
    set_height, set_inner_text, set_scroll_top, set_value, toggle_class,
};
use chop_dom::{
    Action, Document, Error, EventListener, FailurePolicy, ListenerOptions, Selector, Target,
    Value,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();
}

fn node(doc: &Document, selector: &str) -> chop_dom::Result<chop_dom::NodeId> {
    doc.query_selector(selector)?
        .ok_or_else(|| Error::InvalidSelector(format!("no element matches {selector}")))
}

#[test]
fn todo_list_is_built_from_created_elements() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html("<main><ul id='todos'></ul><p id='count'></p></main>")?;
    let list = node(&doc, "#todos")?;

    for (index, title) in ["write tests", "ship", "celebrate"].into_iter().enumerate() {
        doc.select(
            "<li>",
            &[
                set_attr("data-index", index.to_string()),
                add_class(["todo"]),
                append([title]),
                append_to(list),
            ],
        )?;
    }
    doc.select(".todo:last-child", &[add_class(["done"])])?;

    let remaining = doc.query(".todo:not(.done)")?.len();
    doc.select("#count", &[set_inner_text(format!("{remaining} left"))])?;

    assert_eq!(
        doc.select("#todos", &[get_inner_html()])?,
        Value::from(concat!(
            "<li class=\"todo\" data-index=\"0\">write tests</li>",
            "<li class=\"todo\" data-index=\"1\">ship</li>",
            "<li class=\"todo done\" data-index=\"2\">celebrate</li>",
        ))
    );
    assert_eq!(
        doc.select("#count", &[get_inner_html()])?,
        Value::from("2 left")
    );
    Ok(())
}

#[test]
fn tabs_switch_on_click() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html(concat!(
        "<div id='tabs'>",
        "<button class='tab active' data-panel='one'>One</button>",
        "<button class='tab' data-panel='two'>Two</button>",
        "<section id='one' class='panel'>1</section>",
        "<section id='two' class='panel' hidden>2</section>",
        "</div>",
    ))?;

    let activate = EventListener::new(|doc, event| {
        let Target::Element(tab) = event.current_target() else {
            return Ok(());
        };
        let panel = doc.attribute(tab, "data-panel").unwrap_or_default();
        doc.select(".tab", &[remove_class(["active"])])?;
        doc.select(tab, &[add_class(["active"])])?;
        doc.select(".panel", &[set_attr("hidden", "")])?;
        doc.select(format!("#{panel}"), &[chop_dom::actions::remove_attr("hidden")])?;
        Ok(())
    });
    doc.select(".tab", &[on("click", activate, false)])?;

    let second = node(&doc, "[data-panel='two']")?;
    let event = doc.dispatch_event(second, "click")?;
    assert!(!event.default_prevented());

    assert_eq!(doc.select(".tab.active", &[get_attr("data-panel")])?, Value::from("two"));
    assert_eq!(doc.query(".panel[hidden]")?.len(), 1);
    assert_eq!(doc.select("#two", &[has_class("panel")])?, Value::Bool(true));
    assert_eq!(doc.select("#one", &[get_attr("hidden")])?, Value::from(""));
    assert_eq!(doc.select("#two", &[get_attr("hidden")])?, Value::Null);
    Ok(())
}

#[test]
fn form_submission_is_intercepted() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html(concat!(
        "<form id='signup'>",
        "<input id='email' name='email'>",
        "<select id='plan'><option value='free'>Free</option><option value='pro'>Pro</option></select>",
        "<p id='status'></p>",
        "</form>",
    ))?;
    let submitted = Rc::new(RefCell::new(Vec::new()));

    let submitted_by_listener = Rc::clone(&submitted);
    let on_submit = EventListener::new(move |doc, event| {
        event.prevent_default();
        let email = doc.select("#email", &[get_value()])?;
        let plan = doc.select("#plan", &[get_value()])?;
        submitted_by_listener
            .borrow_mut()
            .push(format!("{email}/{plan}"));
        doc.select("#status", &[set_inner_text("thanks")])?;
        Ok(())
    });
    doc.select("#signup", &[on("submit", on_submit, false)])?;

    doc.select("#email", &[set_value("ada@example.com")])?;
    doc.select("#plan", &[set_value("pro")])?;
    let form = node(&doc, "#signup")?;
    let event = doc.dispatch_event(form, "submit")?;

    assert!(event.default_prevented());
    assert_eq!(*submitted.borrow(), vec!["ada@example.com/pro"]);
    assert_eq!(doc.select("#status", &[get_inner_html()])?, Value::from("thanks"));
    Ok(())
}

#[test]
fn scroll_spy_reads_positions() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html(concat!(
        "<div id='viewport' style='height: 200px; overflow: auto'>",
        "<section id='intro' style='top: 0px; height: 300px'></section>",
        "<section id='details' style='top: 300px; height: 300px'></section>",
        "</div>",
    ))?;

    doc.select("#viewport", &[set_scroll_top(250.0)])?;
    doc.select(Selector::Window, &[set_scroll_top(10.0)])?;

    assert_eq!(doc.select("#viewport", &[get_scroll_top()])?, Value::Number(250.0));
    assert_eq!(
        doc.select("#details", &[get_offset()])?,
        Value::Offset {
            top: 60.0,
            left: 0.0
        }
    );
    assert_eq!(
        doc.select("section", &[get_outer_height(false)])?,
        Value::Number(300.0)
    );

    doc.select("#details", &[set_height(120), set_css("padding", "5px")])?;
    assert_eq!(
        doc.select("#details", &[get_outer_height(true)])?,
        Value::Number(130.0)
    );
    Ok(())
}

#[test]
fn mixed_collections_skip_what_does_not_apply() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html("<div id='app'><span class='badge'>1</span></div>")?;
    doc.set_failure_policy(FailurePolicy::Collect);
    let count = Rc::new(RefCell::new(0));

    let count_by_listener = Rc::clone(&count);
    let listener = EventListener::new(move |_, _| {
        *count_by_listener.borrow_mut() += 1;
        Ok(())
    });
    let capture = ListenerOptions {
        capture: true,
        ..ListenerOptions::default()
    };

    // Listener registration accepts every target kind; class changes only
    // apply to elements.
    for selector in [Selector::Window, Selector::from(".badge")] {
        doc.select(selector, &[on("ping", listener.clone(), capture), toggle_class("seen", None)])?;
    }
    let failures = doc.take_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].target, Target::Window);

    let badge = node(&doc, ".badge")?;
    doc.dispatch_event(badge, "ping")?;
    assert_eq!(*count.borrow(), 2);
    assert_eq!(doc.select(".badge", &[has_class("seen")])?, Value::Bool(true));
    Ok(())
}

#[test]
fn abort_policy_reports_the_failing_action() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html("<div id='a'></div>")?;
    doc.set_failure_policy(FailurePolicy::Abort);

    let err = doc
        .select("#a", &[add_class(["has space"])])
        .expect_err("whitespace token");
    assert_eq!(
        err.to_string(),
        "action add_class failed on div#a: InvalidCharacterError: class token \"has space\" contains whitespace"
    );
    assert!(std::error::Error::source(&err).is_some());
    Ok(())
}

#[test]
fn custom_actions_compose_with_builtins() -> chop_dom::Result<()> {
    init_tracing();
    let mut doc = Document::from_html(
        "<ol id='scores'><li data-score='3'></li><li data-score='9'></li><li data-score='4'></li></ol>",
    )?;

    let max_score = Action::new("max_score", |doc, target, previous| {
        let Target::Element(node) = target else {
            return Ok(previous.clone());
        };
        let score = doc
            .attribute(node, "data-score")
            .and_then(|raw| raw.parse::<f64>().ok())
            .unwrap_or(0.0);
        Ok(Value::Number(previous.as_number().map_or(score, |best| best.max(score))))
    });

    // The first defined value sticks, so a threading action sees every
    // earlier result but only its first answer is kept.
    let result = doc.select("li", &[max_score.clone()])?;
    assert_eq!(result, Value::Number(3.0));

    doc.select("li[data-score='3']", &[remove()])?;
    assert_eq!(doc.select("li", &[max_score])?, Value::Number(9.0));
    Ok(())
}
