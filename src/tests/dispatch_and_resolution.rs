use super::*;

const LIST_HTML: &str = "<ul id='list'><li id='a' class='item'>A</li><li id='b' class='item'>B</li><li id='c' class='item'>C</li></ul>";

fn identity() -> Action {
    Action::from_fn("identity", |_, target| Ok(Value::Node(target)))
}

/// Records the id of every element it visits and fails on `fail_on`.
fn flaky(log: &Rc<RefCell<Vec<String>>>, fail_on: &'static str) -> Action {
    let log = Rc::clone(log);
    Action::on_element("flaky", move |doc, node| {
        let id = doc.attribute(node, "id").unwrap_or_default();
        log.borrow_mut().push(id.clone());
        if id == fail_on {
            return Err(Error::InvalidConfig(format!("refusing {id}")));
        }
        Ok(Value::Undefined)
    })
}

#[test]
fn selector_strings_are_classified_structurally() {
    assert_eq!(Selector::from("<p>"), Selector::Create("p".into()));
    assert_eq!(Selector::from("<>"), Selector::Create(String::new()));
    assert_eq!(Selector::from(" <p>"), Selector::Css(" <p>".into()));
    assert_eq!(Selector::from("div>"), Selector::Css("div>".into()));
    assert_eq!(Selector::from("<"), Selector::Css("<".into()));
    assert_eq!(Selector::from(".item"), Selector::Css(".item".into()));
    assert_eq!(
        Selector::from(Target::Window),
        Selector::Window,
    );
}

#[test]
fn css_selector_without_matches_returns_undefined() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    assert_eq!(doc.select(".missing", &[])?, Value::Undefined);
    assert_eq!(doc.select(".missing", &[add_class(["x"])])?, Value::Undefined);
    Ok(())
}

#[test]
fn no_actions_returns_first_match() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let a = element(&doc, "#a")?;
    assert_eq!(doc.select(".item", &[])?, Value::Node(Target::Element(a)));
    assert_eq!(doc.query(".item")?.len(), 3);
    Ok(())
}

#[test]
fn creation_shorthand_makes_one_detached_element() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let created = doc.query("<DIV>")?;
    assert_eq!(created.len(), 1);
    let Target::Element(node) = created[0] else {
        panic!("expected an element, got {:?}", created[0]);
    };
    assert_eq!(doc.tag_name(node), Some("div"));
    assert!(!doc.is_connected(node));
    assert_eq!(doc.parent(node), None);

    let second = doc.select("<div>", &[])?;
    assert_ne!(second, Value::Node(Target::Element(node)));
    Ok(())
}

#[test]
fn creation_shorthand_with_invalid_name_fails() -> Result<()> {
    let mut doc = Document::new();
    for selector in ["<>", "<div class='x'>", "<1abc>"] {
        let err = doc.select(selector, &[]).expect_err(selector);
        assert_eq!(
            dom_error_kind(&err),
            Some(DomExceptionKind::InvalidCharacter),
            "{selector}"
        );
    }
    Ok(())
}

#[test]
fn node_references_resolve_to_themselves() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let b = element(&doc, "#b")?;
    let root = doc.root();

    assert_eq!(doc.query(b)?, vec![Target::Element(b)]);
    assert_eq!(doc.query(root)?, vec![Target::Document]);
    assert_eq!(doc.query(Selector::Window)?, vec![Target::Window]);
    assert_eq!(doc.query(Target::Document)?, vec![Target::Document]);
    Ok(())
}

#[test]
fn non_element_node_reference_is_an_invalid_selector() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let text = doc.create_text_node("loose");
    match doc.select(text, &[add_class(["x"])]) {
        Err(Error::InvalidSelector(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }

    match doc.query(NodeId(10_000)) {
        Err(Error::InvalidSelector(msg)) => assert!(msg.contains("node-10000")),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn selector_syntax_errors_surface_before_any_action_runs() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let log = Rc::new(RefCell::new(Vec::new()));
    match doc.select("li[", &[flaky(&log, "")]) {
        Err(Error::SelectorSyntax(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(log.borrow().is_empty());
    Ok(())
}

#[test]
fn identity_action_returns_last_element() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let c = element(&doc, "#c")?;
    assert_eq!(
        doc.select(".item", &[identity()])?,
        Value::Node(Target::Element(c))
    );
    Ok(())
}

#[test]
fn single_defined_value_wins_regardless_of_position() -> Result<()> {
    for winner in ["a", "b", "c"] {
        let mut doc = Document::from_html(LIST_HTML)?;
        let probe = Action::on_element("probe", move |doc, node| {
            if doc.attribute(node, "id").as_deref() == Some(winner) {
                Ok(Value::from(format!("found {winner}")))
            } else {
                Ok(Value::Undefined)
            }
        });
        assert_eq!(
            doc.select(".item", &[probe])?,
            Value::from(format!("found {winner}"))
        );
    }
    Ok(())
}

#[test]
fn first_defined_value_is_kept() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    assert_eq!(doc.select(".item", &[get_attr("id")])?, Value::from("a"));
    Ok(())
}

#[test]
fn null_is_replaced_by_a_later_defined_value() -> Result<()> {
    let mut doc =
        Document::from_html("<p class='x'></p><p class='x' title='second'></p><p class='x'></p>")?;
    assert_eq!(doc.select(".x", &[get_attr("title")])?, Value::from("second"));
    assert_eq!(doc.select(".x", &[get_attr("lang")])?, Value::Null);
    Ok(())
}

#[test]
fn returning_the_target_overrides_earlier_values() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let c = element(&doc, "#c")?;

    assert_eq!(
        doc.select(".item", &[get_attr("id"), identity()])?,
        Value::Node(Target::Element(c))
    );
    assert_eq!(
        doc.select(".item", &[identity(), get_attr("id")])?,
        Value::Node(Target::Element(c))
    );
    Ok(())
}

#[test]
fn setter_only_pass_returns_first_element() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let a = element(&doc, "#a")?;

    let result = doc.select(".item", &[add_class(["active"])])?;
    assert_eq!(result, Value::Node(Target::Element(a)));
    assert_eq!(doc.query(".item.active")?.len(), 3);
    Ok(())
}

#[test]
fn actions_run_outer_and_targets_inner() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let order = Rc::new(RefCell::new(Vec::new()));
    let tag = |label: &'static str| {
        let order = Rc::clone(&order);
        Action::on_element(label, move |doc, node| {
            let id = doc.attribute(node, "id").unwrap_or_default();
            order.borrow_mut().push(format!("{label}:{id}"));
            Ok(Value::Undefined)
        })
    };

    doc.select(".item", &[tag("first"), tag("second")])?;
    assert_eq!(
        *order.borrow(),
        vec![
            "first:a", "first:b", "first:c", "second:a", "second:b", "second:c"
        ]
    );
    Ok(())
}

#[test]
fn later_actions_observe_earlier_mutations() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let result = doc.select("#b", &[set_attr("data-state", "on"), get_attr("data-state")])?;
    assert_eq!(result, Value::from("on"));
    Ok(())
}

#[test]
fn threading_actions_receive_the_accumulator() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_by_action = Rc::clone(&seen);
    let count = Action::new("count", move |_, _, previous| {
        seen_by_action.borrow_mut().push(previous.clone());
        Ok(Value::Number(previous.as_number().unwrap_or(0.0) + 1.0))
    });

    assert_eq!(doc.select(".item", &[count])?, Value::Number(1.0));
    assert_eq!(
        *seen.borrow(),
        vec![Value::Undefined, Value::Number(1.0), Value::Number(1.0)]
    );
    Ok(())
}

#[test]
fn repeated_pure_queries_agree() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let first = doc.select(".item", &[get_attr("class")])?;
    let second = doc.select(".item", &[get_attr("class")])?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn failure_on_one_target_does_not_stop_the_others() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let a = element(&doc, "#a")?;
    let log = Rc::new(RefCell::new(Vec::new()));

    let result = doc.select(".item", &[flaky(&log, "b")])?;
    assert_eq!(result, Value::Node(Target::Element(a)));
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    assert!(doc.take_failures().is_empty());
    Ok(())
}

#[test]
fn element_only_action_on_window_is_isolated() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    doc.set_failure_policy(FailurePolicy::Collect);

    let result = doc.select(Selector::Window, &[get_attr("id")])?;
    assert_eq!(result, Value::Node(Target::Window));

    let failures = doc.take_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].action, "get_attr");
    assert_eq!(failures[0].target, Target::Window);
    assert_eq!(
        failures[0].error,
        Error::NotAnElement {
            action: "get_attr".into(),
            target: "window".into(),
        }
    );
    Ok(())
}

#[test]
fn abort_policy_stops_at_first_failure() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    doc.set_failure_policy(FailurePolicy::Abort);
    let log = Rc::new(RefCell::new(Vec::new()));

    match doc.select(".item", &[flaky(&log, "b"), add_class(["never"])]) {
        Err(Error::ActionFailed {
            action,
            target,
            source,
        }) => {
            assert_eq!(action, "flaky");
            assert_eq!(target, "li#b");
            assert_eq!(*source, Error::InvalidConfig("refusing b".into()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(*log.borrow(), vec!["a", "b"]);
    assert!(doc.query(".never")?.is_empty());
    Ok(())
}

#[test]
fn collect_policy_records_failures_in_order() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    doc.set_failure_policy(FailurePolicy::Collect);
    let log = Rc::new(RefCell::new(Vec::new()));

    doc.select(".item", &[flaky(&log, "a"), flaky(&log, "c")])?;
    let failures = doc.take_failures();
    let a = element(&doc, "#a")?;
    let c = element(&doc, "#c")?;
    assert_eq!(
        failures
            .iter()
            .map(|failure| failure.target)
            .collect::<Vec<_>>(),
        vec![Target::Element(a), Target::Element(c)]
    );
    assert!(doc.take_failures().is_empty());
    Ok(())
}

#[test]
fn failure_log_drops_oldest_entries() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    doc.set_failure_policy(FailurePolicy::Collect);
    doc.set_failure_log_limit(2)?;

    doc.select(".item", &[remove_class([""])])?;
    let failures = doc.take_failures();
    let b = element(&doc, "#b")?;
    let c = element(&doc, "#c")?;
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].target, Target::Element(b));
    assert_eq!(failures[1].target, Target::Element(c));

    doc.select(".item", &[remove_class([""])])?;
    doc.set_failure_log_limit(1)?;
    let failures = doc.take_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].target, Target::Element(c));
    Ok(())
}

#[test]
fn actions_are_reusable_across_calls() -> Result<()> {
    let mut doc = Document::from_html(LIST_HTML)?;
    let mark = add_class(["seen"]);
    doc.select("#a", &[mark.clone()])?;
    doc.select("#c", &[mark])?;
    assert_eq!(doc.query(".seen")?.len(), 2);
    Ok(())
}
