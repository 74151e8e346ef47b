use super::*;

fn post(action: &str, body: &str) -> FormSubmission {
    FormSubmission {
        method: FormMethod::Post,
        action: action.to_string(),
        body: Some(body.to_string()),
        synthetic: true,
    }
}

#[test]
fn table_button_reveals_indicator_and_posts_metric() -> Result<()> {
    let mut page = completed_page();
    let mut controller = controller();
    page.load(&mut controller)?;
    assert!(!page.is_displayed("loading")?);

    let event = page.click("btn_table")?;

    assert!(!event.default_prevented());
    assert!(page.is_displayed("loading")?);
    assert_eq!(
        page.take_form_submissions(),
        vec![post("/compute_rules", "metric=support")]
    );
    assert_eq!(page.transient_form_count(), 1);
    assert!(page.take_location_navigations().is_empty());
    assert!(page.state().is_terminal());
    Ok(())
}

#[test]
fn heatmap_and_graph_buttons_post_to_their_own_destinations() -> Result<()> {
    for (button, destination) in [("btn_heatmap", "/heatmap"), ("btn_graph", "/network_graph")] {
        let mut page = completed_page();
        let mut controller = controller();
        page.load(&mut controller)?;

        page.click(button)?;

        assert_eq!(
            page.take_form_submissions(),
            vec![post(destination, "metric=support")]
        );
    }
    Ok(())
}

#[test]
fn metric_is_read_at_click_time() -> Result<()> {
    let mut page = completed_page();
    let mut controller = controller();
    page.load(&mut controller)?;

    page.type_text("metric", "lift")?;
    page.click("btn_table")?;

    assert_eq!(
        page.take_form_submissions(),
        vec![post("/compute_rules", "metric=lift")]
    );
    Ok(())
}

#[test]
fn metric_values_are_form_encoded() -> Result<()> {
    let mut page = completed_page();
    let mut controller = controller();
    page.load(&mut controller)?;

    page.type_text("metric", "conviction & lift")?;
    page.click("btn_graph")?;

    assert_eq!(
        page.take_form_submissions(),
        vec![post("/network_graph", "metric=conviction+%26+lift")]
    );
    Ok(())
}

#[test]
fn demo_selection_suppresses_native_submit_and_posts_both_fields() -> Result<()> {
    let mut page = demo_selection_page("confidence", "graph");
    let mut controller = controller();
    page.load(&mut controller)?;

    let event = page.click("selection")?;

    assert!(event.default_prevented());
    assert!(page.is_displayed("loading")?);
    assert_eq!(
        page.take_form_submissions(),
        vec![post("/demo", "metric=confidence&viz_type=graph")]
    );
    assert!(matches!(
        page.state(),
        PageState::FormSubmitted(form) if form.params.get("viz_type") == Some("graph")
    ));
    Ok(())
}

#[test]
fn selection_control_submits_natively_when_nothing_is_bound() -> Result<()> {
    let mut page = demo_selection_page("confidence", "graph");
    let mut controller = PageController::new(
        ControllerConfig::new(destinations()).with_routes(RouteTable::empty()),
    );
    assert_eq!(page.load(&mut controller)?, PageContext::Other);

    let event = page.click("selection")?;

    assert!(!event.default_prevented());
    assert_eq!(
        page.take_form_submissions(),
        vec![FormSubmission {
            method: FormMethod::Get,
            action: "/demo_selection?metric=confidence&visualize=graph".into(),
            body: None,
            synthetic: false,
        }]
    );
    Ok(())
}

#[test]
fn demo_button_navigates_without_a_body() -> Result<()> {
    let mut page = page("/").with_button("btn_demo");
    let mut controller = controller();
    page.load(&mut controller)?;

    page.click("btn_demo")?;

    assert_eq!(
        page.take_location_navigations(),
        vec![LocationNavigation {
            from: format!("{PAGE_ORIGIN}/"),
            to: "/demo_selection".into(),
        }]
    );
    assert!(page.take_form_submissions().is_empty());
    assert_eq!(page.state(), &PageState::Navigated("/demo_selection".into()));
    Ok(())
}

#[test]
fn clicks_after_unload_are_ignored() -> Result<()> {
    let mut page = completed_page();
    let mut controller = controller();
    page.load(&mut controller)?;

    page.click("btn_table")?;
    page.click("btn_heatmap")?;

    assert_eq!(page.take_form_submissions().len(), 1);
    assert_eq!(page.transient_form_count(), 1);
    assert!(page.is_displayed("loading")?);
    Ok(())
}

#[test]
fn missing_indicator_aborts_the_click_before_submitting() -> Result<()> {
    let mut page = page("/completed")
        .with_input("metric", "support")
        .with_button("btn_table")
        .with_button("btn_heatmap")
        .with_button("btn_graph");
    let mut controller = controller();
    page.load(&mut controller)?;

    let err = page.click("btn_table").unwrap_err();

    assert_eq!(
        err,
        Error::ElementNotFound {
            kind: Lookup::Class,
            name: "loading".into(),
        }
    );
    assert!(page.take_form_submissions().is_empty());
    assert_eq!(page.transient_form_count(), 0);
    assert_eq!(page.state(), &PageState::Bound(PageContext::Completed));
    Ok(())
}

#[test]
fn missing_visualize_input_leaves_indicator_hidden() -> Result<()> {
    let mut page = page("/demo_selection")
        .with_indicator("loading")
        .with_input("metric", "support")
        .with_button("selection");
    let mut controller = controller();
    page.load(&mut controller)?;

    let err = page.click("selection").unwrap_err();

    assert_eq!(err, Error::missing_id("visualize"));
    assert!(!page.is_displayed("loading")?);
    assert!(page.take_form_submissions().is_empty());
    Ok(())
}

#[test]
fn spinner_variant_reveals_spinner_instead_of_loading_banner() -> Result<()> {
    let mut page = page("/completed")
        .with_indicator("spinner-grow")
        .with_input("metric", "confidence")
        .with_button("btn_table")
        .with_button("btn_heatmap")
        .with_button("btn_graph");
    let config = ControllerConfig::new(destinations())
        .with_indicator_class(ControllerConfig::SPINNER_INDICATOR_CLASS)?;
    let mut controller = PageController::new(config);
    page.load(&mut controller)?;

    page.click("btn_heatmap")?;

    assert!(page.is_displayed("spinner-grow")?);
    assert_eq!(
        page.take_form_submissions(),
        vec![post("/heatmap", "metric=confidence")]
    );
    Ok(())
}

#[test]
fn reveal_indicator_shows_only_the_first_match() -> Result<()> {
    let mut page = page("/completed")
        .with_indicator("loading")
        .with_indicator("loading");

    reveal_indicator(&mut page, "loading")?;

    assert!(page.is_displayed("loading")?);
    assert_eq!(page.visible_count("loading"), 1);
    assert_eq!(
        reveal_indicator(&mut page, "spinner-grow"),
        Err(Error::missing_class("spinner-grow"))
    );
    Ok(())
}

#[test]
fn submit_form_sends_hidden_fields_as_post_body() -> Result<()> {
    let mut page = page("/completed");

    let form = submit_form(
        &mut page,
        "/display_association_rules",
        FormParameters::new().with("metric", "support"),
        FormMethod::default(),
    )?;

    assert_eq!(form.body().as_deref(), Some("metric=support"));
    assert_eq!(
        page.take_form_submissions(),
        vec![post("/display_association_rules", "metric=support")]
    );
    assert_eq!(page.transient_form_count(), 1);
    Ok(())
}

#[test]
fn submit_form_with_get_moves_fields_into_the_query() -> Result<()> {
    let mut page = page("/completed");

    submit_form(
        &mut page,
        "/compute_rules?stale=1",
        FormParameters::new().with("metric", "lift"),
        FormMethod::Get,
    )?;

    assert_eq!(
        page.take_form_submissions(),
        vec![FormSubmission {
            method: FormMethod::Get,
            action: "/compute_rules?metric=lift".into(),
            body: None,
            synthetic: true,
        }]
    );
    Ok(())
}

#[test]
fn clicks_inside_the_selection_form_bubble_to_its_handler() -> Result<()> {
    let mut page = page("/demo_selection")
        .with_indicator("loading")
        .with_form("selection", "/demo_selection", FormMethod::Get)
        .with_form_field("selection", "metric", "metric", "confidence")
        .with_form_field("selection", "visualize", "visualize", "graph")
        .with_submit_control("selection", "go");
    let mut controller = controller();
    assert_eq!(page.load(&mut controller)?, PageContext::DemoSelection);

    let event = page.click("go")?;

    assert!(event.default_prevented());
    assert!(page.is_displayed("loading")?);
    assert_eq!(
        page.take_form_submissions(),
        vec![post("/demo", "metric=confidence&viz_type=graph")]
    );
    Ok(())
}

#[test]
fn bound_handlers_stop_once_any_of_them_has_submitted() -> Result<()> {
    let mut dom = RecordingPage::new(completed_page());
    let mut controller = controller();
    dom.wire(&mut controller)?;
    let table = dom.bound[0].clone();
    let heatmap = dom.bound[1].clone();

    let first = table.run(&mut dom, &mut ClickEvent::new())?;
    let again = table.run(&mut dom, &mut ClickEvent::new())?;
    let other = heatmap.run(&mut dom, &mut ClickEvent::new())?;

    assert!(matches!(first, Some(ClickOutcome::FormSubmitted(_))));
    assert_eq!(again, None);
    assert_eq!(other, None);
    assert_eq!(
        dom.page.take_form_submissions(),
        vec![post("/compute_rules", "metric=support")]
    );
    assert_eq!(dom.page.transient_form_count(), 1);
    Ok(())
}

#[test]
fn repeated_selection_click_keeps_native_submit_suppressed() -> Result<()> {
    let mut dom = RecordingPage::new(demo_selection_page("lift", "heatmap"));
    let mut controller = controller();
    dom.wire(&mut controller)?;
    let selection = dom.bound[0].clone();

    selection.run(&mut dom, &mut ClickEvent::new())?;
    let mut second = ClickEvent::new();
    let outcome = selection.run(&mut dom, &mut second)?;

    assert_eq!(outcome, None);
    assert!(second.default_prevented());
    assert_eq!(
        dom.page.take_form_submissions(),
        vec![post("/demo", "metric=lift&viz_type=heatmap")]
    );
    Ok(())
}
