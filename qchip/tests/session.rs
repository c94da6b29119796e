use qchip::{ChipConfig, Element, ElementKind, Mode, Preset, Session};

// 3x2, origin qubit, ids 1..=5; coupler 1-4 runs from (0,0) to (1,1)
fn session() -> Session {
    Session::from_config(&ChipConfig::new(3, 2, true, 1, 2)).unwrap()
}

fn no_prompt(_: &str, _: Option<&str>) -> Option<String> {
    panic!("prompt outside attribute mode")
}

#[test]
fn modes_cycle_in_order() {
    let mut s = session();
    let mut seen = vec![s.mode()];
    for _ in 0..5 {
        s.next_mode();
        seen.push(s.mode());
    }
    assert_eq!(
        seen,
        vec![Mode::Topology, Mode::Qubit, Mode::Coupler, Mode::QubitAttr, Mode::CouplerAttr, Mode::Topology]
    );
    s.prev_mode();
    assert_eq!(s.mode(), Mode::CouplerAttr);
    assert_eq!("QubitAttr".parse::<Mode>(), Ok(Mode::QubitAttr));
    assert!("qubit".parse::<Mode>().is_err());
}

#[test]
fn list_modes_share_selection_until_attribute_mode() {
    let mut s = session();
    s.set_mode(Mode::Qubit);
    assert!(s.activate(0.0, 0.0, no_prompt));
    s.set_mode(Mode::Coupler);
    assert_eq!(s.stats().selected_qubits, 1);
    s.set_mode(Mode::QubitAttr);
    assert_eq!(s.stats().selected_qubits, 0);
}

#[test]
fn leaving_topology_clears_selection() {
    let mut s = session();
    s.import("['Q02']").unwrap();
    assert_eq!(s.mode(), Mode::Qubit);
    s.set_mode(Mode::Topology);
    assert_eq!(s.stats().selected_qubits, 1);
    s.set_mode(Mode::Qubit);
    assert_eq!(s.stats().selected_qubits, 0);
}

#[test]
fn topology_clicks_toggle_disabled() {
    let mut s = session();
    assert!(s.activate(0.0, 0.0, no_prompt));
    assert!(s.chip().qubit(1).unwrap().mark.disabled);
    assert!(s.activate(0.5, 0.5, no_prompt));
    assert!(s.chip().coupler(1, 4).unwrap().mark.disabled);
    assert!(s.activate(0.1, -0.1, no_prompt));
    assert!(!s.chip().qubit(1).unwrap().mark.disabled);
    let v = s.version();
    assert!(!s.activate(9.0, 9.0, no_prompt));
    assert_eq!(s.version(), v);
}

#[test]
fn list_mode_clicks_use_active_group() {
    let mut s = session();
    s.set_mode(Mode::Qubit);
    assert!(!s.activate(0.5, 0.5, no_prompt), "couplers are not pickable in qubit mode");
    assert!(s.set_active_group(2));
    assert!(s.activate(2.0, 0.0, no_prompt));
    assert_eq!(s.chip().qubit(2).unwrap().mark.group, Some(2));
    assert!(s.activate(2.0, 0.0, no_prompt));
    assert_eq!(s.chip().qubit(2).unwrap().mark.group, None);

    s.set_mode(Mode::Coupler);
    assert_eq!(s.active_group(ElementKind::Coupler), 0);
    assert!(s.activate(0.5, 0.5, no_prompt));
    assert_eq!(s.chip().coupler(1, 4).unwrap().mark.group, Some(0));
}

#[test]
fn active_group_only_in_list_modes() {
    let mut s = session();
    assert!(!s.set_active_group(1));
    s.set_mode(Mode::QubitAttr);
    assert!(!s.set_active_group(1));
    s.set_mode(Mode::Coupler);
    assert!(!s.set_active_group(4));
    assert!(s.set_active_group(3));
    assert_eq!(s.active_group(ElementKind::Coupler), 3);
    assert_eq!(s.active_group(ElementKind::Qubit), 0);
}

#[test]
fn attribute_mode_prompts_with_name_and_value() {
    let mut s = session();
    s.set_mode(Mode::QubitAttr);
    assert!(s.activate(0.0, 0.0, |name, current| {
        assert_eq!((name, current), ("Q01", None));
        Some("0.5".to_string())
    }));
    assert_eq!(s.chip().qubit(1).unwrap().mark.attribute.as_deref(), Some("0.5"));

    // cancelled prompt
    assert!(!s.activate(0.0, 0.0, |_, current| {
        assert_eq!(current, Some("0.5"));
        None
    }));
    assert_eq!(s.chip().qubit(1).unwrap().mark.group, Some(0));

    // empty answer clears
    assert!(s.activate(0.0, 0.0, |_, _| Some(String::new())));
    assert!(!s.chip().qubit(1).unwrap().mark.is_selected());
}

#[test]
fn attribute_mode_skips_disabled_without_prompting() {
    let mut s = session();
    s.activate(0.5, 0.5, no_prompt);
    s.set_mode(Mode::CouplerAttr);
    assert!(!s.activate(0.5, 0.5, no_prompt));
}

#[test]
fn double_click_deletes_in_topology_only() {
    let mut s = session();
    s.set_mode(Mode::Qubit);
    assert!(!s.double_activate(2.0, 0.0));
    s.set_mode(Mode::Topology);
    assert!(!s.double_activate(0.5, 0.5), "couplers are not deleted");
    assert!(s.double_activate(2.0, 0.0));
    assert_eq!(s.stats().qubits, 4);
    assert_eq!(s.stats().couplers, 2);
}

#[test]
fn drag_selects_in_list_modes() {
    let mut s = session();
    assert_eq!(s.drag(-1.0, -1.0, 5.0, 0.5), 0);
    s.set_mode(Mode::Qubit);
    s.set_active_group(1);
    assert_eq!(s.drag(5.0, 0.5, -1.0, -1.0), 3);
    assert_eq!(s.chip().qubit(3).unwrap().mark.group, Some(1));
    s.set_mode(Mode::QubitAttr);
    assert_eq!(s.drag(-1.0, -1.0, 5.0, 2.0), 0);
}

#[test]
fn import_picks_mode_from_content() {
    let mut s = session();
    s.import(r#"{"Q01": 5, "Q02": "foo"}"#).unwrap();
    assert_eq!(s.mode(), Mode::QubitAttr);
    assert_eq!(s.export_current().as_deref(), Some(r#"{"Q01": 5, "Q02": "foo"}"#));

    s.import("[['G0401'], ['G0503']]").unwrap();
    assert_eq!(s.mode(), Mode::Coupler);
    assert_eq!(s.stats().selected_qubits, 2, "qubit attributes survive a coupler import");
    assert_eq!(s.export(ElementKind::Coupler), r#"[["G0401"], ["G0503"], [], []]"#);

    let v = s.version();
    assert!(s.import("['Q9']").is_err());
    assert_eq!((s.mode(), s.version()), (Mode::Coupler, v));
}

#[test]
fn topology_has_nothing_to_export() {
    let s = session();
    assert_eq!(s.export_current(), None);
}

#[test]
fn version_moves_on_every_change() {
    let mut s = session();
    assert_eq!(s.version(), 1);
    s.set_mode(Mode::Qubit);
    s.activate(0.0, 0.0, no_prompt);
    s.reset_selections();
    assert_eq!(s.version(), 4);
    s.rebuild(&ChipConfig::new(4, 4, false, 0, 2)).unwrap();
    assert_eq!(s.version(), 5);
    assert!(s.rebuild(&ChipConfig::new(0, 4, false, 0, 2)).is_err());
    assert_eq!(s.version(), 5);
    s.load_preset(Preset::Sycamore);
    assert_eq!((s.version(), s.preset()), (6, Some(Preset::Sycamore)));
}

#[test]
fn toggled_element_is_addressable_by_name() {
    let mut s = session();
    s.activate(0.5, 0.5, no_prompt);
    let el = s.chip().resolve_name("G0401").unwrap();
    assert_eq!(el, Element::Coupler(1, 4));
    assert!(s.chip().mark(el).unwrap().disabled);
}

#[test]
fn restored_session_continues_the_counter() {
    let mut old = session();
    for _ in 0..5 {
        old.next_mode();
    }
    let mut restored = Session::from_json_value(old.to_json_value()).unwrap();
    assert_eq!(restored.version(), 1);
    restored.continue_from(old.version());
    assert_eq!(restored.version(), old.version() + 1);
}

#[test]
fn overflowing_start_index_is_rejected() {
    let cfg = ChipConfig::new(3, 2, true, u32::MAX - 1, 2);
    assert!(Session::from_config(&cfg).is_err());
    let mut s = session();
    let v = s.version();
    assert!(s.rebuild(&cfg).is_err());
    assert_eq!((s.version(), s.stats().qubits), (v, 5));
}

#[test]
fn importing_qubits_keeps_coupler_selection() {
    let mut s = session();
    s.set_mode(Mode::Coupler);
    assert!(s.activate(0.5, 0.5, no_prompt));
    s.import("['Q03']").unwrap();
    assert_eq!(s.mode(), Mode::Qubit);
    assert_eq!(s.export(ElementKind::Coupler), r#"["G0401"]"#);
    assert_eq!(s.export(ElementKind::Qubit), r#"["Q03"]"#);
}
