use proptest::prelude::*;
use qchip::{Chip, ChipConfig, Element, ElementKind, ExportStyle, ImportError};
use std::collections::{BTreeMap, BTreeSet};

fn chip() -> Chip {
    Chip::generate(&ChipConfig::new(4, 4, true, 1, 2))
}

/// Group contents by name; a lone populated group is moved to slot 0 since
/// a flat list always reads back as the first group.
fn partition(chip: &Chip, kind: ElementKind) -> Vec<BTreeSet<String>> {
    let mut groups = vec![BTreeSet::new(); 4];
    match kind {
        ElementKind::Qubit => {
            for q in chip.qubits() {
                if let Some(g) = q.mark.group {
                    groups[g as usize].insert(chip.qubit_name(q.id));
                }
            }
        }
        ElementKind::Coupler => {
            for c in chip.couplers() {
                if let Some(g) = c.mark.group {
                    groups[g as usize].insert(chip.coupler_name(c));
                }
            }
        }
    }
    if groups.iter().filter(|g| !g.is_empty()).count() == 1 {
        groups.sort_by_key(|g| g.is_empty());
    }
    groups
}

fn attributes(chip: &Chip, kind: ElementKind) -> BTreeMap<String, Option<String>> {
    match kind {
        ElementKind::Qubit => chip
            .qubits()
            .iter()
            .filter(|q| q.mark.is_selected())
            .map(|q| (chip.qubit_name(q.id), q.mark.attribute.clone()))
            .collect(),
        ElementKind::Coupler => chip
            .couplers()
            .iter()
            .filter(|c| c.mark.is_selected())
            .map(|c| (chip.coupler_name(c), c.mark.attribute.clone()))
            .collect(),
    }
}

fn elements(chip: &Chip, kind: ElementKind) -> Vec<Element> {
    match kind {
        ElementKind::Qubit => chip.qubits().iter().map(|q| Element::Qubit(q.id)).collect(),
        ElementKind::Coupler => chip.couplers().iter().map(|c| Element::Coupler(c.a, c.b)).collect(),
    }
}

#[test]
fn nested_groups_round_trip() {
    let mut c = chip();
    c.select(Element::Qubit(1), 0, false);
    c.select(Element::Qubit(2), 0, false);
    c.select(Element::Qubit(3), 1, false);
    let text = c.export_selection(ElementKind::Qubit, ExportStyle::Groups);
    assert_eq!(text, r#"[["Q01", "Q02"], ["Q03"], [], []]"#);

    let mut back = chip();
    back.import_selection(&text).unwrap();
    assert_eq!(partition(&back, ElementKind::Qubit), partition(&c, ElementKind::Qubit));
}

#[test]
fn attribute_import_keeps_numbers_and_strings() {
    let mut c = chip();
    let report = c.import_selection(r#"{"Q01": 5, "Q02": "foo"}"#).unwrap();
    assert_eq!((report.kind, report.style), (ElementKind::Qubit, ExportStyle::Attributes));
    let q1 = &c.qubit(1).unwrap().mark;
    let q2 = &c.qubit(2).unwrap().mark;
    assert_eq!((q1.group, q1.attribute.as_deref()), (Some(0), Some("5")));
    assert_eq!((q2.group, q2.attribute.as_deref()), (Some(0), Some("foo")));
    assert_eq!(
        c.export_selection(ElementKind::Qubit, ExportStyle::Attributes),
        r#"{"Q01": 5, "Q02": "foo"}"#
    );
}

#[test]
fn single_quotes_and_apostrophes() {
    let mut c = chip();
    c.import_selection(r#"{'G0501': "it's", 'G0502': 'a "b"'}"#).unwrap();
    let text = c.export_selection(ElementKind::Coupler, ExportStyle::Attributes);
    assert_eq!(text, r#"{"G0501": "it's", "G0502": "a \"b\""}"#);
}

#[test]
fn coupler_list_switches_kind() {
    let mut c = chip();
    let report = c.import_selection("['G0501', 'G0602']").unwrap();
    assert_eq!(report.kind, ElementKind::Coupler);
    assert_eq!(c.num_selected_couplers(), 2);
}

#[test]
fn mixed_kinds_infer_qubits() {
    let mut c = chip();
    let report = c.import_selection("['G0501', 'Q03']").unwrap();
    assert_eq!(report.kind, ElementKind::Qubit);
    assert_eq!(report.applied, 2);
    assert_eq!(c.num_selected_couplers(), 1);
}

#[test]
fn no_valid_names_carries_the_rejects() {
    let mut c = chip();
    match c.import_selection("['Q99', 'G0000']") {
        Err(ImportError::NoValidNames { unknown, disabled }) => {
            assert_eq!(unknown, vec!["Q99".to_string(), "G0000".to_string()]);
            assert!(disabled.is_empty());
        }
        other => panic!("unexpected {:?}", other),
    }
}

fn kind_strategy() -> impl Strategy<Value = ElementKind> {
    prop_oneof![Just(ElementKind::Qubit), Just(ElementKind::Coupler)]
}

proptest! {
    #[test]
    fn group_export_round_trips(
        kind in kind_strategy(),
        groups in proptest::collection::vec(proptest::option::of(0u8..4), 32),
    ) {
        let mut c = chip();
        for (el, g) in elements(&c, kind).into_iter().zip(groups) {
            if let Some(g) = g {
                c.select(el, g, true);
            }
        }
        let text = c.export_selection(kind, ExportStyle::Groups);
        let mut back = chip();
        match back.import_selection(&text) {
            Ok(report) => prop_assert_eq!(report.kind, kind),
            Err(ImportError::NoValidNames { .. }) => prop_assert_eq!(text.as_str(), "[]"),
            Err(e) => prop_assert!(false, "import failed: {}", e),
        }
        prop_assert_eq!(partition(&back, kind), partition(&c, kind));
    }

    #[test]
    fn attribute_export_round_trips(
        kind in kind_strategy(),
        attrs in proptest::collection::vec(proptest::option::of("\\PC{1,10}|-?[0-9]{1,4}(\\.[0-9]{1,3})?|True|\\[1, 2\\]"), 32),
    ) {
        let mut c = chip();
        for (el, a) in elements(&c, kind).into_iter().zip(attrs) {
            if let Some(a) = a {
                c.set_attribute(el, Some(&a));
            }
        }
        let text = c.export_selection(kind, ExportStyle::Attributes);
        let mut back = chip();
        let _ = back.import_selection(&text);
        prop_assert_eq!(attributes(&back, kind), attributes(&c, kind));
    }
}
