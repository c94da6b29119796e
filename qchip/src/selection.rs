//! Selection export to, and import from, list/dict literal text.
//!
//! Group style emits `[]` when nothing is selected, a flat list when exactly
//! one group is populated, and all four groups as nested lists otherwise.
//! Attribute style emits a `{name: value}` mapping.

use crate::literal::{self, quote, Literal, LiteralError};
use crate::model::{Element, ElementKind, Mark, GROUP_COUNT};
use crate::Chip;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    Groups,
    Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub kind: ElementKind,
    pub style: ExportStyle,
    pub applied: usize,
    /// Names matching no qubit or coupler.
    pub unknown: Vec<String>,
    /// Names of disabled elements, left untouched.
    pub disabled: Vec<String>,
    /// Names listed in a group position past the last group.
    pub out_of_range: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("malformed selection literal: {0}")]
    Parse(#[from] LiteralError),
    #[error("invalid selection shape: {0}")]
    Shape(&'static str),
    #[error("no valid qubit or coupler names in input")]
    NoValidNames { unknown: Vec<String>, disabled: Vec<String> },
}

fn selected_marks<'a>(chip: &'a Chip, kind: ElementKind) -> Vec<(String, &'a Mark)> {
    match kind {
        ElementKind::Qubit => chip
            .qubits
            .iter()
            .filter(|q| q.mark.is_selected())
            .map(|q| (chip.qubit_name(q.id), &q.mark))
            .collect(),
        ElementKind::Coupler => chip
            .couplers
            .iter()
            .filter(|c| c.mark.is_selected())
            .map(|c| (chip.coupler_name(c), &c.mark))
            .collect(),
    }
}

pub fn export(chip: &Chip, kind: ElementKind, style: ExportStyle) -> String {
    let marks = selected_marks(chip, kind);
    match style {
        ExportStyle::Groups => {
            let mut groups: [Vec<String>; GROUP_COUNT] = Default::default();
            for (name, mark) in &marks {
                if let Some(slot) = mark.group.and_then(|g| groups.get_mut(g as usize)) {
                    slot.push(quote(name));
                }
            }
            let populated = groups.iter().filter(|g| !g.is_empty()).count();
            match populated {
                0 => "[]".to_string(),
                1 => format!("[{}]", groups.concat().join(", ")),
                _ => {
                    let lists: Vec<String> = groups.iter().map(|g| format!("[{}]", g.join(", "))).collect();
                    format!("[{}]", lists.join(", "))
                }
            }
        }
        ExportStyle::Attributes => {
            let entries: Vec<String> = marks
                .iter()
                .map(|(name, mark)| {
                    let value = mark.attribute.as_deref().map_or_else(|| "None".to_string(), literal::render_attribute);
                    format!("{}: {}", quote(name), value)
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

enum Assign {
    Group(u8),
    Attribute(String),
}

fn string_items(items: Vec<Literal>) -> Result<Vec<String>, ImportError> {
    items
        .into_iter()
        .map(|item| match item {
            Literal::Str(s) => Ok(s),
            _ => Err(ImportError::Shape("list entries must be names")),
        })
        .collect()
}

/// Flattens a parsed literal into `(name, assignment)` pairs plus the names
/// that sat in a group slot past the last group.
fn entries_of(value: Literal) -> Result<(ExportStyle, Vec<(String, Assign)>, Vec<String>), ImportError> {
    let mut out = Vec::new();
    let mut out_of_range = Vec::new();
    match value {
        Literal::List(items) => {
            let nested = matches!(items.first(), Some(Literal::List(_)));
            if !nested {
                for name in string_items(items)? {
                    out.push((name, Assign::Group(0)));
                }
            } else {
                for (group, item) in items.into_iter().enumerate() {
                    let Literal::List(names) = item else {
                        return Err(ImportError::Shape("cannot mix names and group lists"));
                    };
                    for name in string_items(names)? {
                        if group < GROUP_COUNT {
                            out.push((name, Assign::Group(group as u8)));
                        } else {
                            out_of_range.push(name);
                        }
                    }
                }
            }
            Ok((ExportStyle::Groups, out, out_of_range))
        }
        Literal::Dict(entries) => {
            for (name, v) in entries {
                out.push((name, Assign::Attribute(v.into_attribute_text())));
            }
            Ok((ExportStyle::Attributes, out, out_of_range))
        }
        _ => Err(ImportError::Shape("expected a list or a dict")),
    }
}

/// Applies the selection described by `text` over the current one. Elements
/// not named keep their state.
///
/// Unknown and disabled names are reported but do not fail the import as
/// long as at least one name applies; otherwise the chip is left untouched.
pub fn import(chip: &mut Chip, text: &str) -> Result<ImportReport, ImportError> {
    let value = literal::parse(text)?;
    let (style, entries, out_of_range) = entries_of(value)?;

    let mut unknown = Vec::new();
    let mut disabled = Vec::new();
    let mut valid: Vec<(Element, Assign)> = Vec::new();
    for (name, assign) in entries {
        match chip.resolve_name(&name) {
            None => unknown.push(name),
            Some(el) if chip.mark(el).map_or(true, |m| m.disabled) => disabled.push(name),
            Some(el) => valid.push((el, assign)),
        }
    }
    if !unknown.is_empty() {
        log::warn!("selection import: unknown names {:?}", unknown);
    }
    if valid.is_empty() {
        return Err(ImportError::NoValidNames { unknown, disabled });
    }

    let kind = if valid.iter().any(|(el, _)| el.kind() == ElementKind::Qubit) {
        ElementKind::Qubit
    } else {
        ElementKind::Coupler
    };
    let applied = valid.len();
    for (el, assign) in valid {
        if let Some(mark) = chip.mark_mut(el) {
            match assign {
                Assign::Group(g) => mark.group = Some(g),
                Assign::Attribute(t) => {
                    mark.group = Some(0);
                    mark.attribute = Some(t);
                }
            }
        }
    }
    log::info!("selection import: {} {:?} entries applied as {:?}", applied, kind, style);
    Ok(ImportReport { kind, style, applied, unknown, disabled, out_of_range })
}
