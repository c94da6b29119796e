use crate::geometry::limits;
use crate::literal::Literal;
use crate::model::{ChipConfig, ConfigError, Coupler, Mark, Qubit, GROUP_COUNT};
use crate::presets::UnknownPreset;
use crate::Chip;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed chip snapshot: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid chip parameters: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot exceeds {what} cap of {cap}")]
    Cap { what: &'static str, cap: usize },
    #[error("duplicate qubit id {0}")]
    DuplicateQubit(u32),
    #[error("coupler {a}-{b} references a missing qubit")]
    DanglingCoupler { a: u32, b: u32 },
    #[error("coupler {a}-{b} appears more than once")]
    DuplicateCoupler { a: u32, b: u32 },
    #[error("coupler {0}-{0} is a self loop")]
    SelfLoop(u32),
    #[error("select group {0} out of range")]
    Group(u8),
    #[error(transparent)]
    Preset(#[from] UnknownPreset),
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            PersistError::Format(_) => "invalid_format",
            PersistError::Config(_) => "out_of_range",
            PersistError::Cap { .. } => "cap_exceeded",
            PersistError::DuplicateQubit(_) => "duplicate_id",
            PersistError::DanglingCoupler { .. } | PersistError::SelfLoop(_) => "invalid_coupler",
            PersistError::DuplicateCoupler { .. } => "duplicate_id",
            PersistError::Group(_) => "invalid_group",
            PersistError::Preset(_) => "invalid_preset",
        }
    }
}

// Field names follow the browser tool's local-storage record.
#[derive(Serialize, Deserialize)]
struct QubitSer {
    id: u32,
    x: i32,
    y: i32,
    disabled: bool,
    select_group: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct CouplerSer {
    #[serde(rename = "qubitA")]
    a: u32,
    #[serde(rename = "qubitB")]
    b: u32,
    disabled: bool,
    select_group: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct Doc {
    #[serde(flatten)]
    config: ChipConfig,
    qubits: Vec<QubitSer>,
    couplers: Vec<CouplerSer>,
}

pub fn to_json_impl(chip: &Chip) -> Value {
    let doc = Doc {
        config: chip.config,
        qubits: chip
            .qubits
            .iter()
            .map(|q| QubitSer {
                id: q.id,
                x: q.x,
                y: q.y,
                disabled: q.mark.disabled,
                select_group: q.mark.group,
                attribute: q.mark.attribute.clone().map(Value::String),
            })
            .collect(),
        couplers: chip
            .couplers
            .iter()
            .map(|c| CouplerSer {
                a: c.a,
                b: c.b,
                disabled: c.mark.disabled,
                select_group: c.mark.group,
                attribute: c.mark.attribute.clone().map(Value::String),
            })
            .collect(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Attribute text of a stored value. Older records hold the parsed import
/// value (`5`, `true`, `[1, 2]`) rather than its text.
fn attribute_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(to_literal(other).render()),
    }
}

fn to_literal(v: Value) -> Literal {
    match v {
        Value::Null => Literal::Word("null".to_string()),
        Value::Bool(b) => Literal::Word(b.to_string()),
        Value::Number(n) => Literal::Num(n.to_string()),
        Value::String(s) => Literal::Str(s),
        Value::Array(items) => Literal::List(items.into_iter().map(to_literal).collect()),
        Value::Object(map) => Literal::Dict(map.into_iter().map(|(k, v)| (k, to_literal(v))).collect()),
    }
}

fn mark_of(disabled: bool, group: Option<u8>, attribute: Option<Value>) -> Result<Mark, PersistError> {
    let attribute = attribute.and_then(attribute_text);
    if let Some(g) = group {
        if g as usize >= GROUP_COUNT {
            return Err(PersistError::Group(g));
        }
    }
    if attribute.as_ref().map_or(false, |a| a.len() > limits::MAX_ATTRIBUTE_LEN) {
        return Err(PersistError::Cap { what: "attribute length", cap: limits::MAX_ATTRIBUTE_LEN });
    }
    Ok(Mark { disabled, group, attribute })
}

/// Rebuilds a chip from a snapshot. Coupler endpoints are resolved by qubit
/// id, never by position, since deletions leave the record order arbitrary.
pub fn from_json_impl(v: Value) -> Result<Chip, PersistError> {
    let doc: Doc = serde_json::from_value(v)?;
    doc.config.validate()?;
    if doc.qubits.len() > limits::MAX_QUBITS {
        return Err(PersistError::Cap { what: "qubit count", cap: limits::MAX_QUBITS });
    }
    if doc.couplers.len() > limits::MAX_COUPLERS {
        return Err(PersistError::Cap { what: "coupler count", cap: limits::MAX_COUPLERS });
    }
    let mut ids = HashSet::with_capacity(doc.qubits.len());
    let mut qubits = Vec::with_capacity(doc.qubits.len());
    for q in doc.qubits {
        if !ids.insert(q.id) {
            return Err(PersistError::DuplicateQubit(q.id));
        }
        qubits.push(Qubit { id: q.id, x: q.x, y: q.y, mark: mark_of(q.disabled, q.select_group, q.attribute)? });
    }
    let mut pairs = HashSet::with_capacity(doc.couplers.len());
    let mut couplers = Vec::with_capacity(doc.couplers.len());
    for c in doc.couplers {
        if c.a == c.b {
            return Err(PersistError::SelfLoop(c.a));
        }
        if !ids.contains(&c.a) || !ids.contains(&c.b) {
            return Err(PersistError::DanglingCoupler { a: c.a, b: c.b });
        }
        if !pairs.insert((c.a.min(c.b), c.a.max(c.b))) {
            return Err(PersistError::DuplicateCoupler { a: c.a, b: c.b });
        }
        couplers.push(Coupler { a: c.a, b: c.b, mark: mark_of(c.disabled, c.select_group, c.attribute)? });
    }
    Ok(Chip { config: doc.config, qubits, couplers })
}
