use crate::error;
use crate::interop::{arr_f32, arr_str, arr_u32, arr_u8, new_obj, set_kv};
use crate::Session;
use js_sys::Function;
use serde::Serialize;
use qchip::algorithms::picking::{PickFilter, PickTolerance};
use qchip::geometry::limits;
use qchip::{ChipConfig, ElementKind, Mark, Mode, Preset};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

const FLAG_DISABLED: u8 = 1;
const FLAG_SELECTED: u8 = 2;
const NO_GROUP: u8 = u8::MAX;

/// Installs the console logger and, when built with the feature, the panic hook.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[wasm_bindgen]
pub fn preset_names() -> js_sys::Array {
    Preset::ALL.iter().map(|p| JsValue::from_str(p.as_str())).collect()
}

fn clamped_config(width: u32, height: u32, origin_is_qubit: bool, start_index: u32, name_length: u32) -> ChipConfig {
    let mut config = ChipConfig::new(
        width.clamp(1, limits::MAX_WIDTH),
        height.clamp(1, limits::MAX_HEIGHT),
        origin_is_qubit,
        start_index,
        (name_length as usize).min(limits::MAX_NAME_LENGTH),
    );
    if let Some(max) = config.max_start_index() {
        config.start_index = config.start_index.min(max);
    }
    config
}

fn flags(mark: &Mark) -> u8 {
    let mut f = 0;
    if mark.disabled { f |= FLAG_DISABLED; }
    if mark.is_selected() { f |= FLAG_SELECTED; }
    f
}

fn kind_of(name: &str) -> Option<ElementKind> {
    match name {
        "qubit" => Some(ElementKind::Qubit),
        "coupler" => Some(ElementKind::Coupler),
        _ => None,
    }
}

fn check_point(x: f32, y: f32) -> Result<(), JsValue> {
    if !x.is_finite() { return Err(error::non_finite("x")); }
    if !y.is_finite() { return Err(error::non_finite("y")); }
    Ok(())
}

#[wasm_bindgen]
impl Session {
    /// Out-of-range parameters are clamped; use `rebuild_res` for strict checks.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, use_origin_as_qubit: bool, start_index: u32, name_length: u32) -> Session {
        let config = clamped_config(width, height, use_origin_as_qubit, start_index, name_length);
        crate::Session::rs_new(&config)
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }

    // Chip construction
    pub fn rebuild_res(&mut self, width: u32, height: u32, use_origin_as_qubit: bool, start_index: u32, name_length: u32) -> JsValue {
        let config = ChipConfig::new(width, height, use_origin_as_qubit, start_index, name_length as usize);
        match self.inner.rebuild(&config) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.chip().num_qubits() as f64)),
            Err(e) => error::config(&e),
        }
    }
    pub fn load_preset(&mut self, name: &str) -> bool {
        match name.parse::<Preset>() {
            Ok(p) => { self.inner.load_preset(p); true }
            Err(_) => false,
        }
    }
    pub fn load_preset_res(&mut self, name: &str) -> JsValue {
        match name.parse::<Preset>() {
            Ok(p) => { self.inner.load_preset(p); error::ok(JsValue::from_str(p.as_str())) }
            Err(_) => error::invalid_preset(name),
        }
    }
    /// Preset name, or `"NULL"` for a hand-built chip.
    pub fn preset(&self) -> String {
        self.inner.preset().map_or("NULL", Preset::as_str).to_string()
    }
    pub fn config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.chip().config()).unwrap_or(JsValue::NULL)
    }

    // Modes
    pub fn mode(&self) -> String {
        self.inner.mode().to_string()
    }
    pub fn set_mode(&mut self, name: &str) -> bool {
        match name.parse::<Mode>() {
            Ok(m) => { self.inner.set_mode(m); true }
            Err(_) => false,
        }
    }
    pub fn set_mode_res(&mut self, name: &str) -> JsValue {
        match name.parse::<Mode>() {
            Ok(m) => { self.inner.set_mode(m); error::ok(JsValue::from_str(m.as_str())) }
            Err(_) => error::invalid_mode(name),
        }
    }
    pub fn next_mode(&mut self) -> String {
        self.inner.next_mode();
        self.mode()
    }
    pub fn prev_mode(&mut self) -> String {
        self.inner.prev_mode();
        self.mode()
    }
    pub fn active_group(&self) -> Option<u8> {
        self.inner.mode().kind().map(|k| self.inner.active_group(k))
    }
    pub fn set_active_group(&mut self, group: u8) -> bool {
        self.inner.set_active_group(group)
    }
    pub fn set_active_group_res(&mut self, group: u8) -> JsValue {
        if group as usize >= qchip::GROUP_COUNT {
            return error::out_of_range("group", 0.0, (qchip::GROUP_COUNT - 1) as f64, group as f64);
        }
        if !self.inner.mode().is_list() {
            return error::invalid_mode(self.inner.mode().as_str());
        }
        error::ok(JsValue::from_bool(self.inner.set_active_group(group)))
    }
    pub fn set_pick_tolerance_res(&mut self, qubit: f32, coupler: f32) -> JsValue {
        for (name, v) in [("qubit", qubit), ("coupler", coupler)] {
            if !v.is_finite() { return error::non_finite(name); }
            if v <= 0.0 { return error::out_of_range(name, 0.0, f64::INFINITY, v as f64); }
        }
        self.inner.set_tolerance(PickTolerance { qubit, coupler });
        error::ok(JsValue::TRUE)
    }

    // Pointer events
    /// `prompt(name, current)` is called in attribute modes and should return
    /// the new text, or null to cancel.
    pub fn activate(&mut self, x: f32, y: f32, prompt: &Function) -> bool {
        self.inner.activate(x, y, |name, current| {
            let current = current.map_or(JsValue::NULL, JsValue::from_str);
            prompt.call2(&JsValue::NULL, &JsValue::from_str(name), &current).ok().and_then(|v| v.as_string())
        })
    }
    pub fn activate_res(&mut self, x: f32, y: f32, prompt: &Function) -> JsValue {
        if let Err(e) = check_point(x, y) { return e; }
        error::ok(JsValue::from_bool(self.activate(x, y, prompt)))
    }
    pub fn double_activate(&mut self, x: f32, y: f32) -> bool {
        self.inner.double_activate(x, y)
    }
    pub fn double_activate_res(&mut self, x: f32, y: f32) -> JsValue {
        if let Err(e) = check_point(x, y) { return e; }
        error::ok(JsValue::from_bool(self.inner.double_activate(x, y)))
    }
    pub fn drag(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> u32 {
        self.inner.drag(x0, y0, x1, y1) as u32
    }
    pub fn drag_res(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> JsValue {
        for (name, v) in [("x0", x0), ("y0", y0), ("x1", x1), ("y1", y1)] {
            if !v.is_finite() { return error::non_finite(name); }
        }
        error::ok(JsValue::from_f64(self.drag(x0, y0, x1, y1) as f64))
    }
    pub fn reset_selections(&mut self) {
        self.inner.reset_selections();
    }

    pub fn pick(&self, x: f32, y: f32) -> JsValue {
        let chip = self.inner.chip();
        let filter = self.inner.mode().kind().map_or(PickFilter::ALL, PickFilter::only);
        let Some(p) = chip.pick(x, y, filter, PickTolerance::default()) else { return JsValue::NULL };
        let obj = new_obj();
        match p {
            qchip::Pick::Qubit { id, dist } => {
                set_kv(&obj, "kind", &JsValue::from_str("qubit"));
                set_kv(&obj, "id", &JsValue::from_f64(id as f64));
                set_kv(&obj, "dist", &JsValue::from_f64(dist as f64));
            }
            qchip::Pick::Coupler { a, b, t, dist } => {
                set_kv(&obj, "kind", &JsValue::from_str("coupler"));
                set_kv(&obj, "a", &JsValue::from_f64(a as f64));
                set_kv(&obj, "b", &JsValue::from_f64(b as f64));
                set_kv(&obj, "t", &JsValue::from_f64(t as f64));
                set_kv(&obj, "dist", &JsValue::from_f64(dist as f64));
            }
        }
        if let Some(name) = chip.name_of(p.element()) {
            set_kv(&obj, "name", &JsValue::from_str(&name));
        }
        obj.into()
    }
    pub fn pick_res(&self, x: f32, y: f32) -> JsValue {
        if let Err(e) = check_point(x, y) { return e; }
        error::ok(self.pick(x, y))
    }

    // Selection text
    pub fn export_current(&self) -> Option<String> {
        self.inner.export_current()
    }
    pub fn export_qubits(&self) -> String {
        self.inner.export(ElementKind::Qubit)
    }
    pub fn export_couplers(&self) -> String {
        self.inner.export(ElementKind::Coupler)
    }
    pub fn import(&mut self, text: &str) -> bool {
        self.inner.import(text).is_ok()
    }
    pub fn import_res(&mut self, text: &str) -> JsValue {
        if text.len() > limits::MAX_IMPORT_LEN {
            return error::out_of_range("text", 0.0, limits::MAX_IMPORT_LEN as f64, text.len() as f64);
        }
        match self.inner.import(text) {
            Ok(report) => {
                let v = serde_wasm_bindgen::to_value(&report).unwrap_or(JsValue::NULL);
                if let Ok(obj) = v.clone().dyn_into::<js_sys::Object>() {
                    set_kv(&obj, "mode", &JsValue::from_str(self.inner.mode().as_str()));
                }
                error::ok(v)
            }
            Err(e) => error::import(&e),
        }
    }

    // Render data
    pub fn stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.stats()).unwrap_or(JsValue::NULL)
    }
    pub fn center(&self) -> JsValue {
        match self.inner.chip().center() {
            Some((x, y)) => arr_f32(&[x, y]).into(),
            None => JsValue::NULL,
        }
    }
    pub fn get_qubit_data(&self) -> JsValue {
        let chip = self.inner.chip();
        let n = chip.num_qubits();
        let (mut ids, mut pos, mut fl, mut groups, mut names) =
            (Vec::with_capacity(n), Vec::with_capacity(n * 2), Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
        for q in chip.qubits() {
            ids.push(q.id);
            pos.push(q.x as f32);
            pos.push(q.y as f32);
            fl.push(flags(&q.mark));
            groups.push(q.mark.group.unwrap_or(NO_GROUP));
            names.push(chip.qubit_name(q.id));
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f32(&pos).into());
        set_kv(&obj, "flags", &arr_u8(&fl).into());
        set_kv(&obj, "groups", &arr_u8(&groups).into());
        set_kv(&obj, "names", &arr_str(&names).into());
        obj.into()
    }
    pub fn get_coupler_data(&self) -> JsValue {
        let chip = self.inner.chip();
        let n = chip.num_couplers();
        let (mut ends, mut pos, mut fl, mut groups, mut names) =
            (Vec::with_capacity(n * 2), Vec::with_capacity(n * 4), Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
        for c in chip.couplers() {
            let (Some(qa), Some(qb)) = (chip.qubit(c.a), chip.qubit(c.b)) else { continue };
            ends.extend_from_slice(&[c.a, c.b]);
            pos.extend_from_slice(&[qa.x as f32, qa.y as f32, qb.x as f32, qb.y as f32]);
            fl.push(flags(&c.mark));
            groups.push(c.mark.group.unwrap_or(NO_GROUP));
            names.push(chip.coupler_name(c));
        }
        let obj = new_obj();
        set_kv(&obj, "endpoints", &arr_u32(&ends).into());
        set_kv(&obj, "positions", &arr_f32(&pos).into());
        set_kv(&obj, "flags", &arr_u8(&fl).into());
        set_kv(&obj, "groups", &arr_u8(&groups).into());
        set_kv(&obj, "names", &arr_str(&names).into());
        obj.into()
    }
    pub fn get_attribute_res(&self, kind: &str, a: u32, b: u32) -> JsValue {
        let el = match kind_of(kind) {
            Some(ElementKind::Qubit) => qchip::Element::Qubit(a),
            Some(ElementKind::Coupler) => qchip::Element::Coupler(a, b),
            None => return error::err("invalid_kind", "kind must be 'qubit' or 'coupler'", None),
        };
        match self.inner.chip().mark(el) {
            Some(m) => error::ok(m.attribute.as_deref().map_or(JsValue::NULL, JsValue::from_str)),
            None => error::invalid_id(kind, a),
        }
    }

    // Persistence
    /// Session snapshot as a plain JS object.
    pub fn to_json(&self) -> JsValue {
        let ser = serde_wasm_bindgen::Serializer::json_compatible();
        self.inner.to_json_value().serialize(&ser).unwrap_or(JsValue::NULL)
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match qchip::Session::from_json_value(val) {
                Ok(s) => { self.replace(s); true }
                Err(_) => false,
            },
            Err(_) => false,
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match qchip::Session::from_json_value(val) {
                Ok(s) => { self.replace(s); error::ok(JsValue::TRUE) }
                Err(e) => error::snapshot(&e),
            },
            Err(e) => error::err("invalid_snapshot", format!("{}", e), None),
        }
    }
    /// Session snapshot as a JSON string, for local storage.
    pub fn to_json_string(&self) -> String {
        self.inner.to_json_value().to_string()
    }
    pub fn from_json_string_res(&mut self, text: &str) -> JsValue {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(val) => match qchip::Session::from_json_value(val) {
                Ok(s) => { self.replace(s); error::ok(JsValue::TRUE) }
                Err(e) => error::snapshot(&e),
            },
            Err(e) => error::err("invalid_snapshot", format!("{}", e), None),
        }
    }
}

impl Session {
    fn replace(&mut self, mut next: qchip::Session) {
        next.continue_from(self.inner.version());
        self.inner = next;
    }
}
