use crate::interop::{arr_str, new_obj, set_kv};
use qchip::{ConfigError, ImportError, PersistError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_mode(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_mode", "mode must be one of Topology, Qubit, Coupler, QubitAttr, CouplerAttr", Some(d.into()))
}

#[inline]
pub fn invalid_preset(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_preset", format!("unknown preset '{}'", got), Some(d.into()))
}

pub fn config(e: &ConfigError) -> JsValue {
    use qchip::geometry::limits::MAX_NAME_LENGTH;
    match *e {
        ConfigError::Size { width, height, max_w, max_h } => {
            if width == 0 || width > max_w {
                out_of_range("width", 1.0, max_w as f64, width as f64)
            } else {
                out_of_range("height", 1.0, max_h as f64, height as f64)
            }
        }
        ConfigError::NameLength(got, _) => out_of_range("name_length", 0.0, MAX_NAME_LENGTH as f64, got as f64),
        ConfigError::StartIndex { start, width, height } => {
            let max = u32::MAX as f64 - width as f64 * height as f64;
            out_of_range("start_index", 0.0, max, start as f64)
        }
    }
}

pub fn import(e: &ImportError) -> JsValue {
    match e {
        ImportError::Parse(p) => err("parse_error", p.to_string(), None),
        ImportError::Shape(_) => err("invalid_shape", e.to_string(), None),
        ImportError::NoValidNames { unknown, disabled } => {
            let d = new_obj();
            set_kv(&d, "unknown", &arr_str(unknown).into());
            set_kv(&d, "disabled", &arr_str(disabled).into());
            err("no_valid_names", e.to_string(), Some(d.into()))
        }
    }
}

pub fn snapshot(e: &PersistError) -> JsValue {
    match e {
        PersistError::Preset(p) => invalid_preset(&p.0),
        _ => {
            let d = new_obj(); set_kv(&d, "reason", &JsValue::from_str(e.code()));
            err("invalid_snapshot", e.to_string(), Some(d.into()))
        }
    }
}
