use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser handle to one editing session.
#[wasm_bindgen]
pub struct Session {
    pub(crate) inner: qchip::Session,
}

impl Session {
    pub fn rs_new(config: &qchip::ChipConfig) -> Session {
        Session { inner: qchip::Session::new(qchip::Chip::generate(config)) }
    }
    pub fn rs_version(&self) -> u64 {
        self.inner.version()
    }
}
