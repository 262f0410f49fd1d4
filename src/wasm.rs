//! WASM bindings for browser-based conversion.
//!
//! Exposes in-memory FB2 → Markdown conversion to JavaScript via
//! wasm-bindgen. Images are not extracted: there is no filesystem to write
//! them to, so they render as placeholders.

use wasm_bindgen::prelude::*;

use crate::export::{ConvertOptions, convert_bytes};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert FB2 bytes to Markdown.
#[wasm_bindgen]
pub fn fb2_to_markdown(data: &[u8]) -> Result<String, JsValue> {
    let conversion =
        convert_bytes(data, &ConvertOptions::new()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(conversion.markdown)
}
