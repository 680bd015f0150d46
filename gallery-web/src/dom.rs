use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlCanvasElement, HtmlElement, Storage, Window};

pub fn window() -> Result<Window, JsValue> {
    Ok(web_sys::window().ok_or("No window")?)
}

pub fn document() -> Result<Document, JsValue> {
    Ok(window()?.document().ok_or("No document")?)
}

pub fn canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Element is not a canvas"))
}

/// Optional overlay element. Missing elements only disable their feature.
pub fn optional_element(document: &Document, id: &str) -> Option<HtmlElement> {
    let element = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if element.is_none() {
        log::warn!("#{id} not found; continuing without it");
    }
    element
}

pub fn set_display(element: &HtmlElement, value: &str) -> Result<(), JsValue> {
    element.style().set_property("display", value)
}

pub fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

pub fn add_class(element: &Element, class: &str) -> Result<(), JsValue> {
    element.class_list().add_1(class)
}

/// Click a temporary anchor so the browser downloads `href` as `filename`.
pub fn trigger_download(href: &str, filename: &str) -> Result<(), JsValue> {
    let document = document()?;
    let body = document.body().ok_or("No body")?;
    let link = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("Failed to create anchor"))?;
    link.set_href(href);
    link.set_download(filename);
    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}

pub fn alert(message: &str) -> Result<(), JsValue> {
    window()?.alert_with_message(message)
}

fn local_storage() -> Result<Storage, JsValue> {
    Ok(window()?.local_storage()?.ok_or("Local storage unavailable")?)
}

pub fn storage_get(key: &str) -> Option<String> {
    local_storage().ok()?.get_item(key).ok().flatten()
}

pub fn storage_set(key: &str, value: &str) -> Result<(), JsValue> {
    local_storage()?.set_item(key, value)
}

/// Inner window size in CSS pixels.
pub fn viewport_size() -> Result<(f32, f32), JsValue> {
    let window = window()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as f32, height as f32))
}

/// Set a custom property on the root element, e.g. `--card-hue`.
pub fn set_root_property(name: &str, value: &str) -> Result<(), JsValue> {
    let root = document()?
        .document_element()
        .ok_or("No document element")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("Root is not an HTML element"))?;
    root.style().set_property(name, value)
}

/// Page time in milliseconds, the clock `requestAnimationFrame` reports.
pub fn now_ms() -> Result<f64, JsValue> {
    Ok(window()?.performance().ok_or("Performance unavailable")?.now())
}
