//! Small DOM helpers for the HUD and screens
//!
//! Missing elements are ignored; the page layout is owned by `index.html`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

/// Toggle the `hidden` class
pub fn set_hidden(id: &str, hidden: bool) {
    set_class(id, "hidden", hidden);
}

pub fn set_class(id: &str, class: &str, on: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force(class, on);
    }
}

pub fn set_disabled(id: &str, disabled: bool) {
    if let Some(btn) = element(id).and_then(|el| el.dyn_into::<HtmlButtonElement>().ok()) {
        btn.set_disabled(disabled);
    }
}

/// Blocking user-visible notice
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Attach a click handler that lives for the rest of the page
pub fn on_click(el: &Element, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
    let closure = Closure::<dyn FnMut(_)>::new(handler);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn on_click_id(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
    match element(id) {
        Some(el) => on_click(&el, handler),
        None => log::warn!("No #{id} element to attach a click handler to"),
    }
}
