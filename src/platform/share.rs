//! Browser side of sharing: share SDK, clipboard, Open Graph tags, URL hash

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::dom;
use crate::share::{COPY_SUCCESS_NOTICE, FeedPayload, OgTags, Route, ShareError};

// The share SDK is a plain script tag exposing `window.Kakao`
#[wasm_bindgen(inline_js = "
    export function share_sdk_init(key) {
        try {
            if (!window.Kakao) {
                return false;
            }
            if (!window.Kakao.isInitialized()) {
                window.Kakao.init(key);
            }
            return window.Kakao.isInitialized();
        } catch (e) {
            console.warn('Share SDK init failed:', e);
            return false;
        }
    }

    export function share_sdk_ready() {
        return !!(window.Kakao && window.Kakao.isInitialized());
    }

    export function share_sdk_send(payload) {
        window.Kakao.Link.sendDefault(JSON.parse(payload));
    }

    export function clipboard_write(text) {
        if (!navigator.clipboard) {
            return Promise.reject(new Error('clipboard unavailable'));
        }
        return navigator.clipboard.writeText(text);
    }
")]
extern "C" {
    fn share_sdk_init(key: &str) -> bool;
    fn share_sdk_ready() -> bool;
    #[wasm_bindgen(catch)]
    fn share_sdk_send(payload: &str) -> Result<(), JsValue>;
    fn clipboard_write(text: &str) -> js_sys::Promise;
}

fn meta_content(selector: &str) -> Option<String> {
    dom::document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .get_attribute("content")
        .filter(|s| !s.is_empty())
}

fn set_meta_content(selector: &str, content: &str) {
    if let Some(el) = dom::document().and_then(|d| d.query_selector(selector).ok().flatten()) {
        let _ = el.set_attribute("content", content);
    }
}

/// Initialize the share SDK with the key from `<meta name="share-app-key">`.
/// Hides `button_id` when that fails.
pub fn init_sdk(button_id: &str) -> bool {
    let ready = match meta_content("meta[name=\"share-app-key\"]") {
        Some(key) => share_sdk_init(&key),
        None => false,
    };
    if ready {
        log::info!("Share SDK initialized");
    } else {
        log::warn!("Share SDK failed to initialize - hiding share button");
        dom::set_hidden(button_id, true);
    }
    ready
}

pub fn og_image_url() -> Option<String> {
    meta_content("meta[property=\"og:image\"]")
}

pub fn apply_og_tags(tags: &OgTags) {
    set_meta_content("meta[property=\"og:title\"]", &tags.title);
    set_meta_content("meta[property=\"og:description\"]", &tags.description);
}

/// Page URL without its hash
pub fn page_base_url() -> Result<String, ShareError> {
    let window = web_sys::window().ok_or(ShareError::NoWindow)?;
    let href = window.location().href().map_err(|_| ShareError::NoWindow)?;
    Ok(href.split('#').next().unwrap_or_default().to_string())
}

pub fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Rewrite the URL hash without firing `hashchange`
pub fn push_route(route: &Route) {
    let Ok(base) = page_base_url() else { return };
    let url = format!("{}{}", base, route.to_hash());
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}

/// Copy `link` to the clipboard and tell the player how it went
pub async fn copy_link(link: String) {
    match JsFuture::from(clipboard_write(&link)).await {
        Ok(_) => dom::alert(COPY_SUCCESS_NOTICE),
        Err(e) => {
            let err = ShareError::Clipboard(format!("{e:?}"));
            log::error!("Link copy failed: {e:?}");
            dom::alert(&err.to_string());
        }
    }
}

/// Post a feed payload through the share SDK
pub fn share_feed(payload: &FeedPayload) -> Result<(), ShareError> {
    if !share_sdk_ready() {
        return Err(ShareError::SdkUnavailable);
    }
    let json = payload
        .to_json()
        .map_err(|e| ShareError::Payload(e.to_string()))?;
    share_sdk_send(&json).map_err(|e| ShareError::Payload(format!("{e:?}")))
}
