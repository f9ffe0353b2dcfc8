use crate::constants::{COLOR_SCHEME_QUERY, THEME_ATTRIBUTES};
use crate::events::ListenerGuard;
use crate::render::StaleColor;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web::MutationObserver)>;

/// Marks the colour stale when the root element's theme attributes change.
/// Disconnects when dropped.
pub struct ThemeWatcher {
    observer: web::MutationObserver,
    _callback: ObserverCallback,
}

impl ThemeWatcher {
    pub fn watch(document: &web::Document, stale: StaleColor) -> anyhow::Result<Self> {
        let root = document
            .document_element()
            .ok_or_else(|| anyhow::anyhow!("no document element"))?;
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |_records: js_sys::Array, _observer: web::MutationObserver| stale.set(true),
        )
            as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);
        let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("MutationObserver failed: {:?}", e))?;

        let filter: js_sys::Array = THEME_ATTRIBUTES.iter().map(|a| JsValue::from_str(a)).collect();
        let opts = web::MutationObserverInit::new();
        opts.set_attributes(true);
        opts.set_attribute_filter(&filter);
        observer
            .observe_with_options(&root, &opts)
            .map_err(|e| anyhow::anyhow!("observe failed: {:?}", e))?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ThemeWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Marks the colour stale when the OS light/dark preference flips.
///
/// `None` when the browser has no `matchMedia`.
pub fn wire_color_scheme(
    window: &web::Window,
    stale: StaleColor,
) -> anyhow::Result<Option<ListenerGuard>> {
    let Some(query) = window.match_media(COLOR_SCHEME_QUERY).ok().flatten() else {
        return Ok(None);
    };
    let target: &web::EventTarget = query.as_ref();
    let guard = ListenerGuard::attach(target, "change", None, move |_ev: web::Event| {
        stale.set(true)
    })?;
    Ok(Some(guard))
}
