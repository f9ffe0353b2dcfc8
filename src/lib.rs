#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use trail_core::{Clock, CursorEffect, CursorVariant, EffectDriver, TrailConfig};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod render;

use events::{ListenerGuard, SharedListeners, ThemeWatcher};
use frame::{RafScheduler, SharedDriver, TickClosure};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("trail-web starting");
    Ok(())
}

/// Everything one mounted trail owns. Dropping it releases all of it.
struct Mounted {
    driver: SharedDriver,
    tick: TickClosure,
    listeners: SharedListeners,
    resize: ListenerGuard,
    theme: Option<ThemeWatcher>,
    color_scheme: Option<ListenerGuard>,
    stale_color: render::StaleColor,
    canvas: web::HtmlCanvasElement,
}

impl Mounted {
    fn teardown(self) {
        self.driver.borrow_mut().teardown();
        // Resize first so it cannot rewire pointer listeners mid-teardown
        drop(self.resize);
        self.listeners.borrow_mut().clear();
        drop(self.theme);
        drop(self.color_scheme);
        self.tick.borrow_mut().take();
        self.canvas.remove();
        log::info!("[trail] unmounted");
    }
}

fn mount() -> anyhow::Result<Mounted> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let profile = dom::detect_profile(&window);
    let effect = CursorEffect::new(TrailConfig::for_profile(profile))?;
    let canvas = dom::create_overlay_canvas(&document)?;
    let renderer = render::Renderer::new(window.clone(), document.clone(), canvas.clone())?;
    let stale_color = renderer.stale_color();

    let clock = Clock::new();
    let tick: TickClosure = Rc::new(RefCell::new(None));
    let driver: SharedDriver = Rc::new(RefCell::new(EffectDriver::new(
        effect,
        RafScheduler::new(window.clone(), tick.clone()),
    )));

    let listeners: SharedListeners = Rc::new(RefCell::new(events::wire_pointer_listeners(
        &window, profile, &driver, clock,
    )?));
    let resize = events::wire_resize(
        &window,
        &canvas,
        &driver,
        &listeners,
        stale_color.clone(),
        clock,
    )?;
    // Theme tracking is best effort; a static colour is still a working trail
    let theme = ThemeWatcher::watch(&document, stale_color.clone())
        .map_err(|e| log::warn!("[render] theme changes not tracked: {:?}", e))
        .ok();
    let color_scheme = events::wire_color_scheme(&window, stale_color.clone())?;
    frame::start_loop(&tick, &driver, renderer, clock);

    log::info!("[trail] mounted ({:?})", profile);
    Ok(Mounted {
        driver,
        tick,
        listeners,
        resize,
        theme,
        color_scheme,
        stale_color,
        canvas,
    })
}

/// Handle returned to the page. Call `destroy()` on unmount; it is safe to call twice.
#[wasm_bindgen]
pub struct CursorTrail {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl CursorTrail {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CursorTrail, JsValue> {
        match mount() {
            Ok(m) => Ok(CursorTrail { inner: Some(m) }),
            Err(e) => {
                log::error!("mount error: {:?}", e);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    /// One of `default`, `text`, `hover`, `click`.
    pub fn set_variant(&self, name: &str) -> Result<(), JsValue> {
        let variant: CursorVariant = name
            .parse()
            .map_err(|e: trail_core::ParseVariantError| JsValue::from_str(&e.to_string()))?;
        self.with_effect(|fx| fx.set_variant(variant));
        Ok(())
    }

    pub fn cursor_enter(&self) {
        self.with_effect(|fx| fx.cursor_enter());
    }

    pub fn cursor_leave(&self) {
        self.with_effect(|fx| fx.cursor_leave());
    }

    pub fn variant(&self) -> String {
        let mut name = CursorVariant::Default.as_str();
        self.with_effect(|fx| name = fx.variant().as_str());
        name.to_string()
    }

    /// Re-read `--primary` on the next frame, for theme switches the page
    /// makes outside the root element's attributes.
    pub fn refresh_theme(&self) {
        if let Some(m) = &self.inner {
            m.stale_color.set(true);
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    pub fn destroy(&mut self) {
        if let Some(m) = self.inner.take() {
            m.teardown();
        }
    }
}

impl CursorTrail {
    fn with_effect(&self, f: impl FnOnce(&mut CursorEffect)) {
        if let Some(m) = &self.inner {
            f(m.driver.borrow_mut().effect_mut());
        }
    }
}

impl Drop for CursorTrail {
    fn drop(&mut self) {
        self.destroy();
    }
}
