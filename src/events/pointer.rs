use crate::dom;
use crate::frame::{DriverCell, SharedDriver};
use crate::render::StaleColor;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use trail_core::{Clock, Profile};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The pointer listeners for the current profile; replaced when it changes.
pub type SharedListeners = Rc<RefCell<Vec<ListenerGuard>>>;

/// An attached event listener; detached when dropped.
pub struct ListenerGuard {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl ListenerGuard {
    pub fn attach(
        target: &web::EventTarget,
        event: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let res = match passive {
            Some(p) => {
                let opts = web::AddEventListenerOptions::new();
                opts.set_passive(p);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    event,
                    closure.as_ref().unchecked_ref(),
                    &opts,
                )
            }
            None => target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()),
        };
        res.map_err(|e| anyhow::anyhow!("addEventListener({}) failed: {:?}", event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Mouse listeners on desktop, touch listeners on touch devices.
pub fn wire_pointer_listeners(
    window: &web::Window,
    profile: Profile,
    driver: &SharedDriver,
    clock: Clock,
) -> anyhow::Result<Vec<ListenerGuard>> {
    let target: &web::EventTarget = window.as_ref();
    let weak = Rc::downgrade(driver);
    let guards = match profile {
        Profile::Desktop => vec![ListenerGuard::attach(
            target,
            "mousemove",
            None,
            on_mouse_move(weak, clock),
        )?],
        Profile::Mobile => vec![
            ListenerGuard::attach(
                target,
                "touchstart",
                Some(false),
                on_touch(weak.clone(), clock, true),
            )?,
            ListenerGuard::attach(
                target,
                "touchmove",
                Some(false),
                on_touch(weak.clone(), clock, false),
            )?,
            ListenerGuard::attach(target, "touchend", None, on_touch_end(weak, clock))?,
        ],
    };
    log::info!("[input] {} listener(s) for {:?}", guards.len(), profile);
    Ok(guards)
}

fn on_mouse_move(driver: Weak<DriverCell>, clock: Clock) -> impl FnMut(web::Event) {
    move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        if let Some(d) = driver.upgrade() {
            d.borrow_mut()
                .pointer_moved(ev.client_x() as f32, ev.client_y() as f32, clock.now());
        }
    }
}

fn on_touch(driver: Weak<DriverCell>, clock: Clock, start: bool) -> impl FnMut(web::Event) {
    move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::TouchEvent>() else {
            return;
        };
        let Some(touch) = ev.touches().get(0) else {
            return;
        };
        let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
        if let Some(d) = driver.upgrade() {
            let mut d = d.borrow_mut();
            if start {
                d.touch_started(x, y, clock.now());
            } else {
                d.pointer_moved(x, y, clock.now());
            }
        }
    }
}

fn on_touch_end(driver: Weak<DriverCell>, clock: Clock) -> impl FnMut(web::Event) {
    move |_ev: web::Event| {
        if let Some(d) = driver.upgrade() {
            d.borrow_mut().touch_ended(clock.now());
        }
    }
}

/// On every resize: match the backing store to the viewport, mark the colour
/// stale and re-detect the device profile.
///
/// A profile change re-tunes the driver and swaps the mouse listeners for touch
/// listeners (or back).
pub fn wire_resize(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    driver: &SharedDriver,
    listeners: &SharedListeners,
    stale_color: StaleColor,
    clock: Clock,
) -> anyhow::Result<ListenerGuard> {
    let target: &web::EventTarget = window.as_ref();
    let window = window.clone();
    let canvas = canvas.clone();
    let driver = Rc::downgrade(driver);
    let listeners = Rc::downgrade(listeners);
    ListenerGuard::attach(target, "resize", None, move |_ev: web::Event| {
        dom::sync_canvas_backing_size(&canvas);
        stale_color.set(true);

        let (Some(driver), Some(listeners)) = (driver.upgrade(), listeners.upgrade()) else {
            return;
        };
        let profile = dom::detect_profile(&window);
        let switched = driver.borrow_mut().switch_profile(profile);
        match switched {
            Ok(true) => {
                let mut guards = listeners.borrow_mut();
                guards.clear();
                match wire_pointer_listeners(&window, profile, &driver, clock) {
                    Ok(fresh) => *guards = fresh,
                    Err(e) => log::error!("[input] rewiring for {:?} failed: {:?}", profile, e),
                }
            }
            Ok(false) => {}
            Err(e) => log::error!("[trail] profile switch rejected: {}", e),
        }
    })
}
