use crate::render::Renderer;
use std::cell::RefCell;
use std::rc::Rc;
use trail_core::{Clock, EffectDriver, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
pub type DriverCell = RefCell<EffectDriver<RafScheduler>>;
pub type SharedDriver = Rc<DriverCell>;

/// `requestAnimationFrame` for a tick closure installed after construction.
pub struct RafScheduler {
    window: web::Window,
    tick: TickClosure,
}

impl RafScheduler {
    pub fn new(window: web::Window, tick: TickClosure) -> Self {
        Self { window, tick }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let tick = self.tick.borrow();
        let cb = tick.as_ref()?;
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        _ = self.window.cancel_animation_frame(handle);
    }
}

/// Install the per-frame callback and request the first frame.
///
/// The callback holds the driver weakly; dropping the last strong handle, or
/// tearing the driver down, ends the loop.
pub fn start_loop(
    tick: &TickClosure,
    driver: &SharedDriver,
    mut renderer: Renderer,
    clock: Clock,
) {
    let weak = Rc::downgrade(driver);
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(driver) = weak.upgrade() else {
            return;
        };
        let snapshot = driver.borrow_mut().frame(clock.now());
        match snapshot {
            Some(snap) => renderer.draw(&snap),
            None => renderer.clear(),
        }
    }) as Box<dyn FnMut()>));
    driver.borrow_mut().start();
}
