use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop. The callback gets the frame timestamp in ms
/// and returns `false` to stop.
pub struct FrameLoop {
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
}

fn request(tick: &Tick) -> Option<i32> {
    let w = web::window()?;
    let borrowed = tick.borrow();
    let closure = borrowed.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

impl FrameLoop {
    pub fn start(mut frame: impl FnMut(f64) -> bool + 'static) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |t_ms: f64| {
            if !frame(t_ms) {
                handle_clone.set(None);
                return;
            }
            handle_clone.set(request(&tick_clone));
        }) as Box<dyn FnMut(f64)>));
        handle.set(request(&tick));
        Self { tick, handle }
    }

    /// Cancel the pending frame and drop the callback. Idempotent.
    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        // Breaks the closure's self-reference.
        self.tick.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
