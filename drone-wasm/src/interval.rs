use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// A `setInterval` registration that is cleared when dropped.
///
/// Holding one of these is the only way ticks reach the stepper, so
/// replacing or dropping it is how a run is stopped.
pub struct TickInterval {
    window: Window,
    id: Rc<Cell<Option<i32>>>,
    _callback: Closure<dyn FnMut()>,
}

impl TickInterval {
    /// Calls `on_tick` every `period_ms` until it returns `false` or the
    /// handle is dropped.
    pub fn every<F>(period_ms: i32, mut on_tick: F) -> Result<Self, JsValue>
    where
        F: FnMut() -> bool + 'static,
    {
        let window = web_sys::window().ok_or("no global window")?;
        let id = Rc::new(Cell::new(None));

        let callback = {
            let window = window.clone();
            let id = Rc::clone(&id);
            Closure::<dyn FnMut()>::new(move || {
                if !on_tick() {
                    if let Some(handle) = id.take() {
                        window.clear_interval_with_handle(handle);
                    }
                }
            })
        };

        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        id.set(Some(handle));

        Ok(Self {
            window,
            id,
            _callback: callback,
        })
    }

    /// False once the callback has asked to stop.
    pub fn is_active(&self) -> bool {
        self.id.get().is_some()
    }
}

impl Drop for TickInterval {
    fn drop(&mut self) {
        if let Some(handle) = self.id.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }
}
