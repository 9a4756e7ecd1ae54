use crate::canvas::WebSurface;
use crate::constants::{IDLE_FALLBACK_BUDGET_MS, IDLE_FALLBACK_DELAY_MS};
use cloud_core::host::{FrameCallback, IdleCallback, IntervalCallback};
use cloud_core::{AttachError, Host, IdleDeadline, TaskId};
use fnv::FnvHashMap;
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct BrowserDeadline(web::IdleDeadline);

impl IdleDeadline for BrowserDeadline {
    fn time_remaining(&self) -> f64 {
        self.0.time_remaining()
    }
}

/// Fixed slice for browsers without `requestIdleCallback`.
struct TimeoutDeadline {
    end: f64,
}

impl IdleDeadline for TimeoutDeadline {
    fn time_remaining(&self) -> f64 {
        self.end - instant::now()
    }
}

/// Browser window as the animation host.
pub struct WebHost {
    window: web::Window,
    native_idle: bool,
    intervals: RefCell<FnvHashMap<TaskId, Closure<dyn FnMut()>>>,
}

impl WebHost {
    pub fn new() -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let native_idle = js_sys::Reflect::has(&window, &"requestIdleCallback".into())
            .unwrap_or(false);
        if !native_idle {
            log::info!("[clouds] requestIdleCallback missing, using timeout slices");
        }
        Ok(Self {
            window,
            native_idle,
            intervals: RefCell::new(FnvHashMap::default()),
        })
    }
}

impl Host for WebHost {
    type Surface = WebSurface;

    fn now(&self) -> f64 {
        instant::now()
    }

    fn device_pixel_ratio(&self) -> f64 {
        crate::dom::pixel_ratio()
    }

    fn create_surface(&self) -> Result<WebSurface, AttachError> {
        match WebSurface::create() {
            Ok(Some(surface)) => Ok(surface),
            Ok(None) => Err(AttachError::UnsupportedContext(
                "canvas returned no 2d context".into(),
            )),
            Err(e) => Err(AttachError::UnsupportedContext(e.to_string())),
        }
    }

    fn request_frame(&self, callback: FrameCallback) -> TaskId {
        let js = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.window.request_animation_frame(js.unchecked_ref()) {
            Ok(handle) => TaskId(handle as u64),
            Err(e) => {
                log::error!("[clouds] requestAnimationFrame failed: {:?}", e);
                TaskId(0)
            }
        }
    }

    fn cancel_frame(&self, id: TaskId) {
        _ = self.window.cancel_animation_frame(id.0 as i32);
    }

    fn request_idle(&self, callback: IdleCallback) -> TaskId {
        let handle = if self.native_idle {
            let js = Closure::once_into_js(move |deadline: web::IdleDeadline| {
                callback(&BrowserDeadline(deadline))
            });
            self.window
                .request_idle_callback(js.unchecked_ref())
                .map(|h| h as i32)
        } else {
            let js = Closure::once_into_js(move || {
                callback(&TimeoutDeadline {
                    end: instant::now() + IDLE_FALLBACK_BUDGET_MS,
                })
            });
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    js.unchecked_ref(),
                    IDLE_FALLBACK_DELAY_MS,
                )
        };
        match handle {
            Ok(h) => TaskId(h as u64),
            Err(e) => {
                log::error!("[clouds] idle scheduling failed: {:?}", e);
                TaskId(0)
            }
        }
    }

    fn cancel_idle(&self, id: TaskId) {
        if self.native_idle {
            self.window.cancel_idle_callback(id.0 as u32);
        } else {
            self.window.clear_timeout_with_handle(id.0 as i32);
        }
    }

    fn set_interval(&self, period_ms: f64, callback: IntervalCallback) -> TaskId {
        let closure = Closure::wrap(callback);
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms.round() as i32,
            );
        match handle {
            Ok(h) => {
                let id = TaskId(h as u64);
                self.intervals.borrow_mut().insert(id, closure);
                id
            }
            Err(e) => {
                log::error!("[clouds] setInterval failed: {:?}", e);
                TaskId(0)
            }
        }
    }

    fn clear_interval(&self, id: TaskId) {
        self.window.clear_interval_with_handle(id.0 as i32);
        self.intervals.borrow_mut().remove(&id);
    }
}
