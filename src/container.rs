use crate::canvas::WebSurface;
use crate::dom;
use cloud_core::{AttachError, Container, Extent, TaskId};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Observation {
    observer: web::ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

/// Host element the canvas is mounted into.
pub struct WebContainer {
    element: web::HtmlElement,
    next_id: Cell<u64>,
    observations: RefCell<FnvHashMap<TaskId, Observation>>,
}

impl WebContainer {
    pub fn new(element: web::HtmlElement) -> Self {
        Self {
            element,
            next_id: Cell::new(1),
            observations: RefCell::new(FnvHashMap::default()),
        }
    }
}

impl Container<WebSurface> for WebContainer {
    fn bounding_box(&self) -> Extent {
        dom::bounding_box(&self.element)
    }

    fn append_surface(&self, surface: &WebSurface) -> Result<(), AttachError> {
        self.element
            .append_child(surface.canvas())
            .map(|_| ())
            .map_err(|e| AttachError::Mount(format!("{:?}", e)))
    }

    fn remove_surface(&self, surface: &WebSurface) {
        if let Err(e) = self.element.remove_child(surface.canvas()) {
            log::warn!("[clouds] canvas already removed: {:?}", e);
        }
    }

    fn observe_resize(&self, on_resize: Box<dyn FnMut()>) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback = Closure::wrap(on_resize);
        match web::ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.element);
                self.observations.borrow_mut().insert(
                    id,
                    Observation {
                        observer,
                        _callback: callback,
                    },
                );
            }
            Err(e) => log::warn!("[clouds] ResizeObserver unavailable: {:?}", e),
        }
        id
    }

    fn disconnect_resize(&self, id: TaskId) {
        if let Some(obs) = self.observations.borrow_mut().remove(&id) {
            obs.observer.disconnect();
        }
    }
}
