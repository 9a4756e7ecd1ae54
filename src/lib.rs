#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts cloud-drop canvases into host page elements.

use cloud_core::{Attachment, CloudConfig, CloudEngine, DropPool};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod canvas;
mod constants;
mod container;
mod dom;
mod host;

use container::WebContainer;
use host::WebHost;

thread_local! {
    // Every instance on the page shares this engine and its drop pool.
    static ENGINE: RefCell<Option<CloudEngine<WebHost>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[clouds] cloud-web starting");
    Ok(())
}

fn with_engine<R>(f: impl FnOnce(&mut CloudEngine<WebHost>) -> R) -> anyhow::Result<R> {
    ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            let host = Rc::new(WebHost::new()?);
            *slot = Some(CloudEngine::from_entropy(
                host,
                DropPool::shared(),
                CloudConfig::default(),
            ));
        }
        match slot.as_mut() {
            Some(engine) => Ok(f(engine)),
            None => Err(anyhow::anyhow!("engine unavailable")),
        }
    })
}

/// A running cloud animation. Dropping the handle on the JS side (`free`)
/// detaches it as well.
#[wasm_bindgen]
pub struct CloudHandle {
    attachment: Attachment,
}

#[wasm_bindgen]
impl CloudHandle {
    /// Stop the animation, remove its canvas and return its drops to the
    /// shared pool. Safe to call more than once.
    pub fn detach(&mut self) {
        self.attachment.detach();
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    #[wasm_bindgen(js_name = activeCount)]
    pub fn active_count(&self) -> usize {
        self.attachment.active_count()
    }
}

/// Start a cloud animation inside `container` with the default settings.
/// Returns `undefined` if the browser cannot provide a 2D canvas.
#[wasm_bindgen(js_name = attachClouds)]
pub fn attach_clouds(container: web::HtmlElement) -> Option<CloudHandle> {
    let container = Rc::new(WebContainer::new(container));
    match with_engine(|engine| engine.attach(container)) {
        Ok(attachment) => attachment.map(|attachment| CloudHandle { attachment }),
        Err(e) => {
            log::error!("[clouds] init error: {:?}", e);
            None
        }
    }
}

/// Like [`attach_clouds`] with settings overridden from a JSON object.
/// Unknown keys are ignored; missing keys keep their defaults.
#[wasm_bindgen(js_name = attachCloudsWithConfig)]
pub fn attach_clouds_with_config(container: web::HtmlElement, json: &str) -> Option<CloudHandle> {
    let config = match CloudConfig::from_json(json) {
        Ok(c) => c,
        Err(e) => {
            log::error!("[clouds] {}", e);
            return None;
        }
    };
    let container = Rc::new(WebContainer::new(container));
    match with_engine(|engine| engine.with_config(config).attach(container)) {
        Ok(attachment) => attachment.map(|attachment| CloudHandle { attachment }),
        Err(e) => {
            log::error!("[clouds] init error: {:?}", e);
            None
        }
    }
}
