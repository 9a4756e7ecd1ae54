use crate::constants::DEFAULT_PIXEL_RATIO;
use cloud_core::Extent;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn create_canvas() -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

/// Alpha-enabled 2D context, `None` when the browser refuses one.
pub fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<Option<web::CanvasRenderingContext2d>> {
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(ctx.and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok()))
}

pub fn bounding_box(element: &web::Element) -> Extent {
    let rect = element.get_bounding_client_rect();
    Extent::new(rect.width(), rect.height())
}

pub fn pixel_ratio() -> f64 {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(DEFAULT_PIXEL_RATIO);
    if dpr > 0.0 && dpr.is_finite() {
        dpr
    } else {
        DEFAULT_PIXEL_RATIO
    }
}

pub fn set_style(element: &web::HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("[clouds] style {} rejected: {:?}", property, e);
    }
}

/// Size the backing store in device pixels and the CSS box in CSS pixels.
pub fn sync_canvas_size(canvas: &web::HtmlCanvasElement, css: Extent, pixels: Extent) {
    canvas.set_width(pixels.width as u32);
    canvas.set_height(pixels.height as u32);
    set_style(canvas, "width", &format!("{}px", css.width));
    set_style(canvas, "height", &format!("{}px", css.height));
}
