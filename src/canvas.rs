use crate::constants::CANVAS_STYLE;
use crate::dom;
use cloud_core::{BlobPath, DrawContext, Extent, RadialGradient, Surface};
use web_sys as web;

/// Canvas element with its 2D context, usable as the visible surface or as
/// an off-screen buffer.
pub struct WebSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    bounds: Extent,
    pixel_ratio: f64,
}

impl WebSurface {
    pub fn create() -> anyhow::Result<Option<Self>> {
        let canvas = dom::create_canvas()?;
        for (property, value) in CANVAS_STYLE {
            dom::set_style(&canvas, property, value);
        }
        let Some(ctx) = dom::context_2d(&canvas)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            canvas,
            ctx,
            bounds: Extent::default(),
            pixel_ratio: 1.0,
        }))
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    fn apply_pixel_ratio(&self) {
        let r = self.pixel_ratio;
        if let Err(e) = self.ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0) {
            log::warn!("[clouds] set_transform failed: {:?}", e);
        }
    }
}

impl DrawContext for WebSurface {
    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }
    fn translate(&mut self, x: f64, y: f64) {
        _ = self.ctx.translate(x, y);
    }
    fn rotate(&mut self, angle: f64) {
        _ = self.ctx.rotate(angle);
    }
    fn scale(&mut self, x: f64, y: f64) {
        _ = self.ctx.scale(x, y);
    }

    fn fill_path(&mut self, path: &BlobPath, fill: &RadialGradient) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(path.start.x, path.start.y);
        for seg in &path.segments {
            ctx.bezier_curve_to(
                seg.ctrl1.x,
                seg.ctrl1.y,
                seg.ctrl2.x,
                seg.ctrl2.y,
                seg.to.x,
                seg.to.y,
            );
        }
        ctx.close_path();

        let gradient = match ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, fill.radius) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("[clouds] gradient rejected: {:?}", e);
                return;
            }
        };
        for stop in &fill.stops {
            _ = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css());
        }
        #[allow(deprecated)]
        ctx.set_fill_style(&gradient);
        ctx.fill();
    }
}

impl Surface for WebSurface {
    fn extent(&self) -> Extent {
        Extent::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn bounds(&self) -> Extent {
        self.bounds
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize(&mut self, css: Extent, pixel_ratio: f64) {
        self.bounds = css;
        self.pixel_ratio = pixel_ratio;
        dom::sync_canvas_size(&self.canvas, css, css.scaled(pixel_ratio));
        // Resizing the backing store resets the context state.
        self.apply_pixel_ratio();
    }

    fn clear(&mut self) {
        let Extent { width, height } = self.extent();
        self.ctx.save();
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.restore();
    }

    fn copy_from(&mut self, source: &Self) {
        self.ctx.save();
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        if let Err(e) = self
            .ctx
            .draw_image_with_html_canvas_element(&source.canvas, 0.0, 0.0)
        {
            log::warn!("[clouds] buffer copy failed: {:?}", e);
        }
        self.ctx.restore();
    }
}
