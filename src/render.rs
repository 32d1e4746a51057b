//! Rendering: draws the map scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it does not mutate any
//! application state.
//!
//! Layers, bottom first: background raster, region A, region B, restaurant
//! markers in store order. Hidden markers and markers with a non-finite
//! position are skipped.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{BACKGROUND_FILTER, REGION_FILL_ALPHA, REGION_STROKE_PX};
use crate::engine::EngineCore;
use crate::recompute::Marker;
use crate::region::{Region, RegionId};

/// Draw the full scene.
///
/// `dpr` is the device pixel ratio the canvas backing store was sized for.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    background: Option<&HtmlImageElement>,
    dpr: f64,
) -> Result<(), JsValue> {
    let cfg = core.config();

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, cfg.width, cfg.height);

    if let Some(image) = background {
        draw_background(ctx, image, cfg.width, cfg.height)?;
    }

    for id in RegionId::ALL {
        draw_region(ctx, core.region(id))?;
    }

    for marker in &core.pass().markers {
        draw_marker(ctx, marker)?;
    }

    Ok(())
}

fn draw_background(ctx: &CanvasRenderingContext2d, image: &HtmlImageElement, w: f64, h: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_filter(BACKGROUND_FILTER);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)?;
    ctx.restore();
    Ok(())
}

/// Regions are drawn at their anchor and moved by their translation.
fn draw_region(ctx: &CanvasRenderingContext2d, region: &Region) -> Result<(), JsValue> {
    let anchor = region.anchor();
    let offset = region.translation();

    ctx.save();
    ctx.translate(offset.x, offset.y)?;
    ctx.begin_path();
    ctx.arc(anchor.x, anchor.y, region.radius(), 0.0, TAU)?;

    ctx.set_global_alpha(REGION_FILL_ALPHA);
    ctx.set_fill_style_str(region.color());
    ctx.fill();

    ctx.set_global_alpha(1.0);
    ctx.set_line_width(REGION_STROKE_PX);
    ctx.set_stroke_style_str(region.color());
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_marker(ctx: &CanvasRenderingContext2d, marker: &Marker) -> Result<(), JsValue> {
    if !marker.is_drawable() {
        return Ok(());
    }
    ctx.begin_path();
    ctx.arc(marker.position.x, marker.position.y, marker.state.radius(), 0.0, TAU)?;
    ctx.set_fill_style_str(marker.state.fill());
    ctx.fill();
    Ok(())
}
