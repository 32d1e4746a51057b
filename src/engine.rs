use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::{MapConfig, RegionSeed};
use crate::error::MapError;
use crate::hit::{Hit, hit_test};
use crate::input::{Button, Cursor, InputState};
use crate::price_filter::PriceFilter;
use crate::projection::{Point, Projection};
use crate::recompute::{Marker, Pass, recompute};
use crate::records::RecordStore;
use crate::region::{MapBounds, Region, RegionController, RegionId};
use crate::render;
use crate::tooltip::{TooltipContent, TooltipState, placement};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to apply to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The canvas must be redrawn.
    RenderNeeded,
    /// New text for the intersection counter.
    SetCountText(String),
    /// New value for a region's radius readout.
    SetRadiusReadout { id: RegionId, radius: f64 },
    /// Show the tooltip panel with `html` at page position (`left`, `top`).
    ShowTooltip { html: String, left: f64, top: f64 },
    HideTooltip,
    /// Deselect every option in the price multi-select.
    ResetPriceSelect,
    SetCursor(Cursor),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser
/// dependencies. Every handler mutates one controller, reruns the full
/// recomputation pass when filter state changed, and returns the actions the
/// page needs.
pub struct EngineCore {
    config: MapConfig,
    records: RecordStore,
    projection: Projection,
    regions: RegionController,
    price_filter: PriceFilter,
    input: InputState,
    tooltip: TooltipState,
    cursor: Cursor,
    pass: Pass,
}

impl EngineCore {
    /// Build the engine for a loaded record store and run the first pass.
    #[must_use]
    pub fn new(config: MapConfig, records: RecordStore) -> Self {
        let projection = Projection::fit_size(config.width, config.height, config.frame, config.projection);
        let seed = |s: &RegionSeed| Region::new(s.x, s.y, s.radius, s.color.clone());
        let regions = RegionController::new(
            MapBounds::new(config.width, config.height),
            config.radius_min,
            config.radius_max,
            seed(&config.region_a),
            seed(&config.region_b),
        );
        let mut core = Self {
            config,
            records,
            projection,
            regions,
            price_filter: PriceFilter::new(),
            input: InputState::Idle,
            tooltip: TooltipState::default(),
            cursor: Cursor::Default,
            pass: Pass::default(),
        };
        core.pass = core.compute_pass();
        core
    }

    fn compute_pass(&self) -> Pass {
        recompute(
            &self.records,
            &self.projection,
            self.regions.region(RegionId::A),
            self.regions.region(RegionId::B),
            &self.price_filter,
        )
    }

    /// Rerun the pass and queue counter and redraw updates.
    fn refresh(&mut self, actions: &mut Vec<Action>) {
        self.pass = self.compute_pass();
        actions.push(Action::SetCountText(self.pass.count_label()));
        actions.push(Action::RenderNeeded);
    }

    /// Actions that bring a freshly loaded page in line with the engine.
    #[must_use]
    pub fn initial_actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = RegionId::ALL
            .into_iter()
            .map(|id| Action::SetRadiusReadout { id, radius: self.regions.region(id).radius() })
            .collect();
        actions.push(Action::SetCountText(self.pass.count_label()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn set_cursor(&mut self, cursor: Cursor, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
    }

    fn hide_tooltip(&mut self, actions: &mut Vec<Action>) {
        if self.tooltip.hide() {
            actions.push(Action::HideTooltip);
        }
    }

    /// Hide the tooltip if its record stopped being drawn.
    fn drop_stale_tooltip(&mut self, actions: &mut Vec<Action>) {
        let stale = self
            .tooltip
            .hovered()
            .is_some_and(|i| !self.pass.markers.get(i).is_some_and(Marker::is_drawable));
        if stale {
            self.hide_tooltip(actions);
        }
    }

    // --- Pointer input ---

    /// Pointer pressed at `map_pt` (map pixels). Starts a region drag when the
    /// primary button lands on a region body.
    pub fn on_pointer_down(&mut self, map_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary {
            return actions;
        }
        if let Some(Hit::Region(id)) = hit_test(map_pt, &self.pass.markers, &self.regions) {
            self.input = InputState::DraggingRegion { id };
            self.hide_tooltip(&mut actions);
            self.set_cursor(Cursor::Grabbing, &mut actions);
        }
        actions
    }

    /// Pointer moved to `map_pt` (map pixels); `page_pt` is the same position
    /// in page coordinates, used to place the tooltip.
    pub fn on_pointer_move(&mut self, map_pt: Point, page_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(id) = self.input.dragging() {
            self.regions.on_drag(id, map_pt.x, map_pt.y);
            self.refresh(&mut actions);
            return actions;
        }

        match hit_test(map_pt, &self.pass.markers, &self.regions) {
            Some(Hit::Marker(index)) => {
                if self.tooltip.show(index) {
                    if let Some(record) = self.records.get(index) {
                        let at = placement(page_pt);
                        let html = TooltipContent::from_record(record).to_html();
                        actions.push(Action::ShowTooltip { html, left: at.x, top: at.y });
                    }
                }
                self.set_cursor(Cursor::Pointer, &mut actions);
            }
            Some(Hit::Region(_)) => {
                self.hide_tooltip(&mut actions);
                self.set_cursor(Cursor::Grab, &mut actions);
            }
            None => {
                self.hide_tooltip(&mut actions);
                self.set_cursor(Cursor::Default, &mut actions);
            }
        }
        actions
    }

    /// Pointer released. Ends any drag.
    pub fn on_pointer_up(&mut self, map_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.dragging().is_none() {
            return actions;
        }
        self.input = InputState::Idle;
        let cursor = match hit_test(map_pt, &self.pass.markers, &self.regions) {
            Some(Hit::Region(_)) => Cursor::Grab,
            Some(Hit::Marker(_)) => Cursor::Pointer,
            None => Cursor::Default,
        };
        self.set_cursor(cursor, &mut actions);
        actions
    }

    /// Pointer left the map. Hover ends; a drag in progress continues.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.dragging().is_none() {
            self.hide_tooltip(&mut actions);
            self.set_cursor(Cursor::Default, &mut actions);
        }
        actions
    }

    // --- Controls ---

    /// A region's radius slider moved.
    pub fn on_radius_input(&mut self, id: RegionId, radius: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let applied = self.regions.on_resize(id, radius);
        actions.push(Action::SetRadiusReadout { id, radius: applied });
        self.refresh(&mut actions);
        self.drop_stale_tooltip(&mut actions);
        actions
    }

    /// The price multi-select changed.
    pub fn set_price_selection<I, S>(&mut self, values: I) -> Vec<Action>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut actions = Vec::new();
        self.price_filter.set_selection(values);
        self.refresh(&mut actions);
        self.drop_stale_tooltip(&mut actions);
        actions
    }

    /// The clear-filter control was pressed.
    pub fn clear_price_filter(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::ResetPriceSelect];
        self.price_filter.clear();
        self.refresh(&mut actions);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[must_use]
    pub fn region(&self, id: RegionId) -> &Region {
        self.regions.region(id)
    }

    #[must_use]
    pub fn price_filter(&self) -> &PriceFilter {
        &self.price_filter
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    /// Store index of the record whose tooltip is showing.
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.tooltip.hovered()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Result of the most recent recomputation.
    #[must_use]
    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    #[must_use]
    pub fn intersection_count(&self) -> usize {
        self.pass.intersection_count
    }
}

/// The full map engine. Wraps `EngineCore` and owns the browser canvas.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: Option<HtmlImageElement>,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Bind `core` to a canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Dom`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, core: EngineCore) -> Result<Self, MapError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| MapError::Dom(format!("canvas context request failed: {e:?}")))?
            .ok_or_else(|| MapError::Dom("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MapError::Dom("2d context has unexpected type".into()))?;
        let mut engine = Self { canvas, ctx, background: None, dpr: 1.0, core };
        engine.set_device_pixel_ratio(1.0);
        Ok(engine)
    }

    /// Size the backing store for `dpr` while keeping the CSS size at the map frame.
    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let cfg = self.core.config();
        let (w, h) = (cfg.width, cfg.height);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (px_w, px_h) = ((w * self.dpr).round() as u32, (h * self.dpr).round() as u32);
        self.canvas.set_width(px_w);
        self.canvas.set_height(px_h);
        let style = self.canvas.style();
        for (prop, value) in [("width", format!("{w}px")), ("height", format!("{h}px"))] {
            if let Err(e) = style.set_property(prop, &value) {
                log::warn!("failed to set canvas {prop}: {e:?}");
            }
        }
    }

    /// Attach the background raster once it has loaded.
    pub fn set_background(&mut self, image: HtmlImageElement) {
        self.background = Some(image);
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // --- Delegated input ---

    pub fn on_pointer_down(&mut self, map_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(map_pt, button)
    }

    pub fn on_pointer_move(&mut self, map_pt: Point, page_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(map_pt, page_pt)
    }

    pub fn on_pointer_up(&mut self, map_pt: Point) -> Vec<Action> {
        self.core.on_pointer_up(map_pt)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_radius_input(&mut self, id: RegionId, radius: f64) -> Vec<Action> {
        self.core.on_radius_input(id, radius)
    }

    pub fn set_price_selection(&mut self, values: Vec<String>) -> Vec<Action> {
        self.core.set_price_selection(values)
    }

    pub fn clear_price_filter(&mut self) -> Vec<Action> {
        self.core.clear_price_filter()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(&self.ctx, &self.core, self.background.as_ref(), self.dpr)
    }
}
