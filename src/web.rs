//! Browser entry point: loads data, binds the engine to the page, and applies
//! engine actions to the DOM.
//!
//! Setup runs strictly after the restaurant table has loaded. Any failure
//! before that point is fatal to the view: it is logged and no handler is
//! wired. After setup every DOM event runs one synchronous engine call and
//! applies the returned actions.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlOptionElement, HtmlSelectElement, MouseEvent, Window,
};

use crate::config::{ElementIds, MapConfig};
use crate::engine::{Action, Engine, EngineCore};
use crate::error::MapError;
use crate::input::{Button, client_to_map};
use crate::projection::Point;
use crate::records::RecordStore;
use crate::region::RegionId;

fn dom_err(context: &str) -> impl Fn(JsValue) -> MapError + '_ {
    move |e| MapError::Dom(format!("{context}: {e:?}"))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, MapError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| MapError::Dom(format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| MapError::Dom(format!("element #{id} has unexpected type")))
}

/// Host page elements the engine's actions are applied to.
struct DomSurface {
    radius_a: HtmlInputElement,
    radius_a_value: Element,
    radius_b: HtmlInputElement,
    radius_b_value: Element,
    price_select: HtmlSelectElement,
    clear_price_filter: Element,
    tooltip: HtmlElement,
    count: Element,
}

impl DomSurface {
    fn bind(document: &Document, ids: &ElementIds) -> Result<Self, MapError> {
        Ok(Self {
            radius_a: element_by_id(document, &ids.radius_a)?,
            radius_a_value: element_by_id(document, &ids.radius_a_value)?,
            radius_b: element_by_id(document, &ids.radius_b)?,
            radius_b_value: element_by_id(document, &ids.radius_b_value)?,
            price_select: element_by_id(document, &ids.price_select)?,
            clear_price_filter: element_by_id(document, &ids.clear_price_filter)?,
            tooltip: element_by_id(document, &ids.tooltip)?,
            count: count_element(document, ids)?,
        })
    }

    fn radius_controls(&self, id: RegionId) -> (&HtmlInputElement, &Element) {
        match id {
            RegionId::A => (&self.radius_a, &self.radius_a_value),
            RegionId::B => (&self.radius_b, &self.radius_b_value),
        }
    }

    /// Values currently selected in the price multi-select.
    fn selected_prices(&self) -> Vec<String> {
        let options = self.price_select.selected_options();
        (0..options.length())
            .filter_map(|i| options.item(i))
            .filter_map(|el| el.dyn_ref::<HtmlOptionElement>().map(HtmlOptionElement::value))
            .collect()
    }

    /// Fill an empty multi-select with the tiers found in the data.
    fn populate_prices(&self, document: &Document, tiers: &[String]) -> Result<(), MapError> {
        if self.price_select.length() > 0 {
            return Ok(());
        }
        for tier in tiers {
            let option: HtmlOptionElement = document
                .create_element("option")
                .map_err(dom_err("create option"))?
                .dyn_into()
                .map_err(|_| MapError::Dom("option element has unexpected type".into()))?;
            option.set_value(tier);
            option.set_text(tier);
            self.price_select.append_child(&option).map_err(dom_err("append option"))?;
        }
        Ok(())
    }

    fn set_style(&self, prop: &str, value: &str) {
        if let Err(e) = self.tooltip.style().set_property(prop, value) {
            log::warn!("failed to set tooltip {prop}: {e:?}");
        }
    }
}

/// The counter element, created inside the controls panel when the page lacks one.
fn count_element(document: &Document, ids: &ElementIds) -> Result<Element, MapError> {
    if let Some(el) = document.get_element_by_id(&ids.intersection_count) {
        return Ok(el);
    }
    let controls: Element = element_by_id(document, &ids.controls)?;
    let el = document.create_element("div").map_err(dom_err("create counter"))?;
    el.set_id(&ids.intersection_count);
    el.set_attribute("style", "margin-top: 20px").map_err(dom_err("style counter"))?;
    controls.append_child(&el).map_err(dom_err("append counter"))?;
    Ok(el)
}

struct App {
    engine: RefCell<Engine>,
    dom: DomSurface,
}

impl App {
    fn apply(&self, actions: &[Action]) {
        let mut render = false;
        for action in actions {
            match action {
                Action::RenderNeeded => render = true,
                Action::SetCountText(text) => self.dom.count.set_text_content(Some(text.as_str())),
                Action::SetRadiusReadout { id, radius } => {
                    let (input, readout) = self.dom.radius_controls(*id);
                    input.set_value_as_number(*radius);
                    readout.set_text_content(Some(&radius.to_string()));
                }
                Action::ShowTooltip { html, left, top } => {
                    self.dom.tooltip.set_inner_html(html);
                    self.dom.set_style("display", "block");
                    self.dom.set_style("left", &format!("{left}px"));
                    self.dom.set_style("top", &format!("{top}px"));
                }
                Action::HideTooltip => self.dom.set_style("display", "none"),
                Action::ResetPriceSelect => self.dom.price_select.set_selected_index(-1),
                Action::SetCursor(cursor) => {
                    let engine = self.engine.borrow();
                    if let Err(e) = engine.canvas().style().set_property("cursor", cursor.css()) {
                        log::warn!("failed to set cursor: {e:?}");
                    }
                }
            }
        }
        if render {
            self.render();
        }
    }

    fn render(&self) {
        if let Err(e) = self.engine.borrow().render() {
            log::error!("render failed: {e:?}");
        }
    }

    /// Pointer position in map pixels and in page pixels.
    fn pointer(&self, ev: &MouseEvent) -> (Point, Point) {
        let engine = self.engine.borrow();
        let canvas = engine.canvas();
        let rect = canvas.get_bounding_client_rect();
        let map_pt = client_to_map(
            Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
            Point::new(rect.left(), rect.top()),
            Point::new(f64::from(canvas.client_left()), f64::from(canvas.client_top())),
        );
        let page_pt = Point::new(f64::from(ev.page_x()), f64::from(ev.page_y()));
        (map_pt, page_pt)
    }
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), MapError> {
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .map_err(dom_err(event))?;
    // Listeners live as long as the page.
    cb.forget();
    Ok(())
}

fn listen_mouse(
    target: &EventTarget,
    event: &str,
    app: &Rc<App>,
    mut handler: impl FnMut(&App, &MouseEvent) + 'static,
) -> Result<(), MapError> {
    let app = Rc::clone(app);
    listen(target, event, move |ev| {
        if let Some(mouse) = ev.dyn_ref::<MouseEvent>() {
            handler(&*app, mouse);
        }
    })
}

fn wire(window: &Window, app: &Rc<App>) -> Result<(), MapError> {
    let canvas: EventTarget = app.engine.borrow().canvas().clone().into();

    listen_mouse(&canvas, "mousedown", app, |app, ev| {
        let (map_pt, _) = app.pointer(ev);
        let actions = app.engine.borrow_mut().on_pointer_down(map_pt, Button::from_dom(ev.button()));
        if app.engine.borrow().core.input().dragging().is_some() {
            ev.prevent_default();
        }
        app.apply(&actions);
    })?;
    listen_mouse(window, "mousemove", app, |app, ev| {
        let (map_pt, page_pt) = app.pointer(ev);
        let actions = app.engine.borrow_mut().on_pointer_move(map_pt, page_pt);
        app.apply(&actions);
    })?;
    listen_mouse(window, "mouseup", app, |app, ev| {
        let (map_pt, _) = app.pointer(ev);
        let actions = app.engine.borrow_mut().on_pointer_up(map_pt);
        app.apply(&actions);
    })?;
    listen_mouse(&canvas, "mouseleave", app, |app, _| {
        let actions = app.engine.borrow_mut().on_pointer_leave();
        app.apply(&actions);
    })?;

    for id in RegionId::ALL {
        let (input, _) = app.dom.radius_controls(id);
        let target: EventTarget = input.clone().into();
        let handle = Rc::clone(app);
        listen(&target, "input", move |_| {
            let (input, _) = handle.dom.radius_controls(id);
            let radius = input.value_as_number();
            let actions = handle.engine.borrow_mut().on_radius_input(id, radius);
            handle.apply(&actions);
        })?;
    }

    let select: EventTarget = app.dom.price_select.clone().into();
    let handle = Rc::clone(app);
    listen(&select, "change", move |_| {
        let selected = handle.dom.selected_prices();
        let actions = handle.engine.borrow_mut().set_price_selection(selected);
        handle.apply(&actions);
    })?;

    let clear: EventTarget = app.dom.clear_price_filter.clone().into();
    let handle = Rc::clone(app);
    listen(&clear, "click", move |_| {
        let actions = handle.engine.borrow_mut().clear_price_filter();
        handle.apply(&actions);
    })?;

    Ok(())
}

fn load_background(app: &Rc<App>, url: &str) -> Result<(), MapError> {
    let image = HtmlImageElement::new().map_err(dom_err("create image"))?;
    let target: EventTarget = image.clone().into();
    let handle = Rc::clone(app);
    let loaded = image.clone();
    listen(&target, "load", move |_| {
        handle.engine.borrow_mut().set_background(loaded.clone());
        handle.render();
    })?;
    listen(&target, "error", |_| log::warn!("background image failed to load"))?;
    image.set_src(url);
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, MapError> {
    let fetch_err = |message: String| MapError::Fetch { url: url.to_string(), message };
    let resp = gloo_net::http::Request::get(url).send().await.map_err(|e| fetch_err(e.to_string()))?;
    if !(200..300).contains(&resp.status()) {
        return Err(fetch_err(format!("status {}", resp.status())));
    }
    resp.text().await.map_err(|e| fetch_err(e.to_string()))
}

async fn run() -> Result<(), MapError> {
    let window = web_sys::window().ok_or_else(|| MapError::Dom("no window".into()))?;
    let document = window.document().ok_or_else(|| MapError::Dom("no document".into()))?;

    let container: Element = element_by_id(&document, &ElementIds::default().container)?;
    let config = match container.get_attribute("data-config") {
        Some(raw) => {
            log::debug!("applying map config override");
            MapConfig::from_json(&raw)?
        }
        None => MapConfig::default(),
    };

    let text = fetch_text(&config.data_url).await?;
    let records = RecordStore::from_csv(&text)?;

    let dom = DomSurface::bind(&document, &config.elements)?;
    dom.populate_prices(&document, &records.price_tiers())?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(dom_err("create canvas"))?
        .dyn_into()
        .map_err(|_| MapError::Dom("canvas element has unexpected type".into()))?;
    container.append_child(&canvas).map_err(dom_err("append canvas"))?;

    let background_url = config.background_url.clone();
    let mut engine = Engine::new(canvas, EngineCore::new(config, records))?;
    engine.set_device_pixel_ratio(window.device_pixel_ratio());
    let initial = engine.core.initial_actions();
    let count = engine.core.records().len();

    let app = Rc::new(App { engine: RefCell::new(engine), dom });
    wire(&window, &app)?;
    load_background(&app, &background_url)?;
    app.apply(&initial);

    log::info!("map ready with {count} restaurants");
    Ok(())
}

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    // A second init (e.g. hot reload) keeps the existing logger.
    console_log::init_with_level(level).unwrap_or_default();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            log::error!("restaurant map failed to load: {e}");
        }
    });
}
