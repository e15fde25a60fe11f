//! Browser bridge: a timeline bound to an HTML canvas.
//!
//! ```js
//! const view = new TimelineView(canvas);
//! view.replaceTracks(JSON.stringify(session));
//! view.onEventClick((event) => player.seek(event.startTime));
//! view.setPlayback(player.currentTime, player.playing);
//! view.setPixelRatio(window.devicePixelRatio);
//! view.autoResize(true);
//! ```

mod canvas;

use std::cell::RefCell;
use std::rc::Rc;

use perf_timeline_core::ingest::parse_tracks;
use perf_timeline_core::svg::render_svg;
use perf_timeline_core::text::ApproxTextMetrics;
use perf_timeline_core::{
    InteractionController, PlaybackCursor, TimelineConfig, TimelineEvent, TimelineRenderer,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
    MouseEvent, WheelEvent,
};

pub use canvas::{CanvasSurface, backing_size};

type Controller = InteractionController<CanvasSurface>;
type Listener = Closure<dyn FnMut(Event)>;

/// Route `log` records to the browser console.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::Level::Trace
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).ok();
}

/// Validate a session document and return the number of events it holds.
#[wasm_bindgen(js_name = countEvents)]
pub fn count_events(json: &str) -> Result<usize, JsError> {
    let tracks = parse_tracks(json.as_bytes()).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(tracks.values().map(|t| t.events.len()).sum())
}

/// Shared between the view and its DOM listeners.
struct Shared {
    controller: RefCell<Controller>,
    /// Events clicked during the current input dispatch, delivered once the
    /// controller borrow is released so the JS callback may call back in.
    clicked: RefCell<Vec<TimelineEvent>>,
    on_click: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn with_controller(&self, f: impl FnOnce(&mut Controller)) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => f(&mut controller),
            Err(_) => log::warn!("re-entrant timeline update ignored"),
        }
        self.deliver_clicks();
    }

    fn deliver_clicks(&self) {
        let clicked: Vec<TimelineEvent> = self.clicked.borrow_mut().drain(..).collect();
        if clicked.is_empty() {
            return;
        }
        let Some(callback) = self.on_click.borrow().clone() else {
            return;
        };
        for event in clicked {
            let arg = serde_json::to_string(&event)
                .ok()
                .and_then(|json| js_sys::JSON::parse(&json).ok())
                .unwrap_or(JsValue::NULL);
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                log::warn!("event click callback threw: {e:?}");
            }
        }
    }
}

/// A timeline rendering into a canvas and reacting to its pointer input.
#[wasm_bindgen]
pub struct TimelineView {
    shared: Rc<Shared>,
    canvas: HtmlCanvasElement,
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

#[wasm_bindgen]
impl TimelineView {
    /// Bind to `canvas`. `config_json` may override any layout setting.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> Result<TimelineView, JsError> {
        let config: TimelineConfig = match config_json {
            Some(json) => serde_json::from_str(&json).map_err(|e| JsError::new(&e.to_string()))?,
            None => TimelineConfig::default(),
        };
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("canvas 2d context unavailable"))?
            .ok_or_else(|| JsError::new("canvas 2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsError::new("not a 2d context"))?;

        let (width, height) = (f64::from(canvas.width()), f64::from(canvas.height()));
        let surface = CanvasSurface::new(ctx, width, height);
        let renderer = TimelineRenderer::with_surface(config, surface, width, height);

        let shared = Rc::new(Shared {
            controller: RefCell::new(InteractionController::new(renderer)),
            clicked: RefCell::new(Vec::new()),
            on_click: RefCell::new(None),
        });
        let sink = Rc::downgrade(&shared);
        shared
            .controller
            .borrow_mut()
            .set_on_event_click(move |event: &TimelineEvent| {
                if let Some(shared) = sink.upgrade() {
                    shared.clicked.borrow_mut().push(event.clone());
                }
            });

        let mut view = TimelineView {
            shared,
            canvas,
            listeners: Vec::new(),
        };
        view.attach_listeners()?;
        log::debug!("timeline view bound to {width}x{height} canvas");
        Ok(view)
    }

    /// Replace the displayed session with a JSON document.
    #[wasm_bindgen(js_name = replaceTracks)]
    pub fn replace_tracks(&self, json: &str) -> Result<(), JsError> {
        let tracks = parse_tracks(json.as_bytes()).map_err(|e| JsError::new(&e.to_string()))?;
        self.shared.with_controller(|c| c.replace_tracks(tracks));
        Ok(())
    }

    /// Move the replay cursor. `undefined` removes it.
    #[wasm_bindgen(js_name = setPlayback)]
    pub fn set_playback(&self, current_time: Option<f64>, is_playing: bool) {
        let cursor = current_time.map(|t| PlaybackCursor::new(t, is_playing));
        self.shared.with_controller(|c| c.set_playback(cursor));
    }

    /// Register the click callback; it receives the clicked event object.
    #[wasm_bindgen(js_name = onEventClick)]
    pub fn on_event_click(&self, callback: Option<js_sys::Function>) {
        *self.shared.on_click.borrow_mut() = callback;
    }

    /// Lay the timeline out at `width` x `height` CSS pixels and repaint.
    /// The backing store is sized by the current pixel ratio.
    pub fn resize(&self, width: f64, height: f64) {
        apply_size(&self.shared, &self.canvas, width, height);
    }

    /// Device pixels per CSS pixel, usually `window.devicePixelRatio`.
    #[wasm_bindgen(js_name = setPixelRatio)]
    pub fn set_pixel_ratio(&self, ratio: f64) {
        self.shared.with_controller(|c| {
            if let Some(surface) = c.renderer_mut().surface_mut() {
                surface.set_pixel_ratio(ratio);
            }
            let (width, height) = c.renderer().size();
            size_canvas(c, &self.canvas, width, height);
        });
    }

    /// Follow window resizes using the canvas's CSS box. Off by default.
    #[wasm_bindgen(js_name = autoResize)]
    pub fn auto_resize(&mut self, enabled: bool) -> Result<(), JsError> {
        let attached = self.listeners.iter().any(|(_, kind, _)| *kind == "resize");
        if enabled && !attached {
            self.attach_window_resize()?;
        } else if !enabled && attached {
            let (resize, rest): (Vec<_>, Vec<_>) = self
                .listeners
                .drain(..)
                .partition(|(_, kind, _)| *kind == "resize");
            self.listeners = rest;
            remove_listeners(resize);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setDarkMode)]
    pub fn set_dark_mode(&self, dark: bool) {
        self.shared.with_controller(|c| {
            if let Some(surface) = c.renderer_mut().surface_mut() {
                surface.set_dark(dark);
            }
            c.redraw();
        });
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) {
        self.shared.with_controller(Controller::reset_view);
    }

    #[wasm_bindgen(js_name = fitToTracks)]
    pub fn fit_to_tracks(&self) {
        self.shared.with_controller(Controller::fit_to_tracks);
    }

    /// The current view as a standalone SVG document.
    #[wasm_bindgen(js_name = toSvg)]
    pub fn to_svg(&self, dark: bool) -> String {
        let controller = self.shared.controller.borrow();
        let renderer = controller.renderer();
        let (width, height) = renderer.size();
        render_svg(
            &renderer.build_frame(&ApproxTextMetrics::default()),
            width,
            height,
            dark,
        )
    }

    /// The current frame's render commands as JSON, for custom backends.
    #[wasm_bindgen(js_name = renderCommands)]
    pub fn render_commands(&self) -> Result<String, JsError> {
        let controller = self.shared.controller.borrow();
        let commands = controller.renderer().build_frame(&ApproxTextMetrics::default());
        serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Remove DOM listeners and stop drawing. The view is inert afterwards.
    pub fn detach(&mut self) {
        self.detach_listeners();
        self.shared.with_controller(|c| {
            c.renderer_mut().detach_surface();
        });
        self.shared.on_click.borrow_mut().take();
    }
}

impl TimelineView {
    fn attach_listeners(&mut self) -> Result<(), JsError> {
        let canvas: EventTarget = self.canvas.clone().into();
        self.listen(&canvas, "wheel", |shared, event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let (x, delta_y) = (f64::from(wheel.offset_x()), wheel.delta_y());
            let mut consumed = false;
            shared.with_controller(|c| consumed = c.handle_wheel(x, delta_y));
            if consumed {
                wheel.prevent_default();
            }
        })?;
        self.listen(&canvas, "mousedown", |shared, event| {
            if let Some((x, y)) = offset(&event) {
                shared.with_controller(|c| c.pointer_down(x, y));
            }
        })?;
        self.listen(&canvas, "mousemove", |shared, event| {
            if let Some((x, y)) = offset(&event) {
                shared.with_controller(|c| c.pointer_move(x, y));
            }
        })?;
        self.listen(&canvas, "mouseup", |shared, event| {
            if let Some((x, y)) = offset(&event) {
                shared.with_controller(|c| c.pointer_up(x, y));
            }
        })?;
        self.listen(&canvas, "mouseleave", |shared, _| {
            shared.with_controller(Controller::pointer_leave);
        })?;

        Ok(())
    }

    fn attach_window_resize(&mut self) -> Result<(), JsError> {
        let Some(window) = web_sys::window() else {
            return Ok(());
        };
        let window: EventTarget = window.into();
        let element = self.canvas.clone();
        self.listen(&window, "resize", move |shared, _| {
            let (width, height) = (element.client_width(), element.client_height());
            if width > 0 && height > 0 {
                apply_size(shared, &element, f64::from(width), f64::from(height));
            }
        })
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl Fn(&Shared, Event) + 'static,
    ) -> Result<(), JsError> {
        let shared = Rc::downgrade(&self.shared);
        let closure: Listener = Closure::new(move |event: Event| {
            if let Some(shared) = shared.upgrade() {
                handler(&shared, event);
            }
        });

        // Wheel must be non-passive so the page does not scroll while zooming.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| JsError::new(&format!("failed to add {kind} listener")))?;
        self.listeners.push((target.clone(), kind, closure));
        Ok(())
    }

    fn detach_listeners(&mut self) {
        remove_listeners(std::mem::take(&mut self.listeners));
    }
}

impl Drop for TimelineView {
    fn drop(&mut self) {
        self.detach_listeners();
    }
}

fn remove_listeners(listeners: Vec<(EventTarget, &'static str, Listener)>) {
    for (target, kind, closure) in listeners {
        let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    }
}

/// Size the backing store for the surface's pixel ratio, then lay out and
/// repaint at the CSS size.
fn apply_size(shared: &Shared, canvas: &HtmlCanvasElement, width: f64, height: f64) {
    shared.with_controller(|c| size_canvas(c, canvas, width, height));
}

fn size_canvas(c: &mut Controller, canvas: &HtmlCanvasElement, width: f64, height: f64) {
    let ratio = c.renderer().surface().map_or(1.0, CanvasSurface::pixel_ratio);
    let (device_w, device_h) = backing_size(width, height, ratio);
    canvas.set_width(device_w);
    canvas.set_height(device_h);
    c.resize(width, height);
}

fn offset(event: &Event) -> Option<(f64, f64)> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|m| (f64::from(m.offset_x()), f64::from(m.offset_y())))
}
