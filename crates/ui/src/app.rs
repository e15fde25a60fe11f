use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use eframe::egui;
use log::{info, warn};
use perf_timeline_core::ingest::parse_tracks;
use perf_timeline_core::model::session::{NETWORK_TRACK, RENDER_TRACK, USER_INPUT_TRACK};
use perf_timeline_core::model::tracks_time_range;
use perf_timeline_core::text::format_ms;
use perf_timeline_core::{
    CommandBuffer, InteractionController, PlaybackCursor, RecordingSession, TimelineConfig,
    TimelineEvent, TimelineRenderer,
};

use crate::renderer;
use crate::theme::ThemeMode;

/// Keyboard pan step in pixels.
const PAN_STEP: f64 = 80.0;
/// Keyboard zoom step.
const ZOOM_STEP: f64 = 1.25;

/// Main application state.
pub struct TimelineApp {
    controller: InteractionController<CommandBuffer>,
    theme_mode: ThemeMode,
    /// Replay position, advanced every frame while playing.
    playback: PlaybackCursor,
    /// Seek requests from the event click handler.
    seek: Rc<Cell<Option<f64>>>,
    /// Last pointer position forwarded to the controller, in timeline space.
    last_pointer: Option<(f64, f64)>,
    error: Option<String>,
    /// Session data from an async load.
    pending_data: Arc<Mutex<Option<Vec<u8>>>>,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme_mode = ThemeMode::Dark;
        cc.egui_ctx.set_visuals(theme_mode.visuals());

        let pending_data: Arc<Mutex<Option<Vec<u8>>>> = Arc::new(Mutex::new(None));

        // On WASM, a `#demo` URL hash auto-loads the bundled sample session.
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(w) = web_sys::window()
                && w.location().hash().unwrap_or_default() == "#demo"
            {
                let pd = Arc::clone(&pending_data);
                let ctx = cc.egui_ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match Self::fetch_bytes("/assets/demo-session.json").await {
                        Ok(bytes) => {
                            if let Ok(mut lock) = pd.lock() {
                                *lock = Some(bytes);
                            }
                            ctx.request_repaint();
                        }
                        Err(e) => warn!("demo fetch failed: {e}"),
                    }
                });
            }
        }

        let renderer = TimelineRenderer::with_surface(
            TimelineConfig::default(),
            CommandBuffer::new(),
            0.0,
            0.0,
        );
        let mut controller = InteractionController::new(renderer);

        let seek = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seek);
        controller.set_on_event_click(move |event: &TimelineEvent| {
            sink.set(Some(event.start_time));
        });

        Self {
            controller,
            theme_mode,
            playback: PlaybackCursor::new(0.0, false),
            seek,
            last_pointer: None,
            error: None,
            pending_data,
        }
    }

    fn load_session(&mut self, data: &[u8]) {
        match parse_tracks(data) {
            Ok(tracks) => {
                info!("loaded session: {} tracks", tracks.len());
                self.controller.replace_tracks(tracks);
                self.controller.fit_to_tracks();
                self.playback = PlaybackCursor::new(0.0, false);
                self.controller.set_playback(Some(self.playback));
                self.error = None;
            }
            Err(e) => {
                warn!("failed to load session: {e}");
                self.error = Some(format!("Failed to load session: {e}"));
            }
        }
    }

    fn load_demo(&mut self) {
        let session = demo_session();
        self.controller.replace_tracks(session.snapshot());
        self.controller.fit_to_tracks();
        self.playback = PlaybackCursor::new(0.0, false);
        self.controller.set_playback(Some(self.playback));
        self.error = None;
    }

    fn session_end(&self) -> Option<f64> {
        tracks_time_range(self.controller.renderer().tracks()).map(|(_, end)| end)
    }

    fn toggle_playback(&mut self) {
        self.playback.is_playing = !self.playback.is_playing;
        if self.playback.is_playing
            && self
                .session_end()
                .is_some_and(|end| self.playback.current_time >= end)
        {
            self.playback.current_time = 0.0;
        }
        self.controller.set_playback(Some(self.playback));
    }

    /// Advance the replay by one frame's worth of wall-clock time.
    fn advance_playback(&mut self, ctx: &egui::Context) {
        if let Some(time) = self.seek.take() {
            self.playback.current_time = time;
            self.controller.set_playback(Some(self.playback));
        }
        if !self.playback.is_playing {
            return;
        }
        let dt_ms = f64::from(ctx.input(|i| i.stable_dt)) * 1000.0;
        self.playback.current_time += dt_ms;
        if let Some(end) = self.session_end()
            && self.playback.current_time >= end
        {
            self.playback.current_time = end;
            self.playback.is_playing = false;
        }
        self.controller.set_playback(Some(self.playback));
        ctx.request_repaint();
    }

    /// Forward this frame's pointer, wheel and keyboard input to the
    /// controller. Coordinates are relative to `area`.
    fn handle_input(&mut self, ui: &egui::Ui, area: egui::Rect, hovered: bool) {
        let local = |p: egui::Pos2| (f64::from(p.x - area.left()), f64::from(p.y - area.top()));
        let (pointer, pressed, released, scroll, zoom) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.raw_scroll_delta,
                i.zoom_delta(),
            )
        });

        let inside = pointer.filter(|p| hovered && area.contains(*p)).map(local);
        let dragging = self.controller.mouse_state().is_dragging;

        match inside {
            Some((x, y)) => {
                if pressed {
                    self.controller.pointer_down(x, y);
                }
                if self.last_pointer != Some((x, y)) {
                    self.controller.pointer_move(x, y);
                }
                if released {
                    self.controller.pointer_up(x, y);
                }
                if scroll.y.abs() > 0.1 {
                    // egui reports wheel-up as positive; the controller takes
                    // DOM-style deltas.
                    self.controller.handle_wheel(x, -f64::from(scroll.y));
                }
                if scroll.x.abs() > 0.1 {
                    self.controller.pan_by(f64::from(scroll.x));
                }
                if (zoom - 1.0).abs() > 0.001 {
                    self.controller.zoom_by(x, f64::from(zoom));
                }
            }
            None if dragging => {
                // Drags keep tracking outside the area until release.
                if let Some((x, y)) = pointer.map(local) {
                    self.controller.pointer_move(x, y);
                    if released {
                        self.controller.pointer_up(x, y);
                    }
                }
            }
            None if self.last_pointer.is_some() => self.controller.pointer_leave(),
            None => {}
        }
        self.last_pointer = inside;

        let center = f64::from(area.width()) / 2.0;
        ui.input(|i| {
            if i.key_pressed(egui::Key::A) || i.key_pressed(egui::Key::ArrowLeft) {
                self.controller.pan_by(PAN_STEP);
            }
            if i.key_pressed(egui::Key::D) || i.key_pressed(egui::Key::ArrowRight) {
                self.controller.pan_by(-PAN_STEP);
            }
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                self.controller.zoom_by(center, ZOOM_STEP);
            }
            if i.key_pressed(egui::Key::Minus) {
                self.controller.zoom_by(center, 1.0 / ZOOM_STEP);
            }
            if i.key_pressed(egui::Key::Num0) {
                self.controller.reset_view();
            }
            if i.key_pressed(egui::Key::F) {
                self.controller.fit_to_tracks();
            }
        });
        if ui.input(|i| i.key_pressed(egui::Key::Space)) {
            self.toggle_playback();
        }
    }

    fn take_dropped_file(ctx: &egui::Context) -> Option<Vec<u8>> {
        ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.bytes.as_ref().map(|bytes| bytes.to_vec()))
        })
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or("no window")?;
        let resp_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| format!("{e:?}"))?;
        let resp: web_sys::Response = resp_value.dyn_into().map_err(|_| "not a Response")?;
        if !resp.ok() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let buf = JsFuture::from(resp.array_buffer().map_err(|e| format!("{e:?}"))?)
            .await
            .map_err(|e| format!("{e:?}"))?;
        Ok(js_sys::Uint8Array::new(&buf).to_vec())
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pending = {
            let mut lock = self.pending_data.lock().unwrap_or_else(|e| e.into_inner());
            lock.take()
        };
        if let Some(data) = pending.or_else(|| Self::take_dropped_file(ctx)) {
            self.load_session(&data);
        }
        self.advance_playback(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Timeline");
                ui.separator();

                if ui.button("Open").clicked() {
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Session", &["json"])
                            .pick_file()
                        {
                            match std::fs::read(&path) {
                                Ok(data) => self.load_session(&data),
                                Err(e) => self.error = Some(format!("Failed to read file: {e}")),
                            }
                        }
                    }
                }
                if ui.button("Demo").clicked() {
                    self.load_demo();
                }
                ui.separator();

                let play_label = if self.playback.is_playing { "Pause" } else { "Play" };
                if ui.button(play_label).clicked() {
                    self.toggle_playback();
                }
                if ui.button("Fit").clicked() {
                    self.controller.fit_to_tracks();
                }
                if ui.button("Reset").clicked() {
                    self.controller.reset_view();
                }
                ui.separator();

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Dark",
                    ThemeMode::Light => "Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = self.theme_mode.toggled();
                    ctx.set_visuals(self.theme_mode.visuals());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.0}%", self.controller.viewport().scale() * 100.0));
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                    return;
                }
                let tracks = self.controller.renderer().tracks();
                if tracks.is_empty() {
                    ui.label("No session loaded: click Open or Demo, or drop a JSON file");
                    return;
                }
                let (width, _) = self.controller.renderer().size();
                let (start, end) = self.controller.viewport().visible_range(width);
                let events: usize = tracks.values().map(|t| t.events.len()).sum();
                ui.label(format!(
                    "Events: {events} | Viewing: {} – {} | Playback: {}",
                    format_ms(start),
                    format_ms(end),
                    format_ms(self.playback.current_time),
                ));
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let area = ui.available_rect_before_wrap();
                let response = ui.allocate_rect(area, egui::Sense::click_and_drag());

                let size = (f64::from(area.width()), f64::from(area.height()));
                if self.controller.renderer().size() != size {
                    self.controller.resize(size.0, size.1);
                }
                self.handle_input(ui, area, response.hovered() || response.dragged());

                let painter = ui.painter_at(area);
                if let Some(surface) = self.controller.renderer().surface() {
                    renderer::render_commands(
                        &painter,
                        surface.commands(),
                        area.min,
                        self.theme_mode,
                    );
                }
            });
    }
}

/// A small synthetic session: a page load, a click and the renders it causes.
fn demo_session() -> RecordingSession {
    let mut session = RecordingSession::with_standard_tracks();
    let events = [
        ("1", "GET /index.html", 0.0, 120.0, NETWORK_TRACK),
        ("2", "GET /app.js", 130.0, 210.0, NETWORK_TRACK),
        ("3", "GET /api/items", 420.0, 160.0, NETWORK_TRACK),
        ("1", "App", 350.0, 48.0, RENDER_TRACK),
        ("2", "ItemList", 590.0, 35.0, RENDER_TRACK),
        ("3", "ItemRow", 640.0, 6.0, RENDER_TRACK),
        ("4", "Modal", 712.0, 22.0, RENDER_TRACK),
        ("1", "click", 700.0, 4.0, USER_INPUT_TRACK),
        ("2", "keydown", 760.0, 2.0, USER_INPUT_TRACK),
    ];
    for (id, label, start, duration, track) in events {
        if let Err(e) = session.record(TimelineEvent::new(id, label, start, duration, track)) {
            warn!("demo event rejected: {e}");
        }
    }
    session
}
