#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Timeline")
            .with_inner_size([1200.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "perf-timeline",
        options,
        Box::new(|cc| Ok(Box::new(perf_timeline_ui::TimelineApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}

// The web build starts through `perf_timeline_ui::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
