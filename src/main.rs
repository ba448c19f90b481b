mod app;

use std::time::Duration;

use eframe::egui;

use stellate::config::{DeviceProfile, StarConfig};

fn main() {
    env_logger::init();

    let config = config_from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Stellate"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Stellate",
        options,
        Box::new(move |cc| {
            let app = app::StarApp::new(cc, config)?;
            Ok(Box::new(app))
        }),
    );
    if let Err(e) = result {
        log::error!("stellate exited with an error: {}", e);
        std::process::exit(1);
    }
}

/// Preset, seed and idle delay from `STELLATE_PROFILE`, `STELLATE_SEED` and
/// `STELLATE_IDLE_MS`.
fn config_from_env() -> StarConfig {
    let profile = match std::env::var("STELLATE_PROFILE") {
        Ok(name) => DeviceProfile::from_name(&name).unwrap_or_else(|| {
            log::warn!("unknown STELLATE_PROFILE '{}', using desktop", name);
            DeviceProfile::Desktop
        }),
        Err(_) => DeviceProfile::default(),
    };
    let mut config = StarConfig::for_device(profile);

    if let Ok(raw) = std::env::var("STELLATE_SEED") {
        match raw.trim().parse::<u64>() {
            Ok(seed) => config = config.with_seed(seed),
            Err(e) => log::warn!("ignoring STELLATE_SEED '{}': {}", raw, e),
        }
    }
    if let Ok(raw) = std::env::var("STELLATE_IDLE_MS") {
        match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => config = config.with_idle_delay(Duration::from_millis(ms)),
            Ok(_) => log::warn!("ignoring STELLATE_IDLE_MS '{}': must be positive", raw),
            Err(e) => log::warn!("ignoring STELLATE_IDLE_MS '{}': {}", raw, e),
        }
    }
    config
}
