//! F3 debug overlay.

use eframe::egui;

use stellate::interaction::DebugSnapshot;

pub fn show(ctx: &egui::Context, snap: &DebugSnapshot, open_menus: usize) {
    egui::Window::new("stellate")
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("stellate_debug_grid")
                .num_columns(2)
                .spacing([12.0, 2.0])
                .show(ui, |ui| {
                    row(ui, "mode", snap.mode.to_string());
                    row(
                        ui,
                        "angles",
                        format!("{:.2} {:.2} {:.2}", snap.angles.x, snap.angles.y, snap.angles.z),
                    );
                    row(ui, "spin", format!("{:.5} rad/f", snap.angular_speed));
                    row(
                        ui,
                        "momentum",
                        format!("{:.4} {:.4} px/ms", snap.momentum.x, snap.momentum.y),
                    );
                    row(ui, "ring", format!("{:.2}", snap.ring_opacity));
                    row(
                        ui,
                        "active",
                        snap.active_vertex
                            .map_or_else(|| "-".to_string(), |v| v.to_string()),
                    );
                    row(ui, "locked", snap.word_field_locked.to_string());
                    row(ui, "menus", open_menus.to_string());
                    row(
                        ui,
                        "idle",
                        snap.idle_remaining
                            .map_or_else(|| "-".to_string(), |d| format!("{} ms", d.as_millis())),
                    );
                    row(ui, "scale", format!("{:.3}", snap.scale));
                });
        });
}

fn row(ui: &mut egui::Ui, key: &str, value: String) {
    ui.monospace(key);
    ui.monospace(value);
    ui.end_row();
}
