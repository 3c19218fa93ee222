//! Toolbar panel: horizontal bar with source, polling and info groups.
//!
//! Sits between the menu bar and the traffic table.

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::config::settings::RuntimeSettings;
use crate::config::{SourceKind, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use crate::frontend::state::AppAction;
use crate::frontend::topics::Topics;
use crate::types::ConnectionStatus;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub topics: &'a Topics,
    pub settings: &'a RuntimeSettings,
    pub source_kind: &'a SourceKind,
}

/// Render the main application toolbar.
///
/// Returns actions to be applied by the app.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        // === Source group ===
        render_source_group(ui, ctx, &mut actions);

        ui.separator();

        // === Polling group ===
        render_polling_group(ui, ctx, &mut actions);

        // === Right-aligned info group ===
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            render_info_group(ui, ctx);
        });
    });

    actions
}

fn render_source_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    ui.label(format!("{}:", t!("app.source")));

    let is_mock = matches!(ctx.source_kind, SourceKind::Mock);
    if ui
        .selectable_label(is_mock, t!("app.use_mock_source").to_string())
        .clicked()
        && !is_mock
    {
        actions.push(AppAction::UseMockSource);
    }

    if ui.button(t!("app.open_json_source").to_string()).clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .set_title(t!("app.open_json_source").to_string())
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            actions.push(AppAction::UseJsonSource(path));
        }
    }

    if let SourceKind::JsonFile { path } = ctx.source_kind {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            ui.label(
                RichText::new(name)
                    .small()
                    .color(Color32::from_rgb(150, 150, 200)),
            )
            .on_hover_text(path.display().to_string());
        }
    }
}

/// A manual refresh also retries a failed or closed source, so it is only
/// held back while a connection attempt is in progress.
pub fn refresh_enabled(status: ConnectionStatus) -> bool {
    status != ConnectionStatus::Connecting
}

fn render_polling_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    if ui
        .add_enabled(
            refresh_enabled(ctx.topics.connection_status),
            egui::Button::new(t!("app.refresh").to_string()),
        )
        .on_hover_text("F5")
        .clicked()
    {
        actions.push(AppAction::RefreshSource);
    }

    let pause_text = if ctx.settings.paused {
        t!("app.resume")
    } else {
        t!("app.pause")
    };
    if ui
        .button(pause_text.to_string())
        .on_hover_text("P")
        .clicked()
    {
        actions.push(AppAction::TogglePause);
    }

    ui.label(t!("app.poll_interval").to_string());
    let mut interval = ctx.settings.poll_interval_ms;
    let response = ui.add(
        egui::DragValue::new(&mut interval)
            .range(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS)
            .speed(50),
    );
    if response.changed() {
        actions.push(AppAction::SetPollInterval(interval));
    }
}

fn render_info_group(ui: &mut Ui, ctx: &ToolbarContext<'_>) {
    let stats = &ctx.topics.stats;

    let rate = stats.success_rate();
    let rate_color = if rate >= 99.0 {
        Color32::from_rgb(100, 255, 100)
    } else if rate >= 80.0 {
        Color32::YELLOW
    } else {
        Color32::LIGHT_RED
    };
    ui.colored_label(rate_color, RichText::new(format!("{:.0}%", rate)).small())
        .on_hover_text(format!(
            "{} ok / {} failed, {} dropped, {} superseded",
            stats.successful_fetches,
            stats.failed_fetches,
            stats.dropped_snapshots,
            ctx.topics.snapshots_superseded
        ));
    ui.label(RichText::new(format!("{:.0} μs", stats.avg_fetch_time_us())).small());
}
