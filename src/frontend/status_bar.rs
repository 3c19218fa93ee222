//! Status bar panel: bottom bar showing connection, totals and error info.

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::frontend::topics::Topics;
use crate::frontend::widgets::{format_bytes, format_count, StatusIndicator, SummaryValue};
use crate::pipeline::SummaryStats;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub topics: &'a Topics,
    pub summary: SummaryStats,
    pub paused: bool,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Connection status + source name ===
        let mut indicator = StatusIndicator::for_status(ctx.topics.connection_status);
        if !ctx.topics.source_name.is_empty() {
            indicator = indicator.with_tooltip(ctx.topics.source_name.clone());
        }
        ui.add(indicator);

        if ctx.paused {
            ui.colored_label(Color32::YELLOW, RichText::new(t!("status.paused")).small());
        }

        ui.separator();

        // === Totals over the visible entries ===
        let summary = &ctx.summary;
        ui.add(SummaryValue::new(t!("summary.nodes"), format_count(summary.count as u64)));
        ui.add(SummaryValue::new(
            t!("summary.connections"),
            format_count(summary.connections),
        ));
        ui.add(SummaryValue::new(t!("summary.upload"), format_bytes(summary.upload)));
        ui.add(SummaryValue::new(t!("summary.download"), format_bytes(summary.download)));
        ui.add(SummaryValue::new(t!("summary.total"), format_bytes(summary.total)));

        if let Some(updated) = ctx.topics.last_update {
            ui.separator();
            ui.add(SummaryValue::new(
                t!("summary.updated"),
                updated.format("%H:%M:%S").to_string(),
            ));
        }

        // === Error message (right-aligned) ===
        if let Some(error) = ctx.topics.last_error.as_deref() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
