//! Custom widgets and formatters for the TrafficVis-RS UI
//!
//! # Widgets
//!
//! - [`StatusIndicator`] - Colored status dot with label (connected, error, etc.)
//! - [`SummaryValue`] - Small label/value pair used in the status bar
//!
//! # Formatters
//!
//! - [`format_bytes`] - Human-readable byte counts
//! - [`format_count`] - Integer with thousands separators

use egui::{Color32, Response, RichText, Ui, Widget};
use num_format::ToFormattedString;
use rust_i18n::t;

use crate::i18n::{self, Language};
use crate::types::ConnectionStatus;

/// A widget that displays a colored status indicator
pub struct StatusIndicator {
    color: Color32,
    label: String,
    tooltip: Option<String>,
}

impl StatusIndicator {
    /// Create a new status indicator with the given color and label
    pub fn new(color: Color32, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
            tooltip: None,
        }
    }

    /// Indicator for a source connection status, with a localized label
    pub fn for_status(status: ConnectionStatus) -> Self {
        let color = status_color(status);
        let label = match status {
            ConnectionStatus::Connected => t!("status.connected"),
            ConnectionStatus::Connecting => t!("status.connecting"),
            ConnectionStatus::Disconnected => t!("status.disconnected"),
            ConnectionStatus::Error => t!("status.error"),
        };
        Self::new(color, label)
    }

    /// Add a tooltip to the indicator
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

impl Widget for StatusIndicator {
    fn ui(self, ui: &mut Ui) -> Response {
        let response = ui.horizontal(|ui| {
            ui.colored_label(self.color, "●");
            ui.label(RichText::new(&self.label).small());
        });

        let response = response.response;

        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip)
        } else {
            response
        }
    }
}

/// Dot color for a connection status
pub fn status_color(status: ConnectionStatus) -> Color32 {
    match status {
        ConnectionStatus::Connected => Color32::GREEN,
        ConnectionStatus::Connecting => Color32::YELLOW,
        ConnectionStatus::Disconnected => Color32::GRAY,
        ConnectionStatus::Error => Color32::RED,
    }
}

/// A label/value pair rendered in small text
pub struct SummaryValue {
    label: String,
    value: String,
}

impl SummaryValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl Widget for SummaryValue {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{}:", self.label)).small().weak());
            ui.label(RichText::new(self.value).small().strong().monospace());
        })
        .response
    }
}

/// Format a byte count with binary units (KB = 1024 bytes)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Format an integer with the thousands grouping of the current language
pub fn format_count(value: u64) -> String {
    format_count_in(value, i18n::current_language())
}

/// Format an integer with the thousands grouping of `language`
pub fn format_count_in(value: u64, language: Language) -> String {
    value.to_formatted_string(&language.number_locale())
}
