//! Traffic table panel: one row per visible node.
//!
//! Column headers for sortable fields are clickable and emit
//! [`AppAction::SetSortField`]. The active column carries a direction arrow.

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::config::settings::{SortField, ViewState};
use crate::frontend::state::AppAction;
use crate::frontend::widgets::{format_bytes, format_count};
use crate::pipeline::ClassifiedEntry;

/// Context needed to render the traffic table.
pub struct TrafficTableContext<'a> {
    /// Visible entries, already filtered and sorted
    pub entries: &'a [ClassifiedEntry],
    pub view: ViewState,
    /// Whether any traffic snapshot has been received yet
    pub has_data: bool,
}

/// Header text for a sortable column, with the arrow if it is active
pub fn header_text(field: SortField, view: &ViewState) -> String {
    let label = t!(field.label_key());
    match view.arrow_for(field) {
        Some(arrow) => format!("{} {}", label, arrow),
        None => label.into_owned(),
    }
}

/// Text color for a node type
fn type_color(entry: &ClassifiedEntry) -> Color32 {
    if entry.is_unknown() {
        Color32::GRAY
    } else if crate::pipeline::is_tunnel_entry(entry) {
        Color32::LIGHT_BLUE
    } else {
        Color32::KHAKI
    }
}

/// Render the filter toggle above the table.
pub fn render_filter_bar(ui: &mut Ui, view: &ViewState, actions: &mut Vec<AppAction>) {
    ui.horizontal(|ui| {
        let mut hide = view.hide_non_tunnel_entries;
        if ui.checkbox(&mut hide, t!("table.hide_non_tunnel").to_string()).changed() {
            actions.push(AppAction::ToggleHideNonTunnelEntries);
        }
    });
}

fn sort_header(ui: &mut Ui, field: SortField, view: &ViewState, actions: &mut Vec<AppAction>) {
    let active = view.sort_field == field;
    let text = RichText::new(header_text(field, view)).strong();
    if ui.selectable_label(active, text).clicked() {
        actions.push(AppAction::SetSortField(field));
    }
}

/// Render the traffic table.
///
/// Returns the actions triggered by header clicks.
pub fn render_traffic_table(ui: &mut Ui, ctx: &TrafficTableContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    render_filter_bar(ui, &ctx.view, &mut actions);
    ui.separator();

    if ctx.entries.is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            let message = if ctx.has_data {
                t!("table.no_matches")
            } else {
                t!("table.no_data")
            };
            ui.label(RichText::new(message).weak());
        });
        return actions;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("traffic_table")
                .num_columns(6)
                .striped(true)
                .spacing([16.0, 6.0])
                .min_col_width(64.0)
                .show(ui, |ui| {
                    sort_header(ui, SortField::Name, &ctx.view, &mut actions);
                    ui.label(RichText::new(t!("table.type")).strong());
                    ui.label(RichText::new(t!("table.upload")).strong());
                    ui.label(RichText::new(t!("table.download")).strong());
                    sort_header(ui, SortField::Total, &ctx.view, &mut actions);
                    sort_header(ui, SortField::Connections, &ctx.view, &mut actions);
                    ui.end_row();

                    for entry in ctx.entries {
                        ui.label(&entry.node_name);
                        ui.colored_label(type_color(entry), &entry.node_type);
                        ui.monospace(format_bytes(entry.upload));
                        ui.monospace(format_bytes(entry.download));
                        ui.monospace(format_bytes(entry.total));
                        ui.monospace(format_count(entry.connection_count));
                        ui.end_row();
                    }
                });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::SortOrder;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_header_text_marks_active_column() {
        crate::i18n::set_language(crate::i18n::Language::English);
        let view = ViewState {
            sort_field: SortField::Name,
            sort_order: SortOrder::Asc,
            hide_non_tunnel_entries: false,
        };
        assert_eq!(header_text(SortField::Name, &view), "Name ▲");
        assert_eq!(header_text(SortField::Total, &view), "Total");
    }

    #[test]
    fn test_type_color() {
        let unknown = ClassifiedEntry {
            node_name: "MATCH".into(),
            upload: 0,
            download: 0,
            total: 0,
            connection_count: 0,
            node_type: crate::pipeline::UNKNOWN_NODE_TYPE.into(),
        };
        assert_eq!(type_color(&unknown), Color32::GRAY);

        let proxy = ClassifiedEntry {
            node_type: "Trojan".into(),
            ..unknown
        };
        assert_eq!(type_color(&proxy), Color32::LIGHT_BLUE);
    }
}
