//! Frontend module for egui UI
//!
//! This module provides the main UI using eframe/egui. It receives traffic
//! and registry snapshots from the backend through crossbeam channels, feeds
//! them into the [`TrafficPipeline`] and renders the derived rows.
//!
//! # Layout
//!
//! - Menu bar: source selection, view options, language
//! - Toolbar: refresh, pause, poll interval, fetch health
//! - Central panel: the traffic table
//! - Status bar: connection status and totals of the visible entries
//!
//! # Main Types
//!
//! - [`TrafficVisApp`] - Main application state implementing [`eframe::App`]
//! - [`AppAction`] - Everything a panel can ask the app to do
//! - [`Topics`] - Status data published by the backend

pub mod state;
pub mod status_bar;
pub mod toolbar;
pub mod topics;
pub mod traffic_table;
pub mod widgets;

pub use state::AppAction;
pub use topics::Topics;
pub use widgets::{format_bytes, format_count, format_count_in, StatusIndicator};

use rust_i18n::t;

use crate::backend::{BackendBridge, BackendMessage};
use crate::config::settings::RuntimeSettings;
use crate::config::{AppConfig, AppState, SourceConfig, SourceKind};
use crate::i18n::{self, Language};
use crate::pipeline::TrafficPipeline;
use crate::types::{ConnectionStatus, RegistryMap, TrafficMap};

use status_bar::{render_status_bar, StatusBarContext};
use toolbar::{render_toolbar, ToolbarContext};
use traffic_table::{render_traffic_table, TrafficTableContext};

/// Main application state for the traffic viewer
pub struct TrafficVisApp {
    // === Communication ===
    bridge: BackendBridge,

    // === Shared State ===
    config: AppConfig,
    app_state: AppState,
    settings: RuntimeSettings,

    // === Derived view ===
    pipeline: TrafficPipeline,

    // === All published status data ===
    topics: Topics,

    /// Dark mode value last pushed to egui
    applied_dark_mode: Option<bool>,
}

impl TrafficVisApp {
    /// Create a new application instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        bridge: BackendBridge,
        config: AppConfig,
        app_state: AppState,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.iter_mut().for_each(|(_, font_id)| {
            font_id.size *= app_state.ui_preferences.font_scale;
        });
        cc.egui_ctx.set_style(style);

        Self::with_bridge(bridge, config, app_state)
    }

    /// Create the application without a rendering context
    pub fn with_bridge(bridge: BackendBridge, config: AppConfig, app_state: AppState) -> Self {
        i18n::set_language(app_state.ui_preferences.language);

        let settings = RuntimeSettings {
            paused: false,
            poll_interval_ms: config.source.poll_interval_ms,
        };

        let topics = Topics {
            source_name: config.source.kind.to_string(),
            ..Topics::default()
        };

        Self {
            bridge,
            config,
            app_state,
            settings,
            pipeline: TrafficPipeline::new(),
            topics,
            applied_dark_mode: None,
        }
    }

    /// Apply everything the backend sent since the last frame.
    ///
    /// Only the newest traffic snapshot and registry are applied; older ones
    /// in the same batch are counted and discarded. Returns true if any
    /// message arrived.
    pub fn process_backend_messages(&mut self) -> bool {
        let drained = self.bridge.drain_latest();
        let had_messages = !drained.is_empty();

        self.topics.snapshots_superseded += drained.superseded;

        for msg in &drained.events {
            if let BackendMessage::SourceChanged(name) = msg {
                tracing::info!("Backend now polling {}", name);
                self.clear_source_data();
                self.topics.source_name = name.clone();
            }
        }

        if let Some(registry) = drained.registry {
            self.topics.registry_size = registry.len();
            self.pipeline.set_registry(registry);
            if self.topics.connection_status == ConnectionStatus::Connected {
                self.topics.last_error = None;
            }
        }

        if let Some(snapshot) = drained.traffic {
            self.topics.last_update = Some(snapshot.captured_at);
            self.topics.snapshots_applied += 1;
            self.pipeline.set_traffic(snapshot.traffic);
        }

        for msg in drained.events {
            match msg {
                BackendMessage::ConnectionStatus(status) => {
                    self.topics.connection_status = status;
                    if status == ConnectionStatus::Connected {
                        self.topics.last_error = None;
                    }
                }
                BackendMessage::SourceError(err) => {
                    self.topics.last_error = Some(err);
                }
                // Applied before the snapshots above
                BackendMessage::SourceChanged(_) => {}
                BackendMessage::Stats(stats) => {
                    self.topics.stats = stats;
                }
                BackendMessage::Shutdown => {
                    tracing::info!("Backend shutdown received");
                }
                // Coalesced above
                BackendMessage::Traffic(_) | BackendMessage::Registry(_) => {}
            }
        }

        had_messages
    }

    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::SetSortField(field) => {
                self.pipeline.set_sort_field(field);
            }
            AppAction::ToggleHideNonTunnelEntries => {
                self.pipeline.toggle_hide_non_tunnel_entries();
            }
            AppAction::RefreshSource => {
                self.bridge.request_refresh();
            }
            AppAction::TogglePause => {
                self.settings.toggle_pause();
                if self.settings.paused {
                    self.bridge.pause();
                } else {
                    self.bridge.resume();
                }
            }
            AppAction::SetPollInterval(ms) => {
                let applied = self.settings.set_poll_interval(ms);
                self.config.source.poll_interval_ms = applied;
                self.bridge.set_poll_interval(applied);
            }
            AppAction::UseJsonSource(path) => {
                self.switch_source(SourceKind::JsonFile { path });
            }
            AppAction::UseMockSource => {
                self.switch_source(SourceKind::Mock);
            }
            AppAction::SetLanguage(language) => {
                self.app_state.ui_preferences.language = language;
                i18n::set_language(language);
            }
            AppAction::SetDarkMode(dark) => {
                self.app_state.ui_preferences.dark_mode = dark;
            }
        }
    }

    fn switch_source(&mut self, kind: SourceKind) {
        self.config.source = SourceConfig {
            poll_interval_ms: self.settings.poll_interval_ms,
            kind,
        };
        self.clear_source_data();
        self.topics.source_name = self.config.source.kind.to_string();
        self.bridge.switch_source(self.config.source.clone());
    }

    /// Drop the previous source's rows so they are never shown under a new name
    fn clear_source_data(&mut self) {
        self.pipeline.set_traffic(TrafficMap::new());
        self.pipeline.set_registry(RegistryMap::new());
        self.topics.last_update = None;
        self.topics.registry_size = 0;
        self.topics.last_error = None;
    }

    pub fn pipeline(&self) -> &TrafficPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut TrafficPipeline {
        &mut self.pipeline
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        let dark = self.app_state.ui_preferences.dark_mode;
        if self.applied_dark_mode != Some(dark) {
            ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.applied_dark_mode = Some(dark);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        let mut refresh = false;
        let mut toggle_pause = false;
        let mut toggle_filter = false;

        ctx.input(|i| {
            if i.key_pressed(Key::F5) {
                refresh = true;
            }

            if i.key_pressed(Key::P) && !i.modifiers.any() {
                toggle_pause = true;
            }

            if i.key_pressed(Key::H) && !i.modifiers.any() {
                toggle_filter = true;
            }
        });

        if refresh {
            self.handle_action(AppAction::RefreshSource);
        }
        if toggle_pause {
            self.handle_action(AppAction::TogglePause);
        }
        if toggle_filter {
            self.handle_action(AppAction::ToggleHideNonTunnelEntries);
        }
    }

    fn render_menu_bar(&self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button(t!("app.source").to_string(), |ui| {
                if ui.button(t!("app.use_mock_source").to_string()).clicked() {
                    actions.push(AppAction::UseMockSource);
                    ui.close();
                }
                if ui.button(t!("app.open_json_source").to_string()).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                    {
                        actions.push(AppAction::UseJsonSource(path));
                    }
                    ui.close();
                }
            });

            ui.menu_button(t!("app.view").to_string(), |ui| {
                let mut hide = self.pipeline.view_state().hide_non_tunnel_entries;
                if ui
                    .checkbox(&mut hide, t!("table.hide_non_tunnel").to_string())
                    .changed()
                {
                    actions.push(AppAction::ToggleHideNonTunnelEntries);
                }

                let mut dark = self.app_state.ui_preferences.dark_mode;
                if ui.checkbox(&mut dark, t!("app.dark_mode").to_string()).changed() {
                    actions.push(AppAction::SetDarkMode(dark));
                }

                ui.separator();
                ui.menu_button(t!("app.language").to_string(), |ui| {
                    let current = self.app_state.ui_preferences.language;
                    for lang in Language::all() {
                        if ui
                            .selectable_label(current == *lang, lang.display_name())
                            .clicked()
                        {
                            actions.push(AppAction::SetLanguage(*lang));
                            ui.close();
                        }
                    }
                });
            });
        });

        actions
    }
}

impl eframe::App for TrafficVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_backend_messages();
        self.handle_keyboard_shortcuts(ctx);
        self.apply_visuals(ctx);

        if had_messages {
            ctx.request_repaint();
        }
        // Wake up for the next snapshot even when the window is idle
        if !self.settings.paused {
            ctx.request_repaint_after(std::time::Duration::from_millis(
                self.settings.poll_interval_ms,
            ));
        }

        let mut actions = Vec::new();

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            actions.extend(self.render_menu_bar(ui));
        });

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let toolbar_ctx = ToolbarContext {
                topics: &self.topics,
                settings: &self.settings,
                source_kind: &self.config.source.kind,
            };
            actions.extend(render_toolbar(ui, &toolbar_ctx));
        });

        let view = self.pipeline.view_state();
        let output = self.pipeline.output();

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status_ctx = StatusBarContext {
                topics: &self.topics,
                summary: output.summary,
                paused: self.settings.paused,
            };
            render_status_bar(ui, &status_ctx);
        });

        // Traffic table
        egui::CentralPanel::default().show(ctx, |ui| {
            let table_ctx = TrafficTableContext {
                entries: &output.entries,
                view,
                has_data: self.topics.has_data(),
            };
            actions.extend(render_traffic_table(ui, &table_ctx));
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.bridge.shutdown();

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }

        if let Some(path) = crate::config::config_path() {
            if let Err(e) = self.config.save(&path) {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
    }
}
