//! AuditPro desktop front end — egui/eframe application.
//!
//! # Architecture
//!
//! [`AuditApp`] is the top-level [`eframe::App`]. It owns no authoritative
//! state: every frame it reads the latest [`QueueSnapshot`] from the store's
//! watch channel, and every button press becomes a [`QueueStore`] call.
//! Analysis calls and file reads are spawned onto the tokio runtime so the UI
//! thread never blocks.
//!
//! # Views
//!
//! | View | Contents |
//! |------|----------|
//! | `Input` ("Analysis Lab") | Paste box, file drop, batch trigger, queue list |
//! | `Results` ("Audit Archive") | Search box, completed audits, report view |

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::queue::intake::{is_transcript_file, spawn_file_loads};
use crate::queue::{EntryId, EntryStatus, QueueSnapshot, QueueStore, TranscriptEntry, View};
use crate::report::{parse_sections, render_plain, ReportLine};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(99, 102, 241);

// ---------------------------------------------------------------------------
// RowAction
// ---------------------------------------------------------------------------

/// Primary action offered next to a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Open the report of a completed entry.
    View,
    /// Send a pending entry for analysis.
    Process,
    /// Re-send a failed entry.
    Retry,
}

impl RowAction {
    /// Action for an entry in `status`; `None` while processing.
    pub fn for_status(status: &EntryStatus) -> Option<Self> {
        match status {
            EntryStatus::Pending => Some(RowAction::Process),
            EntryStatus::Processing => None,
            EntryStatus::Completed(_) => Some(RowAction::View),
            EntryStatus::Error(_) => Some(RowAction::Retry),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowAction::View => "View Snapshot",
            RowAction::Process => "Process",
            RowAction::Retry => "Retry",
        }
    }
}

// ---------------------------------------------------------------------------
// AuditApp
// ---------------------------------------------------------------------------

/// eframe application — the AuditPro window.
pub struct AuditApp {
    /// Authoritative queue; all mutations go through it.
    store: QueueStore,
    /// Latest published queue state.
    snapshots: watch::Receiver<QueueSnapshot>,
    /// Runtime that executes analysis calls and file reads.
    runtime: Handle,

    // ── Local widget state ───────────────────────────────────────────────
    /// Contents of the paste box.
    input_text: String,
    /// Archive search box.
    search_query: String,

    /// Application configuration (read-only after startup).
    config: AppConfig,
}

impl AuditApp {
    /// Create the app and start forwarding store updates as repaints.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: QueueStore,
        runtime: Handle,
        config: AppConfig,
    ) -> Self {
        cc.egui_ctx.set_visuals(if config.ui.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let app = Self {
            snapshots: store.subscribe(),
            store,
            runtime,
            input_text: String::new(),
            search_query: String::new(),
            config,
        };
        app.spawn_repaint_forwarder(cc.egui_ctx.clone());
        app
    }

    /// Repaint whenever the store publishes, so results arriving from
    /// background tasks show up without user input.
    fn spawn_repaint_forwarder(&self, ctx: egui::Context) {
        let mut rx = self.store.subscribe();
        self.runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });
    }

    // ── Store actions ────────────────────────────────────────────────────

    fn spawn_process(&self, id: EntryId) {
        let store = self.store.clone();
        self.runtime.spawn(async move {
            store.process_one(id).await;
        });
    }

    fn spawn_batch(&self) {
        let store = self.store.clone();
        self.runtime.spawn(async move {
            store.process_all_pending().await;
        });
    }

    fn open_report(&self, id: EntryId) {
        self.store.select(id);
        self.store.set_view(View::Results);
    }

    /// Stage files dropped onto the window.
    fn handle_dropped_files(&self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for file in dropped {
            match (file.path, file.bytes) {
                (Some(path), _) => paths.push(path),
                (None, Some(bytes)) if is_transcript_file(Path::new(&file.name)) => {
                    self.store
                        .add_from_file(&file.name, String::from_utf8_lossy(&bytes).into_owned());
                }
                _ => log::warn!("app: ignoring dropped file '{}'", file.name),
            }
        }
        spawn_file_loads(&self.runtime, &self.store, paths);
    }

    // ── Header ───────────────────────────────────────────────────────────

    fn draw_header(&self, ui: &mut egui::Ui, snapshot: &QueueSnapshot) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("AUDITPRO")
                    .strong()
                    .size(18.0)
                    .color(ACCENT),
            );
            ui.add_space(16.0);

            if ui
                .selectable_label(snapshot.view == View::Input, "Analysis Lab")
                .clicked()
            {
                self.store.set_view(View::Input);
            }

            let completed = snapshot.completed_count();
            let archive = if completed > 0 {
                format!("Audit Archive ({completed})")
            } else {
                "Audit Archive".to_string()
            };
            if ui
                .selectable_label(snapshot.view == View::Results, archive)
                .clicked()
            {
                self.store.set_view(View::Results);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("model: {}", self.config.analysis.model))
                        .small()
                        .weak(),
                );
            });
        });
    }

    // ── Input view ───────────────────────────────────────────────────────

    fn draw_input_view(&mut self, ctx: &egui::Context, snapshot: &QueueSnapshot) {
        egui::SidePanel::left("intake")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.heading("Data Intake");
                ui.label(
                    egui::RichText::new("Drop .txt or .md transcripts onto the window.")
                        .weak(),
                );
                ui.add_space(8.0);

                ui.add(
                    egui::TextEdit::multiline(&mut self.input_text)
                        .hint_text("Or paste call transcript text directly...")
                        .desired_rows(14)
                        .desired_width(f32::INFINITY),
                );

                let can_stage = !self.input_text.trim().is_empty();
                if ui
                    .add_enabled(can_stage, egui::Button::new("Stage for Analysis"))
                    .clicked()
                    && self.store.add_from_text(&self.input_text).is_some()
                {
                    self.input_text.clear();
                }

                if snapshot.has_pending() {
                    ui.add_space(12.0);
                    let label = if snapshot.batch_running {
                        "Processing batch..."
                    } else {
                        "Initiate Batch Intelligence"
                    };
                    if ui
                        .add_enabled(!snapshot.batch_running, egui::Button::new(label))
                        .clicked()
                    {
                        self.spawn_batch();
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("Queue ({})", snapshot.len()));
                if !snapshot.is_empty() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Purge All").clicked() {
                            self.store.clear_all();
                        }
                    });
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    if snapshot.is_empty() {
                        ui.label(egui::RichText::new("No transcripts staged.").weak());
                    }
                    for entry in &snapshot.entries {
                        self.draw_queue_row(ui, entry);
                        ui.separator();
                    }
                });
        });
    }

    fn draw_queue_row(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("●").color(status_color(&entry.status)));
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&entry.name).strong());
                ui.label(
                    egui::RichText::new(format!(
                        "{} · {}",
                        entry.status.label(),
                        entry.timestamp.format("%H:%M:%S")
                    ))
                    .small()
                    .color(status_color(&entry.status)),
                );
                if let Some(message) = entry.error() {
                    ui.label(
                        egui::RichText::new(message)
                            .small()
                            .color(egui::Color32::from_rgb(239, 68, 68)),
                    );
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Remove").clicked() {
                    self.store.remove(entry.id);
                }
                match RowAction::for_status(&entry.status) {
                    Some(RowAction::View) => {
                        if ui.small_button(RowAction::View.label()).clicked() {
                            self.open_report(entry.id);
                        }
                    }
                    Some(action) => {
                        if ui.small_button(action.label()).clicked() {
                            self.spawn_process(entry.id);
                        }
                    }
                    None => {
                        ui.spinner();
                    }
                }
            });
        });
    }

    // ── Results view ─────────────────────────────────────────────────────

    fn draw_results_view(&mut self, ctx: &egui::Context, snapshot: &QueueSnapshot) {
        egui::SidePanel::left("archive")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .hint_text("Search audits...")
                        .desired_width(f32::INFINITY),
                );
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        let hits = snapshot.search_completed(&self.search_query);
                        if hits.is_empty() {
                            ui.label(egui::RichText::new("No completed audits.").weak());
                        }
                        for entry in hits {
                            let selected = snapshot.selected == Some(entry.id);
                            if ui.selectable_label(selected, entry.name.as_str()).clicked() {
                                self.store.select(entry.id);
                            }
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match snapshot.selected_entry() {
                    Some(entry) => self.draw_report(ui, entry),
                    None => {
                        ui.label(
                            egui::RichText::new("Select an audit to view its snapshot.").weak(),
                        );
                    }
                });
        });
    }

    /// Render one entry's report, or its current status when not completed.
    fn draw_report(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        ui.horizontal(|ui| {
            ui.heading(entry.name.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    self.store.clear_selection();
                }
                if let Some(result) = entry.result() {
                    if ui.button("Copy report").clicked() {
                        let sections = parse_sections(result);
                        ui.ctx()
                            .copy_text(render_plain(&entry.name, Local::now(), &sections));
                    }
                }
            });
        });
        ui.label(
            egui::RichText::new(format!(
                "Staged {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S")
            ))
            .small()
            .weak(),
        );
        ui.separator();

        let result = match &entry.status {
            EntryStatus::Completed(result) => result,
            EntryStatus::Processing => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
                return;
            }
            EntryStatus::Pending => {
                ui.label("Not analyzed yet.");
                return;
            }
            EntryStatus::Error(message) => {
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), message.as_str());
                return;
            }
        };

        for section in parse_sections(result) {
            if section.is_banner() {
                ui.add_space(16.0);
                ui.label(
                    egui::RichText::new(&section.title)
                        .heading()
                        .strong()
                        .italics()
                        .color(ACCENT),
                );
                ui.separator();
                continue;
            }

            ui.add_space(8.0);
            ui.label(egui::RichText::new(&section.title).strong().color(ACCENT));
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                for line in section.lines() {
                    match line {
                        ReportLine::Bullet(item) => {
                            ui.horizontal_wrapped(|ui| {
                                ui.label(egui::RichText::new("•").strong().color(ACCENT));
                                ui.label(item);
                            });
                        }
                        ReportLine::Text(text) => {
                            ui.label(text);
                        }
                        ReportLine::Blank => ui.add_space(6.0),
                    }
                }
            });
        }
    }
}

/// Accent colour for a status dot / label.
fn status_color(status: &EntryStatus) -> egui::Color32 {
    match status {
        EntryStatus::Pending => egui::Color32::from_rgb(100, 116, 139),
        EntryStatus::Processing => egui::Color32::from_rgb(245, 158, 11),
        EntryStatus::Completed(_) => egui::Color32::from_rgb(16, 185, 129),
        EntryStatus::Error(_) => egui::Color32::from_rgb(239, 68, 68),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for AuditApp {
    /// Called every frame by eframe. Takes the latest snapshot, stages any
    /// dropped files, then renders the active view.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        let snapshot = self.snapshots.borrow_and_update().clone();

        // Keep spinners moving while anything is in flight.
        if snapshot.batch_running || snapshot.entries.iter().any(|e| e.is_processing()) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui, &snapshot);
        });

        if ctx.input(|i| !i.raw.hovered_files.is_empty()) {
            egui::TopBottomPanel::bottom("drop_hint").show(ctx, |ui| {
                ui.label(egui::RichText::new("Release to stage transcripts").color(ACCENT));
            });
        }

        match snapshot.view {
            View::Input => self.draw_input_view(ctx, &snapshot),
            View::Results => self.draw_results_view(ctx, &snapshot),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("AuditPro window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_entries_offer_no_action() {
        assert_eq!(RowAction::for_status(&EntryStatus::Processing), None);
    }

    #[test]
    fn pending_and_error_can_be_sent_for_analysis() {
        assert_eq!(
            RowAction::for_status(&EntryStatus::Pending),
            Some(RowAction::Process)
        );
        assert_eq!(
            RowAction::for_status(&EntryStatus::Error("boom".into())),
            Some(RowAction::Retry)
        );
    }

    #[test]
    fn completed_entries_open_their_report() {
        assert_eq!(
            RowAction::for_status(&EntryStatus::Completed("## A".into())),
            Some(RowAction::View)
        );
        assert_eq!(RowAction::View.label(), "View Snapshot");
    }

    #[test]
    fn status_colors_are_distinct() {
        let colors = [
            status_color(&EntryStatus::Pending),
            status_color(&EntryStatus::Processing),
            status_color(&EntryStatus::Completed(String::new())),
            status_color(&EntryStatus::Error(String::new())),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
