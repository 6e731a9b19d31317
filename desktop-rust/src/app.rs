use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use sprinkler_report::batch::{self, InputMode};
use sprinkler_report::config::ApiSettings;
use sprinkler_report::conversation::ConversationClient;
use sprinkler_report::extraction::ExtractionClient;
use sprinkler_report::scanner::collect_reports;
use sprinkler_report_common::{generate_tsv, header_label, Role, SessionState, DEFICIENCY_FIELDS};
use tracing::{error, info};

use crate::io::{display_name, dropped_paths, pick_reports, save_excel};
use crate::model::{AppState, UiMessage};

const ACCENT: Color32 = Color32::from_rgb(246, 196, 69);
const DANGER: Color32 = Color32::from_rgb(220, 70, 70);

pub struct DesktopApp {
    /// 起動時に認証情報が無ければ Err
    settings: Result<ApiSettings, String>,
    state: AppState,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
}

impl DesktopApp {
    pub fn new(settings: Result<ApiSettings, String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { settings, state: AppState::default(), tx, rx }
    }

    fn start_batch(&mut self, ctx: &egui::Context, paths: Vec<PathBuf>) {
        let Ok(settings) = self.settings.clone() else {
            return;
        };
        if paths.is_empty() {
            return;
        }
        if let Err(err) = self.state.session.begin_batch() {
            self.state.notice = err.to_string();
            return;
        }
        self.state.status.begin_batch();
        self.state.notice.clear();
        info!(count = paths.len(), "batch started");

        let tx = self.tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(err) => {
                    let _ = tx.send(UiMessage::BatchAborted(format!("Runtime error: {err}")));
                    ctx.request_repaint();
                    return;
                }
            };
            runtime.block_on(async {
                let files = match collect_reports(&paths) {
                    Ok(files) => files,
                    Err(err) => {
                        let _ = tx.send(UiMessage::BatchAborted(err.to_string()));
                        return;
                    }
                };
                let client = match ExtractionClient::from_settings(&settings) {
                    Ok(client) => client,
                    Err(err) => {
                        let _ = tx.send(UiMessage::BatchAborted(err.to_string()));
                        return;
                    }
                };
                batch::extract_each(&client, &files, InputMode::Attachment, |outcome| {
                    let _ = tx.send(UiMessage::FileDone(outcome));
                    ctx.request_repaint();
                })
                .await;
                let _ = tx.send(UiMessage::BatchDone);
            });
            ctx.request_repaint();
        });
    }

    fn send_chat(&mut self, ctx: &egui::Context) {
        let Ok(settings) = self.settings.clone() else {
            return;
        };
        let (history, message) = match self.state.session.begin_chat(&self.state.chat_input) {
            Ok(accepted) => accepted,
            Err(err) => {
                self.state.chat_error = Some(err.to_string());
                return;
            }
        };
        self.state.chat_input.clear();
        self.state.chat_error = None;

        let tx = self.tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|err| format!("Runtime error: {err}"))
                .and_then(|runtime| {
                    runtime.block_on(async {
                        let client = match ConversationClient::from_settings(&settings) {
                            Ok(client) => client,
                            Err(err) => return Err(err.to_string()),
                        };
                        client.ask(&message, &history).await.map_err(|e| e.to_string())
                    })
                });
            let _ = tx.send(UiMessage::ChatDone(result));
            ctx.request_repaint();
        });
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::FileDone(outcome) => {
                    let _ = batch::apply_outcome(outcome, &mut self.state.accumulator, &mut self.state.status);
                }
                UiMessage::BatchDone => {
                    self.state.status.finish_batch();
                    self.state.session.finish_batch();
                }
                UiMessage::BatchAborted(message) => {
                    error!(error = %message, "batch aborted");
                    self.state.status.error = Some(message);
                    self.state.status.finish_batch();
                    self.state.session.finish_batch();
                }
                UiMessage::ChatDone(Ok(reply)) => {
                    self.state.session.finish_chat(Some(reply));
                }
                UiMessage::ChatDone(Err(message)) => {
                    error!(error = %message, "chat failed");
                    self.state.session.finish_chat(None);
                    self.state.chat_error = Some(message);
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state.accumulator.reset();
        self.state.status.reset();
        self.state.notice.clear();
    }

    fn export_excel(&mut self) {
        match save_excel(self.state.accumulator.records()) {
            Ok(Some(path)) => self.state.notice = format!("Saved {}", display_name(&path)),
            Ok(None) => {}
            Err(err) => self.state.notice = format!("Export failed: {err:#}"),
        }
    }

    fn render_fatal(&self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading(RichText::new("Configuration error").color(DANGER));
                ui.add_space(8.0);
                ui.label(message);
            });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let busy = !self.state.session.state().is_idle();
        let stroke = if hovering { ACCENT } else { Color32::from_gray(70) };

        let mut picked = Vec::new();
        egui::Frame::none()
            .fill(Color32::from_rgb(24, 28, 40))
            .stroke(egui::Stroke::new(1.5, stroke))
            .rounding(6.0)
            .inner_margin(egui::Margin::same(16.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Drop inspection reports here (PDF or images)").color(Color32::from_gray(200)));
                    ui.add_space(6.0);
                    if ui.add_enabled(!busy, egui::Button::new("Browse Reports")).clicked() {
                        picked = pick_reports();
                    }
                });
            });

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() && !busy {
            picked.extend(dropped_paths(&dropped));
        }
        if !picked.is_empty() {
            self.start_batch(ctx, picked);
        }
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let status = &self.state.status;
        if status.is_processing {
            ui.add(
                egui::ProgressBar::new(f32::from(status.progress) / 100.0)
                    .text(format!("PROCESSING... {}%", status.progress)),
            );
        }
        if let Some(message) = &status.error {
            egui::Frame::none()
                .fill(Color32::from_rgb(60, 20, 20))
                .stroke(egui::Stroke::new(1.0, DANGER))
                .inner_margin(egui::Margin::same(8.0))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(message).color(DANGER));
                });
        }
    }

    fn render_table(&self, ui: &mut egui::Ui) {
        let records = self.state.accumulator.records();
        if records.is_empty() {
            ui.label(RichText::new("No deficiencies extracted yet.").color(Color32::from_gray(150)));
            return;
        }
        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("deficiencies").striped(true).spacing([12.0, 6.0]).show(ui, |ui| {
                for key in DEFICIENCY_FIELDS {
                    ui.label(RichText::new(header_label(key)).strong());
                }
                ui.end_row();
                for record in records {
                    for key in DEFICIENCY_FIELDS {
                        let value = record.field_value(key);
                        let text = match key {
                            "sectionLabel" => RichText::new(value).strong().color(ACCENT),
                            "resultMark" if !value.is_empty() => RichText::new(value).color(DANGER),
                            _ => RichText::new(value),
                        };
                        ui.label(text);
                    }
                    ui.end_row();
                }
            });
        });
    }

    fn render_chat(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Estimator Assistant");
        ui.separator();

        let in_flight = self.state.session.state() == SessionState::ChatInFlight;
        let input_height = 90.0;
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - input_height)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for turn in self.state.session.transcript().turns() {
                    let (who, color) = match turn.role {
                        Role::User => ("You", ACCENT),
                        Role::Assistant => ("Estimator", Color32::from_gray(170)),
                    };
                    ui.label(RichText::new(who).strong().color(color));
                    ui.label(turn.text.as_str());
                    ui.add_space(6.0);
                }
                if in_flight {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").color(Color32::from_gray(150)));
                    });
                }
                if let Some(message) = &self.state.chat_error {
                    ui.label(RichText::new(format!("Error: {message}")).color(DANGER));
                }
            });

        ui.separator();
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.state.chat_input)
                .desired_rows(2)
                .desired_width(f32::INFINITY)
                .hint_text("Ask about pricing, labor or code requirements"),
        );
        let submit_key = response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.ctrl);
        let can_send = self.state.session.state().is_idle() && !self.state.chat_input.trim().is_empty();
        ui.horizontal(|ui| {
            let send = ui.add_enabled(can_send, egui::Button::new("Send")).clicked();
            if (send || (submit_key && can_send)) && self.settings.is_ok() {
                self.send_chat(ctx);
            }
            let clear_enabled = !in_flight && !self.state.session.transcript().is_empty();
            if ui.add_enabled(clear_enabled, egui::Button::new("Clear")).clicked() {
                if let Err(err) = self.state.session.clear_transcript() {
                    self.state.chat_error = Some(err.to_string());
                } else {
                    self.state.chat_error = None;
                }
            }
        });
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(message) = &self.settings {
            self.render_fatal(ctx, message);
            return;
        }
        if !self.state.session.state().is_idle() {
            ctx.request_repaint();
        }
        self.poll_messages();

        let batch_running = self.state.session.state() == SessionState::BatchInFlight;
        let has_records = !self.state.accumulator.is_empty();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Sprinkler Deficiency Extractor");
                ui.separator();
                ui.label(format!("{} deficiencies", self.state.accumulator.len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_enabled(has_records && !batch_running, egui::Button::new("Reset")).clicked() {
                        self.reset();
                    }
                    if ui.add_enabled(has_records, egui::Button::new("Export Excel")).clicked() {
                        self.export_excel();
                    }
                    if ui.add_enabled(has_records, egui::Button::new("Copy TSV for Excel")).clicked() {
                        let tsv = generate_tsv(self.state.accumulator.records());
                        ui.output_mut(|o| o.copied_text = tsv);
                        self.state.notice = "TSV copied. Paste into Excel.".to_string();
                    }
                    if !self.state.notice.is_empty() {
                        ui.label(RichText::new(&self.state.notice).color(ACCENT));
                    }
                });
            });
        });

        egui::SidePanel::right("chat")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.render_chat(ui, ctx);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_drop_zone(ui, ctx);
            ui.add_space(8.0);
            self.render_status(ui);
            ui.add_space(8.0);
            self.render_table(ui);
        });
    }
}
