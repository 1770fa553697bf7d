use std::{path::Path, sync::Arc, time::Duration};

use client_core::{
    controller_from_settings, DelayedPlacement, Document, FollowerConfig, InteractionController,
    PointerFollower, Settings, SubmissionState,
};
use eframe::egui;
use shared::domain::{ScreenPoint, ViewerTarget};
use tokio::runtime::Handle;

use crate::ui::logo::LogoHandle;

pub struct AskApp {
    controller: InteractionController,
    follower: Arc<PointerFollower>,
    logo: LogoHandle,
    // Dropped with the app; cancels the mount offset if it has not fired yet.
    _mount_placement: DelayedPlacement,
    question_draft: String,
    status: String,
}

impl AskApp {
    pub fn new(ctx: &egui::Context, settings: &Settings, runtime: Handle) -> anyhow::Result<Self> {
        let logo = LogoHandle::new(ctx.clone());
        let follower = Arc::new(PointerFollower::new(
            Arc::new(logo.clone()),
            FollowerConfig::from_settings(settings),
            runtime.clone(),
        ));
        let controller = controller_from_settings(settings, follower.clone(), runtime.clone())?;
        let mount_placement = DelayedPlacement::schedule(
            &runtime,
            Arc::new(logo.clone()),
            ScreenPoint::new(settings.logo_mount_offset_x, settings.logo_mount_offset_y),
            settings.logo_mount_delay(),
        );

        Ok(Self {
            controller,
            follower,
            logo,
            _mount_placement: mount_placement,
            question_draft: String::new(),
            status: format!(
                "Answering service: {}",
                client_core::ServiceEndpoint::from_settings(settings)?.ask_url()
            ),
        })
    }

    fn feed_pointer(&self, ctx: &egui::Context) {
        let moves: Vec<egui::Pos2> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::PointerMoved(pos) => Some(*pos),
                    _ => None,
                })
                .collect()
        });
        for pos in moves {
            self.follower.pointer_moved(ScreenPoint::new(pos.x, pos.y));
        }
    }

    fn pick_document(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF document", &["pdf"])
            .pick_file()
        else {
            return;
        };
        match Document::load(&path) {
            Ok(document) => {
                self.status = format!(
                    "Selected {}",
                    describe_document(&path, document.len() as u64)
                );
                self.controller.set_file(document);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "could not read document: {err}");
                self.status = format!("Could not read {}: {err}", path.display());
            }
        }
    }

    fn try_submit(&mut self) {
        if self.controller.submit().is_some() {
            self.status = "Asking...".to_string();
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, state: &SubmissionState) {
        let question = ui.add(
            egui::TextEdit::singleline(&mut self.question_draft)
                .hint_text("Enter your question")
                .desired_width(f32::INFINITY),
        );
        if question.changed() {
            self.controller.set_question(self.question_draft.clone());
        }
        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if question.lost_focus() && enter_pressed && state.can_submit() {
            self.try_submit();
        }

        ui.horizontal(|ui| {
            if ui.button("Upload PDF").clicked() {
                self.pick_document();
            }
            match state.document() {
                Some(document) => {
                    ui.label(&document.file_name);
                    ui.weak(human_readable_bytes(document.len() as u64));
                }
                None => {
                    ui.weak("No document selected");
                }
            }
        });

        ui.horizontal(|ui| {
            let submit = egui::Button::new(egui::RichText::new("Submit").strong())
                .min_size(egui::vec2(120.0, 32.0));
            if ui.add_enabled(state.can_submit(), submit).clicked() {
                self.try_submit();
            }
            if state.is_loading() {
                ui.spinner();
            }
        });
    }

    fn show_answer(&mut self, ui: &mut egui::Ui, state: &SubmissionState) {
        let Some(answer) = state.answer().filter(|answer| !answer.is_empty()) else {
            return;
        };
        ui.add_space(12.0);
        ui.label(egui::RichText::new("Answer:").heading());
        ui.label(answer);

        if let Some(viewer) = state.viewer() {
            ui.add_space(12.0);
            self.show_viewer(ui, viewer);
        }
    }

    fn show_viewer(&mut self, ui: &mut egui::Ui, viewer: &ViewerTarget) {
        let url = viewer.viewer_url();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(format!("Highlighted document, page {}", viewer.page));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        self.controller.dismiss_viewer();
                    }
                    if ui.button("Open").clicked() {
                        if let Err(err) = open_in_external_viewer(&url) {
                            self.status = format!("Failed to open external viewer: {err}");
                        }
                    }
                });
            });
            ui.monospace(&url);
        });
    }
}

impl eframe::App for AskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.feed_pointer(ctx);
        let state = self.controller.snapshot();

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(420.0, 720.0);
            ui.add_space((avail.y * 0.08).clamp(48.0, 80.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                self.logo.show(ui);
                ui.add_space(8.0);

                egui::Frame::NONE
                    .fill(ui.visuals().faint_bg_color)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                        ui.heading("42");
                        self.show_form(ui, &state);
                        self.show_answer(ui, &state);
                    });
            });

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        if self.follower.is_active() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn open_in_external_viewer(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();

    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    result.map(|_| ())
}

fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

/// Label shown for a picked file in the status line.
pub fn describe_document(path: &Path, len: u64) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("{name} ({})", human_readable_bytes(len))
}
