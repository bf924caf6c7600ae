use client_core::{
    list_view::{display_name, DELETE_CONFIRMATION_PROMPT},
    AppController, FormField, Intent, NotificationContext, RemoteCommand, View,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::UserId;

use crate::controller::events::{outcome_status, UiEvent};
use crate::controller::orchestration::dispatch_backend_commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

/// Owned copy of one list row so the controller is free while widgets run.
struct UserRow {
    id: UserId,
    email: String,
    name: String,
    full_name: String,
    age: u32,
}

pub struct UserAdminApp {
    cmd_tx: Sender<RemoteCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: AppController,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl UserAdminApp {
    pub fn new(cmd_tx: Sender<RemoteCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: AppController::new(),
            status: "Loading users...".to_string(),
            status_banner: None,
        };
        let startup = app.controller.start().into_iter().collect();
        dispatch_backend_commands(&app.cmd_tx, startup, &mut app.status);
        app
    }

    fn dispatch(&mut self, intent: Intent) {
        let commands = self.controller.dispatch(intent);
        dispatch_backend_commands(&self.cmd_tx, commands, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Status(message) => {
                    self.status = message;
                }
                UiEvent::Completed(outcome) => {
                    self.status = outcome_status(&outcome);
                    self.controller.complete(outcome);
                }
                UiEvent::BackendStartupFailed(reason) => {
                    self.status = "Backend unavailable".to_string();
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: format!("Backend worker startup failure: {reason}"),
                    });
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let mut selected = None;
        egui::TopBottomPanel::top("view_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("User Admin");
                ui.separator();
                for view in [View::Form, View::List] {
                    let active = self.controller.active_view() == view;
                    if ui.selectable_label(active, view.label()).clicked() {
                        selected = Some(view);
                    }
                }
            });
        });
        if let Some(view) = selected {
            self.dispatch(Intent::ViewSelected(view));
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn form_text_field(ui: &mut egui::Ui, field: FormField, value: &mut String) -> egui::Response {
        ui.label(egui::RichText::new(format!("{} *", field.label())).strong());
        let edit = egui::TextEdit::singleline(value)
            .id_salt(("user_form", field.label()))
            .hint_text(
                egui::RichText::new(field.placeholder())
                    .color(ui.visuals().weak_text_color().gamma_multiply(0.85)),
            )
            .desired_width(f32::INFINITY);
        ui.add_sized([ui.available_width(), 30.0], edit)
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let mut intents = Vec::new();
        let mut submit = false;

        ui.heading(self.controller.form().title());
        ui.add_space(8.0);

        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color.gamma_multiply(0.55))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 6.0);
                for field in FormField::ALL {
                    let mut value = self.controller.form().value(field).to_string();
                    let response = Self::form_text_field(ui, field, &mut value);
                    if response.changed() {
                        // Numeric input only; a minus sign is never accepted.
                        if field == FormField::Age {
                            value.retain(|c| c.is_ascii_digit());
                        }
                        intents.push(Intent::FieldChanged { field, value });
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                }

                if let Some(err) = self.controller.form().last_error() {
                    ui.colored_label(ui.visuals().error_fg_color, err.to_string());
                }

                ui.add_space(6.0);
                let button = egui::Button::new(
                    egui::RichText::new(self.controller.form().submit_label()).strong(),
                )
                .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add(button).clicked() {
                    submit = true;
                }
            });

        for intent in intents {
            self.dispatch(intent);
        }
        if submit {
            self.dispatch(Intent::SubmitRequested);
        }
    }

    fn show_list(&mut self, ui: &mut egui::Ui) {
        ui.heading("Registered users");
        ui.add_space(6.0);

        let mut search = self.controller.list().search_term().to_string();
        let search_changed = ui
            .horizontal(|ui| {
                ui.label("Search:");
                ui.add(
                    egui::TextEdit::singleline(&mut search)
                        .hint_text("Search by email or name")
                        .desired_width(280.0),
                )
                .changed()
            })
            .inner;
        if search_changed {
            self.dispatch(Intent::SearchChanged(search));
        }

        let total = self.controller.users().len();
        ui.label(format!("Total users registered: {total}"));
        ui.separator();

        let rows: Vec<UserRow> = self
            .controller
            .filtered_users()
            .into_iter()
            .map(|user| UserRow {
                id: user.id,
                email: user.email.clone(),
                name: display_name(user).into_owned(),
                full_name: user.name.clone(),
                age: user.age,
            })
            .collect();

        if let Some(empty) = self.controller.list().empty_state(total, rows.len()) {
            ui.add_space(12.0);
            ui.weak(empty.message());
            return;
        }

        let mut edit = None;
        let mut delete = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("users_grid")
                .num_columns(5)
                .striped(true)
                .spacing([18.0, 6.0])
                .show(ui, |ui| {
                    for header in ["ID", "Email", "Name", "Age", "Actions"] {
                        ui.label(egui::RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in &rows {
                        ui.label(row.id.0.to_string());
                        ui.label(row.email.as_str());
                        ui.label(row.name.as_str())
                            .on_hover_text(row.full_name.as_str());
                        ui.label(row.age.to_string());
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                edit = Some(row.id);
                            }
                            if ui.button("Delete").clicked() {
                                delete = Some(row.id);
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        if let Some(user_id) = edit {
            let intent = self.controller.list().request_edit(user_id);
            self.dispatch(intent);
        }
        if let Some(user_id) = delete {
            self.controller.list_mut().request_delete(user_id);
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(user_id) = self.controller.list().pending_delete() else {
            return;
        };

        let mut answer = None;
        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(DELETE_CONFIRMATION_PROMPT);
                ui.weak(format!("User #{}", user_id.0));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(confirmed) = answer {
            if let Some(intent) = self.controller.list_mut().confirm_delete(confirmed) {
                self.dispatch(intent);
            }
        }
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(notification) = self.controller.notification().cloned() else {
            return;
        };
        let title = match notification.context {
            NotificationContext::Create => "Could not create user",
            NotificationContext::Update => "Could not update user",
            NotificationContext::Delete => "Could not delete user",
        };

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notification.message.as_str());
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.dispatch(Intent::NotificationDismissed);
        }
    }
}

impl eframe::App for UserAdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let blocked = self.controller.notification().is_some()
            || self.controller.list().pending_delete().is_some();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.add_enabled_ui(!blocked, |ui| match self.controller.active_view() {
                View::Form => self.show_form(ui),
                View::List => self.show_list(ui),
            });
        });

        self.show_delete_confirmation(ctx);
        self.show_notification(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
