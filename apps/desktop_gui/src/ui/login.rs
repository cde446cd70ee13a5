//! Sign-in form.

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::backend_bridge::commands::BackendCommand;

/// Login fields kept between runs. The password and session never are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLoginSettings {
    pub api_url: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginFocusField {
    ApiUrl,
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub api_url: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub submitting: bool,
    focus: Option<LoginFocusField>,
}

impl LoginForm {
    pub fn new(api_url: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        let focus = if email.trim().is_empty() {
            LoginFocusField::Email
        } else {
            LoginFocusField::Password
        };
        Self {
            api_url: api_url.into(),
            email,
            focus: Some(focus),
            ..Self::default()
        }
    }

    pub fn persisted(&self) -> PersistedLoginSettings {
        PersistedLoginSettings {
            api_url: self.api_url.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// Checks the fields and builds the login command, marking the form busy.
    pub fn submit(&mut self) -> Option<BackendCommand> {
        if self.submitting {
            return None;
        }
        let email = self.email.trim().to_string();
        if email.is_empty() {
            self.error = Some("Please enter your email.".to_string());
            self.focus = Some(LoginFocusField::Email);
            return None;
        }
        if self.password.is_empty() {
            self.error = Some("Please enter your password.".to_string());
            self.focus = Some(LoginFocusField::Password);
            return None;
        }
        let api_url = self.api_url.trim().to_string();
        if api_url.is_empty() {
            self.error = Some("Please enter a server URL.".to_string());
            self.focus = Some(LoginFocusField::ApiUrl);
            return None;
        }

        self.error = None;
        self.submitting = true;
        Some(BackendCommand::Login {
            api_url,
            email,
            password: self.password.clone(),
        })
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.password.clear();
        self.error = Some(message.into());
        self.focus = Some(LoginFocusField::Password);
    }

    /// Draws the form. Returns the login command when the user submits.
    pub fn show(&mut self, ctx: &egui::Context, status: &str) -> Option<BackendCommand> {
        let mut submit_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(360.0, 480.0);
            ui.add_space((avail.y * 0.12).clamp(18.0, 90.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::group(ui.style())
                    .corner_radius(12.0)
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                        ui.heading("Shift Scheduler");
                        ui.weak("Sign in to see your shifts.");

                        if let Some(error) = &self.error {
                            egui::Frame::NONE
                                .fill(egui::Color32::from_rgb(120, 40, 40))
                                .corner_radius(8.0)
                                .inner_margin(egui::Margin::symmetric(10, 8))
                                .show(ui, |ui| {
                                    ui.label(egui::RichText::new(error).color(egui::Color32::WHITE));
                                });
                        }

                        let focus = self.focus.take();
                        let email = login_field(
                            ui,
                            "Email",
                            egui::TextEdit::singleline(&mut self.email).hint_text("you@example.com"),
                            focus == Some(LoginFocusField::Email),
                        );
                        let password = login_field(
                            ui,
                            "Password",
                            egui::TextEdit::singleline(&mut self.password).password(true),
                            focus == Some(LoginFocusField::Password),
                        );
                        let server = login_field(
                            ui,
                            "Server URL",
                            egui::TextEdit::singleline(&mut self.api_url)
                                .hint_text("http://localhost:8080"),
                            focus == Some(LoginFocusField::ApiUrl),
                        );

                        let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
                        if enter_pressed
                            && (email.lost_focus() || password.lost_focus() || server.lost_focus())
                        {
                            submit_requested = true;
                        }

                        let button = egui::Button::new(egui::RichText::new("Sign in").strong())
                            .min_size(egui::vec2(ui.available_width(), 36.0));
                        ui.horizontal(|ui| {
                            if ui.add_enabled(!self.submitting, button).clicked() {
                                submit_requested = true;
                            }
                        });
                        if self.submitting {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.weak("Signing in...");
                            });
                        }

                        ui.separator();
                        ui.horizontal_wrapped(|ui| {
                            ui.small("Status:");
                            ui.small(egui::RichText::new(status).weak());
                        });
                    });
            });
        });

        if submit_requested {
            self.submit()
        } else {
            None
        }
    }
}

fn login_field(
    ui: &mut egui::Ui,
    label: &str,
    edit: egui::TextEdit<'_>,
    request_focus: bool,
) -> egui::Response {
    ui.label(label);
    let response = ui.add(edit.desired_width(f32::INFINITY));
    if request_focus {
        response.request_focus();
    }
    response
}
