//! Landing screen: profile, month calendar, open shifts and prompts.
//!
//! Rendering only reads the controller. Clicks are collected as
//! [`LandingAction`]s and applied by the app after the frame is drawn.

use calendar::{shifts_on, CalendarCell, WEEKDAY_LABELS};
use eframe::egui;
use shared::{
    domain::{Role, ShiftId},
    protocol::{AssignmentRecord, Shift},
};

use crate::controller::{
    events::Notice,
    landing::{LandingController, LandingState, RegistrationForm, Schedule},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingAction {
    SubmitRegistration,
    SelectShift(ShiftId),
    ConfirmAssign,
    CancelAssign,
    ReleaseShift(ShiftId),
    PreviousMonth,
    NextMonth,
    ThisMonth,
    Refresh,
    DismissNotice,
    SignOut,
}

const DAY_CELL_WIDTH: f32 = 110.0;

pub fn show_landing(
    ctx: &egui::Context,
    controller: &LandingController,
    draft: &mut RegistrationForm,
) -> Vec<LandingAction> {
    let mut actions = Vec::new();
    let notice = controller.current_notice();
    let blocked = notice.is_some();

    egui::TopBottomPanel::top("landing_top_bar").show(ctx, |ui| {
        ui.add_enabled_ui(!blocked, |ui| {
            ui.horizontal(|ui| {
                ui.heading("My Shifts");
                if controller.is_loading() {
                    ui.spinner();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        actions.push(LandingAction::SignOut);
                    }
                    if ui.button("Refresh").clicked() {
                        actions.push(LandingAction::Refresh);
                    }
                });
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_enabled_ui(!blocked, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("landing_scroll")
                .show(ui, |ui| match controller.state() {
                    LandingState::Loading(_) => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.spinner();
                            ui.weak("Loading your schedule...");
                        });
                    }
                    LandingState::ProfileMissing(registration) => {
                        show_registration(ui, draft, registration.submitting, &mut actions);
                    }
                    LandingState::Ready(schedule) | LandingState::AssignConfirm { schedule, .. } => {
                        show_schedule(ui, controller, schedule, &mut actions);
                    }
                });
        });
    });

    if let LandingState::AssignConfirm { shift, .. } = controller.state() {
        if !blocked {
            show_assign_prompt(ctx, shift, &mut actions);
        }
    }
    if let Some(notice) = notice {
        show_notice(ctx, notice, &mut actions);
    }

    actions
}

fn show_registration(
    ui: &mut egui::Ui,
    draft: &mut RegistrationForm,
    submitting: bool,
    actions: &mut Vec<LandingAction>,
) {
    ui.heading("Create your worker profile");
    ui.weak("We could not find a profile for your account. Tell us who you are to see open shifts.");
    ui.add_space(8.0);

    egui::Grid::new("registration_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("Full name"));
            ui.end_row();

            ui.label("Role");
            egui::ComboBox::from_id_salt("registration_role")
                .selected_text(draft.role.map(Role::label).unwrap_or("Select a role"))
                .show_ui(ui, |ui| {
                    for role in Role::ALL {
                        ui.selectable_value(&mut draft.role, Some(role), role.label());
                    }
                });
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!submitting, egui::Button::new("Save profile"))
            .clicked()
        {
            actions.push(LandingAction::SubmitRegistration);
        }
        if submitting {
            ui.spinner();
        }
    });
}

fn show_schedule(
    ui: &mut egui::Ui,
    controller: &LandingController,
    schedule: &Schedule,
    actions: &mut Vec<LandingAction>,
) {
    let editable = controller.can_modify_assignments();
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(&schedule.profile.name).strong().size(18.0));
        ui.weak(schedule.profile.role.label());
    });
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("<").clicked() {
            actions.push(LandingAction::PreviousMonth);
        }
        ui.label(egui::RichText::new(controller.month().label()).strong());
        if ui.button(">").clicked() {
            actions.push(LandingAction::NextMonth);
        }
        if ui.button("Today").clicked() {
            actions.push(LandingAction::ThisMonth);
        }
    });

    match controller.calendar() {
        Ok(month) => {
            egui::Grid::new("month_grid")
                .num_columns(WEEKDAY_LABELS.len())
                .min_col_width(DAY_CELL_WIDTH)
                .striped(true)
                .show(ui, |ui| {
                    for label in WEEKDAY_LABELS {
                        ui.label(egui::RichText::new(label).strong());
                    }
                    ui.end_row();
                    for week in month.weeks() {
                        for cell in week {
                            show_day_cell(ui, cell, schedule, editable, actions);
                        }
                        ui.end_row();
                    }
                });
        }
        Err(err) => {
            ui.colored_label(egui::Color32::LIGHT_RED, format!("Calendar unavailable: {err}"));
        }
    }

    ui.add_space(12.0);
    ui.heading("Upcoming shifts");
    let today_key = calendar::day_key(controller.today());
    let mut upcoming = schedule
        .upcoming()
        .filter(|(day, _)| *day >= today_key.as_str())
        .peekable();
    if upcoming.peek().is_none() {
        ui.weak("No upcoming shifts.");
    }
    for (day, record) in upcoming {
        ui.horizontal(|ui| {
            ui.label(day);
            ui.label(assignment_summary(record));
        });
    }

    ui.add_space(12.0);
    ui.heading("Open shifts for your role");
    let mut eligible = schedule.eligible_shifts().peekable();
    if eligible.peek().is_none() {
        ui.weak("No open shifts match your role right now.");
    }
    for shift in eligible {
        ui.horizontal(|ui| {
            ui.label(shift.date.format("%a %d %b").to_string());
            ui.label(shift.time_range_label());
            if ui
                .add_enabled(editable, egui::Button::new("Take shift"))
                .clicked()
            {
                actions.push(LandingAction::SelectShift(shift.id));
            }
        });
    }
}

fn show_day_cell(
    ui: &mut egui::Ui,
    cell: &CalendarCell,
    schedule: &Schedule,
    editable: bool,
    actions: &mut Vec<LandingAction>,
) {
    let Some(date) = cell.date else {
        ui.label("");
        return;
    };

    ui.vertical(|ui| {
        let day = egui::RichText::new(date.format("%-d").to_string());
        if cell.is_today {
            ui.label(day.strong().color(egui::Color32::LIGHT_BLUE));
        } else {
            ui.label(day);
        }
        for record in shifts_on(&schedule.by_day, date) {
            ui.horizontal(|ui| {
                ui.small(assignment_summary(record));
                if let Some(shift_id) = record.effective_shift_id() {
                    if ui
                        .add_enabled(editable, egui::Button::new("x").small())
                        .on_hover_text("Release this shift")
                        .clicked()
                    {
                        actions.push(LandingAction::ReleaseShift(shift_id));
                    }
                }
            });
        }
    });
}

fn assignment_summary(record: &AssignmentRecord) -> String {
    let role = record
        .effective_role()
        .and_then(|raw| raw.parse::<Role>().ok())
        .map(Role::label);
    match (record.time_range_label(), role) {
        (Some(times), Some(role)) => format!("{times} {role}"),
        (Some(times), None) => times,
        (None, Some(role)) => role.to_string(),
        (None, None) => "Shift".to_string(),
    }
}

fn show_assign_prompt(ctx: &egui::Context, shift: &Shift, actions: &mut Vec<LandingAction>) {
    egui::Window::new("Take this shift?")
        .id(egui::Id::new("assign_confirm_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(shift.date.format("%A %d %B %Y").to_string());
            ui.label(shift.time_range_label());
            ui.weak(format!("Role: {}", shift.required_role));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Confirm").clicked() {
                    actions.push(LandingAction::ConfirmAssign);
                }
                if ui.button("Cancel").clicked() {
                    actions.push(LandingAction::CancelAssign);
                }
            });
        });
}

fn show_notice(ctx: &egui::Context, notice: &Notice, actions: &mut Vec<LandingAction>) {
    egui::Window::new(notice.title.as_str())
        .id(egui::Id::new("landing_notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(&notice.message);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    actions.push(LandingAction::DismissNotice);
                }
                if notice.suggest_sign_out && ui.button("Sign in again").clicked() {
                    actions.push(LandingAction::DismissNotice);
                    actions.push(LandingAction::SignOut);
                }
            });
        });
}
