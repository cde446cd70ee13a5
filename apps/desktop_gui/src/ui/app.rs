//! App shell: routes between the login form and the landing screen and
//! pumps backend events into whichever is showing.

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use tracing::{debug, info};

use crate::backend_bridge::commands::{BackendCommand, Ticket};
use crate::controller::{
    events::{Notice, UiError, UiEvent},
    landing::{LandingController, RegistrationForm},
    orchestration::{dispatch_backend_commands, DispatchFailure},
};
use crate::ui::{
    landing::{show_landing, LandingAction},
    login::{LoginForm, PersistedLoginSettings},
};

pub const LOGIN_SETTINGS_STORAGE_KEY: &str = "shift_scheduler_login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub api_url: String,
    /// Set when the URL came from the command line and must win over the
    /// last-used one.
    pub api_url_pinned: bool,
    pub email: Option<String>,
}

struct LandingScreen {
    controller: LandingController,
    draft: RegistrationForm,
}

enum Route {
    Login(LoginForm),
    Landing(Box<LandingScreen>),
}

pub struct SchedulerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    route: Route,
    login_settings: PersistedLoginSettings,
    last_ticket: Ticket,
    status: String,
}

impl SchedulerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        persisted: Option<PersistedLoginSettings>,
    ) -> Self {
        let persisted = persisted.unwrap_or_default();
        let api_url = if startup.api_url_pinned || persisted.api_url.trim().is_empty() {
            startup.api_url
        } else {
            persisted.api_url
        };
        let email = startup.email.unwrap_or(persisted.email);
        let login_settings = PersistedLoginSettings { api_url, email };

        Self {
            cmd_tx,
            ui_rx,
            route: Route::Login(LoginForm::new(
                login_settings.api_url.clone(),
                login_settings.email.clone(),
            )),
            login_settings,
            last_ticket: 0,
            status: "Not signed in".to_string(),
        }
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_ui_event(event);
        }
    }

    fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => self.report(err),
            UiEvent::LoggedIn(session) => {
                let Route::Login(form) = &self.route else {
                    debug!("ignoring login result outside the login screen");
                    return;
                };
                if !form.submitting {
                    debug!("ignoring login result nobody is waiting for");
                    return;
                }
                self.login_settings = form.persisted();
                info!(user_id = %session.user_id, "signed in");

                let ticket = self.next_ticket();
                let today = chrono::Local::now().date_naive();
                let mut controller = LandingController::new(session, ticket, today);
                let commands = controller.start();
                self.route = Route::Landing(Box::new(LandingScreen {
                    controller,
                    draft: RegistrationForm::default(),
                }));
                self.status = "Signed in".to_string();
                self.dispatch(commands);
            }
            UiEvent::LoginFailed(err) => match &mut self.route {
                Route::Login(form) => form.fail(err.message()),
                Route::Landing(_) => debug!("ignoring late login failure"),
            },
            UiEvent::Landing { ticket, event } => {
                let Route::Landing(screen) = &mut self.route else {
                    debug!(ticket, "dropping landing result after sign-out");
                    return;
                };
                let commands = screen.controller.apply(ticket, event);
                self.dispatch(commands);
            }
        }
    }

    fn report(&mut self, err: UiError) {
        self.status = err.message().to_string();
        match &mut self.route {
            Route::Login(form) => {
                form.submitting = false;
                form.error = Some(err.message().to_string());
            }
            Route::Landing(screen) => screen.controller.push_notice(Notice::from(&err)),
        }
    }

    fn dispatch(&mut self, commands: Vec<BackendCommand>) {
        if commands.is_empty() {
            return;
        }
        let Err(DispatchFailure { error, undelivered }) =
            dispatch_backend_commands(&self.cmd_tx, commands)
        else {
            return;
        };
        self.status = error.message().to_string();
        match &mut self.route {
            Route::Login(form) => form.fail(error.message()),
            Route::Landing(screen) => {
                let follow_up: Vec<_> = undelivered
                    .into_iter()
                    .flat_map(|cmd| screen.controller.command_failed(cmd, error.clone()))
                    .collect();
                self.dispatch(follow_up);
            }
        }
    }

    fn apply_landing_action(&mut self, action: LandingAction) {
        let Route::Landing(screen) = &mut self.route else {
            return;
        };
        let LandingScreen { controller, draft } = &mut **screen;
        let commands = match action {
            LandingAction::SubmitRegistration => controller.submit_registration(draft),
            LandingAction::SelectShift(shift_id) => {
                controller.select_shift(shift_id);
                Vec::new()
            }
            LandingAction::ConfirmAssign => controller.confirm_assign(),
            LandingAction::CancelAssign => {
                controller.cancel_assign();
                Vec::new()
            }
            LandingAction::ReleaseShift(shift_id) => controller.release_shift(shift_id),
            LandingAction::PreviousMonth => {
                controller.previous_month();
                Vec::new()
            }
            LandingAction::NextMonth => {
                controller.next_month();
                Vec::new()
            }
            LandingAction::ThisMonth => {
                controller.this_month();
                Vec::new()
            }
            LandingAction::Refresh => {
                self.last_ticket += 1;
                controller.reload(self.last_ticket)
            }
            LandingAction::DismissNotice => {
                controller.dismiss_notice();
                Vec::new()
            }
            LandingAction::SignOut => {
                self.sign_out();
                return;
            }
        };
        self.dispatch(commands);
    }

    fn sign_out(&mut self) {
        info!("signed out");
        self.route = Route::Login(LoginForm::new(
            self.login_settings.api_url.clone(),
            self.login_settings.email.clone(),
        ));
        self.status = "Signed out".to_string();
    }

    fn current_login_settings(&self) -> PersistedLoginSettings {
        match &self.route {
            Route::Login(form) => form.persisted(),
            Route::Landing(_) => self.login_settings.clone(),
        }
    }
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        match &mut self.route {
            Route::Login(form) => {
                if let Some(cmd) = form.show(ctx, &self.status) {
                    self.status = "Signing in...".to_string();
                    self.dispatch(vec![cmd]);
                }
            }
            Route::Landing(screen) => {
                let actions = show_landing(ctx, &screen.controller, &mut screen.draft);
                for action in actions {
                    self.apply_landing_action(action);
                }
            }
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.current_login_settings()) {
            storage.set_string(LOGIN_SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
