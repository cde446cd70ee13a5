//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, SchedulerApi, SchedulerClient};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::landing::LandingEvent;

/// Starts the backend worker thread. It owns a tokio runtime and one
/// [`SchedulerClient`], rebuilt whenever a login targets a different server.
pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut api: Option<Arc<SchedulerClient>> = match SchedulerClient::new(&settings) {
                Ok(client) => Some(Arc::new(client)),
                Err(err) => {
                    // The login form can still supply a working URL.
                    error!("failed to build scheduling client for {}: {err:#}", settings.api_url);
                    None
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                if let BackendCommand::Login { api_url, .. } = &cmd {
                    match rebind(api.as_deref(), &settings, api_url) {
                        Ok(Some(client)) => {
                            info!(api_url = client.api_url(), "scheduling client rebound");
                            api = Some(Arc::new(client));
                        }
                        Ok(None) => {}
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::LoginFailed(err));
                            continue;
                        }
                    }
                }

                let Some(client) = api.clone() else {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        "No valid API URL configured; sign in again with a server URL",
                    )));
                    continue;
                };

                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute_command(client.as_ref(), cmd).await;
                    deliver(&ui_tx, event).await;
                });
            }
            debug!("ui command channel closed; backend worker exiting");
        });
    });
}

/// Hands a command result to the UI. A full queue is waited out on the
/// blocking pool; results are only lost once the UI has gone away.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            debug!("ui event channel closed; dropping result");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };
    warn!("ui event queue is full; waiting to deliver result");
    let ui_tx = ui_tx.clone();
    match tokio::task::spawn_blocking(move || ui_tx.send(event)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => debug!("ui event channel closed; dropping result"),
        Err(err) => error!("result delivery task failed: {err}"),
    }
}

/// Builds a replacement client when `requested` names a different server
/// than the current one.
fn rebind(
    current: Option<&SchedulerClient>,
    settings: &ClientSettings,
    requested: &str,
) -> Result<Option<SchedulerClient>, UiError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Ok(None);
    }
    let normalized = client_core::normalize_api_url(requested).map_err(|err| {
        UiError::from_message(UiErrorContext::Login, format!("Invalid server URL: {err}"))
    })?;
    if current.is_some_and(|client| client.api_url() == normalized) {
        return Ok(None);
    }

    let settings = ClientSettings {
        api_url: normalized,
        ..settings.clone()
    };
    SchedulerClient::new(&settings).map(Some).map_err(|err| {
        UiError::from_message(
            UiErrorContext::BackendStartup,
            format!("failed to build scheduling client: {err:#}"),
        )
    })
}

/// Runs one command against the API and folds the outcome into a UI event.
pub async fn execute_command(api: &dyn SchedulerApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Login {
            email, password, ..
        } => match api.login(&email, &password).await {
            Ok(session) => UiEvent::LoggedIn(session),
            Err(err) => UiEvent::LoginFailed(UiError::from_client_error(UiErrorContext::Login, &err)),
        },
        BackendCommand::LoadProfile { session, ticket } => {
            let event = match api.fetch_profile(&session).await {
                Ok(profile) => LandingEvent::ProfileFound(profile),
                Err(err) if err.is_missing_profile() => {
                    info!(user_id = %session.user_id, "no worker profile registered yet");
                    LandingEvent::ProfileMissing(None)
                }
                Err(err) => LandingEvent::ProfileMissing(Some(UiError::from_client_error(
                    UiErrorContext::Profile,
                    &err,
                ))),
            };
            UiEvent::Landing { ticket, event }
        }
        BackendCommand::LoadAssignments {
            session,
            worker_id,
            ticket,
        } => {
            let result = api
                .list_assignments(&session, worker_id)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::Shifts, &err));
            UiEvent::Landing {
                ticket,
                event: LandingEvent::AssignmentsLoaded(result),
            }
        }
        BackendCommand::LoadUnassigned { session, ticket } => {
            let result = api
                .list_unassigned_shifts(&session)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::Shifts, &err));
            UiEvent::Landing {
                ticket,
                event: LandingEvent::UnassignedLoaded(result),
            }
        }
        BackendCommand::RegisterProfile {
            session,
            profile,
            ticket,
        } => {
            let result = api
                .create_profile(&session, &profile)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::Registration, &err));
            UiEvent::Landing {
                ticket,
                event: LandingEvent::ProfileRegistered(result),
            }
        }
        BackendCommand::AssignShift {
            session,
            shift_id,
            worker_id,
            ticket,
        } => {
            let result = api
                .assign_shift(&session, shift_id, worker_id)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::Assign, &err));
            UiEvent::Landing {
                ticket,
                event: LandingEvent::ShiftAssigned(result),
            }
        }
        BackendCommand::ReleaseShift {
            session,
            shift_id,
            worker_id,
            ticket,
        } => {
            let result = api
                .unassign_shift(&session, shift_id, worker_id)
                .await
                .map_err(|err| UiError::from_client_error(UiErrorContext::Assign, &err));
            UiEvent::Landing {
                ticket,
                event: LandingEvent::ShiftReleased(result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorCategory;
    use async_trait::async_trait;
    use client_core::ClientError;
    use shared::{
        domain::{Role, Session, ShiftId, UserId, WorkerId},
        protocol::{AssignmentRecord, NewWorkerProfile, Shift, WorkerProfile},
    };

    const WORKER_ID: &str = "5f0c4d2e-0000-4000-8000-000000000042";

    /// Answers every call with a fixed outcome for the profile lookup and
    /// success everywhere else.
    struct FakeApi {
        profile_status: Option<u16>,
        reject_assign: bool,
    }

    impl FakeApi {
        fn healthy() -> Self {
            Self {
                profile_status: None,
                reject_assign: false,
            }
        }
    }

    #[async_trait]
    impl SchedulerApi for FakeApi {
        async fn login(&self, email: &str, password: &str) -> client_core::Result<Session> {
            if password == "secret" {
                Ok(Session::new("tok", UserId(email.to_string())))
            } else {
                Err(ClientError::from_status(401, "Invalid credentials"))
            }
        }

        async fn fetch_profile(&self, _session: &Session) -> client_core::Result<WorkerProfile> {
            match self.profile_status {
                Some(status) => Err(ClientError::from_status(status, "profile lookup failed")),
                None => Ok(WorkerProfile {
                    id: WORKER_ID.parse().expect("id"),
                    name: "Ada".to_string(),
                    role: Role::Floor,
                }),
            }
        }

        async fn create_profile(
            &self,
            _session: &Session,
            _profile: &NewWorkerProfile,
        ) -> client_core::Result<()> {
            Ok(())
        }

        async fn list_shifts(&self, _session: &Session) -> client_core::Result<Vec<Shift>> {
            Ok(Vec::new())
        }

        async fn list_unassigned_shifts(&self, _session: &Session) -> client_core::Result<Vec<Shift>> {
            Err(ClientError::Decode("expected a list".to_string()))
        }

        async fn list_assignments(
            &self,
            _session: &Session,
            _worker_id: WorkerId,
        ) -> client_core::Result<Vec<AssignmentRecord>> {
            Ok(vec![AssignmentRecord::default()])
        }

        async fn assign_shift(
            &self,
            _session: &Session,
            _shift_id: ShiftId,
            _worker_id: WorkerId,
        ) -> client_core::Result<()> {
            if self.reject_assign {
                Err(ClientError::from_status(400, "Assignment already exists"))
            } else {
                Ok(())
            }
        }

        async fn unassign_shift(
            &self,
            _session: &Session,
            _shift_id: ShiftId,
            _worker_id: WorkerId,
        ) -> client_core::Result<()> {
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new("tok", UserId("user-1".to_string()))
    }

    #[tokio::test]
    async fn login_outcomes_map_to_login_events() {
        let api = FakeApi::healthy();
        let ok = execute_command(
            &api,
            BackendCommand::Login {
                api_url: String::new(),
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .await;
        assert!(matches!(ok, UiEvent::LoggedIn(session) if session.token == "tok"));

        let failed = execute_command(
            &api,
            BackendCommand::Login {
                api_url: String::new(),
                email: "ada@example.com".to_string(),
                password: "nope".to_string(),
            },
        )
        .await;
        let UiEvent::LoginFailed(err) = failed else {
            panic!("expected login failure");
        };
        assert_eq!(err.message(), "Sign-in rejected: Invalid credentials");
    }

    #[tokio::test]
    async fn unregistered_profile_is_silent_but_other_failures_carry_an_error() {
        let missing = FakeApi {
            profile_status: Some(404),
            ..FakeApi::healthy()
        };
        let event = execute_command(
            &missing,
            BackendCommand::LoadProfile {
                session: session(),
                ticket: 3,
            },
        )
        .await;
        assert!(matches!(
            event,
            UiEvent::Landing {
                ticket: 3,
                event: LandingEvent::ProfileMissing(None)
            }
        ));

        let broken = FakeApi {
            profile_status: Some(500),
            ..FakeApi::healthy()
        };
        let event = execute_command(
            &broken,
            BackendCommand::LoadProfile {
                session: session(),
                ticket: 3,
            },
        )
        .await;
        let UiEvent::Landing {
            event: LandingEvent::ProfileMissing(Some(err)),
            ..
        } = event
        else {
            panic!("expected profile error");
        };
        assert_eq!(err.context(), UiErrorContext::Profile);
    }

    #[tokio::test]
    async fn list_failures_are_reported_against_the_ticket() {
        let event = execute_command(
            &FakeApi::healthy(),
            BackendCommand::LoadUnassigned {
                session: session(),
                ticket: 9,
            },
        )
        .await;
        let UiEvent::Landing {
            ticket,
            event: LandingEvent::UnassignedLoaded(Err(err)),
        } = event
        else {
            panic!("expected unassigned failure");
        };
        assert_eq!(ticket, 9);
        assert_eq!(err.context(), UiErrorContext::Shifts);
    }

    #[tokio::test]
    async fn rejected_assignment_keeps_service_message() {
        let api = FakeApi {
            reject_assign: true,
            ..FakeApi::healthy()
        };
        let event = execute_command(
            &api,
            BackendCommand::AssignShift {
                session: session(),
                shift_id: "0b8e6a4c-0000-4000-8000-000000000007".parse().expect("shift"),
                worker_id: WORKER_ID.parse().expect("worker"),
                ticket: 1,
            },
        )
        .await;
        let UiEvent::Landing {
            event: LandingEvent::ShiftAssigned(Err(err)),
            ..
        } = event
        else {
            panic!("expected assign failure");
        };
        assert_eq!(err.message(), "Assignment already exists");
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[tokio::test]
    async fn results_wait_for_room_instead_of_being_dropped() {
        let (ui_tx, ui_rx) = crossbeam_channel::bounded(1);
        ui_tx
            .try_send(UiEvent::Info("first".to_string()))
            .expect("room for first");

        let sender = ui_tx.clone();
        let pending = tokio::spawn(async move {
            deliver(&sender, UiEvent::Info("second".to_string())).await;
        });

        let received = tokio::task::spawn_blocking(move || {
            let first = ui_rx.recv().expect("first event");
            let second = ui_rx.recv().expect("second event");
            (first, second)
        })
        .await
        .expect("receiver task");
        pending.await.expect("delivery task");

        assert!(matches!(received.0, UiEvent::Info(ref m) if m == "first"));
        assert!(matches!(received.1, UiEvent::Info(ref m) if m == "second"));
    }

    #[test]
    fn rebind_only_when_the_server_changes() {
        let settings = ClientSettings::default();
        let current = SchedulerClient::new(&settings).expect("client");

        assert!(rebind(Some(&current), &settings, "").expect("blank").is_none());
        assert!(rebind(Some(&current), &settings, "localhost:8080/")
            .expect("same")
            .is_none());

        let other = rebind(Some(&current), &settings, "https://shifts.example.com")
            .expect("other")
            .expect("rebuilt");
        assert_eq!(other.api_url(), "https://shifts.example.com");

        let err = rebind(None, &settings, "ftp://example.com").expect_err("bad scheme");
        assert_eq!(err.context(), UiErrorContext::Login);
    }
}
