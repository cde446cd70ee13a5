//! Landing-screen state machine.
//!
//! The controller never talks to the network. Every user action and backend
//! result goes through a method that updates [`LandingState`] and returns the
//! backend commands to queue, so the whole flow is testable without egui.

use std::collections::VecDeque;

use calendar::{bind_assignments, CalendarError, MonthCursor, MonthMatrix, ShiftsByDay};
use chrono::NaiveDate;
use shared::{
    domain::{Role, Session, ShiftId},
    protocol::{AssignmentRecord, NewWorkerProfile, Shift, WorkerProfile},
};
use tracing::{debug, warn};

use crate::{
    backend_bridge::commands::{BackendCommand, Ticket},
    controller::events::{Notice, UiError},
};

/// Backend results addressed to the landing screen.
#[derive(Debug, Clone)]
pub enum LandingEvent {
    ProfileFound(WorkerProfile),
    /// No profile for this user. Carries the error when the lookup failed for
    /// a reason other than "not registered yet".
    ProfileMissing(Option<UiError>),
    AssignmentsLoaded(Result<Vec<AssignmentRecord>, UiError>),
    UnassignedLoaded(Result<Vec<Shift>, UiError>),
    ProfileRegistered(Result<(), UiError>),
    ShiftAssigned(Result<(), UiError>),
    ShiftReleased(Result<(), UiError>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileSlot {
    #[default]
    Pending,
    Found(WorkerProfile),
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct PendingLoad {
    pub profile: ProfileSlot,
    pub assignments: Option<Vec<AssignmentRecord>>,
    pub unassigned: Option<Vec<Shift>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub submitting: bool,
    unassigned: Vec<Shift>,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    pub profile: WorkerProfile,
    pub assignments: Vec<AssignmentRecord>,
    pub by_day: ShiftsByDay,
    pub unassigned: Vec<Shift>,
    outstanding: u8,
}

impl Schedule {
    fn new(profile: WorkerProfile, assignments: Vec<AssignmentRecord>, unassigned: Vec<Shift>) -> Self {
        let by_day = bind_assignments(&assignments);
        Self {
            profile,
            assignments,
            by_day,
            unassigned,
            outstanding: 0,
        }
    }

    fn replace_assignments(&mut self, assignments: Vec<AssignmentRecord>) {
        self.by_day = bind_assignments(&assignments);
        self.assignments = assignments;
    }

    fn settle_one(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    pub fn is_busy(&self) -> bool {
        self.outstanding > 0
    }

    /// Open shifts this worker may claim.
    pub fn eligible_shifts(&self) -> impl Iterator<Item = &Shift> {
        let role = self.profile.role;
        self.unassigned.iter().filter(move |shift| shift.is_for_role(role))
    }

    /// Assignments with a usable day, in date order.
    pub fn upcoming(&self) -> impl Iterator<Item = (&str, &AssignmentRecord)> {
        self.by_day
            .iter()
            .flat_map(|(day, records)| records.iter().map(move |record| (day.as_str(), record)))
    }
}

#[derive(Debug, Clone)]
pub enum LandingState {
    Loading(PendingLoad),
    ProfileMissing(Registration),
    Ready(Schedule),
    AssignConfirm { schedule: Schedule, shift: Shift },
}

impl Default for LandingState {
    fn default() -> Self {
        LandingState::Loading(PendingLoad::default())
    }
}

pub struct LandingController {
    session: Session,
    ticket: Ticket,
    state: LandingState,
    month: MonthCursor,
    today: NaiveDate,
    notices: VecDeque<Notice>,
}

impl LandingController {
    pub fn new(session: Session, ticket: Ticket, today: NaiveDate) -> Self {
        Self {
            session,
            ticket,
            state: LandingState::default(),
            month: MonthCursor::containing(today),
            today,
            notices: VecDeque::new(),
        }
    }

    /// Initial fetches. Assigned shifts wait for the profile because they are
    /// keyed by worker id.
    pub fn start(&mut self) -> Vec<BackendCommand> {
        self.state = LandingState::default();
        vec![self.load_profile(), self.load_unassigned()]
    }

    /// Restarts the visit under a fresh ticket; in-flight results are dropped.
    pub fn reload(&mut self, ticket: Ticket) -> Vec<BackendCommand> {
        self.ticket = ticket;
        self.start()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn state(&self) -> &LandingState {
        &self.state
    }

    pub fn month(&self) -> MonthCursor {
        self.month
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn calendar(&self) -> Result<MonthMatrix, CalendarError> {
        self.month.build(Some(self.today))
    }

    pub fn is_loading(&self) -> bool {
        match &self.state {
            LandingState::Loading(_) => true,
            LandingState::ProfileMissing(registration) => registration.submitting,
            LandingState::Ready(schedule) => schedule.is_busy(),
            LandingState::AssignConfirm { schedule, .. } => schedule.is_busy(),
        }
    }

    pub fn profile(&self) -> Option<&WorkerProfile> {
        self.schedule().map(|schedule| &schedule.profile)
    }

    /// Role-filtered open shifts. Empty until a profile exists.
    pub fn eligible_shifts(&self) -> Vec<&Shift> {
        self.schedule()
            .map(|schedule| schedule.eligible_shifts().collect())
            .unwrap_or_default()
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    pub fn this_month(&mut self) {
        self.month = MonthCursor::containing(self.today);
    }

    pub fn submit_registration(&mut self, form: &RegistrationForm) -> Vec<BackendCommand> {
        let LandingState::ProfileMissing(registration) = &mut self.state else {
            return Vec::new();
        };
        if registration.submitting {
            return Vec::new();
        }

        let name = form.name.trim();
        let Some(role) = form.role else {
            self.notices
                .push_back(Notice::info("Missing role", "Select a role before saving."));
            return Vec::new();
        };
        if name.is_empty() {
            self.notices
                .push_back(Notice::info("Missing name", "Enter your name before saving."));
            return Vec::new();
        }

        registration.submitting = true;
        vec![BackendCommand::RegisterProfile {
            session: self.session.clone(),
            profile: NewWorkerProfile {
                name: name.to_string(),
                role,
            },
            ticket: self.ticket,
        }]
    }

    /// Opens the confirmation prompt for an eligible open shift.
    pub fn select_shift(&mut self, shift_id: ShiftId) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            LandingState::Ready(schedule) => {
                let picked = schedule
                    .eligible_shifts()
                    .find(|shift| shift.id == shift_id)
                    .cloned();
                match picked {
                    Some(shift) => LandingState::AssignConfirm { schedule, shift },
                    None => {
                        warn!(%shift_id, "selected shift is not open for this worker");
                        LandingState::Ready(schedule)
                    }
                }
            }
            other => other,
        };
    }

    pub fn cancel_assign(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            LandingState::AssignConfirm { schedule, .. } => LandingState::Ready(schedule),
            other => other,
        };
    }

    pub fn confirm_assign(&mut self) -> Vec<BackendCommand> {
        let state = std::mem::take(&mut self.state);
        match state {
            LandingState::AssignConfirm {
                mut schedule,
                shift,
            } => {
                schedule.outstanding += 1;
                let command = BackendCommand::AssignShift {
                    session: self.session.clone(),
                    shift_id: shift.id,
                    worker_id: schedule.profile.id,
                    ticket: self.ticket,
                };
                self.state = LandingState::Ready(schedule);
                vec![command]
            }
            other => {
                self.state = other;
                Vec::new()
            }
        }
    }

    /// Assign and release are only offered on an idle, unprompted schedule.
    pub fn can_modify_assignments(&self) -> bool {
        matches!(&self.state, LandingState::Ready(schedule) if !schedule.is_busy())
    }

    pub fn release_shift(&mut self, shift_id: ShiftId) -> Vec<BackendCommand> {
        if !self.can_modify_assignments() {
            debug!(%shift_id, "release ignored while the schedule is busy or prompting");
            return Vec::new();
        }
        let session = self.session.clone();
        let ticket = self.ticket;
        let LandingState::Ready(schedule) = &mut self.state else {
            return Vec::new();
        };
        schedule.outstanding += 1;
        vec![BackendCommand::ReleaseShift {
            session,
            shift_id,
            worker_id: schedule.profile.id,
            ticket,
        }]
    }

    /// Applies a backend result. Results from another visit are ignored.
    pub fn apply(&mut self, ticket: Ticket, event: LandingEvent) -> Vec<BackendCommand> {
        if ticket != self.ticket {
            debug!(ticket, current = self.ticket, "dropping stale landing result");
            return Vec::new();
        }

        let state = std::mem::take(&mut self.state);
        let (next, commands) = match state {
            LandingState::Loading(pending) => self.apply_loading(pending, event),
            LandingState::ProfileMissing(registration) => {
                self.apply_registration(registration, event)
            }
            LandingState::Ready(schedule) => {
                let (schedule, commands) = self.apply_schedule(schedule, event);
                (LandingState::Ready(schedule), commands)
            }
            LandingState::AssignConfirm { schedule, shift } => {
                let (schedule, commands) = self.apply_schedule(schedule, event);
                (LandingState::AssignConfirm { schedule, shift }, commands)
            }
        };
        self.state = next;
        commands
    }

    /// Settles a command that never reached the backend as if it had failed
    /// with `error`, so nothing waits on a result that will not come.
    pub fn command_failed(&mut self, cmd: BackendCommand, error: UiError) -> Vec<BackendCommand> {
        let (ticket, event) = match cmd {
            BackendCommand::Login { .. } => return Vec::new(),
            BackendCommand::LoadProfile { ticket, .. } => {
                (ticket, LandingEvent::ProfileMissing(Some(error)))
            }
            BackendCommand::LoadAssignments { ticket, .. } => {
                (ticket, LandingEvent::AssignmentsLoaded(Err(error)))
            }
            BackendCommand::LoadUnassigned { ticket, .. } => {
                (ticket, LandingEvent::UnassignedLoaded(Err(error)))
            }
            BackendCommand::RegisterProfile { ticket, .. } => {
                (ticket, LandingEvent::ProfileRegistered(Err(error)))
            }
            BackendCommand::AssignShift { ticket, .. } => {
                (ticket, LandingEvent::ShiftAssigned(Err(error)))
            }
            BackendCommand::ReleaseShift { ticket, .. } => {
                (ticket, LandingEvent::ShiftReleased(Err(error)))
            }
        };
        self.apply(ticket, event)
    }

    fn apply_loading(
        &mut self,
        mut pending: PendingLoad,
        event: LandingEvent,
    ) -> (LandingState, Vec<BackendCommand>) {
        let mut commands = Vec::new();
        match event {
            LandingEvent::ProfileFound(profile) => {
                commands.push(BackendCommand::LoadAssignments {
                    session: self.session.clone(),
                    worker_id: profile.id,
                    ticket: self.ticket,
                });
                pending.profile = ProfileSlot::Found(profile);
            }
            LandingEvent::ProfileMissing(error) => {
                if let Some(error) = error {
                    self.push_error(&error);
                }
                pending.profile = ProfileSlot::Missing;
            }
            LandingEvent::AssignmentsLoaded(result) => {
                pending.assignments = Some(self.absorb(result));
            }
            LandingEvent::UnassignedLoaded(result) => {
                pending.unassigned = Some(self.absorb(result));
            }
            other => {
                debug!(?other, "ignoring landing event while loading");
            }
        }
        (settle(pending), commands)
    }

    fn apply_registration(
        &mut self,
        mut registration: Registration,
        event: LandingEvent,
    ) -> (LandingState, Vec<BackendCommand>) {
        match event {
            LandingEvent::ProfileRegistered(Ok(())) => {
                let pending = PendingLoad {
                    unassigned: Some(registration.unassigned),
                    ..PendingLoad::default()
                };
                (LandingState::Loading(pending), vec![self.load_profile()])
            }
            LandingEvent::ProfileRegistered(Err(error)) => {
                self.push_error(&error);
                registration.submitting = false;
                (LandingState::ProfileMissing(registration), Vec::new())
            }
            LandingEvent::UnassignedLoaded(result) => {
                registration.unassigned = self.absorb(result);
                (LandingState::ProfileMissing(registration), Vec::new())
            }
            other => {
                debug!(?other, "ignoring landing event while registering");
                (LandingState::ProfileMissing(registration), Vec::new())
            }
        }
    }

    fn apply_schedule(
        &mut self,
        mut schedule: Schedule,
        event: LandingEvent,
    ) -> (Schedule, Vec<BackendCommand>) {
        let mut commands = Vec::new();
        match event {
            LandingEvent::AssignmentsLoaded(result) => {
                schedule.settle_one();
                let assignments = self.absorb(result);
                schedule.replace_assignments(assignments);
            }
            LandingEvent::UnassignedLoaded(result) => {
                schedule.settle_one();
                schedule.unassigned = self.absorb(result);
            }
            LandingEvent::ShiftAssigned(result) | LandingEvent::ShiftReleased(result) => {
                schedule.settle_one();
                match result {
                    Ok(()) => {
                        schedule.outstanding += 2;
                        commands.push(BackendCommand::LoadAssignments {
                            session: self.session.clone(),
                            worker_id: schedule.profile.id,
                            ticket: self.ticket,
                        });
                        commands.push(self.load_unassigned());
                    }
                    Err(error) => self.push_error(&error),
                }
            }
            other => {
                debug!(?other, "ignoring landing event for loaded schedule");
            }
        }
        (schedule, commands)
    }

    fn absorb<T>(&mut self, result: Result<Vec<T>, UiError>) -> Vec<T> {
        match result {
            Ok(items) => items,
            Err(error) => {
                self.push_error(&error);
                Vec::new()
            }
        }
    }

    fn push_error(&mut self, error: &UiError) {
        warn!(context = ?error.context(), "{}", error.message());
        let notice = Notice::from(error);
        if self.notices.back() != Some(&notice) {
            self.notices.push_back(notice);
        }
    }

    fn schedule(&self) -> Option<&Schedule> {
        match &self.state {
            LandingState::Ready(schedule) | LandingState::AssignConfirm { schedule, .. } => {
                Some(schedule)
            }
            _ => None,
        }
    }

    fn load_profile(&self) -> BackendCommand {
        BackendCommand::LoadProfile {
            session: self.session.clone(),
            ticket: self.ticket,
        }
    }

    fn load_unassigned(&self) -> BackendCommand {
        BackendCommand::LoadUnassigned {
            session: self.session.clone(),
            ticket: self.ticket,
        }
    }
}

fn settle(pending: PendingLoad) -> LandingState {
    match pending {
        PendingLoad {
            profile: ProfileSlot::Missing,
            unassigned: Some(unassigned),
            ..
        } => LandingState::ProfileMissing(Registration {
            submitting: false,
            unassigned,
        }),
        PendingLoad {
            profile: ProfileSlot::Found(profile),
            assignments: Some(assignments),
            unassigned: Some(unassigned),
        } => LandingState::Ready(Schedule::new(profile, assignments, unassigned)),
        still_pending => LandingState::Loading(still_pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorContext;
    use shared::domain::UserId;

    const TICKET: Ticket = 7;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 17).expect("date")
    }

    fn session() -> Session {
        Session::new("tok", UserId("user-1".to_string()))
    }

    fn worker() -> WorkerProfile {
        WorkerProfile {
            id: "5f0c4d2e-0000-4000-8000-000000000042".parse().expect("id"),
            name: "Ada".to_string(),
            role: Role::Floor,
        }
    }

    fn shift(n: u32, role: &str) -> Shift {
        Shift {
            id: format!("0b8e6a4c-0000-4000-8000-{n:012}").parse().expect("id"),
            date: NaiveDate::from_ymd_opt(2025, 6, n.clamp(1, 28)).expect("date"),
            required_role: role.to_string(),
            start_time: NaiveDate::from_ymd_opt(2025, 6, 1)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .expect("start"),
            end_time: NaiveDate::from_ymd_opt(2025, 6, 1)
                .and_then(|d| d.and_hms_opt(17, 0, 0))
                .expect("end"),
            worker_id: None,
        }
    }

    fn assignment(date: &str) -> AssignmentRecord {
        AssignmentRecord {
            date: Some(date.to_string()),
            ..AssignmentRecord::default()
        }
    }

    fn failure(context: UiErrorContext) -> UiError {
        UiError::from_message(context, "connection refused")
    }

    fn ready_controller() -> LandingController {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(TICKET, LandingEvent::ProfileFound(worker()));
        controller.apply(
            TICKET,
            LandingEvent::UnassignedLoaded(Ok(vec![shift(3, "floor"), shift(4, "manager")])),
        );
        controller.apply(
            TICKET,
            LandingEvent::AssignmentsLoaded(Ok(vec![assignment("2025-06-10")])),
        );
        assert!(matches!(controller.state(), LandingState::Ready(_)));
        controller
    }

    #[test]
    fn start_fetches_profile_and_unassigned_but_not_assignments() {
        let mut controller = LandingController::new(session(), TICKET, today());
        let commands = controller.start();
        let names: Vec<_> = commands.iter().map(BackendCommand::name).collect();
        assert_eq!(names, vec!["load_profile", "load_unassigned"]);
        assert!(controller.is_loading());
    }

    #[test]
    fn found_profile_triggers_assignment_fetch_for_that_worker() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        let commands = controller.apply(TICKET, LandingEvent::ProfileFound(worker()));
        assert_eq!(
            commands,
            vec![BackendCommand::LoadAssignments {
                session: session(),
                worker_id: worker().id,
                ticket: TICKET,
            }]
        );
        assert!(matches!(controller.state(), LandingState::Loading(_)));
    }

    #[test]
    fn ready_once_all_three_results_arrive_and_filters_by_role() {
        let controller = ready_controller();
        assert!(!controller.is_loading());
        assert_eq!(controller.profile().map(|p| p.name.as_str()), Some("Ada"));

        let eligible = controller.eligible_shifts();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].required_role, "floor");

        let LandingState::Ready(schedule) = controller.state() else {
            panic!("expected ready");
        };
        assert_eq!(schedule.by_day.len(), 1);
        assert_eq!(schedule.upcoming().next().map(|(day, _)| day), Some("2025-06-10"));
    }

    #[test]
    fn failed_profile_fetch_shows_registration_and_suspends_filtering() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(
            TICKET,
            LandingEvent::ProfileMissing(Some(failure(UiErrorContext::Profile))),
        );
        controller.apply(
            TICKET,
            LandingEvent::UnassignedLoaded(Ok(vec![shift(3, "floor")])),
        );

        assert!(matches!(controller.state(), LandingState::ProfileMissing(_)));
        assert!(controller.profile().is_none());
        assert!(controller.eligible_shifts().is_empty());
        assert_eq!(
            controller.current_notice().map(|n| n.title.as_str()),
            Some("Could not load your profile")
        );
    }

    #[test]
    fn plain_missing_profile_is_silent() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(TICKET, LandingEvent::ProfileMissing(None));
        controller.apply(TICKET, LandingEvent::UnassignedLoaded(Ok(Vec::new())));
        assert!(matches!(controller.state(), LandingState::ProfileMissing(_)));
        assert!(controller.current_notice().is_none());
    }

    #[test]
    fn registration_validates_locally_then_posts_and_refetches_profile() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(TICKET, LandingEvent::ProfileMissing(None));
        controller.apply(TICKET, LandingEvent::UnassignedLoaded(Ok(vec![shift(3, "floor")])));

        let no_role = RegistrationForm {
            name: "Ada".to_string(),
            role: None,
        };
        assert!(controller.submit_registration(&no_role).is_empty());
        assert_eq!(
            controller.current_notice().map(|n| n.title.as_str()),
            Some("Missing role")
        );
        controller.dismiss_notice();

        let form = RegistrationForm {
            name: "  Ada ".to_string(),
            role: Some(Role::Floor),
        };
        let commands = controller.submit_registration(&form);
        assert_eq!(
            commands,
            vec![BackendCommand::RegisterProfile {
                session: session(),
                profile: NewWorkerProfile {
                    name: "Ada".to_string(),
                    role: Role::Floor,
                },
                ticket: TICKET,
            }]
        );
        assert!(controller.is_loading());
        assert!(controller.submit_registration(&form).is_empty());

        let commands = controller.apply(TICKET, LandingEvent::ProfileRegistered(Ok(())));
        assert_eq!(commands.iter().map(BackendCommand::name).collect::<Vec<_>>(), vec!["load_profile"]);

        // The open-shift list survives the re-fetch.
        controller.apply(TICKET, LandingEvent::ProfileFound(worker()));
        controller.apply(TICKET, LandingEvent::AssignmentsLoaded(Ok(Vec::new())));
        assert!(matches!(controller.state(), LandingState::Ready(_)));
        assert_eq!(controller.eligible_shifts().len(), 1);
    }

    #[test]
    fn rejected_registration_re_enables_the_form() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(TICKET, LandingEvent::ProfileMissing(None));
        controller.apply(TICKET, LandingEvent::UnassignedLoaded(Ok(Vec::new())));
        controller.submit_registration(&RegistrationForm {
            name: "Ada".to_string(),
            role: Some(Role::Manager),
        });

        controller.apply(
            TICKET,
            LandingEvent::ProfileRegistered(Err(UiError::from_message(
                UiErrorContext::Registration,
                "name must not be blank",
            ))),
        );
        let LandingState::ProfileMissing(registration) = controller.state() else {
            panic!("expected registration");
        };
        assert!(!registration.submitting);
        assert!(controller.current_notice().is_some());
    }

    #[test]
    fn fetch_failures_empty_the_list_and_end_loading() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        controller.apply(TICKET, LandingEvent::ProfileFound(worker()));
        controller.apply(
            TICKET,
            LandingEvent::UnassignedLoaded(Err(failure(UiErrorContext::Shifts))),
        );
        controller.apply(
            TICKET,
            LandingEvent::AssignmentsLoaded(Err(failure(UiErrorContext::Shifts))),
        );

        assert!(!controller.is_loading());
        let LandingState::Ready(schedule) = controller.state() else {
            panic!("expected ready");
        };
        assert!(schedule.assignments.is_empty());
        assert!(schedule.unassigned.is_empty());

        controller.dismiss_notice();
        assert!(controller.current_notice().is_some());
        controller.dismiss_notice();
        assert!(controller.current_notice().is_none());
    }

    #[test]
    fn confirming_a_shift_assigns_then_refreshes_both_lists() {
        let mut controller = ready_controller();
        let open = controller.eligible_shifts()[0].clone();

        controller.select_shift(open.id);
        assert!(matches!(
            controller.state(),
            LandingState::AssignConfirm { shift: picked, .. } if picked.id == open.id
        ));

        let commands = controller.confirm_assign();
        assert_eq!(
            commands,
            vec![BackendCommand::AssignShift {
                session: session(),
                shift_id: open.id,
                worker_id: worker().id,
                ticket: TICKET,
            }]
        );
        assert!(matches!(controller.state(), LandingState::Ready(_)));
        assert!(controller.is_loading());

        let refresh = controller.apply(TICKET, LandingEvent::ShiftAssigned(Ok(())));
        let names: Vec<_> = refresh.iter().map(BackendCommand::name).collect();
        assert_eq!(names, vec!["load_assignments", "load_unassigned"]);

        controller.apply(
            TICKET,
            LandingEvent::AssignmentsLoaded(Ok(vec![
                assignment("2025-06-10"),
                assignment("2025-06-03"),
            ])),
        );
        assert!(controller.is_loading());
        controller.apply(TICKET, LandingEvent::UnassignedLoaded(Ok(vec![shift(4, "manager")])));
        assert!(!controller.is_loading());
        assert!(controller.eligible_shifts().is_empty());
    }

    #[test]
    fn cancelling_the_prompt_issues_nothing() {
        let mut controller = ready_controller();
        let open = controller.eligible_shifts()[0].id;
        controller.select_shift(open);
        controller.cancel_assign();
        assert!(matches!(controller.state(), LandingState::Ready(_)));
        assert!(controller.confirm_assign().is_empty());
        assert!(!controller.is_loading());
    }

    #[test]
    fn shifts_for_other_roles_cannot_be_selected() {
        let mut controller = ready_controller();
        controller.select_shift(shift(4, "manager").id);
        assert!(matches!(controller.state(), LandingState::Ready(_)));
    }

    #[test]
    fn failed_assignment_notifies_without_refresh() {
        let mut controller = ready_controller();
        let open = controller.eligible_shifts()[0].id;
        controller.select_shift(open);
        controller.confirm_assign();

        let commands = controller.apply(
            TICKET,
            LandingEvent::ShiftAssigned(Err(UiError::from_message(
                UiErrorContext::Assign,
                "Assignment already exists for this shift and worker",
            ))),
        );
        assert!(commands.is_empty());
        assert!(!controller.is_loading());
        assert_eq!(
            controller.current_notice().map(|n| n.title.as_str()),
            Some("Shift update failed")
        );
    }

    #[test]
    fn releasing_a_shift_refreshes_after_success() {
        let mut controller = ready_controller();
        let shift_id = shift(10, "floor").id;
        let commands = controller.release_shift(shift_id);
        assert_eq!(
            commands,
            vec![BackendCommand::ReleaseShift {
                session: session(),
                shift_id,
                worker_id: worker().id,
                ticket: TICKET,
            }]
        );
        let refresh = controller.apply(TICKET, LandingEvent::ShiftReleased(Ok(())));
        assert_eq!(refresh.len(), 2);
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut controller = LandingController::new(session(), TICKET, today());
        controller.start();
        let commands = controller.apply(TICKET - 1, LandingEvent::ProfileFound(worker()));
        assert!(commands.is_empty());
        assert!(matches!(
            controller.state(),
            LandingState::Loading(PendingLoad {
                profile: ProfileSlot::Pending,
                ..
            })
        ));
    }

    #[test]
    fn undelivered_loads_settle_instead_of_spinning() {
        let mut controller = LandingController::new(session(), TICKET, today());
        let mut commands = controller.start().into_iter();
        let _delivered = commands.next();
        let queue_full = UiError::from_message(UiErrorContext::General, "UI command queue is full");
        for cmd in commands {
            assert!(controller.command_failed(cmd, queue_full.clone()).is_empty());
        }
        assert!(controller.is_loading());

        let follow_up = controller.apply(TICKET, LandingEvent::ProfileFound(worker()));
        let fetch_assignments = follow_up.into_iter().next().expect("assignment fetch");
        controller.command_failed(fetch_assignments, queue_full);

        assert!(!controller.is_loading());
        assert!(matches!(controller.state(), LandingState::Ready(_)));
        controller.dismiss_notice();
        assert!(controller.current_notice().is_none());
    }

    #[test]
    fn assignments_are_locked_while_prompting_or_busy() {
        let mut controller = ready_controller();
        assert!(controller.can_modify_assignments());

        let open = controller.eligible_shifts()[0].id;
        controller.select_shift(open);
        assert!(!controller.can_modify_assignments());
        assert!(controller.release_shift(shift(10, "floor").id).is_empty());
        assert!(matches!(controller.state(), LandingState::AssignConfirm { .. }));

        controller.confirm_assign();
        assert!(!controller.can_modify_assignments());
        assert!(controller.release_shift(shift(10, "floor").id).is_empty());
    }

    #[test]
    fn reload_switches_ticket_and_drops_late_results() {
        let mut controller = ready_controller();
        let commands = controller.reload(TICKET + 1);
        assert_eq!(commands.len(), 2);
        assert!(controller.is_loading());

        assert!(controller
            .apply(TICKET, LandingEvent::ProfileFound(worker()))
            .is_empty());
        assert_eq!(
            controller
                .apply(TICKET + 1, LandingEvent::ProfileFound(worker()))
                .len(),
            1
        );
    }

    #[test]
    fn month_navigation_moves_the_grid() {
        let mut controller = LandingController::new(session(), TICKET, today());
        assert_eq!(controller.month(), MonthCursor::new(2025, 5));

        controller.next_month();
        let july = controller.calendar().expect("calendar");
        assert_eq!(july.title(), "July 2025");
        assert!(july.weeks().iter().flatten().all(|cell| !cell.is_today));

        controller.previous_month();
        controller.previous_month();
        assert_eq!(controller.month(), MonthCursor::new(2025, 4));

        controller.this_month();
        let june = controller.calendar().expect("calendar");
        assert!(june.weeks().iter().flatten().any(|cell| cell.is_today));
    }
}
