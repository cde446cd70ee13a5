//! Backend commands queued from UI to backend worker.

use shared::{
    domain::{Session, ShiftId, WorkerId},
    protocol::NewWorkerProfile,
};

/// Identifies one landing-screen visit; results carrying an older ticket are
/// dropped by the controller.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Login {
        api_url: String,
        email: String,
        password: String,
    },
    LoadProfile {
        session: Session,
        ticket: Ticket,
    },
    LoadAssignments {
        session: Session,
        worker_id: WorkerId,
        ticket: Ticket,
    },
    LoadUnassigned {
        session: Session,
        ticket: Ticket,
    },
    RegisterProfile {
        session: Session,
        profile: NewWorkerProfile,
        ticket: Ticket,
    },
    AssignShift {
        session: Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
        ticket: Ticket,
    },
    ReleaseShift {
        session: Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
        ticket: Ticket,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Login { .. } => "login",
            BackendCommand::LoadProfile { .. } => "load_profile",
            BackendCommand::LoadAssignments { .. } => "load_assignments",
            BackendCommand::LoadUnassigned { .. } => "load_unassigned",
            BackendCommand::RegisterProfile { .. } => "register_profile",
            BackendCommand::AssignShift { .. } => "assign_shift",
            BackendCommand::ReleaseShift { .. } => "release_shift",
        }
    }
}
