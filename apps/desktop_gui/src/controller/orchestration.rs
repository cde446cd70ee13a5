//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// A queue failure and every command that never reached the backend.
#[derive(Debug)]
pub struct DispatchFailure {
    pub error: UiError,
    pub undelivered: Vec<BackendCommand>,
}

/// Queues every command in order. Stops at the first failure and hands back
/// that command and all the ones after it.
pub fn dispatch_backend_commands(
    cmd_tx: &Sender<BackendCommand>,
    cmds: impl IntoIterator<Item = BackendCommand>,
) -> Result<(), DispatchFailure> {
    let mut cmds = cmds.into_iter();
    while let Some(cmd) = cmds.next() {
        if let Err((error, cmd)) = dispatch_backend_command(cmd_tx, cmd) {
            let mut undelivered = vec![cmd];
            undelivered.extend(cmds);
            return Err(DispatchFailure { error, undelivered });
        }
    }
    Ok(())
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), (UiError, BackendCommand)> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => Err((
            UiError::from_message(
                UiErrorContext::General,
                "UI command queue is full; please retry",
            ),
            cmd,
        )),
        Err(TrySendError::Disconnected(cmd)) => Err((
            UiError::from_message(
                UiErrorContext::BackendStartup,
                "Backend command processor disconnected (possible startup/runtime failure); retry sign-in",
            ),
            cmd,
        )),
    }
}
