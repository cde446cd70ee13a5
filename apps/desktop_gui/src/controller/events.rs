//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ClientError;
use shared::{domain::Session, error::ErrorCode};

use crate::{backend_bridge::commands::Ticket, controller::landing::LandingEvent};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    LoggedIn(Session),
    LoginFailed(UiError),
    Landing { ticket: Ticket, event: LandingEvent },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    Profile,
    Registration,
    Shifts,
    Assign,
    General,
}

pub fn classify_login_failure(error: &ClientError) -> String {
    match error.code() {
        ErrorCode::Transport => {
            "Server unreachable; check the API URL/network and retry sign-in.".to_string()
        }
        ErrorCode::Unauthorized => format!("Sign-in rejected: {}", error.user_message()),
        _ => format!("Login/API error: {}", error.user_message()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("invalid token")
            || message_lower.contains("invalid credential")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
            || message_lower.contains("must not")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, error: &ClientError) -> Self {
        let category = match error.code() {
            ErrorCode::Unauthorized => UiErrorCategory::Auth,
            ErrorCode::Transport => UiErrorCategory::Transport,
            ErrorCode::Validation | ErrorCode::NotFound => UiErrorCategory::Validation,
            ErrorCode::Internal => UiErrorCategory::Unknown,
        };
        let message = if context == UiErrorContext::Login {
            classify_login_failure(error)
        } else {
            error.user_message()
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => "Backend unavailable",
            UiErrorContext::Login => "Sign-in failed",
            UiErrorContext::Profile => "Could not load your profile",
            UiErrorContext::Registration => "Could not save your profile",
            UiErrorContext::Shifts => "Could not load shifts",
            UiErrorContext::Assign => "Shift update failed",
            UiErrorContext::General => "Something went wrong",
        }
    }
}

/// A blocking notification: the screen underneath stays disabled until it is
/// acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub suggest_sign_out: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            suggest_sign_out: false,
        }
    }
}

impl From<&UiError> for Notice {
    fn from(error: &UiError) -> Self {
        Self {
            title: error.title().to_string(),
            message: error.message().to_string(),
            suggest_sign_out: error.requires_reauth() && error.context() != UiErrorContext::Login,
        }
    }
}
