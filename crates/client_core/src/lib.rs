use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Session, ShiftId, WorkerId},
    error::ErrorBody,
    protocol::{
        AssignShiftRequest, AssignmentRecord, LoginRequest, LoginResponse, NewWorkerProfile,
        Shift, WorkerProfile,
    },
};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;

pub use config::{load_settings, normalize_api_url, ClientSettings};
pub use error::ClientError;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Redundant with the bearer token, but the profile endpoints still key on it.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Every call the schedule screens make against the remote API.
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;
    async fn fetch_profile(&self, session: &Session) -> Result<WorkerProfile>;
    async fn create_profile(&self, session: &Session, profile: &NewWorkerProfile) -> Result<()>;
    async fn list_shifts(&self, session: &Session) -> Result<Vec<Shift>>;
    async fn list_unassigned_shifts(&self, session: &Session) -> Result<Vec<Shift>>;
    async fn list_assignments(
        &self,
        session: &Session,
        worker_id: WorkerId,
    ) -> Result<Vec<AssignmentRecord>>;
    async fn assign_shift(
        &self,
        session: &Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
    ) -> Result<()>;
    async fn unassign_shift(
        &self,
        session: &Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
    ) -> Result<()>;
}

#[derive(Debug)]
pub struct SchedulerClient {
    http: Client,
    api_url: String,
}

impl SchedulerClient {
    pub fn new(settings: &ClientSettings) -> anyhow::Result<Self> {
        let api_url = normalize_api_url(&settings.api_url)?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(&session.token)
    }

    fn authorized_as_user(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        self.authorized(request, session)
            .header(USER_ID_HEADER, session.user_id.0.as_str())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = ErrorBody::message_from_text(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    warn!(status = status.as_u16(), %message, "scheduling service rejected request");
    Err(ClientError::from_status(status.as_u16(), message))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[async_trait]
impl SchedulerApi for SchedulerClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let res = self
            .http
            .post(self.endpoint("/api/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = decode_json(check_status(res).await?).await?;
        info!(user_id = %body.user_id, "logged in");
        Ok(Session::new(body.token, body.user_id))
    }

    async fn fetch_profile(&self, session: &Session) -> Result<WorkerProfile> {
        let req = self.http.get(self.endpoint("/api/scheduler/me"));
        let res = self.authorized_as_user(req, session).send().await?;
        decode_json(check_status(res).await?).await
    }

    async fn create_profile(&self, session: &Session, profile: &NewWorkerProfile) -> Result<()> {
        let name = profile.name.trim();
        if name.is_empty() {
            return Err(ClientError::InvalidInput("name must not be blank".to_string()));
        }

        let req = self
            .http
            .post(self.endpoint("/api/scheduler"))
            .json(&NewWorkerProfile {
                name: name.to_string(),
                role: profile.role,
            });
        let res = self.authorized_as_user(req, session).send().await?;
        check_status(res).await?;
        info!(role = %profile.role, "worker profile registered");
        Ok(())
    }

    async fn list_shifts(&self, session: &Session) -> Result<Vec<Shift>> {
        let req = self.http.get(self.endpoint("/api/shifts"));
        let res = self.authorized(req, session).send().await?;
        decode_json(check_status(res).await?).await
    }

    async fn list_unassigned_shifts(&self, session: &Session) -> Result<Vec<Shift>> {
        let req = self.http.get(self.endpoint("/api/shifts/unassigned"));
        let res = self.authorized(req, session).send().await?;
        let shifts: Vec<Shift> = decode_json(check_status(res).await?).await?;
        debug!(count = shifts.len(), "fetched unassigned shifts");
        Ok(shifts)
    }

    async fn list_assignments(
        &self,
        session: &Session,
        worker_id: WorkerId,
    ) -> Result<Vec<AssignmentRecord>> {
        let req = self
            .http
            .get(self.endpoint(&format!("/api/shift-assignments/worker/{worker_id}")));
        let res = self.authorized(req, session).send().await?;
        let records: Vec<AssignmentRecord> = decode_json(check_status(res).await?).await?;
        debug!(count = records.len(), %worker_id, "fetched worker assignments");
        Ok(records)
    }

    async fn assign_shift(
        &self,
        session: &Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
    ) -> Result<()> {
        let req = self
            .http
            .post(self.endpoint("/api/shift-assignments/assign"))
            .json(&AssignShiftRequest {
                shift_id,
                worker_id,
            });
        let res = self.authorized(req, session).send().await?;
        check_status(res).await?;
        info!(%shift_id, %worker_id, "shift assigned");
        Ok(())
    }

    async fn unassign_shift(
        &self,
        session: &Session,
        shift_id: ShiftId,
        worker_id: WorkerId,
    ) -> Result<()> {
        let req = self.http.delete(self.endpoint(&format!(
            "/api/shift-assignments/unassign/{shift_id}/{worker_id}"
        )));
        let res = self.authorized(req, session).send().await?;
        check_status(res).await?;
        info!(%shift_id, %worker_id, "shift released");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
