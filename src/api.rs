use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{
    Equipment, EquipmentForm, ErrorBody, NewSetRequest, PasswordChange, Preferences,
    ProfileUpdate, StartWorkoutRequest, StatusUpdateRequest, WorkoutSession, WorkoutSet,
    WorkoutStatus,
};
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{COOKIE, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// The slice of the server API the workout session controller depends on.
#[async_trait]
pub trait WorkoutApi: Send + Sync {
    async fn list_equipment(&self) -> Result<Vec<Equipment>, ClientError>;
    async fn in_progress_workout(&self) -> Result<Option<WorkoutSession>, ClientError>;
    async fn start_workout(&self, equipment_id: i64) -> Result<WorkoutSession, ClientError>;
    async fn update_workout_status(
        &self,
        workout_id: i64,
        status: WorkoutStatus,
    ) -> Result<WorkoutSession, ClientError>;
    async fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, ClientError>;
    async fn list_workouts(&self) -> Result<Vec<WorkoutSession>, ClientError>;
    async fn add_set(&self, request: &NewSetRequest) -> Result<WorkoutSet, ClientError>;
    async fn delete_set(&self, set_id: i64) -> Result<(), ClientError>;
}

pub struct HttpApi {
    http: Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| {
                ClientError::validation("Session cookie contains invalid characters")
            })?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ClientError::transport("Failed to build HTTP client", err))?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Sends once and maps any non-2xx status to the server's message, or
    /// `fallback` when the body carries none.
    async fn send(&self, builder: RequestBuilder, fallback: &str) -> Result<Response, ClientError> {
        let request = builder
            .build()
            .map_err(|err| ClientError::transport(fallback, err))?;
        debug!(method = %request.method(), url = %request.url(), "api request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|err| ClientError::transport(fallback, err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| fallback.to_string());
        warn!(%status, %message, "api request failed");
        Err(ClientError::api(status, message))
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        self.send(builder, fallback)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ClientError::transport(fallback, err))
    }

    async fn request_empty(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<(), ClientError> {
        self.send(builder, fallback).await.map(|_| ())
    }

    pub async fn create_equipment(&self, form: &EquipmentForm) -> Result<Equipment, ClientError> {
        let body = equipment_multipart(form).await?;
        self.request_json(
            self.http.post(self.url("/api/equipment")).multipart(body),
            "Failed to save equipment",
        )
        .await
    }

    pub async fn update_equipment(
        &self,
        equipment_id: i64,
        form: &EquipmentForm,
    ) -> Result<Equipment, ClientError> {
        let body = equipment_multipart(form).await?;
        self.request_json(
            self.http
                .put(self.url(&format!("/api/equipment/{equipment_id}")))
                .multipart(body),
            "Failed to save equipment",
        )
        .await
    }

    pub async fn delete_equipment(&self, equipment_id: i64) -> Result<(), ClientError> {
        self.request_empty(
            self.http.delete(self.url(&format!("/api/equipment/{equipment_id}"))),
            "Failed to delete equipment",
        )
        .await
    }

    pub async fn preferences(&self) -> Result<Preferences, ClientError> {
        self.request_json(
            self.http.get(self.url("/api/user/preferences")),
            "Failed to load preferences",
        )
        .await
    }

    pub async fn update_preferences(&self, preferences: &Preferences) -> Result<(), ClientError> {
        self.request_empty(
            self.http.put(self.url("/api/user/preferences")).json(preferences),
            "Failed to update preferences",
        )
        .await
    }

    pub async fn update_profile(&self, profile: &ProfileUpdate) -> Result<(), ClientError> {
        self.request_empty(
            self.http.put(self.url("/api/user")).json(profile),
            "Failed to update profile",
        )
        .await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        self.request_empty(
            self.http.put(self.url("/api/user")).json(change),
            "Failed to update password",
        )
        .await
    }
}

#[async_trait]
impl WorkoutApi for HttpApi {
    async fn list_equipment(&self) -> Result<Vec<Equipment>, ClientError> {
        self.request_json(
            self.http.get(self.url("/api/equipment")),
            "Failed to fetch equipment",
        )
        .await
    }

    async fn in_progress_workout(&self) -> Result<Option<WorkoutSession>, ClientError> {
        self.request_json(
            self.http.get(self.url("/api/workout/inprogress")),
            "Failed to check active workout",
        )
        .await
    }

    async fn start_workout(&self, equipment_id: i64) -> Result<WorkoutSession, ClientError> {
        self.request_json(
            self.http
                .post(self.url("/api/workout"))
                .json(&StartWorkoutRequest { equipment_id }),
            "Failed to start workout",
        )
        .await
    }

    async fn update_workout_status(
        &self,
        workout_id: i64,
        status: WorkoutStatus,
    ) -> Result<WorkoutSession, ClientError> {
        let fallback = match status {
            WorkoutStatus::Abandoned => "Failed to abandon workout",
            _ => "Failed to complete workout",
        };
        self.request_json(
            self.http
                .put(self.url(&format!("/api/workout/{workout_id}")))
                .json(&StatusUpdateRequest { status }),
            fallback,
        )
        .await
    }

    async fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, ClientError> {
        self.request_json(
            self.http.get(self.url(&format!("/api/workout/{workout_id}/sets"))),
            "Failed to load sets",
        )
        .await
    }

    async fn list_workouts(&self) -> Result<Vec<WorkoutSession>, ClientError> {
        self.request_json(
            self.http.get(self.url("/api/workouts")),
            "Failed to load workout history",
        )
        .await
    }

    async fn add_set(&self, request: &NewSetRequest) -> Result<WorkoutSet, ClientError> {
        self.request_json(
            self.http.post(self.url("/api/set")).json(request),
            "Failed to add set",
        )
        .await
    }

    async fn delete_set(&self, set_id: i64) -> Result<(), ClientError> {
        self.request_empty(
            self.http.delete(self.url(&format!("/api/set/{set_id}"))),
            "Failed to delete set",
        )
        .await
    }
}

async fn equipment_multipart(form: &EquipmentForm) -> Result<Form, ClientError> {
    let mut body = Form::new()
        .text("name", form.name.clone())
        .text("type", form.kind.clone())
        .text("description", form.description.clone().unwrap_or_default());
    // The server only recognises the checkbox value "on".
    if form.is_active {
        body = body.text("is_active", "on");
    }

    if let Some(path) = &form.image_path {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        body = body.part("image", Part::bytes(bytes).file_name(file_name));
    }

    Ok(body)
}
