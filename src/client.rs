use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClinicConfig;
use crate::error::Error;
use crate::models::{
    ApiErrorBody, AuthCheck, AuthResponse, Consultation, ConsultationList, ConsultationRequest,
    Credentials, DoctorProfile, DoctorRegistration, DoctorSummary, PatientRegistration,
    ProfileImage, Role,
};

/// Operations the clinic backend exposes
///
/// Views and flows depend on this trait rather than on [`ClinicClient`] so
/// they can run against a scripted backend in tests.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    /// `GET /api/patient/doctors`
    async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, Error>;

    /// `GET /api/auth/checkAuth`
    async fn check_auth(&self) -> Result<AuthCheck, Error>;

    /// `POST /api/{role}/auth/signin`
    async fn sign_in(&self, role: Role, credentials: &Credentials) -> Result<AuthResponse, Error>;

    /// `POST /api/doctor/auth/signup` as multipart
    async fn doctor_sign_up(&self, registration: &DoctorRegistration)
        -> Result<AuthResponse, Error>;

    /// `POST /api/patient/auth/signup` as multipart
    async fn patient_sign_up(
        &self,
        registration: &PatientRegistration,
    ) -> Result<AuthResponse, Error>;

    /// `POST /api/{role}/auth/logout`
    async fn logout(&self, role: Role) -> Result<(), Error>;

    /// `GET /api/doctor/profile`
    async fn doctor_profile(&self) -> Result<DoctorProfile, Error>;

    /// `GET /api/doctor/consultations`
    async fn doctor_consultations(&self) -> Result<Vec<Consultation>, Error>;

    /// `POST /api/patient/consult/:doctorId`
    async fn create_consultation(
        &self,
        doctor_id: &str,
        request: &ConsultationRequest,
    ) -> Result<(), Error>;
}

/// REST client for the clinic backend
///
/// Holds a cookie store so the session cookie set at sign-in is sent on
/// every later credentialed call.
pub struct ClinicClient {
    http: Client,
    config: ClinicConfig,
}

impl ClinicClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClinicConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn send(&self, request: RequestBuilder, label: &str) -> Result<Response, Error> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} -> {}", label, status);

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        warn!(
            "{} rejected with {} (flag: {:?})",
            label,
            status.as_u16(),
            body.flag
        );
        Err(Error::Api {
            status: status.as_u16(),
            flag: body.flag,
            message: body.message,
        })
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        label: &str,
    ) -> Result<R, Error> {
        let response = self.send(request, label).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    fn multipart_form(
        fields: Vec<(&'static str, String)>,
        image: Option<&ProfileImage>,
    ) -> Result<Form, Error> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(image) = image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)?;
            form = form.part("pfp", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ClinicApi for ClinicClient {
    async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, Error> {
        let request = self.http.get(self.url("/api/patient/doctors"));
        self.send_json(request, "GET /api/patient/doctors").await
    }

    async fn check_auth(&self) -> Result<AuthCheck, Error> {
        let request = self.http.get(self.url("/api/auth/checkAuth"));
        self.send_json(request, "GET /api/auth/checkAuth").await
    }

    async fn sign_in(&self, role: Role, credentials: &Credentials) -> Result<AuthResponse, Error> {
        let path = format!("/api/{}/auth/signin", role.as_path());
        let request = self.http.post(self.url(&path)).json(credentials);
        self.send_json(request, &format!("POST {}", path)).await
    }

    async fn doctor_sign_up(
        &self,
        registration: &DoctorRegistration,
    ) -> Result<AuthResponse, Error> {
        let form = Self::multipart_form(
            registration.text_fields(),
            registration.profile_image.as_ref(),
        )?;
        let request = self
            .http
            .post(self.url("/api/doctor/auth/signup"))
            .multipart(form);
        self.send_json(request, "POST /api/doctor/auth/signup").await
    }

    async fn patient_sign_up(
        &self,
        registration: &PatientRegistration,
    ) -> Result<AuthResponse, Error> {
        let form = Self::multipart_form(
            registration.text_fields(),
            registration.profile_image.as_ref(),
        )?;
        let request = self
            .http
            .post(self.url("/api/patient/auth/signup"))
            .multipart(form);
        self.send_json(request, "POST /api/patient/auth/signup").await
    }

    async fn logout(&self, role: Role) -> Result<(), Error> {
        let path = format!("/api/{}/auth/logout", role.as_path());
        let request = self.http.post(self.url(&path));
        self.send(request, &format!("POST {}", path)).await?;
        Ok(())
    }

    async fn doctor_profile(&self) -> Result<DoctorProfile, Error> {
        let request = self.http.get(self.url("/api/doctor/profile"));
        self.send_json(request, "GET /api/doctor/profile").await
    }

    async fn doctor_consultations(&self) -> Result<Vec<Consultation>, Error> {
        let request = self.http.get(self.url("/api/doctor/consultations"));
        let list: ConsultationList = self
            .send_json(request, "GET /api/doctor/consultations")
            .await?;
        Ok(list.consultations)
    }

    async fn create_consultation(
        &self,
        doctor_id: &str,
        request: &ConsultationRequest,
    ) -> Result<(), Error> {
        let path = format!("/api/patient/consult/{}", doctor_id);
        let builder = self.http.post(self.url(&path)).json(request);
        self.send(builder, &format!("POST {}", path)).await?;
        Ok(())
    }
}
