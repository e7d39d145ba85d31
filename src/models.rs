//! Wire types exchanged with the clinic backend
//!
//! Field names follow the backend's camelCase JSON. Everything here is a
//! read-only projection except [`ConsultationRequest`], which is the body
//! the wizard submits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two account kinds the backend knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    /// Path segment used in `/api/<role>/auth/...`
    pub fn as_path(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Doctor => "Doctor",
            Role::Patient => "Patient",
        }
    }

    /// Failure flag the backend sends when the email is unknown
    pub fn not_found_flag(&self) -> &'static str {
        match self {
            Role::Doctor => "DoctorNotFound",
            Role::Patient => "PatientNotFound",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Role reported by the session check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Doctor,
    Patient,
    Both,
}

/// Response of `GET /api/auth/checkAuth`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheck {
    pub authenticated: bool,
    #[serde(default)]
    pub role: Option<SessionRole>,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
}

impl AuthCheck {
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn doctor(id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            role: Some(SessionRole::Doctor),
            doctor_id: Some(id.into()),
            patient_id: None,
        }
    }

    pub fn patient(id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            role: Some(SessionRole::Patient),
            doctor_id: None,
            patient_id: Some(id.into()),
        }
    }

    pub fn both(doctor_id: impl Into<String>, patient_id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            role: Some(SessionRole::Both),
            doctor_id: Some(doctor_id.into()),
            patient_id: Some(patient_id.into()),
        }
    }
}

/// Card shown in the doctor listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub profile_image: String,
}

/// Full doctor record from `GET /api/doctor/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub profile_image: String,
    pub specialty: String,
    #[serde(default)]
    pub experience: u32,
}

/// Patient as embedded in a consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub medicines: String,
    pub dosage: String,
    pub duration: String,
}

/// Diabetes status captured at step two of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiabetesStatus {
    #[serde(rename = "Diabetics")]
    Diabetic,
    #[serde(rename = "NonDiabetics")]
    NonDiabetic,
}

impl DiabetesStatus {
    pub fn all() -> [DiabetesStatus; 2] {
        [DiabetesStatus::Diabetic, DiabetesStatus::NonDiabetic]
    }

    pub fn wire_value(&self) -> &'static str {
        match self {
            DiabetesStatus::Diabetic => "Diabetics",
            DiabetesStatus::NonDiabetic => "NonDiabetics",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DiabetesStatus::Diabetic => "Diabetic",
            DiabetesStatus::NonDiabetic => "Non-Diabetic",
        }
    }
}

impl FromStr for DiabetesStatus {
    type Err = String;

    /// Accepts both the wire values and the display names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Diabetics" | "Diabetic" => Ok(DiabetesStatus::Diabetic),
            "NonDiabetics" | "NonDiabetic" | "Non-Diabetic" => Ok(DiabetesStatus::NonDiabetic),
            other => Err(format!("Unknown diabetes status '{}'", other)),
        }
    }
}

/// Consultation record as listed for a doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub step1_illness: String,
    pub step1_surgery: String,
    pub diabetes_status: DiabetesStatus,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub others: String,
    #[serde(default)]
    pub payment_txn_id: String,
    #[serde(rename = "Patient", default)]
    pub patient: Option<PatientSummary>,
    #[serde(default)]
    pub prescription: Option<Prescription>,
    #[serde(default)]
    pub prescription_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Envelope of `GET /api/doctor/consultations`
#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationList {
    #[serde(default)]
    pub consultations: Vec<Consultation>,
}

/// Body of `POST /api/patient/consult/:doctorId`
///
/// Optional text fields are always present, blank as `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub patient_id: String,
    pub doctor_id: String,
    pub step1_illness: String,
    pub step1_surgery: String,
    pub diabetes_status: DiabetesStatus,
    pub allergies: String,
    pub others: String,
    pub payment_txn_id: String,
}

/// Body of the sign-in endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Minimal account record returned by sign-in and sign-up
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `{ "doctor": {...} }` or `{ "patient": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub doctor: Option<AccountRef>,
    #[serde(default)]
    pub patient: Option<AccountRef>,
}

impl AuthResponse {
    /// Identity for the role that signed in
    pub fn account_id(&self, role: Role) -> Option<&str> {
        match role {
            Role::Doctor => self.doctor.as_ref(),
            Role::Patient => self.patient.as_ref(),
        }
        .map(|account| account.id.as_str())
    }
}

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Optional profile picture attached to a sign-up as the `pfp` part
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    /// Read an image from disk, guessing the MIME type from the extension
    pub fn from_path(path: &std::path::Path) -> Result<Self, crate::Error> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("pfp")
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// Validated doctor sign-up payload, sent as multipart form data
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialty: String,
    pub experience: u32,
    pub profile_image: Option<ProfileImage>,
}

impl DoctorRegistration {
    /// Text parts in submission order; every field is sent
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("password", self.password.clone()),
            ("specialty", self.specialty.clone()),
            ("experience", self.experience.to_string()),
        ]
    }
}

/// Validated patient sign-up payload, sent as multipart form data
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub age: u32,
    pub surgery_history: Option<String>,
    pub illness_history: Option<String>,
    pub profile_image: Option<ProfileImage>,
}

impl PatientRegistration {
    /// Text parts in submission order; blank optional histories are omitted
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("password", self.password.clone()),
            ("age", self.age.to_string()),
        ];
        if let Some(surgery) = self.surgery_history.as_ref().filter(|s| !s.trim().is_empty()) {
            fields.push(("surgeryHistory", surgery.clone()));
        }
        if let Some(illness) = self.illness_history.as_ref().filter(|s| !s.trim().is_empty()) {
            fields.push(("illnessHistory", illness.clone()));
        }
        fields
    }
}
