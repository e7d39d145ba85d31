//! Consultation intake wizard
//!
//! Three linear steps gated by per-step validation, a simulated payment,
//! then a single submission of the whole draft. Validation is the pure
//! [`validate_step`] so it can be exercised without a UI.

use chrono::Utc;
use rand::Rng;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::client::ClinicApi;
use crate::models::{ConsultationRequest, DiabetesStatus};
use crate::validation::{validate_required, FieldErrors};

/// Fixed fee shown on the payment step
pub const CONSULTATION_FEE: &str = "$50.00";

pub const PAYMENT_SUCCESS: &str = "Payment successful!";
pub const PAYMENT_REQUIRED: &str = "Please complete the payment first";
pub const SUBMIT_SUCCESS: &str = "Consultation created successfully.";

const TXN_PREFIX: &str = "TXN_";
const TXN_TOKEN_LEN: usize = 13;
const TXN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    MedicalHistory,
    FamilyHistory,
    Payment,
}

impl WizardStep {
    pub fn all() -> [Self; 3] {
        [Self::MedicalHistory, Self::FamilyHistory, Self::Payment]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::MedicalHistory => "Medical History",
            Self::FamilyHistory => "Family History",
            Self::Payment => "Payment",
        }
    }

    /// `(current, total)`, one based
    pub fn step_number(&self) -> (usize, usize) {
        let current = match self {
            Self::MedicalHistory => 1,
            Self::FamilyHistory => 2,
            Self::Payment => 3,
        };
        (current, Self::all().len())
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::MedicalHistory => Some(Self::FamilyHistory),
            Self::FamilyHistory => Some(Self::Payment),
            Self::Payment => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::MedicalHistory => None,
            Self::FamilyHistory => Some(Self::MedicalHistory),
            Self::Payment => Some(Self::FamilyHistory),
        }
    }

    /// User-editable fields collected on this step
    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            Self::MedicalHistory => &[DraftField::IllnessHistory, DraftField::SurgeryHistory],
            Self::FamilyHistory => &[
                DraftField::DiabetesStatus,
                DraftField::Allergies,
                DraftField::OtherNotes,
            ],
            Self::Payment => &[],
        }
    }
}

/// User-editable draft fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    IllnessHistory,
    SurgeryHistory,
    DiabetesStatus,
    Allergies,
    OtherNotes,
}

impl DraftField {
    /// Wire name, also the key used in [`FieldErrors`]
    pub fn key(&self) -> &'static str {
        match self {
            Self::IllnessHistory => "step1Illness",
            Self::SurgeryHistory => "step1Surgery",
            Self::DiabetesStatus => "diabetesStatus",
            Self::Allergies => "allergies",
            Self::OtherNotes => "others",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::IllnessHistory => "Current Illness History",
            Self::SurgeryHistory => "Recent Surgery History",
            Self::DiabetesStatus => "Diabetes Status",
            Self::Allergies => "Allergies",
            Self::OtherNotes => "Other Notes",
        }
    }

    pub fn step(&self) -> WizardStep {
        match self {
            Self::IllnessHistory | Self::SurgeryHistory => WizardStep::MedicalHistory,
            Self::DiabetesStatus | Self::Allergies | Self::OtherNotes => WizardStep::FamilyHistory,
        }
    }
}

/// In-progress consultation, owned by the wizard
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationDraft {
    pub patient_id: String,
    pub doctor_id: String,
    pub illness_history: String,
    pub surgery_history: String,
    /// `None` when the user typed something that is not a known status
    pub diabetes_status: Option<DiabetesStatus>,
    pub allergies: String,
    pub other_notes: String,
    pub payment_transaction_id: Option<String>,
}

impl ConsultationDraft {
    pub fn new(patient_id: impl Into<String>, doctor_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            doctor_id: doctor_id.into(),
            illness_history: String::new(),
            surgery_history: String::new(),
            diabetes_status: Some(DiabetesStatus::NonDiabetic),
            allergies: String::new(),
            other_notes: String::new(),
            payment_transaction_id: None,
        }
    }

    /// Current text of a field
    pub fn value(&self, field: DraftField) -> String {
        match field {
            DraftField::IllnessHistory => self.illness_history.clone(),
            DraftField::SurgeryHistory => self.surgery_history.clone(),
            DraftField::DiabetesStatus => self
                .diabetes_status
                .map(|s| s.display_name().to_string())
                .unwrap_or_default(),
            DraftField::Allergies => self.allergies.clone(),
            DraftField::OtherNotes => self.other_notes.clone(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_transaction_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    /// Request body; blank optional fields go out as `""`
    pub fn to_request(&self) -> Result<ConsultationRequest, FieldErrors> {
        validate_draft(self).into_result()?;

        let mut errors = FieldErrors::new();
        let diabetes_status = errors.check(
            DraftField::DiabetesStatus.key(),
            self.diabetes_status
                .ok_or_else(|| "Please select a diabetes status".to_string()),
        );
        let payment_txn_id = errors.check(
            "paymentTxnId",
            self.payment_transaction_id
                .clone()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| PAYMENT_REQUIRED.to_string()),
        );
        let (Some(diabetes_status), Some(payment_txn_id)) = (diabetes_status, payment_txn_id)
        else {
            return Err(errors);
        };

        Ok(ConsultationRequest {
            patient_id: self.patient_id.clone(),
            doctor_id: self.doctor_id.clone(),
            step1_illness: self.illness_history.trim().to_string(),
            step1_surgery: self.surgery_history.trim().to_string(),
            diabetes_status,
            allergies: self.allergies.trim().to_string(),
            others: self.other_notes.trim().to_string(),
            payment_txn_id,
        })
    }
}

/// Validate only the fields collected on `step`
pub fn validate_step(step: WizardStep, draft: &ConsultationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::MedicalHistory => {
            errors.check(
                DraftField::IllnessHistory.key(),
                validate_required(&draft.illness_history, "Illness information is required"),
            );
            errors.check(
                DraftField::SurgeryHistory.key(),
                validate_required(&draft.surgery_history, "Surgery information is required"),
            );
        }
        WizardStep::FamilyHistory => {
            if draft.diabetes_status.is_none() {
                errors.insert(
                    DraftField::DiabetesStatus.key(),
                    "Please select a diabetes status",
                );
            }
        }
        WizardStep::Payment => {}
    }
    errors
}

/// Validate identities and every step
pub fn validate_draft(draft: &ConsultationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(
        "patientId",
        validate_required(&draft.patient_id, "Patient ID is required"),
    );
    errors.check(
        "doctorId",
        validate_required(&draft.doctor_id, "Doctor ID is required"),
    );
    for step in WizardStep::all() {
        errors.extend(validate_step(step, draft));
    }
    errors
}

/// Fresh `TXN_` identifier
pub fn generate_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TXN_TOKEN_LEN)
        .map(|_| TXN_ALPHABET[rng.gen_range(0..TXN_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", TXN_PREFIX, token)
}

/// Why a submission did not complete
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Payment has not been simulated yet; nothing was sent
    PaymentRequired,
    /// A submission is already in flight
    InFlight,
    /// The consultation was already created
    AlreadySubmitted,
    /// Draft failed validation; nothing was sent
    Invalid(FieldErrors),
    /// The backend or transport failed; draft and payment are kept
    Failed(String),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::PaymentRequired => PAYMENT_REQUIRED.to_string(),
            SubmitError::InFlight => "Submission already in progress".to_string(),
            SubmitError::AlreadySubmitted => "Consultation already submitted".to_string(),
            SubmitError::Invalid(_) => "Please fix the highlighted fields".to_string(),
            SubmitError::Failed(detail) => format!("Failed to create consultation: {}", detail),
        }
    }
}

/// Wizard state machine
#[derive(Debug, Clone)]
pub struct ConsultationWizard {
    step: WizardStep,
    draft: ConsultationDraft,
    errors: FieldErrors,
    submitting: bool,
    submitted: bool,
}

impl ConsultationWizard {
    pub fn new(patient_id: impl Into<String>, doctor_id: impl Into<String>) -> Self {
        Self {
            step: WizardStep::MedicalHistory,
            draft: ConsultationDraft::new(patient_id, doctor_id),
            errors: FieldErrors::new(),
            submitting: false,
            submitted: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ConsultationDraft {
        &self.draft
    }

    /// Inline errors currently shown
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_payment_complete(&self) -> bool {
        self.draft.is_paid()
    }

    pub fn payment_transaction_id(&self) -> Option<&str> {
        self.draft.payment_transaction_id.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether the submit action should be offered
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Payment
            && self.is_payment_complete()
            && !self.submitting
            && !self.submitted
    }

    /// Update a field from text
    ///
    /// Fields on the active step are re-validated immediately.
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::IllnessHistory => self.draft.illness_history = value.to_string(),
            DraftField::SurgeryHistory => self.draft.surgery_history = value.to_string(),
            DraftField::DiabetesStatus => {
                self.draft.diabetes_status = DiabetesStatus::from_str(value).ok()
            }
            DraftField::Allergies => self.draft.allergies = value.to_string(),
            DraftField::OtherNotes => self.draft.other_notes = value.to_string(),
        }
        self.revalidate(field);
    }

    pub fn set_diabetes_status(&mut self, status: DiabetesStatus) {
        self.draft.diabetes_status = Some(status);
        self.revalidate(DraftField::DiabetesStatus);
    }

    fn revalidate(&mut self, field: DraftField) {
        if field.step() != self.step {
            return;
        }
        let key = field.key();
        match validate_step(self.step, &self.draft).get(key) {
            Some(message) => self.errors.insert(key, message),
            None => self.errors.remove(key),
        }
    }

    /// Move forward if the current step validates
    ///
    /// Returns whether the step changed. On failure the current step's
    /// errors are exposed through [`errors`](Self::errors).
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.step.next() else {
            return false;
        };

        let keys: Vec<&str> = self.step.fields().iter().map(|f| f.key()).collect();
        self.errors.clear_fields(&keys);

        let step_errors = validate_step(self.step, &self.draft);
        if !step_errors.is_empty() {
            debug!("Wizard held at {:?}: {}", self.step, step_errors);
            self.errors.extend(step_errors);
            return false;
        }

        self.step = next;
        true
    }

    /// Move back one step, never validating
    pub fn retreat(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                let keys: Vec<&str> = self.step.fields().iter().map(|f| f.key()).collect();
                self.errors.clear_fields(&keys);
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Simulate a payment, returning the new transaction id
    ///
    /// Each call replaces the previous id.
    pub fn simulate_payment(&mut self) -> &str {
        let txn_id = generate_transaction_id();
        info!("Simulated consultation payment {}", txn_id);
        self.errors.remove("paymentTxnId");
        self.draft.payment_transaction_id.insert(txn_id).as_str()
    }

    /// Text a payment QR code would encode
    pub fn payment_reference(&self) -> String {
        format!(
            "consultation-payment:{}-{}-{}",
            self.draft.patient_id,
            self.draft.doctor_id,
            Utc::now().timestamp_millis()
        )
    }

    /// Check the draft and mark a submission in flight
    ///
    /// Payment is checked first so an unpaid submit never reaches
    /// validation or the network.
    pub fn begin_submit(&mut self) -> Result<ConsultationRequest, SubmitError> {
        if self.submitted {
            return Err(SubmitError::AlreadySubmitted);
        }
        if self.submitting {
            return Err(SubmitError::InFlight);
        }
        if !self.is_payment_complete() {
            return Err(SubmitError::PaymentRequired);
        }

        let request = self.draft.to_request().map_err(|errors| {
            self.errors = errors.clone();
            SubmitError::Invalid(errors)
        })?;

        self.submitting = true;
        Ok(request)
    }

    /// Record the backend's answer to a submission started with
    /// [`begin_submit`](Self::begin_submit)
    pub fn complete_submit(&mut self, result: Result<(), String>) -> Result<(), SubmitError> {
        self.submitting = false;
        match result {
            Ok(()) => {
                info!("Consultation created for doctor {}", self.draft.doctor_id);
                self.submitted = true;
                Ok(())
            }
            Err(detail) => {
                warn!("Consultation submission failed: {}", detail);
                Err(SubmitError::Failed(detail))
            }
        }
    }

    /// Submit through `api` in one go
    pub async fn submit(&mut self, api: &dyn ClinicApi) -> Result<(), SubmitError> {
        let request = self.begin_submit()?;
        let result = api
            .create_consultation(&request.doctor_id, &request)
            .await
            .map_err(|e| e.to_string());
        self.complete_submit(result)
    }
}
