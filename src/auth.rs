//! Sign-in and sign-up for doctors and patients
//!
//! Forms hold raw text as typed. `validate` is pure and returns per-field
//! messages; the async helpers submit a validated form through a
//! [`ClinicApi`] and record the identity in the [`SessionStore`].

use tracing::{info, warn};

use crate::client::ClinicApi;
use crate::error::Error;
use crate::models::{
    AuthResponse, Credentials, DoctorRegistration, PatientRegistration, ProfileImage, Role,
};
use crate::session::{SessionCommand, SessionStore};
use crate::validation::{
    validate_email, validate_integer_in_range, validate_min_len, validate_password,
    validate_password_confirmation, validate_phone, validate_required, FieldErrors,
};

/// Specialties a doctor can register with
pub const SPECIALTIES: [&str; 12] = [
    "Cardiology",
    "Dermatology",
    "Endocrinology",
    "Gastroenterology",
    "Neurology",
    "Oncology",
    "Orthopedics",
    "Pediatrics",
    "Psychiatry",
    "Radiology",
    "Surgery",
    "Urology",
];

pub const MAX_EXPERIENCE_YEARS: i64 = 70;
pub const MAX_AGE: i64 = 120;

pub const SIGN_IN_SUCCESS: &str = "Logged in Successfully";
pub const SIGN_UP_SUCCESS: &str = "Your account has been created successfully.";
pub const LOGOUT_SUCCESS: &str = "Logged Out Successfully";

/// Email and password for either role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check(
            "password",
            validate_required(&self.password, "Password is required"),
        );
        errors
    }

    /// Request body, or the field errors blocking submission
    pub fn credentials(&self) -> Result<Credentials, FieldErrors> {
        self.validate().into_result()?;
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Doctor registration as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorSignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub specialty: String,
    pub experience: String,
    pub profile_image: Option<ProfileImage>,
}

impl DoctorSignUpForm {
    pub fn validate(&self) -> FieldErrors {
        self.checked().0
    }

    /// Multipart payload, or the field errors blocking submission
    pub fn registration(&self) -> Result<DoctorRegistration, FieldErrors> {
        let (errors, experience) = self.checked();
        errors.into_result()?;
        let experience = experience.unwrap_or_default();

        Ok(DoctorRegistration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            specialty: self.specialty.clone(),
            experience,
            profile_image: self.profile_image.clone(),
        })
    }

    fn checked(&self) -> (FieldErrors, Option<u32>) {
        let mut errors = FieldErrors::new();
        check_profile_fields(
            &mut errors,
            &self.name,
            &self.email,
            &self.phone,
            &self.password,
            &self.confirm_password,
        );

        if !SPECIALTIES.contains(&self.specialty.as_str()) {
            errors.insert("specialty", "Please select a specialty");
        }

        let experience = errors
            .check(
                "experience",
                validate_integer_in_range(
                    &self.experience,
                    0,
                    MAX_EXPERIENCE_YEARS,
                    "Experience must be a positive number",
                    "Experience must be at most 70 years",
                ),
            )
            .and_then(|years| u32::try_from(years).ok());

        (errors, experience)
    }
}

/// Patient registration as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientSignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub age: String,
    pub surgery_history: String,
    pub illness_history: String,
    pub profile_image: Option<ProfileImage>,
}

impl PatientSignUpForm {
    pub fn validate(&self) -> FieldErrors {
        self.checked().0
    }

    /// Multipart payload, or the field errors blocking submission
    pub fn registration(&self) -> Result<PatientRegistration, FieldErrors> {
        let (errors, age) = self.checked();
        errors.into_result()?;

        Ok(PatientRegistration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            age: age.unwrap_or_default(),
            surgery_history: non_blank(&self.surgery_history),
            illness_history: non_blank(&self.illness_history),
            profile_image: self.profile_image.clone(),
        })
    }

    fn checked(&self) -> (FieldErrors, Option<u32>) {
        let mut errors = FieldErrors::new();
        check_profile_fields(
            &mut errors,
            &self.name,
            &self.email,
            &self.phone,
            &self.password,
            &self.confirm_password,
        );

        let age = errors
            .check(
                "age",
                validate_integer_in_range(
                    &self.age,
                    1,
                    MAX_AGE,
                    "Age must be a positive number",
                    "Age must be less than 120",
                ),
            )
            .and_then(|age| u32::try_from(age).ok());

        (errors, age)
    }
}

fn check_profile_fields(
    errors: &mut FieldErrors,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    confirm_password: &str,
) {
    errors.check(
        "name",
        validate_min_len(name, 2, "Name must be at least 2 characters"),
    );
    errors.check("email", validate_email(email));
    errors.check("phone", validate_phone(phone));
    errors.check("password", validate_password(password));
    errors.check(
        "confirmPassword",
        validate_password_confirmation(password, confirm_password),
    );
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Which auth action failed, for picking generic copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    Logout,
}

/// Why an auth action did not go through
///
/// Clone so it can travel inside UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// Rejected locally, nothing was sent
    Invalid(FieldErrors),
    /// Backend flag `DoctorNotFound` / `PatientNotFound`
    EmailNotFound,
    /// Backend flag `InvalidCredentials`
    InvalidCredentials,
    /// Anything else: transport errors, unknown flags, malformed replies
    Failed { action: AuthAction, detail: String },
}

impl AuthFailure {
    /// Classify an API error for `role`
    pub fn from_error(role: Role, action: AuthAction, error: &Error) -> Self {
        match error.flag() {
            Some(flag) if flag == role.not_found_flag() => AuthFailure::EmailNotFound,
            Some("InvalidCredentials") => AuthFailure::InvalidCredentials,
            _ => AuthFailure::Failed {
                action,
                detail: error.to_string(),
            },
        }
    }

    /// Notification text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            AuthFailure::Invalid(_) => "Please fix the highlighted fields".to_string(),
            AuthFailure::EmailNotFound => "Email not found".to_string(),
            AuthFailure::InvalidCredentials => "Invalid Credentials".to_string(),
            AuthFailure::Failed { action, .. } => match action {
                AuthAction::SignIn => "Something went wrong, please try again".to_string(),
                AuthAction::SignUp => "Failed to create account".to_string(),
                AuthAction::Logout => "Failed to log out".to_string(),
            },
        }
    }

    /// Field errors when the failure was local validation
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AuthFailure::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

fn identity_from(
    role: Role,
    action: AuthAction,
    response: &AuthResponse,
) -> Result<String, AuthFailure> {
    response
        .account_id(role)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AuthFailure::Failed {
            action,
            detail: format!("response carried no {} id", role.as_path()),
        })
}

/// Validate and submit a sign-in, returning the account id
///
/// Does not touch the session; pair with [`record_sign_in`].
pub async fn submit_sign_in(
    api: &dyn ClinicApi,
    role: Role,
    form: &SignInForm,
) -> Result<String, AuthFailure> {
    let credentials = form.credentials().map_err(AuthFailure::Invalid)?;

    match api.sign_in(role, &credentials).await {
        Ok(response) => identity_from(role, AuthAction::SignIn, &response),
        Err(e) => {
            warn!("{} sign-in failed: {}", role, e);
            Err(AuthFailure::from_error(role, AuthAction::SignIn, &e))
        }
    }
}

/// Validate and submit a doctor sign-up, returning the new account id
pub async fn submit_doctor_sign_up(
    api: &dyn ClinicApi,
    form: &DoctorSignUpForm,
) -> Result<String, AuthFailure> {
    let registration = form.registration().map_err(AuthFailure::Invalid)?;

    match api.doctor_sign_up(&registration).await {
        Ok(response) => identity_from(Role::Doctor, AuthAction::SignUp, &response),
        Err(e) => {
            warn!("Doctor sign-up failed: {}", e);
            Err(AuthFailure::from_error(Role::Doctor, AuthAction::SignUp, &e))
        }
    }
}

/// Validate and submit a patient sign-up, returning the new account id
pub async fn submit_patient_sign_up(
    api: &dyn ClinicApi,
    form: &PatientSignUpForm,
) -> Result<String, AuthFailure> {
    let registration = form.registration().map_err(AuthFailure::Invalid)?;

    match api.patient_sign_up(&registration).await {
        Ok(response) => identity_from(Role::Patient, AuthAction::SignUp, &response),
        Err(e) => {
            warn!("Patient sign-up failed: {}", e);
            Err(AuthFailure::from_error(Role::Patient, AuthAction::SignUp, &e))
        }
    }
}

/// Ask the backend to end the session for `role`
pub async fn submit_logout(api: &dyn ClinicApi, role: Role) -> Result<(), AuthFailure> {
    api.logout(role).await.map_err(|e| {
        warn!("{} logout failed: {}", role, e);
        AuthFailure::from_error(role, AuthAction::Logout, &e)
    })
}

/// Store the identity returned by a successful sign-in or sign-up
pub fn record_sign_in(session: &mut SessionStore, role: Role, id: impl Into<String>) {
    let id = id.into();
    info!("{} signed in as {}", role, id);
    session.dispatch(SessionCommand::signed_in(role, id));
}

/// Clear `role` after a successful logout
pub fn record_logout(session: &mut SessionStore, role: Role) {
    info!("{} logged out", role);
    session.dispatch(SessionCommand::signed_out(role));
}

/// Sign in and record the identity on success
///
/// The session is left unchanged on any failure.
pub async fn sign_in(
    api: &dyn ClinicApi,
    session: &mut SessionStore,
    role: Role,
    form: &SignInForm,
) -> Result<String, AuthFailure> {
    let id = submit_sign_in(api, role, form).await?;
    record_sign_in(session, role, id.clone());
    Ok(id)
}

/// Register a doctor and record the identity on success
pub async fn sign_up_doctor(
    api: &dyn ClinicApi,
    session: &mut SessionStore,
    form: &DoctorSignUpForm,
) -> Result<String, AuthFailure> {
    let id = submit_doctor_sign_up(api, form).await?;
    record_sign_in(session, Role::Doctor, id.clone());
    Ok(id)
}

/// Register a patient and record the identity on success
pub async fn sign_up_patient(
    api: &dyn ClinicApi,
    session: &mut SessionStore,
    form: &PatientSignUpForm,
) -> Result<String, AuthFailure> {
    let id = submit_patient_sign_up(api, form).await?;
    record_sign_in(session, Role::Patient, id.clone());
    Ok(id)
}

/// Log out and clear the role on success
pub async fn logout(
    api: &dyn ClinicApi,
    session: &mut SessionStore,
    role: Role,
) -> Result<(), AuthFailure> {
    submit_logout(api, role).await?;
    record_logout(session, role);
    Ok(())
}
