mod utils;

use clinic_booking_sdk::auth::{
    logout, sign_in, sign_up_doctor, sign_up_patient, AuthFailure, DoctorSignUpForm,
    PatientSignUpForm, SignInForm,
};
use clinic_booking_sdk::models::ProfileImage;
use clinic_booking_sdk::{Role, SessionState, SessionStore};
use utils::test_utils::{Call, Endpoint, MockClinicApi, MockFailure};

fn patient_sign_up_form() -> PatientSignUpForm {
    PatientSignUpForm {
        name: "Ana Lima".into(),
        email: "ana@clinic.test".into(),
        phone: "0123456789".into(),
        password: "secret123".into(),
        confirm_password: "secret123".into(),
        age: "31".into(),
        surgery_history: "".into(),
        illness_history: "".into(),
        profile_image: None,
    }
}

#[tokio::test]
async fn test_invalid_credentials_shows_exact_message() {
    let api = MockClinicApi::new();
    api.fail(
        Endpoint::SignIn,
        MockFailure::flag(401, "InvalidCredentials"),
    );
    let mut session = SessionStore::in_memory();
    let before = session.state().clone();

    let failure = sign_in(
        &api,
        &mut session,
        Role::Patient,
        &SignInForm::new("ana@clinic.test", "wrong-password"),
    )
    .await
    .unwrap_err();

    assert_eq!(failure, AuthFailure::InvalidCredentials);
    assert_eq!(failure.user_message(), "Invalid Credentials");
    assert_eq!(session.state(), &before);
}

#[tokio::test]
async fn test_unknown_email_maps_to_not_found() {
    let api = MockClinicApi::new();
    api.fail(Endpoint::SignIn, MockFailure::flag(404, "DoctorNotFound"));
    let mut session = SessionStore::in_memory();

    let failure = sign_in(
        &api,
        &mut session,
        Role::Doctor,
        &SignInForm::new("who@clinic.test", "x"),
    )
    .await
    .unwrap_err();
    assert_eq!(failure.user_message(), "Email not found");
}

#[tokio::test]
async fn test_sign_in_records_identity() {
    let api = MockClinicApi::new();
    let mut session = SessionStore::in_memory();

    let id = sign_in(
        &api,
        &mut session,
        Role::Doctor,
        &SignInForm::new(" grey@clinic.test ", "secret123"),
    )
    .await
    .unwrap();

    assert_eq!(id, "d1");
    assert_eq!(session.state().identity(Role::Doctor), Some("d1"));
    assert!(!session.state().patient_authenticated);

    let Call::SignIn(role, credentials) = &api.calls()[0] else {
        panic!("expected sign-in call");
    };
    assert_eq!(*role, Role::Doctor);
    assert_eq!(credentials.email, "grey@clinic.test");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() {
    let api = MockClinicApi::new();
    let mut session = SessionStore::in_memory();

    let mut form = patient_sign_up_form();
    form.confirm_password = "different".into();
    let failure = sign_up_patient(&api, &mut session, &form).await.unwrap_err();

    let errors = failure.field_errors().expect("validation failure");
    assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
    assert!(api.calls().is_empty());
    assert_eq!(session.state(), &SessionState::default());
}

#[tokio::test]
async fn test_patient_sign_up_omits_blank_histories() {
    let api = MockClinicApi::new();
    let mut session = SessionStore::in_memory();

    let id = sign_up_patient(&api, &mut session, &patient_sign_up_form())
        .await
        .unwrap();
    assert_eq!(id, "p-new");
    assert_eq!(session.state().identity(Role::Patient), Some("p-new"));

    let Call::PatientSignUp(registration) = &api.calls()[0] else {
        panic!("expected patient sign-up");
    };
    let names: Vec<&str> = registration
        .text_fields()
        .iter()
        .map(|(name, _)| *name)
        .collect();
    assert!(!names.contains(&"surgeryHistory"));
    assert!(!names.contains(&"illnessHistory"));
    assert!(!names.contains(&"confirmPassword"));
}

#[tokio::test]
async fn test_doctor_sign_up_sends_every_field_and_image() {
    let api = MockClinicApi::new();
    let mut session = SessionStore::in_memory();
    let form = DoctorSignUpForm {
        name: "Dr. Grey".into(),
        email: "grey@clinic.test".into(),
        phone: "0123456789".into(),
        password: "secret123".into(),
        confirm_password: "secret123".into(),
        specialty: "Cardiology".into(),
        experience: "0".into(),
        profile_image: Some(ProfileImage {
            file_name: "grey.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        }),
    };

    sign_up_doctor(&api, &mut session, &form).await.unwrap();

    let Call::DoctorSignUp(registration) = &api.calls()[0] else {
        panic!("expected doctor sign-up");
    };
    let fields = registration.text_fields();
    assert_eq!(fields.len(), 6);
    assert!(fields.contains(&("experience", "0".to_string())));
    assert!(registration.profile_image.is_some());
    assert_eq!(session.state().identity(Role::Doctor), Some("d-new"));
}

#[tokio::test]
async fn test_generic_sign_up_failure() {
    let api = MockClinicApi::new();
    api.fail(
        Endpoint::SignUp,
        MockFailure::Api {
            status: 500,
            flag: None,
        },
    );
    let mut session = SessionStore::in_memory();

    let failure = sign_up_patient(&api, &mut session, &patient_sign_up_form())
        .await
        .unwrap_err();
    assert_eq!(failure.user_message(), "Failed to create account");
    assert!(!session.state().patient_authenticated);
}

#[tokio::test]
async fn test_logout_clears_only_that_role() {
    let api = MockClinicApi::new();
    let mut session = SessionStore::in_memory();
    session.set_doctor_auth(true, "d1");
    session.set_patient_auth(true, "p1");

    logout(&api, &mut session, Role::Doctor).await.unwrap();
    assert!(!session.state().doctor_authenticated);
    assert_eq!(session.state().identity(Role::Patient), Some("p1"));

    api.fail(
        Endpoint::Logout,
        MockFailure::Network("offline".to_string()),
    );
    let failure = logout(&api, &mut session, Role::Patient).await.unwrap_err();
    assert_eq!(failure.user_message(), "Failed to log out");
    assert_eq!(session.state().identity(Role::Patient), Some("p1"));
}
