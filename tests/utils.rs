use async_trait::async_trait;
use clinic_booking_sdk::{
    client::ClinicApi,
    models::{
        AuthCheck, AuthResponse, AccountRef, Consultation, ConsultationRequest, Credentials,
        DiabetesStatus, DoctorProfile, DoctorRegistration, DoctorSummary, PatientRegistration,
        PatientSummary, Prescription, Role,
    },
    Error,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// Backend operations the mock can be scripted for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Endpoint {
        ListDoctors,
        CheckAuth,
        SignIn,
        SignUp,
        Logout,
        DoctorProfile,
        DoctorConsultations,
        CreateConsultation,
    }

    /// Every request the mock received, in order
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        ListDoctors,
        CheckAuth,
        SignIn(Role, Credentials),
        DoctorSignUp(DoctorRegistration),
        PatientSignUp(PatientRegistration),
        Logout(Role),
        DoctorProfile,
        DoctorConsultations,
        CreateConsultation(String, ConsultationRequest),
    }

    impl Call {
        pub fn endpoint(&self) -> Endpoint {
            match self {
                Call::ListDoctors => Endpoint::ListDoctors,
                Call::CheckAuth => Endpoint::CheckAuth,
                Call::SignIn(..) => Endpoint::SignIn,
                Call::DoctorSignUp(_) | Call::PatientSignUp(_) => Endpoint::SignUp,
                Call::Logout(_) => Endpoint::Logout,
                Call::DoctorProfile => Endpoint::DoctorProfile,
                Call::DoctorConsultations => Endpoint::DoctorConsultations,
                Call::CreateConsultation(..) => Endpoint::CreateConsultation,
            }
        }
    }

    /// Scripted failure, turned into an [`Error`] on every matching call
    #[derive(Debug, Clone)]
    pub enum MockFailure {
        Api { status: u16, flag: Option<String> },
        Network(String),
    }

    impl MockFailure {
        pub fn flag(status: u16, flag: &str) -> Self {
            MockFailure::Api {
                status,
                flag: Some(flag.to_string()),
            }
        }

        fn to_error(&self) -> Error {
            match self {
                MockFailure::Api { status, flag } => Error::Api {
                    status: *status,
                    flag: flag.clone(),
                    message: None,
                },
                MockFailure::Network(message) => Error::Other(message.clone()),
            }
        }
    }

    /// In-memory clinic backend recording every call
    pub struct MockClinicApi {
        calls: Mutex<Vec<Call>>,
        failures: Mutex<HashMap<Endpoint, MockFailure>>,
        doctors: Vec<DoctorSummary>,
        auth_check: Mutex<AuthCheck>,
        profile: DoctorProfile,
        consultations: Vec<Consultation>,
    }

    impl MockClinicApi {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failures: Mutex::new(HashMap::new()),
                doctors: sample_doctors(),
                auth_check: Mutex::new(AuthCheck::unauthenticated()),
                profile: sample_profile(),
                consultations: vec![sample_consultation()],
            }
        }

        pub fn with_auth_check(self, check: AuthCheck) -> Self {
            *self.auth_check.lock().unwrap() = check;
            self
        }

        pub fn with_doctors(mut self, doctors: Vec<DoctorSummary>) -> Self {
            self.doctors = doctors;
            self
        }

        pub fn set_auth_check(&self, check: AuthCheck) {
            *self.auth_check.lock().unwrap() = check;
        }

        pub fn fail(&self, endpoint: Endpoint, failure: MockFailure) {
            self.failures.lock().unwrap().insert(endpoint, failure);
        }

        pub fn recover(&self, endpoint: Endpoint) {
            self.failures.lock().unwrap().remove(&endpoint);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, endpoint: Endpoint) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|call| call.endpoint() == endpoint)
                .count()
        }

        fn record(&self, call: Call) -> Result<(), Error> {
            let endpoint = call.endpoint();
            self.calls.lock().unwrap().push(call);
            match self.failures.lock().unwrap().get(&endpoint) {
                Some(failure) => Err(failure.to_error()),
                None => Ok(()),
            }
        }
    }

    fn account(role: Role, id: &str) -> AuthResponse {
        let account = Some(AccountRef {
            id: id.to_string(),
            name: None,
        });
        match role {
            Role::Doctor => AuthResponse {
                doctor: account,
                patient: None,
            },
            Role::Patient => AuthResponse {
                doctor: None,
                patient: account,
            },
        }
    }

    #[async_trait]
    impl ClinicApi for MockClinicApi {
        async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, Error> {
            self.record(Call::ListDoctors)?;
            Ok(self.doctors.clone())
        }

        async fn check_auth(&self) -> Result<AuthCheck, Error> {
            self.record(Call::CheckAuth)?;
            Ok(self.auth_check.lock().unwrap().clone())
        }

        async fn sign_in(
            &self,
            role: Role,
            credentials: &Credentials,
        ) -> Result<AuthResponse, Error> {
            self.record(Call::SignIn(role, credentials.clone()))?;
            Ok(match role {
                Role::Doctor => account(role, "d1"),
                Role::Patient => account(role, "p1"),
            })
        }

        async fn doctor_sign_up(
            &self,
            registration: &DoctorRegistration,
        ) -> Result<AuthResponse, Error> {
            self.record(Call::DoctorSignUp(registration.clone()))?;
            Ok(account(Role::Doctor, "d-new"))
        }

        async fn patient_sign_up(
            &self,
            registration: &PatientRegistration,
        ) -> Result<AuthResponse, Error> {
            self.record(Call::PatientSignUp(registration.clone()))?;
            Ok(account(Role::Patient, "p-new"))
        }

        async fn logout(&self, role: Role) -> Result<(), Error> {
            self.record(Call::Logout(role))
        }

        async fn doctor_profile(&self) -> Result<DoctorProfile, Error> {
            self.record(Call::DoctorProfile)?;
            Ok(self.profile.clone())
        }

        async fn doctor_consultations(&self) -> Result<Vec<Consultation>, Error> {
            self.record(Call::DoctorConsultations)?;
            Ok(self.consultations.clone())
        }

        async fn create_consultation(
            &self,
            doctor_id: &str,
            request: &ConsultationRequest,
        ) -> Result<(), Error> {
            self.record(Call::CreateConsultation(
                doctor_id.to_string(),
                request.clone(),
            ))
        }
    }

    pub fn sample_doctors() -> Vec<DoctorSummary> {
        vec![
            DoctorSummary {
                id: "d1".to_string(),
                name: "Dr. Meredith Grey".to_string(),
                specialty: "Surgery".to_string(),
                experience: 12,
                profile_image: "https://cdn.clinic.test/grey.png".to_string(),
            },
            DoctorSummary {
                id: "d2".to_string(),
                name: "Dr. Gregory House".to_string(),
                specialty: "Neurology".to_string(),
                experience: 20,
                profile_image: String::new(),
            },
        ]
    }

    pub fn sample_profile() -> DoctorProfile {
        DoctorProfile {
            id: "d1".to_string(),
            name: "Dr. Meredith Grey".to_string(),
            email: "grey@clinic.test".to_string(),
            phone: "0123456789".to_string(),
            profile_image: String::new(),
            specialty: "Surgery".to_string(),
            experience: 12,
        }
    }

    pub fn sample_consultation() -> Consultation {
        Consultation {
            id: "c1".to_string(),
            patient_id: "p1".to_string(),
            doctor_id: "d1".to_string(),
            step1_illness: "Migraine".to_string(),
            step1_surgery: "None".to_string(),
            diabetes_status: DiabetesStatus::NonDiabetic,
            allergies: String::new(),
            others: String::new(),
            payment_txn_id: "TXN_abc123def4567".to_string(),
            patient: Some(PatientSummary {
                id: "p1".to_string(),
                name: "Ana".to_string(),
                email: "ana@clinic.test".to_string(),
                phone: "0123456789".to_string(),
                profile_image: String::new(),
                age: 31,
            }),
            prescription: Some(Prescription {
                id: "rx1".to_string(),
                medicines: "Ibuprofen".to_string(),
                dosage: "200mg".to_string(),
                duration: "5 days".to_string(),
            }),
            prescription_id: Some("rx1".to_string()),
            created_at: None,
        }
    }
}
