//! Client-side routes

use std::fmt;

use crate::models::Role;

/// Segments under `/doctor/` that name sub-paths rather than a doctor id
const RESERVED_DOCTOR_SEGMENTS: [&str; 2] = ["auth", "consultations"];

/// Every view the client can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, the doctor listing
    Home,
    SignIn(Role),
    SignUp(Role),
    /// `/doctor/:doctorId`
    DoctorProfile(String),
    /// `/doctor/consultations/:doctorId`
    DoctorConsultations(String),
    /// `/patient/consult/:doctorId`
    Consult(String),
}

impl Route {
    /// Parse a path, ignoring a trailing slash
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        if !trimmed.starts_with('/') {
            return None;
        }
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["doctor", "auth", "signin"] => Route::SignIn(Role::Doctor),
            ["doctor", "auth", "signup"] => Route::SignUp(Role::Doctor),
            ["patient", "auth", "signin"] => Route::SignIn(Role::Patient),
            ["patient", "auth", "signup"] => Route::SignUp(Role::Patient),
            ["doctor", "consultations", id] => Route::DoctorConsultations(id.to_string()),
            ["doctor", id] if !RESERVED_DOCTOR_SEGMENTS.contains(id) => {
                Route::DoctorProfile(id.to_string())
            }
            ["patient", "consult", id] => Route::Consult(id.to_string()),
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SignIn(role) => format!("/{}/auth/signin", role.as_path()),
            Route::SignUp(role) => format!("/{}/auth/signup", role.as_path()),
            Route::DoctorProfile(id) => format!("/doctor/{}", id),
            Route::DoctorConsultations(id) => format!("/doctor/consultations/{}", id),
            Route::Consult(id) => format!("/patient/consult/{}", id),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::Home => "Doctors".to_string(),
            Route::SignIn(role) => format!("{} Sign In", role),
            Route::SignUp(role) => format!("{} Sign Up", role),
            Route::DoctorProfile(_) => "Profile".to_string(),
            Route::DoctorConsultations(_) => "Consultations".to_string(),
            Route::Consult(_) => "Doctor's Consultation Form".to_string(),
        }
    }

    /// Role whose auth form this route shows
    pub fn auth_form_role(&self) -> Option<Role> {
        match self {
            Route::SignIn(role) | Route::SignUp(role) => Some(*role),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(
            Route::parse("/doctor/auth/signin"),
            Some(Route::SignIn(Role::Doctor))
        );
        assert_eq!(
            Route::parse("/patient/auth/signup/"),
            Some(Route::SignUp(Role::Patient))
        );
        assert_eq!(
            Route::parse("/doctor/consultations/d1"),
            Some(Route::DoctorConsultations("d1".into()))
        );
        assert_eq!(
            Route::parse("/doctor/d1"),
            Some(Route::DoctorProfile("d1".into()))
        );
        assert_eq!(
            Route::parse("/patient/consult/d7"),
            Some(Route::Consult("d7".into()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Route::parse("doctor/d1"), None);
        assert_eq!(Route::parse("/patient/dashboard"), None);
        assert_eq!(Route::parse("/doctor/a/b/c"), None);
    }

    #[test]
    fn test_parse_rejects_reserved_doctor_segments() {
        assert_eq!(Route::parse("/doctor/consultations"), None);
        assert_eq!(Route::parse("/doctor/auth/"), None);
        assert_eq!(
            Route::parse("/doctor/consultant"),
            Some(Route::DoctorProfile("consultant".into()))
        );
    }

    #[test]
    fn test_auth_form_role() {
        assert_eq!(
            Route::SignUp(Role::Doctor).auth_form_role(),
            Some(Role::Doctor)
        );
        assert_eq!(Route::Consult("d1".into()).auth_form_role(), None);
    }

    #[test]
    fn test_path_parses_back() {
        let routes = [
            Route::Home,
            Route::SignIn(Role::Doctor),
            Route::SignUp(Role::Doctor),
            Route::SignIn(Role::Patient),
            Route::SignUp(Role::Patient),
            Route::DoctorProfile("d1".into()),
            Route::DoctorConsultations("d1".into()),
            Route::Consult("d2".into()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()));
        }
    }
}
