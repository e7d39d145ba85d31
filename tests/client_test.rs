use std::sync::{Arc, Mutex};

use clinic_booking_sdk::client::{ClinicApi, ClinicClient};
use clinic_booking_sdk::models::{Credentials, Role, SessionRole};
use clinic_booking_sdk::{ClinicConfig, Error};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned HTTP response served by [`serve`]
struct Reply {
    status: u16,
    body: &'static str,
    set_cookie: Option<&'static str>,
}

impl Reply {
    fn ok(body: &'static str) -> Self {
        Self {
            status: 200,
            body,
            set_cookie: None,
        }
    }

    fn status(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            set_cookie: None,
        }
    }
}

/// Serve `replies` one connection at a time, recording each raw request
async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        for reply in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            recorded.lock().unwrap().push(request);

            let mut head = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                reply.status,
                reply.body.len()
            );
            if let Some(cookie) = reply.set_cookie {
                head.push_str(&format!("Set-Cookie: {}\r\n", cookie));
            }
            head.push_str("\r\n");
            stream.write_all(head.as_bytes()).await.unwrap();
            stream.write_all(reply.body.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    (base_url, requests)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn client(base_url: &str) -> ClinicClient {
    ClinicClient::new(ClinicConfig::new(base_url).with_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_session_cookie_is_sent_after_sign_in() {
    let (base_url, requests) = serve(vec![
        Reply {
            status: 200,
            body: r#"{"patient":{"id":"p1","name":"Ana"}}"#,
            set_cookie: Some("token=abc123; Path=/; HttpOnly"),
        },
        Reply::ok(r#"{"authenticated":true,"role":"patient","patientId":"p1"}"#),
    ])
    .await;
    let client = client(&base_url);

    let response = client
        .sign_in(
            Role::Patient,
            &Credentials {
                email: "ana@clinic.test".into(),
                password: "secret123".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.account_id(Role::Patient), Some("p1"));

    let check = client.check_auth().await.unwrap();
    assert!(check.authenticated);
    assert_eq!(check.role, Some(SessionRole::Patient));
    assert_eq!(check.patient_id.as_deref(), Some("p1"));

    let requests = requests.lock().unwrap();
    assert!(requests[0].starts_with("POST /api/patient/auth/signin "));
    assert!(requests[0].contains(r#""email":"ana@clinic.test""#));
    assert!(requests[1].starts_with("GET /api/auth/checkAuth "));
    assert!(requests[1].to_lowercase().contains("cookie: token=abc123"));
}

#[tokio::test]
async fn test_error_flag_is_surfaced() {
    let (base_url, _) = serve(vec![Reply::status(
        404,
        r#"{"flag":"DoctorNotFound","message":"No doctor with that email"}"#,
    )])
    .await;

    let err = client(&base_url)
        .sign_in(
            Role::Doctor,
            &Credentials {
                email: "ghost@clinic.test".into(),
                password: "secret123".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.flag(), Some("DoctorNotFound"));
    assert!(matches!(err, Error::Api { .. }));
}

#[tokio::test]
async fn test_non_json_error_body_keeps_status() {
    let (base_url, _) = serve(vec![Reply::status(500, "Internal Server Error")]).await;

    let err = client(&base_url).list_doctors().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.flag().is_none());
}

#[tokio::test]
async fn test_consultations_are_unwrapped_from_envelope() {
    let (base_url, requests) = serve(vec![Reply::ok(
        r#"{"consultations":[{"id":"c1","patientId":"p1","doctorId":"d1","step1Illness":"Migraine","step1Surgery":"None","diabetesStatus":"NonDiabetics","allergies":"","others":"","paymentTxnId":"TXN_abc"}]}"#,
    )])
    .await;

    let consultations = client(&base_url).doctor_consultations().await.unwrap();

    assert_eq!(consultations.len(), 1);
    assert_eq!(consultations[0].step1_illness, "Migraine");
    assert!(consultations[0].prescription.is_none());
    assert!(requests.lock().unwrap()[0].starts_with("GET /api/doctor/consultations "));
}

#[tokio::test]
async fn test_logout_posts_to_role_path() {
    let (base_url, requests) = serve(vec![Reply::ok(r#"{"message":"Logged out"}"#)]).await;

    client(&base_url).logout(Role::Doctor).await.unwrap();

    assert!(requests.lock().unwrap()[0].starts_with("POST /api/doctor/auth/logout "));
}
