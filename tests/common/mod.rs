#![allow(dead_code)]

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::StatusCode, web};
use configurable_module_example::{
    ApplicationConfig,
    config::{LogLevel, ReleaseStage},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::{
    net::TcpListener,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const TEST_AUDIENCE: &str = "test-audience";
pub const TEST_KID: &str = "test-key-1";

const TEST_RSA_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_key.pem");
const TEST_RSA_MODULUS: &str = "rBOtSTkt6oufsUq1g3iklwePEcJ9xVBWiQk-U_g3T_6FcWQFNWSzjcnABaIu3-cb0rFvEDuh1f-8etKjx1THOW5G0kLe-z6jCYl_axYT7v-AEXBOYNTBUB_kcMZbSvgIFOzc-GnY4lZKH4Qj1LeQMvVPQF8BFgQQUzmOssdOdueg9lAkPk9AS4JMnuURKDVmaQNZ2xpuRr9kt0pfukXHJtV8A2N70IB6whn7ozK2-E8vYCt-ARKlkJdji_92YOS_fVoPmG5bw7cLV2xmqcIIGhA22MtjLh9-G6y9ikzAgKkxGU6TCBN-waPQDWuPNMw6_PDC6Va6NgKZuALaCHdwYQ";
const TEST_RSA_EXPONENT: &str = "AQAB";

/// Configuration for tests: auth disabled, crash reporting inactive.
pub fn test_config(base_url: &str) -> ApplicationConfig {
    ApplicationConfig {
        build_number: None,
        build_version: None,
        app_port: 3000,
        log_level: LogLevel::Debug,
        log_path: None,
        auth0_enabled: false,
        auth0_domain: "tenant.example.invalid".to_string(),
        auth0_audience: TEST_AUDIENCE.to_string(),
        bugsnag_api_key: "test-bugsnag-key".to_string(),
        bugsnag_release_stage: ReleaseStage::Test,
        bugsnag_endpoint: None,
        base_url: base_url.to_string(),
    }
}

/// Start an upstream double answering `GET {prefix}/objects` with a fixed
/// status and body. Returns the base URL to point the outer service at.
pub fn spawn_upstream(prefix: &'static str, status: u16, body: &'static str) -> String {
    let server = HttpServer::new(move || {
        App::new().route(
            &format!("{prefix}/objects"),
            web::get().to(move || async move {
                HttpResponse::build(StatusCode::from_u16(status).unwrap())
                    .content_type("application/json")
                    .body(body)
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}{prefix}")
}

/// Base URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A request captured by [`spawn_recorder`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub payload_version: Option<String>,
    pub body: Value,
}

/// Start a double accepting `POST /` and recording every JSON body it receives.
pub fn spawn_recorder() -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    let server = HttpServer::new(move || {
        let sink = sink.clone();
        App::new().route(
            "/",
            web::post().to(move |req: HttpRequest, body: web::Json<Value>| {
                let sink = sink.clone();
                async move {
                    let header = |name: &str| {
                        req.headers()
                            .get(name)
                            .and_then(|h| h.to_str().ok())
                            .map(str::to_string)
                    };
                    sink.lock().unwrap().push(RecordedRequest {
                        api_key: header("Bugsnag-Api-Key"),
                        payload_version: header("Bugsnag-Payload-Version"),
                        body: body.into_inner(),
                    });
                    HttpResponse::Ok().finish()
                }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{addr}/"), received)
}

/// Poll until `received` holds at least `count` entries or the timeout passes.
pub async fn wait_for_requests(received: &Arc<Mutex<Vec<RecordedRequest>>>, count: usize) -> Vec<RecordedRequest> {
    for _ in 0..50 {
        if received.lock().unwrap().len() >= count {
            break;
        }
        actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    }
    received.lock().unwrap().clone()
}

/// Start a tenant double publishing the test signing key. Returns the tenant
/// URL and the number of key set requests served.
pub fn spawn_jwks() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let jwks = json!({
        "keys": [{
            "kty": "RSA",
            "kid": TEST_KID,
            "use": "sig",
            "alg": "RS256",
            "n": TEST_RSA_MODULUS,
            "e": TEST_RSA_EXPONENT,
        }]
    });

    let server = HttpServer::new(move || {
        let counter = counter.clone();
        let jwks = jwks.clone();
        App::new().route(
            "/.well-known/jwks.json",
            web::get().to(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                let jwks = jwks.clone();
                async move { HttpResponse::Ok().json(jwks) }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{addr}/"), hits)
}

/// Sign an RS256 token with the test key.
pub fn sign_token(kid: &str, audience: &str, issuer: &str, expires_in: i64) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let claims = json!({
        "sub": "auth0|user-1",
        "aud": audience,
        "iss": issuer,
        "exp": chrono::Utc::now().timestamp() + expires_in,
        "permissions": ["read:objects"],
    });
    let key = EncodingKey::from_rsa_pem(TEST_RSA_KEY).unwrap();
    encode(&header, &claims, &key).unwrap()
}
