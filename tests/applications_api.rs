//! Job application API integration tests
//!
//! Candidates apply to offers created by a recruiter; the rules on who may
//! apply to what are checked end to end.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::*;
use jobapp::backend::applications::handlers::JobApplicationResponse;
use jobapp::backend::applications::ApplicationStatus;

const ACCESS_DENIED: &str = "Access Denied - Insufficient Permissions";

struct Hiring {
    server: TestServer,
    recruiter: (HeaderName, HeaderValue),
    candidate_id: Uuid,
    candidate: (HeaderName, HeaderValue),
    offer_id: Uuid,
}

async fn create_offer(server: &TestServer, auth: &(HeaderName, HeaderValue)) -> Uuid {
    let response = server
        .post("/api/jobs")
        .add_header(auth.0.clone(), auth.1.clone())
        .json(&json!({
            "title": "Backend Engineer",
            "description": "Build hiring services",
            "location": "Remote",
            "employmentType": "FULL_TIME"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("created offer should have an id")
}

async fn hiring() -> Hiring {
    let server = test_server();
    let recruiter = register_user(&server, "recruiter@example.com", "RECRUITER").await;
    let candidate = register_user(&server, "ada@example.com", "CANDIDATE").await;
    let recruiter = auth_header(&recruiter.token);
    let offer_id = create_offer(&server, &recruiter).await;

    Hiring {
        server,
        recruiter,
        candidate_id: candidate.id,
        candidate: auth_header(&candidate.token),
        offer_id,
    }
}

fn application(candidate_id: Uuid, offer_id: Uuid) -> Value {
    json!({ "candidateId": candidate_id, "jobOfferId": offer_id })
}

#[tokio::test]
async fn test_candidate_applies_once() {
    let h = hiring().await;
    let (name, value) = h.candidate.clone();

    let created = h
        .server
        .post("/api/applications")
        .add_header(name.clone(), value.clone())
        .json(&application(h.candidate_id, h.offer_id))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created = created.json::<JobApplicationResponse>();
    assert_eq!(created.candidate_id, h.candidate_id);
    assert_eq!(created.job_offer_id, h.offer_id);
    assert_eq!(created.status, ApplicationStatus::Pending);

    let fetched = h
        .server
        .get(&format!("/api/v1/applications/{}", created.id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(fetched.json::<JobApplicationResponse>(), created);

    let again = h
        .server
        .post("/api/applications")
        .add_header(name, value)
        .json(&application(h.candidate_id, h.offer_id))
        .await;
    assert_error_body(
        &again,
        StatusCode::BAD_REQUEST,
        "Candidate has already applied to this job offer",
        "/api/applications",
    );

    let listed = h
        .server
        .get("/api/applications")
        .add_header(h.recruiter.0, h.recruiter.1)
        .await
        .json::<Vec<JobApplicationResponse>>();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_closed_offer_refuses_applications() {
    let h = hiring().await;
    let (name, value) = h.recruiter.clone();

    let closed = h
        .server
        .put(&format!("/api/jobs/{}", h.offer_id))
        .add_header(name, value)
        .json(&json!({
            "title": "Backend Engineer",
            "description": "Build hiring services",
            "location": "Remote",
            "employmentType": "FULL_TIME",
            "active": false
        }))
        .await;
    assert_eq!(closed.json::<Value>()["active"], false);

    let response = h
        .server
        .post("/api/applications")
        .add_header(h.candidate.0, h.candidate.1)
        .json(&application(h.candidate_id, h.offer_id))
        .await;
    assert_error_body(
        &response,
        StatusCode::BAD_REQUEST,
        "Cannot apply to inactive job offer: Backend Engineer",
        "/api/applications",
    );
}

#[tokio::test]
async fn test_missing_candidate_or_offer() {
    let h = hiring().await;
    let (name, value) = h.recruiter.clone();
    let ghost = Uuid::new_v4();

    let no_candidate = h
        .server
        .post("/api/applications")
        .add_header(name.clone(), value.clone())
        .json(&application(ghost, h.offer_id))
        .await;
    assert_error_body(
        &no_candidate,
        StatusCode::NOT_FOUND,
        &format!("Candidate with id {} not found", ghost),
        "/api/applications",
    );

    let no_offer = h
        .server
        .post("/api/applications")
        .add_header(name, value)
        .json(&application(h.candidate_id, ghost))
        .await;
    assert_error_body(
        &no_offer,
        StatusCode::NOT_FOUND,
        &format!("Job Offer with id {} not found", ghost),
        "/api/applications",
    );
}

#[tokio::test]
async fn test_candidate_cannot_apply_for_someone_else() {
    let h = hiring().await;
    let other = register_user(&h.server, "grace@example.com", "CANDIDATE").await;

    let response = h
        .server
        .post("/api/applications")
        .add_header(h.candidate.0, h.candidate.1)
        .json(&application(other.id, h.offer_id))
        .await;

    assert_error_body(&response, StatusCode::FORBIDDEN, ACCESS_DENIED, "/api/applications");
}

#[tokio::test]
async fn test_application_validation_and_lookup() {
    let h = hiring().await;
    let (name, value) = h.recruiter.clone();

    let empty = h
        .server
        .post("/api/applications")
        .add_header(name.clone(), value.clone())
        .json(&json!({}))
        .await;
    let body = assert_error_body(
        &empty,
        StatusCode::BAD_REQUEST,
        "Validation Failed",
        "/api/applications",
    );
    let errors = body.errors.expect("field errors should be present");
    assert_eq!(errors["candidateId"], "Candidate ID is required");
    assert_eq!(errors["jobOfferId"], "Job Offer ID is required");

    let ghost = Uuid::new_v4();
    let path = format!("/api/applications/{}", ghost);
    let missing = h.server.get(&path).add_header(name.clone(), value.clone()).await;
    assert_error_body(
        &missing,
        StatusCode::NOT_FOUND,
        &format!("Job Application with id {} not found", ghost),
        &path,
    );

    let bad = h.server.get("/api/applications/nope").add_header(name, value).await;
    assert_error_body(
        &bad,
        StatusCode::BAD_REQUEST,
        "Invalid job application id",
        "/api/applications/nope",
    );
}
