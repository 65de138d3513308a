//! # Leads Service Module
//!
//! Everything the dashboard does with leads. Reads always go through the
//! same pipeline (normalize, deduplicate, filter for the caller, sort newest
//! first) so the listing, both exports and the analytics endpoint agree on
//! what a caller can see.
//!
//! Non-admins only see and touch leads assigned to them; bulk assignment and
//! CSV import are admin-only.

mod assign;
mod columns;
mod create;
mod delete;
mod disposition;
mod export;
mod get;
mod import;
mod import_status;
mod list;
mod pdf;
pub(crate) mod query;
mod remark;
mod update;
mod validation;
mod viewed;

use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/leads";

/// # Registered Routes:
///
/// Fixed paths are registered before `/{id}` so they are not captured as
/// lead ids.
///
/// *   **`GET ""`**: filtered listing; query `start`, `end`, `site`,
///     `assignedUser`, `disposition`.
/// *   **`POST ""`**: create a lead.
/// *   **`GET /export.csv`**, **`GET /export.pdf`**: the listing as a file.
/// *   **`POST /import`**: multipart CSV upload, answers `202` with a job id.
/// *   **`GET /import/status/{job_id}`**: poll an import job.
/// *   **`POST /assign`**: bulk (re)assignment.
/// *   **`GET|PATCH|DELETE /{id}`**: read, update or delete one lead.
/// *   **`POST /{id}/remarks`**: append a remark line.
/// *   **`PUT /{id}/disposition`**: set the disposition, arming or resolving
///     the lead's reminder.
/// *   **`POST /{id}/viewed`**: mark the lead viewed for the caller.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/export.csv", get().to(export::process))
        .route("/export.pdf", get().to(pdf::process))
        .route("/import", post().to(import::process))
        .route("/import/status/{job_id}", get().to(import_status::process))
        .route("/assign", post().to(assign::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", patch().to(update::process))
        .route("/{id}", delete().to(delete::process))
        .route("/{id}/remarks", post().to(remark::process))
        .route("/{id}/disposition", put().to(disposition::process))
        .route("/{id}/viewed", post().to(viewed::process))
}

#[cfg(test)]
mod tests {
    use crate::store::{RecordStore, LEADS_TABLE};
    use crate::test_support::{init_app, TestApp};
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use chrono::Utc;
    use common::jobs::JobStatus;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn seed(app: &TestApp, fields: Value) -> String {
        app.state
            .store
            .create(LEADS_TABLE, fields.as_object().unwrap().clone())
            .unwrap()
            .id
    }

    fn agent_lead(app: &TestApp) -> String {
        seed(
            app,
            json!({
                "name": "Asha",
                "phoneNumber": "9876543210",
                "date": "2024-03-01 10:00",
                "assignedTo": "agent@school.in"
            }),
        )
    }

    fn ids(leads: &[Value]) -> Vec<&str> {
        leads.iter().map(|l| l["id"].as_str().unwrap()).collect()
    }

    #[actix_web::test]
    async fn listing_is_deduplicated_sorted_and_scoped() {
        let app = TestApp::new();
        let service = init_app!(app);
        seed(&app, json!({
            "name": "Asha", "email": "asha@mail.com", "source": "Edu123 form",
            "date": "2024-03-01 10:00", "assignedTo": "agent@school.in"
        }));
        let newer = seed(&app, json!({
            "name": "Asha R", "email": "ASHA@mail.com", "source": "edu123 form",
            "date": "2024-03-05 09:00", "assignedTo": "agent@school.in"
        }));
        let other = seed(&app, json!({
            "name": "Vikram", "date": "2024-03-04", "assignedTo": "someone@school.in",
            "url": "https://www.boardingadmissions.com/apply"
        }));

        let req = test::TestRequest::get()
            .uri("/api/leads")
            .cookie(app.cookie(&app.admin))
            .to_request();
        let leads: Vec<Value> = test::call_and_read_body_json(&service, req).await;
        assert_eq!(ids(&leads), vec![newer.as_str(), other.as_str()]);
        assert_eq!(leads[1]["site"], "boardingadmissions.com");
        assert_eq!(leads[0]["viewed"], false);

        let req = test::TestRequest::get()
            .uri("/api/leads")
            .cookie(app.cookie(&app.agent))
            .to_request();
        let leads: Vec<Value> = test::call_and_read_body_json(&service, req).await;
        assert_eq!(ids(&leads), vec![newer.as_str()]);

        let req = test::TestRequest::get()
            .uri("/api/leads?start=2024-03-04&end=2024-03-04&site=boardingadmissions.com")
            .cookie(app.cookie(&app.admin))
            .to_request();
        let leads: Vec<Value> = test::call_and_read_body_json(&service, req).await;
        assert_eq!(ids(&leads), vec![other.as_str()]);

        let req = test::TestRequest::get()
            .uri("/api/leads?start=yesterday")
            .cookie(app.cookie(&app.admin))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn creating_validates_and_defaults_the_assignee() {
        let app = TestApp::new();
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri("/api/leads")
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "name": "Meera", "phoneNumber": "98765-43210" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let lead: Value = test::read_body_json(resp).await;
        assert_eq!(lead["assignedTo"], "agent@school.in");
        assert_eq!(lead["phoneNumber"], "9876543210");
        assert_eq!(lead["disposition"], "Undefined");
        assert!(lead["date"].is_string());

        for body in [
            json!({ "name": "Meera" }),
            json!({ "name": "Meera", "phoneNumber": "123" }),
            json!({ "name": "Meera", "phoneNumber": "9876543210", "email": "meera@" }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/leads")
                .cookie(app.cookie(&app.agent))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let error: Value = test::read_body_json(resp).await;
            assert!(error["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn agents_cannot_open_other_peoples_leads() {
        let app = TestApp::new();
        let service = init_app!(app);
        let foreign = seed(&app, json!({ "name": "Vikram", "assignedTo": "someone@school.in" }));

        let req = test::TestRequest::get()
            .uri(&format!("/api/leads/{}", foreign))
            .cookie(app.cookie(&app.agent))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/api/leads/recmissing")
            .cookie(app.cookie(&app.admin))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::patch()
            .uri(&format!("/api/leads/{}", agent_lead(&app)))
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "assignedTo": "someone@school.in" }))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn reminder_disposition_arms_and_other_dispositions_resolve() {
        let app = TestApp::new();
        let service = init_app!(app);
        let id = agent_lead(&app);
        let uri = format!("/api/leads/{}/disposition", id);

        let req = test::TestRequest::put()
            .uri(&uri)
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "disposition": "Reminder" }))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let in_an_hour = Utc::now().timestamp_millis() + 3_600_000;
        let req = test::TestRequest::put()
            .uri(&uri)
            .cookie(app.cookie(&app.agent))
            .set_json(json!({
                "disposition": "Reminder",
                "specificDisposition": "Call after exams",
                "reminderTime": in_an_hour
            }))
            .to_request();
        let lead: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(lead["disposition"], "Reminder");
        assert_eq!(lead["specificDisposition"], "Call after exams");

        let pending = app.state.reminders.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].lead_id, id);
        assert_eq!(pending[0].reminder_time, in_an_hour);

        let req = test::TestRequest::put()
            .uri(&uri)
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "disposition": "Admission Done" }))
            .to_request();
        let lead: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(lead["specificDisposition"], "Undefined");
        assert!(app.state.reminders.pending().await.is_empty());
    }

    #[actix_web::test]
    async fn patching_the_disposition_to_reminder_is_rejected() {
        let app = TestApp::new();
        let service = init_app!(app);
        let id = agent_lead(&app);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/leads/{}", id))
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "disposition": "Reminder", "remark": "call back" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"].as_str().unwrap().contains("/disposition"));

        assert!(app.state.reminders.pending().await.is_empty());
        let stored = app.state.store.get(LEADS_TABLE, &id).unwrap();
        assert!(stored.fields.get("disposition").is_none());
        assert!(stored.fields.get("remark").is_none());
    }

    #[actix_web::test]
    async fn remarks_viewed_marks_and_delete() {
        let app = TestApp::new();
        let service = init_app!(app);
        let id = agent_lead(&app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/leads/{}/remarks", id))
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "text": "Called, no answer" }))
            .to_request();
        let lead: Value = test::call_and_read_body_json(&service, req).await;
        assert!(lead["remark"]
            .as_str()
            .unwrap()
            .ends_with("] agent: Called, no answer"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/leads/{}/viewed", id))
            .cookie(app.cookie(&app.agent))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::NO_CONTENT
        );
        let req = test::TestRequest::get()
            .uri(&format!("/api/leads/{}", id))
            .cookie(app.cookie(&app.agent))
            .to_request();
        let lead: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(lead["viewed"], true);

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}/disposition", id))
            .cookie(app.cookie(&app.agent))
            .set_json(json!({
                "disposition": "Reminder",
                "reminderTime": Utc::now().timestamp_millis() + 1_000
            }))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);
        assert_eq!(app.state.reminders.pending().await.len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/leads/{}", id))
            .cookie(app.cookie(&app.agent))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);
        assert!(app.state.viewed.viewed_by(&app.agent.id).unwrap().is_empty());
        assert!(app.state.reminders.pending().await.is_empty());

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(app.state.reminders.take_due(|_| true).await.is_empty());

        let req = test::TestRequest::get()
            .uri(&format!("/api/leads/{}", id))
            .cookie(app.cookie(&app.agent))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn fixed_paths_win_over_lead_ids() {
        let app = TestApp::new();
        let service = init_app!(app);
        let unassigned = seed(&app, json!({ "name": "Asha", "phoneNumber": "9876543210" }));

        let req = test::TestRequest::post()
            .uri("/api/leads/assign")
            .cookie(app.cookie(&app.agent))
            .set_json(json!({ "leadIds": [unassigned], "assignedTo": "agent@school.in" }))
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::post()
            .uri("/api/leads/assign")
            .cookie(app.cookie(&app.admin))
            .set_json(json!({ "leadIds": [unassigned], "assignedTo": "agent@school.in" }))
            .to_request();
        let result: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(result["updated"], 1);

        let other = seed(&app, json!({ "name": "Vikram", "phoneNumber": "9876500000" }));
        let req = test::TestRequest::post()
            .uri("/api/leads/assign")
            .cookie(app.cookie(&app.admin))
            .set_json(json!({
                "leadIds": [other, "recmissing"],
                "assignedTo": "agent@school.in"
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"].as_str().unwrap().contains("recmissing"));
        let untouched = app.state.store.get(LEADS_TABLE, &other).unwrap();
        assert!(untouched.fields.get("assignedTo").is_none());

        let req = test::TestRequest::get()
            .uri("/api/leads/export.csv")
            .cookie(app.cookie(&app.agent))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.starts_with("Name,Email,Phone Number"));
        assert!(text.contains("Asha"));
    }

    #[actix_web::test]
    async fn csv_import_runs_as_a_background_job() {
        let app = TestApp::new();
        let service = init_app!(app);
        let boundary = "leadboard-test-boundary";
        let csv = "Name,Phone Number,Disposition\nAsha,9876543210,warm\nBroken,1,\n";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"leads.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
            b = boundary,
            csv = csv
        );
        let content_type = format!("multipart/form-data; boundary={}", boundary);

        let req = test::TestRequest::post()
            .uri("/api/leads/import")
            .cookie(app.cookie(&app.agent))
            .insert_header((header::CONTENT_TYPE, content_type.clone()))
            .set_payload(body.clone())
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::post()
            .uri("/api/leads/import")
            .cookie(app.cookie(&app.admin))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        let started: Value = test::read_body_json(resp).await;
        let job_id = started["jobId"].as_str().unwrap().to_string();
        assert_eq!(started["md5"].as_str().unwrap().len(), 32);

        let mut status = None;
        for _ in 0..200 {
            let req = test::TestRequest::get()
                .uri(&format!("/api/leads/import/status/{}", job_id))
                .cookie(app.cookie(&app.admin))
                .to_request();
            let current: JobStatus = test::call_and_read_body_json(&service, req).await;
            if matches!(current, JobStatus::Completed(_) | JobStatus::Failed(_)) {
                status = Some(current);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            status,
            Some(JobStatus::Completed("1 imported, 1 skipped".into()))
        );
        let stored = app.state.store.list(LEADS_TABLE).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fields.get("disposition"), Some(&Value::from("Warm")));
    }
}
