// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use enrichrs::config::settings::ApiSettings;
use enrichrs::domain::models::enrichment::{EnrichmentRequestItem, EntityKind, ResultStatus};
use enrichrs::domain::services::bulk_job_client::BulkEnrichmentJobClient;
use enrichrs::domain::services::enrichment_api::{ApiError, EnrichmentApi, RemoteJobStatus};
use enrichrs::infrastructure::http_enrichment_api::HttpEnrichmentApi;
use enrichrs::utils::errors::EnrichmentError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::integration::helpers::test_config;

fn settings(server: &MockServer) -> ApiSettings {
    ApiSettings {
        base_url: format!("{}/v2", server.uri()),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
        requests_per_second: 0,
    }
}

fn api(server: &MockServer, kind: EntityKind) -> HttpEnrichmentApi {
    HttpEnrichmentApi::new(kind, &settings(server)).unwrap()
}

#[tokio::test]
async fn test_submit_companies_sends_payload_and_reads_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/companies/enrich"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "companies": [
                { "domain": "acme.com", "externalID": "row_0" },
                { "domain": "globex.com", "externalID": "row_1" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enrichmentID": "enr-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let job_id = api(&server, EntityKind::Company)
        .submit_batch(&[
            EnrichmentRequestItem::new("row_0", "acme.com"),
            EnrichmentRequestItem::new("row_1", "globex.com"),
        ])
        .await
        .unwrap();

    assert_eq!(job_id, "enr-42");
}

#[tokio::test]
async fn test_submit_people_falls_back_to_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/people/enrich"))
        .and(body_json(json!({
            "people": [{ "linkedinUrl": "https://www.linkedin.com/in/jane/", "externalID": "row_0" }]
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "p-7" })))
        .mount(&server)
        .await;

    let job_id = api(&server, EntityKind::Person)
        .submit_batch(&[EnrichmentRequestItem::new(
            "row_0",
            "https://www.linkedin.com/in/jane/",
        )])
        .await
        .unwrap();

    assert_eq!(job_id, "p-7");
}

#[tokio::test]
async fn test_status_codes_map_to_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/bad"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such job"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let api = api(&server, EntityKind::Company);

    assert!(matches!(
        api.job_status("auth").await,
        Err(ApiError::Authentication(_))
    ));
    match api.job_status("limited").await {
        Err(ApiError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)))
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
    assert!(matches!(
        api.job_status("down").await,
        Err(ApiError::Transient(_))
    ));
    match api.job_status("bad").await {
        Err(ApiError::Rejected { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such job");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(matches!(
        api.job_status("garbled").await,
        Err(ApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_completed_company_records_get_derived_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/enr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "companies": [{
                "externalID": "row_0",
                "name": "Acme",
                "employeeCount": 42,
                "websites": ["https://acme.com"],
                "linkedInURL": "linkedin.com/company/acme"
            }]
        })))
        .mount(&server)
        .await;

    let status = api(&server, EntityKind::Company)
        .job_status("enr-1")
        .await
        .unwrap();

    let records = match status {
        RemoteJobStatus::Completed { records } => records,
        other => panic!("expected completed status, got {:?}", other),
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].external_id, "row_0");
    assert_eq!(records[0].fields["size"], json!("11-50"));
    assert_eq!(records[0].fields["website"], json!("https://acme.com"));
    assert_eq!(
        records[0].fields["linkedin"],
        json!("https://www.linkedin.com/company/acme/")
    );
}

#[tokio::test]
async fn test_ancillary_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/organizations/lookalikes"))
        .and(body_json(json!({ "domain": "acme.com", "country": "FR" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "organizations": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/companies/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "companies": [{ "name": "Acme" }] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/people/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "people": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/account/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "credits": 120 })))
        .mount(&server)
        .await;

    let api = api(&server, EntityKind::Company);

    let lookalikes = api.company_lookalikes("acme.com", Some("FR")).await.unwrap();
    assert_eq!(lookalikes, json!({ "organizations": [] }));

    let companies = api
        .search_companies(&json!({ "filters": { "industries": ["Software"] } }))
        .await
        .unwrap();
    assert_eq!(companies["companies"][0]["name"], "Acme");

    let people = api.search_people(&json!({ "limit": 10 })).await.unwrap();
    assert_eq!(people, json!({ "people": [] }));

    assert_eq!(api.check_credits().await.unwrap()["credits"], 120);
    assert!(api.validate_api_key().await.unwrap());
}

#[tokio::test]
async fn test_validate_api_key_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account/credits"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(!api(&server, EntityKind::Company)
        .validate_api_key()
        .await
        .unwrap());
}

#[test]
fn test_missing_api_key_is_rejected() {
    let result = HttpEnrichmentApi::new(
        EntityKind::Company,
        &ApiSettings {
            base_url: "https://api.surfe.com/v2".to_string(),
            api_key: "  ".to_string(),
            timeout_secs: 30,
            requests_per_second: 10,
        },
    );

    assert!(matches!(result, Err(EnrichmentError::Configuration(_))));
}

#[test]
fn test_malformed_base_url_is_rejected() {
    let result = HttpEnrichmentApi::new(
        EntityKind::Person,
        &ApiSettings {
            base_url: "not a url".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 30,
            requests_per_second: 0,
        },
    );

    assert!(matches!(result, Err(EnrichmentError::Configuration(_))));
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/companies/enrich"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enrichmentID": "enr-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/enrich/enr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "companies": [{ "externalID": "row_0", "name": "Acme" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BulkEnrichmentJobClient::new(
        Arc::new(api(&server, EntityKind::Company)),
        test_config(1000),
    )
    .unwrap();

    let results = client
        .enrich(vec![
            EnrichmentRequestItem::new("row_0", "acme.com"),
            EnrichmentRequestItem::new("row_1", "bogus.invalid"),
        ])
        .await
        .unwrap();

    assert_eq!(results[0].status, ResultStatus::Success);
    assert_eq!(results[0].fields["name"], "Acme");
    assert_eq!(results[1].status, ResultStatus::NotFound);
}
