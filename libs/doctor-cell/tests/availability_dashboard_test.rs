use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::{time_slot_labels, AvailabilityDashboard, AvailabilityForm, AvailabilityService};
use shared_gateway::{MemorySessionStore, RequestDispatcher, SessionStore};
use shared_models::error::ClientError;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

const BASE: &str = "/api/v1/availability";

fn create_dashboard(mock_server: &MockServer) -> AvailabilityDashboard {
    let store = Arc::new(MemorySessionStore::new());
    store
        .save(&JwtTestUtils::create_test_token(&TestUser::doctor(3, "rahul@clinic.in"), None))
        .unwrap();

    let config = TestConfig::with_base_url(&mock_server.uri()).to_client_config();
    AvailabilityDashboard::new(AvailabilityService::new(&config, RequestDispatcher::new(store)))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 9, 15)
}

async fn mount_search(mock_server: &MockServer, records: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/doctor/3", BASE)))
        .and(query_param("startDate", "2025-09-15"))
        .and(query_param("endDate", "2025-09-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(mock_server)
        .await;
}

async fn searched_dashboard(mock_server: &MockServer) -> AvailabilityDashboard {
    let mut dashboard = create_dashboard(mock_server);
    dashboard
        .search(Some(3), Some(date(2025, 9, 15)), Some(date(2025, 9, 30)))
        .await
        .unwrap();
    dashboard
}

#[tokio::test]
async fn test_search_requires_doctor_and_range() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut dashboard = create_dashboard(&mock_server);
    let err = dashboard.search(Some(3), Some(today()), None).await.unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert_eq!(dashboard.error_message.as_deref(), Some("Please enter Doctor ID and date range"));
}

#[tokio::test]
async fn test_search_rejects_reversed_range() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut dashboard = create_dashboard(&mock_server);
    let err = dashboard
        .search(Some(3), Some(date(2025, 9, 30)), Some(date(2025, 9, 15)))
        .await
        .unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert_eq!(dashboard.error_message.as_deref(), Some("End date must be on or after start date"));
    assert!(dashboard.last_search.is_none());
}

#[tokio::test]
async fn test_search_lists_records() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([
            MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"]),
            MockBackendResponses::availability_response(3, "2025-09-17", &["2:00 PM - 3:00 PM", "3:00 PM - 4:00 PM"]),
        ]),
    )
    .await;

    let dashboard = searched_dashboard(&mock_server).await;

    assert_eq!(dashboard.availabilities.len(), 2);
    assert_eq!(dashboard.availabilities[1].time_slots.len(), 2);
    assert_eq!(dashboard.availabilities[0].specialty.as_deref(), Some("Cardiology"));
    assert!(dashboard.error_message.is_none());
}

#[tokio::test]
async fn test_empty_search_reports_no_availability() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, json!([])).await;

    let dashboard = searched_dashboard(&mock_server).await;

    assert!(dashboard.availabilities.is_empty());
    assert_eq!(dashboard.error_message.as_deref(), Some("No availability found for this doctor"));
}

#[tokio::test]
async fn test_nine_slots_rejected_without_network_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut dashboard = create_dashboard(&mock_server);
    let mut form = AvailabilityForm {
        doctor_id: Some(3),
        date: Some(date(2025, 9, 20)),
        selected_slots: Vec::new(),
    };
    for label in time_slot_labels() {
        form.toggle_slot(&label);
    }

    let err = dashboard.add(&mut form, today()).await.unwrap_err();

    assert_matches!(err, ClientError::Validation(_));
    assert!(dashboard.error_message.as_deref().unwrap().contains("maximum 8"));
    assert_eq!(form.selected_slots.len(), 9);
}

#[tokio::test]
async fn test_add_posts_and_refreshes_search() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server, json!([])).await;
    Mock::given(method("POST"))
        .and(path(BASE))
        .and(body_json(json!({
            "doctorID": 3,
            "date": "2025-09-20",
            "timeSlots": ["9:00 AM - 10:00 AM", "10:00 AM - 11:00 AM"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::availability_response(
            3,
            "2025-09-20",
            &["9:00 AM - 10:00 AM", "10:00 AM - 11:00 AM"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    let mut form = AvailabilityForm {
        doctor_id: Some(3),
        date: Some(date(2025, 9, 20)),
        selected_slots: vec!["9:00 AM - 10:00 AM".to_string(), "10:00 AM - 11:00 AM".to_string()],
    };

    dashboard.add(&mut form, today()).await.unwrap();

    assert_eq!(dashboard.success_message.as_deref(), Some("Availability added successfully!"));
    assert_eq!(form, AvailabilityForm::default());

    let searches = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(searches, 2);
}

#[tokio::test]
async fn test_update_failure_after_delete_leaves_old_record_gone() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"])]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/3/2025-09-16", BASE)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(BASE))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    let original = dashboard.availabilities[0].clone();
    let mut form = dashboard.begin_update(&original);
    form.date = Some(date(2025, 9, 18));
    form.toggle_slot("4:00 PM - 5:00 PM");

    let err = dashboard.update(&form, today()).await.unwrap_err();

    assert_eq!(err, ClientError::Server("Database unavailable".to_string()));
    assert_eq!(dashboard.error_message.as_deref(), Some("Error updating availability"));
    assert!(dashboard.availabilities.is_empty());
    assert!(dashboard.editing.is_some());
}

#[tokio::test]
async fn test_update_delete_failure_keeps_record() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"])]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    let original = dashboard.availabilities[0].clone();
    let form = dashboard.begin_update(&original);

    let err = dashboard.update(&form, today()).await.unwrap_err();

    assert_matches!(err, ClientError::NotFound(_));
    assert_eq!(dashboard.availabilities.len(), 1);
}

#[tokio::test]
async fn test_update_replaces_record() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"])]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/3/2025-09-16", BASE)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(BASE))
        .and(body_json(json!({
            "doctorID": 3,
            "date": "2025-09-16",
            "timeSlots": ["9:00 AM - 10:00 AM", "1:00 PM - 2:00 PM"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::availability_response(
            3,
            "2025-09-16",
            &["9:00 AM - 10:00 AM", "1:00 PM - 2:00 PM"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    let original = dashboard.availabilities[0].clone();
    let mut form = dashboard.begin_update(&original);
    form.toggle_slot("1:00 PM - 2:00 PM");

    dashboard.update(&form, today()).await.unwrap();

    assert_eq!(dashboard.success_message.as_deref(), Some("Availability updated successfully!"));
    assert!(dashboard.editing.is_none());
}

#[tokio::test]
async fn test_cancel_update_blocks_later_update() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"])]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    let original = dashboard.availabilities[0].clone();
    let form = dashboard.begin_update(&original);
    assert!(dashboard.editing.is_some());

    dashboard.cancel_update();
    assert!(dashboard.editing.is_none());

    let err = dashboard.update(&form, today()).await.unwrap_err();
    assert_matches!(err, ClientError::Validation(_));
    assert_eq!(dashboard.error_message.as_deref(), Some("Select an availability to update"));
    assert_eq!(dashboard.availabilities.len(), 1);
}

#[tokio::test]
async fn test_delete_removes_local_entry() {
    let mock_server = MockServer::start().await;
    mount_search(
        &mock_server,
        json!([
            MockBackendResponses::availability_response(3, "2025-09-16", &["9:00 AM - 10:00 AM"]),
            MockBackendResponses::availability_response(3, "2025-09-17", &["9:00 AM - 10:00 AM"]),
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/3/2025-09-17", BASE)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut dashboard = searched_dashboard(&mock_server).await;
    dashboard.delete(3, date(2025, 9, 17)).await.unwrap();

    assert_eq!(dashboard.availabilities.len(), 1);
    assert_eq!(dashboard.availabilities[0].date, date(2025, 9, 16));
    assert_eq!(dashboard.success_message.as_deref(), Some("Availability deleted successfully"));
}

#[tokio::test]
async fn test_slot_check_and_phone_lookup() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/check", BASE)))
        .and(query_param("doctorID", "3"))
        .and(query_param("date", "2025-09-16"))
        .and(query_param("timeSlot", "9:00 AM - 10:00 AM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/get-doctor-id/by-phone/9123456780", BASE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(3)))
        .mount(&mock_server)
        .await;

    let dashboard = create_dashboard(&mock_server);
    let service = dashboard.service();

    assert!(service.check(3, date(2025, 9, 16), "9:00 AM - 10:00 AM").await.unwrap());
    assert_eq!(service.doctor_id_by_phone("9123456780").await.unwrap(), 3);
}

#[tokio::test]
async fn test_server_side_update_and_single_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/3/2025-09-16", BASE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::availability_response(
            3,
            "2025-09-16",
            &["11:00 AM - 12:00 PM"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/3/2025-09-16", BASE)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dashboard = create_dashboard(&mock_server);
    let service = dashboard.service();
    let replacement = doctor_cell::Availability::new(3, date(2025, 9, 16), vec!["11:00 AM - 12:00 PM".to_string()]);

    let updated = service.update(3, date(2025, 9, 16), &replacement).await.unwrap();
    assert_eq!(updated.time_slots, replacement.time_slots);

    let err = service.get_one(3, date(2025, 9, 16)).await.unwrap_err();
    assert_matches!(err, ClientError::NotFound(_));
}
