use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::router::create_patient_router;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn create_test_app(store_url: &str) -> Router {
    create_patient_router(Arc::new(
        TestConfig::with_store_url(store_url).to_app_config(),
    ))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_register_patient_success() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("phone", "eq.01711111111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::patient_doc(&patient_id, "01711111111")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = json_request(
        "POST",
        "/",
        json!({
            "name": "Ayesha Rahman",
            "phone": "01711111111",
            "age": 30,
            "gender": "female",
            "address": "12 Lake Road"
        }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json_response = response_json(response).await;
    assert_eq!(json_response["phone"], "01711111111");
    assert!(json_response["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_patient_rejects_short_phone() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = json_request(
        "POST",
        "/",
        json!({ "name": "Ayesha Rahman", "phone": "0171234567" }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Phone number must be 11 digits");
}

#[tokio::test]
async fn test_register_patient_rejects_non_digit_phone() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = json_request(
        "POST",
        "/",
        json!({ "name": "Ayesha Rahman", "phone": "01712-45678" }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Phone number must be 11 digits");
}

#[tokio::test]
async fn test_register_patient_rejects_duplicate_phone() {
    let mock_server = MockServer::start().await;
    let existing_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("phone", "eq.01711111111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_doc(&existing_id, "01711111111")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = json_request(
        "POST",
        "/",
        json!({ "name": "Ayesha Rahman", "phone": "01711111111" }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = response_json(response).await;
    assert_eq!(
        json_response["message"],
        "Patient with this contact already exists."
    );
}

#[tokio::test]
async fn test_register_patient_requires_name() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let request = json_request("POST", "/", json!({ "phone": "01711111111" }));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Name is required");
}

#[tokio::test]
async fn test_get_patient_by_phone() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("phone", "eq.01722222222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_doc(&patient_id, "01722222222")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = Request::builder()
        .method("GET")
        .uri("/phone/01722222222")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = response_json(response).await;
    assert_eq!(json_response["phone"], "01722222222");
    assert_eq!(json_response["id"], patient_id.as_str());
}

#[tokio::test]
async fn test_get_patient_by_phone_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = Request::builder()
        .method("GET")
        .uri("/phone/01799999999")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Patient not found");
}

#[tokio::test]
async fn test_list_patients() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("order", "createdAt.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_doc(&Uuid::new_v4().to_string(), "01711111111"),
            MockStoreResponses::patient_doc(&Uuid::new_v4().to_string(), "01722222222"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = response_json(response).await;
    assert_eq!(json_response.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_patient() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_doc(&patient_id, "01711111111")
        ])))
        .mount(&mock_server)
        .await;

    let mut updated = MockStoreResponses::patient_doc(&patient_id, "01711111111");
    updated["name"] = json!("Ayesha R. Khan");
    updated["age"] = json!(31);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = json_request(
        "PUT",
        &format!("/{}", patient_id),
        json!({ "name": "Ayesha R. Khan", "age": 31 }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = response_json(response).await;
    assert_eq!(json_response["name"], "Ayesha R. Khan");
    assert_eq!(json_response["age"], 31);
}

#[tokio::test]
async fn test_update_patient_rejects_invalid_phone() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_doc(&patient_id, "01711111111")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = json_request("PUT", &format!("/{}", patient_id), json!({ "phone": "123" }));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Phone number must be 11 digits");
}

#[tokio::test]
async fn test_update_patient_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());
    let request = json_request(
        "PUT",
        &format!("/{}", Uuid::new_v4()),
        json!({ "name": "Nobody" }),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json_response = response_json(response).await;
    assert_eq!(json_response["message"], "Patient not found");
}
