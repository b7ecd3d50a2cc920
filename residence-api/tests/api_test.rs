/// JSON API tests: token login, bearer authentication, apartment and
/// resident CRUD with their validation and referential rules.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{body_json, empty_request, json_request, TestContext, ADMIN_PASSWORD, ADMIN_USERNAME};
use serde_json::json;

fn resident(name: &str, apartment: &str) -> serde_json::Value {
    json!({
        "residentName": name,
        "residentDescription": "Corner unit",
        "floor": 5,
        "yOB": 1985,
        "isOwned": true,
        "apartment": apartment,
    })
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": ADMIN_USERNAME, "secret": ADMIN_PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["token"].as_str().unwrap().split('.').count() == 3);
    assert_eq!(body["user"]["username"], ADMIN_USERNAME);
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_accepts_short_field_names() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({"us": ADMIN_USERNAME, "pw": ADMIN_PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let response = ctx
        .send(empty_request("GET", "/api/apartments", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_login_rejections() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": ADMIN_USERNAME, "secret": "wrong"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid username or password");

    let response = ctx
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": "nobody", "secret": ADMIN_PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .send(json_request("POST", "/api/login", None, json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.send(empty_request("GET", "/api/residents", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Access denied. No token provided."
    );
}

#[tokio::test]
async fn test_bad_and_expired_tokens_are_forbidden() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(empty_request("GET", "/api/apartments", Some("not-a-jwt")))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Invalid token");

    let account = ctx.state.auth.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let expired = ctx
        .state
        .auth
        .clone()
        .with_token_ttl(Duration::seconds(-60))
        .issue_token(&account)
        .unwrap();

    let response = ctx
        .send(empty_request("GET", "/api/apartments", Some(&expired)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Token has expired");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_forbidden() {
    let ctx = TestContext::new().await;
    let other = TestContext::with_env(&[("JWT_SECRET", "a-completely-different-secret-32-bytes")]).await;

    let foreign = other.token().await;
    let response = ctx
        .send(empty_request("GET", "/api/apartments", Some(&foreign)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_apartment_crud() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let id = ctx.create_apartment(&token, "Tower B").await;
    ctx.create_apartment(&token, "Tower A").await;

    let response = ctx.send(empty_request("GET", "/api/apartments", Some(&token))).await;
    let names: Vec<String> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["apartmentName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Tower A", "Tower B"]);

    let response = ctx
        .send(json_request(
            "PUT",
            &format!("/api/apartments/{}", id),
            Some(&token),
            json!({"apartmentName": "Tower C", "totalOfFloors": "12"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["apartmentName"], "Tower C");
    assert_eq!(body["totalOfFloors"], 12);

    let response = ctx
        .send(empty_request("DELETE", &format!("/api/apartments/{}", id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Apartment deleted successfully"
    );

    let response = ctx
        .send(empty_request("GET", &format!("/api/apartments/{}", id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_apartment_name_conflicts() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request(
            "POST",
            "/api/apartments",
            Some(&token),
            json!({"apartmentName": "Tower A"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "Apartment with this name already exists"
    );
}

#[tokio::test]
async fn test_apartment_validation() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let response = ctx
        .send(json_request("POST", "/api/apartments", Some(&token), json!({"apartmentName": "  "})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Apartment name is required");

    let response = ctx
        .send(json_request(
            "POST",
            "/api/apartments",
            Some(&token),
            json!({"apartmentName": "Tower A", "totalOfFloors": 0}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_ids_are_not_found() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let response = ctx
        .send(empty_request("GET", "/api/apartments/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .send(empty_request("DELETE", "/api/residents/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Resident not found");
}

#[tokio::test]
async fn test_resident_crud_populates_apartment() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("John", &apartment)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["residentName"], "John");
    assert_eq!(created["apartment"], apartment.as_str());
    let id = created["id"].as_str().unwrap().to_string();

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("Jane", &apartment)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx.send(empty_request("GET", "/api/residents", Some(&token))).await;
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["residentName"], "Jane");
    assert_eq!(list[1]["apartment"]["apartmentName"], "Tower A");

    let mut update = resident("John Smith", &apartment);
    update["floor"] = json!(40);
    update["isOwned"] = json!(false);
    let response = ctx
        .send(json_request("PUT", &format!("/api/residents/{}", id), Some(&token), update))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["residentName"], "John Smith");
    assert_eq!(updated["floor"], 40);
    assert_eq!(updated["isOwned"], false);

    let response = ctx
        .send(empty_request("GET", &format!("/api/residents/{}", id), Some(&token)))
        .await;
    assert_eq!(body_json(response).await["apartment"]["id"], apartment.as_str());

    let response = ctx
        .send(empty_request("DELETE", &format!("/api/residents/{}", id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Resident deleted successfully");
}

#[tokio::test]
async fn test_resident_validation_order_and_messages() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let cases = [
        (json!({"residentName": "John"}), "Floor is required"),
        (
            json!({"residentName": "John", "floor": 5, "yOB": 1985, "apartment": apartment}),
            "Resident description is required",
        ),
        (
            {
                let mut r = resident("John", &apartment);
                r.as_object_mut().unwrap().remove("floor");
                r
            },
            "Floor is required",
        ),
        (
            resident("John_Doe!", &apartment),
            "Resident name can only contain letters, numbers, spaces, and forward slashes",
        ),
        (
            {
                let mut r = resident("John", &apartment);
                r["floor"] = json!(0);
                r
            },
            "Floor must be a number between 1 and 40",
        ),
        (
            {
                let mut r = resident("John", &apartment);
                r["floor"] = json!(41);
                r
            },
            "Floor must be a number between 1 and 40",
        ),
        (
            {
                let mut r = resident("John", &apartment);
                r["yOB"] = json!(1939);
                r
            },
            "Year of Birth must be a number between 1940 and 2025",
        ),
        (
            {
                let mut r = resident("John", &apartment);
                r["yOB"] = json!(2026);
                r
            },
            "Year of Birth must be a number between 1940 and 2025",
        ),
    ];

    for (body, message) in cases {
        let response = ctx
            .send(json_request("POST", "/api/residents", Some(&token), body))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body_json(response).await["message"], message);
    }

    let response = ctx.send(empty_request("GET", "/api/residents", Some(&token))).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_resident_without_floor_reports_floor() {
    let ctx = TestContext::new().await;
    let response = ctx
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({"us": ADMIN_USERNAME, "pw": ADMIN_PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request(
            "POST",
            "/api/residents",
            Some(&token),
            json!({"residentName": "A/1", "yOB": 1990, "apartment": apartment}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Floor is required");
    assert_eq!(body["details"][0]["field"], "floor");
}

#[tokio::test]
async fn test_resident_boundaries_accepted() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let mut low = resident("Unit 1/A", &apartment);
    low["floor"] = json!(1);
    low["yOB"] = json!(1940);
    let response = ctx.send(json_request("POST", "/api/residents", Some(&token), low)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut high = resident("Unit 40", &apartment);
    high["floor"] = json!("40");
    high["yOB"] = json!("2025");
    let response = ctx.send(json_request("POST", "/api/residents", Some(&token), high)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_resident_name_conflict_and_unknown_apartment() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("John", &apartment)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("John", &apartment)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "Resident with this name already exists"
    );

    let unknown = uuid::Uuid::new_v4().to_string();
    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("Jane", &unknown)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["message"], "Invalid apartment");
}

#[tokio::test]
async fn test_resident_update_keeps_own_name() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("John", &apartment)))
        .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let mut update = resident("John", &apartment);
    update["residentDescription"] = json!("Moved to the penthouse");
    let response = ctx
        .send(json_request("PUT", &format!("/api/residents/{}", id), Some(&token), update))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["residentDescription"],
        "Moved to the penthouse"
    );
}

#[tokio::test]
async fn test_apartment_with_residents_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;

    let response = ctx
        .send(json_request("POST", "/api/residents", Some(&token), resident("John", &apartment)))
        .await;
    let resident_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = ctx
        .send(empty_request("DELETE", &format!("/api/apartments/{}", apartment), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "Cannot delete apartment with existing residents"
    );

    let response = ctx
        .send(empty_request("GET", &format!("/api/apartments/{}", apartment), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send(empty_request("DELETE", &format!("/api/residents/{}", resident_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send(empty_request("DELETE", &format!("/api/apartments/{}", apartment), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let ctx = TestContext::new().await;

    let response = ctx.send(empty_request("GET", "/nowhere", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = common::body_text(response).await;
    assert!(page.contains("404 Not Found"));
    assert!(page.contains("The page you are looking for does not exist"));
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let ctx = TestContext::new().await;

    let response = ctx.send(empty_request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().get("strict-transport-security").is_none());

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
