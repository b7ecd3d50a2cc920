/// Dashboard tests: session cookie lifecycle, flash messages, and the
/// resident form handlers.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    body_text, cookie_pair, form_request, location, page_request, TestContext, ADMIN_PASSWORD,
    ADMIN_USERNAME,
};

/// Follows a redirect that set a flash cookie and returns the rendered page
async fn follow_flash(
    ctx: &TestContext,
    response: axum::http::Response<axum::body::Body>,
    session: Option<&str>,
) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    let flash = cookie_pair(&response, "residence.flash").expect("redirect carries a flash");

    let cookies = match session {
        Some(session) => format!("{}; {}", session, flash),
        None => flash,
    };
    let page = ctx.send(page_request(&target, Some(&cookies))).await;
    assert_eq!(page.status(), StatusCode::OK);
    body_text(page).await
}

fn resident_form(name: &str, apartment: &str, floor: &str, yob: &str) -> String {
    format!(
        "residentName={}&residentDescription=Corner+unit&floor={}&yOB={}&apartment={}&isOwned=on",
        name, floor, yob, apartment
    )
}

#[tokio::test]
async fn test_root_redirects_to_signin() {
    let ctx = TestContext::new().await;

    let response = ctx.send(page_request("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin");
}

#[tokio::test]
async fn test_unauthenticated_dashboard_redirects_with_message() {
    let ctx = TestContext::new().await;

    let response = ctx.send(page_request("/view/residents", None)).await;
    assert_eq!(location(&response), "/signin");

    let page = follow_flash(&ctx, response, None).await;
    assert!(page.contains("Please log in to continue"));
}

#[tokio::test]
async fn test_login_session_grants_dashboard_access() {
    let ctx = TestContext::new().await;
    let session = ctx.session_cookie().await;

    let response = ctx.send(page_request("/view/residents", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Residents list"));
    assert!(page.contains(ADMIN_USERNAME));

    let response = ctx.send(page_request("/signin", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/view/residents");
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &format!("us={}&pw={}", ADMIN_USERNAME, ADMIN_PASSWORD),
        ))
        .await;
    let set_cookie = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("residence.sid="))
        .unwrap()
        .to_string();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=3600"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_wrong_password_flashes_error() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(form_request(
            "/login",
            None,
            &format!("username={}&password=wrong", ADMIN_USERNAME),
        ))
        .await;
    assert_eq!(location(&response), "/signin");
    assert!(cookie_pair(&response, "residence.sid").is_none());

    let page = follow_flash(&ctx, response, None).await;
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let ctx = TestContext::new().await;
    let session = ctx.session_cookie().await;

    let response = ctx.send(page_request("/logout", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin");

    // The browser may still replay the old cookie
    let response = ctx.send(page_request("/view/residents", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let ctx = TestContext::new().await;
    let account = ctx.state.auth.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let token = ctx
        .state
        .auth
        .clone()
        .with_session_ttl(Duration::seconds(-1))
        .open_session(&account)
        .await
        .unwrap();

    let response = ctx
        .send(page_request("/view/residents", Some(&format!("residence.sid={}", token))))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin");
}

#[tokio::test]
async fn test_add_resident_through_form() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;
    let session = ctx.session_cookie().await;

    let response = ctx.send(page_request("/residents/add", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Tower A"));

    let response = ctx
        .send(form_request(
            "/residents/add",
            Some(&session),
            &resident_form("John+Smith", &apartment, "5", "1985"),
        ))
        .await;
    assert_eq!(location(&response), "/view/residents");

    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("Resident added successfully"));
    assert!(page.contains("John Smith"));

    let residents = ctx.state.residents.list().await.unwrap();
    assert_eq!(residents.len(), 1);
    assert!(residents[0].is_owned);
    assert_eq!(residents[0].floor, 5);
}

#[tokio::test]
async fn test_dashboard_rejects_birth_year_2026() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;
    let session = ctx.session_cookie().await;

    let response = ctx
        .send(form_request(
            "/residents/add",
            Some(&session),
            &resident_form("John", &apartment, "5", "2026"),
        ))
        .await;
    assert_eq!(location(&response), "/residents/add");

    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("Year of Birth must be a number between 1940 and 2025"));
    assert!(ctx.state.residents.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_field_redirects_back_to_form() {
    let ctx = TestContext::new().await;
    let session = ctx.session_cookie().await;

    let response = ctx
        .send(form_request(
            "/residents/add",
            Some(&session),
            "residentName=John&residentDescription=x&yOB=1985&apartment=abc",
        ))
        .await;
    assert_eq!(location(&response), "/residents/add");

    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("Floor is required"));
}

#[tokio::test]
async fn test_edit_and_delete_resident_through_forms() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let apartment = ctx.create_apartment(&token, "Tower A").await;
    let session = ctx.session_cookie().await;

    ctx.send(form_request(
        "/residents/add",
        Some(&session),
        &resident_form("John", &apartment, "5", "1985"),
    ))
    .await;
    let id = ctx.state.residents.list().await.unwrap()[0].id;

    let response = ctx
        .send(page_request(&format!("/residents/{}", id), Some(&session)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Edit Resident"));

    // Unchecked box: isOwned is absent from the post
    let response = ctx
        .send(form_request(
            &format!("/residents/{}", id),
            Some(&session),
            &format!(
                "residentName=John&residentDescription=Top+floor&floor=40&yOB=1985&apartment={}",
                apartment
            ),
        ))
        .await;
    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("Resident updated successfully"));

    let updated = ctx.state.residents.get(id).await.unwrap();
    assert_eq!(updated.floor, 40);
    assert!(!updated.is_owned);
    assert_eq!(updated.resident_description, "Top floor");

    let response = ctx
        .send(form_request(&format!("/residents/delete/{}", id), Some(&session), ""))
        .await;
    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("resident deleted successfully"));

    let response = ctx
        .send(form_request(&format!("/residents/delete/{}", id), Some(&session), ""))
        .await;
    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("resident not found"));
}

#[tokio::test]
async fn test_edit_unknown_resident_redirects() {
    let ctx = TestContext::new().await;
    let session = ctx.session_cookie().await;

    let response = ctx
        .send(page_request(
            &format!("/residents/{}", uuid::Uuid::new_v4()),
            Some(&session),
        ))
        .await;
    assert_eq!(location(&response), "/view/residents");

    let page = follow_flash(&ctx, response, Some(&session)).await;
    assert!(page.contains("Resident not found"));
}
