//! Tests for the history handlers.

use super::*;
use crate::domain::ports::IntentClassifierError;
use crate::inbound::http::auth::{SignupRequest, signup};
use crate::inbound::http::test_utils::{StubClassifier, test_session_middleware, test_state};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = test_state(Arc::new(StubClassifier::failing(
        IntentClassifierError::not_configured(),
    )));
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/auth").service(signup))
        .service(
            web::scope("/api/user")
                .service(push_history)
                .service(clear_history)
                .service(get_history),
        )
}

/// Sign up `email` and return its session cookie and user id.
async fn sign_up<S>(app: &S, email: &str) -> (Cookie<'static>, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(SignupRequest {
                name: Some("Ada".to_owned()),
                email: Some(email.to_owned()),
                password: Some("secret1".to_owned()),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie");
    let body: Value = test::read_body_json(res).await;
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .expect("user id")
        .to_owned();
    (cookie, id)
}

async fn push<S>(app: &S, cookie: &Cookie<'static>, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/user/history")
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await
}

async fn read<S>(app: &S, cookie: &Cookie<'static>, id: &str) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/user/history/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await
}

#[rstest]
#[actix_web::test]
async fn push_then_read_returns_latest_first() {
    let app = test::init_service(app()).await;
    let (cookie, id) = sign_up(&app, "ada@example.com").await;

    for command in ["turn on lights", "play jazz"] {
        let res = push(&app, &cookie, json!({"userId": id, "command": command})).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: SuccessResponse = test::read_body_json(res).await;
        assert!(body.success);
    }

    let res = read(&app, &cookie, &id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: HistoryResponse = test::read_body_json(res).await;
    assert_eq!(body.history, vec!["play jazz", "turn on lights"]);
}

#[rstest]
#[actix_web::test]
async fn clear_empties_the_history() {
    let app = test::init_service(app()).await;
    let (cookie, id) = sign_up(&app, "ada@example.com").await;
    let res = push(&app, &cookie, json!({"userId": id, "command": "turn on lights"})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/user/history/clear")
            .cookie(cookie.clone())
            .set_json(json!({"userId": id}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: HistoryResponse = test::read_body_json(read(&app, &cookie, &id).await).await;
    assert!(body.history.is_empty());
}

#[rstest]
#[actix_web::test]
async fn pushed_commands_are_stored_verbatim() {
    let app = test::init_service(app()).await;
    let (cookie, id) = sign_up(&app, "ada@example.com").await;
    let res = push(&app, &cookie, json!({"userId": id, "command": "  Play Jazz "})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: HistoryResponse = test::read_body_json(read(&app, &cookie, &id).await).await;
    assert_eq!(body.history, vec!["  Play Jazz "]);
}

const OWN_ID: &str = "<own>";

#[rstest]
#[case(None, Some("turn on lights"))]
#[case(Some("not-a-uuid"), Some("turn on lights"))]
#[case(Some(OWN_ID), None)]
#[case(Some(OWN_ID), Some("   "))]
#[actix_web::test]
async fn push_rejects_missing_or_malformed_fields(
    #[case] user_id: Option<&str>,
    #[case] command: Option<&str>,
) {
    let app = test::init_service(app()).await;
    let (cookie, id) = sign_up(&app, "ada@example.com").await;
    let user_id = user_id.map(|raw| if raw == OWN_ID { id.as_str() } else { raw });

    let res = push(&app, &cookie, json!({"userId": user_id, "command": command})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn requests_without_a_session_are_unauthorised() {
    let app = test::init_service(app()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/user/history/7d7c61c3-1d4e-4c52-9f55-7d1a3f0f4c1e")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn another_users_history_is_forbidden() {
    let app = test::init_service(app()).await;
    let (cookie, _) = sign_up(&app, "ada@example.com").await;
    let (_, other) = sign_up(&app, "grace@example.com").await;

    let res = read(&app, &cookie, &other).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = push(&app, &cookie, json!({"userId": other, "command": "x"})).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
