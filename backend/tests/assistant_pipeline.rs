//! End-to-end tests for the ask pipeline and the public proxy.
//!
//! Requests go through the production routing table; only the delegate,
//! media store and password hasher are stubbed.

#[allow(dead_code, reason = "shared helpers are not used by every suite")]
mod support;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use assistant_backend::domain::assistant::NO_ANSWER;
use support::{Harness, session_cookie};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

macro_rules! call {
    ($app:expr, $req:expr) => {
        test::call_service(&$app, $req.to_request()).await
    };
}

macro_rules! sign_up {
    ($app:expr) => {{
        let res = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"}))
        );
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = session_cookie(&res).expect("session cookie");
        let body: Value = test::read_body_json(res).await;
        let id = body["id"].as_str().expect("user id").to_owned();
        (cookie, id)
    }};
}

fn ask(cookie: &Cookie<'static>, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/user/ask")
        .cookie(cookie.clone())
        .set_json(body)
}

#[rstest]
#[actix_web::test]
async fn youtube_search_reply_builds_a_search_url(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let (cookie, id) = sign_up!(app);
    harness.classifier.push_reply(
        r#"{"type":"youtube_search","userInput":"search for lofi beats","response":"Playing lofi beats"}"#,
    );

    let res = call!(app, ask(&cookie, json!({"command": "search for lofi beats"})));
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["type"], json!("youtube_search"));
    assert_eq!(body["response"], json!("Playing lofi beats"));
    assert_eq!(
        body["url"],
        json!("https://www.youtube.com/results?search_query=lofi%20beats")
    );

    let res = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/user/history/{id}"))
            .cookie(cookie)
    );
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["history"], json!(["search for lofi beats"]));
}

#[rstest]
#[actix_web::test]
async fn malformed_delegate_text_is_spoken_verbatim(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let (cookie, _) = sign_up!(app);
    harness
        .classifier
        .push_reply("Sure! here's your answer: the sky is blue");

    let res = call!(app, ask(&cookie, json!({"prompt": "why is the sky blue"})));
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["type"], json!("general"));
    assert_eq!(
        body["response"],
        json!("Sure! here's your answer: the sky is blue")
    );
    assert!(body.get("url").is_none());
}

#[rstest]
#[actix_web::test]
async fn delegate_outage_degrades_to_no_answer(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let (cookie, _) = sign_up!(app);

    let res = call!(app, ask(&cookie, json!({"command": "what is love"})));
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["type"], json!("general"));
    assert_eq!(body["response"], json!(NO_ANSWER));
}

#[rstest]
#[actix_web::test]
async fn transcripts_need_the_wake_word(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let (cookie, id) = sign_up!(app);
    harness
        .classifier
        .push_reply(r#"{"type":"open_instagram","userInput":"open instagram","response":"Opening"}"#);

    let res = call!(app, ask(&cookie, json!({"transcript": "open instagram please"})));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["dispatched"], json!(false));
    assert!(harness.classifier.prompts().is_empty());

    let res = call!(
        app,
        ask(&cookie, json!({"transcript": "Assistant, open instagram"}))
    );
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["dispatched"], json!(true));
    assert_eq!(body["url"], json!("https://www.instagram.com"));

    let res = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/user/history/{id}"))
            .cookie(cookie)
    );
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["history"], json!(["open instagram"]));
}

#[rstest]
#[actix_web::test]
async fn clock_intents_are_answered_locally(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let (cookie, _) = sign_up!(app);
    for _ in 0..2 {
        harness
            .classifier
            .push_reply(r#"{"type":"get_year","userInput":"what year is it","response":"1999"}"#);
    }

    let first: Value =
        test::read_body_json(call!(app, ask(&cookie, json!({"command": "what year is it"})))).await;
    let second: Value =
        test::read_body_json(call!(app, ask(&cookie, json!({"command": "what year is it"})))).await;
    assert_ne!(first["response"], json!("1999"));
    assert_eq!(first["response"], second["response"]);
}

#[rstest]
#[actix_web::test]
async fn ask_requires_a_session_and_a_command(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    let res = call!(
        app,
        test::TestRequest::post()
            .uri("/api/user/ask")
            .set_json(json!({"command": "hi"}))
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));

    let (cookie, _) = sign_up!(app);
    let res = call!(app, ask(&cookie, json!({})));
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], json!("No command provided"));
}

#[rstest]
#[actix_web::test]
async fn proxy_runs_without_a_session_or_history(harness: Harness) {
    let app = test::init_service(harness.app()).await;
    harness
        .classifier
        .push_reply("```json\n{\"type\":\"google_search\",\"userInput\":\"search for rust\",\"response\":\"Searching\"}\n```");

    let res = call!(
        app,
        test::TestRequest::get().uri("/?prompt=search%20for%20rust&userName=Grace&assistantName=Friday")
    );
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["url"], json!("https://www.google.com/search?q=rust"));
    let prompts = harness.classifier.prompts();
    assert!(prompts.first().expect("prompt").contains("Friday"));
}
