//! Account endpoints.
//!
//! ```text
//! POST /api/auth/signup {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/auth/signin {"email":"ada@example.com","password":"secret1"}
//! POST /api/auth/logout
//! GET  /api/auth/check-email?email=ada@example.com
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{LoginCredentials, SignupDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::auth_validation_error;

/// Body of `POST /api/auth/signup`. Fields are optional on the wire so
/// missing ones produce field-level errors instead of a parse failure.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /api/auth/signin`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CheckEmailQuery {
    pub email: Option<String>,
}

/// Reply of `GET /api/auth/check-email`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmailExistsResponse {
    pub exists: bool,
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing field, short password or taken email", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let details =
        SignupDetails::try_from_parts(name.as_deref(), email.as_deref(), password.as_deref())
            .map_err(|err| auth_validation_error(&err))?;
    let user = state.accounts.signup(details).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Unknown email or wrong password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signin",
    security([])
)]
#[post("/signin")]
pub async fn signin(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SigninRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let SigninRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(email.as_deref(), password.as_deref())
        .map_err(|err| auth_validation_error(&err))?;
    let user = state.accounts.signin(credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(id)) = session.user_id() {
        info!(user_id = %id, "user signed out");
    }
    session.purge();
    HttpResponse::Ok().json(json!({ "message": "Logged out successfully" }))
}

/// Whether an account already uses an email address (case-insensitive).
#[utoipa::path(
    get,
    path = "/api/auth/check-email",
    params(CheckEmailQuery),
    responses(
        (status = 200, description = "Lookup result", body = EmailExistsResponse),
        (status = 400, description = "Email is required", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "checkEmail",
    security([])
)]
#[get("/check-email")]
pub async fn check_email(
    state: web::Data<HttpState>,
    query: web::Query<CheckEmailQuery>,
) -> ApiResult<web::Json<EmailExistsResponse>> {
    let raw = query.into_inner().email.unwrap_or_default();
    let exists = state.accounts.email_exists(&raw).await?;
    Ok(web::Json(EmailExistsResponse { exists }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::IntentClassifierError;
    use crate::inbound::http::test_utils::{StubClassifier, test_session_middleware, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = test_state(Arc::new(StubClassifier::failing(
            IntentClassifierError::not_configured(),
        )));
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/auth")
                .wrap(test_session_middleware())
                .service(signup)
                .service(signin)
                .service(logout)
                .service(check_email),
        )
    }

    fn signup_body(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: Some("Ada".to_owned()),
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    async fn json_body(res: actix_web::dev::ServiceResponse) -> Value {
        serde_json::from_slice(&test::read_body(res).await).expect("json body")
    }

    #[rstest]
    #[actix_web::test]
    async fn signup_returns_profile_without_password_and_sets_cookie() {
        let app = test::init_service(app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
        let body = json_body(res).await;
        assert_eq!(body.get("email").and_then(Value::as_str), Some("ada@example.com"));
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body.get("history"), Some(&serde_json::json!([])));
    }

    #[rstest]
    #[case(SignupRequest { name: None, ..signup_body("ada@example.com", "secret1") }, "name is required")]
    #[case(signup_body("ada@example.com", "12345"), "Password must be at least 6 characters")]
    #[actix_web::test]
    async fn invalid_signups_are_rejected(#[case] body: SignupRequest, #[case] message: &str) {
        let app = test::init_service(app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(body)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body.get("message").and_then(Value::as_str), Some(message));
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_signup_and_bad_signin_are_bad_requests() {
        let app = test::init_service(app()).await;
        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let twin = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("ada@example.com", "secret2"))
                .to_request(),
        )
        .await;
        assert_eq!(twin.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(twin).await.get("message").and_then(Value::as_str),
            Some("Email already exists")
        );

        for (email, password, message) in [
            ("bob@example.com", "secret1", "Email does not exist"),
            ("ada@example.com", "wrong-pass", "Incorrect password"),
        ] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/auth/signin")
                    .set_json(SigninRequest {
                        email: Some(email.to_owned()),
                        password: Some(password.to_owned()),
                    })
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(res).await.get("message").and_then(Value::as_str),
                Some(message)
            );
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn check_email_is_case_insensitive_and_requires_input() {
        let app = test::init_service(app()).await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/check-email?email=%20ADA@Example.com%20")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, serde_json::json!({ "exists": true }));

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/auth/check-email").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_confirms() {
        let app = test::init_service(app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/auth/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await,
            serde_json::json!({ "message": "Logged out successfully" })
        );
    }
}
