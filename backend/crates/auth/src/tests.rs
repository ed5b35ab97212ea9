//! Use case and middleware tests against the in-memory repository

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::{Duration, Utc};
use platform::password::Pbkdf2Hasher;

use crate::application::config::AuthConfig;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::testing::InMemoryAuthRepository;

const PASSWORD: &str = "correct-horse-battery";

fn config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig {
        session_ttl: Duration::seconds(3600),
        session_refresh_after: Duration::seconds(600),
        password_hasher: Pbkdf2Hasher::default(),
        ..AuthConfig::development()
    })
}

fn seed_user(repo: &InMemoryAuthRepository, email: &str, role: UserRole) -> User {
    let raw = RawPassword::new(PASSWORD.to_string()).unwrap();
    let user = User::new(
        Email::new(email).unwrap(),
        PersonName::new("Test").unwrap(),
        PersonName::new("User").unwrap(),
        None,
        UserPassword::from_raw(&raw, &Pbkdf2Hasher::default()),
        role,
    );
    repo.insert_user(user.clone());
    user
}

/// Session created `age` ago
fn seed_session(repo: &InMemoryAuthRepository, user: &User, age: Duration) -> AuthSession {
    let session = AuthSession::new(user.user_id, Utc::now() - age, Duration::seconds(3600));
    repo.insert_session(session.clone());
    session
}

mod session_store_tests {
    use super::*;
    use crate::application::SessionStore;

    #[tokio::test]
    async fn test_create_exclusive_revokes_earlier_sessions() {
        let repo = InMemoryAuthRepository::new();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let first = seed_session(&repo, &user, Duration::zero());
        let store = SessionStore::new(Arc::new(repo.clone()), config());

        let second = store.create_exclusive(user.user_id).await.unwrap();

        assert!(!repo.contains_session(first.session_id));
        assert_eq!(repo.sessions_for(user.user_id), vec![second]);
    }

    #[tokio::test]
    async fn test_create_keeps_existing_sessions() {
        let repo = InMemoryAuthRepository::new();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        seed_session(&repo, &user, Duration::zero());
        let store = SessionStore::new(Arc::new(repo.clone()), config());

        let created = store.create(user.user_id).await.unwrap();

        assert!(created.expiration_at > created.created_at);
        assert_eq!(repo.sessions_for(user.user_id).len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_is_single_winner() {
        let repo = InMemoryAuthRepository::new();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let old = seed_session(&repo, &user, Duration::seconds(900));
        let store = SessionStore::new(Arc::new(repo.clone()), config());

        let first = store.refresh(&old).await.unwrap();
        let second = store.refresh(&old).await.unwrap();

        let first = first.expect("first refresh rotates");
        assert!(second.is_none());
        assert!(!repo.contains_session(old.session_id));
        assert_eq!(repo.sessions_for(user.user_id), vec![first]);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let repo = InMemoryAuthRepository::new();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let expired = seed_session(&repo, &user, Duration::seconds(7200));
        let live = seed_session(&repo, &user, Duration::seconds(10));
        let store = SessionStore::new(Arc::new(repo.clone()), config());

        assert_eq!(store.sweep_expired().await.unwrap(), 1);
        assert!(!repo.contains_session(expired.session_id));
        assert!(repo.contains_session(live.session_id));
    }

    #[tokio::test]
    async fn test_delete_for_user() {
        let repo = InMemoryAuthRepository::new();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        seed_session(&repo, &user, Duration::zero());
        seed_session(&repo, &user, Duration::zero());
        let store = SessionStore::new(Arc::new(repo.clone()), config());

        assert_eq!(store.delete_for_user(user.user_id).await.unwrap(), 2);
        assert_eq!(repo.session_count(), 0);
    }
}

mod use_case_tests {
    use super::*;
    use crate::application::{
        CheckSessionUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
        SignUpUseCase,
    };
    use crate::application::session_token;
    use crate::error::AuthError;

    fn sign_up_input(email: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            middle_name: None,
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_worker_with_session() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let use_case = SignUpUseCase::new(Arc::new(repo.clone()), config.clone());

        let output = use_case.execute(sign_up_input("Ivan@Example.com")).await.unwrap();

        assert_eq!(output.user.user_role, UserRole::Worker);
        assert_eq!(output.user.email.as_str(), "ivan@example.com");
        assert_eq!(
            session_token::decode(&config.session_secret, &output.session_token),
            Some(output.session.session_id)
        );
        assert!(repo.contains_session(output.session.session_id));
    }

    #[tokio::test]
    async fn test_sign_up_twice_is_conflict() {
        let repo = InMemoryAuthRepository::new();
        let use_case = SignUpUseCase::new(Arc::new(repo.clone()), config());

        use_case.execute(sign_up_input("dup@example.com")).await.unwrap();
        let err = use_case
            .execute(sign_up_input("DUP@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_reports_every_bad_field() {
        let repo = InMemoryAuthRepository::new();
        let use_case = SignUpUseCase::new(Arc::new(repo.clone()), config());

        let err = use_case
            .execute(SignUpInput {
                email: "not-an-email".to_string(),
                password: "short".to_string(),
                first_name: " ".to_string(),
                last_name: "Petrov".to_string(),
                middle_name: None,
            })
            .await
            .unwrap_err();

        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password", "first_name"]);
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_and_unknown_email_look_alike() {
        let repo = InMemoryAuthRepository::new();
        seed_user(&repo, "a@example.com", UserRole::Worker);
        let use_case = SignInUseCase::new(Arc::new(repo.clone()), config());

        let wrong = use_case
            .execute(SignInInput {
                email: "a@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = use_case
            .execute(SignInInput {
                email: "nobody@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_invalidates_prior_session() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let sign_up = SignUpUseCase::new(Arc::new(repo.clone()), config.clone());
        let registered = sign_up.execute(sign_up_input("a@example.com")).await.unwrap();

        let sign_in = SignInUseCase::new(Arc::new(repo.clone()), config.clone());
        let logged_in = sign_in
            .execute(SignInInput {
                email: "A@example.com ".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        assert_ne!(registered.session.session_id, logged_in.session.session_id);
        assert!(!repo.contains_session(registered.session.session_id));

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        let err = check
            .execute(Some(&registered.session_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
        assert!(check.execute(Some(&logged_in.session_token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_session_missing_and_forged() {
        let repo = InMemoryAuthRepository::new();
        let check = CheckSessionUseCase::new(Arc::new(repo), config());

        assert!(matches!(
            check.execute(None).await.unwrap_err(),
            AuthError::SessionMissing
        ));
        assert!(matches!(
            check.execute(Some("garbage")).await.unwrap_err(),
            AuthError::SessionInvalid
        ));
    }

    #[tokio::test]
    async fn test_check_session_expired_is_deleted() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::seconds(3600));
        let token = session_token::encode(&config.session_secret, session.session_id);

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        let err = check.execute(Some(&token)).await.unwrap_err();

        assert!(matches!(err, AuthError::SessionExpired));
        assert!(!repo.contains_session(session.session_id));
    }

    #[tokio::test]
    async fn test_check_session_fresh_is_not_rotated() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::seconds(60));
        let token = session_token::encode(&config.session_secret, session.session_id);

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        let context = check.execute(Some(&token)).await.unwrap();

        assert!(context.new_session.is_none());
        assert_eq!(context.session, session);
        assert_eq!(context.user.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_check_session_past_threshold_rotates() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::seconds(900));
        let token = session_token::encode(&config.session_secret, session.session_id);

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        let context = check.execute(Some(&token)).await.unwrap();

        let new_session = context.new_session.expect("session rotated");
        assert_ne!(new_session.session_id, session.session_id);
        assert!(!repo.contains_session(session.session_id));
        assert!(repo.contains_session(new_session.session_id));

        // The old token is dead, the new one works
        assert!(check.execute(Some(&token)).await.is_err());
        let new_token = check.token_for(&new_session);
        let again = check.execute(Some(&new_token)).await.unwrap();
        assert!(again.new_session.is_none());
    }

    #[tokio::test]
    async fn test_check_session_without_user_is_invalid() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::zero());
        let token = session_token::encode(&config.session_secret, session.session_id);
        repo.remove_user(user.user_id);

        let check = CheckSessionUseCase::new(Arc::new(repo), config);
        assert!(matches!(
            check.execute(Some(&token)).await.unwrap_err(),
            AuthError::SessionInvalid
        ));
    }

    #[tokio::test]
    async fn test_sign_out() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "a@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::zero());
        let token = session_token::encode(&config.session_secret, session.session_id);
        let sign_out = SignOutUseCase::new(Arc::new(repo.clone()), config);

        assert!(matches!(
            sign_out.execute(None).await.unwrap_err(),
            AuthError::SessionMissing
        ));
        sign_out.execute(Some(&token)).await.unwrap();
        assert!(!repo.contains_session(session.session_id));
        // Second sign out with the same token is harmless
        sign_out.execute(Some(&token)).await.unwrap();
    }
}

mod http_tests {
    use super::*;
    use crate::application::{AuthContext, session_token};
    use crate::presentation::middleware::require_auth_session;
    use crate::presentation::router::{auth_middleware_state, auth_router_generic};
    use axum::Extension;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app(repo: &InMemoryAuthRepository, config: Arc<AuthConfig>) -> Router {
        let repo = Arc::new(repo.clone());
        Router::new()
            .route(
                "/things",
                get(|| async { "listed" }).post(|Extension(ctx): Extension<AuthContext>| async move {
                    ctx.user.email.to_string()
                }),
            )
            .nest("/auth", auth_router_generic(repo.clone(), config.clone()))
            .layer(axum::middleware::from_fn_with_state(
                auth_middleware_state(repo, config),
                require_auth_session::<InMemoryAuthRepository>,
            ))
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("X-Session-ID={token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn set_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// Token value of a `X-Session-ID=<token>; ...` header
    fn cookie_token(set_cookie: &str) -> String {
        let (_, rest) = set_cookie.split_once('=').unwrap();
        rest.split(';').next().unwrap().to_string()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn token_for(config: &AuthConfig, session: &AuthSession) -> String {
        session_token::encode(&config.session_secret, session.session_id)
    }

    #[tokio::test]
    async fn test_missing_cookie_is_401() {
        let repo = InMemoryAuthRepository::new();
        let response = app(&repo, config())
            .oneshot(request("GET", "/things", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["status"], 401);
    }

    #[tokio::test]
    async fn test_worker_reads_but_cannot_mutate() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let worker = seed_user(&repo, "w@example.com", UserRole::Worker);
        let session = seed_session(&repo, &worker, Duration::zero());
        let token = token_for(&config, &session);

        let get = app(&repo, config.clone())
            .oneshot(request("GET", "/things", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::OK);

        let post = app(&repo, config)
            .oneshot(request("POST", "/things", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(post.status(), StatusCode::FORBIDDEN);
        assert!(set_cookie(&post).is_none());
    }

    #[tokio::test]
    async fn test_admin_mutation_sees_context() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let admin = seed_user(&repo, "boss@example.com", UserRole::Admin);
        let session = seed_session(&repo, &admin, Duration::zero());

        let response = app(&repo, config.clone())
            .oneshot(request("POST", "/things", Some(&token_for(&config, &session)), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"boss@example.com");
    }

    #[tokio::test]
    async fn test_refresh_sets_new_cookie() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let worker = seed_user(&repo, "w@example.com", UserRole::Worker);
        let session = seed_session(&repo, &worker, Duration::seconds(900));
        let old_token = token_for(&config, &session);

        let response = app(&repo, config.clone())
            .oneshot(request("GET", "/things", Some(&old_token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie(&response).expect("refreshed cookie");
        assert!(cookie.starts_with("X-Session-ID="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        let new_token = cookie_token(&cookie);
        assert_ne!(new_token, old_token);

        let stale = app(&repo, config.clone())
            .oneshot(request("GET", "/things", Some(&old_token), None))
            .await
            .unwrap();
        assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

        let fresh = app(&repo, config)
            .oneshot(request("GET", "/things", Some(&new_token), None))
            .await
            .unwrap();
        assert_eq!(fresh.status(), StatusCode::OK);
        assert!(set_cookie(&fresh).is_none());
    }

    #[tokio::test]
    async fn test_forbidden_still_carries_refreshed_cookie() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let worker = seed_user(&repo, "w@example.com", UserRole::Worker);
        let session = seed_session(&repo, &worker, Duration::seconds(900));

        let response = app(&repo, config.clone())
            .oneshot(request("DELETE", "/things", Some(&token_for(&config, &session)), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(set_cookie(&response).is_some());
        assert_eq!(repo.sessions_for(worker.user_id).len(), 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_401_and_deleted() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let worker = seed_user(&repo, "w@example.com", UserRole::Worker);
        let session = seed_session(&repo, &worker, Duration::seconds(4000));

        let response = app(&repo, config.clone())
            .oneshot(request("GET", "/things", Some(&token_for(&config, &session)), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let body = r#"{"email":"new@example.com","password":"long-enough-pw","first_name":"A","last_name":"B"}"#;

        let first = app(&repo, config.clone())
            .oneshot(request("POST", "/auth/register", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let cookie = set_cookie(&first).expect("session cookie");
        let token = cookie_token(&cookie);
        let json = json_body(first).await;
        assert_eq!(json["message"], "User created");
        assert_eq!(json["user"]["role"], "worker");
        assert_eq!(json["user"]["middle_name"], serde_json::Value::Null);

        // The cookie authenticates reads right away
        let read = app(&repo, config.clone())
            .oneshot(request("GET", "/things", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(read.status(), StatusCode::OK);

        let second = app(&repo, config)
            .oneshot(request("POST", "/auth/register", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert!(set_cookie(&second).is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let repo = InMemoryAuthRepository::new();
        let response = app(&repo, config())
            .oneshot(request("POST", "/auth/login", None, Some(r#"{"email":1}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_login_wrong_password_sets_no_cookie() {
        let repo = InMemoryAuthRepository::new();
        seed_user(&repo, "w@example.com", UserRole::Worker);

        let response = app(&repo, config())
            .oneshot(request(
                "POST",
                "/auth/login",
                None,
                Some(r#"{"email":"w@example.com","password":"not-the-password"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_login_returns_user_and_cookie() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "w@example.com", UserRole::Worker);
        let earlier = seed_session(&repo, &user, Duration::zero());

        let body = format!(r#"{{"email":"w@example.com","password":"{PASSWORD}"}}"#);
        let response = app(&repo, config)
            .oneshot(request("POST", "/auth/login", None, Some(&body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_some());
        assert!(!repo.contains_session(earlier.session_id));
        let json = json_body(response).await;
        assert_eq!(json["message"], "Logged in");
        assert_eq!(json["user"]["email"], "w@example.com");
    }

    #[tokio::test]
    async fn test_logout() {
        let repo = InMemoryAuthRepository::new();
        let config = config();
        let user = seed_user(&repo, "w@example.com", UserRole::Worker);
        let session = seed_session(&repo, &user, Duration::zero());

        let missing = app(&repo, config.clone())
            .oneshot(request("POST", "/auth/logout", None, None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let response = app(&repo, config.clone())
            .oneshot(request("POST", "/auth/logout", Some(&token_for(&config, &session)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
        assert!(!repo.contains_session(session.session_id));
        assert_eq!(json_body(response).await["message"], "Logged out");
    }
}
