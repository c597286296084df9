pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::feedback::handlers as feedback;
use crate::interviews::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Voice-agent callback
        .route(
            "/api/vapi/generate",
            get(interviews::handle_generate_ping).post(interviews::handle_generate),
        )
        // Auth actions
        .route("/api/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/auth/me", get(auth::handle_current_user))
        .route("/api/auth/status", get(auth::handle_auth_status))
        // Interviews
        .route("/api/interviews", get(interviews::handle_list_interviews))
        .route(
            "/api/interviews/latest",
            get(interviews::handle_latest_interviews),
        )
        .route("/api/interviews/:id", get(interviews::handle_get_interview))
        .route(
            "/api/interviews/:id/feedback",
            get(feedback::handle_get_feedback).post(feedback::handle_create_feedback),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::errors::PARSE_FAILURE_MESSAGE;
    use crate::feedback::models::{sample_assessment, FEEDBACK_COLLECTION};
    use crate::interviews::models::INTERVIEWS_COLLECTION;
    use crate::test_support::{id_token, test_state, test_state_with, StubModel};

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn generate_body() -> Value {
        json!({
            "type": "Technical",
            "role": "Frontend Developer",
            "level": "Junior",
            "techstack": "React, TypeScript",
            "amount": 3,
            "userid": "user-1"
        })
    }

    /// Signs up and signs in `uid`, returning the session cookie pair.
    async fn sign_in_cookie(router: &Router, uid: &str) -> String {
        let email = format!("{uid}@example.com");
        let sign_up = json!({"uid": uid, "name": "Ada", "email": email});
        let (_, body) = send(router.clone(), post_json("/api/auth/sign-up", sign_up)).await;
        assert_eq!(body["success"], true);

        let sign_in = json!({"email": email, "idToken": id_token(uid)});
        let response = router
            .clone()
            .oneshot(post_json("/api/auth/sign-in", sign_in))
            .await
            .unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_ping() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            Request::get("/api/vapi/generate").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "data": "Thank you!"}));
    }

    #[tokio::test]
    async fn test_generate_persists_interview() {
        let (state, harness) =
            test_state_with(StubModel::with_text(r#"["Q1","Q2","Q3"]"#));
        let (status, body) = send(
            build_router(state),
            post_json("/api/vapi/generate", generate_body()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert_eq!(harness.store.count(INTERVIEWS_COLLECTION).await, 1);
    }

    #[tokio::test]
    async fn test_generate_missing_fields_is_400_without_model_call() {
        let (state, harness) = test_state();
        let mut body = generate_body();
        body.as_object_mut().unwrap().remove("role");

        let (status, body) = send(build_router(state), post_json("/api/vapi/generate", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required fields.");
        assert_eq!(harness.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_unreadable_body_is_400() {
        let (state, _) = test_state();
        let request = Request::post("/api/vapi/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields.");
    }

    #[tokio::test]
    async fn test_generate_unparsable_output_is_500_and_writes_nothing() {
        let (state, harness) = test_state_with(StubModel::with_text("no questions today"));
        let (status, body) = send(
            build_router(state),
            post_json("/api/vapi/generate", generate_body()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": PARSE_FAILURE_MESSAGE}));
        assert_eq!(harness.store.count(INTERVIEWS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_session_routes_require_cookie() {
        let (state, _) = test_state();
        let router = build_router(state);

        for uri in ["/api/interviews", "/api/interviews/latest", "/api/interviews/i1/feedback"] {
            let (status, body) =
                send(router.clone(), Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn test_malformed_listing_query_is_json_400() {
        let (state, _) = test_state();
        let router = build_router(state);
        let cookie = sign_in_cookie(&router, "uid-ada").await;

        for uri in ["/api/interviews?order=sideways", "/api/interviews/latest?limit=abc"] {
            let request = Request::get(uri)
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_listing_accepts_order_and_limit() {
        let (state, _) = test_state();
        let router = build_router(state);
        let cookie = sign_in_cookie(&router, "uid-ada").await;

        for uri in ["/api/interviews?order=oldest", "/api/interviews/latest?limit=5"] {
            let request = Request::get(uri)
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, json!([]), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cookie_from_before_sign_out_is_rejected() {
        let (state, _) = test_state();
        let router = build_router(state);
        let cookie = sign_in_cookie(&router, "uid-ada").await;

        let sign_out = Request::post("/api/auth/sign-out")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(router.clone(), sign_out).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            router,
            Request::get("/api/interviews")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_interview_is_404() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            Request::get("/api/interviews/missing").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_auth_status_follows_session_cookie() {
        let (state, _) = test_state();
        let router = build_router(state);

        let (_, anonymous) = send(
            router.clone(),
            Request::get("/api/auth/status").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(anonymous, json!({"authenticated": false}));

        let cookie = sign_in_cookie(&router, "uid-ada").await;
        let (_, signed_in) = send(
            router.clone(),
            Request::get("/api/auth/status")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(signed_in, json!({"authenticated": true}));

        let (_, me) = send(
            router,
            Request::get("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(me["id"], "uid-ada");
        assert_eq!(me["email"], "uid-ada@example.com");
    }

    #[tokio::test]
    async fn test_feedback_round_trip_for_signed_in_user() {
        let model = StubModel::with_object(serde_json::to_value(sample_assessment()).unwrap());
        let (state, harness) = test_state_with(model);
        let router = build_router(state);
        let cookie = sign_in_cookie(&router, "uid-ada").await;

        let create = Request::post("/api/interviews/i1/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({
                    "transcript": [{"role": "user", "content": "Hello"}],
                    "feedbackId": "fb-1"
                })
                .to_string(),
            ))
            .unwrap();
        let (status, body) = send(router.clone(), create).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "feedbackId": "fb-1"}));
        assert_eq!(harness.store.count(FEEDBACK_COLLECTION).await, 1);

        let (status, body) = send(
            router,
            Request::get("/api/interviews/i1/feedback")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "fb-1");
        assert_eq!(body["interviewId"], "i1");
        assert_eq!(body["userId"], "uid-ada");
    }

    #[tokio::test]
    async fn test_feedback_failure_reports_success_false() {
        let (state, harness) = test_state_with(StubModel::failing());
        let router = build_router(state);
        let cookie = sign_in_cookie(&router, "uid-ada").await;

        let create = Request::post("/api/interviews/i1/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(json!({"transcript": []}).to_string()))
            .unwrap();
        let (status, body) = send(router, create).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": false}));
        assert_eq!(harness.store.count(FEEDBACK_COLLECTION).await, 0);
    }
}
