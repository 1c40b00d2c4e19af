use axum::body::Body;
use axum::http::{Request, StatusCode};
use rest_utils::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug)]
struct User {
    username: String,
}

#[derive(Default)]
struct ProfileViewSet;

impl ViewSet for ProfileViewSet {
    fn routes_config(&self) -> Vec<RouteConfig> {
        vec![
            RouteConfig::get("/me", "me"),
            RouteConfig::get("/notes", "notes"),
        ]
    }
}

#[viewset]
impl ProfileViewSet {
    #[action]
    async fn me(&self, user: AuthUser<User>) -> Json<Value> {
        Json(json!({ "username": user.username }))
    }

    #[action]
    async fn notes(&self, user: AuthUser<User>, db: Db<MemoryStore<Value>>) -> Result<Json<Value>> {
        let notes = db.list().await?;
        Ok(Json(json!({ "owner": user.username, "count": notes.len() })))
    }
}

fn user_injector() -> Arc<dyn Dependency> {
    auth_dep_injector(|head: RequestHead| async move {
        match head.bearer_token() {
            Some(token) if !token.is_empty() => Ok(User {
                username: token.to_string(),
            }),
            _ => Err(RestError::Unauthorized("missing bearer token".into())),
        }
    })
}

fn db_injector(store: Arc<MemoryStore<Value>>) -> Arc<dyn Dependency> {
    db_dep_injector(move || {
        let store = store.clone();
        async move { Ok(store) }
    })
}

#[test]
fn test_injectors_are_named_after_what_they_provide() {
    let store = Arc::new(MemoryStore::<Value>::new());
    assert_eq!(db_injector(store).name(), "db");
    assert_eq!(user_injector().name(), "user");
}

#[tokio::test]
async fn test_injected_values_reach_handlers() {
    let store = Arc::new(MemoryStore::<Value>::new());
    store.create(json!({ "text": "one" })).await.unwrap();
    store.create(json!({ "text": "two" })).await.unwrap();

    let mut router = RestRouter::new();
    router
        .register_viewset::<ProfileViewSet>(
            "/profile",
            None,
            RouteOverrides::new()
                .dependency(user_injector())
                .dependency(db_injector(store)),
        )
        .unwrap();
    let app: Router = router.into_router();

    let response = app
        .clone()
        .oneshot(
            Request::get("/profile/me")
                .header("authorization", "Bearer alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "username": "alice" }));

    let response = app
        .clone()
        .oneshot(
            Request::get("/profile/notes")
                .header("authorization", "Bearer bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "owner": "bob", "count": 2 }));

    let response = app
        .oneshot(Request::get("/profile/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_provider_errors_propagate_unchanged() {
    let failing = db_dep_injector(|| async {
        Err::<Arc<MemoryStore<Value>>, _>(RestError::Database("connection refused".into()))
    });

    let mut router = RestRouter::new();
    router
        .register_viewset::<ProfileViewSet>(
            "/profile",
            None,
            RouteOverrides::new()
                .dependency(user_injector())
                .dependency(failing),
        )
        .unwrap();
    let app: Router = router.into_router();

    let response = app
        .oneshot(
            Request::get("/profile/notes")
                .header("authorization", "Bearer carol")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "Database error: connection refused");
}
