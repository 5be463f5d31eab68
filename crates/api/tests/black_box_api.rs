use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use coursehub_api::app::{AppServices, build_app};
use coursehub_infra::{InMemoryCatalogStore, UserRepository};

struct TestServer {
    base_url: String,
    store: Arc<InMemoryCatalogStore>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let store = Arc::new(InMemoryCatalogStore::new());
        let services = Arc::new(AppServices::from_store(store.clone()));
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_user(&self, first: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({
                "firstName": first,
                "lastName": "Tester",
                "emailAddress": email,
                "password": password,
            }))
            .send()
            .await
            .unwrap()
    }

    /// Create a course as `email` and return its id.
    async fn create_course(&self, email: &str, password: &str, title: &str) -> String {
        let res = self
            .client
            .post(self.url("/api/courses"))
            .basic_auth(email, Some(password))
            .json(&json!({
                "title": title,
                "description": "Learn things.",
                "estimatedTime": "2 hours",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res.headers()["location"].to_str().unwrap().to_string();
        location
            .strip_prefix("/api/courses/")
            .expect("location points at the course")
            .to_string()
    }

    async fn get_course(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/api/courses/{id}")))
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn field_messages(body: &Value) -> Vec<(String, String)> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["field"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn root_health_and_unknown_routes() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to the CourseHub REST API");

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url("/api/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn create_user_returns_created_with_location() {
    let srv = TestServer::spawn().await;

    let res = srv.create_user("Joe", "joe@smith.com", "joepassword").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["location"], "/");
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_user_reports_every_missing_field() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/users"))
        .json(&json!({ "firstName": "Joe" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    let errors = field_messages(&body);
    assert!(errors.contains(&("lastName".into(), "Please provide a Last Name".into())));
    assert!(errors.contains(&(
        "emailAddress".into(),
        "Please provide an Email Address".into()
    )));
    assert!(errors.contains(&("password".into(), "Please provide a Password".into())));
    assert!(!errors.iter().any(|(field, _)| field == "firstName"));
}

#[tokio::test]
async fn create_user_rejects_malformed_email_and_json() {
    let srv = TestServer::spawn().await;

    let res = srv.create_user("Joe", "not-an-email", "pw").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        field_messages(&body),
        vec![(
            "emailAddress".to_string(),
            "Please provide a valid Email Address".to_string()
        )]
    );

    let res = srv
        .client
        .post(srv.url("/api/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "body");
    assert_eq!(
        body["errors"][0]["message"],
        "Please provide a valid JSON request body"
    );
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let srv = TestServer::spawn().await;

    let res = srv.create_user("Joe", "joe@smith.com", "joepassword").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv.create_user("Joseph", "Joe@Smith.com", "other").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        field_messages(&body),
        vec![(
            "emailAddress".to_string(),
            "The Email Address you entered already exists".to_string()
        )]
    );
}

#[tokio::test]
async fn stored_password_is_hashed() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;

    let user = srv
        .store
        .find_by_email("joe@smith.com")
        .await
        .unwrap()
        .expect("user persisted");
    assert_ne!(user.password_hash.as_str(), "joepassword");
    assert!(user.password_hash.as_str().starts_with("$argon2id$"));
}

#[tokio::test]
async fn current_user_requires_valid_credentials() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;

    let res = srv.client.get(srv.url("/api/users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("www-authenticate"));

    let res = srv
        .client
        .get(srv.url("/api/users"))
        .basic_auth("joe@smith.com", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "unauthorized", "message": "access denied" }));

    let res = srv
        .client
        .get(srv.url("/api/users"))
        .basic_auth("nobody@smith.com", Some("joepassword"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/api/users"))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let user = &body["authenticatedUser"];
    assert_eq!(user["firstName"], "Joe");
    assert_eq!(user["emailAddress"], "joe@smith.com");
    assert!(user.get("password").is_none());
    assert!(user.get("createdAt").is_none());
}

#[tokio::test]
async fn create_course_requires_authentication() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/courses"))
        .json(&json!({ "title": "T", "description": "D" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.client.get(srv.url("/api/courses")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["courses"], json!([]));
}

#[tokio::test]
async fn course_lifecycle_for_owner() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;

    let id = srv
        .create_course("joe@smith.com", "joepassword", "Build a Basic Bookcase")
        .await;

    let res = srv.get_course(&id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let course = &body["course"];
    assert_eq!(course["id"], id);
    assert_eq!(course["title"], "Build a Basic Bookcase");
    assert_eq!(course["estimatedTime"], "2 hours");
    assert_eq!(course["user"]["emailAddress"], "joe@smith.com");
    assert!(course.get("createdAt").is_none());

    let res = srv.client.get(srv.url("/api/courses")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);

    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .json(&json!({ "title": "Build a Better Bookcase", "description": "Updated." }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = srv.get_course(&id).await.json().await.unwrap();
    assert_eq!(body["course"]["title"], "Build a Better Bookcase");
    assert!(body["course"]["estimatedTime"].is_null());

    let res = srv
        .client
        .delete(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_eq!(srv.get_course(&id).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_course_validates_required_fields() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;

    let res = srv
        .client
        .post(srv.url("/api/courses"))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let errors = field_messages(&body);
    assert!(errors.contains(&("title".into(), "Please provide a Title".into())));
    assert!(errors.contains(&("description".into(), "Please provide a Description".into())));
}

#[tokio::test]
async fn non_owner_cannot_change_course() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;
    srv.create_user("Sally", "sally@jones.com", "sallypassword").await;

    let id = srv
        .create_course("joe@smith.com", "joepassword", "Joe's course")
        .await;

    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("sally@jones.com", Some("sallypassword"))
        .json(&json!({ "title": "Hijacked", "description": "Mine now." }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Ownership is checked before the body.
    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("sally@jones.com", Some("sallypassword"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .delete(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("sally@jones.com", Some("sallypassword"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = srv.get_course(&id).await.json().await.unwrap();
    assert_eq!(body["course"]["title"], "Joe's course");
    assert_eq!(body["course"]["user"]["firstName"], "Joe");
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;

    let missing = uuid::Uuid::now_v7().to_string();
    let res = srv.get_course(&missing).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    assert_eq!(srv.get_course("not-a-uuid").await.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .delete(srv.url(&format!("/api/courses/{missing}")))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_mutations_require_authentication() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;
    let id = srv
        .create_course("joe@smith.com", "joepassword", "Joe's course")
        .await;

    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{id}")))
        .json(&json!({ "title": "Changed", "description": "Changed." }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("www-authenticate"));

    let res = srv
        .client
        .delete(srv.url(&format!("/api/courses/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The public GET on the same path stays open.
    let body: Value = srv.get_course(&id).await.json().await.unwrap();
    assert_eq!(body["course"]["title"], "Joe's course");
}

#[tokio::test]
async fn owner_update_checks_existence_then_body() {
    let srv = TestServer::spawn().await;
    srv.create_user("Joe", "joe@smith.com", "joepassword").await;
    let id = srv
        .create_course("joe@smith.com", "joepassword", "Joe's course")
        .await;

    let missing = uuid::Uuid::now_v7().to_string();
    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{missing}")))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .put(srv.url(&format!("/api/courses/{id}")))
        .basic_auth("joe@smith.com", Some("joepassword"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let errors = field_messages(&body);
    assert!(errors.contains(&("title".into(), "Please provide a Title".into())));
    assert!(errors.contains(&("description".into(), "Please provide a Description".into())));

    let body: Value = srv.get_course(&id).await.json().await.unwrap();
    assert_eq!(body["course"]["title"], "Joe's course");
}
