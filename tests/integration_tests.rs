use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fasil360::auth::RegistrationForm;
use fasil360::comments::CommentTarget;
use fasil360::config::{ClientOptions, CommentContentTypes, ContentTypeRef};
use fasil360::content::{ListParams, PhotoUpload};
use fasil360::error::Error;
use fasil360::fetch::{ApiRequest, FileUpload};
use fasil360::gateway::{ApiClient, ClientEvent};
use fasil360::{
    keys, AuthError, CredentialStorage, Fasil360, FileStorage, MemoryStorage, TokenProvider, User,
    UserPatch,
};
use serde_json::{json, Value};
use tokio_test::assert_ok;
use wiremock::matchers::{
    body_json, body_partial_json, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> Value {
    json!({
        "id": 42,
        "email": "hana@uog.edu.et",
        "username": "hana",
        "first_name": "Hana",
        "last_name": "Tesfaye",
        "department": "Software Engineering",
        "campus": "Fasil Campus",
        "batch": "GC 2026",
        "is_representative": true,
        "is_staff": false
    })
}

fn test_user() -> User {
    serde_json::from_value(user_json()).unwrap()
}

fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::new(&format!("{}/api", server.uri()))
}

fn client_for(server: &MockServer, storage: Arc<dyn CredentialStorage>) -> Fasil360 {
    Fasil360::new(options_for(server), storage).unwrap()
}

/// A client whose session holds `access-1` / `refresh-1`
async fn signed_in_client(server: &MockServer) -> (Fasil360, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(server, storage.clone());
    client
        .session()
        .login(test_user(), "access-1", "refresh-1")
        .await
        .unwrap();
    (client, storage)
}

fn photo_json(id: u64) -> Value {
    json!({ "id": id, "title": "Graduation", "total_likes": 3 })
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/photos/"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([photo_json(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let photos = client.photos().list(&ListParams::new()).await.unwrap();
    assert_eq!(photos.len(), 1);
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    Mock::given(method("GET"))
        .and(path("/api/photos/featured/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(418))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/photos/featured/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let featured = client.photos().featured().await.unwrap();
    assert!(featured.is_empty());
}

#[tokio::test]
async fn test_unauthorized_request_is_refreshed_and_replayed() {
    let server = MockServer::start().await;
    let (client, storage) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/photos/7/"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/photos/7/"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photo_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let photo = client.photos().get(7).await.unwrap();
    assert_eq!(photo.id, 7);

    let session = client.session().session().await;
    assert_eq!(session.access_token.as_deref(), Some("access-2"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(
        storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("access-2")
    );
}

#[tokio::test]
async fn test_refreshed_token_survives_restart_on_disk() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
    let client = client_for(&server, storage);
    assert_ok!(
        client
            .session()
            .login(test_user(), "access-1", "refresh-1")
            .await
    );

    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Graduation", "batch": "GC 2025" }
        ])))
        .mount(&server)
        .await;

    assert_ok!(client.categories().list().await);

    let restarted = client_for(&server, Arc::new(FileStorage::new(dir.path()).unwrap()));
    let session = restarted.session().session().await;
    assert_eq!(session.access_token.as_deref(), Some("access-2"));
    assert_eq!(session.user.map(|u| u.id), Some(42));
}

#[tokio::test]
async fn test_replayed_request_is_not_retried_again() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/documents/3/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still unauthorized"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.documents().get(3).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_unauthorized());
    // The refresh itself worked, so the session stays
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_failed_refresh_clears_session_and_returns_original_error() {
    let server = MockServer::start().await;
    let (client, storage) = signed_in_client(&server).await;
    let mut events = client.api().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/rewards/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("refresh expired"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.rewards().list(&ListParams::new()).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "token expired");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(!client.session().is_authenticated().await);
    assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::REFRESH_TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::USER).unwrap(), None);
    assert_eq!(events.try_recv().unwrap(), ClientEvent::LoginRequired);
}

/// Holds an access token but no refresh token
#[derive(Default)]
struct AccessOnly {
    cleared: AtomicBool,
}

#[async_trait]
impl TokenProvider for AccessOnly {
    async fn access_token(&self) -> Option<String> {
        if self.cleared.load(Ordering::SeqCst) {
            None
        } else {
            Some("access-only".to_string())
        }
    }

    async fn refresh_token(&self) -> Option<String> {
        None
    }

    async fn set_access_token(&self, _token: String) -> Result<(), AuthError> {
        panic!("no refresh should be attempted");
    }

    async fn clear(&self) {
        self.cleared.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let server = MockServer::start().await;
    let tokens = Arc::new(AccessOnly::default());
    let api = ApiClient::new(&options_for(&server), tokens.clone()).unwrap();
    let mut events = api.subscribe();

    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = api
        .send_json::<Value>(ApiRequest::get("/categories/"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(tokens.cleared.load(Ordering::SeqCst));
    assert_eq!(events.try_recv().unwrap(), ClientEvent::LoginRequired);
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/photos/"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rewards/"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let photos = client.photos();
    let rewards = client.rewards();
    let params = ListParams::new();
    let (a, b) = tokio::join!(photos.list(&params), rewards.list(&params));
    assert!(a.is_ok());
    assert!(b.is_ok());
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_failed_refresh() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;
    let mut events = client.api().subscribe();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let photos = client.photos();
    let documents = client.documents();
    let params = ListParams::new();
    let (a, b) = tokio::join!(photos.list(&params), documents.list(&params));

    assert_eq!(a.unwrap_err().status(), Some(401));
    assert_eq!(b.unwrap_err().status(), Some(401));
    assert!(!client.session().is_authenticated().await);
    assert_eq!(events.try_recv().unwrap(), ClientEvent::LoginRequired);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/search/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.search().search("graduation", None).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_multipart_upload_is_replayed_after_refresh() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/photos/"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/photos/"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(photo_json(11)))
        .expect(1)
        .mount(&server)
        .await;

    let image = FileUpload::new("grad.jpg", vec![0xff, 0xd8, 0xff]).with_mime("image/jpeg");
    let photo = client
        .photos()
        .upload(PhotoUpload::new("Graduation", image))
        .await
        .unwrap();
    assert_eq!(photo.id, 11);
}

#[tokio::test]
async fn test_login_stores_session() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server, storage.clone());

    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .and(body_json(json!({ "email": "hana@uog.edu.et", "password": "Secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(),
            "access": "access-1",
            "refresh": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .auth()
        .login_remembering(" hana@uog.edu.et ", "Secret123", true)
        .await
        .unwrap();
    assert_eq!(user.id, 42);

    let session = client.session().session().await;
    assert_eq!(session.access_token.as_deref(), Some("access-1"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(
        storage.get(keys::REFRESH_TOKEN).unwrap().as_deref(),
        Some("refresh-1")
    );
    assert_eq!(
        client.auth().remembered_email().as_deref(),
        Some("hana@uog.edu.et")
    );

    // A restarted client picks the session back up
    let restarted = client_for(&server, storage);
    assert_eq!(restarted.auth().current_user().await, Some(user));
}

#[tokio::test]
async fn test_login_accepts_null_profile_fields() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 1,
                "email": "staff@uog.edu.et",
                "username": "staff",
                "first_name": null,
                "last_name": null,
                "department": null,
                "campus": null,
                "batch": null,
                "is_staff": true
            },
            "access": "staff-access",
            "refresh": "staff-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .auth()
        .login("staff@uog.edu.et", "Secret123")
        .await
        .unwrap();
    assert!(user.is_staff);
    assert_eq!(user.batch, "");
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_login_rejected_by_backend_leaves_session_empty() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .auth()
        .login("hana@uog.edu.et", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_invalid_registration_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    Mock::given(method("POST"))
        .and(path("/api/users/register/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let form = RegistrationForm {
        username: "hana".into(),
        email: "hana@uog.edu.et".into(),
        password: "Secret123".into(),
        password2: "Secret124".into(),
        ..Default::default()
    };
    match client.auth().register(&form).await {
        Err(Error::Validation(errors)) => {
            assert_eq!(errors.get("password2"), Some("Passwords do not match"));
            assert_eq!(errors.get("campus"), Some("Campus is required"));
        }
        other => panic!("unexpected result: {:?}", other.map(|u| u.id)),
    }
}

#[tokio::test]
async fn test_register_signs_in() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    Mock::given(method("POST"))
        .and(path("/api/users/register/"))
        .and(body_partial_json(json!({ "username": "hana", "batch": "GC 2026" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": user_json(),
            "access": "access-1",
            "refresh": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = RegistrationForm {
        username: "hana".into(),
        email: "hana@uog.edu.et".into(),
        password: "Secret123".into(),
        password2: "Secret123".into(),
        first_name: "Hana".into(),
        last_name: "Tesfaye".into(),
        department: "Software Engineering".into(),
        campus: "Fasil Campus".into(),
        batch: "GC 2026".into(),
    };
    client.auth().register(&form).await.unwrap();
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_profile_update_merges_into_session() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    let mut updated = user_json();
    updated["bio"] = json!("Photographer");
    Mock::given(method("PATCH"))
        .and(path("/api/users/42/"))
        .and(body_json(json!({ "bio": "Photographer" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .auth()
        .update_profile(UserPatch::new().bio("Photographer"))
        .await
        .unwrap();
    assert_eq!(user.bio.as_deref(), Some("Photographer"));

    let stored = client.session().user().await.unwrap();
    assert_eq!(stored.bio.as_deref(), Some("Photographer"));
    assert_eq!(stored.batch, "GC 2026");
}

#[tokio::test]
async fn test_paginated_listing_with_params() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/photos/"))
        .and(query_param("ordering", "-created_at"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [photo_json(1), photo_json(2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let photos = client.photos().list(&ListParams::latest(3)).await.unwrap();
    assert_eq!(photos.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_listing_with_naive_timestamps() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/photos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "created_at": "2025-06-01T10:00:00.123456Z" },
            { "id": 2, "created_at": "2025-06-01T10:00:00.123456" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let photos = client.photos().list(&ListParams::new()).await.unwrap();
    assert_eq!(photos.len(), 2);
    assert!(photos[1].created_at.is_some());
    assert_eq!(photos[0].created_at, photos[1].created_at);
}

#[tokio::test]
async fn test_like_toggle_with_empty_body() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/rewards/4/like/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.rewards().toggle_like(4).await.unwrap();
    assert_eq!(state.liked, None);
    assert_eq!(state.total_likes, None);
}

#[tokio::test]
async fn test_comment_uses_default_content_type_label() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/comments/"))
        .and(body_json(json!({
            "content": "Congratulations!",
            "content_type": "photo",
            "object_id": 7
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "content": "Congratulations!",
            "object_id": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comment = client
        .comments()
        .post(CommentTarget::Photo, 7, " Congratulations! ")
        .await
        .unwrap();
    assert_eq!(comment.id, 1);
}

#[tokio::test]
async fn test_comment_uses_configured_content_type_id() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    let options = options_for(&server).with_comment_content_types(CommentContentTypes {
        document: ContentTypeRef::Id(14),
        ..Default::default()
    });
    let client = Fasil360::new(options, storage).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/comments/"))
        .and(body_partial_json(json!({ "content_type": 14, "object_id": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "content": "Useful notes"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .comments()
        .post(CommentTarget::Document, 3, "Useful notes")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_blank_comment_is_rejected_locally() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    let err = client
        .comments()
        .post(CommentTarget::Reward, 1, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comments_listed_by_label_and_object() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/comments/"))
        .and(query_param("content_type", "reward"))
        .and(query_param("object_id", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "content": "Well done" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let comments = client
        .comments()
        .list_for(CommentTarget::Reward, 9)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_search_sends_query_and_category() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/search/"))
        .and(query_param("q", "graduation"))
        .and(query_param("category", "photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "photos": [photo_json(1)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client
        .search()
        .search("graduation", Some("photos"))
        .await
        .unwrap();
    assert_eq!(results.total(), 1);

    let empty = client.search().search("  ", Some("all")).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_representative_request_review() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/representative-requests/5/approve/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/representative-requests/"))
        .and(body_json(json!({ "request_message": "I organise our batch events" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let requests = client.representative_requests();
    requests.approve(5).await.unwrap();
    requests
        .submit("I organise our batch events")
        .await
        .unwrap();
    assert!(matches!(
        requests.submit("").await,
        Err(Error::Validation(_))
    ));
}
