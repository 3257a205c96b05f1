// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    handler::Handler,
    http::Request,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{capability, require_auth, AuthGuard},
    error::{ApiError, ErrorEnvelope},
    models::{
        AccessTokenResponse, AuthorBook, AuthorDetail, AuthorListResponse, AuthorProfile,
        AuthorRef, AuthorResponse, AuthorSummary, AuthorUpdatedResponse, BookDetail,
        BookListResponse, BookResponse, BookSummary, BookUpdatedResponse, CreateAuthorRequest,
        CreateBookRequest, CreatedResponse, DeletedResponse, RemovedResponse, ShelfDetail,
        ShelfListResponse, ShelfNameRequest, ShelfResponse, ShelfSummary, StoreBookRequest,
        StoredBookView, StoredResponse, UpdateAuthorRequest, UpdateBookRequest,
        UpdatedResponse,
    },
    state::AppState,
};

pub mod authors;
pub mod body;
pub mod books;
pub mod health;
pub mod login;
pub mod pagination;
pub mod shelves;

const REQUEST_ID_HEADER: &str = "x-request-id";

async fn route_not_found() -> ApiError {
    ApiError::not_found("no such route")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub fn router(state: AppState) -> Router {
    let verifier = state.verifier.clone();
    let requiring = |capability: &'static str| {
        from_fn_with_state(
            AuthGuard::requiring(verifier.clone(), capability),
            require_auth,
        )
    };

    let catalog = Router::new()
        .route(
            "/books",
            get(books::list_books)
                .post(books::create_book.layer(requiring(capability::POST_BOOKS))),
        )
        .route(
            "/books/{id}",
            get(books::get_book)
                .patch(books::update_book.layer(requiring(capability::PATCH_BOOKS)))
                .delete(books::delete_book.layer(requiring(capability::DELETE_BOOKS))),
        )
        .route(
            "/authors",
            get(authors::list_authors)
                .post(authors::create_author.layer(requiring(capability::POST_AUTHORS))),
        )
        .route(
            "/authors/{id}",
            get(authors::get_author)
                .patch(authors::update_author.layer(requiring(capability::PATCH_AUTHORS)))
                .delete(authors::delete_author.layer(requiring(capability::DELETE_AUTHORS))),
        );

    // Every shelf route needs a subject but no capability.
    let shelves = Router::new()
        .route(
            "/shelves",
            get(shelves::list_shelves).post(shelves::create_shelf),
        )
        .route(
            "/shelves/{id}",
            get(shelves::get_shelf)
                .patch(shelves::rename_shelf)
                .delete(shelves::delete_shelf),
        )
        .route("/shelves/{id}/books", post(shelves::store_book))
        .route("/shelves/{id}/books/{book_id}", delete(shelves::remove_book))
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(from_fn_with_state(
            AuthGuard::authenticated(verifier.clone()),
            require_auth,
        ));

    let public = Router::new()
        .route("/login", get(login::login))
        .route("/callback", get(login::callback))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(catalog)
        .merge(shelves)
        .merge(public)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        authors::list_authors,
        authors::create_author,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        shelves::list_shelves,
        shelves::create_shelf,
        shelves::get_shelf,
        shelves::rename_shelf,
        shelves::delete_shelf,
        shelves::store_book,
        shelves::remove_book,
        login::login,
        login::callback,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            ErrorEnvelope,
            AuthorRef,
            BookSummary,
            BookDetail,
            AuthorSummary,
            AuthorBook,
            AuthorDetail,
            AuthorProfile,
            ShelfSummary,
            ShelfDetail,
            StoredBookView,
            CreateBookRequest,
            UpdateBookRequest,
            CreateAuthorRequest,
            UpdateAuthorRequest,
            ShelfNameRequest,
            StoreBookRequest,
            BookListResponse,
            BookResponse,
            BookUpdatedResponse,
            AuthorListResponse,
            AuthorResponse,
            AuthorUpdatedResponse,
            ShelfListResponse,
            ShelfResponse,
            CreatedResponse,
            UpdatedResponse,
            DeletedResponse,
            StoredResponse,
            RemovedResponse,
            AccessTokenResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Books", description = "Book catalog"),
        (name = "Authors", description = "Author catalog"),
        (name = "Shelves", description = "Reading shelves of the authenticated user"),
        (name = "Auth", description = "Identity provider login"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{self, ProviderStub, KID_B, PRIVATE_KEY_B_PEM};
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const EDITOR_PERMISSIONS: &[&str] = &[
        capability::POST_BOOKS,
        capability::PATCH_BOOKS,
        capability::DELETE_BOOKS,
        capability::POST_AUTHORS,
        capability::PATCH_AUTHORS,
        capability::DELETE_AUTHORS,
    ];

    struct TestApp {
        app: Router,
        stub: ProviderStub,
        editor: String,
        _dir: TempDir,
    }

    impl TestApp {
        async fn start() -> Self {
            let stub = ProviderStub::start(testing::key_set_json()).await;
            let dir = TempDir::new().unwrap();
            let app = router(AppState::for_tests(dir.path(), &stub));
            Self {
                app,
                stub,
                editor: testing::token_for("auth0|editor", EDITOR_PERMISSIONS),
                _dir: dir,
            }
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let body = match body {
                Some(value) => {
                    request = request.header(header::CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .app
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        async fn seed_author(&self, name: &str) -> u64 {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/authors",
                    Some(&self.editor),
                    Some(json!({"name": name, "description": "writes", "birthday": "1948-10-21"})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["created"].as_u64().unwrap()
        }

        async fn seed_book(&self, title: &str, author_id: u64) -> u64 {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/books",
                    Some(&self.editor),
                    Some(json!({
                        "title": title,
                        "description": "a novel",
                        "author_id": author_id,
                        "pages": "250",
                        "year": 1969,
                        "genres": ["science fiction", "classic"]
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["created"].as_u64().unwrap()
        }
    }

    #[tokio::test]
    async fn unknown_route_and_wrong_method_use_the_envelope() {
        let app = TestApp::start().await;

        let (status, body) = app.call(Method::GET, "/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": 404, "message": "not found"}));

        let (status, body) = app.call(Method::PUT, "/books", None, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "method not allowed");
    }

    #[tokio::test]
    async fn catalog_reads_are_public_and_writes_are_gated() {
        let app = TestApp::start().await;

        let (status, body) = app.call(Method::GET, "/books", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "books": [], "total": 0}));

        let payload = json!({"name": "N", "description": "d", "birthday": "2000-01-01"});
        let (status, body) = app
            .call(Method::POST, "/authors", None, Some(payload.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "authorization_header_missing");

        let reader = testing::token_for("auth0|reader", &[capability::POST_BOOKS]);
        let (status, body) = app
            .call(Method::POST, "/authors", Some(&reader), Some(payload))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[tokio::test]
    async fn unknown_key_id_is_401() {
        let app = TestApp::start().await;
        let token = testing::sign(
            PRIVATE_KEY_B_PEM,
            Some(KID_B),
            &testing::valid_claims("auth0|editor", EDITOR_PERMISSIONS),
        );

        let (status, body) = app.call(Method::GET, "/shelves", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "invalid_header");
        assert!(app.stub.hits() >= 1);
    }

    #[tokio::test]
    async fn book_lifecycle() {
        let app = TestApp::start().await;
        let author = app.seed_author("ursula le guin").await;
        let book = app.seed_book("the left hand of darkness", author).await;

        let (status, body) = app
            .call(Method::GET, &format!("/books/{book}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["book"]["title"], "The Left Hand Of Darkness");
        assert_eq!(body["book"]["pages"], 250);
        assert_eq!(body["book"]["author"], json!({"id": author, "name": "Ursula Le Guin"}));
        assert_eq!(body["book"]["genres"], json!(["Classic", "Science Fiction"]));

        let (status, body) = app
            .call(Method::GET, "/books?genre=CLASSIC&search_term=darkness", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let (status, body) = app
            .call(
                Method::PATCH,
                &format!("/books/{book}"),
                Some(&app.editor),
                Some(json!({"genres": ["classic", "fantasy"], "year": "1970"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["updated"], book);
        assert_eq!(body["book"]["genres"], json!(["Classic", "Fantasy"]));
        assert_eq!(body["book"]["year"], 1970);

        let (status, _) = app
            .call(Method::DELETE, &format!("/books/{book}"), Some(&app.editor), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .call(Method::GET, &format!("/books/{book}"), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_with_unknown_author_is_404_and_changes_nothing() {
        let app = TestApp::start().await;
        let author = app.seed_author("Frank Herbert").await;
        let book = app.seed_book("Dune", author).await;

        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/books/{book}"),
                Some(&app.editor),
                Some(json!({"author_id": 999999, "title": "Dune Messiah"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app
            .call(Method::GET, &format!("/books/{book}"), None, None)
            .await;
        assert_eq!(body["book"]["title"], "Dune");
        assert_eq!(body["book"]["author"]["id"], author);
    }

    #[tokio::test]
    async fn book_validation_statuses() {
        let app = TestApp::start().await;
        let author = app.seed_author("Validator").await;
        app.seed_book("Taken", author).await;

        let base = json!({
            "title": "Fresh",
            "description": "d",
            "author_id": author,
            "pages": 10,
            "year": 2000,
            "genres": ["x"]
        });
        let with = |field: &str, value: Value| {
            let mut body = base.clone();
            body[field] = value;
            body
        };
        let post = |body: Value| app.call(Method::POST, "/books", Some(&app.editor), Some(body));

        let mut missing = base.clone();
        missing.as_object_mut().unwrap().remove("year");
        assert_eq!(post(missing).await.0, StatusCode::BAD_REQUEST);
        assert_eq!(post(with("title", json!(" "))).await.0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(post(with("pages", json!("many"))).await.0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(post(with("title", json!("TAKEN"))).await.0, StatusCode::CONFLICT);
        assert_eq!(post(with("author_id", json!(404))).await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            post(with("author_id", json!("-3"))).await.0,
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let (status, _) = app
            .call(Method::GET, "/books/not-a-number", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn author_delete_blocked_while_books_remain() {
        let app = TestApp::start().await;
        let author = app.seed_author("Mary Shelley").await;
        let book = app.seed_book("Frankenstein", author).await;

        let (status, _) = app
            .call(Method::DELETE, &format!("/authors/{author}"), Some(&app.editor), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        app.call(Method::DELETE, &format!("/books/{book}"), Some(&app.editor), None)
            .await;
        let (status, body) = app
            .call(Method::DELETE, &format!("/authors/{author}"), Some(&app.editor), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], author);
    }

    #[tokio::test]
    async fn author_profile_and_birthday_validation() {
        let app = TestApp::start().await;
        let author = app.seed_author("octavia butler").await;
        app.seed_book("Kindred", author).await;

        let (status, body) = app
            .call(Method::GET, &format!("/authors/{author}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"]["name"], "Octavia Butler");
        assert_eq!(body["author"]["birthday"], "1948-10-21");
        assert_eq!(body["author"]["total_books"], 1);
        assert!(body["author"]["books"][0].get("author").is_none());
        assert_eq!(body["author"]["genres"], json!(["Classic", "Science Fiction"]));

        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/authors/{author}"),
                Some(&app.editor),
                Some(json!({"birthday": "21.10.1948"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = app
            .call(
                Method::PATCH,
                &format!("/authors/{author}"),
                Some(&app.editor),
                Some(json!({"birthday": "1947/6/22"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"]["birthday"], "1947-06-22");
    }

    #[tokio::test]
    async fn shelf_slots_are_unique_per_subject() {
        let app = TestApp::start().await;
        let author = app.seed_author("Author").await;
        let book = app.seed_book("Shelved", author).await;
        let reader = testing::token_for("auth0|subject-s", &[]);

        for (expected, name) in ["want to read", "currently reading", "read"]
            .iter()
            .enumerate()
        {
            let (status, body) = app
                .call(Method::POST, "/shelves", Some(&reader), Some(json!({"name": name})))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["created"], expected as u64 + 1);
        }

        let store = |shelf: u64| {
            let (app, reader) = (&app, &reader);
            let uri = format!("/shelves/{shelf}/books");
            async move {
                app.call(Method::POST, &uri, Some(reader), Some(json!({"book_id": book})))
                    .await
            }
        };
        let (status, body) = store(1).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["stored"]["shelf"], 1);
        assert_eq!(body["stored"]["book"]["id"], book);
        assert_eq!(store(2).await.0, StatusCode::CONFLICT);

        let (status, body) = app
            .call(Method::DELETE, &format!("/shelves/2/books/{book}"), Some(&reader), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], book);
        assert_eq!(store(2).await.0, StatusCode::CREATED);

        let (status, body) = app.call(Method::GET, "/shelves", Some(&reader), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["shelves"][1], json!({"id": 2, "name": "currently reading", "total_books": 1}));
    }

    #[tokio::test]
    async fn shelves_are_scoped_to_their_owner() {
        let app = TestApp::start().await;
        let owner = testing::token_for("auth0|owner", &[]);
        let other = testing::token_for("auth0|other", &[]);

        app.call(Method::POST, "/shelves", Some(&owner), Some(json!({"name": "mine"})))
            .await;

        let (status, _) = app.call(Method::GET, "/shelves/1", Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.call(Method::DELETE, "/shelves/1", Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = app.call(Method::GET, "/shelves", Some(&other), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let (status, body) = app.call(Method::GET, "/shelves/1", Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shelf"]["name"], "mine");

        let (status, _) = app.call(Method::GET, "/shelves/one", Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn shelves_require_authentication() {
        let app = TestApp::start().await;
        let (status, body) = app.call(Method::GET, "/shelves", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn shelf_rename_and_delete() {
        let app = TestApp::start().await;
        let reader = testing::token_for("auth0|renamer", &[]);
        for name in ["a", "b"] {
            app.call(Method::POST, "/shelves", Some(&reader), Some(json!({"name": name})))
                .await;
        }

        let (status, _) = app.call(Method::PATCH, "/shelves/1", Some(&reader), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = app
            .call(Method::PATCH, "/shelves/1", Some(&reader), Some(json!({"name": "B"})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, body) = app
            .call(Method::PATCH, "/shelves/1", Some(&reader), Some(json!({"name": "c"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], 1);

        let (status, _) = app.call(Method::DELETE, "/shelves/1", Some(&reader), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = app
            .call(Method::POST, "/shelves", Some(&reader), Some(json!({"name": "d"})))
            .await;
        assert_eq!(body["created"], 3);
    }

    #[tokio::test]
    async fn login_redirects_and_callback_exchanges_code() {
        let app = TestApp::start().await;

        let response = app
            .app
            .clone()
            .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with(&format!("{}/authorize?", app.stub.base_url())));
        assert!(location.contains("response_type=code"));

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/callback?code={}", testing::GOOD_CODE),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["access_token"], testing::ACCESS_TOKEN);

        let (status, _) = app.call(Method::GET, "/callback", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .call(Method::GET, "/callback?code=stolen", None, None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "invalid_grant");
    }

    #[tokio::test]
    async fn health_reports_components() {
        let app = TestApp::start().await;
        let (status, body) = app.call(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"], "ok");
        assert_eq!(body["checks"]["jwks"], "ok");

        let (status, body) = app.call(Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn request_id_is_assigned_and_echoed() {
        let app = TestApp::start().await;

        let response = app
            .app
            .clone()
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let assigned = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(assigned).is_ok());

        let response = app
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header(REQUEST_ID_HEADER, "caller-chosen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "caller-chosen");
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/books", "/books/{id}", "/authors/{id}", "/shelves/{id}/books/{book_id}", "/callback"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }

    #[test]
    fn openapi_documents_request_bodies() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        for (path, method, schema) in [
            ("/books", "post", "CreateBookRequest"),
            ("/books/{id}", "patch", "UpdateBookRequest"),
            ("/authors", "post", "CreateAuthorRequest"),
            ("/authors/{id}", "patch", "UpdateAuthorRequest"),
            ("/shelves", "post", "ShelfNameRequest"),
            ("/shelves/{id}", "patch", "ShelfNameRequest"),
            ("/shelves/{id}/books", "post", "StoreBookRequest"),
        ] {
            let reference = &doc["paths"][path][method]["requestBody"]["content"]
                ["application/json"]["schema"]["$ref"];
            assert_eq!(
                reference,
                &format!("#/components/schemas/{schema}"),
                "{method} {path}"
            );
        }
    }
}
