use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use bookshelf_core::ports::{BaseRepository, BookRepository, TokenService};
use bookshelf_infra::{JwtConfig, PasswordScheme};

use super::configure_routes;
use crate::config::AppConfig;
use crate::state::AppState;

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_seconds: 900,
            issuer: "test".to_string(),
        },
        password_scheme: PasswordScheme::Bcrypt { cost: 4 },
        duplicate_username_status: StatusCode::CONFLICT,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request, returning the status and the JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

fn register_body() -> Value {
    json!({
        "username": "u1",
        "password": "p1",
        "firstName": "A",
        "lastName": "B",
    })
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let state = AppState::in_memory(&test_config());
    let app = test_app!(state.clone());

    let (status, body) = call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    assert!(state.users.find_by_id(1).await.unwrap().is_some());
    assert!(state.users.find_by_id(2).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_duplicate_registration_legacy_status() {
    let config = AppConfig {
        duplicate_username_status: StatusCode::NOT_FOUND,
        ..test_config()
    };
    let app = test_app!(AppState::in_memory(&config));

    call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );
    let (status, body) = call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Username already exists");
}

#[actix_web::test]
async fn test_register_requires_every_field() {
    let state = AppState::in_memory(&test_config());
    let app = test_app!(state.clone());

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({"username": "u1", "password": "p1", "firstName": "A"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");
    assert!(state.users.find_by_id(1).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_login_issues_verifiable_token() {
    let state = AppState::in_memory(&test_config());
    let app = test_app!(state.clone());

    call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "u1", "password": "p1"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successfully");

    let token = body["token"].as_str().unwrap();
    let claims = state.tokens.validate_token(token).unwrap();
    assert_eq!(claims.user_id, 1);
    assert_eq!(claims.first_name, "A");
    assert_eq!(claims.last_name, "B");

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri("/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["firstName"], "A");
    assert_eq!(body["data"]["lastName"], "B");
    assert_eq!(body["data"]["expiresAt"], claims.exp);
}

#[actix_web::test]
async fn test_login_failures() {
    let app = test_app!(AppState::in_memory(&test_config()));

    call!(
        app,
        TestRequest::post().uri("/auth/register").set_json(register_body())
    );

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "u1", "password": "wrong"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
    assert!(body.get("token").is_none());

    let (status, _) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "nobody", "password": "p1"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "u1"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}

#[actix_web::test]
async fn test_me_requires_valid_token() {
    let app = test_app!(AppState::in_memory(&test_config()));

    let (status, _) = call!(app, TestRequest::get().uri("/auth/me"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(
        app,
        TestRequest::get()
            .uri("/auth/me")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[actix_web::test]
async fn test_book_lifecycle() {
    let app = test_app!(AppState::in_memory(&test_config()));

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/books")
            .set_json(json!({"title": "T", "description": "D", "user_id": 1}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book created successfully");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(app, TestRequest::get().uri(&format!("/books/{}", id)));
    assert_eq!(status, StatusCode::OK);
    let book = &body["data"][0];
    assert_eq!(book["title"], "T");
    assert_eq!(book["description"], "D");
    assert_eq!(book["user_id"], 1);

    let (status, body) = call!(app, TestRequest::delete().uri(&format!("/books/{}", id)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, body) = call!(app, TestRequest::get().uri(&format!("/books/{}", id)));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");

    let (status, _) = call!(app, TestRequest::delete().uri(&format!("/books/{}", id)));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_book_is_not_inserted() {
    let state = AppState::in_memory(&test_config());
    let app = test_app!(state.clone());

    for body in [
        json!({"description": "D", "user_id": 1}),
        json!({"title": "T", "user_id": 1}),
        json!({"title": "T", "description": "D"}),
        json!({"title": "", "description": "D", "user_id": 1}),
    ] {
        let (status, resp) = call!(app, TestRequest::post().uri("/books").set_json(body));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            resp["message"]
                .as_str()
                .unwrap()
                .starts_with("Missing required field")
        );
    }

    assert!(state.books.list().await.unwrap().is_empty());

    let (status, body) = call!(app, TestRequest::get().uri("/books"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn test_update_book() {
    let app = test_app!(AppState::in_memory(&test_config()));

    let (_, body) = call!(
        app,
        TestRequest::post()
            .uri("/books")
            .set_json(json!({"title": "T", "description": "D", "user_id": 1}))
    );
    let id = body["data"]["id"].as_i64().unwrap();
    let created_at = body["data"]["updated_at"].clone();
    let uri = format!("/books/{}", id);

    let (status, body) = call!(app, TestRequest::put().uri(&uri).set_json(json!({})));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No fields to update");

    let (_, body) = call!(app, TestRequest::get().uri(&uri));
    assert_eq!(body["data"][0]["updated_at"], created_at);

    let (status, body) = call!(
        app,
        TestRequest::put().uri(&uri).set_json(json!({"title": "T2"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["data"]["title"], "T2");
    assert_eq!(body["data"]["description"], "D");
    assert_ne!(body["data"]["updated_at"], created_at);

    let (status, _) = call!(
        app,
        TestRequest::put()
            .uri("/books/999")
            .set_json(json!({"title": "T3"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_books_in_creation_order() {
    let app = test_app!(AppState::in_memory(&test_config()));

    for title in ["first", "second"] {
        call!(
            app,
            TestRequest::post()
                .uri("/books")
                .set_json(json!({"title": title, "description": "D", "user_id": 2}))
        );
    }

    let (status, body) = call!(app, TestRequest::get().uri("/books"));
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[actix_web::test]
async fn test_malformed_input_is_a_bad_request() {
    let app = test_app!(AppState::in_memory(&test_config()));

    let (status, body) = call!(app, TestRequest::get().uri("/books/abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid book id");

    let (status, body) = call!(
        app,
        TestRequest::post()
            .uri("/books")
            .insert_header(header::ContentType::json())
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
}

#[actix_web::test]
async fn test_smoke_endpoint() {
    let app = test_app!(AppState::in_memory(&test_config()));

    let (status, body) = call!(app, TestRequest::get().uri("/test"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("server API is working"));
}
