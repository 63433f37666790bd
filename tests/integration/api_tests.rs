//! API integration tests against a running server (with a migrated database)

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so reruns against the same database do not collide
fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}_{}", prefix, nanos % 1_000_000_000_000)
}

/// Register a fresh user and return (token, user)
async fn register(client: &Client, username: &str, password: &str) -> (String, Value) {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, body["user"].clone())
}

async fn create_book(client: &Client, token: &str, title: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "author": "Ursula K. Le Guin",
            "year": 1969,
            "isbn": "978-0-441-47812-5",
            "page_count": 304
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let username = unique("alice");

    let (_, user) = register(&client, &username, "secret1").await;
    assert_eq!(user["username"], username.as_str());
    assert_eq!(user["nickname"], username.as_str());

    let wrong = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "secret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(ok.headers().get("set-cookie").is_some());

    let body: Value = ok.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // Duplicate username
    let duplicate = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "username": username, "password": "another1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_cookie_session() {
    let client = Client::builder().cookie_store(true).build().expect("client");
    let username = unique("cookie");

    register(&client, &username, "secret1").await;

    // No Authorization header: the cookie set on register carries the session
    let me = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(me.status(), StatusCode::OK);

    client
        .post(format!("{}/auth/logout", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let after = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_forged_token_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth("eyJhbGciOiJIUzI1NiJ9.eyJ1c2VyX2lkIjoxfQ.forged")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("books"), "secret1").await;

    let created = create_book(&client, &token, "The Left Hand of Darkness").await;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["isbn"], "9780441478125");

    // Get equals what was created
    let fetched: Value = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fetched["title"], created["title"]);
    assert_eq!(fetched["author"], created["author"]);
    assert_eq!(fetched["year"], 1969);
    assert_eq!(fetched["genres"], json!([]));

    // Partial update leaves other fields alone
    let updated: Value = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "year": 1970 }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(updated["year"], 1970);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["page_count"], 304);

    // Validation
    let invalid = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "", "author": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let deleted = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_genre_duplicate_and_cascade() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("genres"), "secret1").await;
    let name = unique("Fantasy");

    let genre: Value = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let genre_id = genre["id"].as_i64().expect("id");

    let duplicate = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Case-sensitive: a different case is a different genre
    let other_case = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name.to_uppercase() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(other_case.status(), StatusCode::CREATED);

    let book = create_book(&client, &token, "A Wizard of Earthsea").await;
    let book_id = book["id"].as_i64().expect("id");

    let assigned = client
        .post(format!("{}/books/{}/genres", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "genre_id": genre_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(assigned.status(), StatusCode::NO_CONTENT);

    let in_genre: Value = client
        .get(format!("{}/genres/{}/books", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(in_genre["total"], 1);

    // Deleting the book removes its genre links
    client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    let after: Value = client
        .get(format!("{}/genres/{}/books", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(after["total"], 0);
}

#[tokio::test]
#[ignore]
async fn test_reading_list_ownership() {
    let client = Client::new();
    let (owner, _) = register(&client, &unique("owner"), "secret1").await;
    let (intruder, _) = register(&client, &unique("intruder"), "secret1").await;

    let book = create_book(&client, &owner, "The Dispossessed").await;
    let book_id = book["id"].as_i64().expect("id");

    let list: Value = client
        .post(format!("{}/reading-lists", BASE_URL))
        .bearer_auth(&owner)
        .json(&json!({ "name": "Summer" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let list_id = list["id"].as_i64().expect("id");
    assert_eq!(list["is_public"], false);

    let added = client
        .post(format!("{}/reading-lists/{}/books", BASE_URL, list_id))
        .bearer_auth(&owner)
        .json(&json!({ "book_id": book_id, "position": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(added.status(), StatusCode::NO_CONTENT);

    let with_books: Value = client
        .get(format!("{}/reading-lists/{}", BASE_URL, list_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(with_books["books"][0]["book"]["id"], book_id);
    assert_eq!(with_books["books"][0]["position"], 0);

    // Private list is hidden from others, and they cannot change it
    let hidden = client
        .get(format!("{}/reading-lists/{}", BASE_URL, list_id))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    let forbidden = client
        .put(format!("{}/reading-lists/{}", BASE_URL, list_id))
        .bearer_auth(&intruder)
        .json(&json!({ "name": "Mine now" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let forbidden_delete = client
        .delete(format!("{}/reading-lists/{}", BASE_URL, list_id))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(forbidden_delete.status(), StatusCode::FORBIDDEN);

    let removed = client
        .delete(format!("{}/reading-lists/{}/books", BASE_URL, list_id))
        .bearer_auth(&owner)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let emptied: Value = client
        .get(format!("{}/reading-lists/{}", BASE_URL, list_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(emptied["books"], json!([]));
}

#[tokio::test]
#[ignore]
async fn test_reading_status_and_pagination() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("reader"), "secret1").await;

    let mut ids = Vec::new();
    for i in 0..12 {
        let book = create_book(&client, &token, &format!("Read book {}", i)).await;
        ids.push(book["id"].as_i64().expect("id"));
    }

    for id in &ids {
        let response = client
            .put(format!("{}/user-books/{}", BASE_URL, id))
            .bearer_auth(&token)
            .json(&json!({ "status": "reading" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);

        // Second set replaces the first
        let response = client
            .put(format!("{}/user-books/{}", BASE_URL, id))
            .bearer_auth(&token)
            .json(&json!({ "status": "read" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let page: Value = client
        .get(format!("{}/user-books/read?page=1&limit=10", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(page["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(page["total"], 12);
    assert_eq!(page["total_pages"], 2);

    let stats: Value = client
        .get(format!("{}/user-books/stats", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(stats, json!([{ "status": "read", "count": 12 }]));

    let unknown_book = client
        .put(format!("{}/user-books/{}", BASE_URL, i32::MAX))
        .bearer_auth(&token)
        .json(&json!({ "status": "read" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(unknown_book.status(), StatusCode::NOT_FOUND);
}

async fn create_list(client: &Client, token: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/reading-lists", BASE_URL))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

async fn get_json(client: &Client, token: &str, url: String) -> Value {
    client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

#[tokio::test]
#[ignore]
async fn test_list_positions_and_book_delete_cascade() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("lister"), "secret1").await;
    let first = create_book(&client, &token, "Rocannon's World").await;
    let second = create_book(&client, &token, "Planet of Exile").await;

    let list: Value = create_list(&client, &token, json!({ "name": "Hainish" }))
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let list_id = list["id"].as_i64().expect("id");

    // Without a position each book goes after the last one
    for book in [&first, &second] {
        let added = client
            .post(format!("{}/reading-lists/{}/books", BASE_URL, list_id))
            .bearer_auth(&token)
            .json(&json!({ "book_id": book["id"] }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(added.status(), StatusCode::NO_CONTENT);
    }

    let with_books = get_json(&client, &token, format!("{}/reading-lists/{}", BASE_URL, list_id)).await;
    assert_eq!(with_books["books"][0]["book"]["id"], first["id"]);
    assert_eq!(with_books["books"][0]["position"], 0);
    assert_eq!(with_books["books"][1]["book"]["id"], second["id"]);
    assert_eq!(with_books["books"][1]["position"], 1);

    let deleted = client
        .delete(format!("{}/books/{}", BASE_URL, first["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let after = get_json(&client, &token, format!("{}/reading-lists/{}", BASE_URL, list_id)).await;
    let books = after["books"].as_array().expect("books");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["book"]["id"], second["id"]);
}

#[tokio::test]
#[ignore]
async fn test_create_list_with_unknown_book_rolls_back() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("atomic"), "secret1").await;
    let book = create_book(&client, &token, "The Lathe of Heaven").await;

    let response = create_list(
        &client,
        &token,
        json!({ "name": "Broken", "book_ids": [book["id"], i32::MAX] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NotFound");

    let mine = get_json(&client, &token, format!("{}/reading-lists", BASE_URL)).await;
    assert_eq!(mine, json!([]));

    let created = create_list(&client, &token, json!({ "name": "Works", "book_ids": [book["id"]] })).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let mine = get_json(&client, &token, format!("{}/reading-lists", BASE_URL)).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_set_genres_replaces_and_rolls_back() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("tagger"), "secret1").await;
    let book = create_book(&client, &token, "The Word for World Is Forest").await;
    let book_id = book["id"].as_i64().expect("id");

    let mut genre_ids = Vec::new();
    for name in ["Novella", "Ecology", "War"] {
        let genre: Value = client
            .post(format!("{}/genres", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({ "name": unique(name) }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        genre_ids.push(genre["id"].as_i64().expect("id"));
    }

    let set = |ids: Vec<i64>| {
        client
            .put(format!("{}/books/{}/genres", BASE_URL, book_id))
            .bearer_auth(&token)
            .json(&json!({ "genre_ids": ids }))
            .send()
    };

    let first = set(vec![genre_ids[0], genre_ids[1]]).await.expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::OK);

    let replaced: Value = set(vec![genre_ids[2]])
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let ids: Vec<i64> = replaced
        .as_array()
        .expect("genres")
        .iter()
        .filter_map(|g| g["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![genre_ids[2]]);

    // An unknown genre aborts the whole replacement
    let rejected = set(vec![genre_ids[0], i64::from(i32::MAX)])
        .await
        .expect("Failed to send request");
    assert_eq!(rejected.status(), StatusCode::NOT_FOUND);

    let kept = get_json(&client, &token, format!("{}/books/{}/genres", BASE_URL, book_id)).await;
    let ids: Vec<i64> = kept
        .as_array()
        .expect("genres")
        .iter()
        .filter_map(|g| g["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![genre_ids[2]]);
}

#[tokio::test]
#[ignore]
async fn test_deleted_account_token_cannot_write() {
    let client = Client::new();
    let (token, _) = register(&client, &unique("leaver"), "secret1").await;
    let (other, _) = register(&client, &unique("stayer"), "secret1").await;
    let book = create_book(&client, &other, "Always Coming Home").await;

    let deleted = client
        .delete(format!("{}/auth/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let status = client
        .put(format!("{}/user-books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .json(&json!({ "status": "read" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(status.status(), StatusCode::UNAUTHORIZED);

    let list = create_list(&client, &token, json!({ "name": "Orphan" })).await;
    assert_eq!(list.status(), StatusCode::UNAUTHORIZED);
}
