use std::sync::Arc;

use cinema_booking::models::SeatStatus;
use cinema_booking::config::{AppConfig, AuthConfig, Config, RedisConfig, SeatMapConfig};
use cinema_booking::services::seat_map::SeatMapRegistry;
use cinema_booking::store::Store;
use cinema_booking::{app, AppState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            environment: "test".into(),
            rust_log: "off".into(),
        },
        redis: RedisConfig { url: None },
        auth: AuthConfig {
            login_delay_ms: 0,
            register_delay_ms: 0,
            profile_delay_ms: 0,
        },
        seat_maps: SeatMapConfig { seed: Some(2024) },
    }
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    state: Arc<AppState>,
}

impl TestServer {
    async fn start() -> Self {
        let registry = SeatMapRegistry::with_known_rooms(&mut StdRng::seed_from_u64(2024)).unwrap();
        let state = Arc::new(AppState::with_parts(test_config(), Store::memory(), registry));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn register(&self, username: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "popcorn42",
                "fullName": "Tran Thi B",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    fn first_seat_with(&self, room_id: i64, status: SeatStatus) -> String {
        self.state
            .seat_maps
            .get_by_room_id(room_id)
            .unwrap()
            .seats
            .iter()
            .find(|s| s.status == status)
            .unwrap()
            .id
            .clone()
    }

    /// Первое свободное место зала; при seed 2024 оно в ряду A.
    fn free_seat(&self, room_id: i64) -> String {
        self.first_seat_with(room_id, SeatStatus::Available)
    }

    fn occupied_seat(&self, room_id: i64) -> String {
        self.first_seat_with(room_id, SeatStatus::Occupied)
    }

    async fn post_booking(&self, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/bookings"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

fn booking_body(seats: &[&str]) -> Value {
    json!({
        "movieId": 3,
        "showtimeId": 77,
        "cinemaName": "PTIT Cinema",
        "movieTitle": "Interstellar",
        "date": "2026-10-20",
        "time": "20:00",
        "seats": seats,
        "totalPrice": 100000 * seats.len() as u64,
    })
}

#[tokio::test]
async fn health_and_seat_maps() {
    let server = TestServer::start().await;

    let health = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "OK");

    let resp = server.client.get(server.url("/api/rooms/2/seats")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let map: Value = resp.json().await.unwrap();
    assert_eq!(map["roomId"], 2);
    assert_eq!(map["rows"], 10);
    assert_eq!(map["seatsPerRow"], 14);
    assert_eq!(map["seats"].as_array().unwrap().len(), 140);

    let missing = server.client.get(server.url("/api/rooms/999/seats")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let rooms: Value = server
        .client
        .get(server.url("/api/rooms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms["rooms"], json!([1, 2, 3]));
}

#[tokio::test]
async fn quote_prices_selection() {
    let server = TestServer::start().await;
    let seat = server.free_seat(1);

    let resp = server
        .client
        .post(server.url("/api/rooms/1/quote"))
        .json(&json!({ "seats": [seat] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let quote: Value = resp.json().await.unwrap();
    assert_eq!(quote["totalPrice"], 100000);

    let unknown = server
        .client
        .post(server.url("/api/rooms/1/quote"))
        .json(&json!({ "seats": ["Z99"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let occupied = server
        .client
        .post(server.url("/api/rooms/1/quote"))
        .json(&json!({ "seats": [server.occupied_seat(1)] }))
        .send()
        .await
        .unwrap();
    assert_eq!(occupied.status(), StatusCode::CONFLICT);

    let missing_room = server
        .client
        .post(server.url("/api/rooms/999/quote"))
        .json(&json!({ "seats": ["A1"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_room.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn auth_flow() {
    let server = TestServer::start().await;
    let registered = server.register("thib").await;
    let token = registered["accessToken"].as_str().unwrap().to_string();

    let duplicate = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "username": "thib",
            "email": "other@example.com",
            "password": "popcorn42",
            "fullName": "Someone Else",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let login = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "usernameOrEmail": "thib@example.com", "password": "popcorn42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = login.json().await.unwrap();
    assert_eq!(body["user"]["username"], "thib");

    let bad = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "usernameOrEmail": "thib", "password": "nope-nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let profile: Value = server
        .client
        .get(server.url("/api/auth/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["email"], "thib@example.com");
    assert!(profile.get("passwordHash").is_none());

    let anonymous = server.client.get(server.url("/api/auth/profile")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_flow() {
    let server = TestServer::start().await;
    let owner = server.register("owner").await;
    let other = server.register("other").await;
    let owner_token = owner["accessToken"].as_str().unwrap();
    let other_token = other["accessToken"].as_str().unwrap();

    let unauthenticated = server
        .client
        .post(server.url("/api/bookings"))
        .json(&booking_body(&["A1"]))
        .send()
        .await
        .unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let created = server
        .client
        .post(server.url("/api/bookings"))
        .bearer_auth(owner_token)
        .json(&booking_body(&["A1", "A2"]))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let booking: Value = created.json().await.unwrap();
    let id = booking["id"].as_str().unwrap().to_string();
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["userId"], owner["user"]["id"]);
    assert_eq!(booking["qrCode"], format!("PTIT_CINEMA_{}", id));

    let fetched: Value = server
        .client
        .get(server.url(&format!("/api/bookings/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, booking);

    let mine: Value = server
        .client
        .get(server.url("/api/bookings"))
        .bearer_auth(owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let theirs: Value = server
        .client
        .get(server.url("/api/bookings"))
        .bearer_auth(other_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(theirs.as_array().unwrap().is_empty());

    let forbidden = server
        .client
        .patch(server.url("/api/bookings/cancel"))
        .bearer_auth(other_token)
        .json(&json!({ "bookingId": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let cancelled: Value = server
        .client
        .patch(server.url("/api/bookings/cancel"))
        .bearer_auth(owner_token)
        .json(&json!({ "bookingId": id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled["status"], "cancelled");

    let missing = server
        .client
        .get(server.url("/api/bookings/BK0MISSING"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_with_room_is_priced_by_seat_map() {
    let server = TestServer::start().await;
    let user = server.register("pricer").await;
    let token = user["accessToken"].as_str().unwrap();
    let seat = server.free_seat(3);

    let mut body = booking_body(&[seat.as_str()]);
    body["roomId"] = json!(3);
    body["totalPrice"] = json!(1);

    let booking: Value = server
        .client
        .post(server.url("/api/bookings"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(booking["totalPrice"], 100000);
}

#[tokio::test]
async fn booking_with_room_rejects_bad_selections() {
    let server = TestServer::start().await;
    let user = server.register("picky").await;
    let token = user["accessToken"].as_str().unwrap();

    let mut occupied = booking_body(&[server.occupied_seat(2).as_str()]);
    occupied["roomId"] = json!(2);
    assert_eq!(
        server.post_booking(token, &occupied).await.status(),
        StatusCode::CONFLICT
    );

    let mut unknown_seat = booking_body(&["Z42"]);
    unknown_seat["roomId"] = json!(2);
    assert_eq!(
        server.post_booking(token, &unknown_seat).await.status(),
        StatusCode::BAD_REQUEST
    );

    let free = server.free_seat(2);
    let mut duplicate = booking_body(&[free.as_str(), free.as_str()]);
    duplicate["roomId"] = json!(2);
    assert_eq!(
        server.post_booking(token, &duplicate).await.status(),
        StatusCode::BAD_REQUEST
    );

    let mut unknown_room = booking_body(&[free.as_str()]);
    unknown_room["roomId"] = json!(999);
    assert_eq!(
        server.post_booking(token, &unknown_room).await.status(),
        StatusCode::NOT_FOUND
    );

    let no_seats = booking_body(&[]);
    assert_eq!(
        server.post_booking(token, &no_seats).await.status(),
        StatusCode::BAD_REQUEST
    );

    // ни одна отклоненная бронь не сохранилась
    let mine: Value = server
        .client
        .get(server.url("/api/bookings"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.as_array().unwrap().is_empty());
}
