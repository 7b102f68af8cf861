pub mod config;
pub mod store;
pub mod models;
pub mod services;
pub mod controllers;
pub mod middleware;
pub mod watcher;

use axum::{routing::get, Router};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use services::{
    auth::{MockAuthService, MockLatency},
    booking::BookingService,
    seat_map::SeatMapRegistry,
};
use store::{RedisClient, Store};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub store: Store,
    pub seat_maps: SeatMapRegistry,
    pub auth: MockAuthService,
    pub bookings: BookingService,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let store = match &config.redis.url {
            Some(url) => {
                let redis = RedisClient::new(url).await?;
                info!("Redis connected");
                Store::Redis(redis)
            }
            None => Store::memory(),
        };

        // Схемы залов строятся один раз при старте
        let mut rng = match config.seat_maps.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seat_maps = SeatMapRegistry::with_known_rooms(&mut rng)?;

        Ok(Arc::new(Self::with_parts(config, store, seat_maps)))
    }

    pub fn with_parts(config: config::Config, store: Store, seat_maps: SeatMapRegistry) -> Self {
        let latency = MockLatency::from(&config.auth);
        Self {
            auth: MockAuthService::new(store.clone(), latency),
            bookings: BookingService::new(store.clone()),
            config,
            store,
            seat_maps,
        }
    }
}

/// Главный роутер: служебные маршруты и API под `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
