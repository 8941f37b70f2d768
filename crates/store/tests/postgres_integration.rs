//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container and need a running Docker
//! daemon, so they are ignored by default. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use sqlx::PgPool;
use store::{
    EventEnvelope, FlightId, PostgresSeatStore, Seat, SeatClass, SeatId, SeatStore, SeatStoreExt,
    SeatType, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_seats_table.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresSeatStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE seats, outbox")
        .execute(&pool)
        .await
        .unwrap();

    PostgresSeatStore::new(pool)
}

fn create_test_seat(label: &str, flight_id: FlightId) -> Seat {
    Seat {
        id: SeatId::new(),
        label: label.to_string(),
        seat_type: SeatType::Aisle,
        seat_class: SeatClass::Business,
        flight_id,
        is_deleted: false,
    }
}

fn create_test_event(seat_id: SeatId) -> EventEnvelope {
    EventEnvelope::new(
        seat_id,
        "Seat",
        "SeatCreated",
        &serde_json::json!({"seat_id": seat_id}),
    )
    .unwrap()
}

fn flight() -> FlightId {
    FlightId::from_uuid(uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn insert_and_find_seat() {
    let store = get_test_store().await;
    let seat = create_test_seat("12A", flight());

    store
        .insert(seat.clone(), vec![create_test_event(seat.id)])
        .await
        .unwrap();

    let found = store.find_by_id(seat.id).await.unwrap();
    assert_eq!(found, Some(seat.clone()));
    assert!(store.seat_exists(seat.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_insert_maps_primary_key_violation() {
    let store = get_test_store().await;
    let seat = create_test_seat("12A", flight());

    store
        .insert(seat.clone(), vec![create_test_event(seat.id)])
        .await
        .unwrap();
    let result = store
        .insert(seat.clone(), vec![create_test_event(seat.id)])
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateSeat(id)) if id == seat.id));

    // The losing transaction rolled back its outbox row as well
    let events = store.events_for_seat(seat.id).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_inserts_with_same_id_have_one_winner() {
    let store = get_test_store().await;
    let seat = create_test_seat("7F", flight());

    let mut handles = Vec::new();
    for _ in 0..5 {
        let store = store.clone();
        let seat = seat.clone();
        handles.push(tokio::spawn(async move {
            let event = create_test_event(seat.id);
            store.insert(seat, vec![event]).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StoreError::DuplicateSeat(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(store.events_for_seat(seat.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn outbox_pending_and_dispatch() {
    let store = get_test_store().await;
    let flight_id = flight();

    let mut event_ids = Vec::new();
    for label in ["1A", "1B"] {
        let seat = create_test_seat(label, flight_id);
        let event = create_test_event(seat.id);
        event_ids.push(event.event_id);
        store.insert(seat, vec![event]).await.unwrap();
    }

    let pending = store.pending_events(10).await.unwrap();
    assert_eq!(
        pending.iter().map(|e| e.event_id).collect::<Vec<_>>(),
        event_ids
    );

    store.mark_dispatched(event_ids[0]).await.unwrap();

    let pending = store.pending_events(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].event_id, event_ids[1]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn list_by_flight_orders_by_label() {
    let store = get_test_store().await;
    let flight_id = flight();

    store
        .insert(create_test_seat("2C", flight_id), vec![])
        .await
        .unwrap();
    store
        .insert(create_test_seat("1A", flight_id), vec![])
        .await
        .unwrap();
    store
        .insert(create_test_seat("1A", flight()), vec![])
        .await
        .unwrap();

    let seats = store.list_by_flight(flight_id).await.unwrap();
    let labels: Vec<_> = seats.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["1A", "2C"]);
}
