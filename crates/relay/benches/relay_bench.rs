use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use domain::{
    DomainEvent, FlightId, InMemoryEventBus, SeatClass, SeatCreated, SeatId, SeatType, create_seat,
};
use relay::OutboxRelay;
use store::{InMemorySeatStore, SeatStore};

async fn fill_outbox(store: &InMemorySeatStore, count: usize) {
    let flight_id = FlightId::from_uuid(uuid::Uuid::new_v4());
    for i in 0..count {
        let seat = create_seat(
            SeatId::new(),
            format!("{}A", i + 1),
            SeatType::Window,
            SeatClass::Economy,
            flight_id,
        );
        let envelope = SeatCreated::from_seat(&seat, chrono::Utc::now())
            .to_envelope()
            .unwrap();
        store.insert(seat, vec![envelope]).await.unwrap();
    }
}

fn bench_drain(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("relay/drain");

    for count in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                rt.block_on(async {
                    let store = InMemorySeatStore::new();
                    fill_outbox(&store, count).await;
                    let relay = OutboxRelay::new(store, InMemoryEventBus::new());
                    relay.drain(50).await.unwrap();
                });
            });
        });
    }

    group.finish();
}

fn bench_empty_pass(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let relay = OutboxRelay::new(InMemorySeatStore::new(), InMemoryEventBus::new());

    c.bench_function("relay/empty_pass", |b| {
        b.iter(|| rt.block_on(async { relay.run_once(100).await.unwrap() }));
    });
}

criterion_group!(benches, bench_drain, bench_empty_pass);
criterion_main!(benches);
