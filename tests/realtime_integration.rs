//! Integration tests for the real-time broadcast layer.
//!
//! These tests verify the end-to-end flow:
//! 1. A service commits a write and emits exactly one envelope per
//!    changed record
//! 2. The in-memory bus hands the record to the broadcast hub
//! 3. The hub fans the envelope out to every matching session queue
//! 4. A disconnected client catches up by refetching over REST and
//!    resyncing its local lists
//!
//! Uses the in-memory store and bus, so no external dependencies.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;

use barberflow::adapters::events::{IdempotentHandler, InMemoryEventBus, InMemoryProcessedEventStore};
use barberflow::adapters::email::BookingNotifier;
use barberflow::adapters::realtime::{BroadcastHub, Subscription};
use barberflow::adapters::store::InMemoryStore;
use barberflow::application::{AppointmentService, EventProducer, InventoryService, SalesService};
use barberflow::client::{inventory_delta, Reconciler};
use barberflow::domain::appointment::{
    AgeGroup, AppointmentDraft, AppointmentStatus, CustomerType, PaymentMethod, PaymentStatus,
    ServiceSnapshot,
};
use barberflow::domain::events::{Envelope, EventKind, EventRecord, Verb, ALL_EVENT_KINDS};
use barberflow::domain::foundation::{DomainError, ErrorCode};
use barberflow::domain::inventory::{InventoryDraft, StockStatus};
use barberflow::domain::user::{Role, User, UserDraft, UserStatus};
use barberflow::ports::{
    EmailMessage, EventPublisher, EventSubscriber, Mailer, UserRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// One wired slice of the backend: store, bus, hub, and the services
/// the tests exercise.
struct TestApp {
    store: Arc<InMemoryStore>,
    bus: Arc<InMemoryEventBus>,
    hub: Arc<BroadcastHub>,
    inventory: InventoryService,
    sales: SalesService,
    appointments: AppointmentService,
}

impl TestApp {
    fn new(queue_capacity: usize) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let hub = Arc::new(BroadcastHub::new(queue_capacity));
        bus.subscribe_all(ALL_EVENT_KINDS, hub.clone());

        let producer = EventProducer::new(bus.clone());
        Self {
            inventory: InventoryService::new(store.clone(), producer.clone()),
            sales: SalesService::new(store.clone(), store.clone(), producer.clone()),
            appointments: AppointmentService::new(store.clone(), producer),
            store,
            bus,
            hub,
        }
    }
}

/// Mailer that records every message it is asked to send.
struct RecordingMailer {
    sent: AtomicUsize,
}

impl RecordingMailer {
    fn new() -> Self {
        Self {
            sent: AtomicUsize::new(0),
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, _message: EmailMessage) -> Result<(), DomainError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn inventory_draft(name: &str, quantity: u32, price: f64) -> InventoryDraft {
    InventoryDraft {
        name: name.to_string(),
        quantity,
        price,
    }
}

fn appointment_draft(owner: Option<&str>) -> AppointmentDraft {
    AppointmentDraft {
        name: "Ram Shrestha".to_string(),
        email: "ram@example.com".to_string(),
        phone: "9800000000".to_string(),
        barber: "Sujan".to_string(),
        service: ServiceSnapshot::new("Haircut", 300.0).unwrap(),
        schedule: "2026-09-01T10:30:00Z".to_string(),
        customer_type: CustomerType::default(),
        age_group: AgeGroup::default(),
        payment_method: PaymentMethod::default(),
        payment_status: PaymentStatus::default(),
        status: AppointmentStatus::default(),
        my_id: owner.map(str::to_string),
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

/// A committed write reaches every connected session exactly once.
#[tokio::test]
async fn committed_write_reaches_every_session() {
    let app = TestApp::new(8);
    let (_a, mut rx_a) = app.hub.register(Subscription::all()).await;
    let (_b, mut rx_b) = app.hub.register(Subscription::all()).await;

    let item = app
        .inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    for rx in [&mut rx_a, &mut rx_b] {
        match rx.try_recv().unwrap() {
            Envelope::InventoryUpdate(got) => assert_eq!(got.id, item.id),
            other => panic!("unexpected envelope: {other:?}"),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}

/// A rejected write produces an HTTP-mappable error and zero envelopes.
#[tokio::test]
async fn rejected_write_broadcasts_nothing() {
    let app = TestApp::new(8);
    let (_id, mut rx) = app.hub.register(Subscription::all()).await;

    let err = app
        .inventory
        .create(inventory_draft("   ", 10, 50.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(app.bus.event_count(), 0);
}

/// Selling broadcasts both sides of the write, in order: the new sale
/// record, then the reduced inventory item.
#[tokio::test]
async fn sale_broadcasts_sale_then_inventory() {
    let app = TestApp::new(8);
    let item = app
        .inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    let (_id, mut rx) = app.hub.register(Subscription::all()).await;
    app.sales.sell(item.id, 2).await.unwrap();

    match rx.try_recv().unwrap() {
        Envelope::SaleUpdate(sale) => {
            assert_eq!(sale.quantity, 2);
            assert_eq!(sale.price, 50.0);
            assert_eq!(sale.inventory_id, item.id);
        }
        other => panic!("unexpected envelope: {other:?}"),
    }
    match rx.try_recv().unwrap() {
        Envelope::InventoryUpdate(updated) => {
            assert_eq!(updated.quantity, 8);
            assert_eq!(updated.status, StockStatus::InStock);
        }
        other => panic!("unexpected envelope: {other:?}"),
    }
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// Overselling is rejected without touching the store or the stream.
#[tokio::test]
async fn overdraw_returns_error_and_no_envelopes() {
    let app = TestApp::new(8);
    let item = app
        .inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    let (_id, mut rx) = app.hub.register(Subscription::all()).await;
    let err = app.sales.sell(item.id, 20).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    let stored = app.inventory.get(item.id).await.unwrap();
    assert_eq!(stored.quantity, 10);
    assert!(app.sales.list().await.unwrap().is_empty());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// A client that missed envelopes while disconnected converges by
/// refetching over REST and resyncing its local list.
#[tokio::test]
async fn reconnect_resync_recovers_missed_changes() {
    let app = TestApp::new(8);
    let item = app
        .inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    let (id, mut rx) = app.hub.register(Subscription::all()).await;
    let mut view: Reconciler<_> = Reconciler::new();
    view.resync(app.inventory.list().await.unwrap());

    // Connected: the 10 -> 7 update arrives live.
    app.sales.sell(item.id, 3).await.unwrap();
    while let Ok(envelope) = rx.try_recv() {
        if let Some(delta) = inventory_delta(&envelope) {
            view.apply(delta);
        }
    }
    assert_eq!(view.items()[0].quantity, 7);

    // Disconnected: the 7 -> 5 update is missed.
    app.hub.unregister(&id).await;
    app.sales.sell(item.id, 2).await.unwrap();
    assert_eq!(view.items()[0].quantity, 7);

    // Reconnect: resync replaces the stale list with server truth.
    let (_id, _rx) = app.hub.register(Subscription::all()).await;
    view.resync(app.inventory.list().await.unwrap());
    assert_eq!(view.items()[0].quantity, 5);
    assert_eq!(view.items()[0].status, StockStatus::InStock);
}

/// A session that stops draining is evicted; other sessions keep
/// receiving everything.
#[tokio::test]
async fn slow_session_is_evicted_without_blocking_others() {
    let app = TestApp::new(2);
    let (slow, mut slow_rx) = app.hub.register(Subscription::all()).await;
    let (healthy, mut healthy_rx) = app.hub.register(Subscription::all()).await;

    // The healthy session drains after every write; the slow one never
    // does, so its queue fills at two and the third write evicts it.
    for i in 0..3 {
        app.inventory
            .create(inventory_draft(&format!("Item {i}"), 10, 5.0))
            .await
            .unwrap();
        assert!(healthy_rx.try_recv().is_ok());
    }

    assert!(!app.hub.is_registered(&slow).await);
    assert!(app.hub.is_registered(&healthy).await);

    // The slow session drains what fit, then sees its queue close.
    assert!(slow_rx.recv().await.is_some());
    assert!(slow_rx.recv().await.is_some());
    assert!(slow_rx.recv().await.is_none());
}

/// Owner-scoped sessions only see appointment envelopes carrying their
/// own correlation id; shop-global resources still come through.
#[tokio::test]
async fn owner_scoped_stream_filters_foreign_appointments() {
    let app = TestApp::new(8);
    let (_id, mut rx) = app
        .hub
        .register(Subscription::all().with_owner("client-1"))
        .await;

    app.appointments
        .create(appointment_draft(Some("client-2")))
        .await
        .unwrap();
    let mine = app
        .appointments
        .create(appointment_draft(Some("client-1")))
        .await
        .unwrap();
    app.inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    match rx.try_recv().unwrap() {
        Envelope::AppointmentUpdate(appt) => assert_eq!(appt.id, mine.id),
        other => panic!("unexpected envelope: {other:?}"),
    }
    // Non-appointment resources are not owner-scoped.
    assert!(matches!(
        rx.try_recv().unwrap(),
        Envelope::InventoryUpdate(_)
    ));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// A redelivered booking event results in exactly one email.
#[tokio::test]
async fn redelivered_booking_event_sends_one_email() {
    let app = TestApp::new(8);

    let barber = User::create(UserDraft {
        name: "Sujan Thapa".to_string(),
        email: "sujan@example.com".to_string(),
        phone: "9811111111".to_string(),
        role: Role::Barber,
        status: UserStatus::Active,
        position: None,
        experience: None,
        image: None,
    })
    .unwrap();
    UserRepository::save(app.store.as_ref(), &barber)
        .await
        .unwrap();

    let mailer = Arc::new(RecordingMailer::new());
    let notifier = BookingNotifier::new(app.store.clone(), mailer.clone());
    let processed = Arc::new(InMemoryProcessedEventStore::new());
    app.bus.subscribe(
        EventKind::AppointmentUpdate,
        Arc::new(IdempotentHandler::new(notifier, processed)),
    );

    let appointment = app
        .appointments
        .create(appointment_draft(Some("client-1")))
        .await
        .unwrap();
    assert_eq!(mailer.sent_count(), 1);

    // Redeliver the same record (same event id) straight through the bus.
    let record = app
        .bus
        .events_of_kind(EventKind::AppointmentUpdate)
        .into_iter()
        .next()
        .unwrap();
    app.bus.publish(record).await.unwrap();
    assert_eq!(mailer.sent_count(), 1);

    // A genuinely new booking still notifies.
    let _other = app
        .appointments
        .create(appointment_draft(Some("client-2")))
        .await
        .unwrap();
    assert_eq!(mailer.sent_count(), 2);

    // Updates to an existing booking never re-notify.
    app.appointments
        .update(appointment.id, appointment_draft(Some("client-1")))
        .await
        .unwrap();
    assert_eq!(mailer.sent_count(), 2);
}

/// The event record wraps the same envelope shape clients receive.
#[tokio::test]
async fn bus_records_and_session_frames_carry_the_same_envelope() {
    let app = TestApp::new(8);
    let (_id, mut rx) = app.hub.register(Subscription::all()).await;

    let item = app
        .inventory
        .create(inventory_draft("Pomade", 10, 50.0))
        .await
        .unwrap();

    let record: EventRecord = app
        .bus
        .events_of_kind(EventKind::InventoryUpdate)
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(record.verb, Verb::Created);

    let frame = rx.try_recv().unwrap();
    assert_eq!(frame, record.envelope);
    assert_eq!(frame, Envelope::InventoryUpdate(item));
}
