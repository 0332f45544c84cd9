use common::{ItemId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AcceptDonationRequest, AcceptTradeRequest, Aggregate, CompleteDonationRequest,
    CreateDonationRequest, CreateTradeRequest, DonationItem, DonationRequestService, Item,
    ItemCatalog, LifecyclePolicy, Mailbox, Money, RecordItemCatalog, RecordUserDirectory,
    TradeRequest, TradeRequestEvent, TradeRequestService,
};
use record_store::{InMemoryRecordStore, Record};

type Store = InMemoryRecordStore;

fn trade_service(
    store: &Store,
) -> TradeRequestService<Store, RecordItemCatalog<Store>, RecordUserDirectory<Store>, Mailbox<Store>>
{
    TradeRequestService::new(
        store.clone(),
        RecordItemCatalog::new(store.clone()),
        RecordUserDirectory::new(store.clone()),
        Mailbox::new(store.clone()),
        LifecyclePolicy::default(),
    )
}

fn donation_service(
    store: &Store,
) -> DonationRequestService<Store, RecordItemCatalog<Store>, RecordUserDirectory<Store>, Mailbox<Store>>
{
    DonationRequestService::new(
        store.clone(),
        RecordItemCatalog::new(store.clone()),
        RecordUserDirectory::new(store.clone()),
        Mailbox::new(store.clone()),
        LifecyclePolicy::default(),
    )
}

fn bench_trade_create_accept(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryRecordStore::new();
    let service = trade_service(&store);
    let owner = UserId::new();
    let item = rt.block_on(async {
        RecordItemCatalog::new(store.clone())
            .add_item(Item::new(owner, "Bench guitar", Money::from_dollars(300)))
            .await
            .unwrap()
    });

    c.bench_function("lifecycle/trade_create_accept", |b| {
        b.iter(|| {
            rt.block_on(async {
                let request = service
                    .create(CreateTradeRequest::new(item.id, UserId::new()))
                    .await
                    .unwrap();
                service
                    .accept(AcceptTradeRequest::new(request.id(), owner))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_donation_full_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("lifecycle/donation_create_accept_complete", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryRecordStore::new();
                let service = donation_service(&store);
                let donor = UserId::new();
                let requester = UserId::new();
                let donation = RecordItemCatalog::new(store.clone())
                    .add_donation_item(DonationItem::new(donor, "Bench lamp"))
                    .await
                    .unwrap();

                let request = service
                    .create(CreateDonationRequest::new(donation.id, requester))
                    .await
                    .unwrap();
                service
                    .accept(AcceptDonationRequest::new(request.id(), donor))
                    .await
                    .unwrap();
                service
                    .complete(CompleteDonationRequest::new(request.id(), requester))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_detailed_view(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryRecordStore::new();
    let service = trade_service(&store);
    let owner = UserId::new();

    // Pre-populate: 10 items with 5 offers each
    rt.block_on(async {
        let catalog = RecordItemCatalog::new(store.clone());
        for n in 0..10 {
            let item = catalog
                .add_item(Item::new(owner, format!("Item {n}"), Money::from_dollars(n)))
                .await
                .unwrap();
            for _ in 0..5 {
                service
                    .create(CreateTradeRequest::new(item.id, UserId::new()))
                    .await
                    .unwrap();
            }
        }
    });

    c.bench_function("lifecycle/detailed_view_50_requests", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.detailed_view(owner, Some("pending")).await.unwrap();
            });
        });
    });
}

fn bench_event_fold(c: &mut Criterion) {
    let (request, _) =
        TradeRequest::create(&CreateTradeRequest::new(ItemId::new(), UserId::new()))
            .unwrap();
    let approver = UserId::new();

    c.bench_function("lifecycle/fold_accept_event", |b| {
        b.iter(|| {
            let mut next = request.clone();
            next.apply(TradeRequestEvent::accepted(approver, None));
        });
    });
}

criterion_group!(
    benches,
    bench_trade_create_accept,
    bench_donation_full_cycle,
    bench_detailed_view,
    bench_event_fold,
);
criterion_main!(benches);
