//! Shared application state.

use domain::{
    DonationRequestService, LifecyclePolicy, Mailbox, RatingService, RecordItemCatalog,
    RecordRatingLedger, RecordUserDirectory, TradeRequestService,
};
use record_store::RecordStore;

pub type Catalog<S> = RecordItemCatalog<S>;
pub type Users<S> = RecordUserDirectory<S>;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub catalog: Catalog<S>,
    pub users: Users<S>,
    pub mailbox: Mailbox<S>,
    pub trades: TradeRequestService<S, Catalog<S>, Users<S>, Mailbox<S>>,
    pub donations: DonationRequestService<S, Catalog<S>, Users<S>, Mailbox<S>>,
    pub ratings: RatingService<S, Catalog<S>, RecordRatingLedger<S>>,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Wires every service over one record store.
    pub fn new(store: S, policy: LifecyclePolicy) -> Self {
        let catalog = RecordItemCatalog::new(store.clone());
        let users = RecordUserDirectory::new(store.clone());
        let mailbox = Mailbox::new(store.clone());

        Self {
            trades: TradeRequestService::new(
                store.clone(),
                catalog.clone(),
                users.clone(),
                mailbox.clone(),
                policy,
            ),
            donations: DonationRequestService::new(
                store.clone(),
                catalog.clone(),
                users.clone(),
                mailbox.clone(),
                policy,
            ),
            ratings: RatingService::new(
                store.clone(),
                catalog.clone(),
                RecordRatingLedger::new(store),
                policy,
            ),
            catalog,
            users,
            mailbox,
        }
    }
}
