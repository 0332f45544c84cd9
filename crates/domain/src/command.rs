//! Command handling infrastructure.

use std::marker::PhantomData;
use std::time::Instant;

use record_store::{Record, RecordStore, RecordStoreExt, StoreError, Version, Versioned};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::DomainError;

/// Number of attempts for a command that loses a version race.
const MAX_ATTEMPTS: u32 = 3;

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after applying the new events.
    pub aggregate: A,

    /// The aggregate as it was loaded, before the command ran.
    pub previous: A,

    /// The events that were generated and persisted.
    pub events: Vec<A::Event>,

    /// The stored version of the aggregate after the command.
    pub version: Version,
}

/// Trait for commands that can be executed against an aggregate.
///
/// Commands represent an intention to perform an action. They may be rejected
/// if the aggregate's current state doesn't allow the action.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> <Self::Aggregate as Record>::Id;
}

/// Handler for executing commands against aggregates.
///
/// The handler is responsible for:
/// 1. Loading the aggregate record from the store
/// 2. Executing the command to produce events
/// 3. Writing the folded state back with a compare-and-swap on the version
/// 4. Re-running the command against fresh state when the swap loses a race
pub struct CommandHandler<S, A>
where
    S: RecordStore,
    A: Aggregate,
{
    store: S,
    _phantom: PhantomData<A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: RecordStore,
    A: Aggregate,
    DomainError: From<A::Error>,
{
    /// Creates a new command handler with the given record store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an aggregate, returning None if it doesn't exist.
    pub async fn load(&self, id: A::Id) -> Result<Option<Versioned<A>>, DomainError> {
        Ok(self.store.get::<A>(id).await?)
    }

    /// Loads an aggregate, failing with `NotFound` if it doesn't exist.
    pub async fn load_existing(&self, id: A::Id) -> Result<Versioned<A>, DomainError> {
        self.load(id)
            .await?
            .ok_or_else(|| DomainError::not_found(A::LABEL, id))
    }

    /// Persists a freshly created aggregate at the first version.
    pub async fn create(&self, aggregate: A) -> Result<Versioned<A>, DomainError> {
        let stored = self.store.insert(aggregate).await?;
        tracing::debug!(kind = A::KIND, id = %stored.record.id(), "aggregate created");
        Ok(stored)
    }

    /// Executes a command and persists the resulting state.
    ///
    /// The command function receives the current aggregate state and returns
    /// either a list of events to apply, or an error. The function may run
    /// more than once: after a lost version race it is re-evaluated against
    /// the state the winner wrote.
    pub async fn execute<F>(&self, id: A::Id, command_fn: F) -> Result<CommandResult<A>, DomainError>
    where
        F: Fn(&A) -> Result<Vec<A::Event>, A::Error>,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let current = self.load_existing(id).await?;

            let events = command_fn(&current.record)?;

            if events.is_empty() {
                return Ok(CommandResult {
                    aggregate: current.record.clone(),
                    previous: current.record,
                    events,
                    version: current.version,
                });
            }

            let mut next = current.record.clone();
            next.apply_events(events.iter().cloned());

            match self.store.update(next, current.version).await {
                Ok(stored) => {
                    metrics::histogram!("lifecycle_transition_duration_seconds", "kind" => A::KIND)
                        .record(started.elapsed().as_secs_f64());
                    tracing::debug!(
                        kind = A::KIND,
                        %id,
                        version = %stored.version,
                        events = ?events.iter().map(DomainEvent::event_type).collect::<Vec<_>>(),
                        "command applied"
                    );
                    return Ok(CommandResult {
                        aggregate: stored.record,
                        previous: current.record,
                        events,
                        version: stored.version,
                    });
                }
                Err(StoreError::ConcurrencyConflict { actual, .. }) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(kind = A::KIND, %id, attempt, %actual, "version conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Writes `previous` back over the aggregate if it is still at `expected`.
    ///
    /// Used to undo a transition whose follow-up step failed.
    pub async fn restore(&self, previous: A, expected: Version) -> Result<Versioned<A>, DomainError> {
        Ok(self.store.update(previous, expected).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_store::InMemoryRecordStore;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    enum TestEvent {
        Opened,
        Closed { by: String },
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::Opened => "TestOpened",
                TestEvent::Closed { .. } => "TestClosed",
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Ticket {
        id: Uuid,
        open: bool,
        closed_by: Option<String>,
    }

    #[derive(Debug, thiserror::Error)]
    enum TicketError {
        #[error("already closed")]
        AlreadyClosed,
    }

    impl From<TicketError> for DomainError {
        fn from(e: TicketError) -> Self {
            DomainError::InvalidOperation(e.to_string())
        }
    }

    impl Record for Ticket {
        type Id = Uuid;
        const KIND: &'static str = "Ticket";

        fn id(&self) -> Uuid {
            self.id
        }
    }

    impl Aggregate for Ticket {
        type Event = TestEvent;
        type Error = TicketError;
        const LABEL: &'static str = "Ticket";

        fn apply(&mut self, event: Self::Event) {
            match event {
                TestEvent::Opened => self.open = true,
                TestEvent::Closed { by } => {
                    self.open = false;
                    self.closed_by = Some(by);
                }
            }
        }
    }

    impl Ticket {
        fn close(&self, by: &str) -> Result<Vec<TestEvent>, TicketError> {
            if !self.open {
                return Err(TicketError::AlreadyClosed);
            }
            Ok(vec![TestEvent::Closed { by: by.to_string() }])
        }
    }

    fn ticket() -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            open: true,
            closed_by: None,
        }
    }

    #[tokio::test]
    async fn create_then_execute_advances_version() {
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(InMemoryRecordStore::new());
        let created = handler.create(ticket()).await.unwrap();
        assert_eq!(created.version, Version::first());

        let result = handler
            .execute(created.record.id, |t| t.close("alice"))
            .await
            .unwrap();

        assert_eq!(result.version, Version::new(2));
        assert!(!result.aggregate.open);
        assert!(result.previous.open);
        assert_eq!(result.events.len(), 1);
    }

    #[tokio::test]
    async fn execute_on_missing_aggregate_is_not_found() {
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(InMemoryRecordStore::new());
        let result = handler.execute(Uuid::new_v4(), |t| t.close("alice")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn command_error_leaves_state_untouched() {
        let store = InMemoryRecordStore::new();
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(store);
        let created = handler.create(ticket()).await.unwrap();
        let id = created.record.id;

        handler.execute(id, |t| t.close("alice")).await.unwrap();
        let second = handler.execute(id, |t| t.close("bob")).await;
        assert!(second.is_err());

        let loaded = handler.load_existing(id).await.unwrap();
        assert_eq!(loaded.version, Version::new(2));
        assert_eq!(loaded.record.closed_by.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn empty_events_do_not_write() {
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(InMemoryRecordStore::new());
        let created = handler.create(ticket()).await.unwrap();

        let result = handler
            .execute(created.record.id, |_| Ok(vec![]))
            .await
            .unwrap();

        assert!(result.events.is_empty());
        assert_eq!(result.version, Version::first());
    }

    #[tokio::test]
    async fn concurrent_commands_have_single_winner() {
        let store = InMemoryRecordStore::new();
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(store.clone());
        let id = handler.create(ticket()).await.unwrap().record.id;

        let mut handles = Vec::new();
        for i in 0..8 {
            let handler: CommandHandler<_, Ticket> = CommandHandler::new(store.clone());
            handles.push(tokio::spawn(async move {
                let who = format!("user-{i}");
                handler.execute(id, |t| t.close(&who)).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(DomainError::InvalidOperation(_)) | Err(DomainError::Store(_)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn restore_rewinds_state() {
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(InMemoryRecordStore::new());
        let id = handler.create(ticket()).await.unwrap().record.id;

        let result = handler.execute(id, |t| t.close("alice")).await.unwrap();
        let restored = handler
            .restore(result.previous.clone(), result.version)
            .await
            .unwrap();

        assert!(restored.record.open);
        assert_eq!(restored.version, Version::new(3));
    }

    #[tokio::test]
    async fn restore_with_stale_version_conflicts() {
        let handler: CommandHandler<_, Ticket> = CommandHandler::new(InMemoryRecordStore::new());
        let id = handler.create(ticket()).await.unwrap().record.id;
        let result = handler.execute(id, |t| t.close("alice")).await.unwrap();

        let outcome = handler.restore(result.previous, Version::first()).await;
        assert!(matches!(
            outcome,
            Err(DomainError::Store(StoreError::ConcurrencyConflict { .. }))
        ));
    }
}
