//! The Kernel: the beam lifecycle engine.
//!
//! Opens beams and drives them through their single terminal transition.
//! Every post-open operation checks, in order, that the beam exists, that
//! the caller is authorized, and that the beam is still pending.

use std::sync::Arc;

use beam_kernel_core::{
    Actor, Beam, BeamId, BeamMsg, BeamStatus, CancelBeam, ClaimBeam, ClaimSecret, CloseBeam,
    IdGenerator, IncreaseBeam, OpenBeam, RandomIdGenerator, Transition,
};
use beam_kernel_store::KvStore;
use tracing::{debug, error, info, warn};

use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use crate::locks::LockTable;
use crate::query::QueryService;
use crate::repository::BeamRepository;
use crate::transfer::{Account, ValueTransfer};

/// What a successfully handled message produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgOutcome {
    /// A beam was opened under this id.
    Opened(BeamId),
    /// The beam with this id was updated.
    Updated(BeamId),
}

/// Who may perform a terminal transition, and who gets paid.
enum Authority<'a> {
    Creator(&'a Actor),
    Secret { secret: &'a str, claimer: &'a Actor },
}

impl Authority<'_> {
    fn actor(&self) -> &Actor {
        match self {
            Authority::Creator(actor) => *actor,
            Authority::Secret { claimer, .. } => *claimer,
        }
    }

    fn permits(&self, beam: &Beam) -> bool {
        match self {
            Authority::Creator(actor) => beam.is_creator(actor),
            Authority::Secret { secret, .. } => beam.secret.matches(secret),
        }
    }

    fn payee(&self, beam: &Beam) -> Account {
        match self {
            Authority::Creator(_) => Account::Actor(beam.creator.clone()),
            Authority::Secret { claimer, .. } => Account::Actor(Actor::clone(claimer)),
        }
    }
}

/// The main Kernel struct.
///
/// Cheap to share behind an `Arc`; all operations take `&self`.
pub struct Kernel<S: KvStore, T: ValueTransfer> {
    /// The storage backend.
    store: Arc<S>,
    /// Beam records.
    repo: BeamRepository<Arc<S>>,
    /// Moves value out of escrow.
    transfer: Arc<T>,
    /// Candidate ids for open.
    ids: Box<dyn IdGenerator>,
    /// Per-beam serialization.
    locks: LockTable,
    /// Configuration.
    config: KernelConfig,
}

impl<S: KvStore, T: ValueTransfer> Kernel<S, T> {
    /// Create a new kernel instance.
    pub fn new(store: S, transfer: T, config: KernelConfig) -> Result<Self> {
        config.validate()?;
        let ids = RandomIdGenerator::new(config.id_length)
            .map_err(|e| KernelError::InvalidConfig(e.to_string()))?;
        let store = Arc::new(store);

        Ok(Self {
            repo: BeamRepository::new(store.clone()),
            store,
            transfer: Arc::new(transfer),
            ids: Box::new(ids),
            locks: LockTable::new(config.lock_stripes),
            config,
        })
    }

    /// Replace the identifier source.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    /// Get the transfer capability.
    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Get the beam repository.
    pub fn repository(&self) -> &BeamRepository<Arc<S>> {
        &self.repo
    }

    /// Get the configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// A read-only query service over the same store.
    pub fn query(&self) -> QueryService<Arc<S>> {
        QueryService::new(self.store.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate a message and route it to its operation.
    pub async fn handle(&self, msg: BeamMsg) -> Result<MsgOutcome> {
        debug!(kind = msg.kind(), beam_id = ?msg.beam_id(), "handling beam message");
        match msg {
            BeamMsg::Open(m) => self.open(m).await.map(MsgOutcome::Opened),
            BeamMsg::Increase(m) => {
                let id = m.id.clone();
                self.increase(m).await.map(|_| MsgOutcome::Updated(id))
            }
            BeamMsg::Close(m) => {
                let id = m.id.clone();
                self.close(m).await.map(|_| MsgOutcome::Updated(id))
            }
            BeamMsg::Cancel(m) => {
                let id = m.id.clone();
                self.cancel(m).await.map(|_| MsgOutcome::Updated(id))
            }
            BeamMsg::Claim(m) => {
                let id = m.id.clone();
                self.claim(m).await.map(|_| MsgOutcome::Updated(id))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a pending beam under a fresh identifier.
    ///
    /// Draws up to `max_id_attempts` candidates; each is checked and written
    /// while holding its lock, so two opens can never claim the same id.
    pub async fn open(&self, msg: OpenBeam) -> Result<BeamId> {
        msg.validate()?;

        for attempt in 1..=self.config.max_id_attempts {
            let id = self.ids.generate();
            let _guard = self.locks.lock(&id).await;

            if self.repo.has(&id).await? {
                debug!(beam_id = %id, attempt, "identifier collision, retrying");
                continue;
            }

            let secret = ClaimSecret::seal(&msg.secret, self.config.secret_mode);
            let beam = Beam::open(id.clone(), msg.creator.clone(), secret, msg.amount);
            self.repo.upsert(&beam).await?;

            info!(
                beam_id = %id,
                creator = %msg.creator,
                amount = %msg.amount,
                "opened beam"
            );
            return Ok(id);
        }

        warn!(
            attempts = self.config.max_id_attempts,
            creator = %msg.creator,
            "no free beam identifier"
        );
        Err(KernelError::ExhaustedIdentifierSpace {
            attempts: self.config.max_id_attempts,
        })
    }

    /// Add value to a pending beam. Creator only.
    pub async fn increase(&self, msg: IncreaseBeam) -> Result<Beam> {
        msg.validate()?;
        let _guard = self.locks.lock(&msg.id).await;

        let mut beam = self.load(&msg.id, Transition::Increase).await?;
        self.authorize(&beam, &Authority::Creator(&msg.updater), Transition::Increase)?;
        self.check_pending(&beam, Transition::Increase)?;

        let amount = beam.amount.checked_add(msg.amount).ok_or_else(|| {
            warn!(
                beam_id = %beam.id,
                amount = %beam.amount,
                increase = %msg.amount,
                "amount overflow"
            );
            KernelError::AmountOverflow {
                id: beam.id.clone(),
                amount: beam.amount,
                increase: msg.amount,
            }
        })?;
        beam.amount = amount;
        self.repo.upsert(&beam).await?;

        info!(
            beam_id = %beam.id,
            increase = %msg.amount,
            amount = %beam.amount,
            "increased beam"
        );
        Ok(beam)
    }

    /// Finalize a pending beam, releasing escrow to its creator.
    pub async fn close(&self, msg: CloseBeam) -> Result<Beam> {
        msg.validate()?;
        self.settle(&msg.id, Transition::Close, Authority::Creator(&msg.updater))
            .await
    }

    /// Cancel a pending beam, refunding escrow to its creator.
    pub async fn cancel(&self, msg: CancelBeam) -> Result<Beam> {
        msg.validate()?;
        self.settle(&msg.id, Transition::Cancel, Authority::Creator(&msg.updater))
            .await
    }

    /// Claim a pending beam with its secret, paying the claimer.
    pub async fn claim(&self, msg: ClaimBeam) -> Result<Beam> {
        msg.validate()?;
        let authority = Authority::Secret {
            secret: &msg.secret,
            claimer: &msg.claimer,
        };
        self.settle(&msg.id, Transition::Claim, authority).await
    }

    /// Run a terminal transition: check, transfer, then record.
    async fn settle(
        &self,
        id: &BeamId,
        transition: Transition,
        authority: Authority<'_>,
    ) -> Result<Beam> {
        let _guard = self.locks.lock(id).await;

        let mut beam = self.load(id, transition).await?;
        self.authorize(&beam, &authority, transition)?;
        let next = self.check_pending(&beam, transition)?;

        let payee = authority.payee(&beam);
        if let Err(source) = self
            .transfer
            .transfer(&Account::Escrow, &payee, beam.amount)
            .await
        {
            warn!(
                beam_id = %id,
                operation = %transition,
                payee = %payee,
                amount = %beam.amount,
                error = %source,
                "value transfer failed, beam left pending"
            );
            return Err(KernelError::TransferFailed {
                id: id.clone(),
                source,
            });
        }

        beam.status = next;
        if let Err(err) = self.repo.upsert(&beam).await {
            error!(
                beam_id = %id,
                operation = %transition,
                payee = %payee,
                amount = %beam.amount,
                error = %err,
                "transfer committed but beam write failed, needs reconciliation"
            );
            return Err(err);
        }

        info!(
            beam_id = %id,
            operation = %transition,
            status = %beam.status,
            payee = %payee,
            amount = %beam.amount,
            "settled beam"
        );
        Ok(beam)
    }

    async fn load(&self, id: &BeamId, transition: Transition) -> Result<Beam> {
        match self.repo.find(id).await? {
            Some(beam) => Ok(beam),
            None => {
                warn!(beam_id = %id, operation = %transition, "beam not found");
                Err(KernelError::NotFound(id.clone()))
            }
        }
    }

    fn authorize(
        &self,
        beam: &Beam,
        authority: &Authority<'_>,
        transition: Transition,
    ) -> Result<()> {
        if authority.permits(beam) {
            return Ok(());
        }
        warn!(
            beam_id = %beam.id,
            actor = %authority.actor(),
            operation = %transition,
            "unauthorized beam operation"
        );
        Err(KernelError::NotAuthorized {
            id: beam.id.clone(),
            actor: authority.actor().clone(),
            operation: transition,
        })
    }

    fn check_pending(&self, beam: &Beam, transition: Transition) -> Result<BeamStatus> {
        beam.status.apply(transition).ok_or_else(|| {
            warn!(
                beam_id = %beam.id,
                status = %beam.status,
                operation = %transition,
                "illegal transition"
            );
            KernelError::InvalidState {
                id: beam.id.clone(),
                status: beam.status,
                operation: transition,
            }
        })
    }
}
