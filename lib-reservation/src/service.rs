//! Reservation Service
//!
//! Shares one registry between concurrent callers. Every mutating call
//! holds the write lock for its whole duration, so callers never observe
//! a half-applied operation. The service also plays the execution
//! environment: it stamps calls with the clock and moves attached value
//! into custody before a bid, returning or crediting it if the bid fails.

use std::sync::Arc;

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::{Address, Amount, ReservationId};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::registry::ReservationRegistry;
use crate::snapshot::{RegistrySnapshot, SnapshotResult};
use crate::types::{ApprovalState, SaleReceipt, Transferrable};

pub struct ReservationService<N: AssetLedger, T: TokenLedger> {
    registry: Arc<RwLock<ReservationRegistry<N, T>>>,
    clock: Arc<dyn Clock>,
}

impl<N: AssetLedger, T: TokenLedger> Clone for ReservationService<N, T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<N: AssetLedger, T: TokenLedger> ReservationService<N, T> {
    pub fn new(registry: ReservationRegistry<N, T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            clock,
        }
    }

    fn context(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.clock.now())
    }

    // ------------------------------------------------------------------------
    // Reservations
    // ------------------------------------------------------------------------

    pub async fn reserve_user(
        &self,
        caller: Address,
        name: &str,
        key: &str,
    ) -> RegistryResult<ReservationId> {
        let mut registry = self.registry.write().await;
        registry.reserve_user(self.context(caller), name, key)
    }

    pub async fn reserve_dapp(
        &self,
        caller: Address,
        name: &str,
        key: &str,
    ) -> RegistryResult<ReservationId> {
        let mut registry = self.registry.write().await;
        registry.reserve_dapp(self.context(caller), name, key)
    }

    pub async fn force_reserved_names(
        &self,
        caller: Address,
        names: &[&str],
    ) -> RegistryResult<usize> {
        let mut registry = self.registry.write().await;
        registry.force_reserved_names(self.context(caller), names)
    }

    pub async fn dapp_decision(
        &self,
        caller: Address,
        id: ReservationId,
        approve: bool,
    ) -> RegistryResult<ApprovalState> {
        let mut registry = self.registry.write().await;
        registry.dapp_decision(self.context(caller), id, approve)
    }

    // ------------------------------------------------------------------------
    // Market
    // ------------------------------------------------------------------------

    /// Bid `value` on `id`. The bid is checked before any value moves;
    /// once it passes, the value is debited from `caller` and returned if
    /// the bid is still refused. Value that cannot be returned is credited
    /// to `caller` for [`claim_credit`](Self::claim_credit).
    pub async fn bid(
        &self,
        caller: Address,
        id: ReservationId,
        key: &str,
        value: Amount,
    ) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        let ctx = self.context(caller).with_value(value);
        registry.check_bid(&ctx, id, key)?;
        if value == 0 {
            return registry.bid(ctx, id, key);
        }

        let custody = registry.custody();
        registry
            .native_mut()
            .transfer(&caller, &custody, value)
            .map_err(ReservationError::TransferFailed)?;

        let result = registry.bid(ctx, id, key);
        if result.is_err() {
            if let Err(e) = registry.native_mut().transfer(&custody, &caller, value) {
                tracing::warn!(
                    "Could not return {} to {} after a refused bid: {}",
                    value,
                    caller,
                    e
                );
                if let Err(e) = registry.credit(caller, value) {
                    tracing::error!("Failed to credit {} to {}: {}", value, caller, e);
                }
            }
        }
        result
    }

    pub async fn claim_credit(&self, caller: Address) -> RegistryResult<Amount> {
        let mut registry = self.registry.write().await;
        registry.claim_credit(self.context(caller))
    }

    pub async fn un_bid(&self, caller: Address, id: ReservationId) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        registry.un_bid(self.context(caller), id)
    }

    pub async fn sell(&self, caller: Address, id: ReservationId) -> RegistryResult<SaleReceipt> {
        let mut registry = self.registry.write().await;
        registry.sell(self.context(caller), id)
    }

    // ------------------------------------------------------------------------
    // Administration and treasury
    // ------------------------------------------------------------------------

    pub async fn set_signatory(&self, caller: Address, signatory: Address) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        registry.set_signatory(self.context(caller), signatory)
    }

    pub async fn set_chain_launched(&self, caller: Address, launched: bool) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        registry.set_chain_launched(self.context(caller), launched)
    }

    pub async fn get_transferrable(&self, caller: Address) -> RegistryResult<Transferrable> {
        let registry = self.registry.read().await;
        registry.get_transferrable(self.context(caller))
    }

    pub async fn transfer_native_out(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        registry.transfer_native_out(self.context(caller), to, amount)
    }

    pub async fn transfer_token_out(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> RegistryResult<()> {
        let mut registry = self.registry.write().await;
        registry.transfer_token_out(self.context(caller), to, amount)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub async fn exists(&self, name: &str) -> bool {
        self.registry.read().await.exists(name)
    }

    pub async fn reservation_owner(&self, id: ReservationId) -> Address {
        self.registry.read().await.reservation_owner(id)
    }

    pub async fn bid_owner(&self, id: ReservationId) -> Address {
        self.registry.read().await.bid_owner(id)
    }

    pub async fn current_id(&self) -> ReservationId {
        self.registry.read().await.current_id()
    }

    pub async fn get_signatory(&self) -> Address {
        self.registry.read().await.get_signatory()
    }

    /// Run `f` against the registry under the read lock
    pub async fn with_registry<R>(&self, f: impl FnOnce(&ReservationRegistry<N, T>) -> R) -> R {
        let registry = self.registry.read().await;
        f(&registry)
    }

    /// Run `f` against the registry under the write lock
    pub async fn with_registry_mut<R>(
        &self,
        f: impl FnOnce(&mut ReservationRegistry<N, T>) -> R,
    ) -> R {
        let mut registry = self.registry.write().await;
        f(&mut registry)
    }

    pub async fn take_events(&self) -> Vec<RegistryEvent> {
        self.registry.write().await.take_events()
    }

    pub async fn snapshot(&self) -> SnapshotResult<RegistrySnapshot> {
        self.registry.read().await.snapshot()
    }
}
