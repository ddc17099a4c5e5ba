//! Bidding
//!
//! One bid per reservation. A new bid must clear the floor and strictly
//! beat the current one; the displaced bidder is refunded before the new
//! bid is recorded. If that refund cannot be paid the new bid is refused
//! and nothing changes.

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::ReservationId;

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::key::RegistrationKey;
use crate::types::Bid;

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Run the validation [`bid`](Self::bid) applies to the caller, `id`,
    /// `key` and `ctx.value`, without touching state or funds. The custody
    /// funding check is left to `bid`. Callers moving value into custody
    /// use this first.
    pub fn check_bid(&self, ctx: &CallContext, id: ReservationId, key: &str) -> RegistryResult<()> {
        self.validate_bid(ctx, id, key).map(|_| ())
    }

    /// Bid `ctx.value` on reservation `id`, proposing `key` as its new key.
    ///
    /// `ctx.value` must already be in custody on top of everything escrow
    /// tracks. On error the caller is responsible for returning it.
    pub fn bid(&mut self, ctx: CallContext, id: ReservationId, key: &str) -> RegistryResult<()> {
        let (key, previous) = self.validate_bid(&ctx, id, key)?;
        self.ensure_in_custody(ctx.value)?;

        let mut staged = self.state.escrow;
        staged.deposit_bid(ctx.value)?;
        if let Some(prev) = &previous {
            staged.refund_bid(prev.amount)?;
            self.native
                .transfer(&self.custody, &prev.bidder, prev.amount)
                .map_err(|e| {
                    tracing::warn!(
                        "Refund of {} to outbid bidder {} on {} failed: {}",
                        prev.amount,
                        prev.bidder,
                        id,
                        e
                    );
                    ReservationError::TransferFailed(e)
                })?;
        }

        self.state.escrow = staged;
        self.state.bids.insert(
            id,
            Bid {
                bidder: ctx.caller,
                amount: ctx.value,
                key: key.clone(),
                placed_at: ctx.now,
            },
        );

        if let Some(prev) = previous {
            self.emit(RegistryEvent::BidRefunded {
                id,
                bidder: prev.bidder,
                amount: prev.amount,
            });
        }
        tracing::info!("Bid of {} on {} by {}", ctx.value, id, ctx.caller);
        self.emit(RegistryEvent::BidPlaced {
            id,
            bidder: ctx.caller,
            amount: ctx.value,
            key,
        });
        Ok(())
    }

    /// Order: launch, reservation, self bid, floor, key format, key
    /// collision, current bid. Returns the parsed key and the bid it displaces.
    fn validate_bid(
        &self,
        ctx: &CallContext,
        id: ReservationId,
        key: &str,
    ) -> RegistryResult<(RegistrationKey, Option<Bid>)> {
        self.state.access.ensure_not_launched()?;

        let reservation = self.active_reservation(id)?;
        if reservation.owner == ctx.caller {
            return Err(ReservationError::SelfBid);
        }

        let minimum = self.config.min_bid_amount();
        if ctx.value < minimum {
            return Err(ReservationError::BelowMinimum {
                minimum,
                offered: ctx.value,
            });
        }

        let key = self.key_rules.validate(key)?;
        if key == reservation.key || self.state.keys.contains_key(&key) {
            return Err(ReservationError::KeyCollision {
                key: key.to_string(),
            });
        }

        let previous = self.state.bids.get(&id).cloned();
        if let Some(prev) = &previous {
            if ctx.value <= prev.amount {
                return Err(ReservationError::BidTooLow {
                    current: prev.amount,
                    offered: ctx.value,
                });
            }
        }
        Ok((key, previous))
    }

    /// Withdraw the caller's bid on `id` once it has gone stale
    pub fn un_bid(&mut self, ctx: CallContext, id: ReservationId) -> RegistryResult<()> {
        self.state.access.ensure_not_launched()?;

        let bid = self
            .state
            .bids
            .get(&id)
            .cloned()
            .ok_or(ReservationError::NotFound(id))?;
        if bid.bidder != ctx.caller {
            return Err(ReservationError::unauthorized(
                "only the bidder may withdraw a bid",
            ));
        }
        if !self.clock.is_stale(bid.placed_at, ctx.now) {
            return Err(ReservationError::NotStale {
                stale_at: self.clock.stale_at(bid.placed_at),
            });
        }

        let mut staged = self.state.escrow;
        staged.refund_bid(bid.amount)?;
        self.native
            .transfer(&self.custody, &bid.bidder, bid.amount)
            .map_err(|e| {
                tracing::warn!("Refund of withdrawn bid on {} failed: {}", id, e);
                ReservationError::TransferFailed(e)
            })?;

        self.state.escrow = staged;
        self.state.bids.remove(&id);

        tracing::info!("Bid of {} on {} withdrawn by {}", bid.amount, id, bid.bidder);
        self.emit(RegistryEvent::BidWithdrawn {
            id,
            bidder: bid.bidder,
            amount: bid.amount,
        });
        Ok(())
    }
}
