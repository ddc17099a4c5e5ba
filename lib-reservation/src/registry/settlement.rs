//! Sale settlement

use lib_tokens::{AssetLedger, TokenLedger};
use lib_types::ReservationId;

use super::ReservationRegistry;
use crate::context::CallContext;
use crate::errors::{RegistryResult, ReservationError};
use crate::events::RegistryEvent;
use crate::types::SaleReceipt;

impl<N: AssetLedger, T: TokenLedger> ReservationRegistry<N, T> {
    /// Accept the current bid on `id`.
    ///
    /// The bid moves from escrow into seller proceeds, the seller is paid
    /// the price less the sale fee, and only then do ownership and the key
    /// move to the bidder. A failed payout leaves the reservation, the bid
    /// and escrow exactly as they were.
    pub fn sell(&mut self, ctx: CallContext, id: ReservationId) -> RegistryResult<SaleReceipt> {
        self.state.access.ensure_not_launched()?;

        let reservation = self.active_reservation(id)?;
        if reservation.owner != ctx.caller {
            return Err(ReservationError::unauthorized(
                "only the reservation owner may sell",
            ));
        }
        let seller = reservation.owner;
        let old_key = reservation.key.clone();

        let bid = self
            .state
            .bids
            .get(&id)
            .cloned()
            .ok_or(ReservationError::NoBid(id))?;

        // The bid key may have been claimed since the bid was placed
        if self.state.keys.contains_key(&bid.key) {
            return Err(ReservationError::KeyCollision {
                key: bid.key.to_string(),
            });
        }

        let fee = self.config.sale_fee(bid.amount);
        let mut staged = self.state.escrow;
        let seller_proceeds = staged.settle_bid(bid.amount, fee)?;
        staged.release_proceeds(seller_proceeds)?;

        self.native
            .transfer(&self.custody, &seller, seller_proceeds)
            .map_err(|e| {
                tracing::warn!(
                    "Sale of {} aborted: payout of {} to {} failed: {}",
                    id,
                    seller_proceeds,
                    seller,
                    e
                );
                ReservationError::TransferFailed(e)
            })?;

        self.state.escrow = staged;
        self.state.bids.remove(&id);
        self.state.keys.remove(&old_key);
        self.state.keys.insert(bid.key.clone(), id);
        if let Some(record) = self.state.reservations.get_mut(&id) {
            record.owner = bid.bidder;
            record.key = bid.key.clone();
        }

        tracing::info!(
            "Reservation {} sold by {} to {} for {} (fee {})",
            id,
            seller,
            bid.bidder,
            bid.amount,
            fee
        );
        self.emit(RegistryEvent::Sold {
            id,
            seller,
            buyer: bid.bidder,
            price: bid.amount,
            fee,
        });

        Ok(SaleReceipt {
            id,
            seller,
            buyer: bid.bidder,
            price: bid.amount,
            fee,
            seller_proceeds,
        })
    }
}
