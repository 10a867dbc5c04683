//! Labour-market signals posted by buildings.
//!
//! A building that still needs workers of some education tier posts an
//! incoming offer under that tier's reason. Matching offers to citizens
//! happens elsewhere; this module only keeps the board.

use bevy::prelude::*;

use crate::education::{EducationLevel, WorkforceDemand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferReason {
    Worker(EducationLevel),
}

impl TransferReason {
    /// The four worker reasons, lowest tier first.
    pub const WORKERS: [TransferReason; EducationLevel::COUNT] = [
        TransferReason::Worker(EducationLevel::Uneducated),
        TransferReason::Worker(EducationLevel::Educated),
        TransferReason::Worker(EducationLevel::WellEducated),
        TransferReason::Worker(EducationLevel::HighlyEducated),
    ];

    fn slot(self) -> usize {
        match self {
            TransferReason::Worker(level) => level.index(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOffer {
    pub building: Entity,
    pub amount: i32,
}

impl TransferOffer {
    /// An offer that identifies `building` without carrying an amount, as
    /// used for removal.
    pub fn for_building(building: Entity) -> Self {
        Self {
            building,
            amount: 0,
        }
    }
}

/// The transfer-matching collaborator as seen by the reconciliation engine.
pub trait TransferOffers {
    fn add_incoming_offer(&mut self, reason: TransferReason, offer: TransferOffer);

    /// Withdraws whatever incoming offer `offer.building` has under `reason`.
    fn remove_incoming_offer(&mut self, reason: TransferReason, offer: TransferOffer);
}

/// Incoming offers, at most one per building per reason.
#[derive(Resource, Debug, Default)]
pub struct TransferOfferBoard {
    incoming: [Vec<TransferOffer>; EducationLevel::COUNT],
}

impl TransferOfferBoard {
    pub fn incoming(&self, reason: TransferReason) -> &[TransferOffer] {
        &self.incoming[reason.slot()]
    }

    /// Every reason `building` currently has an incoming offer under.
    pub fn incoming_for(&self, building: Entity) -> Vec<(TransferReason, TransferOffer)> {
        TransferReason::WORKERS
            .into_iter()
            .filter_map(|reason| {
                self.incoming(reason)
                    .iter()
                    .find(|offer| offer.building == building)
                    .map(|offer| (reason, *offer))
            })
            .collect()
    }

    pub fn total_amount(&self, reason: TransferReason) -> i32 {
        self.incoming(reason).iter().map(|o| o.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.iter().all(Vec::is_empty)
    }
}

impl TransferOffers for TransferOfferBoard {
    fn add_incoming_offer(&mut self, reason: TransferReason, offer: TransferOffer) {
        let offers = &mut self.incoming[reason.slot()];
        match offers.iter_mut().find(|o| o.building == offer.building) {
            Some(existing) => *existing = offer,
            None => offers.push(offer),
        }
    }

    fn remove_incoming_offer(&mut self, reason: TransferReason, offer: TransferOffer) {
        self.incoming[reason.slot()].retain(|o| o.building != offer.building);
    }
}

/// Posts one incoming worker offer per tier that still has vacancies.
pub fn post_worker_offers(
    offers: &mut dyn TransferOffers,
    building: Entity,
    demand: &WorkforceDemand,
) -> u32 {
    let mut posted = 0;
    for (reason, level) in TransferReason::WORKERS.into_iter().zip(EducationLevel::ALL) {
        let amount = demand[level];
        if amount > 0 {
            offers.add_incoming_offer(reason, TransferOffer { building, amount });
            posted += 1;
        }
    }
    posted
}
