use bevy::prelude::*;

use crate::citizen_units::CitizenManager;
use crate::rico::{RicoRegistry, WorkplaceCache};
use crate::transfer_offers::TransferOfferBoard;

use super::systems::{demolish_plopped_buildings, reconcile_plopped_buildings};
use super::types::{ApplyRicoSettings, DemolishPlopped, ReconcileSchedule, ReconcileStats};

pub struct ReconcilePlugin;

impl Plugin for ReconcilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CitizenManager>()
            .init_resource::<RicoRegistry>()
            .init_resource::<WorkplaceCache>()
            .init_resource::<TransferOfferBoard>()
            .init_resource::<ReconcileSchedule>()
            .init_resource::<ReconcileStats>()
            .add_event::<ApplyRicoSettings>()
            .add_event::<DemolishPlopped>()
            .add_systems(
                FixedUpdate,
                (demolish_plopped_buildings, reconcile_plopped_buildings)
                    .chain()
                    .in_set(crate::SimulationSet::Simulation),
            );
    }
}
