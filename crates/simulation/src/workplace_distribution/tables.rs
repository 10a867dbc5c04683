use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Service classification
// ---------------------------------------------------------------------------

/// Top-level RICO classification of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Residential,
    Commercial,
    Industrial,
    Office,
    Extractor,
}

impl Service {
    /// Services whose buildings employ workers.
    pub fn provides_jobs(self) -> bool {
        !matches!(self, Service::Residential)
    }
}

/// Specialisation within a service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubService {
    #[default]
    Generic,
    ResidentialLow,
    ResidentialHigh,
    CommercialLow,
    CommercialHigh,
    CommercialTourist,
    CommercialLeisure,
    CommercialEco,
    Farming,
    Forestry,
    Oil,
    Ore,
    HighTech,
}

// ---------------------------------------------------------------------------
// Ratio rows: [base, uneducated, educated, well educated, highly educated]
// ---------------------------------------------------------------------------

const ALL_UNEDUCATED: [i32; 5] = [100, 100, 0, 0, 0];
const MOSTLY_EDUCATED: [i32; 5] = [100, 20, 60, 20, 0];
const SKILLED_SPREAD: [i32; 5] = [100, 5, 15, 30, 50];

const OFFICE_LEVEL_1: [i32; 5] = [100, 0, 40, 50, 10];
const OFFICE_LEVEL_2: [i32; 5] = [100, 0, 20, 50, 30];
const OFFICE_LEVEL_3: [i32; 5] = [100, 0, 0, 40, 60];
const OFFICE_HIGH_TECH: [i32; 5] = [100, 0, 10, 40, 50];

const COMMERCIAL_TOURIST: [i32; 5] = [100, 20, 20, 30, 30];
const COMMERCIAL_LEISURE: [i32; 5] = [100, 30, 30, 20, 20];
const COMMERCIAL_ECO: [i32; 5] = [100, 50, 40, 10, 0];

/// Ratio row for a building class, or `None` when the class has no
/// workplace table (residential buildings, unknown combinations).
///
/// Levels are clamped to `1..=3`; job buildings do not grow past level 3.
pub fn workplace_ratios(service: Service, sub_service: SubService, level: u8) -> Option<[i32; 5]> {
    let level = level.clamp(1, 3);
    let by_level = |l1: [i32; 5], l2: [i32; 5], l3: [i32; 5]| match level {
        1 => l1,
        2 => l2,
        _ => l3,
    };

    let row = match (service, sub_service) {
        (Service::Industrial, SubService::Generic) => {
            by_level(ALL_UNEDUCATED, MOSTLY_EDUCATED, SKILLED_SPREAD)
        }
        (Service::Industrial | Service::Extractor, SubService::Farming | SubService::Forestry) => {
            ALL_UNEDUCATED
        }
        (Service::Industrial | Service::Extractor, SubService::Oil | SubService::Ore) => {
            MOSTLY_EDUCATED
        }
        (Service::Commercial, SubService::Generic | SubService::CommercialLow) => {
            by_level(ALL_UNEDUCATED, MOSTLY_EDUCATED, SKILLED_SPREAD)
        }
        (Service::Commercial, SubService::CommercialHigh) => {
            by_level(OFFICE_LEVEL_1, OFFICE_LEVEL_2, OFFICE_LEVEL_3)
        }
        (Service::Commercial, SubService::CommercialTourist) => COMMERCIAL_TOURIST,
        (Service::Commercial, SubService::CommercialLeisure) => COMMERCIAL_LEISURE,
        (Service::Commercial, SubService::CommercialEco) => COMMERCIAL_ECO,
        (Service::Office, SubService::Generic) => {
            by_level(OFFICE_LEVEL_1, OFFICE_LEVEL_2, OFFICE_LEVEL_3)
        }
        (Service::Office, SubService::HighTech) => OFFICE_HIGH_TECH,
        _ => return None,
    };
    Some(row)
}
