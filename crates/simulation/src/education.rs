use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Index, IndexMut};

// ---------------------------------------------------------------------------
// Education tiers
// ---------------------------------------------------------------------------

/// Ordinal education attainment of a citizen. Higher is more educated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EducationLevel {
    #[default]
    Uneducated,
    Educated,
    WellEducated,
    HighlyEducated,
}

impl EducationLevel {
    pub const COUNT: usize = 4;

    /// All tiers, lowest first.
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::Uneducated,
        EducationLevel::Educated,
        EducationLevel::WellEducated,
        EducationLevel::HighlyEducated,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tier one step up, or `None` at the top tier.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn is_max(self) -> bool {
        self == EducationLevel::HighlyEducated
    }

    /// Display name for logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            EducationLevel::Uneducated => "Uneducated",
            EducationLevel::Educated => "Educated",
            EducationLevel::WellEducated => "Well educated",
            EducationLevel::HighlyEducated => "Highly educated",
        }
    }
}

// ---------------------------------------------------------------------------
// Workforce demand vector
// ---------------------------------------------------------------------------

/// Signed worker counts per education tier.
///
/// As a target every entry is non-negative. While a building is being
/// reconciled it holds `target - current`: positive entries are unfilled
/// jobs, negative entries are surplus workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkforceDemand(pub [i32; EducationLevel::COUNT]);

impl WorkforceDemand {
    pub const ZERO: WorkforceDemand = WorkforceDemand([0; EducationLevel::COUNT]);

    pub fn new(uneducated: i32, educated: i32, well_educated: i32, highly_educated: i32) -> Self {
        Self([uneducated, educated, well_educated, highly_educated])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    pub fn total(&self) -> i32 {
        self.0.iter().sum()
    }

    /// More workers of this tier than jobs for them.
    pub fn has_surplus(&self, level: EducationLevel) -> bool {
        self[level] < 0
    }

    /// More jobs of this tier than workers holding them.
    pub fn has_deficit(&self, level: EducationLevel) -> bool {
        self[level] > 0
    }

    /// Unfilled jobs per tier, surplus entries clamped to zero.
    pub fn vacancies(&self) -> WorkforceDemand {
        WorkforceDemand(self.0.map(|v| v.max(0)))
    }
}

impl Index<EducationLevel> for WorkforceDemand {
    type Output = i32;

    fn index(&self, level: EducationLevel) -> &i32 {
        &self.0[level.index()]
    }
}

impl IndexMut<EducationLevel> for WorkforceDemand {
    fn index_mut(&mut self, level: EducationLevel) -> &mut i32 {
        &mut self.0[level.index()]
    }
}

impl AddAssign for WorkforceDemand {
    fn add_assign(&mut self, other: WorkforceDemand) {
        for (lhs, rhs) in self.0.iter_mut().zip(other.0) {
            *lhs += rhs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stops_at_top_tier() {
        assert_eq!(
            EducationLevel::Uneducated.next(),
            Some(EducationLevel::Educated)
        );
        assert_eq!(
            EducationLevel::WellEducated.next(),
            Some(EducationLevel::HighlyEducated)
        );
        assert_eq!(EducationLevel::HighlyEducated.next(), None);
        assert!(EducationLevel::HighlyEducated.is_max());
        assert!(!EducationLevel::Uneducated.is_max());
    }

    #[test]
    fn test_index_round_trip_for_all_tiers() {
        for (i, level) in EducationLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
            assert_eq!(EducationLevel::from_index(i), Some(*level));
        }
        assert_eq!(EducationLevel::from_index(4), None);
    }

    #[test]
    fn test_demand_surplus_and_deficit() {
        let demand = WorkforceDemand::new(-2, 3, 0, 0);
        assert!(demand.has_surplus(EducationLevel::Uneducated));
        assert!(demand.has_deficit(EducationLevel::Educated));
        assert!(!demand.has_surplus(EducationLevel::WellEducated));
        assert!(!demand.has_deficit(EducationLevel::WellEducated));
        assert_eq!(demand.total(), 1);
        assert_eq!(demand.vacancies(), WorkforceDemand::new(0, 3, 0, 0));
    }

    #[test]
    fn test_demand_add_assign() {
        let mut demand = WorkforceDemand::new(-5, -1, 0, 0);
        demand += WorkforceDemand::new(5, 4, 2, 0);
        assert_eq!(demand, WorkforceDemand::new(0, 3, 2, 0));
        assert!(!demand.is_zero());
        assert!(WorkforceDemand::ZERO.is_zero());
    }
}
