//! Rank tier ladder
//!
//! Defines the eight tiers, their baseline XP (the score a ranked day must
//! reach to count as a win) and their placement floor (the minimum ten-game
//! average that seeds a new account into the tier).

/// Tier definition
#[derive(Debug, Clone)]
pub struct RankTier {
    pub index: u8,
    pub name: &'static str,
    /// XP a ranked session must reach for the day to count as a win.
    pub baseline_xp: u32,
    /// Minimum placement average that seeds this tier.
    pub placement_floor: f64,
}

/// All tier definitions, weakest first (must be sorted by index)
pub static TIERS: &[RankTier] = &[
    RankTier {
        index: 0,
        name: "Bronze",
        baseline_xp: 200,
        placement_floor: 0.0,
    },
    RankTier {
        index: 1,
        name: "Silver",
        baseline_xp: 350,
        placement_floor: 200.0,
    },
    RankTier {
        index: 2,
        name: "Gold",
        baseline_xp: 500,
        placement_floor: 350.0,
    },
    RankTier {
        index: 3,
        name: "Platinum",
        baseline_xp: 650,
        placement_floor: 500.0,
    },
    RankTier {
        index: 4,
        name: "Diamond",
        baseline_xp: 800,
        placement_floor: 650.0,
    },
    RankTier {
        index: 5,
        name: "Master",
        baseline_xp: 900,
        placement_floor: 750.0,
    },
    RankTier {
        index: 6,
        name: "Grandmaster",
        baseline_xp: 950,
        placement_floor: 850.0,
    },
    RankTier {
        index: 7,
        name: "Challenger",
        baseline_xp: 1000,
        placement_floor: 920.0,
    },
];

impl RankTier {
    /// Look up a tier by index
    pub fn get(index: u8) -> Option<&'static RankTier> {
        TIERS.get(index as usize)
    }

    /// Seed a tier from a placement average (highest floor the average clears)
    pub fn for_average(average: f64) -> &'static RankTier {
        TIERS
            .iter()
            .rev()
            .find(|t| average >= t.placement_floor)
            .unwrap_or(&TIERS[0])
    }

    /// Index of the highest tier
    pub fn top_index() -> u8 {
        TIERS.last().map(|t| t.index).unwrap_or(0)
    }

    pub fn is_top(&self) -> bool {
        self.index == Self::top_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        for (i, tier) in TIERS.iter().enumerate() {
            assert_eq!(tier.index as usize, i);
        }
        for pair in TIERS.windows(2) {
            assert!(pair[0].baseline_xp < pair[1].baseline_xp);
            assert!(pair[0].placement_floor < pair[1].placement_floor);
        }
    }

    #[test]
    fn test_for_average_boundaries() {
        assert_eq!(RankTier::for_average(0.0).name, "Bronze");
        assert_eq!(RankTier::for_average(199.99).name, "Bronze");
        assert_eq!(RankTier::for_average(200.0).name, "Silver");
        assert_eq!(RankTier::for_average(650.0).name, "Diamond");
        assert_eq!(RankTier::for_average(849.99).name, "Master");
        assert_eq!(RankTier::for_average(850.0).name, "Grandmaster");
        assert_eq!(RankTier::for_average(920.0).name, "Challenger");
        assert_eq!(RankTier::for_average(5000.0).name, "Challenger"); // Beyond scale
    }

    #[test]
    fn test_get_bounds() {
        assert_eq!(RankTier::get(0).unwrap().name, "Bronze");
        assert_eq!(RankTier::get(7).unwrap().name, "Challenger");
        assert!(RankTier::get(8).is_none());
        assert_eq!(RankTier::top_index(), 7);
    }
}
