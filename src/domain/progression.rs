//! Placement and LP progression
//!
//! Consumes one completed session's XP at a time and advances the user's
//! standing. The first ten sessions are placement games whose average seeds
//! a starting tier; every session after that is compared against the
//! current tier's baseline XP and moves League Points, promoting or
//! demoting one tier at a time when LP crosses 100 or drops below 0.

use super::tier::{RankTier, TIERS};

/// Placement games before a tier is assigned
pub const PLACEMENT_GAMES: usize = 10;

/// LP span of one tier
const TIER_LP: i64 = 100;
/// Scale factor on the XP/baseline ratio
const LP_RATIO_SCALE: f64 = 20.0;
/// Smallest LP movement per session
const LP_STEP_MIN: i64 = 10;
/// Largest LP movement per session
const LP_STEP_MAX: i64 = 30;

/// Scores collected during the placement phase
///
/// Append-only; the sequence freezes once the tenth game lands and stays
/// around for display afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementRecord {
    scores: Vec<u32>,
}

impl PlacementRecord {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    pub(crate) fn from_scores(scores: Vec<u32>) -> Self {
        Self { scores }
    }

    pub fn games_played(&self) -> usize {
        self.scores.len()
    }

    pub fn remaining(&self) -> usize {
        PLACEMENT_GAMES.saturating_sub(self.scores.len())
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Mean score so far; zero before the first game.
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.scores.iter().map(|s| f64::from(*s)).sum();
        sum / self.scores.len() as f64
    }
}

/// Post-placement standing: current tier and League Points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankState {
    pub tier: u8,
    /// 0..=99, except at the top tier where promotion overflow caps at 100
    pub lp: u32,
}

impl RankState {
    pub fn tier_info(&self) -> &'static RankTier {
        RankTier::get(self.tier).unwrap_or(&TIERS[0])
    }

    /// Move LP by one session's XP measured against the tier baseline.
    fn apply_xp(&mut self, xp: u32) -> RankOutcome {
        let baseline = f64::from(self.tier_info().baseline_xp);
        let safe_xp = f64::from(xp.max(1));

        let lp_change: i64 = if safe_xp >= baseline {
            let gain = (LP_RATIO_SCALE * safe_xp / baseline).round() as i64;
            gain.clamp(LP_STEP_MIN, LP_STEP_MAX)
        } else {
            let loss = (LP_RATIO_SCALE * baseline / safe_xp).round() as i64;
            -loss.clamp(LP_STEP_MIN, LP_STEP_MAX)
        };

        let mut lp = i64::from(self.lp) + lp_change;
        let mut movement = TierMovement::Held;
        if lp >= TIER_LP {
            lp -= TIER_LP;
            if self.tier < RankTier::top_index() {
                self.tier += 1;
                movement = TierMovement::Promoted;
            } else {
                // Challenger has no tier above; park at max LP
                lp = TIER_LP;
            }
        } else if lp < 0 {
            lp += TIER_LP;
            if self.tier > 0 {
                self.tier -= 1;
                movement = TierMovement::Demoted;
            } else {
                // Bronze has no tier below; hold the floor
                lp = 0;
            }
        }
        self.lp = lp as u32;

        RankOutcome::Ranked {
            lp_change: lp_change as i32,
            lp_after: self.lp,
            movement,
        }
    }
}

impl std::fmt::Display for RankState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} LP", self.tier_info().name, self.lp)
    }
}

/// Which phase of the ladder the user is in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionPhase {
    /// Still inside the ten seeding games
    Placement(PlacementRecord),
    /// Placements done; the record is frozen and LP is live
    Ranked {
        placements: PlacementRecord,
        rank: RankState,
    },
}

/// Durable per-user aggregate: lifetime XP plus the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionSnapshot {
    /// Lifetime XP across every session ever; informational only, never
    /// feeds tier or LP
    pub total_xp: u64,
    pub phase: ProgressionPhase,
}

impl Default for ProgressionSnapshot {
    fn default() -> Self {
        Self::fresh()
    }
}

impl ProgressionSnapshot {
    /// A brand new account: zero XP, zero placement games.
    pub fn fresh() -> Self {
        Self {
            total_xp: 0,
            phase: ProgressionPhase::Placement(PlacementRecord::new()),
        }
    }

    pub fn in_placements(&self) -> bool {
        matches!(self.phase, ProgressionPhase::Placement(_))
    }

    /// The placement record for either phase (frozen once ranked).
    pub fn placement(&self) -> &PlacementRecord {
        match &self.phase {
            ProgressionPhase::Placement(record) => record,
            ProgressionPhase::Ranked { placements, .. } => placements,
        }
    }

    /// Current rank, None while still in placements.
    pub fn rank(&self) -> Option<RankState> {
        match &self.phase {
            ProgressionPhase::Placement(_) => None,
            ProgressionPhase::Ranked { rank, .. } => Some(*rank),
        }
    }

    /// Fold one completed session's XP into the standing.
    ///
    /// A placement game appends its score and, on the tenth, seeds the
    /// starting tier at 0 LP. A ranked game moves LP against the tier
    /// baseline. Lifetime XP accumulates either way, losses included.
    pub fn record_session(&mut self, xp: u32) -> RankOutcome {
        self.total_xp += u64::from(xp);
        match &mut self.phase {
            ProgressionPhase::Placement(record) => {
                record.scores.push(xp);
                let games_played = record.games_played();
                if games_played < PLACEMENT_GAMES {
                    return RankOutcome::Placement {
                        games_played: games_played as u8,
                        assigned: None,
                    };
                }

                let placements = std::mem::take(record);
                let average = placements.average();
                let tier = RankTier::for_average(average);
                self.phase = ProgressionPhase::Ranked {
                    placements,
                    rank: RankState {
                        tier: tier.index,
                        lp: 0,
                    },
                };
                RankOutcome::Placement {
                    games_played: PLACEMENT_GAMES as u8,
                    assigned: Some(TierAssignment {
                        tier: tier.index,
                        average,
                    }),
                }
            }
            ProgressionPhase::Ranked { rank, .. } => rank.apply_xp(xp),
        }
    }
}

/// What one recorded session did to the standing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankOutcome {
    /// Still seeding; `assigned` is set on the game that finishes placements
    Placement {
        games_played: u8,
        assigned: Option<TierAssignment>,
    },
    /// Ranked day: the LP delta and where it landed
    Ranked {
        lp_change: i32,
        lp_after: u32,
        movement: TierMovement,
    },
}

impl RankOutcome {
    pub fn lp_change(&self) -> Option<i32> {
        match self {
            RankOutcome::Placement { .. } => None,
            RankOutcome::Ranked { lp_change, .. } => Some(*lp_change),
        }
    }

    pub fn lp_after(&self) -> Option<u32> {
        match self {
            RankOutcome::Placement { .. } => None,
            RankOutcome::Ranked { lp_after, .. } => Some(*lp_after),
        }
    }
}

/// Tier seeded by a finished set of placements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierAssignment {
    pub tier: u8,
    pub average: f64,
}

impl TierAssignment {
    pub fn tier_name(&self) -> &'static str {
        RankTier::get(self.tier).unwrap_or(&TIERS[0]).name
    }
}

/// Direction the tier moved on a ranked day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMovement {
    Held,
    Promoted,
    Demoted,
}
