use crate::error::ConfigError;

/// Native simulation rate of the parser output.
pub const NATIVE_TICKRATE: u32 = 64;

/// Number of samples kept per second of game time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicksPerSecond(u32);

impl TicksPerSecond {
    pub const ALLOWED: [u32; 7] = [1, 2, 4, 8, 16, 32, 64];

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Every `stride()`-th row of a player is kept.
    pub fn stride(&self) -> usize {
        (NATIVE_TICKRATE / self.0) as usize
    }
}

impl TryFrom<u32> for TicksPerSecond {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::TicksPerSecond(value))
        }
    }
}

impl Default for TicksPerSecond {
    fn default() -> Self {
        Self(1)
    }
}

/// How cumulative damage is attributed to the tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DamageMode {
    /// Every damage event is visible from its own tick on.
    #[default]
    PerTick,
    /// Damage is summed per round and becomes visible at the start of the
    /// following round.
    PerRound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    pub ticks_per_second: TicksPerSecond,
    pub numerical_match_id: Option<i64>,
    pub damage_mode: DamageMode,
    pub num_permutations_per_round: u32,
    pub permutation_seed: Option<u64>,
    pub build_dictionary: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: TicksPerSecond::default(),
            numerical_match_id: None,
            damage_mode: DamageMode::PerTick,
            num_permutations_per_round: 1,
            permutation_seed: None,
            build_dictionary: true,
        }
    }
}

impl SnapshotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_permutations_per_round == 0 {
            return Err(ConfigError::Permutations);
        }
        TicksPerSecond::try_from(self.ticks_per_second.get())?;
        Ok(())
    }
}
