use crate::error::SpeedError;

/// Speed a replay starts at and returns to on reset
pub const DEFAULT_SPEED: u32 = 1;

/// Where the replay is in its lifecycle
///
/// `Idle` and `Stopped` both mean "not active"; they only differ in whether
/// a replay has run since the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayPhase {
    #[default]
    Idle,
    Active,
    Stopped,
}

impl ReplayPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, ReplayPhase::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReplayPhase::Idle => "IDLE",
            ReplayPhase::Active => "LIVE",
            ReplayPhase::Stopped => "STOPPED",
        }
    }
}

/// Replay control state: phase, speed multiplier and elapsed game seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayState {
    phase: ReplayPhase,
    speed: u32,
    /// Raw text of the speed field; may be empty while the user edits it
    speed_input: String,
    elapsed_secs: u64,
}

impl Default for ReplayState {
    fn default() -> Self {
        Self::with_speed(DEFAULT_SPEED)
    }
}

impl ReplayState {
    /// Start idle at the given speed (zero is bumped to one)
    pub fn with_speed(speed: u32) -> Self {
        let speed = speed.max(1);
        Self {
            phase: ReplayPhase::Idle,
            speed,
            speed_input: speed.to_string(),
            elapsed_secs: 0,
        }
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn speed_input(&self) -> &str {
        &self.speed_input
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Enter the active phase; false if a replay is already running
    pub fn begin(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        // A half-edited field commits to the speed actually in use.
        self.speed_input = self.speed.to_string();
        self.phase = ReplayPhase::Active;
        true
    }

    /// Leave the active phase; false if nothing was running
    pub fn halt(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = ReplayPhase::Stopped;
        true
    }

    /// Back to idle at speed one with the clock cleared
    pub fn reset(&mut self) {
        *self = Self::with_speed(DEFAULT_SPEED);
    }

    /// One timer period elapsed; advances the clock by `speed` while active
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(u64::from(self.speed));
        true
    }

    /// Apply text from the speed field
    ///
    /// Empty text is accepted as an in-progress edit and leaves the committed
    /// speed alone. Anything else must be a positive integer.
    pub fn edit_speed(&mut self, input: &str) -> Result<(), SpeedError> {
        if self.is_active() {
            return Err(SpeedError::ReplayActive);
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.speed_input.clear();
            return Ok(());
        }

        match trimmed.parse::<u32>() {
            Ok(speed) if speed > 0 => {
                self.speed = speed;
                self.speed_input = speed.to_string();
                Ok(())
            }
            _ => Err(SpeedError::Invalid(trimmed.to_string())),
        }
    }
}
