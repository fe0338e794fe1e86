//! Gamification bookkeeping applied after each successful answer evaluation.

use serde::Serialize;

pub const XP_PER_ANSWER: u32 = 20;
pub const XP_PER_LEVEL: u32 = 100;
/// A badge is awarded whenever the evaluated question number is a multiple of this.
pub const BADGE_EVERY: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
  pub level: u32,
  pub experience_points: u32,
  pub badge_count: u32,
}

impl Default for Progress {
  fn default() -> Self {
    Self { level: 1, experience_points: 0, badge_count: 0 }
  }
}

/// Observational events; they carry no state of their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
  LevelUp { level: u32 },
  BadgeEarned { total: u32 },
}

impl ProgressEvent {
  pub fn message(&self) -> String {
    match self {
      ProgressEvent::LevelUp { level } => format!("LEVEL UP! You reached Level {}!", level),
      ProgressEvent::BadgeEarned { total } => format!("Badge Earned! Total Badges: {}", total),
    }
  }
}

impl Progress {
  /// Award one evaluation's worth of progress for the slot at `current_index`.
  /// Level-up and badge checks are independent and may both fire.
  pub fn award(&mut self, current_index: usize) -> Vec<ProgressEvent> {
    let mut events = Vec::new();

    self.experience_points += XP_PER_ANSWER;
    if self.experience_points >= XP_PER_LEVEL {
      self.experience_points = 0;
      self.level += 1;
      events.push(ProgressEvent::LevelUp { level: self.level });
    }

    if (current_index + 1) % BADGE_EVERY == 0 {
      self.badge_count += 1;
      events.push(ProgressEvent::BadgeEarned { total: self.badge_count });
    }

    events
  }

  /// Fraction of the way to the next level, for the HUD progress bar.
  pub fn xp_fraction(&self) -> f32 {
    self.experience_points as f32 / XP_PER_LEVEL as f32
  }
}
