//! Per-session game state: slots, current position and progression counters.

use serde::Serialize;

use crate::domain::{ModelText, Slot, QUESTION_COUNT};
use crate::error::SessionError;
use crate::progression::Progress;

/// Everything one browser session knows about its game.
///
/// `slots` is a fixed array so the slot count can never drift, and
/// `current_index` is only moved through `previous`/`next`, which clamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionState {
  current_index: usize,
  pub progress: Progress,
  slots: [Slot; QUESTION_COUNT],
}

impl Default for SessionState {
  fn default() -> Self {
    Self {
      current_index: 0,
      progress: Progress::default(),
      slots: Default::default(),
    }
  }
}

impl SessionState {
  pub fn new() -> Self { Self::default() }

  /// Back to initial defaults.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn current_index(&self) -> usize { self.current_index }

  #[cfg(test)]
  pub fn slots(&self) -> &[Slot] { &self.slots }

  pub fn slot(&self, index: usize) -> Result<&Slot, SessionError> {
    self.slots.get(index).ok_or(SessionError::SlotOutOfRange { index, len: QUESTION_COUNT })
  }

  pub fn current_slot(&self) -> &Slot { &self.slots[self.current_index] }

  fn slot_mut(&mut self, index: usize) -> Result<&mut Slot, SessionError> {
    self.slots.get_mut(index).ok_or(SessionError::SlotOutOfRange { index, len: QUESTION_COUNT })
  }

  pub fn set_question(&mut self, index: usize, text: ModelText) -> Result<(), SessionError> {
    self.slot_mut(index)?.question = Some(text);
    Ok(())
  }

  pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
    self.slot_mut(index)?.answer = text.into();
    Ok(())
  }

  pub fn set_feedback(&mut self, index: usize, text: ModelText) -> Result<(), SessionError> {
    self.slot_mut(index)?.feedback = Some(text);
    Ok(())
  }

  pub fn previous(&mut self) {
    self.current_index = self.current_index.saturating_sub(1);
  }

  pub fn next(&mut self) {
    self.current_index = (self.current_index + 1).min(QUESTION_COUNT - 1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::SlotStatus;

  fn ok(s: &str) -> ModelText { ModelText::Ok { text: s.into() } }

  #[test]
  fn fresh_state_has_defaults() {
    let s = SessionState::new();
    assert_eq!(s.current_index(), 0);
    assert_eq!(s.progress, Progress::default());
    assert_eq!(s.slots().len(), QUESTION_COUNT);
    assert!(s.slots().iter().all(|slot| slot.status() == SlotStatus::Empty));
  }

  #[test]
  fn reset_clears_every_slot_and_counter() {
    let mut s = SessionState::new();
    for i in 0..QUESTION_COUNT {
      s.set_question(i, ok("Q")).unwrap();
      s.set_answer(i, "A").unwrap();
      s.set_feedback(i, ok("F")).unwrap();
    }
    s.next();
    s.next();
    s.progress.award(2);

    s.reset();

    for slot in s.slots() {
      assert_eq!(slot.question, None);
      assert_eq!(slot.answer, "");
      assert_eq!(slot.feedback, None);
    }
    assert_eq!(s.current_index(), 0);
    assert_eq!(s.progress.level, 1);
    assert_eq!(s.progress.experience_points, 0);
    assert_eq!(s.progress.badge_count, 0);
  }

  #[test]
  fn navigation_clamps_at_both_ends() {
    let mut s = SessionState::new();
    s.previous();
    assert_eq!(s.current_index(), 0);

    for _ in 0..QUESTION_COUNT + 3 {
      s.next();
    }
    assert_eq!(s.current_index(), QUESTION_COUNT - 1);
    s.next();
    assert_eq!(s.current_index(), QUESTION_COUNT - 1);

    s.previous();
    assert_eq!(s.current_index(), QUESTION_COUNT - 2);
  }

  #[test]
  fn out_of_range_writes_fail_without_side_effects() {
    let mut s = SessionState::new();
    let err = s.set_answer(QUESTION_COUNT, "late").unwrap_err();
    assert_eq!(err, SessionError::SlotOutOfRange { index: QUESTION_COUNT, len: QUESTION_COUNT });
    assert!(s.set_question(99, ok("Q")).is_err());
    assert!(s.set_feedback(usize::MAX, ok("F")).is_err());
    assert_eq!(s, SessionState::new());
  }

  #[test]
  fn navigation_keeps_slot_contents() {
    let mut s = SessionState::new();
    s.set_question(0, ok("first")).unwrap();
    s.next();
    assert_eq!(s.current_slot().question, None);
    s.previous();
    assert_eq!(s.current_slot().question, Some(ok("first")));
  }
}
