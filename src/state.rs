use crate::errors::ClientError;
use crate::models::{WorkoutSession, WorkoutStatus};

/// Client-side view of the user's workout session.
///
/// `Unloaded` lasts until the server has been asked for the in-progress
/// workout; nothing else may happen before that. Transitions are only applied
/// after the server confirmed the matching request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unloaded,
    Idle,
    Active(WorkoutSession),
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, SessionState::Unloaded)
    }

    pub fn active(&self) -> Option<&WorkoutSession> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn require_loaded(&self) -> Result<(), ClientError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(ClientError::validation("Workout view is not loaded yet"))
        }
    }

    pub fn require_idle(&self) -> Result<(), ClientError> {
        self.require_loaded()?;
        match self {
            SessionState::Active(_) => Err(ClientError::validation(
                "A workout is already in progress",
            )),
            _ => Ok(()),
        }
    }

    pub fn require_active(&self) -> Result<&WorkoutSession, ClientError> {
        self.require_loaded()?;
        self.active()
            .ok_or_else(|| ClientError::validation("No active workout"))
    }

    /// Adopts whatever the server reported as in progress.
    pub fn resume(&mut self, found: Option<WorkoutSession>) {
        *self = match found {
            Some(session) => SessionState::Active(session),
            None => SessionState::Idle,
        };
    }

    pub fn start(&mut self, session: WorkoutSession) -> Result<(), ClientError> {
        self.require_idle()?;
        *self = SessionState::Active(session);
        Ok(())
    }

    pub fn finish(&mut self, workout_id: i64, status: WorkoutStatus) -> Result<(), ClientError> {
        if !status.is_terminal() {
            return Err(ClientError::validation(format!(
                "'{}' is not a terminal status",
                status.label()
            )));
        }
        let current = self.require_active()?;
        if current.id != workout_id {
            return Err(ClientError::validation(format!(
                "Workout {workout_id} is not the active workout"
            )));
        }
        *self = SessionState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64) -> WorkoutSession {
        WorkoutSession {
            id,
            equipment_id: 5,
            equipment: None,
            date: None,
            status: WorkoutStatus::InProgress,
            created_at: None,
            started_at: None,
            ended_at: None,
            sets_count: 0,
            max_reps: 0.0,
            max_weight: 0,
        }
    }

    #[test]
    fn unloaded_rejects_everything() {
        let state = SessionState::default();
        assert!(state.require_idle().unwrap_err().is_validation());
        assert!(state.require_active().unwrap_err().is_validation());
    }

    #[test]
    fn resume_adopts_or_clears() {
        let mut state = SessionState::default();
        state.resume(Some(session(1)));
        assert_eq!(state.active().map(|s| s.id), Some(1));

        state.resume(None);
        assert_eq!(state, SessionState::Idle);
    }

    #[test]
    fn start_requires_idle() {
        let mut state = SessionState::Idle;
        state.start(session(2)).unwrap();
        assert!(state.start(session(3)).is_err());
        assert_eq!(state.active().map(|s| s.id), Some(2));
    }

    #[test]
    fn finish_is_terminal() {
        let mut state = SessionState::Active(session(4));
        assert!(state.finish(4, WorkoutStatus::InProgress).is_err());
        assert!(state.finish(9, WorkoutStatus::Completed).is_err());
        assert!(state.active().is_some());

        state.finish(4, WorkoutStatus::Abandoned).unwrap();
        assert_eq!(state, SessionState::Idle);
        assert!(state.finish(4, WorkoutStatus::Completed).is_err());
    }
}
