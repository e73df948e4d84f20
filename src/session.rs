use crate::api::WorkoutApi;
use crate::errors::ClientError;
use crate::models::{SetEntry, WorkoutSession, WorkoutStatus};
use crate::state::SessionState;
use crate::ui::SessionView;
use tracing::{debug, info};

/// Owns the user's workout session for the lifetime of one workout view.
///
/// Every method makes at most one mutating request, reports failures to the
/// view and only advances [`SessionState`] once the server confirmed the
/// change. Follow-up refreshes fail independently of the mutation before them.
pub struct SessionController<A, V> {
    api: A,
    view: V,
    state: SessionState,
}

impl<A: WorkoutApi, V: SessionView> SessionController<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            state: SessionState::Unloaded,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&WorkoutSession> {
        self.state.active()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Loads the equipment picker, resumes any in-progress workout and loads
    /// history. Only the resume step decides the outcome.
    pub async fn activate(&mut self) -> Result<(), ClientError> {
        let _ = self.load_equipment().await;
        self.resume().await?;
        let _ = self.refresh_history().await;
        Ok(())
    }

    pub async fn resume(&mut self) -> Result<(), ClientError> {
        let found = self
            .api
            .in_progress_workout()
            .await
            .map_err(|err| self.report(err))?;

        match &found {
            Some(session) => info!(workout_id = session.id, "resumed in-progress workout"),
            None => debug!("no in-progress workout"),
        }
        self.state.resume(found);
        self.view.session_changed(&self.state);

        let _ = self.refresh_sets().await;
        Ok(())
    }

    /// `selection` is the raw equipment picker value.
    pub async fn start(&mut self, selection: &str) -> Result<(), ClientError> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(self.report(ClientError::validation("Please select equipment")));
        }
        let equipment_id = match selection.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                return Err(self.report(ClientError::validation(format!(
                    "'{selection}' is not an equipment id"
                ))));
            }
        };
        if let Err(err) = self.state.require_idle() {
            return Err(self.report(err));
        }

        let session = self
            .api
            .start_workout(equipment_id)
            .await
            .map_err(|err| self.report(err))?;
        info!(workout_id = session.id, equipment_id, "workout started");

        self.state.start(session).map_err(|err| self.report(err))?;
        self.view.session_changed(&self.state);

        let _ = self.refresh_sets().await;
        Ok(())
    }

    pub async fn record_set(&mut self, entry: SetEntry) -> Result<(), ClientError> {
        let workout_id = self.active_id()?;
        let request = entry.into_request(workout_id);

        let created = self
            .api
            .add_set(&request)
            .await
            .map_err(|err| self.report(err))?;
        debug!(workout_id, set_id = created.id, set_num = created.set_num, "set recorded");

        // Set numbers are assigned by the server, so re-read rather than append.
        let _ = self.refresh_sets().await;
        Ok(())
    }

    /// Returns `Ok(false)` when the operator declined.
    pub async fn delete_set(&mut self, set_id: i64) -> Result<bool, ClientError> {
        self.active_id()?;
        if !self.view.confirm("Delete this set?") {
            debug!(set_id, "set deletion declined");
            return Ok(false);
        }

        self.api
            .delete_set(set_id)
            .await
            .map_err(|err| self.report(err))?;
        debug!(set_id, "set deleted");

        let _ = self.refresh_sets().await;
        Ok(true)
    }

    pub async fn complete(&mut self) -> Result<(), ClientError> {
        self.finish(WorkoutStatus::Completed).await
    }

    /// Returns `Ok(false)` when the operator declined.
    pub async fn abandon(&mut self) -> Result<bool, ClientError> {
        self.active_id()?;
        if !self.view.confirm("Are you sure you want to abandon this workout?") {
            return Ok(false);
        }
        self.finish(WorkoutStatus::Abandoned).await?;
        Ok(true)
    }

    pub async fn refresh_sets(&mut self) -> Result<(), ClientError> {
        let Some(workout_id) = self.state.active().map(|session| session.id) else {
            return Ok(());
        };
        let sets = self
            .api
            .list_sets(workout_id)
            .await
            .map_err(|err| self.report(err))?;
        self.view.sets_changed(&sets);
        Ok(())
    }

    pub async fn refresh_history(&mut self) -> Result<(), ClientError> {
        let history = self
            .api
            .list_workouts()
            .await
            .map_err(|err| self.report(err))?;
        self.view.history_changed(&history);
        Ok(())
    }

    pub async fn load_equipment(&mut self) -> Result<(), ClientError> {
        let equipment = self
            .api
            .list_equipment()
            .await
            .map_err(|err| self.report(err))?;
        self.view.equipment_changed(&equipment);
        Ok(())
    }

    async fn finish(&mut self, status: WorkoutStatus) -> Result<(), ClientError> {
        let workout_id = self.active_id()?;
        let updated = self
            .api
            .update_workout_status(workout_id, status)
            .await
            .map_err(|err| self.report(err))?;

        self.state
            .finish(workout_id, status)
            .map_err(|err| self.report(err))?;
        info!(workout_id, status = updated.status.label(), "workout finished");
        self.view.session_changed(&self.state);

        let _ = self.refresh_history().await;
        Ok(())
    }

    fn active_id(&mut self) -> Result<i64, ClientError> {
        match self.state.require_active() {
            Ok(session) => Ok(session.id),
            Err(err) => Err(self.report(err)),
        }
    }

    fn report(&mut self, err: ClientError) -> ClientError {
        self.view.error(&err.to_string());
        err
    }
}
