//! Edit Session - one open batch editor
//!
//! A session owns the rows as loaded (`original`) and the grid being edited.
//! It ends exactly once: [`EditSession::cancel`] drops it, a successful
//! [`EditSession::confirm`] consumes it. A rejected confirm hands the session
//! back inside the [`Rejection`] so the user can fix the rows.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::context::BatchContext;
use crate::diff::{self, Diff};
use crate::experiment::{BatchId, RowRecord, SampleId};
use crate::grid::{Grid, GridCommand, GridOutcome};
use crate::source::{CommandSink, PersistedRowSource, RemovalEligibilityCheck};
use crate::validation::CellVerdict;
use crate::{Error, Result};

/// An open batch editor.
#[derive(Debug)]
pub struct EditSession {
    batch_id: BatchId,
    batch_name: String,
    opened_at: DateTime<Utc>,
    original: Vec<RowRecord>,
    grid: Grid,
}

/// Outcome of confirming a session.
#[derive(Debug)]
pub enum Confirmation {
    /// The diff was handed to the command sink
    Submitted(Diff),
    /// Nothing was submitted
    Rejected(Rejection),
}

/// Why a confirm was refused, plus the session to continue editing.
#[derive(Debug)]
pub struct Rejection {
    session: Box<EditSession>,
    cell_failures: Vec<CellVerdict>,
    removal_blocked: Vec<String>,
}

impl Rejection {
    /// Invalid cells.
    #[must_use]
    pub fn cell_failures(&self) -> &[CellVerdict] {
        &self.cell_failures
    }

    /// One message per removed sample that still has data attached.
    #[must_use]
    pub fn removal_blocked(&self) -> &[String] {
        &self.removal_blocked
    }

    /// Take the session back.
    #[must_use]
    pub fn into_session(self) -> EditSession {
        *self.session
    }
}

impl EditSession {
    /// Open an editor on persisted rows.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a row has no `sample_id`.
    pub fn open(
        batch_id: BatchId,
        batch_name: impl Into<String>,
        original: Vec<RowRecord>,
        context: BatchContext,
        config: &EngineConfig,
    ) -> Result<Self> {
        if let Some(position) = original.iter().position(|row| !row.is_persisted()) {
            return Err(Error::InvalidInput(format!(
                "row {position} of batch {batch_id} has no sample id"
            )));
        }
        let mut grid = Grid::with_config(context, config);
        if !original.is_empty() {
            grid.dispatch(GridCommand::LoadRows(original.clone()))?;
        }
        info!(batch = %batch_id, rows = original.len(), "opened edit session");
        Ok(Self {
            batch_id,
            batch_name: batch_name.into(),
            opened_at: Utc::now(),
            original,
            grid,
        })
    }

    /// Open an editor for registering a new batch (no original rows).
    #[must_use]
    pub fn register(
        batch_id: BatchId,
        batch_name: impl Into<String>,
        context: BatchContext,
        config: &EngineConfig,
    ) -> Self {
        info!(batch = %batch_id, "opened registration session");
        Self {
            batch_id,
            batch_name: batch_name.into(),
            opened_at: Utc::now(),
            original: Vec::new(),
            grid: Grid::with_config(context, config),
        }
    }

    /// Open an editor on the rows a source holds for `batch_id`.
    ///
    /// # Errors
    ///
    /// Propagates source errors, and as [`EditSession::open`].
    pub async fn load<S: PersistedRowSource>(
        source: &S,
        batch_id: BatchId,
        batch_name: impl Into<String>,
        context: BatchContext,
        config: &EngineConfig,
    ) -> Result<Self> {
        let original = source.existing_rows_for_batch(&batch_id).await?;
        Self::open(batch_id, batch_name, original, context, config)
    }

    /// Get the batch ID.
    #[must_use]
    pub const fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// Get the batch name.
    #[must_use]
    pub fn batch_name(&self) -> &str {
        &self.batch_name
    }

    /// When the session was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Rows as loaded.
    #[must_use]
    pub fn original(&self) -> &[RowRecord] {
        &self.original
    }

    /// The grid being edited.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Apply a grid command.
    ///
    /// # Errors
    ///
    /// As [`Grid::dispatch`].
    pub fn dispatch(&mut self, command: GridCommand) -> Result<GridOutcome> {
        self.grid.dispatch(command)
    }

    /// Diff of the current edit against the original rows.
    #[must_use]
    pub fn pending_diff(&self) -> Diff {
        diff::diff(&self.original, &self.grid.records())
    }

    /// Discard the session; nothing has been persisted.
    pub fn cancel(self) {
        debug!(batch = %self.batch_id, "edit session cancelled");
    }

    /// Validate, check removals and submit.
    ///
    /// # Errors
    ///
    /// Propagates collaborator errors. Validation failures and blocked
    /// removals are not errors; they yield [`Confirmation::Rejected`].
    pub async fn confirm<E, S>(mut self, eligibility: &E, sink: &S) -> Result<Confirmation>
    where
        E: RemovalEligibilityCheck,
        S: CommandSink,
    {
        let cell_failures: Vec<CellVerdict> = self
            .grid
            .validate_all()
            .into_iter()
            .filter(|verdict| !verdict.is_valid())
            .collect();
        if !cell_failures.is_empty() {
            debug!(
                batch = %self.batch_id,
                invalid_cells = cell_failures.len(),
                "confirm rejected by validation"
            );
            return Ok(Confirmation::Rejected(Rejection {
                session: Box::new(self),
                cell_failures,
                removal_blocked: Vec::new(),
            }));
        }

        let diff = self.pending_diff();
        let mut removal_blocked = Vec::new();
        for sample_id in diff.removed() {
            if !eligibility.is_removable(sample_id).await? {
                let message = format!(
                    "Sample {} cannot be removed: data is attached to it.",
                    self.display_name(sample_id)
                );
                warn!(batch = %self.batch_id, sample = %sample_id, "removal blocked");
                removal_blocked.push(message);
            }
        }
        if !removal_blocked.is_empty() {
            return Ok(Confirmation::Rejected(Rejection {
                session: Box::new(self),
                cell_failures: Vec::new(),
                removal_blocked,
            }));
        }

        sink.submit(&self.batch_id, diff.clone()).await?;
        info!(
            batch = %self.batch_id,
            added = diff.added().len(),
            changed = diff.changed().len(),
            removed = diff.removed().len(),
            "edit session confirmed"
        );
        Ok(Confirmation::Submitted(diff))
    }

    fn display_name(&self, sample_id: &SampleId) -> String {
        self.original
            .iter()
            .find(|row| row.sample_id() == Some(sample_id))
            .and_then(RowRecord::sample_code)
            .map_or_else(|| sample_id.to_string(), ToString::to_string)
    }
}
