use kiln_core::{BuildAborted, BuildPhase, Error, TaskExecutionRecord};

/// Phase and records of a build in progress
#[derive(Debug)]
pub struct BuildState {
    phase: BuildPhase,
    records: Vec<TaskExecutionRecord>,
}

impl BuildState {
    pub fn new() -> Self {
        Self {
            phase: BuildPhase::Init,
            records: Vec::new(),
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn records(&self) -> &[TaskExecutionRecord] {
        &self.records
    }

    /// Move to the next phase
    pub fn advance(&mut self, next: BuildPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid build transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(from = %self.phase, to = %next, "Build phase changed");
        self.phase = next;
    }

    pub fn record(&mut self, record: TaskExecutionRecord) {
        self.records.push(record);
    }

    /// Abort with `error`, handing over the records gathered so far.
    ///
    /// The state moves to [`BuildPhase::Failed`]; the returned error carries
    /// the phase the build was in when it failed.
    pub fn fail(&mut self, error: Error) -> BuildAborted {
        let failed_in = self.phase;
        self.advance(BuildPhase::Failed);
        tracing::error!(phase = %failed_in, error = %error, "Build failed");
        BuildAborted::new(failed_in, error, std::mem::take(&mut self.records))
    }

    /// Complete the build and hand back its records
    pub fn finish(mut self) -> Vec<TaskExecutionRecord> {
        self.advance(BuildPhase::Done);
        self.records
    }
}

impl Default for BuildState {
    fn default() -> Self {
        Self::new()
    }
}
