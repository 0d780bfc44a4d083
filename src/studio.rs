//! Result presenter: one trigger, one error area, one preview/download slot.

use crate::artifact::{Artifact, ArtifactRegistry};
use crate::clock::FrameClock;
use crate::config::GeneratorConfig;
use crate::encode::encoder::MediaEncoder;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{GenError, GenResult};
use crate::pipeline::{Published, RunOptions, run_generation};
use crate::probe::{CapabilityQuery, MimeType};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the presenter currently shows.
///
/// An error and an artifact are never shown together.
#[derive(Debug, Default)]
pub enum StudioState {
    /// Nothing generated yet.
    #[default]
    Idle,
    /// A run is in progress; the trigger is disabled.
    Generating,
    /// The last run published an artifact.
    Ready(Published),
    /// The last run failed.
    Failed(GenError),
}

/// Owns the presenter state and the artifact references it hands out.
pub struct Studio {
    caps: Box<dyn CapabilityQuery>,
    options: RunOptions,
    registry: ArtifactRegistry,
    state: StudioState,
}

impl Studio {
    /// Presenter negotiating formats through `caps` and drawing with `options`.
    pub fn new(caps: Box<dyn CapabilityQuery>, options: RunOptions) -> Self {
        Self {
            caps,
            options,
            registry: ArtifactRegistry::new(),
            state: StudioState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &StudioState {
        &self.state
    }

    /// `false` while a run is in progress.
    pub fn trigger_enabled(&self) -> bool {
        !matches!(self.state, StudioState::Generating)
    }

    /// Text of the error area, if a run failed.
    pub fn error_text(&self) -> Option<String> {
        match &self.state {
            StudioState::Failed(e) => Some(e.user_message()),
            _ => None,
        }
    }

    /// The published result, if the last run succeeded.
    pub fn published(&self) -> Option<&Published> {
        match &self.state {
            StudioState::Ready(p) => Some(p),
            _ => None,
        }
    }

    /// The published artifact, resolved through its live reference.
    pub fn artifact(&self) -> Option<Arc<Artifact>> {
        self.published().and_then(|p| self.registry.resolve(&p.url))
    }

    /// References currently live in the registry.
    pub fn live_artifacts(&self) -> usize {
        self.registry.live_count()
    }

    /// Enter `Generating`: clear the error, release the previous artifact reference.
    ///
    /// Rejected with [`GenError::AlreadyGenerating`] while a run is in progress; the state is left
    /// untouched in that case.
    pub fn begin_run(&mut self) -> GenResult<()> {
        match std::mem::replace(&mut self.state, StudioState::Generating) {
            StudioState::Generating => Err(GenError::AlreadyGenerating),
            StudioState::Ready(previous) => {
                self.registry.revoke(&previous.url);
                tracing::debug!(url = %previous.url, "revoked previous artifact");
                Ok(())
            }
            StudioState::Idle | StudioState::Failed(_) => Ok(()),
        }
    }

    /// Leave `Generating` with the outcome of a run.
    pub fn finish_run(&mut self, outcome: GenResult<Published>) {
        self.state = match outcome {
            Ok(published) => StudioState::Ready(published),
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                StudioState::Failed(e)
            }
        };
    }

    /// Trigger one run.
    ///
    /// The outcome lands in [`Self::state`]; only a rejected overlapping trigger is returned as an
    /// error.
    pub fn generate<C, E, F>(
        &mut self,
        config: &GeneratorConfig,
        clock: &mut C,
        make_encoder: F,
    ) -> GenResult<()>
    where
        C: FrameClock + ?Sized,
        E: MediaEncoder,
        F: FnOnce(&MimeType) -> GenResult<E>,
    {
        self.begin_run()?;
        let outcome = run_generation(
            config,
            self.caps.as_ref(),
            clock,
            make_encoder,
            &mut self.registry,
            self.options.clone(),
        );
        self.finish_run(outcome);
        Ok(())
    }

    /// Write the published artifact to `dir` under its download name.
    pub fn save_download(&self, dir: &Path) -> GenResult<PathBuf> {
        let artifact = self
            .artifact()
            .ok_or_else(|| GenError::validation("no artifact to save"))?;
        let path = dir.join(artifact.file_name());
        ensure_parent_dir(&path)?;
        std::fs::write(&path, artifact.bytes()).map_err(|e| {
            GenError::Other(anyhow::anyhow!(
                "failed to write '{}': {e}",
                path.display()
            ))
        })?;
        tracing::info!(path = %path.display(), bytes = artifact.len(), "saved download");
        Ok(path)
    }
}
