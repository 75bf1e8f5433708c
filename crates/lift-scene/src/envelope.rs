// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Display envelope: the current scene plus the previous one for
//! freeze-frame continuity after a run ends.

use std::sync::Arc;

use crate::types::Scene;

/// Lifecycle status of the displayed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
    /// Snapshots are still arriving.
    #[default]
    Updating,
    /// The run has completed; display freezes on the last live frame.
    Finished,
}

/// Wrapper around the current and previous [`Scene`].
///
/// Scenes are shared by reference: absorbing a new snapshot moves the old
/// `current` into `previous` without copying, so the last fully-valid
/// frame survives run resets and replays.
#[derive(Clone, Debug, Default)]
pub struct SceneEnvelope {
    /// Run lifecycle status.
    pub status: RunStatus,
    /// Most recently received scene.
    pub current: Option<Arc<Scene>>,
    /// The scene received before `current`, kept for freeze-frame display.
    pub previous: Option<Arc<Scene>>,
}

impl SceneEnvelope {
    /// Absorb a freshly normalized scene as the new `current`.
    ///
    /// `previous` is replaced by the prior `current` only when the incoming
    /// scene has `tick > 0`. A `tick == 0` scene marks a run reset, and the
    /// last fully-valid frame of the old run must not be discarded.
    pub fn absorb(&mut self, scene: Scene) {
        if scene.tick > 0 {
            if let Some(cur) = self.current.take() {
                self.previous = Some(cur);
            }
        }
        self.current = Some(Arc::new(scene));
        self.status = RunStatus::Updating;
    }

    /// Mark the run finished; display sticks to the previous frame.
    pub fn finish(&mut self) {
        self.status = RunStatus::Finished;
    }

    /// The scene that should be rendered right now.
    ///
    /// While updating this is `current`; once finished it is `previous`
    /// when present (the last frame before the terminal condition), else
    /// `current`.
    pub fn display(&self) -> Option<&Arc<Scene>> {
        match self.status {
            RunStatus::Updating => self.current.as_ref(),
            RunStatus::Finished => self.previous.as_ref().or(self.current.as_ref()),
        }
    }
}
