/// Control surface: navigation, import, tint, AR flag, and load commits
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::ViewerError;
use crate::loader::{LoadOutcome, Loader};
use crate::metrics::ModelMetrics;
use crate::scene::{Scene, Tint};

/// Where the current navigation action stands. `Error` is presented like
/// `Idle`; only the log line tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

impl LoadPhase {
    pub fn is_loading(self) -> bool {
        self == LoadPhase::Loading
    }
}

/// Explicit viewer state, replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Selected catalog index; `None` only while the catalog is empty.
    pub selected: Option<usize>,
    pub tint: Tint,
    pub ar_active: bool,
    pub phase: LoadPhase,
}

impl ViewerState {
    fn initial() -> Self {
        Self {
            selected: None,
            tint: Tint::WHITE,
            ar_active: false,
            phase: LoadPhase::Idle,
        }
    }
}

/// Owns the catalog, the loader, the displayed scene, and the state struct.
/// Every user action is a discrete handler that produces the next state.
pub struct Controller {
    catalog: Catalog,
    loader: Loader,
    state: ViewerState,
    scene: Option<Scene>,
    metrics: Option<ModelMetrics>,
    /// Monotonic load-request counter; only the outcome carrying the latest
    /// value may commit.
    generation: u64,
}

impl Controller {
    pub fn new(catalog: Catalog) -> Self {
        let mut controller = Self {
            catalog,
            loader: Loader::new(),
            state: ViewerState::initial(),
            scene: None,
            metrics: None,
            generation: 0,
        };
        if !controller.catalog.is_empty() {
            controller.begin_load(0);
        }
        controller
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn metrics(&self) -> Option<&ModelMetrics> {
        self.metrics.as_ref()
    }

    /// Select and start loading a catalog entry. Out-of-range or
    /// empty-catalog requests are logged and dropped.
    pub fn select_index(&mut self, index: usize) {
        if index >= self.catalog.len() {
            let err = ViewerError::InvalidIndex {
                index,
                len: self.catalog.len(),
            };
            log::warn!("{err}");
            return;
        }
        self.begin_load(index);
    }

    /// Advance to the next model, wrapping at the end.
    pub fn next(&mut self) {
        if let Some(index) = self.step(1) {
            self.begin_load(index);
        }
    }

    /// Go back one model, wrapping at the start.
    pub fn previous(&mut self) {
        if let Some(index) = self.step(-1) {
            self.begin_load(index);
        }
    }

    fn step(&self, delta: isize) -> Option<usize> {
        let len = self.catalog.len();
        if len == 0 {
            log::warn!("navigation on empty catalog ignored");
            return None;
        }
        let current = self.state.selected.unwrap_or(0) as isize;
        Some((current + delta).rem_euclid(len as isize) as usize)
    }

    /// Import a picked file into the catalog. The first file ever imported
    /// starts loading immediately; otherwise the current selection stays.
    pub fn import(&mut self, source: &Path) {
        let was_empty = self.catalog.is_empty();
        match self.catalog.import(source) {
            Ok(file) => {
                log::info!("catalog now holds {} models ({})", self.catalog.len(), file.name());
                if was_empty {
                    self.begin_load(0);
                }
            }
            Err(err) => log::error!("import failed: {err}"),
        }
    }

    /// Apply a tint to the state and the live scene.
    pub fn set_tint(&mut self, tint: Tint) {
        self.state.tint = tint;
        if let Some(scene) = self.scene.as_mut() {
            scene.set_tint(tint);
        }
    }

    /// Flip the AR flag. Only the viewer backdrop reacts; nothing about the
    /// loaded scene or any session changes.
    pub fn toggle_ar(&mut self) {
        self.state.ar_active = !self.state.ar_active;
    }

    /// Path of the currently selected model for the share collaborator.
    pub fn share_path(&self) -> Option<&Path> {
        self.catalog.share_path(self.state.selected?)
    }

    /// Drain finished loads and commit the one matching the latest request.
    /// Call once per frame from the interactive thread.
    pub fn pump(&mut self) {
        while let Some(outcome) = self.loader.try_recv() {
            self.commit(outcome);
        }
    }

    fn begin_load(&mut self, index: usize) {
        let Some(file) = self.catalog.get(index) else {
            return;
        };
        self.generation += 1;
        self.loader.spawn(self.generation, file.clone());
        self.state = ViewerState {
            selected: Some(index),
            phase: LoadPhase::Loading,
            ..self.state.clone()
        };
    }

    pub(crate) fn commit(&mut self, outcome: LoadOutcome) {
        if outcome.generation != self.generation {
            log::debug!(
                "discarding stale load (generation {} < {})",
                outcome.generation,
                self.generation
            );
            return;
        }

        match outcome.result {
            Ok(mut loaded) => {
                loaded.scene.set_tint(self.state.tint);
                if let Some(previous) = &self.scene {
                    loaded.scene.set_root_scale(previous.root_scale());
                }
                self.scene = Some(loaded.scene);
                self.metrics = Some(loaded.metrics);
                self.state = ViewerState {
                    phase: LoadPhase::Loaded,
                    ..self.state.clone()
                };
            }
            Err(err) => {
                // Previous scene stays visible; the loading flag clears.
                log::error!("load failed: {err}");
                self.state = ViewerState {
                    phase: LoadPhase::Error,
                    ..self.state.clone()
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadOutcome;
    use crate::testutil;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Catalog over a tempdir seeded with `names`, each a 1-triangle STL.
    fn seeded(names: &[&str]) -> (TempDir, Controller) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), testutil::binary_stl_bytes(1)).unwrap();
        }
        let controller = Controller::new(Catalog::open(dir.path()).unwrap());
        (dir, controller)
    }

    fn settle(controller: &mut Controller) {
        for _ in 0..200 {
            controller.pump();
            if !controller.state().phase.is_loading() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("load never settled");
    }

    #[test]
    fn empty_catalog_navigation_is_a_no_op() {
        let (_dir, mut controller) = seeded(&[]);
        controller.next();
        controller.previous();
        controller.select_index(0);
        assert_eq!(controller.state().selected, None);
        assert_eq!(controller.state().phase, LoadPhase::Idle);
        assert!(controller.scene().is_none());
    }

    #[test]
    fn startup_loads_first_model() {
        let (_dir, mut controller) = seeded(&["a.stl"]);
        assert_eq!(controller.state().selected, Some(0));
        settle(&mut controller);
        assert_eq!(controller.state().phase, LoadPhase::Loaded);
        assert_eq!(controller.metrics().unwrap().name, "a.stl");
    }

    #[test]
    fn next_then_previous_round_trips_with_wraparound() {
        let (_dir, mut controller) = seeded(&["a.stl", "b.stl", "c.stl"]);
        for start in 0..3 {
            controller.select_index(start);
            controller.next();
            controller.previous();
            assert_eq!(controller.state().selected, Some(start));

            controller.previous();
            controller.next();
            assert_eq!(controller.state().selected, Some(start));
        }

        // Explicit wraparound at both ends.
        controller.select_index(2);
        controller.next();
        assert_eq!(controller.state().selected, Some(0));
        controller.previous();
        assert_eq!(controller.state().selected, Some(2));
    }

    #[test]
    fn out_of_range_selection_keeps_state() {
        let (_dir, mut controller) = seeded(&["a.stl"]);
        settle(&mut controller);
        let before = controller.state().clone();
        controller.select_index(5);
        assert_eq!(*controller.state(), before);
    }

    #[test]
    fn import_into_empty_catalog_loads_index_zero() {
        let (_dir, mut controller) = seeded(&[]);
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("new.stl");
        fs::write(&source, testutil::binary_stl_bytes(2)).unwrap();

        controller.import(&source);
        assert_eq!(controller.catalog().len(), 1);
        assert_eq!(controller.state().selected, Some(0));
        settle(&mut controller);
        assert_eq!(controller.metrics().unwrap().name, "new.stl");
    }

    #[test]
    fn import_with_selection_keeps_selection() {
        let (_dir, mut controller) = seeded(&["a.stl"]);
        settle(&mut controller);

        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("z.stl");
        fs::write(&source, testutil::binary_stl_bytes(1)).unwrap();
        controller.import(&source);

        assert_eq!(controller.catalog().len(), 2);
        assert_eq!(controller.state().selected, Some(0));
    }

    #[test]
    fn failed_load_keeps_previous_scene() {
        let (dir, mut controller) = seeded(&["good.stl"]);
        settle(&mut controller);

        // Too short for the binary header, no ascii prefix.
        fs::write(dir.path().join("zbad.stl"), b"junk").unwrap();
        controller.catalog.scan().unwrap();

        controller.select_index(1);
        settle(&mut controller);

        assert_eq!(controller.state().phase, LoadPhase::Error);
        assert_eq!(controller.metrics().unwrap().name, "good.stl");
        assert!(controller.scene().is_some());
    }

    #[test]
    fn stale_generation_never_commits() {
        let (_dir, mut controller) = seeded(&["a.stl", "b.stl"]);
        settle(&mut controller);
        let current = controller.metrics().unwrap().name.clone();

        // An outcome from a superseded request must be dropped even though
        // it finished last.
        let stale = LoadOutcome {
            generation: controller.generation - 1,
            result: Err(ViewerError::InvalidIndex { index: 0, len: 0 }),
        };
        controller.commit(stale);
        assert_eq!(controller.metrics().unwrap().name, current);
        assert_eq!(controller.state().phase, LoadPhase::Loaded);
    }

    #[test]
    fn tint_and_ar_do_not_touch_load_phase() {
        let (_dir, mut controller) = seeded(&["a.stl"]);
        settle(&mut controller);

        controller.set_tint(Tint::new(0.2, 0.4, 0.6));
        controller.toggle_ar();
        assert_eq!(controller.state().phase, LoadPhase::Loaded);
        assert!(controller.state().ar_active);
        assert_eq!(controller.scene().unwrap().nodes[0].tint, Tint::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn tint_survives_reload() {
        let (_dir, mut controller) = seeded(&["a.stl", "b.stl"]);
        settle(&mut controller);

        let teal = Tint::new(0.0, 0.8, 0.8);
        controller.set_tint(teal);
        controller.next();
        settle(&mut controller);
        assert_eq!(controller.scene().unwrap().nodes[0].tint, teal);
    }

    #[test]
    fn share_path_follows_selection() {
        let (_dir, mut controller) = seeded(&["a.stl", "b.stl"]);
        settle(&mut controller);
        assert!(controller.share_path().unwrap().ends_with("a.stl"));
        controller.next();
        assert!(controller.share_path().unwrap().ends_with("b.stl"));
    }
}
