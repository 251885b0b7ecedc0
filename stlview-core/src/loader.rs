/// Off-thread model loading
use std::fs;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use crate::catalog::ModelFile;
use crate::error::ViewerError;
use crate::metrics::ModelMetrics;
use crate::scene::Scene;
use crate::stl;

/// A parsed model plus its display metrics, ready to commit.
#[derive(Debug)]
pub struct LoadedModel {
    pub scene: Scene,
    pub metrics: ModelMetrics,
}

/// Result of one load request. The generation ties it back to the request
/// that spawned it; only the latest generation may commit.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<LoadedModel, ViewerError>,
}

/// Spawns one background thread per load request and funnels outcomes back
/// over a channel. Requests are never cancelled; a stale one runs to
/// completion and its outcome is discarded by the receiver.
pub struct Loader {
    outcome_tx: Sender<LoadOutcome>,
    outcome_rx: Receiver<LoadOutcome>,
}

impl Loader {
    pub fn new() -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            outcome_tx,
            outcome_rx,
        }
    }

    /// Dispatch a load off the interactive thread.
    pub fn spawn(&self, generation: u64, file: ModelFile) {
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = load_model(&file);
            // The receiver may already be gone during shutdown.
            let _ = tx.send(LoadOutcome { generation, result });
        });
    }

    /// Non-blocking poll for a finished load.
    pub fn try_recv(&self) -> Option<LoadOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn load_model(file: &ModelFile) -> Result<LoadedModel, ViewerError> {
    let data = fs::read(file.path()).map_err(|e| ViewerError::io(file.path(), e))?;
    let file_size = data.len() as u64;

    let mesh = stl::parse_stl(&data).map_err(|e| ViewerError::parse(file.path(), e))?;
    log::debug!(
        "loaded {}: {} triangles, {} bytes",
        file.name(),
        mesh.triangles.len(),
        file_size
    );

    let scene = Scene::from_mesh(file.name(), mesh);
    let metrics = ModelMetrics::compute(file.name(), &scene, file_size);
    Ok(LoadedModel { scene, metrics })
}
