/// STLVIEW - browse and view STL models in the terminal
///
/// Usage: stlview [models-dir]
///
/// Controls:
///   - WASD / Arrow Keys: Rotate, E/R: Roll, +/-: Zoom, V: Projection
///   - N/P or 1-9: Switch model, O: Import, X: Share
///   - C: Tint, B: AR backdrop, I: Model info, Q/ESC: Quit
use std::env;

use env_logger::Env;
use stlview_core::{Catalog, Controller};
use stlview_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let dir = env::args().nth(1).unwrap_or_else(|| "models".to_string());
    let catalog = Catalog::open(dir)?;
    let controller = Controller::new(catalog);
    let mut app = TerminalApp::new(controller)?;
    app.run()?;

    Ok(())
}
