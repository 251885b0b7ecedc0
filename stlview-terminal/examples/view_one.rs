/// Example: view a single STL file
///
/// Usage: cargo run --example view_one -- path/to/file.stl
use std::env;
use std::path::Path;

use env_logger::Env;
use stlview_core::{Catalog, Controller};
use stlview_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let Some(file) = args.get(1) else {
        eprintln!("Usage: {} <stl-file>", args[0]);
        std::process::exit(2);
    };

    let path = Path::new(file);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let catalog = Catalog::open(dir)?;
    let wanted = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let index = catalog
        .iter()
        .position(|f| Some(f.name().to_string()) == wanted);

    let mut controller = Controller::new(catalog);
    match index {
        Some(i) => controller.select_index(i),
        None => anyhow::bail!("{} is not an .stl file in {}", file, dir.display()),
    }

    let mut app = TerminalApp::new(controller)?;
    app.run()?;
    Ok(())
}
