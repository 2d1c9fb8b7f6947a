use eframe::CreationContext;
use neurovision::app::NeuroVisionApp;
use neurovision::config::AppConfig;
use neurovision::logging;
use neurovision::upload::SimulationRuntime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config ignored: {e}");
            AppConfig::default()
        }
    };

    if let Err(err) = logging::init(&config.logging.level) {
        eprintln!("Logging disabled: {err}");
    }

    let runtime = SimulationRuntime::start()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NeuroVision Assist",
        options,
        Box::new(move |cc: &CreationContext| Box::new(NeuroVisionApp::new(cc, config, runtime))),
    )?;
    Ok(())
}
