use color_eyre::{eyre::eyre, Result};
use padmapper::controller::{ControllerHandle, ControllerSettings, PhysicalKeys};
use padmapper::mapping::MappingManager;
use padmapper::persistence::mapping_store::MappingStore;
use padmapper::persistence::{config_dir, AppConfig};
use padmapper::ui::PadMapperUI;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_dir = config_dir();
    let config = AppConfig::load_or_create(&config_dir).await?;
    info!("Using config from {}: {:?}", config_dir.display(), config);

    // Mapping laden: gespeicherter Import, sonst Datei aus der Konfiguration
    let manager = Arc::new(MappingManager::new(MappingStore::new(config_dir.clone())));
    let initial_source = manager.load_initial(&config.mapping_file).await;

    let physical_keys = Arc::new(PhysicalKeys::new());

    // Controller starten
    let controller_settings = ControllerSettings {
        tick_interval_ms: config.tick_interval_ms,
        gamepad_index: config.gamepad_index,
    };
    let controller = ControllerHandle::spawn_gilrs(
        controller_settings,
        manager.subscribe(),
        physical_keys.subscribe(),
    )
    .map_err(|e| eyre!("Failed to spawn controller: {}", e))?;

    // UI starten
    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("padmapper")
        .with_inner_size([1200.0, 640.0])
        .with_fullscreen(config.fullscreen);

    let runtime = tokio::runtime::Handle::current();
    eframe::run_native(
        "padmapper",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(PadMapperUI::new(
                cc,
                controller,
                manager,
                physical_keys,
                runtime,
                initial_source,
            )))
        }),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("padmapper shut down");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
