fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG controls the level
    env_logger::init();

    // Background loads (images, sounds, file dialogs) run on this runtime
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    // Run the spin wheel application
    spin_wheel::run_app()
}
