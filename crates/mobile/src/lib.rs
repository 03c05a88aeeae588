mod logging;
pub mod state;
pub mod types;

uniffi::setup_scaffolding!();

/// Initialize the library with proper panic handling
/// Call this once at startup from Kotlin/Swift
#[uniffi::export]
pub fn init_panic_handler() {
    logging::setup_logging();
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!("=== RUST PANIC ===");
        tracing::error!("{panic_info}");
        tracing::error!("Backtrace:\n{backtrace}");
        eprintln!("{panic_info}\n{backtrace}");
    }));
}
