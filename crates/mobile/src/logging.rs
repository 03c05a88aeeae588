use std::sync::Once;

use tracing_subscriber::{filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        let filter =
            FilterFn::new(|en| en.module_path().unwrap_or_default().starts_with("route_watch"));

        #[cfg(target_os = "android")]
        let layer = {
            use tracing_logcat::{LogcatMakeWriter, LogcatTag};
            use tracing_subscriber::fmt::format::Format;

            let tag = LogcatTag::Fixed("RouteWatch-Rust".to_owned());
            let writer = LogcatMakeWriter::new(tag).expect("Failed to initialize logcat writer");
            tracing_subscriber::fmt::layer()
                .event_format(Format::default().with_level(false).without_time())
                .with_writer(writer)
                .with_ansi(false)
        };

        #[cfg(not(target_os = "android"))]
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        // The host may already own the global subscriber
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init();

        #[cfg(target_os = "android")]
        std::panic::set_hook(Box::new(panic_hook));
    })
}

#[cfg(target_os = "android")]
fn panic_hook(info: &std::panic::PanicHookInfo) {
    tracing::error!("{info}")
}
