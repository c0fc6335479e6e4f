use std::io;

/// Install the global tracing subscriber.
///
/// Logs always go to stderr: stdout carries the host protocol.
pub fn setup_logging(verbose_level: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        tracing_subscriber::EnvFilter::new(filter_for_verbosity(verbose_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

fn filter_for_verbosity(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "warn,chat_assistant=info,llm=info",
        1 => "info,chat_assistant=debug,llm=debug",
        _ => "debug,chat_assistant=trace,llm=trace",
    }
}
