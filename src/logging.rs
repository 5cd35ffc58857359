use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr so it never mixes
/// with command output on stdout.
pub(crate) fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log filter {filter:?}: {err}");
        EnvFilter::new("warn")
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(err) = result {
        eprintln!("Logging already initialised: {err}");
    }
}
