//! Logger setup for the `docmig` binary

use std::io::Write;

/// Timestamp layout of every log line, e.g. `2024-05-01 09:30:12,047`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Install a stdout logger producing `<timestamp> <LEVEL> <message>` lines.
///
/// INFO by default, DEBUG with `--verbose`; `RUST_LOG` overrides both.
pub(crate) fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .target(env_logger::Target::Stdout)
    .format(|buf, record| {
        writeln!(
            buf,
            "{} {} {}",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    })
    .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialised: {e}");
    }
}
