use std::io;
use std::process::ExitCode;

use holded_cli::App;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays parseable with --json.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let code = App::new(&mut out, &mut err).run(std::env::args());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
