use clap::Parser;
use confedit_cli::args::ConfeditArgs;
use std::process::exit;

fn main() {
    let args = ConfeditArgs::parse();
    setup_stderr_logging(args.verbose);

    match confedit_cli::run(args) {
        Ok(()) => exit(0),
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "operation failed");
            eprintln!("error: {error:#}");
            exit(1);
        }
    }
}

fn setup_stderr_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
