//! Lisan binary entrypoint kept minimal. The session logic lives in `args`.

mod args;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = args::Args::parse();
    if args.list_sections {
        args::print_sections();
        return;
    }
    lisan::logging::init(&lisan::config::logs_dir(), &args::determine_log_level(&args));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Lisan starting");
    if let Err(err) = args::run(args).await {
        tracing::error!(error = %err, "Application error");
        eprintln!("lisan: {err}");
        std::process::exit(1);
    }
    tracing::info!("Lisan exited");
}
