use clap::Parser;
use todo_storage::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = cli::run(cli, &mut stdout) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
