//! CLI entry point (§6): parse arguments, build the backend for the
//! requested source, and run the listener.
//!
//! Exit codes (§6): `0` on a clean shutdown, `1` on a configuration error
//! (bad arguments, unknown `--type`), `2` on backend construction failure
//! (unreadable or malformed source).

use clap::Parser;

use structdav::dispatch::Cli;
use structdav::errors::DavError;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let kind = match cli.resolve_adapter() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("structdav: {e}");
            std::process::exit(1);
        }
    };

    let source_label = cli
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".to_string());
    log::info!("serving {source_label} as {kind:?}");

    let empty = std::path::PathBuf::new();
    let source_path = cli.source.as_deref().unwrap_or(&empty);
    let backend = match structdav::dispatch::build_backend(kind, source_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("structdav: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = structdav::server::serve(&cli.listen_addr(), backend) {
        eprintln!("structdav: {}", DavError::from(e));
        std::process::exit(2);
    }
}
