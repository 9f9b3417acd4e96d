use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bookworm::config::Settings;
use bookworm::interface::LibraryInterface;
use bookworm::notify::TracingNotifier;
use bookworm::{Library, server};

#[tokio::main]
async fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(?settings, "starting bookworm");

    if let Err(e) = run(settings).await {
        error!(error = %e, "bookworm stopped");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> bookworm::Result<()> {
    let mut library = if settings.seed {
        Library::seeded()?
    } else {
        Library::empty()
    };
    library.register_notifier(Box::new(TracingNotifier));
    if settings.expire_on_start {
        let expired = library.expire_memberships();
        info!(count = expired.len(), "lapsed memberships deactivated");
    }
    info!(
        books = library.store().books().len(),
        members = library.store().members().len(),
        transactions = library.store().transactions().len(),
        "library ready"
    );
    let interface = Arc::new(LibraryInterface::new(library));
    server::serve(interface, &settings.listen_address).await
}
