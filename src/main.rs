// Entrypoint for the CLI application.
// - Keeps `main` small: install logging, load the catalog and hand it to
//   the UI loop.
// - Returns `anyhow::Result` so a failed final save exits non-zero.

use library_manager::{catalog::Library, store::CatalogStore, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // `book_data.json` in the working directory. See `CatalogStore::in_current_dir`.
    let library = Library::open(CatalogStore::in_current_dir());

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(library)?;
    Ok(())
}
