// Entrypoint for the front end.
// - Keeps `main` small: resolve the config, bootstrap the app, mount it.
// - The optional first argument is the page to open, e.g. `/project/general`.

use facerec_cli::{app::App, config::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the menus.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Base URL from `FACEREC_API`, the config file, or the default.
    // See `config::Config::from_env`.
    let config = Config::from_env()?;
    let app = App::bootstrap(&config)?;

    let start = std::env::args().nth(1);
    app.mount(start.as_deref()).await
}
