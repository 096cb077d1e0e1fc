// App bootstrap: builds the router, installs the display filters and the
// API client, then mounts the root view onto the terminal.

use crate::api::ApiClient;
use crate::config::Config;
use crate::filters::{format_number, Filters, FORMAT_NUMBER};
use crate::router::{routes, Router};
use crate::ui;
use anyhow::{bail, Result};
use std::io::IsTerminal;

pub struct App {
    pub api: ApiClient,
    pub router: Router,
    pub filters: Filters,
}

impl App {
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        let router = Router::new(&config.base_path, routes());

        let mut filters = Filters::new();
        filters.register(FORMAT_NUMBER, format_number);

        tracing::info!(api = %config.api, base = %router.base(), "front end initialized");
        Ok(App {
            api,
            router,
            filters,
        })
    }

    /// Mount the root view and run until the user exits. `start` is the
    /// initial navigation path; it defaults to the router base.
    pub async fn mount(mut self, start: Option<&str>) -> Result<()> {
        check_anchor(std::io::stdout().is_terminal())?;
        let start = start.unwrap_or("/");
        if self.router.push(start).is_none() {
            tracing::warn!(path = %start, "unknown start path, falling back to root");
            self.router.push("/");
        }
        tracing::info!("mounted");
        ui::run(&mut self).await
    }
}

// The views draw on stdout; without a terminal there is nothing to mount on.
fn check_anchor(interactive: bool) -> Result<()> {
    if !interactive {
        bail!("Cannot mount: stdout is not an interactive terminal");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bootstrap_wires_config_and_filters() {
        let app = App::bootstrap(&Config::new("http://host:5000")).unwrap();
        assert_eq!(app.api.base_url(), "http://host:5000/");
        assert_eq!(
            app.filters.apply(FORMAT_NUMBER, &json!(0.5)).as_deref(),
            Some("0.50")
        );
        assert!(app.router.current().is_none());
        assert!(app.router.resolve("/crawler").is_some());
    }

    #[test]
    fn mounting_needs_a_terminal() {
        let err = check_anchor(false).unwrap_err();
        assert!(err.to_string().contains("not an interactive terminal"));
        assert!(check_anchor(true).is_ok());
    }
}
