use std::str::FromStr;

use api::ClientConfig;
use dioxus::prelude::*;

use ui::{NoticeToast, SessionProvider};
use views::{Home, Signup};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/signup")]
    Signup {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Built-in client configuration; edit `receipts.toml` next to this crate's manifest.
const CONFIG_TOML: &str = include_str!("../receipts.toml");

fn main() {
    let (config, problem) = load_config(CONFIG_TOML);

    let level =
        tracing::Level::from_str(config.logging.level.as_str()).unwrap_or(tracing::Level::INFO);
    dioxus::logger::init(level).ok();
    if let Some(problem) = problem {
        tracing::error!("{} is unusable, using defaults: {}", ClientConfig::filename(), problem);
    }
    match config.to_toml() {
        Ok(effective) => tracing::debug!("effective {}:\n{}", ClientConfig::filename(), effective),
        Err(err) => tracing::warn!("could not render effective config: {}", err),
    }

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(App);
}

/// Parse and validate the embedded config. Any problem is returned alongside
/// the default config so it can be logged once the logger is up.
fn load_config(source: &str) -> (ClientConfig, Option<String>) {
    match ClientConfig::from_toml(source).and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => (config, None),
        Err(err) => (ClientConfig::default(), Some(err.to_string())),
    }
}

#[component]
fn App() -> Element {
    let config = use_context::<ClientConfig>();

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            config,
            Router::<Route> {}
            NoticeToast {}
        }
    }
}
