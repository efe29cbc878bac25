// Behavior layer for the static event site, headless.
// The page is parsed into a lightweight element tree; the controllers mutate
// it the way the browser script would, driven by injected interaction events.

pub mod binder;
pub mod calendar;
pub mod config;
pub mod dom;
pub mod i18n;
pub mod modal;
pub mod nav;
pub mod reveal;
pub mod runtime;

pub use config::SiteConfig;
pub use dom::Document;
pub use i18n::TranslationStore;
pub use runtime::{Event, PageRuntime};
