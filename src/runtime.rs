// Page runtime: bootstrap wiring and the single-threaded event loop.
// Nav, scroll and calendar wiring happen synchronously against the markup;
// the translation store arrives already loaded (the one async step), then the
// binder applies the active language and the modal is wired to the live
// language cell. Every interaction handler runs to completion.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::binder;
use crate::calendar;
use crate::config::SiteConfig;
use crate::dom::{Document, NodeId};
use crate::i18n::TranslationStore;
use crate::modal::ModalController;
use crate::nav::{self, ScrollRequest};
use crate::reveal::{IntersectionEntry, RevealObserver};

/// Default viewport width before any resize report.
const DEFAULT_VIEWPORT: u32 = 1280;

/// One user interaction, dispatched to the owning controller.
#[derive(Debug, Clone)]
pub enum Event {
    Click { target: NodeId },
    KeyDown { key: String, target: Option<NodeId> },
    Intersections(Vec<IntersectionEntry>),
    ViewportWidth(u32),
}

/// Owns the document and all controllers after bootstrap.
pub struct PageRuntime {
    doc: Document,
    store: TranslationStore,
    lang: Arc<Mutex<String>>,
    config: SiteConfig,
    config_path: PathBuf,
    reveal: RevealObserver,
    modal: ModalController,
    viewport_width: u32,
    last_scroll: Option<ScrollRequest>,
}

impl PageRuntime {
    /// Boots the behavior layer over a parsed page: synchronous calendar and
    /// reveal wiring, language negotiation, first binder application, modal
    /// wiring through the shared language cell. The chosen language is
    /// persisted immediately, as every application is.
    pub fn bootstrap(
        mut doc: Document,
        store: TranslationStore,
        config: SiteConfig,
        config_path: PathBuf,
    ) -> Self {
        calendar::setup(&mut doc);
        let reveal = RevealObserver::observe_all(&doc);

        let lang = config.initial_language();
        let cell = Arc::new(Mutex::new(lang.clone()));
        binder::apply(&mut doc, &store, &lang);
        let modal = ModalController::new(Arc::clone(&cell));

        let mut runtime = Self {
            doc,
            store,
            lang: cell,
            config,
            config_path,
            reveal,
            modal,
            viewport_width: DEFAULT_VIEWPORT,
            last_scroll: None,
        };
        runtime.persist_language(&lang);
        runtime
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn html(&self) -> String {
        self.doc.to_html()
    }

    pub fn active_language(&self) -> String {
        self.lang.lock().unwrap().clone()
    }

    /// The most recent smooth-scroll request produced by an anchor click.
    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Routes one interaction to its controller. Unrecognized targets fall
    /// through silently.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Click { target } => self.click(target),
            Event::KeyDown { key, target } => self.key_down(&key, target),
            Event::Intersections(entries) => {
                self.reveal.on_entries(&mut self.doc, &entries);
            }
            Event::ViewportWidth(width) => self.viewport_width = width,
        }
    }

    /// Switches the active language: updates the live cell, re-applies the
    /// binder and persists the preference (last write wins).
    pub fn set_language(&mut self, lang: &str) {
        *self.lang.lock().unwrap() = lang.to_string();
        binder::apply(&mut self.doc, &self.store, lang);
        self.persist_language(lang);
    }

    fn persist_language(&mut self, lang: &str) {
        self.config.site_lang = Some(lang.to_string());
        if let Err(e) = self.config.save(&self.config_path) {
            // Preference loss is not worth failing an interaction over.
            tracing::warn!("could not persist language preference: {:#}", e);
        }
    }

    fn click(&mut self, target: NodeId) {
        let Some(el) = self.doc.element(target) else {
            return;
        };
        let id = el.attr("id").unwrap_or("").to_string();
        let is_lang_btn = el.has_class("lang-btn");
        let is_card = el.has_class("event-card");
        let lang_code = el.attr("data-lang").map(str::to_string);
        let is_anchor = el.tag == "a";

        if id == "navToggle" {
            nav::toggle(&mut self.doc);
        } else if is_lang_btn {
            if let Some(code) = lang_code {
                self.set_language(&code);
            }
        } else if is_card {
            self.modal.open_card(&mut self.doc, &self.store, target);
        } else if id == "eventModal" {
            self.modal.backdrop_click(&mut self.doc, target);
        } else if is_anchor {
            if let Some(request) = nav::anchor_click(&mut self.doc, target, self.viewport_width) {
                self.last_scroll = Some(request);
            }
        }
    }

    fn key_down(&mut self, key: &str, target: Option<NodeId>) {
        if key == "Escape" {
            self.modal.escape_key(&mut self.doc);
            return;
        }
        let Some(target) = target else {
            return;
        };
        let Some(el) = self.doc.element(target) else {
            return;
        };
        let is_toggle = el.attr("id") == Some("navToggle");
        let is_card = el.has_class("event-card");
        if is_toggle {
            nav::toggle_key(&mut self.doc, key);
        } else if is_card {
            self.modal.card_key(&mut self.doc, &self.store, target, key);
        }
    }
}
