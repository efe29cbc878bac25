// Shared details modal for the event cards.
// A card click (or Enter/Space) parses the card's declarative attributes into
// a descriptor and populates the modal through the translation store, using
// the live active-language cell so a language switch re-renders the next open
// without rebinding. Backdrop click or Escape closes it.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::dom::{Document, NodeId};
use crate::i18n::TranslationStore;

const MODAL_ID: &str = "eventModal";
const IMG_ID: &str = "modalEventImg";
const TITLE_ID: &str = "modalEventTitle";
const DATE_ID: &str = "modalEventDate";
const PARTICIPANTS_ID: &str = "modalEventParticipants";
const DESCRIPTION_ID: &str = "modalEventDescription";

/// One optional label/value/icon slot of a card.
#[derive(Debug, Clone, Default)]
pub struct CustomSlot {
    pub label: Option<String>,
    pub value: Option<String>,
    pub icon: Option<String>,
}

/// Typed form of one event card's declarative attributes. Parsed at
/// activation time; the card markup itself is never written back.
#[derive(Debug, Clone, Default)]
pub struct EventCard {
    pub img: String,
    pub title: String,
    pub date: String,
    pub participants: String,
    pub description: String,
    pub custom: [CustomSlot; 2],
}

impl EventCard {
    /// Reads the descriptor off a card element. Absent attributes become
    /// empty fields.
    pub fn from_element(doc: &Document, card: NodeId) -> Self {
        let attr = |name: &str| {
            doc.element(card)
                .and_then(|el| el.attr(name))
                .map(str::to_string)
        };
        let slot = |n: usize| CustomSlot {
            label: attr(&format!("data-custom{}-label", n)),
            value: attr(&format!("data-custom{}-value", n)),
            icon: attr(&format!("data-custom{}-icon", n)),
        };
        Self {
            img: attr("data-img").unwrap_or_default(),
            title: attr("data-title").unwrap_or_default(),
            date: attr("data-date").unwrap_or_default(),
            participants: attr("data-participants").unwrap_or_default(),
            description: attr("data-description").unwrap_or_default(),
            custom: [slot(1), slot(2)],
        }
    }
}

/// The modal's two-state controller: closed (initial) or open with one
/// card's content. Opening another card overwrites in place.
pub struct ModalController {
    lang: Arc<Mutex<String>>,
    open: bool,
}

impl ModalController {
    /// Wires the controller to the shared active-language cell.
    pub fn new(lang: Arc<Mutex<String>>) -> Self {
        Self { lang, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn current_lang(&self) -> String {
        self.lang.lock().unwrap().clone()
    }

    /// closed→open (or overwrite while open): populates every field from the
    /// card descriptor and shows the modal, locking background scroll.
    pub fn open_card(&mut self, doc: &mut Document, store: &TranslationStore, card: NodeId) {
        let Some(modal) = doc.by_id(MODAL_ID) else {
            return;
        };
        let lang = self.current_lang();
        let descriptor = EventCard::from_element(doc, card);

        let title = store.resolve_or_literal(&lang, &descriptor.title);
        if let Some(img) = doc.by_id(IMG_ID) {
            if let Some(el) = doc.element_mut(img) {
                el.set_attr("src", &descriptor.img);
                el.set_attr("alt", &title);
            }
        }
        set_field_text(doc, TITLE_ID, &title);
        set_field_text(
            doc,
            DESCRIPTION_ID,
            &store.resolve_or_literal(&lang, &descriptor.description),
        );
        set_field_text(
            doc,
            PARTICIPANTS_ID,
            &store.resolve_or_literal(&lang, &descriptor.participants),
        );
        let date = display_date(&store.resolve_or_literal(&lang, &descriptor.date), &lang);
        set_field_text(doc, DATE_ID, &date);

        for (n, slot) in descriptor.custom.iter().enumerate() {
            let n = n + 1;
            let label = slot
                .label
                .as_deref()
                .map(|key| store.resolve_or_literal(&lang, key))
                .unwrap_or_default();
            let value = slot
                .value
                .as_deref()
                .map(|key| store.resolve_or_literal(&lang, key))
                .unwrap_or_default();
            set_field_text(doc, &format!("modalCustom{}Label", n), &label);
            set_field_text(doc, &format!("modalCustom{}Value", n), &value);
            if let Some(icon) = doc.by_id(&format!("modalCustom{}Icon", n)) {
                // Icon markup is trusted source content, injected verbatim.
                doc.set_inner_html(icon, slot.icon.as_deref().unwrap_or(""));
            }
        }

        update_labels(doc, store, &lang);

        if let Some(el) = doc.element_mut(modal) {
            el.set_style("display", "flex");
        }
        if let Some(body) = doc.by_tag("body") {
            if let Some(el) = doc.element_mut(body) {
                el.set_style("overflow", "hidden");
            }
        }
        self.open = true;
    }

    /// open→closed: hides the modal and releases the scroll lock.
    pub fn close(&mut self, doc: &mut Document) {
        let Some(modal) = doc.by_id(MODAL_ID) else {
            return;
        };
        if let Some(el) = doc.element_mut(modal) {
            el.set_style("display", "none");
        }
        if let Some(body) = doc.by_tag("body") {
            if let Some(el) = doc.element_mut(body) {
                el.set_style("overflow", "");
            }
        }
        self.open = false;
    }

    /// Enter or Space on a card behaves like a click.
    pub fn card_key(
        &mut self,
        doc: &mut Document,
        store: &TranslationStore,
        card: NodeId,
        key: &str,
    ) {
        if key == "Enter" || key == " " {
            self.open_card(doc, store, card);
        }
    }

    /// A click that landed on the modal element itself (the backdrop, not
    /// its content) closes it.
    pub fn backdrop_click(&mut self, doc: &mut Document, target: NodeId) {
        if self.open && doc.by_id(MODAL_ID) == Some(target) {
            self.close(doc);
        }
    }

    /// Escape closes the modal while it is open.
    pub fn escape_key(&mut self, doc: &mut Document) {
        if self.open {
            self.close(doc);
        }
    }
}

/// Refreshes the modal's static captions for `lang`, open or not.
pub fn update_labels(doc: &mut Document, store: &TranslationStore, lang: &str) {
    set_field_text(doc, "modalEventDateLabel", &store.resolve(lang, "modal.date"));
    set_field_text(
        doc,
        "modalEventParticipantsLabel",
        &store.resolve(lang, "modal.participants"),
    );
    set_field_text(
        doc,
        "modalEventDescriptionLabel",
        &store.resolve(lang, "modal.description"),
    );
}

fn set_field_text(doc: &mut Document, id: &str, value: &str) {
    if let Some(node) = doc.by_id(id) {
        doc.set_text(node, value);
    }
}

/// Formats an ISO `YYYY-MM-DD` value as a long localized date for `lang`;
/// anything else passes through verbatim (pre-formatted or translated date
/// phrases).
pub fn display_date(value: &str, lang: &str) -> String {
    if !is_iso_shaped(value) {
        return value.to_string();
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => match lang {
            "it" => date
                .format_localized("%-d %B %Y", chrono::Locale::it_IT)
                .to_string(),
            _ => date
                .format_localized("%B %-d, %Y", chrono::Locale::en_US)
                .to_string(),
        },
        // Shaped like a date but not a real one: show it as-is.
        Err(_) => value.to_string(),
    }
}

fn is_iso_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TranslationStore {
        TranslationStore::from_value(json!({
            "en": {
                "events": {
                    "lan": {
                        "title": "LAN Final",
                        "description": "The season closer.",
                        "participants": "32 teams"
                    }
                },
                "modal": { "date": "Date", "participants": "Participants", "description": "Description" }
            },
            "it": {
                "events": { "lan": { "title": "Finale LAN" } },
                "modal": { "date": "Data", "participants": "Partecipanti", "description": "Descrizione" }
            }
        }))
    }

    const PAGE: &str = concat!(
        "<html><body>",
        "<div id=\"card\" class=\"event-card\" data-img=\"lan.jpg\" data-title=\"events.lan.title\" ",
        "data-date=\"2023-11-09\" data-participants=\"events.lan.participants\" ",
        "data-description=\"events.lan.description\" ",
        "data-custom1-label=\"Prize\" data-custom1-value=\"500€\" ",
        "data-custom1-icon=\"<svg class=&quot;trophy&quot;></svg>\"></div>",
        "<div id=\"plain\" class=\"event-card\" data-title=\"Casual night\" data-date=\"TBD\"></div>",
        "<div id=\"eventModal\"><div class=\"modal-content\">",
        "<img id=\"modalEventImg\"><h3 id=\"modalEventTitle\"></h3>",
        "<span id=\"modalEventDateLabel\"></span><span id=\"modalEventDate\"></span>",
        "<span id=\"modalEventParticipantsLabel\"></span><span id=\"modalEventParticipants\"></span>",
        "<span id=\"modalEventDescriptionLabel\"></span><p id=\"modalEventDescription\"></p>",
        "<span id=\"modalCustom1Label\"></span><span id=\"modalCustom1Value\"></span>",
        "<span id=\"modalCustom1Icon\"></span>",
        "<span id=\"modalCustom2Label\"></span><span id=\"modalCustom2Value\"></span>",
        "<span id=\"modalCustom2Icon\"></span>",
        "</div></div></body></html>"
    );

    fn text(doc: &Document, id: &str) -> String {
        doc.text_content(doc.by_id(id).unwrap())
    }

    fn lang_cell(code: &str) -> Arc<Mutex<String>> {
        Arc::new(Mutex::new(code.to_string()))
    }

    #[test]
    fn open_populates_all_fields_from_the_descriptor() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("en"));
        let card = doc.by_id("card").unwrap();

        modal.open_card(&mut doc, &store, card);
        assert!(modal.is_open());
        assert_eq!(text(&doc, "modalEventTitle"), "LAN Final");
        assert_eq!(text(&doc, "modalEventDate"), "November 9, 2023");
        assert_eq!(text(&doc, "modalEventParticipants"), "32 teams");
        assert_eq!(text(&doc, "modalEventDescription"), "The season closer.");
        assert_eq!(text(&doc, "modalEventDateLabel"), "Date");

        let img = doc.by_id("modalEventImg").unwrap();
        assert_eq!(doc.element(img).unwrap().attr("src"), Some("lan.jpg"));
        assert_eq!(doc.element(img).unwrap().attr("alt"), Some("LAN Final"));

        // Custom slot one carries literals and trusted icon markup.
        assert_eq!(text(&doc, "modalCustom1Label"), "Prize");
        assert_eq!(text(&doc, "modalCustom1Value"), "500€");
        let icon = doc.by_id("modalCustom1Icon").unwrap();
        assert!(doc.find_descendant(icon, |el| el.tag == "svg").is_some());

        let modal_el = doc.by_id("eventModal").unwrap();
        assert_eq!(
            doc.element(modal_el).unwrap().style("display").as_deref(),
            Some("flex")
        );
        let body = doc.by_tag("body").unwrap();
        assert_eq!(
            doc.element(body).unwrap().style("overflow").as_deref(),
            Some("hidden")
        );
    }

    #[test]
    fn italian_iso_date_formats_long_form() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("it"));
        let card = doc.by_id("card").unwrap();

        modal.open_card(&mut doc, &store, card);
        assert_eq!(text(&doc, "modalEventDate"), "9 novembre 2023");
        assert_eq!(text(&doc, "modalEventTitle"), "Finale LAN");
        assert_eq!(text(&doc, "modalEventDateLabel"), "Data");
    }

    #[test]
    fn non_iso_date_and_literal_fields_pass_through() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("en"));
        let card = doc.by_id("plain").unwrap();

        modal.open_card(&mut doc, &store, card);
        assert_eq!(text(&doc, "modalEventTitle"), "Casual night");
        assert_eq!(text(&doc, "modalEventDate"), "TBD");
    }

    #[test]
    fn missing_custom_slots_render_empty_without_panicking() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("en"));

        // First open fills slot one; opening the plain card must clear it.
        let card = doc.by_id("card").unwrap();
        modal.open_card(&mut doc, &store, card);
        let plain = doc.by_id("plain").unwrap();
        modal.open_card(&mut doc, &store, plain);

        assert_eq!(text(&doc, "modalCustom1Label"), "");
        assert_eq!(text(&doc, "modalCustom1Value"), "");
        assert_eq!(text(&doc, "modalCustom1Icon"), "");
        assert_eq!(text(&doc, "modalCustom2Label"), "");
    }

    #[test]
    fn backdrop_click_and_escape_close_content_click_does_not() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("en"));
        let card = doc.by_id("card").unwrap();

        modal.open_card(&mut doc, &store, card);
        let content = doc.with_class("modal-content")[0];
        modal.backdrop_click(&mut doc, content);
        assert!(modal.is_open());

        let backdrop = doc.by_id("eventModal").unwrap();
        modal.backdrop_click(&mut doc, backdrop);
        assert!(!modal.is_open());
        assert_eq!(
            doc.element(backdrop).unwrap().style("display").as_deref(),
            Some("none")
        );
        let body = doc.by_tag("body").unwrap();
        assert_eq!(doc.element(body).unwrap().style("overflow"), None);

        modal.open_card(&mut doc, &store, card);
        modal.escape_key(&mut doc);
        assert!(!modal.is_open());

        // Escape while closed stays closed.
        modal.escape_key(&mut doc);
        assert!(!modal.is_open());
    }

    #[test]
    fn space_and_enter_activate_a_card() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let mut modal = ModalController::new(lang_cell("en"));
        let card = doc.by_id("card").unwrap();

        modal.card_key(&mut doc, &store, card, " ");
        assert!(modal.is_open());
        modal.close(&mut doc);
        modal.card_key(&mut doc, &store, card, "Enter");
        assert!(modal.is_open());
        modal.close(&mut doc);
        modal.card_key(&mut doc, &store, card, "x");
        assert!(!modal.is_open());
    }

    #[test]
    fn language_switch_re_renders_through_the_live_cell() {
        let mut doc = Document::parse(PAGE);
        let store = store();
        let cell = lang_cell("en");
        let mut modal = ModalController::new(Arc::clone(&cell));
        let card = doc.by_id("card").unwrap();

        modal.open_card(&mut doc, &store, card);
        assert_eq!(text(&doc, "modalEventTitle"), "LAN Final");

        *cell.lock().unwrap() = "it".to_string();
        modal.open_card(&mut doc, &store, card);
        assert_eq!(text(&doc, "modalEventTitle"), "Finale LAN");
        assert_eq!(text(&doc, "modalEventDate"), "9 novembre 2023");
    }

    #[test]
    fn date_display_examples() {
        assert_eq!(display_date("2024-05-01", "en"), "May 1, 2024");
        assert_eq!(display_date("2023-11-09", "it"), "9 novembre 2023");
        assert_eq!(display_date("TBD", "en"), "TBD");
        assert_eq!(display_date("2023-13-40", "en"), "2023-13-40");
    }
}
