// Applies the active language across the page.
// Scans for the declarative translation markers and writes resolved text and
// attributes in place. Repeated application with the same language converges
// to the same document, so a language switch is just another apply.

use crate::dom::Document;
use crate::i18n::TranslationStore;
use crate::modal;

/// Key of the footer note, the one canonical variant.
const FOOTER_NOTE_KEY: &str = "footer.note";

/// Applies `lang` to every marked element of the document: `[data-i18n]`
/// content, `[data-i18n-placeholder]` inputs, the footer note, the active
/// state of the language selector buttons and the modal's static captions.
/// Idempotent over an unchanged document.
pub fn apply(doc: &mut Document, store: &TranslationStore, lang: &str) {
    if let Some(html) = doc.by_tag("html") {
        if let Some(el) = doc.element_mut(html) {
            el.set_attr("lang", lang);
        }
    }

    for id in doc.with_attribute("data-i18n") {
        let key = match doc.element(id).and_then(|el| el.attr("data-i18n")) {
            Some(key) => key.to_string(),
            None => continue,
        };
        let mut text = store.resolve(lang, &format!("{}.text", key));
        if text.is_empty() {
            text = store.resolve(lang, &key);
        }
        // Nothing resolved: leave whatever the markup already shows.
        if text.is_empty() {
            continue;
        }
        match doc.find_descendant(id, |el| el.tag == "img") {
            Some(img) => {
                // Keep the image; localize its accessible name instead of
                // replacing the content.
                let mut alt = store.resolve(lang, &format!("{}.alt", key));
                if alt.is_empty() {
                    alt = text.clone();
                }
                if let Some(el) = doc.element_mut(img) {
                    el.set_attr("alt", &alt);
                }
                if let Some(el) = doc.element_mut(id) {
                    el.set_attr("aria-label", &text);
                }
            }
            None => doc.set_inner_html(id, &text),
        }
    }

    for id in doc.with_attribute("data-i18n-placeholder") {
        let key = match doc.element(id).and_then(|el| el.attr("data-i18n-placeholder")) {
            Some(key) => key.to_string(),
            None => continue,
        };
        let value = store.resolve(lang, &key);
        if !value.is_empty() {
            if let Some(el) = doc.element_mut(id) {
                el.set_attr("placeholder", &value);
            }
        }
    }

    if let Some(footer) = doc.with_class("footer-note").first().copied() {
        let note = store.resolve(lang, FOOTER_NOTE_KEY);
        doc.set_inner_html(footer, &note);
    }

    for id in doc.with_class("lang-btn") {
        let matches = doc
            .element(id)
            .and_then(|el| el.attr("data-lang"))
            .map(|code| code == lang)
            .unwrap_or(false);
        if let Some(el) = doc.element_mut(id) {
            if matches {
                el.add_class("active");
            } else {
                el.remove_class("active");
            }
        }
    }

    // Keep the modal captions current even while it is closed, so the next
    // open already shows the right language.
    modal::update_labels(doc, store, lang);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TranslationStore {
        TranslationStore::from_value(json!({
            "en": {
                "brand": { "text": "UniTn <strong>E-sports</strong>", "alt": "Team logo" },
                "nav": { "events": "Events" },
                "search": { "placeholder": "Search events" },
                "footer": { "note": "Made with ❤️" }
            },
            "it": {
                "nav": { "events": "Eventi" },
                "footer": { "note": "Fatto con ❤️" }
            }
        }))
    }

    const PAGE: &str = concat!(
        "<html lang=\"en\"><body>",
        "<a class=\"brand\" data-i18n=\"brand\"><img src=\"logo.png\" alt=\"\"></a>",
        "<a href=\"#events\" data-i18n=\"nav.events\">placeholder</a>",
        "<span data-i18n=\"nav.unknown\">untouched</span>",
        "<input data-i18n-placeholder=\"search.placeholder\">",
        "<input id=\"other\" data-i18n-placeholder=\"search.missing\" placeholder=\"kept\">",
        "<p class=\"footer-note\">old</p>",
        "<button class=\"lang-btn active\" data-lang=\"en\">EN</button>",
        "<button class=\"lang-btn\" data-lang=\"it\">IT</button>",
        "</body></html>"
    );

    #[test]
    fn writes_text_and_preserves_missing_keys() {
        let mut doc = Document::parse(PAGE);
        apply(&mut doc, &store(), "en");

        let nav = doc.with_attribute("data-i18n")[1];
        assert_eq!(doc.text_content(nav), "Events");
        let unknown = doc.with_attribute("data-i18n")[2];
        assert_eq!(doc.text_content(unknown), "untouched");
    }

    #[test]
    fn image_containers_get_alt_and_aria_label_not_content() {
        let mut doc = Document::parse(PAGE);
        apply(&mut doc, &store(), "en");

        let brand = doc.with_class("brand")[0];
        let el = doc.element(brand).unwrap();
        assert_eq!(el.attr("aria-label"), Some("UniTn <strong>E-sports</strong>"));
        let img = doc.find_descendant(brand, |el| el.tag == "img").unwrap();
        assert_eq!(doc.element(img).unwrap().attr("alt"), Some("Team logo"));
    }

    #[test]
    fn markup_in_translations_is_injected() {
        let mut doc = Document::parse("<html><p data-i18n=\"brand\">x</p></html>");
        apply(&mut doc, &store(), "en");
        let p = doc.with_attribute("data-i18n")[0];
        assert!(doc.find_descendant(p, |el| el.tag == "strong").is_some());
    }

    #[test]
    fn placeholders_written_only_when_resolved() {
        let mut doc = Document::parse(PAGE);
        apply(&mut doc, &store(), "en");

        let inputs = doc.with_attribute("data-i18n-placeholder");
        assert_eq!(
            doc.element(inputs[0]).unwrap().attr("placeholder"),
            Some("Search events")
        );
        let other = doc.by_id("other").unwrap();
        assert_eq!(doc.element(other).unwrap().attr("placeholder"), Some("kept"));
    }

    #[test]
    fn exactly_one_language_button_active() {
        let mut doc = Document::parse(PAGE);
        apply(&mut doc, &store(), "it");

        let buttons = doc.with_class("lang-btn");
        assert!(!doc.element(buttons[0]).unwrap().has_class("active"));
        assert!(doc.element(buttons[1]).unwrap().has_class("active"));

        let html = doc.by_tag("html").unwrap();
        assert_eq!(doc.element(html).unwrap().attr("lang"), Some("it"));
    }

    #[test]
    fn footer_note_follows_language() {
        let mut doc = Document::parse(PAGE);
        apply(&mut doc, &store(), "it");
        let footer = doc.with_class("footer-note")[0];
        assert_eq!(doc.text_content(footer), "Fatto con ❤️");
    }

    #[test]
    fn accented_translation_values_apply_cleanly() {
        let store = TranslationStore::from_value(json!({
            "it": { "footer": { "note": "È fatto con amore" } }
        }));
        let mut doc = Document::parse("<p class=\"footer-note\">x</p>");
        apply(&mut doc, &store, "it");
        let footer = doc.with_class("footer-note")[0];
        assert_eq!(doc.text_content(footer), "È fatto con amore");
    }

    #[test]
    fn apply_is_idempotent() {
        let mut once = Document::parse(PAGE);
        apply(&mut once, &store(), "en");
        let mut twice = Document::parse(PAGE);
        apply(&mut twice, &store(), "en");
        apply(&mut twice, &store(), "en");
        assert_eq!(once.to_html(), twice.to_html());
    }
}
