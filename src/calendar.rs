// Derives the calendar subscribe and ICS download links from the embedded
// Google Calendar iframe. The calendar id comes from the iframe's `src` query
// parameter; anything unparseable falls back to a placeholder id.

use url::Url;

use crate::dom::Document;

const IFRAME_ID: &str = "gcalIframe";
const SUBSCRIBE_ID: &str = "gcalSubscribe";
const DOWNLOAD_ID: &str = "icsDownload";
const PLACEHOLDER_ID: &str = "your_calendar_id";
const DOWNLOAD_FILENAME: &str = "events.ics";

/// Wires the subscribe and download anchors. A no-op when any of the three
/// required elements is missing from the page.
pub fn setup(doc: &mut Document) {
    let (Some(iframe), Some(subscribe), Some(download)) = (
        doc.by_id(IFRAME_ID),
        doc.by_id(SUBSCRIBE_ID),
        doc.by_id(DOWNLOAD_ID),
    ) else {
        return;
    };

    let src = doc
        .element(iframe)
        .and_then(|el| el.attr("src"))
        .unwrap_or("")
        .to_string();
    let cal_id = calendar_id(&src);

    let (subscribe_href, download_href) = links(&cal_id);
    if let Some(el) = doc.element_mut(subscribe) {
        el.set_attr("href", &subscribe_href);
    }
    if let Some(el) = doc.element_mut(download) {
        el.set_attr("href", &download_href);
        el.set_attr("download", DOWNLOAD_FILENAME);
    }
}

/// Extracts the calendar id from the iframe `src`, or the placeholder when
/// the URL does not parse or carries no `src` parameter. The value is kept in
/// its raw encoded form; the outbound links encode it once more.
fn calendar_id(iframe_src: &str) -> String {
    Url::parse(iframe_src)
        .ok()
        .and_then(|url| {
            url.query().and_then(|query| {
                query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("src=").map(str::to_string))
            })
        })
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_ID.to_string())
}

/// The two outbound links for one calendar id. The id is component-encoded in
/// both, so an already-encoded id is encoded a second time, as the original
/// links were built.
fn links(cal_id: &str) -> (String, String) {
    let encoded = encode_component(cal_id);
    (
        format!("https://www.google.com/calendar/render?cid={}", encoded),
        format!(
            "https://calendar.google.com/calendar/ical/{}/public/basic.ics",
            encoded
        ),
    )
}

/// Form-style percent encoding of one URL component.
fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(src_attr: &str) -> Document {
        Document::parse(&format!(
            concat!(
                "<iframe id=\"gcalIframe\" src=\"{}\"></iframe>",
                "<a id=\"gcalSubscribe\">Subscribe</a>",
                "<a id=\"icsDownload\">Download</a>"
            ),
            src_attr
        ))
    }

    fn href(doc: &Document, id: &str) -> String {
        let node = doc.by_id(id).unwrap();
        doc.element(node).unwrap().attr("href").unwrap_or("").to_string()
    }

    #[test]
    fn derives_links_from_the_iframe_query() {
        let mut doc = page(
            "https://calendar.google.com/calendar/embed?src=abc%40group.calendar.google.com&ctz=Europe%2FRome",
        );
        setup(&mut doc);

        // The embedded id is percent-encoded once already; the link encodes
        // it again.
        assert_eq!(
            href(&doc, "gcalSubscribe"),
            "https://www.google.com/calendar/render?cid=abc%2540group.calendar.google.com"
        );
        assert_eq!(
            href(&doc, "icsDownload"),
            "https://calendar.google.com/calendar/ical/abc%2540group.calendar.google.com/public/basic.ics"
        );
        let download = doc.by_id("icsDownload").unwrap();
        assert_eq!(
            doc.element(download).unwrap().attr("download"),
            Some("events.ics")
        );
    }

    #[test]
    fn unparseable_src_uses_the_placeholder() {
        let mut doc = page("not a url");
        setup(&mut doc);
        assert_eq!(
            href(&doc, "gcalSubscribe"),
            "https://www.google.com/calendar/render?cid=your_calendar_id"
        );
    }

    #[test]
    fn missing_src_parameter_uses_the_placeholder() {
        let mut doc = page("https://calendar.google.com/calendar/embed?ctz=Europe%2FRome");
        setup(&mut doc);
        assert!(href(&doc, "icsDownload").contains("/ical/your_calendar_id/"));
    }

    #[test]
    fn missing_elements_leave_the_page_untouched() {
        let mut doc = Document::parse("<a id=\"gcalSubscribe\">Subscribe</a>");
        setup(&mut doc);
        assert_eq!(href(&doc, "gcalSubscribe"), "");
    }
}
