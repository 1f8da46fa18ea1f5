use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));

const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Text content of the document body with script and style contents removed.
///
/// Falls back to the text of the whole document when there is no body or the
/// body has no text. html5ever recovers from any malformed input, so this never
/// fails.
pub fn raw_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(visible_text)
        .unwrap_or_default();

    if !body_text.is_empty() {
        return body_text;
    }

    visible_text(document.root_element())
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in root.descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        if node.ancestors().any(|ancestor| is_skipped(ancestor.value())) {
            continue;
        }
        text.push_str(chunk);
    }
    text
}

fn is_skipped(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
}
