//! Text extraction from a rendered DOM, with best-effort consent-overlay removal.
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// Button labels that accept a cookie-consent prompt (compared lowercase, whole label).
pub const CONSENT_LABELS: &[&str] = &[
    "accept",
    "agree",
    "accept all",
    "i agree",
    "zgadzam sie",
    "zgadzam się",
    "akceptuj",
];

const CONSENT_MARKERS: &[&str] = &["cookie", "consent", "gdpr", "cmp"];
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentOutcome {
    Dismissed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub text: String,
    pub consent: ConsentOutcome,
}

pub fn extract_page_text(html: &str) -> PageText {
    let mut doc = Html::parse_document(html);
    let consent = dismiss_consent(&mut doc);
    PageText {
        text: visible_text(&doc),
        consent,
    }
}

/// Detach the overlay around any consent button. Never fails; at worst nothing is found.
fn dismiss_consent(doc: &mut Html) -> ConsentOutcome {
    let Ok(buttons) = Selector::parse(
        "button, [role=button], input[type=button], input[type=submit]",
    ) else {
        return ConsentOutcome::NotFound;
    };

    let targets: Vec<NodeId> = doc
        .select(&buttons)
        .filter(|button| is_consent_label(&button_label(button)))
        .map(overlay_of)
        .collect();
    if targets.is_empty() {
        return ConsentOutcome::NotFound;
    }

    for id in targets {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    ConsentOutcome::Dismissed
}

fn button_label(button: &ElementRef) -> String {
    let raw = if button.value().name() == "input" {
        button.value().attr("value").unwrap_or_default().to_string()
    } else {
        button.text().collect::<String>()
    };
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_consent_label(label: &str) -> bool {
    let label = label.to_lowercase();
    CONSENT_LABELS.contains(&label.as_str())
}

/// Nearest ancestor that looks like a consent banner or modal; the button itself otherwise.
fn overlay_of(button: ElementRef) -> NodeId {
    button
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| looks_like_overlay(el))
        .map(|el| el.id())
        .unwrap_or_else(|| button.id())
}

fn looks_like_overlay(el: &ElementRef) -> bool {
    let element = el.value();
    if matches!(element.attr("role"), Some("dialog") | Some("alertdialog"))
        || element.attr("aria-modal") == Some("true")
    {
        return true;
    }
    let id = element.id().unwrap_or_default().to_lowercase();
    let classes = element.classes().collect::<Vec<_>>().join(" ").to_lowercase();
    CONSENT_MARKERS
        .iter()
        .any(|marker| id.contains(marker) || classes.contains(marker))
}

/// Text a reader would see: hidden containers skipped, whitespace collapsed,
/// one line per block element.
fn visible_text(doc: &Html) -> String {
    let mut out = String::new();
    let mut last_block: Option<NodeId> = None;

    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| HIDDEN_TAGS.contains(&el.value().name()))
        {
            continue;
        }
        let words = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if words.is_empty() {
            continue;
        }

        let block = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| BLOCK_TAGS.contains(&el.value().name()))
            .map(|el| el.id());
        if !out.is_empty() {
            out.push(if block == last_block { ' ' } else { '\n' });
        }
        out.push_str(&words);
        last_block = block;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{extract_page_text, ConsentOutcome};

    #[test]
    fn removes_cookie_banner_and_keeps_article() {
        let html = r#"<html><head><title>T</title><style>p{}</style></head><body>
            <div class="cookie-banner"><p>We use cookies</p><button> Accept   all </button></div>
            <article><h1>Heading</h1><p>First <b>bold</b> line</p></article>
            <script>var x = 1;</script>
        </body></html>"#;

        let page = extract_page_text(html);

        assert_eq!(page.consent, ConsentOutcome::Dismissed);
        assert_eq!(page.text, "Heading\nFirst bold line");
    }

    #[test]
    fn dialog_role_is_an_overlay() {
        let html = r#"<body><section role="dialog"><span>Privacy</span><input type="submit" value="Akceptuj"></section><p>Body</p></body>"#;

        let page = extract_page_text(html);

        assert_eq!(page.consent, ConsentOutcome::Dismissed);
        assert_eq!(page.text, "Body");
    }

    #[test]
    fn unrelated_buttons_are_kept() {
        let html = r#"<body><p>Text</p><button>Accept the challenge</button></body>"#;

        let page = extract_page_text(html);

        assert_eq!(page.consent, ConsentOutcome::NotFound);
        assert_eq!(page.text, "Text\nAccept the challenge");
    }

    #[test]
    fn empty_body_yields_empty_text() {
        let page = extract_page_text("<html><body>  <script>x()</script> </body></html>");
        assert!(page.text.is_empty());
    }
}
