use std::sync::LazyLock;

use regex::Regex;

use super::search_url;
use crate::dom::{DomNode, Page};
use crate::error::FeatureError;
use crate::event::ClickEvent;
use crate::feature::Feature;
use crate::navigation::open_in_new_tab;
use crate::selector::{AttrTest, Compound, Selector};

const LOG_PREFIX: &str = "[MiddleClick Everywhere - YT][suggestions]";

const SUGGESTION_ROOTS: [Selector; 3] = [
    Selector::new(&[Compound::tag("tp-yt-paper-listbox").with_attr(AttrTest::Equals("role", "listbox"))]),
    Selector::new(&[Compound::tag("ytd-searchbox-suggestions")]),
    Selector::new(&[Compound::tag("yt-searchbox-suggestions")]),
];

const VIDEO_PLAYER: Selector = Selector::new(&[Compound::id("movie_player"), Compound::class("html5-video-player")]);

const SUGGESTION_CANDIDATES: Selector = Selector::new(&[
    Compound::attr(AttrTest::Equals("role", "option")),
    Compound::tag("ytd-searchbox-suggestion"),
    Compound::tag("yt-searchbox-suggestion"),
    Compound::attr(AttrTest::Contains("class", "suggestion")),
]);

const SUGGESTION_CONTAINER: Selector = Selector::new(&[
    Compound::tag("ytd-searchbox-suggestion"),
    Compound::attr(AttrTest::Equals("role", "option")),
    Compound::tag("yt-searchbox-suggestion"),
    Compound::attr(AttrTest::Contains("class", "suggestion")),
]);

const TEXT_ATTRIBUTES: [&str; 5] = ["aria-label", "title", "data-query", "data-value", "data-text"];

const TEXT_CARRIER: Selector = Selector::new(&[
    Compound::attr(AttrTest::Present("aria-label")),
    Compound::attr(AttrTest::Present("title")),
    Compound::attr(AttrTest::Present("data-query")),
    Compound::attr(AttrTest::Present("data-value")),
    Compound::attr(AttrTest::Present("data-text")),
]);

const FORMATTED_STRING: Selector = Selector::new(&[Compound::tag("yt-formatted-string")]);
const SPAN: Selector = Selector::new(&[Compound::tag("span")]);

static SUGGESTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)YTD-SEARCHBOX-SUGGESTION|YT-SEARCHBOX-SUGGESTION").expect("valid regex"));
static SUGGESTION_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)suggestion").expect("valid regex"));

/// Rows of the search box's autocomplete dropdown
pub struct SearchSuggestions;

impl<P: Page> Feature<P> for SearchSuggestions {
    fn name(&self) -> &str {
        "search-suggestions"
    }

    fn handle_primary_down(&self, page: &P, event: &P::Event) -> Result<bool, FeatureError> {
        if find_suggestion(page, event).is_none() {
            return Ok(false);
        }

        log::debug!("{} mousedown on suggestion row", LOG_PREFIX);

        event.suppress();
        Ok(true)
    }

    fn handle_aux_click(&self, page: &P, event: &P::Event) -> Result<bool, FeatureError> {
        let Some(suggestion) = find_suggestion(page, event) else {
            return Ok(false);
        };

        let text = suggestion_text(&suggestion);
        log::debug!("{} auxclick on suggestion: {:?}", LOG_PREFIX, text);

        if text.is_empty() {
            return Ok(false);
        }

        let url = search_url(&text);
        open_in_new_tab(page, event, &url);
        Ok(true)
    }
}

fn in_video_player<N: DomNode>(node: &N) -> bool {
    node.closest(&VIDEO_PLAYER).is_some()
}

fn is_suggestion_node<N: DomNode>(node: &N) -> bool {
    SUGGESTION_TAG.is_match(&node.tag_name())
        || node.attribute("role").as_deref() == Some("option")
        || SUGGESTION_CLASS.is_match(&node.class_name())
}

/// First suggestion-looking node of the event path outside the player
fn find_suggestion_in_path<N: DomNode>(nodes: &[N]) -> Option<N> {
    nodes
        .iter()
        .filter(|node| !in_video_player(*node))
        .find(|node| is_suggestion_node(*node))
        .cloned()
}

fn suggestions_root<P: Page>(page: &P) -> Option<P::Node> {
    SUGGESTION_ROOTS
        .iter()
        .find_map(|selector| page.query_selector(selector))
        .or_else(|| page.body())
}

/// Candidate whose box contains the pointer, searched under the dropdown
/// first and the whole document if the dropdown has no candidates
fn find_suggestion_at<P: Page>(page: &P, x: f64, y: f64) -> Option<P::Node> {
    let mut candidates = suggestions_root(page)
        .map(|root| root.query_selector_all(&SUGGESTION_CANDIDATES))
        .unwrap_or_default();
    if candidates.is_empty() {
        candidates = page.query_selector_all(&SUGGESTION_CANDIDATES);
    }

    candidates
        .into_iter()
        .filter(|node| !in_video_player(node))
        .find(|node| node.bounding_rect().contains(x, y))
}

fn normalize<N: DomNode>(node: N) -> N {
    node.closest(&SUGGESTION_CONTAINER).unwrap_or(node)
}

fn find_suggestion<P: Page>(page: &P, event: &P::Event) -> Option<P::Node> {
    find_suggestion_in_path(&event.composed_path())
        .or_else(|| find_suggestion_at(page, event.client_x(), event.client_y()))
        .map(normalize)
}

fn attribute_text<N: DomNode>(node: &N) -> Option<String> {
    TEXT_ATTRIBUTES.iter().find_map(|name| {
        node.attribute(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn first_line(text: &str) -> Option<String> {
    let line = text.trim().lines().next().unwrap_or("").trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// Query text of a suggestion row. Tries attributes, then the row's visible
/// text, then raw text nodes.
fn suggestion_text<N: DomNode>(node: &N) -> String {
    let node = normalize(node.clone());

    if let Some(text) = attribute_text(&node) {
        return text;
    }

    if let Some(text) = node.query_selector(&TEXT_CARRIER).and_then(|d| attribute_text(&d)) {
        return text;
    }

    if let Some(text) = first_line(&node.text()) {
        return text;
    }

    let text_el = node
        .query_selector(&FORMATTED_STRING)
        .or_else(|| node.query_selector(&SPAN))
        .unwrap_or_else(|| node.clone());
    if let Some(text) = first_line(&text_el.text()) {
        return text;
    }

    let joined = node
        .text_nodes()
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    let outer: String = node.outer_html().chars().take(200).collect();
    log::debug!(
        "{} Could not extract text from suggestion node: tag={} class={:?} outer={}",
        LOG_PREFIX,
        node.tag_name(),
        node.class_name(),
        outer.split_whitespace().collect::<Vec<_>>().join(" ")
    );
    String::new()
}
