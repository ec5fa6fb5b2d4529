use std::sync::LazyLock;

use regex::Regex;

use super::search_url;
use crate::dom::{DomNode, Page};
use crate::error::FeatureError;
use crate::event::ClickEvent;
use crate::feature::Feature;
use crate::navigation::open_in_new_tab;
use crate::selector::{AttrTest, Compound, Selector};

const LOG_PREFIX: &str = "[MiddleClick Everywhere - YT][search-button]";

const SEARCH_INPUT: Selector = Selector::new(&[Compound::tag("input").with_id("search")]);
const LABELLED_SEARCH_INPUT: Selector =
    Selector::new(&[Compound::tag("input").with_attr(AttrTest::Equals("aria-label", "Search"))]);
const MASTHEAD: Selector = Selector::new(&[Compound::tag("ytd-masthead")]);
const INPUT: Selector = Selector::new(&[Compound::tag("input")]);
const BUTTON: Selector = Selector::new(&[Compound::tag("button")]);

static SEARCH_BUTTON_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ytSearchboxComponentSearchButton").expect("valid regex"));

/// The magnifier button next to the masthead search box
pub struct SearchButton;

impl<P: Page> Feature<P> for SearchButton {
    fn name(&self) -> &str {
        "search-button"
    }

    fn handle_primary_down(&self, page: &P, event: &P::Event) -> Result<bool, FeatureError> {
        if find_search_button(page, event).is_none() {
            return Ok(false);
        }

        log::debug!("{} mousedown on search button", LOG_PREFIX);

        // Stop autoscroll before it starts
        event.suppress();
        Ok(true)
    }

    fn handle_aux_click(&self, page: &P, event: &P::Event) -> Result<bool, FeatureError> {
        if find_search_button(page, event).is_none() {
            return Ok(false);
        }

        let url = search_url(&current_query(page));
        open_in_new_tab(page, event, &url);

        log::debug!("{} auxclick on search button: {}", LOG_PREFIX, url);
        Ok(true)
    }
}

fn search_input<P: Page>(page: &P) -> Option<P::Node> {
    page.query_selector(&SEARCH_INPUT)
        .or_else(|| page.query_selector(&LABELLED_SEARCH_INPUT))
        .or_else(|| {
            page.query_selector(&MASTHEAD)
                .and_then(|masthead| masthead.query_selector(&INPUT))
        })
}

/// Trimmed text of the search box, empty when there is none
fn current_query<P: Page>(page: &P) -> String {
    search_input(page)
        .and_then(|input| input.value())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn is_search_button<N: DomNode>(node: &N) -> bool {
    if !node.tag_name().eq_ignore_ascii_case("button") {
        return false;
    }

    if node.id().contains("search-icon") {
        return true;
    }
    if SEARCH_BUTTON_CLASS.is_match(&node.class_name()) {
        return true;
    }

    node.attribute("aria-label")
        .is_some_and(|label| label.to_lowercase() == "search")
}

fn enclosing_search_button<N: DomNode>(node: &N) -> Option<N> {
    node.closest(&BUTTON).filter(is_search_button)
}

/// Event path first, then whatever is under the pointer
fn find_search_button<P: Page>(page: &P, event: &P::Event) -> Option<P::Node> {
    event
        .composed_path()
        .iter()
        .find_map(enclosing_search_button)
        .or_else(|| {
            page.elements_from_point(event.client_x(), event.client_y())
                .iter()
                .find_map(enclosing_search_button)
        })
}
