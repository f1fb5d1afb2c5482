use shared::{PostId, VoteDirection};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::app::{CountDisplay, VoteClick};

pub const VOTE_CONTROL_SELECTOR: &str = ".upvote, .downvote";

/// Writes counts into the element whose id is the post id.
pub struct DomCountDisplay {}

impl CountDisplay for DomCountDisplay {
    fn show(&self, post: &PostId, markup: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(target) = document.get_element_by_id(post.as_str()) {
            target.set_inner_html(markup);
        }
    }
}

pub fn direction_from_classes<'a>(mut classes: impl Iterator<Item = &'a str>) -> Option<VoteDirection> {
    classes.find_map(|class| match class {
        "upvote" => Some(VoteDirection::Up),
        "downvote" => Some(VoteDirection::Down),
        _ => None,
    })
}

/// The vote control a click landed on, if any.
pub fn find_vote_control(event: &Event) -> Option<Element> {
    let target: Element = event.target()?.dyn_into().ok()?;

    target.closest(VOTE_CONTROL_SELECTOR).ok().flatten()
}

#[derive(Debug, PartialEq)]
pub enum ControlRead {
    Vote(VoteClick),
    MissingPostId,
}

pub fn read_vote_control(control: &Element) -> Option<ControlRead> {
    parse_vote_control(
        &control.class_name(),
        control.get_attribute("data-postid"),
        control.get_attribute("data-post-url"),
    )
}

/// `None` when the classes name no vote direction. The post id is kept
/// verbatim, since it is also the id of the count element.
pub fn parse_vote_control(
    class_name: &str,
    post_id: Option<String>,
    post_url: Option<String>,
) -> Option<ControlRead> {
    let direction = direction_from_classes(class_name.split_whitespace())?;

    let Some(post) = post_id.filter(|v| !v.trim().is_empty()) else {
        return Some(ControlRead::MissingPostId);
    };

    Some(ControlRead::Vote(VoteClick {
        post: PostId::new(post),
        direction,
        post_url,
    }))
}
