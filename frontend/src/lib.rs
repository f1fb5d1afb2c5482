use std::rc::Rc;

use gloo_console::{error, log};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event};

pub mod app;

use crate::app::api::BackendApi;
use crate::app::util::{find_vote_control, read_vote_control, ControlRead, DomCountDisplay};
use crate::app::{AdapterConfig, VoteAdapter, VoteOutcome};

type PageAdapter = VoteAdapter<BackendApi, DomCountDisplay>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document to bind vote controls to"))?;

    let config = read_config(&document);
    bind_votes(&document, config)
}

fn read_config(document: &Document) -> AdapterConfig {
    let body = document.body();
    let attr = |name: &str| body.as_ref().and_then(|b| b.get_attribute(name));

    AdapterConfig::from_attributes(
        attr("data-vote-endpoint").as_deref(),
        attr("data-vote-root").as_deref(),
    )
}

/// Listens for clicks on the whole document, so controls inserted after
/// load are handled as well.
pub fn bind_votes(document: &Document, config: AdapterConfig) -> Result<(), JsValue> {
    let adapter = Rc::new(VoteAdapter::new(config, BackendApi {}, DomCountDisplay {}));

    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        handle_click(&adapter, event);
    });

    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    Ok(())
}

fn handle_click(adapter: &Rc<PageAdapter>, event: Event) {
    let Some(control) = find_vote_control(&event) else {
        return;
    };

    event.prevent_default();

    let click = match read_vote_control(&control) {
        Some(ControlRead::Vote(click)) => click,
        Some(ControlRead::MissingPostId) => {
            error!("Vote control has no data-postid");
            return;
        }
        None => return,
    };

    log!(format!("Sending {} for post {}", click.direction, click.post));

    // No in-flight tracking: repeated clicks race and the last response
    // to arrive sets the count.
    let adapter = adapter.clone();
    spawn_local(async move {
        report(adapter.vote(click).await);
    });
}

fn report(outcome: VoteOutcome) {
    match outcome {
        VoteOutcome::Updated { post, count } => {
            log!(format!("Post {post} updated to {count}"));
        }
        VoteOutcome::Ignored { post, reason } => {
            error!(format!("Vote for post {post} ignored: {reason}"));
        }
    }
}
