//! Browser bindings: turns DOM elements and events into the plain types used
//! by [`crate::navigator`], [`crate::input`] and [`crate::miniplayer`].
//!
//! Markup hooks:
//! - `.scrollbydiv` elements are the navigable rows
//! - `video.preview[data-src]` elements are lazy preview players
//! - download buttons carry `data-ytid` and `data-channel_id`
//! - play buttons carry the file path in `value`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, AddEventListenerOptions, Document, HtmlButtonElement, HtmlElement, HtmlVideoElement,
    IntersectionObserver, IntersectionObserverEntry, KeyboardEvent, ScrollIntoViewOptions,
    ScrollLogicalPosition, WheelEvent,
};

use crate::actions::{Backend, QUEUED_LABEL};
use crate::config::Config;
use crate::debug::{self, cat};
use crate::input::{handle_directional_input, DirectionalInput, NavigationOutcome, Viewport};
use crate::miniplayer::{Miniplayers, PreviewPlayer};
use crate::navigator::{Row, RowNavigator};

pub const ROW_SELECTOR: &str = ".scrollbydiv";
pub const PREVIEW_CLASS: &str = "preview";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// The window viewport over `.scrollbydiv` rows.
///
/// Each `rows()` call re-queries the document; `scroll_to_row` indexes into
/// that latest snapshot.
pub struct WindowViewport {
    document: Document,
    elements: Vec<HtmlElement>,
}

impl WindowViewport {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            elements: Vec::new(),
        }
    }
}

impl Viewport for WindowViewport {
    fn scroll_position(&self) -> f64 {
        window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
    }

    fn rows(&mut self) -> Vec<Row> {
        self.elements.clear();
        if let Ok(list) = self.document.query_selector_all(ROW_SELECTOR) {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    self.elements.push(el);
                }
            }
        }
        self.elements
            .iter()
            .map(|el| Row::new(el.offset_top() as f64, el.offset_height() as f64))
            .collect()
    }

    fn scroll_to_row(&mut self, index: usize) {
        if let Some(el) = self.elements.get(index) {
            let opts = ScrollIntoViewOptions::new();
            opts.set_block(ScrollLogicalPosition::Start);
            el.scroll_into_view_with_scroll_into_view_options(&opts);
        }
    }
}

fn apply_outcome(event: &web_sys::Event, outcome: NavigationOutcome) {
    if outcome.suppress_default {
        event.prevent_default();
    }
    if outcome.stop_propagation {
        event.stop_propagation();
    }
}

/// Wire ArrowUp/ArrowDown and/or wheel ticks to row navigation.
pub fn bind_row_navigation(document: &Document, config: &Config) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let navigator = RowNavigator::new(config.tolerance);
    let viewport = Rc::new(RefCell::new(WindowViewport::new(document.clone())));

    if config.flags.keyboard_rows {
        let vp = viewport.clone();
        let keydown = Closure::<dyn FnMut(_)>::wrap(Box::new(move |e: KeyboardEvent| {
            let Some(input) = DirectionalInput::from_key(&e.key()) else {
                return;
            };
            debug::log(cat::INPUT, format!("keydown {}", e.key()));
            let outcome = handle_directional_input(&navigator, &mut *vp.borrow_mut(), input);
            apply_outcome(&e, outcome);
        }));
        win.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    if config.flags.wheel_rows {
        let vp = viewport.clone();
        let wheel = Closure::<dyn FnMut(_)>::wrap(Box::new(move |e: WheelEvent| {
            let input = DirectionalInput::from_wheel(e.delta_y(), e.ctrl_key());
            debug::log(cat::INPUT, format!("wheel dy={} ctrl={}", e.delta_y(), e.ctrl_key()));
            let outcome = handle_directional_input(&navigator, &mut *vp.borrow_mut(), input);
            apply_outcome(&e, outcome);
        }));
        // Must be non-passive or preventDefault is ignored.
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            wheel.as_ref().unchecked_ref(),
            &opts,
        )?;
        wheel.forget();
    }

    log::info!(
        "[dom] row navigation bound (keys={}, wheel={})",
        config.flags.keyboard_rows,
        config.flags.wheel_rows
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Preview players
// ---------------------------------------------------------------------------

/// A `<video class="preview" data-src=...>` element.
pub struct VideoPreview {
    video: HtmlVideoElement,
}

impl VideoPreview {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

impl PreviewPlayer for VideoPreview {
    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn has_source(&self) -> bool {
        !self.video.src().is_empty()
    }

    fn load_source(&mut self) {
        if let Some(src) = self.video.dataset().get("src") {
            self.video.set_src(&src);
        }
    }

    fn play(&mut self) {
        // The returned promise rejects when autoplay is blocked; nothing to do then.
        if let Err(e) = self.video.play() {
            log::warn!("[dom] preview play failed: {e:?}");
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.video.pause() {
            log::warn!("[dom] preview pause failed: {e:?}");
        }
    }
}

pub type SharedMiniplayers = Rc<RefCell<Miniplayers<VideoPreview>>>;

/// Observe every `.preview` video and start/stop it with its visibility.
pub fn bind_previews(document: &Document) -> Result<SharedMiniplayers, JsValue> {
    let players: SharedMiniplayers = Rc::new(RefCell::new(Miniplayers::new()));

    let collection = document.get_elements_by_class_name(PREVIEW_CLASS);
    let videos: Vec<HtmlVideoElement> = (0..collection.length())
        .filter_map(|i| collection.item(i))
        .filter_map(|el| el.dyn_into::<HtmlVideoElement>().ok())
        .collect();

    for video in videos {
        let id = players.borrow_mut().observe(VideoPreview::new(video.clone()));
        let shared = players.clone();
        let doc = document.clone();
        let cb = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let focused = doc.has_focus().unwrap_or(false);
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    shared
                        .borrow_mut()
                        .on_intersection(id, entry.is_intersecting(), focused);
                }
            },
        ));
        let observer = IntersectionObserver::new(cb.as_ref().unchecked_ref())?;
        observer.observe(&video);
        cb.forget();
    }

    log::info!("[dom] observing {} preview players", players.borrow().len());
    Ok(players)
}

/// Pause every preview when the window loses focus.
pub fn bind_pause_on_blur(players: SharedMiniplayers) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let blur = Closure::<dyn FnMut(_)>::wrap(Box::new(move |_e: web_sys::FocusEvent| {
        players.borrow_mut().pause_all();
    }));
    win.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
    blur.forget();
    Ok(())
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// `data-ytid` / `data-channel_id` of a download button.
pub fn download_target(button: &HtmlElement) -> Option<(String, String)> {
    let data = button.dataset();
    Some((data.get("ytid")?, data.get("channel_id")?))
}

/// Queue a download; the button reads `queued` once the backend accepts it.
pub fn clicked_download(backend: Backend, button: HtmlElement) {
    let Some((ytid, channel_id)) = download_target(&button) else {
        log::warn!("[dom] download button without data-ytid/data-channel_id");
        return;
    };
    log::info!("clicked to download video");
    wasm_bindgen_futures::spawn_local(async move {
        match backend.queue_download(&ytid, &channel_id).await {
            Ok(()) => button.set_text_content(Some(QUEUED_LABEL)),
            Err(e) => log::warn!("[dom] download {ytid} failed: {e:#}"),
        }
    });
}

/// Open the button's file path in the local player.
pub fn play_locally(backend: Backend, button: HtmlButtonElement) {
    let path = button.value();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = backend.play_locally(&path).await {
            log::warn!("[dom] play {path} failed: {e:#}");
        }
    });
}

// ---------------------------------------------------------------------------
// Page setup
// ---------------------------------------------------------------------------

/// Page configuration from the current location.
pub fn page_config() -> Config {
    let (search, origin) = window()
        .map(|w| {
            let loc = w.location();
            (loc.search().unwrap_or_default(), loc.origin().unwrap_or_default())
        })
        .unwrap_or_default();
    match Config::from_query(&search, &origin) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[dom] bad page origin ({e:#}), every page parameter reset to defaults");
            Config {
                server_url: origin.trim_end_matches('/').to_string(),
                ..Config::default()
            }
        }
    }
}

/// Wire everything enabled in `config.flags`.
pub fn setup(document: &Document, config: &Config) -> Result<Option<SharedMiniplayers>, JsValue> {
    if config.flags.any_rows() {
        bind_row_navigation(document, config)?;
    }
    if !config.flags.lazy_previews {
        return Ok(None);
    }
    let players = bind_previews(document)?;
    if config.flags.pause_on_blur {
        bind_pause_on_blur(players.clone())?;
    }
    Ok(Some(players))
}
