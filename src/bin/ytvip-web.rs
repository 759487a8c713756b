#![cfg_attr(target_arch = "wasm32", no_main)]

// Browser entry point for the ytvip page glue.
//
// Page side:
//   <script type="module">
//     import init, { clickedDownload, vlc } from "./ytvip-web.js";
//     await init();
//     window.clickedDownload = clickedDownload;
//     window.vlc = vlc;
//   </script>
//   <button data-ytid="..." data-channel_id="..." onclick="clickedDownload(this)">download</button>
//   <button value="/path/to/file.mp4" onclick="vlc(this)">play</button>
//
// Row navigation is off unless the page URL carries ?ytnav=keys,wheel; previews stay on.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use std::cell::RefCell;

        use wasm_bindgen::prelude::*;
        use wasm_bindgen::{closure::Closure, JsCast};
        use web_sys::{window, DocumentReadyState, HtmlButtonElement, HtmlElement};

        use ytvip::actions::Backend;
        use ytvip::dom::{self, SharedMiniplayers};

        thread_local! {
            static BACKEND: RefCell<Option<Backend>> = const { RefCell::new(None) };
            // Keeps the preview controller alive for the page's lifetime.
            static PREVIEWS: RefCell<Option<SharedMiniplayers>> = const { RefCell::new(None) };
        }

        fn backend() -> Backend {
            BACKEND.with(|b| {
                b.borrow_mut()
                    .get_or_insert_with(|| Backend::new(dom::page_config()))
                    .clone()
            })
        }

        fn on_dom_ready() {
            let Some(doc) = window().and_then(|w| w.document()) else {
                log::error!("[ytvip] no document");
                return;
            };
            let backend = backend();
            let config = backend.config();
            config.print_summary();
            match dom::setup(&doc, config) {
                Ok(previews) => PREVIEWS.with(|p| *p.borrow_mut() = previews),
                Err(e) => log::error!("[ytvip] page setup failed: {e:?}"),
            }
        }

        #[wasm_bindgen(start)]
        pub fn wasm_start() {
            console_error_panic_hook::set_once();
            wasm_logger::init(wasm_logger::Config::default());
            ytvip::debug::init_from_url_and_storage_once();

            let Some(doc) = window().and_then(|w| w.document()) else {
                return;
            };
            if doc.ready_state() == DocumentReadyState::Loading {
                let ready = Closure::<dyn FnMut()>::wrap(Box::new(on_dom_ready));
                if let Err(e) = doc.add_event_listener_with_callback(
                    "DOMContentLoaded",
                    ready.as_ref().unchecked_ref(),
                ) {
                    log::error!("[ytvip] DOMContentLoaded listener failed: {e:?}");
                }
                ready.forget();
            } else {
                on_dom_ready();
            }
        }

        /// Inline `onclick` handler for download buttons.
        #[wasm_bindgen(js_name = clickedDownload)]
        pub fn clicked_download(button: HtmlElement) {
            dom::clicked_download(backend(), button);
        }

        /// Inline `onclick` handler for play-locally buttons.
        #[wasm_bindgen]
        pub fn vlc(button: HtmlButtonElement) {
            dom::play_locally(backend(), button);
        }
    } else {
        // Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
        fn main() {
            eprintln!("ytvip-web is only supported on wasm32 (browser) target.");
        }
    }
}
