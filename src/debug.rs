//! Filterable debug logging for the page glue
//!
//! Categories: NAV, INPUT, PREVIEW, ACTION, CONFIG
//! Enable via: ?ytdebug=all or localStorage.setItem('ytvip.debug','nav,input')

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const NAV: u32 = 1 << 0;
    pub const INPUT: u32 = 1 << 1;
    pub const PREVIEW: u32 = 1 << 2;
    pub const ACTION: u32 = 1 << 3;
    pub const CONFIG: u32 = 1 << 4;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn enable(bits: u32) {
    MASK.fetch_or(bits, Ordering::Relaxed);
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::NAV => "nav",
        c if c == cat::INPUT => "input",
        c if c == cat::PREVIEW => "preview",
        c if c == cat::ACTION => "action",
        c if c == cat::CONFIG => "config",
        _ => "misc",
    }
}

/// Parse a comma list like `nav,input` into a mask. Unknown names are ignored.
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" | "none" => m = 0,
            "all" => m = cat::ALL,
            "nav" => m |= cat::NAV,
            "input" => m |= cat::INPUT,
            "preview" => m |= cat::PREVIEW,
            "action" => m |= cat::ACTION,
            "config" => m |= cat::CONFIG,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

#[cfg(target_arch = "wasm32")]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use web_sys::window;
        let Some(win) = window() else { return };
        // URL query: ?ytdebug=nav,input
        if let Ok(search) = win.location().search() {
            let qs = search.trim_start_matches('?');
            for part in qs.split('&') {
                let mut it = part.splitn(2, '=');
                let key = it.next().unwrap_or_default();
                let val = it.next().unwrap_or_default();
                if key.eq_ignore_ascii_case("ytdebug") {
                    let decoded = urlencoding::decode(val).unwrap_or_else(|_| val.into());
                    set_from_list(&decoded);
                }
            }
        }
        // localStorage: ytvip.debug = "nav,preview"
        if let Ok(Some(storage)) = win.local_storage() {
            if let Ok(Some(v)) = storage.get_item("ytvip.debug") {
                enable(parse_list(&v));
            }
        }
        log(cat::CONFIG, "debug init (wasm) complete");
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_from_url_and_storage_once() {
    if let Ok(v) = std::env::var("YTVIP_DEBUG") {
        set_from_list(&v);
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    let s = format!("[ytvip][{}] {}", cat_name(cat), msg.as_ref());
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&s));
}

#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    eprintln!("[ytvip][{}] {}", cat_name(cat), msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("nav,input"), cat::NAV | cat::INPUT);
        assert_eq!(parse_list(" Preview , ACTION "), cat::PREVIEW | cat::ACTION);
        assert_eq!(parse_list("all"), cat::ALL);
        assert_eq!(parse_list("nav,none,config"), cat::CONFIG);
        assert_eq!(parse_list("bogus"), 0);
    }

    #[test]
    fn test_cat_names() {
        assert_eq!(cat_name(cat::NAV), "nav");
        assert_eq!(cat_name(cat::CONFIG), "config");
        assert_eq!(cat_name(cat::NAV | cat::INPUT), "misc");
    }
}
