/// EzApply - Chrome Extension for tracking job applications
/// Built with Rust + WASM + Yew

pub mod board;
mod bridge;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod job;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the company guess for JavaScript access
#[wasm_bindgen]
pub fn company_from_url(url: &str) -> Option<String> {
    let denylist = config::CaptureSettings::default().company_denylist;
    domain::company_from_url(url, &denylist)
}

// Start the Yew app for the side panel
#[wasm_bindgen]
pub fn start_side_panel() {
    yew::Renderer::<ui::side_panel::SidePanel>::new().render();
}

// Start the Yew app for the job board
#[wasm_bindgen]
pub fn start_dashboard() {
    yew::Renderer::<ui::dashboard::Dashboard>::new().render();
}
