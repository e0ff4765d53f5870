/// Typed wrappers over the chrome.* bridge in bridge.js
///
/// Every collection mutation goes through `update_jobs`: read the whole
/// list, change it in memory, write the whole list back.

use crate::capture::{CaptureTrigger, FrameReport, FrameSnapshot, SelectorCascade};
use crate::config::Settings;
use crate::error::{self, Error};
use crate::job::TabInfo;
use crate::storage::{JOBS_KEY, JobCollection, SETTINGS_KEY};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn probeTabFrames(tab_id: i32, cascade: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openDashboard() -> Result<(), JsValue>;

    fn onStorageKeyChanged(key: &str, callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

    fn onActiveTabChanged(callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;
}

fn jobs_from_js(value: JsValue) -> error::Result<JobCollection> {
    if value.is_null() || value.is_undefined() {
        Ok(JobCollection::new())
    } else {
        Ok(serde_wasm_bindgen::from_value(value)?)
    }
}

pub async fn load_jobs() -> error::Result<JobCollection> {
    let value = getStorage(JOBS_KEY)
        .await
        .map_err(|e| Error::bridge("failed to read jobs", e))?;
    jobs_from_js(value)
}

pub async fn save_jobs(jobs: &JobCollection) -> error::Result<()> {
    let value = serde_wasm_bindgen::to_value(jobs)?;
    setStorage(JOBS_KEY, value)
        .await
        .map_err(|e| Error::bridge("failed to write jobs", e))
}

/// Read-modify-write of the whole collection. Last writer wins.
pub async fn update_jobs<T>(mutate: impl FnOnce(&mut JobCollection) -> T) -> error::Result<T> {
    let mut jobs = load_jobs().await?;
    let outcome = mutate(&mut jobs);
    save_jobs(&jobs).await?;
    Ok(outcome)
}

/// Settings are optional; anything unreadable falls back to defaults
pub async fn load_settings() -> Settings {
    let value = match getStorage(SETTINGS_KEY).await {
        Ok(value) if !value.is_null() && !value.is_undefined() => value,
        Ok(_) => return Settings::default(),
        Err(e) => {
            log::warn!("failed to read settings, using defaults: {:?}", e);
            return Settings::default();
        }
    };

    match serde_wasm_bindgen::from_value::<Settings>(value) {
        Ok(settings) => {
            for problem in settings.validate() {
                log::warn!("settings: {}", problem);
            }
            settings.with_defaults_for_invalid()
        }
        Err(e) => {
            log::warn!("failed to parse settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

pub async fn active_tab() -> error::Result<Option<TabInfo>> {
    let value = getActiveTab()
        .await
        .map_err(|e| Error::bridge("failed to query active tab", e))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    Ok(Some(serde_wasm_bindgen::from_value(value)?))
}

/// Run the snapshot probe in every frame of the tab
pub async fn probe_frames(tab_id: i32, cascade: &SelectorCascade) -> error::Result<Vec<Result<FrameSnapshot, String>>> {
    let cascade = serde_wasm_bindgen::to_value(cascade)?;
    let value = probeTabFrames(tab_id, cascade)
        .await
        .map_err(|e| Error::bridge("failed to probe page", e))?;
    let reports: Vec<FrameReport> = serde_wasm_bindgen::from_value(value)?;
    Ok(reports.into_iter().map(FrameReport::into_result).collect())
}

pub async fn open_tab(url: &str) -> error::Result<()> {
    openTab(url)
        .await
        .map_err(|e| Error::bridge("failed to open tab", e))
}

pub async fn open_dashboard() -> error::Result<()> {
    openDashboard()
        .await
        .map_err(|e| Error::bridge("failed to open dashboard", e))
}

/// Synchronous yes/no dialog; a missing window counts as "no"
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// A live browser event listener; dropping it removes the listener
pub struct Subscription {
    unsubscribe: js_sys::Function,
    _callback: Closure<dyn FnMut(JsValue)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self.unsubscribe.call0(&JsValue::NULL) {
            log::warn!("failed to remove listener: {:?}", e);
        }
    }
}

/// Every change to the stored jobs, whoever made it, delivers the full list
pub fn watch_jobs(mut on_change: impl FnMut(error::Result<JobCollection>) + 'static) -> Subscription {
    let callback = Closure::new(move |value: JsValue| on_change(jobs_from_js(value)));
    let unsubscribe = onStorageKeyChanged(JOBS_KEY, &callback);
    Subscription {
        unsubscribe,
        _callback: callback,
    }
}

/// Navigation completing in, or activation of, the active tab
pub fn watch_active_tab(mut on_change: impl FnMut(CaptureTrigger) + 'static) -> Subscription {
    let callback = Closure::new(move |value: JsValue| {
        let trigger = match value.as_string().as_deref() {
            Some("navigated") => CaptureTrigger::Navigated,
            _ => CaptureTrigger::Activated,
        };
        on_change(trigger);
    });
    let unsubscribe = onActiveTabChanged(&callback);
    Subscription {
        unsubscribe,
        _callback: callback,
    }
}
