/// Side panel UI: capture the active page into a new inbox job

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use yew::prelude::*;
use yew::platform::time::sleep;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use patternfly_yew::prelude::*;
use crate::bridge;
use crate::capture::{resolve_capture, CaptureGenerations, CaptureGuess, CaptureTrigger, SelectorCascade};
use crate::config::{CaptureSettings, Settings};
use crate::error::{Error, ValidationError};
use crate::job::JobDraft;

#[derive(Clone, PartialEq)]
enum SaveState {
    Idle,
    Saving,
    Saved,
    Invalid(ValidationError),
    Error(String),
}

enum FormAction {
    SetTitle(String),
    SetCompany(String),
    SetNote(String),
    TogglePriority,
    ApplyGuess(CaptureGuess),
    ResetAfterSave,
}

/// The form lives in a reducer so async captures merge into the latest edits
#[derive(Clone, Default, PartialEq)]
struct FormState {
    draft: JobDraft,
}

impl Reducible for FormState {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: FormAction) -> Rc<Self> {
        let mut draft = self.draft.clone();
        match action {
            FormAction::SetTitle(title) => draft.title = title,
            FormAction::SetCompany(company) => draft.company = company,
            FormAction::SetNote(note) => draft.note = note,
            FormAction::TogglePriority => draft.priority = !draft.priority,
            FormAction::ApplyGuess(guess) => guess.apply_to(&mut draft),
            FormAction::ResetAfterSave => {
                draft.note.clear();
                draft.priority = false;
            }
        }
        Rc::new(FormState { draft })
    }
}

const SAVED_BANNER: Duration = Duration::from_millis(1500);

#[function_component(SidePanel)]
pub fn side_panel() -> Html {
    let form = use_reducer(FormState::default);
    let save_state = use_state(|| SaveState::Idle);
    let capturing = use_state(|| false);
    let settings = use_mut_ref(Settings::default);
    let generations = use_mut_ref(CaptureGenerations::default);

    let start_capture = {
        let form = form.dispatcher();
        let capturing = capturing.clone();
        let settings = settings.clone();
        let generations = generations.clone();

        Callback::from(move |trigger: CaptureTrigger| {
            let generation = generations.borrow_mut().start();
            let capture_settings = settings.borrow().capture.clone();
            let form = form.clone();
            let capturing = capturing.clone();
            let generations = generations.clone();

            log::debug!("capture #{} triggered by {:?}", generation, trigger);
            capturing.set(true);

            spawn_local(async move {
                let delay = trigger.delay_ms(&capture_settings);
                if delay > 0 {
                    sleep(Duration::from_millis(u64::from(delay))).await;
                }
                if !is_current(&generations, generation) {
                    return;
                }

                let outcome = capture_active_tab(&capture_settings).await;

                if !is_current(&generations, generation) {
                    log::debug!("discarding stale capture #{}", generation);
                    return;
                }
                match outcome {
                    Ok(Some(guess)) => form.dispatch(FormAction::ApplyGuess(guess)),
                    Ok(None) => log::info!("no active tab to capture"),
                    Err(e) => log::warn!("capture failed: {}", e),
                }
                capturing.set(false);
            });
        })
    };

    // Load settings, capture once, then follow the active tab
    {
        let settings = settings.clone();
        let start_capture = start_capture.clone();

        use_effect_with((), move |_| {
            {
                let start_capture = start_capture.clone();
                spawn_local(async move {
                    let loaded = bridge::load_settings().await;
                    *settings.borrow_mut() = loaded;
                    start_capture.emit(CaptureTrigger::Initial);
                });
            }

            let subscription = bridge::watch_active_tab(move |trigger| start_capture.emit(trigger));
            move || drop(subscription)
        });
    }

    let on_refresh = {
        let start_capture = start_capture.clone();
        Callback::from(move |_| start_capture.emit(CaptureTrigger::Refresh))
    };

    let on_title_input = {
        let form = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                form.dispatch(FormAction::SetTitle(input.value()));
            }
        })
    };

    let on_company_input = {
        let form = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                form.dispatch(FormAction::SetCompany(input.value()));
            }
        })
    };

    let on_note_input = {
        let form = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                form.dispatch(FormAction::SetNote(input.value()));
            }
        })
    };

    let on_toggle_priority = {
        let form = form.dispatcher();
        Callback::from(move |_: MouseEvent| form.dispatch(FormAction::TogglePriority))
    };

    // Save handler
    let on_save = {
        let form = form.clone();
        let save_state = save_state.clone();

        Callback::from(move |_| {
            let job = match form.draft.clone().into_job(bridge::now_ms()) {
                Ok(job) => job,
                Err(e) => {
                    save_state.set(SaveState::Invalid(e));
                    return;
                }
            };

            let form = form.dispatcher();
            let save_state = save_state.clone();
            save_state.set(SaveState::Saving);

            spawn_local(async move {
                let title = job.title.clone();
                match bridge::update_jobs(move |jobs| jobs.add(job)).await {
                    Ok(()) => {
                        log::info!("saved '{}' to inbox", title);
                        save_state.set(SaveState::Saved);
                        sleep(SAVED_BANNER).await;
                        form.dispatch(FormAction::ResetAfterSave);
                        save_state.set(SaveState::Idle);
                    }
                    Err(e) => {
                        log::error!("failed to save job: {}", e);
                        save_state.set(SaveState::Error(format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    let on_open_board = Callback::from(|_| {
        spawn_local(async move {
            if let Err(e) = bridge::open_dashboard().await {
                log::warn!("{}", e);
            }
        });
    });

    let draft = &form.draft;
    let is_busy = matches!(*save_state, SaveState::Saving | SaveState::Saved);
    let title_missing = draft.title.is_empty();

    html! {
        <div class="side-panel">
            <div class="panel-header">
                <h1 class="panel-title">{"🧠 Job Saver"}</h1>
                <Button onclick={on_refresh} variant={ButtonVariant::Plain} disabled={*capturing}>
                    {"🔄"}
                </Button>
            </div>

            if *capturing {
                <div class="loading-text-center">
                    <Spinner />
                </div>
            }

            if title_missing {
                <div class="capture-tip">
                    <b>{"Tip: "}</b>
                    {"If auto-capture fails, highlight the text and click refresh 🔄."}
                </div>
            }

            {match &*save_state {
                SaveState::Invalid(e) => html! {
                    <Alert r#type={AlertType::Warning} title={e.to_string()} inline={true}>
                    </Alert>
                },
                SaveState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                _ => html! {}
            }}

            <div class="form-fields">
                <label class="field-label">{"Job Title"}</label>
                <input
                    type="text"
                    class={classes!("field-input", title_missing.then_some("field-missing"))}
                    placeholder="e.g. Product Designer"
                    value={draft.title.clone()}
                    oninput={on_title_input}
                />

                <label class="field-label">{"Company"}</label>
                <input
                    type="text"
                    class="field-input"
                    placeholder="e.g. Spotify"
                    value={draft.company.clone()}
                    oninput={on_company_input}
                />

                <div
                    class={classes!("priority-toggle", draft.priority.then_some("priority-on"))}
                    onclick={on_toggle_priority}
                >
                    <span class="priority-flame">{"🔥"}</span>
                    <span>{"High Priority?"}</span>
                    <span class="priority-check">{if draft.priority { "●" } else { "○" }}</span>
                </div>

                <label class="field-label">{"Notes"}</label>
                <textarea
                    class="field-input field-notes"
                    placeholder="Salary, deadlines, or tech stack..."
                    value={draft.note.clone()}
                    oninput={on_note_input}
                />

                <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {if *save_state == SaveState::Saved { "✅ Saved to Inbox" } else { "Save Job" }}
                </Button>
            </div>

            <div class="panel-footer">
                <Button onclick={on_open_board} variant={ButtonVariant::Link}>
                    {"Open Board ↗"}
                </Button>
            </div>
        </div>
    }
}

fn is_current(generations: &Rc<RefCell<CaptureGenerations>>, generation: u64) -> bool {
    generations.borrow().is_current(generation)
}

/// Probe every frame of the active tab and reduce to one guess.
///
/// A failed probe still reports the tab URL so the form keeps its fields.
async fn capture_active_tab(settings: &CaptureSettings) -> Result<Option<CaptureGuess>, Error> {
    let Some(tab) = bridge::active_tab().await? else {
        return Ok(None);
    };

    let Some(tab_id) = tab.id else {
        return Ok(Some(CaptureGuess {
            url: tab.url,
            ..CaptureGuess::default()
        }));
    };

    let cascade = SelectorCascade::for_url(&settings.sites, &tab.url);
    match bridge::probe_frames(tab_id, &cascade).await {
        Ok(reports) => Ok(Some(resolve_capture(reports, &tab, settings))),
        Err(e) => {
            log::warn!("scraper failed on {}: {}", tab.url, e);
            Ok(Some(CaptureGuess {
                url: tab.url,
                ..CaptureGuess::default()
            }))
        }
    }
}
