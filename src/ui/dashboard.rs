/// Kanban dashboard page: Inbox → Applied → Archive

use std::time::Duration;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::board::{derive_board, drop_payload, format_time_ago, plan_move, ColumnView, Feedback};
use crate::bridge;
use crate::config::Settings;
use crate::error;
use crate::job::{Job, JobStatus};
use crate::storage::JobCollection;
use crate::ui::components::{use_timed, ConfettiBurst, ToastBanner, ToastTone};

const DRAG_FORMAT: &str = "text/plain";

#[derive(Clone, PartialEq, Debug)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

impl ViewState {
    /// Any successful read clears an earlier error
    fn after_load(result: &error::Result<JobCollection>) -> Self {
        match result {
            Ok(_) => ViewState::Idle,
            Err(e) => ViewState::Error(format!("Failed to load: {}", e)),
        }
    }
}

fn delete_toast(removed: bool) -> Option<(String, ToastTone)> {
    removed.then(|| ("Job deleted".to_string(), ToastTone::Comfort))
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let state = use_state(|| ViewState::Loading);
    let jobs = use_state(JobCollection::new);
    let settings = use_state(Settings::default);
    let drag_over = use_state(|| None::<JobStatus>);
    let write_pending = use_mut_ref(|| false);
    let toast = use_timed::<(String, ToastTone)>(Duration::from_millis(2000));
    let confetti = use_timed::<u64>(Duration::from_millis(3000));

    // Load settings and jobs on mount, then follow every storage change
    {
        let state = state.clone();
        let jobs = jobs.clone();
        let settings = settings.clone();

        use_effect_with((), move |_| {
            {
                let state = state.clone();
                let jobs = jobs.clone();
                spawn_local(async move {
                    settings.set(bridge::load_settings().await);
                    reload(&jobs, &state).await;
                });
            }

            let subscription = bridge::watch_jobs(move |change| {
                if let Ok(collection) = &change {
                    log::debug!("jobs changed: {} records", collection.len());
                }
                apply_load(&jobs, &state, change);
            });
            move || drop(subscription)
        });
    }

    // Drop handler: reclassify a job
    let on_drop = {
        let jobs = jobs.clone();
        let state = state.clone();
        let drag_over = drag_over.clone();
        let write_pending = write_pending.clone();
        let show_toast = toast.show.clone();
        let show_confetti = confetti.show.clone();

        Callback::from(move |(job_id, target): (String, JobStatus)| {
            drag_over.set(None);

            let Some(planned) = plan_move(&jobs.jobs, &job_id, target) else {
                return;
            };
            if *write_pending.borrow() {
                log::info!("write in progress, ignoring drop of {}", job_id);
                return;
            }

            match planned.feedback() {
                Some(Feedback::Celebrate) => {
                    show_confetti.emit(bridge::now_ms() as u64);
                    show_toast.emit((Feedback::Celebrate.message().to_string(), ToastTone::Success));
                }
                Some(Feedback::Encourage) => {
                    show_toast.emit((Feedback::Encourage.message().to_string(), ToastTone::Comfort));
                }
                None => {}
            }

            log::info!("moving {} from {:?} to {:?}", planned.job_id, planned.from, planned.to);
            *write_pending.borrow_mut() = true;

            let jobs = jobs.clone();
            let state = state.clone();
            let write_pending = write_pending.clone();
            spawn_local(async move {
                let result = bridge::update_jobs(|c| c.set_status(&planned.job_id, planned.to)).await;
                *write_pending.borrow_mut() = false;

                match result {
                    Ok(true) => {}
                    Ok(false) => log::warn!("job {} vanished before it could be moved", planned.job_id),
                    Err(e) => {
                        log::error!("failed to move job: {}", e);
                        state.set(ViewState::Error(format!("Failed to save: {}", e)));
                    }
                }
                reload(&jobs, &state).await;
            });
        })
    };

    let on_drag_over = {
        let drag_over = drag_over.clone();
        Callback::from(move |status: Option<JobStatus>| {
            if *drag_over != status {
                drag_over.set(status);
            }
        })
    };

    // Delete a single job
    let on_delete = {
        let jobs = jobs.clone();
        let state = state.clone();
        let write_pending = write_pending.clone();
        let show_toast = toast.show.clone();

        Callback::from(move |job_id: String| {
            if *write_pending.borrow() || !bridge::confirm("Delete this job? This cannot be undone.") {
                return;
            }
            *write_pending.borrow_mut() = true;

            let jobs = jobs.clone();
            let state = state.clone();
            let write_pending = write_pending.clone();
            let show_toast = show_toast.clone();
            spawn_local(async move {
                let result = bridge::update_jobs(|c| c.remove(&job_id)).await;
                *write_pending.borrow_mut() = false;

                match result {
                    Ok(removed) => match delete_toast(removed) {
                        Some(toast) => show_toast.emit(toast),
                        None => log::warn!("job {} was already gone", job_id),
                    },
                    Err(e) => {
                        log::error!("failed to delete job: {}", e);
                        state.set(ViewState::Error(format!("Failed to delete: {}", e)));
                    }
                }
                reload(&jobs, &state).await;
            });
        })
    };

    // Delete every archived job
    let on_clear_archive = {
        let jobs = jobs.clone();
        let state = state.clone();
        let write_pending = write_pending.clone();
        let show_toast = toast.show.clone();

        Callback::from(move |_| {
            if *write_pending.borrow()
                || !bridge::confirm("Are you sure you want to delete ALL archived jobs? This cannot be undone.")
            {
                return;
            }
            *write_pending.borrow_mut() = true;

            let jobs = jobs.clone();
            let state = state.clone();
            let write_pending = write_pending.clone();
            let show_toast = show_toast.clone();
            spawn_local(async move {
                let result = bridge::update_jobs(|c| c.clear_archive()).await;
                *write_pending.borrow_mut() = false;

                match result {
                    Ok(removed) => {
                        log::info!("cleared {} archived jobs", removed);
                        show_toast.emit(("Archive cleared!".to_string(), ToastTone::Comfort));
                    }
                    Err(e) => {
                        log::error!("failed to clear archive: {}", e);
                        state.set(ViewState::Error(format!("Failed to clear archive: {}", e)));
                    }
                }
                reload(&jobs, &state).await;
            });
        })
    };

    let on_open = Callback::from(|url: String| {
        spawn_local(async move {
            if let Err(e) = bridge::open_tab(&url).await {
                log::warn!("{}", e);
            }
        });
    });

    let board = derive_board(&jobs.jobs, &settings.board);
    let now = bridge::now_ms();
    let inbox_limit = settings.board.inbox_limit;

    html! {
        <div class="container">
            if let Some((message, tone)) = toast.value.clone() {
                <ToastBanner message={message} tone={tone} />
            }
            if let Some(burst) = confetti.value {
                <ConfettiBurst key={burst.to_string()} />
            }

            <div class="header">
                <h1 class="main-title">{"⚡️ EzApply Board"}</h1>
                if board.archive.total > 0 {
                    <Button onclick={on_clear_archive} variant={ButtonVariant::Danger}>
                        {format!("🗑️ Clear Archive ({})", board.archive.total)}
                    </Button>
                }
            </div>

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            if *state != ViewState::Loading {
                <div class="board">
                    {for board.columns().into_iter().map(|column| {
                        let title = match column.status {
                            JobStatus::Archive => column.status.label().to_string(),
                            _ => format!("{} ({})", column.status.label(), column.total),
                        };
                        let hidden_note = match column.status {
                            JobStatus::Inbox => format!("{} older jobs hidden. Focus on top {}!", column.hidden, inbox_limit),
                            _ => format!("{} older jobs hidden", column.hidden),
                        };

                        html! {
                            <KanbanColumn
                                key={column.status.as_str()}
                                column={column.clone()}
                                title={title}
                                hidden_note={hidden_note}
                                is_over={*drag_over == Some(column.status)}
                                now={now}
                                on_drop={on_drop.clone()}
                                on_drag_over={on_drag_over.clone()}
                                on_delete={on_delete.clone()}
                                on_open={on_open.clone()}
                            />
                        }
                    })}
                </div>
            }
        </div>
    }
}

// Column component
#[derive(Properties, PartialEq)]
struct KanbanColumnProps {
    column: ColumnView,
    title: String,
    hidden_note: String,
    is_over: bool,
    now: i64,
    on_drop: Callback<(String, JobStatus)>,
    on_drag_over: Callback<Option<JobStatus>>,
    on_delete: Callback<String>,
    on_open: Callback<String>,
}

#[function_component(KanbanColumn)]
fn kanban_column(props: &KanbanColumnProps) -> Html {
    let status = props.column.status;

    let ondragover = props.on_drag_over.reform(move |e: DragEvent| {
        // Required for the element to accept a drop
        e.prevent_default();
        Some(status)
    });

    let ondragleave = props.on_drag_over.reform(|_: DragEvent| None);

    let ondrop = {
        let on_drop = props.on_drop.clone();
        let on_drag_over = props.on_drag_over.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            let job_id = e.data_transfer().and_then(|dt| dt.get_data(DRAG_FORMAT).ok());
            match drop_payload(job_id, status) {
                Some(payload) => on_drop.emit(payload),
                None => on_drag_over.emit(None),
            }
        })
    };

    html! {
        <div class="column-wrapper">
            <div
                class={classes!("kanban-column", format!("column-{}", status.as_str()), props.is_over.then_some("column-over"))}
                data-column={status.as_str()}
                {ondragover}
                {ondragleave}
                {ondrop}
            >
                <h2 class="column-title">{&props.title}</h2>
                <div class="column-cards">
                    {for props.column.visible.iter().map(|job| html! {
                        <JobCard
                            key={job.id.clone()}
                            job={job.clone()}
                            now={props.now}
                            on_delete={props.on_delete.clone()}
                            on_open={props.on_open.clone()}
                        />
                    })}
                    if props.column.visible.is_empty() {
                        <div class="empty-state">{"No jobs here yet"}</div>
                    }
                </div>
            </div>
            if props.column.hidden > 0 {
                <p class={classes!("hidden-count", format!("hidden-{}", status.as_str()))}>
                    {&props.hidden_note}
                </p>
            }
        </div>
    }
}

// Job card component
#[derive(Properties, PartialEq)]
struct JobCardProps {
    job: Job,
    now: i64,
    on_delete: Callback<String>,
    on_open: Callback<String>,
}

#[function_component(JobCard)]
fn job_card(props: &JobCardProps) -> Html {
    let dragging = use_state(|| false);
    let job = &props.job;

    let ondragstart = {
        let dragging = dragging.clone();
        let job_id = job.id.clone();
        Callback::from(move |e: DragEvent| {
            if let Some(dt) = e.data_transfer() {
                dt.set_effect_allowed("move");
                if let Err(err) = dt.set_data(DRAG_FORMAT, &job_id) {
                    log::warn!("failed to start drag: {:?}", err);
                }
            }
            dragging.set(true);
        })
    };

    let ondragend = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    html! {
        <div
            class={classes!("job-card", dragging.then_some("job-card-dragging"))}
            draggable="true"
            {ondragstart}
            {ondragend}
        >
            <div class="job-card-header">
                <h3 class="job-title">{&job.title}</h3>
                if job.priority {
                    <span class="priority-flame" title="High priority">{"🔥"}</span>
                }
            </div>

            <p class="job-company">{&job.company}</p>

            if !job.note.is_empty() {
                <p class="job-note">{&job.note}</p>
            }

            <div class="job-card-footer">
                <span class="job-age">{format_time_ago(props.now, job.created_at)}</span>
                <div class="job-actions">
                    if !job.url.is_empty() {
                        <Button
                            onclick={props.on_open.reform({
                                let url = job.url.clone();
                                move |_| url.clone()
                            })}
                            variant={ButtonVariant::Plain}
                            size={ButtonSize::Small}
                        >
                            {"↗"}
                        </Button>
                    }
                    <Button
                        onclick={props.on_delete.reform({
                            let job_id = job.id.clone();
                            move |_| job_id.clone()
                        })}
                        variant={ButtonVariant::Plain}
                        size={ButtonSize::Small}
                    >
                        {"🗑️"}
                    </Button>
                </div>
            </div>
        </div>
    }
}

async fn reload(jobs: &UseStateHandle<JobCollection>, state: &UseStateHandle<ViewState>) {
    apply_load(jobs, state, bridge::load_jobs().await);
}

fn apply_load(
    jobs: &UseStateHandle<JobCollection>,
    state: &UseStateHandle<ViewState>,
    result: error::Result<JobCollection>,
) {
    state.set(ViewState::after_load(&result));
    match result {
        Ok(collection) => jobs.set(collection),
        Err(e) => log::error!("failed to load jobs: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_successful_load_clears_error() {
        let loaded = Ok(JobCollection::new());

        assert_eq!(ViewState::after_load(&loaded), ViewState::Idle);
    }

    #[test]
    fn test_failed_load_reports_error() {
        let failed = Err(Error::Bridge("failed to read jobs: quota".to_string()));

        assert_eq!(
            ViewState::after_load(&failed),
            ViewState::Error("Failed to load: browser API failed: failed to read jobs: quota".to_string())
        );
    }

    #[test]
    fn test_delete_toast_only_when_removed() {
        assert_eq!(delete_toast(true), Some(("Job deleted".to_string(), ToastTone::Comfort)));
        assert_eq!(delete_toast(false), None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;
    use web_sys::{DataTransfer, DragEventInit};
    use yew::platform::time::sleep;

    wasm_bindgen_test_configure!(run_in_browser);

    fn empty_column(status: JobStatus) -> ColumnView {
        ColumnView {
            status,
            visible: Vec::new(),
            hidden: 0,
            total: 0,
        }
    }

    async fn drop_on_column(status: JobStatus, payload: &str) -> Vec<(String, JobStatus)> {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        document.body().unwrap().append_child(&root).unwrap();

        let received = Rc::new(RefCell::new(Vec::new()));
        let props = KanbanColumnProps {
            column: empty_column(status),
            title: status.label().to_string(),
            hidden_note: String::new(),
            is_over: false,
            now: 0,
            on_drop: {
                let received = received.clone();
                Callback::from(move |drop: (String, JobStatus)| received.borrow_mut().push(drop))
            },
            on_drag_over: Callback::noop(),
            on_delete: Callback::noop(),
            on_open: Callback::noop(),
        };
        let app = yew::Renderer::<KanbanColumn>::with_root_and_props(root.clone(), props).render();
        sleep(Duration::ZERO).await;

        let data = DataTransfer::new().unwrap();
        data.set_data(DRAG_FORMAT, payload).unwrap();
        let init = DragEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_data_transfer(Some(&data));
        let event = DragEvent::new_with_event_init_dict("drop", &init).unwrap();

        let column = root.query_selector(".kanban-column").unwrap().unwrap();
        column.dispatch_event(&event).unwrap();

        app.destroy();
        root.remove();
        received.take()
    }

    #[wasm_bindgen_test]
    async fn test_drop_reports_receiving_column() {
        let received = drop_on_column(JobStatus::Applied, "job-1").await;

        assert_eq!(received, vec![("job-1".to_string(), JobStatus::Applied)]);
    }

    #[wasm_bindgen_test]
    async fn test_drop_without_job_id_is_ignored() {
        let received = drop_on_column(JobStatus::Archive, "").await;

        assert!(received.is_empty());
    }
}
