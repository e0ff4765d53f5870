/// Reusable UI pieces: timed flashes, toast banner, confetti

use std::time::Duration;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

/// A value shown for a fixed time after `show` is emitted
pub struct Timed<T: 'static> {
    pub value: Option<T>,
    pub show: Callback<T>,
}

/// Holds the most recently shown value until `duration` passes.
///
/// Showing a new value restarts the timer; an older timer never clears it.
#[hook]
pub fn use_timed<T: Clone + 'static>(duration: Duration) -> Timed<T> {
    let current = use_state(|| None::<T>);
    let generation = use_mut_ref(|| 0u64);

    let show = {
        let current = current.clone();
        Callback::from(move |value: T| {
            let id = {
                let mut latest = generation.borrow_mut();
                *latest += 1;
                *latest
            };
            current.set(Some(value));

            let current = current.clone();
            let generation = generation.clone();
            spawn_local(async move {
                sleep(duration).await;
                if *generation.borrow() == id {
                    current.set(None);
                }
            });
        })
    };

    Timed {
        value: (*current).clone(),
        show,
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ToastTone {
    Success,
    Comfort,
}

#[derive(Properties, PartialEq)]
pub struct ToastBannerProps {
    pub message: String,
    #[prop_or(ToastTone::Success)]
    pub tone: ToastTone,
}

#[function_component(ToastBanner)]
pub fn toast_banner(props: &ToastBannerProps) -> Html {
    let alert_type = match props.tone {
        ToastTone::Success => AlertType::Success,
        ToastTone::Comfort => AlertType::Info,
    };

    html! {
        <div class="toast-banner">
            <Alert r#type={alert_type} title={props.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}

const CONFETTI_COLORS: [&str; 5] = ["#f4c542", "#5b4fe8", "#4caf50", "#f44336", "#2196f3"];

#[derive(Properties, PartialEq)]
pub struct ConfettiBurstProps {
    #[prop_or(80)]
    pub pieces: usize,
}

/// Falling confetti, purely CSS-animated
#[function_component(ConfettiBurst)]
pub fn confetti_burst(props: &ConfettiBurstProps) -> Html {
    html! {
        <div class="confetti-layer" aria-hidden="true">
            {for (0..props.pieces).map(|i| {
                let left = js_sys::Math::random() * 100.0;
                let delay = js_sys::Math::random() * 1.5;
                let color = CONFETTI_COLORS[i % CONFETTI_COLORS.len()];
                html! {
                    <span
                        key={i}
                        class="confetti-piece"
                        style={format!("left: {:.1}%; animation-delay: {:.2}s; background-color: {};", left, delay, color)}
                    />
                }
            })}
        </div>
    }
}
