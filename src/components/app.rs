use yew::prelude::*;

use super::fallback_view::FallbackView;
use super::recruiter_view::RecruiterView;
use super::world_view::WorldView;
use super::SharedContent;
use crate::fallback::{clear_fallback_preference, store_fallback_preference, FallbackType};

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    World,
    Fallback(FallbackType),
    Recruiter,
}

/// Startup routing: a recruiter link beats everything, then the stored
/// fallback preference, then capability detection, then the 3D world.
fn initial_view() -> View {
    #[cfg(target_arch = "wasm32")]
    {
        use crate::fallback::{
            check_webgl_support, decide_fallback, is_low_performance_device, is_mobile_device,
            stored_fallback_preference,
        };

        if crate::recruiter::detect_recruiter_mode() {
            return View::Recruiter;
        }
        match stored_fallback_preference() {
            Some(true) => return View::Fallback(FallbackType::UserChoice),
            Some(false) => return View::World,
            None => {}
        }
        if let Some(mode) = decide_fallback(
            &check_webgl_support(),
            is_mobile_device(),
            is_low_performance_device(),
        ) {
            log::info!("starting in fallback mode: {}", mode.reason);
            return View::Fallback(mode.kind);
        }
        View::World
    }
    #[cfg(not(target_arch = "wasm32"))]
    View::World
}

#[function_component(App)]
pub fn app() -> Html {
    let content = use_state(SharedContent::load);
    let view = use_state(initial_view);

    let to_fallback = {
        let view = view.clone();
        Callback::from(move |_: ()| {
            store_fallback_preference(true);
            view.set(View::Fallback(FallbackType::UserChoice));
        })
    };
    let to_world = {
        let view = view.clone();
        Callback::from(move |_: ()| {
            clear_fallback_preference();
            store_fallback_preference(false);
            view.set(View::World);
        })
    };
    let exit_recruiter = {
        let view = view.clone();
        Callback::from(move |_: ()| {
            crate::recruiter::disable_recruiter_mode();
            view.set(View::World);
        })
    };

    match *view {
        View::World => html! {
            <WorldView content={(*content).clone()} on_use_fallback={to_fallback} />
        },
        View::Fallback(kind) => html! {
            <FallbackView content={(*content).clone()} {kind} on_try_world={to_world} />
        },
        View::Recruiter => html! {
            <RecruiterView content={(*content).clone()} on_exit={exit_recruiter} />
        },
    }
}
