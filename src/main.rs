mod components;
mod constants;
mod content;
mod fallback;
mod managers;
mod math;
mod observer;
mod recruiter;
mod scene;
mod tween;
mod util;

fn main() {
    let _ = console_log::init_with_level(log::Level::Debug);
    yew::Renderer::<components::app::App>::new().render();
}
