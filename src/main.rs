#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

#[cfg(target_os = "macos")]
mod app;
mod config;
mod display;
mod launch_agent;
mod model;
#[cfg(target_os = "macos")]
mod ui;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(not(target_os = "macos"))]
fn main() {
    init_logging();
    log::error!("resolution-menu is only supported on macOS");
}

#[cfg(target_os = "macos")]
fn main() {
    use app::App;
    use model::MenuAction;
    use tao::event::Event;
    use tao::event_loop::{ControlFlow, EventLoopBuilder};
    use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};

    init_logging();

    let mut event_loop = EventLoopBuilder::<MenuAction>::with_user_event().build();
    event_loop.set_activation_policy(ActivationPolicy::Accessory);

    let mut app = App::new(event_loop.create_proxy());
    log::info!("resolution-menu {} running", env!("CARGO_PKG_VERSION"));

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        // Menu clicks arrive as user events posted by the menu handler
        if let Event::UserEvent(action) = event {
            match action {
                MenuAction::Quit => *control_flow = ControlFlow::Exit,
                action => app.handle(action),
            }
        }
    });
}
