use crate::config::Config;
use crate::display::coregraphics::CoreGraphicsDisplays;
use crate::display::DisplayApi;
use crate::launch_agent;
use crate::model::{MenuAction, MenuEntry};
use crate::ui::menu::{self, MenuController};
use std::rc::Rc;
use tao::event_loop::EventLoopProxy;

pub struct App {
    config: Config,
    displays: Rc<CoreGraphicsDisplays>,
    menu: MenuController,
}

impl App {
    pub fn new(proxy: EventLoopProxy<MenuAction>) -> Self {
        let mut config = Config::load();
        config.launch_at_login = launch_agent::is_enabled();
        let displays = Rc::new(CoreGraphicsDisplays::new());
        let menu = MenuController::new(proxy, displays.clone(), &config);
        Self {
            config,
            displays,
            menu,
        }
    }

    pub fn handle(&mut self, action: MenuAction) {
        match action {
            MenuAction::SelectMode(entry) => self.apply_mode(&entry),
            MenuAction::OpenDisplayPreferences => menu::open_display_preferences(),
            MenuAction::ToggleShowAllModes => {
                self.config.show_all_modes = !self.config.show_all_modes;
                self.config_changed();
            }
            MenuAction::ToggleShowHidpiModes => {
                self.config.show_hidpi_modes = !self.config.show_hidpi_modes;
                self.config_changed();
            }
            MenuAction::ToggleLaunchAtLogin => self.toggle_launch_at_login(),
            MenuAction::Quit => {}
        }
    }

    /// A rejected switch is left alone; the next open shows the real mode.
    fn apply_mode(&self, entry: &MenuEntry) {
        if entry.is_current {
            return;
        }
        if let Err(e) = self.displays.set_mode(entry.display, &entry.mode) {
            log::warn!("could not switch display {} to {}: {}", entry.display, entry.label, e);
        }
    }

    fn toggle_launch_at_login(&mut self) {
        launch_agent::set_enabled(!self.config.launch_at_login);
        self.config.launch_at_login = launch_agent::is_enabled();
        self.menu.sync_config(&self.config);
    }

    fn config_changed(&mut self) {
        self.menu.sync_config(&self.config);
        self.config.save();
    }
}
