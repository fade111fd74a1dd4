use crate::config::Config;
use crate::display::catalog::{CatalogOptions, DisplayModeCatalog};
use crate::display::DisplayApi;
use crate::model::MenuAction;
use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, ClassBuilder, Sel};
use objc2::{msg_send, sel, MainThreadMarker};
use objc2_app_kit::{
    NSControlStateValueOff, NSControlStateValueOn, NSImage, NSMenu, NSMenuItem,
    NSSquareStatusItemLength, NSStatusBar, NSStatusItem,
};
use objc2_foundation::NSString;
use std::cell::RefCell;
use std::collections::HashMap;
use std::process::Command;
use std::rc::Rc;
use std::sync::Once;
use tao::event_loop::EventLoopProxy;

const DISPLAY_PREFERENCES_URL: &str = "x-apple.systempreferences:com.apple.preference.displays";

// Tags below this belong to the static items; the display section is
// renumbered from here on every open.
const ENTRY_TAG_BASE: isize = 1000;

thread_local! {
    static MENU_ACTIONS: RefCell<HashMap<isize, MenuAction>> = RefCell::new(HashMap::new());
    static ACTION_PROXY: RefCell<Option<EventLoopProxy<MenuAction>>> = const { RefCell::new(None) };
    static WILL_OPEN: RefCell<Option<Box<dyn FnMut()>>> = RefCell::new(None);
}

static REGISTER_HANDLER: Once = Once::new();
static mut HANDLER_INSTANCE: *const AnyObject = std::ptr::null();

unsafe extern "C" fn menu_action_triggered(
    _this: *const AnyObject,
    _sel: Sel,
    sender: *const AnyObject,
) {
    if sender.is_null() {
        return;
    }
    let tag: isize = msg_send![sender, tag];
    let Some(action) = MENU_ACTIONS.with(|actions| actions.borrow().get(&tag).cloned()) else {
        return;
    };
    ACTION_PROXY.with(|proxy| {
        if let Some(proxy) = proxy.borrow().as_ref() {
            if proxy.send_event(action).is_err() {
                log::warn!("event loop closed, dropping menu action");
            }
        }
    });
}

unsafe extern "C" fn menu_will_open(_this: *const AnyObject, _sel: Sel, _menu: *const AnyObject) {
    WILL_OPEN.with(|hook| {
        if let Some(hook) = hook.borrow_mut().as_mut() {
            hook();
        }
    });
}

fn ensure_menu_handler() -> *const AnyObject {
    REGISTER_HANDLER.call_once(|| unsafe {
        let superclass = AnyClass::get(c"NSObject").unwrap();
        let mut builder = ClassBuilder::new(c"ResolutionMenuHandler", superclass).unwrap();
        builder.add_method(
            sel!(menuActionTriggered:),
            menu_action_triggered as unsafe extern "C" fn(*const AnyObject, Sel, *const AnyObject),
        );
        builder.add_method(
            sel!(menuWillOpen:),
            menu_will_open as unsafe extern "C" fn(*const AnyObject, Sel, *const AnyObject),
        );
        let cls = builder.register();
        let instance: *const AnyObject = msg_send![cls, new];
        HANDLER_INSTANCE = instance;
    });
    unsafe { HANDLER_INSTANCE }
}

/// Items currently shown for the connected displays, at the top of the menu.
struct DisplaySectionItems {
    menu: Retained<NSMenu>,
    items: Vec<Retained<NSMenuItem>>,
    options: CatalogOptions,
}

impl DisplaySectionItems {
    fn rebuild(&mut self, displays: &dyn DisplayApi, mtm: MainThreadMarker) {
        for item in self.items.drain(..) {
            unsafe { self.menu.removeItem(&item) };
        }

        let menu = DisplayModeCatalog::new(displays, self.options).display_menu();
        let grouped = menu.grouped();

        MENU_ACTIONS.with(|actions| {
            let mut actions = actions.borrow_mut();
            actions.retain(|tag, _| *tag < ENTRY_TAG_BASE);
            let mut tag = ENTRY_TAG_BASE;

            for section in &menu.sections {
                log::debug!(
                    "display {}: {} mode(s)",
                    section.display.id,
                    section.entries.len()
                );
                if grouped {
                    self.push(make_header_item(&section.title, mtm));
                }
                for entry in &section.entries {
                    let item = unsafe { make_action_item(&entry.label, tag, mtm) };
                    unsafe {
                        if entry.is_current {
                            item.setState(NSControlStateValueOn);
                        }
                        if grouped {
                            item.setIndentationLevel(1);
                        }
                    }
                    actions.insert(tag, MenuAction::SelectMode(entry.clone()));
                    tag += 1;
                    self.push(item);
                }
            }
        });

        if !self.items.is_empty() {
            self.push(NSMenuItem::separatorItem(mtm));
        }
        log::debug!(
            "menu rebuilt: {} display(s), {} item(s)",
            menu.connected,
            self.items.len()
        );
    }

    fn push(&mut self, item: Retained<NSMenuItem>) {
        unsafe { self.menu.insertItem_atIndex(&item, self.items.len() as isize) };
        self.items.push(item);
    }
}

/// Owns the status item and its menu. The display section is rebuilt from
/// the window server each time the menu is about to open.
pub struct MenuController {
    _status_item: Retained<NSStatusItem>,
    _menu: Retained<NSMenu>,
    section: Rc<RefCell<DisplaySectionItems>>,
    show_all_item: Retained<NSMenuItem>,
    show_hidpi_item: Retained<NSMenuItem>,
    login_item: Retained<NSMenuItem>,
}

impl MenuController {
    pub fn new(
        proxy: EventLoopProxy<MenuAction>,
        displays: Rc<dyn DisplayApi>,
        config: &Config,
    ) -> Self {
        let mtm = MainThreadMarker::new().expect("must be called on main thread");
        let handler = ensure_menu_handler();
        ACTION_PROXY.with(|p| *p.borrow_mut() = Some(proxy));

        let status_item = NSStatusBar::systemStatusBar().statusItemWithLength(NSSquareStatusItemLength);
        if let Some(button) = status_item.button(mtm) {
            let symbol = unsafe {
                NSImage::imageWithSystemSymbolName_accessibilityDescription(
                    &NSString::from_str("display"),
                    Some(&NSString::from_str("Resolution")),
                )
            };
            match symbol {
                Some(image) => {
                    image.setTemplate(true);
                    button.setImage(Some(&image));
                }
                None => button.setTitle(&NSString::from_str("Res")),
            }
        }

        let menu = NSMenu::new(mtm);
        let _: () = unsafe {
            menu.setAutoenablesItems(false);
            msg_send![&menu, setDelegate: handler]
        };

        let (show_all_item, show_hidpi_item, login_item) = MENU_ACTIONS.with(|actions| unsafe {
            let mut actions = actions.borrow_mut();
            let mut tag: isize = 1;
            let mut add = |title: &str, action: MenuAction| {
                let item = make_action_item(title, tag, mtm);
                actions.insert(tag, action);
                tag += 1;
                menu.addItem(&item);
                item
            };

            let show_all = add("Show All Resolutions", MenuAction::ToggleShowAllModes);
            let show_hidpi = add("Show HiDPI Resolutions", MenuAction::ToggleShowHidpiModes);
            menu.addItem(&NSMenuItem::separatorItem(mtm));
            add("Open Display Preferences\u{2026}", MenuAction::OpenDisplayPreferences);
            let login = add("Launch at Login", MenuAction::ToggleLaunchAtLogin);
            menu.addItem(&NSMenuItem::separatorItem(mtm));
            add("Quit Resolution Menu", MenuAction::Quit);
            (show_all, show_hidpi, login)
        });

        status_item.setMenu(Some(&menu));

        let section = Rc::new(RefCell::new(DisplaySectionItems {
            menu: menu.clone(),
            items: Vec::new(),
            options: config.catalog_options(),
        }));
        let hook_section = Rc::clone(&section);
        WILL_OPEN.with(|hook| {
            *hook.borrow_mut() = Some(Box::new(move || {
                hook_section.borrow_mut().rebuild(displays.as_ref(), mtm);
            }));
        });

        let controller = Self {
            _status_item: status_item,
            _menu: menu,
            section,
            show_all_item,
            show_hidpi_item,
            login_item,
        };
        controller.sync_config(config);
        controller
    }

    /// Push toggle state into the checkmarks and the next rebuild.
    pub fn sync_config(&self, config: &Config) {
        self.section.borrow_mut().options = config.catalog_options();
        set_checked(&self.show_all_item, config.show_all_modes);
        set_checked(&self.show_hidpi_item, config.show_hidpi_modes);
        set_checked(&self.login_item, config.launch_at_login);
    }
}

pub fn open_display_preferences() {
    if let Err(e) = Command::new("open").arg(DISPLAY_PREFERENCES_URL).spawn() {
        log::warn!("failed to open display preferences: {}", e);
    }
}

// ── Menu helpers ──

unsafe fn make_action_item(title: &str, tag: isize, mtm: MainThreadMarker) -> Retained<NSMenuItem> {
    let item = NSMenuItem::new(mtm);
    item.setTitle(&NSString::from_str(title));
    item.setEnabled(true);
    item.setTag(tag);
    item.setAction(Some(sel!(menuActionTriggered:)));
    let handler = ensure_menu_handler();
    let _: () = msg_send![&item, setTarget: handler];
    item
}

fn make_header_item(title: &str, mtm: MainThreadMarker) -> Retained<NSMenuItem> {
    unsafe {
        let item = NSMenuItem::new(mtm);
        item.setTitle(&NSString::from_str(title));
        item.setEnabled(false);
        item.setTag(-1);
        item
    }
}

fn set_checked(item: &NSMenuItem, on: bool) {
    let state = if on {
        NSControlStateValueOn
    } else {
        NSControlStateValueOff
    };
    unsafe { item.setState(state) };
}
