use crate::controller::{MenuController, SystemLauncher};
use crate::events::AppEvent;
use crate::gui::menu::{self, KeyInput, SessionEvent};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::instance::InstanceCoordinator;
use gtk::prelude::*;
use gtk4 as gtk;
use piekit::wm::Point;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Controller = MenuController<SystemLauncher>;

pub struct AppModel {
    pub controller: Rc<RefCell<Controller>>,
    pub coordinator: Option<InstanceCoordinator>,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    /// The window has caught up with a `Show`.
    Settled,
    CursorMove(Point),
    Press(Point),
    Release(Point),
    Leave,
    Key(KeyInput),
    FocusLost,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Quit => AppMsg::Quit,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Controller,
        InstanceCoordinator,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Pie Switcher"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "pieswitch-window",
            set_decorated: false,

            connect_is_active_notify[sender] => move |w| {
                if !w.is_active() {
                    sender.input(AppMsg::FocusLost);
                }
            },

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match window::key_input(key) {
                        KeyInput::Other => glib::Propagation::Proceed,
                        input => {
                            sender.input(AppMsg::Key(input));
                            glib::Propagation::Stop
                        }
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "pieswitch-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::CursorMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::Leave);
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Press(Point::new(x, y)));
                    },
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Release(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (controller, coordinator, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            controller: Rc::new(RefCell::new(controller)),
            coordinator: Some(coordinator),
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let controller_draw = model.controller.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let controller = controller_draw.borrow();
                let Some(session) = controller.session() else {
                    return;
                };
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = menu::draw(cr, session, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);
        sender.input(AppMsg::Show);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                let (pointer, display) = window::locate_pointer(&self.root);
                self.controller.borrow_mut().show(pointer, display);
                self.visible = true;
                self.drawing_area.queue_draw();

                glib::idle_add_local_once(move || sender.input(AppMsg::Settled));
            }
            AppMsg::Settled => self.controller.borrow_mut().finish_transition(),
            AppMsg::CursorMove(point) => {
                if self.controller.borrow_mut().pointer_moved(point) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Leave => {
                if self.controller.borrow_mut().pointer_left() {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Press(point) => {
                let event = self.controller.borrow_mut().pointer_pressed(point);
                self.settle(event);
            }
            AppMsg::Release(point) => {
                let event = self.controller.borrow_mut().pointer_released(point);
                self.settle(event);
            }
            AppMsg::Key(input) => {
                let event = self.controller.borrow_mut().key_pressed(input);
                self.settle(event);
            }
            AppMsg::FocusLost => {
                let event = self.controller.borrow_mut().focus_lost();
                self.settle(event);
            }
            AppMsg::Quit => {
                self.controller.borrow_mut().hide();
                self.visible = false;
                self.release_instance();
                relm4::main_application().quit();
            }
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.release_instance();
    }
}

impl AppModel {
    fn settle(&mut self, event: Option<SessionEvent>) {
        if let Some(event) = event {
            self.controller.borrow_mut().handle(event);
            self.visible = self.controller.borrow().is_visible();
        }
        self.drawing_area.queue_draw();
    }

    fn release_instance(&mut self) {
        if let Some(mut coordinator) = self.coordinator.take() {
            coordinator.release();
        }
    }
}
