use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::dial::{self, GtkEnvironment, host};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use dialkit::env::{FrameId, ListenerKind};
use dialkit::geometry::Point;
use dialkit::ring::Key;
use dialkit::widget::{Reaction, Widget};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub widget: Rc<RefCell<Widget<GtkEnvironment>>>,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Toggle,
    Press { button: u32, x: f64, y: f64 },
    Motion(Point),
    Release { button: u32, x: f64, y: f64 },
    Key(Key, bool),
    Resize,
    Frame(FrameId),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Toggle => AppMsg::Toggle,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("FAQ"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "faqdial-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, state| {
                    let mapped = host::map_key(key);
                    if mapped == Key::Other {
                        return glib::Propagation::Proceed;
                    }
                    sender.input(AppMsg::Key(mapped, host::is_shifted(key, state)));
                    glib::Propagation::Stop
                }
            },

            #[local_ref]
            drawing_area -> gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "faqdial-drawing-area",

                connect_resize[sender] => move |_, _, _| {
                    sender.input(AppMsg::Resize);
                },

                add_controller = gtk::GestureDrag {
                    set_button: 0, // Listen to all buttons
                    connect_drag_begin[sender] => move |gesture, x, y| {
                        sender.input(AppMsg::Press { button: gesture.current_button(), x, y });
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Motion(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        let (x, y) = gesture.start_point().unwrap_or_default();
                        sender.input(AppMsg::Release {
                            button: gesture.current_button(),
                            x: x + dx,
                            y: y + dy,
                        });
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
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let drawing_area = gtk::DrawingArea::default();

        let frame_sender = sender.clone();
        let env = GtkEnvironment::new(drawing_area.clone(), config.frame_width, move |id| {
            frame_sender.input(AppMsg::Frame(id));
        });
        let widget = Rc::new(RefCell::new(Widget::new(env, config.widget_settings())));

        let model = AppModel {
            widget: widget.clone(),
            visible: false,
            root: root.clone(),
            drawing_area: drawing_area.clone(),
        };

        let drawing_area = &model.drawing_area;
        let widgets = view_output!();

        let widget_draw = widget.clone();
        model
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let widget = widget_draw.borrow();
                let Some(view) = widget.view() else {
                    return;
                };
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                if let Err(e) = dial::draw(cr, &view, &colors) {
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

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let reaction = match msg {
            AppMsg::Show => self.show(),
            AppMsg::Hide => self.hide(),
            AppMsg::Toggle => {
                if self.visible {
                    self.hide()
                } else {
                    self.show()
                }
            }
            AppMsg::Press { button, x, y } => {
                let input = host::pointer_input(button, x, y);
                let mut widget = self.widget.borrow_mut();
                let hit = widget.hit_test(input.position);
                let focus = host::focus_target(hit)
                    .filter(|_| widget.env().is_listening(ListenerKind::FocusIn));
                let mut reaction = focus
                    .map(|target| widget.focus_in(target))
                    .unwrap_or(Reaction::NONE);
                reaction.should_redraw |= widget.pointer_down(input).should_redraw;
                reaction
            }
            AppMsg::Motion(point) => {
                let mut widget = self.widget.borrow_mut();
                if widget.env().is_listening(ListenerKind::PointerMove) {
                    widget.pointer_move(point)
                } else {
                    Reaction::NONE
                }
            }
            AppMsg::Release { button, x, y } => {
                // clicks on slots and buttons never start a drag, so releases always go through
                self.widget
                    .borrow_mut()
                    .pointer_up(host::pointer_input(button, x, y))
            }
            AppMsg::Key(key, shift) => {
                let mut widget = self.widget.borrow_mut();
                if widget.env().is_listening(ListenerKind::KeyDown) {
                    widget.key(key, shift)
                } else {
                    Reaction::NONE
                }
            }
            AppMsg::Resize => {
                let mut widget = self.widget.borrow_mut();
                if widget.env().is_listening(ListenerKind::Resize) {
                    widget.resize()
                } else {
                    Reaction::NONE
                }
            }
            AppMsg::Frame(id) => self.widget.borrow_mut().on_frame(id),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let mut widget = self.widget.borrow_mut();
                    widget.env_mut().set_frame_width(new_config.frame_width);
                    log::info!("Configuration reloaded");
                    widget.update_settings(new_config.widget_settings())
                }
                Err(e) => {
                    log::error!("Failed to reload config: {}", e);
                    Reaction::NONE
                }
            },
        };
        self.apply(reaction);
    }
}

impl AppModel {
    fn show(&mut self) -> Reaction {
        if self.visible {
            return Reaction::NONE;
        }
        window::move_to_pointer_monitor(&self.root);
        self.visible = true;
        self.widget.borrow_mut().set_open(true)
    }

    fn hide(&mut self) -> Reaction {
        self.visible = false;
        self.widget.borrow_mut().set_open(false)
    }

    fn apply(&mut self, reaction: Reaction) {
        if reaction.should_close {
            self.hide();
        }
        if reaction.should_redraw && self.visible {
            self.drawing_area.queue_draw();
        }
    }
}
