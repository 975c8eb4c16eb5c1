use crate::cli::Cli;
use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::dial;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window::LayerHost;
use crate::sys::prefs::FileThemeStore;
use crate::sys::scheduler::GlibScheduler;
use dialkit::host::HostControls;
use dialkit::{CountdownController, DialAction, DialUnit, Point, TaskKey, Ticket, TimerState};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use strum::IntoEnumIterator;

pub type SharedController = Rc<RefCell<CountdownController<GlibScheduler>>>;

const COMPLETED_SIZE: i32 = 112;

pub struct AppInit {
    pub config: Config,
    pub cli: Cli,
    pub controller: CountdownController<GlibScheduler>,
    pub tasks: async_channel::Receiver<Ticket>,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub controller: SharedController,
    pub controls: HostControls,
    pub host: LayerHost,
    pub theme_store: FileThemeStore,
    pub dials: Vec<(DialUnit, gtk::DrawingArea)>,
    pub completed_area: gtk::DrawingArea,
    pub root: gtk::ApplicationWindow,
    pub config: Config,
    pub cli: Cli,
}

#[derive(Debug, Clone, Copy)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

#[derive(Debug)]
pub enum AppMsg {
    Pointer(DialUnit, PointerInput),
    Scroll(DialUnit, f64),
    Task(Ticket),
    Play,
    /// Pause while running, resume while paused.
    PlayPause,
    /// Stop while running, reset while paused.
    Cancel,
    Reset,
    Focus(bool),
    TogglePinned,
    ToggleTheme,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn state(&self) -> TimerState {
        self.controller.borrow().state()
    }

    fn page(&self) -> &'static str {
        match self.state() {
            TimerState::Set => "set",
            TimerState::Running | TimerState::Paused => "active",
            TimerState::Completed => "completed",
        }
    }

    fn can_play(&self) -> bool {
        self.controller.borrow().can_play()
    }

    fn focused(&self) -> bool {
        self.controller.borrow().is_focused()
    }

    fn countdown_label(&self) -> String {
        self.controller.borrow().countdown_label()
    }

    fn remaining_fraction(&self) -> f64 {
        self.controller.borrow().remaining_fraction()
    }

    fn countdown_classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["countdown"];
        if self.controller.borrow().time_left() >= 3600 {
            classes.push("with-hours");
        }
        if self.focused() {
            classes.push("compact");
        }
        classes
    }

    fn play_pause_icon(&self) -> &'static str {
        match self.state() {
            TimerState::Running => "media-playback-pause-symbolic",
            _ => "media-playback-start-symbolic",
        }
    }

    fn pin_icon(&self) -> &'static str {
        if self.controls.pinned {
            "changes-prevent-symbolic"
        } else {
            "changes-allow-symbolic"
        }
    }

    fn theme_icon(&self) -> &'static str {
        if self.controls.theme.is_dark() {
            "weather-clear-symbolic"
        } else {
            "weather-clear-night-symbolic"
        }
    }

    fn queue_dial(&self, unit: DialUnit) {
        if let Some((_, area)) = self.dials.iter().find(|(u, _)| *u == unit) {
            area.queue_draw();
        }
    }

    fn queue_all(&self) {
        for (_, area) in &self.dials {
            area.queue_draw();
        }
        self.completed_area.queue_draw();
    }

    fn on_pointer(&self, unit: DialUnit, input: PointerInput) -> DialAction {
        let mut controller = self.controller.borrow_mut();
        match input {
            PointerInput::Down(p) => controller.pointer_down(unit, p),
            PointerInput::Move(p) => controller.pointer_move(unit, p),
            PointerInput::Up => controller.pointer_up(unit),
            PointerInput::Leave => controller.pointer_leave(unit),
        }
    }

    fn reload(&mut self) {
        let mut new_config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        self.cli.apply(&mut new_config);

        if let Err(e) = self
            .controller
            .borrow_mut()
            .reconfigure(new_config.controller_config())
        {
            log::error!("Rejected dial settings, keeping the previous ones: {}", e);
            return;
        }

        let size = new_config.dial_size.round() as i32;
        for (_, area) in &self.dials {
            area.set_content_width(size);
            area.set_content_height(size);
        }
        self.config = new_config;
        self.queue_all();
        log::info!("Configuration reloaded");
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Dial Timer"),
            set_decorated: false,
            set_resizable: true,
            set_default_size: (model.config.window.width, model.config.window.height),
            add_css_class: "dialtimer-window",

            connect_is_active_notify[sender] => move |window| {
                sender.input(AppMsg::Focus(window.is_active()));
            },

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::space {
                        sender.input(AppMsg::PlayPause);
                        return glib::Propagation::Stop;
                    }
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Cancel);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                add_css_class: "dialtimer-panel",

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_halign: gtk::Align::End,
                    set_spacing: 2,
                    add_css_class: "top-bar",

                    gtk::Button {
                        set_has_frame: false,
                        #[watch]
                        set_icon_name: model.theme_icon(),
                        #[watch]
                        set_tooltip_text: Some(if model.controls.theme.is_dark() {
                            "Switch to light theme"
                        } else {
                            "Switch to dark theme"
                        }),
                        connect_clicked => AppMsg::ToggleTheme,
                    },

                    gtk::Button {
                        set_has_frame: false,
                        #[watch]
                        set_icon_name: model.pin_icon(),
                        #[watch]
                        set_tooltip_text: Some(if model.controls.pinned {
                            "Unpin window"
                        } else {
                            "Keep window on top"
                        }),
                        connect_clicked => AppMsg::TogglePinned,
                    },
                },

                gtk::Stack {
                    set_vexpand: true,
                    set_hexpand: true,
                    set_transition_type: gtk::StackTransitionType::Crossfade,
                    #[watch]
                    set_visible_child_name: model.page(),

                    add_named[Some("set")] = &gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,

                        #[name = "dial_row"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 8,
                            set_hexpand: true,
                            set_halign: gtk::Align::Center,
                            set_valign: gtk::Align::Center,
                        },

                        gtk::Button {
                            set_icon_name: "media-playback-start-symbolic",
                            set_valign: gtk::Align::Center,
                            add_css_class: "circular",
                            add_css_class: "suggested-action",
                            add_css_class: "play-button",
                            #[watch]
                            set_sensitive: model.can_play(),
                            connect_clicked => AppMsg::Play,
                        },
                    },

                    add_named[Some("active")] = &gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,

                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_hexpand: true,

                            gtk::Label {
                                set_vexpand: true,
                                #[watch]
                                set_label: &model.countdown_label(),
                                #[watch]
                                set_css_classes: &model.countdown_classes(),
                            },

                            gtk::ProgressBar {
                                add_css_class: "countdown-progress",
                                #[watch]
                                set_fraction: model.remaining_fraction(),
                            },
                        },

                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_valign: gtk::Align::Start,
                            set_spacing: 4,
                            add_css_class: "active-controls",
                            #[watch]
                            set_visible: model.focused(),

                            gtk::Button {
                                add_css_class: "circular",
                                #[watch]
                                set_icon_name: model.play_pause_icon(),
                                connect_clicked => AppMsg::PlayPause,
                            },

                            gtk::Button {
                                add_css_class: "circular",
                                set_icon_name: "window-close-symbolic",
                                connect_clicked => AppMsg::Cancel,
                            },
                        },
                    },

                    add_named[Some("completed")] = &gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_margin_start: 12,
                        set_margin_end: 12,

                        #[name = "completed_area"]
                        gtk::DrawingArea {
                            set_content_width: COMPLETED_SIZE,
                            set_content_height: COMPLETED_SIZE,
                            set_valign: gtk::Align::Center,
                            set_hexpand: true,
                            set_halign: gtk::Align::Start,
                        },

                        gtk::Button {
                            set_icon_name: "view-refresh-symbolic",
                            set_valign: gtk::Align::Center,
                            set_tooltip_text: Some("Set a new timer"),
                            add_css_class: "circular",
                            add_css_class: "suggested-action",
                            connect_clicked => AppMsg::Reset,
                        },
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            cli,
            controller,
            tasks,
            events,
        } = init;

        theme::load_css();
        let host = LayerHost::new(root.clone(), &config.window, config.always_on_top);
        let theme_store = FileThemeStore::default_location();
        let controls = HostControls::init(&host, &theme_store, theme::system_prefers_dark());
        theme::apply_theme(controls.theme);

        let model = AppModel {
            controller: Rc::new(RefCell::new(controller)),
            controls,
            host,
            theme_store,
            dials: Vec::new(),
            completed_area: gtk::DrawingArea::default(),
            root: root.clone(),
            config,
            cli,
        };

        let widgets = view_output!();

        let mut model = model;
        let size = model.config.dial_size.round() as i32;
        for unit in DialUnit::iter() {
            let area = dial::build(unit, size, model.controller.clone(), &sender);
            widgets.dial_row.append(&area);
            model.dials.push((unit, area));
        }

        model.completed_area = widgets.completed_area.clone();
        widgets
            .completed_area
            .set_draw_func(move |area, cr, width, height| {
                let colors = ThemeColors::from_context(&area.style_context(), theme::prefers_dark());
                if let Err(e) = dial::draw_completed(cr, width as f64, height as f64, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let task_sender = sender.clone();
        relm4::spawn_local(async move {
            while let Ok(ticket) = tasks.recv().await {
                task_sender.input(AppMsg::Task(ticket));
            }
        });

        let event_sender = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                event_sender.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Pointer(unit, input) => {
                if self.on_pointer(unit, input).should_redraw {
                    self.queue_dial(unit);
                }
            }
            AppMsg::Scroll(unit, delta) => {
                let action = self.controller.borrow_mut().scroll(unit, delta);
                if action.should_redraw {
                    self.queue_dial(unit);
                }
            }
            AppMsg::Task(ticket) => {
                let before = self.state();
                let redraw = self.controller.borrow_mut().on_task(ticket);
                if redraw && let TaskKey::Animation(unit) = ticket.key {
                    self.queue_dial(unit);
                }
                if before != TimerState::Completed && self.state() == TimerState::Completed {
                    self.completed_area.queue_draw();
                    self.root.present();
                }
            }
            AppMsg::Play => {
                self.controller.borrow_mut().play();
            }
            AppMsg::PlayPause => {
                let mut controller = self.controller.borrow_mut();
                match controller.state() {
                    TimerState::Running => controller.pause(),
                    TimerState::Paused => controller.resume(),
                    _ => controller.play(),
                };
            }
            AppMsg::Cancel => {
                let mut controller = self.controller.borrow_mut();
                match controller.state() {
                    TimerState::Running => controller.stop(),
                    _ => controller.reset(),
                };
                drop(controller);
                self.queue_all();
            }
            AppMsg::Reset => {
                self.controller.borrow_mut().reset();
                self.queue_all();
            }
            AppMsg::Focus(focused) => {
                self.controller.borrow_mut().set_focused(focused);
            }
            AppMsg::TogglePinned => {
                self.controls.toggle_pinned(&mut self.host);
            }
            AppMsg::ToggleTheme => {
                let theme = self.controls.toggle_theme(&self.theme_store);
                theme::apply_theme(theme);
                self.queue_all();
            }
            AppMsg::ConfigReload => self.reload(),
        }
    }
}
