pub mod view;

pub use view::{draw, draw_completed};

use crate::gui::app::{AppModel, AppMsg, PointerInput, SharedController};
use crate::gui::theme::{self, ThemeColors};
use dialkit::{DialUnit, Point};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;

pub const TRACK_WIDTH: f64 = 6.0;
pub const THUMB_RADIUS: f64 = 7.0;
pub const THUMB_CORE_RADIUS: f64 = 5.0;
pub const HOVER_RADIUS: f64 = 3.0;
pub const VALUE_FONT_SIZE: f64 = 22.0;
pub const UNIT_FONT_SIZE: f64 = 10.0;
pub const TOOLTIP_FONT_SIZE: f64 = 10.0;

/// Builds the drawing area for one dial and routes its pointer, drag and
/// wheel input to the app as messages.
pub fn build(
    unit: DialUnit,
    size: i32,
    controller: SharedController,
    sender: &ComponentSender<AppModel>,
) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::new();
    area.set_content_width(size);
    area.set_content_height(size);
    area.add_css_class("dial");

    area.set_draw_func(move |area, cr, _, _| {
        let colors = ThemeColors::from_context(&area.style_context(), theme::prefers_dark());
        let frame = controller.borrow().frame(unit);
        if let Err(e) = view::draw(cr, &frame, unit, &colors) {
            log::error!("Drawing error: {}", e);
        }
    });

    // the drag gesture grabs the pointer, so updates keep arriving after the
    // pointer leaves the widget
    let drag = gtk::GestureDrag::new();
    drag.set_button(gtk::gdk::BUTTON_PRIMARY);
    {
        let sender = sender.clone();
        drag.connect_drag_begin(move |_, x, y| {
            sender.input(AppMsg::Pointer(unit, PointerInput::Down(Point::new(x, y))));
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some((x, y)) = gesture.start_point() {
                sender.input(AppMsg::Pointer(
                    unit,
                    PointerInput::Move(Point::new(x + dx, y + dy)),
                ));
            }
        });
    }
    {
        let sender = sender.clone();
        drag.connect_drag_end(move |_, _, _| {
            sender.input(AppMsg::Pointer(unit, PointerInput::Up));
        });
    }
    area.add_controller(drag);

    let motion = gtk::EventControllerMotion::new();
    {
        let sender = sender.clone();
        motion.connect_motion(move |_, x, y| {
            sender.input(AppMsg::Pointer(unit, PointerInput::Move(Point::new(x, y))));
        });
    }
    {
        let sender = sender.clone();
        motion.connect_leave(move |_| {
            sender.input(AppMsg::Pointer(unit, PointerInput::Leave));
        });
    }
    area.add_controller(motion);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    {
        let sender = sender.clone();
        scroll.connect_scroll(move |_, _, dy| {
            // GTK reports wheel-up as negative
            sender.input(AppMsg::Scroll(unit, -dy));
            glib::Propagation::Stop
        });
    }
    area.add_controller(scroll);

    area
}
