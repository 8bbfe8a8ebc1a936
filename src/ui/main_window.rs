use fltk::{
    app::{self, Sender},
    button::Button,
    enums::{Align, Color, Event, FrameType, Key, Shortcut},
    frame::Frame,
    group::{Flex, FlexType, Scroll, ScrollType},
    menu::Choice,
    prelude::*,
    window::Window,
};

use crate::app::controllers::surface::{RenderingSurface, SurfaceOptions};
use crate::app::domain::document::ViewState;
use crate::app::domain::messages::Message;
use crate::app::domain::registry::{CodeTheme, Language};
use crate::app::services::export::ExportFormat;

const TOOLBAR_HEIGHT: i32 = 34;
const PAGE_COLOR: (u8, u8, u8) = (231, 236, 239);

pub struct MainWidgets {
    pub wind: Window,
    pub language_choice: Choice,
    pub theme_choice: Choice,
    pub status: Frame,
    pub scroll: Scroll,
    pub surface: RenderingSurface,
}

/// Choice items treat '/' as a submenu separator.
fn menu_label(label: &str) -> String {
    label.replace('/', "\\/")
}

fn labeled_choice(label: &str, width: i32, toolbar: &mut Flex) -> Choice {
    let mut caption = Frame::default().with_label(label);
    caption.set_align(Align::Right | Align::Inside);
    toolbar.fixed(&caption, 50);
    let choice = Choice::default();
    toolbar.fixed(&choice, width);
    choice
}

fn export_button(format: ExportFormat, key: char, sender: &Sender<Message>, toolbar: &mut Flex) -> Button {
    let mut button = Button::default().with_label(&format!("Export {}", format.id().to_uppercase()));
    button.set_frame(FrameType::RFlatBox);
    button.set_color(Color::from_hex(0x3e4451));
    button.set_label_color(Color::from_hex(0xe0e0e0));
    button.set_shortcut(Shortcut::Ctrl | Shortcut::Shift | key);
    button.set_tooltip(&format!("Save the code window as {}", format.file_name()));
    let s = *sender;
    button.set_callback(move |_| s.send(Message::Export(format.id().to_string())));
    toolbar.fixed(&button, 110);
    button
}

pub fn build_main_window(view: &ViewState, options: SurfaceOptions, sender: &Sender<Message>) -> MainWidgets {
    let width = options.width + 40;
    let mut wind = Window::new(100, 100, width, 640, "Codeshot");
    wind.set_xclass("Codeshot");
    wind.set_color(Color::from_rgb(PAGE_COLOR.0, PAGE_COLOR.1, PAGE_COLOR.2));

    let mut column = Flex::new(0, 0, width, 640, None);
    column.set_type(FlexType::Column);
    column.set_margin(6);

    let mut toolbar = Flex::default();
    toolbar.set_type(FlexType::Row);
    toolbar.set_spacing(6);

    let mut language_choice = labeled_choice("Lang:", 130, &mut toolbar);
    for language in Language::all() {
        language_choice.add_choice(&menu_label(language.display_name()));
    }
    language_choice.set_value(view.language().index() as i32);
    let s = *sender;
    language_choice.set_callback(move |c| {
        if let Some(&language) = Language::all().get(c.value().max(0) as usize) {
            s.send(Message::SelectLanguage(language));
        }
    });

    let mut theme_choice = labeled_choice("Theme:", 150, &mut toolbar);
    for theme in CodeTheme::all() {
        theme_choice.add_choice(&menu_label(theme.display_name()));
    }
    theme_choice.set_value(view.theme.index() as i32);
    let s = *sender;
    theme_choice.set_callback(move |c| {
        if let Some(&theme) = CodeTheme::all().get(c.value().max(0) as usize) {
            s.send(Message::SelectTheme(theme));
        }
    });

    export_button(ExportFormat::Png, 'p', sender, &mut toolbar);
    export_button(ExportFormat::Jpeg, 'j', sender, &mut toolbar);
    export_button(ExportFormat::Svg, 's', sender, &mut toolbar);

    let mut status = Frame::default();
    status.set_align(Align::Left | Align::Inside);
    status.set_label_size(12);
    toolbar.end();
    column.fixed(&toolbar, TOOLBAR_HEIGHT);

    let mut scroll = Scroll::default();
    scroll.set_type(ScrollType::Both);
    scroll.set_frame(FrameType::NoBox);
    let s = *sender;
    let surface = RenderingSurface::new(scroll.x(), scroll.y(), options, view, move |_| {
        s.send(Message::TextChanged)
    });
    scroll.end();

    column.end();
    wind.resizable(&column);
    wind.end();

    let s = *sender;
    wind.set_callback(move |_| {
        if app::event() == Event::Close {
            s.send(Message::Quit);
        }
    });
    let s = *sender;
    wind.handle(move |_, ev| {
        if ev == Event::Shortcut && app::is_event_ctrl() && app::event_key() == Key::from_char('q') {
            s.send(Message::Quit);
            return true;
        }
        false
    });

    MainWidgets {
        wind,
        language_choice,
        theme_choice,
        status,
        scroll,
        surface,
    }
}
