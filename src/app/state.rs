use std::thread;

use fltk::{app, app::Sender, enums::Color, frame::Frame, menu::Choice, prelude::*, window::Window};

use super::controllers::surface::{RenderingSurface, SurfaceOptions};
use super::domain::document::{Document, ViewState, SAMPLE_SNIPPET};
use super::domain::messages::Message;
use super::domain::registry::{CodeTheme, Language};
use super::domain::settings::AppSettings;
use super::infrastructure::download::FsDownloadSink;
use super::infrastructure::error::ExportError;
use super::services::export::{ExportArtifact, ExportFormat, ExportPipeline, Notifier};
use crate::ui::dialogs::FltkNotifier;
use crate::ui::main_window::{build_main_window, MainWidgets};

pub struct AppState {
    pub view: ViewState,
    pub surface: RenderingSurface,
    pub window: Window,
    pub language_choice: Choice,
    pub theme_choice: Choice,
    pub status: Frame,
    pub pipeline: ExportPipeline,
    pub sink: FsDownloadSink,
    pub settings: AppSettings,
    pub sender: Sender<Message>,
    notifier: Box<dyn Notifier>,
}

impl AppState {
    /// Build the main window around the sample snippet.
    pub fn new(settings: AppSettings, sender: Sender<Message>) -> Self {
        let view = ViewState::new(
            Document::new(SAMPLE_SNIPPET, settings.initial_language),
            settings.initial_theme,
        );
        let options = SurfaceOptions::from_settings(&settings);
        let MainWidgets {
            wind,
            language_choice,
            theme_choice,
            status,
            scroll: _,
            surface,
        } = build_main_window(&view, options, &sender);

        Self {
            pipeline: ExportPipeline::new(settings.jpeg_quality),
            sink: FsDownloadSink::new(settings.resolved_export_dir()),
            view,
            surface,
            window: wind,
            language_choice,
            theme_choice,
            status,
            settings,
            sender,
            notifier: Box::new(FltkNotifier),
        }
    }

    /// Show the window and lay the surface out with real font metrics.
    pub fn show(&mut self) {
        self.window.show();
        app::flush();
        self.surface.refresh_layout(&self.view);
        log::info!("Export directory: {}", self.sink.dir().display());
    }

    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::TextChanged => self.text_changed(),
            Message::SelectLanguage(language) => self.select_language(language),
            Message::SelectTheme(theme) => self.select_theme(theme),
            Message::Export(format) => self.begin_export(&format),
            Message::ExportEncoded(format, encoded) => self.finish_export(format, encoded),
            Message::Quit => self.quit(),
        }
    }

    fn text_changed(&mut self) {
        let text = self.surface.text();
        if self.view.document.set_text(text) {
            self.surface.sync(&self.view);
        }
    }

    pub fn select_language(&mut self, language: Language) {
        if self.language_choice.value() != language.index() as i32 {
            self.language_choice.set_value(language.index() as i32);
        }
        if self.view.select_language(language) {
            log::debug!("Language set to {}", language.id());
            self.surface.sync(&self.view);
        }
    }

    pub fn select_theme(&mut self, theme: CodeTheme) {
        if self.theme_choice.value() != theme.index() as i32 {
            self.theme_choice.set_value(theme.index() as i32);
        }
        if self.view.select_theme(theme) {
            log::debug!("Theme set to {}", theme.id());
            self.surface.sync(&self.view);
        }
    }

    fn begin_export(&mut self, format: &str) {
        // Pick up any edit whose change message has not been handled yet.
        self.text_changed();
        if self.pipeline.is_busy() {
            self.set_status("Previous export still running", Color::from_rgb(90, 90, 90));
        }

        let Some(job) = self
            .pipeline
            .begin(format, &mut self.surface, self.notifier.as_mut())
        else {
            return;
        };

        let format = job.format;
        self.set_status(&format!("Exporting {}...", format), Color::from_rgb(90, 90, 90));
        let sender = self.sender;
        thread::spawn(move || {
            let encoded = job.encode_isolated();
            sender.send(Message::ExportEncoded(format, encoded));
        });
    }

    fn finish_export(&mut self, format: ExportFormat, encoded: Result<ExportArtifact, ExportError>) {
        match self
            .pipeline
            .finish(format, encoded, &mut self.sink, self.notifier.as_mut())
        {
            Some(path) => self.set_status(
                &format!("Saved {}", path.display()),
                Color::from_rgb(30, 110, 50),
            ),
            None => self.set_status(
                &format!("{} export failed", format),
                Color::from_rgb(170, 40, 40),
            ),
        }
    }

    /// Remember the selected language and theme for the next start, then exit.
    fn quit(&mut self) {
        self.settings.initial_language = self.view.language();
        self.settings.initial_theme = self.view.theme;
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
        self.window.hide();
    }

    fn set_status(&mut self, text: &str, color: Color) {
        self.status.set_label(text);
        self.status.set_label_color(color);
        self.status.redraw();
    }
}
