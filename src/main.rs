use fltk::app;

use codeshot::app::domain::messages::Message;
use codeshot::app::domain::settings::AppSettings;
use codeshot::app::state::AppState;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::load();
    let app = app::App::default().with_scheme(app::Scheme::Gtk);
    let (sender, receiver) = app::channel::<Message>();

    let mut state = AppState::new(settings, sender);
    state.show();

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            state.handle_message(msg);
        }
    }
}
