use fltk::dialog;

use crate::app::services::export::Notifier;

/// Reports errors with a modal alert box.
#[derive(Debug, Default, Clone, Copy)]
pub struct FltkNotifier;

impl Notifier for FltkNotifier {
    fn alert(&mut self, message: &str) {
        dialog::alert_default(message);
    }
}
