use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for work without a known length, such as a graph download.
pub fn get_progressspinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(" {spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
