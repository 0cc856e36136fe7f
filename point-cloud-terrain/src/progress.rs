/// Progress bar construction shared by the long running phases
use indicatif::{ProgressBar, ProgressStyle};

/// Create a styled progress bar with a unit label and initial message
pub fn progress_bar(len: u64, unit: &str, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!("[{{bar:40.green/blue}}] {{pos}}/{{len}} {unit} ({{percent}}%) {{msg}}");
    let style = ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("▉▊▋▌▍▎▏ ");
    pb.set_style(style);
    pb.set_message(message);
    pb
}
