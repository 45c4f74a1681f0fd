//! Terminal spinner shown while a model runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for one image, or `None` when progress display is off.
pub fn create_spinner(message: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Clear a spinner once its work is done.
pub fn finish_spinner(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_none() {
        assert!(create_spinner("Classifying tiger.jpg", false).is_none());
    }

    #[test]
    fn test_enabled_spinner_keeps_message() {
        let pb = create_spinner("Detecting lion.png", true);
        assert_eq!(
            pb.as_ref().map(ProgressBar::message).as_deref(),
            Some("Detecting lion.png")
        );
        finish_spinner(pb);
    }
}
