use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    pub(crate) show_at: Duration,
    pub(crate) hide_at: Duration,
    pub(crate) text: Vec<String>,
}

impl Subtitle {
    pub fn new(show_at: Duration, hide_at: Duration, text: Vec<String>) -> Self {
        let (show_at, hide_at) = if hide_at < show_at {
            (hide_at, show_at)
        } else {
            (show_at, hide_at)
        };
        Self {
            show_at,
            hide_at,
            text,
        }
    }
}
