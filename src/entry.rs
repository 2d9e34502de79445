use crate::component::{Component, Effect, Timed};
use crate::serialiser::format_ts;
use crate::srt::Subtitle;

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    SetText(Vec<String>),
    Shift(i64),
    Retime { show_at: Duration, hide_at: Duration },
    Play,
    Revert,
}

/// A subtitle under review, remembering what it looked like when loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    current: Subtitle,
    original: Subtitle,
}

impl Entry {
    pub fn new(sub: Subtitle) -> Self {
        Self {
            current: sub.clone(),
            original: sub,
        }
    }

    /// An entry whose edits are measured against `original` rather than
    /// against `current`.
    pub fn with_original(current: Subtitle, original: Subtitle) -> Self {
        Self { current, original }
    }

    pub fn subtitle(&self) -> &Subtitle {
        &self.current
    }

    pub fn is_edited(&self) -> bool {
        self.current != self.original
    }
}

impl Timed for Entry {
    fn begin(&self) -> Duration {
        self.current.show_at
    }

    fn end(&self) -> Duration {
        self.current.hide_at
    }
}

fn shift(ts: Duration, millis: i64) -> Duration {
    let delta = Duration::from_millis(millis.unsigned_abs());
    if millis < 0 {
        ts.saturating_sub(delta)
    } else {
        ts + delta
    }
}

impl Component for Entry {
    type Action = EntryAction;
    type View = EntryView;

    fn update(mut self, action: EntryAction) -> (Self, Vec<Effect<EntryAction>>) {
        match action {
            EntryAction::SetText(text) => {
                self.current.text = text;
                (self, vec![])
            }
            EntryAction::Shift(millis) => {
                self.current.show_at = shift(self.current.show_at, millis);
                self.current.hide_at = shift(self.current.hide_at, millis);
                (self, vec![])
            }
            EntryAction::Retime { show_at, hide_at } => {
                let text = std::mem::take(&mut self.current.text);
                self.current = Subtitle::new(show_at, hide_at, text);
                (self, vec![])
            }
            EntryAction::Play => {
                let at = self.current.show_at;
                (self, vec![Effect::Seek(at)])
            }
            EntryAction::Revert => {
                self.current = self.original.clone();
                (self, vec![Effect::Emit(EntryAction::Play)])
            }
        }
    }

    fn view(&self) -> EntryView {
        EntryView {
            range: format!(
                "{} --> {}",
                format_ts(self.current.show_at),
                format_ts(self.current.hide_at)
            ),
            lines: self.current.text.clone(),
            edited: self.is_edited(),
        }
    }
}

/// Plain-text rendering of a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub range: String,
    pub lines: Vec<String>,
    pub edited: bool,
}

impl fmt::Display for EntryView {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.range)?;
        if self.edited {
            write!(fmt, " (edited)")?;
        }
        for line in &self.lines {
            write!(fmt, "\n    {}", line)?;
        }
        Ok(())
    }
}
