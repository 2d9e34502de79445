use crate::srt::Subtitle;

use anyhow::{Context, Result};
use regex::Regex;

/// Strips everything from subtitles that isn't spoken dialogue: markup,
/// sound cues, speaker labels and song lyrics.
pub struct Cleaner {
    markup: Regex,
    cues: Regex,
    speaker: Regex,
    lyrics: Regex,
    spaces: Regex,
}

impl Cleaner {
    pub fn new() -> Result<Self> {
        let compile = |p: &str| Regex::new(p).context("Invalid regex.");
        Ok(Self {
            // <i>, </font>, {\an8}
            markup: compile(r"<[^>]*>|\{[^}]*\}")?,
            // [door slams], (laughs)
            cues: compile(r"\[[^\]]*\]|\([^)]*\)")?,
            // JOHN: / - MRS. O'HARA:
            speaker: compile(r"^(-\s*)?\p{Lu}[\p{Lu}\d .'-]*:\s*")?,
            lyrics: compile(r"^[♪♫#]")?,
            spaces: compile(r"\s+")?,
        })
    }

    /// Returns the dialogue left on `line`, or `None` if nothing is left.
    pub fn clean_line(&self, line: &str) -> Option<String> {
        let line = self.markup.replace_all(line, "");
        let line = self.cues.replace_all(&line, "");
        let line = self.spaces.replace_all(line.trim(), " ");
        if self.lyrics.is_match(&line) {
            return None;
        }
        let line = self.speaker.replace(&line, "${1}");
        let line = line.trim();
        if line.is_empty() || line == "-" {
            None
        } else {
            Some(line.to_string())
        }
    }

    /// Cleans every line and drops subtitles left without any text.
    pub fn clean(&self, subs: Vec<Subtitle>) -> Vec<Subtitle> {
        let before = subs.len();
        let cleaned: Vec<Subtitle> = subs
            .into_iter()
            .filter_map(|mut sub| {
                sub.text = sub
                    .text
                    .iter()
                    .filter_map(|line| self.clean_line(line))
                    .collect();
                if sub.text.is_empty() {
                    log::debug!("Dropping subtitle at {:?}, nothing left after cleaning", sub.show_at);
                    None
                } else {
                    Some(sub)
                }
            })
            .collect();
        log::info!("Cleaning dropped {} of {} subtitles", before - cleaned.len(), before);
        cleaned
    }
}
