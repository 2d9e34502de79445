use crate::srt::Subtitle;

use std::time::Duration;

fn overlap(a: &Subtitle, b: &Subtitle) -> Duration {
    let begin = a.show_at.max(b.show_at);
    let end = a.hide_at.min(b.hide_at);
    end.saturating_sub(begin)
}

/// Merges a foreign and a native subtitle track into one bilingual track.
///
/// Each native subtitle is attached below the foreign subtitle it overlaps
/// the most, keeping the foreign timing. Native subtitles that overlap
/// nothing are kept as entries of their own.
pub fn combine(foreign: &[Subtitle], native: &[Subtitle]) -> Vec<Subtitle> {
    let mut attached: Vec<Vec<&Subtitle>> = vec![Vec::new(); foreign.len()];
    let mut unmatched = Vec::new();

    for nsub in native {
        let best = foreign
            .iter()
            .enumerate()
            .map(|(i, fsub)| (i, overlap(fsub, nsub)))
            .filter(|(_, o)| *o > Duration::ZERO)
            // Earliest foreign subtitle wins a tie.
            .fold(None, |best: Option<(usize, Duration)>, (i, o)| match best {
                Some((_, b)) if b >= o => best,
                _ => Some((i, o)),
            });
        match best {
            Some((i, _)) => attached[i].push(nsub),
            None => unmatched.push(nsub.clone()),
        }
    }
    log::debug!(
        "Combined {} foreign and {} native subtitles, {} native unmatched",
        foreign.len(),
        native.len(),
        unmatched.len()
    );

    let mut combined: Vec<Subtitle> = foreign
        .iter()
        .zip(attached)
        .map(|(fsub, natives)| {
            let mut sub = fsub.clone();
            sub.text
                .extend(natives.into_iter().flat_map(|n| n.text.iter().cloned()));
            sub
        })
        .collect();
    combined.extend(unmatched);
    combined.sort_by_key(|s| s.show_at);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(show_ms: u64, hide_ms: u64, text: &str) -> Subtitle {
        Subtitle::new(
            Duration::from_millis(show_ms),
            Duration::from_millis(hide_ms),
            vec![text.to_string()],
        )
    }

    #[test]
    fn attaches_native_to_best_overlap() {
        let foreign = vec![sub(0, 2000, "Hola."), sub(2000, 4000, "¿Qué tal?")];
        let native = vec![sub(100, 1900, "Hello."), sub(1500, 3900, "How are you?")];

        let combined = combine(&foreign, &native);

        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].text, vec!["Hola.", "Hello."]);
        assert_eq!(combined[1].text, vec!["¿Qué tal?", "How are you?"]);
        assert_eq!(combined[1].show_at, Duration::from_millis(2000));
    }

    #[test]
    fn keeps_unmatched_native_in_order() {
        let foreign = vec![sub(0, 1000, "Uno."), sub(5000, 6000, "Dos.")];
        let native = vec![sub(2000, 3000, "Meanwhile.")];

        let combined = combine(&foreign, &native);

        assert_eq!(
            combined.iter().map(|s| s.text[0].as_str()).collect::<Vec<_>>(),
            vec!["Uno.", "Meanwhile.", "Dos."]
        );
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let foreign = vec![sub(0, 1000, "Uno.")];
        let native = vec![sub(1000, 2000, "Two.")];

        assert_eq!(combine(&foreign, &native).len(), 2);
    }
}
