use crate::component::{Component, Effect, Timed};

use std::time::Duration;

/// An action addressed to the entry at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedAction<A> {
    pub index: usize,
    pub action: A,
}

impl<A> IndexedAction<A> {
    pub fn new(index: usize, action: A) -> Self {
        Self { index, action }
    }
}

/// Ordered, index-addressable entries. Indices never move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<E> {
    entries: Vec<E>,
}

impl<E> Collection<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }
}

impl<E: Component> Collection<E> {
    /// Forwards `action` to its entry and tags the resulting effects with the
    /// same index. An out-of-range index leaves the collection untouched.
    pub fn update(
        mut self,
        action: IndexedAction<E::Action>,
    ) -> (Self, Vec<Effect<IndexedAction<E::Action>>>) {
        let IndexedAction { index, action } = action;
        if index >= self.entries.len() {
            log::debug!(
                "Ignoring action for index {} in a collection of {}",
                index,
                self.entries.len()
            );
            return (self, vec![]);
        }

        // Take the entry out without shifting later slots; the final swap
        // restores every index.
        let entry = self.entries.swap_remove(index);
        let (entry, effects) = entry.update(action);
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        self.entries.swap(index, last);

        let effects = effects
            .into_iter()
            .map(|effect| effect.map(|action| IndexedAction { index, action }))
            .collect();
        (self, effects)
    }

    pub fn view_at(&self, index: usize) -> Option<E::View> {
        self.entries.get(index).map(Component::view)
    }
}

impl<E: Timed> Collection<E> {
    /// Index of the first entry that contains `time` or lies after it.
    /// Returns `len()` once `time` is past the end of every entry.
    pub fn time_to_index(&self, time: Duration) -> usize {
        let mut index = 0;
        while let Some(entry) = self.entries.get(index) {
            if entry.end() >= time {
                break;
            }
            index += 1;
        }
        index
    }
}

impl<E> From<Vec<E>> for Collection<E> {
    fn from(entries: Vec<E>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Span {
        begin: u64,
        end: u64,
        hits: u32,
    }

    fn span(begin: u64, end: u64) -> Span {
        Span { begin, end, hits: 0 }
    }

    impl Timed for Span {
        fn begin(&self) -> Duration {
            Duration::from_secs(self.begin)
        }

        fn end(&self) -> Duration {
            Duration::from_secs(self.end)
        }
    }

    impl Component for Span {
        type Action = u32;
        type View = String;

        fn update(mut self, action: u32) -> (Self, Vec<Effect<u32>>) {
            self.hits += action;
            let at = self.begin();
            (self, vec![Effect::Emit(action + 1), Effect::Seek(at)])
        }

        fn view(&self) -> String {
            format!("{}-{} x{}", self.begin, self.end, self.hits)
        }
    }

    fn two_spans() -> Collection<Span> {
        Collection::new(vec![span(0, 5), span(5, 10)])
    }

    #[test]
    fn update_replaces_slot_and_tags_effects() {
        let (coll, effects) = Collection::new(vec![span(0, 5), span(5, 10), span(10, 15)])
            .update(IndexedAction::new(0, 2));

        assert_eq!(coll.get(0).unwrap().hits, 2);
        assert_eq!(coll.get(1), Some(&span(5, 10)));
        assert_eq!(coll.get(2), Some(&span(10, 15)));
        assert_eq!(
            effects,
            vec![
                Effect::Emit(IndexedAction::new(0, 3)),
                Effect::Seek(Duration::from_secs(0)),
            ]
        );

        let (coll, effects) = coll.update(IndexedAction::new(1, 4));
        assert_eq!(
            coll.iter().map(|s| s.hits).collect::<Vec<_>>(),
            vec![2, 4, 0]
        );
        assert_eq!(effects[0], Effect::Emit(IndexedAction::new(1, 5)));
    }

    #[test]
    fn update_out_of_range_is_noop() {
        for index in [2, 3, 100] {
            let (coll, effects) = two_spans().update(IndexedAction::new(index, 1));
            assert_eq!(coll, two_spans());
            assert!(effects.is_empty());
        }

        let (coll, effects) = Collection::<Span>::new(vec![]).update(IndexedAction::new(0, 1));
        assert!(coll.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn view_at_bounds() {
        let coll = two_spans();
        assert_eq!(coll.view_at(1), Some("5-10 x0".to_string()));
        assert_eq!(coll.view_at(2), None);
    }

    macro_rules! test_time_to_index {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (secs, expected) = $value;

                let index = two_spans().time_to_index(Duration::from_secs(secs));

                assert_eq!(index, expected);
            }
        )*
        }
    }

    test_time_to_index! {
        test_time_to_index_0: (0, 0),
        test_time_to_index_1: (3, 0),
        test_time_to_index_2: (5, 0),
        test_time_to_index_3: (7, 1),
        test_time_to_index_4: (10, 1),
        test_time_to_index_5: (11, 2),
        test_time_to_index_6: (20, 2),
    }

    #[test]
    fn time_to_index_stops_before_gap() {
        let coll = Collection::new(vec![span(0, 2), span(6, 8)]);
        assert_eq!(coll.time_to_index(Duration::from_secs(4)), 1);
        assert_eq!(Collection::<Span>::new(vec![]).time_to_index(Duration::ZERO), 0);
    }

    #[test]
    fn time_to_index_is_monotonic() {
        let coll = Collection::new(vec![span(1, 3), span(3, 4), span(7, 9), span(12, 20)]);
        let mut last = 0;
        for millis in (0..25_000).step_by(250) {
            let index = coll.time_to_index(Duration::from_millis(millis));
            assert!(index >= last, "index went from {} to {} at {}ms", last, index, millis);
            last = index;
        }
        assert_eq!(last, coll.len());
    }
}
