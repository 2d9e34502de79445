use crate::collection::{Collection, IndexedAction};
use crate::component::{Component, Effect};

use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of effects processed for one dispatched action.
pub const MAX_EFFECTS_PER_ACTION: usize = 64;

/// Applies `actions` in order, draining each one's effects before the next.
/// Returns the final collection and every seek requested along the way.
pub fn run<E, I>(mut collection: Collection<E>, actions: I) -> (Collection<E>, Vec<Duration>)
where
    E: Component,
    I: IntoIterator<Item = IndexedAction<E::Action>>,
{
    let mut seeks = Vec::new();
    for action in actions {
        let mut queue = VecDeque::new();
        queue.push_back(Effect::Emit(action));
        let mut processed = 0;

        while let Some(effect) = queue.pop_front() {
            if processed == MAX_EFFECTS_PER_ACTION {
                log::warn!(
                    "Effect limit of {} reached, dropping {} pending effects",
                    MAX_EFFECTS_PER_ACTION,
                    queue.len() + 1
                );
                break;
            }
            processed += 1;

            match effect {
                Effect::Emit(action) => {
                    log::debug!("Dispatching action for entry {}", action.index);
                    let (next, effects) = collection.update(action);
                    collection = next;
                    queue.extend(effects);
                }
                Effect::Seek(pos) => {
                    log::info!("Seek to {:?}", pos);
                    seeks.push(pos);
                }
            }
        }
    }
    (collection, seeks)
}
