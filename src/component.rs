use std::time::Duration;

/// A follow-up requested by an update, carried out by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<A> {
    /// Dispatch another action.
    Emit(A),
    /// Ask the player to seek to the given position.
    Seek(Duration),
}

impl<A> Effect<A> {
    /// Re-tags the action carried by an `Emit`.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Effect::Emit(action) => Effect::Emit(f(action)),
            Effect::Seek(pos) => Effect::Seek(pos),
        }
    }
}

/// A unit of UI state with its own update and view functions.
///
/// `update` consumes the old state and returns its replacement, so a
/// component is never mutated in place.
pub trait Component: Sized {
    type Action;
    type View;

    fn update(self, action: Self::Action) -> (Self, Vec<Effect<Self::Action>>);

    fn view(&self) -> Self::View;
}

/// Anything that occupies a closed time range on the playback timeline.
pub trait Timed {
    fn begin(&self) -> Duration;
    fn end(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_retags_emit_only() {
        let emit: Effect<u8> = Effect::Emit(3);
        let seek: Effect<u8> = Effect::Seek(Duration::from_secs(1));

        assert_eq!(emit.map(|a| (7usize, a)), Effect::Emit((7, 3)));
        assert_eq!(
            seek.map(|a| (7usize, a)),
            Effect::Seek(Duration::from_secs(1))
        );
    }
}
