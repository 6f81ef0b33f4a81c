use crate::map::direction::Direction;

/// An entity's current direction plus at most one requested-but-not-yet-legal direction.
///
/// A request made with [`DirectionState::queue`] is held until the movement engine
/// finds a moment where it is legal, or until another request overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionState {
    current: Option<Direction>,
    buffered: Option<Direction>,
}

impl DirectionState {
    pub fn new(current: Option<Direction>) -> Self {
        Self { current, buffered: None }
    }

    /// The direction the entity is travelling in, or `None` if it is stopped.
    pub fn current(&self) -> Option<Direction> {
        self.current
    }

    /// The pending request, if any.
    pub fn buffered(&self) -> Option<Direction> {
        self.buffered
    }

    /// Stores a pending direction, replacing any earlier request.
    pub fn queue(&mut self, direction: Direction) {
        self.buffered = Some(direction);
    }

    /// Forces the current direction immediately. Any pending request is kept.
    pub fn apply(&mut self, direction: Direction) {
        self.current = Some(direction);
    }

    /// Promotes the pending request to the current direction if `can_move` allows it.
    ///
    /// Returns `true` if the request was applied; the buffer is then empty.
    pub fn try_apply_buffered<F>(&mut self, can_move: F) -> bool
    where
        F: FnOnce(Direction) -> bool,
    {
        match self.buffered {
            Some(direction) if can_move(direction) => {
                self.current = Some(direction);
                self.buffered = None;
                true
            }
            _ => false,
        }
    }

    /// Stops the entity. The pending request survives so it can restart movement later.
    pub fn stop(&mut self) {
        self.current = None;
    }

    /// Turns the entity around and drops any pending request.
    pub fn reverse(&mut self) {
        self.current = self.current.map(Direction::opposite);
        self.buffered = None;
    }

    /// Clears both the current and the pending direction.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
