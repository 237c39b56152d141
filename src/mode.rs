// Draw mode: the pen is either up (Idle) or down (Drawing).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
}

/// Two states, one transition. Only the toggle command moves it.
#[derive(Debug, Default)]
pub struct DrawStateMachine {
    state: DrawState,
}

impl DrawStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Flip the pen and return the new state.
    pub fn toggle(&mut self) -> DrawState {
        self.state = match self.state {
            DrawState::Idle => DrawState::Drawing,
            DrawState::Drawing => DrawState::Idle,
        };
        self.state
    }
}
