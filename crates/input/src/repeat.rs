//! DAS/ARR repeat handler for held commands.
//!
//! Movement commands fire once on press, then repeat every `arr_ms` after an
//! initial `das_ms` delay. Soft drop repeats every `soft_drop_repeat_ms` with no
//! delay. Holds are cancelled whenever the session is not playing, and on any
//! `Pause`, `Reset` or `Start` press.

use arrayvec::ArrayVec;

use crate::types::{
    Command, SessionState, DEFAULT_ARR_MS, DEFAULT_DAS_MS, SOFT_DROP_REPEAT_MS,
};

/// Commands emitted by one [`RepeatHandler::update`] call.
pub type Repeats = ArrayVec<Command, 32>;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn command(self) -> Option<Command> {
        match self {
            HorizontalDirection::Left => Some(Command::MoveLeft),
            HorizontalDirection::Right => Some(Command::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

/// Tracks held commands for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct RepeatHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    horizontal_das_timer: u32,
    horizontal_arr_accumulator: u32,
    down_arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    soft_drop_rate: u32,
}

impl RepeatHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS, SOFT_DROP_REPEAT_MS)
    }

    /// Zero periods are raised to 1ms so a repeat loop always terminates.
    pub fn with_config(das_delay: u32, arr_rate: u32, soft_drop_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            horizontal_das_timer: 0,
            horizontal_arr_accumulator: 0,
            down_arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            soft_drop_rate: soft_drop_rate.max(1),
        }
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    pub fn is_soft_drop_held(&self) -> bool {
        self.down_held
    }

    /// Register a press. Returns the command to apply immediately, or `None` if
    /// the command is already held. Other commands pass straight through; `Pause`,
    /// `Reset` and `Start` also cancel every hold.
    pub fn press(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::MoveLeft => self.press_horizontal(HorizontalDirection::Left),
            Command::MoveRight => self.press_horizontal(HorizontalDirection::Right),
            Command::SoftDrop => {
                if self.down_held {
                    None
                } else {
                    self.down_held = true;
                    self.down_arr_accumulator = 0;
                    Some(Command::SoftDrop)
                }
            }
            // Session transitions drop every hold, even Playing -> Playing on reset.
            Command::Pause | Command::Reset | Command::Start => {
                self.reset();
                Some(command)
            }
            other => Some(other),
        }
    }

    fn press_horizontal(&mut self, direction: HorizontalDirection) -> Option<Command> {
        if self.horizontal == direction {
            return None;
        }
        // The newest direction wins.
        self.horizontal = direction;
        self.horizontal_das_timer = 0;
        self.horizontal_arr_accumulator = 0;
        direction.command()
    }

    /// Register a release; stops the matching repeat.
    pub fn release(&mut self, command: Command) {
        match command {
            Command::MoveLeft if self.horizontal == HorizontalDirection::Left => {
                self.release_horizontal();
            }
            Command::MoveRight if self.horizontal == HorizontalDirection::Right => {
                self.release_horizontal();
            }
            Command::SoftDrop => {
                self.down_held = false;
                self.down_arr_accumulator = 0;
            }
            _ => {}
        }
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.horizontal_das_timer = 0;
        self.horizontal_arr_accumulator = 0;
    }

    /// Advance the repeat timers by `elapsed_ms` and collect due repeats.
    pub fn update(&mut self, elapsed_ms: u32, state: SessionState) -> Repeats {
        let mut commands = Repeats::new();

        if !state.is_playing() {
            self.reset();
            return commands;
        }

        if let Some(command) = self.horizontal.command() {
            let prev_das = self.horizontal_das_timer;
            self.horizontal_das_timer = self.horizontal_das_timer.saturating_add(elapsed_ms);

            if self.horizontal_das_timer >= self.das_delay {
                let excess = if prev_das < self.das_delay {
                    self.horizontal_das_timer - self.das_delay
                } else {
                    elapsed_ms
                };
                self.horizontal_arr_accumulator =
                    self.horizontal_arr_accumulator.saturating_add(excess);

                while self.horizontal_arr_accumulator >= self.arr_rate {
                    let _ = commands.try_push(command);
                    self.horizontal_arr_accumulator -= self.arr_rate;
                }
            }
        }

        if self.down_held {
            self.down_arr_accumulator = self.down_arr_accumulator.saturating_add(elapsed_ms);
            while self.down_arr_accumulator >= self.soft_drop_rate {
                let _ = commands.try_push(Command::SoftDrop);
                self.down_arr_accumulator -= self.soft_drop_rate;
            }
        }

        commands
    }

    pub fn reset(&mut self) {
        self.release_horizontal();
        self.down_held = false;
        self.down_arr_accumulator = 0;
    }
}

impl Default for RepeatHandler {
    fn default() -> Self {
        Self::new()
    }
}
