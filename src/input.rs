use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::grid::Dir;

/// Swipes shorter than this on both axes are ignored (touch pixels).
pub const SWIPE_MIN_DISTANCE: f32 = 30.0;
/// Same threshold for mouse drags measured in terminal cells.
pub const DRAG_MIN_CELLS: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Dir),
    Start,
    Pause,
    Restart,
    Faster,
    Slower,
    ToggleGrid,
    CycleTheme,
    Quit,
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {}
        _ => return None,
    }
    let cmd = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Command::Turn(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Command::Turn(Dir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Command::Turn(Dir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Command::Turn(Dir::Right),
        KeyCode::Char(' ') | KeyCode::Char('p') => Command::Pause,
        KeyCode::Enter => Command::Start,
        KeyCode::Char('r') => Command::Restart,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Faster,
        KeyCode::Char('-') => Command::Slower,
        KeyCode::Char('g') => Command::ToggleGrid,
        KeyCode::Char('t') => Command::CycleTheme,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Direction of a swipe from `start` to `end`; the longer axis wins.
pub fn swipe_direction(start: (f32, f32), end: (f32, f32), min_distance: f32) -> Option<Dir> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if dx.abs() < min_distance && dy.abs() < min_distance {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Dir::Right } else { Dir::Left })
    } else {
        Some(if dy > 0.0 { Dir::Down } else { Dir::Up })
    }
}

/// Turns left-button drags into swipes.
#[derive(Debug, Default)]
pub struct DragTracker {
    start: Option<(u16, u16)>,
}

impl DragTracker {
    pub fn handle(&mut self, event: MouseEvent) -> Option<Command> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (sx, sy) = self.start.take()?;
                // Terminal cells are roughly twice as tall as they are wide.
                let start = (sx as f32, sy as f32 * 2.0);
                let end = (event.column as f32, event.row as f32 * 2.0);
                swipe_direction(start, end, DRAG_MIN_CELLS).map(Command::Turn)
            }
            _ => None,
        }
    }
}
