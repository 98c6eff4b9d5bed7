use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::engine::{Collision, Engine};
use crate::grid::{Dir, Pos};
use crate::session::{Phase, Session};
use crate::store::ScoreStore;

const CELL_W: usize = 2;
const BORDER_COLOR: Color = Color::DarkGrey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Head(Dir),
    Body,
    Apple,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

pub struct Renderer {
    size: usize,
    last: Vec<Cell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            last: vec![BLANK; size * size],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next frame to redraw everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render<S: ScoreStore>(&mut self, out: &mut impl Write, session: &Session<S>) -> io::Result<()> {
        let engine = session.engine();
        if engine.grid_size() != self.size {
            *self = Renderer::new(engine.grid_size());
        }

        let needed_w = (self.size * CELL_W + 2) as u16;
        let needed_h = (self.size + 4) as u16;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(MoveTo(0, 0))?;
            out.queue(Clear(ClearType::All))?;
            out.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
            self.draw_border(out)?;
        }

        let hud = hud_line(session);
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..self.size {
            for x in 0..self.size {
                let cell = cell_for(engine, session.theme(), Pos::new(x, y));
                let idx = y * self.size + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(out, x, y, cell)?;
                }
            }
        }

        let banner = banner_line(session);
        if self.needs_full || banner != self.last_banner {
            out.queue(MoveTo(self.origin_x, self.origin_y + self.size as u16 + 2))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(SetForegroundColor(Color::Yellow))?;
            out.queue(Print(&banner))?;
            out.queue(ResetColor)?;
            self.last_banner = banner;
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_border(&self, out: &mut impl Write) -> io::Result<()> {
        let inner = "─".repeat(self.size * CELL_W);
        out.queue(SetForegroundColor(BORDER_COLOR))?;
        out.queue(MoveTo(self.origin_x, self.origin_y))?;
        out.queue(Print(format!("┌{}┐", inner)))?;
        for y in 0..self.size as u16 {
            let row = self.origin_y + 1 + y;
            out.queue(MoveTo(self.origin_x, row))?;
            out.queue(Print('│'))?;
            out.queue(MoveTo(self.origin_x + 1 + (self.size * CELL_W) as u16, row))?;
            out.queue(Print('│'))?;
        }
        out.queue(MoveTo(self.origin_x, self.origin_y + 1 + self.size as u16))?;
        out.queue(Print(format!("└{}┘", inner)))?;
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_cell(&self, out: &mut impl Write, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = glyph_text(cell.glyph);
        let x_pos = self.origin_x + 1 + (x * CELL_W) as u16;
        let y_pos = self.origin_y + 1 + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Head(Dir::Up) => "▲",
        Glyph::Head(Dir::Down) => "▼",
        Glyph::Head(Dir::Left) => "◀",
        Glyph::Head(Dir::Right) => "▶",
        Glyph::Body => "██",
        Glyph::Apple => "●",
        Glyph::Empty => "  ",
    }
}

pub fn cell_for(engine: &Engine, theme: Theme, pos: Pos) -> Cell {
    if pos == engine.head() {
        return Cell {
            glyph: Glyph::Head(engine.direction()),
            color: theme.snake_color(),
        };
    }
    if engine.snake().iter().skip(1).any(|s| *s == pos) {
        return Cell {
            glyph: Glyph::Body,
            color: theme.snake_color(),
        };
    }
    if pos == engine.food() {
        return Cell {
            glyph: Glyph::Apple,
            color: theme.apple_color(),
        };
    }
    BLANK
}

pub fn hud_line<S: ScoreStore>(session: &Session<S>) -> String {
    let engine = session.engine();
    format!(
        "Score: {}  Best: {}  Level: {}  Speed: {}ms  Theme: {}",
        engine.score(),
        session.high_score(),
        engine.level(),
        engine.tick_ms(),
        session.theme().name()
    )
}

pub fn banner_line<S: ScoreStore>(session: &Session<S>) -> String {
    match session.phase() {
        Phase::Ready => "enter start  arrows/wasd/hjkl turn  +/- speed  g grid  t theme  q quit".into(),
        Phase::Running => "space pause  r restart  q quit".into(),
        Phase::Paused => "PAUSED - space to resume, r to restart".into(),
        Phase::GameOver => {
            let cause = match session.engine().collision() {
                Some(Collision::Wall) => "hit the wall",
                Some(Collision::SelfHit) => "bit itself",
                None => "",
            };
            format!(
                "GAME OVER - {} - Final Score: {} (r to play again, q to quit)",
                cause,
                session.final_score().unwrap_or(0)
            )
        }
    }
}
