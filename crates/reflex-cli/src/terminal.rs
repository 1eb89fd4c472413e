//! Terminal rendition of the board.
//!
//! Draws a 16x2 character display, the five lights and the buzzer with
//! crossterm. Button state comes from [`HeldKeys`], fed by the keyboard thread.

use std::io::{self, Write, stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use reflex_core::board::{DISPLAY_WIDTH, SCORE_COLUMN};
use reflex_core::{ButtonSet, FeedbackSink, InputPort, Outputs, Region};
use tracing::debug;

use crate::input::HeldKeys;

const LIGHTS: [(&str, Outputs, Color); 5] = [
    ("START", Outputs::START, Color::White),
    ("RED", Outputs::RED, Color::Red),
    ("BLUE", Outputs::BLUE, Color::Blue),
    ("YELLOW", Outputs::YELLOW, Color::Yellow),
    ("GREEN", Outputs::GREEN, Color::Green),
];

const HELP: &str = "Enter/Space: Start   r b y g / 1-4: colors   Esc/q: quit";

/// Raw mode plus alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Character display contents. Writes overwrite in place, like the LCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcd {
    rows: [Vec<char>; 2],
}

impl Lcd {
    pub fn new() -> Self {
        Self {
            rows: [vec![' '; DISPLAY_WIDTH], vec![' '; DISPLAY_WIDTH]],
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(' ');
        }
    }

    pub fn put(&mut self, region: Region, column: usize, text: &str) {
        let row = &mut self.rows[Self::index(region)];
        for (cell, ch) in row.iter_mut().skip(column).zip(text.chars()) {
            *cell = ch;
        }
    }

    pub fn row(&self, region: Region) -> String {
        self.rows[Self::index(region)].iter().collect()
    }

    fn index(region: Region) -> usize {
        match region {
            Region::Top => 0,
            Region::Bottom => 1,
        }
    }
}

impl Default for Lcd {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TerminalBoard {
    lcd: Lcd,
    outputs: Outputs,
    keys: Arc<HeldKeys>,
}

impl TerminalBoard {
    pub fn new(keys: Arc<HeldKeys>) -> Self {
        Self {
            lcd: Lcd::new(),
            outputs: Outputs::empty(),
            keys,
        }
    }

    fn redraw(&mut self) {
        if let Err(e) = self.render() {
            debug!("Render failed: {}", e);
        }
    }

    fn render(&self) -> io::Result<()> {
        let mut out = stdout();
        let border = format!("+{}+", "-".repeat(DISPLAY_WIDTH));

        queue!(
            out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(2, 1),
            Print(&border),
            cursor::MoveTo(2, 2),
            Print(format!("|{}|", self.lcd.row(Region::Top))),
            cursor::MoveTo(2, 3),
            Print(format!("|{}|", self.lcd.row(Region::Bottom))),
            cursor::MoveTo(2, 4),
            Print(&border),
            cursor::MoveTo(2, 6),
        )?;

        for (label, light, color) in LIGHTS {
            if self.outputs.contains(light) {
                queue!(
                    out,
                    SetForegroundColor(color),
                    SetAttribute(Attribute::Bold),
                    Print(format!("[{}]", label)),
                    SetAttribute(Attribute::Reset),
                )?;
            } else {
                queue!(
                    out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(format!(" {} ", label)),
                )?;
            }
            queue!(out, ResetColor, Print(" "))?;
        }

        let buzzer = if self.outputs.contains(Outputs::BUZZER) {
            "*beep*"
        } else {
            "      "
        };
        queue!(
            out,
            cursor::MoveTo(2, 8),
            Print(buzzer),
            cursor::MoveTo(2, 10),
            SetForegroundColor(Color::DarkGrey),
            Print(HELP),
            ResetColor,
        )?;
        out.flush()
    }
}

impl FeedbackSink for TerminalBoard {
    fn clear(&mut self) {
        self.lcd.clear();
        self.redraw();
    }

    fn write(&mut self, region: Region, text: &str) {
        self.lcd.put(region, 0, text);
        self.redraw();
    }

    fn draw_score(&mut self, value: u16) {
        self.lcd.put(Region::Top, SCORE_COLUMN, &value.to_string());
        self.redraw();
    }

    fn set_outputs(&mut self, outputs: Outputs) {
        self.outputs = outputs;
        self.redraw();
    }

    fn pulse(&mut self, outputs: Outputs, cycles: u8, interval: Duration) {
        let restore = self.outputs;
        for _ in 0..cycles {
            self.outputs ^= outputs;
            self.redraw();
            thread::sleep(interval);
        }
        self.outputs = restore;
        self.redraw();
    }
}

impl InputPort for TerminalBoard {
    fn snapshot(&self) -> ButtonSet {
        self.keys.held()
    }
}
