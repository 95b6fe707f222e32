//! Scripted gesture playback.

use crate::config::AppConfig;
use crate::error::SessionError;
use crate::session::{Session, TextPrompt};
use inkcanvas_core::{KeyEvent, ManualClock, Modifiers, PointerEvent, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from loading or running a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Step {index} failed: {source}")]
    Step {
        index: usize,
        #[source]
        source: SessionError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Usage(String),
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolKind },
    Color { color: String },
    Width { width: f64 },
    FontSize { size: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    /// Pointer release; coordinates may be left out.
    Up {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    /// Place text with the text tool.
    Text { x: f64, y: f64, text: String },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Undo,
    Redo,
    Delete,
    Clear,
    Resize { width: u32, height: u32 },
    /// Let time pass, firing any due timers.
    Wait { ms: u64 },
}

/// Parse a JSON array of steps.
pub fn parse_script(json: &str) -> Result<Vec<Step>, ReplayError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON script file.
pub fn load_script(path: &Path) -> Result<Vec<Step>, ReplayError> {
    let json = std::fs::read_to_string(path)?;
    let steps = parse_script(&json)?;
    log::info!("Loaded {} steps from {}", steps.len(), path.display());
    Ok(steps)
}

/// Text prompt fed by `text` steps.
#[derive(Debug, Clone, Default)]
struct QueuedPrompt {
    answers: Arc<Mutex<VecDeque<String>>>,
}

impl QueuedPrompt {
    fn push(&self, answer: String) {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(answer);
        }
    }
}

impl TextPrompt for QueuedPrompt {
    fn prompt(&mut self, _position: Point) -> Option<String> {
        self.answers.lock().ok()?.pop_front()
    }
}

/// Drives a session from steps, with time moving only on `wait`.
pub struct Replay {
    session: Session,
    clock: ManualClock,
    prompt: QueuedPrompt,
}

impl Replay {
    pub fn new(config: AppConfig) -> Result<Self, ReplayError> {
        let clock = ManualClock::new();
        let prompt = QueuedPrompt::default();
        let session = Session::new(config)?
            .with_clock(clock.clone())
            .with_prompt(prompt.clone());
        Ok(Self {
            session,
            clock,
            prompt,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply every step in order, then fire pending timers.
    pub fn run(&mut self, steps: &[Step]) -> Result<(), ReplayError> {
        for (index, step) in steps.iter().enumerate() {
            self.apply(step)
                .map_err(|source| ReplayError::Step { index, source })?;
            for notice in self.session.take_notices() {
                log::warn!("Step {index}: {notice}");
            }
        }
        self.session.flush()?;
        Ok(())
    }

    /// Finish playback and hand back the session.
    pub fn into_session(self) -> Session {
        self.session
    }

    fn apply(&mut self, step: &Step) -> Result<(), SessionError> {
        log::debug!("Replaying {step:?}");
        let session = &mut self.session;
        match step {
            Step::Tool { tool } => session.set_tool(*tool),
            Step::Color { color } => session.set_color(color)?,
            Step::Width { width } => session.set_width(*width),
            Step::FontSize { size } => session.set_font_size(*size),
            Step::Down { x, y } => session.handle_pointer(PointerEvent::down(Point::new(*x, *y)))?,
            Step::Move { x, y } => session.handle_pointer(PointerEvent::moved(Point::new(*x, *y)))?,
            Step::Up { x, y } => {
                let position = x.zip(*y).map(|(x, y)| Point::new(x, y));
                session.handle_pointer(PointerEvent::Up { position })?;
            }
            Step::Text { x, y, text } => {
                self.prompt.push(text.clone());
                let point = Point::new(*x, *y);
                session.set_tool(ToolKind::Text);
                session.pointer_down(point)?;
                session.pointer_up(Some(point));
            }
            Step::Key { key, modifiers } => {
                if !session.handle_key(&KeyEvent::new(key.clone(), *modifiers))? {
                    log::debug!("Key {key} did nothing");
                }
            }
            Step::Undo => {
                session.undo()?;
            }
            Step::Redo => {
                session.redo()?;
            }
            Step::Delete => {
                session.delete_selected();
            }
            Step::Clear => session.clear_canvas(),
            Step::Resize { width, height } => session.request_resize(*width, *height),
            Step::Wait { ms } => {
                self.clock.advance_ms(*ms);
                session.tick()?;
            }
        }
        Ok(())
    }
}
