//! InkCanvas Application
//!
//! The interaction controller tying pointer and keyboard input to the
//! scene, raster layer and history, plus configuration, PNG export and
//! scripted playback.

mod config;
mod error;
mod export;
mod replay;
mod session;
mod shortcuts;

pub use config::AppConfig;
pub use error::{SessionError, SessionResult};
pub use export::{encode_png, export_png, write_png};
pub use replay::{Replay, ReplayError, Step, load_script, parse_script};
pub use session::{FixedPrompt, NoPrompt, Notice, Session, TextPrompt};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
