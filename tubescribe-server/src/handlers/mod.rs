mod health;
mod transcribe;

pub use health::health_handler;
pub use transcribe::{TranscribeRequest, TranscribeResponse, transcribe_handler};
