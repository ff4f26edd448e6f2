//! babel-sources — Vocabulary sources and speech synthesis.
//!
//! Implements the `VocabSource` trait for published spreadsheets and local
//! JSON files, the `SpeechSynthesizer` trait for Google Translate TTS, and
//! the TOML configuration that wires them into a catalog loader.

pub mod config;
pub mod file;
pub mod mock;
pub mod sheet;
pub mod tts;

pub use config::{
    create_loader, create_source, create_synthesizer, load_config, BabelConfig, SourceConfig,
};
pub use file::JsonFileSource;
pub use sheet::SheetSource;
pub use tts::GoogleTtsSynthesizer;
