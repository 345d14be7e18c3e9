//! Engine session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one engine session.
///
/// Every knob the driver used to leave to the engine's defaults lives
/// here, and every field has its own default so a partial config still
/// yields a working session. The analyzer maps its `[engine]` TOML
/// table straight onto this struct.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Path to the UCI engine executable. A bare command name is
    /// resolved through `PATH` when the process is spawned.
    /// Defaults to "stockfish".
    #[serde(default = "default_engine_path")]
    pub engine_path: String,
    /// Search depth ceiling passed to `go depth`. Defaults to 20.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Per-search time budget in milliseconds passed to `go movetime`.
    /// Defaults to 8000.
    #[serde(default = "default_movetime_ms")]
    pub movetime_ms: u64,
    /// Worker threads handed to the engine. Defaults to 1.
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Hash table size in MiB handed to the engine. Defaults to 256.
    #[serde(default = "default_hash_mb")]
    pub hash_mb: u32,
    /// Whether to switch the engine into Chess960 mode. Defaults to true.
    #[serde(default = "default_chess960")]
    pub chess960: bool,
    /// Upper bound in milliseconds on how long one response scan may
    /// keep consuming lines before failing with a timeout. The check
    /// runs between lines; an engine that stops writing entirely still
    /// blocks on the read. Defaults to 120000.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_depth() -> u32 {
    20
}

fn default_movetime_ms() -> u64 {
    8000
}

fn default_threads() -> u32 {
    1
}

fn default_hash_mb() -> u32 {
    256
}

fn default_chess960() -> bool {
    true
}

fn default_deadline_ms() -> u64 {
    120_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            depth: default_depth(),
            movetime_ms: default_movetime_ms(),
            threads: default_threads(),
            hash_mb: default_hash_mb(),
            chess960: default_chess960(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl EngineConfig {
    /// The response-scan deadline as a [`Duration`].
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}
