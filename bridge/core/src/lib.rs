//! muxbridge core - editor/multiplexer bridge over OSC 51
//!
//! This crate lets a text editor cooperate with the terminal multiplexer it
//! runs in, using nothing but escape sequences on the shared terminal output.
//! It is independent of any particular editor: everything it needs from the
//! host is behind the traits in [`host`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── host editor ─────────────────────────────┐
//! │  key press             change events            statusline evaluator │
//! └─────┬───────────────────────┬───────────────────────────▲────────────┘
//!       │                       │                           │
//!       ▼                       ▼                           │
//! ┌───────────┐       ┌──────────────────────┐       ┌──────┴─────┐
//! │ Navigator │       │ StatuslineController │──────►│ ansi       │
//! │           │       │  (debounce, state)   │       │ render     │
//! └─────┬─────┘       └──────────┬───────────┘       └──────┬─────┘
//!       │ no neighbour           │                          │
//!       ▼                        ▼                          ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ protocol: ProtocolFrame ─► codec (base64) ─► OscWriter (write+flush) │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    ▼
//!                  ESC ] 51 ; <command> ; <payload> BEL
//! ```
//!
//! # Key Types
//!
//! - [`Navigator`]: resolves a [`Direction`] locally, or forwards it
//! - [`StatuslineController`]: enable/disable lifecycle and debounced updates
//! - [`RenderedLine`] / [`StyledSpan`]: evaluated statusline with styles
//! - [`ProtocolFrame`] / [`OscWriter`]: wire frames and the shared sink
//! - [`Timer`]: cancellable deadlines ([`ManualTimer`], [`TokioTimer`])
//! - [`BridgeConfig`]: typed configuration from TOML, env and CLI
//!
//! # Quick Start
//!
//! ```ignore
//! use muxbridge_core::{
//!     load_config, ManualTimer, Navigator, OscWriter, StatuslineController, Direction,
//! };
//!
//! let config = load_config()?;
//! let writer = OscWriter::stdout();
//!
//! let navigator = Navigator::new(config.navigation.clone(), writer.clone());
//! navigator.navigate(&mut my_window_graph, Direction::Left);
//!
//! let mut statusline =
//!     StatuslineController::new(my_host, ManualTimer::new(), writer, config.statusline);
//! if statusline.config().should_enable() {
//!     statusline.enable();
//! }
//! // on every host change event:
//! statusline.notify_change();
//! ```
//!
//! # Module Overview
//!
//! - [`ansi`]: styled spans to SGR escaped text
//! - [`codec`]: base64 transport encoding
//! - [`config`]: configuration loading
//! - [`direction`]: the four navigation directions
//! - [`host`]: collaborator traits implemented by the editor
//! - [`lifecycle`]: statusline controller
//! - [`navigator`]: navigation with multiplexer fallback
//! - [`protocol`]: OSC 51 frames and the output writer
//! - [`statusline`]: statusline data model
//! - [`timer`]: deadline scheduling

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ansi;
pub mod codec;
pub mod config;
pub mod direction;
pub mod host;
pub mod lifecycle;
pub mod navigator;
pub mod protocol;
pub mod statusline;
pub mod timer;

// Re-exports for convenience
pub use config::{
    default_config_path, load_config, load_config_from_path, BridgeConfig, ConfigError,
    ConfigOverrides, ConfigSource, NavigationConfig, StatuslineConfig, StatuslineMode,
};
pub use direction::{Direction, ParseDirectionError};
pub use host::{HostError, StatuslineHost, SubscriptionId, WindowGraph, WindowId};
pub use lifecycle::{LifecycleState, StatuslineController, UpdateStats};
pub use navigator::{NavigateOutcome, Navigator};
pub use protocol::{FrameKind, OscWriter, PayloadEncoding, ProtocolError, ProtocolFrame};
pub use statusline::{RenderedLine, Rgb, StyledSpan};
pub use timer::{FiredTimers, ManualTimer, Timer, TimerHandle, TokioTimer};
