//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the renderer/artwork core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that must be implemented differently per host (desktop,
//! mobile, embedded).
//!
//! ## Traits
//!
//! ### Playback
//! - [`MediaPlayer`](player::MediaPlayer) - One platform decoder instance
//! - [`PlayerFactory`](player::PlayerFactory) - Decoder allocation and signal routing
//! - [`AudioFocusController`](player::AudioFocusController) - OS audio focus arbitration
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP with retry and timeouts
//! - [`FileSystemAccess`](fs::FileSystemAccess) - Cache-directory file I/O
//! - [`ContentResolver`](content::ContentResolver) - Local content URI reads
//!
//! ### Platform Integration
//! - [`ConnectivityProbe`](network::ConnectivityProbe) - Reachability and Wi-Fi detection
//! - [`SettingsStore`](settings::SettingsStore) - Key-value preferences storage
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert platform-specific errors to
//! `BridgeError` and include context (file paths, URLs, status).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod content;
pub mod error;
pub mod fs;
pub mod http;
pub mod network;
pub mod player;
pub mod settings;

pub use error::BridgeError;

// Re-export commonly used types
pub use content::ContentResolver;
pub use fs::{FileMetadata, FileSystemAccess};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use network::{ConnectivityProbe, NetworkInfo, NetworkType};
pub use player::{
    AudioFocus, AudioFocusController, MediaPlayer, PlayerEvent, PlayerFactory, PlayerId,
    PlayerSignal,
};
pub use settings::SettingsStore;
