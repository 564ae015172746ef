//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the I/O bridge
//! traits using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `SettingsStore` using a JSON-backed key-value store
//! - `ConnectivityProbe` using a TCP reachability probe
//! - `ContentResolver` for `file://` URIs and plain paths
//!
//! Decoder and audio-focus bindings are host-application concerns and are
//! not provided here; hosts implement `MediaPlayer`, `PlayerFactory`, and
//! `AudioFocusController` against their audio backend of choice.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
//! use bridge_traits::{HttpClient, FileSystemAccess};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     let fs = TokioFileSystem::new();
//! }
//! ```

mod content;
mod filesystem;
mod http;
mod network;
mod settings;

pub use content::FileContentResolver;
pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use network::DesktopConnectivity;
pub use settings::JsonSettingsStore;
