//! wg-conf - WireGuard tunnel configuration transcoder
//!
//! Parses `[Interface]`/`[Peer]` INI files into a [`Config`], lets the
//! caller mutate it (add or remove peers, change interface settings),
//! and re-emits either canonical column-aligned INI text or a JSON
//! document. The two textual forms never touch each other directly;
//! [`Config`] is always the pivot.
//!
//! # Example
//!
//! ```no_run
//! use wg_conf::Config;
//!
//! let config = Config::from_path("wg0.conf").unwrap();
//! println!("loaded {} peer(s)", config.peers.len());
//! print!("{config}");
//! ```

pub mod config;
pub mod error;

pub use config::{Config, Interface, Peer, Peers};
pub use error::Error;
