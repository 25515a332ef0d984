#![warn(missing_docs)]
//! Dial Host - editor integration for `dial-core`
//!
//! `dial-host` connects the increment/decrement engine to an editor. The editor implements
//! [`Host`] (line access, caret, selections, buffer variables) and forwards its key mappings as
//! requests to a [`Dial`] session, either through typed methods or [`Dial::dispatch`] with JSON
//! arguments.
//!
//! - [`registers`]: which rule-set applies for a given register.
//! - [`settings`]: aliases and rule-sets, loadable from YAML.
//! - [`visual`]: how char-, line- and block-wise selections map onto single lines.
//! - [`memory`]: an in-memory host.
//!
//! # Example
//!
//! ```rust
//! use dial_host::{CursorPosition, Dial, DialSettings, Host, MemoryHost};
//! use serde_json::json;
//!
//! let mut host = MemoryHost::new("width: 99px");
//! host.set_cursor(CursorPosition::new(1, 8)).unwrap();
//!
//! let mut dial = Dial::new(host, DialSettings::default());
//! dial.dispatch("selectAugendNormal", &[json!(1), json!("\"")]).unwrap();
//! dial.dispatch("textobj", &[json!(0)]).unwrap();
//! dial.dispatch("operatorNormal", &[json!("char"), json!("increment")]).unwrap();
//!
//! assert_eq!(dial.host().text(), "width: 100px");
//! ```

pub mod dispatcher;
pub mod host;
pub mod memory;
pub mod registers;
pub mod settings;
pub mod visual;

pub use dispatcher::{Dial, DialError};
pub use host::{CursorPosition, Host, HostError, Region, VisualMode};
pub use memory::MemoryHost;
pub use registers::Register;
pub use settings::{DialSettings, SettingsError};
