//! Settings persistence codec.
//!
//! Converts between the nested, typed configuration object consumed by the
//! admin settings UI and the flat `{key, value, type}` rows the settings
//! table stores. The codec never raises on malformed stored data;
//! individual fields degrade to safe defaults so one corrupted row cannot
//! fail the entire settings read.

pub mod codec;

pub use codec::{SettingKey, SettingRow, SettingType, flatten, unflatten};
