//! Serial port access for the ESP32 hub
//!
//! This module provides functionality for:
//! - Listing available serial ports
//! - Prompting the operator for a port
//! - Opening a port as a line channel for the dump session

pub mod port;
pub mod select;

pub use port::{PortConfig, PortInfo};
pub use select::choose_port;
