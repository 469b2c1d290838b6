//! Shared types for the ISORA platform core: the IOC shape, the closed
//! framework/phase enums, subscription plans, process configuration, and
//! the top-level error taxonomy every subsystem converts into.

pub mod config;
pub mod error;
pub mod framework;
pub mod ioc;
pub mod plan;

pub use config::Settings;
pub use error::{error_code, http_status, CoreError, ErrorCode};
pub use framework::{Framework, Phase};
pub use ioc::{Ioc, IocStatus, IocType, ThreatLevel};
pub use plan::Plan;
