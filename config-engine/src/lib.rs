//! Configuration management for the claims recovery platform
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. compiled defaults ([`Settings::default`])
//! 2. an optional YAML file (`claims.yaml` unless a path is given)
//! 3. `CLAIMS_`-prefixed environment variables, `__` separating sections
//!    (`CLAIMS_SERVER__PORT=9000`)
//! 4. `DATABASE_URL`, which always wins for `database.url`
//!
//! ```rust,no_run
//! use config_engine::ConfigEngine;
//!
//! let settings = ConfigEngine::new()
//!     .with_file("claims.yaml")
//!     .with_env()
//!     .load()?;
//! println!("listening on {}", settings.server.bind_address());
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod engine;
pub mod error;
pub mod settings;
pub mod validation;

pub use engine::*;
pub use error::*;
pub use settings::*;
