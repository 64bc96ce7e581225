//! Environment bootstrap
//!
//! | Variable    | Effect                                     |
//! |-------------|--------------------------------------------|
//! | `APP_NAME`  | default field `app`                        |
//! | `APP_ENV`   | default field `env`                        |
//! | `LOG_FILE`  | additional plain file sink (append mode)   |
//! | `LOG_LEVEL` | minimum level, ignored if it does not parse |

use crate::core::{LogLevel, LoggerBuilder, Result, Sink};

pub const APP_NAME: &str = "APP_NAME";
pub const APP_ENV: &str = "APP_ENV";
pub const LOG_FILE: &str = "LOG_FILE";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

impl LoggerBuilder {
    /// Builder seeded from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Builder seeded from an arbitrary variable lookup
    ///
    /// ```
    /// use bayaan::{FieldValue, LoggerBuilder};
    ///
    /// let builder = LoggerBuilder::from_env_with(|key| match key {
    ///     "APP_NAME" => Some("billing".to_string()),
    ///     _ => None,
    /// }).unwrap();
    /// let logger = builder.build().unwrap();
    /// assert_eq!(logger.default_fields().get("app"), Some(&FieldValue::from("billing")));
    /// # logger.close().unwrap();
    /// ```
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = LoggerBuilder::new();

        if let Some(name) = non_empty(APP_NAME) {
            builder = builder.field("app", name);
        }
        if let Some(env) = non_empty(APP_ENV) {
            builder = builder.field("env", env);
        }
        if let Some(level) = non_empty(LOG_LEVEL) {
            match level.parse::<LogLevel>() {
                Ok(level) => builder = builder.level(level),
                Err(e) => eprintln!("[bayaan WARNING] Ignoring {}: {}", LOG_LEVEL, e),
            }
        }
        if let Some(path) = non_empty(LOG_FILE) {
            builder = builder.sink(Sink::file(path, false)?);
        }

        Ok(builder)
    }
}
