//! Logging collaborator injected into [`RpcClient`](crate::rpc::RpcClient).

use std::fmt;
use std::str::FromStr;

/// Four independent severity channels. Implementations decide what reaches
/// the outside world; the client never writes output on its own.
pub trait RpcLogger: Send + Sync + fmt::Debug {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Suppress every channel.
    None,
    /// info, warn and error; debug is dropped.
    #[default]
    Normal,
    Debug,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "silent" => Ok(LogLevel::None),
            "normal" => Ok(LogLevel::Normal),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!(
                "unknown log level `{other}`; expected none, normal or debug"
            )),
        }
    }
}

/// Forwards each channel to the `tracing` macro of the same severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger {
    level: LogLevel,
}

impl TracingLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn silent() -> Self {
        Self::new(LogLevel::None)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }
}

impl RpcLogger for TracingLogger {
    fn info(&self, message: &str) {
        if self.level != LogLevel::None {
            tracing::info!(target: "qtum_rpc", "{message}");
        }
    }

    fn warn(&self, message: &str) {
        if self.level != LogLevel::None {
            tracing::warn!(target: "qtum_rpc", "{message}");
        }
    }

    fn error(&self, message: &str) {
        if self.level != LogLevel::None {
            tracing::error!(target: "qtum_rpc", "{message}");
        }
    }

    fn debug(&self, message: &str) {
        if self.level == LogLevel::Debug {
            tracing::debug!(target: "qtum_rpc", "{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;

    /// Keeps the level of every event that reaches the subscriber.
    #[derive(Clone, Default)]
    struct CapturedLevels(Arc<Mutex<Vec<Level>>>);

    impl<S: tracing::Subscriber> Layer<S> for CapturedLevels {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().expect("capture lock").push(*event.metadata().level());
        }
    }

    fn emitted_levels(level: LogLevel) -> Vec<Level> {
        let captured = CapturedLevels::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        tracing::subscriber::with_default(subscriber, || {
            let logger = TracingLogger::new(level);
            logger.info("info line");
            logger.warn("warn line");
            logger.error("error line");
            logger.debug("debug line");
        });
        let levels = captured.0.lock().expect("capture lock").clone();
        levels
    }

    #[test]
    fn silent_logger_emits_nothing() {
        assert!(emitted_levels(LogLevel::None).is_empty());
    }

    #[test]
    fn normal_logger_drops_debug() {
        assert_eq!(
            emitted_levels(LogLevel::Normal),
            vec![Level::INFO, Level::WARN, Level::ERROR]
        );
    }

    #[test]
    fn debug_logger_emits_every_channel() {
        assert_eq!(
            emitted_levels(LogLevel::Debug),
            vec![Level::INFO, Level::WARN, Level::ERROR, Level::DEBUG]
        );
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("none".parse::<LogLevel>(), Ok(LogLevel::None));
        assert_eq!("Silent".parse::<LogLevel>(), Ok(LogLevel::None));
        assert_eq!("NORMAL".parse::<LogLevel>(), Ok(LogLevel::Normal));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn default_logger_is_normal() {
        assert_eq!(TracingLogger::default().level(), LogLevel::Normal);
        assert_eq!(TracingLogger::silent().level(), LogLevel::None);
    }
}
