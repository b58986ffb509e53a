use std::sync::Arc;

use crate::core::{EmitterConfig, emitter::Emitter};
use crate::diagnostics::{Diagnostics, LogWriter};

/// Builder for constructing an [`Emitter`] with optional collaborators.
pub struct EmitterBuilder {
    cfg: EmitterConfig,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl EmitterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: EmitterConfig) -> Self {
        Self {
            cfg,
            diagnostics: None,
        }
    }

    /// Sets the diagnostics sink.
    ///
    /// Receives leak warnings and failures of detached deferred handlers.
    /// Defaults to [`LogWriter`] (`tracing`).
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Enables or disables wildcard matching.
    pub fn wildcard(mut self, enabled: bool) -> Self {
        self.cfg.wildcard = enabled;
        self
    }

    /// Sets the leak-warning threshold (`0` disables it).
    pub fn max_listeners(mut self, max: usize) -> Self {
        self.cfg.max_listeners = max;
        self
    }

    /// Builds and returns the emitter.
    ///
    /// This consumes the builder and initializes:
    /// - Registry or pattern tree (per `wildcard`)
    /// - Internal notification channel
    /// - Diagnostics sink
    pub fn build<A, R>(self) -> Emitter<A, R> {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(LogWriter::new()));
        Emitter::with_parts(self.cfg, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_config() {
        let emitter: Emitter<u32> = EmitterBuilder::new(EmitterConfig::default())
            .wildcard(true)
            .max_listeners(3)
            .build();

        assert!(emitter.config().wildcard);
        assert_eq!(emitter.max_listeners(), 3);
        assert!(format!("{emitter:?}").contains("LogWriter"));
    }
}
