use std::fmt;

use log::{Level, Log, Metadata, Record};

/// Log target for aggregate write records.
pub const AUDIT_TARGET: &str = "commerce_store::audit";

/// Who is calling and where their audit records go. Passed into every write
/// instead of reaching for process-wide state.
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    caller: &'a str,
    logger: &'a dyn Log,
}

impl<'a> OperationContext<'a> {
    pub fn new(caller: &'a str, logger: &'a dyn Log) -> Self {
        Self { caller, logger }
    }

    /// Binds the logger installed by the binary (`env_logger`).
    pub fn with_global_logger(caller: &'a str) -> Self {
        Self::new(caller, log::logger())
    }

    pub fn caller(&self) -> &'a str {
        self.caller
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(AUDIT_TARGET).build();
        if !self.logger.enabled(&metadata) {
            return;
        }
        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .module_path_static(Some(module_path!()))
                .args(format_args!("caller={} {}", self.caller, args))
                .build(),
        );
    }
}

impl fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}
