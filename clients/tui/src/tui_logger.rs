use log::{Level, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

/// Routes `log` records into a shared buffer the TUI drains into its log
/// pane on every tick. Stdout belongs to the terminal UI, so this is the
/// only place log output can go.
pub struct TuiLogger {
    log_buffer: Arc<Mutex<Vec<String>>>,
}

impl TuiLogger {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let log_buffer = Arc::new(Mutex::new(Vec::new()));
        (
            TuiLogger {
                log_buffer: log_buffer.clone(),
            },
            log_buffer,
        )
    }
}

impl Log for TuiLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Prefix warnings and errors so they stand out in the pane
        let msg = if record.level() <= Level::Warn {
            format!(
                "{}: {}",
                record.level().as_str().to_lowercase(),
                record.args()
            )
        } else {
            format!("{}", record.args())
        };
        if let Ok(mut buffer) = self.log_buffer.lock() {
            buffer.push(msg);
            // Keep only last 100 messages to prevent memory issues
            if buffer.len() > 100 {
                buffer.remove(0);
            }
        }
    }

    fn flush(&self) {}
}
