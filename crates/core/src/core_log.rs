use std::sync::Mutex;

/// Logging seam between the core and whatever hosts it.
/// Every method defaults to dropping the message.
pub trait CoreLog: Send + Sync {
    fn info(&self, msg: &str) {
        let _ = msg;
    }
    fn warn(&self, msg: &str) {
        let _ = msg;
    }
    fn error(&self, msg: &str) {
        let _ = msg;
    }
    fn debug(&self, msg: &str) {
        let _ = msg;
    }
}

/// Drops everything.
pub struct NoopLog;
impl CoreLog for NoopLog {}

/// Keeps `LEVEL: message` lines in memory, handy for asserting on what the
/// loaders reported.
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn push(&self, level: &str, msg: &str) {
        if let Ok(mut l) = self.lines.lock() {
            l.push(format!("{level}: {msg}"));
        }
    }
}

impl CoreLog for MemoryLog {
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
}
