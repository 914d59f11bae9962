//! Test doubles shared by unit tests.

use crate::runner::{CommandRunner, ExecOutcome, Invocation};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

/// Handle onto the invocations seen by a [`RecordingRunner`].
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Invocation>>>);

impl CallLog {
    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.0.lock().unwrap().clone()
    }

    /// Each call rendered as its full command line.
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

/// Records invocations instead of spawning processes.
pub struct RecordingRunner {
    log: CallLog,
    failing_program: Option<String>,
}

impl RecordingRunner {
    /// A runner where every command succeeds.
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        let runner = Self {
            log: log.clone(),
            failing_program: None,
        };
        (runner, log)
    }

    /// Like [`Self::new`], but `program` exits with status 1.
    pub fn failing_on(program: &str) -> (Self, CallLog) {
        let (mut runner, log) = Self::new();
        runner.failing_program = Some(program.to_string());
        (runner, log)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> ExecOutcome {
        self.log.0.lock().unwrap().push(invocation.clone());
        if self.failing_program.as_deref() == Some(invocation.program.as_str()) {
            ExecOutcome::Exited(1)
        } else {
            ExecOutcome::Success
        }
    }
}

/// Global logger keeping every record together with the thread that emitted it.
struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records.lock().unwrap().push((
            thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

/// Run `f` and return its result with the warnings it logged.
///
/// Tests run on separate threads, so only records from the calling thread
/// are returned.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    // Another test may have installed the logger already.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Warn);

    let me = thread::current().id();
    let value = f();

    let mut records = LOGGER.records.lock().unwrap();
    let mut warnings = Vec::new();
    records.retain(|(thread, level, message)| {
        if *thread != me {
            return true;
        }
        if *level == Level::Warn {
            warnings.push(message.clone());
        }
        false
    });
    (value, warnings)
}
