// Error-level logging of controller error codes
//
// Installs its own logger, so this lives in a separate test binary and keeps
// every check in a single test function.
use log::{Level, LevelFilter, Log, Metadata, Record};
use solaris_decoder::{ErrorCodeTable, Language, NO_ERROR};
use std::sync::Mutex;

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl CaptureLogger {
    fn take(&self) -> Vec<(Level, String)> {
        std::mem::take(&mut *self.records.lock().unwrap())
    }

    fn take_errors(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[test]
fn error_codes_log_at_error_level() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut table = ErrorCodeTable::new(Language::En);

    // "No error" is a normal state
    assert_eq!(table.describe(NO_ERROR), "No error");
    assert!(LOGGER.take_errors().is_empty());

    assert_eq!(table.describe('X'), "Unknown error ('X')");
    let errors = LOGGER.take_errors();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("Unknown error code: X"), "{}", errors[0]);

    assert_eq!(table.describe('K'), "Collector Temperature Sensor");
    let errors = LOGGER.take_errors();
    assert_eq!(
        errors,
        vec!["Solaris Error: Code K; Description: Collector Temperature Sensor".to_string()]
    );

    // Same rules for a non-default language
    let mut table = ErrorCodeTable::new(Language::De);
    assert_eq!(table.describe(NO_ERROR), "Kein Fehler");
    assert!(LOGGER.take_errors().is_empty());
}
