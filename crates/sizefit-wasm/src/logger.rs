//! Routes `log` records from sizefit-core to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            write_console(record.level(), &format_record(record));
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Returns false if a logger was already set.
pub fn install(level: LevelFilter) -> bool {
    let installed = log::set_logger(&LOGGER).is_ok();
    if installed {
        log::set_max_level(level);
    }
    installed
}

fn format_record(record: &Record<'_>) -> String {
    format!("[{}] {}", record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug => web_sys::console::debug_1(&line),
        Level::Trace => web_sys::console::log_1(&line),
    }
}

// Native builds (unit tests) have no console to write to.
#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, _line: &str) {}
