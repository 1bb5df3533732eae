mod common;

use common::board;
use jesd204::{Jesd204DevData, Jesd204Error, Jesd204Registry, NoClocks};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

struct Capture {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            record.level(),
            String::from(record.target()),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

#[test]
fn null_output_clock_is_reported() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let registry = Jesd204Registry::new();
    let parent = board("spi0");
    let data = Jesd204DevData {
        name: "hmc7044",
        ops: None,
        output_clocks: vec![None],
    };
    let id = registry.register(&parent.create_ref(), &data).unwrap();
    assert_eq!(
        registry.init_links(id, &data, &NoClocks, &common::Inputs::default()),
        Err(Jesd204Error::InvalidArgument)
    );

    let records = LOGGER.records.lock().unwrap();
    assert!(records.iter().any(|(level, target, msg)| {
        *level == Level::Error && target == "jesd204" && msg == "hmc7044: null clock reference (0)"
    }));
}
