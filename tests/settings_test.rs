use std::{path::PathBuf, sync::Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};
use popcorn::settings::{CockpitSource, Settings, ASSET_DIR_VAR, COCKPIT_VAR};

struct Captured(Mutex<Vec<(Level, String)>>);

impl Log for Captured {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: Captured = Captured(Mutex::new(Vec::new()));

fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn should_apply_overrides() {
    let settings = Settings::from_vars(vars(&[
        (ASSET_DIR_VAR, "/srv/popcorn"),
        (COCKPIT_VAR, "ships/x.stl"),
    ]));

    assert_eq!(settings.asset_dir, PathBuf::from("/srv/popcorn"));
    assert_eq!(settings.cockpit, CockpitSource::FacetText("ships/x.stl".into()));
}

#[test]
fn should_warn_and_keep_the_default_for_an_unknown_cockpit() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let settings = Settings::from_vars(vars(&[(ASSET_DIR_VAR, "."), (COCKPIT_VAR, "cockpit.obj")]));

    assert_eq!(settings.cockpit, CockpitSource::default());
    let logged = LOGGER.0.lock().unwrap();
    assert!(logged
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains("cockpit.obj")));
}
