use koyuki::core::config::{APPS_KEY_BASE, NAMES_KEY_BASE, SCHEMES_KEY_BASE, SchemeConfig};
use koyuki::core::error::KoyukiError;
use koyuki::core::hive::{KeyStore, MemoryHive};
use koyuki::core::paths::KeyPath;
use koyuki::core::pipeline::{self, Step};
use koyuki::core::propagate::{Namespace, association_key, propagate};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PAIRS: [(&str, &str); 3] = [
    ("Mail", "NewMail"),
    ("Mail", "MailSent"),
    ("Explorer", "Navigating"),
];

fn seeded_hive() -> MemoryHive {
    let mut hive = MemoryHive::new();
    hive.insert_key(&KeyPath::new(SCHEMES_KEY_BASE)).default = Some(".Default".into());
    for (app, event) in PAIRS {
        hive.insert_key(&KeyPath::new(APPS_KEY_BASE).child(app).child(event));
        hive.insert_key(&association_key(app, event, ".Default")).default =
            Some(format!("{}-{}.wav", app, event));
    }
    hive
}

fn profile_with_documents(root: &Path) {
    fs::create_dir_all(root.join("Documents")).expect("create Documents");
}

/// Enumerates children in reverse store order.
struct ReversedHive(MemoryHive);

impl KeyStore for ReversedHive {
    type Key = KeyPath;

    fn open_key(&self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        self.0.open_key(path)
    }

    fn create_key(&mut self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        self.0.create_key(path)
    }

    fn child_key_names(&self, key: &KeyPath) -> Result<Vec<String>, KoyukiError> {
        let mut names = self.0.child_key_names(key)?;
        names.reverse();
        Ok(names)
    }

    fn set_default_value(&mut self, key: &KeyPath, value: &str) -> Result<(), KoyukiError> {
        self.0.set_default_value(key, value)
    }
}

/// Fails on a chosen key and records every successful value write.
struct FaultyHive {
    inner: MemoryHive,
    fail_enumerate: Option<KeyPath>,
    fail_create: Option<KeyPath>,
    fail_set: Option<KeyPath>,
    writes: Vec<KeyPath>,
}

impl FaultyHive {
    fn new(inner: MemoryHive) -> Self {
        Self {
            inner,
            fail_enumerate: None,
            fail_create: None,
            fail_set: None,
            writes: Vec::new(),
        }
    }

    fn denied() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access is denied")
    }

    fn wrote_under_apps(&self) -> bool {
        self.writes
            .iter()
            .any(|key| key.as_str().starts_with(APPS_KEY_BASE))
    }
}

fn has_override_keys(hive: &MemoryHive) -> bool {
    PAIRS.iter().any(|(app, event)| {
        hive.contains_key(&association_key(app, event, "NIHAH0"))
            || hive.contains_key(&association_key(app, event, ".Current"))
    })
}

impl KeyStore for FaultyHive {
    type Key = KeyPath;

    fn open_key(&self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        self.inner.open_key(path)
    }

    fn create_key(&mut self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        if self.fail_create.as_ref() == Some(path) {
            return Err(KoyukiError::KeyCreate {
                path: path.to_string(),
                source: Self::denied(),
            });
        }
        self.inner.create_key(path)
    }

    fn child_key_names(&self, key: &KeyPath) -> Result<Vec<String>, KoyukiError> {
        if self.fail_enumerate.as_ref() == Some(key) {
            return Err(KoyukiError::Enumerate {
                path: key.to_string(),
                source: Self::denied(),
            });
        }
        self.inner.child_key_names(key)
    }

    fn set_default_value(&mut self, key: &KeyPath, value: &str) -> Result<(), KoyukiError> {
        if self.fail_set.as_ref() == Some(key) {
            return Err(KoyukiError::SetValue {
                path: key.to_string(),
                source: Self::denied(),
            });
        }
        self.inner.set_default_value(key, value)?;
        self.writes.push(key.clone());
        Ok(())
    }
}

#[test]
fn example_scenario_installs_scheme_and_overrides_every_event() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let config = SchemeConfig::default();
    let mut hive = seeded_hive();

    let report = pipeline::install(&mut hive, &config, tmp.path()).expect("install");

    let asset = tmp.path().join("Documents").join("koyuki.wav");
    assert_eq!(report.asset_path, asset);
    assert!(asset.exists());
    let asset_value = asset.to_string_lossy().to_string();

    for (app, event) in PAIRS {
        for namespace in ["NIHAH0", ".Current"] {
            assert_eq!(
                hive.default_value(&association_key(app, event, namespace)),
                Some(asset_value.as_str()),
                "{}\\{}\\{}",
                app,
                event,
                namespace
            );
        }
    }
    assert_eq!(hive.default_value(&KeyPath::new(SCHEMES_KEY_BASE)), Some("NIHAH0"));
    assert_eq!(
        hive.default_value(&KeyPath::new(NAMES_KEY_BASE).child("NIHAH0")),
        Some("NIHAHAHAHA")
    );
    assert_eq!(report.scheme.associations, 3);
    assert_eq!(report.current.associations, 3);
    assert_eq!(report.current.apps, 2);
}

#[test]
fn install_twice_matches_install_once() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let config = SchemeConfig::default();

    let mut once = seeded_hive();
    pipeline::install(&mut once, &config, tmp.path()).expect("first install");

    let mut twice = once.clone();
    pipeline::install(&mut twice, &config, tmp.path()).expect("second install");

    assert_eq!(once, twice);
}

#[test]
fn rerun_picks_up_events_registered_since_last_run() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let config = SchemeConfig::default();
    let mut hive = seeded_hive();
    pipeline::install(&mut hive, &config, tmp.path()).expect("first install");

    hive.insert_key(&KeyPath::new(APPS_KEY_BASE).child("Calendar").child("Reminder"));
    let report = pipeline::install(&mut hive, &config, tmp.path()).expect("second install");

    assert_eq!(report.current.associations, 4);
    assert!(hive.contains_key(&association_key("Calendar", "Reminder", ".Current")));
}

#[test]
fn propagation_result_does_not_depend_on_enumeration_order() {
    let config = SchemeConfig::default();

    let mut forward = seeded_hive();
    propagate(&mut forward, &config, &Namespace::Current, "koyuki.wav").expect("forward");

    let mut reversed = ReversedHive(seeded_hive());
    propagate(&mut reversed, &config, &Namespace::Current, "koyuki.wav").expect("reversed");

    assert_eq!(forward, reversed.0);
}

#[test]
fn propagation_touches_only_its_own_namespace() {
    let config = SchemeConfig::default();
    let before = seeded_hive();
    let mut hive = before.clone();

    propagate(&mut hive, &config, &Namespace::Scheme("NIHAH0".into()), "koyuki.wav")
        .expect("propagate");

    for path in before.key_paths() {
        assert_eq!(
            hive.node(&path).and_then(|n| n.default.clone()),
            before.node(&path).and_then(|n| n.default.clone()),
            "{} changed",
            path
        );
    }
    for path in hive.key_paths() {
        if before.contains_key(&path) {
            continue;
        }
        assert_eq!(path.segments().last(), Some("NIHAH0"), "unexpected key {}", path);
        assert!(!path.as_str().contains(".Current"));
    }
}

#[test]
fn enumeration_failure_stops_the_pass() {
    let config = SchemeConfig::default();
    let mut hive = FaultyHive::new(seeded_hive());
    // Apps enumerate alphabetically: Explorer, then Mail.
    hive.fail_enumerate = Some(KeyPath::new(APPS_KEY_BASE).child("Mail"));

    let err = propagate(&mut hive, &config, &Namespace::Current, "koyuki.wav").unwrap_err();

    assert!(matches!(err, KoyukiError::Enumerate { .. }));
    assert_eq!(
        hive.writes,
        vec![association_key("Explorer", "Navigating", ".Current")]
    );
    assert!(!hive.inner.contains_key(&association_key("Mail", "NewMail", ".Current")));
}

#[test]
fn create_failure_keeps_earlier_writes_and_skips_later_ones() {
    let config = SchemeConfig::default();
    let mut hive = FaultyHive::new(seeded_hive());
    // Mail events enumerate as MailSent, NewMail.
    hive.fail_create = Some(association_key("Mail", "MailSent", ".Current"));

    let err = propagate(&mut hive, &config, &Namespace::Current, "koyuki.wav").unwrap_err();

    assert!(matches!(err, KoyukiError::KeyCreate { .. }));
    assert_eq!(
        hive.writes,
        vec![association_key("Explorer", "Navigating", ".Current")]
    );
    assert!(!hive.inner.contains_key(&association_key("Mail", "NewMail", ".Current")));
}

#[test]
fn value_write_failure_keeps_earlier_writes_and_skips_later_ones() {
    let config = SchemeConfig::default();
    let mut hive = FaultyHive::new(seeded_hive());
    hive.fail_set = Some(association_key("Mail", "MailSent", ".Current"));

    let err = propagate(&mut hive, &config, &Namespace::Current, "koyuki.wav").unwrap_err();

    assert!(matches!(err, KoyukiError::SetValue { .. }));
    assert_eq!(
        hive.writes,
        vec![association_key("Explorer", "Navigating", ".Current")]
    );
    // The failing key was created but never received a value.
    assert_eq!(
        hive.inner
            .default_value(&association_key("Mail", "MailSent", ".Current")),
        None
    );
    assert!(!hive.inner.contains_key(&association_key("Mail", "NewMail", ".Current")));
}

#[test]
fn registration_failure_is_attributed_and_stops_before_apps() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let mut hive = FaultyHive::new(seeded_hive());
    hive.fail_create = Some(KeyPath::new(NAMES_KEY_BASE).child("NIHAH0"));

    let err = pipeline::install(&mut hive, &SchemeConfig::default(), tmp.path()).unwrap_err();

    assert_eq!(err.step(), Some(Step::RegisterScheme));
    match &err {
        KoyukiError::Step { source, .. } => {
            assert!(matches!(**source, KoyukiError::KeyCreate { .. }))
        }
        other => panic!("expected step error, got {:?}", other),
    }
    assert!(hive.writes.is_empty());
    assert!(!has_override_keys(&hive.inner));
    assert_eq!(
        hive.inner.default_value(&KeyPath::new(SCHEMES_KEY_BASE)),
        Some(".Default")
    );
}

#[test]
fn default_scheme_failure_is_attributed_and_stops_before_apps() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let mut hive = FaultyHive::new(seeded_hive());
    hive.fail_set = Some(KeyPath::new(SCHEMES_KEY_BASE));

    let err = pipeline::install(&mut hive, &SchemeConfig::default(), tmp.path()).unwrap_err();

    assert_eq!(err.step(), Some(Step::SetDefaultScheme));
    // Registration already ran and stays in place.
    assert_eq!(hive.writes, vec![KeyPath::new(NAMES_KEY_BASE).child("NIHAH0")]);
    assert!(!hive.wrote_under_apps());
    assert!(!has_override_keys(&hive.inner));
    assert_eq!(
        hive.inner.default_value(&KeyPath::new(SCHEMES_KEY_BASE)),
        Some(".Default")
    );
}

#[test]
fn pipeline_failure_is_attributed_to_its_step() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let config = SchemeConfig::default();
    let mut hive = FaultyHive::new(seeded_hive());
    hive.fail_create = Some(association_key("Explorer", "Navigating", ".Current"));

    let err = pipeline::install(&mut hive, &config, tmp.path()).unwrap_err();

    assert_eq!(err.step(), Some(Step::PropagateCurrent));
    // The scheme pass and earlier steps stay in place.
    assert_eq!(
        hive.inner.default_value(&KeyPath::new(SCHEMES_KEY_BASE)),
        Some("NIHAH0")
    );
    assert!(hive.inner.contains_key(&association_key("Mail", "NewMail", "NIHAH0")));
    assert!(tmp.path().join("Documents").join("koyuki.wav").exists());
}

#[test]
fn missing_apps_catalog_aborts_first_propagation_pass() {
    let tmp = tempdir().expect("tempdir");
    profile_with_documents(tmp.path());
    let mut hive = MemoryHive::new();

    let err = pipeline::install(&mut hive, &SchemeConfig::default(), tmp.path()).unwrap_err();

    assert_eq!(err.step(), Some(Step::PropagateScheme));
    // Registration creates Schemes as a parent, so selection succeeds.
    assert_eq!(hive.default_value(&KeyPath::new(SCHEMES_KEY_BASE)), Some("NIHAH0"));
    assert!(!hive.contains_key(&KeyPath::new(APPS_KEY_BASE)));
}

#[test]
fn asset_write_failure_aborts_before_touching_the_store() {
    let tmp = tempdir().expect("tempdir");
    let mut hive = seeded_hive();
    let before = hive.clone();

    let err = pipeline::install(&mut hive, &SchemeConfig::default(), tmp.path()).unwrap_err();

    assert_eq!(err.step(), Some(Step::InstallAsset));
    assert_eq!(hive, before);
}
