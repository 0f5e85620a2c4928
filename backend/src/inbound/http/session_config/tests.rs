//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key.path().display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_explicit_settings(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, "no".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .expect("valid release settings");
    assert!(!settings.cookie_secure);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(release_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&release_key);
    vars.remove(missing);
    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name }) if name == missing
    ));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_malformed_toggle(release_key: NamedTempFile, #[case] value: &str) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        })
    ));
}

#[rstest]
fn release_rejects_short_key() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let result = session_settings_from_env(&mock_env(release_vars(&short)), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_refuses_ephemeral_keys(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());
    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_reports_unreadable_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vars = HashMap::from([
        (KEY_FILE_ENV, dir.path().join("absent").display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn debug_defaults_to_secure_cookie_and_temporary_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let vars = HashMap::from([(KEY_FILE_ENV, dir.path().join("absent").display().to_string())]);
    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");
    assert!(settings.cookie_secure);
}

#[rstest]
fn debug_tolerates_malformed_toggle() {
    let short = key_file(8);
    let mut vars = release_vars(&short);
    vars.insert(COOKIE_SECURE_ENV, "kadang".to_owned());
    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");
    assert!(settings.cookie_secure);
}

#[rstest]
#[case(0)]
#[case(8)]
#[case(KEY_DERIVE_MIN_LEN - 1)]
fn debug_short_key_falls_back_to_temporary_key(#[case] len: usize) {
    let short = key_file(len);
    let settings = session_settings_from_env(&mock_env(release_vars(&short)), BuildMode::Debug)
        .expect("debug settings");
    assert!(settings.cookie_secure);
}

#[rstest]
fn debug_derives_key_from_file_long_enough() {
    let file = key_file(KEY_DERIVE_MIN_LEN);
    let first = session_settings_from_env(&mock_env(release_vars(&file)), BuildMode::Debug)
        .expect("debug settings");
    let second = session_settings_from_env(&mock_env(release_vars(&file)), BuildMode::Debug)
        .expect("debug settings");
    assert_eq!(first.key.master(), second.key.master());
}
