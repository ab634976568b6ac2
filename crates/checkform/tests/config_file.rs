//! Loading engine configuration from disk.

use std::io::Write;

use checkform::prelude::*;

#[test]
fn test_load_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_variant = "tcp"
error_path_separator = "|"

[limits]
max_multihttp_entries = 3
"#
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.default_variant, CheckType::Tcp);
    assert_eq!(config.error_path_separator, "|");
    assert_eq!(config.limits.max_multihttp_entries, 3);

    let editor = CheckEditor::create(None, config).unwrap();
    assert_eq!(editor.check_type(), CheckType::Tcp);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkform.toml");

    let config = EngineConfig {
        default_variant: CheckType::Browser,
        wildcard_lists: WildcardRules::default().with_list("labels"),
        ..EngineConfig::default()
    };
    config.save(&path).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigIo { .. }));
}

#[test]
fn test_multihttp_limit_from_config() {
    let config = EngineConfig::from_toml_str("[limits]\nmax_multihttp_entries = 1").unwrap();
    let mut editor = CheckEditor::create(Some("multihttp"), config).unwrap();
    editor.update(|check| {
        if let CheckSettings::MultiHttp(multihttp) = &mut check.settings {
            let first = multihttp.entries[0].clone();
            multihttp.entries.push(first);
        }
    });
    editor.process_pending_tick();
    assert!(editor.errors().contains(&"settings.multihttp.entries".to_string()));

    let check_fields = editor.get_section_fields(SectionId::Check).to_vec();
    assert!(!editor.errors_for(&check_fields).is_empty());
}
