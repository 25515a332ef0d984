use dial_core::{AugendEntry, AugendKind, ConfigError};
use dial_host::{CursorPosition, Dial, DialSettings, Host, MemoryHost, SettingsError};
use pretty_assertions::assert_eq;
use serde_json::json;

const SETTINGS: &str = r#"
aliases:
  hex:
    kind: number
    opts: { radix: 16, prefix: "0x" }
  bool:
    kind: constant
    opts:
      elements: ["true", "false"]
  decimal:
    kind: number
    opts: { natural: false }
augends: [decimal, hex, bool]
registers:
  t:
    - kind: date
      opts: { format: "HH:mm" }
"#;

#[test]
fn test_load_yaml_settings() {
    let settings = DialSettings::from_yaml(SETTINGS).unwrap();
    assert_eq!(
        settings.augends,
        vec![
            AugendEntry::from("decimal"),
            AugendEntry::from("hex"),
            AugendEntry::from("bool"),
        ]
    );
    // Registers not mentioned in the file are not kept.
    assert!(settings.register_entries('n').is_none());

    let table = settings.alias_table();
    assert_eq!(table.get("hex").unwrap().kind, AugendKind::Number);
    assert_eq!(table.get("decimal").unwrap().opts, json!({ "natural": false }));
    assert_eq!(table.get("date").unwrap().opts, json!({ "format": "yyyy-MM-dd" }));
}

fn press(dial: &mut Dial<MemoryHost>, register: &str, direction: &str) {
    dial.dispatch("selectAugendNormal", &[json!(1), json!(register)]).unwrap();
    dial.dispatch("textobj", &[json!(0)]).unwrap();
    dial.dispatch("operatorNormal", &[json!("char"), json!(direction)]).unwrap();
}

#[test]
fn test_yaml_settings_drive_a_session() {
    let settings = DialSettings::from_yaml(SETTINGS).unwrap();
    let mut host = MemoryHost::new("flag = true; n = 0; at 09:59");
    host.set_cursor(CursorPosition::new(1, 1)).unwrap();
    let mut dial = Dial::new(host, settings);

    press(&mut dial, "\"", "increment");
    assert_eq!(dial.host().text(), "flag = false; n = 0; at 09:59");

    // The redefined decimal alias allows negative numbers.
    dial.host_mut().set_cursor(CursorPosition::new(1, 15)).unwrap();
    press(&mut dial, "\"", "decrement");
    assert_eq!(dial.host().text(), "flag = false; n = -1; at 09:59");

    // Caret on the minutes.
    dial.host_mut().set_cursor(CursorPosition::new(1, 29)).unwrap();
    press(&mut dial, "t", "increment");
    assert_eq!(dial.host().text(), "flag = false; n = -1; at 10:00");
}

#[test]
fn test_missing_sections_use_defaults() {
    let settings = DialSettings::from_yaml("aliases: {}").unwrap();
    assert_eq!(settings, DialSettings::default());

    let settings = DialSettings::from_json(r#"{"augends": ["date"]}"#).unwrap();
    assert_eq!(settings.augends, vec![AugendEntry::from("date")]);
    assert!(settings.register_entries('d').is_some());
}

#[test]
fn test_invalid_settings_are_rejected() {
    let err = DialSettings::from_yaml("augend: [decimal]").unwrap_err();
    assert!(matches!(err, SettingsError::Yaml(_)), "{err}");

    let err = DialSettings::from_yaml("registers: { ab: [decimal] }").unwrap_err();
    assert!(matches!(err, SettingsError::InvalidRegister(ref r) if r == "ab"));

    let err = DialSettings::from_yaml("augends: [decimal, roman]").unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UndefinedAlias(ref name)) if name == "roman"
    ));

    let err = DialSettings::from_json(r#"{"augends": [{"kind": "abacus"}]}"#).unwrap_err();
    assert!(matches!(err, SettingsError::Json(_)), "{err}");
}

#[test]
fn test_settings_survive_a_yaml_round_trip() {
    let settings = DialSettings::from_yaml(SETTINGS).unwrap();
    let yaml = settings.to_yaml().unwrap();
    assert_eq!(DialSettings::from_yaml(&yaml).unwrap(), settings);
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("dial-settings-{}.yaml", std::process::id()));
    std::fs::write(&path, SETTINGS).unwrap();
    let loaded = DialSettings::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.unwrap(), DialSettings::from_yaml(SETTINGS).unwrap());

    let err = DialSettings::load(std::env::temp_dir().join("dial-settings-missing.yaml"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}
