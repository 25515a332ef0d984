use dial_host::{CursorPosition, Dial, DialError, DialSettings, Host, MemoryHost};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn session(text: &str, line: usize, col: usize) -> Dial<MemoryHost> {
    let mut host = MemoryHost::new(text);
    host.set_cursor(CursorPosition::new(line, col)).unwrap();
    Dial::new(host, DialSettings::default())
}

fn increment(dial: &mut Dial<MemoryHost>, count: i64) {
    dial.dispatch("selectAugendNormal", &[json!(count), json!("\"")]).unwrap();
    dial.dispatch("textobj", &[json!(0)]).unwrap();
    dial.dispatch("operatorNormal", &[json!("char"), json!("increment")]).unwrap();
}

fn dot_repeat(dial: &mut Dial<MemoryHost>, count: i64, direction: &str) {
    dial.dispatch("textobj", &[json!(count)]).unwrap();
    dial.dispatch("operatorNormal", &[json!("char"), json!(direction)]).unwrap();
}

#[test]
fn test_normal_increment_writes_line_and_cursor() {
    let mut dial = session("let a = 1;\nlet b = 41;", 2, 9);
    increment(&mut dial, 1);
    assert_eq!(dial.host().text(), "let a = 1;\nlet b = 42;");
    assert_eq!(dial.host().cursor().unwrap(), CursorPosition::new(2, 10));
}

#[test]
fn test_count_is_applied() {
    let mut dial = session("x = 5", 1, 1);
    increment(&mut dial, 10);
    assert_eq!(dial.host().text(), "x = 15");
    assert_eq!(dial.host().cursor().unwrap(), CursorPosition::new(1, 6));
}

#[test]
fn test_date_is_preferred_over_its_year() {
    let mut dial = session("released 2023-12-31", 1, 10);
    increment(&mut dial, 1);
    assert_eq!(dial.host().text(), "released 2024-12-31");
    assert_eq!(dial.host().cursor().unwrap(), CursorPosition::new(1, 13));
}

#[test]
fn test_dot_repeat_reuses_rule_and_count() {
    let mut dial = session("a 1\nb 10", 1, 3);
    increment(&mut dial, 2);
    assert_eq!(dial.host().line(1).unwrap(), "a 3");

    dial.host_mut().set_cursor(CursorPosition::new(2, 1)).unwrap();
    dot_repeat(&mut dial, 0, "increment");
    assert_eq!(dial.host().line(2).unwrap(), "b 12");

    // An explicit count on repeat replaces the stored one.
    dot_repeat(&mut dial, 5, "decrement");
    assert_eq!(dial.host().line(2).unwrap(), "b 7");
    assert_eq!(dial.handler().count(), 5);
}

#[test]
fn test_nothing_to_increment_leaves_buffer_alone() {
    let mut dial = session("no numbers here", 1, 4);
    increment(&mut dial, 1);
    assert_eq!(dial.host().text(), "no numbers here");
    assert_eq!(dial.host().cursor().unwrap(), CursorPosition::new(1, 4));
}

#[test]
fn test_multibyte_line_cursor() {
    let mut dial = session("値: 9", 1, 6);
    increment(&mut dial, 1);
    assert_eq!(dial.host().text(), "値: 10");
    assert_eq!(dial.host().cursor().unwrap(), CursorPosition::new(1, 7));
}

#[test]
fn test_argument_validation() {
    let mut dial = session("1", 1, 1);

    let err = dial.dispatch("selectAugendNormal", &[json!("1"), json!("\"")]);
    assert!(matches!(err, Err(DialError::Config(_))), "{err:?}");

    let err = dial.dispatch("operatorNormal", &[json!("char"), json!("up")]);
    assert!(matches!(err, Err(DialError::Config(_))), "{err:?}");

    let err = dial.dispatch("operatorVisual", &[json!("char"), json!("increment"), json!(1)]);
    assert!(matches!(err, Err(DialError::Config(_))), "{err:?}");

    let err = dial.dispatch("textobj", &[]);
    assert!(
        matches!(
            err,
            Err(DialError::Arity {
                method: "textobj",
                expected: 1,
                got: 0
            })
        ),
        "{err:?}"
    );

    let err = dial.dispatch("increment", &[] as &[Value]);
    assert!(matches!(err, Err(DialError::UnknownMethod(ref m)) if m == "increment"));
}

#[test]
fn test_host_errors_surface() {
    let mut host = MemoryHost::new("1");
    host.set_cursor(CursorPosition::new(1, 1)).unwrap();
    let mut dial = Dial::new(host, DialSettings::default());
    // No visual selection has been made.
    let err = dial
        .dispatch("selectAugendVisual", &[json!(1), json!("\"")])
        .unwrap_err();
    assert!(matches!(err, DialError::Host(_)), "{err}");
}
