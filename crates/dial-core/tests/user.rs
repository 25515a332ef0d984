use dial_core::{
    AddResult, AliasTable, AugendEntry, AugendError, AugendKind, CallbackHost, DialContextHandler,
    Direction, RuleConfig, TextRange,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every call; `find` matches the whole line and `add` appends the addend.
#[derive(Default)]
struct RecordingHost {
    calls: RefCell<Vec<String>>,
    fail: bool,
}

impl CallbackHost for RecordingHost {
    fn call_find(
        &self,
        func: &str,
        line: &str,
        cursor: Option<usize>,
    ) -> Result<Option<TextRange>, AugendError> {
        self.calls
            .borrow_mut()
            .push(format!("find {func} {line:?} {cursor:?}"));
        if self.fail {
            return Err(AugendError::Callback {
                func: func.to_string(),
                message: "callback raised".to_string(),
            });
        }
        Ok((!line.is_empty()).then(|| TextRange::new(0, line.len())))
    }

    fn call_add(
        &self,
        func: &str,
        text: &str,
        addend: i64,
        cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        self.calls
            .borrow_mut()
            .push(format!("add {func} {text:?} {addend} {cursor:?}"));
        Ok(AddResult::replaced(format!("{text}{addend}")))
    }
}

fn user_entry() -> AugendEntry {
    AugendEntry::Rule(RuleConfig::new(
        AugendKind::User,
        json!({ "find": "find_fn", "add": "add_fn" }),
    ))
}

#[test]
fn test_user_rule_forwards_every_phase() {
    let host = Rc::new(RecordingHost::default());
    let callbacks: Rc<dyn CallbackHost> = host.clone();
    let augends = AliasTable::new()
        .build_all(&[user_entry()], Some(&callbacks))
        .unwrap();

    let mut handler = DialContextHandler::new();
    handler.select_augend("ab", Some(1), 2, augends).unwrap();
    handler.find_text_range("ab", 1).unwrap();
    let result = handler.operate("ab", 1, Direction::Decrement).unwrap();

    assert_eq!(result.line.as_deref(), Some("ab-2"));
    assert_eq!(result.cursor, Some(4));
    assert_eq!(
        *host.calls.borrow(),
        [
            r#"find find_fn "ab" Some(1)"#,
            r#"find find_fn "ab" Some(1)"#,
            r#"add add_fn "ab" -2 Some(1)"#,
        ]
    );
}

#[test]
fn test_callback_errors_propagate_from_selection() {
    let host: Rc<dyn CallbackHost> = Rc::new(RecordingHost {
        fail: true,
        ..RecordingHost::default()
    });
    let augends = AliasTable::new()
        .build_all(&[user_entry()], Some(&host))
        .unwrap();

    let mut handler = DialContextHandler::new();
    let err = handler.select_augend("ab", Some(1), 1, augends).unwrap_err();
    assert_eq!(err.to_string(), "callback 'find_fn' failed: callback raised");
}

#[test]
fn test_user_options_are_validated() {
    let host: Rc<dyn CallbackHost> = Rc::new(RecordingHost::default());
    let err = RuleConfig::new(AugendKind::User, json!({ "find": "f" }))
        .build(Some(&host))
        .unwrap_err();
    assert!(err.to_string().contains("user"), "{err}");
}
