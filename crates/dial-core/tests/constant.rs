use dial_core::{AddResult, Augend, ConstantAugend, ConstantOptions, TextRange};

fn constant(elements: &[&str], cyclic: bool, word: bool) -> ConstantAugend {
    ConstantAugend::new(ConstantOptions {
        elements: elements.iter().map(|e| e.to_string()).collect(),
        cyclic,
        word,
    })
    .unwrap()
}

#[test]
fn test_boolean_cycles_both_ways() {
    let mut augend = constant(&["true", "false"], true, true);
    assert_eq!(
        augend.add("true", 1, None).unwrap(),
        AddResult::replaced("false".to_string())
    );
    assert_eq!(
        augend.add("true", -1, None).unwrap(),
        AddResult::replaced("false".to_string())
    );
    assert_eq!(augend.add("false", 1, None).unwrap().text.as_deref(), Some("true"));
}

#[test]
fn test_word_boundaries_are_respected() {
    let augend = constant(&["true", "false"], true, true);
    assert_eq!(
        augend.find("untrue true", None).unwrap(),
        Some(TextRange::new(7, 11))
    );

    let loose = constant(&["true", "false"], true, false);
    assert_eq!(
        loose.find("untrue true", None).unwrap(),
        Some(TextRange::new(2, 6))
    );
}

#[test]
fn test_non_cyclic_list_saturates() {
    let mut augend = constant(&["low", "mid", "high"], false, true);
    assert_eq!(augend.add("mid", 5, None).unwrap().text.as_deref(), Some("high"));
    // Already at the end: nothing to replace, caret moves to the token end.
    assert_eq!(
        augend.add("high", 1, None).unwrap(),
        AddResult::cursor_only(4)
    );
    assert_eq!(augend.add("low", -1, None).unwrap(), AddResult::cursor_only(3));
}

#[test]
fn test_full_cycle_returns_to_start() {
    let elements = ["mon", "tue", "wed", "thu", "fri"];
    let mut augend = constant(&elements, true, true);
    for start in elements {
        let mut current = start.to_string();
        for _ in 0..elements.len() {
            current = augend.add(&current, 1, None).unwrap().text.unwrap();
        }
        assert_eq!(current, start);
        assert_eq!(
            augend.add(start, elements.len() as i64 * 3, None).unwrap(),
            AddResult::cursor_only(start.len())
        );
    }
}

#[test]
fn test_multibyte_elements() {
    let mut augend = constant(&["月", "火", "水"], true, false);
    let line = "今日は月曜";
    let range = augend.find(line, None).unwrap().unwrap();
    assert_eq!(range, TextRange::new(9, 12));
    let result = augend.add(&line[range.from..range.to], 1, None).unwrap();
    assert_eq!(result.text.as_deref(), Some("火"));
    assert_eq!(result.cursor, Some(3));
}

#[test]
fn test_single_element_list_is_rejected() {
    let err = ConstantAugend::new(ConstantOptions {
        elements: vec!["only".to_string()],
        cyclic: true,
        word: true,
    })
    .unwrap_err();
    assert!(err.to_string().contains("elements"), "{err}");
}

#[test]
fn test_unknown_text_is_an_invariant_violation() {
    let mut augend = constant(&["yes", "no"], true, true);
    assert!(augend.add("maybe", 1, None).is_err());
}

#[test]
fn test_word_next_to_cjk_text() {
    let augend = constant(&["true", "false"], true, true);
    assert_eq!(
        augend.find("値はtrueです", Some(1)).unwrap(),
        Some(TextRange::new(6, 10))
    );
    assert_eq!(augend.find("値はuntrue", None).unwrap(), None);
}
