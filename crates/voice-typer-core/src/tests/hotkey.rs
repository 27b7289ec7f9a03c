use crate::{CoreError, Hotkey};

/// WHAT: Editor-style combos normalize to the worker spelling
/// WHY: Settings written for other tools use cmd, super or control
#[test]
#[allow(clippy::unwrap_used)]
fn given_synonym_modifiers_when_parsing_then_normalized() {
    // Given: Combos spelled with modifier synonyms
    let cmd = Hotkey::parse("CommandOrControl+Shift+Space").unwrap();
    let sup = Hotkey::parse("super + control + space").unwrap();

    // When/Then: Both normalize to canonical names in canonical order
    assert_eq!(cmd.worker_combo(), "ctrl+shift+space");
    assert_eq!(sup.worker_combo(), "ctrl+win+space");
    assert_eq!(sup, Hotkey::parse("Ctrl+Win+Space").unwrap());
}

/// WHAT: Display and registration spellings differ only where needed
/// WHY: The OS backend calls the Windows key super
#[test]
#[allow(clippy::unwrap_used)]
fn given_win_combo_when_formatting_then_each_consumer_gets_its_spelling() {
    // Given: A combo using the Windows key
    let hotkey: Hotkey = "ctrl+win+space".parse().unwrap();

    // When/Then: Each representation is correct
    assert_eq!(hotkey.to_string(), "Ctrl+Win+Space");
    assert_eq!(hotkey.registration_string(), "ctrl+super+space");
    assert_eq!(hotkey.key(), "space");
    assert!(hotkey.modifiers().ctrl && hotkey.modifiers().win);
}

/// WHAT: Malformed combos are rejected with a reason
/// WHY: A bad setting must surface instead of silently registering nothing
#[test]
fn given_malformed_combos_when_parsing_then_invalid_hotkey() {
    // Given: Combos with structural problems
    let inputs = ["", "Ctrl+", "Ctrl+A+B", "Ctrl+Shift", "Space"];

    for input in inputs {
        // When: Parsing
        let result = Hotkey::parse(input);

        // Then: Each is rejected
        assert!(
            matches!(result, Err(CoreError::InvalidHotkey { .. })),
            "{input:?} should be rejected"
        );
    }
}

/// WHAT: Parse errors point at the code that asked for the parse
/// WHY: A location inside the parser says nothing about which setting was bad
#[test]
fn given_malformed_combo_when_parsing_then_error_located_at_caller() {
    // Given/When: A combo without a key, parsed from this file
    let result = Hotkey::parse("Ctrl+Shift");

    // Then: The recorded location is this test file, not the parser
    let rendered = match result {
        Err(e @ CoreError::InvalidHotkey { .. }) => format!("{:?}", e),
        other => format!("unexpected: {:?}", other),
    };
    assert!(rendered.contains("tests"), "{rendered}");
}
