use crate::protocol::{LineFramer, RecordingMode, WorkerCommand, WorkerEvent};

/// WHAT: A line split across reads is emitted once, after its terminator
/// WHY: Pipes deliver arbitrary chunks; half a transcript must never be typed
#[test]
fn given_fragmented_stream_when_feeding_then_lines_emitted_whole() {
    // Given: A fresh framer
    let mut framer = LineFramer::new();

    // When: A line arrives in three pieces
    let first = framer.feed(b"hello ");
    let second = framer.feed(b"wor");
    let third = framer.feed(b"ld\nnext");

    // Then: Only the completed line is emitted and the tail is kept
    assert!(first.is_empty());
    assert!(second.is_empty());
    assert_eq!(third, vec!["hello world".to_string()]);
    assert_eq!(framer.buffered_len(), "next".len());
}

/// WHAT: Several lines in one read come out in order, blanks dropped
/// WHY: The worker may flush partials and a final together
#[test]
fn given_batched_lines_when_feeding_then_trimmed_in_order() {
    // Given: A fresh framer
    let mut framer = LineFramer::new();

    // When: One read carries multiple lines, CRLF endings and blank lines
    let lines = framer.feed(b"PARTIAL: a\r\n\n  \nfinal text  \r\n");

    // Then: Lines are trimmed, blanks suppressed, order preserved
    assert_eq!(lines, vec!["PARTIAL: a".to_string(), "final text".to_string()]);
    assert_eq!(framer.buffered_len(), 0);
}

/// WHAT: Reset discards a buffered fragment
/// WHY: A respawned worker must not inherit the old process's half line
#[test]
fn given_buffered_fragment_when_reset_then_next_line_clean() {
    // Given: A framer holding a fragment
    let mut framer = LineFramer::new();
    framer.feed(b"stale fragm");

    // When: The framer is reset and fed a fresh line
    framer.reset();
    let lines = framer.feed(b"fresh\n");

    // Then: Only the fresh line is emitted
    assert_eq!(lines, vec!["fresh".to_string()]);
}

/// WHAT: Invalid UTF-8 is replaced rather than dropped
/// WHY: A bad byte from the worker must not lose the whole transcript
#[test]
fn given_invalid_utf8_when_feeding_then_lossy_line() {
    // Given: A fresh framer
    let mut framer = LineFramer::new();

    // When: A line contains an invalid byte
    let lines = framer.feed(b"caf\xff\n");

    // Then: The line survives with a replacement character
    assert_eq!(lines, vec!["caf\u{fffd}".to_string()]);
}

/// WHAT: Reserved prefixes map to partial and release events
/// WHY: Everything else is final text, so prefixes must be exact
#[test]
fn given_prefixed_lines_when_parsing_then_events_classified() {
    // Given/When/Then: Each prefix parses to its event
    assert_eq!(
        WorkerEvent::parse("PARTIAL:  hello there "),
        Some(WorkerEvent::Partial("hello there".to_string()))
    );
    assert_eq!(WorkerEvent::parse("EVENT:RELEASE"), Some(WorkerEvent::Release));
    assert_eq!(WorkerEvent::parse("EVENT: release"), Some(WorkerEvent::Release));
    assert_eq!(WorkerEvent::parse("EVENT:READY"), None);
    assert_eq!(WorkerEvent::parse("   "), None);
    assert_eq!(
        WorkerEvent::parse("Hello, world."),
        Some(WorkerEvent::Final("Hello, world.".to_string()))
    );
}

/// WHAT: Lowercase prefixes are treated as transcript text
/// WHY: Prefix matching is case-sensitive on the wire
#[test]
fn given_lowercase_prefix_when_parsing_then_final() {
    // Given: A line that only resembles a partial
    let line = "partial: not a prefix";

    // When: Parsing it
    let event = WorkerEvent::parse(line);

    // Then: It is final text
    assert_eq!(event, Some(WorkerEvent::Final(line.to_string())));
}

/// WHAT: Commands serialize to single newline-terminated lines
/// WHY: The worker reads stdin line by line
#[test]
fn given_commands_when_serialized_then_wire_lines_match() {
    // Given/When/Then: Each command has its exact wire form
    assert_eq!(
        WorkerCommand::SetMode(RecordingMode::Hold).to_line(),
        "SET_MODE HOLD\n"
    );
    assert_eq!(
        WorkerCommand::SetMode(RecordingMode::Toggle).to_line(),
        "SET_MODE TOGGLE\n"
    );
    assert_eq!(
        WorkerCommand::SetHoldKeys("ctrl+win+space".to_string()).to_line(),
        "SET_HOLD_KEYS ctrl+win+space\n"
    );
    assert_eq!(WorkerCommand::Start.to_line(), "START\n");
    assert_eq!(WorkerCommand::Stop.to_line(), "STOP\n");
}

/// WHAT: Framed events are identical however the stream is split
/// WHY: Chunk boundaries depend on pipe timing, not on the worker
#[test]
fn given_every_split_point_when_framing_then_same_events() {
    // Given: A stream carrying a partial, a release and a final
    let stream: &[u8] = b"PARTIAL:ab\nEVENT:RELEASE\nhello world\n";
    let expected = vec![
        WorkerEvent::Partial("ab".to_string()),
        WorkerEvent::Release,
        WorkerEvent::Final("hello world".to_string()),
    ];

    for split in 0..=stream.len() {
        // When: Feeding it in two pieces split at `split`
        let mut framer = LineFramer::new();
        let (head, tail) = stream.split_at(split);
        let events: Vec<WorkerEvent> = framer
            .feed(head)
            .into_iter()
            .chain(framer.feed(tail))
            .filter_map(|line| WorkerEvent::parse(&line))
            .collect();

        // Then: The events match the unsplit stream
        assert_eq!(events, expected, "split at {split}");
        assert_eq!(framer.buffered_len(), 0);
    }
}
