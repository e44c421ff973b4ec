/*!
 * Tests for .ass reading, sorting and writing
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use assgrammarcheck::errors::SubtitleError;
use assgrammarcheck::subtitle_processor::{AssTime, EventKind, SubtitleDocument, SubtitleEvent};
use crate::common;

/// Test that the sample script loads with every event and field
#[test]
fn test_load_withSampleScript_shouldParseEvents() -> Result<()> {
    let document = SubtitleDocument::load(common::test_resource_path("sample.ass"))?;

    assert_eq!(document.events.len(), 5);

    let first = &document.events[0];
    assert_eq!(first.kind, EventKind::Dialogue);
    assert_eq!(first.start, AssTime::from_centis(500));
    assert_eq!(first.style, "Default");
    assert_eq!(first.name, "Tanjiro");
    // Commas inside the text belong to the text
    assert_eq!(first.text, "and then we ran,{\\i1}as fast as we could{\\i0}.");

    assert!(document.events[2].is_comment());
    assert_eq!(document.events[3].layer, "10");
    assert_eq!(document.events[3].style, "Sign - Title");

    Ok(())
}

/// Test that saving an untouched document reproduces the file byte for byte
#[test]
fn test_save_withUnmodifiedDocument_shouldRoundTripExactly() -> Result<()> {
    let source = common::test_resource_path("sample.ass");
    let original = fs::read(&source)?;

    let temp_dir = common::create_temp_dir()?;
    let copy = temp_dir.path().join("copy.ass");
    SubtitleDocument::load(&source)?.save(&copy)?;

    assert_eq!(fs::read(&copy)?, original);
    Ok(())
}

/// Test that sorting orders events by start time and keeps ties in file order
#[test]
fn test_sort_events_by_start_withTies_shouldBeStable() -> Result<()> {
    let content = common::ass_content(&[
        ("Dialogue", "0:00:05.00", "Default", "third"),
        ("Dialogue", "0:00:01.00", "Default", "first"),
        ("Comment", "0:00:01.00", "Default", "second"),
        ("Dialogue", "0:00:09.00", "Default", "fourth"),
    ]);
    let mut document = SubtitleDocument::parse_str(&content, Path::new("ties.ass"))?;

    document.sort_events_by_start();

    let texts: Vec<&str> = document.events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third", "fourth"]);
    Ok(())
}

/// Test that a sorted document survives a save and reload in its new order
#[test]
fn test_save_afterSort_shouldPersistNewOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_ass(temp_dir.path(), "order.ass", &[
        ("Dialogue", "0:00:03.00", "Default", "later"),
        ("Dialogue", "0:00:01.00", "Default", "earlier"),
    ])?;

    let mut document = SubtitleDocument::load(&path)?;
    document.sort_events_by_start();
    document.save(&path)?;

    let reloaded = SubtitleDocument::load(&path)?;
    assert_eq!(reloaded.events[0].text, "earlier");
    assert_eq!(reloaded.events[1].text, "later");

    // Sections outside [Events] are untouched
    let content = fs::read_to_string(&path)?;
    assert!(content.contains("[V4+ Styles]"));
    assert!(content.contains("Style: Sign,Arial,40"));
    Ok(())
}

/// Test that a file without an [Events] section is rejected
#[test]
fn test_parse_str_withoutEventsSection_shouldFail() {
    let result = SubtitleDocument::parse_str("[Script Info]\nTitle: x\n", Path::new("bad.ass"));
    assert!(matches!(result, Err(SubtitleError::Parse { .. })));
}

/// Test that a malformed timestamp reports the offending line
#[test]
fn test_parse_str_withBadTimestamp_shouldReportLine() {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:xx.00,0:00:02.00,Default,,0,0,0,,Hi\n";

    match SubtitleDocument::parse_str(content, Path::new("bad.ass")) {
        Err(SubtitleError::Parse { line, message, .. }) => {
            assert_eq!(line, 3);
            assert!(message.contains("start time"));
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

/// Test that an event line with too few fields is rejected
#[test]
fn test_parse_str_withTooFewFields_shouldFail() {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Text\nDialogue: 0,0:00:01.00\n";
    assert!(SubtitleDocument::parse_str(content, Path::new("short.ass")).is_err());
}

/// Test that events without a Format line are read with the default columns
#[test]
fn test_parse_str_withoutFormatLine_shouldUseDefaultFormat() -> Result<()> {
    let content = "[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,Tanjiro,0,0,0,,Hi\n";
    let document = SubtitleDocument::parse_str(content, Path::new("noformat.ass"))?;

    assert_eq!(document.events.len(), 1);
    assert_eq!(document.events[0].start, AssTime::from_centis(100));
    assert_eq!(document.events[0].name, "Tanjiro");
    assert_eq!(document.to_ass_string(), content);
    Ok(())
}

/// Test that an hour field too large for a timestamp is a parse error
#[test]
fn test_parse_str_withOversizedHours_shouldReturnParseError() {
    let content = common::ass_content(&[("Dialogue", "99999999999999999:00:01.00", "Default", "Hi")]);

    match SubtitleDocument::parse_str(&content, Path::new("hours.ass")) {
        Err(SubtitleError::Parse { message, .. }) => assert!(message.contains("start time")),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

/// Test that comment lines inside [Events] survive a sort and save
#[test]
fn test_save_withCommentLineInEvents_shouldKeepComment() -> Result<()> {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n; keep me: timing notes\nDialogue: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,later\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,earlier\n";
    let mut document = SubtitleDocument::parse_str(content, Path::new("notes.ass"))?;

    // Untouched documents are written back unchanged
    assert_eq!(document.to_ass_string(), content);

    document.sort_events_by_start();
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("notes.ass");
    document.save(&path)?;

    assert_eq!(
        fs::read_to_string(&path)?,
        "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n; keep me: timing notes\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,earlier\nDialogue: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,later\n"
    );
    Ok(())
}

/// Test that events added after loading are written after the loaded ones
#[test]
fn test_to_ass_string_withAddedEvent_shouldUseDocumentFormat() -> Result<()> {
    let content = "[Events]\nFormat: Start, End, Style, Text\nDialogue: 0:00:01.00,0:00:02.00,Default,a\n\n[Fonts]\n";
    let mut document = SubtitleDocument::parse_str(content, Path::new("added.ass"))?;

    document.events.push(SubtitleEvent::new(
        EventKind::Comment,
        AssTime::from_centis(300),
        AssTime::from_centis(400),
        "Default",
        "b",
    ));

    assert_eq!(
        document.to_ass_string(),
        "[Events]\nFormat: Start, End, Style, Text\nDialogue: 0:00:01.00,0:00:02.00,Default,a\nComment: 0:00:03.00,0:00:04.00,Default,b\n\n[Fonts]\n"
    );
    Ok(())
}

/// Test that a second [Events] section is rejected
#[test]
fn test_parse_str_withDuplicateEvents_shouldReportLine() {
    let content = "[Events]\nFormat: Start, End, Text\n[Events]\n";

    match SubtitleDocument::parse_str(content, Path::new("twice.ass")) {
        Err(SubtitleError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

/// Test that a custom column order is honored when reading and writing
#[test]
fn test_parse_str_withCustomFormat_shouldKeepColumnOrder() -> Result<()> {
    let content = "[Events]\nFormat: Start, End, Style, Text\nDialogue: 0:00:02.00,0:00:03.00,Default,b\nDialogue: 0:00:01.00,0:00:02.00,Default,a\n";
    let mut document = SubtitleDocument::parse_str(content, Path::new("custom.ass"))?;

    document.sort_events_by_start();

    assert_eq!(
        document.to_ass_string(),
        "[Events]\nFormat: Start, End, Style, Text\nDialogue: 0:00:01.00,0:00:02.00,Default,a\nDialogue: 0:00:02.00,0:00:03.00,Default,b\n"
    );
    Ok(())
}

/// Test that a file that is not UTF-8 is a parse error, not a panic
#[test]
fn test_load_withInvalidUtf8_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("latin1.ass");
    fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d])?;

    assert!(matches!(SubtitleDocument::load(&path), Err(SubtitleError::Parse { .. })));
    Ok(())
}

/// Test that a missing file is a file access error naming the path
#[test]
fn test_load_withMissingFile_shouldReturnFileAccessError() {
    let result = SubtitleDocument::load("does_not_exist.ass");
    match result {
        Err(error @ SubtitleError::FileAccess { .. }) => {
            assert_eq!(error.path(), Path::new("does_not_exist.ass"));
        }
        other => panic!("Expected file access error, got {:?}", other),
    }
}

/// Test that dumping an event produces a full event line
#[test]
fn test_dump_with_type_withDialogue_shouldIncludeDescriptor() {
    let event = SubtitleEvent::new(
        EventKind::Dialogue,
        AssTime::from_centis(100),
        AssTime::from_centis(250),
        "Default",
        "Hello, world",
    );

    assert_eq!(
        event.dump_with_type(),
        "Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,Hello, world"
    );
    assert_eq!(event.to_string(), event.dump_with_type());
}

/// Test that a new document serializes with an empty events section
#[test]
fn test_new_withNoEvents_shouldWriteFormatLine() {
    let document = SubtitleDocument::new("empty.ass".into());
    let content = document.to_ass_string();

    assert!(content.starts_with('\u{feff}'));
    assert!(content.contains("[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
}
