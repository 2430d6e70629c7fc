//! Edge case tests for chatarchive
//!
//! Malformed transcripts, odd selection answers and ambiguous media names.
//! None of these may fail a parse; they only change classification.

use chatarchive::config::{ContinuationPolicy, ParserConfig};
use chatarchive::core::links::{TextSegment, linkify};
use chatarchive::core::media::{BlobRef, MediaArchive, MediaKind, resolve};
use chatarchive::core::primary_user::{SelectionError, auto_detect, parse_selection, select_from_input};
use chatarchive::core::search::{Highlight, SearchIndex, highlight};
use chatarchive::core::Conversation;
use chatarchive::parser::TranscriptParser;
use chatarchive::Message;

fn parse(text: &str) -> Vec<Message> {
    TranscriptParser::new().parse_str(text).messages
}

fn archive(names: &[&str]) -> MediaArchive {
    names
        .iter()
        .map(|name| (*name, BlobRef::from_bytes(*name, name.as_bytes().to_vec())))
        .collect()
}

// =========================================================================
// Transcript structure
// =========================================================================

#[test]
fn test_empty_and_blank_transcripts() {
    let parsed = TranscriptParser::new().parse_str("");
    assert!(parsed.is_empty());
    assert!(parsed.title.is_none());

    assert!(parse("\n\n\r\n").is_empty());
}

#[test]
fn test_title_only_transcript() {
    let parsed = TranscriptParser::new().parse_str("WhatsApp Chat with Bob\n");
    assert_eq!(parsed.title.as_deref(), Some("Bob"));
    assert!(parsed.messages.is_empty());

    let conv = Conversation::assemble("bob", parsed.title, parsed.messages);
    assert_eq!(conv.name, "Bob");
    assert!(conv.last_message().is_none());
    assert!(conv.messages_by_date.is_empty());
}

#[test]
fn test_sentinel_only_on_first_line() {
    let text = "12/05/23, 10:30 - Alice: hi\nWhatsApp Chat with Bob";
    let parsed = TranscriptParser::new().parse_str(text);
    assert!(parsed.title.is_none());
    assert_eq!(parsed.messages[0].text, "hi\nWhatsApp Chat with Bob");
}

#[test]
fn test_empty_title_falls_back_to_id() {
    let parsed = TranscriptParser::new().parse_str("WhatsApp Chat with   \n12/05/23, 10:30 - Alice: hi");
    assert_eq!(parsed.title.as_deref(), Some(""));

    let conv = Conversation::assemble("_chat", parsed.title, parsed.messages);
    assert_eq!(conv.name, "_chat");
}

#[test]
fn test_orphan_lines_before_first_header_dropped() {
    let text = "12/05/23, 10:29 - Messages and calls are end-to-end encrypted.
stray line
12/05/23, 10:30 - Alice: first";
    let messages = parse(text);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, 0);
    assert_eq!(messages[0].text, "first");
}

#[test]
fn test_crlf_line_endings() {
    let messages = parse("12/05/23, 10:30 - Alice: one\r\n  two\r\n12/05/23, 10:31 - Bob: three\r\n");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "one\ntwo");
    assert_eq!(messages[1].text, "three");
}

#[test]
fn test_blank_lines_inside_message_vanish() {
    let messages = parse("12/05/23, 10:30 - Alice: one\n\n\n  two");
    assert_eq!(messages[0].text, "one\ntwo");
}

#[test]
fn test_malformed_bracketed_header_dropped() {
    let text = "[01/02/2024, 9:15:30 PM] Bob: On my way
[13/45/2024, garbage] Eve: lost
really lost? no, folded";
    let messages = parse(text);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "On my way\nreally lost? no, folded");
}

#[test]
fn test_strict_policy_only_folds_indented_lines() {
    let parser = TranscriptParser::with_config(
        ParserConfig::new().with_continuation(ContinuationPolicy::Strict),
    );
    let text = "12/05/23, 10:30 - Alice: Hello there
   see you soon
unindented wrap";
    let messages = parser.parse_str(text).messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Hello there\nsee you soon");
}

#[test]
fn test_tab_indented_continuation() {
    let messages = parse("12/05/23, 10:30 - Alice: list:\n\t- eggs\n\t- milk");
    assert_eq!(messages[0].text, "list:\n- eggs\n- milk");
}

// =========================================================================
// Header fields
// =========================================================================

#[test]
fn test_colon_in_text_stays_in_text() {
    let messages = parse("12/05/23, 10:30 - Alice: meet at: 10:45");
    assert_eq!(messages[0].sender, "Alice");
    assert_eq!(messages[0].text, "meet at: 10:45");
}

#[test]
fn test_unicode_senders() {
    let messages = parse("12/05/23, 10:30 - Иван: Привет\n12/05/23, 10:31 - 田中太郎: こんにちは");
    assert_eq!(messages[0].sender, "Иван");
    assert_eq!(messages[1].sender, "田中太郎");
    assert_eq!(messages[1].text, "こんにちは");
}

#[test]
fn test_unparsable_timestamp_keeps_message() {
    // Day-first date that doesn't fit month-first reading
    let messages = parse("31/12/23, 10:30 - Alice: happy new year");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].timestamp, None);
    assert_eq!(messages[0].text, "happy new year");
    assert!(messages[0].datetime().is_none());
}

#[test]
fn test_file_attached_variants() {
    let messages = parse(
        "12/05/23, 10:30 - Alice: doc.pdf(file attached)
12/05/23, 10:31 - Alice: (file attached) is what it says
12/05/23, 10:32 - Alice: IMG-1.jpg (file attached)   ",
    );
    assert_eq!(messages[0].text, "doc.pdf");
    assert_eq!(messages[1].text, "(file attached) is what it says");
    // Trailing spaces keep the marker from being a suffix
    assert_eq!(messages[2].text, "IMG-1.jpg (file attached)");
}

#[test]
fn test_empty_text_header() {
    let messages = parse("12/05/23, 10:30 - Alice: \n  continued");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "\ncontinued");
}

#[test]
fn test_display_time_edge_tokens() {
    let noon = Message::new(0, "1/1/24", "12:00", "A", "x");
    assert_eq!(noon.display_time(), "12:00 PM");
    let midnight = Message::new(0, "1/1/24", "0:07", "A", "x");
    assert_eq!(midnight.display_time(), "12:07 AM");
    let junk = Message::new(0, "1/1/24", "soon", "A", "x");
    assert_eq!(junk.display_time(), "soon");
}

// =========================================================================
// Primary user
// =========================================================================

#[test]
fn test_selection_parsing_is_lenient() {
    assert_eq!(parse_selection(" 2"), Ok(2));
    assert_eq!(parse_selection("2x"), Ok(2));
    assert_eq!(parse_selection("+3"), Ok(3));
    assert_eq!(parse_selection("-1"), Ok(-1));
    assert!(matches!(parse_selection("x2"), Err(SelectionError::NonNumeric { .. })));
    assert!(matches!(parse_selection(""), Err(SelectionError::NonNumeric { .. })));
}

#[test]
fn test_selection_out_of_range() {
    let senders = ["Alice", "Bob"];
    assert_eq!(
        select_from_input(&senders, "-1"),
        Err(SelectionError::OutOfRange { index: -1, count: 2 })
    );
    assert!(matches!(
        select_from_input(&senders, "99999999999999999999999"),
        Err(SelectionError::OutOfRange { .. })
    ));
    let none: [&str; 0] = [];
    assert_eq!(select_from_input(&none, "1"), Err(SelectionError::NoCandidates));
}

#[test]
fn test_auto_detect_majority_and_ties() {
    let mut messages = Vec::new();
    for (i, sender) in ["Bob", "Alice", "Bob", "Alice", "Alice", "Bob", "Alice", "Alice"]
        .iter()
        .enumerate()
    {
        messages.push(Message::new(i, "1/1/24", "10:00", *sender, "x"));
    }
    let conv = Conversation::assemble("c", None, messages);
    assert_eq!(auto_detect(&conv).as_deref(), Some("Alice"));

    let tied = Conversation::assemble(
        "t",
        None,
        vec![
            Message::new(0, "1/1/24", "10:00", "Bob", "x"),
            Message::new(1, "1/1/24", "10:01", "Alice", "x"),
        ],
    );
    assert_eq!(auto_detect(&tied).as_deref(), Some("Bob"));

    assert_eq!(auto_detect(&Conversation::assemble("e", None, Vec::new())), None);
}

#[test]
fn test_sender_names_are_case_sensitive() {
    let messages = parse("12/05/23, 10:30 - alice: a\n12/05/23, 10:31 - Alice: b");
    let conv = Conversation::assemble("c", None, messages);
    assert_eq!(conv.unique_senders, vec!["alice", "Alice"]);
}

// =========================================================================
// Media
// =========================================================================

#[test]
fn test_unmatched_hint_is_text() {
    let archive = archive(&["IMG-002.jpg"]);
    let media = resolve("IMG-001.jpg", &archive);
    assert_eq!(media.kind, MediaKind::Text);
    assert!(media.blob.is_none());
    assert_eq!(resolve("photo", &MediaArchive::new()).kind, MediaKind::Text);
}

#[test]
fn test_hint_matching_is_case_insensitive_substring() {
    let archive = archive(&["00000042-VIDEO-2024-01-01.MP4"]);
    let media = resolve("<attached: 00000042-video-2024-01-01.mp4>", &archive);
    assert_eq!(media.kind, MediaKind::Video);
}

#[test]
fn test_first_match_wins_in_archive_order() {
    let archive = archive(&["a/IMG-1.jpg.bak.pdf", "b/IMG-1.jpg"]);
    let media = resolve("IMG-1.jpg", &archive);
    assert_eq!(media.name.as_deref(), Some("IMG-1.jpg.bak.pdf"));
    assert_eq!(media.kind, MediaKind::Document);
}

#[test]
fn test_base_name_collision_last_wins() {
    let archive = MediaArchive::from_entries(vec![
        ("a/IMG-1.jpg", BlobRef::from_bytes("a/IMG-1.jpg", vec![1u8])),
        ("b/IMG-1.jpg", BlobRef::from_bytes("b/IMG-1.jpg", vec![2u8])),
    ]);
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.get("IMG-1.jpg").unwrap().bytes(), Some(&[2u8][..]));
}

#[test]
fn test_counter_prefix_only_digits() {
    let archive = archive(&["PHOTO-1.jpg", "X-PHOTO-2.jpg"]);
    assert_eq!(resolve("<attached: 123-PHOTO-1.jpg>", &archive).kind, MediaKind::Image);
    // "X-" isn't a counter, so the full hint must appear in a key
    assert_eq!(resolve("<attached: X-PHOTO-2.jpg>", &archive).kind, MediaKind::Image);
    assert_eq!(resolve("<attached: Y-PHOTO-2.jpg>", &archive).kind, MediaKind::Text);
}

#[test]
fn test_bidi_marks_ignored() {
    let archive = archive(&["report.pdf"]);
    let media = resolve("\u{200E}report.pdf\u{202C}", &archive);
    assert_eq!(media.kind, MediaKind::Document);
}

#[test]
fn test_blank_continuation_after_attachment_name() {
    let messages = parse("1/2/24, 10:00 - Bob: report.pdf\n   ");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "report.pdf\n");

    let archive = archive(&["docs/report.pdf"]);
    let media = resolve(&messages[0].text, &archive);
    assert_eq!(media.kind, MediaKind::Document);
    assert_eq!(media.name.as_deref(), Some("report.pdf"));
}

#[test]
fn test_unknown_extension_is_not_a_hint() {
    let archive = archive(&["notes.txt.zip"]);
    assert_eq!(resolve("notes.txt", &archive).kind, MediaKind::Text);
}

// =========================================================================
// Search and rendering helpers
// =========================================================================

#[test]
fn test_blank_query_inactive() {
    let conv = Conversation::assemble("c", None, parse("12/05/23, 10:30 - Alice:    spaced"));
    for query in ["", "   ", "\t"] {
        let index = SearchIndex::build(&conv, query);
        assert!(!index.is_active());
        assert_eq!(index.position(), 0);
        assert_eq!(index.current(), None);
    }
}

#[test]
fn test_search_regex_metacharacters_literal() {
    let conv = Conversation::assemble(
        "c",
        None,
        vec![
            Message::new(0, "1/1/24", "10:00", "A", "costs $5 (approx.)"),
            Message::new(1, "1/1/24", "10:01", "B", "costs 5"),
        ],
    );
    let index = SearchIndex::build(&conv, "$5 (");
    assert_eq!(index.matches(), &[0]);

    assert_eq!(
        highlight("costs $5 (approx.)", "$5 ("),
        vec![
            Highlight::Plain("costs "),
            Highlight::Match("$5 ("),
            Highlight::Plain("approx.)"),
        ]
    );
}

#[test]
fn test_search_unicode_case_folding() {
    let conv = Conversation::assemble(
        "c",
        None,
        vec![Message::new(0, "1/1/24", "10:00", "A", "ПРИВЕТ всем")],
    );
    assert_eq!(SearchIndex::build(&conv, "привет").len(), 1);
}

#[test]
fn test_linkify_edges() {
    assert_eq!(
        linkify("http://a.b"),
        vec![TextSegment::Link("http://a.b")]
    );
    assert_eq!(
        linkify("x https://a.b/c\nhttps://d.e"),
        vec![
            TextSegment::Plain("x "),
            TextSegment::Link("https://a.b/c"),
            TextSegment::Plain("\n"),
            TextSegment::Link("https://d.e"),
        ]
    );
    assert_eq!(linkify("https://"), vec![TextSegment::Plain("https://")]);
}
