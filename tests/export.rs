#[path = "common/mod.rs"]
mod common;

use common::*;
use instacomments::{DataShape, ErrorClass, FileFormat, InstaComments, ScrapeError, StopReason};
use std::fs;

fn scraper() -> InstaComments {
    InstaComments::new().shortcode("SHORT").progress(false)
}

/// Two pages with a repeated comment id and repeated/mixed-case usernames.
fn duplicate_pages() -> ScriptedExecutor {
    ScriptedExecutor::new(vec![
        page(
            vec![
                node("1", "zoe", "first", 4),
                node("2", "Adam", "hello\nworld", 2),
                node("3", "adam", "third", 0),
            ],
            Some("c1"),
        ),
        page(vec![node("1", "zoe", "first again", 4), node("4", "Adam", "fourth", 1)], None),
    ])
}

/// Usernames JSON, deduped (default): unique by exact name, sorted ignoring case,
/// written under directories that did not exist yet.
#[test]
fn usernames_json_dedupes_and_sorts() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("deeper").join("users.json");

    let summary = scraper()
        .run(&duplicate_pages(), DataShape::Usernames, FileFormat::Json, &out)
        .unwrap();

    assert_eq!(read_json(&out), serde_json::json!(["Adam", "adam", "zoe"]));
    assert_eq!(summary.written, 3);
    assert_eq!(summary.fetched, 5);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.stop, StopReason::Exhausted);
}

/// Without dedupe the usernames projection keeps repeats, still sorted.
#[test]
fn usernames_txt_without_dedupe_keeps_repeats() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("users.txt");

    scraper()
        .dedupe(false)
        .run(&duplicate_pages(), DataShape::Usernames, FileFormat::Txt, &out)
        .unwrap();

    assert_eq!(read_lines(&out), vec!["Adam", "adam", "Adam", "zoe", "zoe"]);
}

#[test]
fn usernames_csv_has_header() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("users.csv");

    scraper()
        .run(&duplicate_pages(), DataShape::Usernames, FileFormat::Csv, &out)
        .unwrap();

    assert_eq!(read_lines(&out), vec!["username", "Adam", "adam", "zoe"]);
}

/// Detailed CSV: id dedupe keeps the first "1"; the multi-line text is collapsed.
#[test]
fn detailed_csv_collapses_newlines_and_dedupes_by_id() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("comments.csv");

    let summary = scraper()
        .run(&duplicate_pages(), DataShape::Detailed, FileFormat::Csv, &out)
        .unwrap();
    assert_eq!(summary.written, 4);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(header, vec!["id", "username", "text", "like_count", "created_at", "reply_count"]);

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    let ids: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(&rows[0][2], "first");
    assert_eq!(&rows[1][2], "hello world");
    assert_eq!(&rows[1][3], "2");
    assert_eq!(&rows[1][4], "1700000002");
    assert_eq!(&rows[1][5], "0");
}

/// Detailed JSON with replies: full records including the nested array; with
/// dedupe off the repeated id survives.
#[test]
fn detailed_json_includes_replies() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("comments.json");
    let exec = ScriptedExecutor::new(vec![page(
        vec![
            node_with_replies("p1", "op", &[node("r1", "ann", "reply", 2)]),
            node("p2", "bob", "plain", 0),
            node("p2", "bob", "plain", 0),
        ],
        None,
    )]);

    scraper()
        .include_replies(true)
        .dedupe(false)
        .run(&exec, DataShape::Detailed, FileFormat::Json, &out)
        .unwrap();

    let v = read_json(&out);
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["id"], "p1");
    assert_eq!(arr[0]["username"], "op");
    assert_eq!(arr[0]["replies"][0]["id"], "r1");
    assert_eq!(arr[0]["replies"][0]["like_count"], 2);
    assert_eq!(arr[1]["replies"].as_array().unwrap().len(), 0);
}

#[test]
fn detailed_txt_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("comments.txt");
    let exec = ScriptedExecutor::new(vec![page(vec![node("1", "zoe", "nice reel", 12)], None)]);

    scraper().run(&exec, DataShape::Detailed, FileFormat::Txt, &out).unwrap();

    assert_eq!(read_to_string(&out).unwrap(), "@zoe: nice reel (likes=12)\n");
}

#[test]
fn detailed_jsonl_with_human_timestamps() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("comments.jsonl");
    let exec = ScriptedExecutor::new(vec![page(vec![node("1", "zoe", "a", 0), node("2", "amy", "b", 0)], None)]);

    scraper()
        .timestamps_human_readable(true)
        .run(&exec, DataShape::Detailed, FileFormat::Jsonl, &out)
        .unwrap();

    let lines = read_lines(&out);
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first["created_at"], "2023-11-14T22:13:20Z");
}

/// Missing container: the (empty) result still flows through to the writer.
#[test]
fn missing_container_writes_empty_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("empty.json");
    let exec = ScriptedExecutor::new(vec![missing_media_page()]);

    let summary = scraper().run(&exec, DataShape::Usernames, FileFormat::Json, &out).unwrap();

    assert_eq!(summary.written, 0);
    assert_eq!(summary.stop, StopReason::MissingContainer);
    assert_eq!(read_json(&out), serde_json::json!([]));
}

/// Output under a path whose parent is a regular file fails with the I/O class.
#[test]
fn unwritable_output_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, b"not a dir").unwrap();
    let out = blocker.join("out.json");
    let exec = ScriptedExecutor::new(vec![page(vec![node("1", "zoe", "a", 0)], None)]);

    let err = scraper().run(&exec, DataShape::Usernames, FileFormat::Json, &out).unwrap_err();

    assert!(matches!(err, ScrapeError::Write { .. }));
    assert_eq!(err.class(), ErrorClass::Io);
    assert_eq!(err.exit_code(), 3);
}
