//! Output writer: records or usernames to json / csv / txt / jsonl.
//!
//! Parent directories are created first. Any I/O failure is returned as
//! `ScrapeError::Write`; a partially written file is left in place.

use crate::config::{DataShape, FileFormat};
use crate::error::{ScrapeError, ScrapeResult};
use crate::record::CommentRecord;
use crate::util::create_with_backoff;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const WRITE_BUF_BYTES: usize = 256 * 1024;

pub const DETAILED_CSV_HEADER: [&str; 6] = ["id", "username", "text", "like_count", "created_at", "reply_count"];

/// What gets written. The variant decides the data shape.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    Records(&'a [CommentRecord]),
    Usernames(&'a [String]),
}

impl Payload<'_> {
    pub fn shape(&self) -> DataShape {
        match self {
            Payload::Records(_) => DataShape::Detailed,
            Payload::Usernames(_) => DataShape::Usernames,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Records(r) => r.len(),
            Payload::Usernames(u) => u.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputOptions {
    /// Write `created_at` as RFC3339 instead of unix seconds (json, jsonl, csv).
    pub human_timestamps: bool,
}

/// Serialize `payload` to `path` in `format`. Returns the number of entries written.
pub fn write_output(path: &Path, format: FileFormat, payload: Payload<'_>, opts: OutputOptions) -> ScrapeResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ScrapeError::write(parent, e))?;
    }
    let file = create_with_backoff(path, 16, 50).map_err(|e| ScrapeError::write(path, e))?;
    let mut w = BufWriter::with_capacity(WRITE_BUF_BYTES, file);

    write_payload(&mut w, format, payload, opts)
        .and_then(|_| w.flush())
        .map_err(|e| ScrapeError::write(path, e))?;

    tracing::debug!(path = %path.display(), shape = %payload.shape(), %format, entries = payload.len(), "output written");
    Ok(payload.len())
}

/// Serialize into any writer; `write_output` wraps this with file handling.
pub fn write_payload<W: Write>(w: &mut W, format: FileFormat, payload: Payload<'_>, opts: OutputOptions) -> io::Result<()> {
    match (payload, format) {
        (Payload::Usernames(names), FileFormat::Json) => {
            serde_json::to_writer_pretty(&mut *w, names)?;
        }
        (Payload::Usernames(names), FileFormat::Jsonl) => {
            for n in names {
                serde_json::to_writer(&mut *w, n)?;
                w.write_all(b"\n")?;
            }
        }
        (Payload::Usernames(names), FileFormat::Csv) => {
            let mut csv = csv::Writer::from_writer(&mut *w);
            csv.write_record(["username"])?;
            for n in names {
                csv.write_record([n])?;
            }
            csv.flush()?;
        }
        (Payload::Usernames(names), FileFormat::Txt) => {
            for n in names {
                writeln!(w, "{n}")?;
            }
        }
        (Payload::Records(records), FileFormat::Json) => {
            let values = records.iter().map(|r| record_value(r, opts)).collect::<io::Result<Vec<_>>>()?;
            serde_json::to_writer_pretty(&mut *w, &values)?;
        }
        (Payload::Records(records), FileFormat::Jsonl) => {
            for r in records {
                serde_json::to_writer(&mut *w, &record_value(r, opts)?)?;
                w.write_all(b"\n")?;
            }
        }
        (Payload::Records(records), FileFormat::Csv) => {
            let mut csv = csv::Writer::from_writer(&mut *w);
            csv.write_record(DETAILED_CSV_HEADER)?;
            for r in records {
                csv.write_record(csv_row(r, opts))?;
            }
            csv.flush()?;
        }
        (Payload::Records(records), FileFormat::Txt) => {
            for r in records {
                writeln!(w, "{}", txt_line(r))?;
            }
        }
    }
    Ok(())
}

/// Newlines become spaces, then surrounding whitespace is trimmed.
pub fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ").trim().to_string()
}

fn csv_row(r: &CommentRecord, opts: OutputOptions) -> [String; 6] {
    [
        r.id.clone().unwrap_or_default(),
        r.username.clone().unwrap_or_default(),
        collapse_newlines(r.text.as_deref().unwrap_or("")),
        r.like_count.map(|n| n.to_string()).unwrap_or_default(),
        r.created_at.map(|ts| format_timestamp(ts, opts.human_timestamps)).unwrap_or_default(),
        r.reply_count().to_string(),
    ]
}

fn txt_line(r: &CommentRecord) -> String {
    fn or_none<T: ToString>(v: Option<T>) -> String {
        v.map(|x| x.to_string()).unwrap_or_else(|| "None".to_string())
    }
    format!(
        "@{}: {} (likes={})",
        or_none(r.username.as_deref()),
        or_none(r.text.as_deref()),
        or_none(r.like_count)
    )
}

fn format_timestamp(ts: i64, human: bool) -> String {
    if human {
        if let Some(s) = OffsetDateTime::from_unix_timestamp(ts).ok().and_then(|dt| dt.format(&Rfc3339).ok()) {
            return s;
        }
    }
    ts.to_string()
}

fn apply_human_timestamp_in_place(map: &mut Map<String, Value>, key: &str) {
    if let Some(v) = map.get_mut(key) {
        if let Some(n) = v.as_i64() {
            if let Ok(dt) = OffsetDateTime::from_unix_timestamp(n) {
                if let Ok(s) = dt.format(&Rfc3339) {
                    *v = Value::String(s);
                }
            }
        }
    }
}

fn record_value(r: &CommentRecord, opts: OutputOptions) -> io::Result<Value> {
    let mut val = serde_json::to_value(r)?;
    if opts.human_timestamps {
        if let Some(obj) = val.as_object_mut() {
            apply_human_timestamp_in_place(obj, "created_at");
            if let Some(Value::Array(replies)) = obj.get_mut("replies") {
                for reply in replies.iter_mut().filter_map(Value::as_object_mut) {
                    apply_human_timestamp_in_place(reply, "created_at");
                }
            }
        }
    }
    Ok(val)
}
