//! Output formatting for answer results.
//!
//! Results can be written as a JSON array, as JSON Lines (one result per
//! line, suitable for streaming while a batch runs), or as plain text
//! blocks for reading in a terminal.

use crate::answer::AnswerResult;
use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Human-readable `Email:` / `Answer:` blocks
    Text,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Whether results can be written one by one as they arrive.
    pub fn is_streaming(&self) -> bool {
        !matches!(self, Self::Json)
    }
}

/// A writer that renders answer results in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single result.
    ///
    /// For JSON format this writes a standalone object; use `write_all` to
    /// get an array.
    pub fn write(&mut self, result: &AnswerResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(result)?,
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, result).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Text => {
                if self.items_written > 0 {
                    writeln!(self.writer)?;
                }
                write_text_block(&mut self.writer, result)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch of results.
    pub fn write_all(&mut self, results: &[AnswerResult]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_json(results)?;
                self.items_written += results.len();
            }
            OutputFormat::JsonLines | OutputFormat::Text => {
                for result in results {
                    self.write(result)?;
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// The format this writer renders.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Get the number of results written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_text_block<W: Write>(writer: &mut W, result: &AnswerResult) -> io::Result<()> {
    writeln!(writer, "Email {}:", result.row)?;
    writeln!(writer, "{}", result.email)?;
    writeln!(writer, "Answer:")?;
    writeln!(writer, "{}", result.answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(row: usize, answer: &str) -> AnswerResult {
        AnswerResult {
            row,
            email: format!("email {row}"),
            answer: answer.to_string(),
            tokens_used: Some(10),
            model: "mock".to_string(),
        }
    }

    #[test]
    fn test_write_json_array() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer
            .write_all(&[result(1, "a"), result(3, "b")])
            .unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["row"], 3);
        assert_eq!(parsed[1]["answer"], "b");
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write(&result(1, "a")).unwrap();
        writer.write(&result(2, "b")).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"email\":\"email 1\""));
    }

    #[test]
    fn test_write_text_blocks() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Text, false);
        writer
            .write_all(&[result(1, "Friday."), result(3, "Yes.")])
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "Email 1:\nemail 1\nAnswer:\nFriday.\n\nEmail 3:\nemail 3\nAnswer:\nYes.\n"
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("invalid"), None);
        assert!(!OutputFormat::Json.is_streaming());
        assert!(OutputFormat::Text.is_streaming());
    }
}
