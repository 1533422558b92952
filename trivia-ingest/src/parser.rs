//! Season file parser
//!
//! Reads one tab-delimited season export into flat clue records, in file
//! order, coercing field types and unescaping the export's quote escapes.
//! The first malformed row aborts the whole file; there is no row-skipping
//! recovery.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use trivia_common::{Error, Result};

/// Header columns a season export must carry
const REQUIRED_COLUMNS: [&str; 7] = [
    "round",
    "clue_value",
    "category",
    "comments",
    "answer",
    "question",
    "air_date",
];

/// One clue row as exported, before any grouping
///
/// Ephemeral: exists only between parsing and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    /// Round number, positive
    pub round: i32,
    /// Clue value; negative for wagered clues
    pub clue_value: i32,
    pub category: String,
    /// May be empty
    pub comments: String,
    pub answer: String,
    pub question: String,
    pub air_date: NaiveDate,
}

/// Parse a season export file into flat records
pub fn parse_file(path: &Path) -> Result<Vec<FlatRecord>> {
    let file = File::open(path)?;
    parse_reader(file)
}

/// Parse tab-separated clue rows from any reader
///
/// Quoting is disabled: the export escapes quotes as the two-character
/// sequences `\"` and `\'` instead, which are unescaped here.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<FlatRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::Parse(format!("Failed to read header row: {}", e)))?
        .clone();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Parse(format!("Missing required column '{}'", name)))?;
    }
    let [round_col, clue_value_col, category_col, comments_col, answer_col, question_col, air_date_col] =
        columns;

    let mut records = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let line = index + 2; // header occupies line 1
        let row = row.map_err(|e| Error::Parse(format!("line {}: {}", line, e)))?;

        let field = |col: usize| {
            row.get(col)
                .ok_or_else(|| Error::Parse(format!("line {}: row has too few columns", line)))
        };

        records.push(FlatRecord {
            round: parse_int(field(round_col)?, "round", line)?,
            clue_value: parse_int(field(clue_value_col)?, "clue_value", line)?,
            category: unescape(field(category_col)?),
            comments: unescape(field(comments_col)?),
            answer: unescape(field(answer_col)?),
            question: unescape(field(question_col)?),
            air_date: parse_date(field(air_date_col)?, line)?,
        });
    }

    Ok(records)
}

fn parse_int(cell: &str, field: &str, line: usize) -> Result<i32> {
    cell.parse().map_err(|_| {
        Error::Parse(format!(
            "line {}: invalid integer for {}: '{}'",
            line, field, cell
        ))
    })
}

fn parse_date(cell: &str, line: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .map_err(|_| Error::Parse(format!("line {}: invalid air_date: '{}'", line, cell)))
}

/// Replace the export's two-character quote escapes with literal quotes
fn unescape(cell: &str) -> String {
    cell.replace("\\\"", "\"").replace("\\'", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "round\tclue_value\tcategory\tcomments\tanswer\tquestion\tair_date";

    fn tsv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_parses_rows_in_file_order() {
        let input = tsv(&[
            "1\t200\tHISTORY\t\tthe Rubicon\tCaesar crossed this river\t2021-05-04",
            "2\t-1500\tHISTORY\tDaily Double\tAugustus\tFirst Roman emperor\t2021-05-04",
        ]);

        let records = parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].round, 1);
        assert_eq!(records[0].clue_value, 200);
        assert_eq!(records[0].category, "HISTORY");
        assert_eq!(records[0].comments, "");
        assert_eq!(records[0].answer, "the Rubicon");
        assert_eq!(records[0].question, "Caesar crossed this river");
        assert_eq!(
            records[0].air_date,
            NaiveDate::from_ymd_opt(2021, 5, 4).unwrap()
        );
        assert_eq!(records[1].clue_value, -1500);
        assert_eq!(records[1].comments, "Daily Double");
    }

    #[test]
    fn test_unescapes_quotes() {
        let input = tsv(&[
            "1\t400\tQUOTES\t\tgreeting\tHe said \\\"hi\\\"\t2021-05-04",
        ]);

        let records = parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records[0].question, "He said \"hi\"");
    }

    #[test]
    fn test_unescapes_single_quotes() {
        let input = tsv(&[
            "1\t400\tPOSSESSIVES\t\tits\tDon\\'t confuse this with it\\'s\t2021-05-04",
        ]);

        let records = parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records[0].question, "Don't confuse this with it's");
    }

    #[test]
    fn test_leading_escaped_quote_is_literal() {
        // Quoting is disabled, so a field starting with an escape is data
        let input = tsv(&[
            "1\t400\tQUOTES\t\tanswer\t\\\"Veni, vidi, vici\\\"\t2021-05-04",
        ]);

        let records = parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records[0].question, "\"Veni, vidi, vici\"");
    }

    #[test]
    fn test_missing_column_fails() {
        let input = "round\tclue_value\tcategory\tcomments\tanswer\tquestion\n1\t200\tA\t\tb\tc";

        let err = parse_reader(input.as_bytes()).unwrap_err();

        match err {
            trivia_common::Error::Parse(msg) => assert!(msg.contains("air_date")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_integer_fails_with_line() {
        let input = tsv(&[
            "1\t200\tHISTORY\t\ta\tb\t2021-05-04",
            "one\t200\tHISTORY\t\ta\tb\t2021-05-04",
        ]);

        let err = parse_reader(input.as_bytes()).unwrap_err();

        match err {
            trivia_common::Error::Parse(msg) => {
                assert!(msg.contains("line 3"));
                assert!(msg.contains("round"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_fails() {
        let input = tsv(&["1\t200\tHISTORY\t\ta\tb\t05/04/2021"]);

        let err = parse_reader(input.as_bytes()).unwrap_err();

        match err {
            trivia_common::Error::Parse(msg) => assert!(msg.contains("air_date")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_fails() {
        let input = tsv(&["1\t200\tHISTORY"]);

        let err = parse_reader(input.as_bytes()).unwrap_err();

        assert!(matches!(err, trivia_common::Error::Parse(_)));
    }

    #[test]
    fn test_empty_file_yields_no_records() {
        let records = parse_reader(HEADER.as_bytes()).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_column_order_is_taken_from_header() {
        let input = "air_date\tquestion\tanswer\tcomments\tcategory\tclue_value\tround\n\
                     2021-05-04\tq\ta\t\tHISTORY\t200\t1";

        let records = parse_reader(input.as_bytes()).unwrap();

        assert_eq!(records[0].round, 1);
        assert_eq!(records[0].clue_value, 200);
        assert_eq!(records[0].category, "HISTORY");
    }
}
