use std::path::Path;

use super::model::Record;
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Serialized layouts the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// `[{ "id": 1, "listId": 2, "name": "Item 1" }, ...]`
    Json,
    /// Header row naming `id`, `listId` and `name`; an empty `name` cell is absent.
    Csv,
}

impl RecordFormat {
    /// Pick the format from a source name's extension.
    ///
    /// No extension means JSON, the layout of the default asset.
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "" | "json" => Ok(RecordFormat::Json),
            "csv" => Ok(RecordFormat::Csv),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decode a JSON array of records, preserving source order.
pub fn parse(raw: &[u8]) -> Result<Vec<Record>, ParseError> {
    parse_as(RecordFormat::Json, raw)
}

/// Decode `raw` in the given format, preserving source order.
pub fn parse_as(format: RecordFormat, raw: &[u8]) -> Result<Vec<Record>, ParseError> {
    match format {
        RecordFormat::Json => parse_json(raw),
        RecordFormat::Csv => parse_csv(raw),
    }
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

fn parse_json(raw: &[u8]) -> Result<Vec<Record>, ParseError> {
    Ok(serde_json::from_slice(raw)?)
}

fn parse_csv(raw: &[u8]) -> Result<Vec<Record>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(raw);

    reader
        .deserialize::<Record>()
        .map(|row| row.map_err(ParseError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_source_order_and_nullable_names() {
        let raw = br#"[
            {"id": 755, "listId": 2, "name": ""},
            {"id": 203, "listId": 2, "name": null},
            {"id": 684, "listId": 1, "name": "Item 684"},
            {"id": 276, "listId": 1}
        ]"#;
        let records = parse(raw).unwrap();

        assert_eq!(
            records,
            vec![
                Record::new(755, 2, Some("")),
                Record::new(203, 2, None),
                Record::new(684, 1, Some("Item 684")),
                Record::new(276, 1, None),
            ]
        );
    }

    #[test]
    fn json_accepts_alias_field_names() {
        let raw = br#"[{"id": 1, "groupKey": 4, "label": "Zed", "extra": true}]"#;
        assert_eq!(parse(raw).unwrap(), vec![Record::new(1, 4, Some("Zed"))]);
    }

    #[test]
    fn json_missing_required_field_is_an_error() {
        let missing_id = br#"[{"listId": 1, "name": "a"}]"#;
        let missing_group = br#"[{"id": 1, "name": "a"}]"#;
        assert!(matches!(parse(missing_id), Err(ParseError::Json(_))));
        assert!(matches!(parse(missing_group), Err(ParseError::Json(_))));
    }

    #[test]
    fn json_malformed_input_is_an_error() {
        assert!(parse(b"[{\"id\": 1,").is_err());
        assert!(parse(b"{\"id\": 1, \"listId\": 1}").is_err());
        assert!(parse(br#"[{"id": "one", "listId": 1}]"#).is_err());
        assert!(parse(b"").is_err());
    }

    #[test]
    fn json_empty_array_is_empty() {
        assert!(parse(b"[]").unwrap().is_empty());
    }

    #[test]
    fn csv_empty_name_is_absent() {
        let raw = b"id,listId,name\n1,2,Item 1\n2,1,\n";
        let records = parse_as(RecordFormat::Csv, raw).unwrap();
        assert_eq!(
            records,
            vec![Record::new(1, 2, Some("Item 1")), Record::new(2, 1, None)]
        );
    }

    #[test]
    fn csv_non_numeric_id_is_an_error() {
        let raw = b"id,listId,name\nx,2,Item\n";
        assert!(matches!(
            parse_as(RecordFormat::Csv, raw),
            Err(ParseError::Csv(_))
        ));
    }

    #[test]
    fn csv_missing_group_column_is_an_error() {
        let raw = b"id,name\n1,Item 1\n";
        assert!(matches!(
            parse_as(RecordFormat::Csv, raw),
            Err(ParseError::Csv(_))
        ));
    }

    #[test]
    fn csv_empty_group_cell_is_an_error() {
        let raw = b"id,listId,name\n1,,Item 1\n";
        assert!(parse_as(RecordFormat::Csv, raw).is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(RecordFormat::from_name("hiring.json").unwrap(), RecordFormat::Json);
        assert_eq!(RecordFormat::from_name("Hiring.CSV").unwrap(), RecordFormat::Csv);
        assert_eq!(RecordFormat::from_name("hiring").unwrap(), RecordFormat::Json);
        assert!(matches!(
            RecordFormat::from_name("hiring.parquet"),
            Err(ParseError::UnsupportedFormat(ext)) if ext == "parquet"
        ));
    }
}
