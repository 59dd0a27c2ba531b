//! JSON output: one pretty-printed document with 4-space indentation.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;

const INDENT: &[u8] = b"    ";

/// Serialize `value` as indented JSON. `None` becomes `null`.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the document followed by a newline and flush.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> std::io::Result<()> {
    let doc = to_pretty_json(value)?;
    out.write_all(doc.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Output;
    use crate::shape::HistoricalBars;
    use std::collections::BTreeMap;

    #[test]
    fn none_serializes_as_null() {
        let nothing: Option<Output> = None;
        assert_eq!(to_pretty_json(&nothing).unwrap(), "null");
    }

    #[test]
    fn uses_four_space_indentation() {
        let bars = HistoricalBars {
            symbol: "AAPL".into(),
            date: vec!["2024-01-02T00:00:00Z".into()],
            open: vec![Some(187.15)],
            high: vec![Some(188.44)],
            low: vec![Some(183.89)],
            close: vec![None],
            volume: vec![82488700],
        };
        let doc = to_pretty_json(&Some(Output::HistoricalBars(bars))).unwrap();
        let expected = r#"{
    "symbol": "AAPL",
    "date": [
        "2024-01-02T00:00:00Z"
    ],
    "open": [
        187.15
    ],
    "high": [
        188.44
    ],
    "low": [
        183.89
    ],
    "close": [
        null
    ],
    "volume": [
        82488700
    ]
}"#;
        assert_eq!(doc, expected);
    }

    #[test]
    fn extended_info_is_a_bare_mapping() {
        let mut info = BTreeMap::new();
        let mut meta = serde_json::Map::new();
        meta.insert("sector".into(), serde_json::json!("Technology"));
        info.insert("AAPL".to_string(), meta);

        let doc = to_pretty_json(&Output::ExtendedInfo(info)).unwrap();
        assert_eq!(doc, "{\n    \"AAPL\": {\n        \"sector\": \"Technology\"\n    }\n}");
    }

    #[test]
    fn write_json_appends_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &Option::<Output>::None).unwrap();
        assert_eq!(out, b"null\n");
    }
}
