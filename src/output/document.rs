//! Rendering of the exported JSON array
//!
//! The document is `[`, the records separated by `,` with a newline after
//! each record, then `]` and a final newline. Each record is serialized on a
//! single line so consumers can also read the output line by line.

use std::io::Write;

use crate::output::record::HostRecord;

/// Render the complete array
pub fn render_document(records: &[HostRecord]) -> serde_json::Result<String> {
    let mut doc = String::from("[");
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&serde_json::to_string(record)?);
        doc.push('\n');
    }
    doc.push_str("]\n");
    Ok(doc)
}

/// Write a rendered document and flush
pub fn write_document<W: Write>(out: &mut W, doc: &str) -> std::io::Result<()> {
    out.write_all(doc.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsa::test_helpers::sample_host;

    fn records(count: usize) -> Vec<HostRecord> {
        (0..count)
            .map(|i| HostRecord::from_status(i, &sample_host(&format!("h{}", i), 1)))
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let doc = render_document(&[]).unwrap();
        assert_eq!(doc, "[]\n");
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_one_record_per_line() {
        let doc = render_document(&records(3)).unwrap();
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("[{"));
        assert!(lines[1].starts_with(",{"));
        assert!(lines[2].starts_with(",{"));
        assert_eq!(lines[3], "]");
    }

    #[test]
    fn test_single_record_has_no_leading_separator() {
        let record = HostRecord::from_status(7, &sample_host("h7", 1));
        let doc = render_document(&[record]).unwrap();
        assert!(doc.starts_with("[{\"ord\":7,"), "{}", doc);

        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value[0]["ord"], 7);
    }

    #[test]
    fn test_document_is_valid_json() {
        let doc = render_document(&records(5)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        let hosts = value.as_array().unwrap();
        assert_eq!(hosts.len(), 5);
        for (i, host) in hosts.iter().enumerate() {
            assert_eq!(host["ord"].as_u64(), Some(i as u64));
        }
    }

    #[test]
    fn test_write_document_writes_everything() {
        let mut out = Vec::new();
        write_document(&mut out, "[]\n").unwrap();
        assert_eq!(out, b"[]\n");
    }
}
