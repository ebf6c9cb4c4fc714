use std::path::Path;

use serde::Serialize;

use crate::error::ReportError;
use crate::results::{ClassifiedEntry, ResultSet, Summary};

/// Where the CSV report lands unless told otherwise
pub const DEFAULT_REPORT_PATH: &str = "output/urls_with_chatbots.csv";

/// Write the positive URLs as a single-column CSV with a `URL` header,
/// replacing any previous report at `path`.
pub fn write_report<S: AsRef<str>>(path: &Path, urls: &[S]) -> Result<(), ReportError> {
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["URL"])?;
    for url in urls {
        writer.write_record([url.as_ref()])?;
    }
    writer.flush()?;

    log::info!("💾 Report saved to: {}", path.display());
    Ok(())
}

/// Render the positive URLs as CSV text (same layout as the report file)
pub fn format_csv<S: AsRef<str>>(urls: &[S]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["URL"])?;
    for url in urls {
        writer.write_record([url.as_ref()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Serialize)]
struct FullReport<'a> {
    summary: Summary,
    entries: &'a [ClassifiedEntry],
}

/// Write every classification, negatives and failures included, as JSON
pub fn write_full_report(path: &Path, results: &ResultSet) -> Result<(), ReportError> {
    ensure_parent(path)?;

    let report = FullReport {
        summary: results.summary(),
        entries: results.entries(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;

    log::info!("💾 Full report saved to: {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FailureReason;
    use tempfile::TempDir;

    #[test]
    fn report_has_header_and_one_row_per_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("urls_with_chatbots.csv");

        write_report(&path, &["https://a.example", "https://b.example/?q=1,2"]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "URL\nhttps://a.example\n\"https://b.example/?q=1,2\"\n"
        );
    }

    #[test]
    fn report_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        write_report(&path, &["https://old.example", "https://older.example"]).unwrap();
        let empty: [&str; 0] = [];
        write_report(&path, &empty).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "URL\n");
    }

    #[test]
    fn csv_text_matches_file_layout() {
        let text = format_csv(&["https://a.example".to_string()]).unwrap();
        assert_eq!(text, "URL\nhttps://a.example\n");
    }

    #[test]
    fn full_report_includes_negatives() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("full.json");
        let results = ResultSet::new(vec![
            ClassifiedEntry::classified("https://a.example", true),
            ClassifiedEntry::failed("https://b.example", FailureReason::NonOkStatus(503)),
        ]);

        write_full_report(&path, &results).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["with_chatbot"], 1);
        assert_eq!(json["entries"][1]["url"], "https://b.example");
        assert_eq!(json["entries"][1]["has_chatbot"], false);
        assert_eq!(json["entries"][1]["failure"]["status"], 503);
    }
}
