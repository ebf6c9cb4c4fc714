use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::LoadError;

/// Load URLs from the first column of a CSV or spreadsheet file.
///
/// Any failure is logged and yields an empty list, so a bad upload produces an
/// empty report instead of aborting the run.
pub fn load_urls(path: &Path) -> Vec<String> {
    match try_load_urls(path) {
        Ok(urls) => {
            log::info!("📋 Loaded {} URL(s) from {}", urls.len(), path.display());
            urls
        }
        Err(e) => {
            log::error!("Error loading file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Fallible form of [`load_urls`]
pub fn try_load_urls(path: &Path) -> Result<Vec<String>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xls" | "ods" => load_spreadsheet(path),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

fn load_csv(path: &Path) -> Result<Vec<String>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // No header row; rows may have differing widths
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(cell) = record.get(0).map(str::trim) {
            if !cell.is_empty() {
                urls.push(cell.to_string());
            }
        }
    }
    Ok(urls)
}

fn load_spreadsheet(path: &Path) -> Result<Vec<String>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    Ok(first_column(&range))
}

// Ranges start at the first used cell, so column A must be addressed absolutely.
fn first_column(range: &Range<Data>) -> Vec<String> {
    match range.start() {
        Some((_, 0)) => range
            .rows()
            .filter_map(|row| row.first())
            .filter_map(cell_text)
            .collect(),
        _ => Vec::new(),
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_reads_first_column_without_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "first.csv",
            "https://a.example,ignored\nhttps://b.example\n,https://c.example\n  https://d.example  ,x,y\n",
        );

        let urls = try_load_urls(&path).unwrap();

        assert_eq!(
            urls,
            vec!["https://a.example", "https://b.example", "https://d.example"]
        );
    }

    #[test]
    fn csv_keeps_duplicates_and_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "dupes.CSV",
            "https://b.example\nhttps://a.example\nhttps://b.example\n",
        );

        let urls = load_urls(&path);

        assert_eq!(
            urls,
            vec!["https://b.example", "https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn unsupported_extension_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "urls.txt", "https://a.example\n");

        assert!(matches!(
            try_load_urls(&path),
            Err(LoadError::UnsupportedFormat(_))
        ));
        assert!(load_urls(&path).is_empty());
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.csv");
        assert!(matches!(try_load_urls(&path), Err(LoadError::Io { .. })));
        assert!(load_urls(&path).is_empty());
    }

    #[test]
    fn corrupt_spreadsheet_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.xlsx", "definitely not a zip archive");
        assert!(try_load_urls(&path).is_err());
        assert!(load_urls(&path).is_empty());
    }

    #[test]
    fn sheet_starting_at_column_a_reads_it() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("https://a.example".to_string()));
        range.set_value((0, 1), Data::String("note".to_string()));
        range.set_value((2, 0), Data::String("https://b.example".to_string()));

        assert_eq!(
            first_column(&range),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn empty_column_a_yields_no_urls() {
        let mut range = Range::new((0, 1), (1, 1));
        range.set_value((0, 1), Data::String("https://b.example".to_string()));
        range.set_value((1, 1), Data::String("https://c.example".to_string()));

        assert!(first_column(&range).is_empty());
    }

    #[test]
    fn spreadsheet_cells_render_as_text() {
        assert_eq!(
            cell_text(&Data::String(" https://a.example ".to_string())),
            Some("https://a.example".to_string())
        );
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("   ".to_string())), None);
        assert_eq!(cell_text(&Data::Int(42)), Some("42".to_string()));
    }
}
