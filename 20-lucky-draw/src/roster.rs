//! Roster import from a spreadsheet.
//!
//! The template has a banner in its first row, column headers in the second
//! and one participant per row after that. Only the name column is required;
//! rows without an employee code get their 1-based position as id.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::error::ImportError;
use crate::model::{Participant, ParticipantId};

const ID_HEADERS: &[&str] = &["mã nhân viên", "mã nv", "employee code", "employee id", "id"];
const NAME_HEADERS: &[&str] = &["họ tên", "họ và tên", "full name", "name"];
const CENTER_HEADERS: &[&str] = &["trung tâm", "center"];
const POSITION_HEADERS: &[&str] = &["chức vụ", "position"];

/// A spreadsheet cell, reduced to what the importer cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl CellValue {
    fn text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
        }
    }

    fn id(&self) -> Option<ParticipantId> {
        match self {
            CellValue::Int(i) => Some(ParticipantId::Number(*i)),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(ParticipantId::Number(*f as i64))
            }
            other => other.text().map(ParticipantId::Text),
        }
    }

    fn is_empty(&self) -> bool {
        self.text().is_none()
    }
}

impl From<&Data> for CellValue {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            other => CellValue::Text(other.to_string()),
        }
    }
}

struct Columns {
    id: Option<usize>,
    name: usize,
    center: Option<usize>,
    position: Option<usize>,
}

fn find_column(header: &[CellValue], aliases: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        cell.text()
            .map(|text| text.to_lowercase())
            .is_some_and(|text| aliases.contains(&text.as_str()))
    })
}

fn locate_columns(header: &[CellValue]) -> Result<Columns, ImportError> {
    let name = find_column(header, NAME_HEADERS).ok_or(ImportError::MissingColumn {
        expected: NAME_HEADERS[0],
    })?;
    Ok(Columns {
        id: find_column(header, ID_HEADERS),
        name,
        center: find_column(header, CENTER_HEADERS),
        position: find_column(header, POSITION_HEADERS),
    })
}

static EMPTY: CellValue = CellValue::Empty;

fn cell(row: &[CellValue], column: Option<usize>) -> &CellValue {
    column.and_then(|c| row.get(c)).unwrap_or(&EMPTY)
}

/// Builds a roster from raw sheet rows, starting at the sheet's first row.
pub fn import_rows(rows: &[Vec<CellValue>]) -> Result<Vec<Participant>, ImportError> {
    let header = rows.get(1).ok_or(ImportError::MissingHeader)?;
    let columns = locate_columns(header)?;

    let mut participants = Vec::new();
    for (offset, row) in rows.iter().enumerate().skip(2) {
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        let ordinal = participants.len() as i64 + 1;
        let name = cell(row, Some(columns.name))
            .text()
            .ok_or(ImportError::MissingName { row: offset + 1 })?;
        let id = cell(row, columns.id)
            .id()
            .unwrap_or(ParticipantId::Number(ordinal));
        participants.push(Participant {
            id,
            name,
            center: cell(row, columns.center).text(),
            position: cell(row, columns.position).text(),
        });
    }

    debug!(rows = rows.len(), participants = participants.len(), "parsed roster rows");
    Ok(participants)
}

/// Reads the first worksheet of an `.xlsx`, `.xls` or `.ods` file.
pub fn import_file(path: &Path) -> Result<Vec<Participant>, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| ImportError::Open {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|err| ImportError::Open {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    // The range starts at the first used cell; pad it back to A1 so row
    // positions match the template.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(CellValue::from));
        cells
    }));

    let participants = import_rows(&rows)?;
    info!(path = %path.display(), participants = participants.len(), "roster imported");
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn banner_and_header(header: Vec<CellValue>) -> Vec<Vec<CellValue>> {
        vec![vec![text("DANH SÁCH NHÂN VIÊN")], header]
    }

    #[test]
    fn reads_codes_and_names_after_banner() {
        let mut rows = banner_and_header(vec![text("STT"), text("Mã nhân viên"), text("Họ tên")]);
        rows.push(vec![CellValue::Int(1), text("MN001"), text("Nguyễn Văn A")]);
        rows.push(vec![CellValue::Int(2), CellValue::Float(1024.0), text(" Trần Thị B ")]);

        let roster = import_rows(&rows).expect("import");

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, ParticipantId::Text("MN001".into()));
        assert_eq!(roster[1].id, ParticipantId::Number(1024));
        assert_eq!(roster[1].name, "Trần Thị B");
    }

    #[test]
    fn missing_codes_fall_back_to_ordinal() {
        let mut rows = banner_and_header(vec![text("Full name"), text("Position")]);
        rows.push(vec![text("Alice"), text("Engineer")]);
        rows.push(vec![CellValue::Empty, CellValue::Empty]);
        rows.push(vec![text("Bob")]);

        let roster = import_rows(&rows).expect("import");

        assert_eq!(roster[0].id, ParticipantId::Number(1));
        assert_eq!(roster[0].position.as_deref(), Some("Engineer"));
        assert_eq!(roster[1].id, ParticipantId::Number(2));
        assert_eq!(roster[1].position, None);
    }

    #[test]
    fn blank_code_cell_uses_ordinal() {
        let mut rows = banner_and_header(vec![text("Mã nhân viên"), text("Họ tên")]);
        rows.push(vec![text("  "), text("Alice")]);
        let roster = import_rows(&rows).expect("import");
        assert_eq!(roster[0].id, ParticipantId::Number(1));
    }

    #[test]
    fn header_without_name_column_is_rejected() {
        let rows = banner_and_header(vec![text("Mã nhân viên")]);
        assert!(matches!(
            import_rows(&rows),
            Err(ImportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn nameless_row_reports_sheet_row() {
        let mut rows = banner_and_header(vec![text("Mã nhân viên"), text("Họ tên")]);
        rows.push(vec![text("MN1"), text("Alice")]);
        rows.push(vec![text("MN2")]);
        assert!(matches!(
            import_rows(&rows),
            Err(ImportError::MissingName { row: 4 })
        ));
    }

    #[test]
    fn sheet_without_header_is_rejected() {
        let rows = vec![vec![text("banner only")]];
        assert!(matches!(import_rows(&rows), Err(ImportError::MissingHeader)));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = import_file(Path::new("/definitely/not/here.xlsx"));
        assert!(matches!(result, Err(ImportError::Open { .. })));
    }
}
