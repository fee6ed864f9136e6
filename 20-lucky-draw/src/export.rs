//! Results workbook: one sheet per award that has winners.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::ExportError;
use crate::model::{Award, ParticipantId};

pub const FILE_PREFIX: &str = "ket-qua-quay-thuong";
pub const HEADERS: [&str; 3] = ["Giải thưởng", "Mã nhân viên", "Họ tên"];

const SHEET_NAME_LIMIT: usize = 31;
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Turns an award title into a sheet name Excel accepts and that is not
/// already in `taken`.
pub fn sheet_name(title: &str, taken: &HashSet<String>) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    let base = if cleaned.is_empty() { "Sheet" } else { cleaned };

    let truncated: String = base.chars().take(SHEET_NAME_LIMIT).collect();
    if !taken.contains(&truncated.to_lowercase()) {
        return truncated;
    }

    (2..)
        .map(|n| {
            let suffix = format!(" ({n})");
            let keep = SHEET_NAME_LIMIT - suffix.chars().count();
            let head: String = base.chars().take(keep).collect();
            format!("{head}{suffix}")
        })
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or(truncated)
}

/// The file name for an export made at `now`.
pub fn file_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{FILE_PREFIX}-{millis}.xlsx")
}

/// Writes the results workbook into `out_dir`.
///
/// Returns `None` without touching the disk when no award has a winner yet.
pub fn export_results(awards: &[Award], out_dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    let drawn: Vec<&Award> = awards.iter().filter(|a| !a.winners.is_empty()).collect();
    if drawn.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(out_dir).map_err(|source| ExportError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let mut taken = HashSet::new();

    for award in drawn {
        let name = sheet_name(&award.title, &taken);
        taken.insert(name.to_lowercase());

        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }
        for (i, winner) in award.winners.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &award.title)?;
            match &winner.id {
                ParticipantId::Number(n) => sheet.write_number(row, 1, *n as f64)?,
                ParticipantId::Text(s) => sheet.write_string(row, 1, s)?,
            };
            sheet.write_string(row, 2, &winner.name)?;
        }
    }

    let path = out_dir.join(file_name(SystemTime::now()));
    workbook.save(&path)?;
    info!(path = %path.display(), "results exported");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::Participant;

    #[test]
    fn long_titles_are_truncated_to_31_chars() {
        let name = sheet_name("Giải khuyến khích dành cho nhân viên xuất sắc", &HashSet::new());
        assert_eq!(name.chars().count(), 31);
        assert!(name.starts_with("Giải khuyến khích"));
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        assert_eq!(sheet_name("Q1/Q2: [top]?", &HashSet::new()), "Q1_Q2_ _top__");
        assert_eq!(sheet_name("''", &HashSet::new()), "Sheet");
    }

    #[test]
    fn duplicate_names_get_a_suffix() {
        let mut taken = HashSet::new();
        taken.insert("gold".to_string());
        assert_eq!(sheet_name("Gold", &taken), "Gold (2)");

        let long = "x".repeat(40);
        taken.insert("x".repeat(31));
        let name = sheet_name(&long, &taken);
        assert_eq!(name.chars().count(), 31);
        assert!(name.ends_with(" (2)"));
    }

    #[test]
    fn file_name_carries_timestamp() {
        let at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(file_name(at), "ket-qua-quay-thuong-1700000000123.xlsx");
    }

    #[test]
    fn nothing_to_export_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("lucky-draw-export-{}", nanoid::nanoid!()));
        let awards = vec![Award {
            id: "a".into(),
            title: "A".into(),
            count: 1,
            winners: Vec::new(),
        }];

        assert!(export_results(&awards, &dir).expect("export").is_none());
        assert!(export_results(&[], &dir).expect("export").is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn writes_workbook_for_drawn_awards() {
        let dir = std::env::temp_dir().join(format!("lucky-draw-export-{}", nanoid::nanoid!()));
        let awards = vec![Award {
            id: "a".into(),
            title: "Giải Nhất".into(),
            count: 2,
            winners: vec![Participant::new("MN01", "Alice"), Participant::new(7, "Bob")],
        }];

        let path = export_results(&awards, &dir).expect("export").expect("a file");

        assert!(path.exists());
        assert!(
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(FILE_PREFIX))
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
