//! Roster enrichment: attendance code, 2nd period teacher and contact emails
//! joined in by student ID, then the skippers staged for the mail-out.

use crate::config::{Config, RosterLayout};
use crate::core::headers::reconcile;
use crate::core::lookup::StudentLookup;
use crate::core::roster;
use crate::db::log::record;
use crate::db::{CellRange, FontWeight, Sheet, Workbook};
use crate::errors::{AppError, AppResult};
use crate::models::dataset::cell_at;
use crate::models::{CellValue, Dataset, ReportKind, Row, SENTINEL};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub roster: String,
    pub data_rows: usize,
    pub attendance_matches: usize,
    pub course_matches: usize,
    pub contact_matches: usize,
    pub headers_restored: bool,
    pub skippers: usize,
}

/// The three lookups one enrichment run joins against.
struct Sources {
    attendance: StudentLookup,
    courses: StudentLookup,
    contacts: StudentLookup,
}

/// Derived column blocks, one row per roster data row.
#[derive(Default)]
struct DerivedColumns {
    codes: Vec<Row>,
    teachers: Vec<Row>,
    contacts: Vec<Row>,
}

pub struct EnrichLogic;

impl EnrichLogic {
    pub fn run(wb: &Workbook, cfg: &Config, roster_name: Option<&str>) -> AppResult<EnrichSummary> {
        let layout = cfg.roster_layout()?;

        // Preconditions first: nothing is written until they all hold.
        let roster = roster::locate(wb, cfg, roster_name)?;
        let data_rows = roster::require_data(wb, &roster, layout.header_rows)?;
        let source_sheets = Self::require_sources(wb, cfg)?;

        info!(roster = %roster.name, data_rows, "enriching roster");

        let reconciliation = reconcile(wb, &roster, &layout.band)?;
        let sources = Self::build_lookups(wb, cfg, &source_sheets)?;

        // Derived columns
        let width = wb.last_column(&roster)?.max(layout.width());
        let grid = wb.get_range(&roster, CellRange::new(layout.header_rows, 0, data_rows, width))?;

        let mut summary = EnrichSummary {
            roster: roster.name.clone(),
            data_rows,
            headers_restored: reconciliation.restored,
            ..Default::default()
        };
        let derived = derive_columns(&grid, &layout, &sources, &mut summary);

        let first = layout.header_rows;
        wb.set_range(&roster, first, layout.attendance_code.index(), &derived.codes)?;
        wb.set_range(&roster, first, layout.teacher.index(), &derived.teachers)?;
        wb.set_range(&roster, first, layout.contacts[0].index(), &derived.contacts)?;
        debug!(roster = %roster.name, rows = data_rows, "derived columns written");

        // Skippers
        let skippers = collect_skippers(&wb.values(&roster)?, &layout);
        summary.skippers = skippers.len();
        Self::replace_staging(wb, cfg, &skippers)?;

        record(
            &wb.conn,
            "enrich",
            &roster.name,
            &format!(
                "{} rows, {} skippers (attendance {}, courses {}, contacts {}){}",
                summary.data_rows,
                summary.skippers,
                summary.attendance_matches,
                summary.course_matches,
                summary.contact_matches,
                if summary.headers_restored {
                    ", headers restored"
                } else {
                    ""
                }
            ),
        )?;

        info!(roster = %roster.name, skippers = summary.skippers, "enrichment finished");
        Ok(summary)
    }

    /// Source sheets in attendance, courses, contacts order.
    fn require_sources(wb: &Workbook, cfg: &Config) -> AppResult<[Sheet; 3]> {
        let find = |kind: ReportKind| -> AppResult<Sheet> {
            let name = cfg.reports.target(kind).sheet;
            wb.sheet_by_name(name)?
                .ok_or_else(|| AppError::SourceTableMissing(name.to_string()))
        };
        Ok([
            find(ReportKind::Attendance)?,
            find(ReportKind::Courses)?,
            find(ReportKind::Contacts)?,
        ])
    }

    fn build_lookups(wb: &Workbook, cfg: &Config, sheets: &[Sheet; 3]) -> AppResult<Sources> {
        let [attendance_sheet, courses_sheet, contacts_sheet] = sheets;
        let a = &cfg.reports.attendance;
        let c = &cfg.reports.courses;
        let k = &cfg.reports.contacts;

        Ok(Sources {
            attendance: StudentLookup::build(&wb.values(attendance_sheet)?, 1, a.id_column, &[a.code_column]),
            courses: StudentLookup::build(&wb.values(courses_sheet)?, 1, c.id_column, &[c.teacher_column]),
            contacts: StudentLookup::build(
                &wb.values(contacts_sheet)?,
                1,
                k.id_column,
                &[
                    k.student_email_column,
                    k.guardian1_email_column,
                    k.guardian2_email_column,
                ],
            ),
        })
    }

    /// Rebuild the staging sheet from scratch with the given rows.
    fn replace_staging(wb: &Workbook, cfg: &Config, rows: &[Row]) -> AppResult<()> {
        let headers = &cfg.staging.headers;
        let staging = wb.get_or_create_sheet(&cfg.staging.sheet)?;
        wb.clear_rows_from(&staging, 1)?;

        let current = wb.get_range(&staging, CellRange::new(0, 0, 1, headers.len()))?;
        if current.iter().flatten().all(CellValue::is_blank) {
            let header_row: Row = headers.iter().map(|h| CellValue::text(h.clone())).collect();
            wb.set_range(&staging, 0, 0, &[header_row])?;
            wb.set_font_weight(&staging, CellRange::new(0, 0, 1, headers.len()), FontWeight::Bold)?;
        }

        wb.set_range(&staging, 1, 0, rows)?;
        debug!(sheet = %staging.name, rows = rows.len(), "staging replaced");
        Ok(())
    }
}

fn derive_columns(
    grid: &[Row],
    layout: &RosterLayout,
    sources: &Sources,
    summary: &mut EnrichSummary,
) -> DerivedColumns {
    let mut out = DerivedColumns::default();
    let existing = |row: &Row, cols: &[usize]| -> Row {
        cols.iter().map(|c| cell_at(row, *c).clone()).collect()
    };
    let contact_cols: Vec<usize> = layout.contacts.iter().map(|c| c.index()).collect();

    for row in grid {
        let id = cell_at(row, layout.id.index()).trimmed_text();

        if id.is_empty() {
            out.codes.push(existing(row, &[layout.attendance_code.index()]));
            out.teachers.push(existing(row, &[layout.teacher.index()]));
            out.contacts.push(existing(row, contact_cols.as_slice()));
            continue;
        }

        let code = match sources.attendance.get(&id) {
            Some(values) => {
                summary.attendance_matches += 1;
                values.first().cloned().unwrap_or_default()
            }
            None => CellValue::sentinel(),
        };

        let teacher = match sources.courses.first(&id) {
            Some(v) => {
                summary.course_matches += 1;
                v.clone()
            }
            None => CellValue::Empty,
        };

        let contacts = match sources.contacts.get(&id) {
            Some(values) => {
                summary.contact_matches += 1;
                values.to_vec()
            }
            None => vec![CellValue::Empty; 3],
        };

        trace!(id = %id, code = %code, "roster row enriched");
        out.codes.push(vec![code]);
        out.teachers.push(vec![teacher]);
        out.contacts.push(contacts);
    }

    out
}

/// Full copies of the roster rows flagged with the sentinel.
fn collect_skippers(roster: &Dataset, layout: &RosterLayout) -> Vec<Row> {
    let width = roster.width().max(layout.width());
    roster
        .data_rows(layout.header_rows)
        .iter()
        .filter(|row| {
            !cell_at(row, layout.id.index()).is_blank()
                && cell_at(row, layout.attendance_code.index()).trimmed_text() == SENTINEL
        })
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, CellValue::Empty);
            row
        })
        .collect()
}
