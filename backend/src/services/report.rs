//! Report assembler.
//!
//! [`assemble`] builds the in-memory [`TabularReport`]; [`to_sheets`] lays it
//! out as the three worksheets of the downloadable workbook. Encoding the
//! sheets into a binary spreadsheet is left to the client.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::metrics::{compute_two_stage_average, record_average, round_to, summarize_device};
use crate::models::row::hour_label;
use crate::models::{DeviceClass, RankRecord, HOURS_PER_DAY};
use crate::routes::insight::NormalizedInsight;
use crate::routes::report::{
    Cell, DetailBlock, DetailRow, DeviceComparison, EntityComparisonRow, NarrativeSection,
    ReportDocument, Sheet, TabularReport,
};

pub const DASHBOARD_SHEET: &str = "01_Dashboard_&_Insight";
pub const DESKTOP_DETAIL_SHEET: &str = "02_PC_Detail_Log";
pub const MOBILE_DETAIL_SHEET: &str = "03_Mobile_Detail_Log";

pub const SECTION_OVERALL: &str = "전체 분석";
pub const SECTION_MEDIA_ASYMMETRY: &str = "매체 비대칭";
pub const SECTION_COMPETITORS: &str = "순위 변동";
pub const SECTION_GOLDEN_TIME: &str = "최적 입찰시간대";
pub const SECTION_ACTIONS: &str = "입찰 전략";

const EMPTY_LINE: &str = "-";

/// Workbook file name for a report generated on `date`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("경쟁사_순위_분석_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Compose comparison, narrative and detail blocks from the raw records.
pub fn assemble(records: &[RankRecord], insight: &NormalizedInsight) -> TabularReport {
    TabularReport {
        device_comparison: device_comparison(records),
        entity_comparison: entity_comparison(records),
        narrative: narrative_sections(insight),
        desktop_detail: detail_block(records, DeviceClass::Desktop),
        mobile_detail: detail_block(records, DeviceClass::Mobile),
    }
}

/// Report, worksheet layout and file name in one response object.
pub fn build_document(
    records: &[RankRecord],
    insight: &NormalizedInsight,
    date: NaiveDate,
) -> ReportDocument {
    let report = assemble(records, insight);
    let sheets = to_sheets(&report);
    ReportDocument {
        file_name: report_file_name(date),
        report,
        sheets,
    }
}

pub fn device_comparison(records: &[RankRecord]) -> DeviceComparison {
    let desktop = summarize_device(records, DeviceClass::Desktop);
    let mobile = summarize_device(records, DeviceClass::Mobile);
    DeviceComparison {
        advertiser_count_diff: desktop.advertiser_count.abs_diff(mobile.advertiser_count),
        average_rank_diff: (desktop.average_rank - mobile.average_rank).abs(),
        intensity_diff: desktop
            .competition_intensity
            .abs_diff(mobile.competition_intensity),
        desktop,
        mobile,
    }
}

/// One row per distinct advertiser, sorted by ascending device gap.
///
/// Per-device averages use the two-stage mean; a device without records for
/// the advertiser contributes `0`.
pub fn entity_comparison(records: &[RankRecord]) -> Vec<EntityComparisonRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (Vec<&RankRecord>, Vec<&RankRecord>)> = HashMap::new();
    for record in records {
        let name = record.entity_name.as_str();
        let entry = groups.entry(name).or_insert_with(|| {
            order.push(name);
            (Vec::new(), Vec::new())
        });
        match record.device {
            DeviceClass::Desktop => entry.0.push(record),
            DeviceClass::Mobile => entry.1.push(record),
        }
    }

    let mut rows: Vec<EntityComparisonRow> = order
        .into_iter()
        .filter_map(|name| {
            let (desktop, mobile) = groups.get(name)?;
            let desktop_average = compute_two_stage_average(desktop.iter().copied());
            let mobile_average = compute_two_stage_average(mobile.iter().copied());
            let reference_url = desktop
                .first()
                .or_else(|| mobile.first())
                .map(|r| r.reference_url.clone())
                .unwrap_or_default();
            Some(EntityComparisonRow {
                entity_name: name.to_string(),
                reference_url,
                desktop_average,
                mobile_average,
                difference: (desktop_average - mobile_average).abs(),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.difference.total_cmp(&b.difference));
    rows
}

pub fn narrative_sections(insight: &NormalizedInsight) -> Vec<NarrativeSection> {
    let competitors = insight
        .competitor_groups
        .iter()
        .flat_map(|group| {
            let mut lines = vec![group.label.clone()];
            if group.items.is_empty() {
                lines.push(EMPTY_LINE.to_string());
            } else {
                lines.extend(group.items.iter().map(|item| format!("- {}", item)));
            }
            lines
        })
        .collect();

    let golden = insight
        .golden_windows
        .iter()
        .map(|window| {
            let value = if window.value.is_empty() {
                EMPTY_LINE
            } else {
                window.value.as_str()
            };
            format!("{}: {}", window.label, value)
        })
        .collect();

    vec![
        NarrativeSection {
            title: SECTION_OVERALL.to_string(),
            lines: insight.overall.clone(),
        },
        NarrativeSection {
            title: SECTION_MEDIA_ASYMMETRY.to_string(),
            lines: insight.media_asymmetry.clone(),
        },
        NarrativeSection {
            title: SECTION_COMPETITORS.to_string(),
            lines: competitors,
        },
        NarrativeSection {
            title: SECTION_GOLDEN_TIME.to_string(),
            lines: golden,
        },
        NarrativeSection {
            title: SECTION_ACTIONS.to_string(),
            lines: insight.action_items.clone(),
        },
    ]
}

/// Records of `device`, ascending by their own observed-hour mean.
pub fn detail_block(records: &[RankRecord], device: DeviceClass) -> DetailBlock {
    let mut subset: Vec<(&RankRecord, f64)> = records
        .iter()
        .filter(|r| r.device == device)
        .map(|r| (r, record_average(r)))
        .collect();
    subset.sort_by(|a, b| a.1.total_cmp(&b.1));

    let rows = subset
        .into_iter()
        .enumerate()
        .map(|(idx, (record, average))| {
            let mut hours = [0.0; HOURS_PER_DAY];
            for (hour, slot) in hours.iter_mut().enumerate() {
                *slot = record.hourly.raw(hour);
            }
            DetailRow {
                position: idx + 1,
                entity_name: record.entity_name.clone(),
                reference_url: record.reference_url.clone(),
                average,
                hours,
            }
        })
        .collect();

    DetailBlock { device, rows }
}

fn number(value: f64) -> Cell {
    Cell::Number(round_to(value, 1))
}

fn integer(value: usize) -> Cell {
    Cell::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

fn text_row(text: &str) -> Vec<Cell> {
    vec![Cell::text(text)]
}

fn dashboard_rows(report: &TabularReport) -> Vec<Vec<Cell>> {
    let cmp = &report.device_comparison;
    let mut rows = vec![
        text_row("매체 비교"),
        vec![
            Cell::text("구분"),
            Cell::text(DeviceClass::Desktop.label()),
            Cell::text(DeviceClass::Mobile.label()),
            Cell::text("차이(절댓값)"),
        ],
        vec![
            Cell::text("전체 광고주 수"),
            integer(cmp.desktop.advertiser_count),
            integer(cmp.mobile.advertiser_count),
            integer(cmp.advertiser_count_diff),
        ],
        vec![
            Cell::text("평균 순위"),
            number(cmp.desktop.average_rank),
            number(cmp.mobile.average_rank),
            number(cmp.average_rank_diff),
        ],
        vec![
            Cell::text("경쟁 강도(1~5)"),
            Cell::Integer(i64::from(cmp.desktop.competition_intensity)),
            Cell::Integer(i64::from(cmp.mobile.competition_intensity)),
            Cell::Integer(i64::from(cmp.intensity_diff)),
        ],
        Vec::new(),
        text_row("광고주 비교"),
        vec![
            Cell::text("광고주"),
            Cell::text("URL"),
            Cell::text("PC 평균 순위"),
            Cell::text("Mobile 평균 순위"),
            Cell::text("차이(절댓값)"),
        ],
    ];

    rows.extend(report.entity_comparison.iter().map(|row| {
        vec![
            Cell::text(&row.entity_name),
            Cell::text(&row.reference_url),
            number(row.desktop_average),
            number(row.mobile_average),
            number(row.difference),
        ]
    }));

    for section in &report.narrative {
        rows.push(Vec::new());
        rows.push(text_row(&section.title));
        rows.extend(section.lines.iter().map(|line| text_row(line)));
    }
    rows
}

fn detail_rows(block: &DetailBlock) -> Vec<Vec<Cell>> {
    let mut header = vec![
        Cell::text("순위"),
        Cell::text("광고주"),
        Cell::text("URL"),
        Cell::text("평균 순위"),
    ];
    header.extend((0..HOURS_PER_DAY).map(|hour| Cell::text(hour_label(hour))));

    let mut rows = vec![text_row("원본 데이터"), header];
    rows.extend(block.rows.iter().map(|row| {
        let mut cells = vec![
            integer(row.position),
            Cell::text(&row.entity_name),
            Cell::text(&row.reference_url),
            number(row.average),
        ];
        cells.extend(row.hours.iter().map(|&value| number(value)));
        cells
    }));
    rows
}

/// Lay the report out as worksheets, rounding numbers to one decimal.
pub fn to_sheets(report: &TabularReport) -> Vec<Sheet> {
    vec![
        Sheet {
            name: DASHBOARD_SHEET.to_string(),
            rows: dashboard_rows(report),
        },
        Sheet {
            name: DESKTOP_DETAIL_SHEET.to_string(),
            rows: detail_rows(&report.desktop_detail),
        },
        Sheet {
            name: MOBILE_DETAIL_SHEET.to_string(),
            rows: detail_rows(&report.mobile_detail),
        },
    ]
}
