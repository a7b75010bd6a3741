use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Built-in bulletin report layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Monetary base, bulletin table 01.
    BaseMonetaria,
    /// Exports by product group, bulletin table 23.
    Exports,
    /// Imports by economic use, bulletin table 24.
    Imports,
}

impl FromStr for ReportKind {
    type Err = ExtractError;

    /// Case-insensitive construction from a string slice.
    ///
    /// Accepts `"base_monetaria"`, `"exports"` and `"imports"`; `-` may be
    /// used in place of `_`. Returns [`ExtractError::UnknownReport`] otherwise.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "base_monetaria" => Ok(ReportKind::BaseMonetaria),
            "exports" => Ok(ReportKind::Exports),
            "imports" => Ok(ReportKind::Imports),
            _ => Err(ExtractError::UnknownReport(value.to_string())),
        }
    }
}

impl ReportKind {
    /// Every built-in report, in bulletin order.
    pub const ALL: [ReportKind; 3] = [
        ReportKind::BaseMonetaria,
        ReportKind::Exports,
        ReportKind::Imports,
    ];

    /// The canonical lowercase identifier for this report.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::BaseMonetaria => "base_monetaria",
            ReportKind::Exports => "exports",
            ReportKind::Imports => "imports",
        }
    }
}

/// A vertical run of header rows shared by a group of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSpan {
    /// Zero-based columns the span applies to.
    pub columns: Vec<usize>,
    /// First header row, 1-indexed, inclusive.
    pub start_row: usize,
    /// Last header row, 1-indexed, inclusive.
    pub end_row: usize,
}

/// Column-index configuration for one report layout.
///
/// Row numbers are 1-indexed as they appear in the spreadsheet; column
/// numbers are zero-based grid indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Name used in logs and in the no-series error.
    pub name: String,
    /// Workbook file name inside the input directory.
    pub source_file: String,
    /// CSV file name inside the output directory.
    pub output_file: String,
    /// Worksheet to read; the first sheet when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// First row the scanner looks at.
    pub start_row: usize,
    pub year_col: usize,
    pub month_col: usize,
    pub value_cols: Vec<usize>,
    #[serde(default)]
    pub header_spans: Vec<HeaderSpan>,
    #[serde(default)]
    pub title_overrides: BTreeMap<usize, String>,
}

impl ReportLayout {
    /// Load a custom layout from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: ReportLayout = serde_json::from_str(&content)?;
        layout.validate()?;
        tracing::debug!(
            "Loaded layout {} from {} ({} value columns)",
            layout.name,
            path.display(),
            layout.value_cols.len()
        );
        Ok(layout)
    }

    /// Reject layouts the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.start_row == 0 {
            return Err(ExtractError::Config(format!(
                "{}: start_row is 1-indexed and must be >= 1",
                self.name
            )));
        }
        if self.value_cols.is_empty() {
            return Err(ExtractError::Config(format!(
                "{}: no value columns configured",
                self.name
            )));
        }
        for span in &self.header_spans {
            if span.start_row == 0 || span.start_row > span.end_row {
                return Err(ExtractError::Config(format!(
                    "{}: invalid header span rows {}..={}",
                    self.name, span.start_row, span.end_row
                )));
            }
        }
        Ok(())
    }

    /// The first header span that lists `col`, if any.
    pub fn header_span_for(&self, col: usize) -> Option<&HeaderSpan> {
        self.header_spans.iter().find(|s| s.columns.contains(&col))
    }
}

/// One resolved unit of work: a layout plus concrete input and output paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportJob {
    pub layout: ReportLayout,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ReportJob {
    /// Place the layout's files under `input_dir` and `output_dir`.
    pub fn in_dirs(layout: ReportLayout, input_dir: &Path, output_dir: &Path) -> Self {
        let input = input_dir.join(&layout.source_file);
        let output = output_dir.join(&layout.output_file);
        Self {
            layout,
            input,
            output,
        }
    }
}

// ── Layout data ───────────────────────────────────────────────────────────────

fn span(columns: impl IntoIterator<Item = usize>, start_row: usize, end_row: usize) -> HeaderSpan {
    HeaderSpan {
        columns: columns.into_iter().collect(),
        start_row,
        end_row,
    }
}

fn overrides(pairs: &[(usize, &str)]) -> BTreeMap<usize, String> {
    pairs
        .iter()
        .map(|(col, title)| (*col, (*title).to_string()))
        .collect()
}

fn base_monetaria() -> ReportLayout {
    ReportLayout {
        name: ReportKind::BaseMonetaria.as_str().to_string(),
        source_file: "01.xlsx".to_string(),
        output_file: "base_monetaria.csv".to_string(),
        sheet: None,
        start_row: 13,
        year_col: 0,
        month_col: 1,
        value_cols: (2..=9).chain(13..=18).collect(),
        header_spans: vec![
            span([2], 8, 12),
            span(3..=6, 9, 12),
            span(7..=9, 10, 11),
            span([13], 8, 12),
            span([14], 9, 12),
            span(15..=18, 12, 12),
        ],
        title_overrides: BTreeMap::new(),
    }
}

fn exports() -> ReportLayout {
    ReportLayout {
        name: ReportKind::Exports.as_str().to_string(),
        source_file: "23.xlsx".to_string(),
        output_file: "exports.csv".to_string(),
        sheet: None,
        start_row: 10,
        year_col: 1,
        month_col: 1,
        value_cols: (2..=23).collect(),
        header_spans: vec![
            span(2..=7, 8, 8),
            span([8], 8, 9),
            span(9..=17, 8, 8),
            span([18], 6, 9),
            span(19..=23, 6, 7),
        ],
        title_overrides: overrides(&[
            (6, "Otros Minerales"),
            (7, "Total Minerales"),
            (10, "Otros Hidrocarburos"),
            (11, "Total Hidrocarburos"),
            (16, "Otros No Tradicionales"),
            (17, "Total No Tradicionales"),
            (18, "Otros Bienes"),
            (19, "Total Declarado"),
            (20, "Bienes para Transformacion"),
            (21, "Fletes y Seguros"),
            (22, "Compra Venta Neto"),
            (23, "FOB"),
        ]),
    }
}

fn imports() -> ReportLayout {
    ReportLayout {
        name: ReportKind::Imports.as_str().to_string(),
        source_file: "24.xlsx".to_string(),
        output_file: "imports.csv".to_string(),
        sheet: None,
        start_row: 10,
        year_col: 1,
        month_col: 1,
        value_cols: (2..=21).collect(),
        header_spans: Vec::new(),
        title_overrides: overrides(&[
            (2, "BienesConsumo_NoDuradero"),
            (3, "BienesConsumo_Duradero"),
            (4, "BienesConsumo_Total"),
            (5, "MateriasPrimas_CombustiblesYLubricantes"),
            (6, "MateriasPrimas_ParaAgricultura"),
            (7, "MateriasPrimas_ParaIndustria"),
            (8, "MateriasPrimas_MaterialesConstruccion"),
            (9, "MateriasPrimas_PartesAccesoriosEquipoTransporte"),
            (10, "BienesCapital_Total"),
            (11, "BienesCapital_ParaAgricultura"),
            (12, "BienesCapital_ParaIndustria"),
            (13, "BienesCapital_EquipoTransporte"),
            (14, "BienesCapital_TotalAmpliado"),
            (15, "Diversos_Total"),
            (16, "TotalImportaciones_CIF"),
            (17, "TotalImportaciones_FOB"),
            (18, "Importaciones_ParaTransformacion"),
            (19, "ImportacionesTemporales_VehiculosYAeronaves"),
            (20, "TotalImportaciones_CIF2"),
            (21, "TotalImportaciones_FOBAjustado_MillonesUSD"),
        ]),
    }
}

/// Registry of the built-in report layouts.
pub struct Layouts;

impl Layouts {
    /// Return the layout for a specific [`ReportKind`].
    pub fn get(kind: ReportKind) -> ReportLayout {
        match kind {
            ReportKind::BaseMonetaria => base_monetaria(),
            ReportKind::Exports => exports(),
            ReportKind::Imports => imports(),
        }
    }

    /// Every built-in layout, in bulletin order.
    pub fn all() -> Vec<ReportLayout> {
        ReportKind::ALL.into_iter().map(Self::get).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
