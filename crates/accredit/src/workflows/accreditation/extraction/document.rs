use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Document kinds accepted for verification, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Csv,
    Json,
    Image,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(extension.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Image => "image",
        }
    }
}

/// A unit of extracted text: a file, a CSV row, a serialized JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub index: usize,
    pub text: String,
}

pub fn read_text_blocks<R: Read>(
    format: DocumentFormat,
    mut reader: R,
) -> Result<Vec<TextBlock>, ExtractionError> {
    match format {
        DocumentFormat::Txt => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Ok(vec![TextBlock {
                index: 0,
                text: String::from_utf8_lossy(&bytes).into_owned(),
            }])
        }
        DocumentFormat::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_reader(reader);
            let mut blocks = Vec::new();
            // Cells are decoded lossily so one stray byte cannot discard the other rows.
            for (index, record) in csv_reader.byte_records().enumerate() {
                let record = record?;
                let cells = record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect::<Vec<_>>();
                blocks.push(TextBlock {
                    index,
                    text: cells.join(" | "),
                });
            }
            Ok(blocks)
        }
        DocumentFormat::Json => {
            let value: serde_json::Value = serde_json::from_reader(reader)?;
            Ok(vec![TextBlock {
                index: 0,
                text: serde_json::to_string_pretty(&value)?,
            }])
        }
        DocumentFormat::Image => Ok(Vec::new()),
        DocumentFormat::Pdf | DocumentFormat::Docx => {
            Err(ExtractionError::ParserUnavailable(format))
        }
    }
}

pub fn join_blocks(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
