/// Table types and implementation for DOCX documents.
use super::paragraph::Paragraph;
use crate::common::Result;
use crate::common::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// A table with a fixed grid of cells.
#[derive(Debug, Clone)]
pub struct Table {
    /// Table rows
    pub(crate) rows: Vec<Row>,
    /// Table style ID
    pub(crate) style: Option<String>,
    /// Grid column width in twips
    pub(crate) column_width: i64,
}

impl Table {
    pub(crate) fn new(rows: usize, cols: usize, column_width: i64) -> Self {
        Self {
            rows: (0..rows).map(|_| Row::new(cols, column_width)).collect(),
            style: None,
            column_width,
        }
    }

    /// Get a cell by row and column index.
    pub fn cell(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.cell(col)
    }

    /// Get a row by index.
    pub fn row(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Row::cell_count)
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:tbl>");

        xml.push_str("<w:tblPr>");
        if let Some(ref style) = self.style {
            write!(xml, "<w:tblStyle w:val=\"{}\"/>", escape_xml(style))?;
        }
        xml.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
        xml.push_str("<w:tblLook w:val=\"04A0\" w:firstRow=\"1\" w:lastRow=\"0\" w:firstColumn=\"1\" w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/>");
        xml.push_str("</w:tblPr>");

        xml.push_str("<w:tblGrid>");
        for _ in 0..self.column_count() {
            write!(xml, "<w:gridCol w:w=\"{}\"/>", self.column_width)?;
        }
        xml.push_str("</w:tblGrid>");

        for row in &self.rows {
            row.to_xml(xml)?;
        }

        xml.push_str("</w:tbl>");
        Ok(())
    }
}

/// A table row.
#[derive(Debug, Clone)]
pub struct Row {
    pub(crate) cells: Vec<Cell>,
}

impl Row {
    fn new(cols: usize, width: i64) -> Self {
        Self {
            cells: (0..cols).map(|_| Cell::new(width)).collect(),
        }
    }

    /// Get a cell by index.
    pub fn cell(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:tr>");
        for cell in &self.cells {
            cell.to_xml(xml)?;
        }
        xml.push_str("</w:tr>");
        Ok(())
    }
}

/// A table cell. A cell always holds at least one paragraph.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) paragraphs: Vec<Paragraph>,
    /// Cell width in twips
    width: i64,
}

impl Cell {
    fn new(width: i64) -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
            width,
        }
    }

    /// Replace the cell content with a single paragraph holding `text`.
    pub fn set_text(&mut self, text: &str) -> &mut Paragraph {
        self.paragraphs.clear();
        self.add_paragraph(text)
    }

    /// Add a new paragraph to the cell.
    pub fn add_paragraph(&mut self, text: &str) -> &mut Paragraph {
        let mut para = Paragraph::new();
        if !text.is_empty() {
            para.add_run_with_text(text);
        }
        self.paragraphs.push(para);
        let index = self.paragraphs.len() - 1;
        &mut self.paragraphs[index]
    }

    /// Get a paragraph by index.
    pub fn paragraph(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(index)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:tc>");
        write!(xml, "<w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>", self.width)?;

        if self.paragraphs.is_empty() {
            // A cell must end with a paragraph
            xml.push_str("<w:p/>");
        }
        for para in &self.paragraphs {
            para.to_xml(xml)?;
        }

        xml.push_str("</w:tc>");
        Ok(())
    }
}
