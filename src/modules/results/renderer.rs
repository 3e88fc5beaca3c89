//! Result document rendering.
//!
//! Rendering happens in two steps: [`compose_lines`] lays the student and
//! marks out as a flat list of styled lines, and [`build_pdf`] paginates those
//! lines onto US Letter pages with `lopdf`. [`ResultRenderer::render`] runs
//! both on the blocking pool and writes the bytes through the artifact store,
//! resolving only once the file is durable.

use std::sync::Arc;

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use resultmail_core::{ArtifactHandle, ArtifactStore, StorageError};
use resultmail_models::{MarksRecord, StudentRecord};
use thiserror::Error;
use tracing::instrument;

pub const DOCUMENT_TITLE: &str = "Student Result";

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 14.0;
const LEADING: f32 = 1.2;
// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to store artifact: {0}")]
    Storage(#[from] StorageError),

    #[error("render task failed: {0}")]
    Task(String),

    #[error("rendered document is empty")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Body,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    pub style: LineStyle,
    pub text: String,
}

impl DocumentLine {
    fn title(text: &str) -> Self {
        Self {
            style: LineStyle::Title,
            text: text.to_string(),
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self {
            style: LineStyle::Body,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self {
            style: LineStyle::Blank,
            text: String::new(),
        }
    }

    fn font_size(&self) -> f32 {
        match self.style {
            LineStyle::Title => TITLE_SIZE,
            LineStyle::Body | LineStyle::Blank => BODY_SIZE,
        }
    }

    fn height(&self) -> f32 {
        self.font_size() * LEADING
    }
}

/// Lay out a result document in its fixed order.
pub fn compose_lines(student: &StudentRecord, marks: &MarksRecord) -> Vec<DocumentLine> {
    let mut lines = vec![
        DocumentLine::title(DOCUMENT_TITLE),
        DocumentLine::blank(),
        DocumentLine::body(format!("Name: {}", student.full_name())),
        DocumentLine::body(format!("Enrollment No: {}", student.enrollment_no())),
        DocumentLine::body(format!("Branch: {}", student.branch())),
        DocumentLine::body(format!("Semester: {}", student.semester())),
    ];

    let sections = [
        ("Internal Marks:", marks.internal_entries()),
        ("External Marks:", marks.external_entries()),
    ];
    for (heading, entries) in sections {
        lines.push(DocumentLine::blank());
        lines.push(DocumentLine::body(heading));
        lines.extend(
            entries
                .into_iter()
                .map(|(subject, mark)| DocumentLine::body(format!("{}: {}", subject, mark))),
        );
    }

    lines
}

/// A line with its position on a page, in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
}

/// Split lines into pages. Overlong body lines are wrapped first.
pub fn paginate(lines: &[DocumentLine]) -> Vec<Vec<PlacedLine>> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = vec![Vec::new()];
    let mut cursor = top;

    for line in lines.iter().flat_map(wrap_line) {
        let height = line.height();
        if cursor - height < MARGIN && cursor < top {
            pages.push(Vec::new());
            cursor = top;
        }
        cursor -= height;

        if line.style == LineStyle::Blank {
            continue;
        }

        let size = line.font_size();
        let x = match line.style {
            LineStyle::Title => {
                let width = text_width(&line.text, size);
                ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
            }
            _ => MARGIN,
        };

        if let Some(page) = pages.last_mut() {
            page.push(PlacedLine {
                x,
                y: cursor,
                size,
                text: line.text,
            });
        }
    }

    pages
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH
}

fn wrap_line(line: &DocumentLine) -> Vec<DocumentLine> {
    let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (line.font_size() * AVG_GLYPH_WIDTH)) as usize;
    if line.style != LineStyle::Body || line.text.chars().count() <= max_chars {
        return vec![line.clone()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.text.split(' ') {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > max_chars && !current.is_empty() {
            wrapped.push(DocumentLine::body(std::mem::take(&mut current)));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        // A single word longer than the line is hard-split.
        while current.chars().count() > max_chars {
            let split_at = current
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(current.len());
            let rest = current.split_off(split_at);
            wrapped.push(DocumentLine::body(std::mem::replace(&mut current, rest)));
        }
    }
    if !current.is_empty() {
        wrapped.push(DocumentLine::body(current));
    }
    wrapped
}

/// Encode text for a WinAnsi Helvetica font.
///
/// Latin-1 maps directly; anything else is transliterated to ASCII.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if (0x20..0x7F).contains(&code) || (0xA0..=0xFF).contains(&code) {
            out.push(code as u8);
        } else if c.is_control() {
            out.push(b' ');
        } else {
            let ascii = deunicode::deunicode_char(c).unwrap_or("?");
            out.extend(ascii.bytes().filter(|b| (0x20..0x7F).contains(b)));
        }
    }
    out
}

/// Document information dictionary values.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
}

impl DocumentInfo {
    pub fn for_student(student: &StudentRecord) -> Self {
        Self {
            title: DOCUMENT_TITLE.to_string(),
            subject: format!("Enrollment No: {}", student.enrollment_no()),
        }
    }
}

/// Paginate `lines` and serialize them as a PDF.
pub fn build_pdf(lines: &[DocumentLine], info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for page in paginate(lines) {
        let mut operations = Vec::with_capacity(page.len() * 5);
        for placed in page {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), placed.size.into()]));
            operations.push(Operation::new("Td", vec![placed.x.into(), placed.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_text(&placed.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i32,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_text(&info.title), StringFormat::Literal),
        "Subject" => Object::String(encode_text(&info.subject), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("resultmail ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(format!("D:{}Z", Utc::now().format("%Y%m%d%H%M%S"))),
    });
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Renders result documents into the artifact store.
#[derive(Clone)]
pub struct ResultRenderer {
    store: Arc<dyn ArtifactStore>,
}

impl ResultRenderer {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Render the result for `student` into `handle`.
    ///
    /// Resolves with the number of bytes written once they are flushed and
    /// synced; the artifact must not be read before this completes.
    #[instrument(skip(self, handle, student, marks), fields(artifact = %handle.key()))]
    pub async fn render(
        &self,
        handle: &ArtifactHandle,
        student: &StudentRecord,
        marks: &MarksRecord,
    ) -> Result<u64, RenderError> {
        let lines = compose_lines(student, marks);
        let info = DocumentInfo::for_student(student);

        let bytes = tokio::task::spawn_blocking(move || build_pdf(&lines, &info))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        if bytes.is_empty() {
            return Err(RenderError::Empty);
        }

        let written = self.store.write(handle, &bytes).await?;
        if written == 0 {
            return Err(RenderError::Empty);
        }

        Ok(written)
    }
}
