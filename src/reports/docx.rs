use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;

use crate::errors::AppError;
use crate::models::CompanyNews;

// Run sizes are in half-points.
const TITLE_SIZE: usize = 40;
const HEADING_SIZE: usize = 28;

fn text(s: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(s))
}

/// Builds the news summary document, companies in watch-list order.
pub fn news_document(companies: &[CompanyNews], timestamp: &str) -> Docx {
    let mut doc = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Datacenter News Report").bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(text(&format!("Generated: {}", timestamp)).align(AlignmentType::Center))
        .add_paragraph(Paragraph::new());

    for company in companies.iter().filter(|c| !c.items.is_empty()) {
        doc = doc.add_paragraph(Paragraph::new().add_run(
            Run::new()
                .add_text(format!("[{}] {}", company.country, company.company))
                .bold()
                .size(HEADING_SIZE),
        ));

        for item in &company.items {
            let level = if item.is_high_relevance() { "HIGH" } else { "MED" };
            doc = doc.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(format!("[{}] ", level)).bold())
                    .add_run(Run::new().add_text(item.display_title()).bold()),
            );

            let summary = item.display_description();
            if !summary.is_empty() {
                doc = doc.add_paragraph(text(&format!("Summary: {}", summary)));
            }

            doc = doc
                .add_paragraph(text(&format!("Source: {} ({})", item.publisher, item.source)))
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Link: ").bold())
                        .add_run(Run::new().add_text(item.link.as_str())),
                )
                .add_paragraph(Paragraph::new());
        }
    }

    doc
}

pub fn write_docx(path: &Path, doc: Docx) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    doc.build()
        .pack(file)
        .map_err(|e| AppError::Document(e.to_string()))?;
    Ok(())
}
