//! Document Builder: turns `ResumeData` into layout content, section by section.
//!
//! Fixed order: header, education, experience, academic projects, other,
//! technical knowledge. Sections with no backing data emit nothing.

use tracing::debug;

use crate::builder::models::{Education, Experience, Project, ResumeData};
use crate::layout::engine::BODY_SIZE;
use crate::layout::font_metrics::FontMetrics;
use crate::layout::{
    render_content, write_pdf, ContentItem, LaidOutDocument, PageSetup, RenderError, Rgb,
};

const NAME_SIZE: f32 = 20.0;
const CONTACT_SIZE: f32 = 9.0;
const ENTRY_TITLE_SIZE: f32 = 11.0;
const DATE_SIZE: f32 = 10.0;
const META_SIZE: f32 = 9.0;
const ENTRY_GAP: f32 = 6.0;
/// Title line, hairline gap, first body line.
const SECTION_NEEDED: f32 = 40.0;
/// Title row plus one body line.
const ENTRY_NEEDED: f32 = 28.0;
const COMPANY_COLOR: Rgb = Rgb::gray(0.15);

/// Joins the date range with an en dash only when both ends are present.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(str::trim).unwrap_or("");
    let end = end.map(str::trim).unwrap_or("");
    let sep = if !start.is_empty() && !end.is_empty() {
        " \u{2013} "
    } else {
        ""
    };
    format!("{start}{sep}{end}").trim().to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Content items for the whole résumé.
pub fn resume_content(data: &ResumeData) -> Vec<ContentItem> {
    let mut items = header_items(data);

    if !data.education.is_empty() {
        section(&mut items, "Education");
        for ed in &data.education {
            education_items(&mut items, ed);
        }
    }

    if !data.experience.is_empty() {
        section(&mut items, "Experience");
        for ex in &data.experience {
            experience_items(&mut items, ex);
        }
    }

    if !data.projects.is_empty() {
        section(&mut items, "Academic Projects");
        for project in &data.projects {
            project_items(&mut items, project);
        }
    }

    if !data.other.trim().is_empty() {
        section(&mut items, "Other");
        items.push(ContentItem::Markup {
            source: data.other.clone(),
            indent: 6.0,
            inset: 12.0,
        });
    }

    if !data.technical.trim().is_empty() {
        section(&mut items, "Technical Knowledge");
        items.push(ContentItem::Wrapped {
            text: data.technical.clone(),
            indent: 6.0,
            inset: 12.0,
            size: BODY_SIZE,
            color: Rgb::BODY,
        });
    }

    items
}

fn header_items(data: &ResumeData) -> Vec<ContentItem> {
    vec![
        ContentItem::Centered {
            text: data.header.name.trim().to_string(),
            size: NAME_SIZE,
            color: Rgb::BLACK,
            gap: 26.0,
        },
        ContentItem::Centered {
            text: data.header.contact_parts().join(" | "),
            size: CONTACT_SIZE,
            color: Rgb::MUTED,
            gap: 16.0,
        },
        ContentItem::Rule {
            thickness: 0.75,
            color: Rgb::MUTED,
            gap: 18.0,
        },
    ]
}

fn section(items: &mut Vec<ContentItem>, title: &str) {
    items.push(ContentItem::KeepTogether(SECTION_NEEDED));
    items.push(ContentItem::SectionTitle(title.to_string()));
}

fn title_row(items: &mut Vec<ContentItem>, title: &str, start: Option<&str>, end: Option<&str>) {
    let date = date_range(start, end);
    items.push(ContentItem::KeepTogether(ENTRY_NEEDED));
    items.push(ContentItem::Row {
        left: title.to_string(),
        left_size: ENTRY_TITLE_SIZE,
        right: (!date.is_empty()).then_some(date),
        right_size: DATE_SIZE,
    });
}

fn education_items(items: &mut Vec<ContentItem>, ed: &Education) {
    title_row(items, &ed.school, ed.start.as_deref(), ed.end.as_deref());

    if !ed.degree.trim().is_empty() {
        items.push(ContentItem::Wrapped {
            text: ed.degree.clone(),
            indent: 6.0,
            inset: 0.0,
            size: BODY_SIZE,
            color: Rgb::MUTED,
        });
    }

    let mut meta = Vec::new();
    if let Some(location) = non_blank(ed.location.as_deref()) {
        meta.push(location.to_string());
    }
    if let Some(gpa) = non_blank(ed.gpa.as_deref()) {
        meta.push(format!("GPA: {gpa}"));
    }
    if !meta.is_empty() {
        items.push(ContentItem::Line {
            text: meta.join(" \u{2022} "),
            indent: 6.0,
            size: META_SIZE,
            color: Rgb::META,
        });
    }

    items.push(ContentItem::Gap(ENTRY_GAP));
}

fn experience_items(items: &mut Vec<ContentItem>, ex: &Experience) {
    title_row(items, &ex.title, ex.start.as_deref(), ex.end.as_deref());

    let company_meta = match non_blank(ex.location.as_deref()) {
        Some(location) => format!("{} \u{2014} {location}", ex.company.trim()),
        None => ex.company.trim().to_string(),
    };
    if !company_meta.trim().is_empty() {
        items.push(ContentItem::Line {
            text: company_meta.trim().to_string(),
            indent: 6.0,
            size: BODY_SIZE,
            color: COMPANY_COLOR,
        });
    }

    if !ex.project_links.is_empty() {
        items.push(ContentItem::Wrapped {
            text: ex.project_links.join(" | "),
            indent: 6.0,
            inset: 20.0,
            size: META_SIZE,
            color: Rgb::LINK,
        });
    }

    if let Some(notes) = non_blank(ex.notes.as_deref()) {
        items.push(ContentItem::Markup {
            source: notes.to_string(),
            indent: 18.0,
            inset: 18.0,
        });
    }

    items.push(ContentItem::Gap(ENTRY_GAP));
}

fn project_items(items: &mut Vec<ContentItem>, project: &Project) {
    items.push(ContentItem::KeepTogether(ENTRY_NEEDED));
    items.push(ContentItem::Line {
        text: project.title.clone(),
        indent: 0.0,
        size: ENTRY_TITLE_SIZE,
        color: Rgb::BLACK,
    });

    if let Some(link) = non_blank(project.link.as_deref()) {
        items.push(ContentItem::Wrapped {
            text: link.to_string(),
            indent: 6.0,
            inset: 20.0,
            size: META_SIZE,
            color: Rgb::LINK,
        });
    }

    if !project.description.trim().is_empty() {
        items.push(ContentItem::Markup {
            source: project.description.clone(),
            indent: 6.0,
            inset: 12.0,
        });
    }

    items.push(ContentItem::Gap(ENTRY_GAP));
}

/// Lays out the résumé on A4.
pub fn build_resume<M: FontMetrics + ?Sized>(
    data: &ResumeData,
    metrics: &M,
) -> Result<LaidOutDocument, RenderError> {
    let items = resume_content(data);
    let laid_out = render_content(PageSetup::A4, metrics, &items)?;
    debug!(
        items = items.len(),
        pages = laid_out.page_count,
        "Resume laid out"
    );
    Ok(laid_out)
}

/// Lays out and serializes the résumé in one step. CPU-bound.
pub fn render_resume_pdf<M: FontMetrics + ?Sized>(
    data: &ResumeData,
    metrics: &M,
) -> Result<Vec<u8>, RenderError> {
    let laid_out = build_resume(data, metrics)?;
    write_pdf(&laid_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::DrawOp;
    use crate::layout::font_metrics::FontStyle;
    use crate::layout::StandardFonts;

    fn texts(doc: &LaidOutDocument) -> Vec<String> {
        doc.texts().map(str::to_string).collect()
    }

    #[test]
    fn test_date_range_joins_only_when_both_present() {
        assert_eq!(date_range(Some("Jan 2024"), Some("Now")), "Jan 2024 \u{2013} Now");
        assert_eq!(date_range(Some("Jan 2024"), None), "Jan 2024");
        assert_eq!(date_range(None, Some("2020")), "2020");
        assert_eq!(date_range(Some(" "), Some("")), "");
    }

    #[test]
    fn test_empty_sections_emit_no_heading() {
        let mut data = ResumeData::seed();
        data.projects.clear();
        data.other.clear();
        let doc = build_resume(&data, &StandardFonts).unwrap();
        let all = texts(&doc);
        assert!(all.contains(&"EDUCATION".to_string()));
        assert!(all.contains(&"TECHNICAL KNOWLEDGE".to_string()));
        assert!(!all.contains(&"ACADEMIC PROJECTS".to_string()));
        assert!(!all.contains(&"OTHER".to_string()));
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let mut data = ResumeData::seed();
        data.other = "Volunteer *mentor*".to_string();
        let doc = build_resume(&data, &StandardFonts).unwrap();
        let all = texts(&doc);
        let pos = |t: &str| all.iter().position(|x| x == t).unwrap();
        assert!(pos("EDUCATION") < pos("EXPERIENCE"));
        assert!(pos("EXPERIENCE") < pos("ACADEMIC PROJECTS"));
        assert!(pos("ACADEMIC PROJECTS") < pos("OTHER"));
        assert!(pos("OTHER") < pos("TECHNICAL KNOWLEDGE"));
    }

    #[test]
    fn test_header_contact_and_meta_lines() {
        let doc = build_resume(&ResumeData::seed(), &StandardFonts).unwrap();
        let all = texts(&doc);
        assert_eq!(all[0], "Alex Rivera");
        assert_eq!(
            all[1],
            "Portland, ME (open to relocation) | alex.rivera@example.com | +1-555-010-2030 | linkedin.com/in/alex-rivera | github.com/alexrivera"
        );
        assert!(all.contains(&"Portland, ME \u{2022} GPA: 4.0".to_string()));
        assert!(all.contains(&"Carbon Analytics Co. \u{2014} Remote".to_string()));
        assert!(all.contains(&"Sep. 2025 \u{2013} June 2027".to_string()));
    }

    #[test]
    fn test_markdown_notes_become_bulleted_runs() {
        let doc = build_resume(&ResumeData::seed(), &StandardFonts).unwrap();
        let bold_react = doc.ops.iter().any(|op| {
            matches!(op, DrawOp::Text { text, style: FontStyle::Bold, .. } if text == "React")
        });
        assert!(bold_react);
        assert!(texts(&doc).iter().filter(|t| *t == "\u{2022}").count() >= 4);
    }

    #[test]
    fn test_long_resume_paginates() {
        let mut data = ResumeData::seed();
        for i in 0..40 {
            let id = data.add_experience();
            let ex = data.experience.iter_mut().find(|e| e.id == id).unwrap();
            ex.title = format!("Role {i}");
            ex.company = "Acme".to_string();
            ex.notes = Some("- one thing\n- another thing".to_string());
        }
        let doc = build_resume(&data, &StandardFonts).unwrap();
        assert!(doc.page_count > 1, "got {} pages", doc.page_count);
    }

    #[test]
    fn test_empty_resume_renders_single_page_pdf() {
        let bytes = render_resume_pdf(&ResumeData::new_empty(), &StandardFonts).unwrap();
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_seed_pdf_page_count_matches_layout() {
        let data = ResumeData::seed();
        let laid_out = build_resume(&data, &StandardFonts).unwrap();
        let bytes = render_resume_pdf(&data, &StandardFonts).unwrap();
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), laid_out.page_count);
    }
}
