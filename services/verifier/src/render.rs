use accredit::workflows::accreditation::{
    ComplianceReport, FacultyRatio, ScoreSection, SectionGrade,
};

/// Human-readable summary. Goes to stderr so stdout stays pure JSON.
pub(crate) fn render_summary(report: &ComplianceReport) {
    for line in summary_lines(report) {
        eprintln!("{line}");
    }
}

pub(crate) fn summary_lines(report: &ComplianceReport) -> Vec<String> {
    let details = &report.institution_details;
    let mut lines = vec![
        format!("{} ({})", details.name, details.category),
        format!("{}: {}", details.head_title, details.head_name),
    ];

    let ratio = match details.faculty_ratio {
        FacultyRatio::Value(ratio) => format!("1:{ratio}"),
        FacultyRatio::Missing => "missing".to_string(),
    };
    lines.push(format!(
        "Students {} | Faculty {} | Ratio {ratio}",
        details.students, details.faculty
    ));

    lines.push(String::new());
    lines.push(format!("{:<16} {:>7}  {}", "Section", "Score", "Grade"));
    for section in ScoreSection::ALL {
        let score = report.scores.section(section);
        lines.push(format!(
            "{:<16} {:>7.2}  {}",
            section.label(),
            score,
            SectionGrade::from_score(score).label()
        ));
    }
    lines.push(format!("{:<16} {:>7.2}", "Total", report.scores.total));

    lines.push(String::new());
    lines.push("Image detection".to_string());
    for (category, value) in report.visual_detection.entries() {
        lines.push(format!("- {category}: {value}"));
    }

    lines.push(String::new());
    lines.push(format!("Decision: {}", report.status().label()));
    for reason in &report.final_decision.reasons {
        lines.push(format!("- {reason}"));
    }

    lines
}
