use ariadne::{Color, Label, Report, ReportKind, Source};
use shunt::ShuntError;

/// Format a ShuntError with fancy terminal output using Ariadne
pub fn format_error(error: &ShuntError, source: &str) -> String {
    let (kind_name, details) = match error {
        ShuntError::Syntax(kind, details) => (format!("Syntax error ({})", kind.name()), details),
        ShuntError::Runtime(kind, details) => (format!("Runtime error ({})", kind.name()), details),
        ShuntError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            return format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            );
        }
    };

    let Some(span) = details.span else {
        return format!("{}", error);
    };

    let source_id = "expression".to_string();
    // Ariadne counts characters, spans count bytes
    let start = char_offset(source, span.start);
    let end = char_offset(source, span.end).max(start + 1);
    let message = format!("{}: {} (at {})", kind_name, details.message, span);

    let mut output = Vec::new();
    let mut report = Report::build(ReportKind::Error, &source_id, start)
        .with_message(message)
        .with_label(
            Label::new((&source_id, start..end))
                .with_message(details.fragment.as_deref().unwrap_or(""))
                .with_color(Color::Red),
        );

    if let Some(suggestion) = &details.suggestion {
        report = report.with_help(suggestion);
    }

    match report
        .finish()
        .write((&source_id, Source::from(source)), &mut output)
    {
        Ok(_) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => format!("{}", error),
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    source
        .get(..byte)
        .map_or_else(|| source.chars().count(), |prefix| prefix.chars().count())
}
