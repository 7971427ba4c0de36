//! Plain-text rendering of an [`AnalysisOutcome`].

use std::fmt::Write as _;

use buywise_popup::{AnalysisOutcome, ListItem, RenderedView, ScoreColor, ScoreDisplay};

pub(crate) fn print_outcome(outcome: &AnalysisOutcome) {
    if let Some(warning) = &outcome.scrape_warning {
        eprintln!("note: {warning}");
    }
    print!("{}", format_view(&outcome.view));
    if outcome.needs_refresh {
        println!("\nRefresh the page before analyzing it again.");
    }
}

pub(crate) fn format_view(view: &RenderedView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(
        out,
        "Confidence: {} - {}",
        score(&view.confidence),
        view.confidence_level
    );
    let _ = writeln!(
        out,
        "Sentiment:  {} ({}) across {} reviews",
        score(&view.sentiment),
        view.overall_sentiment,
        view.review_count
    );
    if let Some(note) = &view.review_note {
        let _ = writeln!(out, "Note: {note}");
    }

    list(&mut out, "Pros", &view.pros, "No pros found");
    list(&mut out, "Cons", &view.cons, "No cons found");

    if let Some(warnings) = &view.warnings {
        let _ = writeln!(out, "\nWarnings:");
        for warning in warnings {
            let _ = writeln!(out, "  ! {warning}");
        }
    }

    if let Some(panel) = &view.preference_panel {
        let _ = writeln!(out, "\nPreference match: {}", score(&panel.score));
        if let Some(analysis) = &panel.analysis {
            let _ = writeln!(out, "  {analysis}");
        }
        for item in &panel.matches {
            let _ = writeln!(out, "  + {item}");
        }
        for item in &panel.mismatches {
            let _ = writeln!(out, "  - {item}");
        }
    }
    out
}

fn score(display: &ScoreDisplay) -> String {
    let tag = match display.color {
        ScoreColor::Green => "good",
        ScoreColor::Amber => "fair",
        ScoreColor::Red => "poor",
    };
    format!("{} [{tag}]", display.text)
}

fn list(out: &mut String, heading: &str, items: &[ListItem], placeholder: &str) {
    let _ = writeln!(out, "\n{heading}:");
    for item in items {
        match item {
            ListItem::Text(text) => {
                let _ = writeln!(out, "  * {text}");
            }
            ListItem::Placeholder => {
                let _ = writeln!(out, "  ({placeholder})");
            }
        }
    }
}
