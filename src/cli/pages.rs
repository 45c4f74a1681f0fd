//! Static informational pages.

use crate::knowledge::SpeciesKnowledgeBase;
use std::fmt::Write;

/// The "about project" page: what the dashboard recognises, with a short
/// entry per species.
pub fn about_project(knowledge: &SpeciesKnowledgeBase) -> String {
    let mut page = String::new();
    let _ = writeln!(page, "About AnimalAI");
    let _ = writeln!(page);
    let _ = writeln!(
        page,
        "AnimalAI is an artificial intelligence system that recognises four big-cat species:"
    );
    for entry in knowledge.iter() {
        let _ = writeln!(page, "  - {}", entry.heading());
    }
    let _ = writeln!(page);
    let _ = writeln!(page, "Two models are available:");
    let _ = writeln!(
        page,
        "  classification  names the species and shows its habitat and traits"
    );
    let _ = writeln!(
        page,
        "  detection       draws labelled boxes around every animal found"
    );

    for entry in knowledge.iter() {
        let _ = writeln!(page);
        let _ = writeln!(page, "{}", entry.heading());
        let _ = writeln!(page, "  {}", entry.summary);
    }
    page
}

/// The "about author" page.
pub fn about_author() -> String {
    let mut page = String::new();
    let _ = writeln!(page, "About the Author");
    let _ = writeln!(page);
    let _ = writeln!(page, "Name:        Sandrina Nur Amanda");
    let _ = writeln!(page, "Department:  Statistics, Universitas Syiah Kuala");
    let _ = writeln!(page, "GitHub:      https://github.com/Sandrina-Nur-Amanda");
    let _ = writeln!(page);
    let _ = writeln!(
        page,
        "Interested in artificial intelligence, in particular machine learning,"
    );
    let _ = writeln!(
        page,
        "deep learning and computer vision applied to real-world problems."
    );
    let _ = writeln!(page);
    let _ = writeln!(
        page,
        "This dashboard was built for UTS Big Data 2025 to introduce AI-based"
    );
    let _ = writeln!(page, "detection and classification.");
    page
}
