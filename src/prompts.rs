//! The fixed instruction template sent to the model.
//!
//! The template is the only place the delimiter protocol is communicated to
//! the model; [`crate::pipeline::parse`] enforces the same markers on the way
//! back. Both sides take the markers from [`SegmentKind::marker`].

use crate::output::SegmentKind;

/// Instruction template. `{resume}` is replaced with the extracted text.
pub const PORTFOLIO_PROMPT_TEMPLATE: &str = r#"You are a professional web developer. Create a personal portfolio website based on this resume:
{resume}

RULES:
1. Make it modern, responsive, and colorful.
2. Include sections: Home, About, Skills, Projects, Contact.
3. IMPORTANT: In the Contact section, DO NOT include a functional form (no <form> tags). ONLY display the Email and Phone number clearly.
4. OUTPUT FORMAT MUST BE EXACTLY LIKE THIS (Do not add markdown ``` blocks):

{html}
<!DOCTYPE html>
<html>...code...</html>
{html}

{css}
body { ...code... }
{css}

{js}
console.log('...');
{js}
"#;

/// Embed the resume text into the fixed template.
///
/// The text is inserted verbatim: no escaping, no truncation.
pub fn build_prompt(resume_text: &str) -> String {
    // Markers are substituted first so marker-like text inside the resume
    // is left untouched.
    let with_markers = PORTFOLIO_PROMPT_TEMPLATE
        .replace("{html}", SegmentKind::Markup.marker())
        .replace("{css}", SegmentKind::Style.marker())
        .replace("{js}", SegmentKind::Script.marker());
    with_markers.replacen("{resume}", resume_text, 1)
}
