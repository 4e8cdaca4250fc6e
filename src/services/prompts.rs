//! Prompt templates
//!
//! Action tags pick a template and, through [`NewsAction::profile`] /
//! [`Stage`], the candidate profile used to answer it.

use std::fmt;
use std::str::FromStr;

use crate::schemas::api::Equipment;
use crate::services::fallback::TextProfile;
use crate::utils::truncate_with_suffix;

/// Article content beyond this many characters is cut before prompting
pub const MAX_CONTENT_CHARS: usize = 4000;

const UNTITLED: &str = "Untitled";

// ============================================================================
// News desk
// ============================================================================

/// News desk actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsAction {
    /// Short analytical report: gist, policy impact, market impact
    #[default]
    Analytics,
    /// Telegram post: gist plus a historical parallel
    Telegram,
    /// Media analysis of a list of headlines
    HeadlinesAnalysis,
    /// Translate and shorten by about 30%
    Summarize,
}

impl NewsAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsAction::Analytics => "analytics",
            NewsAction::Telegram => "telegram",
            NewsAction::HeadlinesAnalysis => "headlines_analysis",
            NewsAction::Summarize => "summarize",
        }
    }

    pub fn profile(&self) -> TextProfile {
        TextProfile::NewsDesk
    }

    /// Render the prompt for `content`
    pub fn render(&self, content: &str, title: Option<&str>, language: &str) -> String {
        let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
        let truncated = truncate_with_suffix(content, MAX_CONTENT_CHARS, "...");

        match self {
            NewsAction::Telegram => format!(
                "You are a professional social media editor and historian. Write a Telegram post \
based on the article below. Answer in {language} and use exactly two parts:\n\
1. **Key points:** a short retelling of the main facts.\n\
2. **A similar event in world history:** draw a parallel with a past event and explain the similarity.\n\
Do not use emoji or hashtags.\n\n\
Title: {title}\n\
Content: {truncated}"
            ),
            NewsAction::HeadlinesAnalysis => format!(
                "You are an expert in media analysis and cognitive psychology. Analyse the headlines \
below and answer in {language}:\n\
1. **Overall agenda:** what all the headlines are shouting about.\n\
2. **Vector of influence:** which opinion is being pushed.\n\
3. **Hidden manipulation:** what the reader should watch out for.\n\
Headlines:\n{content}"
            ),
            NewsAction::Summarize => format!(
                "You are a professional translator and editor. Translate the text below into \
{language} and shorten it by roughly 30%.\n\
Requirements:\n\
1. Output only the shortened article text.\n\
2. Do not add conclusions, analysis, commentary or section headings.\n\
3. Keep the meaning and structure of the original, drop redundant details and repetition.\n\n\
Title (translate it too): {title}\n\
Text: {truncated}"
            ),
            NewsAction::Analytics => format!(
                "You are an expert analyst. Write a short report in {language}:\n\
1. **Essence of the article:** one or two paragraphs.\n\
2. **Policy impact:** geopolitics and legislation.\n\
3. **Stock market impact:** sectors and companies.\n\n\
Title: {title}\n\
Content: {truncated}"
            ),
        }
    }
}

impl FromStr for NewsAction {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analytics" => Ok(NewsAction::Analytics),
            "telegram" => Ok(NewsAction::Telegram),
            "headlines_analysis" => Ok(NewsAction::HeadlinesAnalysis),
            "summarize" => Ok(NewsAction::Summarize),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

impl fmt::Display for NewsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action or stage tag nobody recognises
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownTag(pub String);

/// What an `/api/ai` action tag resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    /// Prompt is sent as is
    Engineering,
    /// Prompt is article content for a news template
    News(NewsAction),
}

impl AiAction {
    /// `None` and blank tags mean the raw engineering prompt
    pub fn parse(tag: Option<&str>) -> Result<Self, UnknownTag> {
        match tag.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(AiAction::Engineering),
            Some(t) if t.eq_ignore_ascii_case("engineering") => Ok(AiAction::Engineering),
            Some(t) => t.parse().map(AiAction::News),
        }
    }

    pub fn profile(&self) -> TextProfile {
        match self {
            AiAction::Engineering => TextProfile::Engineering,
            AiAction::News(action) => action.profile(),
        }
    }
}

// ============================================================================
// Equipment workflow
// ============================================================================

/// Stages of the equipment reliability workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Sanity check that the described equipment exists
    Validate,
    /// Main assemblies and parts table
    Parts,
    /// Failure mode and effects analysis table
    Fmea,
    /// Reliability-centred maintenance table
    Rcm,
    /// Maintenance plan in markdown
    Plan,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Parts => "parts",
            Stage::Fmea => "fmea",
            Stage::Rcm => "rcm",
            Stage::Plan => "plan",
        }
    }

    /// Stages whose answer is a JSON table
    pub fn is_table(&self) -> bool {
        matches!(self, Stage::Parts | Stage::Fmea | Stage::Rcm)
    }

    pub fn render(&self, equipment: &Equipment, language: &str) -> String {
        let name = equipment.display_name();

        match self {
            Stage::Validate => {
                let mut details = format!("Type: {}\nModel: {}", equipment.kind, equipment.model);
                if let Some(manufacturer) = equipment.manufacturer.as_deref() {
                    details.push_str(&format!("\nManufacturer: {}", manufacturer));
                }
                if let Some(year) = equipment.year_text() {
                    details.push_str(&format!("\nYear of manufacture: {}", year));
                }
                if let Some(site) = equipment.site.as_deref() {
                    details.push_str(&format!("\nProcess site: {}", site));
                }
                format!(
                    "You are a reliability engineer. Check whether the equipment below exists and \
whether the data is consistent. Answer in {language} in two or three sentences: confirm \
the equipment or point out what looks wrong, and name its typical application.\n\n{details}"
                )
            }
            Stage::Parts => format!(
                "For the equipment {name} produce a table of its main assemblies and parts (5 rows). \
Return STRICTLY a JSON array of objects with the keys \"Name\", \"Description\", \"Function\". \
Write the values in {language}. Do not add any text besides the JSON array."
            ),
            Stage::Fmea => format!(
                "Produce an FMEA table for {name} (up to 10 rows). Return STRICTLY a JSON array of \
objects with the keys \"FailureMode\", \"Cause\", \"Effect\", \"Probability\" (1-10), \
\"Severity\" (1-10), \"Detection\" (1-10). Write the text values in {language}. \
Do not add any text besides the JSON array."
            ),
            Stage::Rcm => format!(
                "Produce an RCM table for {name} (up to 10 rows). Return STRICTLY a JSON array of \
objects with the keys \"Function\", \"FailureMode\", \"Criticality\" (High/Medium/Low), \
\"Strategy\" (recommended maintenance strategy). Write the text values in {language}. \
Do not add any text besides the JSON array."
            ),
            Stage::Plan => format!(
                "Based on RCM analysis of {name}, draft a maintenance and repair plan with a \
maintenance strategy for each criticality level. Keep it brief. Answer in {language} \
as free-form Markdown."
            ),
        }
    }
}

impl FromStr for Stage {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "validate" | "validation" => Ok(Stage::Validate),
            "parts" => Ok(Stage::Parts),
            "fmea" => Ok(Stage::Fmea),
            "rcm" => Ok(Stage::Rcm),
            "plan" => Ok(Stage::Plan),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

// ============================================================================
// Image
// ============================================================================

/// Cutaway illustration prompt for an equipment item
pub fn image_prompt(kind: &str, manufacturer: Option<&str>, model: &str) -> String {
    let subject = [kind, manufacturer.unwrap_or(""), model]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "Highly detailed technical cutaway drawing of industrial {subject}. \
Perspective view showing internal components, gears, bearings, valves, and mechanical structure. \
Professional engineering illustration, blueprint style, detailed mechanical parts, 4k resolution, \
white background, technical diagram."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_action_parsing() {
        assert_eq!(AiAction::parse(None).unwrap(), AiAction::Engineering);
        assert_eq!(AiAction::parse(Some("  ")).unwrap(), AiAction::Engineering);
        assert_eq!(
            AiAction::parse(Some("Telegram")).unwrap(),
            AiAction::News(NewsAction::Telegram)
        );
        assert_eq!(
            AiAction::parse(Some("dance")).unwrap_err(),
            UnknownTag("dance".into())
        );
        assert_eq!(AiAction::parse(None).unwrap().profile(), TextProfile::Engineering);
        assert_eq!(
            AiAction::parse(Some("summarize")).unwrap().profile(),
            TextProfile::NewsDesk
        );
    }

    #[test]
    fn test_content_is_truncated() {
        let content = "x".repeat(MAX_CONTENT_CHARS + 50);
        let prompt = NewsAction::Analytics.render(&content, None, "Russian");
        assert!(prompt.contains(&format!("{}...", "x".repeat(MAX_CONTENT_CHARS))));
        assert!(!prompt.contains(&"x".repeat(MAX_CONTENT_CHARS + 1)));
        assert!(prompt.contains("Title: Untitled"));
        assert!(prompt.contains("in Russian"));
    }

    #[test]
    fn test_headlines_analysis_keeps_full_list() {
        let content = "y".repeat(MAX_CONTENT_CHARS + 10);
        let prompt = NewsAction::HeadlinesAnalysis.render(&content, Some("ignored"), "English");
        assert!(prompt.contains(&content));
    }

    #[test]
    fn test_stage_prompts_name_the_equipment() {
        let equipment = Equipment {
            kind: "Centrifugal pump".into(),
            model: "CNS 60-330".into(),
            manufacturer: Some("HMS".into()),
            ..Default::default()
        };
        let prompt = Stage::Fmea.render(&equipment, "Russian");
        assert!(prompt.contains("HMS CNS 60-330 (Centrifugal pump)"));
        assert!(prompt.contains("\"Detection\""));
        assert!(Stage::Fmea.is_table());
        assert!(!Stage::Plan.is_table());
        assert_eq!("validation".parse::<Stage>().unwrap(), Stage::Validate);
        assert!("repair".parse::<Stage>().is_err());
    }

    #[test]
    fn test_image_prompt_skips_missing_manufacturer() {
        let prompt = image_prompt("pump", None, "X100");
        assert!(prompt.contains("industrial pump X100."));
        let prompt = image_prompt("pump", Some("Grundfos"), "X100");
        assert!(prompt.contains("industrial pump Grundfos X100."));
    }
}
