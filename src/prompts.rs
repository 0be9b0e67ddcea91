/*!
 * Prompt templates for briefing generation.
 *
 * The model is asked for a fixed set of sections with bold titles and
 * `- ` bullets, which is exactly the subset `crate::document` understands.
 */

use crate::providers::ChatPrompt;

/// Placeholder replaced with the extracted report text
pub const REPORT_PLACEHOLDER: &str = "{report}";

/// System and user prompt pair for one briefing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefingPrompt {
    system: String,
    user_template: String,
}

impl BriefingPrompt {
    /// The default system instruction.
    pub const SYSTEM_PROMPT: &'static str = "You are a professional technical writer generating Lessons Learned and Best Practices (LLBP) reports. Your task is to write a concise, professional, and well-structured LLBP Briefing based on an incident or investigation report. The output must follow a strict format, use bold paragraph titles, and include bullet points where appropriate. The final output will be converted into a Word document, so formatting must be clean and consistent.";

    /// The default user prompt; `{report}` marks where the report goes.
    pub const USER_PROMPT_TEMPLATE: &'static str = r#"**Generate a Lessons Learned and Best Practices (LLBP) Briefing using the following report. Do NOT include any sections other than those listed below.** Format the output using bold paragraph titles and include bullet points where suitable. Follow the structure exactly as shown:

**Title:**
Write a headline-style title that grabs attention.

**Discussion:**
Write this section in full paragraph style only. Do NOT use bullet points or list formatting in this section.
- Clearly explain the core lesson learned and why the lesson learned is important (e.g., raise awareness, caution others, or encourage best practice).
- Provide necessary background/context on what the issue is.
- Identify the actual or potential benefits of applying the lesson learned.
-Do not list any causes in this section.

**Analysis:** Include high-level causes with brief summary of facts for each cause.

**Actions to Prevent Recurrence:**
- Based on apparent and contributing causes, what actions would prevent recurrence
- Avoid copying corrective actions from the source material
- Make suggestions broadly applicable to other teams

DO NOT include any other section titles. Do not include 'Extent of Condition', 'Management Concerns', or 'Lessons Learned' sections.

---

Report:
{report}"#;

    /// Create a prompt pair from a system instruction and a user template.
    pub fn new(system: &str, user_template: &str) -> Self {
        Self {
            system: system.to_string(),
            user_template: user_template.to_string(),
        }
    }

    /// The system instruction.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Render the user prompt for one report.
    ///
    /// Only the first placeholder is substituted, so report text that
    /// itself contains `{report}` is left untouched.
    pub fn render_user(&self, report_text: &str) -> String {
        self.user_template.replacen(REPORT_PLACEHOLDER, report_text, 1)
    }

    /// Render the full chat prompt for one report.
    pub fn render(&self, report_text: &str) -> ChatPrompt {
        ChatPrompt::new(self.system.clone(), self.render_user(report_text))
    }
}

impl Default for BriefingPrompt {
    fn default() -> Self {
        Self::new(Self::SYSTEM_PROMPT, Self::USER_PROMPT_TEMPLATE)
    }
}
