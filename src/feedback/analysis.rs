use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scores for the five fixed evaluation dimensions, 0-100 each.
///
/// The field names are the category names the analysis prompt asks for;
/// unknown fields are rejected so the model cannot invent categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryScores {
    #[serde(rename = "Communication Skills")]
    pub communication_skills: u8,
    #[serde(rename = "Technical Knowledge")]
    pub technical_knowledge: u8,
    #[serde(rename = "Problem-Solving")]
    pub problem_solving: u8,
    #[serde(rename = "Cultural & Role Fit")]
    pub cultural_and_role_fit: u8,
    #[serde(rename = "Confidence & Clarity")]
    pub confidence_and_clarity: u8,
}

impl CategoryScores {
    fn all(&self) -> [(&'static str, u8); 5] {
        [
            ("Communication Skills", self.communication_skills),
            ("Technical Knowledge", self.technical_knowledge),
            ("Problem-Solving", self.problem_solving),
            ("Cultural & Role Fit", self.cultural_and_role_fit),
            ("Confidence & Clarity", self.confidence_and_clarity),
        ]
    }
}

/// Validated result of one transcript analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysis {
    pub total_score: u8,
    pub category_scores: CategoryScores,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

impl FeedbackAnalysis {
    /// Parse and validate a raw model object against the fixed shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let analysis: FeedbackAnalysis =
            serde_json::from_value(value).context("Analysis object does not match schema")?;
        analysis.validate()?;
        Ok(analysis)
    }

    fn validate(&self) -> Result<()> {
        if self.total_score > 100 {
            bail!("total score {} out of range", self.total_score);
        }
        for (name, score) in self.category_scores.all() {
            if score > 100 {
                bail!("{} score {} out of range", name, score);
            }
        }
        Ok(())
    }
}
