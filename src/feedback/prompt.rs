use crate::session::TurnRecord;

/// System message for the analysis call.
pub const ANALYSIS_SYSTEM: &str = "You are a professional interviewer analyzing a mock interview. \
     Your task is to evaluate the candidate based on structured categories";

/// One line per turn: `- <speaker>: <content>`.
pub fn format_transcript(transcript: &[TurnRecord]) -> String {
    transcript
        .iter()
        .map(|turn| format!("- {}: {}\n", turn.speaker.as_str(), turn.content))
        .collect()
}

/// The fixed analysis prompt: strict grading over exactly the five named
/// categories.
pub fn analysis_prompt(formatted_transcript: &str) -> String {
    format!(
        "You are an AI interviewer analyzing a mock interview. Your task is to evaluate the \
         candidate based on structured categories. Be thorough and detailed in your analysis. \
         Don't be lenient with the candidate. If there are mistakes or areas for improvement, \
         point them out.\n\
         Transcript:\n\
         {formatted_transcript}\n\
         Please score the candidate from 0 to 100 in the following areas. Do not add categories \
         other than the ones provided:\n\
         - **Communication Skills**: Clarity, articulation, structured responses.\n\
         - **Technical Knowledge**: Understanding of key concepts for the role.\n\
         - **Problem-Solving**: Ability to analyze problems and propose solutions.\n\
         - **Cultural & Role Fit**: Alignment with company values and job role.\n\
         - **Confidence & Clarity**: Confidence in responses, engagement, and clarity.\n"
    )
}
