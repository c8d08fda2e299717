// Turn handler: retrieve, score, format, record

use tracing::{info, warn};

use super::{Retriever, Scorer};
use crate::formatter::format_response;
use crate::models::Turn;
use crate::session::Conversation;

pub const RETRIEVAL_ERROR_MESSAGE: &str =
    "An error occurred while generating a response to your question.";

pub const SCORING_UNAVAILABLE_NOTICE: &str =
    "Consistency scores are unavailable; references are shown without them.";

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Retrieval failed and the canned error was recorded as the answer.
    pub errored: bool,
    /// Scores were attached to the references.
    pub scored: bool,
    /// Diagnostic line for the UI when retrieval failed or scores are missing.
    pub notice: Option<String>,
}

/// Runs one user submission against `conversation`.
///
/// Always appends exactly two turns: the user's prompt, then the assistant's
/// answer. The scorer is only consulted after a successful retrieval.
pub async fn handle_turn(
    conversation: &mut Conversation,
    prompt: &str,
    retriever: &dyn Retriever,
    scorer: &dyn Scorer,
) -> TurnOutcome {
    conversation.push(Turn::user(prompt));

    let answer = match retriever.query(prompt).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Pipeline: retrieval failed, answering with canned error: {}", e);
            conversation.push(Turn::assistant(RETRIEVAL_ERROR_MESSAGE));
            return TurnOutcome {
                errored: true,
                scored: false,
                notice: Some(format!("An error occurred in Vectara: {}", e)),
            };
        }
    };

    let scores = scorer.score(&answer.summary, &answer.references).await;

    // An empty list for a non-empty reference set means scoring was unavailable.
    let notice = (scores.is_empty() && !answer.references.is_empty())
        .then(|| SCORING_UNAVAILABLE_NOTICE.to_string());

    info!(
        "Pipeline: answered with {} references ({} scored)",
        answer.references.len(),
        scores.len()
    );

    conversation.push(Turn::assistant(format_response(
        &answer.summary,
        &answer.references,
        &scores,
    )));

    TurnOutcome {
        errored: false,
        scored: !scores.is_empty(),
        notice,
    }
}
