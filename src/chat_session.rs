use log::warn;

use crate::errors::*;
use crate::predictor::{ChatPrediction, ChurnPredictor};
use crate::transcript::ChatTranscript;

/// A single user conversation: every submission adds one user message and
/// one assistant message to the transcript, in this order.
pub struct ChatSession<'a> {
    predictor: &'a ChurnPredictor,
    transcript: ChatTranscript,
}

impl<'a> ChatSession<'a> {
    pub fn new(predictor: &'a ChurnPredictor) -> Self {
        Self {
            predictor,
            transcript: ChatTranscript::new(),
        }
    }

    /// Predicts the churn risk of the described customer. A failed prediction
    /// is reported in the transcript before being returned.
    pub fn submit(&mut self, input: &str) -> Result<ChatPrediction> {
        self.transcript.push_user(input);
        match self.predictor.predict_chat(input) {
            Ok(prediction) => {
                self.transcript.push_assistant(prediction.to_string());
                Ok(prediction)
            }
            Err(error) => {
                warn!("Chat prediction failed: {}", error);
                self.transcript
                    .push_assistant(format!("Prediction failed: {}", error));
                Err(error)
            }
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaVersion;
    use crate::testutils::*;
    use crate::transcript::ChatRole;

    #[test]
    fn test_transcript_alternates_user_and_assistant() {
        // Given
        let predictor = ChurnPredictor::new(
            schema(SchemaVersion::Production, &PRODUCTION_FEATURES),
            Box::new(MockedClassifier::new(4, 0.1)),
        )
        .unwrap();
        let mut session = ChatSession::new(&predictor);
        let inputs = vec![
            "new customer 2 seats low revenue",
            "",
            "tenure 22 seats 32 mrr 470 monthly billing 0",
        ];

        // When
        for input in &inputs {
            session.submit(input).unwrap();
        }

        // Then
        let messages = session.transcript().messages();
        assert_eq!(2 * inputs.len(), messages.len());
        for (turn, input) in inputs.iter().enumerate() {
            assert_eq!(ChatRole::User, messages[2 * turn].role);
            assert_eq!(*input, messages[2 * turn].content);
            assert_eq!(ChatRole::Assistant, messages[2 * turn + 1].role);
        }
        assert_eq!(
            "Churn Risk: 10.0% | MEDIUM - Monitor closely | Parsed: {seats_x=2, mrr_amount=100}",
            messages[1].content
        );
    }

    #[test]
    fn test_failed_prediction_is_reported_to_the_user() {
        // Given
        let predictor = ChurnPredictor::new(
            schema(SchemaVersion::Production, &PRODUCTION_FEATURES),
            Box::new(MockedClassifier::failing(4)),
        )
        .unwrap();
        let mut session = ChatSession::new(&predictor);

        // When
        let result = session.submit("5 seats");

        // Then
        assert!(result.is_err());
        let messages = session.transcript().messages();
        assert_eq!(2, messages.len());
        assert_eq!(ChatRole::Assistant, messages[1].role);
        assert!(messages[1].content.starts_with("Prediction failed: "));
    }
}
