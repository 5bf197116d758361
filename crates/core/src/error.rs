use thiserror::Error;

use crate::model::QuestionValidationError;
use crate::model::SessionSummaryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    QuestionValidation(#[from] QuestionValidationError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
