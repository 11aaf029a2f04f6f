use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CalculatorError {
    #[error("Invalid calculator input for {0}: {1}")]
    InvalidInput(String, String),
}
