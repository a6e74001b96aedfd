use failure::Fail;

#[derive(Debug, Fail)]
pub enum ChurnPredictorError {
    #[fail(display = "Unable to read file '{}'", _0)]
    ModelLoad(String),
    #[fail(display = "Expected model version {} but found {}", _1, _0)]
    WrongModelVersion(String, &'static str),
    #[fail(display = "No feature names artifact found in '{}'", _0)]
    MissingFeatureNames(String),
    #[fail(display = "Invalid feature schema: {}", _0)]
    InvalidSchema(String),
    #[fail(
        display = "Classifier expects {} features but the schema has {}",
        model, schema
    )]
    SchemaMismatch { model: usize, schema: usize },
    #[fail(display = "Invalid classifier model: {}", _0)]
    InvalidModel(String),
    #[fail(
        display = "Value {} of '{}' is outside of [{}, {}]",
        value, field, min, max
    )]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[fail(display = "Prediction failed: {}", _0)]
    Prediction(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
