use std::fmt;

/// Every failure the library can report.
///
/// Each kind maps to a fixed human-readable message; variants that carry
/// context (line numbers, dimensions) append it after the fixed message.
#[derive(Debug)]
pub enum Error {
    /// An operand has the wrong dimensions for the requested matrix operation.
    MatrixDimensionMismatch { expected: usize, got: usize },
    /// A matrix was requested with zero rows or zero columns.
    ZeroDimensionMatrix,
    /// The operation needs a vector (a single-row or single-column matrix).
    ExpectedVectorGotMatrix,
    NoInputLayer,
    NoOutputLayer,
    TooManyInputLayers,
    TooManyOutputLayers,
    /// A layer was requested with zero nodes.
    InvalidNodeCount,
    /// The same layer instance was added to a network twice.
    DuplicateLayerInNetwork,
    /// The network has not been connected yet; call `connect` first.
    NetworkNotConnected,
    WrongInputSize { expected: usize, got: usize },
    WrongOutputSize { expected: usize, got: usize },
    /// A custom activation was selected without both callbacks.
    NoActivationCallbackGiven,
    /// The learning rate must be finite and greater than zero.
    InvalidLearningRate,
    /// A CSV row failed validation (a column value does not match the
    /// feature type inferred from the first data row).
    InvalidCsvRow { line: usize },
    /// A CSV row has a different number of columns than the header.
    InconsistentColumnCount {
        line: usize,
        expected: usize,
        got: usize,
    },
    /// The selected input features are empty, unknown, duplicated, or would
    /// leave no numeric target column.
    InvalidFeatureCount,
    /// `split` was called before `set_input_features`.
    NoInputFeaturesSpecified,
    /// The training split ratio must satisfy `0 < ratio <= 1`.
    InvalidTrainingSplit,
    Io(std::io::Error),
    /// A serialized model failed validation on load.
    InvalidModelFile(String),
    /// Networks with custom activation callbacks cannot be serialized.
    CustomActivationNotSerializable,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The fixed message for this error kind, without any context fields.
    pub fn message(&self) -> &'static str {
        match self {
            Error::MatrixDimensionMismatch { .. } => "matrix is the wrong size for operation",
            Error::ZeroDimensionMatrix => "matrix must have at least one row and one column",
            Error::ExpectedVectorGotMatrix => "expected a vector and got a matrix",
            Error::NoInputLayer => "no input layer has been provided",
            Error::NoOutputLayer => "no output layer has been provided",
            Error::TooManyInputLayers => "too many input layers, max of 1 allowed",
            Error::TooManyOutputLayers => "too many output layers, max of 1 allowed",
            Error::InvalidNodeCount => "invalid node count given, must be positive",
            Error::DuplicateLayerInNetwork => "layer already exists in network",
            Error::NetworkNotConnected => "network has not been connected with connect()",
            Error::WrongInputSize { .. } => "input data does not match input node count",
            Error::WrongOutputSize { .. } => "output data does not match output node count",
            Error::NoActivationCallbackGiven => {
                "custom activation selected but no callback provided"
            }
            Error::InvalidLearningRate => "learning rate must be finite and > 0",
            Error::InvalidCsvRow { .. } => "csv row does not match the inferred feature types",
            Error::InconsistentColumnCount { .. } => {
                "csv row has a different column count than the header"
            }
            Error::InvalidFeatureCount => "invalid input feature selection",
            Error::NoInputFeaturesSpecified => "no input features have been specified",
            Error::InvalidTrainingSplit => "training split must be in (0, 1]",
            Error::Io(_) => "i/o error",
            Error::InvalidModelFile(_) => "invalid model file",
            Error::CustomActivationNotSerializable => {
                "networks with custom activations cannot be serialized"
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MatrixDimensionMismatch { expected, got }
            | Error::WrongInputSize { expected, got }
            | Error::WrongOutputSize { expected, got } => {
                write!(f, "{}: expected {expected}, got {got}", self.message())
            }
            Error::InvalidCsvRow { line } => write!(f, "{} (line {line})", self.message()),
            Error::InconsistentColumnCount {
                line,
                expected,
                got,
            } => write!(
                f,
                "{}: expected {expected}, got {got} (line {line})",
                self.message()
            ),
            Error::Io(e) => write!(f, "{}: {e}", self.message()),
            Error::InvalidModelFile(detail) => write!(f, "{}: {detail}", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_fixed_message() {
        let kinds = [
            Error::ZeroDimensionMatrix,
            Error::ExpectedVectorGotMatrix,
            Error::NoInputLayer,
            Error::NoOutputLayer,
            Error::TooManyInputLayers,
            Error::TooManyOutputLayers,
            Error::InvalidNodeCount,
            Error::DuplicateLayerInNetwork,
            Error::NetworkNotConnected,
            Error::NoActivationCallbackGiven,
            Error::InvalidLearningRate,
            Error::InvalidFeatureCount,
            Error::NoInputFeaturesSpecified,
            Error::InvalidTrainingSplit,
            Error::CustomActivationNotSerializable,
        ];
        for kind in kinds {
            assert!(!kind.message().is_empty());
            assert_eq!(format!("{kind}"), kind.message());
        }
    }

    #[test]
    fn context_fields_are_rendered_after_the_fixed_message() {
        let err = Error::InconsistentColumnCount {
            line: 7,
            expected: 4,
            got: 3,
        };
        let text = format!("{err}");
        assert!(text.starts_with(err.message()));
        assert!(text.contains("line 7"));
    }
}
