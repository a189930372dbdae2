use std::fmt;
use std::io;

#[derive(Debug)]
pub enum GridError {
    Io(io::Error),
    Config(serde_json::Error),
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    DegenerateCurve {
        label: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::Io(ref err) => write!(f, "IO error: {}", err),
            GridError::Config(ref err) => write!(f, "config error: {}", err),
            GridError::ShapeMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch in {}: expected {}, got {}",
                context, expected, actual
            ),
            GridError::DegenerateCurve { ref label } => {
                write!(f, "curve '{}' has zero integral, cannot normalize", label)
            }
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            GridError::Io(ref err) => Some(err),
            GridError::Config(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GridError {
    fn from(err: io::Error) -> GridError {
        GridError::Io(err)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> GridError {
        GridError::Config(err)
    }
}
