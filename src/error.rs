use std::fmt::Formatter;

#[derive(Debug)]
pub enum OutputError {
    IoError(std::io::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            OutputError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::IoError(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(e: std::io::Error) -> Self {
        OutputError::IoError(e)
    }
}

/// Failure while processing a single indirect object. The scan logs it and
/// moves on to the next logical line.
#[derive(Debug)]
pub enum ObjectError {
    MalformedInteger(String),
    StreamTooShort(usize),
    StreamOutOfRange {
        position: usize,
        length: usize,
        available: usize,
    },
    Inflate(std::io::Error),
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ObjectError::MalformedInteger(s) => write!(f, "malformed integer: {:?}", s),
            ObjectError::StreamTooShort(length) => {
                write!(f, "stream length {} is shorter than its 2 byte header", length)
            }
            ObjectError::StreamOutOfRange {
                position,
                length,
                available,
            } => write!(
                f,
                "stream of {} bytes at offset {} runs past the end of the buffer ({} bytes)",
                length, position, available
            ),
            ObjectError::Inflate(e) => write!(f, "inflate failed: {}", e),
        }
    }
}

impl std::error::Error for ObjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjectError::Inflate(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn object_error_messages() {
        let err = ObjectError::StreamOutOfRange {
            position: 10,
            length: 50,
            available: 40,
        };
        assert_eq!(
            err.to_string(),
            "stream of 50 bytes at offset 10 runs past the end of the buffer (40 bytes)"
        );

        let err = ObjectError::MalformedInteger("99999999999".to_string());
        assert_eq!(err.to_string(), "malformed integer: \"99999999999\"");
    }

    #[test_log::test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: OutputError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
