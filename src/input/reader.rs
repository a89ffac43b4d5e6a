use std::io::{self, Read};

use crate::error::PipelineError;

pub struct InputReader;

impl InputReader {
    /// Reads all of stdin. The whole input is buffered before batching.
    pub fn read_stdin() -> Result<String, PipelineError> {
        Self::read_from(io::stdin().lock())
    }

    /// Reads `reader` to the end and checks that it is UTF-8.
    pub fn read_from(mut reader: impl Read) -> Result<String, PipelineError> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|source| PipelineError::Io {
                context: "Failed to read from stdin",
                source,
            })?;

        String::from_utf8(buffer).map_err(|err| PipelineError::Io {
            context: "Input is not valid UTF-8",
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }
}
