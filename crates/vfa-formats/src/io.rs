//! Small stdin/stdout-aware file helpers shared by the format modules.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::{FormatError, Result};

pub(crate) fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|e| FormatError::io(path, e))?;
    Ok(Box::new(BufReader::new(file)))
}

pub(crate) fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(path).map_err(|e| FormatError::io(path, e))?;
    Ok(Box::new(file))
}

pub(crate) fn read_binary(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| FormatError::io(path, e))?;
        return Ok(buf);
    }
    std::fs::read(path).map_err(|e| FormatError::io(path, e))
}
