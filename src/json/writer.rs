use std::io::Write;
use crate::error::Result;

const INDENT: &str = "  ";

/// Streaming JSON writer. Tokens go straight to the sink; nothing is
/// buffered beyond what the sink itself buffers.
pub struct JsonWriter<W: Write> {
    out: W,
    indentation: usize,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indentation: 0,
        }
    }

    pub fn append(&mut self, token: &str) -> Result<&mut Self> {
        self.out.write_all(token.as_bytes())?;
        Ok(self)
    }

    pub fn quote(&mut self, value: &str) -> Result<&mut Self> {
        // A str always serializes; any failure here came from the sink.
        serde_json::to_writer(&mut self.out, value).map_err(std::io::Error::from)?;
        Ok(self)
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indentation += 1;
        self
    }

    pub fn unindent(&mut self) -> &mut Self {
        self.indentation = self.indentation.saturating_sub(1);
        self
    }

    pub fn newline(&mut self) -> Result<&mut Self> {
        self.out.write_all(b"\n")?;
        for _ in 0..self.indentation {
            self.out.write_all(INDENT.as_bytes())?;
        }
        Ok(self)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Quoted and escaped form of `value`, for callers that join several
/// literals into one token.
pub fn quote_string(value: &str) -> String {
    // Serializing a str into a String cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

pub trait JsonPrintable {
    fn print_json<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<()>;

    fn to_json_string(&self) -> Result<String> {
        let mut writer = JsonWriter::new(Vec::new());
        self.print_json(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}
