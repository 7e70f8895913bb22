//! Interactive line prompts

use crate::error::{Result, VisionError};
use crate::report::ReportWriter;
use std::io::{BufRead, Write};

/// Parse a dimension the way it was typed: surrounding whitespace is ignored,
/// an optional sign is allowed, anything else must be decimal digits.
#[must_use]
pub fn parse_dimension(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// Show `prompt` and read one line with the line terminator removed.
///
/// # Errors
/// - Input is closed before a line arrives
/// - Reading from input or writing the prompt fails
pub fn prompt_line<R, W>(input: &mut R, report: &mut ReportWriter<W>, prompt: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    report.prompt(prompt)?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(VisionError::invalid_input(format!(
            "input closed while waiting for '{}'",
            prompt.trim()
        )));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompt until the answer parses as an integer.
///
/// Zero and negative numbers are accepted.
///
/// # Errors
/// - Input is closed before a valid integer arrives
pub fn prompt_dimension<R, W>(input: &mut R, report: &mut ReportWriter<W>, prompt: &str) -> Result<i32>
where
    R: BufRead,
    W: Write,
{
    loop {
        let answer = prompt_line(input, report, prompt)?;
        if let Some(value) = parse_dimension(&answer) {
            return Ok(value);
        }
        tracing::debug!(answer = %answer, "rejected dimension input");
        let invalid = report.labels().invalid_input;
        report.line(invalid)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Locale;
    use std::io::Cursor;

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("120"), Some(120));
        assert_eq!(parse_dimension("  64 \r\n"), Some(64));
        assert_eq!(parse_dimension("+8"), Some(8));
        assert_eq!(parse_dimension("0"), Some(0));
        assert_eq!(parse_dimension("-5"), Some(-5));
        assert_eq!(parse_dimension("abc"), None);
        assert_eq!(parse_dimension("12.5"), None);
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("99999999999"), None);
    }

    #[test]
    fn test_prompt_dimension_reprompts_until_valid() {
        let mut input = Cursor::new("abc\n12.5\n\n-3\n50\n");
        let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);

        let value = prompt_dimension(&mut input, &mut report, "Bredd: ").unwrap();
        assert_eq!(value, -3);

        let output = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(output.matches("Bredd: ").count(), 4);
        assert_eq!(output.matches("Felaktig inmatning, försök igen.").count(), 3);

        // the remaining line is left for the next prompt
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "50\n");
    }

    #[test]
    fn test_prompt_dimension_eof_is_error() {
        let mut input = Cursor::new("abc\n");
        let mut report = ReportWriter::new(Vec::new(), Locale::English);
        let err = prompt_dimension(&mut input, &mut report, "Width: ").unwrap_err();
        assert!(matches!(err, VisionError::InvalidInput(_)));
    }

    #[test]
    fn test_prompt_line_strips_terminator() {
        let mut input = Cursor::new("https://example.com/a.jpg\r\n");
        let mut report = ReportWriter::new(Vec::new(), Locale::Swedish);
        let url = prompt_line(&mut input, &mut report, "Klistra in en bildlänk: ").unwrap();
        assert_eq!(url, "https://example.com/a.jpg");
        assert_eq!(
            String::from_utf8(report.into_inner()).unwrap(),
            "Klistra in en bildlänk: "
        );
    }
}
