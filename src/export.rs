use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::topics::RankedTopic;

/// Output layout for ranked topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// `TOPIC:` blocks as printed by the old viewer
    #[default]
    Txt,
    /// `topic,term,weight` rows
    Csv,
    /// Array of `{topic, total, terms}` objects
    Json,
}

/// Significant digits the old viewer kept when printing a float.
const WEIGHT_DIGITS: i32 = 12;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Formats a weight the way the old viewer printed floats (`%.12g`).
///
/// Whole values keep one decimal (`3.0`); very large or small magnitudes
/// switch to exponent form (`1e+20`, `1.5e-05`).
/// # Example
/// ```
/// use topic_text::format_weight;
/// assert_eq!(format_weight(1.1 + 2.2), "3.3");
/// assert_eq!(format_weight(3.0), "3.0");
/// assert_eq!(format_weight(1e20), "1e+20");
/// ```
pub fn format_weight(w: f64) -> String {
    if w.is_nan() {
        return "nan".to_string();
    }
    if w.is_infinite() {
        return if w > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // The exponent is taken after rounding to the kept digits.
    let sci = format!("{:.*e}", (WEIGHT_DIGITS - 1) as usize, w);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= WEIGHT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let fixed = format!("{:.*}", (WEIGHT_DIGITS - 1 - exp) as usize, w);
        let fixed = trim_fraction(&fixed);
        if fixed.contains('.') {
            fixed.to_string()
        } else {
            format!("{fixed}.0")
        }
    }
}

/// Prefixes a `'` to cells a spreadsheet would evaluate as a formula.
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

fn write_txt<W: Write>(topics: &[RankedTopic], sink: &mut W) -> Result<()> {
    for t in topics {
        writeln!(sink)?;
        writeln!(sink, "TOPIC:  {} {}", t.topic, format_weight(t.total))?;
        writeln!(sink)?;
        for rt in &t.terms {
            writeln!(sink, "{} {}", rt.term, format_weight(rt.weight))?;
        }
    }
    Ok(())
}

fn write_csv<W: Write>(topics: &[RankedTopic], sink: &mut W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(sink);
    wtr.write_record(["topic", "term", "weight"])?;
    for t in topics {
        for rt in &t.terms {
            wtr.write_record([
                t.topic.to_string(),
                csv_safe_cell(&rt.term),
                format_weight(rt.weight),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Renders `topics` to `sink` in the chosen layout.
pub fn export_topics<W: Write>(
    topics: &[RankedTopic],
    format: ExportFormat,
    sink: &mut W,
) -> Result<()> {
    match format {
        ExportFormat::Txt => write_txt(topics, sink)?,
        ExportFormat::Csv => write_csv(topics, sink)?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *sink, topics)?;
            writeln!(sink)?;
        }
    }
    sink.flush()?;
    Ok(())
}
