//! Output formatting for frame reports
//!
//! Human-readable text, JSON and CSV renderings of a [`FrameReport`], used
//! by the command-line tool and handy for logging sessions to disk.

use crate::api::types::OutputFormat;
use crate::processing::FrameReport;

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// One line per frame instead of a block
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Format a frame as human-readable text
    pub fn format_text(&self, report: &FrameReport) -> String {
        if self.compact {
            return self.format_compact(report);
        }

        let mut output = String::new();
        output.push_str(&format!("Frame #{} at {}\n", report.frame, report.time.to_rfc3339()));
        output.push_str(&format!(
            "  Heading:  az {:.1}° alt {:.1}°\n",
            report.heading.azimuth, report.heading.altitude
        ));
        output.push_str(&format!(
            "  Observer: {:.4}°, {:.4}°, {:.0} m\n",
            report.observer.latitude, report.observer.longitude, report.observer.elevation_m
        ));
        output.push_str(&format!("  Canvas:   {}", report.viewport));
        if let Some(from) = report.resized_from {
            output.push_str(&format!(" (resized from {})", from));
        }
        output.push('\n');

        if report.markers.is_empty() {
            output.push_str("  No tracked bodies in view\n");
        }
        for marker in &report.markers {
            output.push_str(&format!(
                "  {:<10} az {:>6.1}° alt {:>5.1}° -> ({:.0}, {:.0})\n",
                marker.body, marker.position.azimuth, marker.position.altitude, marker.point.x, marker.point.y
            ));
        }
        if !report.out_of_view.is_empty() {
            output.push_str(&format!("  Out of view: {}\n", report.out_of_view.join(", ")));
        }
        for failure in &report.failed {
            output.push_str(&format!("  Failed: {}\n", failure.reason));
        }

        output
    }

    fn format_compact(&self, report: &FrameReport) -> String {
        let markers: Vec<String> = report
            .markers
            .iter()
            .map(|m| format!("{}@({:.0},{:.0})", m.body, m.point.x, m.point.y))
            .collect();
        format!(
            "#{} az {:.1} alt {:.1} | {} | hidden {} | failed {}",
            report.frame,
            report.heading.azimuth,
            report.heading.altitude,
            if markers.is_empty() { "-".to_string() } else { markers.join(" ") },
            report.out_of_view.len(),
            report.failed.len()
        )
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, report: &FrameReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}

/// CSV formatter, one row per body per frame
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "frame,time,body,status,azimuth,altitude,x,y,heading_azimuth,heading_altitude".to_string()
    }

    /// Rows for every body considered in the frame
    pub fn format_csv(&self, report: &FrameReport) -> String {
        let time = report.time.to_rfc3339();
        let heading = format!("{:.3},{:.3}", report.heading.azimuth, report.heading.altitude);
        let mut rows = Vec::new();

        for marker in &report.markers {
            rows.push(format!(
                "{},{},{},visible,{:.3},{:.3},{:.1},{:.1},{}",
                report.frame,
                time,
                csv_field(&marker.body),
                marker.position.azimuth,
                marker.position.altitude,
                marker.point.x,
                marker.point.y,
                heading
            ));
        }
        for body in &report.out_of_view {
            rows.push(format!("{},{},{},out_of_view,,,,,{}", report.frame, time, csv_field(body), heading));
        }
        for failure in &report.failed {
            rows.push(format!(
                "{},{},{},failed,,,,,{}",
                report.frame,
                time,
                csv_field(&failure.body),
                heading
            ));
        }

        rows.join("\n")
    }
}

/// Quote a field when it holds a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Formats a stream of frames in one of the supported formats
#[derive(Debug, Clone)]
pub struct FrameFormatter {
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
    csv: CsvFormatter,
    header_written: bool,
}

impl FrameFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            text: TextFormatter::new(),
            json: JsonFormatter::new(),
            csv: CsvFormatter::new(),
            header_written: false,
        }
    }

    pub fn with_compact_text(mut self) -> Self {
        self.text = TextFormatter::compact();
        self
    }

    /// Format the next frame; the CSV header is emitted before the first one
    pub fn format(&mut self, report: &FrameReport) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(self.text.format_text(report)),
            OutputFormat::Json => self.json.format_json(report),
            OutputFormat::Csv => {
                let rows = self.csv.format_csv(report);
                if self.csv.include_header && !self.header_written {
                    self.header_written = true;
                    if rows.is_empty() {
                        return Ok(self.csv.header());
                    }
                    return Ok(format!("{}\n{}", self.csv.header(), rows));
                }
                Ok(rows)
            }
        }
    }
}
