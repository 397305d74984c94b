/// Formats seconds as `M:SS`, rounding down to whole seconds.
///
/// Negative, NaN and infinite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total_secs = seconds.floor() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Formats a long total (e.g. listening time) as `Hh Mm`.
pub fn format_listening_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0h 0m".to_string();
    }

    let total_secs = seconds.floor() as u64;
    format!("{}h {}m", total_secs / 3600, (total_secs % 3600) / 60)
}

/// Represents formatted progress information ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedProgress {
    pub elapsed_text: String,
    pub total_text: String,
    pub combined_label: String,
    pub percentage: u8,
}

/// Strategy pattern for different progress label formats
pub trait ProgressLabelFormatter {
    fn format(&self, elapsed: f64, total: f64, percentage: u8) -> String;
}

/// Compact formatter: "0:34/3:10"
pub struct CompactProgressFormatter;

impl ProgressLabelFormatter for CompactProgressFormatter {
    fn format(&self, elapsed: f64, total: f64, _percentage: u8) -> String {
        format!("{}/{}", format_time(elapsed), format_time(total))
    }
}

/// Percentage formatter: "18% (0:34/3:10)"
pub struct PercentageProgressFormatter;

impl ProgressLabelFormatter for PercentageProgressFormatter {
    fn format(&self, elapsed: f64, total: f64, percentage: u8) -> String {
        format!(
            "{}% ({}/{})",
            percentage,
            format_time(elapsed),
            format_time(total)
        )
    }
}

/// Factory for creating formatted progress information
pub struct ProgressFormatter<F: ProgressLabelFormatter> {
    label_formatter: F,
}

impl<F: ProgressLabelFormatter> ProgressFormatter<F> {
    pub fn new(label_formatter: F) -> Self {
        Self { label_formatter }
    }

    pub fn format(&self, elapsed: f64, total: f64, percentage: u8) -> FormattedProgress {
        FormattedProgress {
            elapsed_text: format_time(elapsed),
            total_text: format_time(total),
            combined_label: self.label_formatter.format(elapsed, total, percentage),
            percentage,
        }
    }
}

impl ProgressFormatter<CompactProgressFormatter> {
    pub fn compact_formatter() -> Self {
        Self::new(CompactProgressFormatter)
    }
}

impl ProgressFormatter<PercentageProgressFormatter> {
    pub fn percentage_formatter() -> Self {
        Self::new(PercentageProgressFormatter)
    }
}
