//! Terminal color support for the console report

use colored::*;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    Excellent,  // < 50ms
    Good,       // 50-200ms
    Fair,       // 200-1000ms
    Poor,       // >= 1000ms
}

impl LatencyLevel {
    pub fn from_latency_ms(latency_ms: u64) -> Self {
        if latency_ms < 50 {
            Self::Excellent
        } else if latency_ms < 200 {
            Self::Good
        } else if latency_ms < 1_000 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            border: Color::BrightBlack,
        }
    }
}

/// Applies a color scheme, or nothing at all when color is disabled
#[derive(Debug, Clone)]
pub struct Painter {
    enabled: bool,
    scheme: ColorScheme,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            scheme: ColorScheme::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.bold(text, self.scheme.header)
    }

    pub fn border(&self, text: &str) -> String {
        self.paint(text, self.scheme.border)
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, self.scheme.info)
    }

    pub fn success(&self, text: &str) -> String {
        self.bold(text, self.scheme.success)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, self.scheme.warning)
    }

    pub fn error(&self, text: &str) -> String {
        self.bold(text, self.scheme.error)
    }

    /// Color a success rate by how it compares to the pass threshold
    pub fn rate(&self, text: &str, rate: f64, threshold: f64) -> String {
        if rate >= threshold {
            self.paint(text, self.scheme.success)
        } else if rate >= threshold - 5.0 {
            self.paint(text, self.scheme.warning)
        } else {
            self.paint(text, self.scheme.error)
        }
    }

    pub fn latency(&self, text: &str, latency_ms: u64) -> String {
        self.paint(text, LatencyLevel::from_latency_ms(latency_ms).color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_levels() {
        assert_eq!(LatencyLevel::from_latency_ms(0), LatencyLevel::Excellent);
        assert_eq!(LatencyLevel::from_latency_ms(50), LatencyLevel::Good);
        assert_eq!(LatencyLevel::from_latency_ms(999), LatencyLevel::Fair);
        assert_eq!(LatencyLevel::from_latency_ms(30_000), LatencyLevel::Poor);
    }

    #[test]
    fn test_disabled_painter_is_plain() {
        let painter = Painter::new(false);
        assert_eq!(painter.error("FAILED"), "FAILED");
        assert_eq!(painter.rate("98.00%", 98.0, 99.0), "98.00%");
        assert!(!painter.is_enabled());
    }

    #[test]
    fn test_enabled_painter_adds_escapes() {
        colored::control::set_override(true);
        let painter = Painter::new(true);
        assert!(painter.success("ok").contains("\x1b["));
        colored::control::unset_override();
    }
}
