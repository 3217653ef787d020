use inksac::prelude::*;

/// Colours diagnostics when the terminal can show them.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticHighlighter {
    color_support: ColorSupport,
}

impl Default for DiagnosticHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    pub fn error(&self, message: &str) -> String {
        if !self.enabled() {
            return message.to_string();
        }

        let error_style = Style::builder()
            .foreground(Color::Red)
            .bold()
            .build();

        message.style(error_style).to_string()
    }

    pub fn hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        hint.style(hint_style).to_string()
    }
}
