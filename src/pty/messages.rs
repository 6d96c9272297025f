use anstyle::{Reset, RgbColor, Style};

const PRIMARY_COLOR: Style =
    Style::new().fg_color(Some(anstyle::Color::Rgb(RgbColor(94, 140, 207))));

fn render_arrow() -> String {
    format!("{PRIMARY_COLOR}❱{Reset}")
}

/// Banner written to stdout when a session becomes the foreground session
#[must_use]
pub fn format_focus_banner(label: &str) -> Vec<u8> {
    format!("\r\n{} {label}\r\n", render_arrow()).into()
}

/// Closing note printed once every step has been dispatched
#[must_use]
pub fn format_finished_message() -> String {
    format!(
        "\r\n{} All steps dispatched, sessions stay open (Ctrl-C to exit)",
        render_arrow()
    )
}
