//! Title-screen text layout.
//!
//! The positions and sizes are hand-placed against the fixed 708x640
//! window; there is no layout engine behind them.

const HEADING_POS: (f32, f32) = (200.0, 140.0);
const HEADING_SIZE: f32 = 80.0;
const PROMPT_POS: (f32, f32) = (95.0, 330.0);
const PROMPT_SIZE: f32 = 35.0;
const FOOTER_POS: (f32, f32) = (284.0, 600.0);
const FOOTER_SIZE: f32 = 25.0;

/// One frame of title-screen text. `prompt_primary` is the blink phase:
/// true draws the prompt white, false black.
#[derive(Debug, Clone, Copy)]
pub struct TitleScreen {
    pub heading: &'static str,
    pub prompt: &'static str,
    pub footer: &'static str,
    pub prompt_primary: bool,
}

impl TitleScreen {
    pub(crate) fn paint(&self, ctx: &egui::Context) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("title_screen"),
        ));

        painter.text(
            egui::pos2(HEADING_POS.0, HEADING_POS.1),
            egui::Align2::LEFT_TOP,
            self.heading,
            egui::FontId::monospace(HEADING_SIZE),
            egui::Color32::WHITE,
        );

        let prompt_color = if self.prompt_primary {
            egui::Color32::WHITE
        } else {
            egui::Color32::BLACK
        };
        painter.text(
            egui::pos2(PROMPT_POS.0, PROMPT_POS.1),
            egui::Align2::LEFT_TOP,
            self.prompt,
            egui::FontId::monospace(PROMPT_SIZE),
            prompt_color,
        );

        painter.text(
            egui::pos2(FOOTER_POS.0, FOOTER_POS.1),
            egui::Align2::LEFT_TOP,
            self.footer,
            egui::FontId::monospace(FOOTER_SIZE),
            egui::Color32::WHITE,
        );
    }
}
