use eframe::egui;

use crate::media::MediaElement;
use crate::media::gst_element::GstMediaElement;
use crate::renderer::frame_sink::VideoFrame;

/// Playback surface: the current video frame plus transport controls.
pub struct RacePlayer {
    pub texture: Option<egui::TextureHandle>,
}

/// Something the viewer asked the video to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePlay,
    Seek(f64),
    SetRate(f64),
}

impl RacePlayer {
    pub fn new() -> Self {
        Self { texture: None }
    }

    pub fn clear(&mut self) {
        self.texture = None;
    }

    /// Update the egui texture from the newest decoded frame.
    pub fn update_texture(&mut self, video: &GstMediaElement, ctx: &egui::Context) {
        let Some(frame) = video.pull_frame() else {
            return;
        };
        self.upload(&frame, ctx);
    }

    fn upload(&mut self, frame: &VideoFrame, ctx: &egui::Context) {
        let color_img = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(color_img, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture(
                    "race_video_frame",
                    color_img,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
    }

    /// Draws the frame and controls, returning what the viewer clicked.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        video: &GstMediaElement,
        rates: &[f64],
        has_commentary: bool,
    ) -> Vec<PlayerAction> {
        let mut actions = Vec::new();

        ui.vertical(|ui| {
            let controls_height = 60.0;
            let available = ui.available_size() - egui::vec2(0.0, controls_height);
            match &self.texture {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .max_size(available)
                            .maintain_aspect_ratio(true),
                    );
                }
                None => {
                    ui.allocate_ui(available, |ui| ui.label("Loading video..."));
                }
            }

            ui.horizontal(|ui| {
                let label = if video.is_paused() { "Play" } else { "Pause" };
                if ui.button(label).clicked() {
                    actions.push(PlayerAction::TogglePlay);
                }

                let duration = video.duration().unwrap_or(0.0).max(0.0);
                let mut position = video.current_time().clamp(0.0, duration);
                let slider = egui::Slider::new(&mut position, 0.0..=duration.max(0.001))
                    .show_value(false)
                    .text(format!("{} / {}", format_time(position), format_time(duration)));
                let response = ui.add_enabled(duration > 0.0, slider);
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    actions.push(PlayerAction::Seek(position));
                }

                let current_rate = video.playback_rate();
                egui::ComboBox::from_id_salt("playback_rate")
                    .selected_text(format!("{}x", current_rate))
                    .show_ui(ui, |ui| {
                        for &rate in rates {
                            if ui
                                .selectable_label(rate == current_rate, format!("{}x", rate))
                                .clicked()
                                && rate != current_rate
                            {
                                actions.push(PlayerAction::SetRate(rate));
                            }
                        }
                    });

                let sound = if has_commentary {
                    "🎙 Commentary"
                } else {
                    "🔊 Race audio"
                };
                ui.label(egui::RichText::new(sound).color(egui::Color32::GRAY));
            });
        });

        actions
    }
}

pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(42.5), "0:42");
        assert_eq!(format_time(125.0), "2:05");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
