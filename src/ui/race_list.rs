use eframe::egui;
use std::path::PathBuf;

use crate::types::race_media::RaceCard;

pub enum RaceListAction {
    Select(usize),
    OpenCard(PathBuf),
}

pub fn race_list_panel(ui: &mut egui::Ui, card: &RaceCard, current: usize) -> Option<RaceListAction> {
    let mut action = None;

    ui.vertical(|ui| {
        ui.heading(&card.event_name);
        ui.separator();

        if ui.button("Open Race Card").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Race card", &["json"])
                .pick_file()
            {
                action = Some(RaceListAction::OpenCard(path));
            }
        }
        ui.separator();

        for (i, race) in card.races.iter().enumerate() {
            ui.horizontal(|ui| {
                // Mic marks races that carry their own commentary
                let icon = if race.has_commentary() { "🎙" } else { "🎬" };
                ui.label(icon);
                if ui.selectable_label(i == current, &race.race_id).clicked() && i != current {
                    action = Some(RaceListAction::Select(i));
                }
            });
        }
    });

    action
}
