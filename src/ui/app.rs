use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::PlayerConfig;
use crate::error::PlayerResult;
use crate::media::MediaElement;
use crate::media::gst_element::GstBackend;
use crate::sync::synchronizer::MediaSynchronizer;
use crate::types::race_media::RaceCard;
use crate::ui::race_list::{RaceListAction, race_list_panel};
use crate::ui::race_player::{PlayerAction, RacePlayer};

pub struct RaceNightApp {
    pub card: RaceCard,
    pub current: usize,
    pub config: PlayerConfig,
    pub synchronizer: MediaSynchronizer<GstBackend>,
    pub player: RacePlayer,
    finished: Rc<Cell<bool>>,
    last_drift_check: Instant,
    status: Option<String>,
}

impl RaceNightApp {
    /// Mounts the first race on the card.
    pub fn new(card: RaceCard, config: PlayerConfig) -> PlayerResult<Self> {
        let finished = Rc::new(Cell::new(false));
        let flag = finished.clone();
        let mut synchronizer = MediaSynchronizer::new(GstBackend).with_completion(move |media| {
            tracing::info!(race = %media.race_id, "race finished");
            flag.set(true);
        });
        if let Some(first) = card.races.first() {
            synchronizer.mount(first)?;
        }

        let mut app = Self {
            card,
            current: 0,
            config,
            synchronizer,
            player: RacePlayer::new(),
            finished,
            last_drift_check: Instant::now(),
            status: None,
        };
        if app.config.autoplay {
            app.start_playback();
        }
        Ok(app)
    }

    fn select_race(&mut self, index: usize, autoplay: bool) {
        let Some(media) = self.card.races.get(index).cloned() else {
            return;
        };
        self.current = index;
        self.player.clear();
        match self.synchronizer.update(&media) {
            Ok(()) => {
                self.status = None;
                if autoplay {
                    self.start_playback();
                }
            }
            Err(err) => {
                tracing::error!(race = %media.race_id, error = %err, "failed to load race");
                self.status = Some(format!("Could not load {}: {}", media.race_id, err));
                self.synchronizer.unmount();
            }
        }
    }

    fn open_card(&mut self, path: &Path) {
        match RaceCard::load_from_file(path) {
            Ok(card) => {
                tracing::info!(event = %card.event_name, path = %path.display(), "race card opened");
                self.card = card;
                self.select_race(0, false);
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to open race card");
                self.status = Some(format!("Could not open {}: {}", path.display(), err));
            }
        }
    }

    fn start_playback(&mut self) {
        if let Ok(video) = self.synchronizer.video_mut() {
            if video.is_paused() {
                if let Err(err) = video.play() {
                    tracing::warn!(error = %err, "autoplay failed");
                }
            }
        }
    }

    fn apply(&mut self, action: PlayerAction) {
        let Ok(video) = self.synchronizer.video_mut() else {
            return;
        };
        let result = match action {
            PlayerAction::TogglePlay if video.is_paused() => video.play(),
            PlayerAction::TogglePlay => video.pause(),
            PlayerAction::Seek(position) => video.seek(position),
            PlayerAction::SetRate(rate) => video.set_playback_rate(rate),
        };
        if let Err(err) = result {
            tracing::warn!(?action, error = %err, "video control failed");
        }
    }

    fn advance_after_finish(&mut self) {
        if !self.finished.replace(false) {
            return;
        }
        let next = self.current + 1;
        if next < self.card.races.len() {
            self.select_race(next, self.config.autoplay);
        } else {
            self.status = Some("That's the last race of the night".to_string());
        }
    }

    fn check_drift(&mut self) {
        let Some(tolerance) = self.config.drift_tolerance_secs else {
            return;
        };
        let interval = Duration::from_millis(self.config.drift_check_interval_ms);
        if self.last_drift_check.elapsed() >= interval {
            self.last_drift_check = Instant::now();
            self.synchronizer.resync_drift(tolerance);
        }
    }
}

impl eframe::App for RaceNightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.synchronizer.pump();
        self.advance_after_finish();
        self.check_drift();

        if let Some(video) = self.synchronizer.video() {
            self.player.update_texture(video, ctx);
        }

        egui::SidePanel::left("race_list_panel").show(ctx, |ui| {
            match race_list_panel(ui, &self.card, self.current) {
                Some(RaceListAction::Select(index)) => self.select_race(index, true),
                Some(RaceListAction::OpenCard(path)) => self.open_card(&path),
                None => {}
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(media) = self.synchronizer.media() {
                ui.heading(&media.race_id);
            }
            if let Some(status) = &self.status {
                ui.label(egui::RichText::new(status).color(egui::Color32::LIGHT_RED));
            }
            if let Some(follower) = self.synchronizer.follower() {
                let failures = self.synchronizer.follower_failures();
                let text = if failures > 0 {
                    format!("Commentary {} ({} sync failures)", follower.source(), failures)
                } else {
                    format!("Commentary {}", follower.source())
                };
                ui.small(text);
            }
            let has_commentary = self.synchronizer.has_commentary();
            let actions = match self.synchronizer.video() {
                Some(video) => {
                    self.player
                        .show(ui, video, &self.config.playback_rates, has_commentary)
                }
                None => {
                    ui.label("No race loaded");
                    Vec::new()
                }
            };
            for action in actions {
                self.apply(action);
            }
        });

        let playing = self
            .synchronizer
            .playback_state()
            .is_some_and(|state| state.is_playing);
        if playing {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            // Keep polling the bus for preroll and errors
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
