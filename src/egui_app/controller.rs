//! Maintains app state and bridges core logic to the egui UI.
//!
//! All IO happens here: file selection, config load and the prediction
//! worker thread. Results come back over an mpsc channel drained once per
//! frame; each request carries a generation id so a stale response can never
//! overwrite state that has since been replaced.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use rfd::FileDialog;

use crate::config::{self, AppConfig};
use crate::egui_app::state::{HomeEvent, Screen, StatusBarState, StatusTone, UiState};
use crate::egui_app::view_model;
use crate::predict::{self, ImageUpload};
use crate::report;

/// Outcome of one prediction worker, tagged with its request generation.
struct PredictionOutcome {
    request_id: u64,
    result: Result<predict::Prediction, predict::PredictError>,
}

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    config: AppConfig,
    upload: Option<ImageUpload>,
    message_tx: Sender<PredictionOutcome>,
    message_rx: Receiver<PredictionOutcome>,
    in_flight: Option<u64>,
    next_request_id: u64,
}

impl EguiController {
    pub fn new() -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            ui: UiState::default(),
            config: AppConfig::default(),
            upload: None,
            message_tx,
            message_rx,
            in_flight: None,
            next_request_id: 0,
        }
    }

    /// Load persisted config and populate initial UI state.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        self.config = config::load_or_default()?;
        tracing::info!(endpoint = self.config.endpoint_url.as_str(), "Configuration loaded");
        self.ui.status = StatusBarState::idle();
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.ui.screen
    }

    pub fn show_home(&mut self) {
        self.ui.screen = Screen::Home;
    }

    pub fn show_about(&mut self) {
        self.ui.screen = Screen::About;
    }

    /// Open a native file dialog; no selection is a no-op.
    pub fn pick_image_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Choose a skin image")
            .pick_file()
        else {
            return;
        };
        self.set_image_from_path(&path);
    }

    /// Stage an image from disk and update the preview.
    pub fn set_image_from_path(&mut self, path: &Path) {
        match ImageUpload::from_path(path) {
            Ok(upload) => self.set_image(upload),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read image");
                self.set_status(format!("Could not read {}: {err}", path.display()), StatusTone::Error);
            }
        }
    }

    /// Stage an already-read file. Any file type is accepted; a preview that
    /// fails to decode keeps the bytes staged for upload.
    pub fn set_image(&mut self, upload: ImageUpload) {
        let (preview, notice) = match view_model::decode_preview(&upload.bytes) {
            Ok(preview) => (Some(preview), None),
            Err(err) => {
                tracing::debug!(file = upload.file_name.as_str(), error = err.as_str(), "Preview decode failed");
                (None, Some("Preview unavailable for this file".to_string()))
            }
        };
        let file_name = upload.file_name.clone();
        // A selection replaces whatever a pending request was about.
        self.in_flight = None;
        self.upload = Some(upload);
        self.apply_home_event(HomeEvent::ImageChosen {
            file_name: file_name.clone(),
            preview,
            notice,
        });
        self.set_status(format!("Loaded {file_name}"), StatusTone::Info);
    }

    /// Whether a request is currently pending.
    pub fn is_predicting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Trigger one prediction exchange for the staged image.
    pub fn request_prediction(&mut self) {
        if !self.ui.home.can_predict() {
            tracing::debug!("Predict rejected while a request is in flight");
            return;
        }
        let Some(upload) = self.upload.clone() else {
            self.apply_home_event(HomeEvent::PredictBlocked);
            self.set_status("Waiting for an image".to_string(), StatusTone::Idle);
            return;
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(request_id);
        self.apply_home_event(HomeEvent::PredictStarted);
        self.set_status(format!("Analyzing {}…", upload.file_name), StatusTone::Busy);

        let url = self.config.predict_url();
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = predict::predict(&url, &upload);
            let _ = tx.send(PredictionOutcome { request_id, result });
        });
    }

    /// Drain worker results; called once per frame by the renderer.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let outcome = match self.message_rx.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            if Some(outcome.request_id) != self.in_flight {
                tracing::debug!(request_id = outcome.request_id, "Dropping stale prediction result");
                continue;
            }
            self.in_flight = None;
            match outcome.result {
                Ok(prediction) => {
                    tracing::info!(
                        class = prediction.class_name.as_str(),
                        confidence = prediction.confidence,
                        "Prediction received"
                    );
                    let lines = report::build_report(&prediction);
                    self.apply_home_event(HomeEvent::PredictSucceeded(lines));
                    self.set_status("Prediction ready".to_string(), StatusTone::Info);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Prediction failed");
                    self.apply_home_event(HomeEvent::PredictFailed(err.to_string()));
                    self.set_status("Prediction failed".to_string(), StatusTone::Error);
                }
            }
        }
    }

    fn apply_home_event(&mut self, event: HomeEvent) {
        self.ui.home.apply(event, self.config.keep_last_result);
    }

    fn set_status(&mut self, text: String, tone: StatusTone) {
        self.ui.status = StatusBarState {
            text,
            badge_label: match tone {
                StatusTone::Idle => "Idle",
                StatusTone::Info => "Ready",
                StatusTone::Busy => "Working",
                StatusTone::Error => "Error",
            }
            .to_string(),
            tone,
        };
    }
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new()
    }
}
