//! Shared state types for the egui UI.
//!
//! The home screen is modeled as an explicit state machine: every mutation
//! goes through [`HomeViewState::apply`], which keeps the transitions pure
//! and directly testable.

use egui::ColorImage;

use crate::report::{self, ReportLine};

/// Warning shown when predict is triggered without a staged image.
pub const NO_IMAGE_WARNING: &str = "Please upload an image before predicting!";

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub status: StatusBarState,
    pub home: HomeViewState,
}

/// The two navigable screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    About,
}

/// Badge tone shown in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Busy,
    Error,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub tone: StatusTone,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Select a skin image to get started".into(),
            badge_label: "Idle".into(),
            tone: StatusTone::Idle,
        }
    }
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Decoded pixels ready to upload to an egui texture.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    pub image: ColorImage,
}

impl PreviewImage {
    /// Source dimensions in pixels.
    pub fn dimensions(&self) -> [usize; 2] {
        self.image.size
    }
}

/// Phase of the upload/predict/render workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PredictPhase {
    #[default]
    Idle,
    ImageSelected,
    Predicting,
    Succeeded,
    Failed,
}

/// State owned by the analyzer screen.
#[derive(Clone, Debug, Default)]
pub struct HomeViewState {
    pub phase: PredictPhase,
    /// Filename of the staged image, if any.
    pub file_name: Option<String>,
    /// Replaced wholesale when a new image is chosen; the renderer drops the
    /// superseded texture along with it.
    pub preview: Option<PreviewImage>,
    /// Shown in the preview slot when the staged file could not be decoded.
    pub preview_notice: Option<String>,
    pub report: Vec<ReportLine>,
    pub warning: Option<String>,
}

/// Events feeding the home-screen reducer.
#[derive(Clone, Debug)]
pub enum HomeEvent {
    /// A file was selected; preview is `None` when decoding failed.
    ImageChosen {
        file_name: String,
        preview: Option<PreviewImage>,
        notice: Option<String>,
    },
    /// Predict was triggered without a staged image.
    PredictBlocked,
    /// A request was dispatched.
    PredictStarted,
    /// The service answered; the report block replaces any prior result.
    PredictSucceeded(Vec<ReportLine>),
    /// The exchange failed with a user-facing message.
    PredictFailed(String),
}

impl HomeViewState {
    /// Apply one event. `keep_last_result` controls whether a new selection
    /// preserves the previous report while browsing.
    pub fn apply(&mut self, event: HomeEvent, keep_last_result: bool) {
        match event {
            HomeEvent::ImageChosen {
                file_name,
                preview,
                notice,
            } => {
                self.file_name = Some(file_name);
                self.preview = preview;
                self.preview_notice = notice;
                self.warning = None;
                if !keep_last_result {
                    self.report.clear();
                }
                self.phase = PredictPhase::ImageSelected;
            }
            HomeEvent::PredictBlocked => {
                self.warning = Some(NO_IMAGE_WARNING.to_string());
                self.report.clear();
            }
            HomeEvent::PredictStarted => {
                self.warning = None;
                self.phase = PredictPhase::Predicting;
            }
            HomeEvent::PredictSucceeded(report) => {
                self.report = report;
                self.warning = None;
                self.phase = PredictPhase::Succeeded;
            }
            HomeEvent::PredictFailed(message) => {
                self.report = report::error_report(&message);
                self.warning = None;
                self.phase = PredictPhase::Failed;
            }
        }
    }

    /// Whether the predict trigger is enabled.
    pub fn can_predict(&self) -> bool {
        self.phase != PredictPhase::Predicting
    }

    /// Whether an image has been staged.
    pub fn has_image(&self) -> bool {
        self.file_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chosen(name: &str) -> HomeEvent {
        HomeEvent::ImageChosen {
            file_name: name.into(),
            preview: Some(PreviewImage {
                image: ColorImage::from_rgba_unmultiplied([1, 1], &[20, 20, 20, 255]),
            }),
            notice: None,
        }
    }

    fn sample_report() -> Vec<ReportLine> {
        report::build_report(&crate::predict::Prediction {
            class_name: "Melanoma".into(),
            confidence: 0.9,
            description: None,
            treatment: None,
            recommendation: None,
        })
    }

    #[test]
    fn blocked_predict_sets_exact_warning_and_clears_report() {
        let mut state = HomeViewState::default();
        state.report = sample_report();
        state.apply(HomeEvent::PredictBlocked, true);
        assert_eq!(state.warning.as_deref(), Some(NO_IMAGE_WARNING));
        assert!(state.report.is_empty());
        assert_eq!(state.phase, PredictPhase::Idle);
    }

    #[test]
    fn choosing_an_image_clears_warning_and_replaces_preview() {
        let mut state = HomeViewState::default();
        state.apply(HomeEvent::PredictBlocked, true);
        state.apply(chosen("first.png"), true);
        assert!(state.warning.is_none());
        assert!(state.preview.is_some());
        assert_eq!(state.file_name.as_deref(), Some("first.png"));
        assert_eq!(state.phase, PredictPhase::ImageSelected);

        state.apply(chosen("second.png"), true);
        assert_eq!(state.file_name.as_deref(), Some("second.png"));
    }

    #[test]
    fn new_selection_retention_is_configurable() {
        let mut keeping = HomeViewState::default();
        keeping.report = sample_report();
        keeping.apply(chosen("next.png"), true);
        assert!(!keeping.report.is_empty());

        let mut clearing = HomeViewState::default();
        clearing.report = sample_report();
        clearing.apply(chosen("next.png"), false);
        assert!(clearing.report.is_empty());
    }

    #[test]
    fn predicting_disables_the_trigger_until_resolution() {
        let mut state = HomeViewState::default();
        state.apply(chosen("a.png"), true);
        assert!(state.can_predict());
        state.apply(HomeEvent::PredictStarted, true);
        assert!(!state.can_predict());
        state.apply(HomeEvent::PredictSucceeded(sample_report()), true);
        assert!(state.can_predict());
        assert_eq!(state.phase, PredictPhase::Succeeded);
    }

    #[test]
    fn failure_yields_one_error_line_and_stays_interactive() {
        let mut state = HomeViewState::default();
        state.apply(chosen("a.png"), true);
        state.apply(HomeEvent::PredictStarted, true);
        state.apply(HomeEvent::PredictFailed("connection refused".into()), true);
        assert_eq!(state.report.len(), 1);
        assert!(state.report[0].text.starts_with("❌ Error: "));
        assert!(state.can_predict());
        assert_eq!(state.phase, PredictPhase::Failed);
    }

    #[test]
    fn warning_and_fresh_report_are_mutually_exclusive() {
        let mut state = HomeViewState::default();
        state.apply(chosen("a.png"), true);
        state.apply(HomeEvent::PredictStarted, true);
        state.apply(HomeEvent::PredictSucceeded(sample_report()), true);
        assert!(state.warning.is_none() && !state.report.is_empty());

        state.file_name = None;
        state.apply(HomeEvent::PredictBlocked, true);
        assert!(state.warning.is_some() && state.report.is_empty());
    }
}
