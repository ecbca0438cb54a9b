//! egui renderer for the application UI.

use std::time::Duration;

use eframe::egui::{
    self, Frame, Margin, RichText, TextureHandle, TextureOptions, Ui,
};

use crate::egui_app::controller::EguiController;
use crate::egui_app::state::Screen;
use crate::egui_app::view_model;
use crate::report::ReportLine;

pub mod style;

/// Smallest viewport the layout still works at.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2::new(560.0, 560.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    preview_tex: Option<TextureHandle>,
}

impl EguiApp {
    /// Create a new egui app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = EguiController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
            preview_tex: None,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = style::BG_PRIMARY;
        visuals.panel_fill = style::BG_PRIMARY;
        visuals.widgets.noninteractive.bg_fill = style::PANEL_FILL;
        visuals.hyperlink_color = style::ACCENT;
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::none()
                    .fill(style::NAV_FILL)
                    .inner_margin(Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("SkinAlyze")
                            .color(style::ACCENT)
                            .strong()
                            .size(22.0),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let screen = self.controller.screen();
                        if ui
                            .selectable_label(
                                screen == Screen::About,
                                RichText::new("About Us").color(style::TEXT_PRIMARY),
                            )
                            .clicked()
                        {
                            self.controller.show_about();
                        }
                        if ui
                            .selectable_label(
                                screen == Screen::Home,
                                RichText::new("Analyzer").color(style::TEXT_PRIMARY),
                            )
                            .clicked()
                        {
                            self.controller.show_home();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::none()
                    .fill(style::NAV_FILL)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(6.0, 9.0),
                        6.0,
                        style::status_badge_color(status.tone),
                    );
                    ui.add_space(14.0);
                    ui.label(RichText::new(&status.badge_label).color(style::TEXT_PRIMARY));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(style::TEXT_MUTED));
                });
            });
    }

    fn render_home(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(18.0);
            ui.label(
                RichText::new("AI-Powered Skin Disease Analyzer")
                    .color(style::TEXT_PRIMARY)
                    .strong()
                    .size(20.0),
            );
            ui.add_space(4.0);
            ui.label(
                RichText::new(
                    "Upload a skin image to get instant predictions and professional recommendations.",
                )
                .color(style::TEXT_MUTED),
            );
            ui.add_space(14.0);

            ui.horizontal(|ui| {
                // Center the button pair by padding half the leftover width.
                let spacing = ui.spacing().item_spacing.x;
                let buttons_width = 220.0;
                let pad = ((ui.available_width() - buttons_width - spacing) / 2.0).max(0.0);
                ui.add_space(pad);
                if ui.button("Choose image…").clicked() {
                    self.controller.pick_image_via_dialog();
                }
                let can_predict = self.controller.ui.home.can_predict();
                let predict = ui.add_enabled(
                    can_predict,
                    egui::Button::new(RichText::new("Predict").strong()),
                );
                if predict.clicked() {
                    self.controller.request_prediction();
                }
            });

            if let Some(name) = self.controller.ui.home.file_name.clone() {
                ui.add_space(6.0);
                ui.label(RichText::new(name).color(style::TEXT_MUTED).small());
            }

            if let Some(warning) = self.controller.ui.home.warning.clone() {
                ui.add_space(8.0);
                ui.label(RichText::new(warning).color(style::WARNING).strong());
            }

            self.render_preview(ui);

            let report = self.controller.ui.home.report.clone();
            if !report.is_empty() {
                ui.add_space(14.0);
                render_report(ui, &report);
            }
            ui.add_space(18.0);
        });
    }

    fn render_preview(&mut self, ui: &mut Ui) {
        let home = &self.controller.ui.home;
        if let Some(notice) = &home.preview_notice {
            ui.add_space(10.0);
            ui.label(RichText::new(notice).color(style::TEXT_MUTED).italics());
        }
        let Some(preview) = &home.preview else {
            self.preview_tex = None;
            return;
        };

        // Re-upload only when the pixels changed size; a same-size selection
        // overwrites the existing texture in place.
        let new_size = preview.image.size;
        let same_size = self
            .preview_tex
            .as_ref()
            .is_some_and(|tex| tex.size() == new_size);
        if same_size {
            if let Some(tex) = self.preview_tex.as_mut() {
                tex.set(preview.image.clone(), TextureOptions::LINEAR);
            }
        } else {
            let tex = ui.ctx().load_texture(
                "preview_texture",
                preview.image.clone(),
                TextureOptions::LINEAR,
            );
            self.preview_tex = Some(tex);
        }
        let Some(tex) = self.preview_tex.as_ref() else {
            return;
        };

        let display = view_model::preview_display_size(new_size, view_model::PREVIEW_MAX_WIDTH);
        ui.add_space(12.0);
        ui.add(egui::Image::new((tex.id(), display)));
        ui.label(
            RichText::new(view_model::dimensions_label(new_size))
                .color(style::TEXT_MUTED)
                .small(),
        );
    }

    fn render_about(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(620.0);
                ui.add_space(20.0);
                ui.label(
                    RichText::new("About Us")
                        .color(style::ACCENT)
                        .strong()
                        .size(24.0),
                );
                ui.add_space(14.0);
                for paragraph in ABOUT_PARAGRAPHS {
                    ui.label(RichText::new(*paragraph).color(style::TEXT_PRIMARY));
                    ui.add_space(10.0);
                }
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    ui.label(RichText::new("Disclaimer:").color(style::TEXT_PRIMARY).strong());
                    ui.label(RichText::new(ABOUT_DISCLAIMER).color(style::TEXT_PRIMARY));
                });
                ui.add_space(20.0);
            });
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if self.controller.is_predicting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.screen() {
            Screen::Home => self.render_home(ui),
            Screen::About => self.render_about(ui),
        });
    }
}

/// Render the report block; labeled lines draw the label segment emphasized.
fn render_report(ui: &mut Ui, lines: &[ReportLine]) {
    Frame::none()
        .fill(style::REPORT_FILL)
        .corner_radius(8.0)
        .inner_margin(Margin::same(14))
        .show(ui, |ui| {
            ui.set_min_width(360.0);
            for line in lines {
                if line.is_blank() {
                    ui.add_space(8.0);
                    continue;
                }
                match line.label {
                    Some(label) => {
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing.x = 5.0;
                            ui.label(
                                RichText::new(label)
                                    .color(style::TEXT_PRIMARY)
                                    .strong()
                                    .size(15.0),
                            );
                            ui.label(RichText::new(&line.text).color(style::TEXT_PRIMARY));
                        });
                    }
                    None => {
                        ui.label(RichText::new(&line.text).color(style::TEXT_PRIMARY));
                    }
                }
            }
        });
}

const ABOUT_PARAGRAPHS: &[&str] = &[
    "Skin disease is said to be the 4th most common disease globally, affecting \
     millions of people, while most of the population lacks access to proper \
     dermatological care and resources. SkinAlyze was created to bridge this gap \
     with an AI-powered tool.",
    "SkinAlyze analyzes skin images and detects possible skin conditions. Our \
     mission is to assist users in getting early insights and professional \
     recommendations using advanced deep learning models. The app is built to \
     support dermatological awareness and help people take better care of their \
     skin. The underlying model is trained on a diverse dataset of skin \
     conditions.",
    "Join us in our mission and share SkinAlyze with friends and family to \
     promote greater skin health awareness.",
];

const ABOUT_DISCLAIMER: &str = "This tool is for informational purposes only and is \
     not a substitute for professional medical advice, diagnosis, or treatment. \
     Always seek the advice of your physician or other qualified health provider \
     with any questions you may have regarding a medical condition.";
