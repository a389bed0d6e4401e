//! Inspector side panel: active-gene readout, view range, zoom slider and
//! the manual start/end position form.

use crate::engine::Engine;
use crate::ticks::format_bp;
use eframe::egui::{self, CollapsingHeader, Grid, Slider, TextEdit};

#[derive(Debug, Default)]
pub struct Inspector {
    start_text: String,
    end_text: String,
    editing: bool,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ui: &mut egui::Ui, engine: &mut Engine) {
        // Mirror the committed region into the form whenever the user is
        // not typing into it.
        if !self.editing {
            let region = engine.region();
            self.start_text = format_bp(region.start);
            self.end_text = format_bp(region.end);
        }

        ui.heading(&engine.chromosome().name);
        ui.label(format!(
            "{} bp · {} genes",
            format_bp(engine.chromosome().length as f64),
            engine.gene_count()
        ));
        ui.separator();

        let region = engine.region();
        ui.label(format!(
            "View: {} – {} ({} bp)",
            format_bp(region.start),
            format_bp(region.end),
            format_bp(region.width())
        ));

        let max_zoom = engine.max_zoom();
        let mut z = engine.zoom().model().zoom();
        let slider = ui.add(
            Slider::new(&mut z, 1.0..=max_zoom.max(1.0))
                .logarithmic(true)
                .text("zoom"),
        );
        if slider.changed() {
            engine.zoom_mut().slider_zoom(z);
        }

        ui.horizontal(|ui| {
            let start_edit = ui.add(TextEdit::singleline(&mut self.start_text).desired_width(80.0));
            ui.label("–");
            let end_edit = ui.add(TextEdit::singleline(&mut self.end_text).desired_width(80.0));
            let submitted = ui.button("Go").clicked()
                || ((start_edit.lost_focus() || end_edit.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter)));
            self.editing = start_edit.has_focus() || end_edit.has_focus();
            if submitted {
                engine
                    .zoom_mut()
                    .apply_position_form(&self.start_text, &self.end_text);
                self.editing = false;
            }
        });
        if ui.button("Reset view").clicked() {
            engine.zoom_mut().reset();
        }
        ui.separator();

        match engine.active_snapshot() {
            Some(snapshot) => {
                ui.strong(&snapshot.name);
                Grid::new("gene_snapshot").num_columns(2).show(ui, |ui| {
                    ui.label("id");
                    ui.label(&snapshot.id);
                    ui.end_row();
                    ui.label("range");
                    ui.label(format!(
                        "{} – {}",
                        format_bp(snapshot.start),
                        format_bp(snapshot.end)
                    ));
                    ui.end_row();
                    ui.label("strand");
                    ui.label(snapshot.strand.symbol());
                    ui.end_row();
                });
                if !snapshot.attributes.is_empty() {
                    CollapsingHeader::new("Attributes")
                        .default_open(false)
                        .show(ui, |ui| {
                            Grid::new("gene_attributes").num_columns(2).show(ui, |ui| {
                                for (key, value) in &snapshot.attributes {
                                    ui.label(key);
                                    ui.label(value);
                                    ui.end_row();
                                }
                            });
                        });
                }
            }
            None => {
                ui.weak("No selection");
            }
        }
    }
}
