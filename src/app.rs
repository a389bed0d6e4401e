//! Application shell: menu bar, engine lifecycle and the inspector panel.
//!
//! The shell owns the data collaborators (file open, server fetch); the
//! engine only ever sees a finished `Chromosome` + gene collection.

use crate::chromosome::{Chromosome, Gene, Strand};
use crate::engine::Engine;
use crate::gene_fetch;
use crate::inspector::Inspector;
use anyhow::Result;
use eframe::egui::{self, menu};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub fasta: Option<PathBuf>,
    pub gff: Option<PathBuf>,
    pub server: Option<String>,
    pub chromosome: Option<String>,
}

pub struct ChromoscopeApp {
    engine: Option<Engine>,
    inspector: Inspector,
    server: Option<String>,
    status: String,
}

impl ChromoscopeApp {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            engine: None,
            inspector: Inspector::new(),
            server: config.server.clone(),
            status: String::new(),
        };
        if let Err(err) = app.load_initial(&config) {
            log::error!("initial load failed: {err:#}");
            app.status = format!("Load failed: {err}");
        }
        if app.engine.is_none() && app.status.is_empty() {
            app.load_demo();
        }
        app
    }

    fn load_initial(&mut self, config: &AppConfig) -> Result<()> {
        let Some(fasta) = &config.fasta else {
            return Ok(());
        };
        let chromosome =
            gene_fetch::load_chromosome_from_fasta(fasta, config.chromosome.as_deref())?;
        let genes = if let Some(gff) = &config.gff {
            gene_fetch::load_genes_from_gff(gff, &chromosome.name)?
        } else if let Some(server) = &config.server {
            gene_fetch::fetch_genes(server, &chromosome.name)
        } else {
            vec![]
        };
        self.set_engine(chromosome, genes);
        Ok(())
    }

    /// Synthetic chromosome so the viewer starts up showing something even
    /// with no data arguments.
    fn load_demo(&mut self) {
        let length = 120_000u64;
        let mut sequence = String::with_capacity(length as usize);
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..length {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            sequence.push(match state % 4 {
                0 => 'A',
                1 => 'C',
                2 => 'G',
                _ => 'T',
            });
        }
        let chromosome = Chromosome::with_sequence("chrDemo", sequence);
        let mut genes = Vec::new();
        for i in 0..14u64 {
            let start = 2_000.0 + i as f64 * 8_000.0;
            let end = start + 1_500.0 + (i % 5) as f64 * 900.0;
            let strand = if i % 3 == 0 {
                Strand::Reverse
            } else {
                Strand::Forward
            };
            let mut gene = Gene::new(format!("gene-DEMO{i:02}"), start, end, strand);
            gene.attributes
                .push(("Name".to_string(), format!("DEMO{i:02}")));
            gene.attributes
                .push(("gene_biotype".to_string(), "protein_coding".to_string()));
            genes.push(gene);
        }
        self.set_engine(chromosome, genes);
        self.status = "Demo data (open a FASTA file to load a chromosome)".to_string();
    }

    fn set_engine(&mut self, chromosome: Chromosome, genes: Vec<Gene>) {
        let name = chromosome.name.clone();
        let count = genes.len();
        match Engine::new(chromosome, genes) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.status = format!("{name}: {count} genes");
            }
            Err(err) => {
                log::error!("engine rejected chromosome '{name}': {err:#}");
                self.engine = None;
                self.status = format!("Cannot display '{name}': {err}");
            }
        }
    }

    fn open_fasta(&mut self, path: &Path) {
        match gene_fetch::load_chromosome_from_fasta(path, None) {
            Ok(chromosome) => {
                let genes = match &self.server {
                    Some(server) => gene_fetch::fetch_genes(server, &chromosome.name),
                    None => vec![],
                };
                self.set_engine(chromosome, genes);
            }
            Err(err) => {
                log::warn!("could not open {}: {err:#}", path.display());
                self.status = format!("Could not open {}: {err}", path.display());
            }
        }
    }

    fn open_gff(&mut self, path: &Path) {
        let Some(engine) = &mut self.engine else {
            self.status = "Open a chromosome first".to_string();
            return;
        };
        let name = engine.chromosome().name.clone();
        match gene_fetch::load_genes_from_gff(path, &name) {
            Ok(genes) => {
                self.status = format!("{name}: {} genes", genes.len());
                engine.replace_genes(genes);
            }
            Err(err) => {
                log::warn!("could not read {}: {err:#}", path.display());
                self.status = format!("Could not read {}: {err}", path.display());
            }
        }
    }

    fn fetch_from_server(&mut self) {
        let Some(server) = self.server.clone() else {
            return;
        };
        let Some(engine) = &mut self.engine else {
            self.status = "Open a chromosome first".to_string();
            return;
        };
        let name = engine.chromosome().name.clone();
        let genes = gene_fetch::fetch_genes(&server, &name);
        self.status = format!("{name}: {} genes from {server}", genes.len());
        engine.replace_genes(genes);
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open FASTA…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("FASTA", &["fa", "fna", "fasta"])
                        .pick_file()
                    {
                        self.open_fasta(&path);
                    }
                }
                if ui.button("Open GFF annotations…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("GFF", &["gff", "gff3", "gz"])
                        .pick_file()
                    {
                        self.open_gff(&path);
                    }
                }
                if self.server.is_some() && ui.button("Fetch genes from server").clicked() {
                    self.fetch_from_server();
                }
            });
            ui.menu_button("View", |ui| {
                if ui.button("Reset view").clicked() {
                    if let Some(engine) = &mut self.engine {
                        engine.zoom_mut().reset();
                    }
                }
            });
            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    if !crate::about::show_native_about_panel() {
                        self.status = crate::about::version_cli_text().replace('\n', " · ");
                    }
                }
            });
        });
    }
}

impl eframe::App for ChromoscopeApp {
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        let ctx = ui.ctx().clone();
        let ctx = &ctx;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| match &mut self.engine {
                Some(engine) => self.inspector.render(ui, engine),
                None => {
                    ui.weak("No chromosome loaded");
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.engine {
            Some(engine) => engine.show(ui),
            None => {
                ui.weak(&self.status);
            }
        });
    }
}
