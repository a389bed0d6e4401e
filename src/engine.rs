//! Composition root: owns the data, the coordinate model, the interaction
//! state and both tracks, and re-renders everything from the committed
//! region in one synchronous pass.
//!
//! Both tracks draw from the same committed region within a single
//! `show` call, and every input handler runs to completion before the next
//! event is processed, so the two views are never observably inconsistent.
//! Resize needs no special handling: all derived geometry is recomputed
//! from the still-valid region on the next pass.

use crate::chromosome::{Chromosome, Gene, GeneSnapshot};
use crate::gene_index::GeneIndex;
use crate::interaction::InteractionState;
use crate::track_detail::DetailTrack;
use crate::track_overview::OverviewTrack;
use crate::viewport::ViewportRegion;
use crate::zoom::ZoomController;
use anyhow::{Result, ensure};
use eframe::egui;

pub struct Engine {
    chromosome: Chromosome,
    genes: Vec<Gene>,
    index: GeneIndex,
    zoom: ZoomController,
    interaction: InteractionState,
    overview: OverviewTrack,
    detail: DetailTrack,
}

impl Engine {
    /// A non-positive chromosome length is a configuration error, reported
    /// once here; the engine never renders in that case. A sequence whose
    /// length disagrees with the declared length is degenerate data: the
    /// sequence is dropped (disabling per-base letters) and the rest works.
    pub fn new(mut chromosome: Chromosome, genes: Vec<Gene>) -> Result<Self> {
        ensure!(
            chromosome.length >= 1,
            "chromosome '{}' has non-positive length",
            chromosome.name
        );
        if let Some(sequence) = &chromosome.sequence {
            if sequence.len() as u64 != chromosome.length {
                log::warn!(
                    "chromosome '{}': sequence length {} does not match declared length {}; \
                     disabling per-base letters",
                    chromosome.name,
                    sequence.len(),
                    chromosome.length
                );
                chromosome.sequence = None;
            }
        }
        let index = GeneIndex::build(&genes);
        let zoom = ZoomController::new(chromosome.length);
        Ok(Self {
            chromosome,
            genes,
            index,
            zoom,
            interaction: InteractionState::new(),
            overview: OverviewTrack::new(),
            detail: DetailTrack::new(),
        })
    }

    /// Swaps the gene collection in place. The index is rebuilt and the
    /// interaction state cleared, so no stale gene id survives the swap.
    pub fn replace_genes(&mut self, genes: Vec<Gene>) {
        self.genes = genes;
        self.index = GeneIndex::build(&self.genes);
        self.interaction.clear();
    }

    /// One recompute-and-redraw pass covering both tracks.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.overview.render(
            ui,
            &self.chromosome,
            &self.genes,
            &self.index,
            &mut self.zoom,
            &mut self.interaction,
        );
        ui.add_space(4.0);
        self.detail.render(
            ui,
            &self.chromosome,
            &self.genes,
            &self.index,
            &mut self.zoom,
            &mut self.interaction,
        );
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn region(&self) -> ViewportRegion {
        self.zoom.region()
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomController {
        &mut self.zoom
    }

    /// Maximum slider zoom for the current detail viewport width; before
    /// the first render pass a conventional width stands in.
    pub fn max_zoom(&self) -> f64 {
        let viewport_px = self.detail.viewport_px().unwrap_or(800.0);
        self.zoom
            .model()
            .max_zoom(viewport_px, crate::track_detail::margins())
    }

    /// Read-only snapshot of the active gene (selection wins over hover)
    /// for the inspector collaborator.
    pub fn active_snapshot(&self) -> Option<GeneSnapshot> {
        self.interaction
            .active()
            .and_then(|id| self.index.index_of(id))
            .map(|index| self.genes[index].snapshot())
    }

    #[cfg(test)]
    pub(crate) fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Strand;
    use std::time::Instant;

    fn engine() -> Engine {
        let genes = vec![
            Gene::new("g1", 100.0, 5_000.0, Strand::Forward),
            Gene::new("g2", 6_000.0, 9_000.0, Strand::Reverse),
        ];
        Engine::new(Chromosome::new("chrTest", 100_000), genes).unwrap()
    }

    #[test]
    fn test_zero_length_is_configuration_fatal() {
        let result = Engine::new(Chromosome::new("broken", 0), vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_sequence_is_dropped() {
        let mut chromosome = Chromosome::new("chr1", 500);
        chromosome.sequence = Some("ACGT".to_string());
        let engine = Engine::new(chromosome, vec![]).unwrap();
        assert!(engine.chromosome().sequence.is_none());
        assert_eq!(engine.chromosome().length, 500);
    }

    #[test]
    fn test_snapshot_prefers_selection_over_hover() {
        let mut engine = engine();
        engine
            .interaction_mut()
            .set_hovered(Some("g2"), Instant::now());
        assert_eq!(engine.active_snapshot().unwrap().id, "g2");
        engine.interaction_mut().select("g1");
        assert_eq!(engine.active_snapshot().unwrap().id, "g1");
    }

    #[test]
    fn test_replace_genes_clears_interaction() {
        let mut engine = engine();
        engine.interaction_mut().select("g1");
        engine.replace_genes(vec![Gene::new("h1", 0.0, 10.0, Strand::Forward)]);
        assert!(engine.active_snapshot().is_none());
        assert_eq!(engine.gene_count(), 1);
    }

    #[test]
    fn test_initial_region_is_full_extent() {
        let engine = engine();
        assert_eq!(engine.region(), ViewportRegion::new(0.0, 100_000.0));
    }
}
