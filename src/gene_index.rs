//! Stable gene indexing and visibility culling.
//!
//! The id→index map is built once per gene-collection change and gives each
//! gene a draw-order-independent palette colour. The visibility query runs
//! against the committed region on every region change; the buffer keeps
//! glyphs from popping at the viewport edge during continuous panning.

use crate::chromosome::Gene;
use crate::viewport::ViewportRegion;
use eframe::egui::Color32;
use std::collections::HashMap;

/// Fraction of the region width appended on both sides of the visibility
/// window.
pub const VISIBILITY_BUFFER: f64 = 0.2;

#[derive(Clone, Debug, Default)]
pub struct GeneIndex {
    index_by_id: HashMap<String, usize>,
}

impl GeneIndex {
    pub fn build(genes: &[Gene]) -> Self {
        let index_by_id = genes
            .iter()
            .enumerate()
            .map(|(index, gene)| (gene.id.clone(), index))
            .collect();
        Self { index_by_id }
    }

    pub fn len(&self) -> usize {
        self.index_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_by_id.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    /// Palette colour for a gene, stable across redraws and draw order.
    pub fn color_of(&self, id: &str) -> Color32 {
        let palette = &crate::GENE_PALETTE;
        match self.index_of(id) {
            Some(index) => palette[index % palette.len()],
            None => Color32::GRAY,
        }
    }

    /// Indices of all genes overlapping the region widened by
    /// `buffer · width` on both sides. Recomputed per region change; the
    /// result is never cached across regions.
    pub fn visible_indices(
        &self,
        genes: &[Gene],
        region: ViewportRegion,
        buffer: f64,
    ) -> Vec<usize> {
        let pad = buffer * region.width();
        let lo = region.start - pad;
        let hi = region.end + pad;
        genes
            .iter()
            .enumerate()
            .filter(|(_, gene)| gene.end >= lo && gene.start <= hi)
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Strand;

    fn genes() -> Vec<Gene> {
        vec![
            Gene::new("g1", 1_000_000.0, 1_010_000.0, Strand::Forward),
            Gene::new("g2", 10.0, 50.0, Strand::Reverse),
            Gene::new("g3", 2_500_000.0, 2_600_000.0, Strand::Forward),
        ]
    }

    #[test]
    fn test_index_is_stable_by_collection_order() {
        let genes = genes();
        let index = GeneIndex::build(&genes);
        assert_eq!(index.index_of("g1"), Some(0));
        assert_eq!(index.index_of("g3"), Some(2));
        assert_eq!(index.index_of("missing"), None);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_palette_wraps_by_index() {
        let many: Vec<Gene> = (0..crate::GENE_PALETTE.len() + 1)
            .map(|i| Gene::new(format!("g{i}"), 0.0, 1.0, Strand::Forward))
            .collect();
        let index = GeneIndex::build(&many);
        assert_eq!(index.color_of("g0"), crate::GENE_PALETTE[0]);
        let wrapped = format!("g{}", crate::GENE_PALETTE.len());
        assert_eq!(index.color_of(&wrapped), crate::GENE_PALETTE[0]);
    }

    #[test]
    fn test_visibility_buffer_includes_near_miss() {
        let genes = genes();
        let index = GeneIndex::build(&genes);
        // Region [990_000, 1_005_000], buffer 0.2 → padded to
        // [987_000, 1_008_000]; g1 overlaps.
        let region = ViewportRegion::new(990_000.0, 1_005_000.0);
        let visible = index.visible_indices(&genes, region, VISIBILITY_BUFFER);
        assert_eq!(visible, vec![0]);

        // Same gene far outside another window is culled.
        let region = ViewportRegion::new(2_000_000.0, 2_010_000.0);
        let visible = index.visible_indices(&genes, region, VISIBILITY_BUFFER);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_visibility_buffer_scales_with_region() {
        let genes = vec![Gene::new("edge", 1_199.0, 1_300.0, Strand::Forward)];
        let index = GeneIndex::build(&genes);
        // Width 1,000 → pad 200: gene starting 199 bp past the end is in.
        let region = ViewportRegion::new(0.0, 1_000.0);
        assert_eq!(
            index.visible_indices(&genes, region, VISIBILITY_BUFFER).len(),
            1
        );
        // Width 100 → pad 20: now it is out.
        let region = ViewportRegion::new(900.0, 1_000.0);
        assert!(index.visible_indices(&genes, region, VISIBILITY_BUFFER).is_empty());
    }
}
