/// Ordered 2-D points for one detected face, in [0,1]-normalized face space.
///
/// Produced by an external landmark detector and read-only to the pipeline.
/// Which indices mean what is the detector's business; the
/// [`RegionTable`](crate::masking::domain::region_table::RegionTable) maps
/// index groups to maskable face regions.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: Vec<(f64, f64)>,
}

impl LandmarkSet {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point at `index`, or `None` when the detector produced fewer
    /// points than the region table expects. Missing points are skipped by
    /// the mask builder, never an error.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}
