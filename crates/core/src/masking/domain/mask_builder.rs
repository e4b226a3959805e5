use crate::masking::domain::region_table::RegionTable;
use crate::shared::error::RetouchError;
use crate::shared::filters;
use crate::shared::landmarks::LandmarkSet;
use crate::shared::mask::Mask;

/// Geometry knobs for mask construction, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskGeometry {
    /// Feather margin for the skin boundary; the blur kernel is
    /// `2 * margin + 1` wide.
    pub feather_margin: usize,
    /// Radius of the square structuring element that grows the protection
    /// zones outward.
    pub protect_dilate_radius: usize,
    /// Kernel size of the blur that softens protection edges. Forced odd.
    pub protect_blur_kernel: usize,
}

impl Default for MaskGeometry {
    fn default() -> Self {
        Self {
            feather_margin: 6,
            protect_dilate_radius: 4,
            protect_blur_kernel: 15,
        }
    }
}

/// Builds the per-frame skin and protection masks from landmark geometry.
///
/// Pure per-frame function of its inputs: no carried state, no side effects.
/// Faces merge by per-pixel maximum, so overlapping faces never push a pixel
/// past the strongest single cover. A sub-region with fewer than three
/// resolvable points is skipped silently.
pub struct MaskBuilder {
    table: RegionTable,
    geometry: MaskGeometry,
    feather_kernel: Vec<f32>,
    protect_kernel: Vec<f32>,
}

impl MaskBuilder {
    pub fn new(table: RegionTable, geometry: MaskGeometry) -> Result<Self, RetouchError> {
        table.validate()?;
        let feather_kernel = filters::gaussian_kernel_1d(2 * geometry.feather_margin + 1);
        let protect_kernel = filters::gaussian_kernel_1d(geometry.protect_blur_kernel | 1);
        Ok(Self {
            table,
            geometry,
            feather_kernel,
            protect_kernel,
        })
    }

    /// Produces `(skin mask, protection mask)` for one frame.
    pub fn build(&self, faces: &[LandmarkSet], width: u32, height: u32) -> (Mask, Mask) {
        let mut skin = Mask::zeros(width, height);
        let mut protection = Mask::zeros(width, height);

        for face in faces {
            skin.merge_max(&self.face_skin_mask(face, width, height));
            protection.merge_max(&self.face_protection_mask(face, width, height));
        }

        skin.clamp();
        protection.clamp();
        (skin, protection)
    }

    /// Solid skin-outline polygon, feathered, rescaled to span [0, 1].
    fn face_skin_mask(&self, face: &LandmarkSet, width: u32, height: u32) -> Mask {
        let mut mask = Mask::zeros(width, height);
        let points = resolve_points(face, &self.table.skin_outline, width, height);
        if points.len() >= 3 {
            fill_polygon(&mut mask, &points);
        }
        filters::separable_blur(
            mask.data_mut(),
            width as usize,
            height as usize,
            1,
            &self.feather_kernel,
        );
        rescale_to_unit_span(&mut mask);
        mask
    }

    /// Eye and lip polygons, dilated outward and blurred soft.
    fn face_protection_mask(&self, face: &LandmarkSet, width: u32, height: u32) -> Mask {
        let mut mask = Mask::zeros(width, height);
        for indices in [
            &self.table.left_eye,
            &self.table.right_eye,
            &self.table.lips,
        ] {
            let points = resolve_points(face, indices, width, height);
            if points.len() >= 3 {
                fill_polygon(&mut mask, &points);
            }
        }
        filters::dilate(
            mask.data_mut(),
            width as usize,
            height as usize,
            self.geometry.protect_dilate_radius,
        );
        filters::separable_blur(
            mask.data_mut(),
            width as usize,
            height as usize,
            1,
            &self.protect_kernel,
        );
        mask.clamp();
        mask
    }
}

/// Maps region indices to pixel coordinates, dropping indices the detector
/// did not deliver.
fn resolve_points(
    face: &LandmarkSet,
    indices: &[usize],
    width: u32,
    height: u32,
) -> Vec<(f64, f64)> {
    indices
        .iter()
        .filter_map(|&i| face.point(i))
        .map(|(x, y)| (x * f64::from(width), y * f64::from(height)))
        .collect()
}

/// Solid polygon fill by even-odd ray casting, restricted to the polygon's
/// bounding box.
fn fill_polygon(mask: &mut Mask, vertices: &[(f64, f64)]) {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    if width == 0 || height == 0 {
        return;
    }

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in vertices {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let x_start = (min_x.floor().max(0.0)) as usize;
    let y_start = (min_y.floor().max(0.0)) as usize;
    let x_end = (max_x.ceil() as usize).min(width - 1);
    let y_end = (max_y.ceil() as usize).min(height - 1);

    for y in y_start..=y_end {
        for x in x_start..=x_end {
            if point_in_polygon(x as f64, y as f64, vertices) {
                mask.set(x, y, 1.0);
            }
        }
    }
}

fn point_in_polygon(x: f64, y: f64, vertices: &[(f64, f64)]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Stretches a feathered mask so its values span the full [0, 1] range.
fn rescale_to_unit_span(mask: &mut Mask) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for &v in mask.data() {
        min = min.min(v);
        max = max.max(v);
    }
    if max > min {
        let span = max - min;
        for v in mask.data_mut() {
            *v = (*v - min) / span;
        }
    }
}
