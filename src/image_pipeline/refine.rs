//! Mask refinement: per-class morphological cleanup, then overlap resolution.

use tracing::debug;

use crate::image_pipeline::mask::ClassMask;
use crate::image_pipeline::morphology;
use crate::image_pipeline::segment::CandidateMasks;

/// Kernel sizes for one class: opening first, then closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupKernels {
    pub open_size: u8,
    pub close_size: u8,
}

pub const SEAGRASS_KERNELS: CleanupKernels = CleanupKernels {
    open_size: 5,
    close_size: 7,
};

// sand patches are broad and smooth, so they get lighter gap filling
pub const SAND_KERNELS: CleanupKernels = CleanupKernels {
    open_size: 3,
    close_size: 5,
};

impl CleanupKernels {
    pub fn apply(&self, mask: &ClassMask) -> ClassMask {
        let opened = morphology::open(mask, &morphology::ellipse(self.open_size));
        morphology::close(&opened, &morphology::ellipse(self.close_size))
    }
}

/// Cleaned class masks. `seagrass` and `sand` never share a pixel.
#[derive(Debug, Clone)]
pub struct RefinedMasks {
    seagrass: ClassMask,
    sand: ClassMask,
}

impl RefinedMasks {
    pub fn seagrass(&self) -> &ClassMask {
        &self.seagrass
    }

    pub fn sand(&self) -> &ClassMask {
        &self.sand
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.seagrass.dimensions()
    }
}

/// Cleans both masks, then hands every contested pixel to seagrass.
///
/// Overlap is resolved only after cleanup so the morphology of the sand mask
/// sees its full candidate set.
pub fn refine(candidates: CandidateMasks) -> RefinedMasks {
    let seagrass = SEAGRASS_KERNELS.apply(&candidates.seagrass);
    let sand = SAND_KERNELS.apply(&candidates.sand);

    let overlap = seagrass.intersection(&sand);
    let contested = overlap.count();
    let sand = sand.difference(&overlap);

    debug!(
        seagrass = seagrass.count(),
        sand = sand.count(),
        contested,
        "Masks refined"
    );
    RefinedMasks { seagrass, sand }
}
