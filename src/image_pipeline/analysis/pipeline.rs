use std::path::Path;

use image::RgbImage;
use tracing::{debug, info, instrument};

use crate::image_pipeline::{
    analysis::{AnalysisResult, Classification, PipelineTimings, Stage},
    color::HsvPlanes,
    common::error::{AnalysisError, Result},
    config::{CarbonConfig, PipelineOptions},
    decode::{ImageReader, StandardImageReader},
    metrics, preprocess,
    refine::refine,
    render::{composite, OverlayEncoder, PngBase64Encoder, SAND_OVERLAY, SEAGRASS_OVERLAY},
    segment::segment,
};

/// Quadrat photo analysis: preprocess, segment, refine, measure, render.
///
/// Every call is self-contained; one pipeline can serve concurrent callers
/// when its reader and encoder are `Sync`.
pub struct SeagrassPipeline<R: ImageReader, E: OverlayEncoder> {
    reader: R,
    encoder: E,
    config: CarbonConfig,
    options: PipelineOptions,
}

impl SeagrassPipeline<StandardImageReader, PngBase64Encoder> {
    pub fn new(config: CarbonConfig) -> Self {
        Self {
            reader: StandardImageReader,
            encoder: PngBase64Encoder,
            config,
            options: PipelineOptions::default(),
        }
    }
}

impl<R: ImageReader, E: OverlayEncoder> SeagrassPipeline<R, E> {
    pub fn with_custom(reader: R, encoder: E, config: CarbonConfig) -> Self {
        Self {
            reader,
            encoder,
            config,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn analyze(&self, input_data: &[u8]) -> Result<AnalysisResult> {
        self.analyze_with_timings(input_data).map(|(result, _)| result)
    }

    pub fn analyze_with_timings(
        &self,
        input_data: &[u8],
    ) -> Result<(AnalysisResult, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let image = timings.measure(Stage::Decode, || self.reader.read_image(input_data))?;
        let result = self.run(image, &mut timings)?;
        Ok((result, timings))
    }

    #[instrument(skip(self, input_path))]
    pub fn analyze_file<P: AsRef<Path>>(&self, input_path: P) -> Result<AnalysisResult> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Analyzing file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                AnalysisError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.analyze(&input_data)
    }

    /// Runs the pipeline on an already decoded image.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn analyze_image(&self, image: RgbImage) -> Result<AnalysisResult> {
        self.run(image, &mut PipelineTimings::new())
    }

    /// Stops after refinement and returns the working raster with its masks.
    pub fn classify(&self, image: RgbImage) -> Result<Classification> {
        self.classify_timed(image, &mut PipelineTimings::new())
    }

    fn classify_timed(
        &self,
        image: RgbImage,
        timings: &mut PipelineTimings,
    ) -> Result<Classification> {
        ensure_area(image.dimensions())?;

        let working = timings.measure(Stage::Preprocess, || {
            debug!(width = image.width(), height = image.height(), "Preprocessing");
            preprocess::preprocess(image, &self.options)
        });

        let (width, height) = ensure_area(working.dimensions())?;
        debug!(width, height, "Working raster ready");

        let candidates =
            timings.measure(Stage::Segment, || segment(&HsvPlanes::from_rgb(&working)));
        let masks = timings.measure(Stage::Refine, || refine(candidates));

        Ok(Classification { working, masks })
    }

    fn run(&self, image: RgbImage, timings: &mut PipelineTimings) -> Result<AnalysisResult> {
        let Classification { working, masks } = self.classify_timed(image, timings)?;

        let coverage =
            timings.measure(Stage::Metrics, || metrics::estimate(&masks, &self.config))?;

        let (overlay_seagrass, overlay_white) = timings.measure(Stage::Render, || {
            let seagrass = composite(&working, masks.seagrass(), SEAGRASS_OVERLAY);
            let sand = composite(&working, masks.sand(), SAND_OVERLAY);
            Ok::<_, AnalysisError>((self.encoder.encode(&seagrass)?, self.encoder.encode(&sand)?))
        })?;

        info!(
            width = working.width(),
            height = working.height(),
            seagrass_pct = coverage.seagrass_pct,
            white_pct = coverage.white_pct,
            blue_carbon_g = coverage.blue_carbon_g,
            "Analysis complete"
        );
        Ok(AnalysisResult::new(&coverage, overlay_seagrass, overlay_white))
    }

    pub fn config(&self) -> &CarbonConfig {
        &self.config
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }
}

fn ensure_area((width, height): (u32, u32)) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::DegenerateInput { width, height });
    }
    Ok((width, height))
}
