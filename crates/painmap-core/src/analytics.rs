//! Aggregation across stored pain maps.
//!
//! Drawings are assumed to use the standard 600×800 surface. Points are read
//! from draw strokes only; erase strokes carry no pain.

use crate::model::{AvatarVariant, PainMapModel, ViewOrientation};
use crate::playback::TimelineEntry;
use crate::storage::StoredPainMap;
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cells per side of the heat map grid.
pub const GRID_SIZE: usize = 100;
/// Surface pixels per grid cell, horizontally and vertically.
pub const CELL_SIZE: (f64, f64) = (6.0, 8.0);
/// Surface x coordinate separating the left and right halves.
pub const MIDLINE_X: f64 = 300.0;
/// Number of entries in the most-common-regions list.
pub const TOP_REGIONS: usize = 10;

/// Restricts which records an aggregate reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PainMapFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub avatar: Option<AvatarVariant>,
    pub view: Option<ViewOrientation>,
}

impl PainMapFilter {
    /// Inclusive date range check.
    pub fn in_range(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }

    /// Full check: date range, avatar and view.
    pub fn matches(&self, record: &StoredPainMap) -> bool {
        let model = &record.model;
        self.in_range(record.recorded_at)
            && self
                .avatar
                .as_ref()
                .is_none_or(|avatar| model.avatar_type.as_ref() == Some(avatar))
            && self.view.is_none_or(|view| model.view_orientation == Some(view))
    }
}

/// Draw-stroke vertices of a model.
fn pain_points(model: &PainMapModel) -> impl Iterator<Item = Point> + '_ {
    model
        .drawing_data
        .paths
        .iter()
        .filter(|path| !path.is_erase())
        .flat_map(|path| path.points())
}

/// Frequency and mean intensity per grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMap {
    pub grid_size: usize,
    /// Point counts, indexed `x * grid_size + y`.
    pub frequency: Vec<u32>,
    /// Mean overall intensity of the maps contributing to each cell.
    pub intensity: Vec<f64>,
    pub total_maps: usize,
    pub avatar: AvatarVariant,
    pub view: ViewOrientation,
}

impl HeatMap {
    pub fn frequency_at(&self, x: usize, y: usize) -> u32 {
        self.cell(x, y).map_or(0, |i| self.frequency[i])
    }

    pub fn intensity_at(&self, x: usize, y: usize) -> f64 {
        self.cell(x, y).map_or(0.0, |i| self.intensity[i])
    }

    /// Grid cell containing a surface point.
    pub fn cell_of(point: Point) -> Option<(usize, usize)> {
        let x = (point.x / CELL_SIZE.0).floor();
        let y = (point.y / CELL_SIZE.1).floor();
        let range = 0.0..GRID_SIZE as f64;
        (range.contains(&x) && range.contains(&y)).then_some((x as usize, y as usize))
    }

    fn cell(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.grid_size && y < self.grid_size).then_some(x * self.grid_size + y)
    }
}

/// Bin every draw-stroke vertex of the matching records into the grid.
pub fn heat_map(records: &[StoredPainMap], filter: &PainMapFilter) -> HeatMap {
    let cells = GRID_SIZE * GRID_SIZE;
    let mut frequency = vec![0u32; cells];
    let mut intensity_sum = vec![0.0f64; cells];
    let mut total_maps = 0;

    for record in records.iter().filter(|r| filter.matches(r)) {
        total_maps += 1;
        let intensity = record.model.pain_intensity.value();
        for point in pain_points(&record.model) {
            if let Some((x, y)) = HeatMap::cell_of(point) {
                let i = x * GRID_SIZE + y;
                frequency[i] += 1;
                intensity_sum[i] += intensity;
            }
        }
    }

    let intensity = frequency
        .iter()
        .zip(&intensity_sum)
        .map(|(&count, &sum)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    log::debug!("Heat map built from {} pain maps", total_maps);
    HeatMap {
        grid_size: GRID_SIZE,
        frequency,
        intensity,
        total_maps,
        avatar: filter.avatar.clone().unwrap_or_default(),
        view: filter.view.unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFrequency {
    pub region: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityCount {
    pub intensity: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCount {
    pub quality: String,
    pub count: usize,
}

/// Summary statistics over a set of pain maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PainMapMetrics {
    pub total_maps: usize,
    pub average_intensity: f64,
    /// Most frequent body regions, at most `TOP_REGIONS`.
    pub most_common_regions: Vec<RegionFrequency>,
    /// Counts per whole intensity, ascending.
    pub intensity_distribution: Vec<IntensityCount>,
    /// Counts per quality, most frequent first.
    pub quality_distribution: Vec<QualityCount>,
}

/// Sort `(key, count)` pairs by count descending, then key.
fn ranked(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Metrics over records in the filter's date range.
pub fn metrics(records: &[StoredPainMap], filter: &PainMapFilter) -> PainMapMetrics {
    let selected: Vec<&PainMapModel> = records
        .iter()
        .filter(|r| filter.in_range(r.recorded_at))
        .map(|r| &r.model)
        .collect();

    let total_maps = selected.len();
    let average_intensity = if total_maps == 0 {
        0.0
    } else {
        selected.iter().map(|m| m.pain_intensity.value()).sum::<f64>() / total_maps as f64
    };

    let mut regions: HashMap<String, usize> = HashMap::new();
    let mut intensities: HashMap<u8, usize> = HashMap::new();
    let mut qualities: HashMap<String, usize> = HashMap::new();
    for model in &selected {
        *regions.entry(model.body_region.clone()).or_default() += 1;
        *intensities
            .entry(model.pain_intensity.value().round() as u8)
            .or_default() += 1;
        for quality in &model.pain_quality {
            *qualities.entry(quality.clone()).or_default() += 1;
        }
    }

    let most_common_regions = ranked(regions)
        .into_iter()
        .take(TOP_REGIONS)
        .map(|(region, count)| RegionFrequency { region, count })
        .collect();

    let mut intensity_distribution: Vec<IntensityCount> = intensities
        .into_iter()
        .map(|(intensity, count)| IntensityCount { intensity, count })
        .collect();
    intensity_distribution.sort_by_key(|c| c.intensity);

    let quality_distribution = ranked(qualities)
        .into_iter()
        .map(|(quality, count)| QualityCount { quality, count })
        .collect();

    PainMapMetrics {
        total_maps,
        average_intensity,
        most_common_regions,
        intensity_distribution,
        quality_distribution,
    }
}

/// Left/right comparison of drawn pain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BilateralSymmetry {
    pub left_intensity: f64,
    pub right_intensity: f64,
    /// 0–100, higher is more symmetric.
    pub symmetry_score: f64,
    pub is_symmetric: bool,
    pub left_count: usize,
    pub right_count: usize,
}

/// Compare mean intensity of points left and right of the midline.
///
/// Each point contributes its map's overall intensity. Score is
/// `max(0, 100 - 10 * |left - right|)`; symmetric when the means differ by
/// less than one.
pub fn bilateral_symmetry(records: &[StoredPainMap], filter: &PainMapFilter) -> BilateralSymmetry {
    let (mut left_sum, mut right_sum) = (0.0, 0.0);
    let (mut left_count, mut right_count) = (0usize, 0usize);

    for record in records.iter().filter(|r| filter.in_range(r.recorded_at)) {
        let intensity = record.model.pain_intensity.value();
        for point in pain_points(&record.model) {
            if point.x < MIDLINE_X {
                left_sum += intensity;
                left_count += 1;
            } else {
                right_sum += intensity;
                right_count += 1;
            }
        }
    }

    let mean = |sum: f64, count: usize| if count > 0 { sum / count as f64 } else { 0.0 };
    let left_intensity = mean(left_sum, left_count);
    let right_intensity = mean(right_sum, right_count);
    let diff = (left_intensity - right_intensity).abs();

    BilateralSymmetry {
        left_intensity,
        right_intensity,
        symmetry_score: (100.0 - diff * 10.0).max(0.0),
        is_symmetric: diff < 1.0,
        left_count,
        right_count,
    }
}

/// One point of a patient's progression series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionPoint {
    pub date: DateTime<Utc>,
    pub intensity: f64,
    pub body_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewOrientation>,
}

/// Chronological intensity series.
pub fn progression(entries: &[TimelineEntry]) -> Vec<ProgressionPoint> {
    let mut points: Vec<ProgressionPoint> = entries
        .iter()
        .map(|entry| ProgressionPoint {
            date: entry.recorded_at,
            intensity: entry.model.pain_intensity.value(),
            body_region: entry.model.body_region.clone(),
            avatar: entry.model.avatar_type.clone(),
            view: entry.model.view_orientation,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}
