//! Comparison statistics and chart series computed from the reference data.

use crate::dashboard::ReferenceData;
use crate::models::{Condition, FeatureRow};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of bins of the rent histogram
pub const HISTOGRAM_BINS: usize = 20;

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Quantile of sorted values with linear interpolation between the two
/// closest ranks
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Prediction set against the neighborhood and global mean rents
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub predicted_rent: f64,
    pub neighborhood: String,
    pub neighborhood_mean: Option<f64>,
    /// prediction minus neighborhood mean
    pub neighborhood_delta: Option<f64>,
    pub global_mean: Option<f64>,
    pub global_delta: Option<f64>,
}

pub fn compare(data: &ReferenceData, neighborhood: &str, predicted_rent: f64) -> Comparison {
    let neighborhood_mean = mean(
        data.priced()
            .filter(|(row, _)| row.neighborhood == neighborhood)
            .map(|(_, rent)| rent as f64),
    );
    let global_mean = mean(data.priced().map(|(_, rent)| rent as f64));

    Comparison {
        predicted_rent,
        neighborhood: neighborhood.to_string(),
        neighborhood_mean,
        neighborhood_delta: neighborhood_mean.map(|m| predicted_rent - m),
        global_mean,
        global_delta: global_mean.map(|m| predicted_rent - m),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodRent {
    pub neighborhood: String,
    pub mean: f64,
    pub count: usize,
}

/// Mean rent per neighborhood, highest first
pub fn mean_by_neighborhood(data: &ReferenceData) -> Vec<NeighborhoodRent> {
    let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();
    for (row, rent) in data.priced() {
        let entry = groups.entry(row.neighborhood.as_str()).or_insert((0.0, 0));
        entry.0 += rent as f64;
        entry.1 += 1;
    }

    let mut result: Vec<NeighborhoodRent> = groups
        .into_iter()
        .map(|(neighborhood, (sum, count))| NeighborhoodRent {
            neighborhood: neighborhood.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();
    result.sort_by(|a, b| {
        b.mean
            .total_cmp(&a.mean)
            .then_with(|| a.neighborhood.cmp(&b.neighborhood))
    });
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub marker: Option<f64>,
}

/// Equal-width histogram of the reference rents. The last bin includes its
/// upper bound.
pub fn rent_histogram(data: &ReferenceData, bins: usize, marker: Option<f64>) -> Histogram {
    let rents: Vec<f64> = data.priced().map(|(_, rent)| rent as f64).collect();
    let (Some(min), Some(max)) = (
        rents.iter().copied().reduce(f64::min),
        rents.iter().copied().reduce(f64::max),
    ) else {
        return Histogram {
            bins: Vec::new(),
            marker,
        };
    };

    let bins = bins.max(1);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let mut counts = vec![0usize; bins];
    for rent in &rents {
        let index = (((rent - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + width * i as f64,
                end: min + width * (i + 1) as f64,
                count,
            })
            .collect(),
        marker,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub area_sqm: u32,
    pub rent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scatter {
    pub points: Vec<ScatterPoint>,
    pub marker: Option<ScatterPoint>,
}

pub fn rent_vs_area(data: &ReferenceData, marker: Option<ScatterPoint>) -> Scatter {
    Scatter {
        points: data
            .priced()
            .filter_map(|(row, rent)| {
                row.area_sqm.map(|area_sqm| ScatterPoint {
                    area_sqm,
                    rent: rent as f64,
                })
            })
            .collect(),
        marker,
    }
}

/// Five-number summary of the rents of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    fn from_rents(label: String, mut rents: Vec<f64>) -> Option<Self> {
        rents.sort_by(f64::total_cmp);
        Some(Self {
            count: rents.len(),
            min: *rents.first()?,
            q1: quantile(&rents, 0.25)?,
            median: quantile(&rents, 0.5)?,
            q3: quantile(&rents, 0.75)?,
            max: *rents.last()?,
            label,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupMarker {
    pub label: String,
    pub rent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxPlot {
    pub groups: Vec<BoxStats>,
    pub marker: Option<GroupMarker>,
}

/// Rent distribution per room count, ascending
pub fn rent_by_rooms(data: &ReferenceData, marker: Option<GroupMarker>) -> BoxPlot {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (row, rent) in data.priced() {
        if let Some(rooms) = row.room_count {
            groups.entry(rooms).or_default().push(rent as f64);
        }
    }
    BoxPlot {
        groups: groups
            .into_iter()
            .filter_map(|(rooms, rents)| BoxStats::from_rents(rooms.to_string(), rents))
            .collect(),
        marker,
    }
}

/// Rent distribution per condition, from poor to good
pub fn rent_by_condition(data: &ReferenceData, marker: Option<GroupMarker>) -> BoxPlot {
    BoxPlot {
        groups: Condition::ALL
            .iter()
            .filter_map(|condition| {
                let rents = data
                    .priced()
                    .filter(|(row, _)| row.condition == Some(*condition))
                    .map(|(_, rent)| rent as f64)
                    .collect();
                BoxStats::from_rents(condition.as_wire().to_string(), rents)
            })
            .collect(),
        marker,
    }
}

/// Every chart of the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ChartSet {
    pub mean_by_neighborhood: Vec<NeighborhoodRent>,
    pub rent_distribution: Histogram,
    pub rent_vs_area: Scatter,
    pub rent_by_rooms: BoxPlot,
    pub rent_by_condition: BoxPlot,
}

/// Build all charts; `prediction` places the predicted rent on each of them
pub fn chart_set(data: &ReferenceData, prediction: Option<(&FeatureRow, f64)>) -> ChartSet {
    ChartSet {
        mean_by_neighborhood: mean_by_neighborhood(data),
        rent_distribution: rent_histogram(data, HISTOGRAM_BINS, prediction.map(|(_, rent)| rent)),
        rent_vs_area: rent_vs_area(
            data,
            prediction.map(|(row, rent)| ScatterPoint {
                area_sqm: row.area_sqm,
                rent,
            }),
        ),
        rent_by_rooms: rent_by_rooms(
            data,
            prediction.map(|(row, rent)| GroupMarker {
                label: row.room_count.to_string(),
                rent,
            }),
        ),
        rent_by_condition: rent_by_condition(
            data,
            prediction.map(|(row, rent)| GroupMarker {
                label: row.condition.as_wire().to_string(),
                rent,
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferenceRow;

    fn row(neighborhood: &str, area: u32, rooms: u32, condition: Condition, rent: i64) -> ReferenceRow {
        ReferenceRow {
            neighborhood: neighborhood.to_string(),
            area_sqm: Some(area),
            room_count: Some(rooms),
            bathroom_location: None,
            access_type: None,
            furnished: None,
            condition: Some(condition),
            monthly_rent: Some(rent),
        }
    }

    fn sample() -> ReferenceData {
        let mut unpriced = row("Ivandry", 200, 6, Condition::Good, 0);
        unpriced.monthly_rent = None;
        ReferenceData::new(vec![
            row("Isoraka", 80, 3, Condition::Good, 500_000),
            row("Isoraka", 60, 2, Condition::Average, 300_000),
            row("Analakely", 40, 1, Condition::Poor, 100_000),
            row("Analakely", 50, 2, Condition::Average, 200_000),
            row("Ambatobe", 90, 3, Condition::Good, 350_000),
            unpriced,
        ])
    }

    #[test]
    fn test_mean_and_quantile() {
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(Vec::<f64>::new()), None);

        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_compare_with_means() {
        let comparison = compare(&sample(), "Isoraka", 450_000.0);
        assert_eq!(comparison.neighborhood_mean, Some(400_000.0));
        assert_eq!(comparison.neighborhood_delta, Some(50_000.0));
        assert_eq!(comparison.global_mean, Some(290_000.0));
        assert_eq!(comparison.global_delta, Some(160_000.0));

        let unknown = compare(&sample(), "Tanjombato", 450_000.0);
        assert_eq!(unknown.neighborhood_mean, None);
        assert_eq!(unknown.neighborhood_delta, None);
    }

    #[test]
    fn test_mean_by_neighborhood_sorted_descending() {
        let stats = mean_by_neighborhood(&sample());
        let names: Vec<&str> = stats.iter().map(|s| s.neighborhood.as_str()).collect();
        assert_eq!(names, vec!["Isoraka", "Ambatobe", "Analakely"]);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[2].mean, 150_000.0);
    }

    #[test]
    fn test_histogram_counts_every_rent() {
        let histogram = rent_histogram(&sample(), 4, Some(250_000.0));
        assert_eq!(histogram.bins.len(), 4);
        assert_eq!(histogram.bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(histogram.bins[0].start, 100_000.0);
        assert_eq!(histogram.bins[3].end, 500_000.0);
        // the maximum falls in the last bin
        assert_eq!(histogram.bins[3].count, 1);
        assert_eq!(histogram.bins[2].count, 2);
        assert_eq!(histogram.marker, Some(250_000.0));
    }

    #[test]
    fn test_histogram_of_empty_data() {
        let histogram = rent_histogram(&ReferenceData::default(), 10, None);
        assert!(histogram.bins.is_empty());
    }

    #[test]
    fn test_box_plots() {
        let by_rooms = rent_by_rooms(&sample(), None);
        let labels: Vec<&str> = by_rooms.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
        let two_rooms = &by_rooms.groups[1];
        assert_eq!(two_rooms.count, 2);
        assert_eq!(two_rooms.median, 250_000.0);

        let by_condition = rent_by_condition(&sample(), None);
        let labels: Vec<&str> = by_condition.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["mauvais", "moyen", "bon"]);
    }

    #[test]
    fn test_chart_set_places_prediction() {
        let feature = FeatureRow::new(
            "Isoraka",
            70,
            2,
            crate::models::BathroomLocation::Interior,
            crate::models::AccessType::None,
            crate::models::Furnished::No,
            Condition::Average,
        );
        let charts = chart_set(&sample(), Some((&feature, 320_000.0)));
        assert_eq!(charts.rent_vs_area.points.len(), 5);
        assert_eq!(charts.rent_vs_area.marker.as_ref().unwrap().area_sqm, 70);
        assert_eq!(charts.rent_by_rooms.marker.as_ref().unwrap().label, "2");
        assert_eq!(charts.rent_by_condition.marker.as_ref().unwrap().label, "moyen");
        assert_eq!(charts.rent_distribution.marker, Some(320_000.0));
    }
}
