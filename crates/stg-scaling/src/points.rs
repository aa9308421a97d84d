use serde::{Deserialize, Serialize};

/// One graph's contribution to the scaling curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    /// Number of states in the source graph.
    pub num_states: usize,
    /// Average number of skills available per state.
    pub avg_skills: f64,
}

impl ScalingPoint {
    /// Creates a new point.
    pub fn new(num_states: usize, avg_skills: f64) -> Self {
        Self {
            num_states,
            avg_skills,
        }
    }
}

/// Ordered collection of scaling points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingSeries {
    points: Vec<ScalingPoint>,
}

impl ScalingSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point.
    pub fn push(&mut self, point: ScalingPoint) {
        self.points.push(point);
    }

    /// Sorts ascending by state count; points with equal counts keep their
    /// insertion order.
    pub fn sort_by_size(&mut self) {
        self.points.sort_by_key(|point| point.num_states);
    }

    /// Returns the points in their current order.
    pub fn points(&self) -> &[ScalingPoint] {
        &self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Splits the series into parallel state-count and skill vectors.
    pub fn unzip(&self) -> (Vec<usize>, Vec<f64>) {
        self.points
            .iter()
            .map(|point| (point.num_states, point.avg_skills))
            .unzip()
    }
}

impl FromIterator<ScalingPoint> for ScalingSeries {
    fn from_iter<T: IntoIterator<Item = ScalingPoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
