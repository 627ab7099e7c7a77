// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model configuration.

use crate::units::Measure;

/// Tunable parameters for a [`GraphicModel`](crate::model::GraphicModel).
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// Maximum number of reversible edits retained by the edit history.
    pub history_capacity: usize,
    /// Number of nodes rendered between polls of the render task.
    pub render_granularity: usize,
    /// Default location of a newly created 2D or 3D graph.
    pub graph_location: (Measure, Measure),
    /// Default size of a newly created 2D or 3D graph.
    pub graph_size: (Measure, Measure),
    /// Default canvas size of a new figure.
    pub figure_size: (Measure, Measure),
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            history_capacity: 30,
            render_granularity: 16,
            graph_location: (Measure::inches(0.75), Measure::inches(0.75)),
            graph_size: (Measure::inches(2.5), Measure::inches(2.5)),
            figure_size: (Measure::inches(8.5), Measure::inches(11.0)),
        }
    }
}
