mod brainwriting;
mod fishbone;
mod pareto;
mod radar;
mod radial;
mod swot;
pub mod text;
mod timeline;
pub mod types;

use brainwriting::*;
use fishbone::*;
use radar::*;
use radial::*;
use swot::*;
use timeline::*;

pub use pareto::cumulative_percentages;
pub use radar::MIN_AXES;
pub use radial::node_angle;
pub use types::*;

use pareto::compute_pareto_layout;

use crate::config::LayoutConfig;
use crate::ir::DiagramRecord;
use crate::theme::Theme;

/// Route a record to the layout algorithm for its variant.
///
/// Empty or degenerate input yields a layout with an empty scene; layout
/// never fails.
pub fn compute_layout(record: &DiagramRecord, theme: &Theme, config: &LayoutConfig) -> Layout {
    let layout = match record {
        DiagramRecord::Fishbone(data) => compute_fishbone_layout(data, theme, config),
        DiagramRecord::Pareto(data) => compute_pareto_layout(data, theme, config),
        DiagramRecord::ActionPlan(data) => compute_action_plan_layout(data, theme, config),
        DiagramRecord::Brainwriting(data) => compute_brainwriting_layout(data, theme, config),
        DiagramRecord::MindMap(data) => compute_mind_map_layout(data, theme, config),
        DiagramRecord::Swot(data) => compute_swot_layout(data, theme, config),
        DiagramRecord::Radar(data) => compute_radar_layout(data, theme, config),
        DiagramRecord::Timeline(data) => compute_timeline_layout(data, theme, config),
    };

    if layout.scene.is_empty() {
        tracing::debug!(kind = layout.kind.tag(), "nothing to lay out");
    } else {
        tracing::debug!(
            kind = layout.kind.tag(),
            width = layout.width,
            height = layout.height,
            elements = layout.scene.elements.len(),
            "computed layout"
        );
    }
    layout
}
