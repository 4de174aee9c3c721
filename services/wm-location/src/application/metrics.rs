//! 库位服务指标

use metrics::counter;

use crate::domain::value_objects::LocationDepth;

use super::compiler::SkipReason;

pub fn record_node_created(depth: LocationDepth) {
    counter!("wm_location_nodes_created_total", "depth" => depth.as_str()).increment(1);
}

pub fn record_rect_skipped(reason: SkipReason) {
    counter!("wm_layout_rects_skipped_total", "reason" => reason.as_str()).increment(1);
}
