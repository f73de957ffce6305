/// UI layer: widget panels and the numeric bar chart.
pub mod panels;
pub mod plot;
