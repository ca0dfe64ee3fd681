//! Plot configuration shared by the field plots

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Fields
///
/// - `width`, `height`: Dimensions in pixels
/// - `title`: Plot title
/// - `xlabel`, `ylabel`: Axis labels
/// - `line_color`: Line color for single-field plots
/// - `field_colors`: Optional colors for overlaid fields (one per field)
/// - `background`: Background color
/// - `line_width`: Line thickness in pixels
/// - `show_grid`: Whether to show grid lines
///
/// # Example
///
/// ```rust
/// use blackoil_output::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::field("Oil pressure");
/// config.line_color = BLUE;
/// config.width = 1920;
/// config.height = 1080;
/// assert_eq!(config.xlabel, "DOF");
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Field")
    pub title: String,

    /// X-axis label (default: "DOF")
    pub xlabel: String,

    /// Y-axis label (default: empty, set per field by the plot writer)
    pub ylabel: String,

    /// Line color for single-field plots (default: RED)
    pub line_color: RGBColor,

    /// Optional colors for overlaid fields
    ///
    /// If None, uses default palette: [RED, BLUE, GREEN, MAGENTA, CYAN, ...]
    pub field_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Field".to_string(),
            xlabel: "DOF".to_string(),
            ylabel: String::new(),
            line_color: RED,
            field_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

impl PlotConfig {
    /// Config for a per-DOF field plot titled `title`
    pub fn field(title: &str) -> Self {
        Self::default().title(title)
    }

    /// Config for overlaid fields with custom colors
    pub fn field_colors(colors: Vec<RGBColor>) -> Self {
        let mut config = Self::default();
        config.field_colors = Some(colors);
        config
    }

    /// Builder pattern: set title
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Builder pattern: set y-axis label
    pub fn ylabel(mut self, ylabel: &str) -> Self {
        self.ylabel = ylabel.to_string();
        self
    }

    /// Color of the field at index i
    ///
    /// Uses custom colors if provided, otherwise falls back to default palette
    pub(crate) fn get_field_color(&self, field_index: usize) -> RGBColor {
        if let Some(colors) = &self.field_colors {
            if field_index < colors.len() {
                return colors[field_index];
            }
        }

        const PALETTE: [RGBColor; 8] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0), // Orange
            RGBColor(128, 0, 128), // Purple
        ];

        PALETTE[field_index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
