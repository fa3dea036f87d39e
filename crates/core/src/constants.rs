//! Shared constants for the application

use std::time::Duration;

/// Bytes per gibibyte (2^30)
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Default sampling interval between ticks
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Default redraw interval of the rendering sink
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of glyph cells in a status bar
pub const DEFAULT_BAR_WIDTH: usize = 15;

/// Widest status bar accepted from configuration
pub const MAX_BAR_WIDTH: usize = 200;

/// Glyph for a filled bar cell
pub const BAR_FILLED: char = '█';

/// Glyph for an empty bar cell
pub const BAR_EMPTY: char = '░';

/// Vendor token stripped from device names
pub const VENDOR_PREFIX: &str = "NVIDIA ";

/// Placeholder shown in numeric columns that have no reading
pub const PLACEHOLDER: &str = "-";
