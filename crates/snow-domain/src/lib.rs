// snow-domain library entry point
pub mod peak;
pub mod resort;
pub mod snowfall;
pub mod stats;
pub use peak::{PeakPeriod, ResortWithPeaks};
pub use resort::Resort;
pub use snowfall::{DailySnowfall, SnowDepthReading};
pub use stats::ResortSnowfallStats;
