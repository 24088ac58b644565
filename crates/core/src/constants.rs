use std::time::Duration;

/// Maximum number of entries shown in the notification feed
pub const MAX_NOTIFICATIONS: usize = 3;

/// Refresh period for the waiting room and today's appointments
pub const FAST_REFRESH_INTERVAL: Duration = Duration::from_secs(20);

/// Refresh period for the dashboard summary, notifications and BCV rate
pub const SLOW_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Decimal precision for money shown in notification messages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Default BCV rate used when no live quote has ever been fetched
pub const DEFAULT_FALLBACK_RATE: &str = "36.50";

/// Default unit of the BCV rate
pub const DEFAULT_RATE_UNIT: &str = "VES/USD";

/// Default number of decimals the BCV rate is shown with
pub const DEFAULT_RATE_PRECISION: u32 = 4;

/// Source label for quotes built from the configured default
pub const CONFIGURED_RATE_SOURCE: &str = "CONFIGURED_DEFAULT";

/// Actor shown on synthesized feed entries
pub const SYSTEM_ACTOR: &str = "System";
