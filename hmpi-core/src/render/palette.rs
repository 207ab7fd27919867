use crate::classify::SeverityTier;

/// Color for a tier: green, amber, red.
pub fn tier_color(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Safe => "#22c55e",
        SeverityTier::Elevated => "#eab308",
        SeverityTier::Exceeded => "#ef4444",
    }
}

/// CSS class applied to table cells and legend swatches.
pub fn tier_class(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Safe => "tier-safe",
        SeverityTier::Elevated => "tier-elevated",
        SeverityTier::Exceeded => "tier-exceeded",
    }
}

/// Categorical color for the i-th slice of a pie chart; cycles every 8.
pub fn series_color(i: usize) -> &'static str {
    const PALETTE: [&str; 8] = [
        "#3b82f6", // blue
        "#22c55e", // green
        "#f97316", // orange
        "#eab308", // amber
        "#8b5cf6", // violet
        "#f43f5e", // rose
        "#14b8a6", // teal
        "#facc15", // yellow
    ];
    PALETTE[i % PALETTE.len()]
}

pub const CURRENT_FILL: &str = "rgba(59,130,246,0.7)";
pub const CURRENT_LINE: &str = "rgba(59,130,246,0.8)";
pub const CURRENT_AREA: &str = "rgba(59,130,246,0.3)";
pub const CURRENT_RADAR_FILL: &str = "rgba(59,130,246,0.2)";
pub const LIMIT_FILL: &str = "rgba(34,197,94,0.7)";
pub const LIMIT_LINE: &str = "rgba(34,197,94,0.8)";
pub const LIMIT_AREA: &str = "rgba(34,197,94,0.3)";
pub const LIMIT_RADAR_FILL: &str = "rgba(34,197,94,0.2)";
